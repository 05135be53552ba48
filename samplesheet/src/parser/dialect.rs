//! Dialect sniffing: delimiter, quote character and header detection from
//! the leading lines of a samplesheet.

use regex::Regex;
use serde::Serialize;
use std::io::{BufRead, Read, Seek, SeekFrom};

use crate::error::{DialectError, DialectResult};
use crate::models::REQUIRED_COLUMNS;

/// Number of leading lines inspected when no other value is configured.
pub const DEFAULT_SAMPLE_LINES: usize = 10;

/// Delimiters tried, in order of preference on ties.
const DELIMITERS: [char; 4] = [',', '\t', ';', '|'];

/// Upper bound on data rows consulted by the header vote.
const HEADER_VOTE_ROWS: usize = 20;

/// Delimiter and quoting convention of a delimited text file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dialect {
    pub delimiter: char,
    pub quote: char,
    /// Fields are written as `a, b, c`: surrounding spaces are not data.
    pub skip_initial_space: bool,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
            skip_initial_space: false,
        }
    }
}

impl Dialect {
    /// A `csv` reader using this dialect and treating the first record as header.
    ///
    /// The reader is flexible: rows whose length differs from the header are
    /// returned as-is so the caller can report them with a line number.
    pub fn reader<R: Read>(&self, input: R) -> csv::Reader<R> {
        self.builder().has_headers(true).from_reader(input)
    }

    fn builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .delimiter(self.delimiter as u8)
            .quote(self.quote as u8)
            .flexible(true);
        if self.skip_initial_space {
            builder.trim(csv::Trim::All);
        }
        builder
    }

    /// Split `sample` into records without header handling.
    fn split(&self, sample: &str) -> Result<Vec<Vec<String>>, csv::Error> {
        self.builder()
            .has_headers(false)
            .from_reader(sample.as_bytes())
            .records()
            .map(|record| record.map(|r| r.iter().map(String::from).collect()))
            .collect()
    }
}

/// Read the specified number of lines from the current position.
pub fn read_head<R: BufRead>(handle: &mut R, num_lines: usize) -> std::io::Result<String> {
    let mut head = String::new();
    for _ in 0..num_lines {
        if handle.read_line(&mut head)? == 0 {
            break;
        }
    }
    Ok(head)
}

/// Detect the tabular format from the first `sample_lines` lines of `handle`.
///
/// The handle is expected at offset 0 and is rewound to 0 before returning,
/// so the caller can parse the whole input with the returned dialect.
pub fn sniff_format<R: BufRead + Seek>(handle: &mut R, sample_lines: usize) -> DialectResult<Dialect> {
    let peek = read_head(handle, sample_lines).map_err(|e| DialectError::Read(e.to_string()))?;
    handle
        .seek(SeekFrom::Start(0))
        .map_err(|e| DialectError::Read(e.to_string()))?;
    sniff(&peek)
}

/// Infer the dialect of a text sample and require a header row.
pub fn sniff(sample: &str) -> DialectResult<Dialect> {
    if sample.trim().is_empty() {
        return Err(DialectError::Empty);
    }

    let quote = detect_quote(sample);
    let (dialect, rows) = detect_delimiter(sample, quote)?;

    if !has_header(&rows) {
        return Err(DialectError::NoHeader);
    }
    Ok(dialect)
}

/// Pick `'` over `"` only when single-quoted fields are more common.
pub fn detect_quote(sample: &str) -> char {
    if quoted_field_count(sample, '\'') > quoted_field_count(sample, '"') {
        '\''
    } else {
        '"'
    }
}

fn quoted_field_count(sample: &str, quote: char) -> usize {
    let q = regex::escape(&quote.to_string());
    let pattern = format!(r"(?m)(?:^|[,\t;|]) ?{q}[^{q}\n]*{q} ?(?:[,\t;|]|\r?$)");
    Regex::new(&pattern)
        .map(|re| re.find_iter(sample).count())
        .unwrap_or(0)
}

/// Find the delimiter that splits the first sampled line into at least two
/// fields and most other lines into the same number.
///
/// A ragged line is tolerated as long as most lines agree with the first, so
/// the row check can report it by line number. Candidates whose first line
/// names all required columns win, then more lines of the first line's width,
/// then wider splits, then the order of [`DELIMITERS`].
pub fn detect_delimiter(sample: &str, quote: char) -> DialectResult<(Dialect, Vec<Vec<String>>)> {
    let mut best: Option<((bool, usize, usize), Dialect, Vec<Vec<String>>)> = None;

    for &delimiter in &DELIMITERS {
        let dialect = Dialect {
            delimiter,
            quote,
            skip_initial_space: false,
        };
        let Ok(rows) = dialect.split(sample) else {
            continue;
        };
        let Some(first) = rows.first() else {
            continue;
        };
        let width = first.len();
        let matching = rows.iter().filter(|row| row.len() == width).count();
        if width < 2 || matching * 2 <= rows.len() {
            continue;
        }

        // `a, b, c`: every field after a delimiter on the first line starts with a space
        let (dialect, rows) = if first[1..].iter().all(|field| field.starts_with(' ')) {
            let dialect = Dialect {
                skip_initial_space: true,
                ..dialect
            };
            let Ok(rows) = dialect.split(sample) else {
                continue;
            };
            (dialect, rows)
        } else {
            (dialect, rows)
        };
        let Some(first) = rows.first() else {
            continue;
        };

        let named = REQUIRED_COLUMNS
            .iter()
            .all(|column| first.iter().any(|field| field == column));
        let score = (named, matching, width);
        if best.as_ref().map_or(true, |(best_score, _, _)| score > *best_score) {
            best = Some((score, dialect, rows));
        }
    }

    best.map(|(_, dialect, rows)| (dialect, rows))
        .ok_or_else(|| DialectError::UndeterminedDelimiter {
            tried: "',', '\\t', ';', '|'".to_string(),
        })
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum CellKind {
    Numeric,
    Text(usize),
}

impl CellKind {
    fn of(cell: &str) -> Self {
        if is_numeric(cell) {
            CellKind::Numeric
        } else {
            CellKind::Text(cell.chars().count())
        }
    }

    /// Vote for a header cell: +1 when it does not fit the column, -1 when it does.
    fn vote(self, header_cell: &str) -> i64 {
        let fits = match self {
            CellKind::Numeric => is_numeric(header_cell),
            CellKind::Text(len) => header_cell.chars().count() == len,
        };
        if fits {
            -1
        } else {
            1
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Unset,
    Kind(CellKind),
    Dropped,
}

fn is_numeric(cell: &str) -> bool {
    cell.trim().parse::<f64>().is_ok()
}

/// Decide whether the first of `rows` is a header.
///
/// A first row naming every required column is accepted outright. Otherwise
/// each column is typed over the following rows (numeric, or text of a fixed
/// length); columns whose type varies are ignored and the rest vote on
/// whether the first row stands out.
pub fn has_header(rows: &[Vec<String>]) -> bool {
    let Some((header, data)) = rows.split_first() else {
        return false;
    };
    if REQUIRED_COLUMNS
        .iter()
        .all(|column| header.iter().any(|cell| cell == column))
    {
        return true;
    }

    let mut slots = vec![Slot::Unset; header.len()];
    for row in data.iter().take(HEADER_VOTE_ROWS) {
        if row.len() != header.len() {
            continue;
        }
        for (slot, cell) in slots.iter_mut().zip(row) {
            let kind = CellKind::of(cell);
            *slot = match *slot {
                Slot::Unset => Slot::Kind(kind),
                Slot::Kind(seen) if seen == kind => Slot::Kind(seen),
                _ => Slot::Dropped,
            };
        }
    }

    let votes: i64 = slots
        .iter()
        .zip(header)
        .map(|(slot, cell)| match slot {
            // no comparable data rows: the lone first line counts as header
            Slot::Unset => 1,
            Slot::Kind(kind) => kind.vote(cell),
            Slot::Dropped => 0,
        })
        .sum();
    votes > 0
}
