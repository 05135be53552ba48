//! Domain models for the samplesheet check.
//!
//! - [`Columns`] - the parsed header with the positions of the required columns
//! - [`Row`] - one data row, with typed access to `sample`, `vcf`, `traits`
//!   and `ancestry` while extra columns pass through untouched

use crate::error::{CheckError, CheckResult};

// =============================================================================
// Column Names
// =============================================================================

pub const SAMPLE: &str = "sample";
pub const VCF: &str = "vcf";
pub const TRAITS: &str = "traits";
pub const ANCESTRY: &str = "ancestry";

/// Column inserted into the output at index 1, left empty for the pipeline.
pub const SINGLE_END: &str = "single_end";

/// Columns every samplesheet must have, in the order they are reported.
pub const REQUIRED_COLUMNS: [&str; 4] = [SAMPLE, VCF, TRAITS, ANCESTRY];

// =============================================================================
// Header
// =============================================================================

/// Positions of the required columns within a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldIndex {
    pub sample: usize,
    pub vcf: usize,
    pub traits: usize,
    pub ancestry: usize,
}

/// A validated header.
///
/// Construction fails unless every name in [`REQUIRED_COLUMNS`] is present.
/// When a name appears more than once, the last occurrence is used, the way a
/// row keyed by column name keeps the last value written under that name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    names: Vec<String>,
    index: FieldIndex,
}

impl Columns {
    /// Check that `names` is a superset of the required columns.
    pub fn from_header<I, S>(names: I) -> CheckResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let position = |column: &str| names.iter().rposition(|n| n == column);

        match (
            position(SAMPLE),
            position(VCF),
            position(TRAITS),
            position(ANCESTRY),
        ) {
            (Some(sample), Some(vcf), Some(traits), Some(ancestry)) => Ok(Self {
                index: FieldIndex {
                    sample,
                    vcf,
                    traits,
                    ancestry,
                },
                names,
            }),
            _ => Err(CheckError::Schema {
                required: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
                found: names,
            }),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn index(&self) -> FieldIndex {
        self.index
    }

    /// Header of the normalized output: `single_end` inserted at index 1.
    pub fn output_header(&self) -> Vec<String> {
        let mut header = self.names.clone();
        header.insert(1, SINGLE_END.to_string());
        header
    }
}

// =============================================================================
// Row
// =============================================================================

/// One data row, values aligned with the header it was parsed against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    values: Vec<String>,
    index: FieldIndex,
}

impl Row {
    /// Build a row from values already known to match `columns` in length.
    pub fn new(values: Vec<String>, columns: &Columns) -> Self {
        debug_assert_eq!(values.len(), columns.len());
        Self {
            values,
            index: columns.index(),
        }
    }

    pub fn sample(&self) -> &str {
        &self.values[self.index.sample]
    }

    pub fn vcf(&self) -> &str {
        &self.values[self.index.vcf]
    }

    pub fn traits(&self) -> &str {
        &self.values[self.index.traits]
    }

    pub fn ancestry(&self) -> &str {
        &self.values[self.index.ancestry]
    }

    /// All values in header order, extra columns included.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub(crate) fn set_sample(&mut self, sample: String) {
        self.values[self.index.sample] = sample;
    }

    /// Values in output order, with an empty `single_end` cell at index 1.
    pub fn output_values(&self) -> Vec<&str> {
        let mut values: Vec<&str> = self.values.iter().map(String::as_str).collect();
        values.insert(1, "");
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> CheckResult<Columns> {
        Columns::from_header(names.iter().copied())
    }

    #[test]
    fn test_required_columns_in_any_order() {
        let columns = header(&["vcf", "extra", "ancestry", "sample", "traits"]).unwrap();
        let index = columns.index();
        assert_eq!(index.sample, 3);
        assert_eq!(index.vcf, 0);
        assert_eq!(index.traits, 4);
        assert_eq!(index.ancestry, 2);
    }

    #[test]
    fn test_missing_column_lists_required_and_found() {
        let err = header(&["sample", "vcf", "traits"]).unwrap_err();
        match err {
            CheckError::Schema { required, found } => {
                assert_eq!(required, vec!["sample", "vcf", "traits", "ancestry"]);
                assert_eq!(found, vec!["sample", "vcf", "traits"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_column_names_are_case_sensitive() {
        assert!(header(&["Sample", "vcf", "traits", "ancestry"]).is_err());
    }

    #[test]
    fn test_repeated_column_uses_last_occurrence() {
        let columns = header(&["sample", "vcf", "traits", "ancestry", "sample"]).unwrap();
        assert_eq!(columns.index().sample, 4);
        assert_eq!(columns.len(), 5);

        let row = Row::new(
            vec![
                "old".into(),
                "S1.vcf.gz".into(),
                "S1_traits-json.json".into(),
                "S1_ancestry-json.json".into(),
                "S1".into(),
            ],
            &columns,
        );
        assert_eq!(row.sample(), "S1");
    }

    #[test]
    fn test_output_header_inserts_single_end() {
        let columns = header(&["sample", "vcf", "traits", "ancestry", "notes"]).unwrap();
        assert_eq!(
            columns.output_header(),
            vec!["sample", "single_end", "vcf", "traits", "ancestry", "notes"]
        );
    }

    #[test]
    fn test_row_accessors_and_passthrough() {
        let columns = header(&["notes", "sample", "vcf", "traits", "ancestry"]).unwrap();
        let mut row = Row::new(
            vec![
                "run 1".into(),
                "S1".into(),
                "S1.vcf.gz".into(),
                "S1_traits-json.json".into(),
                "S1_ancestry-json.json".into(),
            ],
            &columns,
        );
        assert_eq!(row.sample(), "S1");
        assert_eq!(row.vcf(), "S1.vcf.gz");
        assert_eq!(row.traits(), "S1_traits-json.json");
        assert_eq!(row.ancestry(), "S1_ancestry-json.json");

        row.set_sample("S1_T1".into());
        assert_eq!(
            row.output_values(),
            vec![
                "run 1",
                "",
                "S1_T1",
                "S1.vcf.gz",
                "S1_traits-json.json",
                "S1_ancestry-json.json"
            ]
        );
    }
}
