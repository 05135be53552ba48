//! Samplesheet I/O: encoding detection, dialect sniffing, and the
//! comma-delimited writer for the normalized output.

pub mod dialect;

pub use dialect::{sniff, sniff_format, Dialect, DEFAULT_SAMPLE_LINES};

use std::io::Write;
use std::path::Path;

use crate::error::{CheckError, CheckResult};
use crate::models::{Columns, Row};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decoded samplesheet text with the encoding it was read as.
#[derive(Debug, Clone)]
pub struct DecodedInput {
    pub text: String,
    pub encoding: String,
}

/// Detect the encoding of raw bytes.
///
/// Valid UTF-8 (with or without BOM) short-circuits; anything else goes
/// through chardet. Charsets `encoding_rs` has no decoder for fall back to
/// Windows-1252, the usual spreadsheet export encoding.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if bytes.starts_with(UTF8_BOM) || std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let charset = chardet::detect(bytes).0;

    // Normalize charset names; the bytes are known not to be UTF-8 here
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "windows-1252".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other if encoding_rs::Encoding::for_label(other.as_bytes()).is_some() => other.to_string(),
        _ => "windows-1252".to_string(),
    }
}

/// Decode bytes to a string using the specified encoding.
///
/// A UTF-8 BOM is dropped. Invalid UTF-8 is an error rather than being
/// replaced, so file paths are never silently altered.
pub fn decode_content(bytes: &[u8], encoding: &str) -> CheckResult<String> {
    let encoding = encoding.to_lowercase();
    match encoding.as_str() {
        "utf-8" | "utf8" | "ascii" => {
            let (text, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
            if had_errors {
                return Err(CheckError::Encoding {
                    encoding,
                    message: "invalid byte sequence".to_string(),
                });
            }
            Ok(text.into_owned())
        }
        // ISO-8859-1 is decoded as its Windows-1252 superset
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            Ok(encoding_rs::WINDOWS_1252
                .decode_without_bom_handling(bytes)
                .0
                .into_owned())
        }
        label => match encoding_rs::Encoding::for_label(label.as_bytes()) {
            Some(found) => {
                let (text, had_errors) = found.decode_with_bom_removal(bytes);
                if had_errors {
                    return Err(CheckError::Encoding {
                        encoding,
                        message: "invalid byte sequence".to_string(),
                    });
                }
                Ok(text.into_owned())
            }
            None => Err(CheckError::Encoding {
                message: "unsupported encoding".to_string(),
                encoding,
            }),
        },
    }
}

/// Detect the encoding of `bytes` and decode them.
pub fn decode_input(bytes: &[u8]) -> CheckResult<DecodedInput> {
    let encoding = detect_encoding(bytes);
    let text = decode_content(bytes, &encoding)?;
    Ok(DecodedInput { text, encoding })
}

/// Read and decode a samplesheet file.
pub fn read_samplesheet(path: &Path) -> CheckResult<DecodedInput> {
    let bytes = std::fs::read(path).map_err(|e| CheckError::io(path, e))?;
    decode_input(&bytes)
}

/// Write rows as comma-delimited text with the `single_end` column inserted.
pub fn write_samplesheet<W: Write>(writer: W, columns: &Columns, rows: &[Row]) -> CheckResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b',')
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    writer.write_record(columns.output_header())?;
    for row in rows {
        writer.write_record(row.output_values())?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}
