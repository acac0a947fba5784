// Tabular Matrix Parser
// Parses delimited-text range specifications (VAR/CON/LO/HI/NUM columns)

use crate::parser::error::{ParseError, ParseErrorKind, ParseResult};
use crate::parser::models::{linspace, ParamRanges, Scalar};

use std::path::Path;

/// Markers treated as a missing cell, alongside the empty string.
const NA_MARKERS: &[&str] = &["NA", "NULL"];

/// Required header columns, in no particular order.
const REQUIRED_COLUMNS: &[&str] = &["VAR", "CON", "LO", "HI", "NUM"];

/// Parser for the tabular matrix form.
///
/// One row per range entry: `VAR` names the parameter, and exactly one of
/// `CON` (a constant) or the `LO`/`HI`/`NUM` triple (a linearly spaced range)
/// is populated. Rows for the same `VAR` concatenate in declaration order,
/// and parameters keep their first-seen order in the output.
pub struct TabularParser;

impl TabularParser {
    /// Parse a tabular matrix file.
    pub fn parse_file(path: &Path) -> ParseResult<ParamRanges> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ParseError::io(&e, path.display().to_string()))?;
        Self::parse_str(&content)
    }

    /// Parse tabular matrix text.
    pub fn parse_str(input: &str) -> ParseResult<ParamRanges> {
        let mut rows = input
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

        let (header_row, header_line) = rows.next().ok_or_else(|| {
            ParseError::new("matrix input is empty", ParseErrorKind::EmptyEntry)
                .with_suggestion("provide a header row: VAR,CON,LO,HI,NUM")
        })?;
        let header = Self::parse_header(header_row, header_line)?;

        let mut ranges = ParamRanges::new();
        for (row_num, line) in rows {
            let cells: Vec<&str> = line.split(',').map(str::trim).collect();
            let cell = |col: usize| -> Option<&str> {
                cells.get(col).copied().filter(|c| !Self::is_missing(c))
            };

            let name = cell(header.var).ok_or_else(|| {
                ParseError::new("row has no VAR entry", ParseErrorKind::EmptyEntry)
                    .at(format!("row {}", row_num))
            })?;

            let con = cell(header.con);
            let lo = cell(header.lo);
            let hi = cell(header.hi);
            let num = cell(header.num);
            let range_cells = [lo, hi, num];

            let values = match (con, range_cells.iter().any(Option::is_some)) {
                (Some(_), true) => {
                    return Err(ParseError::new(
                        format!("'{}' declares both a constant and a range", name),
                        ParseErrorKind::MixedEntry,
                    )
                    .at(format!("row {}", row_num))
                    .with_suggestion("populate CON or LO/HI/NUM, never both"));
                }
                (None, false) => {
                    return Err(ParseError::new(
                        format!("'{}' declares neither a constant nor a range", name),
                        ParseErrorKind::EmptyEntry,
                    )
                    .at(format!("row {}", row_num)));
                }
                (Some(constant), false) => vec![Scalar::coerce(constant)],
                (None, true) => Self::expand_range(name, lo, hi, num, row_num)?,
            };

            ranges.entry(name.to_string()).or_default().extend(values);
        }

        if ranges.is_empty() {
            return Err(ParseError::new(
                "matrix input has no data rows",
                ParseErrorKind::EmptyEntry,
            ));
        }

        Ok(ranges)
    }

    fn is_missing(cell: &str) -> bool {
        cell.is_empty() || NA_MARKERS.contains(&cell)
    }

    fn parse_header(row_num: usize, line: &str) -> ParseResult<Header> {
        let columns: Vec<&str> = line.split(',').map(str::trim).collect();
        let find = |name: &str| -> ParseResult<usize> {
            columns.iter().position(|c| *c == name).ok_or_else(|| {
                ParseError::new(
                    format!("header is missing the '{}' column", name),
                    ParseErrorKind::MissingHeader,
                )
                .at(format!("row {}", row_num))
                .with_suggestion(format!(
                    "the header must contain {}",
                    REQUIRED_COLUMNS.join(", ")
                ))
            })
        };
        Ok(Header {
            var: find("VAR")?,
            con: find("CON")?,
            lo: find("LO")?,
            hi: find("HI")?,
            num: find("NUM")?,
        })
    }

    fn expand_range(
        name: &str,
        lo: Option<&str>,
        hi: Option<&str>,
        num: Option<&str>,
        row_num: usize,
    ) -> ParseResult<Vec<Scalar>> {
        let (lo, hi, num) = match (lo, hi, num) {
            (Some(lo), Some(hi), Some(num)) => (lo, hi, num),
            _ => {
                return Err(ParseError::new(
                    format!("'{}' has a partially populated range", name),
                    ParseErrorKind::MixedEntry,
                )
                .at(format!("row {}", row_num))
                .with_suggestion("a range needs all of LO, HI and NUM"));
            }
        };

        // Fortran-style count discipline: the text itself must be integral.
        if num.contains('.') {
            return Err(ParseError::new(
                format!("'{}' has a non-integer NUM '{}'", name, num),
                ParseErrorKind::NonIntegerCount,
            )
            .at(format!("row {}", row_num))
            .with_suggestion("NUM is a sample count and must be a positive integer"));
        }
        let count = match Scalar::coerce(num) {
            Scalar::Int(n) if n >= 1 => n as usize,
            _ => {
                return Err(ParseError::new(
                    format!("'{}' has an invalid NUM '{}'", name, num),
                    ParseErrorKind::NonIntegerCount,
                )
                .at(format!("row {}", row_num))
                .with_suggestion("NUM is a sample count and must be a positive integer"));
            }
        };

        let bound = |label: &str, cell: &str| -> ParseResult<f64> {
            Scalar::coerce(cell).as_f64().ok_or_else(|| {
                ParseError::new(
                    format!("'{}' has a non-numeric {} '{}'", name, label, cell),
                    ParseErrorKind::NonNumericBound,
                )
                .at(format!("row {}", row_num))
            })
        };

        Ok(linspace(bound("LO", lo)?, bound("HI", hi)?, count))
    }
}

struct Header {
    var: usize,
    con: usize,
    lo: usize,
    hi: usize,
    num: usize,
}
