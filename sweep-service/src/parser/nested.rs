// Nested Matrix Parser
// Parses YAML category/parameter range specifications

use crate::parser::error::{ParseError, ParseErrorKind, ParseResult};
use crate::parser::models::{linspace, ParamRanges, Scalar};

use std::path::Path;

use serde_yaml::Value as Yaml;

/// Parser for the nested matrix form.
///
/// The document is a mapping of category name to a mapping of parameter name
/// to one of:
/// - a scalar string (a constant, coerced like a tabular `CON` cell),
/// - a three-element numeric sequence `[lo, hi, count]` (a range),
/// - a list mixing scalar strings and such sequences.
///
/// Categories exist only for readability; parameters from every category
/// land in one flat output, first-seen order, and a parameter declared in
/// several places concatenates its expansions in declaration order.
pub struct NestedParser;

impl NestedParser {
    /// Parse a nested matrix file.
    pub fn parse_file(path: &Path) -> ParseResult<ParamRanges> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ParseError::io(&e, path.display().to_string()))?;
        Self::parse_str(&content)
    }

    /// Parse nested matrix YAML text.
    pub fn parse_str(input: &str) -> ParseResult<ParamRanges> {
        let root: Yaml = serde_yaml::from_str(input).map_err(|e| {
            ParseError::new(format!("invalid YAML: {}", e), ParseErrorKind::YamlSyntax)
        })?;
        Self::parse_value(&root)
    }

    /// Parse an already-loaded YAML document.
    pub fn parse_value(root: &Yaml) -> ParseResult<ParamRanges> {
        let categories = root.as_mapping().ok_or_else(|| {
            ParseError::new(
                "matrix document must be a mapping of categories",
                ParseErrorKind::InvalidShape,
            )
        })?;

        let mut ranges = ParamRanges::new();
        for (category_key, category_value) in categories {
            let category = Self::key_str(category_key, "category")?;
            let params = category_value.as_mapping().ok_or_else(|| {
                ParseError::new(
                    format!("'{}' must contain a mapping of parameters", category),
                    ParseErrorKind::InvalidShape,
                )
                .at(category.to_string())
            })?;

            for (param_key, param_value) in params {
                let name = Self::key_str(param_key, "parameter")?;
                let path = format!("{}/{}", category, name);
                let values = Self::expand_entry(param_value, &path)?;
                ranges.entry(name.to_string()).or_default().extend(values);
            }
        }

        if ranges.is_empty() {
            return Err(ParseError::new(
                "matrix document declares no parameters",
                ParseErrorKind::EmptyEntry,
            ));
        }

        Ok(ranges)
    }

    fn key_str<'a>(key: &'a Yaml, role: &str) -> ParseResult<&'a str> {
        key.as_str().ok_or_else(|| {
            ParseError::new(
                format!("{} names must be strings", role),
                ParseErrorKind::InvalidShape,
            )
        })
    }

    fn expand_entry(value: &Yaml, path: &str) -> ParseResult<Vec<Scalar>> {
        match value {
            Yaml::String(s) => Ok(vec![Scalar::coerce(s)]),
            Yaml::Sequence(seq) => {
                if Self::is_triple(seq) {
                    Self::expand_triple(seq, path)
                } else {
                    let mut out = Vec::new();
                    for item in seq {
                        match item {
                            Yaml::String(s) => out.push(Scalar::coerce(s)),
                            Yaml::Sequence(inner) if Self::is_triple(inner) => {
                                out.extend(Self::expand_triple(inner, path)?);
                            }
                            other => {
                                return Err(ParseError::new(
                                    format!("invalid list item {:?}", other),
                                    ParseErrorKind::InvalidShape,
                                )
                                .at(path.to_string())
                                .with_suggestion(
                                    "list items are quoted constants or [lo, hi, count] triples",
                                ));
                            }
                        }
                    }
                    Ok(out)
                }
            }
            other => Err(ParseError::new(
                format!("invalid parameter value {:?}", other),
                ParseErrorKind::InvalidShape,
            )
            .at(path.to_string())
            .with_suggestion(
                "use a quoted constant, a [lo, hi, count] triple, or a list mixing both",
            )),
        }
    }

    /// A bare three-number sequence is always a range triple. Three numeric
    /// constants need the list form with quoted values.
    fn is_triple(seq: &[Yaml]) -> bool {
        seq.len() == 3 && seq.iter().all(|v| v.as_f64().is_some())
    }

    fn expand_triple(seq: &[Yaml], path: &str) -> ParseResult<Vec<Scalar>> {
        let lo = seq[0].as_f64().ok_or_else(|| Self::bound_error(path))?;
        let hi = seq[1].as_f64().ok_or_else(|| Self::bound_error(path))?;

        let count = match &seq[2] {
            Yaml::Number(n) => {
                if let Some(c) = n.as_u64() {
                    c as usize
                } else {
                    // Whole-valued floats pass; a fractional count never does.
                    match n.as_f64() {
                        Some(f) if f.fract() == 0.0 && f >= 0.0 => f as usize,
                        _ => 0,
                    }
                }
            }
            _ => 0,
        };
        if count < 1 {
            return Err(ParseError::new(
                "range count must be a positive integer",
                ParseErrorKind::NonIntegerCount,
            )
            .at(path.to_string()));
        }

        Ok(linspace(lo, hi, count))
    }

    fn bound_error(path: &str) -> ParseError {
        ParseError::new(
            "range bounds must be numeric",
            ParseErrorKind::NonNumericBound,
        )
        .at(path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_and_triples() {
        let input = r#"
waves:
  H: "1.0"
  S: [0, 1, 3]
"#;
        let ranges = NestedParser::parse_str(input).unwrap();
        assert_eq!(ranges["H"], vec![Scalar::Float(1.0)]);
        assert_eq!(
            ranges["S"],
            vec![Scalar::Float(0.0), Scalar::Float(0.5), Scalar::Float(1.0)]
        );
    }

    #[test]
    fn test_mixed_list_concatenates() {
        let input = r#"
waves:
  T: ["8", [10, 12, 2]]
"#;
        let ranges = NestedParser::parse_str(input).unwrap();
        assert_eq!(
            ranges["T"],
            vec![Scalar::Int(8), Scalar::Float(10.0), Scalar::Float(12.0)]
        );
    }

    #[test]
    fn test_parameters_flatten_across_categories() {
        let input = r#"
waves:
  H: "1.0"
bathy:
  SLOPE: "0.05"
  H: [2, 3, 2]
"#;
        let ranges = NestedParser::parse_str(input).unwrap();
        let names: Vec<&String> = ranges.keys().collect();
        assert_eq!(names, vec!["H", "SLOPE"]);
        assert_eq!(
            ranges["H"],
            vec![Scalar::Float(1.0), Scalar::Float(2.0), Scalar::Float(3.0)]
        );
    }

    #[test]
    fn test_text_constant_stays_text() {
        let input = r#"
boundary:
  BC: "PER_BC"
"#;
        let ranges = NestedParser::parse_str(input).unwrap();
        assert_eq!(ranges["BC"], vec![Scalar::Text("PER_BC".to_string())]);
    }

    #[test]
    fn test_bare_number_rejected() {
        let input = r#"
waves:
  H: 1.0
"#;
        let err = NestedParser::parse_str(input).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidShape);
        assert_eq!(err.location.as_deref(), Some("waves/H"));
    }

    #[test]
    fn test_non_mapping_category_rejected() {
        let input = r#"
waves: [1, 2]
"#;
        let err = NestedParser::parse_str(input).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidShape);
    }

    #[test]
    fn test_fractional_count_rejected() {
        let input = r#"
waves:
  S: [0, 1, 2.5]
"#;
        let err = NestedParser::parse_str(input).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::NonIntegerCount);
    }

    #[test]
    fn test_invalid_list_item_rejected() {
        let input = r#"
waves:
  S: [[0, 1], "2"]
"#;
        let err = NestedParser::parse_str(input).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidShape);
    }

    #[test]
    fn test_whole_float_count_accepted() {
        let input = r#"
waves:
  S: [0, 1, 3.0]
"#;
        let ranges = NestedParser::parse_str(input).unwrap();
        assert_eq!(ranges["S"].len(), 3);
    }
}
