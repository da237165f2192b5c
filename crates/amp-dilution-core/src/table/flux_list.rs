//! Encoding of the per-star numeric lists stored in a single table cell.
//!
//! A list is written as `[v1, v2, ...]`: square brackets, comma-separated
//! floats, optional whitespace around each value, at least one value.
//! Anything else is rejected rather than guessed at.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluxListError {
    #[error("empty cell")]
    EmptyCell,

    #[error("expected a list enclosed in '[' and ']', got {0:?}")]
    MissingBrackets(String),

    #[error("list has no values")]
    NoValues,

    #[error("value {index} is not a number: {value:?}")]
    InvalidNumber { index: usize, value: String },
}

pub fn parse_flux_list(cell: &str) -> Result<Vec<f64>, FluxListError> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Err(FluxListError::EmptyCell);
    }

    let inner = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| FluxListError::MissingBrackets(trimmed.to_string()))?;

    if inner.trim().is_empty() {
        return Err(FluxListError::NoValues);
    }

    inner
        .split(',')
        .enumerate()
        .map(|(index, raw)| {
            let value = raw.trim();
            value
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| FluxListError::InvalidNumber {
                    index,
                    value: value.to_string(),
                })
        })
        .collect()
}

pub fn format_flux_list(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_value() {
        assert_eq!(parse_flux_list("[1000]").unwrap(), vec![1000.0]);
    }

    #[test]
    fn test_parse_with_whitespace_and_exponent() {
        let values = parse_flux_list("  [ 1.5e3 ,-999, 0.25 ] ").unwrap();
        assert_eq!(values, vec![1500.0, -999.0, 0.25]);
    }

    #[test]
    fn test_parse_rejects_missing_brackets() {
        assert!(matches!(
            parse_flux_list("1000, 2000"),
            Err(FluxListError::MissingBrackets(_))
        ));
        assert!(matches!(
            parse_flux_list("[1000, 2000"),
            Err(FluxListError::MissingBrackets(_))
        ));
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(parse_flux_list(""), Err(FluxListError::EmptyCell));
        assert_eq!(parse_flux_list("[ ]"), Err(FluxListError::NoValues));
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        assert_eq!(
            parse_flux_list("[1.0, abc]"),
            Err(FluxListError::InvalidNumber {
                index: 1,
                value: "abc".to_string()
            })
        );
        // trailing comma leaves an empty element
        assert!(parse_flux_list("[1.0,]").is_err());
        assert!(parse_flux_list("[1.0, NaN]").is_err());
    }

    #[test]
    fn test_format_matches_parse() {
        let text = format_flux_list(&[1000.0, -999.0, 12.5]);
        assert_eq!(text, "[1000, -999, 12.5]");
        assert_eq!(parse_flux_list(&text).unwrap(), vec![1000.0, -999.0, 12.5]);
    }
}
