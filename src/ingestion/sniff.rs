//! Column type sniffing for text sources and header normalization.

use std::collections::HashSet;

use crate::types::Value;

/// Cell texts treated as the missing-marker when loading text formats.
pub const MISSING_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "#N/A", "#NA",
    "<NA>", "-1.#IND", "1.#IND", "-1.#QNAN", "1.#QNAN",
];

/// Returns `true` if `raw` (after trimming) is one of [`MISSING_TOKENS`].
pub fn is_missing_token(raw: &str) -> bool {
    MISSING_TOKENS.contains(&raw.trim())
}

/// Convert one column of raw text cells into typed values.
///
/// The whole column gets one type: integers if every non-missing cell parses as `i64`, else
/// floats, else booleans (`true`/`false`), else the original text.
pub fn sniff_text_column(raw: &[&str]) -> Vec<Value> {
    let cells: Vec<Option<&str>> = raw
        .iter()
        .map(|s| {
            let t = s.trim();
            if is_missing_token(t) { None } else { Some(t) }
        })
        .collect();

    if let Some(values) = parse_all(&cells, |s| s.parse::<i64>().ok().map(Value::Int64)) {
        return values;
    }
    if let Some(values) = parse_all(&cells, |s| parse_float(s).map(Value::Float64)) {
        return values;
    }
    if let Some(values) = parse_all(&cells, |s| parse_bool(s).map(Value::Bool)) {
        return values;
    }

    raw.iter()
        .zip(cells)
        .map(|(raw, cell)| match cell {
            None => Value::Null,
            Some(_) => Value::Utf8((*raw).to_string()),
        })
        .collect()
}

fn parse_all<F>(cells: &[Option<&str>], mut parse: F) -> Option<Vec<Value>>
where
    F: FnMut(&str) -> Option<Value>,
{
    cells
        .iter()
        .map(|cell| match cell {
            None => Some(Value::Null),
            Some(s) => parse(s),
        })
        .collect()
}

fn parse_float(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| !v.is_nan())
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Make header names usable as unique column names.
///
/// Blank headers become `Unnamed: {index}`; repeats get a `.1`, `.2`, ... suffix.
pub fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(raw.len());
    let mut out = Vec::with_capacity(raw.len());
    for (idx, name) in raw.into_iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            name
        };
        let mut candidate = base.clone();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{base}.{suffix}");
            suffix += 1;
        }
        seen.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{is_missing_token, normalize_headers, sniff_text_column};
    use crate::types::Value;

    #[test]
    fn integer_column_with_missing_cells() {
        let out = sniff_text_column(&["1", "", " 3 ", "NA"]);
        assert_eq!(
            out,
            vec![Value::Int64(1), Value::Null, Value::Int64(3), Value::Null]
        );
    }

    #[test]
    fn mixed_int_and_float_becomes_float() {
        let out = sniff_text_column(&["1", "2.5"]);
        assert_eq!(out, vec![Value::Float64(1.0), Value::Float64(2.5)]);
    }

    #[test]
    fn bool_column_is_case_insensitive() {
        let out = sniff_text_column(&["True", "false", "nan"]);
        assert_eq!(out, vec![Value::Bool(true), Value::Bool(false), Value::Null]);
    }

    #[test]
    fn any_text_keeps_the_whole_column_as_text() {
        let out = sniff_text_column(&["1", "abc", " x "]);
        assert_eq!(
            out,
            vec![
                Value::Utf8("1".to_string()),
                Value::Utf8("abc".to_string()),
                Value::Utf8(" x ".to_string()),
            ]
        );
    }

    #[test]
    fn missing_tokens() {
        assert!(is_missing_token(""));
        assert!(is_missing_token(" N/A "));
        assert!(is_missing_token("NULL"));
        assert!(!is_missing_token("0"));
        assert!(!is_missing_token("none"));
    }

    #[test]
    fn headers_are_made_unique() {
        let out = normalize_headers(vec![
            "a".to_string(),
            "".to_string(),
            "a".to_string(),
            "a".to_string(),
        ]);
        assert_eq!(out, vec!["a", "Unnamed: 1", "a.1", "a.2"]);
    }
}
