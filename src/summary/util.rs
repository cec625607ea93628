use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::license::LicenseNormalizer;

/// Order-preserving dedup that also drops empty strings.
pub(crate) fn unique<I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !value.is_empty() && !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

/// `Some(values)` unless empty.
pub(crate) fn non_empty(values: Vec<String>) -> Option<Vec<String>> {
    (!values.is_empty()).then_some(values)
}

/// Push `value` unless already present.
pub(crate) fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}

/// Combine distinct expressions conjunctively: `(A) AND (B)`, then normalize.
pub(crate) fn join_expressions(
    expressions: &[String],
    normalizer: &dyn LicenseNormalizer,
) -> Option<String> {
    match expressions {
        [] => None,
        [single] => Some(single.clone()),
        many => {
            let joined = format!("({})", many.join(") AND ("));
            normalizer.normalize(&joined)
        }
    }
}

/// Parse a harvested timestamp into a calendar date.
pub(crate) fn extract_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license::SpdxNormalizer;

    #[test]
    fn test_unique_preserves_first_occurrence() {
        let values = vec!["b".to_string(), "a".into(), "b".into(), "".into(), "c".into()];
        assert_eq!(unique(values), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_join_expressions() {
        let n = SpdxNormalizer;
        assert_eq!(join_expressions(&[], &n), None);
        assert_eq!(join_expressions(&["MIT".into()], &n).as_deref(), Some("MIT"));
        assert_eq!(
            join_expressions(&["MIT".into(), "Apache-2.0 OR ISC".into()], &n).as_deref(),
            Some("MIT AND (Apache-2.0 OR ISC)")
        );
    }

    #[test]
    fn test_extract_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2019, 7, 22);
        assert_eq!(extract_date("2019-07-22T10:11:12.000Z"), expected);
        assert_eq!(extract_date(" 2019-07-22T10:11:12+02:00 "), expected);
        assert_eq!(extract_date("2019-07-22T10:11:12"), expected);
        assert_eq!(extract_date("2019-07-22 10:11:12"), expected);
        assert_eq!(extract_date("2019-07-22"), expected);
        assert_eq!(extract_date("last tuesday"), None);
        assert_eq!(extract_date(""), None);
    }
}
