use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, de};

/// HTML selects and optional inputs submit an empty string when left
/// blank; treat that as absence instead of a parse error.
pub(crate) fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse::<T>().map(Some).map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::empty_string_as_none;

    #[derive(Debug, Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "empty_string_as_none")]
        category_id: Option<i64>,
    }

    #[test]
    fn blank_select_becomes_none() {
        let form: Form = serde_urlencoded::from_str("category_id=").expect("must parse");
        assert_eq!(form.category_id, None);

        let form: Form = serde_urlencoded::from_str("").expect("must parse");
        assert_eq!(form.category_id, None);
    }

    #[test]
    fn numeric_select_is_parsed() {
        let form: Form = serde_urlencoded::from_str("category_id=5").expect("must parse");
        assert_eq!(form.category_id, Some(5));
    }
}
