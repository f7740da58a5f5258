//! Form deserialization helpers.

use serde::{Deserialize, Deserializer};

/// Deserialize an optional form field, treating an empty string as `None`.
///
/// HTML selects and inputs submit `""` when nothing was chosen;
/// serde_urlencoded would otherwise fail to parse that into `Option<i32>`
/// and the like, turning a missing choice into a 422 instead of a
/// validation message.
///
/// # Errors
///
/// Returns a deserialization error if a non-empty value fails to parse.
pub fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;

    use thistle_core::CategoryId;

    #[derive(Deserialize)]
    struct TestForm {
        #[serde(default, deserialize_with = "super::empty_string_as_none")]
        category_id: Option<CategoryId>,
    }

    #[test]
    fn test_empty_string_is_none() {
        let form: TestForm = serde_urlencoded::from_str("category_id=").unwrap();
        assert!(form.category_id.is_none());
    }

    #[test]
    fn test_missing_field_is_none() {
        let form: TestForm = serde_urlencoded::from_str("").unwrap();
        assert!(form.category_id.is_none());
    }

    #[test]
    fn test_value_parses() {
        let form: TestForm = serde_urlencoded::from_str("category_id=7").unwrap();
        assert_eq!(form.category_id, Some(CategoryId::new(7)));
    }

    #[test]
    fn test_garbage_is_an_error() {
        let form: Result<TestForm, _> = serde_urlencoded::from_str("category_id=abc");
        assert!(form.is_err());
    }
}
