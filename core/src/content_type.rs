//! Request content types.

use std::borrow::Cow;
use std::fmt;

/// The `Content-Type` a request declares, compared by its wire string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentType(Cow<'static, str>);

impl ContentType {
    pub const JSON: ContentType = ContentType(Cow::Borrowed("application/json"));
    pub const FORM_URL_ENCODED: ContentType =
        ContentType(Cow::Borrowed("application/x-www-form-urlencoded"));
    pub const MULTIPART_FORM_DATA: ContentType = ContentType(Cow::Borrowed("multipart/form-data"));

    /// Any other media type, e.g. `text/csv`.
    pub fn new(value: impl Into<String>) -> Self {
        ContentType(Cow::Owned(value.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ContentType {
    fn default() -> Self {
        ContentType::JSON
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_by_value() {
        assert_eq!(ContentType::new("application/json"), ContentType::JSON);
        assert_ne!(ContentType::JSON, ContentType::FORM_URL_ENCODED);
    }

    #[test]
    fn wire_strings() {
        assert_eq!(ContentType::JSON.as_str(), "application/json");
        assert_eq!(
            ContentType::FORM_URL_ENCODED.to_string(),
            "application/x-www-form-urlencoded"
        );
        assert_eq!(ContentType::MULTIPART_FORM_DATA.as_str(), "multipart/form-data");
        assert_eq!(ContentType::default(), ContentType::JSON);
    }
}
