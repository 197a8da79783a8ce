use crate::validation::sanitize_text_field;

/// A request to import one remote image.
///
/// Descriptive fields are sanitized as they are set, so a constructed request
/// never carries raw markup. Fields left unset are empty strings.
///
/// ```
/// use sideload_core::ImportRequest;
///
/// let request = ImportRequest::new("example.com/pics/sunset.jpg")
///     .with_title("<b>Sunset</b>")
///     .with_alt_text("Orange sky over water");
///
/// assert_eq!(request.title(), "Sunset");
/// assert_eq!(request.caption(), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportRequest {
    url: String,
    title: String,
    caption: String,
    alt_text: String,
    description: String,
}

impl ImportRequest {
    pub fn new(url: impl AsRef<str>) -> Self {
        Self {
            url: url.as_ref().trim().to_string(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl AsRef<str>) -> Self {
        self.title = sanitize_text_field(title.as_ref());
        self
    }

    pub fn with_caption(mut self, caption: impl AsRef<str>) -> Self {
        self.caption = sanitize_text_field(caption.as_ref());
        self
    }

    pub fn with_alt_text(mut self, alt_text: impl AsRef<str>) -> Self {
        self.alt_text = sanitize_text_field(alt_text.as_ref());
        self
    }

    pub fn with_description(mut self, description: impl AsRef<str>) -> Self {
        self.description = sanitize_text_field(description.as_ref());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn alt_text(&self) -> &str {
        &self.alt_text
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Alt text to apply: explicit alt text first, then the title.
    pub fn effective_alt_text(&self) -> Option<&str> {
        [self.alt_text.as_str(), self.title.as_str()]
            .into_iter()
            .find(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_empty() {
        let request = ImportRequest::new("  http://example.com/a.png ");
        assert_eq!(request.url(), "http://example.com/a.png");
        assert_eq!(request.title(), "");
        assert_eq!(request.caption(), "");
        assert_eq!(request.alt_text(), "");
        assert_eq!(request.description(), "");
    }

    #[test]
    fn test_fields_sanitized_on_construction() {
        let request = ImportRequest::new("http://example.com/a.png")
            .with_title("  My <i>Photo</i> ")
            .with_caption("line one\nline two")
            .with_description("<script>steal()</script>Harbour at dusk");
        assert_eq!(request.title(), "My Photo");
        assert_eq!(request.caption(), "line one line two");
        assert_eq!(request.description(), "Harbour at dusk");
    }

    #[test]
    fn test_effective_alt_text_falls_back_to_title() {
        let explicit = ImportRequest::new("x")
            .with_title("Sunset")
            .with_alt_text("Orange sky");
        assert_eq!(explicit.effective_alt_text(), Some("Orange sky"));

        let fallback = ImportRequest::new("x").with_title("Sunset");
        assert_eq!(fallback.effective_alt_text(), Some("Sunset"));

        let none = ImportRequest::new("x");
        assert_eq!(none.effective_alt_text(), None);
    }
}
