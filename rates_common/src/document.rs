//! Rendered source document handed from a fetcher to the extractor.

/// Markup of the source as it looked once the fetcher considered it settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    url: String,
    html: String,
}

impl Document {
    /// Wrap the markup fetched from `url`.
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }

    /// Address the markup was fetched from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Raw markup.
    pub fn html(&self) -> &str {
        &self.html
    }

    /// `true` when the source returned nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.html.trim().is_empty()
    }
}
