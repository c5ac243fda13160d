//! Fetching of focus-view content fragments.

use gloo::net::http::Request;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Network(String),
}

impl LoadError {
    /// Text shown inline in the content area.
    pub fn user_message(&self) -> String {
        format!("Could not load content: {}", self)
    }
}

/// GET `url` and return the body as markup.
pub async fn fetch_fragment(url: &str) -> Result<String, LoadError> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| LoadError::Network(e.to_string()))?;
    if !response.ok() {
        return Err(LoadError::Status(response.status()));
    }
    response.text().await.map_err(|e| LoadError::Network(e.to_string()))
}
