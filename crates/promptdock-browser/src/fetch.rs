//! Decorator source download.

use promptdock_core::error::WidgetError;

/// Fetch the decorator source document from `url`.
///
/// The request asks intermediaries not to serve a cached copy, so edits to
/// the upstream list show up on the next page load. Any failure (network,
/// non-2xx status, body decode) maps to [`WidgetError::SourceFetchFailed`]
/// and the caller falls back to the bundled list.
pub async fn fetch_decorator_source(url: &str) -> Result<String, WidgetError> {
    let response = reqwest::Client::new()
        .get(url)
        .header("cache-control", "no-cache")
        .send()
        .await
        .map_err(|e| WidgetError::SourceFetchFailed(e.to_string()))?;

    if !response.status().is_success() {
        return Err(WidgetError::SourceFetchFailed(format!(
            "status {}",
            response.status()
        )));
    }

    response
        .text()
        .await
        .map_err(|e| WidgetError::SourceFetchFailed(e.to_string()))
}
