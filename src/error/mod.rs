use wasm_bindgen::JsValue;

/// Failures that stop the widget from being installed.
///
/// Missing input (an ineligible page, a page without headings) is not an
/// error; those paths return `Ok(None)` from the builder.
#[derive(Debug, thiserror::Error)]
pub enum TocError {
    #[error("no global `window` available")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("document has no body")]
    NoBody,
    #[error("invalid TOC configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("DOM operation failed: {0}")]
    Dom(String),
}

impl From<JsValue> for TocError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .or_else(|| {
                js_sys::JSON::stringify(&value)
                    .ok()
                    .and_then(|s| s.as_string())
            })
            .unwrap_or_else(|| "unknown JS exception".to_string());
        TocError::Dom(message)
    }
}

pub type TocResult<T> = Result<T, TocError>;
