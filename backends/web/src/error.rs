use core::fmt;

use waterui_embed_core::EmbedError;

/// Error type produced by the web backend.
#[derive(Debug)]
pub enum WebError {
    /// The DOM APIs are not accessible (e.g., when executed outside of a browser).
    DomUnavailable,
    /// Wrapper around JavaScript exceptions.
    Js(String),
    /// A value coming from the page could not be read as JSON.
    Json(String),
    /// The loader pipeline failed.
    Load(EmbedError),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DomUnavailable => write!(f, "DOM is not available"),
            Self::Js(msg) => write!(f, "JavaScript error: {msg}"),
            Self::Json(msg) => write!(f, "Invalid JSON from the host page: {msg}"),
            Self::Load(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for WebError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Load(error) => Some(error),
            _ => None,
        }
    }
}

impl From<wasm_bindgen::JsValue> for WebError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        value
            .as_string()
            .map_or_else(|| Self::Js(format!("{value:?}")), Self::Js)
    }
}

impl From<serde_json::Error> for WebError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value.to_string())
    }
}

impl From<EmbedError> for WebError {
    fn from(value: EmbedError) -> Self {
        Self::Load(value)
    }
}

impl From<WebError> for wasm_bindgen::JsValue {
    fn from(value: WebError) -> Self {
        js_sys::Error::new(&value.to_string()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_errors_display_the_loader_message() {
        let error = WebError::from(EmbedError::MountTargetNotFound {
            selector: "#x".into(),
        });
        assert_eq!(error.to_string(), "Widget with selector \"#x\" could not be found");
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn json_errors_are_wrapped() {
        let parse = serde_json::from_str::<serde_json::Value>("{").expect_err("truncated");
        assert!(matches!(WebError::from(parse), WebError::Json(_)));
    }
}
