use std::rc::Rc;

use js_sys::{JSON, Reflect};
use serde_json::Value;
use tracing::debug;
use wasm_bindgen::{JsCast, JsValue};
use waterui_embed_core::{
    Host, LoaderObject, Location, Namespace, Navigator, Parameters, ScriptMarker,
    namespace::latch_key,
    resolve::{MARKER_DATASET_KEY, MARKER_SELECTOR, instance_name},
};
use web_sys::{Document, HtmlElement, HtmlScriptElement, Window};

use crate::error::WebError;

/// [`Host`] backed by the browser window.
///
/// On construction the loader objects and latches of every marked instance are
/// copied from the JS global into the Rust [`Namespace`]. That copy is the queue
/// snapshot the loader works on. Slots the namespace already holds are left alone.
#[derive(Debug)]
pub struct WebHost {
    window: Window,
    document: Document,
    namespace: Rc<Namespace>,
}

impl WebHost {
    /// Creates a host over the current window using the page-wide namespace.
    ///
    /// # Errors
    ///
    /// Returns an error outside of a browser or when a loader object cannot be read.
    pub fn new() -> Result<Self, WebError> {
        Self::with_namespace(Namespace::global())
    }

    /// Creates a host using `namespace`.
    ///
    /// # Errors
    ///
    /// Returns an error outside of a browser or when a loader object cannot be read.
    pub fn with_namespace(namespace: Rc<Namespace>) -> Result<Self, WebError> {
        let window: Window = web_sys::window().ok_or(WebError::DomUnavailable)?;
        let document: Document = window.document().ok_or(WebError::DomUnavailable)?;

        let host = Self {
            window,
            document,
            namespace,
        };
        host.import_slots()?;
        Ok(host)
    }

    /// The browser window.
    #[must_use]
    pub const fn window(&self) -> &Window {
        &self.window
    }

    /// The document.
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// A shared handle to the namespace.
    #[must_use]
    pub fn shared_namespace(&self) -> Rc<Namespace> {
        Rc::clone(&self.namespace)
    }

    fn import_slots(&self) -> Result<(), WebError> {
        for marker in self.script_markers() {
            if let Ok(name) = instance_name(&marker) {
                self.import_slot(name)?;
            }
        }
        Ok(())
    }

    fn import_slot(&self, name: &str) -> Result<(), WebError> {
        let latch = Reflect::get(&self.window, &JsValue::from_str(&latch_key(name)))?;
        if latch.as_bool() == Some(true) {
            self.namespace.mark_loaded(name);
        }

        // Once imported, `window[name]` forwards into the namespace and has no `q`.
        if self.namespace.contains(name) {
            return Ok(());
        }

        let slot = Reflect::get(&self.window, &JsValue::from_str(name))?;
        if slot.is_undefined() || slot.is_null() {
            return Ok(());
        }

        let queue = Reflect::get(&slot, &JsValue::from_str("q"))?;
        let value = to_json(&queue)?;
        let loader = LoaderObject::from_value(name, &value)?;
        debug!(instance = name, queued = loader.len(), "Imported loader object");
        self.namespace.install_loader(name, loader);
        Ok(())
    }
}

impl Host for WebHost {
    type Element = HtmlElement;

    fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    fn script_markers(&self) -> Vec<ScriptMarker> {
        let Ok(nodes) = self.document.query_selector_all(MARKER_SELECTOR) else {
            return Vec::new();
        };

        (0..nodes.length())
            .filter_map(|index| nodes.item(index))
            .filter_map(|node| node.dyn_into::<HtmlScriptElement>().ok())
            .map(|script| {
                let id = script.id();
                ScriptMarker {
                    src: script.src(),
                    marker: script.dataset().get(MARKER_DATASET_KEY),
                    id: (!id.is_empty()).then_some(id),
                }
            })
            .collect()
    }

    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|width| width.as_f64())
            .unwrap_or_default()
    }

    fn navigator(&self) -> Navigator {
        let navigator = self.window.navigator();
        let user_language = Reflect::get(&navigator, &JsValue::from_str("userLanguage"))
            .ok()
            .and_then(|value| value.as_string());

        Navigator {
            language: navigator.language(),
            user_language,
        }
    }

    fn location(&self) -> Location {
        let location = self.window.location();
        Location {
            origin: location.origin().unwrap_or_default(),
            pathname: location.pathname().unwrap_or_default(),
        }
    }

    fn query_selector(&self, selector: &str) -> Option<HtmlElement> {
        self.document
            .query_selector(selector)
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    }
}

/// Converts a JS value to JSON. `undefined` and `null` become [`Value::Null`].
pub(crate) fn to_json(value: &JsValue) -> Result<Value, WebError> {
    if value.is_undefined() || value.is_null() {
        return Ok(Value::Null);
    }
    let json: String = JSON::stringify(value)?.into();
    Ok(serde_json::from_str(&json)?)
}

/// Reads call parameters passed from JS. Missing parameters are an empty map.
pub(crate) fn to_parameters(value: &JsValue) -> Result<Parameters, WebError> {
    match to_json(value)? {
        Value::Null => Ok(Parameters::new()),
        Value::Object(parameters) => Ok(parameters),
        other => Err(WebError::Json(format!(
            "method parameters must be an object, got {other}"
        ))),
    }
}
