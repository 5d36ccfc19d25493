//! Wiring the JS global `window[name]` to the Rust namespace.
//!
//! The embedding snippet's function only pushes onto `window[name].q`, which is
//! read once. [`forward`] replaces it before the widget mounts, so every call from
//! then on lands in the namespace: queued while the slot buffers, dispatched once it
//! is live. [`publish`] mirrors the loaded latch afterwards.

use std::rc::Rc;

use js_sys::Reflect;
use tracing::warn;
use wasm_bindgen::{JsValue, closure::Closure};
use waterui_embed_core::{Namespace, namespace::latch_key};
use web_sys::Window;

use crate::{error::WebError, host::to_parameters};

/// Replaces `window[name]` with a function routing `(method, params)` into
/// [`Namespace::call`].
///
/// Handler errors are thrown back to the calling script.
///
/// # Errors
///
/// Returns an error when the global cannot be written.
pub fn forward(name: &str, window: &Window, namespace: Rc<Namespace>) -> Result<(), WebError> {
    let instance = name.to_owned();
    let forwarder = Closure::<dyn Fn(JsValue, JsValue)>::new(move |method: JsValue,
                                                                    parameters: JsValue| {
        let Some(method) = method.as_string() else {
            warn!(instance = %instance, "Ignored call without a method name");
            return;
        };

        let parameters = match to_parameters(&parameters) {
            Ok(parameters) => parameters,
            Err(error) => wasm_bindgen::throw_str(&error.to_string()),
        };

        if let Err(error) = namespace.call(&instance, method, parameters) {
            wasm_bindgen::throw_str(&format!("{error:#}"));
        }
    });

    Reflect::set(window, &JsValue::from_str(name), forwarder.as_ref())?;
    // The page keeps calling the forwarder until it unloads.
    forwarder.forget();
    Ok(())
}

/// Sets `window['loaded-<name>']` so later bundles see the instance as taken.
///
/// # Errors
///
/// Returns an error when the global cannot be written.
pub fn publish(name: &str, window: &Window) -> Result<(), WebError> {
    Reflect::set(window, &JsValue::from_str(&latch_key(name)), &JsValue::TRUE)?;
    Ok(())
}
