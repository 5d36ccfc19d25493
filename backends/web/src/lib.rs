#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Web/WASM backend for embeddable `WaterUI` widgets.
//!
//! The bundle's entry point calls [`load_widget`] (exported to JS as `loadWidget`).
//! It reads the loader object the embedding snippet left on `window`, points
//! `window[name]` at the Rust namespace, mounts the widget through a
//! [`WebBootstrapper`] and runs the queued calls. Calls made meanwhile join the
//! queue; once the slot is live they are dispatched directly.
//!
//! Builds with their own method set or application use [`load_with`].

mod app;
pub mod bridge;
pub mod console;
mod dom;
mod error;
mod host;

pub use app::WebBootstrapper;
pub use dom::has_explicit_height;
pub use error::WebError;
pub use host::WebHost;

use wasm_bindgen::prelude::*;
use waterui_embed::{Host, Widget, WidgetLoader, resolve};

/// Loads `loader`'s widget into the current page.
///
/// # Errors
///
/// Returns an error outside of a browser, when the loader pipeline fails, or when
/// `window[name]` cannot be written.
pub fn load_with(
    loader: &WidgetLoader,
    bootstrapper: &mut WebBootstrapper,
) -> Result<Widget, WebError> {
    console_error_panic_hook::set_once();
    console::install_console_tracing();

    let host = WebHost::new()?;
    let name = resolve::resolve(loader.kind(), &host)?;
    bridge::forward(&name, host.window(), host.shared_namespace())?;

    let loaded = loader.load(&host, bootstrapper);
    // A late handler error can leave the slot live; the JS latch follows the Rust one.
    if host.namespace().is_loaded(&name) {
        bridge::publish(&name, host.window())?;
    }
    loaded.map_err(WebError::from)
}

/// Loads the widget of type `kind` with the default method set.
///
/// # Errors
///
/// Throws the loader error to the calling script.
#[wasm_bindgen(js_name = loadWidget)]
pub fn load_widget(kind: &str) -> Result<(), WebError> {
    load_with(&WidgetLoader::new(kind), &mut WebBootstrapper::new()).map(drop)
}
