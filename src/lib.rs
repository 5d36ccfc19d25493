#![doc = include_str!("../README.md")]
#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod logging;
pub mod methods;

pub use app::{Bootstrapper, Widget, WidgetLoader};

#[doc(inline)]
pub use waterui_embed_core::{
    Channel, Configuration, Dispatcher, EmbedError, Host, Instance, Location, MemoryHost,
    MethodCall, MethodHandler, MethodRegistry, Namespace, Navigator, ParameterChannel, Parameters,
    ScriptMarker, Theme, Version, config, host, loader, namespace, processor, registry, resolve,
};

pub use tracing as log;

/// Loads the widget of type `kind` on `host` with the default method set, logging
/// to stderr.
///
/// This is the entry point for hosts outside the browser; the web backend installs
/// its own console subscriber instead.
///
/// # Errors
///
/// See [`WidgetLoader::load`].
pub fn load<H, B>(kind: &str, host: &H, bootstrapper: &mut B) -> Result<Widget, EmbedError>
where
    H: Host + ?Sized,
    B: Bootstrapper<H::Element> + ?Sized,
{
    logging::install_tracing();
    WidgetLoader::new(kind).load(host, bootstrapper)
}
