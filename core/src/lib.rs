//! Loader queue and hand-off protocol for embeddable `WaterUI` widgets.
//!
//! A host page embeds a widget with a small snippet that installs a loader object
//! under an instance name and queues calls on it, starting with `init`. When the
//! widget bundle arrives, this crate:
//!
//! 1. [resolves](resolve::resolve) the instance name from the marker `<script>`,
//! 2. [reads](loader::read_loader) the queued calls,
//! 3. [merges](config::merge) the `init` parameters over the defaults,
//! 4. and, once the application is mounted, [drains](processor::drain) the
//!    remaining calls and swaps the slot for a live [`Dispatcher`].
//!
//! ```text
//! snippet                 bundle
//! ───────                 ──────
//! name('init', {...})  ─┐
//! name('a', {...})      ├─▶ Channel::Buffering(q) ──drain──▶ Channel::Live(dispatcher)
//! name('b', {...})     ─┘                                         ▲
//!                                        name('c', {...}) ─────────┘ (direct call)
//! ```
//!
//! The page itself is abstracted behind [`Host`].

extern crate alloc;

pub mod config;
pub mod error;
pub mod host;
pub mod instance;
pub mod loader;
pub mod namespace;
pub mod parameters;
pub mod processor;
pub mod registry;
pub mod resolve;


pub use config::{Configuration, Theme, Version};
pub use error::EmbedError;
pub use host::{Host, Location, MemoryHost, Navigator, ScriptMarker};
pub use instance::Instance;
pub use loader::{LoaderObject, MethodCall, Parameters};
pub use namespace::{Channel, Namespace};
pub use parameters::ParameterChannel;
pub use processor::{Dispatcher, drain};
pub use registry::{BoxMethodHandler, MethodHandler, MethodRegistry};
