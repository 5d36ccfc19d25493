//! The table of methods a widget build accepts from the host page.
//!
//! The registry is keyed by name rather than by a closed enum: each embeddable
//! build brings its own method set, and snippets written against older or newer
//! builds may call methods this one does not know.

use alloc::collections::BTreeMap;
use core::{any::type_name, fmt::Debug};

use crate::{config::Configuration, loader::Parameters, parameters::ParameterChannel};

/// A method callable from the host page.
pub trait MethodHandler: 'static {
    /// Runs the method.
    ///
    /// # Errors
    ///
    /// Whatever the method reports. The loader does not catch it.
    fn handle(
        &self,
        parameters: &Parameters,
        channel: &ParameterChannel,
        config: &Configuration,
    ) -> anyhow::Result<()>;
}

impl Debug for dyn MethodHandler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(type_name::<Self>())
    }
}

impl<F> MethodHandler for F
where
    F: Fn(&Parameters, &ParameterChannel, &Configuration) -> anyhow::Result<()> + 'static,
{
    fn handle(
        &self,
        parameters: &Parameters,
        channel: &ParameterChannel,
        config: &Configuration,
    ) -> anyhow::Result<()> {
        self(parameters, channel, config)
    }
}

/// A boxed handler with dynamic dispatch.
pub type BoxMethodHandler = Box<dyn MethodHandler>;

/// Maps method names to handlers.
#[derive(Debug, Default)]
pub struct MethodRegistry {
    methods: BTreeMap<String, BoxMethodHandler>,
}

impl MethodRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            methods: BTreeMap::new(),
        }
    }

    /// Registers a closure under `name`, returning the handler it replaces.
    pub fn register<F>(&mut self, name: impl Into<String>, handler: F) -> Option<BoxMethodHandler>
    where
        F: Fn(&Parameters, &ParameterChannel, &Configuration) -> anyhow::Result<()> + 'static,
    {
        self.register_handler(name, handler)
    }

    /// Registers any [`MethodHandler`] under `name`, returning the handler it replaces.
    pub fn register_handler(
        &mut self,
        name: impl Into<String>,
        handler: impl MethodHandler,
    ) -> Option<BoxMethodHandler> {
        self.methods.insert(name.into(), Box::new(handler))
    }

    /// Builder form of [`MethodRegistry::register`].
    #[must_use]
    pub fn with<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Parameters, &ParameterChannel, &Configuration) -> anyhow::Result<()> + 'static,
    {
        self.register(name, handler);
        self
    }

    /// Looks up the handler registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn MethodHandler> {
        self.methods.get(name).map(Box::as_ref)
    }

    /// Returns `true` when `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Registered method names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    /// Number of registered methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Returns `true` when no method is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}
