//! Draining the queued calls and handing the slot over to a live dispatcher.

use alloc::rc::Rc;
use core::fmt;

use tracing::{debug, warn};

use crate::{
    config::Configuration,
    error::EmbedError,
    instance::Instance,
    loader::{MethodCall, Parameters},
    namespace::Namespace,
    parameters::ParameterChannel,
    registry::MethodRegistry,
};

/// Routes calls for one instance through its method registry.
///
/// Cheap to clone; clones share the registry, channel and configuration.
#[derive(Clone)]
pub struct Dispatcher {
    name: Rc<str>,
    registry: Rc<MethodRegistry>,
    parameters: ParameterChannel,
    config: Rc<Configuration>,
}

impl Dispatcher {
    /// Creates a dispatcher for instance `name`.
    #[must_use]
    pub fn new(
        name: &str,
        registry: Rc<MethodRegistry>,
        parameters: ParameterChannel,
        config: Rc<Configuration>,
    ) -> Self {
        Self {
            name: Rc::from(name),
            registry,
            parameters,
            config,
        }
    }

    /// Calls `method` with `parameters`.
    ///
    /// Unknown methods are logged and skipped.
    ///
    /// # Errors
    ///
    /// The handler's own error, unchanged.
    pub fn call(&self, method: &str, parameters: &Parameters) -> anyhow::Result<()> {
        let Some(handler) = self.registry.get(method) else {
            warn!(
                instance = %self.name,
                method,
                "Tried to call method \"{method}\" which is not available for this widget"
            );
            return Ok(());
        };

        debug!(
            instance = %self.name,
            method,
            parameters = %serde_json::Value::Object(parameters.clone()),
            "Called method \"{method}\""
        );
        handler.handle(parameters, &self.parameters, &self.config)
    }

    /// Dispatches a queued call.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::call`].
    pub fn dispatch(&self, call: &MethodCall) -> anyhow::Result<()> {
        self.call(&call.method, &call.parameters)
    }

    /// Name of the instance this dispatcher serves.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parameter channel handed to every handler.
    #[must_use]
    pub const fn parameters(&self) -> &ParameterChannel {
        &self.parameters
    }

    /// The configuration handed to every handler.
    #[must_use]
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// The method registry.
    #[must_use]
    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("name", &self.name)
            .field("methods", &self.registry.names().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Runs every pending call of `instance`, then makes its slot live.
///
/// Calls run synchronously in insertion order. The swap to the returned
/// [`Dispatcher`] is the last write to the slot; calls queued while draining are
/// dispatched right after it, still in order.
///
/// # Errors
///
/// - The first handler error, as [`EmbedError::Method`]. Remaining calls are not
///   run and, when the error happens before the swap, the slot keeps buffering.
/// - [`EmbedError::DuplicateLoad`] when the slot is already live. Nothing is
///   dispatched.
pub fn drain(
    instance: Instance,
    parameters: &ParameterChannel,
    namespace: &Namespace,
    registry: Rc<MethodRegistry>,
) -> Result<Dispatcher, EmbedError> {
    let (name, config, queue, observed) = instance.into_parts();
    if namespace.is_live(&name) {
        return Err(EmbedError::DuplicateLoad { name });
    }

    let dispatcher = Dispatcher::new(&name, registry, parameters.clone(), Rc::new(config));

    for call in &queue {
        dispatcher.dispatch(call)?;
    }

    let late = namespace.go_live(&name, dispatcher.clone(), observed)?;
    for call in &late {
        dispatcher.dispatch(call)?;
    }

    Ok(dispatcher)
}
