//! The resolved identity and state of one widget embedding.

use crate::{
    config::{self, Configuration, INIT_METHOD},
    error::EmbedError,
    host::Host,
    loader::{self, MethodCall},
    resolve,
};

/// One embedded widget: its name, merged configuration and pending calls.
///
/// The pending queue excludes `init` calls and is handed to
/// [`drain`](crate::processor::drain), which consumes the instance.
#[derive(Debug)]
pub struct Instance {
    name: String,
    config: Configuration,
    queue: Vec<MethodCall>,
    observed: usize,
}

impl Instance {
    /// Resolves, reads and configures the instance of type `kind` on `host`.
    ///
    /// # Errors
    ///
    /// Any error from [`resolve::resolve`], [`loader::read_loader`] or
    /// [`config::merge`].
    pub fn create<H>(kind: &str, host: &H) -> Result<Self, EmbedError>
    where
        H: Host + ?Sized,
    {
        let name = resolve::resolve(kind, host)?;
        let loader = loader::read_loader(host.namespace(), &name)?;
        let config = config::merge(&loader, &name, kind, host)?;

        let observed = loader.len();
        let queue = loader
            .q
            .unwrap_or_default()
            .into_iter()
            .filter(|call| call.method != INIT_METHOD)
            .collect();

        Ok(Self {
            name,
            config,
            queue,
            observed,
        })
    }

    /// The instance name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The merged configuration.
    #[must_use]
    pub const fn config(&self) -> &Configuration {
        &self.config
    }

    /// Mutable access to the configuration, for late-bound defaults.
    #[allow(clippy::missing_const_for_fn)]
    pub fn config_mut(&mut self) -> &mut Configuration {
        &mut self.config
    }

    /// Calls waiting to be drained, in insertion order.
    #[must_use]
    pub fn queue(&self) -> &[MethodCall] {
        &self.queue
    }

    pub(crate) fn into_parts(self) -> (String, Configuration, Vec<MethodCall>, usize) {
        (self.name, self.config, self.queue, self.observed)
    }
}
