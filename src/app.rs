//! Loading a widget into a host page.
//!
//! [`WidgetLoader::load`] runs the whole bootstrap in one synchronous turn:
//!
//! ```text
//! resolve ─▶ read queue ─▶ merge config ─▶ mount ─▶ latch ─▶ drain ─▶ go live
//! ```
//!
//! Mounting comes before draining because handlers may touch application state
//! that only exists once the app is mounted.

use std::rc::Rc;

use tracing::info;
use tracing::level_filters::LevelFilter;
use waterui_embed_core::{
    Configuration, Dispatcher, EmbedError, Host, Instance, MethodRegistry, ParameterChannel,
    Parameters, processor,
};

use crate::{logging, methods};

/// Mounts the application for a resolved instance.
///
/// `E` is the host's element type. Closures taking
/// `(E, &Instance, &ParameterChannel)` implement this trait.
pub trait Bootstrapper<E> {
    /// Mounts the application on `target`.
    ///
    /// `parameters` is the channel the method handlers write into; the application
    /// should observe it.
    ///
    /// # Errors
    ///
    /// Any error aborts the load before a single queued call runs.
    fn mount(
        &mut self,
        target: E,
        instance: &Instance,
        parameters: &ParameterChannel,
    ) -> Result<(), EmbedError>;
}

impl<E, F> Bootstrapper<E> for F
where
    F: FnMut(E, &Instance, &ParameterChannel) -> Result<(), EmbedError>,
{
    fn mount(
        &mut self,
        target: E,
        instance: &Instance,
        parameters: &ParameterChannel,
    ) -> Result<(), EmbedError> {
        self(target, instance, parameters)
    }
}

/// Loads widgets of one type.
#[derive(Debug, Clone)]
pub struct WidgetLoader {
    kind: String,
    registry: Rc<MethodRegistry>,
}

impl WidgetLoader {
    /// Creates a loader for widgets of type `kind` with the default method set.
    ///
    /// `kind` is matched against the file name of the loading script when several
    /// widgets are embedded on one page.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            registry: Rc::new(methods::default_registry()),
        }
    }

    /// Replaces the method set.
    #[must_use]
    pub fn with_registry(mut self, registry: MethodRegistry) -> Self {
        self.registry = Rc::new(registry);
        self
    }

    /// The widget type.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The method set.
    #[must_use]
    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    /// Bootstraps the widget on `host`.
    ///
    /// # Errors
    ///
    /// Configuration errors from the instance pipeline,
    /// [`EmbedError::MountTargetNotFound`] when the selector matches nothing, errors
    /// from `bootstrapper`, and handler errors while draining.
    pub fn load<H, B>(&self, host: &H, bootstrapper: &mut B) -> Result<Widget, EmbedError>
    where
        H: Host + ?Sized,
        B: Bootstrapper<H::Element> + ?Sized,
    {
        let mut instance = Instance::create(&self.kind, host)?;
        instance
            .config_mut()
            .apply_location_defaults(&host.location());

        if instance.config().debug {
            logging::set_level_filter(LevelFilter::DEBUG);
        }

        let selector = instance.config().selector.clone();
        let Some(target) = host.query_selector(&selector) else {
            return Err(EmbedError::MountTargetNotFound { selector });
        };

        let parameters = ParameterChannel::new();
        bootstrapper.mount(target, &instance, &parameters)?;

        let name = instance.name().to_owned();
        host.namespace().mark_loaded(name.as_str());
        info!(instance = %name, "Finished initialization of widget \"{name}\"");

        let dispatcher = processor::drain(
            instance,
            &parameters,
            host.namespace(),
            Rc::clone(&self.registry),
        )?;

        Ok(Widget { dispatcher })
    }
}

/// A mounted, live widget instance.
#[derive(Debug, Clone)]
pub struct Widget {
    dispatcher: Dispatcher,
}

impl Widget {
    /// The instance name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.dispatcher.name()
    }

    /// The configuration the widget was mounted with.
    #[must_use]
    pub fn config(&self) -> &Configuration {
        self.dispatcher.config()
    }

    /// The parameter channel shared with the application.
    #[must_use]
    pub const fn parameters(&self) -> &ParameterChannel {
        self.dispatcher.parameters()
    }

    /// The live dispatcher installed for this instance.
    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Calls a method directly, as the host page would after the swap.
    ///
    /// # Errors
    ///
    /// The handler's error.
    pub fn call(&self, method: &str, parameters: &Parameters) -> anyhow::Result<()> {
        self.dispatcher.call(method, parameters)
    }
}
