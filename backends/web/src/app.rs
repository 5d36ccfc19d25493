use waterui_embed::Bootstrapper;
use waterui_embed_core::{EmbedError, Instance, ParameterChannel};
use web_sys::HtmlElement;

use crate::{dom, error::WebError};

type MountCallback =
    Box<dyn FnMut(&HtmlElement, &Instance, &ParameterChannel) -> Result<(), WebError>>;

/// Mounts a widget into its DOM element.
///
/// Prepares the element (explicit height, class name, theme attribute) and then
/// hands it to the application's mount callback, if one was set.
pub struct WebBootstrapper {
    class_name: String,
    on_mount: Option<MountCallback>,
}

impl WebBootstrapper {
    /// Creates a bootstrapper with the default class name and no application callback.
    #[must_use]
    pub fn new() -> Self {
        Self {
            class_name: "waterui-embed-root".to_owned(),
            on_mount: None,
        }
    }

    /// Sets the CSS class added to the mount element.
    #[must_use]
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    /// Sets the callback that renders the application into the mount element.
    #[must_use]
    pub fn on_mount<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&HtmlElement, &Instance, &ParameterChannel) -> Result<(), WebError> + 'static,
    {
        self.on_mount = Some(Box::new(callback));
        self
    }

    fn mount_element(
        &mut self,
        element: &HtmlElement,
        instance: &Instance,
        parameters: &ParameterChannel,
    ) -> Result<(), WebError> {
        dom::ensure_explicit_height(element)?;
        dom::prepare_mount_target(element, &self.class_name, instance.config().theme.as_str())?;
        if let Some(callback) = self.on_mount.as_mut() {
            callback(element, instance, parameters)?;
        }
        Ok(())
    }
}

impl Default for WebBootstrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for WebBootstrapper {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WebBootstrapper")
            .field("class_name", &self.class_name)
            .field("on_mount", &self.on_mount.is_some())
            .finish()
    }
}

impl Bootstrapper<HtmlElement> for WebBootstrapper {
    fn mount(
        &mut self,
        target: HtmlElement,
        instance: &Instance,
        parameters: &ParameterChannel,
    ) -> Result<(), EmbedError> {
        self.mount_element(&target, instance, parameters)
            .map_err(|error| EmbedError::Mount {
                name: instance.name().to_owned(),
                reason: error.to_string(),
            })
    }
}
