//! Methods the default widget build accepts from the host page.

use tracing::info;
use waterui_embed_core::{Configuration, MethodRegistry, ParameterChannel, Parameters};

/// Example method of the default build.
pub const MY_WIDGET_CALL: &str = "my-widget-call";

/// The registry used by [`WidgetLoader::new`](crate::WidgetLoader::new).
#[must_use]
pub fn default_registry() -> MethodRegistry {
    MethodRegistry::new().with(MY_WIDGET_CALL, my_widget_call)
}

/// Logs the call and forwards its parameters to the application.
fn my_widget_call(
    parameters: &Parameters,
    channel: &ParameterChannel,
    config: &Configuration,
) -> anyhow::Result<()> {
    info!(
        kind = %config.kind,
        parameters = %serde_json::Value::Object(parameters.clone()),
        "myWidgetCall triggered"
    );
    channel.merge(parameters);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_build_knows_its_methods() {
        let registry = default_registry();
        assert_eq!(registry.names().collect::<Vec<_>>(), [MY_WIDGET_CALL]);
    }
}
