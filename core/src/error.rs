//! Error taxonomy for the loader pipeline.
//!
//! Every variant except [`EmbedError::Method`] is fatal for a bootstrap attempt: the
//! pipeline stops before anything is mounted or latched.

use thiserror::Error;

/// Errors raised while resolving, configuring, mounting or draining a widget instance.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EmbedError {
    /// No `<script>` element carries the embedding marker attribute.
    #[error("Failed to start widget. No script elements found with the \"data-{attribute}\" attribute")]
    MissingMarker {
        /// Dataset key of the marker attribute.
        attribute: &'static str,
    },

    /// Several marker elements exist and none of them loads the expected widget type.
    #[error("Failed to start widget. No script element found with type \"{kind}\"")]
    AmbiguousInstance {
        /// The widget type that was looked up.
        kind: String,
    },

    /// The marker element has neither a marker value nor an `id`.
    #[error("Could not determine widget name by dataset or id")]
    UnresolvableName,

    /// The `loaded-<name>` latch is already set.
    #[error("Widget with name \"{name}\" was already loaded")]
    DuplicateLoad {
        /// Instance name.
        name: String,
    },

    /// No loader object, no queue, or an empty queue under the instance name.
    #[error(
        "Widget couldn't find the instance \"{name}\". The loading script was modified or no call to the \"init\" method was provided"
    )]
    MissingLoader {
        /// Instance name.
        name: String,
    },

    /// A queue entry does not have the `(method, parameters)` shape.
    #[error("Malformed method call at position {index} in the queue of \"{name}\"")]
    MalformedQueue {
        /// Instance name.
        name: String,
        /// Position of the offending entry.
        index: usize,
    },

    /// The first queued call is not the initialization call.
    #[error("Failed to start widget \"{name}\". The first method must be \"{expected}\"")]
    InitializationOrder {
        /// Instance name.
        name: String,
        /// Name of the initialization method.
        expected: &'static str,
        /// Method name that was found instead.
        found: String,
    },

    /// The initialization call carries no authentication token.
    #[error("Failed to start widget \"{name}\". The \"init\" method should include a client token")]
    MissingToken {
        /// Instance name.
        name: String,
    },

    /// A recognized option has a value of the wrong type or an unsupported value.
    #[error("Invalid configuration for widget \"{name}\": {reason}")]
    InvalidOption {
        /// Instance name.
        name: String,
        /// Description from the deserializer.
        reason: String,
    },

    /// The configured selector matches no element.
    #[error("Widget with selector \"{selector}\" could not be found")]
    MountTargetNotFound {
        /// Selector from the configuration.
        selector: String,
    },

    /// The bootstrapper could not mount the application.
    #[error("Failed to mount widget \"{name}\": {reason}")]
    Mount {
        /// Instance name.
        name: String,
        /// What went wrong.
        reason: String,
    },

    /// A method handler failed. The handler's error is passed through untouched.
    #[error(transparent)]
    Method(#[from] anyhow::Error),
}

impl EmbedError {
    /// Returns `true` for errors raised by a method handler rather than by the loader.
    #[must_use]
    pub const fn is_method(&self) -> bool {
        matches!(self, Self::Method(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_load_names_the_instance() {
        let error = EmbedError::DuplicateLoad {
            name: "btcdirect-f2c".into(),
        };
        assert_eq!(
            error.to_string(),
            "Widget with name \"btcdirect-f2c\" was already loaded"
        );
    }

    #[test]
    fn method_errors_are_transparent() {
        let error = EmbedError::from(anyhow::anyhow!("handler exploded"));
        assert!(error.is_method());
        assert_eq!(error.to_string(), "handler exploded");
    }
}
