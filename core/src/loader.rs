//! The pre-bootstrap loader object and its queue.
//!
//! The embedding snippet runs before the widget bundle has been downloaded. Each call
//! the host page makes in that window is appended to `q`, the first one being the
//! `init` call. This module reads that queue back and validates its shape.

use serde_json::{Map, Value};

use crate::{error::EmbedError, namespace::Namespace};

/// Parameters passed along with a method call.
pub type Parameters = Map<String, Value>;

/// One queued `(method, parameters)` call.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    /// Name of the method.
    pub method: String,
    /// Parameters given by the host page.
    pub parameters: Parameters,
}

impl MethodCall {
    /// Creates a method call.
    #[must_use]
    pub fn new(method: impl Into<String>, parameters: Parameters) -> Self {
        Self {
            method: method.into(),
            parameters,
        }
    }

    /// Creates a call without parameters.
    #[must_use]
    pub fn bare(method: impl Into<String>) -> Self {
        Self::new(method, Parameters::new())
    }

    /// Parses a single queue entry.
    ///
    /// Accepts `[method, parameters]` arrays as well as array-like `arguments`
    /// objects (`{"0": method, "1": parameters}`), which is what the snippet pushes.
    /// Missing or `null` parameters become an empty map.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let (method, parameters) = match value {
            Value::Array(items) => (items.first()?, items.get(1)),
            Value::Object(fields) => (fields.get("0")?, fields.get("1")),
            _ => return None,
        };

        let method = method.as_str()?;
        let parameters = match parameters {
            None | Some(Value::Null) => Parameters::new(),
            Some(Value::Object(map)) => map.clone(),
            Some(_) => return None,
        };

        Some(Self::new(method, parameters))
    }
}

/// The placeholder the embedding snippet installs under the instance name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoaderObject {
    /// Queued calls in insertion order. `None` when the object has no queue field.
    pub q: Option<Vec<MethodCall>>,
}

impl LoaderObject {
    /// Creates a loader holding the given calls.
    #[must_use]
    pub const fn with_queue(q: Vec<MethodCall>) -> Self {
        Self { q: Some(q) }
    }

    /// Number of queued calls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.q.as_ref().map_or(0, Vec::len)
    }

    /// Returns `true` when there is no queue or the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends a call, creating the queue when absent.
    pub fn push(&mut self, call: MethodCall) {
        self.q.get_or_insert_with(Vec::new).push(call);
    }

    /// Builds a loader from a JSON snapshot of the host's loader object.
    ///
    /// `value` is the content of the `q` field: `null` means the field was absent.
    ///
    /// # Errors
    ///
    /// Returns [`EmbedError::MalformedQueue`] when `q` is not an array or one of its
    /// entries is not a method call.
    pub fn from_value(name: &str, value: &Value) -> Result<Self, EmbedError> {
        let entries = match value {
            Value::Null => return Ok(Self::default()),
            Value::Array(entries) => entries,
            _ => {
                return Err(EmbedError::MalformedQueue {
                    name: name.to_owned(),
                    index: 0,
                });
            }
        };

        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                MethodCall::from_value(entry).ok_or_else(|| EmbedError::MalformedQueue {
                    name: name.to_owned(),
                    index,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self::with_queue)
    }
}

/// Reads the loader object installed under `name`.
///
/// The returned object is a snapshot: calls made afterwards do not show up in it.
///
/// # Errors
///
/// Returns [`EmbedError::MissingLoader`] when the slot is missing, holds no queue, or
/// the queue is empty. Either the snippet never ran or it never called `init`.
pub fn read_loader(namespace: &Namespace, name: &str) -> Result<LoaderObject, EmbedError> {
    namespace
        .loader(name)
        .filter(|loader| !loader.is_empty())
        .ok_or_else(|| EmbedError::MissingLoader {
            name: name.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_arrays_and_arguments_objects() {
        let loader = LoaderObject::from_value(
            "w",
            &json!([
                ["init", { "token": "abc" }],
                { "0": "my-widget-call", "1": { "x": 1 }, "length": 2 },
                ["bare"]
            ]),
        )
        .expect("queue should parse");

        let q = loader.q.expect("queue present");
        assert_eq!(q.len(), 3);
        assert_eq!(q[0].method, "init");
        assert_eq!(q[0].parameters["token"], "abc");
        assert_eq!(q[1].method, "my-widget-call");
        assert_eq!(q[1].parameters["x"], 1);
        assert!(q[2].parameters.is_empty());
    }

    #[test]
    fn null_queue_means_no_queue_field() {
        let loader = LoaderObject::from_value("w", &Value::Null).expect("null is accepted");
        assert!(loader.q.is_none());
        assert!(loader.is_empty());
    }

    #[test]
    fn rejects_entries_without_method_name() {
        let error = LoaderObject::from_value("w", &json!([["init", {}], [42, {}]]))
            .expect_err("numeric method name");
        assert!(matches!(error, EmbedError::MalformedQueue { index: 1, .. }));
    }

    #[test]
    fn rejects_scalar_parameters() {
        assert!(MethodCall::from_value(&json!(["init", "token"])).is_none());
    }

    #[test]
    fn missing_and_empty_loaders_are_rejected() {
        let namespace = Namespace::new();
        assert!(matches!(
            read_loader(&namespace, "w"),
            Err(EmbedError::MissingLoader { .. })
        ));

        namespace.install_loader("w", LoaderObject::default());
        assert!(matches!(
            read_loader(&namespace, "w"),
            Err(EmbedError::MissingLoader { .. })
        ));

        namespace.install_loader("w", LoaderObject::with_queue(Vec::new()));
        assert!(matches!(
            read_loader(&namespace, "w"),
            Err(EmbedError::MissingLoader { .. })
        ));
    }
}
