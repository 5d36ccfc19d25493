//! The reactive parameter channel shared by method handlers and the mounted app.

use core::fmt;

use nami::Binding;
use serde_json::Value;

use crate::loader::Parameters;

/// A shared, observable parameter map.
///
/// The mounted application watches [`ParameterChannel::binding`]; method handlers
/// write into it. Clones share the same underlying binding.
#[derive(Clone)]
pub struct ParameterChannel {
    inner: Binding<Parameters>,
}

impl ParameterChannel {
    /// Creates an empty channel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Binding::container(Parameters::new()),
        }
    }

    /// Current parameters.
    #[must_use]
    pub fn get(&self) -> Parameters {
        self.inner.get()
    }

    /// Current value of a single parameter.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<Value> {
        self.inner.get().get(key).cloned()
    }

    /// Sets one parameter, notifying observers.
    pub fn set(&self, key: impl Into<String>, value: Value) {
        let mut parameters = self.inner.get();
        parameters.insert(key.into(), value);
        self.inner.set(parameters);
    }

    /// Shallow-merges `parameters` over the current ones and notifies observers once.
    pub fn merge(&self, parameters: &Parameters) {
        let mut current = self.inner.get();
        current.extend(parameters.clone());
        self.inner.set(current);
    }

    /// The underlying binding, for views that react to parameter changes.
    #[must_use]
    pub fn binding(&self) -> Binding<Parameters> {
        self.inner.clone()
    }
}

impl Default for ParameterChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ParameterChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterChannel")
            .field("parameters", &self.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use serde_json::json;
    use nami::Signal;

    use super::*;

    #[test]
    fn clones_share_state() {
        let channel = ParameterChannel::new();
        let handle = channel.clone();
        handle.set("theme", json!("dark"));
        assert_eq!(channel.value("theme"), Some(json!("dark")));
    }

    #[test]
    fn merge_overrides_per_key() {
        let channel = ParameterChannel::new();
        channel.set("theme", json!("light"));
        channel.set("amount", json!(10));

        let mut update = Parameters::new();
        update.insert("theme".into(), json!("dark"));
        channel.merge(&update);

        assert_eq!(channel.value("theme"), Some(json!("dark")));
        assert_eq!(channel.value("amount"), Some(json!(10)));
    }

    #[test]
    fn observers_see_updates() {
        let channel = ParameterChannel::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let _guard = channel.binding().watch({
            let seen = Rc::clone(&seen);
            move |context| {
                let parameters: Parameters = context.into_value();
                seen.borrow_mut().push(parameters.len());
            }
        });

        channel.set("a", json!(1));
        channel.set("b", json!(2));
        assert_eq!(&*seen.borrow(), &[1, 2]);
    }
}
