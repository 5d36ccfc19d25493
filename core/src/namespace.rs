//! The page-wide namespace through which the host page reaches each instance.
//!
//! Every instance name owns one [`Channel`]. Before the widget has mounted the
//! channel buffers calls; once drained it is swapped for a live [`Dispatcher`] in a
//! single write, so there is no moment where neither exists. The namespace also
//! holds the `loaded-<name>` latches that reject a second load of the same name.
//!
//! Everything here is single-threaded. No borrow is held while a handler runs, so
//! handlers may call back into the namespace.

use alloc::{
    collections::{BTreeMap, BTreeSet},
    rc::Rc,
};
use core::cell::RefCell;

use crate::{
    config::INIT_METHOD,
    error::EmbedError,
    loader::{LoaderObject, MethodCall, Parameters},
    processor::Dispatcher,
};

/// Prefix of the latch slot name.
pub const LATCH_PREFIX: &str = "loaded-";

/// Name of the latch slot for instance `name`.
#[must_use]
pub fn latch_key(name: &str) -> String {
    format!("{LATCH_PREFIX}{name}")
}

/// State of one instance slot.
#[derive(Debug)]
pub enum Channel {
    /// The widget has not mounted yet; calls are queued.
    Buffering(LoaderObject),
    /// The widget is live; calls are dispatched synchronously.
    Live(Dispatcher),
}

thread_local! {
    static GLOBAL: Rc<Namespace> = Rc::new(Namespace::new());
}

/// Mapping from instance name to [`Channel`], plus the loaded latches.
#[derive(Debug, Default)]
pub struct Namespace {
    slots: RefCell<BTreeMap<String, Channel>>,
    latches: RefCell<BTreeSet<String>>,
}

impl Namespace {
    /// Creates an empty namespace.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: RefCell::new(BTreeMap::new()),
            latches: RefCell::new(BTreeSet::new()),
        }
    }

    /// The namespace of the current page.
    ///
    /// Created on first use and kept until the thread ends, which in a browser is
    /// when the page unloads.
    #[must_use]
    pub fn global() -> Rc<Self> {
        GLOBAL.with(Rc::clone)
    }

    /// Places a loader object under `name`, replacing whatever was there.
    pub fn install_loader(&self, name: impl Into<String>, loader: LoaderObject) {
        self.slots
            .borrow_mut()
            .insert(name.into(), Channel::Buffering(loader));
    }

    /// Calls `method` on instance `name`, the way the host page does.
    ///
    /// While buffering the call is appended to the queue, creating the loader if
    /// the slot is empty. Once live it is dispatched immediately.
    ///
    /// # Errors
    ///
    /// Errors returned by the handler of a live instance.
    pub fn call(
        &self,
        name: &str,
        method: impl Into<String>,
        parameters: Parameters,
    ) -> anyhow::Result<()> {
        let method = method.into();
        let dispatcher = {
            let mut slots = self.slots.borrow_mut();
            let slot = slots
                .entry(name.to_owned())
                .or_insert_with(|| Channel::Buffering(LoaderObject::default()));
            match slot {
                Channel::Buffering(loader) => {
                    loader.push(MethodCall::new(method, parameters));
                    return Ok(());
                }
                Channel::Live(dispatcher) => dispatcher.clone(),
            }
        };
        dispatcher.call(&method, &parameters)
    }

    /// A snapshot of the loader under `name`, if the slot is still buffering.
    #[must_use]
    pub fn loader(&self, name: &str) -> Option<LoaderObject> {
        match self.slots.borrow().get(name) {
            Some(Channel::Buffering(loader)) => Some(loader.clone()),
            _ => None,
        }
    }

    /// The live dispatcher under `name`, if any.
    #[must_use]
    pub fn dispatcher(&self, name: &str) -> Option<Dispatcher> {
        match self.slots.borrow().get(name) {
            Some(Channel::Live(dispatcher)) => Some(dispatcher.clone()),
            _ => None,
        }
    }

    /// Returns `true` when a slot exists under `name`, buffering or live.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.slots.borrow().contains_key(name)
    }

    /// Returns `true` when calls to `name` are dispatched directly.
    #[must_use]
    pub fn is_live(&self, name: &str) -> bool {
        matches!(self.slots.borrow().get(name), Some(Channel::Live(_)))
    }

    /// Returns `true` when the latch for `name` is set.
    #[must_use]
    pub fn is_loaded(&self, name: &str) -> bool {
        self.latches.borrow().contains(name)
    }

    /// Sets the latch for `name`. Returns `false` when it was already set.
    pub fn mark_loaded(&self, name: impl Into<String>) -> bool {
        self.latches.borrow_mut().insert(name.into())
    }

    /// Names of all occupied slots.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.slots.borrow().keys().cloned().collect()
    }

    /// Swaps the slot under `name` for `dispatcher`.
    ///
    /// `observed` is the queue length of the snapshot that was drained. Calls
    /// appended after it, other than `init`, are returned in order so the caller
    /// can dispatch them; they would otherwise be dropped with the loader.
    ///
    /// # Errors
    ///
    /// [`EmbedError::DuplicateLoad`] when the slot is already live. The existing
    /// dispatcher is kept.
    pub fn go_live(
        &self,
        name: &str,
        dispatcher: Dispatcher,
        observed: usize,
    ) -> Result<Vec<MethodCall>, EmbedError> {
        let mut slots = self.slots.borrow_mut();
        if matches!(slots.get(name), Some(Channel::Live(_))) {
            return Err(EmbedError::DuplicateLoad {
                name: name.to_owned(),
            });
        }

        let previous = slots.insert(name.to_owned(), Channel::Live(dispatcher));
        drop(slots);

        let late = match previous {
            Some(Channel::Buffering(loader)) => loader
                .q
                .unwrap_or_default()
                .into_iter()
                .skip(observed)
                .filter(|call| call.method != INIT_METHOD)
                .collect(),
            _ => Vec::new(),
        };
        Ok(late)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::{config, parameters::ParameterChannel, registry::MethodRegistry};

    fn dispatcher(name: &str) -> Dispatcher {
        let mut parameters = config::defaults("fiat-to-coin");
        parameters.insert("token".into(), json!("t"));
        let config = serde_json::from_value(Value::Object(parameters)).expect("valid defaults");
        Dispatcher::new(
            name,
            Rc::new(MethodRegistry::new()),
            ParameterChannel::new(),
            Rc::new(config),
        )
    }

    #[test]
    fn calls_before_load_are_queued_in_order() {
        let namespace = Namespace::new();
        namespace
            .call("w", "init", Parameters::new())
            .expect("buffering never fails");
        namespace
            .call("w", "a", Parameters::new())
            .expect("buffering never fails");

        let loader = namespace.loader("w").expect("buffering");
        let methods: Vec<_> = loader
            .q
            .expect("queue created")
            .into_iter()
            .map(|call| call.method)
            .collect();
        assert_eq!(methods, ["init", "a"]);
        assert!(namespace.contains("w"));
        assert!(!namespace.contains("other"));
        assert!(!namespace.is_live("w"));
    }

    #[test]
    fn latch_is_one_shot() {
        let namespace = Namespace::new();
        assert!(!namespace.is_loaded("w"));
        assert!(namespace.mark_loaded("w"));
        assert!(!namespace.mark_loaded("w"));
        assert!(namespace.is_loaded("w"));
        assert_eq!(latch_key("w"), "loaded-w");
    }

    #[test]
    fn loader_snapshot_does_not_follow_later_calls() {
        let namespace = Namespace::new();
        namespace
            .call("w", "init", Parameters::new())
            .expect("buffering never fails");
        let snapshot = namespace.loader("w").expect("buffering");

        let mut parameters = Parameters::new();
        parameters.insert("x".into(), json!(1));
        namespace
            .call("w", "late", parameters)
            .expect("buffering never fails");

        assert_eq!(snapshot.len(), 1);
        assert_eq!(namespace.loader("w").expect("buffering").len(), 2);
    }

    #[test]
    fn going_live_returns_calls_after_the_snapshot() {
        let namespace = Namespace::new();
        for method in ["init", "a", "init", "late"] {
            namespace
                .call("w", method, Parameters::new())
                .expect("buffering never fails");
        }

        let late = namespace
            .go_live("w", dispatcher("first"), 2)
            .expect("slot was buffering");
        let methods: Vec<_> = late.into_iter().map(|call| call.method).collect();
        assert_eq!(methods, ["late"]);
        assert!(namespace.is_live("w"));
    }

    #[test]
    fn a_live_slot_keeps_its_dispatcher() {
        let namespace = Namespace::new();
        namespace
            .go_live("w", dispatcher("first"), 0)
            .expect("empty slot");

        let error = namespace
            .go_live("w", dispatcher("second"), 0)
            .expect_err("already live");
        assert!(matches!(error, EmbedError::DuplicateLoad { .. }));
        assert_eq!(
            namespace.dispatcher("w").map(|live| live.name().to_owned()),
            Some("first".to_owned())
        );
    }

    #[test]
    fn global_namespace_is_shared() {
        let first = Namespace::global();
        let second = Namespace::global();
        assert!(Rc::ptr_eq(&first, &second));
    }
}
