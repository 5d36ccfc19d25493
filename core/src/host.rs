//! The page hosting an embedded widget.
//!
//! The loader never talks to a browser directly. Everything it needs from the host
//! page (the marker `<script>` elements, the viewport, the navigator, the global
//! namespace) is read through [`Host`]. The web backend implements it on top of
//! `web-sys`; [`MemoryHost`] implements it in-process.

use alloc::collections::BTreeSet;

use crate::namespace::Namespace;

/// A `<script>` element carrying the embedding marker attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptMarker {
    /// Absolute source URL of the script.
    pub src: String,
    /// Value of the marker data attribute, if any.
    pub marker: Option<String>,
    /// Value of the element's `id` attribute, if any.
    pub id: Option<String>,
}

impl ScriptMarker {
    /// Creates a marker for a script loaded from `src`.
    #[must_use]
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            marker: None,
            id: None,
        }
    }

    /// Sets the value of the marker data attribute.
    #[must_use]
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// Sets the element identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Language information declared by the host's navigator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    /// `navigator.language`.
    pub language: Option<String>,
    /// Legacy `navigator.userLanguage`.
    pub user_language: Option<String>,
}

/// The host page's location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// Scheme, host and port, e.g. `https://shop.example`.
    pub origin: String,
    /// Path of the page, e.g. `/checkout`.
    pub pathname: String,
}

impl Location {
    /// Creates a location from its origin and path.
    #[must_use]
    pub fn new(origin: impl Into<String>, pathname: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            pathname: pathname.into(),
        }
    }

    /// Returns `origin + pathname`, the page URL without query or fragment.
    #[must_use]
    pub fn page_url(&self) -> String {
        format!("{}{}", self.origin, self.pathname)
    }
}

/// Access to the page an embeddable is loaded into.
pub trait Host {
    /// Handle to a DOM element the application can be mounted on.
    type Element;

    /// The page-wide namespace holding loader objects, dispatchers and latches.
    fn namespace(&self) -> &Namespace;

    /// All script elements carrying the marker attribute, in document order.
    fn script_markers(&self) -> Vec<ScriptMarker>;

    /// Width of the viewport in logical pixels.
    fn viewport_width(&self) -> f64;

    /// Language settings of the navigator.
    fn navigator(&self) -> Navigator;

    /// Current page location.
    fn location(&self) -> Location;

    /// Returns the first element matching `selector`.
    fn query_selector(&self, selector: &str) -> Option<Self::Element>;
}

/// An in-process [`Host`] with a fixed set of scripts and elements.
#[derive(Debug, Default)]
pub struct MemoryHost {
    namespace: Namespace,
    scripts: Vec<ScriptMarker>,
    viewport_width: f64,
    navigator: Navigator,
    location: Location,
    elements: BTreeSet<String>,
}

impl MemoryHost {
    /// Creates an empty host with a desktop-sized viewport.
    #[must_use]
    pub fn new() -> Self {
        Self {
            viewport_width: 1280.0,
            ..Self::default()
        }
    }

    /// Adds a marker script element.
    #[must_use]
    pub fn with_script(mut self, script: ScriptMarker) -> Self {
        self.scripts.push(script);
        self
    }

    /// Sets the viewport width.
    #[must_use]
    pub const fn with_viewport_width(mut self, width: f64) -> Self {
        self.viewport_width = width;
        self
    }

    /// Sets the navigator languages.
    #[must_use]
    pub fn with_navigator(mut self, navigator: Navigator) -> Self {
        self.navigator = navigator;
        self
    }

    /// Sets the page location.
    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Registers a selector that resolves to an element.
    #[must_use]
    pub fn with_element(mut self, selector: impl Into<String>) -> Self {
        self.elements.insert(selector.into());
        self
    }

    /// Changes the viewport width after construction, e.g. to simulate a resize.
    pub const fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = width;
    }
}

impl Host for MemoryHost {
    type Element = String;

    fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    fn script_markers(&self) -> Vec<ScriptMarker> {
        self.scripts.clone()
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    fn navigator(&self) -> Navigator {
        self.navigator.clone()
    }

    fn location(&self) -> Location {
        self.location.clone()
    }

    fn query_selector(&self, selector: &str) -> Option<String> {
        self.elements.get(selector).cloned()
    }
}
