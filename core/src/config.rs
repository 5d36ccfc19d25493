//! Merging the `init` call with the default configuration.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    error::EmbedError,
    host::{Host, Location, Navigator},
    loader::{LoaderObject, Parameters},
};

/// Name of the initialization method. It must be the first queued call.
pub const INIT_METHOD: &str = "init";

/// Viewports narrower than this (in logical pixels) cannot honor `useFullWidth`.
pub const FULL_WIDTH_BREAKPOINT: f64 = 1024.0;

/// Selector of the mount element when the host does not provide one.
pub const DEFAULT_SELECTOR: &str = ".btcdirect-widget";

/// Colour scheme of the widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light colours.
    #[default]
    Light,
    /// Dark colours.
    Dark,
}

impl Theme {
    /// The theme's name as used by the host page.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// Generation of the widget UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Version {
    /// First generation.
    #[default]
    #[serde(rename = "v1")]
    V1,
    /// Second generation.
    #[serde(rename = "v2")]
    V2,
}

/// Fully resolved configuration of a widget instance.
///
/// Keys use the host page's camelCase spelling. Keys this build does not know are
/// kept in [`Configuration::extra`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Client token authenticating the embedding.
    pub token: String,
    /// CSS selector of the mount element.
    pub selector: String,
    /// Whether the user identifier flow is enabled.
    pub enable_user_identifier: bool,
    /// Where payment providers send the user back to.
    #[serde(default)]
    pub return_url: Option<String>,
    /// Whether the widget takes the full width of its container.
    pub use_full_width: bool,
    /// Whether payments open in the same window.
    pub use_same_window_for_payment: bool,
    /// Colour scheme.
    pub theme: Theme,
    /// UI generation.
    pub version: Version,
    /// Widget type the configuration was built for.
    #[serde(rename = "type")]
    pub kind: String,
    /// Raises the log level to `DEBUG`.
    #[serde(default)]
    pub debug: bool,
    /// Locale used for translations.
    #[serde(default)]
    pub locale: Option<String>,
    /// Identifier of the signed-in user on the host side.
    #[serde(default)]
    pub user_identifier: Option<String>,
    /// Whether the user has to confirm the wallet address.
    #[serde(default)]
    pub wallet_confirmation_required: Option<bool>,
    /// Whether the widget opens on its overview screen.
    #[serde(default)]
    pub start_in_overview: Option<bool>,
    /// Whether the footer is hidden.
    #[serde(default)]
    pub hide_footer: Option<bool>,
    /// Whether the widget runs inside the unified checkout.
    #[serde(default)]
    pub is_unified_checkout: Option<bool>,
    /// Options this build does not recognize, passed through untouched.
    #[serde(flatten)]
    pub extra: Parameters,
}

impl Configuration {
    /// Looks up an option this build does not model explicitly.
    #[must_use]
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Fills in `returnUrl` from the page location when none was given.
    pub fn apply_location_defaults(&mut self, location: &Location) {
        if self.return_url.as_deref().is_none_or(str::is_empty) {
            self.return_url = Some(location.page_url());
        }
    }
}

/// Default values for an instance of type `kind`.
#[must_use]
pub fn defaults(kind: &str) -> Parameters {
    json!({
        "enableUserIdentifier": false,
        "returnUrl": null,
        "selector": DEFAULT_SELECTOR,
        "theme": "light",
        "useFullWidth": false,
        "useSameWindowForPayment": true,
        "type": kind,
        "version": "v1",
    })
    .as_object()
    .cloned()
    .unwrap_or_default()
}

/// Builds the configuration of instance `name` from its loader queue.
///
/// The first queued call must be `init` and carry a token. Its parameters are
/// merged over [`defaults`], caller values winning per key. A `null` value counts
/// as absent. The viewport policy and
/// locale resolution are applied afterwards. `loader` is left untouched.
///
/// # Errors
///
/// - [`EmbedError::MissingLoader`] when the queue is empty.
/// - [`EmbedError::InitializationOrder`] when the first call is not `init`.
/// - [`EmbedError::MissingToken`] when `init` has no non-empty `token`.
/// - [`EmbedError::InvalidOption`] when a recognized option has an unusable value.
pub fn merge<H>(
    loader: &LoaderObject,
    name: &str,
    kind: &str,
    host: &H,
) -> Result<Configuration, EmbedError>
where
    H: Host + ?Sized,
{
    let first = loader
        .q
        .as_deref()
        .and_then(<[_]>::first)
        .ok_or_else(|| EmbedError::MissingLoader {
            name: name.to_owned(),
        })?;

    if first.method != INIT_METHOD {
        return Err(EmbedError::InitializationOrder {
            name: name.to_owned(),
            expected: INIT_METHOD,
            found: first.method.clone(),
        });
    }

    let has_token = first
        .parameters
        .get("token")
        .and_then(Value::as_str)
        .is_some_and(|token| !token.is_empty());
    if !has_token {
        return Err(EmbedError::MissingToken {
            name: name.to_owned(),
        });
    }

    let mut merged = defaults(kind);
    // `null` leaves the default in place.
    merged.extend(
        first
            .parameters
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| (key.clone(), value.clone())),
    );

    let mut config: Configuration =
        serde_json::from_value(Value::Object(merged)).map_err(|error| {
            EmbedError::InvalidOption {
                name: name.to_owned(),
                reason: error.to_string(),
            }
        })?;

    config.use_full_width = full_width_option(config.use_full_width, host.viewport_width());
    config.locale = resolve_locale(config.locale.take(), &host.navigator());

    Ok(config)
}

/// Narrow viewports cannot lay out a widget that is not full width.
#[must_use]
pub fn full_width_option(requested: bool, viewport_width: f64) -> bool {
    if viewport_width < FULL_WIDTH_BREAKPOINT {
        false
    } else {
        requested
    }
}

/// Picks the configured locale, then `navigator.language`, then `navigator.userLanguage`.
#[must_use]
pub fn resolve_locale(configured: Option<String>, navigator: &Navigator) -> Option<String> {
    [
        configured,
        navigator.language.clone(),
        navigator.user_language.clone(),
    ]
    .into_iter()
    .flatten()
    .find(|locale| !locale.is_empty())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{host::MemoryHost, loader::MethodCall};

    fn init(parameters: Value) -> LoaderObject {
        let Value::Object(parameters) = parameters else {
            panic!("parameters must be an object");
        };
        LoaderObject::with_queue(vec![MethodCall::new(INIT_METHOD, parameters)])
    }

    fn desktop() -> MemoryHost {
        MemoryHost::new().with_viewport_width(1280.0)
    }

    #[test]
    fn caller_values_win_over_defaults() {
        let loader = init(json!({ "token": "t", "theme": "dark" }));
        let config = merge(&loader, "w", "fiat-to-coin", &desktop()).expect("valid init");

        assert_eq!(config.theme, Theme::Dark);
        assert!(!config.use_full_width);
        assert_eq!(config.selector, DEFAULT_SELECTOR);
        assert_eq!(config.kind, "fiat-to-coin");
        assert_eq!(config.version, Version::V1);
        assert!(config.use_same_window_for_payment);
    }

    #[test]
    fn narrow_viewport_forces_full_width_off() {
        let loader = init(json!({ "token": "t", "useFullWidth": true }));

        let narrow = MemoryHost::new().with_viewport_width(800.0);
        let config = merge(&loader, "w", "fiat-to-coin", &narrow).expect("valid init");
        assert!(!config.use_full_width);

        let wide = MemoryHost::new().with_viewport_width(1200.0);
        let config = merge(&loader, "w", "fiat-to-coin", &wide).expect("valid init");
        assert!(config.use_full_width);
    }

    #[test]
    fn null_options_fall_back_to_defaults() {
        let loader = init(json!({
            "token": "t",
            "theme": null,
            "debug": null,
            "selector": null,
            "useSameWindowForPayment": null,
            "hideFooter": null,
        }));
        let config = merge(&loader, "w", "fiat-to-coin", &desktop()).expect("nulls are absent");

        assert_eq!(config.theme, Theme::Light);
        assert!(!config.debug);
        assert_eq!(config.selector, DEFAULT_SELECTOR);
        assert!(config.use_same_window_for_payment);
        assert_eq!(config.hide_footer, None);
        assert!(config.option("theme").is_none());
    }

    #[test]
    fn breakpoint_itself_keeps_the_request() {
        assert!(full_width_option(true, FULL_WIDTH_BREAKPOINT));
        assert!(!full_width_option(true, FULL_WIDTH_BREAKPOINT - 1.0));
    }

    #[test]
    fn init_without_token_is_rejected() {
        let loader = init(json!({ "selector": "#x" }));
        let error = merge(&loader, "w", "fiat-to-coin", &desktop()).expect_err("no token");
        assert!(matches!(error, EmbedError::MissingToken { .. }));

        let loader = init(json!({ "token": "" }));
        let error = merge(&loader, "w", "fiat-to-coin", &desktop()).expect_err("empty token");
        assert!(matches!(error, EmbedError::MissingToken { .. }));
    }

    #[test]
    fn init_must_come_first() {
        let loader = LoaderObject::with_queue(vec![
            MethodCall::bare("my-widget-call"),
            MethodCall::new(INIT_METHOD, Parameters::new()),
        ]);
        let error = merge(&loader, "w", "fiat-to-coin", &desktop()).expect_err("wrong order");
        assert!(matches!(
            error,
            EmbedError::InitializationOrder { ref found, .. } if found == "my-widget-call"
        ));
    }

    #[test]
    fn unknown_options_pass_through() {
        let loader = init(json!({ "token": "t", "brandColour": "#ff0000", "hideFooter": true }));
        let config = merge(&loader, "w", "fiat-to-coin", &desktop()).expect("valid init");

        assert_eq!(config.option("brandColour"), Some(&json!("#ff0000")));
        assert_eq!(config.hide_footer, Some(true));
        assert!(config.option("hideFooter").is_none());
    }

    #[test]
    fn unsupported_theme_is_an_invalid_option() {
        let loader = init(json!({ "token": "t", "theme": "blue" }));
        let error = merge(&loader, "w", "fiat-to-coin", &desktop()).expect_err("bad theme");
        assert!(matches!(error, EmbedError::InvalidOption { .. }));
    }

    #[test]
    fn merge_leaves_the_loader_alone() {
        let loader = init(json!({ "token": "t" }));
        let before = loader.clone();
        merge(&loader, "w", "fiat-to-coin", &desktop()).expect("valid init");
        assert_eq!(loader, before);
    }

    #[test]
    fn locale_falls_back_through_the_navigator() {
        let navigator = Navigator {
            language: Some("nl-NL".into()),
            user_language: Some("de".into()),
        };
        assert_eq!(
            resolve_locale(Some("fr".into()), &navigator).as_deref(),
            Some("fr")
        );
        assert_eq!(resolve_locale(None, &navigator).as_deref(), Some("nl-NL"));

        let legacy = Navigator {
            language: Some(String::new()),
            user_language: Some("de".into()),
        };
        assert_eq!(resolve_locale(None, &legacy).as_deref(), Some("de"));
        assert_eq!(resolve_locale(None, &Navigator::default()), None);
    }

    #[test]
    fn return_url_defaults_to_the_page() {
        let loader = init(json!({ "token": "t" }));
        let mut config = merge(&loader, "w", "fiat-to-coin", &desktop()).expect("valid init");
        config.apply_location_defaults(&Location::new("https://shop.example", "/buy"));
        assert_eq!(config.return_url.as_deref(), Some("https://shop.example/buy"));

        let loader = init(json!({ "token": "t", "returnUrl": "https://shop.example/done" }));
        let mut config = merge(&loader, "w", "fiat-to-coin", &desktop()).expect("valid init");
        config.apply_location_defaults(&Location::new("https://shop.example", "/buy"));
        assert_eq!(config.return_url.as_deref(), Some("https://shop.example/done"));
    }
}
