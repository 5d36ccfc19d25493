//! Finding the `<script>` element that loaded this bundle and naming the instance.
//!
//! A page may embed several widget types at once, each through its own snippet and
//! `<script data-btcdirect>` element. With more than one marker on the page, the
//! element is picked by matching the widget type against the start of the script's
//! file name, e.g. type `fiat-to-coin` matches `https://cdn.example/fiat-to-coin.js`.
//! This is a heuristic: nothing else ties a snippet to the bundle it loads.

use crate::{
    error::EmbedError,
    host::{Host, ScriptMarker},
    namespace::Namespace,
};

/// Dataset key of the marker attribute (`data-btcdirect`).
pub const MARKER_DATASET_KEY: &str = "btcdirect";

/// CSS selector matching every marker element.
pub const MARKER_SELECTOR: &str = "script[data-btcdirect]";

/// Resolves the name of the instance of type `kind` being loaded.
///
/// A single marker is taken as is, without looking at its source. This also covers
/// development servers, whose script URLs do not carry the widget type.
///
/// # Errors
///
/// - [`EmbedError::MissingMarker`] when the page has no marker element.
/// - [`EmbedError::AmbiguousInstance`] when several markers exist and none loads `kind`.
/// - [`EmbedError::UnresolvableName`] when the element has no marker value and no id.
/// - [`EmbedError::DuplicateLoad`] when an instance with that name is already loaded.
pub fn resolve<H>(kind: &str, host: &H) -> Result<String, EmbedError>
where
    H: Host + ?Sized,
{
    let scripts = host.script_markers();

    let script = match scripts.as_slice() {
        [] => {
            return Err(EmbedError::MissingMarker {
                attribute: MARKER_DATASET_KEY,
            });
        }
        [only] => only,
        many => many
            .iter()
            .find(|script| matches_kind(&script.src, kind))
            .ok_or_else(|| EmbedError::AmbiguousInstance {
                kind: kind.to_owned(),
            })?,
    };

    let name = instance_name(script)?;
    ensure_not_loaded(name, host.namespace())
}

/// Returns `true` when the file name in `src` starts with `kind`.
#[must_use]
pub fn matches_kind(src: &str, kind: &str) -> bool {
    let file = src.rsplit_once('/').map_or(src, |(_, file)| file);
    file.starts_with(kind)
}

/// The marker value, or the element id when the marker is empty.
///
/// # Errors
///
/// Returns [`EmbedError::UnresolvableName`] when neither is set.
pub fn instance_name(script: &ScriptMarker) -> Result<&str, EmbedError> {
    [script.marker.as_deref(), script.id.as_deref()]
        .into_iter()
        .flatten()
        .find(|name| !name.is_empty())
        .ok_or(EmbedError::UnresolvableName)
}

fn ensure_not_loaded(name: &str, namespace: &Namespace) -> Result<String, EmbedError> {
    if namespace.is_loaded(name) {
        return Err(EmbedError::DuplicateLoad {
            name: name.to_owned(),
        });
    }
    Ok(name.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;

    const F2C: &str = "https://cdn.example/widgets/fiat-to-coin.js";
    const C2F: &str = "https://cdn.example/widgets/coin-to-fiat.js";

    #[test]
    fn no_marker_is_fatal() {
        let host = MemoryHost::new();
        assert!(matches!(
            resolve("fiat-to-coin", &host),
            Err(EmbedError::MissingMarker { .. })
        ));
    }

    #[test]
    fn single_marker_skips_type_matching() {
        let host = MemoryHost::new()
            .with_script(ScriptMarker::new("http://localhost:5173/src/main.ts").with_marker("dev"));
        assert_eq!(resolve("fiat-to-coin", &host).expect("resolves"), "dev");
    }

    #[test]
    fn several_markers_match_on_file_name() {
        let host = MemoryHost::new()
            .with_script(ScriptMarker::new(C2F).with_id("btcdirect-c2f"))
            .with_script(ScriptMarker::new(F2C).with_id("btcdirect-f2c"));

        assert_eq!(resolve("fiat-to-coin", &host).expect("resolves"), "btcdirect-f2c");
        assert_eq!(resolve("coin-to-fiat", &host).expect("resolves"), "btcdirect-c2f");
        assert!(matches!(
            resolve("checkout", &host),
            Err(EmbedError::AmbiguousInstance { ref kind }) if kind == "checkout"
        ));
    }

    #[test]
    fn marker_value_wins_over_id() {
        let script = ScriptMarker::new(F2C).with_marker("named").with_id("fallback");
        assert_eq!(instance_name(&script).expect("named"), "named");

        let script = ScriptMarker::new(F2C).with_marker("").with_id("fallback");
        assert_eq!(instance_name(&script).expect("id"), "fallback");

        let script = ScriptMarker::new(F2C).with_marker("");
        assert!(matches!(instance_name(&script), Err(EmbedError::UnresolvableName)));
    }

    #[test]
    fn resolving_twice_gives_the_same_name() {
        let host = MemoryHost::new().with_script(ScriptMarker::new(F2C).with_id("btcdirect-f2c"));
        let first = resolve("fiat-to-coin", &host).expect("resolves");
        let second = resolve("fiat-to-coin", &host).expect("resolves");
        assert_eq!(first, second);
    }

    #[test]
    fn latched_names_are_rejected() {
        let host = MemoryHost::new().with_script(ScriptMarker::new(F2C).with_id("btcdirect-f2c"));
        host.namespace().mark_loaded("btcdirect-f2c");
        assert!(matches!(
            resolve("fiat-to-coin", &host),
            Err(EmbedError::DuplicateLoad { ref name }) if name == "btcdirect-f2c"
        ));
    }

    #[test]
    fn file_name_prefix_ignores_directories() {
        assert!(matches_kind(F2C, "fiat-to-coin"));
        assert!(!matches_kind("https://fiat-to-coin.example/app.js", "fiat-to-coin"));
        assert!(matches_kind("fiat-to-coin.js", "fiat-to-coin"));
    }
}
