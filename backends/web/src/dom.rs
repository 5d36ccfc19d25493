use web_sys::HtmlElement;

use crate::error::WebError;

/// Units that make an inline `height` explicit.
const EXPLICIT_HEIGHT_UNITS: [&str; 6] = ["px", "em", "vm", "vh", "vw", "%"];

/// Returns `true` when an inline `height` value carries an explicit unit.
#[must_use]
pub fn has_explicit_height(height: &str) -> bool {
    EXPLICIT_HEIGHT_UNITS
        .iter()
        .any(|unit| height.contains(unit))
}

/// Gives the mount element `height: 100%` unless it already has an explicit height.
pub fn ensure_explicit_height(element: &HtmlElement) -> Result<(), WebError> {
    let style = element.style();
    let height = style.get_property_value("height")?;
    if !has_explicit_height(&height) {
        style.set_property("height", "100%")?;
    }
    Ok(())
}

/// Tags the mount element with the widget class and theme.
pub fn prepare_mount_target(
    element: &HtmlElement,
    class_name: &str,
    theme: &str,
) -> Result<(), WebError> {
    element.class_list().add_1(class_name)?;
    element.set_attribute("data-theme", theme)?;
    Ok(())
}
