//! Controller layouts bundled with the library.
//!
//! These are embedded at compile time and always available, so a fresh
//! install can be played from either controller without any files on disk.

use crate::ControllerLayout;

/// Factory layout names, in listing order.
pub static FACTORY_LAYOUT_NAMES: &[&str] = &["nanokontrol", "remote61"];

static FACTORY_LAYOUTS_TOML: &[(&str, &str)] = &[
    ("nanokontrol", include_str!("../layouts/nanokontrol.toml")),
    ("remote61", include_str!("../layouts/remote61.toml")),
];

/// All factory layouts.
///
/// Layouts that fail to parse are skipped; the tests keep that from
/// happening.
pub fn factory_layouts() -> Vec<ControllerLayout> {
    FACTORY_LAYOUTS_TOML
        .iter()
        .filter_map(|(_, toml)| ControllerLayout::from_toml(toml).ok())
        .collect()
}

/// A factory layout by name (case-insensitive).
///
/// ```rust
/// use sinefold_config::get_factory_layout;
///
/// let layout = get_factory_layout("nanokontrol").unwrap();
/// assert_eq!(layout.name, "nanoKONTROL");
/// ```
pub fn get_factory_layout(name: &str) -> Option<ControllerLayout> {
    let name = name.to_lowercase();
    FACTORY_LAYOUTS_TOML
        .iter()
        .find(|(key, _)| *key == name)
        .and_then(|(_, toml)| ControllerLayout::from_toml(toml).ok())
}

/// Names of all factory layouts.
pub fn factory_layout_names() -> Vec<&'static str> {
    FACTORY_LAYOUT_NAMES.to_vec()
}

/// Whether `name` is a factory layout (case-insensitive).
pub fn is_factory_layout(name: &str) -> bool {
    let name = name.to_lowercase();
    FACTORY_LAYOUT_NAMES.iter().any(|n| *n == name)
}
