//! Structural equality between wanted and defined services.
use super::model::{HOST_KEY, TYPE_KEY};
use super::properties::Properties;

/// Keys that identify a service but are not compared.
const IDENTITY_KEYS: [&str; 2] = [HOST_KEY, TYPE_KEY];

/// Whether two property sets describe the same service.
///
/// `host` and `type` are ignored on both sides; every other key must be
/// present on both sides with an identical value. The relation is
/// symmetric, so argument order does not matter.
///
/// # Examples
///
/// ```
/// use layout_cli::layout::matcher::matches;
/// use layout_cli::layout::properties::derive;
///
/// let defined = derive(["host=pool1", "path=/data1"]);
/// let wanted = derive(["host=pool2", "type=pool", "path=/data1"]);
/// assert!(matches(&wanted, &defined));
/// ```
#[must_use]
pub fn matches(wanted: &Properties, defined: &Properties) -> bool {
    let compared = |props: &Properties| {
        props
            .iter()
            .filter(|(key, _)| !IDENTITY_KEYS.contains(&key.as_str()))
            .count()
    };
    compared(wanted) == compared(defined)
        && wanted
            .iter()
            .filter(|(key, _)| !IDENTITY_KEYS.contains(&key.as_str()))
            .all(|(key, value)| defined.get(key) == Some(value))
}
