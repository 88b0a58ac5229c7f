/// String utility functions.
pub struct StringUtil;

impl StringUtil {
    /// Convert a string to a boolean.
    ///
    /// Valid true values: `"1"`, `"true"`, `"yes"` (case-insensitive).
    /// Valid false values: `"0"`, `"false"`, `"no"` (case-insensitive).
    /// Returns `None` for unrecognized values.
    pub fn convert_to_bool(value: &str) -> Option<bool> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        match value.to_lowercase().as_str() {
            "1" | "true" | "yes" => Some(true),
            "0" | "false" | "no" => Some(false),
            _ => None,
        }
    }

    /// Replace every two-character `\n` escape with a real line break.
    ///
    /// Some deployment environments cannot carry literal newlines in a
    /// single configuration value, so PEM material arrives flattened.
    pub fn unescape_newlines(value: &str) -> String {
        value.replace("\\n", "\n")
    }

    /// Join values for display, e.g. `["a", "b"]` becomes `"a, b"`.
    pub fn join_display<T: AsRef<str>>(values: &[T]) -> String {
        values
            .iter()
            .map(|v| v.as_ref())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
