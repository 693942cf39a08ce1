// Store key derivation from document paths

pub const SEPARATOR: char = '/';

/// Drop exactly one leading separator, if present.
pub fn strip_separator(s: &str) -> &str {
    s.strip_prefix(SEPARATOR).unwrap_or(s)
}

/// A node's own key: the explicit override if given, else its document path,
/// in both cases without the leading separator.
pub fn node_key(path: &str, key: Option<&str>) -> String {
    strip_separator(key.unwrap_or(path)).to_string()
}

/// Full key of a node under `prefix`. Either side may be empty.
pub fn join_key(prefix: &str, key: &str) -> String {
    let prefix = strip_separator(prefix);
    match (prefix.is_empty(), key.is_empty()) {
        (true, _) => key.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{prefix}{SEPARATOR}{key}"),
    }
}

/// Key prefix of list element `index`.
pub fn element_key(list_key: &str, index: usize) -> String {
    format!("{list_key}{SEPARATOR}{index}")
}

/// Key of a list's persisted length.
pub fn length_key(list_key: &str) -> String {
    format!("{list_key}{SEPARATOR}len")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_one_leading_separator() {
        assert_eq!(strip_separator("/num"), "num");
        assert_eq!(strip_separator("//num"), "/num");
        assert_eq!(strip_separator("num"), "num");
        assert_eq!(strip_separator(""), "");
    }

    #[test]
    fn override_wins_over_path() {
        assert_eq!(node_key("/numInt", None), "numInt");
        assert_eq!(node_key("/objList", Some("/ol")), "ol");
        assert_eq!(node_key("/objList", Some("ol")), "ol");
        assert_eq!(node_key("", None), "");
    }

    #[test]
    fn join_handles_empty_sides() {
        assert_eq!(join_key("", "num"), "num");
        assert_eq!(join_key("ol/0", ""), "ol/0");
        assert_eq!(join_key("ol/0", "ids"), "ol/0/ids");
        assert_eq!(join_key("/ol/0", "ids"), "ol/0/ids");
    }

    #[test]
    fn list_keys() {
        assert_eq!(element_key("numList", 0), "numList/0");
        assert_eq!(element_key("numList", 12), "numList/12");
        assert_eq!(length_key("ol/0/ids"), "ol/0/ids/len");
    }
}
