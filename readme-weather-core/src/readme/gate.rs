/// Environment variable forcing a rewrite when set to exactly `true`.
pub const FORCE_UPDATE_ENV: &str = "FORCE_UPDATE";

/// Environment variable set by CI runners. Informational only.
pub const CI_ENV: &str = "CI";

/// Only the exact literal `"true"` activates the override.
pub fn force_override(value: Option<&str>) -> bool {
    value == Some("true")
}

/// Write when the content changed, or unconditionally when forced.
pub fn should_write(old: &str, new: &str, force: bool) -> bool {
    force || new != old
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_content_is_skipped() {
        assert!(!should_write("same", "same", false));
    }

    #[test]
    fn changed_content_is_written() {
        assert!(should_write("old", "new", false));
    }

    #[test]
    fn force_writes_identical_content() {
        assert!(should_write("same", "same", true));
        assert!(should_write("old", "new", true));
    }

    #[test]
    fn only_literal_true_forces() {
        assert!(force_override(Some("true")));
        for value in [None, Some(""), Some("1"), Some("TRUE"), Some("True"), Some(" true")] {
            assert!(!force_override(value), "{value:?}");
        }
    }
}
