//! Checks for values that end up in output paths and process arguments.

use std::sync::LazyLock;

use regex::Regex;

static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._+-]*$").expect("Invalid label pattern")
});

static LANGUAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]{2,3}([_-][A-Za-z0-9]{2,8})*$").expect("Invalid language pattern")
});

/// A version label is used as a directory name below the publish root.
pub fn is_valid_label(label: &str) -> bool {
    LABEL_RE.is_match(label) && label != "." && label != ".."
}

/// Language codes follow the `ll`, `ll_CC` or `ll-Script` shapes.
pub fn is_valid_language(code: &str) -> bool {
    LANGUAGE_RE.is_match(code)
}

/// A leading dash would be read as an option by the checkout command.
pub fn is_valid_tag(tag: &str) -> bool {
    !tag.trim().is_empty() && !tag.starts_with('-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_labels() {
        for label in ["latest", "2.0", "v1.4.2", "1.x", "stable_old", "3.0-rc1"] {
            assert!(is_valid_label(label), "{label} should be valid");
        }
    }

    #[test]
    fn rejects_labels_that_escape_the_publish_root() {
        for label in ["", "..", "a/b", "../up", "-x", ".hidden", "with space"] {
            assert!(!is_valid_label(label), "{label} should be invalid");
        }
    }

    #[test]
    fn accepts_locale_codes() {
        for code in ["en", "fr", "pt_BR", "zh_CN", "sr-Latn", "fil"] {
            assert!(is_valid_language(code), "{code} should be valid");
        }
    }

    #[test]
    fn rejects_malformed_language_codes() {
        for code in ["", "e", "english", "en/../x", "en US", "12"] {
            assert!(!is_valid_language(code), "{code} should be invalid");
        }
    }

    #[test]
    fn rejects_option_like_tags() {
        assert!(is_valid_tag("v1.0.0"));
        assert!(is_valid_tag("release/2.x"));
        assert!(!is_valid_tag("--orphan"));
        assert!(!is_valid_tag("  "));
    }
}
