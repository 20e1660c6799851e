//! Small extractors for the ad hoc text the collaborators print.
//!
//! Every function returns `None` (or an empty collection) when the input
//! does not have the expected shape; callers decide what that means for
//! a finding's severity.

use regex::Regex;
use std::sync::OnceLock;

fn labeled_count_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bcount\b[^0-9\n]*?[:=]\s*(\d+)").unwrap())
}

fn bare_count_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*(\d+)\s*$").unwrap())
}

/// Extract a device count from CLI output.
///
/// A labeled value (`Device count: 4`, `count=4`) wins over a line holding
/// only an integer.
pub fn device_count(text: &str) -> Option<u32> {
    [labeled_count_re(), bare_count_re()]
        .iter()
        .find_map(|re| re.captures(text)?.get(1)?.as_str().parse().ok())
}

/// Value of the first `Label: value` line whose trimmed start is `label`.
/// Matching is case-sensitive on the label; the value is trimmed and an
/// empty value counts as absent.
pub fn labeled_value(text: &str, label: &str) -> Option<String> {
    text.lines().find_map(|line| {
        let rest = line.trim_start().strip_prefix(label)?;
        let value = rest.trim_start().strip_prefix(':')?.trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}

/// First whitespace-separated token of every non-empty line.
pub fn first_tokens(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|l| l.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// Human-readable OS name from an `os-release` file: `PRETTY_NAME`, else
/// `NAME`, with surrounding quotes removed.
pub fn os_release_name(text: &str) -> Option<String> {
    let lookup = |key: &str| {
        text.lines().find_map(|line| {
            let (k, v) = line.split_once('=')?;
            if k.trim() != key {
                return None;
            }
            let v = v.trim().trim_matches(|c| c == '"' || c == '\'');
            (!v.is_empty()).then(|| v.to_string())
        })
    };
    lookup("PRETTY_NAME").or_else(|| lookup("NAME"))
}

/// Non-empty trimmed lines.
pub fn non_empty_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_count_labeled() {
        assert_eq!(device_count("Total device count: 4\n"), Some(4));
        assert_eq!(device_count("count=2"), Some(2));
        assert_eq!(device_count("NPU Count : 8 devices"), Some(8));
    }

    #[test]
    fn test_device_count_labeled_wins_over_bare() {
        assert_eq!(device_count("3\nDevice count: 1\n"), Some(1));
    }

    #[test]
    fn test_device_count_bare_integer() {
        assert_eq!(device_count("  2  \n"), Some(2));
        assert_eq!(device_count("header\n0\n"), Some(0));
    }

    #[test]
    fn test_device_count_unparseable() {
        assert_eq!(device_count(""), None);
        assert_eq!(device_count("no devices here"), None);
        assert_eq!(device_count("version 1.2.3"), None);
    }

    #[test]
    fn test_labeled_value_trims_and_matches_prefix() {
        let text = "Device 0\n  Target:  ATOM \n  BDF: 0000:3b:00.0\nComputable: true\n";
        assert_eq!(labeled_value(text, "Target").as_deref(), Some("ATOM"));
        assert_eq!(labeled_value(text, "BDF").as_deref(), Some("0000:3b:00.0"));
        assert_eq!(labeled_value(text, "Computable").as_deref(), Some("true"));
        assert_eq!(labeled_value(text, "Serial"), None);
    }

    #[test]
    fn test_labeled_value_empty_value_is_absent() {
        assert_eq!(labeled_value("Target:   \n", "Target"), None);
        assert_eq!(labeled_value("TargetName: x\n", "Target"), None);
    }

    #[test]
    fn test_first_tokens_of_module_list() {
        let text = "rebellions 262144 0 - Live 0x0\ncxl_acpi 20480 0 - Live 0x0\n\n";
        assert_eq!(first_tokens(text), vec!["rebellions", "cxl_acpi"]);
    }

    #[test]
    fn test_os_release_name() {
        let text = "NAME=\"Ubuntu\"\nPRETTY_NAME=\"Ubuntu 22.04.4 LTS\"\n";
        assert_eq!(os_release_name(text).as_deref(), Some("Ubuntu 22.04.4 LTS"));
        assert_eq!(os_release_name("NAME=Fedora\n").as_deref(), Some("Fedora"));
        assert_eq!(os_release_name("ID=x\n"), None);
    }
}
