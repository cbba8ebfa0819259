//! Name filters for versions and extensions.

use regex::Regex;

/// Compile a user pattern so it must match the whole name.
pub fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})$", pattern))
}

/// Decides which extensions take part in generation.
///
/// An extension is accepted when it matches the `add` pattern and does not
/// match the `remove` pattern.
#[derive(Debug, Clone)]
pub struct ExtensionFilter {
    add: Regex,
    remove: Option<Regex>,
}

impl ExtensionFilter {
    /// Build a filter from `add` and optional `remove` patterns.
    pub fn new(add: &str, remove: Option<&str>) -> Result<Self, regex::Error> {
        let remove = match remove {
            Some(pattern) if !pattern.is_empty() => Some(anchored(pattern)?),
            _ => None,
        };

        Ok(ExtensionFilter {
            add: anchored(add)?,
            remove,
        })
    }

    /// Accept every extension.
    pub fn all() -> Self {
        ExtensionFilter {
            add: Regex::new(".*").expect("static pattern"),
            remove: None,
        }
    }

    /// Check whether an extension is enabled.
    pub fn accepts(&self, name: &str) -> bool {
        if let Some(ref remove) = self.remove {
            if remove.is_match(name) {
                return false;
            }
        }
        self.add.is_match(name)
    }
}

impl Default for ExtensionFilter {
    fn default() -> Self {
        Self::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_all() {
        let filter = ExtensionFilter::all();
        assert!(filter.accepts("VK_KHR_surface"));
        assert!(filter.accepts("VK_EXT_debug_report"));
    }

    #[test]
    fn test_filter_remove_wins() {
        let filter = ExtensionFilter::new("VK_KHR_.*", Some(r"VK_KHR_.*_surface")).unwrap();
        assert!(filter.accepts("VK_KHR_surface"));
        assert!(!filter.accepts("VK_KHR_win32_surface"));
        assert!(!filter.accepts("VK_EXT_debug_report"));
    }

    #[test]
    fn test_filter_is_anchored() {
        let filter = ExtensionFilter::new("VK_KHR_surface", None).unwrap();
        assert!(!filter.accepts("VK_KHR_surface_protected_capabilities"));
    }
}
