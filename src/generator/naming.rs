//! Naming conventions of generated identifiers.

use std::sync::LazyLock;

use regex::Regex;

static RE_CAMEL_CASE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([a-z])([A-Z])").unwrap());

static RE_ENUM_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9a-z_])([A-Z0-9][^A-Z0-9]?)").unwrap());

static RE_VENDOR_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Z][A-Z]+$").unwrap());

static RE_LONG_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"((?:0[xX][0-9A-Fa-f]+)|[0-9]+)ULL").unwrap());

/// Prefix of every `VkStructureType` enumerant.
pub const STRUCTURE_TYPE_PREFIX: &str = "VK_STRUCTURE_TYPE_";

/// Structs whose structure type does not follow the camel-case rule.
const STRUCTURE_TYPE_OVERRIDES: &[(&str, &str)] = &[(
    "VkWin32SurfaceCreateInfoKHR",
    "VK_STRUCTURE_TYPE_WIN32_SURFACE_CREATE_INFO_KHR",
)];

/// Look up the structure type override of a struct.
pub fn structure_type_override(name: &str) -> Option<&'static str> {
    STRUCTURE_TYPE_OVERRIDES
        .iter()
        .find(|(structure, _)| *structure == name)
        .map(|(_, token)| *token)
}

/// Derive the `VkStructureType` enumerant of a struct from its name.
///
/// `VkApplicationInfo` gives `VK_STRUCTURE_TYPE_APPLICATION_INFO`.
pub fn derive_structure_type(name: &str) -> String {
    let mid = name.strip_prefix("Vk").unwrap_or(name);
    let words = RE_CAMEL_CASE.replace_all(mid, "${1}_${2}");
    format!("{}{}", STRUCTURE_TYPE_PREFIX, words.to_uppercase())
}

/// Sentinel naming of an enumeration group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumNaming {
    /// Upper-case prefix, e.g. `VK_COLOR_SPACE`
    pub prefix: String,

    /// Vendor suffix including its separator, e.g. `_KHR`, or empty
    pub suffix: String,
}

impl EnumNaming {
    /// Derive sentinel naming from a group name.
    pub fn for_group(group: &str) -> Self {
        let expanded = RE_ENUM_WORD.replace_all(group, "${1}_${2}").to_uppercase();

        match RE_VENDOR_SUFFIX.find(group) {
            Some(vendor) => {
                let suffix = format!("_{}", vendor.as_str());
                let prefix = expanded
                    .rsplit_once(&suffix)
                    .map_or(expanded.as_str(), |(prefix, _)| prefix)
                    .to_string();
                EnumNaming { prefix, suffix }
            }
            None => EnumNaming {
                prefix: expanded,
                suffix: String::new(),
            },
        }
    }

    /// Whether the group is a plain enumeration rather than flag bits.
    pub fn is_plain_enum(&self) -> bool {
        !self.prefix.contains("FLAG_BITS")
    }

    /// Build a sentinel name such as `VK_RESULT_MAX_ENUM`.
    pub fn sentinel(&self, tag: &str) -> String {
        format!("{}_{}{}", self.prefix, tag, self.suffix)
    }
}

/// Rewrite C `ULL` literal suffixes to D `UL`.
pub fn rewrite_long_literals(value: &str) -> String {
    RE_LONG_LITERAL.replace_all(value, "${1}UL").into_owned()
}
