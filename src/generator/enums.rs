//! Enumeration groups and top-level constants.

use super::naming::{rewrite_long_literals, EnumNaming};
use crate::core::{EnumConstant, EnumGroup, EnumValue, ExtensionFilter};

/// Value of every `_MAX_ENUM` sentinel.
const MAX_ENUM: &str = "0x7FFFFFFF";

/// Smallest and largest core member of a plain enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueRange<'a> {
    pub min: (&'a str, i64),
    pub max: (&'a str, i64),
}

/// Find the bounds of the core members of a group.
///
/// Members added by `extends` and aliases carry no range. Ties keep the
/// first member in declaration order.
pub fn value_range(group: &EnumGroup) -> Option<ValueRange<'_>> {
    let mut range: Option<ValueRange<'_>> = None;

    for value in &group.values {
        let Some(numeric) = value.numeric.filter(|_| !value.extends) else {
            continue;
        };
        let entry = (value.name.as_str(), numeric);
        range = Some(match range {
            None => ValueRange {
                min: entry,
                max: entry,
            },
            Some(mut r) => {
                if numeric < r.min.1 {
                    r.min = entry;
                } else if numeric > r.max.1 {
                    r.max = entry;
                }
                r
            }
        });
    }

    range
}

/// A generated enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupDeclaration {
    /// The `enum` declaration and its flat alias block
    pub text: String,

    /// Members written into the declaration, sentinels excluded
    pub members: Vec<String>,
}

fn is_retained(value: &EnumValue, filter: &ExtensionFilter) -> bool {
    value
        .extension
        .as_deref()
        .map_or(true, |extension| filter.accepts(extension))
}

/// Emit an enumeration group with its sentinels and flat alias block.
pub fn emit_group(group: &EnumGroup, filter: &ExtensionFilter, name_prefix: &str) -> GroupDeclaration {
    let naming = EnumNaming::for_group(&group.name);

    let mut text = if group.bitwidth == 64 {
        format!("\nenum {} : ulong {{\n", group.name)
    } else {
        format!("\nenum {} {{\n", group.name)
    };
    let mut flat = format!("\n\nversion( {}GlobalEnums ) {{\n", name_prefix);
    let mut members = Vec::new();

    let mut push = |text: &mut String, name: &str, value: &str| {
        text.push_str(&format!("\t{} = {},\n", name, value));
        flat.push_str(&format!("\tenum {0} = {1}.{0};\n", name, group.name));
    };

    for value in group.values.iter().filter(|v| is_retained(v, filter)) {
        push(&mut text, &value.name, &rewrite_long_literals(&value.value));
        members.push(value.name.clone());
    }

    if naming.is_plain_enum() {
        match value_range(group) {
            Some(range) => {
                let (min, max) = (range.min.0, range.max.0);
                push(&mut text, &naming.sentinel("BEGIN_RANGE"), min);
                push(&mut text, &naming.sentinel("END_RANGE"), max);
                push(
                    &mut text,
                    &naming.sentinel("RANGE_SIZE"),
                    &format!("({} - {} + 1)", max, min),
                );
            }
            None => tracing::debug!("`{}` has no core values, skipping range sentinels", group.name),
        }
    }

    let max_enum = naming.sentinel("MAX_ENUM");
    text.push_str(&format!("\t{} = {}\n}}", max_enum, MAX_ENUM));
    flat.push_str(&format!("\tenum {0} = {1}.{0};\n}}", max_enum, group.name));
    text.push_str(&flat);

    GroupDeclaration { text, members }
}

/// Emit a top-level constant.
pub fn emit_constant(constant: &EnumConstant) -> String {
    format!(
        "enum {} = {};",
        constant.name,
        rewrite_long_literals(&constant.value)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GroupKind;
    use crate::test_support::result_group;

    #[test]
    fn test_range_over_core_values() {
        let group = result_group();
        let range = value_range(&group).unwrap();

        assert_eq!(range.min, ("VK_ERROR_INITIALIZATION_FAILED", -3));
        assert_eq!(range.max, ("VK_NOT_READY", 1));
    }

    #[test]
    fn test_plain_enum_sentinels() {
        let out = emit_group(&result_group(), &ExtensionFilter::all(), "DVulkan");

        assert!(out.text.starts_with("\nenum VkResult {\n\tVK_SUCCESS = 0,\n"));
        assert!(out.text.contains("\tVK_RESULT_BEGIN_RANGE = VK_ERROR_INITIALIZATION_FAILED,\n"));
        assert!(out.text.contains("\tVK_RESULT_END_RANGE = VK_NOT_READY,\n"));
        assert!(out
            .text
            .contains("\tVK_RESULT_RANGE_SIZE = (VK_NOT_READY - VK_ERROR_INITIALIZATION_FAILED + 1),\n"));
        assert!(out.text.contains("\tVK_RESULT_MAX_ENUM = 0x7FFFFFFF\n}"));
        assert!(out.text.contains("version( DVulkanGlobalEnums ) {\n\tenum VK_SUCCESS = VkResult.VK_SUCCESS;\n"));
        assert!(out.text.ends_with("\tenum VK_RESULT_MAX_ENUM = VkResult.VK_RESULT_MAX_ENUM;\n}"));
    }

    #[test]
    fn test_extension_values_follow_filter() {
        let filter = ExtensionFilter::new("VK_VERSION_.*", None).unwrap();
        let out = emit_group(&result_group(), &filter, "DVulkan");

        assert!(!out.members.iter().any(|m| m == "VK_ERROR_SURFACE_LOST_KHR"));
        assert!(out.members.iter().any(|m| m == "VK_ERROR_INITIALIZATION_FAILED"));

        let out = emit_group(&result_group(), &ExtensionFilter::all(), "DVulkan");
        assert!(out.text.contains("\tVK_ERROR_SURFACE_LOST_KHR = -1000000000,\n"));
    }

    #[test]
    fn test_flag_bits_have_no_range() {
        let group = EnumGroup::new("VkQueueFlagBits", GroupKind::Bitmask)
            .with_value(EnumValue::new("VK_QUEUE_GRAPHICS_BIT", "0x00000001", Some(1)))
            .with_value(EnumValue::new("VK_QUEUE_COMPUTE_BIT", "0x00000002", Some(2)));
        let out = emit_group(&group, &ExtensionFilter::all(), "DVulkan");

        assert!(!out.text.contains("RANGE"));
        assert!(out.text.contains("\tVK_QUEUE_FLAG_BITS_MAX_ENUM = 0x7FFFFFFF\n}"));
    }

    #[test]
    fn test_vendor_suffix_and_aliases() {
        let group = EnumGroup::new("VkColorSpaceKHR", GroupKind::Enum)
            .with_value(EnumValue::new("VK_COLOR_SPACE_SRGB_NONLINEAR_KHR", "0", Some(0)))
            .with_value(EnumValue::new(
                "VK_COLORSPACE_SRGB_NONLINEAR_KHR",
                "VK_COLOR_SPACE_SRGB_NONLINEAR_KHR",
                None,
            ));
        let out = emit_group(&group, &ExtensionFilter::all(), "DVulkan");

        assert!(out
            .text
            .contains("\tVK_COLORSPACE_SRGB_NONLINEAR_KHR = VK_COLOR_SPACE_SRGB_NONLINEAR_KHR,\n"));
        assert!(out
            .text
            .contains("\tVK_COLOR_SPACE_RANGE_SIZE_KHR = (VK_COLOR_SPACE_SRGB_NONLINEAR_KHR - VK_COLOR_SPACE_SRGB_NONLINEAR_KHR + 1),\n"));
    }

    #[test]
    fn test_group_without_core_values() {
        let group = EnumGroup::new("VkVendorId", GroupKind::Enum).with_value(
            EnumValue::new("VK_VENDOR_ID_VIV", "0x10001", Some(0x10001))
                .extended_by(Some("VK_EXT_vendor".to_string())),
        );
        let out = emit_group(&group, &ExtensionFilter::all(), "DVulkan");

        assert!(!out.text.contains("RANGE"));
        assert!(out.text.contains("\tVK_VENDOR_ID_MAX_ENUM = 0x7FFFFFFF\n}"));
    }

    #[test]
    fn test_64_bit_flags() {
        let mut group = EnumGroup::new("VkAccessFlagBits2", GroupKind::Bitmask)
            .with_value(EnumValue::new("VK_ACCESS_2_SHADER_BINDING_TABLE_READ_BIT_KHR", "0x10000000000ULL", None));
        group.bitwidth = 64;
        let out = emit_group(&group, &ExtensionFilter::all(), "DVulkan");

        assert!(out.text.starts_with("\nenum VkAccessFlagBits2 : ulong {\n"));
        assert!(out.text.contains("= 0x10000000000UL,\n"));
    }

    #[test]
    fn test_constants() {
        let constant = EnumConstant {
            name: "VK_WHOLE_SIZE".to_string(),
            value: "(~0ULL)".to_string(),
        };
        assert_eq!(emit_constant(&constant), "enum VK_WHOLE_SIZE = (~0UL);");

        let constant = EnumConstant {
            name: "VK_UUID_SIZE".to_string(),
            value: "16".to_string(),
        };
        assert_eq!(emit_constant(&constant), "enum VK_UUID_SIZE = 16;");
    }
}
