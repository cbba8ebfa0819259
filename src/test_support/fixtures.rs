//! Test fixtures for common test scenarios.

use crate::core::{Aggregate, Command, EnumGroup, EnumValue, GroupKind, Member};
use crate::registry::Registry;

/// Trimmed registry with two core versions and a handful of extensions.
pub const FIXTURE_REGISTRY: &str = include_str!("../../tests/fixtures/vk.xml");

/// Load the fixture registry for the `vulkan` API.
pub fn fixture_registry() -> Registry {
    Registry::from_reader(FIXTURE_REGISTRY.as_bytes(), "vulkan").expect("fixture registry loads")
}

/// `VkApplicationInfo` as resolved by the registry.
pub fn application_info() -> Aggregate {
    Aggregate::new("VkApplicationInfo")
        .with_member(
            Member::new("VkStructureType", "sType").with_values("VK_STRUCTURE_TYPE_APPLICATION_INFO"),
        )
        .with_member(Member::new("const void*", "pNext"))
        .with_member(Member::new("const char*", "pApplicationName"))
        .with_member(Member::new("uint32_t", "applicationVersion"))
        .with_member(Member::new("const char*", "pEngineName"))
        .with_member(Member::new("uint32_t", "engineVersion"))
        .with_member(Member::new("uint32_t", "apiVersion"))
}

/// `VkResult` with core values and one extension value.
pub fn result_group() -> EnumGroup {
    EnumGroup::new("VkResult", GroupKind::Enum)
        .with_value(EnumValue::new("VK_SUCCESS", "0", Some(0)))
        .with_value(EnumValue::new("VK_NOT_READY", "1", Some(1)))
        .with_value(EnumValue::new("VK_ERROR_OUT_OF_HOST_MEMORY", "-1", Some(-1)))
        .with_value(EnumValue::new("VK_ERROR_INITIALIZATION_FAILED", "-3", Some(-3)))
        .with_value(
            EnumValue::new("VK_ERROR_SURFACE_LOST_KHR", "-1000000000", Some(-1_000_000_000))
                .extended_by(Some("VK_KHR_surface".to_string())),
        )
}

/// Build a command from `(type, name)` parameter pairs.
pub fn command(name: &str, return_type: &str, params: &[(&str, &str)]) -> Command {
    params
        .iter()
        .fold(Command::new(name, return_type), |cmd, (ty, param)| {
            cmd.with_param(Member::new(*ty, *param))
        })
}

/// Member lines of an emitted struct body.
pub fn struct_lines(text: &str) -> Vec<&str> {
    text.lines().filter(|line| line.starts_with('\t')).collect()
}
