//! Assembly of the D function loader.
//!
//! Loader text is built block by block while the registry is walked and
//! written once, after the last block. Device-level commands are loaded from
//! two places (through the instance and through a device), so they are kept
//! as data and rendered once per call site.

use super::commands::{Level, DEVICE_PROC_ADDR};
use super::platform::Guard;
use super::templates;

/// Command resolving every other command, itself provided by the caller.
pub const INSTANCE_PROC_ADDR: &str = "vkGetInstanceProcAddr";

/// Commands loaded before any instance exists.
pub const BOOTSTRAP: [&str; 4] = [
    INSTANCE_PROC_ADDR,
    "vkEnumerateInstanceExtensionProperties",
    "vkEnumerateInstanceLayerProperties",
    "vkCreateInstance",
];

/// Handle through which device-level commands are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcRoot {
    Instance,
    Device,
}

impl ProcRoot {
    fn getter(self) -> &'static str {
        match self {
            ProcRoot::Instance => INSTANCE_PROC_ADDR,
            ProcRoot::Device => DEVICE_PROC_ADDR,
        }
    }

    fn handle(self) -> &'static str {
        match self {
            ProcRoot::Instance => "instance",
            ProcRoot::Device => "device",
        }
    }
}

/// Device-level commands of one block.
#[derive(Debug, Clone)]
struct DeviceGroup {
    block: String,
    guard: Option<String>,
    commands: Vec<String>,
}

/// Accumulated loader text for the whole run.
#[derive(Debug, Default)]
pub struct LoaderAssembler {
    globals: String,
    instance: String,
    device: Vec<DeviceGroup>,
}

fn load_statement(out: &mut String, indent: &str, name: &str, root: ProcRoot) {
    out.push_str(&format!(
        "\n\t\t{indent}{name} = cast(typeof({name})) {getter}({handle}, \"{name}\");",
        getter = root.getter(),
        handle = root.handle(),
    ));
}

/// Write the load statements of device groups for one call site.
fn render_device_groups(groups: &[DeviceGroup], root: ProcRoot) -> String {
    let mut out = String::new();
    for group in groups {
        out.push_str(&format!("\n\n\t\t// {}", group.block));
        let indent = if group.guard.is_some() { "\t" } else { "" };
        if let Some(ref open) = group.guard {
            out.push_str(&format!("\n\t\t{}", open));
        }
        for name in &group.commands {
            load_statement(&mut out, indent, name, root);
        }
        if group.guard.is_some() {
            out.push_str("\n\t\t}");
        }
    }
    out
}

impl LoaderAssembler {
    /// Add the commands of a closed block.
    pub fn add_block(&mut self, block: &str, guard: Option<&Guard>, commands: &[(String, Level)]) {
        if commands.is_empty() {
            return;
        }
        let open = guard.map(Guard::open);
        let indent = if open.is_some() { "\t" } else { "" };

        self.globals.push_str(&format!("\n\n\t// {}", block));
        if let Some(ref open) = open {
            self.globals.push_str(&format!("\n\t{}", open));
        }
        for (name, _) in commands {
            self.globals.push_str(&format!("\n\t{}PFN_{1} {1};", indent, name));
        }
        if open.is_some() {
            self.globals.push_str("\n\t}");
        }

        let instance: Vec<&str> = commands
            .iter()
            .filter(|(name, level)| *level == Level::Instance && !BOOTSTRAP.contains(&name.as_str()))
            .map(|(name, _)| name.as_str())
            .collect();
        if !instance.is_empty() {
            self.instance.push_str(&format!("\n\n\t\t// {}", block));
            if let Some(ref open) = open {
                self.instance.push_str(&format!("\n\t\t{}", open));
            }
            for name in instance {
                load_statement(&mut self.instance, indent, name, ProcRoot::Instance);
            }
            if open.is_some() {
                self.instance.push_str("\n\t\t}");
            }
        }

        let device: Vec<String> = commands
            .iter()
            .filter(|(_, level)| *level == Level::Device)
            .map(|(name, _)| name.clone())
            .collect();
        if !device.is_empty() {
            self.device.push(DeviceGroup {
                block: block.to_string(),
                guard: open,
                commands: device,
            });
        }
    }

    /// Declarations of every command pointer.
    pub fn globals(&self) -> &str {
        &self.globals
    }

    /// Statements loading instance-level commands.
    pub fn instance_statements(&self) -> &str {
        &self.instance
    }

    /// Statements loading device-level commands through `root`.
    pub fn device_statements(&self, root: ProcRoot) -> String {
        render_device_groups(&self.device, root)
    }

    /// Render everything that follows the command aliases in `functions.d`.
    pub fn finish(&self, name: &str) -> String {
        let mut out = String::new();
        out.push_str(&format!("}}\n\n__gshared {{{}\n}}\n\n", self.globals));

        out.push_str(&format!("struct {}Loader {{\n", name));
        out.push_str("\t@disable this();\n\t@disable this(this);\n\n");

        out.push_str(
            "\t/// if not using version \"LoadFromDerelict\" this function must be called first\n\
             \t/// sets vkCreateInstance function pointer and acquires basic functions to retrieve information about the implementation\n",
        );
        out.push_str(&format!(
            "\tstatic void loadGlobalLevelFunctions(typeof({0}) getProcAddr) {{\n\t\t{0} = getProcAddr;\n",
            INSTANCE_PROC_ADDR
        ));
        for command in &BOOTSTRAP[1..] {
            out.push_str(&format!(
                "\t\t{0} = cast(typeof({0})) {1}(null, \"{0}\");\n",
                command, INSTANCE_PROC_ADDR
            ));
        }
        out.push_str("\t}\n\n");

        out.push_str(
            "\t/// with a valid VkInstance call this function to retrieve additional VkInstance, VkPhysicalDevice, ... related functions\n\
             \t/// device-level functions are loaded as well and dispatched through the instance\n",
        );
        out.push_str(&format!(
            "\tstatic void loadInstanceLevelFunctions(VkInstance instance) {{\n\
             \t\tassert({getter} !is null, \"Must call {name}Loader.loadGlobalLevelFunctions before {name}Loader.loadInstanceLevelFunctions\");",
            getter = INSTANCE_PROC_ADDR,
        ));
        out.push_str(&self.instance);
        out.push_str(&self.device_statements(ProcRoot::Instance));
        out.push_str("\n\t}\n\n");

        out.push_str(
            "\t/// with a valid VkDevice call this function to retrieve VkDevice, VkQueue and VkCommandBuffer related functions\n\
             \t/// the functions call directly VkDevice and related resources and must be retrieved once per logical VkDevice\n",
        );
        out.push_str(&format!(
            "\tstatic void loadDeviceLevelFunctions(VkDevice device) {{\n\
             \t\tassert({getter} !is null, \"Must call {name}Loader.loadInstanceLevelFunctions before {name}Loader.loadDeviceLevelFunctions\");",
            getter = DEVICE_PROC_ADDR,
        ));
        out.push_str(&self.device_statements(ProcRoot::Device));
        out.push_str("\n\t}\n}\n\n");

        out.push_str(&templates::derelict_loader(name));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commands(list: &[(&str, Level)]) -> Vec<(String, Level)> {
        list.iter().map(|(n, l)| (n.to_string(), *l)).collect()
    }

    #[test]
    fn test_instance_command_only_in_instance_stream() {
        let mut loader = LoaderAssembler::default();
        loader.add_block(
            "VK_TEST_instance",
            None,
            &commands(&[("vkEnumeratePhysicalDevices", Level::Instance)]),
        );

        assert!(loader
            .instance_statements()
            .contains("vkEnumeratePhysicalDevices = cast(typeof(vkEnumeratePhysicalDevices)) vkGetInstanceProcAddr(instance, \"vkEnumeratePhysicalDevices\");"));
        assert!(loader.device_statements(ProcRoot::Device).is_empty());
        assert!(loader.device_statements(ProcRoot::Instance).is_empty());
        assert!(loader.globals().contains("\n\tPFN_vkEnumeratePhysicalDevices vkEnumeratePhysicalDevices;"));
    }

    #[test]
    fn test_bootstrap_excluded_from_instance_stream() {
        let mut loader = LoaderAssembler::default();
        loader.add_block(
            "VK_VERSION_1_0",
            None,
            &commands(&[
                ("vkGetInstanceProcAddr", Level::Instance),
                ("vkDestroyInstance", Level::Instance),
            ]),
        );

        let instance = loader.instance_statements();
        assert!(!instance.contains("vkGetInstanceProcAddr = "));
        assert!(instance.contains("vkDestroyInstance = cast(typeof(vkDestroyInstance))"));
        assert!(loader.globals().contains("PFN_vkGetInstanceProcAddr vkGetInstanceProcAddr;"));

        let text = loader.finish("DVulkan");
        assert!(text.contains("\t\tvkGetInstanceProcAddr = getProcAddr;\n"));
        assert!(text.contains(
            "\t\tvkCreateInstance = cast(typeof(vkCreateInstance)) vkGetInstanceProcAddr(null, \"vkCreateInstance\");\n"
        ));
    }

    #[test]
    fn test_bootstrap_only_block_has_no_instance_section() {
        let mut loader = LoaderAssembler::default();
        loader.add_block(
            "VK_VERSION_1_0",
            None,
            &commands(&[("vkCreateInstance", Level::Instance)]),
        );
        assert!(loader.instance_statements().is_empty());
    }

    #[test]
    fn test_device_groups_render_per_root() {
        let mut loader = LoaderAssembler::default();
        loader.add_block(
            "VK_VERSION_1_0",
            None,
            &commands(&[("vkDestroyDevice", Level::Device), ("vkQueueWaitIdle", Level::Device)]),
        );

        let via_instance = loader.device_statements(ProcRoot::Instance);
        let via_device = loader.device_statements(ProcRoot::Device);

        assert!(via_instance.contains("vkDestroyDevice = cast(typeof(vkDestroyDevice)) vkGetInstanceProcAddr(instance, \"vkDestroyDevice\");"));
        assert!(via_device.contains("vkDestroyDevice = cast(typeof(vkDestroyDevice)) vkGetDeviceProcAddr(device, \"vkDestroyDevice\");"));
        assert_eq!(
            via_instance.replace("vkGetInstanceProcAddr(instance", "vkGetDeviceProcAddr(device"),
            via_device
        );
        assert!(loader.instance_statements().is_empty());
    }

    #[test]
    fn test_guarded_block() {
        let mut loader = LoaderAssembler::default();
        let guard = Guard {
            version: "VK_USE_PLATFORM_XLIB_KHR".to_string(),
            import: Some("X11.Xlib"),
        };
        loader.add_block(
            "VK_KHR_xlib_surface",
            Some(&guard),
            &commands(&[("vkCreateXlibSurfaceKHR", Level::Instance)]),
        );

        assert_eq!(
            loader.globals(),
            "\n\n\t// VK_KHR_xlib_surface\n\tversion( VK_USE_PLATFORM_XLIB_KHR ) {\n\t\tPFN_vkCreateXlibSurfaceKHR vkCreateXlibSurfaceKHR;\n\t}"
        );
        assert!(loader
            .instance_statements()
            .starts_with("\n\n\t\t// VK_KHR_xlib_surface\n\t\tversion( VK_USE_PLATFORM_XLIB_KHR ) {\n\t\t\tvkCreateXlibSurfaceKHR = "));
        assert!(loader.instance_statements().ends_with("\n\t\t}"));
    }

    #[test]
    fn test_finish_asserts_call_order() {
        let loader = LoaderAssembler::default();
        let text = loader.finish("DVulkan");

        assert!(text.starts_with("}\n\n__gshared {\n}\n\nstruct DVulkanLoader {\n"));
        assert!(text.contains(
            "assert(vkGetInstanceProcAddr !is null, \"Must call DVulkanLoader.loadGlobalLevelFunctions before DVulkanLoader.loadInstanceLevelFunctions\");"
        ));
        assert!(text.contains("static void loadDeviceLevelFunctions(VkDevice device) {"));
        assert!(text.contains(
            "assert(vkGetDeviceProcAddr !is null, \"Must call DVulkanLoader.loadInstanceLevelFunctions before DVulkanLoader.loadDeviceLevelFunctions\");"
        ));
        assert!(text.contains("version(DVulkanLoadFromDerelict) {"));
    }
}
