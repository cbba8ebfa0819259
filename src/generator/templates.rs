//! Fixed text of the generated D modules.

/// `package.d`: re-exports the types and functions modules.
pub fn package_module(package: &str) -> String {
    format!(
        "module {0};\npublic import {0}.types;\npublic import {0}.functions;\n",
        package
    )
}

/// Header of `types.d`: C integer aliases and the Vulkan helper macros.
pub fn types_header(package: &str) -> String {
    format!(
        r#"module {package}.types;

import std.bitmanip : bitfields;

alias uint8_t = ubyte;
alias uint16_t = ushort;
alias uint32_t = uint;
alias uint64_t = ulong;
alias int8_t = byte;
alias int16_t = short;
alias int32_t = int;
alias int64_t = long;

@nogc pure nothrow {{
	uint VK_MAKE_VERSION(uint major, uint minor, uint patch) {{
		return (major << 22) | (minor << 12) | (patch);
	}}
	uint VK_VERSION_MAJOR(uint ver) {{
		return ver >> 22;
	}}
	uint VK_VERSION_MINOR(uint ver) {{
		return (ver >> 12) & 0x3ff;
	}}
	uint VK_VERSION_PATCH(uint ver) {{
		return ver & 0xfff;
	}}
}}

enum VK_NULL_HANDLE = null;

enum VK_DEFINE_HANDLE(string name) = "struct "~name~"_handle; alias "~name~" = "~name~"_handle*;";

version(X86_64) {{
	alias VK_DEFINE_NON_DISPATCHABLE_HANDLE(string name) = VK_DEFINE_HANDLE!name;
}} else {{
	enum VK_DEFINE_NON_DISPATCHABLE_HANDLE(string name) = "alias "~name~" = ulong;";
}}
"#
    )
}

/// Header of `functions.d`, opening the `extern(System)` block.
pub fn functions_header(package: &str) -> String {
    format!(
        "module {0}.functions;\n\npublic import {0}.types;\n\nextern(System) @nogc nothrow {{\n",
        package
    )
}

/// Shared library loader binding `vkGetInstanceProcAddr` through DerelictUtil.
pub fn derelict_loader(name: &str) -> String {
    format!(
        r#"version({name}LoadFromDerelict) {{
	import derelict.util.loader;
	import derelict.util.system;

	private {{
		version(Windows)
			enum libNames = "vulkan-1.dll";
		else
			static assert(0,"Need to implement Vulkan libNames for this operating system.");
	}}

	class {name}DerelictLoader : SharedLibLoader {{
		this() {{
			super(libNames);
		}}

		protected override void loadSymbols() {{
			typeof(vkGetInstanceProcAddr) getProcAddr;
			bindFunc(cast(void**)&getProcAddr, "vkGetInstanceProcAddr");
			{name}Loader.loadGlobalLevelFunctions(getProcAddr);
		}}
	}}

	__gshared {name}DerelictLoader {name}Derelict;

	shared static this() {{
		{name}Derelict = new {name}DerelictLoader();
	}}
}}
"#
    )
}
