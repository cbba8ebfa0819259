//! Platform guards for windowing-system extensions.

use crate::core::Block;

/// Conditional compilation around a platform-specific block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guard {
    /// D version identifier, e.g. `VK_USE_PLATFORM_XLIB_KHR`
    pub version: String,

    /// Module publicly imported inside the guard
    pub import: Option<&'static str>,
}

impl Guard {
    /// Opening line of the guard.
    pub fn open(&self) -> String {
        format!("version( {} ) {{", self.version)
    }
}

/// Surface extensions with their version identifier and import.
const SURFACE_EXTENSIONS: &[(&str, &str, &str)] = &[
    ("VK_KHR_android_surface", "VK_USE_PLATFORM_ANDROID_KHR", "android.native_window"),
    ("VK_KHR_mir_surface", "VK_USE_PLATFORM_MIR_KHR", "mir_toolkit.client_types"),
    ("VK_KHR_wayland_surface", "VK_USE_PLATFORM_WAYLAND_KHR", "wayland_client"),
    ("VK_KHR_win32_surface", "VK_USE_PLATFORM_WIN32_KHR", "core.sys.windows.windows"),
    ("VK_KHR_xlib_surface", "VK_USE_PLATFORM_XLIB_KHR", "X11.Xlib"),
    ("VK_KHR_xcb_surface", "VK_USE_PLATFORM_XCB_KHR", "xcb.xcb"),
];

/// D modules declaring the native types of a registry platform.
const PLATFORM_IMPORTS: &[(&str, &str)] = &[
    ("android", "android.native_window"),
    ("mir", "mir_toolkit.client_types"),
    ("wayland", "wayland_client"),
    ("win32", "core.sys.windows.windows"),
    ("xlib", "X11.Xlib"),
    ("xcb", "xcb.xcb"),
];

/// Find the guard of a block.
///
/// Surface extensions use the fixed table. Other extensions tied to a
/// registry platform are guarded by the platform's protecting macro.
pub fn guard_for(block: &Block) -> Option<Guard> {
    if let Some((_, version, import)) = SURFACE_EXTENSIONS.iter().find(|(name, _, _)| *name == block.name) {
        return Some(Guard {
            version: version.to_string(),
            import: Some(import),
        });
    }

    let protect = block.protect.as_ref()?;
    let import = block.platform.as_deref().and_then(|platform| {
        PLATFORM_IMPORTS
            .iter()
            .find(|(name, _)| *name == platform)
            .map(|(_, import)| *import)
    });

    Some(Guard {
        version: protect.clone(),
        import,
    })
}

/// Indent every non-empty line of `text` by one tab.
pub fn indent(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for line in text.split_inclusive('\n') {
        if line.trim().is_empty() {
            out.push_str(line);
        } else {
            out.push('\t');
            out.push_str(line);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_extension_guard() {
        let block = Block::extension("VK_KHR_win32_surface", Some("win32".to_string()));
        let guard = guard_for(&block).unwrap();

        assert_eq!(guard.open(), "version( VK_USE_PLATFORM_WIN32_KHR ) {");
        assert_eq!(guard.import, Some("core.sys.windows.windows"));
    }

    #[test]
    fn test_platform_fallback() {
        let block = Block::extension("VK_KHR_external_memory_win32", Some("win32".to_string()))
            .with_protect(Some("VK_USE_PLATFORM_WIN32_KHR".to_string()));
        let guard = guard_for(&block).unwrap();
        assert_eq!(guard.version, "VK_USE_PLATFORM_WIN32_KHR");
        assert_eq!(guard.import, Some("core.sys.windows.windows"));

        let block = Block::extension("VK_GGP_stream_descriptor_surface", Some("ggp".to_string()))
            .with_protect(Some("VK_USE_PLATFORM_GGP".to_string()));
        assert_eq!(guard_for(&block).unwrap().import, None);
    }

    #[test]
    fn test_unguarded_blocks() {
        assert_eq!(guard_for(&Block::feature("VK_VERSION_1_0")), None);
        assert_eq!(guard_for(&Block::extension("VK_KHR_surface", None)), None);
    }

    #[test]
    fn test_indent() {
        assert_eq!(indent("a;\n\nstruct X {\n\tb;\n}\n"), "\ta;\n\n\tstruct X {\n\t\tb;\n\t}\n");
    }
}
