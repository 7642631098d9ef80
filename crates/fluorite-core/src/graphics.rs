//! OpenGL capability information parsed from `glxinfo` output.

/// Placeholder shown for fields the probe could not provide.
pub const UNKNOWN: &str = "Unknown";

/// OpenGL vendor/renderer/version as reported by the system.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphicsInfo {
    pub vendor: Option<String>,
    pub renderer: Option<String>,
    pub version: Option<String>,
}

impl GraphicsInfo {
    /// Parse `glxinfo` output.
    ///
    /// ```text
    /// OpenGL vendor string: Intel
    /// OpenGL renderer string: Mesa Intel(R) UHD Graphics 620 (KBL GT2)
    /// OpenGL core profile version string: 4.6 (Core Profile) Mesa 23.2.1
    /// OpenGL version string: 4.6 (Compatibility Profile) Mesa 23.2.1
    /// ```
    pub fn parse(output: &str) -> Self {
        let field = |key: &str| {
            output.lines().find_map(|line| {
                let value = line.trim().strip_prefix(key)?.trim();
                (!value.is_empty()).then(|| value.to_string())
            })
        };

        Self {
            vendor: field("OpenGL vendor string:"),
            renderer: field("OpenGL renderer string:"),
            version: field("OpenGL version string:")
                .or_else(|| field("OpenGL core profile version string:")),
        }
    }

    /// Major OpenGL version, if the version string could be parsed.
    pub fn major_version(&self) -> Option<u32> {
        self.version.as_deref().and_then(parse_major_version)
    }

    pub fn vendor_or_unknown(&self) -> &str {
        self.vendor.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn renderer_or_unknown(&self) -> &str {
        self.renderer.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn version_or_unknown(&self) -> &str {
        self.version.as_deref().unwrap_or(UNKNOWN)
    }
}

/// Leading integer of a version string: `"4.6 (Compatibility Profile)"` -> 4.
pub fn parse_major_version(version: &str) -> Option<u32> {
    let digits: String = version
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MESA_OUTPUT: &str = "name of display: :0
display: :0  screen: 0
direct rendering: Yes
OpenGL vendor string: Intel
OpenGL renderer string: Mesa Intel(R) UHD Graphics 620 (KBL GT2)
OpenGL core profile version string: 4.6 (Core Profile) Mesa 23.2.1
OpenGL version string: 4.6 (Compatibility Profile) Mesa 23.2.1
";

    #[test]
    fn test_parse_mesa_output() {
        let info = GraphicsInfo::parse(MESA_OUTPUT);
        assert_eq!(info.vendor.as_deref(), Some("Intel"));
        assert_eq!(
            info.renderer.as_deref(),
            Some("Mesa Intel(R) UHD Graphics 620 (KBL GT2)")
        );
        assert_eq!(
            info.version.as_deref(),
            Some("4.6 (Compatibility Profile) Mesa 23.2.1")
        );
        assert_eq!(info.major_version(), Some(4));
    }

    #[test]
    fn test_core_profile_version_is_fallback() {
        let info = GraphicsInfo::parse("OpenGL core profile version string: 3.3 (Core Profile)\n");
        assert_eq!(info.major_version(), Some(3));
    }

    #[test]
    fn test_garbage_output_yields_unknown() {
        let info = GraphicsInfo::parse("Error: unable to open display\n");
        assert_eq!(info, GraphicsInfo::default());
        assert_eq!(info.vendor_or_unknown(), UNKNOWN);
        assert_eq!(info.renderer_or_unknown(), UNKNOWN);
        assert_eq!(info.version_or_unknown(), UNKNOWN);
        assert_eq!(info.major_version(), None);
    }

    #[test]
    fn test_parse_major_version() {
        assert_eq!(parse_major_version("2.1 Mesa 7.11"), Some(2));
        assert_eq!(parse_major_version("  10.0"), Some(10));
        assert_eq!(parse_major_version("unknown"), None);
    }
}
