//! Platform detection.

use serde::{Deserialize, Serialize};

/// Operating system family the bootstrap flows branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    Windows,
    #[serde(rename = "macos")]
    MacOS,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub const fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOS
        } else {
            Self::Linux
        }
    }

    pub const fn is_linux(self) -> bool {
        matches!(self, Self::Linux)
    }

    pub const fn is_windows(self) -> bool {
        matches!(self, Self::Windows)
    }

    /// Separator used in `PATH`-like variables.
    pub const fn path_list_separator(self) -> char {
        match self {
            Self::Windows => ';',
            Self::Linux | Self::MacOS => ':',
        }
    }

    /// Interpreter names tried, in order, when locating the runtime.
    pub const fn python_candidates(self) -> &'static [&'static str] {
        match self {
            Self::Windows => &["python"],
            Self::Linux | Self::MacOS => &["python3", "python"],
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Linux => "linux",
            Self::Windows => "windows",
            Self::MacOS => "macos",
        };
        f.write_str(name)
    }
}
