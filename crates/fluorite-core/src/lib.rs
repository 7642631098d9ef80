//! Core domain types and port definitions for the Fluorite bootstrapper.
//!
//! This crate is pure: it owns the error taxonomy, settings, the
//! environment model and the traits (ports) that the runtime crate
//! implements against the real operating system.

#![deny(unused_crate_dependencies)]

pub mod environment;
pub mod error;
pub mod graphics;
pub mod launch_env;
pub mod manifest;
pub mod paths;
pub mod platform;
pub mod ports;
pub mod settings;
pub mod system;

// Re-export commonly used types for convenience
pub use environment::{ActivatedEnvironment, EnvMarker, EnvironmentDescriptor};
pub use error::{BootstrapError, BootstrapResult};
pub use graphics::GraphicsInfo;
pub use launch_env::{EnvChanges, LaunchEnvironment, ProcessEnv};
pub use manifest::DependencyManifest;
pub use paths::{PathError, ResolvedPaths, resolve_root};
pub use platform::Platform;
pub use ports::{
    Clock, CommandError, CommandOutput, CommandRunner, CommandSpec, DirRemover, ExitStatusCode,
    SystemProbePort,
};
pub use settings::{
    BootstrapSettings, GraphicsSettings, NativeLibrarySettings, RetrySettings, SettingsError,
    StaleEnvironmentPolicy, SystemPackageSettings,
};
