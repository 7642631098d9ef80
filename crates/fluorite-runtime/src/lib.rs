//! OS adapters and the install/launch orchestrations for Fluorite.
//!
//! Adapters implement the ports declared in `fluorite-core` against the
//! real system. The [`installer`] and [`launcher`] modules drive those
//! ports; they never touch `std::process` or the process environment
//! directly, which is what keeps them testable with scripted fakes.

#![deny(unsafe_code)]

mod clock;
mod command;
mod fs;
pub mod installer;
pub mod launcher;
pub mod provision;
pub mod system;
pub mod tooling;

use std::sync::Arc;

use fluorite_core::ports::{Clock, CommandRunner, DirRemover};

pub use clock::TokioClock;
pub use command::TokioCommandRunner;
pub use fs::LocalFs;
pub use installer::{InstallReport, Installer};
pub use launcher::{Launcher, PreparedLaunch};
pub use system::DefaultSystemProbe;
pub use tooling::PythonRuntime;

/// Port implementations shared by the orchestrations.
#[derive(Clone)]
pub struct BootstrapDeps {
    pub runner: Arc<dyn CommandRunner>,
    pub clock: Arc<dyn Clock>,
    pub remover: Arc<dyn DirRemover>,
}

impl BootstrapDeps {
    /// Adapters backed by the real operating system.
    pub fn system() -> Self {
        Self {
            runner: Arc::new(TokioCommandRunner::new()),
            clock: Arc::new(TokioClock),
            remover: Arc::new(LocalFs),
        }
    }
}
