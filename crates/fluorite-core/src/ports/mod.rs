//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the bootstrap flows expect from the
//! operating system. Implementations live in `fluorite-runtime`; tests
//! substitute scripted fakes.
//!
//! # Design Rules
//!
//! - No `tokio` or `std::process` types in any signature
//! - Commands are described as data (`CommandSpec`), never pre-built
//! - Environment changes travel with the command, never through globals

pub mod clock;
pub mod command;
pub mod fs;
pub mod system_probe;

pub use clock::Clock;
pub use command::{CommandError, CommandOutput, CommandRunner, CommandSpec, ExitStatusCode};
pub use fs::DirRemover;
pub use system_probe::SystemProbePort;
