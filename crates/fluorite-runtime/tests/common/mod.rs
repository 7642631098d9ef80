//! Shared fakes for the orchestration tests.

#![allow(dead_code)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use fluorite_core::ports::{
    Clock, CommandError, CommandOutput, CommandRunner, CommandSpec, DirRemover, ExitStatusCode,
};
use fluorite_core::settings::BootstrapSettings;
use fluorite_runtime::{BootstrapDeps, LocalFs};
use tempfile::TempDir;

pub const LIB: &str = "libstdc++.so.6";

pub const GLXINFO_GL4: &str = "name of display: :0
OpenGL vendor string: Intel
OpenGL renderer string: Mesa Intel(R) UHD Graphics 620 (KBL GT2)
OpenGL version string: 4.6 (Compatibility Profile) Mesa 23.2.1
";

pub fn glxinfo_with_version(version: &str) -> String {
    format!(
        "OpenGL vendor string: Mesa\n\
         OpenGL renderer string: llvmpipe\n\
         OpenGL version string: {version}\n"
    )
}

/// Scripted reply for commands whose display form contains a pattern.
#[derive(Debug, Clone)]
pub enum Reply {
    Output(CommandOutput),
    Exit(i32),
    NotFound,
    /// The program exists but cannot be executed.
    SpawnFailed,
    /// Succeed and lay out a virtual environment at the last argument.
    CreateVenv,
}

/// Command runner answering from a rule table and recording every call.
pub struct FakeRunner {
    rules: Mutex<Vec<(String, Reply)>>,
    calls: Mutex<Vec<String>>,
    specs: Mutex<Vec<CommandSpec>>,
}

impl FakeRunner {
    /// No rules: every command succeeds with empty output.
    pub fn empty() -> Self {
        Self {
            rules: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            specs: Mutex::new(Vec::new()),
        }
    }

    /// A Linux machine where every tool works and GL 4.6 is available.
    pub fn healthy() -> Self {
        Self::empty()
            .with("--version", Reply::Output(CommandOutput::success("Python 3.11.4\n")))
            .with(
                "-m pip --version",
                Reply::Output(CommandOutput::success(
                    "pip 23.2.1 from /usr/lib/python3/dist-packages/pip (python 3.11)\n",
                )),
            )
            .with(
                "dpkg -s",
                Reply::Output(CommandOutput::success(
                    "Status: install ok installed\nVersion: 1.0\n",
                )),
            )
            .with("glxinfo", Reply::Output(CommandOutput::success(GLXINFO_GL4)))
            .with("-m venv", Reply::CreateVenv)
    }

    /// Add a rule; later rules take precedence.
    #[must_use]
    pub fn with(self, pattern: &str, reply: Reply) -> Self {
        self.rules
            .lock()
            .unwrap()
            .insert(0, (pattern.to_string(), reply));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn specs(&self) -> Vec<CommandSpec> {
        self.specs.lock().unwrap().clone()
    }

    pub fn called(&self, pattern: &str) -> bool {
        self.calls().iter().any(|c| c.contains(pattern))
    }

    pub fn count(&self, pattern: &str) -> usize {
        self.calls().iter().filter(|c| c.contains(pattern)).count()
    }

    fn reply(&self, spec: &CommandSpec) -> Reply {
        let line = spec.to_string();
        self.calls.lock().unwrap().push(line.clone());
        self.specs.lock().unwrap().push(spec.clone());

        self.rules
            .lock()
            .unwrap()
            .iter()
            .find(|(pattern, _)| line.contains(pattern.as_str()))
            .map_or(Reply::Exit(0), |(_, reply)| reply.clone())
    }
}

fn lay_out_venv(spec: &CommandSpec) {
    let target = PathBuf::from(spec.arguments().last().unwrap());
    let bin = target.join("bin");
    fs::create_dir_all(&bin).unwrap();
    fs::write(bin.join("activate"), "# activate").unwrap();
    fs::write(bin.join("python3"), "").unwrap();

    let scripts = target.join("Scripts");
    fs::create_dir_all(&scripts).unwrap();
    fs::write(scripts.join("activate.bat"), "@echo off").unwrap();
    fs::write(scripts.join("python.exe"), "").unwrap();
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn output(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        match self.reply(spec) {
            Reply::Output(output) => Ok(output),
            Reply::Exit(code) => Ok(CommandOutput {
                status: ExitStatusCode::from_code(code),
                stdout: String::new(),
                stderr: String::new(),
            }),
            Reply::NotFound => Err(CommandError::NotFound {
                program: spec.program_name(),
            }),
            Reply::SpawnFailed => Err(CommandError::SpawnFailed {
                program: spec.program_name(),
                reason: "Permission denied (os error 13)".to_string(),
            }),
            Reply::CreateVenv => {
                lay_out_venv(spec);
                Ok(CommandOutput::success(""))
            }
        }
    }

    async fn status(&self, spec: &CommandSpec) -> Result<ExitStatusCode, CommandError> {
        match self.reply(spec) {
            Reply::Output(output) => Ok(output.status),
            Reply::Exit(code) => Ok(ExitStatusCode::from_code(code)),
            Reply::NotFound => Err(CommandError::NotFound {
                program: spec.program_name(),
            }),
            Reply::SpawnFailed => Err(CommandError::SpawnFailed {
                program: spec.program_name(),
                reason: "Permission denied (os error 13)".to_string(),
            }),
            Reply::CreateVenv => {
                lay_out_venv(spec);
                Ok(ExitStatusCode::SUCCESS)
            }
        }
    }
}

/// Clock that records requested delays without sleeping.
#[derive(Default)]
pub struct RecordingClock {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingClock {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for RecordingClock {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

/// Remover that always fails as if files were held open.
#[derive(Default)]
pub struct FailingRemover {
    attempts: AtomicU32,
}

impl FailingRemover {
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl DirRemover for FailingRemover {
    fn remove_dir_all(&self, _path: &Path) -> io::Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "The process cannot access the file because it is being used by another process",
        ))
    }
}

/// A project directory with a manifest, an entry point and a system
/// library root containing the native library.
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("requirements.txt"), "pygame==2.5.2\nPyOpenGL>=3.1\n").unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src").join("main.py"), "print('hi')\n").unwrap();

        let lib_dir = dir.path().join("syslib").join("x86_64-linux-gnu");
        fs::create_dir_all(&lib_dir).unwrap();
        fs::write(lib_dir.join(LIB), "").unwrap();

        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn env_dir(&self) -> PathBuf {
        self.root().join("venv")
    }

    pub fn lib_root(&self) -> PathBuf {
        self.root().join("syslib")
    }

    pub fn without_manifest(self) -> Self {
        fs::remove_file(self.root().join("requirements.txt")).unwrap();
        self
    }

    /// Settings with the library search confined to the project.
    pub fn settings(&self) -> BootstrapSettings {
        let mut settings = BootstrapSettings::default();
        settings.native_library.search_roots = vec![self.lib_root()];
        settings
    }
}

pub fn deps(
    runner: Arc<FakeRunner>,
    clock: Arc<RecordingClock>,
    remover: Arc<dyn DirRemover>,
) -> BootstrapDeps {
    BootstrapDeps {
        runner,
        clock,
        remover,
    }
}

pub fn local_deps(runner: Arc<FakeRunner>) -> BootstrapDeps {
    deps(runner, Arc::new(RecordingClock::default()), Arc::new(LocalFs))
}
