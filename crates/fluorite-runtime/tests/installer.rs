//! Install flow tests driven through scripted ports.

mod common;

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fluorite_core::environment::{EnvMarker, MARKER_FILE_NAME};
use fluorite_core::error::BootstrapError;
use fluorite_core::launch_env::ProcessEnv;
use fluorite_core::platform::Platform;
use fluorite_core::ports::{Clock, CommandOutput};
use fluorite_core::settings::{BootstrapSettings, StaleEnvironmentPolicy};
use fluorite_runtime::provision::remove_with_backoff;
use fluorite_runtime::{BootstrapDeps, Installer, LocalFs};
use mockall::{Sequence, mock, predicate::eq};

use common::{
    FailingRemover, FakeRunner, Project, RecordingClock, Reply, deps, glxinfo_with_version,
    local_deps,
};

fn installer(project: &Project, settings: BootstrapSettings, deps: BootstrapDeps) -> Installer {
    Installer::new(
        project.root(),
        settings,
        Platform::Linux,
        ProcessEnv::from_pairs([("PATH", "/usr/bin")]),
        deps,
    )
}

#[tokio::test]
async fn test_install_runs_steps_in_order() {
    let project = Project::new();
    let runner = Arc::new(FakeRunner::healthy());

    let report = installer(&project, project.settings(), local_deps(runner.clone()))
        .with_tool_version("9.9.9")
        .run()
        .await
        .unwrap();

    let calls = runner.calls();
    let position = |pattern: &str| {
        calls
            .iter()
            .position(|c| c.contains(pattern))
            .unwrap_or_else(|| panic!("{pattern} was not called: {calls:#?}"))
    };

    assert_eq!(calls[0], "python3 --version");
    assert!(position("-m pip --version") < position("dpkg -s"));
    assert!(position("dpkg -s") < position("glxinfo -B"));
    assert!(position("glxinfo -B") < position("-m venv"));
    assert!(position("-m venv") < position("install --upgrade pip"));
    assert!(position("install --upgrade pip") < position("install -r"));
    assert!(!runner.called("apt-get"));

    assert_eq!(report.python_version.as_deref(), Some("3.11.4"));
    assert_eq!(report.environment, project.env_dir());
    assert_eq!(report.manifest_entries, vec!["pygame==2.5.2", "PyOpenGL>=3.1"]);
    assert!(report.dependencies_installed);
    assert!(!report.recreated);
    assert!(report.warnings.is_empty());

    let marker = EnvMarker::read(&project.env_dir().join(MARKER_FILE_NAME)).unwrap();
    assert_eq!(marker.tool_version, "9.9.9");
    assert_eq!(marker.python_version, "3.11.4");
    assert_eq!(marker.requirements, report.manifest_entries);
}

#[tokio::test]
async fn test_pip_runs_inside_the_activated_environment() {
    let project = Project::new();
    let runner = Arc::new(FakeRunner::healthy());

    installer(&project, project.settings(), local_deps(runner.clone()))
        .run()
        .await
        .unwrap();

    let env_python = project.env_dir().join("bin").join("python3");
    let pip_specs: Vec<_> = runner
        .specs()
        .into_iter()
        .filter(|s| s.to_string().contains("-m pip install"))
        .collect();

    assert_eq!(pip_specs.len(), 2);
    for spec in pip_specs {
        assert_eq!(std::path::Path::new(spec.program()), env_python);
        assert_eq!(
            spec.env().get("VIRTUAL_ENV"),
            Some(project.env_dir().to_str().unwrap())
        );
        assert!(spec.env().get("PATH").unwrap().starts_with(
            project.env_dir().join("bin").to_str().unwrap()
        ));
        assert!(spec.env().is_removed("PYTHONHOME"));
    }
}

#[tokio::test]
async fn test_missing_manifest_is_a_warning() {
    let project = Project::new().without_manifest();
    let runner = Arc::new(FakeRunner::healthy());

    let report = installer(&project, project.settings(), local_deps(runner.clone()))
        .run()
        .await
        .unwrap();

    assert!(!report.dependencies_installed);
    assert!(report.manifest_entries.is_empty());
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("requirements.txt"));
    assert!(runner.called("install --upgrade pip"));
    assert!(!runner.called("install -r"));
}

#[tokio::test]
async fn test_failed_manifest_install_aborts() {
    let project = Project::new();
    let runner = Arc::new(FakeRunner::healthy().with("install -r", Reply::Exit(1)));

    let err = installer(&project, project.settings(), local_deps(runner))
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, BootstrapError::DependencyInstallFailure { .. }));
    assert_eq!(err.exit_code(), 1);
    assert!(!project.env_dir().join(MARKER_FILE_NAME).exists());
}

#[tokio::test]
async fn test_failed_pip_upgrade_aborts() {
    let project = Project::new();
    let runner = Arc::new(FakeRunner::healthy().with("install --upgrade pip", Reply::Exit(2)));

    let err = installer(&project, project.settings(), local_deps(runner.clone()))
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, BootstrapError::DependencyInstallFailure { .. }));
    assert!(!runner.called("install -r"));
}

#[tokio::test]
async fn test_gl2_aborts_before_provisioning() {
    let project = Project::new();
    let runner = Arc::new(FakeRunner::healthy().with(
        "glxinfo",
        Reply::Output(CommandOutput::success(glxinfo_with_version("2.1 Mesa 7.11"))),
    ));

    let err = installer(&project, project.settings(), local_deps(runner.clone()))
        .run()
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BootstrapError::GraphicsCapabilityInsufficient {
            detected: Some(2),
            minimum: 3
        }
    ));
    assert!(!runner.called("-m venv"));
    assert!(!project.env_dir().exists());
}

#[tokio::test]
async fn test_gl3_and_gl4_proceed() {
    for version in ["3.3 (Compatibility Profile) Mesa 20.0.8", "4.6 (Core Profile)"] {
        let project = Project::new();
        let runner = Arc::new(FakeRunner::healthy().with(
            "glxinfo",
            Reply::Output(CommandOutput::success(glxinfo_with_version(version))),
        ));

        installer(&project, project.settings(), local_deps(runner.clone()))
            .run()
            .await
            .unwrap();

        assert!(runner.called("-m venv"), "{version}");
    }
}

#[tokio::test]
async fn test_unavailable_graphics_probe_is_insufficient() {
    let project = Project::new();
    let runner = Arc::new(FakeRunner::healthy().with("glxinfo", Reply::NotFound));

    let err = installer(&project, project.settings(), local_deps(runner))
        .run()
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BootstrapError::GraphicsCapabilityInsufficient { detected: None, .. }
    ));
}

#[tokio::test]
async fn test_missing_python_is_tooling_missing() {
    let project = Project::new();
    let runner = Arc::new(FakeRunner::empty().with("--version", Reply::NotFound));

    let err = installer(&project, project.settings(), local_deps(runner.clone()))
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, BootstrapError::ToolingMissing { ref tool } if tool == "python"));
    assert_eq!(runner.calls(), vec!["python3 --version", "python --version"]);
}

#[tokio::test]
async fn test_python_fallback_candidate_is_used() {
    let project = Project::new();
    let runner = Arc::new(
        FakeRunner::healthy()
            .with("python3 --version", Reply::NotFound)
            .with("python -m pip --version", Reply::Exit(1)),
    );

    let err = installer(&project, project.settings(), local_deps(runner.clone()))
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, BootstrapError::ToolingMissing { ref tool } if tool == "pip"));
    assert!(runner.called("python --version"));
}

#[tokio::test]
async fn test_first_missing_package_triggers_one_bulk_install() {
    let project = Project::new();
    let runner = Arc::new(FakeRunner::healthy().with("dpkg -s python3-venv", Reply::Exit(1)));

    installer(&project, project.settings(), local_deps(runner.clone()))
        .run()
        .await
        .unwrap();

    assert_eq!(runner.count("dpkg -s"), 3);
    assert_eq!(runner.count("apt-get"), 1);
    assert!(runner.called(
        "sudo apt-get install -y python3 python3-pip python3-venv mesa-utils libgl1"
    ));
}

#[tokio::test]
async fn test_failed_bulk_install_only_warns() {
    let project = Project::new();
    let runner = Arc::new(
        FakeRunner::healthy()
            .with("dpkg -s python3", Reply::Exit(1))
            .with("apt-get", Reply::Exit(100)),
    );

    let report = installer(&project, project.settings(), local_deps(runner))
        .run()
        .await
        .unwrap();

    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("mesa-utils"));
    assert!(report.dependencies_installed);
}

#[tokio::test]
async fn test_windows_skips_linux_only_checks() {
    let project = Project::new();
    let runner = Arc::new(FakeRunner::healthy());

    let report = Installer::new(
        project.root(),
        project.settings(),
        Platform::Windows,
        ProcessEnv::default(),
        local_deps(runner.clone()),
    )
    .run()
    .await
    .unwrap();

    assert_eq!(runner.calls()[0], "python --version");
    assert!(!runner.called("dpkg"));
    assert!(!runner.called("glxinfo"));
    assert!(report.dependencies_installed);
}

#[tokio::test]
async fn test_existing_environment_is_reused_by_default() {
    let project = Project::new();
    let runner = Arc::new(FakeRunner::healthy());
    installer(&project, project.settings(), local_deps(runner))
        .run()
        .await
        .unwrap();

    let runner = Arc::new(FakeRunner::healthy());
    let report = installer(&project, project.settings(), local_deps(runner.clone()))
        .run()
        .await
        .unwrap();

    assert!(!report.recreated);
    assert!(!runner.called("-m venv"));
    assert!(runner.called("install -r"));
}

#[tokio::test]
async fn test_recreate_policy_replaces_environment() {
    let project = Project::new();
    installer(&project, project.settings(), local_deps(Arc::new(FakeRunner::healthy())))
        .run()
        .await
        .unwrap();
    let leftover = project.env_dir().join("leftover.txt");
    fs::write(&leftover, "stale").unwrap();

    let mut settings = project.settings();
    settings.stale_environment = StaleEnvironmentPolicy::Recreate;
    let runner = Arc::new(FakeRunner::healthy());

    let report = installer(&project, settings, local_deps(runner.clone()))
        .run()
        .await
        .unwrap();

    assert!(report.recreated);
    assert!(!leftover.exists());
    assert!(runner.called("-m venv"));
}

#[tokio::test]
async fn test_unremovable_environment_is_not_recreated() {
    let project = Project::new();
    installer(&project, project.settings(), local_deps(Arc::new(FakeRunner::healthy())))
        .run()
        .await
        .unwrap();

    let mut settings = project.settings();
    settings.stale_environment = StaleEnvironmentPolicy::Recreate;
    let runner = Arc::new(FakeRunner::healthy());
    let clock = Arc::new(RecordingClock::default());
    let remover = Arc::new(FailingRemover::default());

    let err = installer(&project, settings, deps(runner.clone(), clock.clone(), remover.clone()))
        .run()
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BootstrapError::StaleEnvironmentUnremovable { attempts: 5, .. }
    ));
    assert!(err.to_string().contains("Close any programs"));
    assert_eq!(remover.attempts(), 5);
    assert_eq!(
        clock.sleeps(),
        [200, 400, 800, 1600].map(Duration::from_millis).to_vec()
    );
    assert!(!runner.called("-m venv"));
    assert!(!runner.called("pip install"));
}

mock! {
    pub Sleeper {}

    #[async_trait]
    impl Clock for Sleeper {
        async fn sleep(&self, duration: Duration);
    }
}

#[tokio::test]
async fn test_backoff_doubles_and_caps() {
    let mut clock = MockSleeper::new();
    let mut seq = Sequence::new();
    for ms in [200, 400, 800, 1600, 2000, 2000] {
        clock
            .expect_sleep()
            .with(eq(Duration::from_millis(ms)))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
    }

    let retry = fluorite_core::settings::RetrySettings {
        max_attempts: 7,
        ..Default::default()
    };
    let remover = FailingRemover::default();
    let tmp = tempfile::tempdir().unwrap();

    let err = remove_with_backoff(&remover, &clock, &retry, tmp.path())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BootstrapError::StaleEnvironmentUnremovable { attempts: 7, .. }
    ));
    assert_eq!(remover.attempts(), 7);
}

#[tokio::test]
async fn test_already_removed_directory_needs_no_retry() {
    let mut clock = MockSleeper::new();
    clock.expect_sleep().never();
    let tmp = tempfile::tempdir().unwrap();

    let attempts = remove_with_backoff(
        &LocalFs,
        &clock,
        &Default::default(),
        &tmp.path().join("gone"),
    )
    .await
    .unwrap();

    assert_eq!(attempts, 1);
}
