//! Notifier configuration checks
//!
//! Run before every send; nothing here is cached.

use std::path::{Path, PathBuf};

use crate::config::{Config, NotifierSettings};
use crate::error::NotifyError;
use crate::runner::{CommandRunner, render_command};

/// Check the settings in order, stopping at the first problem.
/// Returns the expanded executable path on success; the caller logs failures.
pub fn check<R: CommandRunner>(settings: &NotifierSettings, runner: &R) -> Result<PathBuf, NotifyError> {
    let path = resolve_executable(&settings.executable_path)?;

    if settings.sender.trim().is_empty() {
        return Err(NotifyError::EmptySender);
    }

    if settings.recipient.trim().is_empty() {
        return Err(NotifyError::EmptyRecipient);
    }

    if settings.verify_sender {
        verify_sender(&path, &settings.sender, runner)?;
    }

    Ok(path)
}

/// Expand the configured path and require an executable regular file
pub fn resolve_executable(configured: &Path) -> Result<PathBuf, NotifyError> {
    let expanded = Config::expand_path(configured);
    if is_exe(&expanded) {
        Ok(expanded)
    } else {
        Err(NotifyError::ExecutableNotFound {
            path: configured.to_path_buf(),
        })
    }
}

fn is_exe(path: &Path) -> bool {
    // A bare name would make `which` search PATH; only explicit paths count here
    if path.components().count() < 2 && !path.is_absolute() {
        return false;
    }
    path.is_file() && which::which(path).is_ok()
}

/// Ask signal-cli to list identities for the sender account
pub fn verify_sender<R: CommandRunner>(path: &Path, sender: &str, runner: &R) -> Result<(), NotifyError> {
    let args = vec!["-u".to_string(), sender.to_string(), "listIdentities".to_string()];
    let result = runner.run(path, &args)?;

    if !result.success() {
        return Err(NotifyError::SenderNotRegistered {
            sender: sender.to_string(),
            command: render_command(path, &args),
            output: result.output,
        });
    }

    log::debug!("Sender {} is registered", sender);
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::runner::CommandResult;
    use std::fs;
    use std::sync::Mutex;

    /// Records every invocation and answers with a fixed result
    pub(crate) struct FakeRunner {
        pub calls: Mutex<Vec<(PathBuf, Vec<String>)>>,
        pub exit_code: i32,
        pub output: String,
        pub fail_launch: bool,
    }

    impl FakeRunner {
        pub fn new(exit_code: i32, output: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                exit_code,
                output: output.to_string(),
                fail_launch: false,
            }
        }

        pub fn failing_launch() -> Self {
            Self {
                fail_launch: true,
                ..Self::new(0, "")
            }
        }

        pub fn calls(&self) -> Vec<(PathBuf, Vec<String>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(&self, program: &Path, args: &[String]) -> Result<CommandResult, NotifyError> {
            self.calls.lock().unwrap().push((program.to_path_buf(), args.to_vec()));
            if self.fail_launch {
                return Err(NotifyError::ProcessLaunch {
                    command: render_command(program, args),
                    source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
                });
            }
            Ok(CommandResult {
                exit_code: self.exit_code,
                output: self.output.clone(),
            })
        }
    }

    /// Write a do-nothing executable script and return its path
    pub(crate) fn fake_client(dir: &Path) -> PathBuf {
        let path = dir.join("signal-cli");
        fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&path).unwrap().permissions();
            perms.set_mode(0o755);
            fs::set_permissions(&path, perms).unwrap();
        }
        path
    }

    pub(crate) fn ready_settings(executable: &Path) -> NotifierSettings {
        NotifierSettings {
            executable_path: executable.to_path_buf(),
            sender: "+4915151111111".to_string(),
            recipient: "+4915152222222".to_string(),
            ..NotifierSettings::default()
        }
    }

    #[test]
    fn test_ready_configuration_passes() {
        let temp = tempfile::tempdir().unwrap();
        let settings = ready_settings(&fake_client(temp.path()));
        let runner = FakeRunner::new(0, "");

        assert!(check(&settings, &runner).is_ok());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_missing_executable_fails_without_launching() {
        let settings = ready_settings(Path::new("/definitely/not/here/signal-cli"));
        let runner = FakeRunner::new(0, "");

        let err = check(&settings, &runner).unwrap_err();
        assert!(matches!(err, NotifyError::ExecutableNotFound { .. }));
        assert!(runner.calls().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_file_fails_without_launching() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("signal-cli");
        fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();

        let mut settings = ready_settings(&path);
        settings.verify_sender = true;
        let runner = FakeRunner::new(0, "");

        assert!(check(&settings, &runner).is_err());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_directory_is_not_an_executable() {
        let temp = tempfile::tempdir().unwrap();
        let settings = ready_settings(temp.path());
        assert!(matches!(
            check(&settings, &FakeRunner::new(0, "")),
            Err(NotifyError::ExecutableNotFound { .. })
        ));
    }

    #[test]
    fn test_blank_sender_and_recipient() {
        let temp = tempfile::tempdir().unwrap();
        let exe = fake_client(temp.path());
        let runner = FakeRunner::new(0, "");

        let mut settings = ready_settings(&exe);
        settings.sender = "   ".to_string();
        assert!(matches!(check(&settings, &runner), Err(NotifyError::EmptySender)));

        let mut settings = ready_settings(&exe);
        settings.recipient = "\t".to_string();
        assert!(matches!(check(&settings, &runner), Err(NotifyError::EmptyRecipient)));
    }

    #[test]
    fn test_sender_check_order_before_recipient() {
        let temp = tempfile::tempdir().unwrap();
        let mut settings = ready_settings(&fake_client(temp.path()));
        settings.sender = String::new();
        settings.recipient = String::new();

        assert!(matches!(
            check(&settings, &FakeRunner::new(0, "")),
            Err(NotifyError::EmptySender)
        ));
    }

    #[test]
    fn test_verify_sender_runs_list_identities() {
        let temp = tempfile::tempdir().unwrap();
        let exe = fake_client(temp.path());
        let mut settings = ready_settings(&exe);
        settings.verify_sender = true;
        let runner = FakeRunner::new(0, "");

        assert!(check(&settings, &runner).is_ok());
        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, exe);
        assert_eq!(calls[0].1, vec!["-u", "+4915151111111", "listIdentities"]);
    }

    #[test]
    fn test_unregistered_sender() {
        let temp = tempfile::tempdir().unwrap();
        let mut settings = ready_settings(&fake_client(temp.path()));
        settings.verify_sender = true;
        let runner = FakeRunner::new(1, "User +4915151111111 is not registered.");

        let err = check(&settings, &runner).unwrap_err();
        match &err {
            NotifyError::SenderNotRegistered { command, output, .. } => {
                assert!(command.ends_with("-u +4915151111111 listIdentities"));
                assert!(output.contains("not registered"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.is_configuration());
    }

    #[test]
    fn test_verify_sender_launch_failure_propagates() {
        let temp = tempfile::tempdir().unwrap();
        let mut settings = ready_settings(&fake_client(temp.path()));
        settings.verify_sender = true;

        assert!(matches!(
            check(&settings, &FakeRunner::failing_launch()),
            Err(NotifyError::ProcessLaunch { .. })
        ));
    }
}
