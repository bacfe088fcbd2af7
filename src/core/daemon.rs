use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TerminateError {
    #[error("Failed to read pidfile {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Pidfile does not contain a valid pid: '{content}'")]
    InvalidPid { content: String },

    #[error("Failed to signal pid {pid}: {source}")]
    Signal {
        pid: i32,
        #[source]
        source: nix::errno::Errno,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminateOutcome {
    Signalled(i32),
    Failed(String),
}

impl TerminateOutcome {
    pub fn is_signalled(&self) -> bool {
        matches!(self, TerminateOutcome::Signalled(_))
    }
}

/// Parses pidfile content. Only positive pids are accepted so a bad file
/// can never turn into a process-group signal.
pub fn parse_pid(content: &str) -> Result<i32, TerminateError> {
    let trimmed = content.trim();
    match trimmed.parse::<i32>() {
        Ok(pid) if pid > 0 => Ok(pid),
        _ => Err(TerminateError::InvalidPid {
            content: trimmed.to_string(),
        }),
    }
}

pub fn read_pidfile(path: &Path) -> Result<i32, TerminateError> {
    let content = std::fs::read_to_string(path).map_err(|source| TerminateError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_pid(&content)
}

fn send_sigterm(pid: i32) -> Result<(), TerminateError> {
    kill(Pid::from_raw(pid), Signal::SIGTERM).map_err(|source| TerminateError::Signal { pid, source })
}

/// Sends SIGTERM to the daemon whose pid is stored in `pidfile`.
///
/// Best effort: every failure is logged and reported in the outcome, never
/// returned as an error. Does not wait for the target to exit.
pub fn terminate_daemon(pidfile: impl AsRef<Path>) -> TerminateOutcome {
    let pidfile = pidfile.as_ref();

    let result = read_pidfile(pidfile).and_then(|pid| {
        tracing::info!("Killing daemon with pid {}", pid);
        send_sigterm(pid).map(|_| pid)
    });

    match result {
        Ok(pid) => TerminateOutcome::Signalled(pid),
        Err(e) => {
            tracing::error!("Failed to kill daemon: {}", e);
            TerminateOutcome::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::os::unix::process::ExitStatusExt;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_pid() {
        assert_eq!(parse_pid("1234").unwrap(), 1234);
        assert_eq!(parse_pid("  42\n").unwrap(), 42);
        assert!(parse_pid("").is_err());
        assert!(parse_pid("abc").is_err());
        assert!(parse_pid("0").is_err());
        assert!(parse_pid("-1").is_err());
        assert!(parse_pid("12 34").is_err());
    }

    #[test]
    fn test_terminate_non_numeric_pidfile_is_swallowed() {
        let mut pidfile = NamedTempFile::new().unwrap();
        pidfile.write_all(b"not-a-pid").unwrap();

        let outcome = terminate_daemon(pidfile.path());

        match outcome {
            TerminateOutcome::Failed(reason) => assert!(reason.contains("not-a-pid")),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_terminate_missing_pidfile_is_swallowed() {
        let dir = tempfile::TempDir::new().unwrap();
        let outcome = terminate_daemon(dir.path().join("absent.pid"));
        assert!(!outcome.is_signalled());
    }

    #[test]
    fn test_terminate_invalid_utf8_pidfile_is_swallowed() {
        let mut pidfile = NamedTempFile::new().unwrap();
        pidfile.write_all(&[0xff, 0xfe, 0x31]).unwrap();

        let outcome = terminate_daemon(pidfile.path());
        assert!(!outcome.is_signalled());
    }

    #[test]
    fn test_terminate_signals_running_process() {
        let mut child = std::process::Command::new("sleep")
            .arg("30")
            .spawn()
            .unwrap();

        let mut pidfile = NamedTempFile::new().unwrap();
        writeln!(pidfile, "{}", child.id()).unwrap();

        let outcome = terminate_daemon(pidfile.path());
        assert_eq!(outcome, TerminateOutcome::Signalled(child.id() as i32));

        let status = child.wait().unwrap();
        assert_eq!(status.signal(), Some(Signal::SIGTERM as i32));
    }
}
