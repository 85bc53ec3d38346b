use std::{fmt, io};

pub type Result<T> = std::result::Result<T, LaunchError>;

#[derive(Debug)]
pub enum LaunchError {
    /// The server runtime could not be started at all (e.g. interpreter missing).
    Spawn { program: String, source: io::Error },
    /// The server process ran and exited unsuccessfully.
    /// `code` is `None` when it was terminated by a signal.
    ServerExited { code: Option<i32> },
    /// Waiting on or stopping the child process failed.
    Wait(io::Error),
}

impl LaunchError {
    pub fn spawn(program: impl Into<String>, source: io::Error) -> Self {
        LaunchError::Spawn {
            program: program.into(),
            source,
        }
    }
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchError::Spawn { program, source } => {
                write!(f, "Failed to launch server runtime '{program}': {source}")
            }
            LaunchError::ServerExited { code: Some(code) } => {
                write!(f, "Server process exited with status {code}")
            }
            LaunchError::ServerExited { code: None } => {
                write!(f, "Server process was terminated by a signal")
            }
            LaunchError::Wait(err) => write!(f, "Failed while waiting on server process: {err}"),
        }
    }
}

impl std::error::Error for LaunchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LaunchError::Spawn { source, .. } => Some(source),
            LaunchError::Wait(err) => Some(err),
            LaunchError::ServerExited { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_exit_message_mentions_status() {
        let err = LaunchError::ServerExited { code: Some(1) };
        assert_eq!(err.to_string(), "Server process exited with status 1");
    }

    #[test]
    fn spawn_error_exposes_io_source() {
        let err = LaunchError::spawn(
            "python3",
            io::Error::new(io::ErrorKind::NotFound, "not found"),
        );
        assert!(err.to_string().contains("'python3'"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
