//! External command runner - infrastructure layer
//!
//! Only exposes "run this tool and give me its output"; knows nothing about
//! documents or roles.

use std::ffi::OsStr;
use std::process::Output;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::error::BoxError;

/// Runs external tools with an optional timeout
#[derive(Debug, Clone, Default)]
pub struct CommandRunner {
    timeout: Option<Duration>,
}

impl CommandRunner {
    pub fn new(timeout_secs: Option<u64>) -> Self {
        Self {
            timeout: timeout_secs.map(Duration::from_secs),
        }
    }

    /// Run `program` with `args` and return its stdout.
    ///
    /// A missing binary, a non-zero exit status and a timeout all come back as
    /// an error whose message names the program and, for a missing binary,
    /// `install_hint`.
    pub async fn run<I, S>(&self, program: &str, args: I, install_hint: &str) -> Result<Vec<u8>, BoxError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(program);
        command.args(args).kill_on_drop(true);
        debug!("Running external command: {:?}", command.as_std());

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| format!("{} timed out after {}s", program, limit.as_secs()))?,
            None => command.output().await,
        };

        let output = match output {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(format!("{} not found ({})", program, install_hint).into());
            }
            Err(e) => return Err(e.into()),
        };

        check_status(program, output)
    }
}

fn check_status(program: &str, output: Output) -> Result<Vec<u8>, BoxError> {
    if output.status.success() {
        Ok(output.stdout)
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(format!("{} failed ({}): {}", program, output.status, stderr.trim()).into())
    }
}

/// Whether `name` resolves to an executable on PATH
pub fn check_binary(name: &str) -> bool {
    which::which(name).is_ok()
}
