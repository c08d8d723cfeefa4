//! Native messaging transport: one round trip against a spawned host
//! process.
//!
//! The receiver is an external program outside the sandbox. Each round
//! trip spawns the configured command, writes one request frame to its
//! stdin, and reads one response frame from its stdout. Closing stdin
//! after the request lets single-shot hosts exit once they have replied.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::TransportError;
use crate::framing::{read_frame, write_frame};
use crate::messages::{HostRequest, HostResponse};
use crate::transport::{HostTransport, Result};

/// How to launch the native host executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl HostCommand {
    /// A command with no extra arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

/// Native messaging transport over a host process's stdio.
pub struct NativeHostTransport {
    command: HostCommand,
}

impl NativeHostTransport {
    /// Create a transport for the given host command.
    pub fn new(command: HostCommand) -> Self {
        Self { command }
    }
}

#[async_trait]
impl HostTransport for NativeHostTransport {
    async fn roundtrip(&self, request: &HostRequest) -> Result<HostResponse> {
        let mut child = Command::new(&self.command.program)
            .args(&self.command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(TransportError::Spawn)?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| TransportError::ChannelClosed("host stdin unavailable".to_string()))?;
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| TransportError::ChannelClosed("host stdout unavailable".to_string()))?;

        write_frame(&mut stdin, request).await?;
        drop(stdin);

        let response = read_frame::<_, HostResponse>(&mut stdout)
            .await?
            .ok_or_else(|| {
                TransportError::ChannelClosed("host closed without replying".to_string())
            })?;

        let _ = child.wait().await;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_host_is_spawn_error() {
        let transport = NativeHostTransport::new(HostCommand::new("/nonexistent/credrelay-host"));
        let result = transport.roundtrip(&HostRequest::Ping).await;
        assert!(matches!(result, Err(TransportError::Spawn(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_roundtrip_against_scripted_host() {
        // A shell stand-in that drains the request, then replies with a
        // fixed accepting frame: 4-byte LE length (16 = \020) followed by
        // {"success":true}.
        let script = r#"cat >/dev/null; printf '\020\000\000\000{"success":true}'"#;
        let command = HostCommand::new("/bin/sh").arg("-c").arg(script);

        let transport = NativeHostTransport::new(command);
        let response = transport.roundtrip(&HostRequest::Ping).await.unwrap();
        assert!(response.success);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_silent_host_is_channel_closed() {
        let command = HostCommand::new("/bin/sh").arg("-c").arg("cat >/dev/null");
        let transport = NativeHostTransport::new(command);
        let result = transport.roundtrip(&HostRequest::Ping).await;
        assert!(matches!(result, Err(TransportError::ChannelClosed(_))));
    }
}
