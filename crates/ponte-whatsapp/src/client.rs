// SPDX-FileCopyrightText: 2026 Ponte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Supervisor for the external browser-automation runtime.
//!
//! The runtime is a separate process that holds the authenticated browser
//! session. It speaks newline-delimited JSON on its stdio:
//!
//! Runtime -> bridge (stdout):
//! ```json
//! {"event": "qr", "data": "<challenge>"}
//! {"event": "ready"}
//! {"event": "auth_failure", "message": "..."}
//! {"event": "disconnected", "reason": "..."}
//! ```
//!
//! Bridge -> runtime (stdin):
//! ```json
//! {"cmd": "send", "to": "5511987654321@c.us", "body": "..."}
//! ```

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};

use ponte_core::{AutomationClient, ClientEvent, PonteError};

/// Lifecycle message emitted by the runtime on stdout.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum RuntimeEvent {
    Qr {
        data: String,
    },
    Ready,
    AuthFailure {
        #[serde(default)]
        message: String,
    },
    Disconnected {
        #[serde(default)]
        reason: String,
    },
}

impl From<RuntimeEvent> for ClientEvent {
    fn from(event: RuntimeEvent) -> Self {
        match event {
            RuntimeEvent::Qr { data } => ClientEvent::Qr(data),
            RuntimeEvent::Ready => ClientEvent::Ready,
            RuntimeEvent::AuthFailure { message } => ClientEvent::AuthFailure(message),
            RuntimeEvent::Disconnected { reason } => ClientEvent::Disconnected(reason),
        }
    }
}

/// Command written to the runtime's stdin.
#[derive(Debug, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
enum RuntimeCommand<'a> {
    Send { to: &'a str, body: &'a str },
}

/// [`AutomationClient`] implementation that launches and supervises the
/// automation runtime as a child process.
pub struct RuntimeClient {
    command: String,
    args: Vec<String>,
    session_dir: PathBuf,
    child: Mutex<Option<Child>>,
    stdin: Mutex<Option<ChildStdin>>,
}

impl RuntimeClient {
    pub fn new(command: String, args: Vec<String>, session_dir: PathBuf) -> Self {
        Self {
            command,
            args,
            session_dir,
            child: Mutex::new(None),
            stdin: Mutex::new(None),
        }
    }
}

#[async_trait]
impl AutomationClient for RuntimeClient {
    async fn start(&self, events: mpsc::Sender<ClientEvent>) -> Result<(), PonteError> {
        // Tear down any previous incarnation before relaunching.
        self.stop().await?;

        let mut child = Command::new(&self.command)
            .args(&self.args)
            .arg("--session-dir")
            .arg(&self.session_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| PonteError::Channel {
                message: format!("failed to launch automation runtime `{}`: {e}", self.command),
                source: Some(Box::new(e)),
            })?;

        let stdout = child.stdout.take().ok_or_else(|| PonteError::Channel {
            message: "automation runtime stdout was not captured".into(),
            source: None,
        })?;
        let stdin = child.stdin.take().ok_or_else(|| PonteError::Channel {
            message: "automation runtime stdin was not captured".into(),
            source: None,
        })?;

        info!(command = self.command.as_str(), "automation runtime launched");

        *self.child.lock().await = Some(child);
        *self.stdin.lock().await = Some(stdin);

        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        match serde_json::from_str::<RuntimeEvent>(line) {
                            Ok(event) => {
                                debug!(?event, "runtime event");
                                if events.send(event.into()).await.is_err() {
                                    // Adapter went away; nothing left to notify.
                                    break;
                                }
                            }
                            Err(e) => {
                                warn!(error = %e, line, "unparseable runtime event");
                            }
                        }
                    }
                    Ok(None) => {
                        // Runtime closed stdout: the session process is gone.
                        let _ = events
                            .send(ClientEvent::Disconnected(
                                "automation runtime exited".into(),
                            ))
                            .await;
                        break;
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to read from automation runtime");
                        let _ = events
                            .send(ClientEvent::Disconnected(format!(
                                "automation runtime read error: {e}"
                            )))
                            .await;
                        break;
                    }
                }
            }
        });

        Ok(())
    }

    async fn send_text(&self, target: &str, body: &str) -> Result<(), PonteError> {
        let mut guard = self.stdin.lock().await;
        let stdin = guard.as_mut().ok_or_else(|| PonteError::Channel {
            message: "automation runtime is not running".into(),
            source: None,
        })?;

        let command = RuntimeCommand::Send { to: target, body };
        let mut line = serde_json::to_vec(&command).map_err(|e| PonteError::Internal(
            format!("failed to encode runtime command: {e}"),
        ))?;
        line.push(b'\n');

        stdin.write_all(&line).await.map_err(|e| PonteError::Channel {
            message: format!("failed to deliver message to automation runtime: {e}"),
            source: Some(Box::new(e)),
        })?;
        stdin.flush().await.map_err(|e| PonteError::Channel {
            message: format!("failed to deliver message to automation runtime: {e}"),
            source: Some(Box::new(e)),
        })?;
        Ok(())
    }

    async fn stop(&self) -> Result<(), PonteError> {
        self.stdin.lock().await.take();
        if let Some(mut child) = self.child.lock().await.take() {
            if let Err(e) = child.kill().await {
                warn!(error = %e, "failed to kill automation runtime");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_events_parse() {
        let event: RuntimeEvent =
            serde_json::from_str(r#"{"event":"qr","data":"challenge"}"#).unwrap();
        assert!(matches!(event, RuntimeEvent::Qr { data } if data == "challenge"));

        let event: RuntimeEvent = serde_json::from_str(r#"{"event":"ready"}"#).unwrap();
        assert!(matches!(event, RuntimeEvent::Ready));

        let event: RuntimeEvent =
            serde_json::from_str(r#"{"event":"disconnected","reason":"logout"}"#).unwrap();
        assert!(matches!(event, RuntimeEvent::Disconnected { reason } if reason == "logout"));
    }

    #[test]
    fn auth_failure_message_defaults_to_empty() {
        let event: RuntimeEvent = serde_json::from_str(r#"{"event":"auth_failure"}"#).unwrap();
        assert!(matches!(event, RuntimeEvent::AuthFailure { message } if message.is_empty()));
    }

    #[test]
    fn send_command_encodes_to_single_object() {
        let command = RuntimeCommand::Send {
            to: "5511987654321@c.us",
            body: "hi",
        };
        let json = serde_json::to_string(&command).unwrap();
        assert_eq!(
            json,
            r#"{"cmd":"send","to":"5511987654321@c.us","body":"hi"}"#
        );
    }

    #[tokio::test]
    async fn start_surfaces_launch_failure() {
        let client = RuntimeClient::new(
            "/nonexistent/ponte-wa-runtime".into(),
            vec![],
            PathBuf::from("/tmp/ponte-test-session"),
        );
        let (tx, _rx) = mpsc::channel(8);
        let err = client.start(tx).await.unwrap_err();
        assert!(err.to_string().contains("failed to launch"));
    }

    #[tokio::test]
    async fn send_without_runtime_fails_fast() {
        let client = RuntimeClient::new(
            "ponte-wa-runtime".into(),
            vec![],
            PathBuf::from("/tmp/ponte-test-session"),
        );
        let err = client.send_text("5511987654321@c.us", "hi").await.unwrap_err();
        assert!(err.to_string().contains("not running"));
    }

    #[tokio::test]
    async fn events_stream_from_a_scripted_runtime() {
        // Use a shell as a stand-in runtime that emits two events and exits.
        let client = RuntimeClient::new(
            "sh".into(),
            vec![
                "-c".into(),
                concat!(
                    "echo '{\"event\":\"qr\",\"data\":\"abc\"}'; ",
                    "echo '{\"event\":\"ready\"}'"
                )
                .into(),
            ],
            PathBuf::from("/tmp/ponte-test-session"),
        );
        let (tx, mut rx) = mpsc::channel(8);
        client.start(tx).await.unwrap();

        assert_eq!(rx.recv().await, Some(ClientEvent::Qr("abc".into())));
        assert_eq!(rx.recv().await, Some(ClientEvent::Ready));
        // stdout EOF surfaces as a disconnect
        assert!(matches!(
            rx.recv().await,
            Some(ClientEvent::Disconnected(_))
        ));
    }
}
