//! Bridge server — JSON-lines loop between the platform host and the policy.
//!
//! The host writes one `HostEvent` per line; for each event the bridge writes
//! the resulting `ShellCommand`s, one per line, and flushes before reading
//! the next event. That is the whole ordering contract: events are handled
//! in arrival order, each to completion.
//!
//! Served either on stdin/stdout or on a Unix socket. Socket connections are
//! handled one at a time against the same session.

use crate::bridge::protocol::{HostEvent, ShellCommand};
use crate::bridge::session::ShellSession;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;

/// Run the event loop until the reader hits EOF.
///
/// Lines that aren't a valid `HostEvent` are logged and skipped; one bad
/// line never ends the loop. I/O errors do.
pub async fn serve_lines<R, W>(reader: R, mut writer: W, session: &mut ShellSession) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = reader;
    write_command(&mut writer, &session.start_command()).await?;
    writer.flush().await?;

    let mut line = String::new();
    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            break; // Host closed the channel
        }
        if line.trim().is_empty() {
            continue;
        }

        let event: HostEvent = match serde_json::from_str(line.trim()) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("Ignoring malformed host event: {}", e);
                continue;
            }
        };

        for command in session.handle_event(event) {
            write_command(&mut writer, &command).await?;
        }
        writer.flush().await?;
    }

    Ok(())
}

async fn write_command<W>(writer: &mut W, command: &ShellCommand) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let json = serde_json::to_string(command).context("Failed to serialize shell command")?;
    writer.write_all(json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    Ok(())
}

/// The bridge for one shell session.
pub struct BridgeServer {
    session: ShellSession,
}

impl BridgeServer {
    pub fn new(session: ShellSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &ShellSession {
        &self.session
    }

    /// Serve the host on stdin/stdout until stdin closes.
    pub async fn run_stdio(&mut self) -> Result<()> {
        tracing::info!("Bridge serving session {} on stdio", self.session.session_id());
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        serve_lines(stdin, stdout, &mut self.session).await
    }

    /// Serve hosts connecting to a Unix socket, one connection at a time.
    pub async fn run_socket(&mut self, socket_path: impl AsRef<Path>) -> Result<()> {
        let socket_path: PathBuf = socket_path.as_ref().to_path_buf();

        // Remove a stale socket from a previous run
        if socket_path.exists() {
            std::fs::remove_file(&socket_path).with_context(|| {
                format!("Failed to remove stale socket: {}", socket_path.display())
            })?;
        }

        let listener = UnixListener::bind(&socket_path)
            .with_context(|| format!("Failed to bind socket: {}", socket_path.display()))?;

        tracing::info!("Bridge listening on {}", socket_path.display());

        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    let (reader, writer) = stream.into_split();
                    if let Err(e) =
                        serve_lines(BufReader::new(reader), writer, &mut self.session).await
                    {
                        tracing::error!("Connection handler error: {}", e);
                    }
                    tracing::debug!("Host disconnected");
                }
                Err(e) => {
                    tracing::error!("Failed to accept connection: {}", e);
                }
            }
        }
    }
}
