//! `navguard serve` — run the host bridge for one shell session.
//!
//! This is what a platform host launches: it loads the config, opens the
//! session's audit log and then answers host events until the host hangs up.
//! Human-facing output goes to stderr; stdout belongs to the protocol.

use crate::audit::AuditLogger;
use crate::bridge::{script, BridgeServer, ShellSession};
use crate::policy::parser;
use crate::utils::paths;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

/// Options for `navguard serve`.
#[derive(Debug, Default)]
pub struct ServeOptions {
    pub config_path: Option<PathBuf>,
    pub socket: Option<PathBuf>,
    pub no_audit: bool,
    pub print_script: bool,
}

/// Run the `navguard serve` command.
pub async fn run_serve(options: ServeOptions) -> Result<()> {
    if options.print_script {
        println!("{}", script::bridge_script());
        return Ok(());
    }

    let path = paths::resolve_config(options.config_path.as_deref())?;
    let config = parser::parse_config_file(&path)
        .with_context(|| format!("Failed to load config: {}", path.display()))?;

    let mut session = ShellSession::new(&config);
    if !options.no_audit {
        let logger = AuditLogger::new(session.session_id())
            .context("Failed to open the audit log (use --no-audit to run without one)")?;
        session = session.with_logger(logger);
    }

    eprintln!();
    eprintln!(
        "  {} Serving {} ({})",
        "▶".green().bold(),
        config.shell.bold(),
        config.site_url.as_str().cyan()
    );
    eprintln!("  Session: {}", session.session_id().dimmed());
    if let Some(logger) = session.logger() {
        eprintln!(
            "  Audit:   {}",
            logger.log_path().display().to_string().dimmed()
        );
    }
    eprintln!();

    let session_id = session.session_id().to_string();
    let mut server = BridgeServer::new(session);
    match options.socket {
        Some(socket) => server.run_socket(&socket).await?,
        None => server.run_stdio().await?,
    }

    tracing::info!("Session {} ended", session_id);
    if !options.no_audit {
        eprintln!(
            "  {} Session ended. Review it: {}",
            "✓".green(),
            format!("navguard log --session {}", session_id).dimmed()
        );
    }
    Ok(())
}
