//! navguard — navigation guard for embedded web shells.
//!
//! Keeps your own site inside the app and sends everything else where it
//! belongs: the system browser, the dialer, the mail app.
//!
//! Quick start:
//!   navguard init --domain example.org   # write .navguard.yaml
//!   navguard classify https://x.com      # try a link
//!   navguard serve                       # run the host bridge
//!
//! For more info: navguard --help

use clap::{Parser, Subcommand};
use colored::Colorize;
use navguard::cli;
use std::path::PathBuf;

/// navguard — keeps your site in the app and everything else out of it.
#[derive(Parser)]
#[command(
    name = "navguard",
    version,
    about = "Navigation guard for embedded web shells",
    long_about = "navguard decides, for every navigation inside an embedded web view,\n\
                  whether it stays in the app or is handed to the operating system.\n\n\
                  Quick start:\n  \
                  navguard init --domain example.org   # write a config\n  \
                  navguard classify <url>              # try a link\n  \
                  navguard serve                       # run the host bridge"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a shell config
    Init {
        /// Built-in template (oliva, minimal)
        #[arg(short, long)]
        template: Option<String>,

        /// Domain whose pages stay in the app
        #[arg(short, long)]
        domain: Option<String>,

        /// Start page of the shell
        #[arg(long)]
        site_url: Option<String>,

        /// Where to write the config (default: ./.navguard.yaml)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Validate your shell config
    Check {
        /// Path to config file (default: nearest .navguard.yaml)
        config: Option<PathBuf>,
    },

    /// Show how the shell would treat one or more URLs
    Classify {
        #[arg(required = true)]
        urls: Vec<String>,

        #[arg(short, long, env = "NAVGUARD_CONFIG")]
        config: Option<PathBuf>,

        /// Navigation trigger to evaluate (default: click)
        #[arg(short, long)]
        trigger: Option<String>,
    },

    /// Run the host bridge (JSON lines on stdio or a Unix socket)
    Serve {
        #[arg(short, long, env = "NAVGUARD_CONFIG")]
        config: Option<PathBuf>,

        /// Listen on a Unix socket instead of stdio
        #[arg(long)]
        socket: Option<PathBuf>,

        /// Don't write an audit log
        #[arg(long)]
        no_audit: bool,

        /// Print the page script to inject and exit
        #[arg(long)]
        print_script: bool,
    },

    /// See what the shell did
    Log {
        /// Show a specific session
        #[arg(short, long, help = "Session ID to view")]
        session: Option<String>,

        /// Filter by entry kind
        #[arg(
            short,
            long,
            help = "Filter: navigation, open_request, discarded_message, open_failed, load_failed"
        )]
        kind: Option<String>,

        /// Filter by verdict
        #[arg(short, long, help = "Filter: in_view, external, passthrough, rejected")]
        verdict: Option<String>,

        /// Limit number of entries shown
        #[arg(short, long, help = "Max entries to show")]
        limit: Option<usize>,

        /// Show only the summary
        #[arg(long, help = "Show only the session summary")]
        summary: bool,

        /// List all available sessions
        #[arg(long, help = "List all recorded sessions")]
        list: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Diagnostics go to stderr; stdout may be carrying the bridge protocol.
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    let filter = match "navguard=warn".parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        None => cli::status::run_status(),

        Some(Commands::Init {
            template,
            domain,
            site_url,
            output,
            force,
        }) => cli::init::run_init(cli::init::InitOptions {
            template,
            domain,
            site_url,
            output,
            force,
        })
        .map(|_| ()),

        Some(Commands::Check { config }) => cli::check::run_check(config.as_deref()).map(|_| ()),

        Some(Commands::Classify {
            urls,
            config,
            trigger,
        }) => cli::classify::run_classify(&urls, config.as_deref(), trigger.as_deref()),

        Some(Commands::Serve {
            config,
            socket,
            no_audit,
            print_script,
        }) => {
            cli::serve::run_serve(cli::serve::ServeOptions {
                config_path: config,
                socket,
                no_audit,
                print_script,
            })
            .await
        }

        Some(Commands::Log {
            session,
            kind,
            verdict,
            limit,
            summary,
            list,
        }) => {
            if list {
                cli::log::run_log_list()
            } else {
                cli::log::run_log(
                    session.as_deref(),
                    kind.as_deref(),
                    verdict.as_deref(),
                    limit,
                    summary,
                )
            }
        }
    };

    if let Err(e) = result {
        eprintln!();
        eprintln!("  {} {}", "✗".red().bold(), e);
        for cause in e.chain().skip(1) {
            eprintln!("  {} {}", "caused by:".dimmed(), cause);
        }
        eprintln!();
        std::process::exit(1);
    }
}
