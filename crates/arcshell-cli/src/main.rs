//! arcshell CLI - shell over a filesystem stored in one archive
//!
//! Usage:
//!   arcshell                                   # reads ./config.yaml
//!   arcshell -c path/to/config.yaml            # explicit config file
//!   arcshell -u alice -f fs.zip -l log.csv     # no config file needed
//!   arcshell < commands.txt                    # non-interactive
//!
//! The start script from the configuration runs first. Afterwards lines
//! come from the terminal (with line editing) or from piped stdin.

mod interactive;

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use arcshell::{Chain, ReaderLines, ScriptLines, Session, ShellConfig};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// arcshell - shell emulator over a zip or tar archive
#[derive(Parser, Debug)]
#[command(name = "arcshell")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Session user (overrides the config file)
    #[arg(short, long)]
    user: Option<String>,

    /// Archive backing the filesystem (overrides the config file)
    #[arg(short, long)]
    filesystem: Option<PathBuf>,

    /// Audit log path (overrides the config file)
    #[arg(short, long)]
    log: Option<PathBuf>,

    /// Start script (overrides the config file)
    #[arg(short, long, conflicts_with = "no_script")]
    script: Option<PathBuf>,

    /// Do not run any start script
    #[arg(long)]
    no_script: bool,

    /// Raise diagnostic verbosity on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Build the session configuration from the config file and flag overrides.
///
/// The config file may be absent when user, archive and log are all given
/// on the command line.
fn load_config(args: &Args) -> Result<ShellConfig> {
    let mut config = match (&args.user, &args.filesystem, &args.log) {
        (Some(user), Some(filesystem), Some(log)) if !args.config.exists() => {
            ShellConfig::new(user.clone(), filesystem.clone(), log.clone())
        }
        _ => ShellConfig::load(&args.config)
            .with_context(|| format!("Failed to load config: {}", args.config.display()))?,
    };

    if let Some(user) = &args.user {
        config.username = user.clone();
    }
    if let Some(filesystem) = &args.filesystem {
        config.filesystem_path = filesystem.clone();
    }
    if let Some(log) = &args.log {
        config.log_path = log.clone();
    }
    if let Some(script) = &args.script {
        config.start_script = Some(script.clone());
    }
    if args.no_script {
        config.start_script = None;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "error",
        1 => "warn",
        2 => "info",
        3 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(&args)?;
    let mut session = Session::open(&config)
        .await
        .context("Failed to start session")?;
    let script: ScriptLines = session
        .start_script()
        .await
        .context("Failed to read start script")?;

    let mut out = std::io::stdout();
    let mut err = std::io::stderr();

    if std::io::stdin().is_terminal() {
        let mut source = Chain::new(script, interactive::Interactive::new()?);
        session.run(&mut source, &mut out, &mut err).await?;
    } else {
        let mut source = Chain::new(script, ReaderLines::new(std::io::stdin().lock()));
        session.run(&mut source, &mut out, &mut err).await?;
    }

    Ok(())
}
