use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use tabula_cli::{CliError, ConfigError, ConsoleConfig, DEFAULT_CONFIG_FILE, Session, Terminal};
use tabula_sqlite::{open_store, store_path};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "TABULA_LOG";

#[derive(Debug, Parser)]
#[command(name = "tabula", version)]
#[command(about = "Browse and edit a SQLite store from a keyboard-driven console")]
struct Cli {
    /// YAML settings file (default: .tabula.yml in the working directory).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write a settings file with the defaults (to --config, or .tabula.yml
    /// in the working directory) and exit.
    #[arg(long)]
    write_config: bool,
    /// Store name; the configured extension is appended.
    databases: Vec<String>,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version print to stdout and succeed.
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            let err = CliError::Usage(err);
            eprint!("{err}");
            return err.exit_code();
        }
    };
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            err.exit_code()
        }
    }
}

fn run(cli: Cli) -> tabula_cli::Result<()> {
    let cwd = std::env::current_dir().map_err(CliError::WorkingDir)?;
    if cli.write_config {
        let path = cli
            .config
            .unwrap_or_else(|| cwd.join(DEFAULT_CONFIG_FILE));
        return write_default_config(&path);
    }

    let name = match cli.databases.as_slice() {
        [] => return Err(CliError::NoDatabase),
        [name] => name.clone(),
        _ => return Err(CliError::TooManyArguments),
    };

    let config = match &cli.config {
        Some(path) => ConsoleConfig::load(path)?,
        None => ConsoleConfig::discover(&cwd)?,
    };
    init_logging(&config)?;

    let path = store_path(&cwd, &name, config.extension());
    let conn = open_store(&path).map_err(CliError::Open)?;
    println!("Database Selected: {name}");

    let mut session = Session::new(conn, config, Terminal::new(), name).with_workdir(cwd);
    session.run()?;
    Ok(())
}

/// Writes the default settings to `path`, refusing to replace a file that
/// is already there.
fn write_default_config(path: &Path) -> tabula_cli::Result<()> {
    if path.exists() {
        return Err(ConfigError::Invalid(format!(
            "{} already exists and was left unchanged",
            path.display()
        ))
        .into());
    }
    ConsoleConfig::default().save(path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Installs the `tracing` subscriber.
///
/// The filter comes from `TABULA_LOG` (default `warn`). Output goes to the
/// configured log file so it never lands on the console screen, or to
/// stderr when no file is set.
fn init_logging(config: &ConsoleConfig) -> tabula_cli::Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|err| CliError::Logging(format!("{}: {err}", path.display())))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    installed.map_err(|err| CliError::Logging(err.to_string()))
}
