mod commands;
mod logging;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use spellfloat_core::settings::{self, default_settings_path};
use spellfloat_types::OverlaySettings;

#[derive(Parser)]
#[command(version, about = "Floating spell indicators driven by a game log")]
struct Cli {
    /// Settings file [default: <config dir>/spellfloat/config.json]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Tail this log file instead of the configured one
    #[arg(short, long, global = true)]
    log_file: Option<PathBuf>,

    /// Write the effective settings back to the settings file
    #[arg(long, global = true)]
    save: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default settings file
    Init {
        #[arg(long)]
        force: bool,
    },
    /// Validate rules and assets
    Check {
        /// Classify every line of this log and print the groups
        #[arg(short, long)]
        sample: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let _log_guard = logging::init_logging();
    let cli = Cli::parse();

    let Some(config_path) = cli.config.clone().or_else(default_settings_path) else {
        tracing::error!("no config directory available, pass --config");
        return ExitCode::FAILURE;
    };

    let result = match &cli.command {
        Some(Commands::Init { force }) => commands::init(&config_path, *force),
        Some(Commands::Check { sample }) => load_settings(&cli, &config_path)
            .and_then(|settings| commands::check(&settings, sample.as_deref())),
        None => match load_settings(&cli, &config_path) {
            Ok(settings) => commands::run(settings).await,
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Load settings and apply command-line overrides.
fn load_settings(cli: &Cli, config_path: &Path) -> Result<OverlaySettings, String> {
    let mut settings = settings::load_or_default(config_path);

    if let Some(log_file) = &cli.log_file {
        settings.log_file = std::path::absolute(log_file).map_err(|e| e.to_string())?;
    }
    if cli.save {
        settings::save(config_path, &settings).map_err(|e| e.to_string())?;
    }
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::ffi::OsStr;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_check_accepts_global_flags() {
        let cli = Cli::try_parse_from([
            "spellfloat",
            "check",
            "--sample",
            "sample.txt",
            "--config",
            "cfg.json",
        ])
        .unwrap();
        assert_eq!(cli.config.as_deref(), Some(Path::new("cfg.json")));
        assert!(matches!(
            cli.command,
            Some(Commands::Check { sample: Some(ref p) }) if p == Path::new("sample.txt")
        ));
    }

    #[test]
    fn test_log_file_override_and_save() {
        let tmp = tempfile::tempdir().unwrap();
        let config = tmp.path().join("config.json");
        let log = tmp.path().join("eqlog.txt");
        let cli = Cli::try_parse_from([
            OsStr::new("spellfloat"),
            OsStr::new("--log-file"),
            log.as_os_str(),
            OsStr::new("--save"),
        ])
        .unwrap();

        let settings = load_settings(&cli, &config).unwrap();
        assert_eq!(settings.log_file, log);
        assert_eq!(settings::load(&config).unwrap().log_file, log);
    }
}
