use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use prompterm_core::AppConfig;

mod commands;
mod logging;

use commands::run::RunArgs;

#[derive(Parser)]
#[command(name = "prompterm")]
#[command(author, version, about = "A terminal teleprompter with smooth auto-scrolling")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (defaults to ~/.config/prompterm/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the teleprompter
    Run(RunArgs),
    /// Estimate reading time for a script
    Estimate {
        /// Script file
        script: PathBuf,
        /// Speed level, 1-10 (defaults to the configured speed)
        #[arg(short, long, allow_negative_numbers = true)]
        speed: Option<i64>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Save a date-stamped copy of a script
    Export {
        /// Script file
        script: PathBuf,
        /// Directory to write into
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Show the config file location
    Config {
        /// Write the default configuration if none exists
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    let config = Arc::new(config);
    let config_path = cli.config.unwrap_or_else(AppConfig::config_path);

    match cli.command.unwrap_or_else(|| Commands::Run(RunArgs::default())) {
        Commands::Run(args) => {
            let guard = logging::init_file(&config)?;
            tracing::info!(log_file = %guard.log_file.display(), "Logging to file");
            commands::run::check_args(&args);
            commands::run::run(config, args).await
        }
        Commands::Estimate {
            script,
            speed,
            json,
        } => {
            logging::init_stderr(&config)?;
            commands::estimate::run(&config, &script, speed, json).await
        }
        Commands::Export { script, out_dir } => {
            logging::init_stderr(&config)?;
            commands::export::run(&script, &out_dir).await
        }
        Commands::Config { init } => {
            logging::init_stderr(&config)?;
            commands::config::run(&config_path, init)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_is_the_default_command() {
        let cli = Cli::try_parse_from(["prompterm"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_run_flags() {
        let cli = Cli::try_parse_from([
            "prompterm",
            "run",
            "talk.txt",
            "--speed",
            "7",
            "--mirror",
            "--margin",
            "10",
        ])
        .unwrap();

        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.script, Some(PathBuf::from("talk.txt")));
        assert_eq!(args.speed, Some(7));
        assert!(args.mirror);
        assert_eq!(args.margin, Some(10));
    }

    #[test]
    fn test_parse_estimate_json() {
        let cli = Cli::try_parse_from(["prompterm", "estimate", "talk.txt", "-s", "-3", "--json"])
            .unwrap();
        match cli.command {
            Some(Commands::Estimate { speed, json, .. }) => {
                assert_eq!(speed, Some(-3));
                assert!(json);
            }
            _ => panic!("expected estimate command"),
        }
    }
}
