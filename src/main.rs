use clap::{Parser, Subcommand, builder::styling};
use eyre::Result;
use itemflow::PipelineConfig;
use owo_colors::OwoColorize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

const CONFIG_ENV: &str = "ITEMFLOW_CONFIG";
const DEFAULT_CONFIG: &str = "pipeline.yml";

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Item Flow: pull items from a source, through a chain of actions, into an exporter
#[derive(Parser)]
#[command(name = "itemflow", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source settings from
    #[arg(short, long, global = true, default_value = ".env")]
    env: String,

    /// More verbose logging
    #[arg(long, global = true)]
    debug: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a pipeline to completion and report what was exported
    Run {
        /// Pipeline configuration file [env: ITEMFLOW_CONFIG] [default: pipeline.yml]
        config: Option<PathBuf>,
    },

    /// Print the first items a pipeline would export, as JSON lines
    Preview {
        /// Pipeline configuration file [env: ITEMFLOW_CONFIG] [default: pipeline.yml]
        config: Option<PathBuf>,

        /// Number of items to pull
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },
}

/// Pick the config path: argument first, then the environment, then the default
///
/// Called after the dotenv file is loaded so `ITEMFLOW_CONFIG` may come from it.
fn resolve_config(arg: Option<PathBuf>, env: Option<OsString>) -> PathBuf {
    arg.or_else(|| env.map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if Path::new(&cli.env).exists() {
        dotenvy::from_filename(&cli.env)?;
    }

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    match cli.command {
        Commands::Run { config } => {
            let config = resolve_config(config, std::env::var_os(CONFIG_ENV));
            log::info!("Running pipeline {}", config.display().bright_black());
            let pipeline = PipelineConfig::from_file(&config)?.build()?;
            let summary = pipeline.run()?;
            log::info!(
                "Exported {} item(s) to {}",
                summary.count.cyan(),
                summary.location.display().bright_black()
            );
        }
        Commands::Preview { config, limit } => {
            let config = resolve_config(config, std::env::var_os(CONFIG_ENV));
            log::info!(
                "Previewing {} item(s) of {}",
                limit.cyan(),
                config.display().bright_black()
            );
            let pipeline = PipelineConfig::from_file(&config)?.build()?;
            for item in pipeline.preview(limit)? {
                println!("{}", serde_json::to_string(&item)?);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_argument_wins() {
        let path = resolve_config(Some("a.yml".into()), Some("b.yml".into()));
        assert_eq!(path, PathBuf::from("a.yml"));
    }

    #[test]
    fn test_config_from_environment() {
        assert_eq!(resolve_config(None, Some("b.yml".into())), PathBuf::from("b.yml"));
        assert_eq!(resolve_config(None, None), PathBuf::from(DEFAULT_CONFIG));
    }

    #[test]
    fn test_cli_parses_without_config() {
        let cli = Cli::try_parse_from(["itemflow", "preview", "-n", "3"]).unwrap();
        match cli.command {
            Commands::Preview { config, limit } => {
                assert!(config.is_none());
                assert_eq!(limit, 3);
            }
            Commands::Run { .. } => panic!("Expected preview"),
        }
    }
}
