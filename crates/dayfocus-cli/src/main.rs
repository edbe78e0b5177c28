use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod render;
mod shell;

#[derive(Parser)]
#[command(name = "dayfocus", version, about = "Focus timer and daily checklist")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive focus session
    Run(commands::run::RunArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("DAYFOCUS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "dayfocus", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_accepts_overrides() {
        let cli = Cli::try_parse_from([
            "dayfocus",
            "run",
            "--json",
            "--duration",
            "60",
            "--sessions",
            "2",
        ])
        .unwrap();
        match cli.command {
            Commands::Run(args) => {
                assert!(args.json);
                assert_eq!(args.duration, Some(60));
                assert_eq!(args.sessions, Some(2));
                assert_eq!(args.tick_ms, None);
            }
            _ => panic!("Expected run"),
        }
    }

    #[test]
    fn config_set_needs_key_and_value() {
        assert!(Cli::try_parse_from(["dayfocus", "config", "set", "session.total"]).is_err());
        assert!(Cli::try_parse_from(["dayfocus", "config", "set", "session.total", "3"]).is_ok());
    }
}
