use ataxia_screen::config::Config;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::process;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON parameter profile. Options typed on the command line still win.
    #[arg(global = true, short, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a recorded pointer trace through the line-drawing test.
    Motor(cmd::motor::MotorArgs),
    /// Score read-aloud recordings.
    Speech(cmd::speech::SpeechArgs),
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(cli_config: &Config, profile: Option<&str>, sub_matches: &ArgMatches) -> Config {
    let Some(path) = profile else {
        return cli_config.clone();
    };
    info!("⚖️  Loading parameters from: {}", path);
    match Config::load_from_file(path) {
        Ok(mut file_config) => {
            file_config.merge_from_cli(cli_config, sub_matches);
            file_config
        }
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    init_logging(cli.debug);
    info!("🚀 Initializing ataxia-screen...");

    let Some((_, sub_matches)) = matches.subcommand() else {
        error!("No subcommand given");
        process::exit(2);
    };

    let cli_config = match &cli.command {
        Commands::Motor(args) => &args.config,
        Commands::Speech(args) => &args.config,
    };
    let config = resolve_config(cli_config, cli.config.as_deref(), sub_matches);

    if let Err(e) = config.validate() {
        error!("❌ {}", e);
        process::exit(1);
    }
    if cli.config.is_none() {
        warn!("⚠️  No parameter profile loaded. Using embedded defaults.");
    }

    let result = match cli.command {
        Commands::Motor(args) => cmd::motor::run(args, config),
        Commands::Speech(args) => cmd::speech::run(args, config),
    };

    if let Err(e) = result {
        error!("\n❌ FATAL ERROR:");
        error!("   {}", e);
        process::exit(1);
    }
}
