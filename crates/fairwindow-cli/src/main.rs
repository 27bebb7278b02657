use clap::{Parser, Subcommand};

mod commands;
mod logging;

#[derive(Parser)]
#[command(
    name = "fairwindow-cli",
    version,
    about = "Find the most comfortable daylight window for an outdoor activity"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend the best window for today's activity
    Recommend(commands::recommend::RecommendArgs),
    /// Show civil dawn and dusk
    Twilight(commands::twilight::TwilightArgs),
    /// Score one set of conditions against the configured preferences
    Score(commands::score::ScoreArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    logging::init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Recommend(args) => commands::recommend::run(args),
        Commands::Twilight(args) => commands::twilight::run(args),
        Commands::Score(args) => commands::score::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
