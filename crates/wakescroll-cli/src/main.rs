use clap::{CommandFactory, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "wakescroll", version, about = "Wake Scroll CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// XP and streak
    Xp {
        #[command(subcommand)]
        action: commands::xp::XpAction,
    },
    /// Catch-scroll taps
    Catch {
        #[command(subcommand)]
        action: commands::catch::CatchAction,
    },
    /// Journal entries and statistics
    Journal {
        #[command(subcommand)]
        action: commands::journal::JournalAction,
    },
    /// Focus timer sessions and statistics
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Onboarding quiz scoring
    Rating {
        #[command(subcommand)]
        action: commands::rating::RatingAction,
    },
    /// Personal focus goals
    Goals {
        #[command(subcommand)]
        action: commands::goals::GoalsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Xp { action } => commands::xp::run(action),
        Commands::Catch { action } => commands::catch::run(action),
        Commands::Journal { action } => commands::journal::run(action),
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Rating { action } => commands::rating::run(action),
        Commands::Goals { action } => commands::goals::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
