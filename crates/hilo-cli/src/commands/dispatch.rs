use crate::bootstrap;
use crate::cli::{Commands, GlobalFlags};
use crate::commands;
use crate::exit::ExitStatus;

/// Route a parsed command to its handler.
pub async fn dispatch(command: Commands, flags: &GlobalFlags) -> anyhow::Result<ExitStatus> {
    match command {
        Commands::Classify(args) => commands::classify::handle(&args, flags)?,
        Commands::Schema(args) => commands::schema::handle(&args, flags)?,
        Commands::Normalize(args) => commands::normalize::handle(&args, flags)?,
        Commands::Scan(args) => commands::scan::handle(&args, flags, &bootstrap::load_config()?)?,
        Commands::Sentiment(args) => {
            commands::sentiment::handle(&args, flags, &bootstrap::load_config()?)?;
        }
        Commands::Config => commands::config::handle(flags, &bootstrap::load_config()?)?,
        Commands::Analyze(args) => {
            return commands::analyze::handle(&args, flags, bootstrap::load_config()?).await;
        }
    }
    Ok(ExitStatus::Success)
}
