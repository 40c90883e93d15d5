use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `hilo` binary.
#[derive(Debug, Parser)]
#[command(name = "hilo", version, about = "Hilo - chat conversation analysis")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only, no progress)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    #[must_use]
    pub const fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;

    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_on_either_side() {
        let cli = Cli::try_parse_from(["hilo", "--format", "raw", "config", "--verbose"])
            .expect("cli should parse");
        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Config));
    }

    #[test]
    fn analyze_takes_repeated_chats_and_a_window() {
        let cli = Cli::try_parse_from([
            "hilo", "analyze", "--input", "export", "--chat", "1", "--chat", "7", "--from",
            "2024-05-01", "--to", "2024-05-31",
        ])
        .expect("cli should parse");
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.chats, [1, 7]);
        assert!(args.output.is_none());
        assert!(args.from.unwrap() < args.to.unwrap());
    }

    #[test]
    fn invalid_combinations_are_rejected() {
        assert!(Cli::try_parse_from(["hilo", "--format", "table", "config"]).is_err());
        assert!(Cli::try_parse_from(["hilo", "-q", "-v", "config"]).is_err());
        assert!(Cli::try_parse_from(["hilo", "classify"]).is_err());
        assert!(Cli::try_parse_from(["hilo", "scan", "x", "--context", "--dense"]).is_err());
        assert!(Cli::try_parse_from(["hilo", "scan", "x", "--pattern", "emails"]).is_err());
        assert!(Cli::try_parse_from(["hilo", "analyze"]).is_err());
    }
}
