use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Analyze chat exports and write per-chat artifacts.
    Analyze(AnalyzeArgs),
    /// Classify URLs into link descriptors.
    Classify(ClassifyArgs),
    /// Normalize message text.
    Normalize(TextArgs),
    /// Run the pattern catalog over a text.
    Scan(ScanArgs),
    /// Score the sentiment of a text.
    Sentiment(TextArgs),
    /// List artifact schemas or print one.
    Schema(SchemaArgs),
    /// Print the effective configuration.
    Config,
}

#[derive(Clone, Debug, Args)]
pub struct AnalyzeArgs {
    /// Export directory holding chats.json and one messages file per chat.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Artifact directory (defaults to pipeline.output_dir).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only analyze these chat ids (repeatable).
    #[arg(long = "chat", value_name = "ID")]
    pub chats: Vec<i64>,

    /// Skip messages before this instant (RFC 3339 or YYYY-MM-DD).
    #[arg(long, value_parser = parse_start)]
    pub from: Option<DateTime<Utc>>,

    /// Skip messages after this instant (RFC 3339 or YYYY-MM-DD, inclusive).
    #[arg(long, value_parser = parse_end)]
    pub to: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Args)]
pub struct ClassifyArgs {
    #[arg(required = true)]
    pub urls: Vec<String>,
}

#[derive(Clone, Debug, Args)]
pub struct TextArgs {
    pub text: String,
}

#[derive(Clone, Debug, Args)]
pub struct ScanArgs {
    pub text: String,

    /// Summarize matches with surrounding context instead of listing them.
    #[arg(long)]
    pub context: bool,

    /// Include patterns without matches.
    #[arg(long, conflicts_with = "context")]
    pub dense: bool,

    /// Restrict the context summary to these patterns (repeatable).
    #[arg(long = "pattern", value_name = "NAME", requires = "context")]
    pub patterns: Vec<String>,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Schema name; lists every name when omitted.
    pub name: Option<String>,
}

fn parse_start(raw: &str) -> Result<DateTime<Utc>, String> {
    parse_instant(raw, NaiveTime::MIN)
}

fn parse_end(raw: &str) -> Result<DateTime<Utc>, String> {
    let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    parse_instant(raw, end_of_day)
}

/// RFC 3339, or a bare date taken at `time` UTC.
fn parse_instant(raw: &str, time: NaiveTime) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| date.and_time(time).and_utc())
        .map_err(|_| format!("expected RFC 3339 or YYYY-MM-DD, got '{raw}'"))
}
