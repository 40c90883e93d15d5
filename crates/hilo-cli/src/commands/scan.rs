use hilo_config::HiloConfig;
use hilo_links::TextNormalizer;
use hilo_scan::PatternScanner;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ScanArgs;
use crate::output::output;

/// Handle `hilo scan`. The text is normalized first, as in a batch run.
pub fn handle(args: &ScanArgs, flags: &GlobalFlags, config: &HiloConfig) -> anyhow::Result<()> {
    let scanner = PatternScanner::from_config(&config.patterns)?;
    let text = TextNormalizer::builtin()?.normalize(&args.text);

    if args.context {
        let names: Vec<&str> = args.patterns.iter().map(String::as_str).collect();
        return output(&scanner.scan_with_context(&text, &names)?, flags.format);
    }
    let dense = args.dense || scanner.options().dense;
    output(&scanner.scan_with(&text, dense), flags.format)
}
