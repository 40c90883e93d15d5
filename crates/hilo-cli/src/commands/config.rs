use hilo_config::HiloConfig;

use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `hilo config`: the merged configuration after every layer.
pub fn handle(flags: &GlobalFlags, config: &HiloConfig) -> anyhow::Result<()> {
    output(config, flags.format)
}
