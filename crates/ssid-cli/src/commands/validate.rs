use ssid_core::entities::SsidVerdict;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ValidateArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `ssidmap validate`.
pub fn handle(args: &ValidateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let verdicts: Vec<SsidVerdict> = args
        .ssids
        .iter()
        .map(|ssid| ctx.validator.validate(ssid))
        .collect();
    output(&verdicts, flags.format)
}
