//! `generate-data`: the data document only.

use crate::cli::{CommandContext, GenerateDataArgs};
use crate::commands::utils::{get_cwd, resolve_path, run_analysis, write_document};
use crate::config::{AnalyzerConfig, ConfigOverrides, Mode};
use crate::error::Result;
use crate::ui;

/// Execute the generate-data command.
pub async fn execute(args: GenerateDataArgs, ctx: &CommandContext) -> Result<()> {
    let cwd = get_cwd()?;
    let config = AnalyzerConfig::load(
        &ConfigOverrides::from(&args),
        ctx.config_path.as_deref(),
        &cwd,
    )?;
    let options = config.validate(Mode::GenerateData, &cwd)?;
    let out_file = resolve_path(&args.out_file, &cwd);

    let data = run_analysis(options, ctx.quiet).await?;
    let size = write_document(&data, &out_file, config.pretty).await?;

    if !ctx.quiet {
        ui::success(&format!(
            "Wrote {} ({})",
            out_file.display(),
            ui::format_size(size)
        ));
        ui::print_analysis_summary(&data);
    }

    Ok(())
}
