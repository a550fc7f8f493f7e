//! `generate`: the static devtools page plus its data file.

use crate::cli::{CommandContext, GenerateArgs};
use crate::commands::utils::{
    copy_dir_all, ensure_output_dir, get_cwd, resolve_path, run_analysis, write_document,
};
use crate::config::{AnalyzerConfig, ConfigOverrides, Mode};
use crate::error::Result;
use crate::ui;

/// File name of the data document inside the output directory.
pub const DATA_FILE_NAME: &str = "rolldown-data.json";

/// Execute the generate command.
///
/// # Process
///
/// 1. Load and validate configuration (`publicDir` required)
/// 2. Analyze the event log
/// 3. Copy the frontend into the output directory
/// 4. Write `rolldown-data.json` next to it
pub async fn execute(args: GenerateArgs, ctx: &CommandContext) -> Result<()> {
    let cwd = get_cwd()?;
    let config = AnalyzerConfig::load(
        &ConfigOverrides::from(&args),
        ctx.config_path.as_deref(),
        &cwd,
    )?;
    let options = config.validate(Mode::Generate, &cwd)?;
    let public_dir = config.public_dir(&cwd)?;
    let out_dir = resolve_path(&args.out_dir, &cwd);

    let data = run_analysis(options, ctx.quiet).await?;

    ensure_output_dir(&out_dir)?;
    let copied = {
        let (src, dst) = (public_dir.clone(), out_dir.clone());
        tokio::task::spawn_blocking(move || copy_dir_all(&src, &dst)).await??
    };
    tracing::debug!("Copied {} files from {}", copied, public_dir.display());

    let data_path = out_dir.join(DATA_FILE_NAME);
    let size = write_document(&data, &data_path, config.pretty).await?;

    if !ctx.quiet {
        ui::success(&format!(
            "Generated {} ({} static files, {} data)",
            out_dir.display(),
            copied,
            ui::format_size(size)
        ));
        ui::print_analysis_summary(&data);
    }

    Ok(())
}
