//! `pioneer import-arduino` and `pioneer import-pio`.

use std::path::Path;

use serde_json::json;
use tracing::instrument;

use crate::{
    cli::{ImportArduinoArgs, ImportPioArgs},
    context::AppContext,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(sketch = %args.sketch.display()))]
pub async fn arduino(
    args: ImportArduinoArgs,
    ctx: &AppContext,
    output: &OutputManager,
) -> CliResult<()> {
    let sketch = ctx.absolute(&args.sketch);

    let spinner = output.spinner("Importing Arduino sketch");
    let result = ctx
        .scaffold
        .import_arduino(&args.board, args.arduino_libs, &sketch)
        .await;
    spinner.finish_and_clear();

    report(&result?, output)
}

#[instrument(skip_all, fields(source = %args.source.display()))]
pub async fn pio(args: ImportPioArgs, ctx: &AppContext, output: &OutputManager) -> CliResult<()> {
    let source = ctx.absolute(&args.source);

    let spinner = output.spinner("Importing project");
    let result = ctx.scaffold.import_pio(&source).await;
    spinner.finish_and_clear();

    report(&result?, output)
}

fn report(project_dir: &Path, output: &OutputManager) -> CliResult<()> {
    if output.is_json() {
        return Ok(output.json(&json!({ "projectDir": project_dir }))?);
    }
    output.success(&format!("Project imported to {}", project_dir.display()))?;
    Ok(())
}
