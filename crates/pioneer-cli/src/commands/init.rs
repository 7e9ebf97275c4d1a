//! `pioneer init`: initialise a project for a board.

use serde_json::json;
use tracing::instrument;

use crate::{cli::InitArgs, context::AppContext, error::CliResult, output::OutputManager};

#[instrument(skip_all, fields(board = %args.board))]
pub async fn execute(args: InitArgs, ctx: &AppContext, output: &OutputManager) -> CliResult<()> {
    let dir = ctx.absolute(&args.dir);

    let spinner = output.spinner(&format!("Initialising project for {}", args.board));
    let result = ctx
        .scaffold
        .init(&args.board, args.framework.as_deref(), &dir)
        .await;
    spinner.finish_and_clear();
    let project_dir = result?;

    if output.is_json() {
        return Ok(output.json(&json!({ "projectDir": project_dir }))?);
    }
    output.success(&format!("Project initialised in {}", project_dir.display()))?;
    Ok(())
}
