//! `pioneer projects`: summaries of recently opened projects.

use tracing::instrument;

use pioneer_core::domain::ProjectSummary;

use crate::{
    cli::ProjectsArgs, config::AppConfig, context::AppContext, error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(extra = args.dirs.len()))]
pub async fn execute(
    args: ProjectsArgs,
    config: &AppConfig,
    ctx: &AppContext,
    output: &OutputManager,
) -> CliResult<()> {
    let dirs: Vec<_> = config
        .recent_projects
        .iter()
        .chain(args.dirs.iter())
        .map(|dir| ctx.absolute(dir))
        .collect();

    let requested = dirs.len();
    let catalog = ctx.catalog.clone();
    let projects = tokio::task::spawn_blocking(move || catalog.recent_projects(&dirs)).await?;

    if output.is_json() {
        return Ok(output.json(&projects)?);
    }
    if projects.is_empty() {
        output.info("No projects found")?;
        return Ok(());
    }

    output.header("Recent projects:")?;
    for project in &projects {
        for line in summary_lines(project) {
            output.print(&line)?;
        }
    }

    let skipped = requested - projects.len();
    if skipped > 0 {
        output.warning(&format!(
            "{skipped} director{} skipped (missing or not a loadable project)",
            if skipped == 1 { "y" } else { "ies" }
        ))?;
    }
    Ok(())
}

fn summary_lines(project: &ProjectSummary) -> Vec<String> {
    let mut lines = vec![format!("  {}  ({})", project.name, project.path.display())];
    if let Some(description) = &project.description {
        lines.push(format!("      {description}"));
    }
    if !project.envs.is_empty() {
        lines.push(format!("      envs:   {}", project.envs.join(", ")));
    }
    if !project.boards.is_empty() {
        let boards: Vec<&str> = project.boards.iter().map(|b| b.name.as_str()).collect();
        lines.push(format!("      boards: {}", boards.join(", ")));
    }
    lines
}
