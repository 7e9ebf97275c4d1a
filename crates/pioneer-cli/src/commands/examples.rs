//! `pioneer examples`: examples bundled with installed packages.

use tracing::instrument;

use crate::{context::AppContext, error::CliResult, output::OutputManager};

#[instrument(skip_all)]
pub async fn execute(ctx: &AppContext, output: &OutputManager) -> CliResult<()> {
    let catalog = ctx.catalog.clone();
    let groups = tokio::task::spawn_blocking(move || catalog.examples()).await??;

    if output.is_json() {
        return Ok(output.json(&groups)?);
    }
    if groups.is_empty() {
        output.info("No examples found in installed packages")?;
        return Ok(());
    }

    for group in &groups {
        output.header(&format!("{} {}", group.platform.title, group.platform.version))?;
        for item in &group.items {
            output.print(&format!("  {:<32} {}", item.name, item.path.display()))?;
        }
    }
    Ok(())
}
