//! `pioneer describe`: platform, board and frameworks of one environment.

use tracing::instrument;

use pioneer_core::domain::EnvironmentDescriptor;

use crate::{cli::DescribeArgs, context::AppContext, error::CliResult, output::OutputManager};

#[instrument(skip_all, fields(env = %args.env))]
pub async fn execute(
    args: DescribeArgs,
    ctx: &AppContext,
    output: &OutputManager,
) -> CliResult<()> {
    let project_dir = ctx.absolute(&args.project);
    let environments = ctx.environments.clone();
    let env = args.env;
    let descriptor =
        tokio::task::spawn_blocking(move || environments.describe(&project_dir, &env)).await??;

    if output.is_json() {
        return Ok(output.json(&descriptor)?);
    }
    for line in describe_lines(&descriptor) {
        output.print(&line)?;
    }
    Ok(())
}

fn describe_lines(descriptor: &EnvironmentDescriptor) -> Vec<String> {
    let platform = &descriptor.platform;
    let mut lines = vec![format!(
        "Platform:   {} ({} {})",
        platform.title, platform.name, platform.version
    )];

    match &descriptor.board {
        Some(board) => {
            let mcu = board.mcu.as_deref().unwrap_or("unknown MCU");
            lines.push(format!("Board:      {} ({}, {mcu})", board.name, board.id));
        }
        None => lines.push("Board:      none".into()),
    }

    match &descriptor.frameworks {
        Some(frameworks) => {
            let names: Vec<String> = frameworks
                .iter()
                .map(|f| {
                    let title = f.title.as_deref().unwrap_or(&f.name);
                    format!("{title} {}", f.version)
                })
                .collect();
            lines.push(format!("Frameworks: {}", names.join(", ")));
        }
        None => lines.push("Frameworks: none".into()),
    }
    lines
}
