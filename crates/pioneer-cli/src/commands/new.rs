//! `pioneer new`: create a project from a platform/board/framework selection.
//!
//! The request comes either from flags or, for front ends, from a JSON
//! document with the same shape the core deserializes.

use tracing::{debug, instrument};

use pioneer_core::{
    application::InitOptions, domain::ProjectRequest, error::PioneerError,
};

use crate::{
    cli::NewArgs,
    commands::read_file_or_stdin,
    context::AppContext,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all)]
pub async fn execute(args: NewArgs, ctx: &AppContext, output: &OutputManager) -> CliResult<()> {
    let options = InitOptions {
        stdout_notification_method: args.stdout_method.clone(),
    };
    let request = build_request(args, ctx)?;
    debug!(
        project_dir = %request.project_dir().display(),
        platform = %request.platform_pin(),
        "Request resolved"
    );

    let spinner = output.spinner(&format!("Creating {}", request.name));
    let result = ctx.scaffold.init_v2(&request, &options).await;
    spinner.finish_and_clear();
    let outcome = result?;

    if output.is_json() {
        return Ok(output.json(&outcome)?);
    }
    let tool_output = outcome.output.stdout.trim_end();
    if !tool_output.is_empty() {
        output.print(tool_output)?;
    }
    output.success(&format!(
        "Project created in {}",
        outcome.project_dir.display()
    ))?;
    Ok(())
}

fn build_request(args: NewArgs, ctx: &AppContext) -> CliResult<ProjectRequest> {
    if let Some(path) = &args.request {
        let text = read_file_or_stdin(path)?;
        let mut request: ProjectRequest = serde_json::from_str(&text)
            .with_cli_context(|| format!("parsing request {}", path.display()))?;
        request.location = ctx.absolute(&request.location);
        request.validate().map_err(PioneerError::from)?;
        return Ok(request);
    }

    // clap guarantees both are present without --request.
    let name = args.name.unwrap_or_default();
    let platform = args.platform.unwrap_or_default();

    let mut builder = ProjectRequest::builder()
        .location(ctx.absolute(&args.location))
        .name(name)
        .platform(platform, args.platform_version)
        .prerelease(args.prerelease);
    if let Some(board) = args.board {
        builder = builder.board(board);
    }
    if let Some(framework) = args.framework {
        builder = builder.framework(framework);
    }
    if let Some(description) = args.description {
        builder = builder.description(description);
    }
    Ok(builder.build().map_err(PioneerError::from)?)
}
