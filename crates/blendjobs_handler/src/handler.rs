use crate::config::HandlerConfig;
use crate::error::Result;
use crate::event::{JobRequest, JobResponse};
use crate::fetch::{Fetcher, ObjectUri};
use blendjobs_parser::plan_jobs_for_path;

/// Fetch the input and its texture, then size the render array job.
///
/// Scan failures (including a file with no scene record) are returned, never
/// turned into a response.
pub fn handle(
    request: &JobRequest,
    config: &HandlerConfig,
    fetcher: &dyn Fetcher,
) -> Result<JobResponse> {
    let input = ObjectUri::parse(&request.input_uri)?;
    let blend_path = fetcher.fetch(&input)?;
    let texture_path = fetcher.fetch(&input.sibling(&config.texture_key)?)?;

    let plan = plan_jobs_for_path(
        &blend_path,
        request.frames_per_job,
        &config.scan_options(),
    )?;
    log::info!(
        "{input}: {} frames -> array job size {}",
        plan.frame_count,
        plan.job_count
    );

    Ok(JobResponse::ok(
        plan.job_count,
        texture_path.to_string_lossy().into_owned(),
    ))
}

/// JSON in, JSON out.
pub fn handle_json(json: &str, config: &HandlerConfig, fetcher: &dyn Fetcher) -> Result<String> {
    let request = JobRequest::from_json(json)?;
    let response = handle(&request, config, fetcher)?;
    Ok(serde_json::to_string(&response)?)
}
