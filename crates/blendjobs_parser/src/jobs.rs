//! Render batch sizing from the first scene's frame range.

use crate::error::{BlendError, Result};
use crate::scene::SceneRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JobPlan {
    pub frame_count: i64,
    /// Frames per job after clamping to the frame count. Negative for a reversed range.
    pub frames_per_job: i64,
    pub job_count: i64,
}

/// Frame count of the first scene. Later scenes are ignored.
pub fn frame_count(scenes: &[SceneRecord]) -> Result<i64> {
    scenes
        .first()
        .map(SceneRecord::frame_count)
        .ok_or(BlendError::NoSceneRecords)
}

/// Ceiling of `a / b` for either sign. `b` must be non-zero.
fn div_ceil(a: i64, b: i64) -> i64 {
    let q = a / b;
    if a % b != 0 && (a < 0) == (b < 0) {
        q + 1
    } else {
        q
    }
}

/// Number of jobs of at most `frames_per_job` frames needed to cover the first scene.
///
/// A reversed range yields a negative frame count which flows through the
/// clamp and the division unchanged; only an empty range is an error.
pub fn plan_jobs(scenes: &[SceneRecord], frames_per_job: u32) -> Result<JobPlan> {
    let first = scenes.first().ok_or(BlendError::NoSceneRecords)?;
    if frames_per_job == 0 {
        return Err(BlendError::InvalidFramesPerJob(frames_per_job));
    }

    let frame_count = first.frame_count();
    if frame_count == 0 {
        return Err(BlendError::EmptyFrameRange {
            start: first.start_frame,
            end: first.end_frame,
        });
    }

    let per_job = i64::from(frames_per_job).min(frame_count);
    let plan = JobPlan {
        frame_count,
        frames_per_job: per_job,
        job_count: div_ceil(frame_count, per_job),
    };
    log::info!(
        "{} frames in {} job(s) of up to {} frames",
        plan.frame_count,
        plan.job_count,
        plan.frames_per_job
    );
    Ok(plan)
}
