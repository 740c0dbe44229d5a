use anyhow::Context;
use blendjobs_handler::{HandlerConfig, HttpFetcher, JobRequest, handle};
use blendjobs_parser::{ScanMode, ScanOptions, plan_jobs, scan_path};
use std::io::Read;
use std::path::{Path, PathBuf};

pub fn cmd_scenes(file: &Path, options: &ScanOptions, json: bool) -> anyhow::Result<()> {
    let report = scan_path(file, options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let Some(header) = report.header else {
        println!("not a blend file: {}", file.display());
        return Ok(());
    };
    println!(
        "{} ({:?}, {:?} pointers, {:?} endian, version {})",
        file.display(),
        report.compression,
        header.pointer_width,
        header.endian,
        header.version_str().unwrap_or("?")
    );
    if report.scenes.is_empty() {
        println!("  no scene records");
    }
    for (i, scene) in report.scenes.iter().enumerate() {
        let marker = if scene.name.is_raw() { " (raw bytes)" } else { "" };
        println!(
            "  [{i}] {}{marker}: frames {}..={} ({} frames)",
            scene.name,
            scene.start_frame,
            scene.end_frame,
            scene.frame_count()
        );
    }
    Ok(())
}

pub fn cmd_jobs(
    file: &Path,
    frames_per_job: u32,
    options: &ScanOptions,
    json: bool,
) -> anyhow::Result<()> {
    let report = scan_path(file, options)?;
    let plan = plan_jobs(&report.scenes, frames_per_job)
        .with_context(|| format!("cannot size jobs for {}", file.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        println!("frames:         {}", plan.frame_count);
        println!("frames per job: {}", plan.frames_per_job);
        println!("jobs:           {}", plan.job_count);
    }
    Ok(())
}

pub fn cmd_handle(
    event: &Path,
    download_dir: Option<PathBuf>,
    texture_key: Option<String>,
    mode: ScanMode,
) -> anyhow::Result<()> {
    let raw = if event == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("read request from stdin")?;
        buf
    } else {
        std::fs::read_to_string(event)
            .with_context(|| format!("read request: {}", event.display()))?
    };
    let request = JobRequest::from_json(&raw)?;

    let mut config = HandlerConfig::from_env();
    if let Some(dir) = download_dir {
        config.download_dir = dir;
    }
    if let Some(key) = texture_key {
        config.texture_key = key;
    }
    config.scan_mode = mode;

    let fetcher = HttpFetcher::new(&config)?;
    let response = handle(&request, &config, &fetcher)?;
    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}
