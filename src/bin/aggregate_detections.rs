//! aggregate_detections - collect per-frame raw detection files into one
//! per-video file, sorted by frame number.

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use regex::Regex;
use std::path::{Path, PathBuf};

use hoa_detections::io;
use hoa_detections::raw::FrameDetections;

#[path = "../ui.rs"]
mod ui;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Directory containing per-frame raw detection files (*.det). The
    /// directory name must be the video ID (e.g. P01_101).
    input_dir: PathBuf,
    /// Path to write the aggregated per-video detection file to.
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let progress = ui::Progress::auto();

    let video_id = video_id_from_dir(&args.input_dir)?;
    let paths = {
        let _stage = progress.stage("Scan input directory");
        frame_file_paths(&args.input_dir)?
    };
    if paths.is_empty() {
        bail!("no *.det files found in {}", args.input_dir.display());
    }

    let mut video_detections: Vec<FrameDetections> = Vec::with_capacity(paths.len());
    let bar = progress.counter(paths.len() as u64, "Load frames");
    for path in &paths {
        let mut frame = io::load_raw_frame_detections(path)?;
        // Early detector runs wrote the participant ID into video_id;
        // the directory name is authoritative.
        if frame.video_id != video_id {
            log::debug!(
                "overriding video_id {:?} with {:?} for {}",
                frame.video_id,
                video_id,
                path.display()
            );
            frame.video_id = video_id.clone();
        }
        video_detections.push(frame);
        bar.inc(1);
    }
    bar.finish_and_clear();

    video_detections.sort_by_key(|detections| detections.frame_number);

    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    {
        let _stage = progress.stage("Write per-video file");
        io::save_raw_detections(&args.output, &video_detections)?;
    }
    log::info!(
        "aggregated {} frame records for {} into {}",
        video_detections.len(),
        video_id,
        args.output.display()
    );
    Ok(())
}

fn video_id_from_dir(input_dir: &Path) -> Result<String> {
    let name = input_dir
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("input directory has no usable name"))?;
    let pattern = Regex::new(r"^P\d+_\d+$").expect("static regex");
    if !pattern.is_match(name) {
        bail!(
            "input directory name must be the video ID (e.g. P01_101), got {:?}",
            name
        );
    }
    Ok(name.to_string())
}

/// Per-frame files sorted by their numeric suffix, so `frame_10.det` comes
/// after `frame_9.det` rather than after `frame_1.det`.
fn frame_file_paths(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let suffix = Regex::new(r"(\d+)\.det$").expect("static regex");
    let mut indexed: Vec<(u64, PathBuf)> = Vec::new();
    for entry in std::fs::read_dir(input_dir)
        .with_context(|| format!("reading {}", input_dir.display()))?
    {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if !name.ends_with(".det") {
            continue;
        }
        let captures = suffix
            .captures(name)
            .ok_or_else(|| anyhow!("detection file without numeric suffix: {:?}", name))?;
        let index: u64 = captures[1]
            .parse()
            .with_context(|| format!("parsing frame index of {:?}", name))?;
        indexed.push((index, path));
    }
    indexed.sort_by_key(|(index, _)| *index);
    Ok(indexed.into_iter().map(|(_, path)| path).collect())
}
