//! check_detections - sanity check a releasable detection file before it
//! ships. Exits non-zero on the first bad record.

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;

use hoa_detections::io;
use hoa_detections::DetectionChecker;

#[path = "../ui.rs"]
mod ui;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to the releasable per-video detection file.
    detections: PathBuf,
    /// Expected number of frame records in the video.
    #[arg(short = 'n', long)]
    expected_frames: Option<usize>,
    /// Print the summary as JSON on stdout.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Summary {
    video_id: Option<String>,
    frames: usize,
    hands: usize,
    objects: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let progress = ui::Progress::auto();

    let video_detections = {
        let _stage = progress.stage("Load detections");
        io::load_release_detections(&args.detections)?
    };
    {
        let _stage = progress.stage("Check records");
        DetectionChecker::new(args.expected_frames).check(&video_detections)?;
    }

    let summary = Summary {
        video_id: video_detections
            .first()
            .map(|frame| frame.video_id.clone()),
        frames: video_detections.len(),
        hands: video_detections.iter().map(|f| f.hands.len()).sum(),
        objects: video_detections.iter().map(|f| f.objects.len()).sum(),
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "ok: {} frames, {} hands, {} objects",
            summary.frames, summary.hands, summary.objects
        );
    }
    Ok(())
}
