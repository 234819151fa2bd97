//! convert_detections - convert a raw per-video detection file into the
//! normalized releasable form.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use hoa_detections::io;
use hoa_detections::Converter;

#[path = "../ui.rs"]
mod ui;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to the raw per-video detection file.
    raw_detections: PathBuf,
    /// Path to write the releasable per-video detection file to.
    output: PathBuf,
    /// Width of the frame the detector was run on, in pixels.
    #[arg(long, env = "HOA_FRAME_WIDTH", default_value_t = 456)]
    frame_width: u32,
    /// Height of the frame the detector was run on, in pixels.
    #[arg(long, env = "HOA_FRAME_HEIGHT", default_value_t = 256)]
    frame_height: u32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let progress = ui::Progress::auto();

    let converter = Converter::new(args.frame_width, args.frame_height)?;
    let raw_video = {
        let _stage = progress.stage("Load raw detections");
        io::load_raw_detections(&args.raw_detections)?
    };

    let bar = progress.counter(raw_video.len() as u64, "Convert frames");
    let mut releasable = Vec::with_capacity(raw_video.len());
    for frame in &raw_video {
        releasable.push(converter.convert_frame(frame));
        bar.inc(1);
    }
    bar.finish_and_clear();

    {
        let _stage = progress.stage("Write releasable detections");
        io::save_release_detections(&args.output, &releasable)?;
    }
    log::info!(
        "converted {} frame records ({}x{} px) into {}",
        releasable.len(),
        args.frame_width,
        args.frame_height,
        args.output.display()
    );
    Ok(())
}
