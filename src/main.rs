use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{info, warn};

use presents::config::load_deck;
use presents::constants::{DEFAULT_DWELL, DEFAULT_VIDEO_LENGTH};
use presents::headless::{self, HeadlessOptions};
use presents::{Slideshow, SlideshowOptions};

/// Present a deck of slides.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// A deck.json manifest, or a directory with a manifest or images
    path: PathBuf,

    /// Default transition between slides (fadeToBlack, slideFade)
    #[arg(long)]
    transition: Option<String>,

    /// Go back to the first slide after the last one
    #[arg(long = "loop")]
    looping: bool,

    /// Scale the deck to fill the window
    #[arg(long)]
    full_screen: bool,

    /// Auto-advance slides that have no duration of their own (milliseconds)
    #[arg(long)]
    duration: Option<u64>,

    /// Play on a virtual clock without opening a window
    #[arg(long)]
    headless: bool,

    /// Headless: time a manual slide stays up before advancing (milliseconds)
    #[arg(long, default_value_t = DEFAULT_DWELL.as_millis() as u64)]
    dwell: u64,

    /// Length assumed for videos that do not declare one (milliseconds)
    #[arg(long, default_value_t = DEFAULT_VIDEO_LENGTH.as_millis() as u64)]
    video_length: u64,

    /// Headless: stop after this many seconds of virtual time
    #[arg(long, default_value_t = 600)]
    max_seconds: u64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let manifest = load_deck(&args.path)
        .with_context(|| format!("failed to load deck from {}", args.path.display()))?;
    let mut options: SlideshowOptions = manifest.options.into();
    let mut slides = manifest.slides;

    // --- Command line overrides the manifest ---
    if let Some(transition) = args.transition {
        options.transition = Some(transition.into());
    }
    options.looping |= args.looping;
    options.full_screen |= args.full_screen;
    if let Some(ms) = args.duration {
        for slide in slides.iter_mut() {
            slide
                .attributes
                .entry("data-duration".to_string())
                .or_insert_with(|| ms.to_string());
        }
    }

    if slides.is_empty() {
        bail!("no slides in {}", args.path.display());
    }

    let deck = Slideshow::new(slides, options)?;
    let video_length = Duration::from_millis(args.video_length);

    if args.headless || cfg!(not(feature = "viewer")) {
        if !args.headless {
            warn!("built without the `viewer` feature; playing headless");
        }
        let shown = headless::run(
            &deck,
            &HeadlessOptions {
                dwell: Duration::from_millis(args.dwell),
                video_length,
                max_time: Duration::from_secs(args.max_seconds),
            },
        )?;
        info!("shown: {}", shown.join(" -> "));
        return Ok(());
    }

    #[cfg(feature = "viewer")]
    presents::viewer::run(&deck, video_length)?;
    Ok(())
}
