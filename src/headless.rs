//! Play a deck without a window, on the virtual clock.

use std::time::Duration;

use anyhow::Result;
use log::info;

use crate::constants::{DEFAULT_DWELL, DEFAULT_VIDEO_LENGTH, frame_duration};
use crate::slideshow::Slideshow;
use crate::state::SlideState;

#[derive(Debug, Clone)]
pub struct HeadlessOptions {
    /// How long a slide that never completes itself stays up.
    pub dwell: Duration,
    /// Length reported for videos whose source does not declare one.
    pub video_length: Duration,
    /// Stop after this much virtual time.
    pub max_time: Duration,
}

impl Default for HeadlessOptions {
    fn default() -> Self {
        Self {
            dwell: DEFAULT_DWELL,
            video_length: DEFAULT_VIDEO_LENGTH,
            max_time: Duration::from_secs(600),
        }
    }
}

/// Run `deck` until its last slide has been up for a dwell period (or
/// `max_time` passes) and return the ids of the slides shown, in order.
pub fn run(deck: &Slideshow, options: &HeadlessOptions) -> Result<Vec<String>> {
    for slide in deck.slides() {
        for state in [SlideState::Show, SlideState::AfterShow, SlideState::Hide, SlideState::AfterHide] {
            slide.on(state, |slide| {
                info!("[{:>8.3}s] {} {}", slide.clock().now().as_secs_f32(), slide.id(), slide.state());
                Ok(())
            });
        }
        if let Some(media) = slide.media() {
            media.load_metadata(media.length_hint().unwrap_or(options.video_length))?;
        }
    }

    deck.start()?;

    let clock = deck.clock();
    let mut shown: Vec<String> = Vec::new();
    let mut entered: Option<(usize, Duration)> = None;

    while clock.now() < options.max_time {
        if let Some(current) = deck.current() {
            if entered.map(|(index, _)| index) != Some(current.index()) {
                entered = Some((current.index(), clock.now()));
                shown.push(current.id().to_string());
            }

            let up_for = entered.map_or(Duration::ZERO, |(_, since)| clock.now() - since);
            let is_last = current.index() + 1 == deck.len();
            let advances_itself = current.attribute("data-duration").is_some() || current.media().is_some();

            if current.state() == SlideState::AfterShow && up_for >= options.dwell {
                if is_last && !deck.options().looping {
                    break;
                }
                if !advances_itself {
                    deck.next()?;
                }
            }
        } else if deck.is_empty() {
            break;
        }
        deck.tick(frame_duration())?;
    }

    info!("headless run finished after {:.3}s", clock.now().as_secs_f32());
    Ok(shown)
}
