use std::time::Duration;

pub const RENDER_WIDTH: i32 = 1920;            // Width of the slide container
pub const RENDER_HEIGHT: i32 = 1080;           // Height of the slide container
pub const FPS: u32 = 60;                       // Frames per second
pub const FRAME_TIME: f32 = 1.0 / FPS as f32;  // Time per frame (seconds)

pub const FADE_TO_BLACK_STEP: Duration = Duration::from_millis(300); // Each half of fadeToBlack
pub const SLIDE_FADE_DELAY: Duration = Duration::from_millis(50);    // Settle time before slideFade moves
pub const SLIDE_FADE_DURATION: Duration = Duration::from_millis(500);
pub const SLIDE_FADE_DISTANCE: f32 = 500.0;                          // Horizontal travel in pixels

pub const ELEMENT_FADE_DURATION: Duration = Duration::from_millis(500); // fadeelements per-element fade
pub const ELEMENT_FADE_STAGGER: Duration = Duration::from_millis(500);  // Delay between elements

pub const DEFAULT_DWELL: Duration = Duration::from_secs(2);         // Headless time on a manual slide
pub const DEFAULT_VIDEO_LENGTH: Duration = Duration::from_secs(5);  // Headless stand-in media length

pub fn frame_duration() -> Duration {
    Duration::from_secs_f32(FRAME_TIME)
}
