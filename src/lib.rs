//! A slide deck engine: slides shown one at a time, moved between by
//! navigation or by a slide completing itself, with pluggable transitions
//! and behaviours attached through `data-*` attributes.
//!
//! ```no_run
//! use presents::{Slideshow, SlideshowOptions, SlideSource, SlideState};
//!
//! # fn main() -> anyhow::Result<()> {
//! let deck = Slideshow::new(
//!     vec![
//!         SlideSource::new("intro").with_attribute("data-duration", "3000"),
//!         SlideSource::new("outro"),
//!     ],
//!     SlideshowOptions { transition: Some("fadeToBlack".into()), ..Default::default() },
//! )?;
//! deck.get("outro").unwrap().on(SlideState::AfterShow, |slide| {
//!     println!("reached {}", slide.id());
//!     Ok(())
//! });
//! deck.start()?;
//! # Ok(())
//! # }
//! ```

pub mod behaviours;
pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod event_bus;
pub mod headless;
pub mod slide;
pub mod slideshow;
pub mod source;
pub mod stage;
pub mod state;
pub mod transitions;

#[cfg(feature = "viewer")]
pub mod texture_loader;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use behaviours::{AttrValue, Behaviours};
pub use clock::Clock;
pub use error::Error;
pub use slide::{Slide, SlideStyle};
pub use slideshow::{Slideshow, SlideshowOptions};
pub use source::{ElementSource, SlideSource};
pub use state::SlideState;
pub use transitions::{Transit, Transition, TransitionRef, Transitions};
