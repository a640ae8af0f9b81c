use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use anyhow::Result;
use log::debug;

use crate::behaviours::AttrValue;
use crate::clock::{Clock, TimerId};
use crate::error::Error;
use crate::event_bus::EventBus;
use crate::slide::Slide;
use crate::source::ElementSource;
use crate::state::SlideState;

type Pending = Box<dyn FnOnce(&Media)>;

/// A playable media element. Decoding belongs to the host, which reports
/// the length through [`Media::load_metadata`]; playback position is kept
/// on the deck's clock. Fires `loadedmetadata` and `ended`.
#[derive(Clone)]
pub struct Media(Rc<MediaInner>);

struct MediaInner {
    src: String,
    full: bool,
    length_hint: Option<Duration>,
    clock: Clock,

    ready: Cell<bool>,
    queue: RefCell<Vec<Pending>>,
    length: Cell<Duration>,
    position: Cell<Duration>, // Position when playback last stopped
    playing_since: Cell<Option<Duration>>,
    end_timer: Cell<Option<TimerId>>,

    events: EventBus<Media>,
}

impl Media {
    pub fn new(clock: Clock, src: impl Into<String>, full: bool, length_hint: Option<Duration>) -> Self {
        Self(Rc::new(MediaInner {
            src: src.into(),
            full,
            length_hint,
            clock,
            ready: Cell::new(false),
            queue: RefCell::new(Vec::new()),
            length: Cell::new(Duration::ZERO),
            position: Cell::new(Duration::ZERO),
            playing_since: Cell::new(None),
            end_timer: Cell::new(None),
            events: EventBus::new(),
        }))
    }

    pub fn src(&self) -> &str {
        &self.0.src
    }

    /// Fills the whole slide rather than sitting in its flow.
    pub fn is_full(&self) -> bool {
        self.0.full
    }

    /// Length declared by the slide source, if any.
    pub fn length_hint(&self) -> Option<Duration> {
        self.0.length_hint
    }

    pub fn is_ready(&self) -> bool {
        self.0.ready.get()
    }

    pub fn is_playing(&self) -> bool {
        self.0.playing_since.get().is_some()
    }

    pub fn length(&self) -> Duration {
        self.0.length.get()
    }

    pub fn position(&self) -> Duration {
        let base = self.0.position.get();
        match self.0.playing_since.get() {
            Some(since) => (base + self.0.clock.now().saturating_sub(since)).min(self.length()),
            None => base,
        }
    }

    pub fn on<F>(&self, event: &str, listener: F)
    where
        F: Fn(&Media) -> Result<()> + 'static,
    {
        self.0.events.on(event, move |media, _| listener(media));
    }

    /// Run `f` now if metadata is loaded, otherwise once it is.
    pub fn when_ready(&self, f: impl FnOnce(&Media) + 'static) {
        if self.is_ready() {
            f(self);
        } else {
            self.0.queue.borrow_mut().push(Box::new(f));
        }
    }

    pub fn load_metadata(&self, length: Duration) -> Result<()> {
        self.0.length.set(length);
        self.0.ready.set(true);
        let queued: Vec<Pending> = self.0.queue.borrow_mut().drain(..).collect();
        for f in queued {
            f(self);
        }
        self.0.events.fire(self, "loadedmetadata", &())
    }

    pub fn play(&self) {
        if self.is_playing() {
            return;
        }
        let remaining = self.length().saturating_sub(self.0.position.get());
        self.0.playing_since.set(Some(self.0.clock.now()));

        let media: Weak<MediaInner> = Rc::downgrade(&self.0);
        let timer = self.0.clock.set_timeout(remaining, move || match media.upgrade() {
            Some(inner) => Media(inner).end(),
            None => Ok(()),
        });
        self.0.end_timer.set(Some(timer));
        debug!("playing {} from {:?}", self.src(), self.0.position.get());
    }

    pub fn pause(&self) {
        if !self.is_playing() {
            return;
        }
        self.0.position.set(self.position());
        self.0.playing_since.set(None);
        if let Some(timer) = self.0.end_timer.take() {
            self.0.clock.clear_timeout(timer);
        }
    }

    pub fn seek(&self, position: Duration) {
        let was_playing = self.is_playing();
        self.pause();
        self.0.position.set(position.min(self.length()));
        if was_playing {
            self.play();
        }
    }

    fn end(&self) -> Result<()> {
        self.0.end_timer.set(None);
        self.0.playing_since.set(None);
        self.0.position.set(self.length());
        self.0.events.fire(self, "ended", &())
    }
}

impl fmt::Debug for Media {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Media")
            .field("src", &self.0.src)
            .field("full", &self.0.full)
            .field("ready", &self.is_ready())
            .field("playing", &self.is_playing())
            .field("position", &self.position())
            .finish()
    }
}

/// `data-video="clip.mp4"` plays a new media element, a bare `data-video`
/// plays the slide's first video. Playback starts once the slide is
/// shown and the slide completes when the video ends.
pub fn video(slide: &Slide, value: &AttrValue) -> Result<()> {
    install(slide, value, false)
}

/// As [`video`], with the video filling the slide.
pub fn full_video(slide: &Slide, value: &AttrValue) -> Result<()> {
    install(slide, value, true)
}

fn install(slide: &Slide, value: &AttrValue, full: bool) -> Result<()> {
    let first_video = slide.elements().iter().find_map(|e| match e.source() {
        ElementSource::Video { src, length_ms } => {
            Some((src.clone(), length_ms.map(Duration::from_millis)))
        }
        _ => None,
    });
    let (src, length_hint) = if value.is_empty() {
        first_video.ok_or_else(|| Error::MissingVideo(slide.id().to_string()))?
    } else {
        let src = value.to_string();
        let hint = first_video.filter(|(s, _)| *s == src).and_then(|(_, hint)| hint);
        (src, hint)
    };

    let media = Media::new(slide.clock().clone(), src, full, length_hint);
    let target = slide.downgrade();
    media.on("ended", move |_| match target.upgrade() {
        Some(slide) => slide.complete(),
        None => Ok(()),
    });

    let on_show = media.clone();
    let on_after_show = media.clone();
    let on_hide = media.clone();
    slide
        .on(SlideState::Show, move |_| {
            on_show.when_ready(|m| m.seek(Duration::ZERO));
            Ok(())
        })
        .on(SlideState::AfterShow, move |_| {
            on_after_show.when_ready(Media::play);
            Ok(())
        })
        .on(SlideState::Hide, move |_| {
            on_hide.when_ready(Media::pause);
            Ok(())
        });
    slide.set_media(media);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn commands_wait_for_metadata() {
        let clock = Clock::new();
        let media = Media::new(clock.clone(), "clip.mp4", false, None);
        media.when_ready(Media::play);
        assert!(!media.is_playing());
        media.load_metadata(ms(1000)).unwrap();
        assert!(media.is_playing());
    }

    #[test]
    fn ended_fires_when_playback_reaches_the_end() {
        let clock = Clock::new();
        let media = Media::new(clock.clone(), "clip.mp4", false, None);
        let ended = Rc::new(Cell::new(0));
        let e = ended.clone();
        media.on("ended", move |_| {
            e.set(e.get() + 1);
            Ok(())
        });
        media.load_metadata(ms(1000)).unwrap();
        media.play();
        clock.advance(ms(400)).unwrap();
        media.pause();
        assert_eq!(media.position(), ms(400));
        clock.advance(ms(5000)).unwrap();
        assert_eq!(ended.get(), 0);

        media.play();
        clock.advance(ms(599)).unwrap();
        assert_eq!(ended.get(), 0);
        clock.advance(ms(1)).unwrap();
        assert_eq!(ended.get(), 1);
        assert!(!media.is_playing());
        assert_eq!(media.position(), ms(1000));
    }

    #[test]
    fn seek_restarts_from_position() {
        let clock = Clock::new();
        let media = Media::new(clock.clone(), "clip.mp4", true, None);
        media.load_metadata(ms(1000)).unwrap();
        media.play();
        clock.advance(ms(700)).unwrap();
        media.seek(Duration::ZERO);
        assert!(media.is_playing());
        assert_eq!(media.position(), Duration::ZERO);
        clock.advance(ms(700)).unwrap();
        assert!(media.is_playing());
    }
}
