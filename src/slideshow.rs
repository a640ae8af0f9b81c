//! The deck controller: owns the slides, knows which one is current and
//! runs every switch between them.

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use anyhow::Result;
use log::{debug, info};

use crate::behaviours::Behaviours;
use crate::clock::Clock;
use crate::slide::Slide;
use crate::source::SlideSource;
use crate::stage::Stage;
use crate::state::SlideState;
use crate::transitions::{Completion, Transit, TransitionRef, Transitions};

#[derive(Debug, Clone, Default)]
pub struct SlideshowOptions {
    /// Scale the deck to the window. Applied by the renderer.
    pub full_screen: bool,
    /// Transition used when leaving any slide that does not name its own.
    pub transition: Option<TransitionRef>,
    /// Go back to the first slide after the last one.
    pub looping: bool,
}

#[derive(Clone)]
pub struct Slideshow(Rc<SlideshowInner>);

pub(crate) struct SlideshowInner {
    slides: Vec<Slide>,
    current: Cell<Option<usize>>,
    started: Cell<bool>,
    options: SlideshowOptions,
    transitions: Transitions,
    clock: Clock,
    stage: Stage,
}

impl Slideshow {
    pub fn new(sources: Vec<SlideSource>, options: SlideshowOptions) -> Result<Self> {
        Self::with_registries(sources, options, &Behaviours::default(), Transitions::default())
    }

    /// Build a deck with custom behaviours and named transitions. Any
    /// configuration problem fails the whole construction.
    pub fn with_registries(
        mut sources: Vec<SlideSource>,
        options: SlideshowOptions,
        behaviours: &Behaviours,
        transitions: Transitions,
    ) -> Result<Self> {
        // A looping single-slide deck needs a distinct slide to wrap onto
        if options.looping && sources.len() == 1 {
            sources.push(sources[0].clone());
        }

        let default_transition = match &options.transition {
            Some(transition) => transitions.resolve(transition)?,
            None => None,
        };

        let clock = Clock::new();
        let inner = Rc::new_cyclic(|weak: &Weak<SlideshowInner>| SlideshowInner {
            slides: sources
                .iter()
                .enumerate()
                .map(|(index, source)| Slide::new(source, index, clock.clone(), weak.clone()))
                .collect(),
            current: Cell::new(None),
            started: Cell::new(false),
            options,
            transitions,
            clock,
            stage: Stage::default(),
        });
        let slideshow = Slideshow(inner);

        for (slide, source) in slideshow.0.slides.iter().zip(&sources) {
            slide.set_transition(default_transition.clone());
            behaviours.apply(slide, &source.attributes)?;
        }

        debug!("created slideshow with {} slides", slideshow.len());
        Ok(slideshow)
    }

    pub(crate) fn from_inner(inner: Rc<SlideshowInner>) -> Self {
        Slideshow(inner)
    }

    /// Look a slide up by id. Duplicated ids resolve to the first slide.
    pub fn get(&self, id: &str) -> Option<Slide> {
        self.0.slides.iter().find(|s| s.id() == id).cloned()
    }

    pub fn slide(&self, index: usize) -> Option<Slide> {
        self.0.slides.get(index).cloned()
    }

    pub fn slides(&self) -> &[Slide] {
        &self.0.slides
    }

    pub fn len(&self) -> usize {
        self.0.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.slides.is_empty()
    }

    pub fn current(&self) -> Option<Slide> {
        self.0.current.get().and_then(|i| self.slide(i))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.0.current.get()
    }

    pub fn is_started(&self) -> bool {
        self.0.started.get()
    }

    pub fn options(&self) -> &SlideshowOptions {
        &self.0.options
    }

    pub fn transitions(&self) -> &Transitions {
        &self.0.transitions
    }

    pub fn clock(&self) -> &Clock {
        &self.0.clock
    }

    pub fn stage(&self) -> &Stage {
        &self.0.stage
    }

    /// Advance time by `dt`, running whatever timers fall due.
    pub fn tick(&self, dt: Duration) -> Result<()> {
        self.0.clock.advance(dt)
    }

    pub fn next(&self) -> Result<&Self> {
        let Some(index) = self.current_index() else {
            return Ok(self);
        };
        let target = self
            .slide(index + 1)
            .or_else(|| if self.0.options.looping { self.slide(0) } else { None });
        self.switch_to(target)
    }

    pub fn prev(&self) -> Result<&Self> {
        let target = self
            .current_index()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| self.slide(i));
        self.switch_to(target)
    }

    /// Show the first slide. Only the first call does anything.
    pub fn start(&self) -> Result<&Self> {
        if self.0.started.replace(true) {
            return Ok(self);
        }
        info!("starting slideshow");
        self.switch_to(self.slide(0))
    }

    fn switch_to(&self, target: Option<Slide>) -> Result<&Self> {
        let Some(target) = target else {
            return Ok(self);
        };
        let current = self.current();

        if let Some(current) = &current {
            // At most one transition in flight; anything else is dropped
            if current.state() != SlideState::AfterShow {
                debug!(
                    "dropping switch to `{}`: `{}` is mid-transition ({})",
                    target.id(),
                    current.id(),
                    current.state()
                );
                return Ok(self);
            }
            if current.ptr_eq(&target) {
                return Ok(self);
            }
        }

        info!(
            "switching {} -> {}",
            current.as_ref().map_or("<none>", |s| s.id()),
            target.id()
        );

        if let Some(current) = &current {
            current.fire(SlideState::Hide)?;
        }
        target.fire(SlideState::Show)?;
        target.update_style(|s| s.visible = true);

        let slideshow = Rc::downgrade(&self.0);
        let previous = current.clone();
        let index = target.index();
        target.once(SlideState::AfterShow, move |_| {
            if let Some(previous) = &previous {
                previous.update_style(|s| s.visible = false);
                previous.fire(SlideState::AfterHide)?;
            }
            if let Some(slideshow) = slideshow.upgrade() {
                slideshow.current.set(Some(index));
            }
            Ok(())
        });

        let done = Completion::new(target.clone());
        match current.and_then(|c| c.transition_fn().map(|f| (c, f))) {
            Some((from, transition)) => transition(Transit {
                from,
                to: target,
                clock: self.0.clock.clone(),
                stage: self.0.stage.clone(),
                done,
            })?,
            None => done.finish()?,
        }
        Ok(self)
    }
}

impl fmt::Debug for Slideshow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slideshow")
            .field("slides", &self.0.slides)
            .field("current", &self.0.current.get())
            .field("started", &self.0.started.get())
            .field("options", &self.0.options)
            .finish()
    }
}
