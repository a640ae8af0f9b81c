use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use anyhow::Result;
use log::trace;

use crate::behaviours::video::Media;
use crate::clock::Clock;
use crate::error::Error;
use crate::event_bus::EventBus;
use crate::slideshow::{Slideshow, SlideshowInner};
use crate::source::{ElementSource, SlideSource};
use crate::state::SlideState;
use crate::transitions::{Transition, TransitionRef};

/// How a slide should currently be drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideStyle {
    pub visible: bool,
    pub opacity: f32,
    pub offset_x: f32,    // Horizontal offset in container pixels
    pub positioned: bool, // Taken out of normal flow so two slides can overlap
}

impl Default for SlideStyle {
    fn default() -> Self {
        Self {
            visible: false,
            opacity: 1.0,
            offset_x: 0.0,
            positioned: false,
        }
    }
}

#[derive(Debug)]
pub struct Element {
    source: ElementSource,
    opacity: Cell<f32>,
}

impl Element {
    pub fn source(&self) -> &ElementSource {
        &self.source
    }

    pub fn opacity(&self) -> f32 {
        self.opacity.get()
    }

    pub fn set_opacity(&self, opacity: f32) {
        self.opacity.set(opacity.clamp(0.0, 1.0));
    }
}

/// A single panel of the deck. Cheap to clone: every clone is the same
/// slide.
#[derive(Clone)]
pub struct Slide(Rc<SlideInner>);

#[derive(Clone)]
pub struct WeakSlide(Weak<SlideInner>);

struct SlideInner {
    id: String,
    index: usize,
    attributes: BTreeMap<String, String>,
    elements: Vec<Element>,

    state: Cell<SlideState>,
    style: Cell<SlideStyle>,
    transition: RefCell<Option<Transition>>,
    media: RefCell<Option<Media>>,

    events: EventBus<Slide>,
    clock: Clock,
    slideshow: Weak<SlideshowInner>,
}

impl Slide {
    pub(crate) fn new(
        source: &SlideSource,
        index: usize,
        clock: Clock,
        slideshow: Weak<SlideshowInner>,
    ) -> Self {
        let elements = source
            .elements
            .iter()
            .map(|e| Element {
                source: e.clone(),
                opacity: Cell::new(1.0),
            })
            .collect();

        Self(Rc::new(SlideInner {
            id: source.id.clone(),
            index,
            attributes: source.attributes.clone(),
            elements,
            state: Cell::new(SlideState::AfterHide),
            style: Cell::new(SlideStyle::default()),
            transition: RefCell::new(None),
            media: RefCell::new(None),
            events: EventBus::new(),
            clock,
            slideshow,
        }))
    }

    pub fn id(&self) -> &str {
        &self.0.id
    }

    /// Position in the deck.
    pub fn index(&self) -> usize {
        self.0.index
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.0.attributes.get(name).map(String::as_str)
    }

    pub fn elements(&self) -> &[Element] {
        &self.0.elements
    }

    pub fn state(&self) -> SlideState {
        self.0.state.get()
    }

    pub fn style(&self) -> SlideStyle {
        self.0.style.get()
    }

    pub fn update_style(&self, f: impl FnOnce(&mut SlideStyle)) {
        let mut style = self.0.style.get();
        f(&mut style);
        self.0.style.set(style);
    }

    pub fn clock(&self) -> &Clock {
        &self.0.clock
    }

    pub fn media(&self) -> Option<Media> {
        self.0.media.borrow().clone()
    }

    pub fn set_media(&self, media: Media) {
        *self.0.media.borrow_mut() = Some(media);
    }

    pub fn slideshow(&self) -> Option<Slideshow> {
        self.0.slideshow.upgrade().map(Slideshow::from_inner)
    }

    pub fn downgrade(&self) -> WeakSlide {
        WeakSlide(Rc::downgrade(&self.0))
    }

    pub fn ptr_eq(&self, other: &Slide) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn on<F>(&self, state: SlideState, listener: F) -> &Self
    where
        F: Fn(&Slide) -> Result<()> + 'static,
    {
        self.0.events.on(state.event_name(), move |slide, _| listener(slide));
        self
    }

    pub fn once<F>(&self, state: SlideState, listener: F) -> &Self
    where
        F: Fn(&Slide) -> Result<()> + 'static,
    {
        self.0.events.once(state.event_name(), move |slide, _| listener(slide));
        self
    }

    /// Enter `state` and notify its listeners. The state is stored before
    /// any listener runs, so listeners always observe the new state.
    pub fn fire(&self, state: SlideState) -> Result<()> {
        let from = self.state();
        if from.next() != state {
            return Err(Error::InvalidState {
                slide: self.id().to_string(),
                from,
                to: state,
            }
            .into());
        }
        self.0.state.set(state);
        trace!("slide `{}` {}", self.id(), state);
        self.0.events.fire(self, state.event_name(), &())
    }

    pub fn listener_count(&self, state: SlideState) -> usize {
        self.0.events.listener_count(state.event_name())
    }

    /// Signal that this slide is done. Advances the deck only while the
    /// slide is fully shown; stray signals from other slides are ignored.
    pub fn complete(&self) -> Result<()> {
        if self.state() != SlideState::AfterShow {
            trace!("ignoring complete() from slide `{}` in {}", self.id(), self.state());
            return Ok(());
        }
        match self.slideshow() {
            Some(slideshow) => slideshow.next().map(|_| ()),
            None => Ok(()),
        }
    }

    /// Set the transition used when leaving this slide. Names are looked up
    /// in the owning deck's transitions; an empty name clears it.
    pub fn transition(&self, transition: impl Into<TransitionRef>) -> Result<&Self> {
        let transition = transition.into();
        let resolved = match (&transition, self.slideshow()) {
            (TransitionRef::Func(f), _) => Some(f.clone()),
            (TransitionRef::Named(_), Some(slideshow)) => slideshow.transitions().resolve(&transition)?,
            (TransitionRef::Named(name), None) if name.is_empty() => None,
            (TransitionRef::Named(name), None) => {
                return Err(Error::UnknownTransition(name.clone()).into());
            }
        };
        self.set_transition(resolved);
        Ok(self)
    }

    pub fn set_transition(&self, transition: Option<Transition>) {
        *self.0.transition.borrow_mut() = transition;
    }

    pub fn transition_fn(&self) -> Option<Transition> {
        self.0.transition.borrow().clone()
    }
}

impl WeakSlide {
    pub fn upgrade(&self) -> Option<Slide> {
        self.0.upgrade().map(Slide)
    }
}

impl PartialEq for Slide {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Slide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slide")
            .field("id", &self.0.id)
            .field("index", &self.0.index)
            .field("state", &self.state())
            .field("style", &self.style())
            .finish()
    }
}
