//! Transitions animate from the outgoing slide to the incoming one.
//!
//! A transition receives both slides already marked visible. It owns every
//! intermediate style it sets and must restore them before it finishes.
//! Finishing means calling [`Completion::finish`] exactly once, which fires
//! `afterShow` on the incoming slide and hands control back to the deck.

pub mod fade_to_black;
pub mod slide_fade;

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use anyhow::Result;
use log::warn;

use crate::clock::Clock;
use crate::error::Error;
use crate::slide::Slide;
use crate::stage::Stage;
use crate::state::SlideState;

pub type Transition = Rc<dyn Fn(Transit) -> Result<()>>;

/// Everything a transition gets to work with.
pub struct Transit {
    pub from: Slide,
    pub to: Slide,
    pub clock: Clock,
    pub stage: Stage,
    pub done: Completion,
}

/// One-shot completion signal for a running transition.
pub struct Completion {
    slide: Option<Slide>,
}

impl Completion {
    pub(crate) fn new(incoming: Slide) -> Self {
        Self { slide: Some(incoming) }
    }

    pub fn finish(mut self) -> Result<()> {
        match self.slide.take() {
            Some(slide) => slide.fire(SlideState::AfterShow),
            None => Ok(()),
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if let Some(slide) = &self.slide {
            warn!("transition into `{}` ended without finishing; the deck is stuck", slide.id());
        }
    }
}

/// Switch instantly.
pub fn identity(transit: Transit) -> Result<()> {
    transit.done.finish()
}

#[derive(Clone)]
pub enum TransitionRef {
    Named(String),
    Func(Transition),
}

impl From<&str> for TransitionRef {
    fn from(name: &str) -> Self {
        TransitionRef::Named(name.to_string())
    }
}

impl From<String> for TransitionRef {
    fn from(name: String) -> Self {
        TransitionRef::Named(name)
    }
}

impl From<Transition> for TransitionRef {
    fn from(f: Transition) -> Self {
        TransitionRef::Func(f)
    }
}

impl fmt::Debug for TransitionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionRef::Named(name) => f.debug_tuple("Named").field(name).finish(),
            TransitionRef::Func(_) => f.write_str("Func(..)"),
        }
    }
}

/// Transitions that can be referred to by name.
#[derive(Clone)]
pub struct Transitions {
    named: HashMap<String, Transition>,
}

impl Transitions {
    pub fn empty() -> Self {
        Self { named: HashMap::new() }
    }

    pub fn register<F>(&mut self, name: &str, transition: F) -> &mut Self
    where
        F: Fn(Transit) -> Result<()> + 'static,
    {
        self.named.insert(name.to_string(), Rc::new(transition));
        self
    }

    pub fn get(&self, name: &str) -> Option<Transition> {
        self.named.get(name).cloned()
    }

    /// `Ok(None)` means "switch instantly".
    pub fn resolve(&self, transition: &TransitionRef) -> Result<Option<Transition>, Error> {
        match transition {
            TransitionRef::Func(f) => Ok(Some(f.clone())),
            TransitionRef::Named(name) if name.is_empty() => Ok(None),
            TransitionRef::Named(name) => self
                .get(name)
                .map(Some)
                .ok_or_else(|| Error::UnknownTransition(name.clone())),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.named.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for Transitions {
    fn default() -> Self {
        let mut transitions = Self::empty();
        transitions
            .register("fadeToBlack", fade_to_black::fade_to_black)
            .register("slideFade", slide_fade::slide_fade);
        transitions
    }
}

impl fmt::Debug for Transitions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_registered() {
        assert_eq!(Transitions::default().names(), ["fadeToBlack", "slideFade"]);
    }

    #[test]
    fn empty_name_means_no_transition() {
        let transitions = Transitions::default();
        assert!(transitions.resolve(&"".into()).unwrap().is_none());
        assert!(transitions.resolve(&"slideFade".into()).unwrap().is_some());
    }

    #[test]
    fn unknown_name_is_a_configuration_error() {
        let err = Transitions::default().resolve(&"spin".into()).err().unwrap();
        assert!(matches!(err, Error::UnknownTransition(name) if name == "spin"));
    }
}
