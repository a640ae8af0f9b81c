//! Declarative behaviours: a `data-<name>` attribute on a slide source
//! installs the behaviour registered under `<name>` when the deck is built.
//!
//! Installers only talk to the slide (its events, clock and styles). They
//! never touch deck internals, and they must not depend on the order in
//! which other attributes are applied.

pub mod duration;
pub mod fade_elements;
pub mod video;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

use anyhow::{Context, Result};
use log::trace;

use crate::slide::Slide;

/// Attribute payload, numeric when the raw text is a finite number.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Number(f64),
    Text(String),
}

impl AttrValue {
    /// Non-empty values that read as a finite number become numbers.
    /// Blank but non-empty values count as zero.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() && !raw.is_empty() {
            return AttrValue::Number(0.0);
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => AttrValue::Number(n),
            _ => AttrValue::Text(raw.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => Some(*n),
            AttrValue::Text(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, AttrValue::Text(t) if t.is_empty())
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Number(n) => write!(f, "{n}"),
            AttrValue::Text(t) => f.write_str(t),
        }
    }
}

pub type Installer = Rc<dyn Fn(&Slide, &AttrValue) -> Result<()>>;

#[derive(Clone)]
pub struct Behaviours {
    installers: HashMap<String, Installer>,
}

impl Behaviours {
    pub fn empty() -> Self {
        Self { installers: HashMap::new() }
    }

    pub fn register<F>(&mut self, name: &str, installer: F) -> &mut Self
    where
        F: Fn(&Slide, &AttrValue) -> Result<()> + 'static,
    {
        self.installers.insert(name.to_string(), Rc::new(installer));
        self
    }

    pub fn get(&self, name: &str) -> Option<Installer> {
        self.installers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.installers.contains_key(name)
    }

    /// Install every registered behaviour named by a `data-*` attribute.
    /// Attributes nobody registered are ignored.
    pub fn apply(&self, slide: &Slide, attributes: &BTreeMap<String, String>) -> Result<()> {
        for (attribute, raw) in attributes {
            let Some(name) = attribute.strip_prefix("data-") else {
                continue;
            };
            let Some(installer) = self.get(name) else {
                continue;
            };
            trace!("installing `{name}` on slide `{}`", slide.id());
            installer(slide, &AttrValue::parse(raw))
                .with_context(|| format!("failed to install `{name}` on slide `{}`", slide.id()))?;
        }
        Ok(())
    }
}

impl Default for Behaviours {
    fn default() -> Self {
        let mut behaviours = Self::empty();
        behaviours
            .register("duration", duration::duration)
            .register("transition", |slide, value| {
                slide.transition(value.to_string()).map(|_| ())
            })
            .register("video", video::video)
            .register("fullvideo", video::full_video)
            .register("fadeelements", fade_elements::fade_elements);
        behaviours
    }
}

impl fmt::Debug for Behaviours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.installers.keys().collect();
        names.sort();
        f.debug_list().entries(names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_coerced() {
        assert_eq!(AttrValue::parse("3000"), AttrValue::Number(3000.0));
        assert_eq!(AttrValue::parse(" 2.5 "), AttrValue::Number(2.5));
        assert_eq!(AttrValue::parse("fadeToBlack"), AttrValue::Text("fadeToBlack".into()));
        assert_eq!(AttrValue::parse("inf"), AttrValue::Text("inf".into()));
        assert!(AttrValue::parse("").is_empty());
        assert_eq!(AttrValue::parse("  "), AttrValue::Number(0.0));
    }

    #[test]
    fn builtins_are_registered() {
        let behaviours = Behaviours::default();
        for name in ["duration", "transition", "video", "fullvideo", "fadeelements"] {
            assert!(behaviours.contains(name), "{name}");
        }
    }
}
