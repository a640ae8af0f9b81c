use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// What a slide is built from: an identity, its raw attributes and its
/// content, in display order. Only `data-*` attributes carry behaviours.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SlideSource {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub elements: Vec<ElementSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementSource {
    Text {
        text: String,
    },
    Image {
        src: PathBuf,
    },
    Video {
        src: String,
        #[serde(default, rename = "lengthMs")]
        length_ms: Option<u64>,
    },
}

impl SlideSource {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_element(mut self, element: ElementSource) -> Self {
        self.elements.push(element);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}
