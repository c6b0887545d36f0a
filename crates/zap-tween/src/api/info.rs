// api/info.rs
//
// Human-readable element descriptions for debugging overlays and logs.

use std::fmt;

use serde::Serialize;

use crate::elements::Phase;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub label: &'static str,
    pub value: String,
}

/// Snapshot of one element: what it is, where it stands, and its settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Info {
    pub title: String,
    pub tag: Option<String>,
    pub phase: Phase,
    /// Normalized progress.
    pub ratio: f32,
    pub properties: Vec<Property>,
}

impl Info {
    pub fn new(title: impl Into<String>, phase: Phase, ratio: f32) -> Self {
        Self { title: title.into(), tag: None, phase, ratio, properties: Vec::new() }
    }

    pub fn with_tag(mut self, tag: Option<&str>) -> Self {
        self.tag = tag.map(str::to_owned);
        self
    }

    pub fn property(mut self, label: &'static str, value: impl fmt::Display) -> Self {
        self.properties.push(Property { label, value: value.to_string() });
        self
    }
}

impl fmt::Display for Info {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: [Tag: {} | Phase: {:?} | Ratio: {:.2}]",
            self.title,
            self.tag.as_deref().unwrap_or("None"),
            self.phase,
            self.ratio
        )?;
        for property in &self.properties {
            write!(f, " [{}: {}]", property.label, property.value)?;
        }
        Ok(())
    }
}
