use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How far below the top of the viewport a heading may sit and still count
/// as "reached".
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Threshold {
    /// Fixed offset in CSS pixels.
    Fixed(f64),
    /// Half of the current viewport height.
    HalfViewport,
}

impl Default for Threshold {
    fn default() -> Self {
        Threshold::Fixed(150.0)
    }
}

impl Threshold {
    pub fn resolve(self, viewport_height: f64) -> f64 {
        match self {
            Threshold::Fixed(px) => px,
            Threshold::HalfViewport => viewport_height / 2.0,
        }
    }
}

/// The last heading (in document order) whose top edge is at or above the
/// threshold, or `None` while every heading is still below it.
pub fn active_heading<'a>(
    positions: impl IntoIterator<Item = (&'a str, f64)>,
    threshold: f64,
) -> Option<&'a str> {
    positions
        .into_iter()
        .filter(|(_, top)| *top <= threshold)
        .last()
        .map(|(id, _)| id)
}

/// Highlight state for one scroll position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActiveState {
    pub active: Option<String>,
    /// Entries whose list items get the expanded marker: the active entry and
    /// all of its ancestors. Empty unless expand-on-scroll is enabled.
    pub expanded: Vec<String>,
}

impl ActiveState {
    pub fn resolve(active: Option<&str>, trails: &HashMap<String, Vec<String>>, expand: bool) -> Self {
        let Some(id) = active else {
            return Self::default();
        };

        let expanded = if expand {
            trails.get(id).cloned().unwrap_or_else(|| vec![id.to_string()])
        } else {
            Vec::new()
        };

        Self {
            active: Some(id.to_string()),
            expanded,
        }
    }
}
