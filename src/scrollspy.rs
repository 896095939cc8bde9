//! Report navigation highlight that follows the scroll position.
//!
//! Offsets are in whatever unit the host lays sections out in; the TUI uses
//! rows of the wrapped report.

/// Index of the section the reader is looking at.
///
/// That is the last section whose top is at or above `scroll + lookahead`.
/// Sections with an unknown top are skipped. When no section qualifies the
/// final section is reported; an empty list has no active section.
pub fn active_index(tops: &[Option<usize>], scroll: usize, lookahead: usize) -> Option<usize> {
    if tops.is_empty() {
        return None;
    }
    let line = scroll.saturating_add(lookahead);

    tops.iter()
        .enumerate()
        .filter_map(|(i, top)| top.map(|t| (i, t)))
        .filter(|(_, top)| *top <= line)
        .map(|(i, _)| i)
        .last()
        .or(Some(tops.len() - 1))
}

/// One step of a smooth scroll from `current` toward `target`
pub fn scroll_toward(current: usize, target: usize) -> usize {
    let diff = current.abs_diff(target);
    if diff == 0 {
        return current;
    }
    let step = (diff / 3).max(1);
    if target > current {
        current + step
    } else {
        current - step
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SpyEntry {
    id: String,
    top: Option<usize>,
}

/// Tracks which report nav entry is highlighted
#[derive(Debug, Clone)]
pub struct Scrollspy {
    entries: Vec<SpyEntry>,
    lookahead: usize,
    margin: usize,
    scroll: usize,
    active: Option<usize>,
}

impl Scrollspy {
    pub fn new(lookahead: usize, margin: usize) -> Self {
        Self {
            entries: Vec::new(),
            lookahead,
            margin,
            scroll: 0,
            active: None,
        }
    }

    /// Replace the section layout and recompute the highlight
    pub fn set_layout<I, S>(&mut self, layout: I)
    where
        I: IntoIterator<Item = (S, Option<usize>)>,
        S: Into<String>,
    {
        self.entries = layout
            .into_iter()
            .map(|(id, top)| SpyEntry { id: id.into(), top })
            .collect();
        for entry in self.entries.iter().filter(|e| e.top.is_none()) {
            tracing::debug!(section = %entry.id, "Section has no layout, skipping");
        }
        self.refresh();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.id.as_str())
    }

    /// Record a new scroll offset and return the active index
    pub fn on_scroll(&mut self, scroll: usize) -> Option<usize> {
        self.scroll = scroll;
        self.refresh()
    }

    pub fn refresh(&mut self) -> Option<usize> {
        let tops: Vec<Option<usize>> = self.entries.iter().map(|e| e.top).collect();
        self.active = active_index(&tops, self.scroll, self.lookahead);
        self.active
    }

    /// Highlight entry `index` and return the offset to scroll to
    pub fn activate(&mut self, index: usize) -> Option<usize> {
        let entry = self.entries.get(index)?;
        let Some(top) = entry.top else {
            tracing::error!(section = %entry.id, "Target section not laid out");
            return None;
        };
        self.active = Some(index);
        Some(top.saturating_sub(self.margin))
    }

    /// Anchor navigation by section id
    pub fn activate_id(&mut self, id: &str) -> Option<usize> {
        match self.entries.iter().position(|e| e.id == id) {
            Some(index) => self.activate(index),
            None => {
                tracing::error!(section = id, "No section with this id");
                None
            }
        }
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Laid out top line of section `id`
    pub fn top_of(&self, id: &str) -> Option<usize> {
        self.entries.iter().find(|e| e.id == id).and_then(|e| e.top)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active
            .and_then(|i| self.entries.get(i))
            .map(|e| e.id.as_str())
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active == Some(index)
    }
}

impl Default for Scrollspy {
    fn default() -> Self {
        Self::new(3, 1)
    }
}
