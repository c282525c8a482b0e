use serde::Serialize;

use crate::models::{Genre, MatchMode, QueryDescriptor};

/// Maximum number of genres a selection may hold
pub const MAX_SELECTION: usize = 5;

/// Result of a toggle request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// The add would have broken a selection rule; nothing changed
    Rejected,
}

/// Whether `genre` may be appended to `selection`
///
/// False when the genre is already selected, the selection is full, or the
/// result would mix a special genre (Documentary, TV Movie) with anything else.
pub fn can_add(genre: Genre, selection: &[Genre]) -> bool {
    if selection.contains(&genre) || selection.len() >= MAX_SELECTION {
        return false;
    }

    if selection.is_empty() {
        return true;
    }

    // A special genre stands alone, so nothing joins it and it joins nothing
    !genre.is_special() && !selection.iter().any(|g| g.is_special())
}

/// Owns the user's genre selection and match mode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionController {
    selection: Vec<Genre>,
    match_mode: MatchMode,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected genres in insertion order
    pub fn selection(&self) -> &[Genre] {
        &self.selection
    }

    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    pub fn is_selected(&self, genre: Genre) -> bool {
        self.selection.contains(&genre)
    }

    /// Removes a selected genre, or adds an unselected one when legal
    pub fn toggle_genre(&mut self, genre: Genre) -> ToggleOutcome {
        if let Some(index) = self.selection.iter().position(|g| *g == genre) {
            self.selection.remove(index);
            tracing::debug!(genre = %genre, selected = self.selection.len(), "Genre removed");
            return ToggleOutcome::Removed;
        }

        if !can_add(genre, &self.selection) {
            tracing::debug!(genre = %genre, selected = self.selection.len(), "Genre add rejected");
            return ToggleOutcome::Rejected;
        }

        self.selection.push(genre);
        tracing::debug!(genre = %genre, selected = self.selection.len(), "Genre added");
        ToggleOutcome::Added
    }

    pub fn set_match_mode(&mut self, mode: MatchMode) {
        self.match_mode = mode;
    }

    /// Checkbox state for a catalog entry: unselected and not addable
    pub fn is_genre_disabled(&self, genre: Genre) -> bool {
        !self.is_selected(genre) && !can_add(genre, &self.selection)
    }

    /// Descriptor for the current selection, None while nothing is selected
    pub fn current_query_descriptor(&self) -> Option<QueryDescriptor> {
        QueryDescriptor::new(self.selection.iter().map(|g| g.name()), self.match_mode).ok()
    }
}
