use serde::{Deserialize, Serialize};

use super::note::NoteId;

/// A directed relation between two notes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub from: NoteId,
    pub to: NoteId,
}

impl Link {
    pub fn new(from: NoteId, to: NoteId) -> Self {
        Link { from, to }
    }

    /// Whether either endpoint is `id`
    pub fn touches(&self, id: &NoteId) -> bool {
        &self.from == id || &self.to == id
    }
}
