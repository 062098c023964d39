use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::link::Link;
use super::note::{Note, NoteField, NoteId};
use super::viewport::Viewport;

/// Serialized board: the entity store plus both spatial viewports
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub notes: Vec<Note>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub map_pos: Viewport,
    #[serde(default)]
    pub vis_pos: Viewport,
}

/// The canonical set of notes and links. Knows nothing about rendering.
#[derive(Debug, Clone, Default)]
pub struct Board {
    pub notes: Vec<Note>,
    pub links: Vec<Link>,
    /// Highest numeric id handed out by `next_id_at`
    last_issued_id: u64,
}

impl Board {
    pub fn new(notes: Vec<Note>, links: Vec<Link>) -> Self {
        Board {
            notes,
            links,
            last_issued_id: 0,
        }
    }

    pub fn find(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| &n.id == id)
    }

    pub fn find_mut(&mut self, id: &NoteId) -> Option<&mut Note> {
        self.notes.iter_mut().find(|n| &n.id == id)
    }

    pub fn contains(&self, id: &NoteId) -> bool {
        self.find(id).is_some()
    }

    pub fn push_note(&mut self, note: Note) {
        self.notes.push(note);
    }

    pub fn push_link(&mut self, link: Link) {
        self.links.push(link);
    }

    pub fn has_link(&self, from: &NoteId, to: &NoteId) -> bool {
        self.links.iter().any(|l| &l.from == from && &l.to == to)
    }

    /// Remove every note with this id and every link touching it.
    /// Returns the number of notes removed.
    pub fn remove_note(&mut self, id: &NoteId) -> usize {
        let before = self.notes.len();
        self.notes.retain(|n| &n.id != id);
        self.links.retain(|l| !l.touches(id));
        before - self.notes.len()
    }

    /// Write one field of one note. Returns false when the note does not
    /// exist or the field does not apply to it.
    pub fn update_note(&mut self, id: &NoteId, field: NoteField) -> bool {
        match self.find_mut(id) {
            Some(note) => field.apply(note),
            None => false,
        }
    }

    /// Replace notes and links wholesale (load)
    pub fn replace(&mut self, snapshot: Snapshot) {
        self.notes = snapshot.notes;
        self.links = snapshot.links;
    }

    /// Union another snapshot into this board. Existing notes win on id
    /// conflicts; links are de-duplicated by exact `(from, to)`.
    /// Returns how many notes were added.
    pub fn merge(&mut self, snapshot: Snapshot) -> usize {
        let mut known: HashSet<NoteId> = self.notes.iter().map(|n| n.id.clone()).collect();
        let mut added = 0;
        for note in snapshot.notes {
            if known.insert(note.id.clone()) {
                self.notes.push(note);
                added += 1;
            }
        }
        for link in snapshot.links {
            if !self.has_link(&link.from, &link.to) {
                self.links.push(link);
            }
        }
        added
    }

    /// Snapshot of the store together with the given viewports
    pub fn to_snapshot(&self, map_pos: Viewport, vis_pos: Viewport) -> Snapshot {
        Snapshot {
            notes: self.notes.clone(),
            links: self.links.clone(),
            map_pos,
            vis_pos,
        }
    }

    /// A fresh note id derived from the current time
    pub fn next_id(&mut self) -> NoteId {
        let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
        self.next_id_at(now)
    }

    /// A fresh note id derived from `millis`. Never repeats an id issued by
    /// this board and never collides with a loaded note.
    pub fn next_id_at(&mut self, millis: u64) -> NoteId {
        let mut candidate = millis.max(self.last_issued_id.saturating_add(1));
        while self.contains(&NoteId::new(candidate.to_string())) {
            candidate += 1;
        }
        self.last_issued_id = candidate;
        NoteId::new(candidate.to_string())
    }
}
