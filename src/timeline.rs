//! The append-only event timeline.
//!
//! Events are kept newest-first by insertion order, never re-sorted by
//! timestamp, so clock skew cannot reorder the audit trail. Events are
//! immutable except for their remarks, and each one is independently
//! deletable: explicitly by the operator, or implicitly when an undo
//! retracts the matching increment.

use crate::category::CategoryId;
use crate::entity::SubjectKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

/// One recorded counter change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub subject_kind: SubjectKind,
    /// Player name, or opponent cap stringified.
    pub subject_id: String,
    pub category: CategoryId,
    /// Signed delta. Always +1 in practice, but the model supports either
    /// sign.
    pub delta: i32,
    /// Free-text remarks, mutable after creation.
    #[serde(default)]
    pub remarks: String,
}

/// The chronological audit log, newest-first.
///
/// # Examples
///
/// ```rust
/// use polostat::{CategoryId, SubjectKind, Timeline};
///
/// let mut timeline = Timeline::new();
/// let steals = CategoryId::new("Steals");
/// timeline.append(SubjectKind::Player, "P", steals.clone(), 1);
/// let newest = timeline.append(SubjectKind::Player, "P", steals.clone(), 1);
///
/// // Undo removes the most recent matching increment, not the oldest.
/// let removed = timeline
///     .remove_newest_matching(SubjectKind::Player, "P", &steals, 1)
///     .unwrap();
/// assert_eq!(removed, newest);
/// assert_eq!(timeline.len(), 1);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timeline {
    /// Newest-first. Index 0 is the most recent event.
    events: VecDeque<Event>,
    /// Remarks-focus selection. Cleared when the selected event dies.
    #[serde(skip)]
    selection: Option<Uuid>,
}

impl Timeline {
    /// Create an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events, newest-first.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    /// Number of surviving events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the timeline has no surviving events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Record a new event at the front. Returns the generated id.
    pub fn append(
        &mut self,
        subject_kind: SubjectKind,
        subject_id: &str,
        category: CategoryId,
        delta: i32,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.events.push_front(Event {
            id,
            timestamp: Utc::now(),
            subject_kind,
            subject_id: subject_id.to_string(),
            category,
            delta,
            remarks: String::new(),
        });
        id
    }

    /// Delete an event by id. Returns `false` (no-op) if the id is gone.
    ///
    /// Clears the remarks-focus selection if it pointed at the removed
    /// event.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let Some(pos) = self.events.iter().position(|e| e.id == id) else {
            return false;
        };
        self.events.remove(pos);
        if self.selection == Some(id) {
            self.selection = None;
        }
        true
    }

    /// Delete the most recent event matching all four fields. Returns the
    /// removed event's id, or `None` (no-op) if nothing matches.
    ///
    /// This is what undo uses instead of removal-by-id: it must find the
    /// most recent matching increment, because multiple increments of the
    /// same category may be interleaved with other subjects' events.
    pub fn remove_newest_matching(
        &mut self,
        subject_kind: SubjectKind,
        subject_id: &str,
        category: &CategoryId,
        delta: i32,
    ) -> Option<Uuid> {
        let pos = self.events.iter().position(|e| {
            e.subject_kind == subject_kind
                && e.subject_id == subject_id
                && e.category == *category
                && e.delta == delta
        })?;
        let id = self.events[pos].id;
        self.events.remove(pos);
        if self.selection == Some(id) {
            self.selection = None;
        }
        Some(id)
    }

    /// Replace the remarks of a surviving event. Returns `false` (no-op)
    /// if the id no longer exists; a deleted event is never resurrected.
    pub fn set_remarks(&mut self, id: Uuid, text: &str) -> bool {
        match self.events.iter_mut().find(|e| e.id == id) {
            Some(event) => {
                event.remarks = text.to_string();
                true
            }
            None => false,
        }
    }

    /// Focus an event for remarks editing, or clear the focus with `None`.
    /// Selecting an id that no longer exists clears the focus.
    pub fn select(&mut self, id: Option<Uuid>) {
        self.selection = match id {
            Some(id) if self.events.iter().any(|e| e.id == id) => Some(id),
            _ => None,
        };
    }

    /// The currently focused event id, if any.
    pub fn selection(&self) -> Option<Uuid> {
        self.selection
    }

    /// Drop all events and the selection (new game).
    pub fn clear(&mut self) {
        self.events.clear();
        self.selection = None;
    }

    /// Replace all events wholesale (used by session migration). Events
    /// are taken as already newest-first.
    pub(crate) fn set_events(&mut self, events: Vec<Event>) {
        self.events = events.into();
        self.selection = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steals() -> CategoryId {
        CategoryId::new("Steals")
    }

    #[test]
    fn test_append_is_newest_first() {
        let mut timeline = Timeline::new();
        let first = timeline.append(SubjectKind::Player, "P", steals(), 1);
        let second = timeline.append(SubjectKind::Player, "Q", steals(), 1);

        let ids: Vec<Uuid> = timeline.events().map(|e| e.id).collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[test]
    fn test_remove_newest_matching_skips_other_subjects() {
        let mut timeline = Timeline::new();
        let oldest = timeline.append(SubjectKind::Player, "P", steals(), 1);
        let other = timeline.append(SubjectKind::Player, "Q", steals(), 1);
        let newest = timeline.append(SubjectKind::Player, "P", steals(), 1);

        let removed = timeline
            .remove_newest_matching(SubjectKind::Player, "P", &steals(), 1)
            .unwrap();
        assert_eq!(removed, newest);

        let ids: Vec<Uuid> = timeline.events().map(|e| e.id).collect();
        assert_eq!(ids, vec![other, oldest]);
    }

    #[test]
    fn test_remove_newest_matching_no_match_is_noop() {
        let mut timeline = Timeline::new();
        timeline.append(SubjectKind::Player, "P", steals(), 1);
        assert!(timeline
            .remove_newest_matching(SubjectKind::Opponent, "P", &steals(), 1)
            .is_none());
        assert!(timeline
            .remove_newest_matching(SubjectKind::Player, "P", &steals(), -1)
            .is_none());
        assert_eq!(timeline.len(), 1);
    }

    #[test]
    fn test_remove_clears_matching_selection() {
        let mut timeline = Timeline::new();
        let id = timeline.append(SubjectKind::Player, "P", steals(), 1);
        let other = timeline.append(SubjectKind::Player, "Q", steals(), 1);

        timeline.select(Some(id));
        assert_eq!(timeline.selection(), Some(id));

        // Removing an unrelated event keeps the selection.
        assert!(timeline.remove(other));
        assert_eq!(timeline.selection(), Some(id));

        assert!(timeline.remove(id));
        assert_eq!(timeline.selection(), None);
    }

    #[test]
    fn test_set_remarks_on_dead_event_is_noop() {
        let mut timeline = Timeline::new();
        let id = timeline.append(SubjectKind::Player, "P", steals(), 1);
        assert!(timeline.set_remarks(id, "nice steal"));
        assert_eq!(timeline.events().next().unwrap().remarks, "nice steal");

        timeline.remove(id);
        assert!(!timeline.set_remarks(id, "too late"));
        assert!(timeline.is_empty());
    }

    #[test]
    fn test_select_unknown_id_clears_focus() {
        let mut timeline = Timeline::new();
        let id = timeline.append(SubjectKind::Player, "P", steals(), 1);
        timeline.select(Some(id));
        timeline.select(Some(Uuid::new_v4()));
        assert_eq!(timeline.selection(), None);
    }
}
