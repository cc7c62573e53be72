//! Per-entity undo stacks.
//!
//! Each stack records only the category of each not-yet-undone increment,
//! the minimal log needed to reverse exactly one counter step. The whole
//! structure is a derived cache keyed by entity identity: it is rebuilt
//! empty on every session start and cleared on new-game resets, and it is
//! never persisted.

use crate::category::CategoryId;
use crate::entity::EntityRef;
use std::collections::HashMap;

/// LIFO undo records, one stack per entity.
#[derive(Debug, Clone, Default)]
pub struct UndoStacks {
    stacks: HashMap<EntityRef, Vec<CategoryId>>,
}

impl UndoStacks {
    /// Create with no recorded increments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an increment of `category` for `entity`.
    pub fn push(&mut self, entity: EntityRef, category: CategoryId) {
        self.stacks.entry(entity).or_default().push(category);
    }

    /// Pop the most recent not-yet-undone increment for `entity`.
    pub fn pop(&mut self, entity: &EntityRef) -> Option<CategoryId> {
        let stack = self.stacks.get_mut(entity)?;
        let category = stack.pop();
        if stack.is_empty() {
            self.stacks.remove(entity);
        }
        category
    }

    /// Whether `entity` has anything left to undo.
    pub fn can_undo(&self, entity: &EntityRef) -> bool {
        self.depth(entity) > 0
    }

    /// Number of not-yet-undone increments recorded for `entity`.
    pub fn depth(&self, entity: &EntityRef) -> usize {
        self.stacks.get(entity).map_or(0, Vec::len)
    }

    /// Drop the stack for one entity (player removal).
    pub fn remove_entity(&mut self, entity: &EntityRef) {
        self.stacks.remove(entity);
    }

    /// Drop every stack (roster load / new game).
    pub fn clear(&mut self) {
        self.stacks.clear();
    }
}
