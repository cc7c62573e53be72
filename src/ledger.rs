//! The ledger facade.
//!
//! `Ledger` is the single entry point surrounding the counters, the event
//! timeline and the per-entity undo stacks, and it guarantees they never
//! diverge: every increment updates all three before control returns to
//! the caller, and every undo reverses exactly one increment in all
//! three. Counter mutation is not reachable any other way.
//!
//! The ledger is a plain value held by a single owner. It performs no
//! I/O; persistence lives in [`crate::session`] and is fired by the
//! embedder after a state transition, never awaited.

use crate::category::{CategoryId, CategoryRegistry, Role};
use crate::entity::{EntityRef, EntityStore, Opponent, Player, RosterEntry};
use crate::error::LedgerError;
use crate::flash::{Flash, FlashMode, FlashTreatment};
use crate::timeline::{Event, Timeline};
use crate::undo::UndoStacks;
use log::{debug, info};
use uuid::Uuid;

/// Result of an undo request.
///
/// An empty undo stack is not an error: callers use
/// [`UndoOutcome::NothingToUndo`] to disable the UI affordance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoOutcome {
    /// One increment was reversed; the flash describes it.
    Undone(Flash),
    /// The entity had nothing to undo. All state is unchanged.
    NothingToUndo,
}

impl UndoOutcome {
    /// Whether an increment was actually reversed.
    pub fn undone(&self) -> bool {
        matches!(self, UndoOutcome::Undone(_))
    }
}

/// The synchronized stat ledger.
///
/// # Examples
///
/// ```rust
/// use polostat::{CategoryId, EntityRef, Ledger};
///
/// let mut ledger = Ledger::new();
/// ledger.add_player("Taylor Smith", "7", false).unwrap();
///
/// let taylor = EntityRef::player("Taylor Smith");
/// let steals = CategoryId::new("Steals");
///
/// ledger.increment(&taylor, &steals).unwrap();
/// assert_eq!(ledger.counter(&taylor, &steals), Some(1));
/// assert_eq!(ledger.timeline().len(), 1);
///
/// let outcome = ledger.undo(&taylor);
/// assert!(outcome.undone());
/// assert_eq!(ledger.counter(&taylor, &steals), Some(0));
/// assert!(ledger.timeline().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    categories: CategoryRegistry,
    entities: EntityStore,
    timeline: Timeline,
    undo: UndoStacks,
    flash: Option<Flash>,
    next_flash_token: u64,
    game_id: String,
}

impl Ledger {
    /// Create a fresh ledger: no players, no extras, an empty timeline,
    /// and the full opponent pool.
    pub fn new() -> Self {
        Self {
            categories: CategoryRegistry::new(),
            entities: EntityStore::new(),
            timeline: Timeline::new(),
            undo: UndoStacks::new(),
            flash: None,
            next_flash_token: 0,
            game_id: String::new(),
        }
    }

    /// Rebuild a ledger from migrated session parts. Undo stacks start
    /// empty: they are a per-session cache and are never restored.
    pub(crate) fn restore(
        categories: CategoryRegistry,
        players: Vec<Player>,
        opponents: Vec<Opponent>,
        events: Vec<Event>,
        game_id: String,
    ) -> Self {
        let mut ledger = Ledger::new();
        ledger.categories = categories;
        ledger.entities.set_players(players);
        ledger.entities.set_opponents(opponents);
        ledger.timeline.set_events(events);
        ledger.game_id = game_id;
        ledger
    }

    // --- Core operations ---

    /// Apply one tap: clamp-add +1 to the entity's counter for
    /// `category`, push the matching undo record, and append a timeline
    /// event. The three updates complete before this method returns, so
    /// no observer can see them diverge.
    ///
    /// Fails with [`LedgerError::UnknownEntity`] before any mutation if
    /// the entity does not exist. Returns the flash marker for the tap;
    /// the embedder owns the expiry timer (see
    /// [`Ledger::expire_flash`]).
    pub fn increment(
        &mut self,
        entity: &EntityRef,
        category: &CategoryId,
    ) -> Result<Flash, LedgerError> {
        let counters = self
            .entities
            .counters_mut(entity)
            .ok_or_else(|| LedgerError::UnknownEntity(entity.id_string()))?;

        // Should already exist for well-formed effective categories, but
        // create at 0 defensively rather than fail mid-transaction.
        let value = counters.entry(category.clone()).or_insert(0);
        *value = value.saturating_add(1);

        self.undo.push(entity.clone(), category.clone());
        self.timeline
            .append(entity.kind(), &entity.id_string(), category.clone(), 1);

        debug!("increment {} {}", entity.id_string(), category);
        Ok(self.issue_flash(entity.clone(), category.clone(), FlashMode::Increment))
    }

    /// Reverse the entity's most recent not-yet-undone increment.
    ///
    /// Pops the undo record, clamp-subtracts the counter (floored at
    /// zero, defensive against tampered persisted state), and retracts
    /// the most recent matching timeline event. An empty stack is a
    /// complete no-op reported as [`UndoOutcome::NothingToUndo`].
    pub fn undo(&mut self, entity: &EntityRef) -> UndoOutcome {
        let Some(category) = self.undo.pop(entity) else {
            return UndoOutcome::NothingToUndo;
        };

        if let Some(counters) = self.entities.counters_mut(entity) {
            if let Some(value) = counters.get_mut(&category) {
                *value = value.saturating_sub(1);
            }
        }

        self.timeline
            .remove_newest_matching(entity.kind(), &entity.id_string(), &category, 1);

        debug!("undo {} {}", entity.id_string(), category);
        UndoOutcome::Undone(self.issue_flash(entity.clone(), category, FlashMode::Undo))
    }

    fn issue_flash(&mut self, subject: EntityRef, category: CategoryId, mode: FlashMode) -> Flash {
        self.next_flash_token += 1;
        let flash = Flash {
            subject,
            category,
            mode,
            token: self.next_flash_token,
        };
        self.flash = Some(flash.clone());
        flash
    }

    /// Clear the flash marker, but only if `token` still identifies the
    /// current flash. A late expiry from a superseded timer is a no-op.
    pub fn expire_flash(&mut self, token: u64) {
        if self.flash.as_ref().map(|f| f.token) == Some(token) {
            self.flash = None;
        }
    }

    /// The current flash marker, if one has not expired.
    pub fn current_flash(&self) -> Option<&Flash> {
        self.flash.as_ref()
    }

    /// The visual treatment of the current flash, resolved against the
    /// display class recorded on the category's definition.
    pub fn flash_treatment(&self) -> Option<FlashTreatment> {
        self.flash
            .as_ref()
            .map(|f| f.treatment(self.categories.display_class(&f.category)))
    }

    /// The treatment to render for one (entity, category) tile, or `None`
    /// if the current flash is for a different tile or has expired.
    pub fn flash_for(&self, entity: &EntityRef, category: &CategoryId) -> Option<FlashTreatment> {
        self.flash
            .as_ref()
            .filter(|f| f.subject == *entity && f.category == *category)
            .map(|f| f.treatment(self.categories.display_class(&f.category)))
    }

    /// Whether `entity` has anything left to undo.
    pub fn can_undo(&self, entity: &EntityRef) -> bool {
        self.undo.can_undo(entity)
    }

    // --- Player lifecycle ---

    /// Add a manual player with zeroed counters over the effective
    /// categories for its role.
    pub fn add_player(&mut self, name: &str, cap: &str, is_goalie: bool) -> Result<(), LedgerError> {
        let role = if is_goalie { Role::Goalie } else { Role::Field };
        let categories = self.categories.effective_categories(role);
        self.entities.add_player(name, cap, role, &categories)
    }

    /// Remove a manual player and drop its undo stack. Preloaded players
    /// are protected. Timeline events referencing the player survive.
    pub fn remove_player(&mut self, name: &str) -> Result<(), LedgerError> {
        self.entities.remove_player(name)?;
        self.undo.remove_entity(&EntityRef::player(name));
        Ok(())
    }

    /// Set a player's free-text cap number.
    pub fn set_cap(&mut self, name: &str, cap: &str) -> Result<(), LedgerError> {
        self.entities.set_cap(name, cap)
    }

    /// Replace the entire player set with a preloaded roster, starting a
    /// new game: every undo stack, the timeline, and the flash marker are
    /// cleared atomically with the swap.
    pub fn load_roster(&mut self, roster: &[RosterEntry]) {
        let categories = &self.categories;
        self.entities
            .load_roster(roster, |role| categories.effective_categories(role));
        self.undo.clear();
        self.timeline.clear();
        self.flash = None;
        info!("loaded roster with {} players", roster.len());
    }

    // --- Category lifecycle ---

    /// Register a user-added category. Every existing player gains a
    /// zeroed counter for it; no timeline event is emitted and no
    /// existing counter changes.
    pub fn register_extra(&mut self, name: &str) -> Result<CategoryId, LedgerError> {
        let id = self.categories.register_extra(name)?;
        for player in self.entities.players_mut() {
            player.counters.entry(id.clone()).or_insert(0);
        }
        Ok(id)
    }

    /// Unregister an extra and remove its counter from every player.
    /// Destructive: live counts for the category are lost. Recorded
    /// timeline events referencing it are untouched. No-op (returns
    /// `false`) if the extra is not registered.
    pub fn unregister_extra(&mut self, name: &str) -> bool {
        if !self.categories.unregister_extra(name) {
            return false;
        }
        let id = CategoryId::new(name);
        for player in self.entities.players_mut() {
            player.counters.remove(&id);
        }
        true
    }

    /// The effective category set for `role`, in display order.
    pub fn effective_categories(&self, role: Role) -> Vec<CategoryId> {
        self.categories.effective_categories(role)
    }

    /// The registered extras, in registration order.
    pub fn extras(&self) -> Vec<CategoryId> {
        self.categories.extras()
    }

    // --- Timeline surface ---

    /// Replace the remarks of a surviving timeline event. No-op (returns
    /// `false`) if the event has been deleted or undone.
    pub fn set_remarks(&mut self, id: Uuid, text: &str) -> bool {
        self.timeline.set_remarks(id, text)
    }

    /// Delete a timeline event by id. Does not touch counters or undo
    /// stacks: explicit deletion is an audit-log edit, not an undo.
    pub fn remove_event(&mut self, id: Uuid) -> bool {
        self.timeline.remove(id)
    }

    /// Focus a timeline event for remarks editing.
    pub fn select_event(&mut self, id: Option<Uuid>) {
        self.timeline.select(id);
    }

    // --- Queries ---

    /// Current counter value, if the entity exists and tracks the
    /// category. `None` distinguishes "never tracked" from "tracked at
    /// zero".
    pub fn counter(&self, entity: &EntityRef, category: &CategoryId) -> Option<u32> {
        match entity {
            EntityRef::Player(name) => self
                .entities
                .player(name)
                .and_then(|p| p.counters.get(category))
                .copied(),
            EntityRef::Opponent(cap) => self
                .entities
                .opponent(*cap)
                .and_then(|o| o.counters.get(category))
                .copied(),
        }
    }

    /// Players in insertion order.
    pub fn players(&self) -> &[Player] {
        self.entities.players()
    }

    /// Look up a player by exact name.
    pub fn player(&self, name: &str) -> Option<&Player> {
        self.entities.player(name)
    }

    /// Opponents in cap order.
    pub fn opponents(&self) -> &[Opponent] {
        self.entities.opponents()
    }

    /// Look up an opponent by cap.
    pub fn opponent(&self, cap: u8) -> Option<&Opponent> {
        self.entities.opponent(cap)
    }

    /// The audit timeline, newest-first.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// The session's game identifier (free text, may be empty).
    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    /// Set the session's game identifier.
    pub fn set_game_id(&mut self, game_id: &str) {
        self.game_id = game_id.to_string();
    }

    /// Clear everything back to the fresh-session state: no players, no
    /// extras, empty timeline, empty undo stacks, zeroed opponent pool,
    /// blank game id.
    pub fn reset(&mut self) {
        info!("resetting ledger");
        *self = Ledger::new();
    }
}
