//! Player and opponent records and the store that owns them.
//!
//! The store exclusively owns every counter mapping. Counter mutation is
//! never exposed directly to callers; it happens only through the
//! [`crate::ledger::Ledger`] facade so the timeline can never diverge
//! from the counters.

use crate::category::{opponent_categories, CategoryId, Role};
use crate::error::LedgerError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lowest opponent cap number.
pub const OPPONENT_CAP_MIN: u8 = 1;

/// Highest opponent cap number. The opponent pool is created in full at
/// session start and never grows or shrinks.
pub const OPPONENT_CAP_MAX: u8 = 24;

/// How a player entered the roster.
///
/// Preloaded players are immutable as to existence: they can be renamed
/// into a new roster only by a full roster load, never removed one by
/// one. Manual players can be removed at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Preloaded,
    Manual,
}

/// Which population a timeline subject belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    Player,
    Opponent,
}

impl std::fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubjectKind::Player => write!(f, "player"),
            SubjectKind::Opponent => write!(f, "opponent"),
        }
    }
}

/// Reference to one entity: a player by name or an opponent by cap.
///
/// # Examples
///
/// ```rust
/// use polostat::{EntityRef, SubjectKind};
///
/// let player = EntityRef::player("Taylor Smith");
/// assert_eq!(player.kind(), SubjectKind::Player);
/// assert_eq!(player.id_string(), "Taylor Smith");
///
/// let opp = EntityRef::opponent(7);
/// assert_eq!(opp.kind(), SubjectKind::Opponent);
/// assert_eq!(opp.id_string(), "7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Player(String),
    Opponent(u8),
}

impl EntityRef {
    /// Reference a player by name.
    pub fn player(name: impl Into<String>) -> Self {
        EntityRef::Player(name.into())
    }

    /// Reference an opponent by cap number.
    pub fn opponent(cap: u8) -> Self {
        EntityRef::Opponent(cap)
    }

    /// The population this reference points into.
    pub fn kind(&self) -> SubjectKind {
        match self {
            EntityRef::Player(_) => SubjectKind::Player,
            EntityRef::Opponent(_) => SubjectKind::Opponent,
        }
    }

    /// The subject identity as stored on timeline events (name, or the
    /// cap number stringified).
    pub fn id_string(&self) -> String {
        match self {
            EntityRef::Player(name) => name.clone(),
            EntityRef::Opponent(cap) => cap.to_string(),
        }
    }
}

/// One roster player, with its counters keyed by effective category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    /// Free-text cap number, optional.
    pub cap: String,
    pub role: Role,
    pub origin: Origin,
    /// Non-negative counters keyed by the player's effective categories.
    pub counters: HashMap<CategoryId, u32>,
}

impl Player {
    /// Build a player with every category in `categories` zeroed.
    pub fn with_zeroed(
        name: impl Into<String>,
        cap: impl Into<String>,
        role: Role,
        origin: Origin,
        categories: &[CategoryId],
    ) -> Self {
        Self {
            name: name.into(),
            cap: cap.into(),
            role,
            origin,
            counters: categories.iter().map(|c| (c.clone(), 0)).collect(),
        }
    }
}

/// One numbered opponent, with counters over the eight fixed per-quarter
/// ejection/penalty columns only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opponent {
    pub cap: u8,
    pub counters: HashMap<CategoryId, u32>,
}

impl Opponent {
    /// Build an opponent with all eight columns zeroed.
    pub fn with_zeroed(cap: u8) -> Self {
        Self {
            cap,
            counters: opponent_categories().into_iter().map(|c| (c, 0)).collect(),
        }
    }
}

/// One entry of a caller-supplied roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub name: String,
    pub cap: String,
    pub is_goalie: bool,
}

impl RosterEntry {
    pub fn new(name: impl Into<String>, cap: impl Into<String>, is_goalie: bool) -> Self {
        Self {
            name: name.into(),
            cap: cap.into(),
            is_goalie,
        }
    }

    pub fn role(&self) -> Role {
        if self.is_goalie {
            Role::Goalie
        } else {
            Role::Field
        }
    }
}

/// Holds the player roster and the fixed opponent pool.
#[derive(Debug, Clone)]
pub struct EntityStore {
    players: Vec<Player>,
    opponents: Vec<Opponent>,
}

impl EntityStore {
    /// Create a store with no players and the full opponent pool
    /// (caps 1..=24, all counters zeroed).
    pub fn new() -> Self {
        Self {
            players: Vec::new(),
            opponents: (OPPONENT_CAP_MIN..=OPPONENT_CAP_MAX)
                .map(Opponent::with_zeroed)
                .collect(),
        }
    }

    /// Players in insertion order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Opponents in cap order.
    pub fn opponents(&self) -> &[Opponent] {
        &self.opponents
    }

    /// Look up a player by exact name.
    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    /// Look up an opponent by cap.
    pub fn opponent(&self, cap: u8) -> Option<&Opponent> {
        self.opponents.iter().find(|o| o.cap == cap)
    }

    /// Mutable player access for category backfill and removal.
    pub(crate) fn players_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.iter_mut()
    }

    /// Mutable access to the counters of one entity, if it exists.
    pub(crate) fn counters_mut(
        &mut self,
        entity: &EntityRef,
    ) -> Option<&mut HashMap<CategoryId, u32>> {
        match entity {
            EntityRef::Player(name) => self
                .players
                .iter_mut()
                .find(|p| p.name == *name)
                .map(|p| &mut p.counters),
            EntityRef::Opponent(cap) => self
                .opponents
                .iter_mut()
                .find(|o| o.cap == *cap)
                .map(|o| &mut o.counters),
        }
    }

    /// Whether `entity` currently exists in the store.
    pub fn contains(&self, entity: &EntityRef) -> bool {
        match entity {
            EntityRef::Player(name) => self.player(name).is_some(),
            EntityRef::Opponent(cap) => self.opponent(*cap).is_some(),
        }
    }

    /// Add a manual player.
    ///
    /// The name is trimmed first. Fails with [`LedgerError::InvalidInput`]
    /// if the trimmed name is empty and [`LedgerError::DuplicateName`] on
    /// an exact (case-sensitive) name collision. Counters start at zero
    /// for every category in `categories`.
    pub fn add_player(
        &mut self,
        name: &str,
        cap: &str,
        role: Role,
        categories: &[CategoryId],
    ) -> Result<(), LedgerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::InvalidInput("player name".into()));
        }
        if self.player(name).is_some() {
            return Err(LedgerError::DuplicateName(name.to_string()));
        }
        self.players.push(Player::with_zeroed(
            name,
            cap.trim(),
            role,
            Origin::Manual,
            categories,
        ));
        Ok(())
    }

    /// Remove a manual player.
    ///
    /// Fails with [`LedgerError::UnknownEntity`] if absent and
    /// [`LedgerError::Protected`] if the player came from a roster load.
    pub fn remove_player(&mut self, name: &str) -> Result<(), LedgerError> {
        let player = self
            .player(name)
            .ok_or_else(|| LedgerError::UnknownEntity(name.to_string()))?;
        if player.origin == Origin::Preloaded {
            return Err(LedgerError::Protected(name.to_string()));
        }
        self.players.retain(|p| p.name != name);
        Ok(())
    }

    /// Set a player's cap. Always permitted for an existing player.
    pub fn set_cap(&mut self, name: &str, cap: &str) -> Result<(), LedgerError> {
        let player = self
            .players
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| LedgerError::UnknownEntity(name.to_string()))?;
        player.cap = cap.to_string();
        Ok(())
    }

    /// Replace the entire player set with a preloaded roster.
    ///
    /// Each entry gets zeroed counters over the effective categories its
    /// role produces via `categories_for`.
    pub fn load_roster<F>(&mut self, roster: &[RosterEntry], mut categories_for: F)
    where
        F: FnMut(Role) -> Vec<CategoryId>,
    {
        self.players = roster
            .iter()
            .map(|entry| {
                let role = entry.role();
                Player::with_zeroed(
                    entry.name.clone(),
                    entry.cap.clone(),
                    role,
                    Origin::Preloaded,
                    &categories_for(role),
                )
            })
            .collect();
    }

    /// Replace the stored players wholesale (used by session migration).
    pub(crate) fn set_players(&mut self, players: Vec<Player>) {
        self.players = players;
    }

    /// Replace the stored opponents wholesale (used by session migration).
    pub(crate) fn set_opponents(&mut self, opponents: Vec<Opponent>) {
        self.opponents = opponents;
    }
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::CategoryRegistry;

    fn field_cats() -> Vec<CategoryId> {
        CategoryRegistry::new().effective_categories(Role::Field)
    }

    #[test]
    fn test_new_store_has_full_opponent_pool() {
        let store = EntityStore::new();
        assert_eq!(store.opponents().len(), 24);
        assert_eq!(store.opponents()[0].cap, 1);
        assert_eq!(store.opponents()[23].cap, 24);
        assert_eq!(store.opponents()[0].counters.len(), 8);
    }

    #[test]
    fn test_add_player_validation() {
        let mut store = EntityStore::new();
        let cats = field_cats();

        assert_eq!(
            store.add_player("   ", "", Role::Field, &cats),
            Err(LedgerError::InvalidInput("player name".into()))
        );
        assert!(store.add_player("Alex", "7", Role::Field, &cats).is_ok());
        assert_eq!(
            store.add_player("Alex", "9", Role::Field, &cats),
            Err(LedgerError::DuplicateName("Alex".into()))
        );
        // Case-sensitive: a different casing is a different player.
        assert!(store.add_player("alex", "", Role::Field, &cats).is_ok());
    }

    #[test]
    fn test_add_player_trims_name() {
        let mut store = EntityStore::new();
        store
            .add_player("  Alex  ", " 7 ", Role::Field, &field_cats())
            .unwrap();
        let player = store.player("Alex").unwrap();
        assert_eq!(player.cap, "7");
        assert_eq!(player.counters.get(&CategoryId::new("Q1")), Some(&0));
    }

    #[test]
    fn test_remove_player_protection() {
        let mut store = EntityStore::new();
        store.load_roster(
            &[RosterEntry::new("Sam", "1", true)],
            |role| CategoryRegistry::new().effective_categories(role),
        );
        store.add_player("Alex", "", Role::Field, &field_cats()).unwrap();

        assert_eq!(
            store.remove_player("Sam"),
            Err(LedgerError::Protected("Sam".into()))
        );
        assert_eq!(
            store.remove_player("Nobody"),
            Err(LedgerError::UnknownEntity("Nobody".into()))
        );
        assert!(store.remove_player("Alex").is_ok());
        assert!(store.player("Alex").is_none());
    }

    #[test]
    fn test_load_roster_replaces_players() {
        let mut store = EntityStore::new();
        store.add_player("Alex", "", Role::Field, &field_cats()).unwrap();
        store.load_roster(
            &[
                RosterEntry::new("Sam", "1", true),
                RosterEntry::new("Riley", "2", false),
            ],
            |role| CategoryRegistry::new().effective_categories(role),
        );

        assert_eq!(store.players().len(), 2);
        assert!(store.player("Alex").is_none());
        let sam = store.player("Sam").unwrap();
        assert_eq!(sam.origin, Origin::Preloaded);
        assert_eq!(sam.role, Role::Goalie);
        assert!(sam.counters.contains_key(&CategoryId::new("Saves")));
        assert!(!sam.counters.contains_key(&CategoryId::new("Q1")));
    }

    #[test]
    fn test_set_cap() {
        let mut store = EntityStore::new();
        store.add_player("Alex", "", Role::Field, &field_cats()).unwrap();
        store.set_cap("Alex", "13").unwrap();
        assert_eq!(store.player("Alex").unwrap().cap, "13");
        assert!(store.set_cap("Nobody", "1").is_err());
    }
}
