//! Session persistence and schema migration.
//!
//! The ledger persists as opaque JSON blobs in a key-value
//! [`SessionStore`]. Any subset of keys may be missing, and a malformed
//! blob is treated as absent — loading never fails. Persisted records are
//! of unknown vintage: legacy blobs used camelCase keys and stored fixed
//! category names in the extras list, so everything is migrated on the
//! way in. Migration is idempotent: re-running it on already-migrated
//! data is a no-op.
//!
//! Saving is fire-and-forget from the ledger's point of view: the
//! in-memory state stays authoritative whether or not the store call
//! succeeds.

use crate::category::{
    opponent_categories, CategoryId, CategoryRegistry, Role, GOALIE_TOP, QUARTERS,
};
use crate::entity::{Opponent, Origin, Player, OPPONENT_CAP_MAX, OPPONENT_CAP_MIN};
use crate::ledger::Ledger;
use crate::timeline::Event;
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Store key for the player list.
pub const PLAYERS_KEY: &str = "wp_players";
/// Store key for the extra-category list.
pub const CATEGORIES_KEY: &str = "wp_categories";
/// Store key for the opponent list.
pub const OPPONENTS_KEY: &str = "wp_opponents";
/// Store key for the event timeline.
pub const EVENTS_KEY: &str = "wp_events";
/// Store key for the game identifier (stored raw, not JSON).
pub const GAME_ID_KEY: &str = "wp_game";

/// Key-value persistence of opaque serialized snapshots.
///
/// Implementations never need to validate blob contents; migration on
/// load tolerates anything.
pub trait SessionStore {
    /// Read the blob under `key`, if present.
    fn get(&self, key: &str) -> Option<String>;

    /// Write the blob under `key`.
    fn set(&mut self, key: &str, value: &str);

    /// Delete the blob under `key`, if present.
    fn remove(&mut self, key: &str);
}

/// In-memory [`SessionStore`], used in tests and as a default backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Persisted player record of unknown vintage.
///
/// Legacy blobs used camelCase keys; the aliases keep them loadable.
/// Missing fields default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedPlayer {
    pub name: String,
    #[serde(default)]
    pub cap: String,
    #[serde(default, alias = "isGoalie")]
    pub is_goalie: bool,
    #[serde(default, alias = "isPreloaded")]
    pub is_preloaded: bool,
    #[serde(default)]
    pub stats: HashMap<String, u32>,
}

impl From<&Player> for PersistedPlayer {
    fn from(player: &Player) -> Self {
        Self {
            name: player.name.clone(),
            cap: player.cap.clone(),
            is_goalie: player.role == Role::Goalie,
            is_preloaded: player.origin == Origin::Preloaded,
            stats: player
                .counters
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        }
    }
}

/// Persisted opponent record of unknown vintage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedOpponent {
    pub cap: u8,
    #[serde(default)]
    pub stats: HashMap<String, u32>,
}

impl From<&Opponent> for PersistedOpponent {
    fn from(opponent: &Opponent) -> Self {
        Self {
            cap: opponent.cap,
            stats: opponent
                .counters
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        }
    }
}

/// Rebuild the extras registry from a persisted extras list.
///
/// Legacy data once stored fixed category names as "extra"; anything
/// that is a fixed name in either role, a duplicate, or blank is
/// dropped.
pub fn migrate_extras(raw: &[String]) -> CategoryRegistry {
    let mut registry = CategoryRegistry::new();
    for name in raw {
        if registry.register_extra(name).is_err() {
            warn!("dropping persisted extra category {name:?}");
        }
    }
    registry
}

/// Repair one persisted player into a valid live record.
///
/// Computes the effective category set for the player's role, fills any
/// missing counter with 0, and drops counter keys belonging to the other
/// role's exclusive top row (a field player must never retain goalie-only
/// counters, and vice versa). Idempotent.
pub fn migrate_player(raw: &PersistedPlayer, registry: &CategoryRegistry) -> Player {
    let role = if raw.is_goalie {
        Role::Goalie
    } else {
        Role::Field
    };
    let origin = if raw.is_preloaded {
        Origin::Preloaded
    } else {
        Origin::Manual
    };

    let mut counters: HashMap<CategoryId, u32> = raw
        .stats
        .iter()
        .map(|(name, value)| (CategoryId::new(name), *value))
        .collect();

    for category in registry.effective_categories(role) {
        counters.entry(category).or_insert(0);
    }

    let foreign_top: &[&str] = match role {
        Role::Field => &GOALIE_TOP,
        Role::Goalie => &QUARTERS,
    };
    for name in foreign_top {
        counters.remove(&CategoryId::new(name));
    }

    Player {
        name: raw.name.clone(),
        cap: raw.cap.clone(),
        role,
        origin,
        counters,
    }
}

/// Reconcile persisted opponents against the fixed cap range.
///
/// Unknown caps are discarded, missing caps are synthesized with zeroed
/// counters, and each surviving opponent keeps exactly the eight fixed
/// per-quarter keys, backfilled with 0 where absent. Idempotent.
pub fn migrate_opponents(raw: &[PersistedOpponent]) -> Vec<Opponent> {
    let columns = opponent_categories();
    (OPPONENT_CAP_MIN..=OPPONENT_CAP_MAX)
        .map(|cap| {
            let stats = raw.iter().find(|o| o.cap == cap).map(|o| &o.stats);
            let counters = columns
                .iter()
                .map(|column| {
                    let value = stats
                        .and_then(|s| s.get(column.as_str()))
                        .copied()
                        .unwrap_or(0);
                    (column.clone(), value)
                })
                .collect();
            Opponent { cap, counters }
        })
        .collect()
}

/// Load and migrate a session from `store`, producing a valid ledger.
///
/// Missing or malformed blobs fall back to default/empty initialization;
/// this never fails. Undo stacks are not persisted and start empty.
///
/// # Examples
///
/// ```rust
/// use polostat::session::{self, MemoryStore};
///
/// let store = MemoryStore::new();
/// let ledger = session::load(&store);
/// assert!(ledger.players().is_empty());
/// assert_eq!(ledger.opponents().len(), 24);
/// ```
pub fn load(store: &impl SessionStore) -> Ledger {
    let raw_players: Vec<PersistedPlayer> = read_json(store, PLAYERS_KEY);
    let raw_extras: Vec<String> = read_json(store, CATEGORIES_KEY);
    let raw_opponents: Vec<PersistedOpponent> = read_json(store, OPPONENTS_KEY);
    let events: Vec<Event> = read_json(store, EVENTS_KEY);
    let game_id = store.get(GAME_ID_KEY).unwrap_or_default();

    let registry = migrate_extras(&raw_extras);
    let players = raw_players
        .iter()
        .map(|raw| migrate_player(raw, &registry))
        .collect::<Vec<_>>();
    let opponents = migrate_opponents(&raw_opponents);

    info!(
        "session loaded: {} players, {} events",
        players.len(),
        events.len()
    );
    Ledger::restore(registry, players, opponents, events, game_id)
}

/// Persist the ledger's current state to `store`.
///
/// Writes every key; undo stacks and the flash marker are deliberately
/// not persisted.
pub fn save(ledger: &Ledger, store: &mut impl SessionStore) {
    let players: Vec<PersistedPlayer> = ledger.players().iter().map(Into::into).collect();
    let extras: Vec<String> = ledger.extras().iter().map(|c| c.to_string()).collect();
    let opponents: Vec<PersistedOpponent> = ledger.opponents().iter().map(Into::into).collect();
    let events: Vec<Event> = ledger.timeline().events().cloned().collect();

    write_json(store, PLAYERS_KEY, &players);
    write_json(store, CATEGORIES_KEY, &extras);
    write_json(store, OPPONENTS_KEY, &opponents);
    write_json(store, EVENTS_KEY, &events);
    store.set(GAME_ID_KEY, ledger.game_id());
}

fn read_json<T: DeserializeOwned + Default>(store: &impl SessionStore, key: &str) -> T {
    match store.get(key) {
        None => T::default(),
        Some(blob) => match serde_json::from_str(&blob) {
            Ok(value) => value,
            Err(err) => {
                warn!("discarding malformed {key} blob: {err}");
                T::default()
            }
        },
    }
}

fn write_json<T: Serialize>(store: &mut impl SessionStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(blob) => store.set(key, &blob),
        Err(err) => warn!("failed to serialize {key}: {err}"),
    }
}
