//! # polostat - Synchronized Stat Ledger for Live Game Tracking
//!
//! A stat ledger for tracking live, incrementable statistics during a
//! timed water polo game:
//! - **Synchronized** counters, audit timeline, and per-entity undo
//!   stacks that can never diverge
//! - **Undoable** taps: the most recent increment per entity can be
//!   reversed without corrupting the chronological audit log
//! - **Dynamic** categories: user-defined extras added and removed at
//!   runtime, backfilled across the roster
//! - **Migrating** session loads: partial, missing, or legacy persisted
//!   data is repaired, never rejected
//!
//! ## Core Concepts
//!
//! ### The Ledger Facade
//!
//! Every stat change flows through one entry point:
//!
//! ```text
//! [UI tap] → [Ledger::increment / Ledger::undo] → counters + timeline + undo stack
//! ```
//!
//! The three updates are one conceptual transaction: all complete before
//! control returns, so no observer sees a counter without its matching
//! timeline event.
//!
//! ### Key Features
//!
//! - **Two populations**: a roster of players (goalie or field role) and
//!   a fixed pool of 24 numbered opponents
//! - **Newest-first timeline**: ordered by insertion, never re-sorted by
//!   timestamp, each event independently deletable and annotatable
//! - **Flash feedback**: a self-expiring, token-superseded UI marker with
//!   an explicit display class per category
//! - **CSV export**: players, opponents, and timeline tables with
//!   standard quote escaping
//! - **Session store**: key-value blob persistence with idempotent
//!   migration of legacy data
//!
//! ## Example
//!
//! ```rust
//! use polostat::{export, CategoryId, EntityRef, Ledger};
//!
//! let mut ledger = Ledger::new();
//! ledger.add_player("Taylor Smith", "7", false).unwrap();
//!
//! let taylor = EntityRef::player("Taylor Smith");
//! let steals = CategoryId::new("Steals");
//!
//! ledger.increment(&taylor, &steals).unwrap();
//! ledger.increment(&taylor, &steals).unwrap();
//! assert_eq!(ledger.counter(&taylor, &steals), Some(2));
//!
//! // Undo reverses the last tap in counters and timeline together.
//! ledger.undo(&taylor);
//! assert_eq!(ledger.counter(&taylor, &steals), Some(1));
//! assert_eq!(ledger.timeline().len(), 1);
//!
//! let csv = export::export_csv(&ledger);
//! assert!(csv.starts_with("Player,Cap,"));
//! ```
//!
//! ## Modules
//!
//! - [`category`] - Category ids, fixed schema, and the extras registry
//! - [`entity`] - Player/opponent records and the entity store
//! - [`timeline`] - The newest-first audit timeline
//! - [`undo`] - Per-entity undo stacks
//! - [`ledger`] - The ledger facade (the single mutation entry point)
//! - [`flash`] - Transient flash feedback markers
//! - [`export`] - CSV tables and the export artifact
//! - [`session`] - Key-value persistence and migration
//! - [`error`] - Error types

pub mod category;
pub mod entity;
pub mod error;
pub mod export;
pub mod flash;
pub mod ledger;
pub mod session;
pub mod timeline;
pub mod undo;

// Re-export main types for convenience
pub use category::{CategoryClass, CategoryDef, CategoryId, CategoryRegistry, DisplayClass, Role};
pub use entity::{EntityRef, Opponent, Origin, Player, RosterEntry, SubjectKind};
pub use error::LedgerError;
pub use flash::{Flash, FlashMode, FlashTreatment};
pub use ledger::{Ledger, UndoOutcome};
pub use session::{MemoryStore, SessionStore};
pub use timeline::{Event, Timeline};
pub use undo::UndoStacks;
