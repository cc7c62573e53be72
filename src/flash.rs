//! Transient flash feedback markers.
//!
//! A flash is pure UI feedback for the last increment or undo: it carries
//! no persisted state and no counter or timeline effect. It must
//! self-expire, and a new flash must supersede a pending expiry rather
//! than queue behind it. The crate side of that contract is the
//! monotonically increasing token on each marker: the embedder schedules
//! its own timer and calls [`crate::Ledger::expire_flash`] with the
//! token, which only clears the marker if no newer flash has replaced it.

use crate::category::{CategoryId, DisplayClass};
use crate::entity::EntityRef;

/// Which ledger operation produced the flash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashMode {
    Increment,
    Undo,
}

/// Visual treatment for a flash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashTreatment {
    /// Ordinary increment feedback.
    Positive,
    /// Increment of a penalty-class category.
    Warning,
    /// Undo feedback, always distinct regardless of category.
    Undo,
}

/// The current flash marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub subject: EntityRef,
    pub category: CategoryId,
    pub mode: FlashMode,
    /// Monotonically increasing. A stale expiry carrying an older token
    /// never clears a newer flash.
    pub token: u64,
}

impl Flash {
    /// The treatment to render, given the display class recorded on the
    /// category's definition.
    ///
    /// Undo always wins over the category's class.
    pub fn treatment(&self, class: DisplayClass) -> FlashTreatment {
        match self.mode {
            FlashMode::Undo => FlashTreatment::Undo,
            FlashMode::Increment => match class {
                DisplayClass::Warning => FlashTreatment::Warning,
                DisplayClass::Positive => FlashTreatment::Positive,
            },
        }
    }
}
