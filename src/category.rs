//! Category identifiers, the fixed category schema, and the registry of
//! user-added extras.
//!
//! Category names are interned strings (`CategoryId`). The fixed schema is
//! role-dependent: field players get the four quarter tiles on top, goalies
//! get the goalie row; both share the core row and the hidden tiles.
//! Opponents have their own fixed set of eight per-quarter columns and
//! never see extras.
//!
//! Every category definition carries an explicit [`DisplayClass`] decided
//! when the definition is created. Rendering never infers the class from
//! the name.

use crate::error::LedgerError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

/// Field-player top row, one tile per quarter.
pub const QUARTERS: [&str; 4] = ["Q1", "Q2", "Q3", "Q4"];

/// Goalie top row.
pub const GOALIE_TOP: [&str; 4] = ["Saves", "Goals Against", "Bad Passes", "Goals"];

/// Core row, common to both roles.
pub const CORE_ROW: [&str; 7] = [
    "Attempts",
    "Assists",
    "Drawn Exclusions",
    "Steals",
    "Turnovers",
    "Shot Block",
    "Sprint Won",
];

/// Hidden tiles, present for both roles but kept out of the primary grid.
pub const HIDDEN_TILES: [&str; 2] = ["Ejections", "Penalties"];

/// Interned string identifier for a category.
///
/// Uses `Arc<str>` so that the many copies held by counters, undo stacks
/// and timeline events share one allocation and compare fast.
///
/// # Examples
///
/// ```rust
/// use polostat::CategoryId;
///
/// let steals = CategoryId::new("Steals");
/// let steals2: CategoryId = "Steals".into();
/// assert_eq!(steals, steals2);
/// assert_eq!(steals.as_str(), "Steals");
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct CategoryId(Arc<str>);

impl CategoryId {
    /// Create a new `CategoryId` from a string slice.
    pub fn new(s: &str) -> Self {
        Self(Arc::from(s))
    }

    /// Get the string representation of this `CategoryId`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Serialize for CategoryId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CategoryId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(CategoryId::from(s))
    }
}

impl From<&str> for CategoryId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CategoryId {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Player role. Determines the role-specific top row of the fixed schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Field,
    Goalie,
}

/// Structural class of a category definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryClass {
    /// A per-quarter tile (field-player top row).
    FixedQuarter,
    /// A goalie top-row tile.
    FixedGoalie,
    /// A core-row tile shared by both roles.
    FixedCore,
    /// An ejection/penalty tile, present but not in the primary grid.
    FixedHidden,
    /// A user-registered category, addable and removable at runtime.
    Extra,
}

/// Visual treatment assigned to a category at definition time.
///
/// Used only for flash feedback; it has no effect on counters or the
/// timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayClass {
    Positive,
    Warning,
}

/// A category definition: name plus its structural and display class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDef {
    pub id: CategoryId,
    pub class: CategoryClass,
    pub display: DisplayClass,
}

impl CategoryDef {
    fn new(name: &str, class: CategoryClass, display: DisplayClass) -> Self {
        Self {
            id: CategoryId::new(name),
            class,
            display,
        }
    }
}

/// The eight opponent columns in quarter-major order:
/// `Q1 Ejection`, `Q1 Penalty`, ..., `Q4 Ejection`, `Q4 Penalty`.
///
/// Penalty columns are [`DisplayClass::Warning`]; ejections are
/// [`DisplayClass::Positive`].
pub fn opponent_definitions() -> Vec<CategoryDef> {
    let mut defs = Vec::with_capacity(QUARTERS.len() * 2);
    for quarter in QUARTERS {
        defs.push(CategoryDef::new(
            &format!("{quarter} Ejection"),
            CategoryClass::FixedHidden,
            DisplayClass::Positive,
        ));
        defs.push(CategoryDef::new(
            &format!("{quarter} Penalty"),
            CategoryClass::FixedHidden,
            DisplayClass::Warning,
        ));
    }
    defs
}

/// The eight opponent category ids in quarter-major order.
pub fn opponent_categories() -> Vec<CategoryId> {
    opponent_definitions().into_iter().map(|d| d.id).collect()
}

/// Fixed player definitions for a role, in display order: role-specific
/// top row, then core row, then hidden tiles.
pub fn fixed_definitions(role: Role) -> Vec<CategoryDef> {
    let top: &[&str] = match role {
        Role::Field => &QUARTERS,
        Role::Goalie => &GOALIE_TOP,
    };
    let top_class = match role {
        Role::Field => CategoryClass::FixedQuarter,
        Role::Goalie => CategoryClass::FixedGoalie,
    };

    let mut defs = Vec::new();
    for name in top {
        defs.push(CategoryDef::new(name, top_class, DisplayClass::Positive));
    }
    for name in CORE_ROW {
        defs.push(CategoryDef::new(
            name,
            CategoryClass::FixedCore,
            DisplayClass::Positive,
        ));
    }
    defs.push(CategoryDef::new(
        "Ejections",
        CategoryClass::FixedHidden,
        DisplayClass::Positive,
    ));
    defs.push(CategoryDef::new(
        "Penalties",
        CategoryClass::FixedHidden,
        DisplayClass::Warning,
    ));
    defs
}

/// Whether `name` is a fixed category name for either player role.
///
/// Extras may never shadow a fixed name, and persisted extras lists are
/// filtered with this check (legacy data once stored fixed names as
/// "extra").
pub fn is_fixed_name(name: &str) -> bool {
    QUARTERS.contains(&name)
        || GOALIE_TOP.contains(&name)
        || CORE_ROW.contains(&name)
        || HIDDEN_TILES.contains(&name)
}

/// Registry of trackable categories.
///
/// Holds only the user-added extras; the fixed schema is compiled in.
/// The effective category set for a role is re-derived on demand from the
/// fixed schema plus the current extras, so it can never drift.
///
/// # Examples
///
/// ```rust
/// use polostat::{CategoryRegistry, Role};
///
/// let mut registry = CategoryRegistry::new();
/// registry.register_extra("Blocks").unwrap();
///
/// let cats = registry.effective_categories(Role::Field);
/// assert_eq!(cats.first().unwrap().as_str(), "Q1");
/// assert_eq!(cats.last().unwrap().as_str(), "Blocks");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    /// User-added extras in registration order.
    extras: Vec<CategoryDef>,
}

impl CategoryRegistry {
    /// Create a registry with no extras.
    pub fn new() -> Self {
        Self::default()
    }

    /// The registered extra category ids, in registration order.
    pub fn extras(&self) -> Vec<CategoryId> {
        self.extras.iter().map(|d| d.id.clone()).collect()
    }

    /// Whether `name` is currently registered as an extra.
    pub fn has_extra(&self, name: &str) -> bool {
        self.extras.iter().any(|d| d.id.as_str() == name)
    }

    /// Register a user-added category.
    ///
    /// The name is trimmed first. Fails with
    /// [`LedgerError::InvalidCategory`] if the trimmed name is empty,
    /// already an extra, or collides with any fixed category name for
    /// either role. Extras are assigned [`DisplayClass::Positive`].
    pub fn register_extra(&mut self, name: &str) -> Result<CategoryId, LedgerError> {
        let name = name.trim();
        if name.is_empty() || self.has_extra(name) || is_fixed_name(name) {
            return Err(LedgerError::InvalidCategory(name.to_string()));
        }
        let def = CategoryDef::new(name, CategoryClass::Extra, DisplayClass::Positive);
        let id = def.id.clone();
        self.extras.push(def);
        Ok(id)
    }

    /// Unregister an extra. Returns `false` (no-op) if not present.
    pub fn unregister_extra(&mut self, name: &str) -> bool {
        let before = self.extras.len();
        self.extras.retain(|d| d.id.as_str() != name);
        self.extras.len() != before
    }

    /// The effective category set for `role`, in stable display order:
    /// role-specific top row, core row, hidden tiles, then extras in
    /// registration order.
    pub fn effective_categories(&self, role: Role) -> Vec<CategoryId> {
        let mut cats: Vec<CategoryId> =
            fixed_definitions(role).into_iter().map(|d| d.id).collect();
        cats.extend(self.extras.iter().map(|d| d.id.clone()));
        cats
    }

    /// The display class recorded on the definition of `category`.
    ///
    /// Looks through the fixed player schema, the opponent columns, and
    /// the registered extras. Unknown categories (e.g. a timeline event
    /// for an extra that has since been unregistered) fall back to
    /// [`DisplayClass::Positive`].
    pub fn display_class(&self, category: &CategoryId) -> DisplayClass {
        fixed_definitions(Role::Field)
            .into_iter()
            .chain(fixed_definitions(Role::Goalie))
            .chain(opponent_definitions())
            .chain(self.extras.iter().cloned())
            .find(|d| d.id == *category)
            .map(|d| d.display)
            .unwrap_or(DisplayClass::Positive)
    }
}
