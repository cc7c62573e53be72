//! Tabular export.
//!
//! Derives three independent tables from current ledger state — players,
//! opponents, timeline — and renders them into a single comma-delimited
//! text artifact. Read-only: the only guarantee it adds of its own is
//! deterministic column ordering.
//!
//! The players table distinguishes "never tracked" from "tracked at
//! zero": a field player shows blank cells, not `0`, for goalie-only
//! columns it never owned.

use crate::category::{
    opponent_categories, CategoryId, CORE_ROW, GOALIE_TOP, HIDDEN_TILES, QUARTERS,
};
use crate::ledger::Ledger;

/// One ordered table: a header row plus data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Render as CSV lines: header first, fields escaped per
    /// [`csv_escape`].
    pub fn to_csv(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 1);
        lines.push(csv_line(&self.header));
        for row in &self.rows {
            lines.push(csv_line(row));
        }
        lines.join("\n")
    }
}

fn csv_line(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| csv_escape(f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Escape one field for comma-delimited output: a field containing a
/// delimiter, quote, or newline is wrapped in quotes with internal quotes
/// doubled.
///
/// # Examples
///
/// ```rust
/// use polostat::export::csv_escape;
///
/// assert_eq!(csv_escape("Steals"), "Steals");
/// assert_eq!(csv_escape(r#"A, "B""#), r#""A, ""B""""#);
/// ```
pub fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// The players-table category columns: the union of all fixed-role
/// categories (both roles) plus the registered extras, in display order.
fn player_columns(ledger: &Ledger) -> Vec<CategoryId> {
    let mut columns: Vec<CategoryId> = QUARTERS
        .iter()
        .chain(GOALIE_TOP.iter())
        .chain(CORE_ROW.iter())
        .chain(HIDDEN_TILES.iter())
        .map(|name| CategoryId::new(name))
        .collect();
    columns.extend(ledger.extras());
    columns
}

/// The players table: name, cap, then every column in the union across
/// both roles and all extras. Categories a player never owned render as
/// empty cells, not zero.
pub fn players_table(ledger: &Ledger) -> Table {
    let columns = player_columns(ledger);
    let mut header = vec!["Player".to_string(), "Cap".to_string()];
    header.extend(columns.iter().map(|c| c.to_string()));

    let rows = ledger
        .players()
        .iter()
        .map(|player| {
            let mut row = vec![player.name.clone(), player.cap.clone()];
            row.extend(columns.iter().map(|c| {
                player
                    .counters
                    .get(c)
                    .map(|v| v.to_string())
                    .unwrap_or_default()
            }));
            row
        })
        .collect();

    Table { header, rows }
}

/// The opponents table: cap, then the eight fixed quarter-major
/// ejection/penalty columns.
pub fn opponents_table(ledger: &Ledger) -> Table {
    let columns = opponent_categories();
    let mut header = vec!["Opponent".to_string()];
    header.extend(columns.iter().map(|c| c.to_string()));

    let rows = ledger
        .opponents()
        .iter()
        .map(|opponent| {
            let mut row = vec![opponent.cap.to_string()];
            row.extend(columns.iter().map(|c| {
                opponent
                    .counters
                    .get(c)
                    .map(|v| v.to_string())
                    .unwrap_or_default()
            }));
            row
        })
        .collect();

    Table { header, rows }
}

/// The timeline table, newest-first: formatted time, subject kind,
/// subject identity, category, signed delta (`+1`/`-1`), remarks.
pub fn timeline_table(ledger: &Ledger) -> Table {
    let header = ["Time", "Subject", "Identity", "Category", "Delta", "Remarks"]
        .map(String::from)
        .to_vec();

    let rows = ledger
        .timeline()
        .events()
        .map(|event| {
            vec![
                event.timestamp.format("%H:%M:%S").to_string(),
                event.subject_kind.to_string(),
                event.subject_id.clone(),
                event.category.to_string(),
                format!("{:+}", event.delta),
                event.remarks.clone(),
            ]
        })
        .collect();

    Table { header, rows }
}

/// Render the full export artifact: the three tables in order, each
/// preceded by its header row, sections separated by one blank line.
pub fn export_csv(ledger: &Ledger) -> String {
    let sections = [
        players_table(ledger).to_csv(),
        opponents_table(ledger).to_csv(),
        timeline_table(ledger).to_csv(),
    ];
    let mut out = sections.join("\n\n");
    out.push('\n');
    out
}

/// The export file name, derived from the game identifier with a default
/// fallback.
///
/// # Examples
///
/// ```rust
/// use polostat::export::export_file_name;
/// use polostat::Ledger;
///
/// let mut ledger = Ledger::new();
/// assert_eq!(export_file_name(&ledger), "game.csv");
///
/// ledger.set_game_id("at South High School");
/// assert_eq!(export_file_name(&ledger), "at South High School.csv");
/// ```
pub fn export_file_name(ledger: &Ledger) -> String {
    let game_id = ledger.game_id().trim();
    if game_id.is_empty() {
        "game.csv".to_string()
    } else {
        format!("{game_id}.csv")
    }
}
