use polostat::export;
use polostat::{CategoryId, EntityRef, Ledger, LedgerError, RosterEntry, UndoOutcome};

fn steals() -> CategoryId {
    CategoryId::new("Steals")
}

/// Counter value equals the number of surviving (non-undone) increments
/// for a category across any increment/undo sequence, and never goes
/// negative.
#[test]
fn test_counter_tracks_surviving_increments() {
    let mut ledger = Ledger::new();
    ledger.add_player("Alex", "", false).unwrap();
    let alex = EntityRef::player("Alex");
    let assists = CategoryId::new("Assists");

    ledger.increment(&alex, &steals()).unwrap();
    ledger.increment(&alex, &assists).unwrap();
    ledger.increment(&alex, &steals()).unwrap();
    ledger.undo(&alex); // reverses the second Steals
    ledger.increment(&alex, &steals()).unwrap();
    ledger.undo(&alex); // reverses the third Steals
    ledger.undo(&alex); // reverses the Assists
    ledger.undo(&alex); // reverses the first Steals
    ledger.undo(&alex); // nothing left
    ledger.undo(&alex);

    assert_eq!(ledger.counter(&alex, &steals()), Some(0));
    assert_eq!(ledger.counter(&alex, &assists), Some(0));
    assert!(ledger.timeline().is_empty());
}

/// Undo on an entity with an empty stack leaves all state unchanged,
/// including other entities' stacks.
#[test]
fn test_undo_empty_stack_changes_nothing() {
    let mut ledger = Ledger::new();
    ledger.add_player("Alex", "", false).unwrap();
    ledger.add_player("Riley", "", false).unwrap();
    let alex = EntityRef::player("Alex");
    let riley = EntityRef::player("Riley");
    ledger.increment(&riley, &steals()).unwrap();

    assert_eq!(ledger.undo(&alex), UndoOutcome::NothingToUndo);

    assert_eq!(ledger.counter(&alex, &steals()), Some(0));
    assert_eq!(ledger.counter(&riley, &steals()), Some(1));
    assert_eq!(ledger.timeline().len(), 1);
    assert!(ledger.can_undo(&riley));
}

/// After increment(e, c) then undo(e), the timeline has exactly as many
/// events as before the pair, and the counter is unchanged.
#[test]
fn test_increment_undo_pair_is_neutral() {
    let mut ledger = Ledger::new();
    ledger.add_player("Alex", "", false).unwrap();
    let alex = EntityRef::player("Alex");
    ledger.increment(&alex, &steals()).unwrap();

    let events_before = ledger.timeline().len();
    let counter_before = ledger.counter(&alex, &steals());

    ledger.increment(&alex, &steals()).unwrap();
    assert!(ledger.undo(&alex).undone());

    assert_eq!(ledger.timeline().len(), events_before);
    assert_eq!(ledger.counter(&alex, &steals()), counter_before);
}

/// Undo removes the most recent structurally-matching event, never an
/// older one, when increments of the same category are interleaved with
/// another subject's events.
#[test]
fn test_undo_retracts_newest_matching_event() {
    let mut ledger = Ledger::new();
    ledger.add_player("P", "", false).unwrap();
    ledger.add_player("Q", "", false).unwrap();
    let p = EntityRef::player("P");
    let q = EntityRef::player("Q");

    ledger.increment(&p, &steals()).unwrap(); // @t1
    ledger.increment(&q, &steals()).unwrap(); // @t2
    ledger.increment(&p, &steals()).unwrap(); // @t3

    let t3_id = ledger.timeline().events().next().unwrap().id;
    let t1_id = ledger.timeline().events().last().unwrap().id;

    assert!(ledger.undo(&p).undone());

    let surviving: Vec<_> = ledger.timeline().events().map(|e| e.id).collect();
    assert!(!surviving.contains(&t3_id), "newest match must be removed");
    assert!(surviving.contains(&t1_id), "older match must survive");
    assert_eq!(surviving.len(), 2);
}

/// Registering an extra backfills a zero counter on every existing player
/// without touching existing values; unregistering removes only that key.
#[test]
fn test_extra_category_lifecycle_across_roster() {
    let mut ledger = Ledger::new();
    ledger.add_player("Alex", "", false).unwrap();
    ledger.add_player("Sam", "", true).unwrap();
    let alex = EntityRef::player("Alex");
    ledger.increment(&alex, &steals()).unwrap();

    let blocks = ledger.register_extra("Blocks").unwrap();
    for player in ledger.players() {
        assert_eq!(player.counters.get(&blocks), Some(&0));
    }
    assert_eq!(ledger.counter(&alex, &steals()), Some(1));

    assert!(ledger.unregister_extra("Blocks"));
    for player in ledger.players() {
        assert!(!player.counters.contains_key(&blocks));
        assert!(player.counters.contains_key(&steals()));
    }
}

/// Extras collide with fixed names for either role.
#[test]
fn test_extra_category_validation() {
    let mut ledger = Ledger::new();
    assert_eq!(
        ledger.register_extra("Saves"),
        Err(LedgerError::InvalidCategory("Saves".into()))
    );
    assert_eq!(
        ledger.register_extra(" "),
        Err(LedgerError::InvalidCategory("".into()))
    );
    assert!(ledger.register_extra("Blocks").is_ok());
}

/// Loading a roster clears all undo stacks: after increments followed by
/// a reload, undo on any player is a no-op.
#[test]
fn test_roster_reload_clears_undo() {
    let mut ledger = Ledger::new();
    ledger.load_roster(&[
        RosterEntry::new("Alex", "7", false),
        RosterEntry::new("Sam", "1", true),
    ]);
    let alex = EntityRef::player("Alex");
    ledger.increment(&alex, &steals()).unwrap();
    ledger
        .increment(&EntityRef::player("Sam"), &CategoryId::new("Saves"))
        .unwrap();

    ledger.load_roster(&[
        RosterEntry::new("Alex", "7", false),
        RosterEntry::new("Sam", "1", true),
    ]);

    assert_eq!(ledger.undo(&alex), UndoOutcome::NothingToUndo);
    assert_eq!(
        ledger.undo(&EntityRef::player("Sam")),
        UndoOutcome::NothingToUndo
    );
    assert!(ledger.timeline().is_empty());
    assert_eq!(ledger.counter(&alex, &steals()), Some(0));
}

/// Preloaded players cannot be removed; manual ones can.
#[test]
fn test_preloaded_player_protection() {
    let mut ledger = Ledger::new();
    ledger.load_roster(&[RosterEntry::new("Sam", "1", true)]);
    ledger.add_player("Alex", "", false).unwrap();

    assert_eq!(
        ledger.remove_player("Sam"),
        Err(LedgerError::Protected("Sam".into()))
    );
    assert!(ledger.remove_player("Alex").is_ok());
}

/// Explicitly deleting a timeline event leaves counters and undo stacks
/// alone, and remarks edits on the dead event are no-ops.
#[test]
fn test_event_deletion_is_independent_of_counters() {
    let mut ledger = Ledger::new();
    ledger.add_player("Alex", "", false).unwrap();
    let alex = EntityRef::player("Alex");
    ledger.increment(&alex, &steals()).unwrap();
    let id = ledger.timeline().events().next().unwrap().id;

    ledger.select_event(Some(id));
    assert!(ledger.remove_event(id));

    assert_eq!(ledger.counter(&alex, &steals()), Some(1));
    assert!(ledger.can_undo(&alex));
    assert_eq!(ledger.timeline().selection(), None);
    assert!(!ledger.set_remarks(id, "gone"));
}

/// Export of a player with a delimiter-and-quote name produces a
/// correctly escaped cell, and exported counts follow the live state.
#[test]
fn test_export_escaping_end_to_end() {
    let mut ledger = Ledger::new();
    ledger.add_player("A, \"B\"", "", false).unwrap();
    let entity = EntityRef::player("A, \"B\"");
    for _ in 0..3 {
        ledger.increment(&entity, &steals()).unwrap();
    }

    let csv = export::export_csv(&ledger);
    let player_row = csv.lines().nth(1).unwrap();
    assert!(player_row.starts_with("\"A, \"\"B\"\"\""));
    assert!(player_row.contains(",3,") || player_row.ends_with(",3"));
}

/// Opponent counters stay within the eight fixed columns and never go
/// negative through any undo sequence.
#[test]
fn test_opponent_counters_stay_bounded() {
    let mut ledger = Ledger::new();
    let opp = EntityRef::opponent(12);
    let penalty = CategoryId::new("Q3 Penalty");

    ledger.increment(&opp, &penalty).unwrap();
    assert!(ledger.undo(&opp).undone());
    assert_eq!(ledger.undo(&opp), UndoOutcome::NothingToUndo);

    let opponent = ledger.opponent(12).unwrap();
    assert_eq!(opponent.counters.len(), 8);
    assert!(opponent.counters.values().all(|v| *v == 0));
}

/// Unknown entities are rejected before any mutation.
#[test]
fn test_unknown_entity_is_rejected() {
    let mut ledger = Ledger::new();
    assert_eq!(
        ledger.increment(&EntityRef::opponent(25), &CategoryId::new("Q1 Penalty")),
        Err(LedgerError::UnknownEntity("25".into()))
    );
    assert!(ledger.timeline().is_empty());
}
