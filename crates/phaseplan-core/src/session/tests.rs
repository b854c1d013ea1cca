//! Tests for the session module.

use std::sync::Arc;

use jiff::Timestamp;

use super::*;
use crate::{
    config::PhaseDeletePolicy,
    EntityId,
    models::{AttributeKey, DrawShape, Geometry, MapPoint, TimeExtent},
    symbols::SymbolDictionary,
};

const INFANTRY: &str = "SFGPUCI----K---";

fn ts(seconds: i64) -> Timestamp {
    Timestamp::from_second(seconds).expect("valid timestamp")
}

fn point(x: f64, y: f64) -> Geometry {
    Geometry::Point(MapPoint::new(x, y))
}

/// Session with `count` phases starting at the epoch, positioned at the last.
fn session_with_phases(count: usize) -> MissionSession {
    let mut session = MissionSession::new(Mission::new("Test Mission"));
    for n in 1..=count {
        session
            .add_phase_at(&format!("Phase {n}"), ts(0))
            .expect("Failed to add phase");
    }
    session
}

/// Four phases with one unit alive in phases 1 to 3 (zero based). The unit
/// is placed at 10,20 and moved in each phase it appears in.
fn session_with_spanning_unit() -> (MissionSession, EntityId) {
    let mut session = session_with_phases(2);
    session.select_phase(1).expect("Failed to select phase");
    let unit = session
        .create_entity(INFANTRY, &point(10.0, 20.0))
        .expect("Failed to create entity");

    session.add_phase_at("Phase 3", ts(0)).expect("Failed to add phase");
    session
        .update_position(&unit.id, &point(11.0, 21.0))
        .expect("Failed to move entity");
    session.add_phase_at("Phase 4", ts(0)).expect("Failed to add phase");
    session
        .update_position(&unit.id, &point(12.0, 22.0))
        .expect("Failed to move entity");

    (session, unit.id)
}

#[test]
fn test_add_phase_timing() {
    let session = session_with_phases(3);
    let phases = &session.mission().phases;

    assert_eq!(phases[0].time_extent, TimeExtent::new(ts(0), ts(3599)).unwrap());
    assert_eq!(phases[1].time_extent, TimeExtent::new(ts(3600), ts(7199)).unwrap());
    assert_eq!(phases[2].time_extent, TimeExtent::new(ts(7200), ts(10799)).unwrap());
    assert_eq!(session.current_phase_index(), 2);
}

#[test]
fn test_create_entity_in_current_phase() {
    let mut session = session_with_phases(2);
    session.select_phase(0).unwrap();

    let unit = session.create_entity(INFANTRY, &point(10.0, 20.0)).unwrap();
    let phase = session.current_phase().unwrap().clone();

    assert_eq!(unit.visible_time_extent, phase.time_extent);
    assert_eq!(unit.phase_control_points.len(), 1);
    assert_eq!(unit.phase_control_points.get(&phase.id).map(String::as_str), Some("10,20"));
    assert_eq!(unit.control_points(), Some("10,20"));
    assert_eq!(unit.symbol_code(), Some(INFANTRY));
    assert_eq!(unit.attributes.get(&AttributeKey::Type), Some("position_report"));
    assert_eq!(unit.attributes.get(&AttributeKey::Wkid), Some("3857"));
    assert_eq!(session.mission().entities.len(), 1);
}

#[test]
fn test_create_entity_rejects_empty_symbol_code() {
    let mut session = session_with_phases(1);

    let result = session.create_entity("  ", &point(1.0, 2.0));

    assert!(matches!(result, Err(MissionError::InvalidInput { .. })));
    assert!(session.mission().entities.is_empty());
}

#[test]
fn test_create_entity_adds_first_phase() {
    let mut session = MissionSession::new(Mission::new("Empty"));

    let unit = session.create_entity(INFANTRY, &point(1.0, 2.0)).unwrap();

    assert_eq!(session.mission().phase_count(), 1);
    assert_eq!(session.mission().phases[0].name, "Phase 1");
    assert_eq!(unit.visible_time_extent, session.mission().phases[0].time_extent);
}

#[test]
fn test_create_entity_without_phases_when_auto_create_disabled() {
    let config = MissionConfig {
        auto_create_first_phase: false,
        ..MissionConfig::default()
    };
    let mut session = MissionSession::with_config(Mission::new("Empty"), config);

    let result = session.create_entity(INFANTRY, &point(1.0, 2.0));

    assert!(matches!(result, Err(MissionError::NoPhases)));
    assert_eq!(session.mission().phase_count(), 0);
}

#[test]
fn test_create_entity_with_empty_geometry_leaves_mission_untouched() {
    let mut session = MissionSession::new(Mission::new("Empty"));

    let result = session.create_entity(INFANTRY, &Geometry::polyline(vec![]));

    assert!(matches!(result, Err(MissionError::InvalidControlPoints { .. })));
    assert_eq!(session.mission().phase_count(), 0);
}

#[test]
fn test_positions_are_versioned_per_phase() {
    let mut session = session_with_phases(1);
    let unit = session.create_entity(INFANTRY, &point(10.0, 20.0)).unwrap();

    session.add_phase_at("Phase 2", ts(0)).unwrap();
    let carried = session.snapshot().unwrap();
    assert_eq!(carried.entity(&unit.id).unwrap().control_points(), Some("10,20"));

    session.update_position(&unit.id, &point(15.0, 25.0)).unwrap();

    let first = session.select_phase(0).unwrap();
    assert_eq!(first.entity(&unit.id).unwrap().control_points(), Some("10,20"));

    let second = session.select_phase(1).unwrap();
    assert_eq!(second.entity(&unit.id).unwrap().control_points(), Some("15,25"));
}

#[test]
fn test_add_phase_carries_only_entities_ending_with_last_phase() {
    let mut session = session_with_phases(2);
    session.select_phase(0).unwrap();
    let early = session.create_entity(INFANTRY, &point(1.0, 1.0)).unwrap();
    session.select_phase(1).unwrap();
    let late = session.create_entity(INFANTRY, &point(2.0, 2.0)).unwrap();

    let snapshot = session.add_phase_at("Phase 3", ts(0)).unwrap();

    assert!(snapshot.entity(&early.id).is_none());
    let carried = snapshot.entity(&late.id).unwrap();
    assert_eq!(carried.visible_time_extent.end, snapshot.phase.time_extent.end);
    assert_eq!(
        carried.phase_control_points.get(&snapshot.phase.id).map(String::as_str),
        Some("2,2")
    );
}

#[test]
fn test_select_phase_is_idempotent() {
    let (mut session, unit) = session_with_spanning_unit();

    let first = session.select_phase(2).unwrap();
    let second = session.select_phase(2).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.entity(&unit).unwrap().control_points(), Some("11,21"));
}

#[test]
fn test_select_phase_clamps_index() {
    let mut session = session_with_phases(3);

    let snapshot = session.select_phase(99).unwrap();

    assert_eq!(snapshot.index, 2);
    assert_eq!(snapshot.phase_count, 3);
}

#[test]
fn test_select_phase_without_phases() {
    let mut session = MissionSession::new(Mission::new("Empty"));
    assert!(matches!(session.select_phase(0), Err(MissionError::NoPhases)));
    assert!(session.next_phase().unwrap().is_none());
    assert!(session.previous_phase().unwrap().is_none());
}

#[test]
fn test_next_and_previous_stop_at_bounds() {
    let mut session = session_with_phases(2);

    assert!(session.next_phase().unwrap().is_none());
    assert_eq!(session.current_phase_index(), 1);

    let back = session.previous_phase().unwrap().unwrap();
    assert_eq!(back.index, 0);
    assert!(session.previous_phase().unwrap().is_none());
    assert_eq!(session.current_phase_index(), 0);

    let forward = session.next_phase().unwrap().unwrap();
    assert_eq!(forward.index, 1);
}

#[test]
fn test_update_position_of_invisible_entity_fails() {
    let mut session = session_with_phases(2);
    session.select_phase(0).unwrap();
    let unit = session.create_entity(INFANTRY, &point(1.0, 1.0)).unwrap();
    session.select_phase(1).unwrap();

    let result = session.update_position(&unit.id, &point(5.0, 5.0));

    assert!(matches!(result, Err(MissionError::EntityNotInPhase { .. })));
    let stored = session.mission().entity(&unit.id).unwrap();
    assert_eq!(stored.phase_control_points.len(), 1);
}

#[test]
fn test_update_position_uses_arrow_encoding() {
    let mut session = session_with_phases(1);
    let arrow = Geometry::polyline(vec![MapPoint::new(1.0, 2.0), MapPoint::new(3.0, 4.0)]);

    let unit = session.create_entity("GFGPOLAGM-----X", &arrow).unwrap();
    assert_eq!(unit.control_points(), Some(";3,4;1,2;3,4"));

    let moved = Geometry::polyline(vec![MapPoint::new(5.0, 6.0), MapPoint::new(7.0, 8.0)]);
    let unit = session.update_position(&unit.id, &moved).unwrap();
    assert_eq!(unit.control_points(), Some(";7,8;5,6;7,8"));
}

#[test]
fn test_custom_symbol_dictionary() {
    struct ArrowsEverywhere;

    impl SymbolDictionary for ArrowsEverywhere {
        fn draw_shape(&self, _symbol_code: &str) -> DrawShape {
            DrawShape::Arrow
        }
    }

    let mut session =
        session_with_phases(1).with_symbol_dictionary(Arc::new(ArrowsEverywhere));
    let line = Geometry::polyline(vec![MapPoint::new(1.0, 2.0), MapPoint::new(3.0, 4.0)]);

    let unit = session.create_entity(INFANTRY, &line).unwrap();

    assert_eq!(unit.control_points(), Some(";3,4;1,2;3,4"));
}

#[test]
fn test_update_attribute() {
    let mut session = session_with_phases(1);
    let unit = session.create_entity(INFANTRY, &point(1.0, 1.0)).unwrap();

    let updated = session
        .update_attribute(&unit.id, AttributeKey::UniqueDesignation, "Alpha")
        .unwrap();
    assert_eq!(updated.attributes.get(&AttributeKey::UniqueDesignation), Some("Alpha"));

    let result = session.update_attribute(&unit.id, AttributeKey::ControlPoints, "9,9");
    assert!(matches!(result, Err(MissionError::InvalidInput { .. })));
}

#[test]
fn test_delete_entity_contained_in_phase() {
    let mut session = session_with_phases(2);
    session.select_phase(0).unwrap();
    let unit = session.create_entity(INFANTRY, &point(1.0, 1.0)).unwrap();
    session.create_entity(INFANTRY, &point(2.0, 2.0)).unwrap();

    let outcome = session.delete_entity(&unit.id).unwrap();

    assert_eq!(outcome, DeleteOutcome::Deleted);
    assert_eq!(session.mission().entities.len(), 1);
    assert!(session.mission().entity(&unit.id).is_none());
}

#[test]
fn test_delete_entity_advances_start() {
    let (mut session, unit) = session_with_spanning_unit();
    let removed_from = session.select_phase(1).unwrap().phase;
    let next_start = session.mission().phases[2].time_extent.start;

    let outcome = session.delete_entity(&unit).unwrap();

    assert_eq!(outcome, DeleteOutcome::StartAdvanced { start: next_start });
    let stored = session.mission().entity(&unit).unwrap();
    assert_eq!(stored.visible_time_extent.start, next_start);
    assert!(!stored.phase_control_points.contains_key(&removed_from.id));
    assert!(session.snapshot().unwrap().entity(&unit).is_none());
    assert_eq!(session.mission().phase_span(stored), Some((2, 3)));
}

#[test]
fn test_delete_entity_retracts_end() {
    let (mut session, unit) = session_with_spanning_unit();
    session.select_phase(3).unwrap();
    let previous_end = session.mission().phases[2].time_extent.end;

    let outcome = session.delete_entity(&unit).unwrap();

    assert_eq!(outcome, DeleteOutcome::EndRetracted { end: previous_end });
    let stored = session.mission().entity(&unit).unwrap();
    assert_eq!(stored.visible_time_extent.end, previous_end);
    assert_eq!(session.mission().phase_span(stored), Some((1, 2)));
}

#[test]
fn test_delete_entity_splits_lifetime() {
    let (mut session, unit) = session_with_spanning_unit();
    session.select_phase(2).unwrap();
    let phases = session.mission().phases.clone();

    let outcome = session.delete_entity(&unit).unwrap();

    let DeleteOutcome::Split { end, successor } = outcome else {
        panic!("expected a split, got {outcome:?}");
    };
    assert_eq!(end, phases[1].time_extent.end);
    assert_eq!(session.mission().entities.len(), 2);

    let original = session.mission().entity(&unit).unwrap();
    assert_eq!(session.mission().phase_span(original), Some((1, 1)));
    assert_eq!(original.phase_control_points.len(), 1);
    assert!(original.phase_control_points.contains_key(&phases[1].id));

    let later = session.mission().entity(&successor).unwrap();
    assert_eq!(session.mission().phase_span(later), Some((3, 3)));
    assert_eq!(later.symbol_code(), Some(INFANTRY));
    assert_eq!(
        later.phase_control_points.get(&phases[3].id).map(String::as_str),
        Some("12,22")
    );
    assert_ne!(later.id, original.id);

    assert!(session.snapshot().unwrap().entities.is_empty());
    let last = session.select_phase(3).unwrap();
    assert_eq!(last.entity(&successor).unwrap().control_points(), Some("12,22"));
}

#[test]
fn test_delete_entity_after_retained_phase_delete_drops_stale_side() {
    let (mut session, unit) = session_with_spanning_unit();
    session.select_phase(3).unwrap();
    session.delete_entity(&unit).unwrap();
    // Lifetime now covers phases 1 and 2; removing phase 2 leaves its tail
    // past phase 1 with no phase behind it.
    session.delete_phase(2).unwrap();
    session.select_phase(1).unwrap();

    let outcome = session.delete_entity(&unit).unwrap();

    assert_eq!(outcome, DeleteOutcome::Deleted);
    assert!(session.mission().entity(&unit).is_none());
    let json = serde_json::to_string(&session.to_document()).unwrap();
    assert!(MissionSession::new(Mission::default()).load_json(&json).is_ok());
}

#[test]
fn test_delete_entity_after_retained_phase_delete_retracts_instead_of_split() {
    let mut session = session_with_phases(1);
    let unit = session.create_entity(INFANTRY, &point(1.0, 1.0)).unwrap().id;
    for n in 2..=4 {
        session.add_phase_at(&format!("Phase {n}"), ts(0)).unwrap();
    }
    session.delete_entity(&unit).unwrap();
    session.delete_phase(2).unwrap();
    session.select_phase(1).unwrap();
    let first_end = session.mission().phases[0].time_extent.end;

    let outcome = session.delete_entity(&unit).unwrap();

    assert_eq!(outcome, DeleteOutcome::EndRetracted { end: first_end });
    assert_eq!(session.mission().entities.len(), 1);
    let stored = session.mission().entity(&unit).unwrap();
    assert!(stored.visible_time_extent.start <= stored.visible_time_extent.end);
    assert_eq!(session.mission().phase_span(stored), Some((0, 0)));

    let json = serde_json::to_string(&session.to_document()).unwrap();
    let mut restored = MissionSession::new(Mission::default());
    restored.load_json(&json).unwrap();
    assert!(restored.select_phase(2).unwrap().entities.is_empty());
}

#[test]
fn test_delete_entity_not_visible_in_phase() {
    let mut session = session_with_phases(2);
    session.select_phase(0).unwrap();
    let unit = session.create_entity(INFANTRY, &point(1.0, 1.0)).unwrap();
    session.select_phase(1).unwrap();

    let result = session.delete_entity(&unit.id);

    assert!(matches!(result, Err(MissionError::EntityNotInPhase { .. })));
    assert_eq!(session.mission().entities.len(), 1);
}

#[test]
fn test_delete_unknown_entity() {
    let mut session = session_with_phases(1);
    let result = session.delete_entity(&EntityId::new());
    assert!(matches!(result, Err(MissionError::EntityNotFound { .. })));
}

#[test]
fn test_delete_phase_retains_references() {
    let (mut session, unit) = session_with_spanning_unit();
    let removed = session.mission().phases[2].clone();
    session.select_phase(3).unwrap();

    let removal = session.delete_phase(2).unwrap();

    assert_eq!(removal.phase, removed);
    assert!(removal.dropped_entities.is_empty());
    assert_eq!(session.mission().phase_count(), 3);
    assert_eq!(session.current_phase_index(), 2);
    assert_eq!(
        session.mission().dangling_phase_references(),
        vec![(unit, removed.id)]
    );
}

#[test]
fn test_delete_phase_purges_references() {
    let config = MissionConfig {
        phase_delete_policy: PhaseDeletePolicy::Purge,
        ..MissionConfig::default()
    };
    let mut session = MissionSession::with_config(Mission::new("Purge"), config);
    for n in 1..=3 {
        session.add_phase_at(&format!("Phase {n}"), ts(0)).unwrap();
    }
    session.select_phase(1).unwrap();
    let only_here = session.create_entity(INFANTRY, &point(1.0, 1.0)).unwrap();
    session.select_phase(0).unwrap();
    let elsewhere = session.create_entity(INFANTRY, &point(2.0, 2.0)).unwrap();

    let removal = session.delete_phase(1).unwrap();

    assert_eq!(removal.dropped_entities, vec![only_here.id]);
    assert!(session.mission().entity(&only_here.id).is_none());
    assert!(session.mission().entity(&elsewhere.id).is_some());
    assert!(session.mission().dangling_phase_references().is_empty());
}

#[test]
fn test_delete_phase_purge_clips_lifetimes() {
    let config = MissionConfig {
        phase_delete_policy: PhaseDeletePolicy::Purge,
        ..MissionConfig::default()
    };
    let mut session = MissionSession::with_config(Mission::new("Purge"), config);
    session.add_phase_at("Phase 1", ts(0)).unwrap();
    let unit = session.create_entity(INFANTRY, &point(1.0, 1.0)).unwrap();
    session.add_phase_at("Phase 2", ts(0)).unwrap();
    session.add_phase_at("Phase 3", ts(0)).unwrap();
    let phases = session.mission().phases.clone();

    session.delete_phase(2).unwrap();

    let stored = session.mission().entity(&unit.id).unwrap();
    assert_eq!(stored.visible_time_extent.start, phases[0].time_extent.start);
    assert_eq!(stored.visible_time_extent.end, phases[1].time_extent.end);
    assert!(!stored.phase_control_points.contains_key(&phases[2].id));
}

#[test]
fn test_delete_last_remaining_phase() {
    let mut session = session_with_phases(1);

    let removal = session.delete_phase(0).unwrap();

    assert!(removal.snapshot.is_none());
    assert_eq!(session.mission().phase_count(), 0);
    assert!(session.current_phase().is_none());
    assert!(matches!(session.delete_phase(0), Err(MissionError::NoPhases)));
}

#[test]
fn test_delete_phase_out_of_range() {
    let mut session = session_with_phases(2);
    assert!(matches!(
        session.delete_phase(5),
        Err(MissionError::PhaseIndexOutOfRange { index: 5, count: 2 })
    ));
}

#[test]
fn test_edit_phase_renames() {
    let mut session = session_with_phases(2);

    let phase = session.edit_phase(0, Some("Assault"), None).unwrap();

    assert_eq!(phase.name, "Assault");
    assert_eq!(session.mission().phases[0].name, "Assault");
}

#[test]
fn test_edit_phase_moves_matching_lifetimes() {
    let mut session = session_with_phases(1);
    let unit = session.create_entity(INFANTRY, &point(1.0, 1.0)).unwrap();
    session.add_phase_at("Phase 2", ts(0)).unwrap();
    let extent = TimeExtent::new(ts(3700), ts(9000)).unwrap();

    session.edit_phase(1, None, Some(extent)).unwrap();

    let stored = session.mission().entity(&unit.id).unwrap();
    assert_eq!(stored.visible_time_extent.start, ts(0));
    assert_eq!(stored.visible_time_extent.end, ts(9000));
}

#[test]
fn test_edit_phase_rejects_overlap() {
    let mut session = session_with_phases(3);
    let before = session.mission().clone();

    let overlapping = TimeExtent::new(ts(3600), ts(8000)).unwrap();
    let result = session.edit_phase(1, Some("Renamed"), Some(overlapping));
    assert!(matches!(result, Err(MissionError::InvalidInput { .. })));

    let empty = TimeExtent::new(ts(4000), ts(4000)).unwrap();
    assert!(session.edit_phase(1, None, Some(empty)).is_err());

    let touching = TimeExtent::new(ts(3599), ts(5000)).unwrap();
    assert!(session.edit_phase(1, None, Some(touching)).is_err());

    assert_eq!(session.mission(), &before);
}

#[test]
fn test_document_round_trip() {
    let (mut session, unit) = session_with_spanning_unit();
    session.select_phase(2).unwrap();
    let json = serde_json::to_string(&session.to_document()).unwrap();

    let mut restored = MissionSession::new(Mission::default());
    let snapshot = restored.load_json(&json).unwrap().unwrap();

    assert_eq!(snapshot.index, 0);
    assert_eq!(restored.mission().name, "Test Mission");
    assert_eq!(restored.mission().phases, session.mission().phases);
    let original = session.mission().entity(&unit).unwrap();
    let loaded = restored.mission().entity(&unit).unwrap();
    assert_eq!(loaded.visible_time_extent, original.visible_time_extent);
    assert_eq!(loaded.phase_control_points, original.phase_control_points);

    let moved = restored.select_phase(3).unwrap();
    assert_eq!(moved.entity(&unit).unwrap().control_points(), Some("12,22"));
}

#[test]
fn test_load_invalid_document_keeps_session() {
    let mut session = session_with_phases(2);
    let before = session.mission().clone();

    assert!(session.load_json("{\"name\": 5}").is_err());
    assert_eq!(session.mission(), &before);
}

#[test]
fn test_restore_phase_clamps() {
    let mission = session_with_phases(2).into_mission();
    let session = MissionSession::new(mission).restore_phase(7);
    assert_eq!(session.current_phase_index(), 1);
}

#[test]
fn test_events_are_published() {
    let mut session = session_with_phases(1);
    let mut events = session.subscribe();

    let unit = session.create_entity(INFANTRY, &point(1.0, 1.0)).unwrap();
    let phase = session.current_phase().unwrap().id;
    session.delete_entity(&unit.id).unwrap();

    assert_eq!(
        events.try_recv().unwrap(),
        MissionEvent::EntityCreated { id: unit.id, phase }
    );
    assert_eq!(
        events.try_recv().unwrap(),
        MissionEvent::EntityRemovedFromPhase {
            id: unit.id,
            phase,
            outcome: DeleteOutcome::Deleted,
        }
    );
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_events_reach_async_subscriber() {
    let mut session = session_with_phases(1);
    let mut events = session.subscribe();

    let listener = tokio::spawn(async move {
        let mut seen = Vec::new();
        while let Ok(event) = events.recv().await {
            seen.push(event);
        }
        seen
    });

    session.add_phase_at("Phase 2", ts(0)).unwrap();
    drop(session);

    let seen = listener.await.unwrap();
    assert!(matches!(seen[0], MissionEvent::PhaseAdded { index: 1, .. }));
    assert!(matches!(seen[1], MissionEvent::PhaseSelected { index: 1, .. }));
}
