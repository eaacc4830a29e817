//! Unit tests for step.rs turn resolution.
use super::*;
use crate::catalog::Ruleset;
use crate::policy::{PolicyControl, PolicyValue};
use crate::rng::{FixedDraw, ScriptedDraws, SeededRng};
use crate::state::{EventKind, Outcome};
use crate::testing::{faction, flat_ruleset, GameStateBuilder};

const QUIET: f64 = 0.5;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn standard_turn(state: &GameState, draw: f64) -> TurnResult {
    let rules = Ruleset::standard();
    resolve_turn(
        &rules,
        state,
        &PolicySelection::new(),
        &rules.factions,
        &mut FixedDraw(draw),
    )
    .expect("standard turn resolves")
}

#[test]
fn test_default_scenario_figures() {
    let state = GameStateBuilder::new().build();
    let result = standard_turn(&state, QUIET);
    let next = &result.new_state;

    // Revenue: 10 base + 16 + 13.8 + 1.05. Spending: 3 + 4 + 1 + 2.8 interest.
    assert!(approx(next.budget, 40.85 - 10.8));
    assert!(approx(next.debt, 70.0 - 30.05));
    // Growth 2.0 + 0.22, no drag at ratio ~0.4
    assert!(approx(next.gdp, 100.0 * 1.0222));
    // Strong growth -1, infrastructure -0.2
    assert!(approx(next.unemployment, 8.8));
    assert_eq!(next.year, 2026);
    assert!(result.event_log.is_empty());
}

#[test]
fn test_default_scenario_factions() {
    let state = GameStateBuilder::new().build();
    let result = standard_turn(&state, QUIET);

    let approval = |id: &str| {
        result
            .new_factions
            .iter()
            .find(|f| f.id.as_str() == id)
            .map(|f| f.approval)
            .unwrap()
    };
    // Every faction also gets +2 for growth above 2%.
    assert!(approx(approval("business"), 37.25));
    assert!(approx(approval("investors"), 49.5));
    assert!(approx(approval("unions"), 51.5));
    assert!(approx(approval("oversight"), 41.5));
    assert!(approx(approval("diaspora"), 63.5));
    assert!(approx(approval("tourists"), 49.5));
    assert!(approx(approval("elderly"), 52.5));
    assert!(approx(approval("youth"), 41.8));
    assert!(approx(result.new_state.approval, 468.98 / 9.9));
}

#[test]
fn test_default_scenario_wins_immediately() {
    // Default policies run a 30B surplus, enough to fall under 50% at once.
    let state = GameStateBuilder::new().build();
    let result = standard_turn(&state, QUIET);

    assert_eq!(result.outcome, Some(Outcome::Victory));
    assert!(result.new_state.victory);
    assert!(result.new_state.game_over);
}

#[test]
fn test_determinism_with_forced_draw() {
    let state = GameStateBuilder::new().debt(150.0).build();

    let a = standard_turn(&state, 0.17);
    let b = standard_turn(&state, 0.17);

    let json_a = serde_json::to_string(&a).unwrap();
    let json_b = serde_json::to_string(&b).unwrap();
    assert_eq!(json_a, json_b);
    assert_eq!(a.new_state.gdp.to_bits(), b.new_state.gdp.to_bits());
    assert_eq!(a.new_state.debt.to_bits(), b.new_state.debt.to_bits());
}

#[test]
fn test_inputs_are_not_mutated() {
    let rules = Ruleset::standard();
    let state = GameStateBuilder::new().debt(150.0).build();
    let mut selection = PolicySelection::new();
    selection.set("pension_cuts".into(), PolicyValue::Enabled(true));
    let factions = rules.factions.clone();

    let (state_before, selection_before, factions_before) =
        (state.clone(), selection.clone(), factions.clone());

    resolve_turn(&rules, &state, &selection, &factions, &mut FixedDraw(0.0)).unwrap();

    assert_eq!(state, state_before);
    assert_eq!(selection, selection_before);
    assert_eq!(factions, factions_before);
    assert_eq!(rules, Ruleset::standard());
}

#[test]
fn test_crypto_boom_is_the_only_event_at_012() {
    let state = GameStateBuilder::new().debt(150.0).build();
    let result = standard_turn(&state, 0.12);

    assert_eq!(result.event_log.len(), 1);
    assert_eq!(result.event_log[0].title, "Crypto Boom");
    assert_eq!(result.event_log[0].kind, EventKind::Positive);
}

#[test]
fn test_event_gdp_multiplier_applies_after_growth() {
    let state = GameStateBuilder::new().debt(150.0).build();
    let quiet = standard_turn(&state, QUIET);
    let boom = standard_turn(&state, 0.12);

    assert!(approx(boom.new_state.gdp, quiet.new_state.gdp * 1.02));
    assert!(approx(boom.new_state.debt, quiet.new_state.debt));
}

#[test]
fn test_quiet_draws_fire_nothing() {
    let state = GameStateBuilder::new().debt(150.0).build();
    for draw in [0.25, 0.5, 0.999] {
        let result = standard_turn(&state, draw);
        assert!(result.event_log.is_empty(), "draw {draw} fired an event");
    }
}

#[test]
fn test_history_grows_by_one_per_turn() {
    let rules = flat_ruleset();
    let mut state = rules.initial_state.clone();
    let mut factions = rules.factions.clone();
    let selection = PolicySelection::new();

    for turn in 1..=5 {
        let result =
            resolve_turn(&rules, &state, &selection, &factions, &mut FixedDraw(QUIET)).unwrap();
        state = result.new_state;
        factions = result.new_factions;

        assert_eq!(state.history.debt.len(), turn + 1);
        assert_eq!(state.history.gdp.len(), turn + 1);
        assert_eq!(state.history.approval.len(), turn + 1);
        assert_eq!(*state.history.debt.last().unwrap(), state.debt);
    }
}

#[test]
fn test_term_limit_after_ten_turns() {
    let rules = flat_ruleset();
    let mut state = rules.initial_state.clone();
    let mut factions = rules.factions.clone();
    let selection = PolicySelection::new();
    let mut last = None;

    for turn in 1..=10 {
        assert!(!state.game_over, "game ended early before turn {turn}");
        let result =
            resolve_turn(&rules, &state, &selection, &factions, &mut FixedDraw(QUIET)).unwrap();
        state = result.new_state.clone();
        factions = result.new_factions.clone();
        last = Some(result);
    }

    let last = last.unwrap();
    assert_eq!(state.year, 2035);
    assert!(state.game_over);
    assert!(!state.victory);
    assert_eq!(last.outcome, Some(Outcome::TermLimit));
    assert!(last
        .event_log
        .iter()
        .any(|e| e.title == "Term Limit Reached" && e.kind == EventKind::Lose));
}

#[test]
fn test_victory_wins_over_impeachment() {
    let rules = Ruleset::standard();
    let state = GameStateBuilder::new().debt(10.0).build();
    let factions: Vec<_> = rules
        .factions
        .iter()
        .map(|f| Faction {
            approval: 0.0,
            ..f.clone()
        })
        .collect();

    let result = resolve_turn(
        &rules,
        &state,
        &PolicySelection::new(),
        &factions,
        &mut FixedDraw(QUIET),
    )
    .unwrap();

    assert!(result.new_state.approval < 20.0);
    assert!(result.new_state.victory);
    assert!(result.event_log.iter().all(|e| e.kind != EventKind::Lose));
}

#[test]
fn test_impeachment_masks_bankruptcy() {
    let rules = Ruleset::standard();
    let state = GameStateBuilder::new().debt(300.0).build();
    let factions: Vec<_> = rules
        .factions
        .iter()
        .map(|f| Faction {
            approval: 0.0,
            ..f.clone()
        })
        .collect();

    let result = resolve_turn(
        &rules,
        &state,
        &PolicySelection::new(),
        &factions,
        &mut FixedDraw(QUIET),
    )
    .unwrap();

    assert!(result.new_state.debt_ratio() > 2.0);
    assert_eq!(result.outcome, Some(Outcome::Impeached));
    assert_eq!(result.event_log.len(), 1);
    assert_eq!(result.event_log[0].title, "Impeached!");
}

#[test]
fn test_bankruptcy_with_tolerable_approval() {
    let state = GameStateBuilder::new().debt(300.0).build();
    let result = standard_turn(&state, QUIET);

    assert!(result.new_state.approval >= 20.0);
    assert_eq!(result.outcome, Some(Outcome::Bankruptcy));
    assert_eq!(result.event_log[0].title, "Total Economic Collapse");
}

#[test]
fn test_gdp_floor_ends_in_bankruptcy() {
    let rules = flat_ruleset();
    let state = GameStateBuilder::new().debt(1000.0).gdp(0.0105).build();

    let result = resolve_turn(
        &rules,
        &state,
        &PolicySelection::new(),
        &rules.factions,
        &mut FixedDraw(QUIET),
    )
    .unwrap();

    assert_eq!(result.new_state.gdp, rules.config.gdp_floor);
    assert!(result.new_state.debt_ratio().is_finite());
    assert_eq!(result.outcome, Some(Outcome::Bankruptcy));
    assert!(result.new_state.game_over);
    assert!(!result.new_state.victory);
}

#[test]
fn test_unknown_faction_targets_are_dropped() {
    let rules = Ruleset::standard();
    let state = GameStateBuilder::new().debt(150.0).build();
    let mut selection = PolicySelection::new();
    selection.set("diaspora_incentives".into(), PolicyValue::Enabled(true));

    let result = resolve_turn(
        &rules,
        &state,
        &selection,
        &rules.factions,
        &mut FixedDraw(QUIET),
    )
    .unwrap();

    assert_eq!(result.new_factions.len(), rules.factions.len());
    assert!(result
        .new_factions
        .iter()
        .all(|f| f.id.as_str() != "locals"));
}

#[test]
fn test_partial_faction_set_only_updates_given_factions() {
    let rules = Ruleset::standard();
    let state = GameStateBuilder::new().debt(150.0).build();
    let factions = vec![faction("unions", 1.0, 50.0)];

    let result = resolve_turn(
        &rules,
        &state,
        &PolicySelection::new(),
        &factions,
        &mut FixedDraw(QUIET),
    )
    .unwrap();

    assert_eq!(result.new_factions.len(), 1);
    assert_eq!(result.new_state.approval, result.new_factions[0].approval);
}

#[test]
fn test_one_draw_per_turn() {
    let rules = flat_ruleset();
    let mut draws = ScriptedDraws::new([0.9, 0.9]);
    let state = rules.initial_state.clone();

    let first = resolve_turn(
        &rules,
        &state,
        &PolicySelection::new(),
        &rules.factions,
        &mut draws,
    )
    .unwrap();
    assert_eq!(draws.remaining(), 1);

    resolve_turn(
        &rules,
        &first.new_state,
        &PolicySelection::new(),
        &first.new_factions,
        &mut draws,
    )
    .unwrap();
    assert_eq!(draws.remaining(), 0);
}

#[test]
fn test_rejects_finished_game() {
    let rules = Ruleset::standard();
    let mut state = GameStateBuilder::new().build();
    state.game_over = true;

    let err = resolve_turn(
        &rules,
        &state,
        &PolicySelection::new(),
        &rules.factions,
        &mut FixedDraw(QUIET),
    )
    .unwrap_err();
    assert_eq!(err, TurnError::GameAlreadyOver);
}

#[test]
fn test_rejects_empty_inputs() {
    let rules = Ruleset::standard();
    let state = GameStateBuilder::new().build();

    let err = resolve_turn(
        &rules,
        &state,
        &PolicySelection::new(),
        &[],
        &mut FixedDraw(QUIET),
    )
    .unwrap_err();
    assert_eq!(err, TurnError::NoFactions);

    let mut empty = Ruleset::standard();
    empty.policies.clear();
    let err = resolve_turn(
        &empty,
        &state,
        &PolicySelection::new(),
        &rules.factions,
        &mut FixedDraw(QUIET),
    )
    .unwrap_err();
    assert_eq!(err, TurnError::NoPolicies);
}

#[test]
fn test_rejects_weightless_faction() {
    let rules = Ruleset::standard();
    let state = GameStateBuilder::new().build();
    let factions = vec![faction("a", 1.0, 50.0), faction("b", 0.0, 50.0)];

    let err = resolve_turn(
        &rules,
        &state,
        &PolicySelection::new(),
        &factions,
        &mut FixedDraw(QUIET),
    )
    .unwrap_err();
    assert_eq!(
        err,
        TurnError::NonPositiveWeight {
            faction: "b".into(),
            weight: 0.0
        }
    );
}

#[test]
fn test_rejects_inverted_unemployment_range() {
    let mut rules = Ruleset::standard();
    rules.config.unemployment_min = 40.0;
    let state = GameStateBuilder::new().build();

    let err = resolve_turn(
        &rules,
        &state,
        &PolicySelection::new(),
        &rules.factions,
        &mut FixedDraw(QUIET),
    )
    .unwrap_err();
    assert!(matches!(err, TurnError::BadConfig(_)));
}

#[test]
fn test_seeded_games_replay_identically() {
    let rules = flat_ruleset();
    let play = |seed: u64| {
        let mut rng = SeededRng::new(seed);
        let mut state = rules.initial_state.clone();
        let mut factions = rules.factions.clone();
        for _ in 0..5 {
            let result = resolve_turn(
                &rules,
                &state,
                &PolicySelection::new(),
                &factions,
                &mut rng,
            )
            .unwrap();
            state = result.new_state;
            factions = result.new_factions;
        }
        serde_json::to_string(&state).unwrap()
    };

    assert_eq!(play(42), play(42));
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// A selection with every standard policy set to an arbitrary legal value.
    fn arb_selection() -> impl Strategy<Value = PolicySelection> {
        let rules = Ruleset::standard();
        let count = rules.policies.len();
        proptest::collection::vec((0.0..1.0f64, any::<bool>()), count).prop_map(
            move |picks| {
                let mut selection = PolicySelection::new();
                for (def, (t, on)) in rules.policies.iter().zip(picks) {
                    let value = match def.control {
                        PolicyControl::Slider { min, max, .. } => {
                            PolicyValue::Level(min + (max - min) * t)
                        }
                        PolicyControl::Toggle { .. } => PolicyValue::Enabled(on),
                    };
                    selection.set(def.id.clone(), value);
                }
                selection
            },
        )
    }

    proptest! {
        #[test]
        fn prop_bounds_hold_every_turn(
            selection in arb_selection(),
            draws in proptest::collection::vec(0.0..1.0f64, 1..15),
            debt in 0.0..400.0f64,
            unemployment in 2.0..30.0f64,
        ) {
            let rules = Ruleset::standard();
            let mut state = GameStateBuilder::new()
                .debt(debt)
                .unemployment(unemployment)
                .max_turns(20)
                .build();
            let mut factions = rules.factions.clone();

            for (turn, draw) in draws.iter().enumerate() {
                if state.game_over {
                    break;
                }
                let result = resolve_turn(
                    &rules,
                    &state,
                    &selection,
                    &factions,
                    &mut FixedDraw(*draw),
                )
                .unwrap();

                for f in &result.new_factions {
                    prop_assert!((0.0..=100.0).contains(&f.approval));
                }
                let next = &result.new_state;
                prop_assert!((0.0..=100.0).contains(&next.approval));
                prop_assert!((2.0..=30.0).contains(&next.unemployment));
                prop_assert!(next.gdp >= rules.config.gdp_floor);
                prop_assert_eq!(next.history.len(), turn + 2);
                prop_assert!(result.event_log.len() <= 2);

                state = result.new_state;
                factions = result.new_factions;
            }
        }
    }
}
