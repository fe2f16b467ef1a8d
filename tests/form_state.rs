use spjald_terminal::state::{
    AppState, CardDialog, CardEvent, CardType, Delta, Fixture, PlayerProfile, ReportField, Team,
    apply_delta, derive_rounds, COACH_SENTINEL,
};

fn fixture(id: &str, round: &str, home: &str, away: &str) -> Fixture {
    Fixture {
        id: id.to_string(),
        round_name: round.to_string(),
        home: Team {
            id: format!("{home}-id"),
            name: home.to_string(),
        },
        away: Team {
            id: format!("{away}-id"),
            name: away.to_string(),
        },
    }
}

fn card_event(card: CardType, name: &str, player_id: u64, time_str: &str) -> CardEvent {
    CardEvent {
        card,
        full_name: name.to_string(),
        player_id,
        time: time_str.parse().unwrap_or(0),
        time_str: time_str.to_string(),
        is_home: true,
    }
}

fn loaded_state() -> AppState {
    let mut state = AppState::new();
    let generation = state.select_tournament(0);
    apply_delta(
        &mut state,
        Delta::SetFixtures {
            generation,
            fixtures: vec![
                fixture("m1", "1", "Valur", "KR"),
                fixture("m2", "2", "FH", "Valur"),
                fixture("m3", "1", "KR", "FH"),
            ],
        },
    );
    state
}

#[test]
fn round_switch_resets_everything_below_before_any_fetch_resolves() {
    let mut state = loaded_state();
    state.select_round("1".to_string());
    let generation = state.select_match("m1".to_string());
    apply_delta(
        &mut state,
        Delta::SetMatchCards {
            generation,
            events: vec![card_event(CardType::Yellow, "Jón", 7, "23")],
            referee: Some("Páll".to_string()),
            referee_inserted: true,
        },
    );
    let _ = state.select_event(0);
    state.draft.reason = "Dissent".to_string();

    state.select_round("2".to_string());

    assert!(state.draft.match_id.is_empty());
    assert!(state.match_events.is_empty());
    assert!(state.draft.player_team.is_empty());
    assert!(state.draft.player_name.is_empty());
    assert!(state.draft.player_number.is_empty());
    assert!(state.draft.minute.is_empty());
    assert_eq!(state.draft.card_type, CardType::None);
    assert!(state.draft.reason.is_empty());
}

#[test]
fn round_derivation_is_order_independent_and_numeric_sorted() {
    let fixtures = vec![
        fixture("m1", "10", "A", "B"),
        fixture("m2", "2", "C", "D"),
        fixture("m3", "2", "E", "F"),
        fixture("m4", "1", "G", "H"),
    ];
    let mut reversed = fixtures.clone();
    reversed.reverse();

    let rounds = derive_rounds(&fixtures);
    assert_eq!(rounds, vec!["1", "2", "10"]);
    assert_eq!(derive_rounds(&reversed), rounds);
    // Idempotent over repeated derivation.
    assert_eq!(derive_rounds(&fixtures), rounds);
}

#[test]
fn non_numeric_rounds_sort_lexically() {
    let fixtures = vec![
        fixture("m1", "Semi-final", "A", "B"),
        fixture("m2", "Final", "C", "D"),
        fixture("m3", "1", "E", "F"),
    ];
    assert_eq!(derive_rounds(&fixtures), vec!["1", "Final", "Semi-final"]);
}

#[test]
fn validation_reports_every_empty_field_and_none_card() {
    let mut state = loaded_state();
    assert!(!state.validate());
    assert_eq!(state.errors.len(), 9);

    state.select_round("1".to_string());
    state.select_match("m1".to_string());
    state.draft.referee = "Páll".to_string();
    state.draft.player_team = "Valur".to_string();
    state.draft.player_name = "Jón".to_string();
    state.draft.player_number = "9".to_string();
    state.draft.minute = "23".to_string();
    state.draft.reason = "Dissent".to_string();

    // Everything present except the card type sentinel.
    assert!(!state.validate());
    assert_eq!(state.errors, vec![ReportField::CardType]);

    state.draft.card_type = CardType::Yellow;
    assert!(state.validate());
    assert!(state.errors.is_empty());
}

#[test]
fn match_selection_resets_player_fields_and_bumps_generation() {
    let mut state = loaded_state();
    state.select_round("1".to_string());
    let first = state.select_match("m1".to_string());
    let second = state.select_match("m3".to_string());
    assert!(second > first);
    assert!(state.events_loading);
    assert_eq!(state.draft.card_type, CardType::None);
}

#[test]
fn stale_match_cards_response_is_discarded() {
    let mut state = loaded_state();
    state.select_round("1".to_string());
    let stale = state.select_match("m1".to_string());
    let current = state.select_match("m3".to_string());

    apply_delta(
        &mut state,
        Delta::SetMatchCards {
            generation: stale,
            events: vec![card_event(CardType::Red, "Stale", 1, "5")],
            referee: Some("Stale Ref".to_string()),
            referee_inserted: false,
        },
    );
    assert!(state.match_events.is_empty());
    assert!(state.draft.referee.is_empty());
    assert!(state.events_loading);

    apply_delta(
        &mut state,
        Delta::SetMatchCards {
            generation: current,
            events: vec![card_event(CardType::Yellow, "Jón", 7, "23")],
            referee: None,
            referee_inserted: false,
        },
    );
    assert_eq!(state.match_events.len(), 1);
    assert!(!state.events_loading);
}

#[test]
fn stale_player_profile_is_discarded_after_manual_entry() {
    let mut state = loaded_state();
    state.select_round("1".to_string());
    let generation = state.select_match("m1".to_string());
    apply_delta(
        &mut state,
        Delta::SetMatchCards {
            generation,
            events: vec![card_event(CardType::Yellow, "Jón", 7, "23")],
            referee: None,
            referee_inserted: false,
        },
    );
    let (profile_gen, _) = state.select_event(0).expect("event should exist");

    // Operator overrides with a manual card before the profile resolves.
    let mut dialog = CardDialog::new();
    dialog.home_team = false;
    dialog.player_name = "Handvirkur".to_string();
    dialog.player_number = "5".to_string();
    dialog.minute = "70".to_string();
    dialog.card_type = CardType::Red;
    assert!(dialog.validate());
    state.apply_manual_card(&dialog);

    apply_delta(
        &mut state,
        Delta::SetPlayerProfile {
            generation: profile_gen,
            profile: PlayerProfile::Player {
                shirt_number: Some(9),
                team: "Valur".to_string(),
            },
        },
    );

    assert_eq!(state.draft.player_number, "5");
    assert_eq!(state.draft.player_team, "KR");
    assert_eq!(state.draft.minute, "70");
    assert!(state.manual_card);
}

#[test]
fn stale_player_profile_is_discarded_after_round_change() {
    let mut state = loaded_state();
    state.select_round("1".to_string());
    let generation = state.select_match("m1".to_string());
    apply_delta(
        &mut state,
        Delta::SetMatchCards {
            generation,
            events: vec![card_event(CardType::Yellow, "Jón", 7, "23")],
            referee: None,
            referee_inserted: false,
        },
    );
    let (profile_gen, _) = state.select_event(0).expect("event should exist");

    // The operator changes round while the profile lookup is in flight.
    state.select_round("2".to_string());

    apply_delta(
        &mut state,
        Delta::SetPlayerProfile {
            generation: profile_gen,
            profile: PlayerProfile::Player {
                shirt_number: Some(9),
                team: "Valur".to_string(),
            },
        },
    );
    assert!(state.draft.player_number.is_empty());
    assert!(state.draft.player_team.is_empty());
    assert!(!state.player_loading);
}

#[test]
fn stale_match_cards_are_discarded_after_tournament_switch() {
    let mut state = loaded_state();
    state.select_round("1".to_string());
    let generation = state.select_match("m1".to_string());

    let _ = state.select_tournament(1);

    apply_delta(
        &mut state,
        Delta::SetMatchCards {
            generation,
            events: vec![card_event(CardType::Red, "Gamall", 3, "12")],
            referee: Some("Gamli Dómari".to_string()),
            referee_inserted: false,
        },
    );
    assert!(state.match_events.is_empty());
    assert!(state.draft.referee.is_empty());
}

#[test]
fn stale_player_profile_is_discarded_after_tournament_switch() {
    let mut state = loaded_state();
    state.select_round("1".to_string());
    let generation = state.select_match("m1".to_string());
    apply_delta(
        &mut state,
        Delta::SetMatchCards {
            generation,
            events: vec![card_event(CardType::Yellow, "Jón", 7, "23")],
            referee: None,
            referee_inserted: false,
        },
    );
    let (profile_gen, _) = state.select_event(0).expect("event should exist");

    let _ = state.select_tournament(2);

    apply_delta(
        &mut state,
        Delta::SetPlayerProfile {
            generation: profile_gen,
            profile: PlayerProfile::Coach {
                team: "Valur".to_string(),
            },
        },
    );
    assert!(state.draft.player_number.is_empty());
    assert!(state.draft.player_team.is_empty());
}

#[test]
fn known_referee_is_preselected_without_list_growth() {
    let mut state = loaded_state();
    apply_delta(
        &mut state,
        Delta::SetReferees(vec!["Anna".to_string(), "Páll".to_string()]),
    );
    state.select_round("1".to_string());
    let generation = state.select_match("m1".to_string());
    apply_delta(
        &mut state,
        Delta::SetMatchCards {
            generation,
            events: Vec::new(),
            referee: Some("Páll".to_string()),
            referee_inserted: false,
        },
    );
    assert_eq!(state.draft.referee, "Páll");
    assert_eq!(state.referees.len(), 2);
}

#[test]
fn unknown_referee_is_appended_and_preselected() {
    let mut state = loaded_state();
    apply_delta(&mut state, Delta::SetReferees(vec!["Anna".to_string()]));
    state.select_round("1".to_string());
    let generation = state.select_match("m1".to_string());
    apply_delta(
        &mut state,
        Delta::SetMatchCards {
            generation,
            events: Vec::new(),
            referee: Some("Páll".to_string()),
            referee_inserted: true,
        },
    );
    assert_eq!(state.draft.referee, "Páll");
    assert_eq!(state.referees, vec!["Anna", "Páll"]);
}

#[test]
fn directory_insert_bumps_the_referee_version_even_when_stale() {
    let mut state = loaded_state();
    state.select_round("1".to_string());
    let generation = state.select_match("m1".to_string());
    apply_delta(
        &mut state,
        Delta::SetMatchCards {
            generation,
            events: Vec::new(),
            referee: Some("Páll".to_string()),
            referee_inserted: true,
        },
    );
    assert_eq!(state.referee_version, 1);
    assert_eq!(state.draft.referee, "Páll");

    // A stale response still performed its insert, so the version moves,
    // but nothing else from the response is applied.
    let stale = generation;
    let _ = state.select_match("m3".to_string());
    apply_delta(
        &mut state,
        Delta::SetMatchCards {
            generation: stale,
            events: vec![card_event(CardType::Red, "Gamall", 3, "12")],
            referee: Some("Annar Dómari".to_string()),
            referee_inserted: true,
        },
    );
    assert_eq!(state.referee_version, 2);
    assert!(state.match_events.is_empty());
    assert_eq!(state.draft.referee, "Páll");
}

#[test]
fn list_refresh_does_not_move_the_referee_version() {
    let mut state = loaded_state();
    apply_delta(
        &mut state,
        Delta::SetReferees(vec!["Anna".to_string(), "Páll".to_string()]),
    );
    assert_eq!(state.referee_version, 0);
    assert_eq!(state.referees.len(), 2);
}

#[test]
fn coach_profile_sets_sentinel_number() {
    let mut state = loaded_state();
    state.select_round("1".to_string());
    let generation = state.select_match("m1".to_string());
    apply_delta(
        &mut state,
        Delta::SetMatchCards {
            generation,
            events: vec![card_event(CardType::Yellow, "Helgi", 4012, "55")],
            referee: None,
            referee_inserted: false,
        },
    );
    let (profile_gen, player_id) = state.select_event(0).expect("event should exist");
    assert_eq!(player_id, 4012);

    apply_delta(
        &mut state,
        Delta::SetPlayerProfile {
            generation: profile_gen,
            profile: PlayerProfile::Coach {
                team: "KR".to_string(),
            },
        },
    );
    assert_eq!(state.draft.player_number, COACH_SENTINEL);
    assert_eq!(state.draft.player_team, "KR");
    assert!(!state.player_number_not_found);
}

#[test]
fn missing_shirt_number_flags_not_found() {
    let mut state = loaded_state();
    state.select_round("1".to_string());
    let generation = state.select_match("m1".to_string());
    apply_delta(
        &mut state,
        Delta::SetMatchCards {
            generation,
            events: vec![card_event(CardType::Yellow, "Jón", 7, "23")],
            referee: None,
            referee_inserted: false,
        },
    );
    let (profile_gen, _) = state.select_event(0).expect("event should exist");
    apply_delta(
        &mut state,
        Delta::SetPlayerProfile {
            generation: profile_gen,
            profile: PlayerProfile::Player {
                shirt_number: None,
                team: "Valur".to_string(),
            },
        },
    );
    assert!(state.draft.player_number.is_empty());
    assert!(state.player_number_not_found);
    assert_eq!(state.draft.player_team, "Valur");
}

#[test]
fn successful_store_keeps_round_match_and_referee() {
    let mut state = loaded_state();
    state.select_round("1".to_string());
    state.select_match("m1".to_string());
    state.draft.referee = "Páll".to_string();
    state.draft.player_team = "Valur".to_string();
    state.draft.player_name = "Jón".to_string();
    state.draft.player_number = "9".to_string();
    state.draft.minute = "23".to_string();
    state.draft.card_type = CardType::Yellow;
    state.draft.reason = "Dissent".to_string();
    state.submitting = true;

    apply_delta(
        &mut state,
        Delta::ReportStored {
            at: "30.08.2026 14:05".to_string(),
        },
    );

    assert!(!state.submitting);
    assert_eq!(state.draft.round, "1");
    assert_eq!(state.draft.match_id, "m1");
    assert_eq!(state.draft.referee, "Páll");
    assert!(state.draft.player_team.is_empty());
    assert!(state.draft.player_name.is_empty());
    assert!(state.draft.player_number.is_empty());
    assert!(state.draft.minute.is_empty());
    assert_eq!(state.draft.card_type, CardType::None);
    assert!(state.draft.reason.is_empty());
    assert_eq!(state.last_saved.as_deref(), Some("30.08.2026 14:05"));
}

#[test]
fn failed_store_preserves_the_draft_for_retry() {
    let mut state = loaded_state();
    state.select_round("1".to_string());
    state.select_match("m1".to_string());
    state.draft.referee = "Páll".to_string();
    state.draft.player_team = "Valur".to_string();
    state.draft.player_name = "Jón".to_string();
    state.draft.player_number = "9".to_string();
    state.draft.minute = "23".to_string();
    state.draft.card_type = CardType::Yellow;
    state.draft.reason = "Dissent".to_string();
    state.submitting = true;
    let before = state.draft.clone();

    apply_delta(&mut state, Delta::ReportFailed("disk full".to_string()));

    assert!(!state.submitting);
    assert_eq!(state.draft, before);
}

#[test]
fn report_resolves_tournament_and_fixture_teams() {
    let mut state = loaded_state();
    state.select_round("2".to_string());
    state.select_match("m2".to_string());
    state.draft.referee = "Páll".to_string();
    state.draft.player_team = "FH".to_string();
    state.draft.player_name = "Jón".to_string();
    state.draft.player_number = "9".to_string();
    state.draft.minute = "23".to_string();
    state.draft.card_type = CardType::YellowRed;
    state.draft.reason = "Second caution".to_string();

    let report = state.build_report().expect("fixture should resolve");
    assert_eq!(report.tournament, "Besta deildin");
    assert_eq!(report.home_team, "FH");
    assert_eq!(report.away_team, "Valur");
    assert_eq!(report.card_type, "YellowRed");
}

#[test]
fn tournament_switch_discards_stale_fixture_response() {
    let mut state = AppState::new();
    let stale = state.select_tournament(0);
    let current = state.select_tournament(1);

    apply_delta(
        &mut state,
        Delta::SetFixtures {
            generation: stale,
            fixtures: vec![fixture("old", "1", "A", "B")],
        },
    );
    assert!(state.fixtures.is_empty());
    assert!(state.fixtures_loading);

    apply_delta(
        &mut state,
        Delta::SetFixtures {
            generation: current,
            fixtures: vec![fixture("new", "1", "C", "D")],
        },
    );
    assert_eq!(state.fixtures.len(), 1);
    assert_eq!(state.fixtures[0].id, "new");
    assert!(!state.fixtures_loading);
}
