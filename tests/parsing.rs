use std::fs;
use std::path::PathBuf;

use spjald_terminal::fotmob_fetch::{
    parse_league_fixtures_json, parse_match_cards_json, parse_player_profile_json,
};
use spjald_terminal::state::{CardType, PlayerProfile};
use spjald_terminal::upstream::parse_token_json;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_league_fixtures() {
    let raw = read_fixture("league_fixtures.json");
    let fixtures = parse_league_fixtures_json(&raw).expect("fixture should parse");
    // The entry with a nameless away team is dropped.
    assert_eq!(fixtures.len(), 4);
    assert_eq!(fixtures[0].id, "4509211");
    assert_eq!(fixtures[0].round_name, "2");
    assert_eq!(fixtures[0].home.name, "Valur");
    assert_eq!(fixtures[0].away.name, "KR");
    // Numeric roundName survives as a string either way.
    assert_eq!(fixtures[1].round_name, "1");
    assert_eq!(fixtures[3].round_name, "Final");
}

#[test]
fn league_fixtures_null_is_empty() {
    assert!(
        parse_league_fixtures_json("null")
            .expect("null should parse")
            .is_empty()
    );
    assert!(
        parse_league_fixtures_json("{}")
            .expect("empty object should parse")
            .is_empty()
    );
}

#[test]
fn parses_match_cards_and_referee() {
    let raw = read_fixture("match_details.json");
    let cards = parse_match_cards_json(&raw).expect("fixture should parse");
    // Goals and substitutions are filtered out.
    assert_eq!(cards.events.len(), 2);

    assert_eq!(cards.events[0].card, CardType::Yellow);
    assert_eq!(cards.events[0].full_name, "Jón Jónsson");
    assert_eq!(cards.events[0].player_id, 7);
    assert_eq!(cards.events[0].time_str, "23");
    assert!(cards.events[0].is_home);

    // Player id falls back to the nested player object, and added-time
    // minutes keep their display form.
    assert_eq!(cards.events[1].card, CardType::YellowRed);
    assert_eq!(cards.events[1].player_id, 88);
    assert_eq!(cards.events[1].time_str, "90+2");
    assert!(!cards.events[1].is_home);

    assert_eq!(cards.referee.as_deref(), Some("Páll Sveinsson"));
}

#[test]
fn match_cards_null_is_empty() {
    let cards = parse_match_cards_json("null").expect("null should parse");
    assert!(cards.events.is_empty());
    assert!(cards.referee.is_none());
}

#[test]
fn parses_player_profile() {
    let raw = read_fixture("player_data.json");
    let profile = parse_player_profile_json(&raw).expect("fixture should parse");
    assert_eq!(
        profile,
        PlayerProfile::Player {
            shirt_number: Some(9),
            team: "Víkingur R.".to_string(),
        }
    );
}

#[test]
fn coach_profile_wins_over_shirt_attribute() {
    let raw = read_fixture("player_coach.json");
    let profile = parse_player_profile_json(&raw).expect("fixture should parse");
    assert_eq!(
        profile,
        PlayerProfile::Coach {
            team: "Stjarnan".to_string(),
        }
    );
}

#[test]
fn player_without_shirt_attribute_has_no_number() {
    let raw = r#"{"isCoach": false, "primaryTeam": {"teamName": "FH"}, "playerInformation": [{"title": "Age", "value": {"numberValue": 31}}]}"#;
    let profile = parse_player_profile_json(raw).expect("should parse");
    assert_eq!(
        profile,
        PlayerProfile::Player {
            shirt_number: None,
            team: "FH".to_string(),
        }
    );
}

#[test]
fn token_json_round_trips() {
    let token = parse_token_json(r#"{"x-mas": "abc.def.ghi"}"#).expect("token should parse");
    assert_eq!(token, "abc.def.ghi");
}

#[test]
fn token_json_missing_field_is_an_error() {
    assert!(parse_token_json(r#"{"status": "ok"}"#).is_err());
    assert!(parse_token_json(r#"{"x-mas": ""}"#).is_err());
}
