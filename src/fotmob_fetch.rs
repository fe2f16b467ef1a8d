use anyhow::{Context, Result};
use serde_json::Value;

use crate::state::{CardEvent, CardType, Fixture, PlayerProfile, Team};
use crate::upstream::fetch_upstream;

/// Card events of one match plus the referee name from the info box.
#[derive(Debug, Clone, Default)]
pub struct MatchCards {
    pub events: Vec<CardEvent>,
    pub referee: Option<String>,
}

pub fn fetch_league_fixtures(league_id: u32, season: &str) -> Result<Vec<Fixture>> {
    let body = fetch_upstream(&format!("leagues?id={league_id}&season={season}"))
        .context("request failed")?;
    parse_league_fixtures_json(&body)
}

pub fn fetch_match_cards(match_id: &str) -> Result<MatchCards> {
    let body =
        fetch_upstream(&format!("matchDetails?matchId={match_id}")).context("request failed")?;
    parse_match_cards_json(&body)
}

pub fn fetch_player_profile(player_id: u64) -> Result<PlayerProfile> {
    let body = fetch_upstream(&format!("playerData?id={player_id}")).context("request failed")?;
    parse_player_profile_json(&body)
}

pub fn parse_league_fixtures_json(raw: &str) -> Result<Vec<Fixture>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid leagues json")?;

    let mut fixtures = Vec::new();
    let Some(list) = root
        .get("matches")
        .and_then(|v| v.get("allMatches"))
        .and_then(|v| v.as_array())
    else {
        return Ok(fixtures);
    };

    for entry in list {
        let Some(id) = pick_id(entry, &["id"]) else {
            continue;
        };
        let round_name = entry
            .get("roundName")
            .and_then(round_label)
            .or_else(|| entry.get("round").and_then(round_label))
            .unwrap_or_default();
        let Some(home) = parse_team(entry.get("home")) else {
            continue;
        };
        let Some(away) = parse_team(entry.get("away")) else {
            continue;
        };
        fixtures.push(Fixture {
            id,
            round_name,
            home,
            away,
        });
    }

    Ok(fixtures)
}

pub fn parse_match_cards_json(raw: &str) -> Result<MatchCards> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(MatchCards::default());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid matchDetails json")?;
    let match_facts = root
        .get("content")
        .and_then(|v| v.get("matchFacts"))
        .unwrap_or(&Value::Null);

    let events = parse_card_events(
        match_facts
            .get("events")
            .and_then(|v| v.get("events"))
            .and_then(|v| v.as_array()),
    );
    let referee = match_facts
        .get("infoBox")
        .and_then(|v| v.get("Referee"))
        .and_then(referee_name);

    Ok(MatchCards { events, referee })
}

pub fn parse_player_profile_json(raw: &str) -> Result<PlayerProfile> {
    let trimmed = raw.trim();
    let root: Value = serde_json::from_str(trimmed).context("invalid playerData json")?;

    let team = root
        .get("primaryTeam")
        .and_then(|v| v.get("teamName"))
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    let is_coach = root
        .get("isCoach")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    if is_coach {
        return Ok(PlayerProfile::Coach { team });
    }

    let shirt_number = root
        .get("playerInformation")
        .and_then(|v| v.as_array())
        .and_then(|infos| {
            infos.iter().find(|info| {
                info.get("title").and_then(|v| v.as_str()) == Some("Shirt")
            })
        })
        .and_then(|info| info.get("value"))
        .and_then(shirt_value);

    Ok(PlayerProfile::Player { shirt_number, team })
}

fn parse_card_events(list: Option<&Vec<Value>>) -> Vec<CardEvent> {
    let mut out = Vec::new();
    let Some(list) = list else {
        return out;
    };
    for entry in list {
        if entry.get("type").and_then(|v| v.as_str()) != Some("Card") {
            continue;
        }
        let Some(card) = entry
            .get("card")
            .and_then(|v| v.as_str())
            .and_then(CardType::from_label)
        else {
            continue;
        };
        let full_name = entry
            .get("fullName")
            .and_then(|v| v.as_str())
            .or_else(|| {
                entry
                    .get("player")
                    .and_then(|p| p.get("name"))
                    .and_then(|v| v.as_str())
            })
            .unwrap_or_default()
            .trim()
            .to_string();
        if full_name.is_empty() {
            continue;
        }
        let Some(player_id) = pick_u64(entry, &["playerId"]).or_else(|| {
            entry.get("player").and_then(|p| pick_u64(p, &["id"]))
        }) else {
            continue;
        };
        let time = entry.get("time").and_then(|v| v.as_u64()).unwrap_or(0) as u32;
        let time_str = entry
            .get("timeStr")
            .and_then(minute_label)
            .unwrap_or_else(|| time.to_string());
        let is_home = entry
            .get("isHome")
            .and_then(|v| v.as_bool())
            .unwrap_or(true);
        out.push(CardEvent {
            card,
            full_name,
            player_id,
            time,
            time_str,
            is_home,
        });
    }
    out
}

fn parse_team(value: Option<&Value>) -> Option<Team> {
    let value = value?;
    let id = pick_id(value, &["id"])?;
    let name = value
        .get("name")
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())?;
    Some(Team { id, name })
}

// Referee appears either as {"text": "Name"} or as a bare string.
fn referee_name(value: &Value) -> Option<String> {
    let raw = match value {
        Value::String(s) => s.as_str(),
        Value::Object(map) => map.get("text").and_then(|v| v.as_str())?,
        _ => return None,
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn shirt_value(value: &Value) -> Option<u32> {
    if let Some(num) = value.get("numberValue").and_then(|v| v.as_u64()) {
        return Some(num as u32);
    }
    // Fallback label can be either a number or a numeric string.
    match value.get("fallback") {
        Some(Value::Number(n)) => n.as_u64().map(|n| n as u32),
        Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

// Round labels are numeric for league play and textual for cup stages.
fn round_label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// Minute display strings keep added-time notation ("45+2") verbatim.
fn minute_label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn pick_id(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        match value.get(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() => {
                return Some(s.trim().to_string());
            }
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

fn pick_u64(value: &Value, keys: &[&str]) -> Option<u64> {
    for key in keys {
        if let Some(v) = value.get(*key) {
            if let Some(num) = v.as_u64() {
                return Some(num);
            }
            if let Some(s) = v.as_str() {
                if let Ok(num) = s.trim().parse::<u64>() {
                    return Some(num);
                }
            }
        }
    }
    None
}
