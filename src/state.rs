use std::collections::VecDeque;

/// Shirt-number sentinel stored when the carded person is a member of the
/// coaching staff rather than a player.
pub const COACH_SENTINEL: &str = "Þjálfari";

pub const CARD_REASONS: [&str; 12] = [
    "Unsporting behavior",
    "Dissent",
    "Persistent infringement",
    "Delaying restart",
    "Failing to respect distance",
    "Entering/leaving field without permission",
    "Serious foul play",
    "Violent conduct",
    "Denying goal with handball",
    "Denying goalscoring opportunity",
    "Offensive language/gestures",
    "Second caution",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tournament {
    pub id: u32,
    pub name: &'static str,
}

pub const TOURNAMENTS: [Tournament; 5] = [
    Tournament { id: 215, name: "Besta deildin" },
    Tournament { id: 217, name: "Mjólkurbikarinn" },
    Tournament { id: 10009, name: "Meistarar meistaranna" },
    Tournament { id: 10076, name: "Lengjubikarinn" },
    Tournament { id: 216, name: "1. deild" },
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CardType {
    Yellow,
    YellowRed,
    Red,
    #[default]
    None,
}

impl CardType {
    pub fn label(self) -> &'static str {
        match self {
            CardType::Yellow => "Yellow",
            CardType::YellowRed => "YellowRed",
            CardType::Red => "Red",
            CardType::None => "None",
        }
    }

    pub fn from_label(raw: &str) -> Option<CardType> {
        match raw.trim() {
            "Yellow" => Some(CardType::Yellow),
            "YellowRed" => Some(CardType::YellowRed),
            "Red" => Some(CardType::Red),
            _ => None,
        }
    }

    pub fn is_set(self) -> bool {
        self != CardType::None
    }

    /// Cycles through the three real card types, skipping the unset sentinel.
    pub fn next(self) -> CardType {
        match self {
            CardType::None => CardType::Yellow,
            CardType::Yellow => CardType::YellowRed,
            CardType::YellowRed => CardType::Red,
            CardType::Red => CardType::Yellow,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    pub id: String,
    pub round_name: String,
    pub home: Team,
    pub away: Team,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchShort {
    pub id: String,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardEvent {
    pub card: CardType,
    pub full_name: String,
    pub player_id: u64,
    pub time: u32,
    pub time_str: String,
    pub is_home: bool,
}

/// Upstream player profile, decoded at the boundary into the only two shapes
/// the form cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerProfile {
    Coach { team: String },
    Player { shirt_number: Option<u32>, team: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub round: String,
    pub match_id: String,
    pub referee: String,
    pub player_team: String,
    pub player_name: String,
    pub player_number: String,
    pub minute: String,
    pub card_type: CardType,
    pub reason: String,
}

/// The persisted artifact. Built only at submit time, never mutated after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardReport {
    pub tournament: String,
    pub round: String,
    pub home_team: String,
    pub away_team: String,
    pub referee_name: String,
    pub card_type: String,
    pub player_team: String,
    pub player_name: String,
    pub player_number: String,
    pub minute: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportField {
    Round,
    Match,
    Referee,
    PlayerTeam,
    PlayerName,
    PlayerNumber,
    Minute,
    CardType,
    Reason,
}

impl ReportField {
    pub fn label(self) -> &'static str {
        match self {
            ReportField::Round => "Round",
            ReportField::Match => "Match",
            ReportField::Referee => "Referee",
            ReportField::PlayerTeam => "Player team",
            ReportField::PlayerName => "Player name",
            ReportField::PlayerNumber => "Player number",
            ReportField::Minute => "Minute",
            ReportField::CardType => "Card type",
            ReportField::Reason => "Reason",
        }
    }
}

/// Focusable rows of the main form, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Round,
    Match,
    Referee,
    CardPick,
    PlayerNumber,
    Minute,
    CardType,
    Reason,
    Submit,
}

impl FormField {
    pub const ORDER: [FormField; 9] = [
        FormField::Round,
        FormField::Match,
        FormField::Referee,
        FormField::CardPick,
        FormField::PlayerNumber,
        FormField::Minute,
        FormField::CardType,
        FormField::Reason,
        FormField::Submit,
    ];

    pub fn next(self) -> FormField {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> FormField {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardDialogField {
    Team,
    PlayerName,
    PlayerNumber,
    Minute,
    CardType,
    Confirm,
}

impl CardDialogField {
    pub const ORDER: [CardDialogField; 6] = [
        CardDialogField::Team,
        CardDialogField::PlayerName,
        CardDialogField::PlayerNumber,
        CardDialogField::Minute,
        CardDialogField::CardType,
        CardDialogField::Confirm,
    ];

    pub fn next(self) -> CardDialogField {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> CardDialogField {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Manual-card sub-form. Team is constrained to the two teams of the
/// selected fixture; `home_team` picks between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDialog {
    pub focus: CardDialogField,
    pub home_team: bool,
    pub player_name: String,
    pub player_number: String,
    pub minute: String,
    pub card_type: CardType,
    pub errors: Vec<CardDialogField>,
}

impl CardDialog {
    pub fn new() -> Self {
        Self {
            focus: CardDialogField::Team,
            home_team: true,
            player_name: String::new(),
            player_number: String::new(),
            minute: String::new(),
            card_type: CardType::None,
            errors: Vec::new(),
        }
    }

    pub fn validate(&mut self) -> bool {
        self.errors.clear();
        if self.player_name.trim().is_empty() {
            self.errors.push(CardDialogField::PlayerName);
        }
        if self.player_number.trim().is_empty() {
            self.errors.push(CardDialogField::PlayerNumber);
        }
        if self.minute.trim().is_empty() {
            self.errors.push(CardDialogField::Minute);
        }
        if !self.card_type.is_set() {
            self.errors.push(CardDialogField::CardType);
        }
        self.errors.is_empty()
    }
}

impl Default for CardDialog {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    TournamentPick { selected: usize },
    Select { field: FormField, selected: usize },
    AddReferee { name: String },
    AddCard(CardDialog),
    Help,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub tournament: usize,
    pub season: String,
    pub fixtures: Vec<Fixture>,
    pub fixtures_loading: bool,
    pub fixtures_gen: u64,
    pub rounds: Vec<String>,
    pub match_events: Vec<CardEvent>,
    pub events_loading: bool,
    pub events_gen: u64,
    pub referees: Vec<String>,
    /// Bumped on every directory insert; each bump triggers one list refetch.
    pub referee_version: u64,
    pub player_loading: bool,
    pub player_gen: u64,
    pub player_number_not_found: bool,
    pub manual_card: bool,
    pub draft: Draft,
    pub errors: Vec<ReportField>,
    pub submitting: bool,
    pub last_saved: Option<String>,
    pub focus: FormField,
    pub overlay: Overlay,
    pub logs: VecDeque<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        let season = std::env::var("CARD_SEASON")
            .ok()
            .filter(|val| !val.trim().is_empty())
            .unwrap_or_else(|| {
                use chrono::Datelike;
                chrono::Utc::now().year().to_string()
            });
        Self {
            tournament: 0,
            season,
            fixtures: Vec::new(),
            fixtures_loading: false,
            fixtures_gen: 0,
            rounds: Vec::new(),
            match_events: Vec::new(),
            events_loading: false,
            events_gen: 0,
            referees: Vec::new(),
            referee_version: 0,
            player_loading: false,
            player_gen: 0,
            player_number_not_found: false,
            manual_card: false,
            draft: Draft::default(),
            errors: Vec::new(),
            submitting: false,
            last_saved: None,
            focus: FormField::Round,
            overlay: Overlay::None,
            logs: VecDeque::with_capacity(200),
        }
    }

    pub fn tournament_name(&self) -> &'static str {
        TOURNAMENTS
            .get(self.tournament)
            .map(|t| t.name)
            .unwrap_or("Unknown")
    }

    pub fn tournament_id(&self) -> u32 {
        TOURNAMENTS.get(self.tournament).map(|t| t.id).unwrap_or(0)
    }

    /// Selecting a tournament clears everything downstream and starts a new
    /// fixture fetch generation. Returns the generation to tag the fetch with.
    pub fn select_tournament(&mut self, idx: usize) -> u64 {
        self.tournament = idx.min(TOURNAMENTS.len() - 1);
        self.fixtures.clear();
        self.rounds.clear();
        self.fixtures_loading = true;
        self.fixtures_gen += 1;
        // In-flight lower-level fetches are invalidated too.
        self.events_gen += 1;
        self.player_gen += 1;
        self.draft = Draft::default();
        self.match_events.clear();
        self.events_loading = false;
        self.player_loading = false;
        self.player_number_not_found = false;
        self.manual_card = false;
        self.errors.clear();
        self.focus = FormField::Round;
        self.fixtures_gen
    }

    /// Matches of the currently selected round, in fixture order.
    pub fn matches_for_round(&self) -> Vec<MatchShort> {
        if self.draft.round.is_empty() {
            return Vec::new();
        }
        self.fixtures
            .iter()
            .filter(|f| f.round_name == self.draft.round)
            .map(|f| MatchShort {
                id: f.id.clone(),
                display: format!("{} vs {}", f.home.name, f.away.name),
            })
            .collect()
    }

    pub fn selected_fixture(&self) -> Option<&Fixture> {
        if self.draft.match_id.is_empty() {
            return None;
        }
        self.fixtures.iter().find(|f| f.id == self.draft.match_id)
    }

    pub fn select_round(&mut self, round: String) {
        self.draft.round = round;
        self.draft.match_id.clear();
        self.match_events.clear();
        self.events_loading = false;
        // A match-detail fetch for the previous match must not land here.
        self.events_gen += 1;
        self.clear_card_fields();
        self.draft.reason.clear();
    }

    /// Selecting a match resets player/card fields and opens a new
    /// match-detail fetch generation. Returns the generation to tag the
    /// fetch with.
    pub fn select_match(&mut self, match_id: String) -> u64 {
        self.draft.match_id = match_id;
        self.match_events.clear();
        self.events_loading = true;
        self.events_gen += 1;
        self.clear_card_fields();
        self.events_gen
    }

    /// Picks a provider-sourced card event; autofills card/minute/name and
    /// opens a player-profile fetch generation for the remaining fields.
    /// Returns (generation, player id) for the fetch command.
    pub fn select_event(&mut self, idx: usize) -> Option<(u64, u64)> {
        let event = self.match_events.get(idx)?.clone();
        self.draft.card_type = event.card;
        self.draft.minute = event.time_str.clone();
        self.draft.player_name = event.full_name.clone();
        self.draft.player_team.clear();
        self.draft.player_number.clear();
        self.manual_card = false;
        self.player_number_not_found = false;
        self.player_loading = true;
        self.player_gen += 1;
        Some((self.player_gen, event.player_id))
    }

    /// Copies a confirmed manual-card dialog into the draft. Bypasses the
    /// player-profile fetch entirely; minute becomes operator-editable.
    pub fn apply_manual_card(&mut self, dialog: &CardDialog) {
        let Some(fixture) = self.selected_fixture() else {
            return;
        };
        let team = if dialog.home_team {
            fixture.home.name.clone()
        } else {
            fixture.away.name.clone()
        };
        self.draft.player_team = team;
        self.draft.player_name = dialog.player_name.trim().to_string();
        self.draft.player_number = dialog.player_number.trim().to_string();
        self.draft.minute = dialog.minute.trim().to_string();
        self.draft.card_type = dialog.card_type;
        self.manual_card = true;
        self.player_loading = false;
        self.player_number_not_found = false;
        // A stale in-flight profile response must not overwrite manual entry.
        self.player_gen += 1;
    }

    fn clear_card_fields(&mut self) {
        self.draft.player_team.clear();
        self.draft.player_name.clear();
        self.draft.player_number.clear();
        self.draft.minute.clear();
        self.draft.card_type = CardType::None;
        self.player_loading = false;
        self.player_number_not_found = false;
        self.manual_card = false;
        // Invalidates any profile lookup still in flight for these fields.
        self.player_gen += 1;
    }

    /// Presence validation for submit. Fills `errors` and returns whether
    /// the draft is complete.
    pub fn validate(&mut self) -> bool {
        self.errors = missing_fields(&self.draft);
        self.errors.is_empty()
    }

    /// Builds the persisted report from the draft plus the tournament name
    /// and the team names resolved from the selected fixture. None when the
    /// match selection no longer resolves to a fixture.
    pub fn build_report(&self) -> Option<CardReport> {
        let fixture = self.selected_fixture()?;
        Some(CardReport {
            tournament: self.tournament_name().to_string(),
            round: self.draft.round.clone(),
            home_team: fixture.home.name.clone(),
            away_team: fixture.away.name.clone(),
            referee_name: self.draft.referee.clone(),
            card_type: self.draft.card_type.label().to_string(),
            player_team: self.draft.player_team.clone(),
            player_name: self.draft.player_name.clone(),
            player_number: self.draft.player_number.clone(),
            minute: self.draft.minute.clone(),
            reason: self.draft.reason.clone(),
        })
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

pub fn missing_fields(draft: &Draft) -> Vec<ReportField> {
    let mut missing = Vec::new();
    if draft.round.trim().is_empty() {
        missing.push(ReportField::Round);
    }
    if draft.match_id.trim().is_empty() {
        missing.push(ReportField::Match);
    }
    if draft.referee.trim().is_empty() {
        missing.push(ReportField::Referee);
    }
    if draft.player_team.trim().is_empty() {
        missing.push(ReportField::PlayerTeam);
    }
    if draft.player_name.trim().is_empty() {
        missing.push(ReportField::PlayerName);
    }
    if draft.player_number.trim().is_empty() {
        missing.push(ReportField::PlayerNumber);
    }
    if draft.minute.trim().is_empty() {
        missing.push(ReportField::Minute);
    }
    if !draft.card_type.is_set() {
        missing.push(ReportField::CardType);
    }
    if draft.reason.trim().is_empty() {
        missing.push(ReportField::Reason);
    }
    missing
}

/// Distinct round labels across the fixture list, numerically sorted when
/// every label is numeric, lexically otherwise. Order-independent.
pub fn derive_rounds(fixtures: &[Fixture]) -> Vec<String> {
    let mut rounds: Vec<String> = Vec::new();
    for fixture in fixtures {
        if !rounds.contains(&fixture.round_name) {
            rounds.push(fixture.round_name.clone());
        }
    }
    if rounds.iter().all(|r| r.parse::<i64>().is_ok()) {
        rounds.sort_by_key(|r| r.parse::<i64>().unwrap_or(i64::MAX));
    } else {
        rounds.sort();
    }
    rounds
}

#[derive(Debug, Clone)]
pub enum Delta {
    SetFixtures {
        generation: u64,
        fixtures: Vec<Fixture>,
    },
    FixturesFailed {
        generation: u64,
        error: String,
    },
    SetMatchCards {
        generation: u64,
        events: Vec<CardEvent>,
        referee: Option<String>,
        referee_inserted: bool,
    },
    MatchCardsFailed {
        generation: u64,
        error: String,
    },
    SetPlayerProfile {
        generation: u64,
        profile: PlayerProfile,
    },
    PlayerFailed {
        generation: u64,
        error: String,
    },
    SetReferees(Vec<String>),
    ReportStored {
        at: String,
    },
    ReportFailed(String),
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    FetchFixtures {
        generation: u64,
        league_id: u32,
        season: String,
    },
    FetchMatchCards {
        generation: u64,
        match_id: String,
        known_referees: Vec<String>,
    },
    FetchPlayer {
        generation: u64,
        player_id: u64,
    },
    InsertReferee {
        name: String,
    },
    RefreshReferees,
    StoreReport(CardReport),
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetFixtures {
            generation,
            fixtures,
        } => {
            // Generation mismatch means the operator already moved on to a
            // different tournament; drop the stale response.
            if generation != state.fixtures_gen {
                return;
            }
            state.rounds = derive_rounds(&fixtures);
            state.fixtures = fixtures;
            state.fixtures_loading = false;
        }
        Delta::FixturesFailed { generation, error } => {
            if generation != state.fixtures_gen {
                return;
            }
            state.fixtures_loading = false;
            state.push_log(format!("[WARN] Fixture fetch failed: {error}"));
        }
        Delta::SetMatchCards {
            generation,
            events,
            referee,
            referee_inserted,
        } => {
            // The directory insert happened regardless of staleness, so the
            // invalidation signal fires even for a discarded response.
            if referee_inserted {
                state.referee_version += 1;
            }
            if generation != state.events_gen {
                return;
            }
            state.events_loading = false;
            state.match_events = events;
            if let Some(name) = referee {
                if referee_inserted && !state.referees.iter().any(|r| *r == name) {
                    state.referees.push(name.clone());
                }
                state.draft.referee = name;
            }
        }
        Delta::MatchCardsFailed { generation, error } => {
            if generation != state.events_gen {
                return;
            }
            state.events_loading = false;
            state.push_log(format!("[WARN] Match detail fetch failed: {error}"));
        }
        Delta::SetPlayerProfile {
            generation,
            profile,
        } => {
            if generation != state.player_gen {
                return;
            }
            state.player_loading = false;
            match profile {
                PlayerProfile::Coach { team } => {
                    state.draft.player_number = COACH_SENTINEL.to_string();
                    state.draft.player_team = team;
                }
                PlayerProfile::Player { shirt_number, team } => {
                    match shirt_number {
                        Some(number) => {
                            state.draft.player_number = number.to_string();
                            state.player_number_not_found = false;
                        }
                        None => {
                            state.draft.player_number.clear();
                            state.player_number_not_found = true;
                        }
                    }
                    state.draft.player_team = team;
                }
            }
        }
        Delta::PlayerFailed { generation, error } => {
            if generation != state.player_gen {
                return;
            }
            state.player_loading = false;
            state.push_log(format!("[WARN] Player lookup failed: {error}"));
        }
        Delta::SetReferees(referees) => {
            state.referees = referees;
        }
        Delta::ReportStored { at } => {
            state.submitting = false;
            state.errors.clear();
            state.draft.player_team.clear();
            state.draft.player_name.clear();
            state.draft.player_number.clear();
            state.draft.minute.clear();
            state.draft.card_type = CardType::None;
            state.draft.reason.clear();
            state.player_number_not_found = false;
            state.manual_card = false;
            state.push_log(format!("[INFO] Card report stored ({at})"));
            state.last_saved = Some(at);
        }
        Delta::ReportFailed(error) => {
            state.submitting = false;
            state.push_log(format!("[WARN] Card report failed: {error}"));
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
