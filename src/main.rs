use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use spjald_terminal::provider;
use spjald_terminal::state::{
    self, AppState, CARD_REASONS, CardDialog, CardDialogField, CardType, FormField, Overlay,
    ProviderCommand, ReportField, TOURNAMENTS, apply_delta,
};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
    referees_synced: u64,
}

impl App {
    fn new(cmd_tx: mpsc::Sender<ProviderCommand>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
            referees_synced: 0,
        }
    }

    fn send(&mut self, cmd: ProviderCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Provider unavailable");
        }
    }

    // One refetch per directory version, no matter how many inserts raced.
    fn sync_referees(&mut self) {
        if self.state.referee_version > self.referees_synced {
            self.referees_synced = self.state.referee_version;
            self.send(ProviderCommand::RefreshReferees);
        }
    }

    fn fetch_fixtures(&mut self, generation: u64) {
        let league_id = self.state.tournament_id();
        let season = self.state.season.clone();
        self.send(ProviderCommand::FetchFixtures {
            generation,
            league_id,
            season,
        });
    }

    fn on_key(&mut self, key: KeyEvent) {
        match self.state.overlay.clone() {
            Overlay::None => self.on_form_key(key),
            Overlay::TournamentPick { selected } => self.on_tournament_key(key, selected),
            Overlay::Select { field, selected } => self.on_select_key(key, field, selected),
            Overlay::AddReferee { name } => self.on_add_referee_key(key, name),
            Overlay::AddCard(dialog) => self.on_add_card_key(key, dialog),
            Overlay::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                    self.state.overlay = Overlay::None;
                }
            }
        }
    }

    fn on_form_key(&mut self, key: KeyEvent) {
        let text_focus = self.is_text_focus();
        match key.code {
            KeyCode::Char(c) if text_focus => self.type_char(c),
            KeyCode::Backspace if text_focus => self.erase_char(),
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('t') => {
                self.state.overlay = Overlay::TournamentPick {
                    selected: self.state.tournament,
                };
            }
            KeyCode::Char('?') => self.state.overlay = Overlay::Help,
            KeyCode::Down | KeyCode::Tab | KeyCode::Char('j') => {
                self.state.focus = self.state.focus.next();
            }
            KeyCode::Up | KeyCode::BackTab | KeyCode::Char('k') => {
                self.state.focus = self.state.focus.prev();
            }
            KeyCode::Enter => self.activate_focused(),
            _ => {}
        }
    }

    fn is_text_focus(&self) -> bool {
        match self.state.focus {
            FormField::PlayerNumber => true,
            // Minute is a computed autofill for provider-sourced cards and
            // only editable for manual entries.
            FormField::Minute => self.state.manual_card,
            _ => false,
        }
    }

    fn type_char(&mut self, c: char) {
        match self.state.focus {
            FormField::PlayerNumber => self.state.draft.player_number.push(c),
            FormField::Minute => self.state.draft.minute.push(c),
            _ => {}
        }
    }

    fn erase_char(&mut self) {
        match self.state.focus {
            FormField::PlayerNumber => {
                self.state.draft.player_number.pop();
            }
            FormField::Minute => {
                self.state.draft.minute.pop();
            }
            _ => {}
        }
    }

    fn activate_focused(&mut self) {
        match self.state.focus {
            FormField::Round => {
                if self.state.rounds.is_empty() {
                    self.state.push_log("[INFO] No rounds loaded yet");
                } else {
                    self.state.overlay = Overlay::Select {
                        field: FormField::Round,
                        selected: 0,
                    };
                }
            }
            FormField::Match => {
                if self.state.draft.round.is_empty() {
                    self.state.push_log("[INFO] Pick a round to see matches");
                } else {
                    self.state.overlay = Overlay::Select {
                        field: FormField::Match,
                        selected: 0,
                    };
                }
            }
            FormField::Referee => {
                self.state.overlay = Overlay::Select {
                    field: FormField::Referee,
                    selected: 0,
                };
            }
            FormField::CardPick => {
                if self.state.draft.match_id.is_empty() {
                    self.state.push_log("[INFO] Pick a match to see cards");
                } else {
                    self.state.overlay = Overlay::Select {
                        field: FormField::CardPick,
                        selected: 0,
                    };
                }
            }
            FormField::CardType => {
                self.state.draft.card_type = self.state.draft.card_type.next();
            }
            FormField::Reason => {
                self.state.overlay = Overlay::Select {
                    field: FormField::Reason,
                    selected: 0,
                };
            }
            FormField::Submit => self.submit(),
            FormField::PlayerNumber | FormField::Minute => {}
        }
    }

    fn on_tournament_key(&mut self, key: KeyEvent, selected: usize) {
        match key.code {
            KeyCode::Esc => self.state.overlay = Overlay::None,
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.overlay = Overlay::TournamentPick {
                    selected: (selected + 1) % TOURNAMENTS.len(),
                };
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.overlay = Overlay::TournamentPick {
                    selected: (selected + TOURNAMENTS.len() - 1) % TOURNAMENTS.len(),
                };
            }
            KeyCode::Enter => {
                self.state.overlay = Overlay::None;
                let generation = self.state.select_tournament(selected);
                self.fetch_fixtures(generation);
                self.state
                    .push_log(format!("[INFO] Tournament: {}", self.state.tournament_name()));
            }
            _ => {}
        }
    }

    fn on_select_key(&mut self, key: KeyEvent, field: FormField, selected: usize) {
        let total = select_options(&self.state, field).len();
        if total == 0 {
            self.state.overlay = Overlay::None;
            return;
        }
        match key.code {
            KeyCode::Esc => self.state.overlay = Overlay::None,
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.overlay = Overlay::Select {
                    field,
                    selected: (selected + 1) % total,
                };
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.overlay = Overlay::Select {
                    field,
                    selected: (selected + total - 1) % total,
                };
            }
            KeyCode::Enter => {
                self.state.overlay = Overlay::None;
                self.choose(field, selected);
            }
            _ => {}
        }
    }

    fn choose(&mut self, field: FormField, idx: usize) {
        match field {
            FormField::Round => {
                if let Some(round) = self.state.rounds.get(idx).cloned() {
                    self.state.select_round(round);
                }
            }
            FormField::Match => {
                let matches = self.state.matches_for_round();
                if let Some(m) = matches.get(idx) {
                    let generation = self.state.select_match(m.id.clone());
                    let known_referees = self.state.referees.clone();
                    let match_id = m.id.clone();
                    self.send(ProviderCommand::FetchMatchCards {
                        generation,
                        match_id,
                        known_referees,
                    });
                }
            }
            FormField::Referee => {
                if let Some(name) = self.state.referees.get(idx).cloned() {
                    self.state.draft.referee = name;
                } else {
                    // Trailing entry opens the add-referee dialog.
                    self.state.overlay = Overlay::AddReferee {
                        name: String::new(),
                    };
                }
            }
            FormField::CardPick => {
                if idx < self.state.match_events.len() {
                    if let Some((generation, player_id)) = self.state.select_event(idx) {
                        self.send(ProviderCommand::FetchPlayer {
                            generation,
                            player_id,
                        });
                    }
                } else if self.state.selected_fixture().is_some() {
                    self.state.overlay = Overlay::AddCard(CardDialog::new());
                }
            }
            FormField::Reason => {
                if let Some(reason) = CARD_REASONS.get(idx) {
                    self.state.draft.reason = reason.to_string();
                }
            }
            _ => {}
        }
    }

    fn on_add_referee_key(&mut self, key: KeyEvent, mut name: String) {
        match key.code {
            KeyCode::Esc => self.state.overlay = Overlay::None,
            KeyCode::Char(c) => {
                name.push(c);
                self.state.overlay = Overlay::AddReferee { name };
            }
            KeyCode::Backspace => {
                name.pop();
                self.state.overlay = Overlay::AddReferee { name };
            }
            KeyCode::Enter => {
                let trimmed = name.trim().to_string();
                if trimmed.is_empty() {
                    return;
                }
                self.state.overlay = Overlay::None;
                self.state.draft.referee = trimmed.clone();
                self.state.referee_version += 1;
                self.send(ProviderCommand::InsertReferee { name: trimmed });
            }
            _ => {}
        }
    }

    fn on_add_card_key(&mut self, key: KeyEvent, mut dialog: CardDialog) {
        match key.code {
            KeyCode::Esc => {
                self.state.overlay = Overlay::None;
                return;
            }
            KeyCode::Down | KeyCode::Tab => dialog.focus = dialog.focus.next(),
            KeyCode::Up | KeyCode::BackTab => dialog.focus = dialog.focus.prev(),
            KeyCode::Left | KeyCode::Right if dialog.focus == CardDialogField::Team => {
                dialog.home_team = !dialog.home_team;
            }
            KeyCode::Char(' ') if dialog.focus == CardDialogField::Team => {
                dialog.home_team = !dialog.home_team;
            }
            KeyCode::Char(' ') if dialog.focus == CardDialogField::CardType => {
                dialog.card_type = dialog.card_type.next();
            }
            KeyCode::Char(c) => match dialog.focus {
                CardDialogField::PlayerName => dialog.player_name.push(c),
                CardDialogField::PlayerNumber => dialog.player_number.push(c),
                CardDialogField::Minute => dialog.minute.push(c),
                _ => {}
            },
            KeyCode::Backspace => match dialog.focus {
                CardDialogField::PlayerName => {
                    dialog.player_name.pop();
                }
                CardDialogField::PlayerNumber => {
                    dialog.player_number.pop();
                }
                CardDialogField::Minute => {
                    dialog.minute.pop();
                }
                _ => {}
            },
            KeyCode::Enter => match dialog.focus {
                CardDialogField::Team => dialog.home_team = !dialog.home_team,
                CardDialogField::CardType => dialog.card_type = dialog.card_type.next(),
                CardDialogField::Confirm => {
                    if dialog.validate() {
                        self.state.apply_manual_card(&dialog);
                        self.state.overlay = Overlay::None;
                        return;
                    }
                }
                _ => dialog.focus = dialog.focus.next(),
            },
            _ => {}
        }
        self.state.overlay = Overlay::AddCard(dialog);
    }

    fn submit(&mut self) {
        if self.state.submitting {
            return;
        }
        if !self.state.validate() {
            self.state.push_log(format!(
                "[WARN] Missing required fields: {}",
                self.state
                    .errors
                    .iter()
                    .map(|f| f.label())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
            return;
        }
        let Some(report) = self.state.build_report() else {
            self.state.push_log("[WARN] Selected match no longer resolves");
            return;
        };
        self.state.submitting = true;
        self.send(ProviderCommand::StoreReport(report));
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    provider::spawn_provider(tx, cmd_rx);

    let mut app = App::new(cmd_tx);
    let generation = app.state.select_tournament(0);
    app.fetch_fixtures(generation);

    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<state::Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }
        app.sync_referees();

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                    app.sync_referees();
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(&app.state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    if app.state.fixtures_loading {
        let loading = Paragraph::new("Loading fixtures...")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(loading, chunks[1]);
    } else {
        render_form(frame, chunks[1], &app.state);
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    match &app.state.overlay {
        Overlay::None => {}
        Overlay::TournamentPick { selected } => {
            render_list_overlay(
                frame,
                "Tournament",
                &TOURNAMENTS.iter().map(|t| t.name.to_string()).collect::<Vec<_>>(),
                *selected,
            );
        }
        Overlay::Select { field, selected } => {
            render_list_overlay(
                frame,
                select_title(*field),
                &select_options(&app.state, *field),
                *selected,
            );
        }
        Overlay::AddReferee { name } => render_add_referee(frame, name),
        Overlay::AddCard(dialog) => render_add_card(frame, &app.state, dialog),
        Overlay::Help => render_help_overlay(frame, frame.size()),
    }
}

fn header_text(state: &AppState) -> String {
    let saved = state
        .last_saved
        .as_deref()
        .map(|at| format!(" | Last saved {at}"))
        .unwrap_or_default();
    format!(
        "SPJALD TERMINAL | {} | Season {}{saved}",
        state.tournament_name(),
        state.season
    )
}

fn footer_text(state: &AppState) -> String {
    match state.overlay {
        Overlay::None => {
            "Tab/↑/↓ Move | Enter Open/Pick | t Tournament | ? Help | q Quit".to_string()
        }
        Overlay::AddCard(_) => {
            "Tab/↑/↓ Move | Space Toggle | Enter Confirm | Esc Cancel".to_string()
        }
        _ => "↑/↓ Move | Enter Pick | Esc Close".to_string(),
    }
}

fn render_form(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut lines: Vec<Line> = Vec::new();
    for field in FormField::ORDER {
        lines.push(form_row(state, field));
        if field == FormField::CardPick {
            lines.push(info_row(state));
        }
    }
    let form = Paragraph::new(Text::from(lines))
        .block(Block::default().title("Card report").borders(Borders::ALL));
    frame.render_widget(form, area);
}

fn form_row(state: &AppState, field: FormField) -> Line<'static> {
    let focused = state.focus == field;
    let marker = if focused { "> " } else { "  " };
    let label_style = if focused {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let (label, value, placeholder) = match field {
        FormField::Round => (
            "Round",
            round_display(&state.draft.round),
            "Pick a round",
        ),
        FormField::Match => ("Match", match_display(state), "Pick a match"),
        FormField::Referee => ("Referee", state.draft.referee.clone(), "Pick a referee"),
        FormField::CardPick => ("Card", card_display(state), "Pick a card"),
        FormField::PlayerNumber => (
            "Player number",
            number_display(state),
            if state.player_number_not_found {
                "Not found on FotMob"
            } else {
                ""
            },
        ),
        FormField::Minute => (
            "Minute",
            minute_display(state),
            if state.manual_card { "" } else { "(auto)" },
        ),
        FormField::CardType => ("Card type", card_type_display(state.draft.card_type), ""),
        FormField::Reason => ("Reason", state.draft.reason.clone(), "Pick a reason"),
        FormField::Submit => (
            "",
            if state.submitting {
                "[ Saving... ]".to_string()
            } else {
                "[ Submit report ]".to_string()
            },
            "",
        ),
    };

    let mut spans = vec![
        Span::styled(marker.to_string(), label_style),
        Span::styled(format!("{label:<14}"), label_style),
    ];
    if value.is_empty() {
        spans.push(Span::styled(
            placeholder.to_string(),
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::raw(value));
    }
    if let Some(missing) = field_error(state, field) {
        spans.push(Span::styled(
            format!("  {missing} required"),
            Style::default().fg(Color::Red),
        ));
    }
    Line::from(spans)
}

// Player team and name are autofill-only rows; they carry their own
// validation markers since they have no focusable widget.
fn info_row(state: &AppState) -> Line<'static> {
    let mut spans = vec![
        Span::raw("  "),
        Span::styled("Player team   ".to_string(), Style::default()),
    ];
    if state.player_loading {
        spans.push(Span::styled(
            "Loading...".to_string(),
            Style::default().fg(Color::DarkGray),
        ));
    } else if state.draft.player_team.is_empty() {
        spans.push(Span::styled(
            "-".to_string(),
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::raw(state.draft.player_team.clone()));
    }
    for field in [ReportField::PlayerTeam, ReportField::PlayerName] {
        if state.errors.contains(&field) {
            spans.push(Span::styled(
                format!("  {} required", field.label()),
                Style::default().fg(Color::Red),
            ));
        }
    }
    Line::from(spans)
}

fn field_error(state: &AppState, field: FormField) -> Option<&'static str> {
    let report_field = match field {
        FormField::Round => ReportField::Round,
        FormField::Match => ReportField::Match,
        FormField::Referee => ReportField::Referee,
        FormField::PlayerNumber => ReportField::PlayerNumber,
        FormField::Minute => ReportField::Minute,
        FormField::CardType => ReportField::CardType,
        FormField::Reason => ReportField::Reason,
        FormField::CardPick | FormField::Submit => return None,
    };
    if state.errors.contains(&report_field) {
        Some(report_field.label())
    } else {
        None
    }
}

fn round_display(round: &str) -> String {
    if round.is_empty() {
        return String::new();
    }
    if round.parse::<i64>().is_ok() {
        format!("Round {round}")
    } else {
        round.to_string()
    }
}

fn match_display(state: &AppState) -> String {
    let Some(fixture) = state.selected_fixture() else {
        return String::new();
    };
    format!("{} vs {}", fixture.home.name, fixture.away.name)
}

fn card_display(state: &AppState) -> String {
    if state.events_loading {
        return "Loading cards...".to_string();
    }
    if !state.draft.card_type.is_set() || state.draft.player_name.is_empty() {
        return String::new();
    }
    format!(
        "[{}] {} - {}'",
        state.draft.card_type.label(),
        state.draft.player_name,
        state.draft.minute
    )
}

fn number_display(state: &AppState) -> String {
    if state.player_loading {
        "Loading...".to_string()
    } else {
        state.draft.player_number.clone()
    }
}

fn minute_display(state: &AppState) -> String {
    if state.player_loading && state.draft.minute.is_empty() {
        "Loading...".to_string()
    } else {
        state.draft.minute.clone()
    }
}

fn card_type_display(card: CardType) -> String {
    match card {
        CardType::Yellow => "Yellow".to_string(),
        CardType::YellowRed => "Second yellow".to_string(),
        CardType::Red => "Red".to_string(),
        CardType::None => String::new(),
    }
}

fn select_title(field: FormField) -> &'static str {
    match field {
        FormField::Round => "Round",
        FormField::Match => "Match",
        FormField::Referee => "Referee",
        FormField::CardPick => "Card",
        FormField::Reason => "Reason",
        _ => "Select",
    }
}

fn select_options(state: &AppState, field: FormField) -> Vec<String> {
    match field {
        FormField::Round => state.rounds.iter().map(|r| round_display(r)).collect(),
        FormField::Match => state
            .matches_for_round()
            .into_iter()
            .map(|m| m.display)
            .collect(),
        FormField::Referee => {
            let mut options: Vec<String> = state.referees.clone();
            options.push("+ Add referee".to_string());
            options
        }
        FormField::CardPick => {
            let mut options: Vec<String> = state
                .match_events
                .iter()
                .map(|e| format!("[{}] {} - {}'", e.card.label(), e.full_name, e.time_str))
                .collect();
            options.push("+ Add card manually".to_string());
            options
        }
        FormField::Reason => CARD_REASONS.iter().map(|r| r.to_string()).collect(),
        _ => Vec::new(),
    }
}

fn render_list_overlay(frame: &mut Frame, title: &str, options: &[String], selected: usize) {
    let area = centered_rect(50, 60, frame.size());
    frame.render_widget(Clear, area);

    let mut lines = Vec::new();
    for (idx, option) in options.iter().enumerate() {
        let prefix = if idx == selected { "> " } else { "  " };
        let style = if idx == selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!("{prefix}{option}"),
            style,
        )));
    }
    if options.is_empty() {
        lines.push(Line::from(Span::styled(
            "Nothing to pick".to_string(),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let list = Paragraph::new(Text::from(lines))
        .block(Block::default().title(title.to_string()).borders(Borders::ALL));
    frame.render_widget(list, area);
}

fn render_add_referee(frame: &mut Frame, name: &str) {
    let area = centered_rect(50, 20, frame.size());
    frame.render_widget(Clear, area);
    let text = format!("Name: {name}_\n\nEnter Save | Esc Cancel");
    let dialog = Paragraph::new(text)
        .block(Block::default().title("Add referee").borders(Borders::ALL));
    frame.render_widget(dialog, area);
}

fn render_add_card(frame: &mut Frame, state: &AppState, dialog: &CardDialog) {
    let area = centered_rect(55, 50, frame.size());
    frame.render_widget(Clear, area);

    let (home, away) = match state.selected_fixture() {
        Some(f) => (f.home.name.clone(), f.away.name.clone()),
        None => ("Home".to_string(), "Away".to_string()),
    };
    let team = if dialog.home_team { home } else { away };

    let mut lines: Vec<Line> = Vec::new();
    for field in CardDialogField::ORDER {
        let focused = dialog.focus == field;
        let marker = if focused { "> " } else { "  " };
        let (label, value) = match field {
            CardDialogField::Team => ("Team", format!("{team} (space toggles)")),
            CardDialogField::PlayerName => ("Player name", dialog.player_name.clone()),
            CardDialogField::PlayerNumber => ("Player number", dialog.player_number.clone()),
            CardDialogField::Minute => ("Minute", dialog.minute.clone()),
            CardDialogField::CardType => ("Card type", card_type_display(dialog.card_type)),
            CardDialogField::Confirm => ("", "[ Add card ]".to_string()),
        };
        let style = if focused {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let mut spans = vec![
            Span::styled(marker.to_string(), style),
            Span::styled(format!("{label:<14}"), style),
            Span::raw(value),
        ];
        if dialog.errors.contains(&field) {
            spans.push(Span::styled(
                "  required".to_string(),
                Style::default().fg(Color::Red),
            ));
        }
        lines.push(Line::from(spans));
    }

    let widget = Paragraph::new(Text::from(lines))
        .block(Block::default().title("Add card").borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Spjald Terminal - Help",
        "",
        "Form:",
        "  Tab / ↑ / ↓   Move between fields",
        "  Enter         Open dropdown / cycle card type / submit",
        "  t             Tournament picker",
        "  ?             Toggle help",
        "  q             Quit",
        "",
        "Dropdowns and dialogs:",
        "  ↑ / ↓         Move",
        "  Enter         Pick / confirm",
        "  Esc           Close without picking",
        "",
        "Player number is editable; minute only for manual cards.",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
