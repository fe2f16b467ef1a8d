use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use chrono::Local;

use crate::fotmob_fetch;
use crate::state::{Delta, ProviderCommand};
use crate::store::Store;

/// Spawns the worker that owns the store connection and issues upstream
/// calls. Commands arrive from the UI thread; results go back as deltas.
/// Each form-driven lookup is exactly one upstream call; no retries.
pub fn spawn_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        let store = match Store::open() {
            Ok(store) => Some(store),
            Err(err) => {
                let _ = tx.send(Delta::Log(format!("[WARN] Store unavailable: {err}")));
                None
            }
        };

        send_referees(store.as_ref(), &tx);

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::FetchFixtures {
                    generation,
                    league_id,
                    season,
                } => match fotmob_fetch::fetch_league_fixtures(league_id, &season) {
                    Ok(fixtures) => {
                        let _ = tx.send(Delta::SetFixtures {
                            generation,
                            fixtures,
                        });
                    }
                    Err(err) => {
                        let _ = tx.send(Delta::FixturesFailed {
                            generation,
                            error: format!("{err:#}"),
                        });
                    }
                },
                ProviderCommand::FetchMatchCards {
                    generation,
                    match_id,
                    known_referees,
                } => match fotmob_fetch::fetch_match_cards(&match_id) {
                    Ok(cards) => {
                        let referee = cards
                            .referee
                            .map(|name| name.trim().to_string())
                            .filter(|name| !name.is_empty());
                        let mut inserted = false;
                        if let Some(name) = referee.as_deref() {
                            if !known_referees.iter().any(|r| r == name) {
                                inserted = insert_referee(store.as_ref(), name, &tx);
                            }
                        }
                        let _ = tx.send(Delta::SetMatchCards {
                            generation,
                            events: cards.events,
                            referee,
                            referee_inserted: inserted,
                        });
                    }
                    Err(err) => {
                        let _ = tx.send(Delta::MatchCardsFailed {
                            generation,
                            error: format!("{err:#}"),
                        });
                    }
                },
                ProviderCommand::FetchPlayer {
                    generation,
                    player_id,
                } => match fotmob_fetch::fetch_player_profile(player_id) {
                    Ok(profile) => {
                        let _ = tx.send(Delta::SetPlayerProfile {
                            generation,
                            profile,
                        });
                    }
                    Err(err) => {
                        let _ = tx.send(Delta::PlayerFailed {
                            generation,
                            error: format!("{err:#}"),
                        });
                    }
                },
                ProviderCommand::InsertReferee { name } => {
                    let trimmed = name.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    insert_referee(store.as_ref(), trimmed, &tx);
                }
                ProviderCommand::RefreshReferees => {
                    send_referees(store.as_ref(), &tx);
                }
                ProviderCommand::StoreReport(report) => {
                    let result = match store.as_ref() {
                        Some(store) => store.insert_report(&report),
                        None => Err(anyhow::anyhow!("store unavailable")),
                    };
                    match result {
                        Ok(()) => {
                            let at = Local::now().format("%d.%m.%Y %H:%M").to_string();
                            let _ = tx.send(Delta::ReportStored { at });
                        }
                        Err(err) => {
                            let _ = tx.send(Delta::ReportFailed(format!("{err:#}")));
                        }
                    }
                }
            }
        }
    });
}

fn insert_referee(store: Option<&Store>, name: &str, tx: &Sender<Delta>) -> bool {
    let Some(store) = store else {
        let _ = tx.send(Delta::Log("[WARN] Referee insert skipped: store unavailable".to_string()));
        return false;
    };
    match store.insert_referee(name) {
        Ok(()) => true,
        Err(err) => {
            let _ = tx.send(Delta::Log(format!("[WARN] Referee insert failed: {err:#}")));
            false
        }
    }
}

// A list-read failure degrades to an empty directory for the cycle; the
// operator can still add referees manually.
fn send_referees(store: Option<&Store>, tx: &Sender<Delta>) {
    let referees = match store {
        Some(store) => match store.list_referees() {
            Ok(referees) => referees,
            Err(err) => {
                let _ = tx.send(Delta::Log(format!("[WARN] Referee list failed: {err:#}")));
                Vec::new()
            }
        },
        None => Vec::new(),
    };
    let _ = tx.send(Delta::SetReferees(referees));
}
