use spjald_terminal::state::CardReport;
use spjald_terminal::store::Store;

fn sample_report() -> CardReport {
    CardReport {
        tournament: "Besta deildin".to_string(),
        round: "3".to_string(),
        home_team: "Valur".to_string(),
        away_team: "KR".to_string(),
        referee_name: "Páll Sveinsson".to_string(),
        card_type: "Yellow".to_string(),
        player_team: "Valur".to_string(),
        player_name: "Jón Jónsson".to_string(),
        player_number: "9".to_string(),
        minute: "23".to_string(),
        reason: "Dissent".to_string(),
    }
}

#[test]
fn referee_list_starts_empty() {
    let store = Store::open_in_memory().expect("open store");
    assert!(store.list_referees().expect("list referees").is_empty());
}

#[test]
fn referees_come_back_in_case_insensitive_order() {
    let store = Store::open_in_memory().expect("open store");
    store.insert_referee("Þóra Björg").expect("insert");
    store.insert_referee("anna Lísa").expect("insert");
    store.insert_referee("Páll Sveinsson").expect("insert");

    let names = store.list_referees().expect("list referees");
    assert_eq!(names, vec!["anna Lísa", "Páll Sveinsson", "Þóra Björg"]);
}

#[test]
fn duplicate_referee_insert_is_not_rejected() {
    // Membership checks live with the callers, not the schema.
    let store = Store::open_in_memory().expect("open store");
    store.insert_referee("Páll Sveinsson").expect("insert");
    store.insert_referee("Páll Sveinsson").expect("insert");
    assert_eq!(store.list_referees().expect("list referees").len(), 2);
}

#[test]
fn stored_report_reads_back_field_for_field() {
    let store = Store::open_in_memory().expect("open store");
    let report = sample_report();
    store.insert_report(&report).expect("insert report");

    let reports = store.list_reports().expect("list reports");
    assert_eq!(reports, vec![report]);
}

#[test]
fn reports_accumulate_in_insert_order() {
    let store = Store::open_in_memory().expect("open store");
    let first = sample_report();
    let mut second = sample_report();
    second.player_name = "Anna Þórsdóttir".to_string();
    second.card_type = "Red".to_string();
    second.minute = "90+2".to_string();

    store.insert_report(&first).expect("insert report");
    store.insert_report(&second).expect("insert report");

    let reports = store.list_reports().expect("list reports");
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].player_name, "Jón Jónsson");
    assert_eq!(reports[1].player_name, "Anna Þórsdóttir");
    assert_eq!(reports[1].minute, "90+2");
}

#[test]
fn coach_sentinel_survives_storage() {
    let store = Store::open_in_memory().expect("open store");
    let mut report = sample_report();
    report.player_number = "Þjálfari".to_string();
    store.insert_report(&report).expect("insert report");

    let reports = store.list_reports().expect("list reports");
    assert_eq!(reports[0].player_number, "Þjálfari");
}

#[test]
fn schema_init_is_idempotent_across_reopens() {
    let dir = std::env::temp_dir().join(format!("spjald-store-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join("cards.sqlite");

    {
        let store = Store::open_at(&path).expect("open store");
        store.insert_referee("Páll Sveinsson").expect("insert");
    }
    {
        let store = Store::open_at(&path).expect("reopen store");
        assert_eq!(
            store.list_referees().expect("list referees"),
            vec!["Páll Sveinsson"]
        );
    }

    std::fs::remove_dir_all(&dir).ok();
}
