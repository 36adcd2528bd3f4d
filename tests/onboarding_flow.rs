//! End-to-end onboarding flows against a real libSQL store.

use std::sync::Arc;

use kiosk_console::clients::{ClientCollection, ClientRecord, Tier};
use kiosk_console::config::ConsoleConfig;
use kiosk_console::error::OnboardingError;
use kiosk_console::onboarding::{
    AdvanceOutcome, FieldEdit, FlowEvent, OnboardingController, OnboardingStep,
};
use kiosk_console::store::{KeyValueStore, LibSqlStore};
use kiosk_console::terminal::{SessionEnd, run_session};

async fn memory_store() -> Arc<dyn KeyValueStore> {
    Arc::new(LibSqlStore::new_memory().await.unwrap())
}

/// Walk a fresh flow to Review with the given profile and one primary HQ.
async fn onboard(store: Arc<dyn KeyValueStore>, name: &str, tier: Tier) -> ClientRecord {
    let mut c = OnboardingController::start(store, &ConsoleConfig::default())
        .await
        .unwrap();
    c.apply(FieldEdit::Name(name.to_string())).unwrap();
    c.advance().await.unwrap();
    c.apply(FieldEdit::City("Springfield".to_string())).unwrap();
    c.advance().await.unwrap();
    c.apply(FieldEdit::Tier(tier)).unwrap();
    c.advance().await.unwrap();
    c.add_location("HQ", None, true).unwrap();
    c.advance().await.unwrap();
    assert_eq!(c.step(), OnboardingStep::Review);

    match c.advance().await.unwrap() {
        AdvanceOutcome::Committed(record) => record,
        other => panic!("expected commit, got {other:?}"),
    }
}

#[tokio::test]
async fn acme_scenario_from_empty_collection() {
    let store = memory_store().await;
    let record = onboard(Arc::clone(&store), "Acme", Tier::Growth).await;

    let clients = ClientCollection::new(store).load().await.unwrap();
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0], record);
    assert_eq!(clients[0].name, "Acme");
    assert_eq!(clients[0].tier, Tier::Growth);
    assert_eq!(clients[0].locations.len(), 1);
    assert!(clients[0].locations[0].is_primary);
    assert!(!clients[0].id.is_empty());

    let json = serde_json::to_value(&clients[0]).unwrap();
    assert_eq!(json["status"], "Active");
}

#[tokio::test]
async fn commit_prepends_with_fresh_id() {
    let store = memory_store().await;
    let first = onboard(Arc::clone(&store), "Acme", Tier::Growth).await;
    let second = onboard(Arc::clone(&store), "Bistro", Tier::Starter).await;

    assert_ne!(first.id, second.id);
    let clients = ClientCollection::new(store).load().await.unwrap();
    let names: Vec<&str> = clients.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Bistro", "Acme"]);
}

#[tokio::test]
async fn collection_roundtrips_through_file_store() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("console.db");

    let written = {
        let store: Arc<dyn KeyValueStore> = Arc::new(LibSqlStore::new_local(&path).await.unwrap());
        onboard(Arc::clone(&store), "Acme", Tier::Growth).await;
        onboard(Arc::clone(&store), "Cinema Co", Tier::Enterprise).await;
        ClientCollection::new(store).load().await.unwrap()
    };

    let reopened: Arc<dyn KeyValueStore> = Arc::new(LibSqlStore::new_local(&path).await.unwrap());
    let collection = ClientCollection::new(reopened);
    assert_eq!(collection.load().await.unwrap(), written);

    collection.save(&written).await.unwrap();
    assert_eq!(collection.load().await.unwrap(), written);
}

#[tokio::test]
async fn step_stays_in_bounds_for_any_navigation() {
    let store = memory_store().await;

    // Every sequence of 8 advance/retreat moves, never advancing off Review.
    for mask in 0u32..256 {
        let mut c = OnboardingController::start(Arc::clone(&store), &ConsoleConfig::default())
            .await
            .unwrap();
        c.apply(FieldEdit::Name("Acme".to_string())).unwrap();

        for bit in 0..8 {
            let before = c.step();
            if mask & (1 << bit) != 0 {
                if before.is_review() {
                    continue;
                }
                c.advance().await.unwrap();
                assert_eq!(Some(c.step()), before.next());
            } else {
                c.retreat().unwrap();
                assert_eq!(c.step(), before.prev().unwrap_or(before));
            }
            assert!((1..=OnboardingStep::COUNT).contains(&c.step().index()));
        }
        c.abandon();
    }

    assert!(ClientCollection::new(store).load().await.unwrap().is_empty());
}

#[tokio::test]
async fn edit_flow_replaces_record_in_place() {
    let store = memory_store().await;
    let older = onboard(Arc::clone(&store), "Acme", Tier::Growth).await;
    onboard(Arc::clone(&store), "Bistro", Tier::Starter).await;

    let mut c = OnboardingController::resume(Arc::clone(&store), &ConsoleConfig::default(), &older.id)
        .await
        .unwrap();
    assert_eq!(c.editing(), Some(older.id.as_str()));
    assert_eq!(c.draft().name, "Acme");

    c.apply(FieldEdit::Name("Acme Holdings".to_string())).unwrap();
    for _ in 0..3 {
        c.advance().await.unwrap();
    }
    c.add_location("Annex", None, true).unwrap();
    c.advance().await.unwrap();
    let saved = c.commit().await.unwrap();

    assert_eq!(saved.id, older.id);
    assert_eq!(saved.created_at, older.created_at);

    let clients = ClientCollection::new(store).load().await.unwrap();
    assert_eq!(clients.len(), 2);
    assert_eq!(clients[1].name, "Acme Holdings");
    assert_eq!(clients[1].locations.len(), 2);
    assert_eq!(clients[1].primary_location().unwrap().name, "Annex");
}

#[tokio::test]
async fn edit_of_missing_client_fails_fast() {
    let store = memory_store().await;
    let err = OnboardingController::resume(store, &ConsoleConfig::default(), "nope")
        .await
        .err()
        .unwrap();
    assert!(matches!(err, OnboardingError::ClientNotFound { ref id } if id == "nope"));
    assert!(!err.is_recoverable());
}

#[tokio::test]
async fn unreadable_collection_is_persistence_unavailable() {
    let store = memory_store().await;
    store
        .set("clients", &serde_json::json!({"not": "a list"}))
        .await
        .unwrap();

    let err = OnboardingController::start(store, &ConsoleConfig::default())
        .await
        .err()
        .unwrap();
    assert!(matches!(err, OnboardingError::PersistenceUnavailable(_)));
}

#[tokio::test]
async fn commit_event_reaches_subscribers() {
    let store = memory_store().await;
    let mut c = OnboardingController::start(Arc::clone(&store), &ConsoleConfig::default())
        .await
        .unwrap();
    let mut events = c.subscribe();

    c.apply(FieldEdit::Name("Acme".to_string())).unwrap();
    for _ in 0..4 {
        c.advance().await.unwrap();
    }
    let record = c.commit().await.unwrap();

    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    assert_eq!(
        seen.iter()
            .filter(|e| matches!(e, FlowEvent::StepChanged { .. }))
            .count(),
        4
    );
    assert!(matches!(
        seen.last(),
        Some(FlowEvent::Committed { client_id, total_clients: 1 }) if *client_id == record.id
    ));
}

#[tokio::test]
async fn scripted_terminal_session() {
    let store = memory_store().await;
    let controller = OnboardingController::start(Arc::clone(&store), &ConsoleConfig::default())
        .await
        .unwrap();

    let script = "\
next
set name Acme
next
set city Springfield
next
set tier growth
next
add-location --primary
add-location HQ | 1 Main St --primary
next
next
";
    let mut out = Vec::new();
    let end = run_session(controller, script.as_bytes(), &mut out)
        .await
        .unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("! Client name is required"));
    assert!(text.contains("! location name is required"));
    assert!(text.contains("Step 5/5: Review"));
    let SessionEnd::Committed(record) = end else {
        panic!("session should commit, output:\n{text}");
    };
    assert_eq!(record.name, "Acme");

    let clients = ClientCollection::new(store).load().await.unwrap();
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0].tier, Tier::Growth);
    assert_eq!(clients[0].locations[0].address.as_deref(), Some("1 Main St"));
}

#[tokio::test]
async fn terminal_session_eof_abandons() {
    let store = memory_store().await;
    let controller = OnboardingController::start(Arc::clone(&store), &ConsoleConfig::default())
        .await
        .unwrap();

    let mut out = Vec::new();
    let end = run_session(controller, "set name Acme\nnext\n".as_bytes(), &mut out)
        .await
        .unwrap();

    assert!(matches!(end, SessionEnd::Abandoned));
    assert!(ClientCollection::new(store).load().await.unwrap().is_empty());
}
