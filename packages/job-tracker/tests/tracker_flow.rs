//! Integration tests for the capture → relay → record → export flow.
//!
//! These tests wire the contexts together the way a host would:
//! 1. A page watcher extracts and pushes over the message transport
//! 2. The background relays and persists the signal
//! 3. The UI session quick-adds from the relayed signal
//! 4. Records are exported as CSV

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use job_tracker::{
    export_csv, page_events,
    messaging::spawn_responder,
    testing::{MockClock, StaticPage, JOB_POSTING_HTML},
    ApplicationId, ApplicationStatus, ApplicationStore, BackgroundContext, Extractor,
    JsonFileBackend, KeyValueBackend, MemoryBackend, NewApplication, PageSnapshot, PageWatcher,
    RelayConfig, SignalRelay, TabInfo,
};
use serde_json::json;

const NOW_MS: i64 = 1_704_412_800_000;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
}

/// Background context on a mock clock.
async fn start_background<B: KeyValueBackend + 'static>(
    backend: Arc<B>,
    clock: Arc<MockClock>,
) -> BackgroundContext<B, Arc<MockClock>> {
    let relay = SignalRelay::with_clock(RelayConfig::default(), clock);
    BackgroundContext::start(backend, relay).await.unwrap()
}

#[tokio::test]
async fn test_job_page_to_csv() {
    let clock = Arc::new(MockClock::at_millis(NOW_MS));
    let backend = Arc::new(MemoryBackend::new());
    let background = start_background(backend.clone(), clock.clone()).await;
    let (client, _responder) = spawn_responder(Arc::new(background));

    // Page context: one run on an already loaded page
    let page = Arc::new(StaticPage::loaded(
        "https://www.acme.com/jobs/42",
        JOB_POSTING_HTML,
    ));
    let (events, rx) = page_events();
    let watcher = PageWatcher::with_clock(
        Arc::new(Extractor::default()),
        page,
        client.clone(),
        std::time::Duration::from_millis(500),
        clock.clone(),
    );
    drop(events);
    let summary = watcher.run(rx).await;
    assert_eq!(summary.pushes, 1);

    // UI session: quick-add from the relayed signal
    let signal = client.get_auto_fill_data().await.unwrap().unwrap();
    assert_eq!(signal.company_name, "Acme, Inc");
    assert_eq!(signal.job_location, "Remote (EU)");

    let store = ApplicationStore::with_clock(backend, clock.clone());
    let record = store
        .create(NewApplication::from_signal(
            &signal,
            today(),
            ApplicationStatus::new(ApplicationStatus::APPLIED),
        ))
        .await
        .unwrap();
    assert_eq!(record.id, ApplicationId(NOW_MS as u64));

    let csv = export_csv(&store.list_for_display().await.unwrap()).unwrap();
    assert_eq!(
        csv,
        "Company Name,Application Date,Job Location,Status\n\
         \"Acme, Inc\",2024-01-05,\"Remote (EU)\",applied\n"
    );
}

#[tokio::test]
async fn test_stale_signal_is_not_offered_for_quick_add() {
    let clock = Arc::new(MockClock::at_millis(NOW_MS));
    let background = start_background(Arc::new(MemoryBackend::new()), clock.clone()).await;
    let (client, _responder) = spawn_responder(Arc::new(background));

    let snapshot = PageSnapshot::new("https://acme.com/jobs/1", JOB_POSTING_HTML);
    let signal = Extractor::default()
        .signal(&snapshot, job_tracker::Clock::now(&clock))
        .unwrap();
    job_tracker::SignalSink::push(&client, signal).await.unwrap();

    clock.advance(Duration::minutes(4) + Duration::seconds(59));
    assert!(client.get_auto_fill_data().await.unwrap().is_some());

    clock.advance(Duration::seconds(2));
    assert!(client.get_auto_fill_data().await.unwrap().is_none());
}

#[tokio::test]
async fn test_relay_and_records_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    let clock = Arc::new(MockClock::at_millis(NOW_MS));

    {
        let backend = Arc::new(JsonFileBackend::new(&path));
        let background = start_background(backend.clone(), clock.clone()).await;
        background
            .tab_updated(TabInfo::new(3, "https://www.globex.com/careers/9"), true)
            .await
            .unwrap();
        background
            .accept_signal(
                job_tracker::PageSignal::new("https://www.globex.com/careers/9")
                    .with_company("Globex"),
            )
            .await
            .unwrap();

        ApplicationStore::with_clock(backend, clock.clone())
            .create(NewApplication::new("Globex", today()).with_location("Springfield"))
            .await
            .unwrap();
    }

    clock.advance(Duration::minutes(2));

    let backend = Arc::new(JsonFileBackend::new(&path));
    let background = start_background(backend.clone(), clock.clone()).await;
    assert_eq!(
        background.relay().query().unwrap().company_name,
        "Globex"
    );
    assert_eq!(background.current_domain().await.unwrap(), "globex.com");

    let records = ApplicationStore::new(backend).list().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].location(), "Springfield");

    clock.advance(Duration::minutes(3));
    assert!(background.relay().query().is_none());
}

#[tokio::test]
async fn test_legacy_records_load() {
    let backend = Arc::new(MemoryBackend::new());
    backend
        .set(
            "applications",
            json!([
                {"id": 1699999999999u64, "companyName": "Initech", "applicationDate": "2023-11-14", "status": "rejected"},
                {"id": 1700000000000u64, "companyName": "Hooli", "applicationDate": "2023-11-15", "jobLocation": "Palo Alto", "status": "offer"}
            ]),
        )
        .await
        .unwrap();

    let store = ApplicationStore::new(backend.clone());
    store.initialize().await.unwrap();

    let display = store.list_for_display().await.unwrap();
    assert_eq!(display[0].company_name, "Hooli");
    assert_eq!(display[0].status.css_class(), "status-offer");
    assert_eq!(display[1].location(), "");

    assert!(store.delete_by_id(ApplicationId(1699999999999)).await.unwrap());
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[test]
fn test_company_falls_back_to_domain() {
    let snapshot = PageSnapshot::new(
        "https://www.Acme.com/careers/123",
        "<html><body><h1>We are hiring</h1></body></html>",
    );

    let extraction = Extractor::default().extract(&snapshot);
    assert!(extraction.is_job_page);
    assert_eq!(extraction.company_name, "acme");
}
