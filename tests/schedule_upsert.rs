//! Schedule computation and idempotent upsert scenarios

use pipebench::schedule::{
    compute_schedule_mode, ScheduleForm, ScheduleInterval, ScheduleManager, ScheduleMode,
    SCHEDULE_COLLECTION,
};
use pipebench::store::{InMemoryStore, RecordStore, UpsertOutcome};
use std::sync::Arc;

#[tokio::test]
async fn test_form_to_store_round_trip() {
    let form = ScheduleForm {
        interval: ScheduleInterval::Monthly,
        weekday: None,
        month_day: Some(15),
    };
    let mode = compute_schedule_mode(&form).unwrap();
    assert_eq!(mode, ScheduleMode::Monthly { day: 15 });

    let store = Arc::new(InMemoryStore::new());
    let manager = ScheduleManager::new(store.clone());
    manager
        .upsert_schedule("Monthly Audit", "acme", mode)
        .await
        .unwrap();

    let records = store.list(SCHEDULE_COLLECTION).await.unwrap();
    assert_eq!(records.len(), 1);
    // Month day is shifted to the runner's 0-based convention
    assert_eq!(records[0]["schedule"]["day"], 14);
    assert_eq!(records[0]["pipeline"], "Monthly Audit");
}

#[tokio::test]
async fn test_resubmitting_same_pipeline_updates_in_place() {
    let store = Arc::new(InMemoryStore::new());
    let manager = ScheduleManager::new(store.clone());

    let first = manager
        .upsert_schedule("Nightly Suite", "acme", ScheduleMode::Daily)
        .await
        .unwrap();
    let second = manager
        .upsert_schedule("Nightly Suite", "acme", ScheduleMode::Weekly { day: 5 })
        .await
        .unwrap();

    assert_eq!(first, UpsertOutcome::Created);
    assert_eq!(second, UpsertOutcome::Updated);

    // One record, reflecting the latest mode
    let records = store.list(SCHEDULE_COLLECTION).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["schedule"]["mode"], "weekly");
}

#[tokio::test]
async fn test_different_owners_get_distinct_records() {
    let store = Arc::new(InMemoryStore::new());
    let manager = ScheduleManager::new(store.clone());

    manager
        .upsert_schedule("Nightly Suite", "acme", ScheduleMode::Daily)
        .await
        .unwrap();
    manager
        .upsert_schedule("Nightly Suite", "globex", ScheduleMode::Daily)
        .await
        .unwrap();

    let records = store.list(SCHEDULE_COLLECTION).await.unwrap();
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn test_out_of_range_day_never_reaches_the_store() {
    let store = Arc::new(InMemoryStore::new());
    let manager = ScheduleManager::new(store.clone());

    let result = manager
        .upsert_schedule("Bad Day", "acme", ScheduleMode::Monthly { day: 0 })
        .await;
    assert!(result.is_err());
    assert!(store.list(SCHEDULE_COLLECTION).await.unwrap().is_empty());
}
