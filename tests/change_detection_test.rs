mod helpers;

use helpers::*;
use steamwatch::models::*;
use steamwatch::services::ChangeDetector;

fn detector(db: &TestDatabase) -> ChangeDetector {
    ChangeDetector::new(db.snapshot_repo.clone())
}

#[tokio::test]
async fn test_first_snapshot_is_recorded_with_all_fields_changed() {
    let db = TestDatabase::new().await;
    let package = db.create_package("77").await;
    let detector = detector(&db);

    let recorded = detector
        .record_snapshot(&package, &package_details("Standard", 1999, "EUR", false))
        .await
        .unwrap()
        .expect("first snapshot should be recorded");

    assert!(recorded.snapshot.id > 0);
    assert_eq!(recorded.snapshot.package_id, package.id);
    assert_eq!(recorded.changes.len(), TrackedField::ALL.len());
    assert!(recorded
        .changes
        .iter()
        .all(|c| c.previous == FieldValue::Absent));
}

#[tokio::test]
async fn test_identical_data_is_recorded_once() {
    let db = TestDatabase::new().await;
    let package = db.create_package("77").await;
    let detector = detector(&db);
    let details = package_details("Standard", 1999, "EUR", false);

    assert!(detector.record_snapshot(&package, &details).await.unwrap().is_some());
    assert!(detector.record_snapshot(&package, &details).await.unwrap().is_none());
    assert!(detector.record_snapshot(&package, &details).await.unwrap().is_none());

    assert_eq!(db.snapshot_count(package.id).await, 1);
}

#[tokio::test]
async fn test_price_change_is_the_only_diff() {
    let db = TestDatabase::new().await;
    let package = db.create_package("77").await;
    let detector = detector(&db);

    detector
        .record_snapshot(&package, &package_details("Standard", 1999, "EUR", false))
        .await
        .unwrap();
    let recorded = detector
        .record_snapshot(&package, &package_details("Standard", 1499, "EUR", false))
        .await
        .unwrap()
        .expect("price change should be recorded");

    assert_eq!(
        recorded.changes,
        vec![FieldChange {
            field: TrackedField::Price,
            current: FieldValue::Integer(1499),
            previous: FieldValue::Integer(1999),
        }]
    );
    assert_eq!(db.snapshot_count(package.id).await, 2);
}

#[tokio::test]
async fn test_platform_change_is_recorded() {
    let db = TestDatabase::new().await;
    let package = db.create_package("77").await;
    let detector = detector(&db);

    detector
        .record_snapshot(&package, &package_details("Standard", 1999, "EUR", false))
        .await
        .unwrap();
    let recorded = detector
        .record_snapshot(&package, &package_details("Standard", 1999, "EUR", true))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(recorded.changes.len(), 1);
    assert_eq!(recorded.changes[0].field, TrackedField::SupportsLinux);
    assert_eq!(recorded.changes[0].current, FieldValue::Flag(true));
}

#[tokio::test]
async fn test_snapshots_are_compared_per_package() {
    let db = TestDatabase::new().await;
    let p1 = db.create_package("1").await;
    let p2 = db.create_package("2").await;
    let detector = detector(&db);
    let details = package_details("Standard", 1999, "EUR", false);

    assert!(detector.record_snapshot(&p1, &details).await.unwrap().is_some());
    assert!(detector.record_snapshot(&p2, &details).await.unwrap().is_some());
}

#[tokio::test]
async fn test_identical_values_are_not_different_regardless_of_timestamp() {
    let db = TestDatabase::new().await;
    let package = db.create_package("77").await;
    let detector = detector(&db);

    let stored = db
        .snapshot_repo
        .create(&NewSnapshot::new(package.id, at(0), values(1999)))
        .await
        .unwrap();
    let later = NewSnapshot::new(package.id, at(60), values(1999));
    let earlier = NewSnapshot::new(package.id, at(-60), values(1999));

    assert!(!detector.is_different(&later, Some(&stored)).await.unwrap());
    assert!(!detector.is_different(&earlier, Some(&stored)).await.unwrap());
    assert!(detector
        .diff(&later, Some(&stored))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_diff_resolves_strictly_older_previous() {
    let db = TestDatabase::new().await;
    let package = db.create_package("77").await;
    let detector = detector(&db);

    detector
        .record(NewSnapshot::new(package.id, at(0), values(1999)))
        .await
        .unwrap();
    let second = detector
        .record(NewSnapshot::new(package.id, at(5), values(1499)))
        .await
        .unwrap()
        .unwrap()
        .snapshot;

    // the stored snapshot itself is not its own previous
    let changes = detector.diff(&second, None).await.unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].current, FieldValue::Integer(1499));
    assert_eq!(changes[0].previous, FieldValue::Integer(1999));

    let previous = detector.previous(&second).await.unwrap().unwrap();
    assert_eq!(previous.timestamp, at(0));
}

#[tokio::test]
async fn test_diff_without_any_previous() {
    let db = TestDatabase::new().await;
    let package = db.create_package("77").await;
    let detector = detector(&db);

    let candidate = NewSnapshot::new(package.id, at(0), values(1999));
    let changes = detector.diff(&candidate, None).await.unwrap();

    assert_eq!(changes.len(), TrackedField::ALL.len());
    assert!(detector.is_different(&candidate, None).await.unwrap());
}

#[tokio::test]
async fn test_record_compares_with_latest_snapshot() {
    let db = TestDatabase::new().await;
    let package = db.create_package("77").await;
    let detector = detector(&db);

    detector
        .record(NewSnapshot::new(package.id, at(0), values(1999)))
        .await
        .unwrap();
    detector
        .record(NewSnapshot::new(package.id, at(5), values(1499)))
        .await
        .unwrap();

    // back at the old price: differs from the latest, so it is stored
    let recorded = detector
        .record(NewSnapshot::new(package.id, at(10), values(1999)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(recorded.changes[0].previous, FieldValue::Integer(1499));
    assert_eq!(db.snapshot_count(package.id).await, 3);
}
