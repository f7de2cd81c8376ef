use super::*;
use crate::loader::DataSource;
use crate::record::TransactionBuilder;
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;

const HEADER: &str =
    "transaction_id,customer_id,transaction_date,city,product_name,storage,coupon_code,quantity,total,usia_group";

fn record(id: &str, customer: &str, year: i32, city: &str, total: f64) -> TransactionRecord {
    TransactionBuilder::new(id, customer, NaiveDate::from_ymd_opt(year, 6, 1).unwrap())
        .city(city)
        .product("Phone")
        .storage("128GB")
        .age_group("25-34")
        .total(total)
        .build()
}

fn sample() -> Dataset {
    Dataset::from_records(vec![
        record("T1", "C1", 2024, "Medan", 10.0),
        record("T2", "C2", 2022, "Jakarta", 50.0),
        record("T3", "C3", 2023, "Medan", 90.0),
        record("T4", "C1", 2023, "Bandung", 5.0),
    ])
}

fn csv_body(rows: &[&str]) -> String {
    let mut body = String::from(HEADER);
    for row in rows {
        body.push('\n');
        body.push_str(row);
    }
    body.push('\n');
    body
}

// ==================== In-memory Datasets ====================

#[test]
fn test_from_records_annotates_every_row() {
    let dataset = sample();

    assert_eq!(dataset.len(), 4);
    assert!(!dataset.is_empty());
    assert_eq!(dataset.segmentation().len(), 3);
    for row in dataset.records() {
        assert_eq!(
            dataset.segmentation().segment_of(&row.customer_id),
            Some(row.customer_segment)
        );
    }
    assert_eq!(dataset.load_stats().rows_read, 4);
    assert_eq!(dataset.load_stats().rows_dropped, 0);
}

#[test]
fn test_option_lists() {
    let dataset = sample();

    assert_eq!(dataset.years(), vec![2022, 2023, 2024]);
    assert_eq!(dataset.cities(), vec!["Medan", "Jakarta", "Bandung"]);
    assert_eq!(dataset.products(), vec!["Phone"]);
    assert_eq!(dataset.storages(), vec!["128GB"]);
    assert_eq!(dataset.age_groups(), vec!["25-34"]);
    assert_eq!(dataset.segments().len(), 3);
}

#[test]
fn test_last_transaction_date() {
    let dataset = sample();
    assert_eq!(
        dataset.last_transaction_date(),
        NaiveDate::from_ymd_opt(2024, 6, 1)
    );
    assert_eq!(Dataset::from_records(Vec::new()).last_transaction_date(), None);
}

#[test]
fn test_filtering_keeps_full_table_tiers() {
    let dataset = sample();
    let thresholds = dataset.thresholds();

    let view = dataset.filter(&Filter::new().city("Medan"));
    assert_eq!(view.len(), 2);
    for row in view.iter() {
        assert_eq!(
            dataset.segmentation().segment_of(&row.customer_id),
            Some(row.customer_segment)
        );
    }
    assert_eq!(dataset.thresholds(), thresholds);
    assert_eq!(dataset.len(), 4);
}

#[test]
fn test_empty_dataset() {
    let dataset = Dataset::from_records(Vec::new());
    assert!(dataset.is_empty());
    assert!(dataset.thresholds().is_none());
    assert!(dataset.years().is_empty());
    assert!(dataset.view().is_empty());
}

// ==================== Cache ====================

#[test]
fn test_cached_dataset_is_shared() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("shared.csv");
    fs::write(
        &path,
        csv_body(&["T1,C1,2024-01-02,Jakarta,Phone,64GB,NONKUPON,1,100,18-24"]),
    )
    .unwrap();

    let loader = DataLoader::new(DataSource::Path(path));
    let key = loader.source().id();

    let first = Dataset::cached(&loader).unwrap();
    let second = Dataset::cached(&loader).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(lookup(&key).is_some());

    assert!(evict(&key));
    assert!(!evict(&key));
    assert!(lookup(&key).is_none());
}

#[test]
fn test_refresh_swaps_in_new_dataset() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("refresh.csv");
    fs::write(
        &path,
        csv_body(&["T1,C1,2024-01-02,Jakarta,Phone,64GB,NONKUPON,1,100,18-24"]),
    )
    .unwrap();

    let loader = DataLoader::new(DataSource::Path(path.clone()));
    let key = loader.source().id();
    let before = Dataset::cached(&loader).unwrap();
    assert_eq!(before.len(), 1);

    fs::write(
        &path,
        csv_body(&[
            "T1,C1,2024-01-02,Jakarta,Phone,64GB,NONKUPON,1,100,18-24",
            "T2,C2,2024-01-03,Medan,Phone,64GB,HEMAT,1,200,18-24",
        ]),
    )
    .unwrap();

    let after = Dataset::refresh(&loader).unwrap();
    assert_eq!(after.len(), 2);
    assert!(Arc::ptr_eq(&after, &Dataset::cached(&loader).unwrap()));

    // Holders of the old snapshot are unaffected
    assert_eq!(before.len(), 1);
    assert_eq!(before.records()[0].transaction_id, "T1");

    evict(&key);
}

#[test]
fn test_failed_refresh_keeps_cached_dataset() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("vanishing.csv");
    fs::write(
        &path,
        csv_body(&["T1,C1,2024-01-02,Jakarta,Phone,64GB,NONKUPON,1,100,18-24"]),
    )
    .unwrap();

    let loader = DataLoader::new(DataSource::Path(path.clone()));
    let key = loader.source().id();
    let cached = Dataset::cached(&loader).unwrap();

    fs::remove_file(&path).unwrap();
    assert!(Dataset::refresh(&loader).is_err());

    let still = lookup(&key).unwrap();
    assert!(Arc::ptr_eq(&cached, &still));

    evict(&key);
}

#[test]
fn test_failed_load_is_not_cached() {
    let dir = tempdir().unwrap();
    let loader = DataLoader::new(DataSource::Path(dir.path().join("missing.csv")));

    assert!(Dataset::cached(&loader).is_err());
    assert!(lookup(&loader.source().id()).is_none());
}

#[test]
fn test_load_reports_dropped_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dropped.csv");
    fs::write(
        &path,
        csv_body(&[
            "T1,C1,2024-01-02,Jakarta,Phone,64GB,NONKUPON,1,100,18-24",
            "T2,C2,2024-01-03,,Phone,64GB,NONKUPON,1,100,18-24",
        ]),
    )
    .unwrap();

    let dataset = Dataset::load(&DataLoader::new(DataSource::Path(path))).unwrap();
    assert_eq!(dataset.len(), 1);
    assert_eq!(dataset.load_stats().rows_dropped, 1);
}
