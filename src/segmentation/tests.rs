use super::*;
use crate::record::{CustomerSegment, TransactionBuilder, TransactionRecord};
use chrono::NaiveDate;
use proptest::prelude::*;

fn sale(transaction_id: &str, customer_id: &str, total: f64) -> TransactionRecord {
    TransactionBuilder::new(
        transaction_id,
        customer_id,
        NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
    )
    .total(total)
    .build()
}

/// One record per customer, customer `Cnn` spending `totals[nn]`
fn one_sale_each(totals: &[f64]) -> Vec<TransactionRecord> {
    totals
        .iter()
        .enumerate()
        .map(|(i, &t)| sale(&format!("T{:03}", i), &format!("C{:03}", i), t))
        .collect()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
fn test_quantile_linear_interpolation() {
    let values: Vec<f64> = (1..=10).map(|i| i as f64 * 10.0).collect();

    assert_close(quantile(&values, 0.33).unwrap(), 39.7);
    assert_close(quantile(&values, 0.66).unwrap(), 69.4);
    assert_eq!(quantile(&values, 0.0), Some(10.0));
    assert_eq!(quantile(&values, 1.0), Some(100.0));
    assert_close(quantile(&values, 0.5).unwrap(), 55.0);
}

#[test]
fn test_quantile_ignores_input_order() {
    let values = [70.0, 10.0, 40.0, 100.0, 20.0, 90.0, 30.0, 60.0, 50.0, 80.0];
    assert_close(quantile(&values, 0.33).unwrap(), 39.7);
}

#[test]
fn test_quantile_edge_cases() {
    assert_eq!(quantile(&[], 0.5), None);
    assert_eq!(quantile(&[42.0], 0.33), Some(42.0));
    assert_eq!(quantile(&[1.0, 2.0], 1.5), None);
    assert_eq!(quantile(&[1.0, 2.0], -0.1), None);
}

#[test]
fn test_reference_thresholds() {
    let records = one_sale_each(&[10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0]);
    let segmentation = segment(&records);

    let thresholds = segmentation.thresholds().unwrap();
    assert_close(thresholds.low, 39.7);
    assert_close(thresholds.high, 69.4);

    assert_eq!(segmentation.segment_of("C002"), Some(CustomerSegment::Low)); // 30
    assert_eq!(segmentation.segment_of("C003"), Some(CustomerSegment::Medium)); // 40
    assert_eq!(segmentation.segment_of("C006"), Some(CustomerSegment::High)); // 70
    assert_eq!(thresholds.classify(71.0), CustomerSegment::High);
}

#[test]
fn test_threshold_ties_go_to_lower_tier() {
    let thresholds = SegmentThresholds {
        low: 40.0,
        high: 70.0,
    };
    assert_eq!(thresholds.classify(40.0), CustomerSegment::Low);
    assert_eq!(thresholds.classify(40.000001), CustomerSegment::Medium);
    assert_eq!(thresholds.classify(70.0), CustomerSegment::Medium);
    assert_eq!(thresholds.classify(70.000001), CustomerSegment::High);
}

#[test]
fn test_quantile_on_order_statistic() {
    // 101 customers spending 0..=100: both ranks land exactly on a value
    let totals: Vec<f64> = (0..=100).map(f64::from).collect();
    let segmentation = segment(&one_sale_each(&totals));

    let thresholds = segmentation.thresholds().unwrap();
    assert_eq!(thresholds.low, 33.0);
    assert_eq!(thresholds.high, 66.0);
    assert_eq!(segmentation.segment_of("C033"), Some(CustomerSegment::Low));
    assert_eq!(segmentation.segment_of("C034"), Some(CustomerSegment::Medium));
    assert_eq!(segmentation.segment_of("C066"), Some(CustomerSegment::Medium));
    assert_eq!(segmentation.segment_of("C067"), Some(CustomerSegment::High));
}

#[test]
fn test_single_customer_collapses_to_one_tier() {
    let records = vec![
        sale("T1", "ONLY", 100.0),
        sale("T2", "ONLY", 250.0),
        sale("T3", "ONLY", 50.0),
    ];
    let segmentation = segment(&records);

    assert_eq!(segmentation.len(), 1);
    let profile = segmentation.profile("ONLY").unwrap();
    assert_eq!(profile.total, 400.0);
    assert_eq!(profile.transactions, 3);
    assert_eq!(profile.segment, CustomerSegment::Low);
    assert!(segmentation.thresholds().unwrap().is_degenerate());

    let annotated = annotate(records, &segmentation);
    assert!(annotated
        .iter()
        .all(|r| r.customer_segment == CustomerSegment::Low));
}

#[test]
fn test_two_customers_leave_medium_empty() {
    let segmentation = segment(&one_sale_each(&[10.0, 20.0]));
    assert_eq!(segmentation.segment_of("C000"), Some(CustomerSegment::Low));
    assert_eq!(segmentation.segment_of("C001"), Some(CustomerSegment::High));

    let summaries = segmentation.tier_summaries();
    assert_eq!(summaries.len(), 3);
    assert_eq!(summaries[1].segment, CustomerSegment::Medium);
    assert_eq!(summaries[1].customers, 0);
}

#[test]
fn test_customer_sum_beyond_f64_range_stays_finite() {
    let records = vec![
        sale("T1", "BIG", 1e308),
        sale("T2", "BIG", 1e308),
        sale("T3", "SMALL", 10.0),
    ];
    let segmentation = segment(&records);

    assert_eq!(segmentation.profile("BIG").unwrap().total, f64::MAX);
    let thresholds = segmentation.thresholds().unwrap();
    assert!(thresholds.low.is_finite() && thresholds.high.is_finite());
    assert!(thresholds.low <= thresholds.high);
    assert_eq!(segmentation.segment_of("BIG"), Some(CustomerSegment::High));
    assert_eq!(segmentation.segment_of("SMALL"), Some(CustomerSegment::Low));
}

#[test]
fn test_equal_totals_are_all_low() {
    let segmentation = segment(&one_sale_each(&[50.0, 50.0, 50.0, 50.0]));
    assert!(segmentation
        .customers()
        .all(|(_, p)| p.segment == CustomerSegment::Low));
}

#[test]
fn test_empty_records() {
    let segmentation = segment(&[]);
    assert!(segmentation.is_empty());
    assert_eq!(segmentation.thresholds(), None);
    assert!(annotate(Vec::new(), &segmentation).is_empty());
}

#[test]
fn test_customer_totals_group_rows() {
    let records = vec![
        sale("T1", "A", 10.0),
        sale("T2", "B", 5.0),
        sale("T3", "A", 2.5),
    ];
    let totals = customer_totals(&records);

    assert_eq!(totals.len(), 2);
    assert_eq!(totals["A"].total, 12.5);
    assert_eq!(totals["A"].transactions, 2);
    assert_eq!(totals["B"].total, 5.0);
}

#[test]
fn test_segmentation_ignores_row_order() {
    let mut records: Vec<TransactionRecord> = (0..60)
        .map(|i| {
            let amount = 0.1 * (i as f64) + 1e6 / (i as f64 + 1.0);
            sale(&format!("T{}", i), &format!("C{}", i % 7), amount)
        })
        .collect();

    let forward = segment(&records);
    records.reverse();
    let backward = segment(&records);
    records.rotate_left(17);
    let rotated = segment(&records);

    assert_eq!(forward, backward);
    assert_eq!(forward, rotated);
}

#[test]
fn test_annotate_broadcasts_customer_tier() {
    let mut records = one_sale_each(&[10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);
    records.push(sale("T100", "C005", 5.0));
    let segmentation = segment(&records);

    let annotated = annotate(records, &segmentation);
    assert_eq!(annotated.len(), 7);
    for row in &annotated {
        assert_eq!(
            Some(row.customer_segment),
            segmentation.segment_of(&row.customer_id)
        );
    }
}

#[test]
fn test_annotate_skips_unknown_customers() {
    let segmentation = segment(&one_sale_each(&[10.0, 20.0, 30.0]));
    let strangers = vec![sale("X1", "NOBODY", 10.0)];
    assert!(annotate(strangers, &segmentation).is_empty());
}

#[test]
fn test_tier_summaries_cover_everyone() {
    let totals: Vec<f64> = (1..=30).map(|i| (i * i) as f64).collect();
    let segmentation = segment(&one_sale_each(&totals));

    let summaries = segmentation.tier_summaries();
    let customers: usize = summaries.iter().map(|s| s.customers).sum();
    let spend: f64 = summaries.iter().map(|s| s.total_spend).sum();
    assert_eq!(customers, 30);
    assert_close(spend, totals.iter().sum());
}

proptest! {
    #[test]
    fn prop_segments_are_monotonic(totals in prop::collection::vec(0.0f64..1e9, 1..60)) {
        let segmentation = segment(&one_sale_each(&totals));
        prop_assert_eq!(segmentation.len(), totals.len());

        let profiles: Vec<_> = segmentation.customers().map(|(_, p)| *p).collect();
        for a in &profiles {
            for b in &profiles {
                if a.total < b.total {
                    prop_assert!(a.segment <= b.segment);
                }
            }
        }
    }

    #[test]
    fn prop_thresholds_are_ordered(totals in prop::collection::vec(0.0f64..1e6, 1..40)) {
        let thresholds = SegmentThresholds::from_totals(&totals).unwrap();
        prop_assert!(thresholds.low <= thresholds.high);
    }
}
