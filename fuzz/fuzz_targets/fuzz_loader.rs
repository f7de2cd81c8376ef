#![no_main]

use libfuzzer_sys::fuzz_target;
use salescope::dataset::Dataset;
use salescope::loader::parse_records;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must parse or fail with an error, never panic
    if let Ok((records, stats)) = parse_records(data) {
        assert_eq!(records.len(), stats.rows_kept());

        let dataset = Dataset::from_records(records);
        if let Some(thresholds) = dataset.thresholds() {
            assert!(thresholds.low <= thresholds.high);
        }
        assert_eq!(dataset.segmentation().len(), dataset.segmentation().customers().count());
    }
});
