#![no_main]

use arbor::data::Dataset;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: &str| {
    // Construction must either succeed or report an error, never panic.
    if let Ok(ds) = Dataset::from_csv_str(input, true) {
        assert_eq!(ds.variables().len(), ds.cols());
        for (i, var) in ds.variables().iter().enumerate() {
            assert_eq!(var.index, i);
            assert_eq!(ds.values(i).unwrap().len(), ds.rows());
        }
    }
    let _ = Dataset::from_csv_str(input, false);
});
