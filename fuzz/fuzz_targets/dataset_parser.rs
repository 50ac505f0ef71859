#![no_main]

use libfuzzer_sys::fuzz_target;
use talktime::config::AnalysisConfig;
use talktime::dataset::Column;
use talktime::loader::parse_dataset;
use talktime::pipeline::run_analysis;
use talktime::selection::{parse_bin_width, parse_trim_fraction, FIELD_TRIM};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Neither the export parser, the numeric validators nor the pipeline may panic
        let _ = parse_bin_width(input);
        let _ = parse_trim_fraction(input, FIELD_TRIM);

        if let Ok(dataset) = parse_dataset(input) {
            let mut params = AnalysisConfig::default().resolve(&dataset);
            params.primary.groups = dataset.distinct(Column::Group);
            params.primary.trim = "0".to_string();
            let _ = run_analysis(&dataset, &params);

            params.bin_width = "0.001".to_string();
            params.primary.trim = "0.5".to_string();
            let _ = run_analysis(&dataset, &params);
        }
    }
});
