#![no_main]
use libfuzzer_sys::fuzz_target;

use covdelta::markdown::MarkdownFormatter;
use covdelta::report::{Report, ReportFormatter};

fuzz_target!(|data: &[u8]| {
    // Profile parser and renderer must not panic on any input.
    if let Ok(snapshot) = covdelta::parsers::gocover::parse(data) {
        let paths: Vec<&str> = snapshot.files.iter().map(|f| f.path.as_str()).collect();
        let report = Report::build(&snapshot, &snapshot, &paths, "");
        let _ = MarkdownFormatter::new().format(&report);
    }
});
