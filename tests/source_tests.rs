use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;
use std::path::PathBuf;
use uptime_state::{
    AnalysisOptions, LogReaderOptions, UptimeError, analyze_file, annotate_transitions,
    build_indicator_series, parse_log, read_log,
};

/// Same layout as the recorder output: an unnamed index column, then the fields of
/// the time service response.
const RECORDED: &str = "\
,abbreviation,client_ip,datetime,day_of_week,day_of_year
0,CDT,127.0.0.1,2020-07-26T18:23:03.110728-05:00,0,208
1,CDT,127.0.0.1,2020-07-26T18:24:02.394432-05:00,0,208
2,CDT,127.0.0.1,2020-07-26T18:25:02.623612-05:00,0,208
3,CDT,127.0.0.1,2020-07-26T18:30:02.952026-05:00,0,208
4,CDT,127.0.0.1,2020-07-26T18:31:02.952026-05:00,0,208
";

fn gzip(text: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    encoder.finish().unwrap()
}

fn temp_log(name: &str, bytes: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "uptime_state_{}_{}.csv.gzip",
        name,
        std::process::id()
    ));
    std::fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn test_read_gzip_log() {
    let path = temp_log("recorded", &gzip(RECORDED));

    let samples = read_log(&path, &LogReaderOptions::default()).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(samples.len(), 5);
    let series = build_indicator_series(&samples).unwrap();
    assert_eq!(series.indicators(), vec![1, 1, 1, 0, 0, 0, 0, 1, 1]);

    let first = samples[0].datetime().unwrap();
    assert_eq!(first.format("%Y-%m-%d %H:%M").to_string(), "2020-07-26 18:23");
}

#[test]
fn test_plain_and_gzip_agree() {
    let options = LogReaderOptions::default();
    let plain = parse_log(RECORDED.as_bytes(), &options).unwrap();
    let packed = parse_log(&gzip(RECORDED), &options).unwrap();
    assert_eq!(plain, packed);
}

#[test]
fn test_appended_gzip_members_are_all_read() {
    // The recorder writes the header once, then appends one gzip member per probe.
    let mut rows = RECORDED.lines();
    let mut packed = gzip(&format!("{}\n", rows.next().unwrap()));
    for row in rows {
        packed.extend(gzip(&format!("{}\n", row)));
    }

    let path = temp_log("appended", &packed);
    let samples = read_log(&path, &LogReaderOptions::default()).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(samples.len(), 5);
    assert_eq!(samples, parse_log(RECORDED.as_bytes(), &LogReaderOptions::default()).unwrap());
}

#[test]
fn test_analyze_file_calibration() {
    let path = temp_log("analyze", &gzip(RECORDED));

    let analysis = analyze_file(&path, &AnalysisOptions::default()).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(analysis.annotated.changed(), vec![0, 0, 1, 0, 0, 0, 1, 0]);
    // Less than a day of data: every bucket is an edge.
    assert!(analysis.summaries.is_empty());
    assert_eq!(analysis.report.total_minutes, 7);
    assert_eq!(analysis.outages.count, 1);
    assert_eq!(analysis.outages.max, 4);

    let again = annotate_transitions(&analysis.indicators).unwrap();
    assert_eq!(again, analysis.annotated);
}

#[test]
fn test_missing_file_is_io_error() {
    let path = std::env::temp_dir().join("uptime_state_does_not_exist.csv.gzip");
    assert!(matches!(
        read_log(&path, &LogReaderOptions::default()),
        Err(UptimeError::Io { .. })
    ));
}

#[test]
fn test_empty_file_is_input_error() {
    let path = temp_log("empty", &[]);
    let result = read_log(&path, &LogReaderOptions::default());
    std::fs::remove_file(&path).unwrap();

    assert!(matches!(result, Err(UptimeError::Input(_))));
}

#[test]
fn test_truncated_gzip_is_input_error() {
    let packed = gzip(RECORDED);
    let result = parse_log(&packed[..packed.len() / 2], &LogReaderOptions::default());
    assert!(matches!(result, Err(UptimeError::Input(_))));
}

#[test]
fn test_header_only_log_has_no_samples() {
    let samples = parse_log(b"datetime\n", &LogReaderOptions::default()).unwrap();
    assert!(samples.is_empty());
    assert!(matches!(
        build_indicator_series(&samples),
        Err(UptimeError::Input(_))
    ));
}
