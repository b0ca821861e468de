use crate::error::{Result, UptimeError};
use crate::models::RawSample;
use crate::pipe::progress;
use crate::stage::Stage;
use chrono::{DateTime, NaiveDateTime};
use flate2::read::MultiGzDecoder;
use memmap2::Mmap;
use spdlog::{debug, info};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

#[derive(Debug, Clone)]
pub struct LogReaderOptions {
    /// Header name of the timestamp column.
    pub column: String,
    /// Log a progress line every this many samples.
    pub progress_interval: usize,
}

impl Default for LogReaderOptions {
    fn default() -> Self {
        Self {
            column: "datetime".to_string(),
            progress_interval: 1_000_000,
        }
    }
}

/// Reads every success sample of a (possibly gzip compressed) CSV probe log.
pub fn read_log(path: impl AsRef<Path>, options: &LogReaderOptions) -> Result<Vec<RawSample>> {
    let path = path.as_ref();
    info!("[LogReader] Reading {:?}...", path);

    let io_err = |source| UptimeError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    let len = file.metadata().map_err(io_err)?.len();
    if len == 0 {
        return Err(UptimeError::input(format!("log {:?} is empty", path)));
    }

    // The recorder only ever appends, and it does not run while we analyze.
    let mmap = unsafe { Mmap::map(&file) }.map_err(io_err)?;
    let samples = parse_log(&mmap, options)?;

    info!("[LogReader] Loaded {} samples from {:?}", samples.len(), path);
    Ok(samples)
}

/// Decodes log bytes, gunzipping them first when they carry the gzip magic.
///
/// The recorder appends one gzip member per probe, so every member is decoded
/// and concatenated.
pub fn parse_log(bytes: &[u8], options: &LogReaderOptions) -> Result<Vec<RawSample>> {
    if bytes.starts_with(&GZIP_MAGIC) {
        let mut text = String::new();
        MultiGzDecoder::new(bytes)
            .read_to_string(&mut text)
            .map_err(|e| UptimeError::input(format!("cannot decompress log: {}", e)))?;
        debug!("[LogReader] Decompressed {} -> {} bytes", bytes.len(), text.len());
        parse_csv(&text, options)
    } else {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| UptimeError::input(format!("log is not valid UTF-8: {}", e)))?;
        parse_csv(text, options)
    }
}

/// Extracts the timestamp column of a CSV document with a header row.
///
/// Quoted fields may span lines. Errors name the line a record starts on.
pub fn parse_csv(text: &str, options: &LogReaderOptions) -> Result<Vec<RawSample>> {
    let mut records = split_records(text)
        .into_iter()
        .filter(|(_, record)| !record.trim().is_empty());

    let Some((_, header)) = records.next() else {
        return Err(UptimeError::input("log has no header row"));
    };
    let column = split_record(header)
        .iter()
        .position(|name| name.trim() == options.column)
        .ok_or_else(|| {
            UptimeError::input(format!("log header has no '{}' column", options.column))
        })?;

    let mut counter = progress::<RawSample>("LogReader", options.progress_interval);
    let mut samples = Vec::new();
    for (line, record) in records {
        let fields = split_record(record);
        let field = fields.get(column).ok_or_else(|| {
            UptimeError::input(format!(
                "line {}: expected at least {} fields, found {}",
                line,
                column + 1,
                fields.len()
            ))
        })?;
        let datetime = parse_timestamp(field)
            .map_err(|e| UptimeError::input(format!("line {}: {}", line, e)))?;

        counter.process(&RawSample::from_datetime(&datetime), &mut |s: &RawSample| {
            samples.push(*s)
        });
    }

    Ok(samples)
}

/// Parses a probe timestamp to its wall-clock time.
///
/// Offsets are dropped rather than applied: `18:23-05:00` is minute 18:23.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .ok_or_else(|| UptimeError::input(format!("unparseable timestamp '{}'", raw)))
}

/// Cuts a CSV document into records, each with its 1-based starting line.
/// Newlines inside double quotes belong to the field.
fn split_records(text: &str) -> Vec<(usize, &str)> {
    let mut records = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    let mut line = 1;
    let mut record_line = 1;

    for (i, b) in text.bytes().enumerate() {
        match b {
            b'"' => in_quotes = !in_quotes,
            b'\n' => {
                line += 1;
                if !in_quotes {
                    records.push((record_line, &text[start..i]));
                    start = i + 1;
                    record_line = line;
                }
            }
            _ => {}
        }
    }
    if start < text.len() {
        records.push((record_line, &text[start..]));
    }
    records
}

/// Splits one CSV record. Double-quoted fields may contain commas and `""` escapes.
fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.trim_end_matches('\r').chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}
