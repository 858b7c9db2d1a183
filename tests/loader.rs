//! Loading analysis results from local files and over HTTP.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use arrow::array::{ArrayRef, DictionaryArray, Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Int32Type, Schema};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use parquet::arrow::arrow_writer::ArrowWriterOptions;
use parquet::arrow::ArrowWriter;
use parquet::file::metadata::KeyValue;
use parquet::file::properties::WriterProperties;
use reqwest::blocking::Client;
use tempfile::TempDir;

use dfrc_explorer::data::loader::{self, LoadError};
use dfrc_explorer::data::{ColumnKind, Dataset, Value};
use dfrc_explorer::link::format_link;

// =============================================================================
// Fixtures
// =============================================================================

fn analysis_batch() -> RecordBatch {
    let white: DictionaryArray<Int32Type> =
        vec!["rnbqkbnr", "bnrqkbnr", "rnbqkbnr"].into_iter().collect();
    let black: DictionaryArray<Int32Type> =
        vec!["rnbqkbnr", "rkbnqbrn", "qrkbbnnr"].into_iter().collect();
    let dict = DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8));

    let schema = Arc::new(Schema::new(vec![
        Field::new("white", dict.clone(), false),
        Field::new("black", dict, false),
        Field::new("dfrc_id", DataType::Int64, false),
        Field::new("sharpness", DataType::Float64, true),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(white),
        Arc::new(black),
        Arc::new(Int64Array::from(vec![518, 42, 7])),
        Arc::new(Float64Array::from(vec![Some(0.25), None, Some(0.9)])),
    ];
    RecordBatch::try_new(schema, columns).unwrap()
}

fn write_parquet(path: &Path, batch: &RecordBatch, options: ArrowWriterOptions) {
    let file = std::fs::File::create(path).unwrap();
    let mut writer = ArrowWriter::try_new_with_options(file, batch.schema(), options).unwrap();
    writer.write(batch).unwrap();
    writer.close().unwrap();
}

/// A valid Parquet file whose embedded Arrow schema cannot be decoded.
fn write_with_corrupt_arrow_schema(path: &Path, batch: &RecordBatch) {
    let props = WriterProperties::builder()
        .set_key_value_metadata(Some(vec![KeyValue::new(
            "ARROW:schema".to_string(),
            "%%% not an arrow schema %%%".to_string(),
        )]))
        .build();
    let options = ArrowWriterOptions::new()
        .with_properties(props)
        .with_skip_arrow_metadata(true);
    write_parquet(path, batch, options);
}

struct Fixture {
    _dir: TempDir,
    clean: PathBuf,
    corrupt: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let clean = dir.path().join("analysis_results.parquet");
        let corrupt = dir.path().join("corrupt_metadata.parquet");

        let batch = analysis_batch();
        write_parquet(&clean, &batch, ArrowWriterOptions::new());
        write_with_corrupt_arrow_schema(&corrupt, &batch);

        Self {
            _dir: dir,
            clean,
            corrupt,
        }
    }
}

/// Serve `body` with `status` to every request, counting requests.
fn serve(status: &'static str, body: Vec<u8>) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/analysis_results.parquet", listener.local_addr().unwrap());
    let hits = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).is_ok_and(|n| n > 0) && line != "\r\n" {
                line.clear();
            }
            counter.fetch_add(1, Ordering::SeqCst);

            let head = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(&body);
        }
    });

    (url, hits)
}

fn client() -> Client {
    Client::builder().no_proxy().build().unwrap()
}

// =============================================================================
// Local files
// =============================================================================

#[test]
fn local_file_keeps_rows_and_columns() {
    let fixture = Fixture::new();
    let dataset = loader::load(fixture.clean.to_str().unwrap()).unwrap();

    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset.column_names(), ["white", "black", "dfrc_id", "sharpness"]);
    assert_eq!(dataset.column("white").unwrap().kind, ColumnKind::Text);
    assert_eq!(dataset.column("dfrc_id").unwrap().kind, ColumnKind::Integer);
    assert_eq!(dataset.column("sharpness").unwrap().values[1], Value::Null);

    let row = dataset.row(1).unwrap();
    assert_eq!(row.white(), Some("bnrqkbnr"));
    assert_eq!(row.black(), Some("rkbnqbrn"));
    assert_eq!(row.dfrc_id().as_deref(), Some("42"));
}

#[test]
fn both_backends_agree_on_a_clean_file() {
    let fixture = Fixture::new();
    let direct = loader::read_direct(&fixture.clean).unwrap();
    let bytes = Bytes::from(std::fs::read(&fixture.clean).unwrap());
    let buffered = loader::read_buffered(bytes).unwrap();
    assert_eq!(direct, buffered);
}

#[test]
fn corrupt_arrow_metadata_falls_back_to_buffered_read() {
    let fixture = Fixture::new();

    assert!(loader::read_direct(&fixture.corrupt).is_err());

    let recovered = loader::load(fixture.corrupt.to_str().unwrap()).unwrap();
    let reference = loader::load(fixture.clean.to_str().unwrap()).unwrap();
    assert_eq!(recovered, reference);
}

#[test]
fn unreadable_file_reports_decode_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.parquet");
    std::fs::write(&path, b"PAR1 but not really").unwrap();

    let err = loader::load(path.to_str().unwrap()).unwrap_err();
    assert!(matches!(err, LoadError::Decode { .. }), "{err}");
}

#[test]
fn each_load_rereads_the_source() {
    let fixture = Fixture::new();
    let location = fixture.clean.to_str().unwrap().to_string();
    let first = loader::load(&location).unwrap();

    std::fs::write(&fixture.clean, b"replaced").unwrap();
    assert!(loader::load(&location).is_err());
    assert_eq!(first.len(), 3);
}

// =============================================================================
// HTTP
// =============================================================================

#[test]
fn remote_file_is_fetched_once_and_matches_local() {
    let fixture = Fixture::new();
    let body = std::fs::read(&fixture.clean).unwrap();
    let (url, hits) = serve("200 OK", body);

    let remote = loader::load_url_with(&client(), &url).unwrap();
    let local: Dataset = loader::load(fixture.clean.to_str().unwrap()).unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(remote, local);
}

#[test]
fn http_error_status_is_fatal() {
    let (url, hits) = serve("404 Not Found", b"missing".to_vec());

    let err = loader::load_url_with(&client(), &url).unwrap_err();
    assert!(matches!(err, LoadError::Fetch { .. }), "{err}");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn remote_garbage_is_not_retried() {
    let (url, hits) = serve("200 OK", b"definitely not parquet".to_vec());

    let err = loader::load_url_with(&client(), &url).unwrap_err();
    assert!(matches!(err, LoadError::Decode { .. }), "{err}");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

// =============================================================================
// Loaded data drives the analysis link
// =============================================================================

#[test]
fn loaded_row_formats_link() {
    let fixture = Fixture::new();
    let dataset = loader::load(fixture.clean.to_str().unwrap()).unwrap();

    let link = format_link(dataset.row(1));
    assert_eq!(link.dfrc_id, "42");
    assert!(link.url.contains("BNRQKBNR"));
    assert!(link.url.contains("rkbnqbrn"));
}
