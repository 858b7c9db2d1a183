use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use arrow::error::ArrowError;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use bytes::Bytes;
use parquet::arrow::arrow_reader::{ArrowReaderOptions, ParquetRecordBatchReaderBuilder};
use parquet::errors::ParquetError;
use parquet::file::reader::ChunkReader;
use reqwest::blocking::Client;

use super::model::{Column, ColumnKind, Dataset, Value};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure to decode Parquet bytes into a [`Dataset`].
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("parquet: {0}")]
    Parquet(#[from] ParquetError),

    #[error("arrow: {0}")]
    Arrow(#[from] ArrowError),

    #[error("record batches disagree on column lengths")]
    RaggedColumns,
}

/// Every applicable strategy for obtaining the dataset failed.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Network failure or non-success HTTP status.
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The local file could not be opened or read.
    #[error("failed to read {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// The bytes were obtained but are not a readable Parquet table.
    #[error("failed to decode {location}: {source}")]
    Decode {
        location: String,
        #[source]
        source: DecodeError,
    },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Whether `location` should be fetched over HTTP rather than read from disk.
pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Load an analysis dataset from a local path or an HTTP(S) URL.
///
/// Resolution order:
/// * URL  – fetch the whole body, decode it in memory. No fallback.
/// * path – decode the file directly; if that fails for any reason,
///   read it into memory and decode with the buffered backend.
///
/// Nothing is cached: every call re-reads the source.
pub fn load(location: &str) -> Result<Dataset, LoadError> {
    if is_remote(location) {
        return load_url(location);
    }
    load_path(Path::new(location))
}

/// Fetch a remote Parquet file with a single blocking request.
pub fn load_url(url: &str) -> Result<Dataset, LoadError> {
    let client = Client::builder()
        .build()
        .map_err(|source| LoadError::Fetch {
            url: url.to_string(),
            source,
        })?;
    load_url_with(&client, url)
}

/// [`load_url`] through a caller-configured HTTP client.
pub fn load_url_with(client: &Client, url: &str) -> Result<Dataset, LoadError> {
    log::debug!("fetching dataset from {url}");
    let body = fetch(client, url)?;
    log::debug!("fetched {} bytes from {url}", body.len());
    read_buffered(body).map_err(|source| LoadError::Decode {
        location: url.to_string(),
        source,
    })
}

/// Read a local Parquet file, falling back to the buffered backend.
pub fn load_path(path: &Path) -> Result<Dataset, LoadError> {
    let location = path.display().to_string();

    let direct_err = match read_direct(path) {
        Ok(dataset) => return Ok(dataset),
        Err(e) => e,
    };
    log::warn!("direct read of {location} failed ({direct_err}), retrying from memory");

    let contents = std::fs::read(path).map_err(|source| LoadError::Io {
        location: location.clone(),
        source,
    })?;
    read_buffered(Bytes::from(contents)).map_err(|source| LoadError::Decode { location, source })
}

fn fetch(client: &Client, url: &str) -> Result<Bytes, LoadError> {
    let wrap = |source| LoadError::Fetch {
        url: url.to_string(),
        source,
    };
    let response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(wrap)?;
    response.bytes().map_err(wrap)
}

// ---------------------------------------------------------------------------
// Decoding backends
// ---------------------------------------------------------------------------

/// Primary backend: stream record batches from the open file, trusting the
/// Arrow schema embedded in the file metadata.
pub fn read_direct(path: &Path) -> Result<Dataset, DirectReadError> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(DecodeError::from)?;
    Ok(decode(builder)?)
}

/// Alternate backend: decode an in-memory buffer, deriving the Arrow schema
/// from the Parquet schema alone (`ARROW:schema` metadata is ignored).
///
/// Tolerates files whose embedded Arrow schema is missing, corrupt, or uses
/// encodings the writer's Arrow version understood but ours does not.
pub fn read_buffered(bytes: Bytes) -> Result<Dataset, DecodeError> {
    let options = ArrowReaderOptions::new().with_skip_arrow_metadata(true);
    let builder = ParquetRecordBatchReaderBuilder::try_new_with_options(bytes, options)?;
    decode(builder)
}

/// Failure of [`read_direct`]; either the file could not be opened or its
/// contents could not be decoded.
#[derive(Debug, thiserror::Error)]
pub enum DirectReadError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Decode(#[from] DecodeError),
}

fn decode<T: ChunkReader + 'static>(
    builder: ParquetRecordBatchReaderBuilder<T>,
) -> Result<Dataset, DecodeError> {
    let mut columns: Vec<Column> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| Column::new(f.name().clone(), column_kind(f.data_type())))
        .collect();

    let reader = builder.build()?;
    for batch in reader {
        let batch = batch?;
        for (column, array) in columns.iter_mut().zip(batch.columns()) {
            append_values(column, array)?;
        }
    }

    Dataset::from_columns(columns).ok_or(DecodeError::RaggedColumns)
}

// -- Arrow helpers --

/// Normalise an Arrow data type to the logical kind shown in the table.
fn column_kind(data_type: &DataType) -> ColumnKind {
    match data_type {
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => ColumnKind::Text,
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => ColumnKind::Integer,
        DataType::Float16 | DataType::Float32 | DataType::Float64 => ColumnKind::Float,
        DataType::Boolean => ColumnKind::Bool,
        DataType::Dictionary(_, values) => column_kind(values),
        _ => ColumnKind::Other,
    }
}

/// Append every cell of `array` to `column`, casting to the column's
/// canonical Arrow type first so dictionary and large encodings collapse.
fn append_values(column: &mut Column, array: &ArrayRef) -> Result<(), ArrowError> {
    let values = &mut column.values;
    values.reserve(array.len());

    match column.kind {
        ColumnKind::Text => {
            let strings = cast(array, &DataType::Utf8)?;
            values.extend(
                strings
                    .as_string::<i32>()
                    .iter()
                    .map(|v| v.map_or(Value::Null, |s| Value::Text(s.to_string()))),
            );
        }
        ColumnKind::Integer => {
            let cast_ints = cast(array, &DataType::Int64)?;
            let ints = cast_ints.as_primitive::<Int64Type>();
            let nulls = array.logical_nulls();
            // Unsigned values above i64::MAX cast to null; keep their digits instead.
            let options = FormatOptions::default();
            let formatter = ArrayFormatter::try_new(array.as_ref(), &options)?;
            values.extend((0..array.len()).map(|row| {
                if nulls.as_ref().is_some_and(|n| n.is_null(row)) {
                    Value::Null
                } else if ints.is_valid(row) {
                    Value::Integer(ints.value(row))
                } else {
                    Value::Text(formatter.value(row).to_string())
                }
            }));
        }
        ColumnKind::Float => {
            let floats = cast(array, &DataType::Float64)?;
            values.extend(
                floats
                    .as_primitive::<Float64Type>()
                    .iter()
                    .map(|v| v.map_or(Value::Null, Value::Float)),
            );
        }
        ColumnKind::Bool => {
            let bools = cast(array, &DataType::Boolean)?;
            values.extend(
                bools
                    .as_boolean()
                    .iter()
                    .map(|v| v.map_or(Value::Null, Value::Bool)),
            );
        }
        ColumnKind::Other => {
            let options = FormatOptions::default();
            let formatter = ArrayFormatter::try_new(array.as_ref(), &options)?;
            for row in 0..array.len() {
                if array.is_null(row) {
                    values.push(Value::Null);
                } else {
                    values.push(Value::Text(formatter.value(row).to_string()));
                }
            }
        }
    }
    Ok(())
}
