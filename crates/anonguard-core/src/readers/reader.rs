//! CSV reader.
//!
//! Every column is read as nullable text; typing happens afterwards, in the
//! table layer. Small files are read in one pass, large ones are split at
//! line boundaries and the chunks parsed on the rayon pool. Batches come
//! back in file order either way.
//!
//! Chunk splitting looks for raw newlines, so files with quoted multi-line
//! fields must stay under the parallel threshold.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;

use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder as CsvReaderBuilder;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use rayon::prelude::*;
use tracing::debug;

use crate::readers::config::{calculate_chunk_size, ReaderConfig};

fn invalid_data(e: arrow::error::ArrowError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e)
}

/// Text schema built from the CSV header.
pub fn csv_schema(path: &Path) -> Result<Schema, io::Error> {
    let file = File::open(path)?;
    let (inferred, _) = Format::default()
        .with_header(true)
        .infer_schema(file, Some(0))
        .map_err(invalid_data)?;

    if inferred.fields().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "CSV file is empty",
        ));
    }
    let fields: Vec<Field> = inferred
        .fields()
        .iter()
        .map(|f| Field::new(f.name().trim(), DataType::Utf8, true))
        .collect();
    Ok(Schema::new(fields))
}

fn collect_batches(
    reader: impl Iterator<Item = Result<RecordBatch, arrow::error::ArrowError>>,
) -> Result<Vec<RecordBatch>, io::Error> {
    reader
        .map(|batch| batch.map_err(invalid_data))
        .collect()
}

/// Split the data section into `(start, end)` byte ranges ending on a newline.
fn create_chunks(
    path: &Path,
    header_len: u64,
    file_size: u64,
    chunk_size: u64,
) -> Result<Vec<(u64, u64)>, io::Error> {
    let mut file = File::open(path)?;
    let mut chunks = Vec::new();
    let mut current = header_len;

    while current < file_size {
        let target_end = (current + chunk_size).min(file_size);
        let actual_end = if target_end >= file_size {
            file_size
        } else {
            find_next_newline(&mut file, target_end)?
        };
        chunks.push((current, actual_end));
        current = actual_end;
    }

    Ok(chunks)
}

fn find_next_newline(file: &mut File, pos: u64) -> Result<u64, io::Error> {
    file.seek(SeekFrom::Start(pos))?;
    let mut reader = BufReader::new(file.try_clone()?);
    let mut buffer = Vec::new();
    reader.read_until(b'\n', &mut buffer)?;
    Ok(pos + buffer.len() as u64)
}

fn parse_chunk(
    path: &Path,
    schema: &SchemaRef,
    batch_size: usize,
    header: &str,
    start: u64,
    end: u64,
) -> Result<Vec<RecordBatch>, io::Error> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::Start(start))?;

    let mut buffer = Vec::with_capacity((end - start) as usize + header.len());
    buffer.extend_from_slice(header.as_bytes());
    file.take(end - start).read_to_end(&mut buffer)?;

    let reader = CsvReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_batch_size(batch_size)
        .build(io::Cursor::new(buffer))
        .map_err(invalid_data)?;
    collect_batches(reader)
}

/// Read the whole file on the current thread.
pub fn read_sequential(
    path: &Path,
    config: &ReaderConfig,
) -> Result<(SchemaRef, Vec<RecordBatch>), io::Error> {
    let schema = Arc::new(csv_schema(path)?);
    let file = File::open(path)?;
    let reader = CsvReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_batch_size(config.batch_size as usize)
        .build(file)
        .map_err(invalid_data)?;
    Ok((schema, collect_batches(reader)?))
}

/// Read the file as line-aligned chunks parsed in parallel.
pub fn read_parallel(
    path: &Path,
    config: &ReaderConfig,
) -> Result<(SchemaRef, Vec<RecordBatch>), io::Error> {
    let schema = Arc::new(csv_schema(path)?);
    let file_size = File::open(path)?.metadata()?.len();

    let mut header = String::new();
    BufReader::new(File::open(path)?).read_line(&mut header)?;
    let header_len = header.len() as u64;

    let num_threads = rayon::current_num_threads();
    let chunk_size = calculate_chunk_size(file_size, header_len, num_threads, config);
    let chunks = create_chunks(path, header_len, file_size, chunk_size)?;
    debug!(chunks = chunks.len(), chunk_size, "reading CSV in parallel");

    let batches = chunks
        .into_par_iter()
        .map(|(start, end)| {
            parse_chunk(
                path,
                &schema,
                config.batch_size as usize,
                &header,
                start,
                end,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((schema, batches.into_iter().flatten().collect()))
}

/// Read a CSV file, choosing the mode from its size.
pub fn read_csv(
    path: &Path,
    config: &ReaderConfig,
) -> Result<(SchemaRef, Vec<RecordBatch>), io::Error> {
    let file_size = File::open(path)?.metadata()?.len();
    if config.should_parallelize(file_size) {
        read_parallel(path, config)
    } else {
        read_sequential(path, config)
    }
}
