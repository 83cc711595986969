//! CSV reading and writing for the command layer.
//!
//! Delimiters resolve from the file extension (`.csv` comma, `.tsv` tab)
//! unless overridden, input bytes decode through `encoding_rs` (UTF-8 by
//! default), and the `-` path convention routes through stdin/stdout.
//! Output is always UTF-8 with every field quoted, so merged cells holding
//! `|` and `;` separators survive a round trip through other CSV tools.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use csv::QuoteStyle;
use encoding_rs::{Encoding, UTF_8};

use crate::grid::Grid;

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    match label {
        Some(value) => Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'")),
        None => Ok(UTF_8),
    }
}

pub fn resolve_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

/// Reads the whole input into a [`Grid`]. The transform needs the table
/// fully materialized before merging, so there is no streaming variant.
pub fn read_grid(path: &Path, delimiter: u8, encoding: &'static Encoding) -> Result<Grid> {
    let reader: Box<dyn Read> = if is_dash(path) {
        Box::new(std::io::stdin().lock())
    } else {
        Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Opening input file {path:?}"))?,
        ))
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(false)
        .from_reader(reader);

    let headers = decode_record(&reader.byte_headers()?.clone(), encoding)
        .with_context(|| format!("Decoding headers of {path:?}"))?;

    let mut rows = Vec::new();
    for (idx, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Reading row {} of {path:?}", idx + 1))?;
        let row = decode_record(&record, encoding)
            .with_context(|| format!("Decoding row {} of {path:?}", idx + 1))?;
        rows.push(row);
    }
    Ok(Grid::new(headers, rows))
}

/// Writes a [`Grid`] to `path`, or stdout when `path` is `None` or `-`.
pub fn write_grid(grid: &Grid, path: Option<&Path>, delimiter: u8) -> Result<()> {
    let target: Box<dyn Write> = match path {
        Some(p) if !is_dash(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        )),
        _ => Box::new(std::io::stdout()),
    };
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Always)
        .double_quote(true)
        .from_writer(target);

    writer
        .write_record(&grid.headers)
        .context("Writing header row")?;
    for (idx, row) in grid.rows.iter().enumerate() {
        writer
            .write_record(row)
            .with_context(|| format!("Writing row {}", idx + 1))?;
    }
    writer.flush().context("Flushing CSV output")?;
    Ok(())
}

fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| {
            let (text, _, had_errors) = encoding.decode(field);
            if had_errors {
                Err(anyhow!(
                    "Failed to decode field with encoding {}",
                    encoding.name()
                ))
            } else {
                Ok(text.into_owned())
            }
        })
        .collect()
}
