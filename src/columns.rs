//! The `columns` command: show where each input header lands in the output
//! schema, without touching row data.
//!
//! Renders one line per output column with its position, the source header
//! it came from (blank for injected columns), and the output name.

use anyhow::{Context, Result};
use log::info;

use crate::{cli::ColumnsArgs, io_utils, preview, profile::Profile, transform::Transformer};

/// Columns prepended by the injection stage, before the Variants splice.
const PREPENDED_COLUMNS: usize = 3;

pub fn execute(args: &ColumnsArgs) -> Result<()> {
    let delimiter = io_utils::resolve_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let profile = Profile::load_or_default(args.profile.as_deref())?;
    let transformer = Transformer::new(profile)?;

    let grid = io_utils::read_grid(&args.input, delimiter, encoding)
        .with_context(|| format!("Reading {:?}", args.input))?;
    let source_headers = grid.headers.clone();

    let rewritten = transformer.rewrite_headers(grid);
    let rewritten_headers = rewritten.headers.clone();
    let injected = transformer.inject_columns(rewritten)?;

    let pairs = pair_columns(&source_headers, &rewritten_headers, &injected.headers);
    let mut rows = Vec::with_capacity(pairs.len());
    for (idx, (source, output_name)) in pairs.into_iter().enumerate() {
        rows.push(vec![(idx + 1).to_string(), source, output_name]);
    }

    let headers = vec!["#".to_string(), "source".to_string(), "output".to_string()];
    preview::print_table(&headers, &rows);
    info!(
        "Mapped {} source column(s) to {} output column(s)",
        source_headers.len(),
        rows.len()
    );
    Ok(())
}

/// Pairs each output header with the source header it came from, purely by
/// position: the rewrite stage is a 1:1 positional substitution, and the
/// injection stage prepends three columns and splices one in. Injected
/// columns get an empty source. Pairing by name would misattribute a source
/// whenever a profile's rewrite target collides with an injected column
/// name.
fn pair_columns(
    source: &[String],
    rewritten: &[String],
    output: &[String],
) -> Vec<(String, String)> {
    // The splice position is the first place the output diverges from the
    // rewritten headers shifted by the prepend.
    let mut spliced_idx = output.len().saturating_sub(1);
    for idx in PREPENDED_COLUMNS..output.len() {
        if rewritten.get(idx - PREPENDED_COLUMNS) != Some(&output[idx]) {
            spliced_idx = idx;
            break;
        }
    }

    output
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let origin = if idx < PREPENDED_COLUMNS || idx == spliced_idx {
                String::new()
            } else if idx < spliced_idx {
                source[idx - PREPENDED_COLUMNS].clone()
            } else {
                source[idx - PREPENDED_COLUMNS - 1].clone()
            };
            (origin, name.clone())
        })
        .collect()
}
