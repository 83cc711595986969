//! The `convert` command: read a Shopify export, run the transform, emit a
//! Spree-ready CSV (or an on-screen preview).

use anyhow::{Context, Result, anyhow};
use log::info;

use crate::{
    cli::ConvertArgs,
    io_utils,
    preview,
    profile::Profile,
    transform::Transformer,
};

pub fn execute(args: &ConvertArgs) -> Result<()> {
    if args.preview && args.output.is_some() {
        return Err(anyhow!("--preview cannot be combined with --output"));
    }

    let delimiter = io_utils::resolve_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let profile = Profile::load_or_default(args.profile.as_deref())?;
    let transformer = Transformer::new(profile)?;

    let grid = io_utils::read_grid(&args.input, delimiter, encoding)
        .with_context(|| format!("Reading {:?}", args.input))?;
    info!(
        "Read {} row(s) across {} column(s) from '{}'",
        grid.row_count(),
        grid.column_count(),
        args.input.display()
    );

    let mut converted = transformer
        .apply(grid)
        .with_context(|| format!("Converting {:?}", args.input))?;
    if let Some(limit) = args.limit {
        converted.rows.truncate(limit);
    }
    info!("Merged into {} product row(s)", converted.row_count());

    if args.preview {
        preview::print_table(&converted.headers, &converted.rows);
        return Ok(());
    }

    io_utils::write_grid(&converted, args.output.as_deref(), delimiter)?;
    info!(
        "Wrote {} row(s) to {}",
        converted.row_count(),
        args.output
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "stdout".into())
    );
    Ok(())
}
