//! The Shopify-to-Spree schema transform.
//!
//! Four stages run in a fixed order over a fully materialized [`Grid`]:
//!
//! 1. **Header rewrite** — source headers matching a profile rule (exact or
//!    regex) are replaced by their Spree names.
//! 2. **Column injection** — `SKU`, `Shipping Category`, and `Price` are
//!    prepended and a `Variants` column is inserted before `variant_sku`,
//!    with row cells kept in lockstep.
//! 3. **Taxon normalization** — comma-delimited Shopify tags become the
//!    pipe-delimited taxon list Spree expects.
//! 4. **Variant merge** — Shopify exports one row per variant, sharing the
//!    product's Handle and leaving Published blank; those rows are folded
//!    into the product's master row so the output carries one row per
//!    product with aggregated `Variants`, `variant_sku`, `variant_price`,
//!    and `stock_items` cells.
//!
//! Stage 2 must finish before anything reads row data positionally: column
//! lookups go by name against the current headers, and a lookup taken
//! mid-insertion would be stale.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use itertools::Itertools;
use log::{debug, warn};
use regex::Regex;

use crate::{
    grid::{Grid, is_blank},
    profile::Profile,
};

/// Shopify spreads product options over numbered column pairs
/// (`Option1 Name` / `Option1 Value`, ...). Discovery is driven by which
/// headers actually match, so numbering gaps are tolerated.
const OPTION_NAME_PATTERN: &str = r"Option(\d+) Name";

#[derive(Debug)]
struct CompiledRule {
    pattern: String,
    regex: Regex,
    target: String,
}

#[derive(Debug)]
pub struct Transformer {
    profile: Profile,
    rules: Vec<CompiledRule>,
    option_name: Regex,
}

impl Transformer {
    pub fn new(profile: Profile) -> Result<Self> {
        let rules = profile
            .mappings
            .iter()
            .map(|rule| {
                let regex = Regex::new(&rule.pattern)
                    .with_context(|| format!("Compiling header rule pattern '{}'", rule.pattern))?;
                Ok(CompiledRule {
                    pattern: rule.pattern.clone(),
                    regex,
                    target: rule.target.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let option_name =
            Regex::new(OPTION_NAME_PATTERN).context("Compiling option name pattern")?;
        Ok(Self {
            profile,
            rules,
            option_name,
        })
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Runs the whole pipeline, failing fast on shape or column problems
    /// before any row data is touched.
    pub fn apply(&self, grid: Grid) -> Result<Grid> {
        grid.ensure_rectangular()?;
        let grid = self.rewrite_headers(grid);
        debug!("Rewritten headers: {:?}", grid.headers);
        let grid = self.inject_columns(grid)?;
        let grid = self.normalize_taxons(grid)?;
        self.merge_variants(grid)
    }

    /// Replaces each header matching a profile rule with its target name.
    /// Rules are tried in declaration order; the first match wins and
    /// unmatched headers pass through untouched. Pure positional
    /// substitution: order and count are preserved.
    pub fn rewrite_headers(&self, mut grid: Grid) -> Grid {
        for header in &mut grid.headers {
            let matched = self
                .rules
                .iter()
                .find(|rule| rule.pattern == *header || rule.regex.is_match(header));
            if let Some(rule) = matched {
                *header = rule.target.clone();
            }
        }
        grid
    }

    /// Prepends the `SKU`, `Shipping Category`, and `Price` columns and
    /// inserts the `Variants` column immediately before `variant_sku`.
    ///
    /// The `Variants` index is captured once after the prepend and reused
    /// for every row so headers and rows cannot drift apart. No stage may
    /// read positional row data until this returns.
    pub fn inject_columns(&self, grid: Grid) -> Result<Grid> {
        let cols = &self.profile.columns;
        let Grid { headers, rows } = grid;

        let mut new_headers = Vec::with_capacity(headers.len() + 4);
        new_headers.push(cols.sku.clone());
        new_headers.push(cols.shipping_category.clone());
        new_headers.push(cols.price.clone());
        new_headers.extend(headers);

        let mut grid = Grid::new(new_headers, Vec::new());
        let variants_idx = grid.require_column(&cols.variant_sku)?;
        grid.headers.insert(variants_idx, cols.variants.clone());

        grid.rows = rows
            .into_iter()
            .map(|row| {
                let mut out = Vec::with_capacity(row.len() + 4);
                out.push(String::new());
                out.push(self.profile.default_shipping_category.clone());
                out.push(String::new());
                out.extend(row);
                out.insert(variants_idx, String::new());
                out
            })
            .collect();
        Ok(grid)
    }

    /// Shopify tags are comma-delimited; Spree taxons are pipe-delimited.
    pub fn normalize_taxons(&self, mut grid: Grid) -> Result<Grid> {
        let taxons_idx = grid.require_column(&self.profile.columns.taxons)?;
        for row in &mut grid.rows {
            let cell = &mut row[taxons_idx];
            if cell.contains(',') {
                *cell = cell.replace(',', "|");
            }
        }
        Ok(grid)
    }

    /// Folds variant rows into their master rows, leaving one row per
    /// product. Within the `Variants` cell, `;` separates options of one
    /// entry (emitted only for option numbers above 1) and `|` precedes
    /// each variant entry's first option.
    pub fn merge_variants(&self, grid: Grid) -> Result<Grid> {
        let cols = &self.profile.columns;
        let published_idx = grid.require_column(&cols.published)?;
        let handle_idx = grid.require_column(&cols.handle)?;
        let sku_idx = grid.require_column(&cols.sku)?;
        let price_idx = grid.require_column(&cols.price)?;
        let variants_idx = grid.require_column(&cols.variants)?;
        let variant_sku_idx = grid.require_column(&cols.variant_sku)?;
        let variant_price_idx = grid.require_column(&cols.variant_price)?;
        let stock_idx = grid.require_column(&cols.stock_items)?;

        let option_columns = self.discover_option_columns(&grid.headers);
        if !option_columns.is_empty() {
            debug!(
                "Discovered option column(s) at header position(s) {}",
                option_columns.iter().map(|(idx, _)| idx).join(", ")
            );
        }

        let Grid { headers, rows } = grid;
        let (mut variant_pool, masters): (Vec<_>, Vec<_>) = rows
            .into_iter()
            .partition(|row| is_blank(&row[published_idx]));

        let mut merged = Vec::with_capacity(masters.len());
        for mut row in masters {
            // Claim this product's variants; claimed rows leave the pool so
            // a later row with a duplicate handle cannot re-merge them.
            let (mut mine, rest): (Vec<_>, Vec<_>) = variant_pool
                .into_iter()
                .partition(|v| v[handle_idx] == row[handle_idx]);
            variant_pool = rest;

            let mut master_sku = row[variant_sku_idx].clone();
            if !mine.is_empty() {
                master_sku = truncate_chars(&master_sku, self.profile.sku_prefix_len);
            }
            row[sku_idx] = master_sku;
            row[price_idx] = row[variant_price_idx].clone();
            row[stock_idx] = format!(
                "{}:{}",
                self.profile.default_inventory_label, row[stock_idx]
            );

            let mut variants_str = String::new();
            for &(name_idx, number) in &option_columns {
                if is_blank(&row[name_idx]) {
                    continue;
                }
                // Variant rows usually leave the option name blank; they
                // inherit the master's so their value still gets a token.
                for variant in &mut mine {
                    variant[name_idx] = row[name_idx].clone();
                }
                if number > 1 {
                    variants_str.push(';');
                }
                let _ = write!(
                    variants_str,
                    "{}:{}",
                    row[name_idx],
                    cell_or_empty(&row, name_idx + 1)
                );
            }

            // A lone product has no multi-SKU listing.
            if mine.is_empty() {
                row[variant_sku_idx].clear();
            }

            for variant in &mine {
                for &(name_idx, number) in &option_columns {
                    if is_blank(&variant[name_idx]) {
                        continue;
                    }
                    if number == 1 {
                        variants_str.push('|');
                    }
                    if number > 1 {
                        variants_str.push(';');
                    }
                    let _ = write!(
                        variants_str,
                        "{}:{}",
                        variant[name_idx],
                        cell_or_empty(variant, name_idx + 1)
                    );
                }

                let _ = write!(row[variant_sku_idx], "|{}", variant[variant_sku_idx]);
                let _ = write!(row[variant_price_idx], "|{}", variant[variant_price_idx]);
                let _ = write!(
                    row[stock_idx],
                    "|{}:{}",
                    self.profile.default_inventory_label, variant[stock_idx]
                );
            }

            row[variants_idx] = variants_str;
            merged.push(row);
        }

        if !variant_pool.is_empty() {
            warn!(
                "Discarding {} variant row(s) whose Handle matched no master row",
                variant_pool.len()
            );
        }

        Ok(Grid::new(headers, merged))
    }

    /// Header positions of `OptionN Name` columns, paired with `N`, in
    /// header order. The value column is the one immediately following.
    fn discover_option_columns(&self, headers: &[String]) -> Vec<(usize, u32)> {
        headers
            .iter()
            .enumerate()
            .filter_map(|(idx, header)| {
                self.option_name
                    .captures(header)
                    .and_then(|captures| captures[1].parse::<u32>().ok())
                    .map(|number| (idx, number))
            })
            .collect()
    }
}

fn cell_or_empty(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

fn truncate_chars(value: &str, len: usize) -> String {
    value.chars().take(len).collect()
}
