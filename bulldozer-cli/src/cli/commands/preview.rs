use anyhow::{Result, bail};
use colored::*;

use crate::cli::{PreviewCommand, apply_overrides, require_session};
use crate::config::Config;
use crate::preview::PreviewOutcome;
use crate::session::PreviewTable;
use crate::tui::widgets::{display_width, truncate_to_width};

const MAX_CELL_WIDTH: usize = 24;

pub fn handle_preview_command(args: PreviewCommand, mut config: Config) -> Result<()> {
    apply_overrides(&mut config, &args.source, args.rows)?;
    let session = require_session(&config)?;

    let Some(node) = session.data_nodes.get(&args.node_id) else {
        bail!(
            "Unknown data source '{}'; run `bulldozer-cli nodes` to list them",
            args.node_id
        );
    };
    println!("{}", node.label.bold());

    match PreviewOutcome::from_fetch(session.fetcher.fetch(&node.id)) {
        PreviewOutcome::Loaded(table) => {
            for line in format_table(&table, MAX_CELL_WIDTH) {
                println!("{}", line);
            }
            println!();
            println!("{}", format!("{} rows", table.row_count()).dimmed());
            Ok(())
        }
        PreviewOutcome::Empty => {
            println!("{}", "No data to preview for this source".yellow());
            Ok(())
        }
        PreviewOutcome::Failed(reason) => bail!("Preview of '{}' failed: {}", node.id, reason),
    }
}

/// Plain-text table: header, rule, rows; cells cut to `max_cell` columns
fn format_table(table: &PreviewTable, max_cell: usize) -> Vec<String> {
    let widths: Vec<usize> = (0..table.column_count())
        .map(|c| {
            (0..table.row_count())
                .map(|r| display_width(table.cell(r, c)))
                .chain(std::iter::once(display_width(&table.columns[c])))
                .max()
                .unwrap_or(0)
                .min(max_cell)
        })
        .collect();

    let format_row = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| {
                let cell = truncate_to_width(cell, w);
                let pad = w.saturating_sub(display_width(&cell));
                format!("{}{}", cell, " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(table.row_count() + 2);
    lines.push(format_row(table.columns.iter().map(String::as_str).collect()));
    lines.push(
        widths
            .iter()
            .map(|&w| "-".repeat(w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for r in 0..table.row_count() {
        lines.push(format_row((0..table.column_count()).map(|c| table.cell(r, c)).collect()));
    }
    lines
}
