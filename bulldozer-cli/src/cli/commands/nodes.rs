use anyhow::Result;
use colored::*;

use crate::cli::{NodesCommand, apply_overrides, require_session};
use crate::config::Config;
use crate::tui::widgets::display_width;

pub fn handle_nodes_command(args: NodesCommand, mut config: Config) -> Result<()> {
    apply_overrides(&mut config, &args.source, None)?;
    let session = require_session(&config)?;
    let nodes = session.data_nodes.list();

    if nodes.is_empty() {
        println!("{}", "No data sources found".yellow());
        return Ok(());
    }

    let id_width = nodes.iter().map(|n| display_width(&n.id)).max().unwrap_or(0);
    for node in nodes {
        let pad = id_width - display_width(&node.id);
        println!("{}{}  {}", node.id.cyan(), " ".repeat(pad), node.label);
    }
    println!();
    println!("{} data sources", nodes.len().to_string().bold());
    Ok(())
}
