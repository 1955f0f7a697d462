use crate::catalog::{Category, Dataset, QueryCatalog};
use crate::core::complexity::estimate_complexity;
use clap::Args;
use colored::*;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};

#[derive(Args)]
pub struct QueriesArgs {
    /// Dataset (LUBM, BSBM, DBpedia, YAGO, Custom)
    #[arg(short, long, default_value = "LUBM")]
    pub dataset: Dataset,

    /// Restrict to one category
    #[arg(short = 't', long)]
    pub category: Option<Category>,

    /// Print the full query text
    #[arg(long)]
    pub show: bool,
}

pub fn run(args: QueriesArgs) -> anyhow::Result<()> {
    let catalog = QueryCatalog::new();
    let queries = match args.category {
        Some(category) => catalog.queries_for(args.dataset, category),
        None => catalog.all_queries(args.dataset),
    };

    if args.show {
        for (name, query) in &queries {
            println!("{}", format!("# {}", name).bold());
            println!("{}\n", query);
        }
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            ["Query", "Complexity", "Score", "Estimated time"]
                .into_iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );

    for (name, query) in &queries {
        let estimate = estimate_complexity(query);
        table.add_row(vec![
            Cell::new(name),
            Cell::new(estimate.level),
            Cell::new(estimate.score),
            Cell::new(estimate.estimated_time),
        ]);
    }

    println!("{} queries for {}", queries.len(), args.dataset.to_string().bold());
    println!("{}", table);
    Ok(())
}
