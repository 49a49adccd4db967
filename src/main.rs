use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use settlement_map::{
    logging, Catalog, CatalogLoader, Coord, GenerationReport, SessionBuilder, SessionSettings,
    SettlementCellMap, SettlementKind,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Procedural settlement map generator")]
struct Cli {
    /// Settlement kind: village, town or city
    #[arg(long, value_enum, default_value = "village")]
    kind: SettlementKind,

    /// Master seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Path to a settlement catalog YAML file (built-in catalog when omitted)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Number of settlements to generate in a row
    #[arg(long, default_value_t = 1)]
    count: u32,

    /// Print a character grid of each settlement
    #[arg(long)]
    preview: bool,

    /// Print generation reports as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging for the generator
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let catalog = match &cli.catalog {
        Some(path) => CatalogLoader::new(".").load(path)?,
        None => Catalog::builtin(),
    };
    let mut session = SessionBuilder::new(SessionSettings { seed: cli.seed })
        .with_catalog(catalog)
        .build();

    for _ in 0..cli.count {
        let report = session.generate(cli.kind)?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(&report);
        }
        if cli.preview {
            if let Some(map) = session.map() {
                print_preview(map, &report);
            }
        }
    }
    Ok(())
}

fn print_report(report: &GenerationReport) {
    println!(
        "{} ({}), {}x{} grid, seed {}",
        report.name, report.kind, report.grid_size, report.grid_size, report.seed
    );
    println!(
        "  footprint: {} of {} target cells",
        report.footprint_cells, report.target_cells
    );
    for (district, cells) in &report.districts {
        println!("  {district:<20} {cells:>4}");
    }
    if !report.skipped.is_empty() {
        println!("  skipped (no room left): {}", report.skipped.join(", "));
    }
}

fn print_preview(map: &SettlementCellMap, report: &GenerationReport) {
    let symbols: Vec<(char, &String)> = ('A'..='Z').zip(report.districts.keys()).collect();
    for y in 0..map.grid_size() {
        let row: String = (0..map.grid_size())
            .map(|x| {
                map.get(Coord::new(x, y))
                    .and_then(|cell| {
                        symbols
                            .iter()
                            .find(|(_, name)| **name == cell.district)
                            .map(|(symbol, _)| *symbol)
                    })
                    .unwrap_or('.')
            })
            .collect();
        println!("  {row}");
    }
    for (symbol, name) in &symbols {
        println!("  {symbol} = {name}");
    }
    println!();
}
