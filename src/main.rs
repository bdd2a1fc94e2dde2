//! rsql-query - compile RSQL filters against a sample car catalog and run them

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use log::info;
use rsql_query::access::EntityStore;
use rsql_query::config::QueryConfig;
use rsql_query::executor::{MemoryBackend, QueryExecutor, Row};
use rsql_query::fixtures;
use rsql_query::query::Query;
use std::sync::Arc;

/// Compile an RSQL query against the sample car catalog and run it in memory
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Root entity type
    #[arg(short, long, default_value = "Car")]
    entity: String,

    /// RSQL filter, e.g. "engine.screws.name=con='name';id=gt=3"
    #[arg(short, long)]
    filter: Option<String>,

    /// Top-level fields to project, e.g. "(name,description)"
    #[arg(short, long)]
    select: Option<String>,

    /// Ordering, e.g. "(id.desc)"
    #[arg(long)]
    sort: Option<String>,

    /// Zero-based page as "(pageNumber,pageSize)"
    #[arg(short, long, conflicts_with = "limit")]
    page: Option<String>,

    /// Window as "(offset,size)"
    #[arg(short, long)]
    limit: Option<String>,

    /// chrono format used to parse date literals
    #[arg(long)]
    date_format: Option<String>,

    /// Number of sample cars to generate
    #[arg(short = 'n', long, default_value = "50")]
    rows: u64,

    /// Seed for the sample data generator
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Print the compiled query before running it
    #[arg(long)]
    explain: bool,

    /// Print rows as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let catalog = Arc::new(fixtures::catalog().context("Failed to build the sample catalog")?);
    let store = Arc::new(EntityStore::new());
    fixtures::seed_cars(&store, args.rows, args.seed);
    info!("Generated {} cars", args.rows);

    let mut config = QueryConfig::builder(catalog.clone());
    if let Some(format) = &args.date_format {
        config = config.date_format(format.clone());
    }
    let config = config.build().context("Invalid query configuration")?;

    let stage = match &args.select {
        Some(select) => Query::select(select.clone()).from(args.entity.clone()),
        None => Query::select_from(args.entity.clone()),
    };
    let mut query = stage.filter(args.filter.clone().unwrap_or_default());
    if let Some(sort) = &args.sort {
        query = query.sort(sort.clone());
    }
    if let Some(page) = &args.page {
        query = query.page_str(page.clone());
    }
    if let Some(limit) = &args.limit {
        query = query.limit_str(limit.clone());
    }
    let request = query.build(&config).context("Failed to compile query")?;

    if args.explain {
        println!("{}", request);
    }

    let backend = MemoryBackend::new(catalog, store);
    let rows = backend.fetch(&request)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let columns = backend.columns(&request)?;
    if rows.first().is_some_and(|row| row.as_record().is_none()) {
        let header: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        println!("{}", header.join(" | "));
    }
    for row in &rows {
        match row {
            Row::Record(record) => println!("{}", record),
            Row::Tuple(values) => {
                let cells: Vec<String> = values.iter().map(ToString::to_string).collect();
                println!("{}", cells.join(" | "));
            }
        }
    }
    println!("({} rows)", rows.len());

    Ok(())
}
