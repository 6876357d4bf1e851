//! reading-runner: headless runner for the arcana reading core.
//!
//! Usage:
//!   reading-runner start --mode digital --spread three-card [--seed abc]
//!   reading-runner draw  --reading <id> --count 3 [--reversed] [--slots Past,Present,Future] [--force]
//!   reading-runner show  --reading <id>
//!   reading-runner list  [--limit 20]
//!   reading-runner delete --reading <id>
//!
//! Common flags: --db readings.db (default :memory:), --deck data/deck42.json

use anyhow::Result;
use arcana_core::{deck::DeckCatalog, service::ReadingService, store::ReadingStore};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("help");
    let db = str_arg(&args, "--db").unwrap_or_else(|| ":memory:".to_string());
    let deck_path = str_arg(&args, "--deck").unwrap_or_else(|| "./data/deck42.json".to_string());

    if command == "help" {
        print_usage();
        return Ok(());
    }

    let store = ReadingStore::open(&db)?;
    store.migrate()?;
    let deck = DeckCatalog::load(&deck_path)?;
    let service = ReadingService::new(store, deck);

    match command {
        "start" => {
            let mode = str_arg(&args, "--mode").unwrap_or_else(|| "digital".to_string());
            let spread = str_arg(&args, "--spread").unwrap_or_else(|| "single".to_string());
            let seed = str_arg(&args, "--seed");
            let reading = service.start(&mode, &spread, seed, None)?;
            println!("{}", serde_json::to_string_pretty(&reading)?);
        }
        "draw" => {
            let reading_id = require_arg(&args, "--reading")?;
            let count: usize = str_arg(&args, "--count")
                .and_then(|c| c.parse().ok())
                .unwrap_or(1);
            let reversed = args.iter().any(|a| a == "--reversed");
            let force = args.iter().any(|a| a == "--force");
            let slots = str_arg(&args, "--slots")
                .map(|s| s.split(',').map(str::to_string).collect::<Vec<_>>());
            let positions = service.draw(&reading_id, count, reversed, slots, force)?;
            println!("{}", serde_json::to_string_pretty(&positions)?);
        }
        "show" => {
            let reading_id = require_arg(&args, "--reading")?;
            let reading = service.get(&reading_id)?;
            println!("{}", serde_json::to_string_pretty(&reading)?);
        }
        "list" => {
            let limit: usize = str_arg(&args, "--limit")
                .and_then(|l| l.parse().ok())
                .unwrap_or(20);
            for reading in service.store().recent_readings(limit)? {
                println!(
                    "{}  {:<8}  {:<12}  {}",
                    reading.reading_id,
                    reading.mode.as_str(),
                    reading.spread_id,
                    reading.created_at
                );
            }
        }
        "delete" => {
            let reading_id = require_arg(&args, "--reading")?;
            if service.delete(&reading_id)? {
                println!("deleted {reading_id}");
            } else {
                println!("no such reading: {reading_id}");
            }
        }
        other => {
            log::warn!("Unknown command: {other}");
            print_usage();
        }
    }

    Ok(())
}

fn str_arg(args: &[String], flag: &str) -> Option<String> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].clone())
}

fn require_arg(args: &[String], flag: &str) -> Result<String> {
    str_arg(args, flag).ok_or_else(|| anyhow::anyhow!("missing required flag: {flag}"))
}

fn print_usage() {
    println!("reading-runner — deterministic card-reading sessions");
    println!();
    println!("  start  --mode digital|physical --spread <id> [--seed <s>]");
    println!("  draw   --reading <id> --count N [--reversed] [--slots a,b,c] [--force]");
    println!("  show   --reading <id>");
    println!("  list   [--limit N]");
    println!("  delete --reading <id>");
    println!();
    println!("  common: --db <path> (default :memory:), --deck <path>");
}
