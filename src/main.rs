//! MatchupMaster - Entry Point
//!
//! One-shot subcommands for scripting, or an interactive session when run
//! without one.

use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use matchup_master::assets::GameData;
use matchup_master::breakpoint::{self, OneShotResult};
use matchup_master::catalog::Catalog;
use matchup_master::classifier::{CategoryFilter, Classifier};
use matchup_master::core::config::{AppConfig, DEFAULT_CONFIG_FILE};
use matchup_master::core::error::{MatchupError, Result};
use matchup_master::core::types::Side;
use matchup_master::llm::{LlmClient, Narrative, StrategyDesk};
use matchup_master::matchup::{MatchupSet, Selection};
use matchup_master::prompt::StrategyRequest;

/// MatchupMaster - counter-pick and breakpoint analysis for Mechabellum
#[derive(Parser, Debug)]
#[command(name = "matchup")]
#[command(about = "Counter relationships, one-shot breakpoints and strategy prompts for Mechabellum")]
struct Args {
    /// Config file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List catalog units split into air and ground
    Units {
        #[arg(long, default_value = "")]
        search: String,
        /// all, air or ground
        #[arg(long, default_value = "all")]
        category: CategoryFilter,
    },
    /// Show what a unit counters and what counters it
    Counters { unit: String },
    /// One-shot breakpoints for a unit
    Breakpoints { unit: String },
    /// All units ranked by damage
    Ranking {
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Print the strategy prompt for a matchup
    Prompt {
        #[arg(long, value_delimiter = ',', required = true)]
        opponent: Vec<String>,
        #[arg(long, value_delimiter = ',', required = true)]
        own: Vec<String>,
    },
    /// Generate a strategy for a matchup
    Strategy {
        #[arg(long, value_delimiter = ',', required = true)]
        opponent: Vec<String>,
        #[arg(long, value_delimiter = ',', required = true)]
        own: Vec<String>,
    },
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("matchup_master=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let config = AppConfig::load(&args.config)?;
    let data = GameData::load(&config)?;

    match args.command {
        Some(Command::Units { search, category }) => {
            print_units(&Classifier::air().filter(&data.catalog, &search, category));
        }
        Some(Command::Counters { unit }) => print_counters(&data.catalog, &unit)?,
        Some(Command::Breakpoints { unit }) => {
            print_breakpoints(&breakpoint::analyze(&data.stats, &unit)?);
        }
        Some(Command::Ranking { search }) => {
            for result in breakpoint::ranked(&data.stats, &search)? {
                println!(
                    "{:<14} dmg {:>9}  hp {:>9}  eff {:>6.3}  kills {:>2}  killed by {:>2}",
                    result.unit,
                    format_number(result.stat.damage),
                    format_number(result.stat.hp),
                    result.efficiency,
                    result.one_shot_targets.len(),
                    result.one_shotters.len()
                );
            }
        }
        Some(Command::Prompt { opponent, own }) => {
            let request = build_request(&data, &opponent, &own)?;
            println!("{}", request.prompt());
        }
        Some(Command::Strategy { opponent, own }) => {
            let request = build_request(&data, &opponent, &own)?;
            let desk = StrategyDesk::new(LlmClient::from_config(&config.llm)?);
            let rt = Runtime::new()?;
            let narrative = rt.block_on(desk.generate(&request))?;
            print_narrative(&narrative);
        }
        None => run_session(&config, &data)?,
    }

    Ok(())
}

/// Resolve typed names against the catalog and snapshot the matchup
fn build_request(data: &GameData, opponent: &[String], own: &[String]) -> Result<StrategyRequest> {
    let resolve = |names: &[String]| -> Result<MatchupSet> {
        let mut set = MatchupSet::new();
        for name in names {
            set.add(data.catalog.get(name)?.name.clone());
        }
        Ok(set)
    };
    StrategyRequest::new(&resolve(opponent)?, &resolve(own)?, data.corpus.clone())
}

fn run_session(config: &AppConfig, data: &GameData) -> Result<()> {
    tracing::info!(units = data.catalog.len(), "MatchupMaster starting...");

    // Create the async runtime for generation calls
    let rt = Runtime::new()?;

    // Generation is optional; everything else works offline
    let desk = match LlmClient::from_config(&config.llm) {
        Ok(client) => Some(StrategyDesk::new(client)),
        Err(e) => {
            tracing::warn!(error = %e, "running without strategy generation");
            None
        }
    };

    println!("\n=== MATCHUP MASTER ===");
    println!();
    println!("Commands:");
    println!("  opp <unit>          - Toggle a unit in the opponent's army");
    println!("  own <unit>          - Toggle a unit in your army");
    println!("  clear [opp|own]     - Clear one side, or both");
    println!("  show                - Show the current matchup");
    println!("  bp <unit>           - One-shot breakpoints for a unit");
    if desk.is_some() {
        println!("  generate / g        - Generate a strategy for the matchup");
    }
    println!("  quit / q            - Exit");
    println!();

    let mut selection = Selection::new();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let (command, rest) = match input.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (input, ""),
        };

        match command {
            "quit" | "q" => break,
            "opp" | "own" => {
                let side = if command == "opp" {
                    Side::Opponent
                } else {
                    Side::Own
                };
                match data.catalog.get(rest) {
                    Ok(record) => {
                        let selected = selection.toggle(side, &record.name);
                        let verb = if selected { "Added" } else { "Removed" };
                        println!("{} {} ({} side)", verb, record.name, side);
                    }
                    Err(e) => println!("{}", e),
                }
            }
            "clear" => match rest {
                "opp" => selection.side_mut(Side::Opponent).clear(),
                "own" => selection.side_mut(Side::Own).clear(),
                "" => selection.clear_all(),
                other => println!("Unknown side '{}' (expected opp or own)", other),
            },
            "show" | "s" => print_selection(&selection),
            "bp" => match breakpoint::analyze(&data.stats, rest) {
                Ok(result) => print_breakpoints(&result),
                Err(e) => println!("{}", e),
            },
            "generate" | "g" => {
                let Some(desk) = &desk else {
                    println!("Strategy generation needs LLM_API_KEY");
                    continue;
                };
                let request = match StrategyRequest::new(
                    selection.side(Side::Opponent),
                    selection.side(Side::Own),
                    data.corpus.clone(),
                ) {
                    Ok(request) => request,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };
                println!("Generating strategy...");
                match rt.block_on(desk.generate(&request)) {
                    Ok(narrative) => print_narrative(&narrative),
                    Err(MatchupError::Superseded) => {}
                    Err(e) => println!("Failed to generate strategy: {}", e),
                }
            }
            other => println!("Unknown command '{}'", other),
        }
    }

    println!("Goodbye!");
    Ok(())
}

fn print_units(catalog: &Catalog) {
    let partition = Classifier::air().categorize(catalog);
    for (heading, units) in [("Air", &partition.primary), ("Ground", &partition.secondary)] {
        if units.is_empty() {
            continue;
        }
        println!("{} ({})", heading, units.len());
        for unit in units.iter() {
            println!("  {}", unit.name);
        }
    }
    if catalog.is_empty() {
        println!("No units match.");
    }
}

fn print_counters(catalog: &Catalog, unit: &str) -> Result<()> {
    let view = catalog.resolve_counters(unit)?;
    println!("{}", view.unit.name);
    for (heading, refs) in [
        ("Good against", &view.good_against),
        ("Countered by", &view.countered_by),
    ] {
        println!("  {}:", heading);
        if refs.is_empty() {
            println!("    (none)");
        }
        for r in refs.iter() {
            let marker = if r.is_known() { "" } else { " (unknown)" };
            println!("    {}{}", r.name, marker);
        }
    }
    Ok(())
}

fn print_breakpoints(result: &OneShotResult<'_>) {
    println!(
        "{}: hp {}, damage {}, efficiency {:.3}",
        result.unit,
        format_number(result.stat.hp),
        format_number(result.stat.damage),
        result.efficiency
    );
    println!("  One-shot by ({}):", result.one_shotters.len());
    for attacker in &result.one_shotters {
        println!("    {:<14} {:>9} dmg", attacker.name, format_number(attacker.damage));
    }
    println!("  Can one-shot ({}):", result.one_shot_targets.len());
    for target in &result.one_shot_targets {
        println!("    {:<14} {:>9} hp", target.name, format_number(target.hp));
    }
}

fn print_selection(selection: &Selection) {
    for side in [Side::Opponent, Side::Own] {
        let set = selection.side(side);
        let names = if set.is_empty() {
            "(none)".to_string()
        } else {
            set.names().join(", ")
        };
        println!("  {:<9} {}", format!("{}:", side), names);
    }
}

fn print_narrative(narrative: &Narrative) {
    println!();
    print!("{}", narrative.render_plain());
    let ratings = narrative.counter_ratings();
    if !ratings.is_empty() {
        println!();
        println!("Counter ratings:");
        for rating in ratings {
            let unit = rating.unit.unwrap_or("?");
            println!("  {:<14} {}", unit, "*".repeat(rating.stars));
        }
    }
}

/// Whole numbers with thousands separators; fractional values as-is
fn format_number(value: f64) -> String {
    if value.fract() != 0.0 || !value.is_finite() {
        return format!("{:.1}", value);
    }
    let digits = format!("{}", value.abs() as u64);
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if value < 0.0 {
        out.insert(0, '-');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(79.0), "79");
        assert_eq!(format_number(146782.0), "146,782");
        assert_eq!(format_number(1000.0), "1,000");
        assert_eq!(format_number(12.5), "12.5");
    }

    #[test]
    fn test_args_parse_comma_lists() {
        let args = Args::parse_from(["matchup", "prompt", "--opponent", "Fang,Wasp", "--own", "Rhino"]);
        match args.command {
            Some(Command::Prompt { opponent, own }) => {
                assert_eq!(opponent, ["Fang", "Wasp"]);
                assert_eq!(own, ["Rhino"]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
