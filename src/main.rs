use crate::analysis::aggregate::{
    aggregate_by_period_aircraft, aggregate_by_threshold_bucket, aircraft_detail, distribution,
    explore, top_utilization, utilization_by_period,
};
use crate::analysis::presence::{
    Comparison, StreakFilter, StreakRow, Statistic, apply_filters, compute_presence_matrix,
    compute_run_lengths, observed_periods, pair_detail, select,
};
use crate::config::SessionConfig;
use crate::dataset::Dataset;
use crate::error::FaixaError;
use crate::period::Period;
use crate::session::Session;
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

mod aircraft;
mod airport;
mod analysis;
mod config;
mod dataset;
mod error;
mod flight;
mod period;
mod session;

const PAGE_ROWS: usize = 20;

#[derive(Parser)]
struct Args {
    /// Path to the JSON dataset with the yearly and monthly tables
    #[arg(short, long, value_name = "FILE", default_value = "data/dataset.json")]
    dataset: PathBuf,

    /// Optional JSON file with session defaults
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let candidates = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: format!("{} ", cmd),
            })
            .collect();

        Ok((0, candidates))
    }
}

fn paginate(content: String) {
    let spawned = Command::new("less")
        .arg("-R")
        .stdin(Stdio::piped())
        .spawn()
        .or_else(|_| Command::new("more").stdin(Stdio::piped()).spawn());
    let mut pager = match spawned {
        Ok(pager) => pager,
        Err(_) => {
            println!("{}", content);
            return;
        }
    };

    if let Some(mut stdin) = pager.stdin.take() {
        if let Err(e) = stdin.write_all(content.as_bytes()) {
            // the user quit the pager early
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                eprintln!("Error writing to pager: {}", e);
            }
        }
    }

    let _ = pager.wait();
}

fn show<T: Tabled>(rows: &[T]) {
    if rows.is_empty() {
        println!("{}", "No matching rows.".yellow());
        return;
    }
    let mut table = Table::new(rows);
    table.with(Style::rounded()).with(Alignment::left());
    if rows.len() > PAGE_ROWS {
        paginate(table.to_string());
    } else {
        println!("{}", table);
    }
}

fn heading(text: &str) {
    println!("\n{}", text.bold().cyan());
}

fn usage(text: &str) {
    println!("{} {}", "Usage:".yellow(), text);
}

#[derive(Tabled)]
struct TierRow {
    tier: Arc<str>,
    lower: f64,
    upper: f64,
}

#[derive(Tabled)]
struct ExclusionRow {
    airport: Arc<str>,
    years: String,
}

#[derive(Tabled)]
struct PresenceRow {
    airport: Arc<str>,
    aircraft: Arc<str>,
    active: usize,
    presence: String,
}

fn parse_all<T: std::str::FromStr>(parts: &[&str]) -> Option<Vec<T>> {
    parts.iter().map(|p| p.parse::<T>().ok()).collect()
}

/// Splits `airport=A,B` and `aircraft=X` selectors from the remaining arguments.
fn parse_selection<'a>(
    parts: &[&'a str],
) -> (Option<BTreeSet<Arc<str>>>, Option<BTreeSet<Arc<str>>>, Vec<&'a str>) {
    let codes = |list: &str| -> BTreeSet<Arc<str>> {
        list.split(',').filter(|c| !c.is_empty()).map(Arc::from).collect()
    };
    let mut airports = None;
    let mut aircraft = None;
    let mut rest = vec![];
    for part in parts {
        if let Some(list) = part.strip_prefix("airport=") {
            airports = Some(codes(list));
        } else if let Some(list) = part.strip_prefix("aircraft=") {
            aircraft = Some(codes(list));
        } else {
            rest.push(*part);
        }
    }
    (airports, aircraft, rest)
}

fn parse_filters(parts: &[&str]) -> Result<Vec<StreakFilter>, String> {
    if parts.len() % 3 != 0 {
        return Err("filters come in <statistic> <operator> <value> triples".to_string());
    }
    parts
        .chunks(3)
        .map(|chunk| -> Result<StreakFilter, String> {
            Ok(StreakFilter {
                statistic: chunk[0].parse::<Statistic>()?,
                comparison: chunk[1].parse::<Comparison>()?,
                value: chunk[2]
                    .parse::<f64>()
                    .map_err(|_| format!("not a number: {}", chunk[2]))?,
            })
        })
        .collect()
}

/// Streak rows of the selected pairs that pass every filter in `parts`.
fn filtered_streaks(session: &Session, parts: &[&str]) -> Result<Vec<StreakRow>, String> {
    let (airports, aircraft, rest) = parse_selection(parts);
    let filters = parse_filters(&rest)?;
    let periods = observed_periods(session.flights());
    let selected = select(session.flights(), airports.as_ref(), aircraft.as_ref());
    let rows = compute_run_lengths(&compute_presence_matrix(&selected, &periods));
    Ok(apply_filters(&rows, &filters))
}

fn show_tiers(session: &Session) {
    let tiers = session.tiers();
    let rows = tiers
        .labels()
        .iter()
        .filter_map(|label| {
            tiers.range_of(label).map(|(lower, upper)| TierRow {
                tier: label.clone(),
                lower,
                upper,
            })
        })
        .collect::<Vec<_>>();
    heading(&format!("{} tiers above {}", tiers.count(), analysis::tiers::FLOOR_TIER));
    show(&rows);
}

fn run(session: &mut Session, parts: &[&str]) -> Result<(), FaixaError> {
    match parts[0] {
        "tiers" => match parts.get(1).copied() {
            None => show_tiers(session),
            Some("default") => {
                session.reset_tiers();
                show_tiers(session);
            }
            Some("set") => {
                let count = parts.get(2).and_then(|k| k.parse::<usize>().ok());
                match (count, parse_all::<f64>(parts.get(3..).unwrap_or(&[]))) {
                    (Some(count), Some(thresholds)) => {
                        session.set_tiers(count, &thresholds)?;
                        show_tiers(session);
                    }
                    _ => {
                        let suggested = analysis::tiers::suggested_thresholds(3)
                            .iter()
                            .map(|t| t.to_string())
                            .collect::<Vec<_>>();
                        usage(&format!("tiers set <k> <t1> .. <tk>, e.g. tiers set 3 {}", suggested.join(" ")));
                    }
                }
            }
            Some(_) => usage("tiers [default | set <k> <t1> .. <tk>]"),
        },
        "dist" => {
            let year = parts.get(1).and_then(|y| y.parse::<i32>().ok());
            let rows = distribution(session.classified())
                .into_iter()
                .filter(|r| year.is_none_or(|y| r.year == y))
                .collect::<Vec<_>>();
            show(&rows);
        }
        "explore" => {
            let year = parts.get(2).and_then(|y| y.parse::<i32>().ok());
            match (parts.get(1), year) {
                (Some(tier), Some(year)) => {
                    let label = session.tiers().resolve_label(tier)?;
                    let result = explore(session.classified(), &label, year);
                    heading(&format!("{} in {}", label, year));
                    show(&result.airports);
                    println!(
                        "total {:.0}  mean {:.1}  min {:.0}  max {:.0}  share {:.2}%",
                        result.total, result.mean, result.min, result.max, result.share
                    );
                }
                _ => usage("explore <tier> <year>"),
            }
        }
        "exclude" => match parts.get(1).copied() {
            Some("default") => {
                session.exclude_defaults();
                println!("Default exclusions applied.");
            }
            Some(airport) => match parse_all::<i32>(&parts[2..]) {
                Some(years) => {
                    session.exclude(airport, years);
                    println!("Excluded {}.", airport);
                }
                None => usage("exclude <airport> [years..]"),
            },
            None => usage("exclude <airport> [years..] | exclude default"),
        },
        "include" => match parts.get(1) {
            Some(airport) => {
                if session.include(airport) {
                    println!("{} is included again.", airport);
                } else {
                    println!("{}", format!("{} was not excluded.", airport).yellow());
                }
            }
            None => usage("include <airport>"),
        },
        "exclusions" => {
            if session.exclusions().is_empty() {
                println!("{}", "No airport is excluded.".yellow());
                return Ok(());
            }
            let rows = session
                .exclusions()
                .iter()
                .filter(|(_, years)| !years.is_empty())
                .map(|(airport, years)| ExclusionRow {
                    airport: airport.clone(),
                    years: years.iter().map(|y| y.to_string()).collect::<Vec<_>>().join(" "),
                })
                .collect::<Vec<_>>();
            show(&rows);
        }
        "evolution" => match parts.get(1) {
            Some(tier) => {
                let top_n = parts.get(2).and_then(|n| n.parse::<usize>().ok());
                let (label, flights) = session.tier_flights(tier)?;
                let summary = aggregate_by_period_aircraft(&flights, top_n);
                let per_year = session
                    .membership()
                    .airports_per_year(&label)
                    .iter()
                    .map(|(year, n)| format!("{}: {}", year, n))
                    .collect::<Vec<_>>();
                heading(&format!("Aircraft ranking for {}", label));
                println!("airports per year  {}", per_year.join("  "));
                show(&summary.top);
                heading("Monthly evolution");
                show(&summary.rows);
            }
            None => usage("evolution <tier> [n]"),
        },
        "detail" => match (parts.get(1), parts.get(2), parts.get(3)) {
            (Some(tier), Some(aircraft), Some(period)) => {
                let period = period.parse::<Period>()?;
                let (label, flights) = session.tier_flights(tier)?;
                let detail = aircraft_detail(&flights, aircraft, period);
                heading(&format!("{} in {} airports, {}", aircraft, label, period));
                show(&detail.airports);
                println!(
                    "flights {}  passengers {:.0}  mean flights per airport {:.1}",
                    detail.flights, detail.passengers, detail.mean_flights
                );
            }
            _ => usage("detail <tier> <aircraft> <period>"),
        },
        "util" => match parts.get(1) {
            Some(tier) => {
                let top_n = parts.get(2).and_then(|n| n.parse::<usize>().ok());
                let (label, flights) = session.tier_flights(tier)?;
                let rows = utilization_by_period(&flights);
                heading(&format!("Mean utilization in {}", label));
                show(&top_utilization(&rows, top_n));
                heading("Utilization by month");
                show(&rows);
            }
            None => usage("util <tier> [n]"),
        },
        "category" => match parse_all::<i32>(&parts[1..]) {
            Some(years) => {
                let years = if years.is_empty() {
                    session.years()
                } else {
                    years.into_iter().collect()
                };
                let buckets = aggregate_by_threshold_bucket(
                    session.flights(),
                    session.airport_years(),
                    &years,
                    session.bucket_thresholds(),
                )?;
                if buckets.is_empty() {
                    println!("{}", "No flights in the selected years.".yellow());
                }
                for bucket in buckets {
                    heading(&format!(
                        "({:.0}, {:.0}] passengers: {} airports, {} flights",
                        bucket.lower,
                        bucket.upper,
                        bucket.airports.len(),
                        bucket.flights
                    ));
                    show(&bucket.shares);
                }
            }
            None => usage("category [years..]"),
        },
        "presence" => {
            let (airports, aircraft, _) = parse_selection(&parts[1..]);
            let periods = observed_periods(session.flights());
            let selected = select(session.flights(), airports.as_ref(), aircraft.as_ref());
            let matrix = compute_presence_matrix(&selected, &periods);
            let rows = matrix
                .rows
                .iter()
                .map(|((airport, aircraft), presence)| PresenceRow {
                    airport: airport.clone(),
                    aircraft: aircraft.clone(),
                    active: presence.iter().filter(|p| **p).count(),
                    presence: presence.iter().map(|p| if *p { '#' } else { '.' }).collect(),
                })
                .collect::<Vec<_>>();
            if let (Some(first), Some(last)) = (periods.first(), periods.last()) {
                heading(&format!("Presence from {} to {}", first, last));
            }
            show(&rows);
        }
        "streaks" => match filtered_streaks(session, &parts[1..]) {
            Ok(rows) => show(&rows),
            Err(e) => {
                println!("{}", e.red());
                usage("streaks [airport=..] [aircraft=..] [<statistic> <operator> <value> ..]");
            }
        },
        "movements" => match (parts.get(1).copied(), parts.get(2).copied()) {
            (Some(at), Some(of)) => match filtered_streaks(session, &parts[3..]) {
                Ok(rows) => {
                    let pairs = rows
                        .iter()
                        .map(|r| (r.airport.clone(), r.aircraft.clone()))
                        .collect::<BTreeSet<_>>();
                    let detail = pair_detail(
                        session.flights(),
                        &pairs,
                        (at != "*").then_some(at),
                        (of != "*").then_some(of),
                    );
                    heading("Monthly movements of the filtered pairs");
                    show(&detail.rows);
                    println!(
                        "flights {}  passengers {:.0}  periods {}",
                        detail.flights, detail.passengers, detail.periods
                    );
                }
                Err(e) => {
                    println!("{}", e.red());
                    usage("movements <airport|*> <aircraft|*> [airport=..] [aircraft=..] [<stat> <op> <value> ..]");
                }
            },
            _ => usage("movements <airport|*> <aircraft|*> [airport=..] [aircraft=..] [<stat> <op> <value> ..]"),
        },
        "help" | "?" => {
            heading("Available Commands:");
            println!("  tiers                         - Show the current tiers and their bounds");
            println!("  tiers default                 - Restore the default tiers");
            println!("  tiers set <k> <t1> .. <tk>    - Use <k> tiers above the floor tier");
            println!("  dist [year]                   - Passenger distribution per tier and year");
            println!("  explore <tier> <year>         - Rank the airports of a tier in one year");
            println!("  exclude <airport> [years..]   - Exclude an airport, in every year when none are given");
            println!("  exclude default               - Exclude the default airport list");
            println!("  include <airport>             - Remove an airport from the exclusions");
            println!("  exclusions                    - List excluded airports");
            println!("  evolution <tier> [n]          - Monthly flights per aircraft, top <n> aircraft");
            println!("  detail <tier> <aircraft> <p>  - Airports flying <aircraft> in period <p> (2022-07)");
            println!("  util <tier> [n]               - Share of airports using each aircraft");
            println!("  category [years..]            - Category mix by airport size");
            println!("  presence [airport=..] [aircraft=..]");
            println!("                                - Monthly presence of airport and aircraft pairs");
            println!("  streaks [airport=..] [aircraft=..] [<stat> <op> <value> ..]");
            println!("                                - Active and inactive run lengths, filtered");
            println!("                                  stats: active_max active_min active_mean");
            println!("                                         inactive_max inactive_min inactive_mean");
            println!("  movements <airport|*> <aircraft|*> [streaks arguments..]");
            println!("                                - Monthly flights and passengers of the pairs kept by streaks");
            println!("  help / ?                      - Show this help menu");
            println!("  exit / quit                   - Exit\n");
        }
        other => println!("{}", format!("Unknown command: {}", other).red()),
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SessionConfig::load_from_file(&path.to_string_lossy())?,
        None => SessionConfig::default(),
    };
    let dataset = Dataset::load_from_file(&args.dataset.to_string_lossy(), config.projection_year)?;
    println!(
        "Loaded {} airports over {} years from {}",
        dataset
            .airport_years
            .iter()
            .map(|r| r.airport.clone())
            .collect::<BTreeSet<_>>()
            .len(),
        dataset.years().len(),
        args.dataset.display()
    );
    let mut session = Session::new(dataset, config)?;

    let editor_config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let helper = CompleteHelper {
        commands: [
            "tiers", "dist", "explore", "exclude", "include", "exclusions", "evolution", "detail",
            "util", "category", "presence", "streaks", "movements", "help", "exit",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect(),
    };

    let mut rl = Editor::with_config(editor_config)?;
    rl.set_helper(Some(helper));

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                rl.add_history_entry(trimmed)?;

                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                if matches!(parts[0], "exit" | "quit") {
                    break;
                }
                if let Err(e) = run(&mut session, &parts) {
                    println!("{} {}", "Error:".red().bold(), e);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
