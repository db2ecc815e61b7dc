//! Command-line frontend for the termin engine.
//!
//! Every subcommand prints JSON on stdout so the binary can sit behind a
//! bot or an agent tool-call without a parsing layer in between. The
//! anchor instant is overridable for reproducible runs.

use std::fs;
use std::io::Read;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};

use termin_engine::{
    civil_now, day_window, group_by_day, parse_time, preprocess, resolve_window, Event, Language,
    Timeframe, WindowSpec,
};

#[derive(Parser)]
#[command(name = "termin")]
#[command(about = "Bilingual temporal expression parsing and event-window resolution")]
#[command(version)]
struct Cli {
    /// Anchor instant (RFC 3339); defaults to the current time
    #[arg(long, global = true)]
    anchor: Option<String>,

    /// IANA timezone for civil-time interpretation
    #[arg(long, global = true, default_value = "Europe/Berlin")]
    timezone: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a temporal expression to a UTC window
    Parse {
        /// Expression, e.g. "morgen 18:00" or "next friday"
        expression: String,

        /// Window length in hours
        #[arg(long, default_value = "1.0")]
        duration_hours: f64,

        /// Widen the result to the full civil day of the resolved start
        #[arg(long)]
        whole_day: bool,
    },

    /// Rewrite date ranges and month references to canonical ISO form
    Preprocess {
        /// Free text, e.g. "Events vom 1. Dezember bis zum 29. Dezember"
        text: String,
    },

    /// Filter, sort and optionally day-group events from a JSON file
    Window {
        /// Path to a JSON array of events, or "-" for stdin
        #[arg(long)]
        events: String,

        /// Window start (RFC 3339); defaults to the anchor
        #[arg(long)]
        from: Option<String>,

        /// Window end (RFC 3339)
        #[arg(long)]
        to: Option<String>,

        /// Window end as a day count from the anchor
        #[arg(long)]
        days_ahead: Option<i64>,

        /// Named preset: today, tomorrow, week, 2weeks, month
        #[arg(long)]
        timeframe: Option<String>,

        /// Case-insensitive location substring filter
        #[arg(long)]
        location: Option<String>,

        /// Maximum number of events returned
        #[arg(long)]
        limit: Option<usize>,

        /// Group the result by civil day
        #[arg(long)]
        group: bool,

        /// Weekday label language: de or en
        #[arg(long, default_value = "de")]
        lang: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let tz: Tz = cli
        .timezone
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid timezone {:?}: {e}", cli.timezone))?;
    let anchor = match &cli.anchor {
        Some(raw) => parse_instant(raw)?.with_timezone(&tz),
        None => civil_now(tz),
    };

    match cli.command {
        Command::Parse {
            expression,
            duration_hours,
            whole_day,
        } => {
            let window = parse_time(&expression, duration_hours, anchor)
                .with_context(|| format!("cannot resolve {expression:?}"))?;
            if whole_day {
                let (start, end) = day_window(window.start, tz);
                print_json(&serde_json::json!({ "start": start, "end": end }))?;
            } else {
                print_json(&window)?;
            }
        }

        Command::Preprocess { text } => {
            let rewritten = preprocess(&text, anchor);
            print_json(&serde_json::json!({
                "input": text,
                "output": rewritten,
                "changed": rewritten != text,
            }))?;
        }

        Command::Window {
            events,
            from,
            to,
            days_ahead,
            timeframe,
            location,
            limit,
            group,
            lang,
        } => {
            let events = load_events(&events)?;
            let spec = WindowSpec {
                from: from.as_deref().map(parse_instant).transpose()?,
                to: to.as_deref().map(parse_instant).transpose()?,
                days_ahead,
                timeframe: timeframe.as_deref().map(Timeframe::from_name),
                location,
                limit,
            };
            let result = resolve_window(&events, &spec, anchor.with_timezone(&Utc));
            if group {
                let lang = match lang.as_str() {
                    "de" => Language::De,
                    "en" => Language::En,
                    other => bail!("unsupported language {other:?}, expected de or en"),
                };
                print_json(&group_by_day(&result.events, tz, lang))?;
            } else {
                print_json(&result)?;
            }
        }
    }

    Ok(())
}

fn parse_instant(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("invalid RFC 3339 instant {raw:?}"))
}

fn load_events(source: &str) -> Result<Vec<Event>> {
    let raw = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading events from stdin")?;
        buf
    } else {
        fs::read_to_string(source).with_context(|| format!("reading {source}"))?
    };
    serde_json::from_str(&raw).context("events must be a JSON array")
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
