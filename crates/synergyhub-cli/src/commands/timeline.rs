use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use clap::Subcommand;
use synergyhub_core::format::format_compact_number;
use synergyhub_core::timeline::month_key;
use synergyhub_core::{Config, TimelineLayout};

use super::{load_synergies, print_json, CommandResult};

#[derive(Subcommand)]
pub enum TimelineAction {
    /// Swim lanes, one per company
    Lanes {
        #[arg(long)]
        json: bool,
    },
    /// Visible 12-month date range
    Range {
        #[arg(long)]
        json: bool,
    },
    /// Months where several companies are busy at once
    Overlaps {
        #[arg(long)]
        json: bool,
    },
    /// Merged maintenance periods per company
    Maintenance {
        #[arg(long)]
        json: bool,
    },
    /// Milestones above the lanes
    Events {
        #[arg(long)]
        json: bool,
    },
    /// Horizontal pixel offset of a date
    Position {
        /// Date as YYYY-MM-DD or RFC 3339
        date: String,
        /// Canvas width in pixels (defaults to `timeline.width_px`)
        #[arg(long)]
        width: Option<f64>,
    },
}

fn parse_date(text: &str) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Ok(at.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{text}': {e}"))?;
    date.and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("invalid date '{text}'").into())
}

fn day(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

pub fn run(action: TimelineAction, data: Option<&Path>) -> CommandResult {
    let config = Config::load_or_default();
    let synergies = load_synergies(data, &config)?;
    let layout = TimelineLayout::build(&synergies, Utc::now());

    match action {
        TimelineAction::Lanes { json: true } => print_json(&layout.lanes)?,
        TimelineAction::Lanes { json: false } => {
            for lane in &layout.lanes {
                println!("{} ({} blocks)", lane.company, lane.blocks.len());
                for block in &lane.blocks {
                    println!(
                        "  {} .. {}  {}  {} {}  [{}]",
                        day(block.start),
                        day(block.end),
                        block.synergy_id,
                        block.volume,
                        block.unit,
                        block.state
                    );
                }
            }
        }
        TimelineAction::Range { json: true } => print_json(&layout.range)?,
        TimelineAction::Range { json: false } => {
            let first = layout.range.months.first().map(|m| month_key(*m));
            let last = layout.range.months.last().map(|m| month_key(*m));
            println!(
                "{} .. {} ({} months)",
                first.unwrap_or_default(),
                last.unwrap_or_default(),
                layout.range.months.len()
            );
        }
        TimelineAction::Overlaps { json: true } => print_json(&layout.overlaps)?,
        TimelineAction::Overlaps { json: false } => {
            for overlap in &layout.overlaps {
                println!(
                    "{}  {} companies  volume {}  savings {}",
                    month_key(overlap.month),
                    overlap.companies.len(),
                    overlap.total_volume,
                    format_compact_number(overlap.total_savings)
                );
            }
        }
        TimelineAction::Maintenance { json: true } => print_json(&layout.maintenance)?,
        TimelineAction::Maintenance { json: false } => {
            for (company, periods) in &layout.maintenance {
                println!("{company}");
                for period in periods {
                    println!(
                        "  {} .. {}  {}",
                        day(period.start),
                        day(period.end),
                        period.synergy_ids.join(", ")
                    );
                }
            }
        }
        TimelineAction::Events { json: true } => print_json(&layout.events)?,
        TimelineAction::Events { json: false } => {
            for event in &layout.events {
                println!(
                    "{}  {:<24} {}  {}",
                    day(event.date),
                    event.label,
                    event.synergy_id,
                    event.description
                );
            }
        }
        TimelineAction::Position { date, width } => {
            let at = parse_date(&date)?;
            let width = width.unwrap_or(config.timeline.width_px);
            let x = layout.range.position(at, width);
            print_json(&serde_json::json!({
                "date": at,
                "width_px": width,
                "x": x,
            }))?;
        }
    }
    Ok(())
}
