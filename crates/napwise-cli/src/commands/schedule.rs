use chrono::NaiveDate;
use clap::Subcommand;
use napwise_core::{AppState, ClockTime, ScheduleBlock};
use serde::Serialize;

use super::{now, parse_date, parse_time, today, CmdResult, Context};

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Show the day's blocks
    Show {
        /// Date (YYYY-MM-DD), default today
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List overlapping blocks
    Conflicts {
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(long)]
        json: bool,
    },
    /// Show the block in progress
    Now {
        /// Time to check instead of the current time (HH:MM)
        #[arg(long, value_parser = parse_time)]
        at: Option<ClockTime>,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
}

/// A block as handed to renderers.
#[derive(Serialize)]
struct BlockRow<'a> {
    #[serde(flatten)]
    block: &'a ScheduleBlock,
    style: &'static str,
    current: bool,
}

fn load_state(ctx: &Context, date: NaiveDate) -> Result<AppState, Box<dyn std::error::Error>> {
    let config = ctx.config()?;
    let store = ctx.store(&config)?;
    Ok(AppState::load(&store, date)?)
}

fn format_block(block: &ScheduleBlock) -> String {
    format!(
        "{:>8} - {:>8}  {:<24} {}",
        block.start.display_12h(),
        block.end.display_12h(),
        block.title,
        block.caregiver
    )
}

pub fn run(action: ScheduleAction, ctx: &Context) -> CmdResult {
    match action {
        ScheduleAction::Show { date, json } => {
            let date = date.unwrap_or_else(today);
            let state = load_state(ctx, date)?;
            let blocks = state.schedule();
            let current = (date == today())
                .then(|| napwise_core::current_block(&blocks, now()).cloned())
                .flatten();

            let rows: Vec<BlockRow> = blocks
                .iter()
                .map(|block| BlockRow {
                    block,
                    style: block.kind.style(),
                    current: current.as_ref() == Some(block),
                })
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
                return Ok(());
            }

            println!("{} for {}", state.settings.child_name, date.format("%A, %B %-d"));
            if state.plan.is_none() {
                println!("(no plan saved; using defaults)");
            }
            for row in &rows {
                let marker = if row.current { ">" } else { " " };
                println!("{marker} {}", format_block(row.block));
            }
            let conflicts = state.conflicts();
            if !conflicts.is_empty() {
                println!();
                println!("{} overlap(s); see `napwise schedule conflicts`", conflicts.len());
            }
        }
        ScheduleAction::Conflicts { date, json } => {
            let state = load_state(ctx, date.unwrap_or_else(today))?;
            let conflicts = state.conflicts();
            if json {
                println!("{}", serde_json::to_string_pretty(&conflicts)?);
            } else if conflicts.is_empty() {
                println!("No overlaps");
            } else {
                for c in &conflicts {
                    println!(
                        "{} ({}) overlaps {} ({}) by {} min",
                        c.first.title,
                        c.first.start.display_12h(),
                        c.second.title,
                        c.second.start.display_12h(),
                        c.overlap_minutes
                    );
                }
            }
        }
        ScheduleAction::Now { at, date } => {
            let state = load_state(ctx, date.unwrap_or_else(today))?;
            match state.current_block(at.unwrap_or_else(now)) {
                Some(block) => println!("{}", format_block(&block)),
                None => println!("Nothing scheduled"),
            }
        }
    }
    Ok(())
}
