use chrono::NaiveDate;
use clap::Subcommand;
use napwise_core::{AppState, ClockTime, NapSlot, SpaceStore};

use super::{now, parse_date, parse_time, today, CmdResult, Context};

#[derive(Subcommand)]
pub enum LogAction {
    /// Record the actual wake time
    Wake {
        /// Time (HH:MM), default now
        #[arg(value_parser = parse_time)]
        time: Option<ClockTime>,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Record when a nap started
    NapStart {
        /// Nap number (1 or 2)
        nap: u8,
        #[arg(value_parser = parse_time)]
        time: Option<ClockTime>,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Record when a nap ended
    NapEnd {
        nap: u8,
        #[arg(value_parser = parse_time)]
        time: Option<ClockTime>,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Forget a nap's recorded times
    ClearNap {
        nap: u8,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Show the day's log
    Show {
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(long)]
        json: bool,
    },
}

fn show_time(t: Option<ClockTime>) -> String {
    t.map(ClockTime::display_12h).unwrap_or_else(|| "-".to_string())
}

fn show(ctx: &Context, date: Option<NaiveDate>, json: bool) -> CmdResult {
    let config = ctx.config()?;
    let store = ctx.store(&config)?;
    let log = store.log_or_new(date.unwrap_or_else(today))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&log)?);
        return Ok(());
    }

    println!("{}", log.date);
    println!("  woke:  {}", show_time(log.actual_wake));
    for slot in [NapSlot::Nap1, NapSlot::Nap2] {
        let nap = log.naps.get(slot);
        println!(
            "  {}: {} to {}",
            slot.title(),
            show_time(nap.and_then(|n| n.start)),
            show_time(nap.and_then(|n| n.end))
        );
    }
    Ok(())
}

/// Load the day for a recording command, after the access check.
fn open_day(
    ctx: &Context,
    date: Option<NaiveDate>,
) -> Result<(SpaceStore, AppState), Box<dyn std::error::Error>> {
    let (_, store) = ctx.store_for_write()?;
    let state = AppState::load(&store, date.unwrap_or_else(today))?;
    Ok((store, state))
}

pub fn run(action: LogAction, ctx: &Context) -> CmdResult {
    match action {
        LogAction::Show { date, json } => return show(ctx, date, json),
        LogAction::Wake { time, date } => {
            let (store, mut state) = open_day(ctx, date)?;
            let at = time.unwrap_or_else(now);
            state.record_wake(&store, at)?;
            println!("Woke at {}", at.display_12h());
        }
        LogAction::NapStart { nap, time, date } => {
            let slot = NapSlot::from_number(nap)?;
            let (store, mut state) = open_day(ctx, date)?;
            let at = time.unwrap_or_else(now);
            state.record_nap_start(&store, slot, at)?;
            println!("{} started at {}", slot.title(), at.display_12h());
        }
        LogAction::NapEnd { nap, time, date } => {
            let slot = NapSlot::from_number(nap)?;
            let (store, mut state) = open_day(ctx, date)?;
            let at = time.unwrap_or_else(now);
            state.record_nap_end(&store, slot, at)?;
            println!("{} ended at {}", slot.title(), at.display_12h());
        }
        LogAction::ClearNap { nap, date } => {
            let slot = NapSlot::from_number(nap)?;
            let (store, mut state) = open_day(ctx, date)?;
            state.clear_nap(&store, slot)?;
            println!("{} cleared", slot.title());
        }
    }
    Ok(())
}
