use chrono::NaiveDate;
use clap::Subcommand;
use napwise_core::integrations::{export_day, GoogleCalendarExporter, KeyringTokenSource};
use napwise_core::AppState;

use super::{parse_date, today, CmdResult, Context};

#[derive(Subcommand)]
pub enum CalendarAction {
    /// Store a calendar access token in the OS keyring
    Connect {
        /// OAuth access token with calendar.events scope
        #[arg(long)]
        token: String,
    },
    /// Remove the stored token
    Disconnect,
    /// Show whether a token is stored and where events go
    Status,
    /// Send the day's schedule to the calendar, replacing an earlier export
    Export {
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
}

pub fn run(action: CalendarAction, ctx: &Context) -> CmdResult {
    match action {
        CalendarAction::Connect { token } => {
            ctx.authorize(&ctx.config()?)?;
            KeyringTokenSource::store(token.trim())?;
            println!("Calendar connected");
        }
        CalendarAction::Disconnect => {
            ctx.authorize(&ctx.config()?)?;
            KeyringTokenSource::clear()?;
            println!("Calendar disconnected");
        }
        CalendarAction::Status => {
            let config = ctx.config()?;
            let state = if KeyringTokenSource::is_connected() {
                "connected"
            } else {
                "not connected"
            };
            println!("{state}");
            println!("calendar: {}", config.calendar.calendar_id);
            println!("time zone: {}", config.calendar.time_zone);
        }
        CalendarAction::Export { date } => {
            let (config, store) = ctx.store_for_write()?;
            let date = date.unwrap_or_else(today);
            let blocks = AppState::load(&store, date)?.schedule();
            let exporter = GoogleCalendarExporter::new(&config.calendar, KeyringTokenSource);

            let rt = tokio::runtime::Runtime::new()?;
            let report = rt.block_on(export_day(&exporter, &store, date, &blocks))?;
            if report.removed > 0 {
                println!("Removed {} earlier event(s)", report.removed);
            }
            println!("Exported {} event(s) for {date}", report.created.len());
        }
    }
    Ok(())
}
