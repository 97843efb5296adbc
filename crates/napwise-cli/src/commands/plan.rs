//! Evening planning for the next day.

use std::io::Read;

use chrono::NaiveDate;
use clap::Args;
use napwise_core::{plan_next_day, Appointment, ClockTime, NapPlan, PlanDraft};

use super::{parse_date, parse_time, today, CmdResult, Context};

#[derive(Args)]
pub struct PlanArgs {
    /// Target wake time (HH:MM)
    #[arg(long, value_parser = parse_time)]
    wake: Option<ClockTime>,
    /// Appointment as TITLE@START[-END][/CAREGIVER]; repeatable
    #[arg(long = "appointment", short = 'a')]
    appointments: Vec<String>,
    /// Caregivers available for nap 1 (comma-separated)
    #[arg(long, value_delimiter = ',')]
    nap1: Vec<String>,
    /// Caregivers available for nap 2 (comma-separated)
    #[arg(long, value_delimiter = ',')]
    nap2: Vec<String>,
    /// No first nap tomorrow
    #[arg(long)]
    skip_nap1: bool,
    /// No second nap tomorrow
    #[arg(long)]
    skip_nap2: bool,
    /// Brain dump, one task per line
    #[arg(long)]
    tasks: Option<String>,
    /// Read the brain dump from a file ("-" for stdin)
    #[arg(long, conflicts_with = "tasks")]
    tasks_file: Option<String>,
    /// Plan as if today were this date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
    /// Print the saved plan as JSON
    #[arg(long)]
    json: bool,
}

/// Parse `TITLE@START[-END][/CAREGIVER]`.
///
/// A value without `@` becomes an appointment with no start, which the
/// planner keeps but reports.
pub fn parse_appointment(value: &str) -> Result<Appointment, String> {
    let (rest, caregiver) = match value.rsplit_once('/') {
        Some((rest, who)) if !who.trim().is_empty() => (rest, Some(who.trim().to_string())),
        _ => (value, None),
    };
    let Some((title, times)) = rest.rsplit_once('@') else {
        return Ok(Appointment {
            title: rest.trim().to_string(),
            start: None,
            end: None,
            caregiver,
        });
    };

    let (start, end) = match times.split_once('-') {
        Some((start, end)) => (parse_time(start.trim())?, Some(parse_time(end.trim())?)),
        None => (parse_time(times.trim())?, None),
    };
    Ok(Appointment {
        title: title.trim().to_string(),
        start: Some(start),
        end,
        caregiver,
    })
}

fn read_brain_dump(args: &PlanArgs) -> std::io::Result<String> {
    match args.tasks_file.as_deref() {
        Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => std::fs::read_to_string(path),
        None => Ok(args.tasks.clone().unwrap_or_default()),
    }
}

pub fn run(args: PlanArgs, ctx: &Context) -> CmdResult {
    let (_, store) = ctx.store_for_write()?;

    let appointments = args
        .appointments
        .iter()
        .map(|a| parse_appointment(a))
        .collect::<Result<Vec<_>, _>>()?;
    let draft = PlanDraft {
        wake_target: args.wake,
        appointments,
        nap1_caregivers: args.nap1.clone(),
        nap2_caregivers: args.nap2.clone(),
        naps: NapPlan {
            nap1: !args.skip_nap1,
            nap2: !args.skip_nap2,
        },
        brain_dump: read_brain_dump(&args)?,
    };

    let summary = plan_next_day(&store, args.today.unwrap_or_else(today), &draft)?;

    for w in &summary.warnings {
        eprintln!("warning: {w}");
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let plan = &summary.plan;
    println!("Planned {}", plan.date);
    if let Some(wake) = plan.wake_target {
        println!("  wake target: {}", wake.display_12h());
    }
    for appt in &plan.appointments {
        match appt.start {
            Some(start) => println!("  {} at {}", appt.title, start.display_12h()),
            None => println!("  {} (no time)", appt.title),
        }
    }
    println!("  tasks added: {}", summary.tasks.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    #[test]
    fn appointment_with_everything() {
        let appt = parse_appointment("Pediatrician@10:30-11:15/Alex").unwrap();
        assert_eq!(appt.title, "Pediatrician");
        assert_eq!(appt.start, Some(t("10:30")));
        assert_eq!(appt.end, Some(t("11:15")));
        assert_eq!(appt.caregiver.as_deref(), Some("Alex"));
    }

    #[test]
    fn appointment_start_only() {
        let appt = parse_appointment("Swim class @ 9:00").unwrap();
        assert_eq!(appt.title, "Swim class");
        assert_eq!(appt.start, Some(t("09:00")));
        assert_eq!(appt.end, None);
        assert_eq!(appt.caregiver, None);
    }

    #[test]
    fn appointment_without_time_is_kept() {
        let appt = parse_appointment("Call daycare").unwrap();
        assert_eq!(appt.title, "Call daycare");
        assert!(!appt.is_schedulable());
    }

    #[test]
    fn bad_time_is_an_error() {
        assert!(parse_appointment("Swim@25:00").is_err());
    }
}
