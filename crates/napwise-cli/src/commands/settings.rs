use clap::Subcommand;
use napwise_core::{parse_duration_minutes, ConstraintKind};

use super::{CmdResult, Context};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show constraints, caregivers and the child's name
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Set a constraint, e.g. "Nap 1 duration" "75 min"
    SetConstraint {
        name: String,
        value: String,
    },
    /// Add a caregiver to the roster
    AddCaregiver {
        name: String,
    },
    /// Remove a caregiver from the roster
    RemoveCaregiver {
        name: String,
    },
    /// Set the child's name
    SetChild {
        name: String,
    },
}

fn show(ctx: &Context, json: bool) -> CmdResult {
    let config = ctx.config()?;
    let settings = ctx.store(&config)?.settings()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    println!("Child: {}", settings.child_name);
    println!("Constraints:");
    for c in &settings.constraints {
        let parsed = match ConstraintKind::from_name(&c.name) {
            Some(ConstraintKind::BedtimeTarget) | None => String::new(),
            Some(_) => format!("  ({} min)", parse_duration_minutes(&c.value)),
        };
        println!("  {:<26} {}{parsed}", c.name, c.value);
    }
    if settings.caregivers.is_empty() {
        println!("Caregivers: (none)");
    } else {
        println!("Caregivers: {}", settings.caregivers.join(", "));
    }
    Ok(())
}

pub fn run(action: SettingsAction, ctx: &Context) -> CmdResult {
    let store = || ctx.store_for_write().map(|(_, store)| store);

    let message = match action {
        SettingsAction::Show { json } => return show(ctx, json),
        SettingsAction::SetConstraint { name, value } => {
            store()?.update_settings(|s| s.set_constraint(&name, &value))?;
            format!("{name} = {}", value.trim())
        }
        SettingsAction::AddCaregiver { name } => {
            if store()?.update_settings(|s| s.add_caregiver(&name))? {
                format!("Added {}", name.trim())
            } else {
                format!("{} is already a caregiver", name.trim())
            }
        }
        SettingsAction::RemoveCaregiver { name } => {
            if store()?.update_settings(|s| Ok(s.remove_caregiver(&name)))? {
                format!("Removed {}", name.trim())
            } else {
                format!("{} is not a caregiver", name.trim())
            }
        }
        SettingsAction::SetChild { name } => {
            store()?.update_settings(|s| s.set_child_name(&name))?;
            format!("Child's name set to {}", name.trim())
        }
    };
    println!("{message}");
    Ok(())
}
