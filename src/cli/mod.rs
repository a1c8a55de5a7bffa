//! Terminal front end for the `shoplist` binary

pub mod admin;
pub mod catalog;
pub mod item;
pub mod open;
pub mod view;

use crate::command::{Cycle, Outcome};

/// Print what happened, then the redrawn list if anything changed
pub(crate) fn report(cycle: &Cycle, filter: Option<&str>) {
    match &cycle.outcome {
        Outcome::Idle { .. } => {}
        Outcome::Applied { message, .. } => println!("✅ {}", message),
        Outcome::Rejected { reason, .. } => println!("⚠️  {}", reason),
        Outcome::Stale { id, .. } => {
            println!("Item {} is no longer on the list, nothing changed.", id)
        }
    }

    if cycle.outcome.needs_render() {
        println!();
        view::render(&cycle.view, filter);
    }
}
