//! Frontier Setup
//!
//! The tavern extended with two always-open actions: the marketplace and the
//! woods outside town.

use super::tavern::{tavern_actions, tavern_secondary};
use super::{action, secondary};
use crate::outcomes::{ActionDef, OutcomeTable, Requirement, TableError};

/// Tavern actions with the marketplace and the woods inserted before the
/// gated quest
pub fn frontier_actions() -> Vec<ActionDef> {
    let mut actions = tavern_actions();
    let gated_at = actions
        .iter()
        .position(|a| !a.requires.is_unconditional())
        .unwrap_or(actions.len());

    let extra = [
        action(
            "Visit Marketplace",
            Requirement::none(),
            &[
                ("Sell trinkets +12 money", 0.4),
                ("Haggle for supplies, spend 10 money", 0.3),
                ("Pickpocketed in the crowd -15 money", 0.2),
                ("Strike a rich deal +35 money", 0.1),
            ],
        ),
        action(
            "Explore Woods",
            Requirement::none(),
            &[
                ("Find a hidden cache", 0.2),
                ("Forage healing herbs +15 health", 0.3),
                ("Get lost among the trees -15 mood", 0.3),
                ("Ambushed by wolves -25 health", 0.2),
            ],
        ),
    ];
    actions.splice(gated_at..gated_at, extra);
    actions
}

pub fn frontier_table() -> Result<OutcomeTable, TableError> {
    let mut extra = tavern_secondary();
    extra.push(secondary(
        "Find a hidden cache",
        &[
            ("Ancient coins +80 money", 0.2),
            ("Rusty trinkets +15 money", 0.5),
            ("Nothing happens", 0.3),
        ],
    ));
    OutcomeTable::from_defs(frontier_actions(), extra)
}
