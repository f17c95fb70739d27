//! Tavern Setup
//!
//! The tavern: three actions and five secondary lotteries.

use super::{action, secondary};
use crate::outcomes::{ActionDef, OutcomeTable, Requirement, SecondaryDef, TableError};

/// Primary actions, unconditional ones first
pub fn tavern_actions() -> Vec<ActionDef> {
    vec![
        action(
            "Chat with Keeper",
            Requirement::none(),
            &[
                ("Keeper encourages you (+10 mood)", 0.5),
                ("Keeper discourages you (-10 mood)", 0.15),
                ("Receive a gift from Keeper", 0.3),
                ("Fight the Keeper", 0.05),
            ],
        ),
        action(
            "Get Drunk",
            Requirement::none(),
            &[
                ("Lose 0.5 money", 0.4),
                ("Lose 0.2 health", 0.4),
                ("Gain +20 mood", 0.2),
            ],
        ),
        action(
            "Accept a Quest",
            Requirement::mood_and_health_above(50.0, 60.0),
            &[
                ("Fight a Dragon", 0.1),
                ("Defend a Caravan", 0.7),
                ("Clean the Hero Statue", 0.2),
            ],
        ),
    ]
}

pub fn tavern_secondary() -> Vec<SecondaryDef> {
    vec![
        // === KEEPER ===
        secondary(
            "Receive a gift from Keeper",
            &[("+20 money", 0.5), ("Health potion +10 health", 0.5)],
        ),
        secondary(
            "Fight the Keeper",
            &[("+10 money", 0.1), ("Nothing happens", 0.3), ("-20 health", 0.6)],
        ),
        // === QUESTS ===
        secondary(
            "Fight a Dragon",
            &[
                ("Slay the dragon +50 money", 0.5),
                ("Die -100 health", 0.1),
                ("Retreat -30 health", 0.4),
            ],
        ),
        secondary(
            "Defend a Caravan",
            &[
                ("Protect the caravan +20 money", 0.5),
                ("Abandon caravan -10 health", 0.5),
            ],
        ),
        secondary(
            "Clean the Hero Statue",
            &[
                ("Cleaned +10 money", 0.9),
                ("Blessed by the statue +10 health", 0.1),
            ],
        ),
    ]
}

/// The default table
pub fn tavern_table() -> Result<OutcomeTable, TableError> {
    OutcomeTable::from_defs(tavern_actions(), tavern_secondary())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcomes::{Effect, Resource};

    #[test]
    fn test_tavern_table_shape() {
        let table = tavern_table().unwrap();

        assert_eq!(
            table.action_names().collect::<Vec<_>>(),
            vec!["Chat with Keeper", "Get Drunk", "Accept a Quest"]
        );
        assert_eq!(table.secondary_count(), 5);
        assert!(table.is_secondary_trigger("Fight a Dragon"));
        assert!(!table.is_secondary_trigger("Lose 0.5 money"));
    }

    #[test]
    fn test_tavern_effects_tagged_at_build() {
        let table = tavern_table().unwrap();

        let drunk = table.action("Get Drunk").unwrap().lottery.outcomes();
        assert_eq!(drunk[0].effect, Effect::scale(Resource::Money, 0.5));
        assert_eq!(drunk[1].effect, Effect::adjust(Resource::Health, -20.0));
        assert_eq!(drunk[2].effect, Effect::adjust(Resource::Mood, 20.0));

        let dragon = table.secondary("Fight a Dragon").unwrap().outcomes();
        assert_eq!(dragon[1].effect, Effect::Die);

        let gift = table.action("Chat with Keeper").unwrap().lottery.outcomes();
        assert_eq!(gift[2].effect, Effect::Nothing);
    }

    #[test]
    fn test_quest_is_gated() {
        let table = tavern_table().unwrap();
        let quest = table.action("Accept a Quest").unwrap();
        assert!(!quest.requires.is_unconditional());
        assert!(table.action("Get Drunk").unwrap().requires.is_unconditional());
    }
}
