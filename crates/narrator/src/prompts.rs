//! Prompt construction.
//!
//! Each oracle call gets a prompt built from the character's current state
//! and memory. Wording is free to change; the response formats requested
//! here are what [`crate::parse`] expects.

use tavern_core::CharacterState;

/// Describes how far the character trusts its advisor
pub fn trust_tier(trust: f64) -> &'static str {
    if trust < 30.0 {
        "You barely know this person and you're unsure whether to trust them."
    } else if trust < 70.0 {
        "You somewhat trust this person and consider their intentions fair."
    } else {
        "You strongly trust this person and value their guidance."
    }
}

/// One word for the character's spirits
pub fn mood_word(mood: f64) -> &'static str {
    if mood > 60.0 {
        "optimistic"
    } else if mood < 40.0 {
        "troubled"
    } else {
        "steady"
    }
}

fn trait_list(character: &CharacterState) -> String {
    character.traits().collect::<Vec<_>>().join(", ")
}

/// Prompt asking which action to take today
pub fn decision_prompt(
    character: &CharacterState,
    available: &[&str],
    advice: Option<&str>,
) -> String {
    let previous = if character.is_first_morning() {
        String::new()
    } else {
        format!("Yesterday's journal: {}", character.last_report())
    };

    let advice_section = match advice {
        Some(text) if !text.trim().is_empty() => format!(
            "Someone offers you advice: \"{}\"\nTrust Level: {:.1}/100. {}\nConsider the advice only if it aligns with your needs.\n",
            text.trim(),
            character.trust(),
            trust_tier(character.trust())
        ),
        _ => String::new(),
    };

    let memory = character.memory();
    let example = available.first().copied().unwrap_or_default();

    format!(
        r#"You are {name}, a {traits} adventurer.

CURRENT STATE (Day {day}):
- Health: {health:.1}/100
- Money: {money:.1} gold
- Mood: {mood:.1}/100
- Trust Toward Advisor: {trust:.1}/100

{previous}

GOALS: {goals}
RECENT HISTORY:
{history}

{advice_section}
AVAILABLE ACTIONS: {actions}

DECISION FRAMEWORK:
- Health < 40: Avoid danger, prioritize survival
- Money < 50: Seek profitable opportunities
- Mood < 40: Seek enjoyment to maintain morale
- Advice is only considered when someone speaks AND trust is high

Respond EXACTLY like this:
REASONING: [One sentence]
ACTION: {example}
"#,
        name = character.name(),
        traits = trait_list(character),
        day = character.current_day(),
        health = character.health(),
        money = character.money(),
        mood = character.mood(),
        trust = character.trust(),
        goals = memory.goals().join(", "),
        history = memory.summarize(),
        actions = available.join(", "),
    )
}

fn recent_event_list(character: &CharacterState) -> String {
    let events = character.memory().recent_events();
    if events.is_empty() {
        return "- None yet".to_string();
    }
    events
        .iter()
        .map(|event| format!("- {}", event))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt asking for today's journal entry.
///
/// The short-term window gives the narrator the last few raw events.
pub fn narration_prompt(character: &CharacterState, action: &str, outcome: &str) -> String {
    format!(
        r#"Write a brief (2-3 sentence) journal entry for {name}.

CONTEXT:
- Day {day} in the Year of the Golden Anvil
- Action taken: {action}
- What happened: {outcome}
- Current state: {health:.0} health, {money:.0} gold, feeling {feeling}

RECENT EVENTS:
{recent}

PREVIOUS ENTRY: {previous}

STYLE GUIDELINES:
- Write in first person as {name}
- Maintain a medieval fantasy tone
- Reference the actual outcome; do not invent stats
- Connect to the previous entry if relevant
"#,
        name = character.name(),
        day = character.current_day(),
        health = character.health(),
        money = character.money(),
        feeling = mood_word(character.mood()),
        recent = recent_event_list(character),
        previous = character.last_report(),
    )
}

/// Prompt asking for the overnight mood shift
pub fn mood_prompt(character: &CharacterState) -> String {
    format!(
        "{name} currently has health {health:.1}, money {money:.1}, mood {mood:.1}, trust {trust:.1}.\n\
         Yesterday's report: {report}\n\
         Based on the events, how should mood adjust (-10 to +10)? Respond with a single integer.\n",
        name = character.name(),
        health = character.health(),
        money = character.money(),
        mood = character.mood(),
        trust = character.trust(),
        report = character.last_report(),
    )
}

/// Prompt asking the character to revisit its goals
pub fn reflection_prompt(character: &CharacterState) -> String {
    let memory = character.memory();
    format!(
        r#"You are {name}, reflecting on your recent adventures and memories:
{history}
Current goals: {goals}.
Based on your experiences, suggest any goal or mindset adjustments (if any).
Respond as JSON: {{ "goals": [...], "reflection": "<short text>" }}
"#,
        name = character.name(),
        history = memory.summarize(),
        goals = memory.goals().join(", "),
    )
}
