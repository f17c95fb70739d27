//! Outcome Effects
//!
//! Machine-readable state deltas attached to outcomes, plus the ordered
//! phrase table used to tag outcomes authored as plain text.

use serde::{Deserialize, Serialize};

/// Numeric resource an effect touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Health,
    Money,
    Mood,
}

/// State change carried by an outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    /// Explicit no-op
    #[default]
    Nothing,
    /// Additive delta
    Adjust { resource: Resource, amount: f64 },
    /// Multiplicative delta ("lose half your money")
    Scale { resource: Resource, factor: f64 },
    /// Health drops to zero regardless of its current value
    Die,
}

impl Effect {
    pub const fn adjust(resource: Resource, amount: f64) -> Self {
        Effect::Adjust { resource, amount }
    }

    pub const fn scale(resource: Resource, factor: f64) -> Self {
        Effect::Scale { resource, factor }
    }

    /// Tags free text with the first matching rule, or `Nothing`.
    pub fn from_text(text: &str) -> Self {
        EFFECT_RULES
            .iter()
            .find(|rule| text.contains(rule.trigger))
            .map(|rule| rule.effect)
            .unwrap_or(Effect::Nothing)
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Effect::Die)
    }

    /// False when an amount or factor is NaN or infinite
    pub fn is_finite(&self) -> bool {
        match *self {
            Effect::Adjust { amount, .. } => amount.is_finite(),
            Effect::Scale { factor, .. } => factor.is_finite(),
            Effect::Nothing | Effect::Die => true,
        }
    }
}

/// A trigger phrase and the effect it stands for
#[derive(Debug, Clone, Copy)]
pub struct EffectRule {
    pub trigger: &'static str,
    pub effect: Effect,
}

const fn rule(trigger: &'static str, effect: Effect) -> EffectRule {
    EffectRule { trigger, effect }
}

use Resource::{Health, Money, Mood};

/// Ordered rule table. First match wins, so order is part of the contract:
/// mood, then health, then money, then the special markers.
pub const EFFECT_RULES: &[EffectRule] = &[
    rule("+5 mood", Effect::adjust(Mood, 5.0)),
    rule("+10 mood", Effect::adjust(Mood, 10.0)),
    rule("+15 mood", Effect::adjust(Mood, 15.0)),
    rule("+20 mood", Effect::adjust(Mood, 20.0)),
    rule("-5 mood", Effect::adjust(Mood, -5.0)),
    rule("-10 mood", Effect::adjust(Mood, -10.0)),
    rule("-15 mood", Effect::adjust(Mood, -15.0)),
    rule("-20 mood", Effect::adjust(Mood, -20.0)),
    rule("+10 health", Effect::adjust(Health, 10.0)),
    rule("+15 health", Effect::adjust(Health, 15.0)),
    rule("+20 health", Effect::adjust(Health, 20.0)),
    rule("+25 health", Effect::adjust(Health, 25.0)),
    rule("-10 health", Effect::adjust(Health, -10.0)),
    rule("-15 health", Effect::adjust(Health, -15.0)),
    rule("-20 health", Effect::adjust(Health, -20.0)),
    rule("-25 health", Effect::adjust(Health, -25.0)),
    rule("-30 health", Effect::adjust(Health, -30.0)),
    rule("-35 health", Effect::adjust(Health, -35.0)),
    rule("Lose 0.2 health", Effect::adjust(Health, -20.0)),
    rule("+10 money", Effect::adjust(Money, 10.0)),
    rule("+12 money", Effect::adjust(Money, 12.0)),
    rule("+15 money", Effect::adjust(Money, 15.0)),
    rule("+20 money", Effect::adjust(Money, 20.0)),
    rule("+25 money", Effect::adjust(Money, 25.0)),
    rule("+30 money", Effect::adjust(Money, 30.0)),
    rule("+35 money", Effect::adjust(Money, 35.0)),
    rule("+40 money", Effect::adjust(Money, 40.0)),
    rule("+50 money", Effect::adjust(Money, 50.0)),
    rule("+80 money", Effect::adjust(Money, 80.0)),
    rule("-10 money", Effect::adjust(Money, -10.0)),
    rule("-15 money", Effect::adjust(Money, -15.0)),
    rule("-20 money", Effect::adjust(Money, -20.0)),
    rule("-25 money", Effect::adjust(Money, -25.0)),
    rule("-30 money", Effect::adjust(Money, -30.0)),
    rule("Lose 0.5 money", Effect::scale(Money, 0.5)),
    rule("spend 5 money", Effect::adjust(Money, -5.0)),
    rule("spend 10 money", Effect::adjust(Money, -10.0)),
    rule("spend 15 money", Effect::adjust(Money, -15.0)),
    rule("spend 20 money", Effect::adjust(Money, -20.0)),
    rule("Die", Effect::Die),
    rule("Nothing happens", Effect::Nothing),
];
