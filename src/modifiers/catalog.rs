//! Modifier rules and the standard shop catalog

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::modifiers::context::{RoundSummary, ScoreContext, Timing};

/// Every scoring rule a modifier can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModifierRule {
    // === PER DIE ===
    /// Doubles a die that rolled exactly `face`
    DoubleOnFace { face: u32 },
    /// Doubles odd rolls
    DoubleOdd,
    /// Rolls at or above `high` double, rolls at or below `low` score nothing
    HighLow { high: u32, low: u32 },

    // === AFTER THROW ===
    /// Adds a flat amount to the throw
    FlatBonus { amount: u32 },
    /// Multiplies the throw when no two scoring dice match
    AllUnique { multiplier: u32 },
    /// Multiplies the throw by `base` once per rolled 1
    OnesPower { base: u32 },
    /// Throw gains `percent_per_pip` percent per pip of the highest die
    HighestDie { percent_per_pip: u32 },
    /// Adds a bonus per group of matching values
    MatchingRuns { pair: u32, triple: u32, quad: u32 },
    /// Scales the throw to `base_percent`, shifted by `percent_per_throw`
    /// for every throw after the first
    ///
    /// Positive steps reward later throws, negative steps punish them.
    ThrowScaled { base_percent: i32, percent_per_throw: i32 },
    /// Flat bonus when every scoring die is at least `minimum`
    AllAtLeast { minimum: u32, bonus: u32 },
    /// Leaves the score alone; pays currency from goal surplus at round end
    SurplusInterest { per: u32, cap: u32 },
}

impl ModifierRule {
    pub fn timing(&self) -> Timing {
        match self {
            Self::DoubleOnFace { .. } | Self::DoubleOdd | Self::HighLow { .. } => Timing::PerDie,
            _ => Timing::AfterThrow,
        }
    }

    /// Whether equipping this rule subscribes it to round-end notifications
    pub fn has_round_end_hook(&self) -> bool {
        matches!(self, Self::SurplusInterest { .. })
    }

    /// Transform the score for one invocation
    pub fn apply(&self, ctx: &ScoreContext<'_>) -> u32 {
        let score = ctx.current_score;
        match *self {
            Self::DoubleOnFace { face } => {
                if ctx.original_value == face {
                    score.saturating_mul(2)
                } else {
                    score
                }
            }
            Self::DoubleOdd => {
                if ctx.original_value % 2 == 1 {
                    score.saturating_mul(2)
                } else {
                    score
                }
            }
            Self::HighLow { high, low } => {
                if ctx.original_value >= high {
                    score.saturating_mul(2)
                } else if ctx.original_value <= low {
                    0
                } else {
                    score
                }
            }
            Self::FlatBonus { amount } => score.saturating_add(amount),
            Self::AllUnique { multiplier } => {
                let distinct: AHashSet<u32> = ctx.values.iter().copied().collect();
                if ctx.values.len() >= 2 && distinct.len() == ctx.values.len() {
                    score.saturating_mul(multiplier)
                } else {
                    score
                }
            }
            Self::OnesPower { base } => {
                let ones = ctx.values.iter().filter(|&&v| v == 1).count() as u32;
                score.saturating_mul(base.saturating_pow(ones))
            }
            Self::HighestDie { percent_per_pip } => match ctx.values.iter().max() {
                Some(&highest) => scale_percent(score, 100 + percent_per_pip as i64 * highest as i64),
                None => score,
            },
            Self::MatchingRuns { pair, triple, quad } => {
                score.saturating_add(matching_run_bonus(ctx.values, pair, triple, quad))
            }
            Self::ThrowScaled { base_percent, percent_per_throw } => {
                let later = ctx.info.throw_number.saturating_sub(1) as i64;
                scale_percent(score, base_percent as i64 + percent_per_throw as i64 * later)
            }
            Self::AllAtLeast { minimum, bonus } => {
                if !ctx.values.is_empty() && ctx.values.iter().all(|&v| v >= minimum) {
                    score.saturating_add(bonus)
                } else {
                    score
                }
            }
            Self::SurplusInterest { .. } => score,
        }
    }

    /// Currency paid when a round ends, for rules with a round-end hook
    pub fn round_end_award(&self, summary: &RoundSummary) -> Option<u32> {
        match *self {
            Self::SurplusInterest { per, cap } if per > 0 => {
                Some((summary.surplus() / per).min(cap))
            }
            Self::SurplusInterest { .. } => Some(0),
            _ => None,
        }
    }
}

/// Floor of `score * percent / 100`, never negative
fn scale_percent(score: u32, percent: i64) -> u32 {
    let scaled = score as i64 * percent.max(0) / 100;
    scaled.clamp(0, u32::MAX as i64) as u32
}

/// Bonus from grouping values by equality
fn matching_run_bonus(values: &[u32], pair: u32, triple: u32, quad: u32) -> u32 {
    let mut groups: AHashMap<u32, usize> = AHashMap::new();
    for &v in values {
        *groups.entry(v).or_insert(0) += 1;
    }
    groups
        .values()
        .map(|&count| match count {
            0 | 1 => 0,
            2 => pair,
            3 => triple,
            _ => quad,
        })
        .fold(0u32, |acc, b| acc.saturating_add(b))
}

/// A purchasable, equip-able modifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub cost: u32,
    pub rule: ModifierRule,
}

impl ModifierDefinition {
    pub fn new(id: &str, name: &str, description: &str, cost: u32, rule: ModifierRule) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            cost,
            rule,
        }
    }

    pub fn timing(&self) -> Timing {
        self.rule.timing()
    }
}

/// Modifiers offered by the shop
#[derive(Debug, Clone, Default)]
pub struct ModifierCatalog {
    definitions: Vec<ModifierDefinition>,
}

impl ModifierCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn standard() -> Self {
        use ModifierRule::*;
        let definitions = vec![
            ModifierDefinition::new("lucky_six", "Lucky Six", "Sixes score double", 4, DoubleOnFace { face: 6 }),
            ModifierDefinition::new("odd_fellow", "Odd Fellow", "Odd rolls score double", 6, DoubleOdd),
            ModifierDefinition::new("all_or_nothing", "All or Nothing", "5+ doubles, 2 or less scores 0", 5, HighLow { high: 5, low: 2 }),
            ModifierDefinition::new("steady_hand", "Steady Hand", "+5 to every throw", 3, FlatBonus { amount: 5 }),
            ModifierDefinition::new("rainbow", "Rainbow", "x3 when no two dice match", 6, AllUnique { multiplier: 3 }),
            ModifierDefinition::new("snake_eyes", "Snake Eyes", "x2 for every 1 rolled", 5, OnesPower { base: 2 }),
            ModifierDefinition::new("high_roller", "High Roller", "+10% per pip of the highest die", 5, HighestDie { percent_per_pip: 10 }),
            ModifierDefinition::new("full_house", "Full House", "+3 per pair, +8 per triple, +15 per four of a kind", 6, MatchingRuns { pair: 3, triple: 8, quad: 15 }),
            ModifierDefinition::new("late_bloomer", "Late Bloomer", "+50% per throw after the first", 5, ThrowScaled { base_percent: 100, percent_per_throw: 50 }),
            ModifierDefinition::new("first_strike", "First Strike", "x2 on the first throw, 50% less each throw after", 4, ThrowScaled { base_percent: 200, percent_per_throw: -50 }),
            ModifierDefinition::new("no_weak_links", "No Weak Links", "+12 when every die shows 3 or more", 5, AllAtLeast { minimum: 3, bonus: 12 }),
            ModifierDefinition::new("interest", "Interest", "Earn 1 per 5 points over the goal (max 5)", 6, SurplusInterest { per: 5, cap: 5 }),
        ];
        Self { definitions }
    }

    pub fn all(&self) -> &[ModifierDefinition] {
        &self.definitions
    }

    pub fn get(&self, id: &str) -> Option<&ModifierDefinition> {
        self.definitions.iter().find(|d| d.id == id)
    }
}
