//! Shared types for the consultation engine
//!
//! Everything here is constructed and discarded within a single call; nothing
//! is mutated after the pipeline stage that produced it returns.

use super::scoring::BusinessStage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire-level business context. Every field is optional and several accept
/// the aliases older clients send.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawBusinessContext {
    #[serde(default, alias = "company")]
    pub company_name: Option<String>,
    #[serde(default, alias = "market")]
    pub industry: Option<String>,
    #[serde(default, alias = "stage")]
    pub business_stage: Option<String>,
    #[serde(
        default,
        alias = "gtm_challenge",
        alias = "current_challenges",
        alias = "challenge"
    )]
    pub challenge_text: Option<String>,
    #[serde(default, alias = "description")]
    pub company_description: Option<String>,
    #[serde(
        default,
        deserialize_with = "crate::deserializers::de_option_u32_forgiving"
    )]
    pub team_size: Option<u32>,
    #[serde(default, deserialize_with = "crate::deserializers::de_option_budget")]
    pub monthly_budget: Option<f64>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "crate::deserializers::de_option_urls")]
    pub digital_presence: Option<Vec<String>>,
}

/// Normalized, total business context consumed by every downstream stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessContext {
    pub company_name: String,
    pub industry: String,
    pub business_stage: String,
    pub stage: BusinessStage,
    pub challenge_text: String,
    pub company_description: String,
    pub team_size: Option<u32>,
    pub monthly_budget: Option<f64>,
    pub digital_presence: Vec<String>,
    /// Lowercased `challenge_text company_description industry`; keyword search runs here.
    pub search_text: String,
}

/// The four EPIC dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EpicLetter {
    E,
    P,
    I,
    C,
}

impl EpicLetter {
    /// Enumeration order used for iteration and serialization.
    pub const ALL: [EpicLetter; 4] = [EpicLetter::E, EpicLetter::P, EpicLetter::I, EpicLetter::C];

    pub fn as_str(self) -> &'static str {
        match self {
            EpicLetter::E => "E",
            EpicLetter::P => "P",
            EpicLetter::I => "I",
            EpicLetter::C => "C",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EpicLetter::E => "Ecosystem / ABM",
            EpicLetter::P => "Product-led growth",
            EpicLetter::I => "Inbound / outbound demand generation",
            EpicLetter::C => "Community-led growth",
        }
    }

    /// Tie-break rank: lower wins when two letters share a score.
    pub fn tie_break_rank(self) -> u8 {
        match self {
            EpicLetter::P => 0,
            EpicLetter::E => 1,
            EpicLetter::I => 2,
            EpicLetter::C => 3,
        }
    }
}

impl fmt::Display for EpicLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score vector, each letter clamped to `[0, 100]` by the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EpicScores {
    #[serde(rename = "E")]
    pub e: i32,
    #[serde(rename = "P")]
    pub p: i32,
    #[serde(rename = "I")]
    pub i: i32,
    #[serde(rename = "C")]
    pub c: i32,
}

impl EpicScores {
    pub fn uniform(value: i32) -> Self {
        Self {
            e: value,
            p: value,
            i: value,
            c: value,
        }
    }

    pub fn get(&self, letter: EpicLetter) -> i32 {
        match letter {
            EpicLetter::E => self.e,
            EpicLetter::P => self.p,
            EpicLetter::I => self.i,
            EpicLetter::C => self.c,
        }
    }

    pub fn get_mut(&mut self, letter: EpicLetter) -> &mut i32 {
        match letter {
            EpicLetter::E => &mut self.e,
            EpicLetter::P => &mut self.p,
            EpicLetter::I => &mut self.i,
            EpicLetter::C => &mut self.c,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusClassification {
    pub primary: EpicLetter,
    pub secondary: EpicLetter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub text: String,
    pub epic_component: EpicLetter,
    pub priority: Priority,
}

/// Resource bucket derived from monthly budget and team size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapacityTier {
    Constrained,
    Moderate,
    Strong,
    High,
}

impl CapacityTier {
    pub fn as_str(self) -> &'static str {
        match self {
            CapacityTier::Constrained => "constrained",
            CapacityTier::Moderate => "moderate",
            CapacityTier::Strong => "strong",
            CapacityTier::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadmapPhase {
    Days30,
    Days60,
    FirstQuarter,
    SecondQuarter,
}

impl RoadmapPhase {
    pub const ALL: [RoadmapPhase; 4] = [
        RoadmapPhase::Days30,
        RoadmapPhase::Days60,
        RoadmapPhase::FirstQuarter,
        RoadmapPhase::SecondQuarter,
    ];

    /// Inclusive day window covered by the phase.
    pub fn window(self) -> (u32, u32) {
        match self {
            RoadmapPhase::Days30 => (1, 30),
            RoadmapPhase::Days60 => (31, 60),
            RoadmapPhase::FirstQuarter => (61, 90),
            RoadmapPhase::SecondQuarter => (91, 180),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            RoadmapPhase::Days30 => "First 30 days",
            RoadmapPhase::Days60 => "Days 31-60",
            RoadmapPhase::FirstQuarter => "Days 61-90",
            RoadmapPhase::SecondQuarter => "Days 91-180",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapTask {
    pub task: String,
    pub owner_role: String,
    pub deadline_label: String,
    pub success_metric: String,
    pub epic_component: EpicLetter,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Roadmap {
    pub days_30: Vec<RoadmapTask>,
    pub days_60: Vec<RoadmapTask>,
    pub first_quarter: Vec<RoadmapTask>,
    pub second_quarter: Vec<RoadmapTask>,
}

impl Roadmap {
    pub fn phase(&self, phase: RoadmapPhase) -> &[RoadmapTask] {
        match phase {
            RoadmapPhase::Days30 => &self.days_30,
            RoadmapPhase::Days60 => &self.days_60,
            RoadmapPhase::FirstQuarter => &self.first_quarter,
            RoadmapPhase::SecondQuarter => &self.second_quarter,
        }
    }

    pub fn phase_mut(&mut self, phase: RoadmapPhase) -> &mut Vec<RoadmapTask> {
        match phase {
            RoadmapPhase::Days30 => &mut self.days_30,
            RoadmapPhase::Days60 => &mut self.days_60,
            RoadmapPhase::FirstQuarter => &mut self.first_quarter,
            RoadmapPhase::SecondQuarter => &mut self.second_quarter,
        }
    }
}

/// Core output of [`crate::engine::compute_consultation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consultation {
    pub company_name: String,
    pub industry: String,
    pub business_stage: String,
    pub epic_scores: EpicScores,
    pub primary_focus: EpicLetter,
    pub secondary_focus: EpicLetter,
    pub capacity_tier: CapacityTier,
    pub recommendations: Vec<Recommendation>,
    pub roadmap: Roadmap,
}
