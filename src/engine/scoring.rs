//! EPIC scorer
//!
//! Fixed order: base, stage weighting, industry modifier, keyword hits,
//! cross-cutting heuristics, clamp. Weights and modifiers are held as integer
//! percentages so every intermediate value is a whole number.

use super::types::{BusinessContext, EpicLetter, EpicScores};
use serde::{Deserialize, Serialize};

pub const BASE_SCORE: i32 = 30;
pub const SCORE_MIN: i32 = 0;
pub const SCORE_MAX: i32 = 100;

/// Weight at which a stage neither adds nor removes points.
const NEUTRAL_STAGE_WEIGHT: i32 = 25;

/// Keywords that indicate an Ecosystem / ABM motion
pub const ECOSYSTEM_KEYWORDS: &[&str] = &[
    "partners",
    "ecosystem",
    "abm",
    "enterprise",
    "integration",
    "channel",
    "alliances",
    "b2b",
];

/// Keywords that indicate a product-led motion
pub const PRODUCT_KEYWORDS: &[&str] = &[
    "product-led",
    "self-serve",
    "freemium",
    "onboarding",
    "activation",
    "trial",
    "plg",
    "usage",
];

/// Keywords that indicate inbound/outbound demand generation
pub const INBOUND_KEYWORDS: &[&str] = &[
    "inbound",
    "outbound",
    "seo",
    "content",
    "demand gen",
    "leads",
    "pipeline",
    "paid ads",
];

/// Keywords that indicate a community-led motion
pub const COMMUNITY_KEYWORDS: &[&str] = &[
    "community",
    "advocates",
    "user group",
    "events",
    "forum",
    "ambassador",
    "referral",
    "word of mouth",
];

pub fn keywords_for(letter: EpicLetter) -> &'static [&'static str] {
    match letter {
        EpicLetter::E => ECOSYSTEM_KEYWORDS,
        EpicLetter::P => PRODUCT_KEYWORDS,
        EpicLetter::I => INBOUND_KEYWORDS,
        EpicLetter::C => COMMUNITY_KEYWORDS,
    }
}

/// Per-letter percentages in `E, P, I, C` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LetterPercents([i32; 4]);

impl LetterPercents {
    pub fn get(&self, letter: EpicLetter) -> i32 {
        match letter {
            EpicLetter::E => self.0[0],
            EpicLetter::P => self.0[1],
            EpicLetter::I => self.0[2],
            EpicLetter::C => self.0[3],
        }
    }
}

/// Recognized business stages. Unknown labels resolve to `MidMarket`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BusinessStage {
    PreLaunch,
    VenturePreSeed,
    VentureSeed,
    VentureSeriesA,
    VentureSeriesB,
    VentureGrowth,
    Bootstrapped,
    SmallBusiness,
    MidMarket,
    Enterprise,
}

impl BusinessStage {
    pub const ALL: [BusinessStage; 10] = [
        BusinessStage::PreLaunch,
        BusinessStage::VenturePreSeed,
        BusinessStage::VentureSeed,
        BusinessStage::VentureSeriesA,
        BusinessStage::VentureSeriesB,
        BusinessStage::VentureGrowth,
        BusinessStage::Bootstrapped,
        BusinessStage::SmallBusiness,
        BusinessStage::MidMarket,
        BusinessStage::Enterprise,
    ];

    /// Case-insensitive lookup over canonical labels and their aliases.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "pre-launch" | "prelaunch" | "idea" | "pre-revenue" => BusinessStage::PreLaunch,
            "venture-pre-seed" | "pre-seed" | "preseed" => BusinessStage::VenturePreSeed,
            "venture-seed" | "seed" => BusinessStage::VentureSeed,
            "venture-series-a" | "series-a" | "series a" => BusinessStage::VentureSeriesA,
            "venture-series-b" | "series-b" | "series b" => BusinessStage::VentureSeriesB,
            "venture-growth" | "growth" | "series-c" | "scale-up" => BusinessStage::VentureGrowth,
            "bootstrapped" => BusinessStage::Bootstrapped,
            "small-business" | "smb" => BusinessStage::SmallBusiness,
            "mid-market" | "midmarket" => BusinessStage::MidMarket,
            "enterprise" => BusinessStage::Enterprise,
            _ => BusinessStage::MidMarket,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BusinessStage::PreLaunch => "pre-launch",
            BusinessStage::VenturePreSeed => "venture-pre-seed",
            BusinessStage::VentureSeed => "venture-seed",
            BusinessStage::VentureSeriesA => "venture-series-a",
            BusinessStage::VentureSeriesB => "venture-series-b",
            BusinessStage::VentureGrowth => "venture-growth",
            BusinessStage::Bootstrapped => "bootstrapped",
            BusinessStage::SmallBusiness => "small-business",
            BusinessStage::MidMarket => "mid-market",
            BusinessStage::Enterprise => "enterprise",
        }
    }

    /// Stage weights as percentages; each row sums to 100.
    pub fn weights(self) -> LetterPercents {
        match self {
            BusinessStage::PreLaunch => LetterPercents([10, 35, 20, 35]),
            BusinessStage::VenturePreSeed => LetterPercents([10, 40, 20, 30]),
            BusinessStage::VentureSeed => LetterPercents([15, 40, 25, 20]),
            BusinessStage::VentureSeriesA => LetterPercents([30, 30, 25, 15]),
            BusinessStage::VentureSeriesB => LetterPercents([35, 25, 25, 15]),
            BusinessStage::VentureGrowth => LetterPercents([35, 20, 30, 15]),
            BusinessStage::Bootstrapped => LetterPercents([15, 30, 35, 20]),
            BusinessStage::SmallBusiness => LetterPercents([15, 20, 40, 25]),
            BusinessStage::MidMarket => LetterPercents([25, 25, 25, 25]),
            BusinessStage::Enterprise => LetterPercents([45, 15, 25, 15]),
        }
    }
}

/// Industry catalog. Names match case-sensitively; anything else is `General`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Industry {
    SaaS,
    Technology,
    ECommerce,
    Healthcare,
    FinancialServices,
    Manufacturing,
    Education,
    ProfessionalServices,
    Retail,
    Media,
    Gaming,
    General,
}

impl Industry {
    pub const ALL: [Industry; 12] = [
        Industry::SaaS,
        Industry::Technology,
        Industry::ECommerce,
        Industry::Healthcare,
        Industry::FinancialServices,
        Industry::Manufacturing,
        Industry::Education,
        Industry::ProfessionalServices,
        Industry::Retail,
        Industry::Media,
        Industry::Gaming,
        Industry::General,
    ];

    pub fn from_name(name: &str) -> Self {
        match name {
            "SaaS" => Industry::SaaS,
            "Technology" => Industry::Technology,
            "E-commerce" => Industry::ECommerce,
            "Healthcare" => Industry::Healthcare,
            "Financial Services" => Industry::FinancialServices,
            "Manufacturing" => Industry::Manufacturing,
            "Education" => Industry::Education,
            "Professional Services" => Industry::ProfessionalServices,
            "Retail" => Industry::Retail,
            "Media" => Industry::Media,
            "Gaming" => Industry::Gaming,
            _ => Industry::General,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Industry::SaaS => "SaaS",
            Industry::Technology => "Technology",
            Industry::ECommerce => "E-commerce",
            Industry::Healthcare => "Healthcare",
            Industry::FinancialServices => "Financial Services",
            Industry::Manufacturing => "Manufacturing",
            Industry::Education => "Education",
            Industry::ProfessionalServices => "Professional Services",
            Industry::Retail => "Retail",
            Industry::Media => "Media",
            Industry::Gaming => "Gaming",
            Industry::General => "General",
        }
    }

    /// Multiplicative modifiers as percentages.
    pub fn modifiers(self) -> LetterPercents {
        match self {
            Industry::SaaS => LetterPercents([110, 120, 100, 100]),
            Industry::Technology => LetterPercents([110, 115, 100, 100]),
            Industry::ECommerce => LetterPercents([90, 110, 120, 105]),
            Industry::Healthcare => LetterPercents([120, 90, 105, 100]),
            Industry::FinancialServices => LetterPercents([125, 90, 105, 95]),
            Industry::Manufacturing => LetterPercents([120, 85, 110, 90]),
            Industry::Education => LetterPercents([95, 105, 100, 120]),
            Industry::ProfessionalServices => LetterPercents([115, 85, 115, 100]),
            Industry::Retail => LetterPercents([90, 100, 120, 110]),
            Industry::Media => LetterPercents([90, 100, 115, 120]),
            Industry::Gaming => LetterPercents([85, 115, 100, 125]),
            Industry::General => LetterPercents([100, 100, 100, 100]),
        }
    }
}

/// `value * percent / 100`, rounded half away from zero, in integer arithmetic.
fn scale_percent(value: i32, percent: i32) -> i32 {
    let product = value * percent;
    if product >= 0 {
        (product + 50) / 100
    } else {
        -((-product + 50) / 100)
    }
}

/// Number of distinct keywords for `letter` present in `text`.
pub fn keyword_hits(text: &str, letter: EpicLetter) -> i32 {
    keywords_for(letter)
        .iter()
        .filter(|k| text.contains(*k))
        .count() as i32
}

/// Score a normalized context. Pure and total.
pub fn score(ctx: &BusinessContext) -> EpicScores {
    let mut scores = EpicScores::uniform(BASE_SCORE);

    let weights = ctx.stage.weights();
    for letter in EpicLetter::ALL {
        *scores.get_mut(letter) += weights.get(letter) - NEUTRAL_STAGE_WEIGHT;
    }

    let modifiers = Industry::from_name(&ctx.industry).modifiers();
    for letter in EpicLetter::ALL {
        let slot = scores.get_mut(letter);
        *slot = scale_percent(*slot, modifiers.get(letter));
    }

    for letter in EpicLetter::ALL {
        *scores.get_mut(letter) += keyword_hits(&ctx.search_text, letter);
    }

    let stage_label = ctx.business_stage.to_lowercase();
    if stage_label.contains("seed") {
        scores.p += 1;
    }
    if stage_label.contains("series") {
        scores.e += 1;
    }
    if ctx.search_text.contains("enterprise") || ctx.search_text.contains("b2b") {
        scores.e += 1;
    }
    if ctx.search_text.contains("consumer") || ctx.search_text.contains("b2c") {
        scores.p += 1;
    }

    for letter in EpicLetter::ALL {
        let slot = scores.get_mut(letter);
        *slot = (*slot).clamp(SCORE_MIN, SCORE_MAX);
    }

    tracing::debug!(
        "epic scores E={} P={} I={} C={} (stage={}, industry={})",
        scores.e,
        scores.p,
        scores.i,
        scores.c,
        ctx.stage.label(),
        ctx.industry
    );
    scores
}
