//! Recommendation generator
//!
//! Generation order is the output order: qualifying letters in rank order,
//! then industry entries, then truncation. Nothing is re-sorted afterwards.

use super::focus::rank;
use super::scoring::Industry;
use super::types::{
    BusinessContext, EpicLetter, EpicScores, FocusClassification, Priority, Recommendation,
};

pub const HIGH_CONFIDENCE_THRESHOLD: i32 = 70;
pub const MAX_RECOMMENDATIONS: usize = 8;
pub const MAX_INDUSTRY_RECOMMENDATIONS: usize = 2;

pub fn letter_recommendations(letter: EpicLetter) -> &'static [&'static str; 3] {
    match letter {
        EpicLetter::E => &[
            "Build a target account list of 50 named enterprise accounts and run a coordinated ABM program against it",
            "Launch a partner program with two or three integration partners who already sell to your buyers",
            "Package a co-marketing offer for channel partners, including joint case studies and referral fees",
        ],
        EpicLetter::P => &[
            "Instrument the product to measure time-to-value and remove the biggest onboarding drop-off",
            "Introduce a free trial or freemium tier with clear in-product upgrade prompts",
            "Add product-qualified lead scoring so sales engages accounts showing high usage",
        ],
        EpicLetter::I => &[
            "Publish a weekly content cadence built around the three problems your buyers search for most",
            "Stand up an outbound sequence for your best-fit segment with personalized first touches",
            "Build a demand generation dashboard tracking leads, pipeline and cost per opportunity",
        ],
        EpicLetter::C => &[
            "Launch a customer community space and seed it with weekly expert sessions",
            "Recruit a founding group of customer advocates with early access and recognition",
            "Run a quarterly virtual event series that turns members into referral sources",
        ],
    }
}

/// Industry entries: (text, letter). `General` and unknown industries share the generic triad.
pub fn industry_recommendations(industry: Industry) -> &'static [(&'static str, EpicLetter)] {
    match industry {
        Industry::SaaS => &[
            ("Publish a public integrations marketplace to widen the SaaS ecosystem", EpicLetter::E),
            ("Benchmark trial-to-paid conversion against SaaS medians and set a quarterly target", EpicLetter::P),
        ],
        Industry::Technology => &[
            ("Create technical documentation that doubles as top-of-funnel content for developers", EpicLetter::I),
            ("Open a developer forum so early adopters can answer each other's questions", EpicLetter::C),
        ],
        Industry::ECommerce => &[
            ("Launch a post-purchase referral incentive to lower customer acquisition cost", EpicLetter::C),
            ("Optimize product pages for search to capture high-intent shoppers", EpicLetter::I),
        ],
        Industry::Healthcare => &[
            ("Partner with provider networks and associations to reach clinical decision makers", EpicLetter::E),
            ("Publish compliance-focused content that answers security and privacy objections early", EpicLetter::I),
        ],
        Industry::FinancialServices => &[
            ("Develop referral relationships with advisors, accountants and banking partners", EpicLetter::E),
            ("Produce trust-building educational content on regulation and risk", EpicLetter::I),
        ],
        Industry::Manufacturing => &[
            ("Work with distributors and system integrators as a channel into plant operations", EpicLetter::E),
            ("Exhibit at one targeted trade show and follow up with account-based outreach", EpicLetter::I),
        ],
        Industry::Education => &[
            ("Build an educator ambassador program that shares lesson plans and success stories", EpicLetter::C),
            ("Offer a free classroom tier that converts to district-wide licenses", EpicLetter::P),
        ],
        Industry::ProfessionalServices => &[
            ("Publish thought leadership and case studies that showcase measurable client outcomes", EpicLetter::I),
            ("Form referral alliances with complementary firms serving the same clients", EpicLetter::E),
        ],
        Industry::Retail => &[
            ("Run a loyalty program that rewards reviews and referrals", EpicLetter::C),
            ("Coordinate local search and paid social campaigns around seasonal demand", EpicLetter::I),
        ],
        Industry::Media => &[
            ("Grow an owned audience through newsletters and member-only community perks", EpicLetter::C),
            ("Syndicate content through partner publications to expand reach", EpicLetter::I),
        ],
        Industry::Gaming => &[
            ("Invest in creator and streamer partnerships that seed player communities", EpicLetter::C),
            ("Use a free-to-play entry point with clear progression-based upgrades", EpicLetter::P),
        ],
        Industry::General => GENERIC_RECOMMENDATIONS,
    }
}

pub const GENERIC_RECOMMENDATIONS: &[(&str, EpicLetter)] = &[
    ("Document your ideal customer profile and align sales and marketing on it", EpicLetter::I),
    ("Interview ten recent customers to learn which channel actually drove their purchase", EpicLetter::C),
    ("Set one north-star growth metric and review it weekly with the whole team", EpicLetter::P),
];

pub fn recommend(
    scores: &EpicScores,
    focus: &FocusClassification,
    ctx: &BusinessContext,
) -> Vec<Recommendation> {
    let mut out: Vec<Recommendation> = Vec::new();

    let push_letter = |out: &mut Vec<Recommendation>, letter: EpicLetter, priority: Priority| {
        for text in letter_recommendations(letter) {
            if out.iter().any(|r| r.text == *text) {
                continue;
            }
            out.push(Recommendation {
                text: (*text).to_string(),
                epic_component: letter,
                priority,
            });
        }
    };

    for letter in rank(scores) {
        if scores.get(letter) >= HIGH_CONFIDENCE_THRESHOLD {
            push_letter(&mut out, letter, Priority::High);
        }
    }
    if out.is_empty() {
        push_letter(&mut out, focus.primary, Priority::Medium);
    }

    let industry = Industry::from_name(&ctx.industry);
    for (text, letter) in industry_recommendations(industry)
        .iter()
        .take(MAX_INDUSTRY_RECOMMENDATIONS)
    {
        out.push(Recommendation {
            text: (*text).to_string(),
            epic_component: *letter,
            priority: Priority::Medium,
        });
    }

    out.truncate(MAX_RECOMMENDATIONS);
    out
}
