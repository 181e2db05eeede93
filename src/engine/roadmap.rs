//! Roadmap builder: four phases, primary letter first, one secondary task per
//! phase, sized by capacity tier. Owner, deadline and metric annotations are
//! keyword lookups against the task text.

use super::types::{
    BusinessContext, CapacityTier, EpicLetter, FocusClassification, Roadmap, RoadmapPhase,
    RoadmapTask,
};

pub const DEFAULT_OWNER: &str = "Marketing Team";
pub const DEFAULT_METRIC: &str = "Progress reviewed against phase goals";

/// First match wins, so more specific keywords come first.
pub const OWNER_ROLES: &[(&str, &str)] = &[
    ("content", "Content Manager"),
    ("seo", "SEO Specialist"),
    ("partner", "Partnerships Manager"),
    ("channel", "Partnerships Manager"),
    ("integration", "Solutions Engineer"),
    ("community", "Community Manager"),
    ("advocate", "Community Manager"),
    ("event", "Events Coordinator"),
    ("onboarding", "Product Manager"),
    ("product", "Product Manager"),
    ("pricing", "Product Manager"),
    ("account", "Account Executive"),
    ("sales", "Sales Lead"),
    ("outbound", "Sales Development Lead"),
    ("campaign", "Demand Generation Manager"),
    ("ads", "Demand Generation Manager"),
    ("dashboard", "Growth Analyst"),
    ("analytics", "Growth Analyst"),
];

pub const SUCCESS_METRICS: &[(&str, &str)] = &[
    ("partner", "Active partners and partner-sourced pipeline"),
    ("account", "Target account engagement rate"),
    ("onboarding", "Activation rate within the first week"),
    ("trial", "Trial-to-paid conversion rate"),
    ("usage", "Weekly active usage per account"),
    ("content", "Organic traffic and content-driven leads"),
    ("seo", "Keyword rankings and organic sessions"),
    ("outbound", "Reply rate and meetings booked"),
    ("campaign", "Cost per qualified lead"),
    ("community", "Monthly active community members"),
    ("event", "Event attendance and follow-up meetings"),
    ("referral", "Referral-sourced signups"),
    ("advocate", "Number of active customer advocates"),
];

const DISCOVERY_KEYWORDS: &[&str] = &["audit", "define", "identify", "map", "research", "select"];
const DELIVERY_KEYWORDS: &[&str] = &["launch", "scale", "review", "measure", "publish", "expand"];

/// Canned tasks per letter and phase, most important first.
pub fn phase_tasks(letter: EpicLetter, phase: RoadmapPhase) -> &'static [&'static str; 4] {
    use EpicLetter::*;
    use RoadmapPhase::*;
    match (letter, phase) {
        (E, Days30) => &[
            "Define the ideal customer profile and select 50 target accounts",
            "Map the partner landscape and identify five integration partners",
            "Audit the current sales process for enterprise buying committees",
            "Set up account engagement tracking in the CRM",
        ],
        (E, Days60) => &[
            "Launch a personalized outreach campaign to the top 20 target accounts",
            "Sign the first two partner agreements with joint value propositions",
            "Create account-specific sales collateral for each buying role",
            "Run an executive roundtable with prospective enterprise buyers",
        ],
        (E, FirstQuarter) => &[
            "Expand the ABM program to the full target account list",
            "Launch a co-marketing campaign with signed partners",
            "Build an integration showcase page for channel partners",
            "Review account pipeline and refine account tiers",
        ],
        (E, SecondQuarter) => &[
            "Scale the partner program with tiered incentives",
            "Establish a quarterly business review cadence with key accounts",
            "Introduce a channel enablement kit for reseller sales teams",
            "Measure partner-sourced revenue against direct sales",
        ],
        (P, Days30) => &[
            "Map the onboarding journey and identify the largest drop-off step",
            "Define the activation event that predicts retention",
            "Instrument product analytics for signup, activation and usage",
            "Research competitor pricing and packaging for self-serve tiers",
        ],
        (P, Days60) => &[
            "Launch an improved onboarding checklist inside the product",
            "Introduce a free trial with upgrade prompts at usage limits",
            "Set up lifecycle emails triggered by product usage",
            "Create a product-qualified lead definition with sales",
        ],
        (P, FirstQuarter) => &[
            "Launch a freemium tier with clear upgrade paths",
            "Run pricing page experiments on trial conversion",
            "Build in-product referral loops for active users",
            "Review activation cohorts and prioritize onboarding fixes",
        ],
        (P, SecondQuarter) => &[
            "Scale self-serve expansion with usage-based upsell prompts",
            "Introduce team features that drive account-wide usage",
            "Automate product-qualified lead routing to sales",
            "Measure net revenue retention for self-serve accounts",
        ],
        (I, Days30) => &[
            "Research the top keywords and questions your buyers search for",
            "Audit existing content and website conversion paths",
            "Define lead scoring and handoff rules between marketing and sales",
            "Select one outbound segment and build a verified contact list",
        ],
        (I, Days60) => &[
            "Publish four cornerstone content pieces targeting priority keywords",
            "Launch the first outbound sequence to the selected segment",
            "Set up a demand generation dashboard for leads and pipeline",
            "Create a lead magnet for the highest-traffic content",
        ],
        (I, FirstQuarter) => &[
            "Expand the content calendar to a weekly publishing cadence",
            "Launch a paid ads campaign retargeting content visitors",
            "Optimize landing pages based on conversion data",
            "Review outbound reply rates and refresh messaging",
        ],
        (I, SecondQuarter) => &[
            "Scale winning campaign channels and cut underperformers",
            "Build an SEO content cluster around each core use case",
            "Introduce account-based outbound for high-value leads",
            "Measure pipeline contribution by channel and reallocate budget",
        ],
        (C, Days30) => &[
            "Define the community purpose and member value proposition",
            "Select a community platform and set participation guidelines",
            "Identify 20 engaged customers to invite as founding members",
            "Audit where customers already gather and talk about the problem",
        ],
        (C, Days60) => &[
            "Launch the community space with founding members",
            "Run the first monthly virtual event with a customer speaker",
            "Create a recognition program for customer advocates",
            "Set up a weekly community digest email",
        ],
        (C, FirstQuarter) => &[
            "Expand the advocate program with referral rewards",
            "Launch a user group in the two largest customer regions",
            "Publish member success stories as community content",
            "Review engagement data and prune inactive channels",
        ],
        (C, SecondQuarter) => &[
            "Scale community events into a quarterly flagship event",
            "Introduce an ambassador program with member-led sessions",
            "Integrate community signals into account health scoring",
            "Measure community-influenced pipeline and retention",
        ],
    }
}

fn budget_level(budget: Option<f64>) -> u8 {
    match budget {
        None => 1,
        Some(b) if b < 2_000.0 => 0,
        Some(b) if b < 10_000.0 => 1,
        Some(b) if b < 50_000.0 => 2,
        Some(_) => 3,
    }
}

fn team_level(team: Option<u32>) -> u8 {
    match team {
        None => 1,
        Some(t) if t <= 3 => 0,
        Some(t) if t <= 10 => 1,
        Some(t) if t < 50 => 2,
        Some(_) => 3,
    }
}

/// Capacity is limited by the scarcer of budget and team.
pub fn capacity_tier(budget: Option<f64>, team: Option<u32>) -> CapacityTier {
    match budget_level(budget).min(team_level(team)) {
        0 => CapacityTier::Constrained,
        1 => CapacityTier::Moderate,
        2 => CapacityTier::Strong,
        _ => CapacityTier::High,
    }
}

fn primary_task_count(tier: CapacityTier) -> usize {
    match tier {
        CapacityTier::Constrained => 2,
        CapacityTier::Moderate => 3,
        CapacityTier::Strong | CapacityTier::High => 4,
    }
}

fn lookup<'a>(table: &'a [(&'a str, &'a str)], text: &str, default: &'a str) -> &'a str {
    table
        .iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map(|(_, value)| *value)
        .unwrap_or(default)
}

pub fn owner_for(task: &str) -> &'static str {
    lookup(OWNER_ROLES, &task.to_lowercase(), DEFAULT_OWNER)
}

pub fn metric_for(task: &str) -> &'static str {
    lookup(SUCCESS_METRICS, &task.to_lowercase(), DEFAULT_METRIC)
}

pub fn deadline_for(task: &str, phase: RoadmapPhase) -> String {
    let text = task.to_lowercase();
    let (start, end) = phase.window();
    let span = end - start + 1;
    if DISCOVERY_KEYWORDS.iter().any(|k| text.contains(k)) {
        format!("Days {}-{}", start, start + span / 3 - 1)
    } else if DELIVERY_KEYWORDS.iter().any(|k| text.contains(k)) {
        format!("By Day {}", end)
    } else {
        format!("By Day {}", start + span / 2 - 1)
    }
}

fn annotate(task: &str, letter: EpicLetter, phase: RoadmapPhase) -> RoadmapTask {
    RoadmapTask {
        task: task.to_string(),
        owner_role: owner_for(task).to_string(),
        deadline_label: deadline_for(task, phase),
        success_metric: metric_for(task).to_string(),
        epic_component: letter,
    }
}

pub fn build_roadmap(focus: &FocusClassification, ctx: &BusinessContext) -> (CapacityTier, Roadmap) {
    let tier = capacity_tier(ctx.monthly_budget, ctx.team_size);
    let take = primary_task_count(tier);

    let mut roadmap = Roadmap::default();
    for phase in RoadmapPhase::ALL {
        let tasks = roadmap.phase_mut(phase);
        for task in phase_tasks(focus.primary, phase).iter().take(take) {
            tasks.push(annotate(task, focus.primary, phase));
        }
        let secondary = phase_tasks(focus.secondary, phase)[0];
        tasks.push(annotate(secondary, focus.secondary, phase));
    }
    (tier, roadmap)
}
