//! End-to-end properties of the consultation pipeline.

use epic_consult::compute_consultation;
use epic_consult::engine::scoring::keywords_for;
use epic_consult::engine::{
    BusinessStage, CapacityTier, EpicLetter, Industry, Priority, RawBusinessContext, RoadmapPhase,
};
use serde_json::{Value, json};

fn raw(value: Value) -> RawBusinessContext {
    serde_json::from_value(value).expect("valid business context")
}

fn sample_contexts() -> Vec<RawBusinessContext> {
    let challenges = [
        "",
        "We need better product-led growth and onboarding",
        "enterprise partnership and ABM for our B2B sales motion",
        "our community forum, events and referral program are stalling",
        "inbound leads dried up, seo and content are weak, paid ads too expensive",
        "consumer app with freemium trial and b2c usage spikes",
    ];
    let mut out = Vec::new();
    for stage in BusinessStage::ALL {
        for industry in Industry::ALL {
            for challenge in challenges {
                out.push(RawBusinessContext {
                    business_stage: Some(stage.label().to_string()),
                    industry: Some(industry.name().to_string()),
                    challenge_text: Some(challenge.to_string()),
                    ..Default::default()
                });
            }
        }
    }
    out
}

#[test]
fn scenario_product_led_seed_saas() {
    let c = compute_consultation(&raw(json!({
        "challenge_text": "We need better product-led growth and onboarding",
        "business_stage": "venture-seed",
        "industry": "SaaS"
    })));
    assert_eq!(c.epic_scores.p, 57);
    assert_eq!(
        (c.epic_scores.e, c.epic_scores.i, c.epic_scores.c),
        (22, 30, 25)
    );
    assert_eq!(c.primary_focus, EpicLetter::P);
    for letter in [EpicLetter::E, EpicLetter::I, EpicLetter::C] {
        assert!(c.epic_scores.p > c.epic_scores.get(letter));
    }
}

#[test]
fn scenario_enterprise_series_a() {
    let c = compute_consultation(&raw(json!({
        "challenge_text": "enterprise partnership and ABM for our B2B sales motion",
        "business_stage": "venture-series-a"
    })));
    assert_eq!(c.epic_scores.e, 41);
    assert_eq!(c.primary_focus, EpicLetter::E);
    assert_eq!(c.secondary_focus, EpicLetter::P);
}

#[test]
fn scenario_empty_input() {
    let c = compute_consultation(&raw(json!({})));
    for letter in EpicLetter::ALL {
        assert_eq!(c.epic_scores.get(letter), 30);
    }
    assert_eq!(c.primary_focus, EpicLetter::P);
    assert_eq!(c.secondary_focus, EpicLetter::E);
    assert_eq!(c.company_name, "Your Company");
    assert_eq!(c.industry, "General");
    assert_eq!(c.business_stage, "mid-market");
    assert_eq!(c.capacity_tier, CapacityTier::Moderate);

    assert_eq!(c.recommendations.len(), 5);
    assert!(
        c.recommendations[..3]
            .iter()
            .all(|r| r.epic_component == EpicLetter::P && r.priority == Priority::Medium)
    );
    for phase in RoadmapPhase::ALL {
        assert_eq!(c.roadmap.phase(phase).len(), 4);
    }
}

#[test]
fn scenario_constrained_capacity_never_exceeds_high() {
    let challenge = "inbound leads and content";
    let constrained = compute_consultation(&raw(json!({
        "challenge_text": challenge,
        "team_size": 2,
        "monthly_budget": "500"
    })));
    let high = compute_consultation(&raw(json!({
        "challenge_text": challenge,
        "team_size": 50,
        "monthly_budget": "100000"
    })));
    assert_eq!(constrained.primary_focus, high.primary_focus);
    assert_eq!(constrained.capacity_tier, CapacityTier::Constrained);
    assert_eq!(high.capacity_tier, CapacityTier::High);
    for phase in RoadmapPhase::ALL {
        assert_eq!(constrained.roadmap.phase(phase).len(), 3);
        assert_eq!(high.roadmap.phase(phase).len(), 5);
    }
}

#[test]
fn scenario_determinism() {
    let input = raw(json!({
        "company": "Acme Analytics",
        "market": "Technology",
        "stage": "series-b",
        "gtm_challenge": "self-serve trial activation is low and our partners want integration support",
        "team_size": "15 people",
        "monthly_budget": "$12,500"
    }));
    let a = compute_consultation(&input);
    let b = compute_consultation(&input);
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).expect("serializes"),
        serde_json::to_string(&b).expect("serializes")
    );
}

#[test]
fn aliases_map_onto_canonical_fields() {
    let aliased = compute_consultation(&raw(json!({
        "company": "Acme",
        "market": "Retail",
        "stage": "bootstrapped",
        "current_challenges": "word of mouth and referral growth"
    })));
    let canonical = compute_consultation(&raw(json!({
        "company_name": "Acme",
        "industry": "Retail",
        "business_stage": "bootstrapped",
        "challenge_text": "word of mouth and referral growth"
    })));
    assert_eq!(aliased, canonical);
}

#[test]
fn every_result_is_bounded_capped_and_complete() {
    for input in sample_contexts() {
        let c = compute_consultation(&input);
        for letter in EpicLetter::ALL {
            let s = c.epic_scores.get(letter);
            assert!((0..=100).contains(&s), "{:?} -> {}", input, s);
        }
        assert_ne!(c.primary_focus, c.secondary_focus);
        assert!(!c.recommendations.is_empty());
        assert!(c.recommendations.len() <= 8);
        for phase in RoadmapPhase::ALL {
            let n = c.roadmap.phase(phase).len();
            assert!((3..=5).contains(&n), "{:?} has {} tasks", phase, n);
        }
    }
}

#[test]
fn adding_a_keyword_never_lowers_its_letter() {
    let bases = ["", "we sell to smb owners", "community and content"];
    for letter in EpicLetter::ALL {
        for keyword in keywords_for(letter) {
            for base in bases {
                let without = compute_consultation(&RawBusinessContext {
                    challenge_text: Some(base.to_string()),
                    ..Default::default()
                });
                let with = compute_consultation(&RawBusinessContext {
                    challenge_text: Some(format!("{} {}", base, keyword)),
                    ..Default::default()
                });
                assert!(
                    with.epic_scores.get(letter) >= without.epic_scores.get(letter),
                    "{} with '{}' on '{}'",
                    letter,
                    keyword,
                    base
                );
            }
        }
    }
}

#[test]
fn unknown_labels_are_neutral() {
    let unknown = compute_consultation(&raw(json!({
        "industry": "Quantum Farming",
        "business_stage": "hyperdrive"
    })));
    for letter in EpicLetter::ALL {
        assert_eq!(unknown.epic_scores.get(letter), 30);
    }
    // labels are echoed back as given
    assert_eq!(unknown.industry, "Quantum Farming");
    assert_eq!(unknown.business_stage, "hyperdrive");
}

#[test]
fn forgiving_numeric_inputs() {
    let c = compute_consultation(&raw(json!({
        "team_size": "about 60 people",
        "monthly_budget": "$75,000"
    })));
    assert_eq!(c.capacity_tier, CapacityTier::High);

    let c = compute_consultation(&raw(json!({
        "team_size": {"unexpected": true},
        "monthly_budget": null
    })));
    assert_eq!(c.capacity_tier, CapacityTier::Moderate);
}
