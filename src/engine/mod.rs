//! Consultation engine: normalizer, EPIC scorer, focus classifier,
//! recommendation generator and roadmap builder.
//! Deterministic, no I/O, no shared state.

pub mod focus;
pub mod normalize;
pub mod recommendations;
pub mod roadmap;
pub mod scoring;
pub mod types;

pub use focus::classify;
pub use normalize::normalize;
pub use recommendations::recommend;
pub use roadmap::build_roadmap;
pub use scoring::{BusinessStage, Industry, score};
pub use types::{
    BusinessContext, CapacityTier, Consultation, EpicLetter, EpicScores, FocusClassification,
    Priority, RawBusinessContext, Recommendation, Roadmap, RoadmapPhase, RoadmapTask,
};

/// Run the pipeline on an already normalized context.
pub fn consult(ctx: &BusinessContext) -> Consultation {
    let epic_scores = score(ctx);
    let focus = classify(&epic_scores);
    let recommendations = recommend(&epic_scores, &focus, ctx);
    let (capacity_tier, roadmap) = build_roadmap(&focus, ctx);

    Consultation {
        company_name: ctx.company_name.clone(),
        industry: ctx.industry.clone(),
        business_stage: ctx.business_stage.clone(),
        epic_scores,
        primary_focus: focus.primary,
        secondary_focus: focus.secondary,
        capacity_tier,
        recommendations,
        roadmap,
    }
}

/// Normalize then consult. Total: every input, including an empty one, yields a full result.
pub fn compute_consultation(raw: &RawBusinessContext) -> Consultation {
    consult(&normalize(raw))
}
