//! Progress comparison between a previous consultation and a fresh one.

use super::StoredConsultation;
use crate::engine::EpicLetter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Signed per-letter change, `current - previous`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreDeltas {
    #[serde(rename = "E")]
    pub e: i32,
    #[serde(rename = "P")]
    pub p: i32,
    #[serde(rename = "I")]
    pub i: i32,
    #[serde(rename = "C")]
    pub c: i32,
}

impl ScoreDeltas {
    pub fn get(&self, letter: EpicLetter) -> i32 {
        match letter {
            EpicLetter::E => self.e,
            EpicLetter::P => self.p,
            EpicLetter::I => self.i,
            EpicLetter::C => self.c,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub previous_consultation_id: uuid::Uuid,
    pub previous_created_at: DateTime<Utc>,
    pub days_since_previous: i64,
    pub score_deltas: ScoreDeltas,
    pub previous_primary: EpicLetter,
    pub current_primary: EpicLetter,
    pub focus_changed: bool,
    pub improved: Vec<EpicLetter>,
    pub declined: Vec<EpicLetter>,
}

pub fn compare_progress(previous: &StoredConsultation, current: &StoredConsultation) -> ProgressReport {
    let prev = &previous.consultation.epic_scores;
    let cur = &current.consultation.epic_scores;
    let score_deltas = ScoreDeltas {
        e: cur.e - prev.e,
        p: cur.p - prev.p,
        i: cur.i - prev.i,
        c: cur.c - prev.c,
    };

    let improved = EpicLetter::ALL
        .into_iter()
        .filter(|l| score_deltas.get(*l) > 0)
        .collect();
    let declined = EpicLetter::ALL
        .into_iter()
        .filter(|l| score_deltas.get(*l) < 0)
        .collect();

    let previous_primary = previous.consultation.primary_focus;
    let current_primary = current.consultation.primary_focus;

    ProgressReport {
        previous_consultation_id: previous.id,
        previous_created_at: previous.created_at,
        days_since_previous: current
            .created_at
            .signed_duration_since(previous.created_at)
            .num_days(),
        score_deltas,
        previous_primary,
        current_primary,
        focus_changed: previous_primary != current_primary,
        improved,
        declined,
    }
}
