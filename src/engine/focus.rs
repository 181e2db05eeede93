//! Focus classification: primary/secondary EPIC letters from a score vector.
//!
//! Ties on score resolve by the fixed priority P > E > I > C.

use super::types::{EpicLetter, EpicScores, FocusClassification};

/// All four letters ordered by score descending, ties by priority.
pub fn rank(scores: &EpicScores) -> [EpicLetter; 4] {
    let mut letters = EpicLetter::ALL;
    letters.sort_by(|a, b| {
        scores
            .get(*b)
            .cmp(&scores.get(*a))
            .then_with(|| a.tie_break_rank().cmp(&b.tie_break_rank()))
    });
    letters
}

pub fn classify(scores: &EpicScores) -> FocusClassification {
    let ranked = rank(scores);
    FocusClassification {
        primary: ranked[0],
        secondary: ranked[1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highest_score_wins() {
        let scores = EpicScores {
            e: 10,
            p: 20,
            i: 80,
            c: 40,
        };
        let focus = classify(&scores);
        assert_eq!(focus.primary, EpicLetter::I);
        assert_eq!(focus.secondary, EpicLetter::C);
    }

    #[test]
    fn test_full_tie_prefers_p_then_e() {
        let focus = classify(&EpicScores::uniform(30));
        assert_eq!(focus.primary, EpicLetter::P);
        assert_eq!(focus.secondary, EpicLetter::E);
    }

    #[test]
    fn test_all_zero_still_distinct() {
        let focus = classify(&EpicScores::uniform(0));
        assert_ne!(focus.primary, focus.secondary);
    }

    #[test]
    fn test_tie_for_second_place() {
        let scores = EpicScores {
            e: 40,
            p: 50,
            i: 40,
            c: 40,
        };
        let focus = classify(&scores);
        assert_eq!(focus.primary, EpicLetter::P);
        assert_eq!(focus.secondary, EpicLetter::E);

        let scores = EpicScores {
            e: 10,
            p: 10,
            i: 60,
            c: 60,
        };
        assert_eq!(
            rank(&scores),
            [EpicLetter::I, EpicLetter::C, EpicLetter::P, EpicLetter::E]
        );
    }
}
