//! Clip Ranking Projection
//!
//! Projects the ranked clip set into list rows with score tiers. The clip
//! slice is assumed pre-ranked (best first); this projection never reorders.

use serde::{Deserialize, Serialize};

use crate::core::clips::Clip;
use crate::core::views::format_time;
use crate::core::ClipId;

// =============================================================================
// Score Tiers
// =============================================================================

/// Qualitative score band shown next to each clip
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreTier {
    Excellent,
    VeryGood,
    Good,
}

impl ScoreTier {
    /// Thresholds: `>= 0.9` Excellent, `>= 0.8` Very Good, otherwise Good
    pub fn from_score(score: f64) -> Self {
        if score >= 0.9 {
            ScoreTier::Excellent
        } else if score >= 0.8 {
            ScoreTier::VeryGood
        } else {
            ScoreTier::Good
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreTier::Excellent => "Excellent",
            ScoreTier::VeryGood => "Very good",
            ScoreTier::Good => "Good",
        }
    }
}

// =============================================================================
// View Model
// =============================================================================

/// One row in the ranking list
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedClipRow {
    pub clip_id: ClipId,
    /// 1-based position in the ranking
    pub rank: usize,
    /// Interval rendered as `m:ss - m:ss`
    pub time_range: String,
    /// Score rendered as a whole percentage
    pub score_pct: u8,
    pub tier: ScoreTier,
    pub reason: String,
    pub selected: bool,
}

/// Render-ready ranking panel
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RankingViewModel {
    /// Analysis is still running
    Analyzing,
    /// Analysis finished with no clips (or has not run)
    Empty,
    /// Ranked rows, best first
    Ranked { rows: Vec<RankedClipRow> },
}

impl RankingViewModel {
    /// Builds the ranking projection from pre-ranked clips.
    pub fn project(clips: &[Clip], analyzing: bool, selected: Option<&ClipId>) -> Self {
        if analyzing {
            return RankingViewModel::Analyzing;
        }
        if clips.is_empty() {
            return RankingViewModel::Empty;
        }

        let rows = clips
            .iter()
            .enumerate()
            .map(|(index, clip)| RankedClipRow {
                clip_id: clip.id.clone(),
                rank: index + 1,
                time_range: format!(
                    "{} - {}",
                    format_time(clip.start_sec),
                    format_time(clip.end_sec)
                ),
                score_pct: (clip.score * 100.0).round() as u8,
                tier: ScoreTier::from_score(clip.score),
                reason: clip.reason.clone(),
                selected: selected == Some(&clip.id),
            })
            .collect();

        RankingViewModel::Ranked { rows }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(start: f64, end: f64, score: f64, reason: &str) -> Clip {
        Clip::new(start, end, score, reason).unwrap()
    }

    #[test]
    fn test_analyzing_state_wins() {
        let clips = vec![clip(5.0, 15.0, 0.95, "peak")];
        let view = RankingViewModel::project(&clips, true, None);
        assert_eq!(view, RankingViewModel::Analyzing);
    }

    #[test]
    fn test_empty_state() {
        let view = RankingViewModel::project(&[], false, None);
        assert_eq!(view, RankingViewModel::Empty);
    }

    #[test]
    fn test_rows_follow_input_order() {
        let clips = vec![
            clip(5.0, 15.0, 0.95, "a"),
            clip(67.0, 78.0, 0.92, "b"),
            clip(32.0, 45.0, 0.88, "c"),
        ];
        let view = RankingViewModel::project(&clips, false, None);

        let RankingViewModel::Ranked { rows } = view else {
            panic!("expected ranked view");
        };
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].score_pct, 95);
        assert_eq!(rows[2].rank, 3);
        assert_eq!(rows[2].reason, "c");
    }

    #[test]
    fn test_score_tiers() {
        assert_eq!(ScoreTier::from_score(0.95), ScoreTier::Excellent);
        assert_eq!(ScoreTier::from_score(0.9), ScoreTier::Excellent);
        assert_eq!(ScoreTier::from_score(0.88), ScoreTier::VeryGood);
        assert_eq!(ScoreTier::from_score(0.8), ScoreTier::VeryGood);
        assert_eq!(ScoreTier::from_score(0.79), ScoreTier::Good);
    }

    #[test]
    fn test_time_range_format() {
        let clips = vec![clip(67.0, 78.0, 0.92, "b")];
        let view = RankingViewModel::project(&clips, false, None);

        let RankingViewModel::Ranked { rows } = view else {
            panic!("expected ranked view");
        };
        assert_eq!(rows[0].time_range, "1:07 - 1:18");
    }

    #[test]
    fn test_selected_row_flag() {
        let clips = vec![clip(5.0, 15.0, 0.95, "a"), clip(67.0, 78.0, 0.92, "b")];
        let selected = clips[1].id.clone();
        let view = RankingViewModel::project(&clips, false, Some(&selected));

        let RankingViewModel::Ranked { rows } = view else {
            panic!("expected ranked view");
        };
        assert!(!rows[0].selected);
        assert!(rows[1].selected);
    }
}
