//! Scoring of `multi` sub-questions.
//!
//! Per sub-question, `achieved` is the sum of the selected options' scores
//! and `maximum` is the single best option score. With several options
//! selected, `achieved` can therefore exceed `maximum`; the totals report
//! that as it is and are never clamped or rounded.

use crate::model::instance::{Answer, AuditInstance, InstancePoint, InstanceSubQuestion};
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub achieved: f64,
    pub maximum: f64,
}

impl Score {
    /// `achieved / maximum`, or `None` when nothing can be scored.
    pub fn ratio(&self) -> Option<f64> {
        (self.maximum != 0.0).then(|| self.achieved / self.maximum)
    }
}

impl AddAssign for Score {
    fn add_assign(&mut self, rhs: Self) {
        self.achieved += rhs.achieved;
        self.maximum += rhs.maximum;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointScore {
    pub point_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub title: String,
    #[serde(flatten)]
    pub score: Score,
}

/// Total score plus the per-point breakdown, in point order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub total: Score,
    pub points: Vec<PointScore>,
}

impl ScoreReport {
    pub fn for_instance(instance: &AuditInstance) -> Self {
        let points = score_by_point(instance);
        let mut total = Score::default();
        for point in &points {
            total += point.score;
        }
        Self { total, points }
    }
}

/// Score of one sub-question. `open` contributes nothing; selected ids that
/// match no current option contribute nothing either.
pub fn score_sub_question(sq: &InstanceSubQuestion) -> Score {
    match &sq.answer {
        Answer::Open { .. } => Score::default(),
        Answer::Multi {
            options,
            answer_options,
        } => Score {
            achieved: options
                .iter()
                .filter(|o| answer_options.contains(&o.id))
                .map(|o| o.score)
                .sum(),
            maximum: options.iter().map(|o| o.score).reduce(f64::max).unwrap_or(0.0),
        },
    }
}

pub fn score_point(point: &InstancePoint) -> Score {
    let mut score = Score::default();
    for sq in &point.sub_questions {
        score += score_sub_question(sq);
    }
    score
}

pub fn score(instance: &AuditInstance) -> Score {
    let mut score = Score::default();
    for point in &instance.points {
        score += score_point(point);
    }
    score
}

pub fn score_by_point(instance: &AuditInstance) -> Vec<PointScore> {
    instance
        .points
        .iter()
        .map(|point| PointScore {
            point_id: point.id.clone(),
            code: point.code.clone(),
            title: point.title.clone(),
            score: score_point(point),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::fixtures::{option, sample_session};
    use crate::model::instance::AuditStatus;
    use chrono::Utc;

    fn instance_with(sub_questions: Vec<InstanceSubQuestion>) -> AuditInstance {
        AuditInstance {
            id: "a".into(),
            template_id: None,
            supplier_name: "S".into(),
            date: Utc::now(),
            auditor: "A".into(),
            status: AuditStatus::Draft,
            points: vec![InstancePoint {
                id: "p".into(),
                code: None,
                title: "P".into(),
                comment: String::new(),
                sub_questions,
            }],
        }
    }

    fn multi(selected: &[&str]) -> InstanceSubQuestion {
        InstanceSubQuestion {
            id: "q".into(),
            text: "Q".into(),
            answer: Answer::Multi {
                options: vec![option("A", "a", 1.0), option("B", "b", 2.0)],
                answer_options: selected.iter().map(|s| s.to_string()).collect(),
            },
        }
    }

    #[test]
    fn single_selection() {
        let s = score(&instance_with(vec![multi(&["A"])]));
        assert_eq!(s, Score { achieved: 1.0, maximum: 2.0 });
        assert_eq!(s.ratio(), Some(0.5));
    }

    #[test]
    fn multiple_selections_sum_past_the_maximum() {
        let s = score(&instance_with(vec![multi(&["A", "B"])]));
        assert_eq!(s, Score { achieved: 3.0, maximum: 2.0 });
    }

    #[test]
    fn open_questions_do_not_count() {
        let open = InstanceSubQuestion {
            id: "o".into(),
            text: "Notes".into(),
            answer: Answer::Open {
                answer_text: Some("plenty".into()),
            },
        };
        let s = score(&instance_with(vec![open]));
        assert_eq!(s, Score::default());
        assert_eq!(s.ratio(), None);
    }

    #[test]
    fn multi_without_options_scores_zero() {
        let empty = InstanceSubQuestion {
            id: "q".into(),
            text: "Q".into(),
            answer: Answer::Multi {
                options: vec![],
                answer_options: vec!["A".into(), "ghost".into()],
            },
        };
        assert_eq!(score(&instance_with(vec![empty])), Score::default());
    }

    #[test]
    fn stale_selections_are_ignored() {
        let s = score(&instance_with(vec![multi(&["ghost", "B"])]));
        assert_eq!(s, Score { achieved: 2.0, maximum: 2.0 });
    }

    #[test]
    fn fractional_scores_are_not_rounded() {
        let sq = InstanceSubQuestion {
            id: "q".into(),
            text: "Q".into(),
            answer: Answer::Multi {
                options: vec![option("A", "a", 0.5), option("B", "b", 1.5)],
                answer_options: vec!["A".into()],
            },
        };
        assert_eq!(
            score(&instance_with(vec![sq])),
            Score { achieved: 0.5, maximum: 1.5 }
        );
    }

    #[test]
    fn report_totals_match_points() {
        let (session, _) = sample_session();
        let report = ScoreReport::for_instance(&session.instance);
        assert_eq!(report.points.len(), 2);
        assert_eq!(report.points[0].score.maximum, 2.5);
        assert_eq!(report.points[1].score, Score::default());
        assert_eq!(report.total, score(&session.instance));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["points"][0]["maximum"], 2.5);
        assert_eq!(json["points"][0]["pointId"], "n-2");
    }
}
