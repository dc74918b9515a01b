use crate::model::template::{ChoiceOption, QuestionType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    #[default]
    Draft,
    Final,
}

/// One concrete audit session, owning its whole point tree.
///
/// `template_id` records where the instance came from. It is informational
/// only: nothing reads back into the template after derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditInstance {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    pub supplier_name: String,
    pub date: DateTime<Utc>,
    pub auditor: String,
    #[serde(default)]
    pub status: AuditStatus,
    #[serde(default)]
    pub points: Vec<InstancePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstancePoint {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub title: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub sub_questions: Vec<InstanceSubQuestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceSubQuestion {
    pub id: String,
    pub text: String,
    #[serde(flatten)]
    pub answer: Answer,
}

/// Sub-question shape together with its answer.
///
/// `answer_text` exists only on `open`, `answer_options` only on `multi`.
/// Entries of `answer_options` are option ids of the same sub-question; ids
/// that no longer match an option are kept and ignored by scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Answer {
    Open {
        #[serde(
            default,
            rename = "answerText",
            skip_serializing_if = "Option::is_none"
        )]
        answer_text: Option<String>,
    },
    Multi {
        #[serde(default)]
        options: Vec<ChoiceOption>,
        #[serde(default, rename = "answerOptions")]
        answer_options: Vec<String>,
    },
}

impl Answer {
    pub fn empty(question_type: QuestionType) -> Self {
        match question_type {
            QuestionType::Open => Answer::Open { answer_text: None },
            QuestionType::Multi => Answer::Multi {
                options: Vec::new(),
                answer_options: Vec::new(),
            },
        }
    }

    pub fn question_type(&self) -> QuestionType {
        match self {
            Answer::Open { .. } => QuestionType::Open,
            Answer::Multi { .. } => QuestionType::Multi,
        }
    }
}

impl InstanceSubQuestion {
    /// Labels of the selected options, in option order. Stale ids are skipped.
    pub fn selected_labels(&self) -> Vec<&str> {
        match &self.answer {
            Answer::Open { .. } => Vec::new(),
            Answer::Multi {
                options,
                answer_options,
            } => options
                .iter()
                .filter(|o| answer_options.contains(&o.id))
                .map(|o| o.label.as_str())
                .collect(),
        }
    }
}

impl AuditInstance {
    pub fn point(&self, point_id: &str) -> Option<&InstancePoint> {
        self.points.iter().find(|p| p.id == point_id)
    }

    pub fn point_index(&self, point_id: &str) -> Option<usize> {
        self.points.iter().position(|p| p.id == point_id)
    }

    /// Position of a sub-question as `(point index, sub-question index)`.
    pub fn sub_question_position(&self, sub_question_id: &str) -> Option<(usize, usize)> {
        self.points.iter().enumerate().find_map(|(pi, p)| {
            p.sub_questions
                .iter()
                .position(|sq| sq.id == sub_question_id)
                .map(|si| (pi, si))
        })
    }

    pub fn sub_question(&self, sub_question_id: &str) -> Option<&InstanceSubQuestion> {
        self.sub_question_position(sub_question_id)
            .map(|(pi, si)| &self.points[pi].sub_questions[si])
    }

    /// Every id in the tree: points, sub-questions and options.
    pub fn node_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        for point in &self.points {
            ids.push(point.id.as_str());
            for sq in &point.sub_questions {
                ids.push(sq.id.as_str());
                if let Answer::Multi { options, .. } = &sq.answer {
                    ids.extend(options.iter().map(|o| o.id.as_str()));
                }
            }
        }
        ids
    }
}
