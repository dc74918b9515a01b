use crate::error::{AuditError, AuditResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A reusable, unanswered audit questionnaire.
///
/// The order of `points` is the display and export order. A template never
/// holds answers; those live on the instances derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub points: Vec<TemplatePoint>,
}

/// A top-level topic of a questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePoint {
    pub id: String,
    /// Optional short label such as `"4.1"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub title: String,
    #[serde(default)]
    pub sub_questions: Vec<TemplateSubQuestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSubQuestion {
    pub id: String,
    pub text: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

/// Shape of a sub-question, tagged on the wire by `"type"`.
///
/// Only `multi` carries options, so an `open` sub-question with options
/// cannot be represented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QuestionKind {
    Open,
    Multi {
        #[serde(default)]
        options: Vec<ChoiceOption>,
    },
}

/// Plain discriminant of `QuestionKind`, used where no options are involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Open,
    Multi,
}

/// One selectable choice of a `multi` sub-question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub id: String,
    pub label: String,
    pub score: f64,
}

impl QuestionKind {
    pub fn question_type(&self) -> QuestionType {
        match self {
            QuestionKind::Open => QuestionType::Open,
            QuestionKind::Multi { .. } => QuestionType::Multi,
        }
    }
}

/// Fields accepted when creating a template. The store assigns an id when
/// `id` is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDraft {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub points: Vec<TemplatePoint>,
}

/// Fields replaced by an update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub points: Option<Vec<TemplatePoint>>,
}

impl Template {
    /// Every id in the tree: points, sub-questions and options.
    pub fn node_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        for point in &self.points {
            ids.push(point.id.as_str());
            for sq in &point.sub_questions {
                ids.push(sq.id.as_str());
                if let QuestionKind::Multi { options } = &sq.kind {
                    ids.extend(options.iter().map(|o| o.id.as_str()));
                }
            }
        }
        ids
    }

    pub fn apply_update(&mut self, update: TemplateUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(points) = update.points {
            self.points = points;
        }
    }
}

/// Checks the fields a template needs before it can be saved.
pub fn validate_template(name: &str, points: &[TemplatePoint]) -> AuditResult<()> {
    if name.trim().is_empty() {
        return Err(AuditError::validation("template name is required"));
    }

    let mut seen = HashSet::new();
    let mut unique = |id: &str| -> AuditResult<()> {
        if id.trim().is_empty() {
            return Err(AuditError::validation("every node needs an id"));
        }
        if !seen.insert(id.to_string()) {
            return Err(AuditError::validation(format!("duplicate id `{id}`")));
        }
        Ok(())
    };

    for point in points {
        unique(&point.id)?;
        if point.title.trim().is_empty() {
            return Err(AuditError::validation(format!(
                "point `{}` needs a title",
                point.id
            )));
        }
        for sq in &point.sub_questions {
            unique(&sq.id)?;
            if sq.text.trim().is_empty() {
                return Err(AuditError::validation(format!(
                    "sub-question `{}` needs a text",
                    sq.id
                )));
            }
            if let QuestionKind::Multi { options } = &sq.kind {
                for option in options {
                    unique(&option.id)?;
                    if option.label.trim().is_empty() {
                        return Err(AuditError::validation(format!(
                            "option `{}` needs a label",
                            option.id
                        )));
                    }
                    if !option.score.is_finite() {
                        return Err(AuditError::validation(format!(
                            "option `{}` has a non-finite score",
                            option.id
                        )));
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn point(id: &str, title: &str) -> TemplatePoint {
        TemplatePoint {
            id: id.into(),
            code: None,
            title: title.into(),
            sub_questions: vec![],
        }
    }

    #[test]
    fn reads_tagged_sub_questions() {
        let template: Template = serde_json::from_value(json!({
            "id": "t1",
            "name": "Supplier audit",
            "points": [{
                "id": "p1",
                "code": "1",
                "title": "Quality system",
                "subQuestions": [
                    { "id": "q1", "text": "Certified?", "type": "multi",
                      "options": [{ "id": "o1", "label": "Yes", "score": 2 }] },
                    { "id": "q2", "text": "Notes", "type": "open" }
                ]
            }]
        }))
        .unwrap();

        let sqs = &template.points[0].sub_questions;
        assert_eq!(sqs[0].kind.question_type(), QuestionType::Multi);
        assert_eq!(sqs[1].kind, QuestionKind::Open);
        assert_eq!(template.node_ids(), vec!["p1", "q1", "o1", "q2"]);
    }

    #[test]
    fn open_sub_question_drops_options_on_read() {
        let sq: TemplateSubQuestion = serde_json::from_value(json!({
            "id": "q", "text": "Why?", "type": "open",
            "options": [{ "id": "o", "label": "x", "score": 1 }]
        }))
        .unwrap();
        assert_eq!(sq.kind, QuestionKind::Open);

        let written = serde_json::to_value(&sq).unwrap();
        assert!(written.get("options").is_none());
        assert_eq!(written["type"], "open");
    }

    #[test]
    fn multi_without_options_is_valid() {
        let sq: TemplateSubQuestion =
            serde_json::from_value(json!({ "id": "q", "text": "Pick", "type": "multi" })).unwrap();
        assert_eq!(sq.kind, QuestionKind::Multi { options: vec![] });
    }

    #[test]
    fn validation_requires_name_and_titles() {
        assert!(matches!(
            validate_template("  ", &[]),
            Err(AuditError::Validation(_))
        ));
        assert!(matches!(
            validate_template("ok", &[point("p1", "")]),
            Err(AuditError::Validation(_))
        ));
        assert!(validate_template("ok", &[point("p1", "Scope")]).is_ok());
    }

    #[test]
    fn validation_rejects_duplicate_ids() {
        let points = vec![point("p1", "A"), point("p1", "B")];
        let err = validate_template("ok", &points).unwrap_err();
        assert_eq!(err, AuditError::validation("duplicate id `p1`"));
    }

    #[test]
    fn update_keeps_absent_fields() {
        let mut template = Template {
            id: "t".into(),
            name: "Old".into(),
            points: vec![point("p1", "A")],
        };
        template.apply_update(TemplateUpdate {
            name: Some("New".into()),
            points: None,
        });
        assert_eq!(template.name, "New");
        assert_eq!(template.points.len(), 1);
    }
}
