//! Deriving audit instances from templates, and templates back from
//! instances.
//!
//! Both directions are explicit recursive copies: content is copied by value
//! and every node receives a fresh id from the injected generator, so no
//! instance ever shares a node with its template or with a sibling instance.

use crate::audit::session::AuditSession;
use crate::error::{AuditError, AuditResult};
use crate::ids::IdGenerator;
use crate::model::instance::{
    Answer, AuditInstance, AuditStatus, InstancePoint, InstanceSubQuestion,
};
use crate::model::template::{
    ChoiceOption, QuestionKind, Template, TemplatePoint, TemplateSubQuestion,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who is audited, by whom and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditHeader {
    pub supplier_name: String,
    pub auditor: String,
    /// Defaults to the derivation time.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// Clones `template` into a fresh draft instance.
pub fn derive_instance(
    template: &Template,
    header: &AuditHeader,
    ids: &mut dyn IdGenerator,
) -> AuditResult<AuditInstance> {
    if header.supplier_name.trim().is_empty() {
        return Err(AuditError::validation("supplier name is required"));
    }
    if header.auditor.trim().is_empty() {
        return Err(AuditError::validation("auditor is required"));
    }

    Ok(AuditInstance {
        id: ids.next_id(),
        template_id: Some(template.id.clone()),
        supplier_name: header.supplier_name.trim().to_string(),
        date: header.date.unwrap_or_else(Utc::now),
        auditor: header.auditor.trim().to_string(),
        status: AuditStatus::Draft,
        points: template
            .points
            .iter()
            .map(|point| clone_point(point, ids))
            .collect(),
    })
}

/// Derives an instance and wraps it in a session with an empty image map.
pub fn derive_session(
    template: &Template,
    header: &AuditHeader,
    ids: &mut dyn IdGenerator,
) -> AuditResult<AuditSession> {
    derive_instance(template, header, ids).map(AuditSession::new)
}

fn clone_point(point: &TemplatePoint, ids: &mut dyn IdGenerator) -> InstancePoint {
    InstancePoint {
        id: ids.next_id(),
        code: point.code.clone(),
        title: point.title.clone(),
        comment: String::new(),
        sub_questions: point
            .sub_questions
            .iter()
            .map(|sq| clone_sub_question(sq, ids))
            .collect(),
    }
}

fn clone_sub_question(
    sq: &TemplateSubQuestion,
    ids: &mut dyn IdGenerator,
) -> InstanceSubQuestion {
    let answer = match &sq.kind {
        QuestionKind::Open => Answer::Open { answer_text: None },
        QuestionKind::Multi { options } => Answer::Multi {
            options: clone_options(options, ids),
            answer_options: Vec::new(),
        },
    };
    InstanceSubQuestion {
        id: ids.next_id(),
        text: sq.text.clone(),
        answer,
    }
}

pub(crate) fn clone_options(
    options: &[ChoiceOption],
    ids: &mut dyn IdGenerator,
) -> Vec<ChoiceOption> {
    options
        .iter()
        .map(|option| ChoiceOption {
            id: ids.next_id(),
            label: option.label.clone(),
            score: option.score,
        })
        .collect()
}

/// The instance's current structure as template points: answers, comments
/// and images are dropped and every node gets a fresh id.
pub fn template_points_from_instance(
    instance: &AuditInstance,
    ids: &mut dyn IdGenerator,
) -> Vec<TemplatePoint> {
    instance
        .points
        .iter()
        .map(|point| TemplatePoint {
            id: ids.next_id(),
            code: point.code.clone(),
            title: point.title.clone(),
            sub_questions: point
                .sub_questions
                .iter()
                .map(|sq| TemplateSubQuestion {
                    id: ids.next_id(),
                    text: sq.text.clone(),
                    kind: match &sq.answer {
                        Answer::Open { .. } => QuestionKind::Open,
                        Answer::Multi { options, .. } => QuestionKind::Multi {
                            options: clone_options(options, ids),
                        },
                    },
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::fixtures::sample_template;
    use crate::ids::SequentialIds;
    use std::collections::HashSet;

    fn header() -> AuditHeader {
        AuditHeader {
            supplier_name: " ACME Metals ".into(),
            auditor: "J. Ortega".into(),
            date: None,
        }
    }

    #[test]
    fn keeps_structure_and_content() {
        let template = sample_template();
        let instance = derive_instance(&template, &header(), &mut SequentialIds::new("i")).unwrap();

        assert_eq!(instance.supplier_name, "ACME Metals");
        assert_eq!(instance.status, AuditStatus::Draft);
        assert_eq!(instance.template_id.as_deref(), Some("tpl"));
        assert_eq!(instance.points.len(), 2);
        assert_eq!(instance.points[0].code.as_deref(), Some("1"));
        assert_eq!(instance.points[0].title, "Quality management");
        assert_eq!(instance.points[0].comment, "");
        assert_eq!(instance.points[1].sub_questions.len(), 0);

        match &instance.points[0].sub_questions[0].answer {
            Answer::Multi {
                options,
                answer_options,
            } => {
                assert_eq!(options.len(), 2);
                assert_eq!(options[1].label, "Yes");
                assert_eq!(options[1].score, 2.5);
                assert!(answer_options.is_empty());
            }
            other => panic!("unexpected answer {other:?}"),
        }
        assert_eq!(
            instance.points[0].sub_questions[1].answer,
            Answer::Open { answer_text: None }
        );
    }

    #[test]
    fn ids_are_fresh_and_distinct() {
        let template = sample_template();
        let mut ids = SequentialIds::new("i");
        let a = derive_instance(&template, &header(), &mut ids).unwrap();
        let b = derive_instance(&template, &header(), &mut ids).unwrap();

        let template_ids: HashSet<&str> = template.node_ids().into_iter().collect();
        let a_ids: HashSet<&str> = a.node_ids().into_iter().collect();
        let b_ids: HashSet<&str> = b.node_ids().into_iter().collect();

        assert_eq!(a_ids.len(), a.node_ids().len());
        assert!(a_ids.is_disjoint(&template_ids));
        assert!(a_ids.is_disjoint(&b_ids));
        assert!(!a_ids.contains(a.id.as_str()));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn empty_template_yields_empty_instance() {
        let template = Template {
            id: "t".into(),
            name: "Empty".into(),
            points: vec![],
        };
        let instance = derive_instance(&template, &header(), &mut SequentialIds::new("i")).unwrap();
        assert!(instance.points.is_empty());
    }

    #[test]
    fn header_fields_are_required() {
        let template = sample_template();
        let mut missing = header();
        missing.auditor = "  ".into();
        let err = derive_instance(&template, &missing, &mut SequentialIds::new("i")).unwrap_err();
        assert_eq!(err, AuditError::validation("auditor is required"));
    }

    #[test]
    fn session_starts_without_images() {
        let session = derive_session(&sample_template(), &header(), &mut SequentialIds::new("i")).unwrap();
        assert_eq!(session.image_map.total(), 0);
        assert_eq!(session.revision, 0);
    }

    #[test]
    fn instance_structure_round_trips_to_template_points() {
        let template = sample_template();
        let mut ids = SequentialIds::new("i");
        let instance = derive_instance(&template, &header(), &mut ids).unwrap();
        let points = template_points_from_instance(&instance, &mut ids);

        assert_eq!(points.len(), template.points.len());
        match &points[0].sub_questions[0].kind {
            QuestionKind::Multi { options } => {
                let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
                assert_eq!(labels, vec!["No", "Yes"]);
            }
            other => panic!("unexpected kind {other:?}"),
        }
        assert_eq!(points[0].sub_questions[1].kind, QuestionKind::Open);
        let instance_ids: HashSet<&str> = instance.node_ids().into_iter().collect();
        for point in &points {
            assert!(!instance_ids.contains(point.id.as_str()));
        }
    }
}
