//! Shared test fixtures.

use crate::audit::derive::{AuditHeader, derive_session};
use crate::audit::session::AuditSession;
use crate::ids::SequentialIds;
use crate::model::template::{
    ChoiceOption, QuestionKind, Template, TemplatePoint, TemplateSubQuestion,
};

pub(crate) fn option(id: &str, label: &str, score: f64) -> ChoiceOption {
    ChoiceOption {
        id: id.into(),
        label: label.into(),
        score,
    }
}

/// Two points: the first with a scored `multi` and an `open` sub-question,
/// the second empty.
pub(crate) fn sample_template() -> Template {
    Template {
        id: "tpl".into(),
        name: "Supplier audit".into(),
        points: vec![
            TemplatePoint {
                id: "tp1".into(),
                code: Some("1".into()),
                title: "Quality management".into(),
                sub_questions: vec![
                    TemplateSubQuestion {
                        id: "tq1".into(),
                        text: "ISO 9001 certified?".into(),
                        kind: QuestionKind::Multi {
                            options: vec![option("to1", "No", 0.0), option("to2", "Yes", 2.5)],
                        },
                    },
                    TemplateSubQuestion {
                        id: "tq2".into(),
                        text: "Observations".into(),
                        kind: QuestionKind::Open,
                    },
                ],
            },
            TemplatePoint {
                id: "tp2".into(),
                code: None,
                title: "Logistics".into(),
                sub_questions: vec![],
            },
        ],
    }
}

/// A session derived from `sample_template` with `SequentialIds::new("n")`.
///
/// Ids: instance `n-1`, point 1 `n-2`, its multi `n-5` with options `n-3`
/// (No, 0) and `n-4` (Yes, 2.5), its open `n-6`, point 2 `n-7`.
pub(crate) fn sample_session() -> (AuditSession, SequentialIds) {
    let mut ids = SequentialIds::new("n");
    let header = AuditHeader {
        supplier_name: "ACME Metals".into(),
        auditor: "J. Ortega".into(),
        date: None,
    };
    let session = derive_session(&sample_template(), &header, &mut ids)
        .expect("sample template derives");
    (session, ids)
}
