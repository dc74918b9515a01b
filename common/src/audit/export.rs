use crate::audit::score::score_sub_question;
use crate::error::{AuditError, AuditResult};
use crate::model::instance::{Answer, AuditInstance};
use crate::model::template::QuestionType;

const HEADER: [&str; 8] = [
    "point_code",
    "point_title",
    "question",
    "type",
    "answer",
    "achieved",
    "maximum",
    "comment",
];

/// Renders the answers of an audit as CSV, one row per sub-question in
/// point order. Selected options are joined with `;`.
pub fn results_csv(instance: &AuditInstance) -> AuditResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(HEADER)
        .map_err(|e| AuditError::Export(e.to_string()))?;

    for point in &instance.points {
        for sq in &point.sub_questions {
            let answer = match &sq.answer {
                Answer::Open { answer_text } => answer_text.clone().unwrap_or_default(),
                Answer::Multi { .. } => sq.selected_labels().join(";"),
            };
            let (kind, achieved, maximum) = match sq.answer.question_type() {
                QuestionType::Open => ("open", String::new(), String::new()),
                QuestionType::Multi => {
                    let score = score_sub_question(sq);
                    ("multi", score.achieved.to_string(), score.maximum.to_string())
                }
            };
            writer
                .write_record([
                    point.code.as_deref().unwrap_or(""),
                    point.title.as_str(),
                    sq.text.as_str(),
                    kind,
                    answer.as_str(),
                    achieved.as_str(),
                    maximum.as_str(),
                    point.comment.as_str(),
                ])
                .map_err(|e| AuditError::Export(e.to_string()))?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AuditError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| AuditError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::capture::{AuditAction, Capabilities};
    use crate::audit::fixtures::sample_session;

    #[test]
    fn one_row_per_sub_question() {
        let (session, mut ids) = sample_session();
        let session = session
            .apply(
                &AuditAction::ToggleOption {
                    sub_question_id: "n-5".into(),
                    option_id: "n-4".into(),
                },
                Capabilities::answering(),
                &mut ids,
            )
            .unwrap()
            .apply(
                &AuditAction::SetOpenAnswer {
                    sub_question_id: "n-6".into(),
                    text: "Audit trail, \"complete\"".into(),
                },
                Capabilities::answering(),
                &mut ids,
            )
            .unwrap();

        let csv = results_csv(&session.instance).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "point_code,point_title,question,type,answer,achieved,maximum,comment"
        );
        assert_eq!(lines[1], "1,Quality management,ISO 9001 certified?,multi,Yes,2.5,2.5,");
        assert_eq!(
            lines[2],
            "1,Quality management,Observations,open,\"Audit trail, \"\"complete\"\"\",,,"
        );
    }
}
