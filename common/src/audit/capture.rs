//! Answer capture: every change a user can make to an audit session.
//!
//! Changes are expressed as `AuditAction` values and applied with
//! `AuditSession::apply` (returns the next state) or `apply_mut` (in place,
//! used under a lock). Each action validates all of its targets before it
//! touches anything, so a rejected action leaves the session exactly as it
//! was and does not bump the revision.

use crate::audit::session::AuditSession;
use crate::error::{AuditError, AuditResult};
use crate::ids::IdGenerator;
use crate::model::image::inline_image_mime;
use crate::model::instance::{Answer, AuditStatus, InstancePoint, InstanceSubQuestion};
use crate::model::template::{ChoiceOption, QuestionType};
use serde::{Deserialize, Serialize};

/// One step up or down in an ordered sequence; `-1` or `1` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum Direction {
    Up,
    Down,
}

impl TryFrom<i8> for Direction {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Direction::Up),
            1 => Ok(Direction::Down),
            other => Err(format!("direction must be -1 or 1, got {other}")),
        }
    }
}

impl From<Direction> for i8 {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => -1,
            Direction::Down => 1,
        }
    }
}

/// What the caller may change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Adding, removing, moving and rewording points, sub-questions and options.
    pub edit_structure: bool,
}

impl Capabilities {
    pub fn answering() -> Self {
        Self {
            edit_structure: false,
        }
    }

    pub fn admin() -> Self {
        Self {
            edit_structure: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum AuditAction {
    SetOpenAnswer {
        sub_question_id: String,
        text: String,
    },
    ToggleOption {
        sub_question_id: String,
        option_id: String,
    },
    SetComment {
        point_id: String,
        text: String,
    },
    AttachImage {
        point_id: String,
        payload: String,
    },
    RemoveImage {
        point_id: String,
        index: usize,
    },
    SetStatus {
        status: AuditStatus,
    },

    AddPoint {
        title: String,
        #[serde(default)]
        code: Option<String>,
    },
    RemovePoint {
        point_id: String,
    },
    MovePoint {
        point_id: String,
        direction: Direction,
    },
    SetPointTitle {
        point_id: String,
        title: String,
    },
    SetPointCode {
        point_id: String,
        #[serde(default)]
        code: Option<String>,
    },
    AddSubQuestion {
        point_id: String,
        text: String,
        question_type: QuestionType,
    },
    RemoveSubQuestion {
        sub_question_id: String,
    },
    MoveSubQuestion {
        sub_question_id: String,
        direction: Direction,
    },
    SetSubQuestionText {
        sub_question_id: String,
        text: String,
    },
    AddOption {
        sub_question_id: String,
        label: String,
        score: f64,
    },
    RemoveOption {
        sub_question_id: String,
        option_id: String,
    },
    SetOptionLabel {
        sub_question_id: String,
        option_id: String,
        label: String,
    },
    SetOptionScore {
        sub_question_id: String,
        option_id: String,
        score: f64,
    },
}

impl AuditAction {
    /// Whether the action changes the questionnaire rather than its answers.
    pub fn is_structural(&self) -> bool {
        !matches!(
            self,
            AuditAction::SetOpenAnswer { .. }
                | AuditAction::ToggleOption { .. }
                | AuditAction::SetComment { .. }
                | AuditAction::AttachImage { .. }
                | AuditAction::RemoveImage { .. }
                | AuditAction::SetStatus { .. }
        )
    }
}

impl AuditSession {
    /// Returns the state after `action`; `self` is not modified.
    pub fn apply(
        &self,
        action: &AuditAction,
        caps: Capabilities,
        ids: &mut dyn IdGenerator,
    ) -> AuditResult<AuditSession> {
        let mut next = self.clone();
        next.apply_mut(action, caps, ids)?;
        Ok(next)
    }

    /// Applies `action` in place and bumps the revision.
    pub fn apply_mut(
        &mut self,
        action: &AuditAction,
        caps: Capabilities,
        ids: &mut dyn IdGenerator,
    ) -> AuditResult<()> {
        if action.is_structural() && !caps.edit_structure {
            return Err(AuditError::NotPermitted(
                "editing the questionnaire structure".to_string(),
            ));
        }
        if self.instance.status == AuditStatus::Final
            && !matches!(action, AuditAction::SetStatus { .. })
        {
            return Err(AuditError::validation(
                "audit is final; set it back to draft to change it",
            ));
        }

        match action {
            AuditAction::SetOpenAnswer {
                sub_question_id,
                text,
            } => match &mut self.sub_question_mut(sub_question_id)?.answer {
                Answer::Open { answer_text } => *answer_text = Some(text.clone()),
                Answer::Multi { .. } => {
                    return Err(AuditError::validation(format!(
                        "sub-question `{sub_question_id}` is not open"
                    )));
                }
            },
            AuditAction::ToggleOption {
                sub_question_id,
                option_id,
            } => {
                let (options, selected) = self.multi_mut(sub_question_id)?;
                if !options.iter().any(|o| &o.id == option_id) {
                    return Err(AuditError::validation(format!(
                        "option `{option_id}` is not offered by `{sub_question_id}`"
                    )));
                }
                match selected.iter().position(|id| id == option_id) {
                    Some(pos) => {
                        selected.remove(pos);
                    }
                    None => selected.push(option_id.clone()),
                }
            }
            AuditAction::SetComment { point_id, text } => {
                self.point_mut(point_id)?.comment = text.clone();
            }
            AuditAction::AttachImage { point_id, payload } => {
                self.point_index(point_id)?;
                inline_image_mime(payload)?;
                self.image_map.append(point_id, payload.clone());
            }
            AuditAction::RemoveImage { point_id, index } => {
                self.point_index(point_id)?;
                if self.image_map.remove_at(point_id, *index).is_none() {
                    return Err(AuditError::validation(format!(
                        "point `{point_id}` has no image at position {index}"
                    )));
                }
            }
            AuditAction::SetStatus { status } => self.instance.status = *status,

            AuditAction::AddPoint { title, code } => {
                self.instance.points.push(InstancePoint {
                    id: ids.next_id(),
                    code: normalize_code(code),
                    title: title.clone(),
                    comment: String::new(),
                    sub_questions: Vec::new(),
                });
            }
            AuditAction::RemovePoint { point_id } => {
                let index = self.point_index(point_id)?;
                self.instance.points.remove(index);
                self.image_map.remove_point(point_id);
            }
            AuditAction::MovePoint {
                point_id,
                direction,
            } => {
                let index = self.point_index(point_id)?;
                shift(&mut self.instance.points, index, *direction);
            }
            AuditAction::SetPointTitle { point_id, title } => {
                self.point_mut(point_id)?.title = title.clone();
            }
            AuditAction::SetPointCode { point_id, code } => {
                self.point_mut(point_id)?.code = normalize_code(code);
            }
            AuditAction::AddSubQuestion {
                point_id,
                text,
                question_type,
            } => {
                let point = self.point_mut(point_id)?;
                point.sub_questions.push(InstanceSubQuestion {
                    id: ids.next_id(),
                    text: text.clone(),
                    answer: Answer::empty(*question_type),
                });
            }
            AuditAction::RemoveSubQuestion { sub_question_id } => {
                let (pi, si) = self.sub_question_position(sub_question_id)?;
                self.instance.points[pi].sub_questions.remove(si);
            }
            AuditAction::MoveSubQuestion {
                sub_question_id,
                direction,
            } => {
                let (pi, si) = self.sub_question_position(sub_question_id)?;
                shift(&mut self.instance.points[pi].sub_questions, si, *direction);
            }
            AuditAction::SetSubQuestionText {
                sub_question_id,
                text,
            } => {
                self.sub_question_mut(sub_question_id)?.text = text.clone();
            }
            AuditAction::AddOption {
                sub_question_id,
                label,
                score,
            } => {
                check_score(*score)?;
                let (options, _) = self.multi_mut(sub_question_id)?;
                options.push(ChoiceOption {
                    id: ids.next_id(),
                    label: label.clone(),
                    score: *score,
                });
            }
            AuditAction::RemoveOption {
                sub_question_id,
                option_id,
            } => {
                let (options, selected) = self.multi_mut(sub_question_id)?;
                let index = options
                    .iter()
                    .position(|o| &o.id == option_id)
                    .ok_or_else(|| AuditError::not_found(format!("option `{option_id}`")))?;
                options.remove(index);
                selected.retain(|id| id != option_id);
            }
            AuditAction::SetOptionLabel {
                sub_question_id,
                option_id,
                label,
            } => {
                self.option_mut(sub_question_id, option_id)?.label = label.clone();
            }
            AuditAction::SetOptionScore {
                sub_question_id,
                option_id,
                score,
            } => {
                check_score(*score)?;
                self.option_mut(sub_question_id, option_id)?.score = *score;
            }
        }

        self.revision += 1;
        Ok(())
    }

    fn point_index(&self, point_id: &str) -> AuditResult<usize> {
        self.instance
            .point_index(point_id)
            .ok_or_else(|| AuditError::not_found(format!("point `{point_id}`")))
    }

    fn point_mut(&mut self, point_id: &str) -> AuditResult<&mut InstancePoint> {
        let index = self.point_index(point_id)?;
        Ok(&mut self.instance.points[index])
    }

    fn sub_question_position(&self, sub_question_id: &str) -> AuditResult<(usize, usize)> {
        self.instance
            .sub_question_position(sub_question_id)
            .ok_or_else(|| AuditError::not_found(format!("sub-question `{sub_question_id}`")))
    }

    fn sub_question_mut(
        &mut self,
        sub_question_id: &str,
    ) -> AuditResult<&mut InstanceSubQuestion> {
        let (pi, si) = self.sub_question_position(sub_question_id)?;
        Ok(&mut self.instance.points[pi].sub_questions[si])
    }

    fn multi_mut(
        &mut self,
        sub_question_id: &str,
    ) -> AuditResult<(&mut Vec<ChoiceOption>, &mut Vec<String>)> {
        match &mut self.sub_question_mut(sub_question_id)?.answer {
            Answer::Multi {
                options,
                answer_options,
            } => Ok((options, answer_options)),
            Answer::Open { .. } => Err(AuditError::validation(format!(
                "sub-question `{sub_question_id}` has no options"
            ))),
        }
    }

    fn option_mut(
        &mut self,
        sub_question_id: &str,
        option_id: &str,
    ) -> AuditResult<&mut ChoiceOption> {
        let (options, _) = self.multi_mut(sub_question_id)?;
        options
            .iter_mut()
            .find(|o| o.id == option_id)
            .ok_or_else(|| AuditError::not_found(format!("option `{option_id}`")))
    }
}

/// Swaps the item at `index` with its neighbour. Out-of-range moves do nothing.
fn shift<T>(items: &mut [T], index: usize, direction: Direction) {
    let target = match direction {
        Direction::Up => index.checked_sub(1),
        Direction::Down => Some(index + 1).filter(|&t| t < items.len()),
    };
    if let Some(target) = target {
        items.swap(index, target);
    }
}

fn normalize_code(code: &Option<String>) -> Option<String> {
    code.as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

fn check_score(score: f64) -> AuditResult<()> {
    if score.is_finite() {
        Ok(())
    } else {
        Err(AuditError::validation("option score must be a finite number"))
    }
}
