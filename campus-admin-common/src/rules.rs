//! Rule editor state machine
//!
//! The editor is either creating a new rule or editing one held by id.
//! Conditions are edited as one comma-separated string and turned back into
//! a list on submit.

use crate::{FormError, Rule, RulePayload};

/// Split an edited conditions string into trimmed, non-empty entries
pub fn split_conditions(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

/// Inverse of [`split_conditions`] for display
pub fn join_conditions(conditions: &[String]) -> String {
    conditions.join(", ")
}

/// Raw form fields, as typed by the administrator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleForm {
    pub title: String,
    pub description: String,
    pub effective_date: String,
    pub conditions: String,
}

impl RuleForm {
    pub fn from_rule(rule: &Rule) -> Self {
        Self {
            title: rule.title.clone(),
            description: rule.description.clone(),
            effective_date: rule.effective_date.clone(),
            conditions: join_conditions(&rule.applicable_conditions),
        }
    }

    /// Validate and build the request payload
    pub fn to_payload(&self) -> Result<RulePayload, FormError> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push("title");
        }
        if self.description.trim().is_empty() {
            missing.push("description");
        }
        if self.effective_date.trim().is_empty() {
            missing.push("effective_date");
        }
        if !missing.is_empty() {
            return Err(FormError::MissingFields(missing));
        }

        Ok(RulePayload {
            title: self.title.clone(),
            description: self.description.clone(),
            effective_date: self.effective_date.clone(),
            applicable_conditions: split_conditions(&self.conditions),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditorMode {
    #[default]
    Create,
    Edit { rule_id: String },
}

/// What a valid submit should send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create(RulePayload),
    Update { rule_id: String, payload: RulePayload },
}

#[derive(Debug, Clone, Default)]
pub struct RuleEditor {
    mode: EditorMode,
    form: RuleForm,
}

impl RuleEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, EditorMode::Edit { .. })
    }

    pub fn form(&self) -> &RuleForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut RuleForm {
        &mut self.form
    }

    /// Switch to Edit mode, loading `rule` into the form
    pub fn begin_edit(&mut self, rule: &Rule) {
        self.mode = EditorMode::Edit {
            rule_id: rule.id.clone(),
        };
        self.form = RuleForm::from_rule(rule);
    }

    /// Drop any edit in progress and return to an empty Create form
    pub fn cancel(&mut self) {
        self.reset();
    }

    pub fn submit(&self) -> Result<Submission, FormError> {
        let payload = self.form.to_payload()?;
        Ok(match &self.mode {
            EditorMode::Create => Submission::Create(payload),
            EditorMode::Edit { rule_id } => Submission::Update {
                rule_id: rule_id.clone(),
                payload,
            },
        })
    }

    /// Call after the backend accepted a submission
    pub fn complete(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.mode = EditorMode::Create;
        self.form = RuleForm::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> Rule {
        Rule {
            id: "r1".to_string(),
            title: "Attendance".to_string(),
            description: "Minimum attendance".to_string(),
            effective_date: "2024-03-01".to_string(),
            applicable_conditions: vec!["labs".to_string(), "lectures".to_string()],
        }
    }

    fn filled_form() -> RuleForm {
        RuleForm {
            title: "Title".to_string(),
            description: "Description".to_string(),
            effective_date: "2024-01-01".to_string(),
            conditions: " a, ,b ,, c ".to_string(),
        }
    }

    #[test]
    fn test_split_conditions_trims_and_filters() {
        assert_eq!(split_conditions(" a, ,b ,, c "), vec!["a", "b", "c"]);
        assert!(split_conditions("").is_empty());
        assert!(split_conditions(" , ").is_empty());
    }

    #[test]
    fn test_conditions_round_trip() {
        let conditions = vec![
            "first year".to_string(),
            "labs".to_string(),
            "remote students".to_string(),
        ];
        assert_eq!(split_conditions(&join_conditions(&conditions)), conditions);
    }

    #[test]
    fn test_missing_fields_block_submit() {
        let editor = RuleEditor::new();
        let err = editor.submit().unwrap_err();
        assert_eq!(
            err,
            FormError::MissingFields(vec!["title", "description", "effective_date"])
        );
    }

    #[test]
    fn test_conditions_may_be_empty() {
        let mut form = filled_form();
        form.conditions.clear();
        assert!(form.to_payload().unwrap().applicable_conditions.is_empty());
    }

    #[test]
    fn test_create_submission() {
        let mut editor = RuleEditor::new();
        *editor.form_mut() = filled_form();

        match editor.submit().unwrap() {
            Submission::Create(payload) => {
                assert_eq!(payload.title, "Title");
                assert_eq!(payload.applicable_conditions, vec!["a", "b", "c"]);
            }
            other => panic!("expected create, got {:?}", other),
        }
    }

    #[test]
    fn test_begin_edit_copies_fields() {
        let mut editor = RuleEditor::new();
        editor.begin_edit(&rule());

        assert_eq!(
            editor.mode(),
            &EditorMode::Edit {
                rule_id: "r1".to_string()
            }
        );
        assert_eq!(editor.form().title, "Attendance");
        assert_eq!(editor.form().conditions, "labs, lectures");
    }

    #[test]
    fn test_edit_submission_then_complete() {
        let mut editor = RuleEditor::new();
        editor.begin_edit(&rule());
        editor.form_mut().title = "Attendance policy".to_string();

        match editor.submit().unwrap() {
            Submission::Update { rule_id, payload } => {
                assert_eq!(rule_id, "r1");
                assert_eq!(payload.title, "Attendance policy");
                assert_eq!(payload.applicable_conditions, vec!["labs", "lectures"]);
            }
            other => panic!("expected update, got {:?}", other),
        }

        editor.complete();
        assert_eq!(editor.mode(), &EditorMode::Create);
        assert_eq!(editor.form(), &RuleForm::default());
    }

    #[test]
    fn test_cancel_returns_to_create() {
        let mut editor = RuleEditor::new();
        editor.begin_edit(&rule());
        assert!(editor.is_editing());

        editor.cancel();
        assert!(!editor.is_editing());
        assert!(editor.form().title.is_empty());
    }

    #[test]
    fn test_failed_submit_keeps_edit_state() {
        let mut editor = RuleEditor::new();
        editor.begin_edit(&rule());
        editor.form_mut().description.clear();

        assert!(editor.submit().is_err());
        assert!(editor.is_editing());
        assert_eq!(editor.form().title, "Attendance");
    }
}
