use crate::api::{self, segment, ApiClient};
use crate::commands::{failure_text, Outcome};
use crate::output::{self, truncate, OutputFormat};
use crate::RuleCommands;
use anyhow::{anyhow, Result};
use campus_admin_common::rules::join_conditions;
use campus_admin_common::{reconcile, Rule, RuleEditor, RuleForm, RuleUpdateRequest, Submission};
use tabled::Tabled;

#[derive(Tabled)]
pub struct RuleRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Description")]
    pub description: String,
    #[tabled(rename = "Effective Date")]
    pub effective_date: String,
    #[tabled(rename = "Conditions")]
    pub conditions: String,
}

impl From<&Rule> for RuleRow {
    fn from(r: &Rule) -> Self {
        Self {
            id: r.id.clone(),
            title: r.title.clone(),
            description: truncate(&r.description, 60),
            effective_date: r.effective_date.clone(),
            conditions: join_conditions(&r.applicable_conditions),
        }
    }
}

/// Field overrides typed on the command line
#[derive(Debug, Clone, Default)]
pub struct RuleFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub effective_date: Option<String>,
    pub conditions: Option<String>,
}

impl RuleFields {
    pub fn apply(self, form: &mut RuleForm) {
        if let Some(title) = self.title {
            form.title = title;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(effective_date) = self.effective_date {
            form.effective_date = effective_date;
        }
        if let Some(conditions) = self.conditions {
            form.conditions = conditions;
        }
    }
}

/// Rules list plus the editor that creates and updates them
#[derive(Debug, Default)]
pub struct RulesView {
    rules: Vec<Rule>,
    editor: RuleEditor,
}

impl RulesView {
    pub async fn fetch(api: &ApiClient) -> api::Result<Self> {
        let rules: Vec<Rule> = api.get("/admins/rules").await?;
        Ok(Self {
            rules,
            editor: RuleEditor::new(),
        })
    }

    pub async fn load(api: &ApiClient) -> Self {
        let spinner = output::spinner("Loading rules...");
        let result = Self::fetch(api).await;
        spinner.finish_and_clear();

        match result {
            Ok(view) => view,
            Err(e) => {
                tracing::error!(error = %e, "error fetching rules");
                output::print_warning(&format!("Could not load rules: {}", failure_text(&e)));
                Self::default()
            }
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn find(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn editor(&self) -> &RuleEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut RuleEditor {
        &mut self.editor
    }

    /// Load the rule with `id` into the editor
    pub fn begin_edit(&mut self, id: &str) -> Result<()> {
        let rule = self
            .rules
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| anyhow!("Rule '{}' not found", id))?;
        self.editor.begin_edit(rule);
        Ok(())
    }

    /// Send whatever the editor holds.
    ///
    /// On success the local list is patched and the editor goes back to
    /// Create mode. On failure the editor keeps its state.
    pub async fn submit(&mut self, api: &ApiClient, admin_name: &str) -> Outcome {
        let submission = match self.editor.submit() {
            Ok(submission) => submission,
            Err(e) => return Outcome::Invalid(e.to_string()),
        };

        match submission {
            Submission::Create(payload) => {
                match api.post::<Rule, _>("/admins/rules", &payload).await {
                    Ok(rule) => {
                        self.rules = reconcile::append(&self.rules, rule);
                        self.editor.complete();
                        Outcome::Applied
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "error creating rule");
                        Outcome::Failed(e)
                    }
                }
            }
            Submission::Update { rule_id, payload } => {
                let request = RuleUpdateRequest {
                    admin_name: admin_name.to_string(),
                    update: payload,
                };
                let path = format!("/admins/rules/{}", segment(&rule_id));

                match api.patch_empty(&path, &request).await {
                    Ok(()) => {
                        self.rules = reconcile::merge_rule(&self.rules, &rule_id, &request.update);
                        self.editor.complete();
                        Outcome::Applied
                    }
                    Err(e) => {
                        tracing::error!(rule_id, error = %e, "error updating rule");
                        Outcome::Failed(e)
                    }
                }
            }
        }
    }
}

pub async fn handle_rule_command(
    command: RuleCommands,
    api: &ApiClient,
    format: OutputFormat,
    admin_name: &str,
) -> Result<()> {
    let mut view = RulesView::load(api).await;

    match command {
        RuleCommands::List => {
            output::print_list(view.rules(), |r| RuleRow::from(r), format)?;
        }
        RuleCommands::Show { id } => {
            let rule = view
                .find(&id)
                .ok_or_else(|| anyhow!("Rule '{}' not found", id))?;
            output::print_single(rule, format)?;
        }
        RuleCommands::Create {
            title,
            description,
            effective_date,
            conditions,
        } => {
            let form = view.editor_mut().form_mut();
            form.title = title;
            form.description = description;
            form.effective_date = effective_date;
            form.conditions = conditions.unwrap_or_default();

            view.submit(api, admin_name)
                .await
                .into_result("Rule created")?;
            if let Some(rule) = view.rules().last() {
                output::print_list(std::slice::from_ref(rule), |r| RuleRow::from(r), format)?;
            }
        }
        RuleCommands::Edit {
            id,
            title,
            description,
            effective_date,
            conditions,
        } => {
            view.begin_edit(&id)?;
            RuleFields {
                title,
                description,
                effective_date,
                conditions,
            }
            .apply(view.editor_mut().form_mut());

            view.submit(api, admin_name)
                .await
                .into_result(&format!("Rule '{}' updated", id))?;
            if let Some(rule) = view.find(&id) {
                output::print_list(std::slice::from_ref(rule), |r| RuleRow::from(r), format)?;
            }
        }
    }

    Ok(())
}
