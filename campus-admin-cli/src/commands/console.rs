///! Interactive console keeping the users and rules views in memory

use crate::api::ApiClient;
use crate::commands::rules::{RuleRow, RulesView};
use crate::commands::users::UsersView;
use crate::commands::Outcome;
use crate::confirm::Confirm;
use crate::output::{self, format_activeness};
use anyhow::{anyhow, Result};
use campus_admin_common::{CourseRole, RuleForm};
use dialoguer::{Input, Select};

#[derive(Debug, Clone, Copy)]
enum Action {
    ShowUsers,
    ToggleLock,
    ChangeRole,
    ShowRules,
    CreateRule,
    EditRule,
    Refresh,
    Quit,
}

impl Action {
    const ALL: [Action; 8] = [
        Action::ShowUsers,
        Action::ToggleLock,
        Action::ChangeRole,
        Action::ShowRules,
        Action::CreateRule,
        Action::EditRule,
        Action::Refresh,
        Action::Quit,
    ];

    fn label(&self) -> &'static str {
        match self {
            Action::ShowUsers => "Show users",
            Action::ToggleLock => "Block / unblock a user",
            Action::ChangeRole => "Change a course role",
            Action::ShowRules => "Show rules",
            Action::CreateRule => "Create a rule",
            Action::EditRule => "Edit a rule",
            Action::Refresh => "Refresh from server",
            Action::Quit => "Quit",
        }
    }
}

/// Menu pick; `None` when the user escapes
fn pick<T: ToString>(prompt: &str, items: &[T]) -> Result<Option<usize>> {
    if items.is_empty() {
        output::print_info("Nothing to choose from");
        return Ok(None);
    }
    Ok(Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact_opt()?)
}

fn ask(prompt: &str, initial: &str) -> Result<String> {
    Ok(Input::<String>::new()
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()?)
}

/// Prompt for every rule field, starting from what the form holds
fn fill_form(form: &mut RuleForm) -> Result<()> {
    form.title = ask("Title", &form.title)?;
    form.description = ask("Description", &form.description)?;
    form.effective_date = ask("Effective date (YYYY-MM-DD)", &form.effective_date)?;
    form.conditions = ask("Conditions (comma-separated)", &form.conditions)?;
    Ok(())
}

/// Flip the lock of the user at `index`; returns the outcome and the requested state
async fn toggle_lock(
    users: &mut UsersView,
    api: &ApiClient,
    confirm: &dyn Confirm,
    index: usize,
) -> Result<(Outcome, bool)> {
    let user = users
        .users()
        .get(index)
        .ok_or_else(|| anyhow!("No user at position {}", index))?;
    let (uuid, locked) = (user.uuid.clone(), !user.account_locked_by_admins);

    let outcome = users.set_lock(api, confirm, &uuid, locked).await?;
    Ok((outcome, locked))
}

/// Set `role` on the `course_index`-th enrollment of the `user_index`-th user
async fn change_role(
    users: &mut UsersView,
    api: &ApiClient,
    confirm: &dyn Confirm,
    user_index: usize,
    course_index: usize,
    role: CourseRole,
) -> Result<Outcome> {
    let user = users
        .users()
        .get(user_index)
        .ok_or_else(|| anyhow!("No user at position {}", user_index))?;
    let enrollment = user
        .enrollments
        .get(course_index)
        .ok_or_else(|| anyhow!("{} has no enrollment at position {}", user.name, course_index))?;
    let (uuid, course_id) = (user.uuid.clone(), enrollment.course.id.clone());

    users.set_role(api, confirm, &uuid, &course_id, role).await
}

pub async fn run_console(api: &ApiClient, confirm: &dyn Confirm, admin_name: &str) -> Result<()> {
    let mut users = UsersView::load(api).await;
    let mut rules = RulesView::load(api).await;

    loop {
        let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();
        let action = match pick("What would you like to do?", &labels)? {
            Some(index) => Action::ALL[index],
            None => Action::Quit,
        };

        match action {
            Action::ShowUsers => output::print_table(users.rows()),

            Action::ToggleLock => {
                let names: Vec<String> = users
                    .users()
                    .iter()
                    .map(|u| format!("{} ({})", u.name, format_activeness(u.account_locked_by_admins)))
                    .collect();
                let Some(index) = pick("User", &names)? else {
                    continue;
                };
                let (outcome, locked) = toggle_lock(&mut users, api, confirm, index).await?;
                outcome.report(&format!("User is now {}", format_activeness(locked)));
            }

            Action::ChangeRole => {
                let names: Vec<&str> = users.users().iter().map(|u| u.name.as_str()).collect();
                let Some(user_index) = pick("User", &names)? else {
                    continue;
                };
                let user = &users.users()[user_index];
                let courses: Vec<String> = user
                    .enrollments
                    .iter()
                    .map(|e| format!("{} - {}", e.course.title, e.role))
                    .collect();
                let Some(course_index) = pick("Course", &courses)? else {
                    continue;
                };
                let Some(role_index) = pick("New role", &CourseRole::ALL)? else {
                    continue;
                };

                let role = CourseRole::ALL[role_index];

                let outcome = change_role(&mut users, api, confirm, user_index, course_index, role).await?;
                outcome.report(&format!("Role changed to {}", role));
            }

            Action::ShowRules => {
                output::print_table(rules.rules().iter().map(RuleRow::from).collect());
            }

            Action::CreateRule => {
                if rules.editor().is_editing() {
                    rules.editor_mut().cancel();
                }
                fill_form(rules.editor_mut().form_mut())?;
                rules.submit(api, admin_name).await.report("Rule created");
            }

            Action::EditRule => {
                let titles: Vec<&str> = rules.rules().iter().map(|r| r.title.as_str()).collect();
                let Some(index) = pick("Rule", &titles)? else {
                    continue;
                };
                let id = rules.rules()[index].id.clone();

                rules.begin_edit(&id)?;
                fill_form(rules.editor_mut().form_mut())?;

                if confirm.confirm("Edit rule", "Submit these changes?")? {
                    rules.submit(api, admin_name).await.report("Rule updated");
                } else {
                    rules.editor_mut().cancel();
                    output::print_info("Edit cancelled");
                }
            }

            Action::Refresh => {
                users = UsersView::load(api).await;
                rules = RulesView::load(api).await;
                output::print_success("Reloaded users and rules");
            }

            Action::Quit => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::AutoAnswer;
    use crate::session::Session;
    use crate::testing::StubBackend;
    use axum::routing::{get, patch};
    use axum::{Json, Router};
    use serde_json::json;

    fn router() -> Router {
        Router::new()
            .route(
                "/admins/users",
                get(|| async {
                    Json(json!([
                        {"uuid": "u1", "name": "Alice", "accountLockedByAdmins": false, "createdAt": "2024-01-01"},
                        {"uuid": "u2", "name": "Bob", "accountLockedByAdmins": true, "createdAt": "2024-02-01"}
                    ]))
                }),
            )
            .route(
                "/admins/courses/enrollments",
                get(|| async {
                    Json(json!([
                        {"userId": "u2", "role": "STUDENT", "course": {"id": "c1", "title": "Algebra"}},
                        {"userId": "u2", "role": "STUDENT", "course": {"id": "c2", "title": "Physics"}}
                    ]))
                }),
            )
            .route("/admins/users/:uuid/lock-status", patch(|| async { Json(json!({})) }))
            .route(
                "/admins/courses/:course_id/enrollments/:uuid",
                patch(|| async { Json(json!({})) }),
            )
    }

    #[tokio::test]
    async fn test_toggle_lock_flips_current_state() {
        let backend = StubBackend::spawn(router()).await;
        let api = ApiClient::new(&backend.base_url, Session::default());
        let mut users = UsersView::fetch(&api).await.unwrap();

        let (outcome, locked) = toggle_lock(&mut users, &api, &AutoAnswer(true), 0).await.unwrap();
        assert!(outcome.is_applied());
        assert!(locked);
        assert!(users.users()[0].account_locked_by_admins);

        let (outcome, locked) = toggle_lock(&mut users, &api, &AutoAnswer(true), 1).await.unwrap();
        assert!(outcome.is_applied());
        assert!(!locked);
        assert!(!users.users()[1].account_locked_by_admins);

        let patches: Vec<_> = backend
            .requests()
            .into_iter()
            .filter(|r| r.method == "PATCH")
            .collect();
        assert_eq!(patches[0].path, "/admins/users/u1/lock-status");
        assert_eq!(patches[0].body, Some(json!({"locked": true})));
        assert_eq!(patches[1].path, "/admins/users/u2/lock-status");
        assert_eq!(patches[1].body, Some(json!({"locked": false})));
    }

    #[tokio::test]
    async fn test_toggle_lock_declined_keeps_state() {
        let backend = StubBackend::spawn(router()).await;
        let api = ApiClient::new(&backend.base_url, Session::default());
        let mut users = UsersView::fetch(&api).await.unwrap();

        let (outcome, _) = toggle_lock(&mut users, &api, &AutoAnswer(false), 0).await.unwrap();
        assert!(matches!(outcome, Outcome::Declined));
        assert!(!users.users()[0].account_locked_by_admins);
        assert!(backend.requests().iter().all(|r| r.method == "GET"));

        assert!(toggle_lock(&mut users, &api, &AutoAnswer(true), 5).await.is_err());
    }

    #[tokio::test]
    async fn test_change_role_targets_picked_course() {
        let backend = StubBackend::spawn(router()).await;
        let api = ApiClient::new(&backend.base_url, Session::default());
        let mut users = UsersView::fetch(&api).await.unwrap();

        let outcome = change_role(&mut users, &api, &AutoAnswer(true), 1, 1, CourseRole::Assistant)
            .await
            .unwrap();
        assert!(outcome.is_applied());

        let bob = &users.users()[1];
        assert_eq!(bob.enrollments[0].role, CourseRole::Student);
        assert_eq!(bob.enrollments[1].role, CourseRole::Assistant);

        let requests = backend.requests();
        let patch = requests.iter().find(|r| r.method == "PATCH").unwrap();
        assert_eq!(patch.path, "/admins/courses/c2/enrollments/u2");
        assert_eq!(patch.body, Some(json!({"role": "ASSISTANT"})));

        assert!(change_role(&mut users, &api, &AutoAnswer(true), 0, 0, CourseRole::Assistant)
            .await
            .is_err());
    }
}
