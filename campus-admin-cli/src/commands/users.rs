use crate::api::{self, segment, ApiClient};
use crate::commands::{failure_text, Outcome};
use crate::confirm::Confirm;
use crate::output::{self, format_activeness, format_date, OutputFormat};
use crate::UserCommands;
use anyhow::{anyhow, Result};
use campus_admin_common::{
    attach_enrollments, reconcile, Aggregated, CourseRole, Enrollment, EnrollmentUpdate,
    LockStatusUpdate, User,
};
use tabled::Tabled;

#[derive(Tabled)]
pub struct UserRow {
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Registration Date")]
    pub registered: String,
    #[tabled(rename = "Courses")]
    pub courses: String,
    #[tabled(rename = "UUID")]
    pub uuid: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        let courses = if u.enrollments.is_empty() {
            "No enrollments available".to_string()
        } else {
            u.enrollments
                .iter()
                .map(|e| format!("{} - {} [{}]", e.course.title, e.role, e.course.id))
                .collect::<Vec<_>>()
                .join("\n")
        };

        Self {
            name: u.name.clone(),
            status: format_activeness(u.account_locked_by_admins).to_string(),
            registered: format_date(&u.created_at),
            courses,
            uuid: u.uuid.clone(),
        }
    }
}

/// Users with their enrollments, held locally between mutations
#[derive(Debug, Default)]
pub struct UsersView {
    users: Vec<User>,
}

impl UsersView {
    pub async fn fetch(api: &ApiClient) -> api::Result<Self> {
        let users: Vec<User> = api.get("/admins/users").await?;
        let enrollments: Vec<Enrollment> = api.get("/admins/courses/enrollments").await?;

        let Aggregated { users, unmatched } = attach_enrollments(&users, &enrollments);
        if !unmatched.is_empty() {
            tracing::warn!(
                count = unmatched.len(),
                "enrollments reference users that were not returned"
            );
        }

        Ok(Self { users })
    }

    /// Fetch, falling back to an empty view with a visible warning
    pub async fn load(api: &ApiClient) -> Self {
        let spinner = output::spinner("Loading users...");
        let result = Self::fetch(api).await;
        spinner.finish_and_clear();

        match result {
            Ok(view) => view,
            Err(e) => {
                tracing::error!(error = %e, "error fetching users");
                output::print_warning(&format!("Could not load users: {}", failure_text(&e)));
                Self::default()
            }
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn find(&self, uuid: &str) -> Option<&User> {
        self.users.iter().find(|u| u.uuid == uuid)
    }

    pub fn rows(&self) -> Vec<UserRow> {
        self.users.iter().map(UserRow::from).collect()
    }

    pub async fn set_lock(
        &mut self,
        api: &ApiClient,
        confirm: &dyn Confirm,
        uuid: &str,
        locked: bool,
    ) -> Result<Outcome> {
        let user = self
            .find(uuid)
            .ok_or_else(|| anyhow!("User '{}' not found", uuid))?;
        let (title, verb) = if locked {
            ("Block user", "block")
        } else {
            ("Unblock user", "unblock")
        };

        let message = format!("Are you sure you want to {} {}?", verb, user.name);
        if !confirm.confirm(title, &message)? {
            return Ok(Outcome::Declined);
        }

        let path = format!("/admins/users/{}/lock-status", segment(uuid));
        match api.patch_empty(&path, &LockStatusUpdate { locked }).await {
            Ok(()) => {
                self.users = reconcile::set_lock_status(&self.users, uuid, locked);
                Ok(Outcome::Applied)
            }
            Err(e) => {
                tracing::error!(uuid, error = %e, "failed to {} user", verb);
                Ok(Outcome::Failed(e))
            }
        }
    }

    pub async fn set_role(
        &mut self,
        api: &ApiClient,
        confirm: &dyn Confirm,
        uuid: &str,
        course_id: &str,
        role: CourseRole,
    ) -> Result<Outcome> {
        let user = self
            .find(uuid)
            .ok_or_else(|| anyhow!("User '{}' not found", uuid))?;
        let enrollment = user
            .enrollments
            .iter()
            .find(|e| e.course.id == course_id)
            .ok_or_else(|| anyhow!("User '{}' is not enrolled in course '{}'", user.name, course_id))?;

        if enrollment.role == role {
            return Ok(Outcome::Unchanged);
        }

        let message = format!(
            "Change {}'s role in {} from {} to {}?",
            user.name, enrollment.course.title, enrollment.role, role
        );
        if !confirm.confirm("Change role", &message)? {
            return Ok(Outcome::Declined);
        }

        let path = format!(
            "/admins/courses/{}/enrollments/{}",
            segment(course_id),
            segment(uuid)
        );
        match api.patch_empty(&path, &EnrollmentUpdate { role }).await {
            Ok(()) => {
                self.users = reconcile::set_course_role(&self.users, uuid, course_id, role);
                Ok(Outcome::Applied)
            }
            Err(e) => {
                tracing::error!(uuid, course_id, error = %e, "error updating user role");
                Ok(Outcome::Failed(e))
            }
        }
    }
}

pub async fn handle_user_command(
    command: UserCommands,
    api: &ApiClient,
    format: OutputFormat,
    confirm: &dyn Confirm,
) -> Result<()> {
    let mut view = UsersView::load(api).await;

    match command {
        UserCommands::List => {
            output::print_list(view.users(), |u| UserRow::from(u), format)?;
        }
        UserCommands::Block { uuid } => {
            let outcome = view.set_lock(api, confirm, &uuid, true).await?;
            finish(&view, &uuid, outcome, "blocked", format)?;
        }
        UserCommands::Unblock { uuid } => {
            let outcome = view.set_lock(api, confirm, &uuid, false).await?;
            finish(&view, &uuid, outcome, "unblocked", format)?;
        }
        UserCommands::SetRole { uuid, course, role } => {
            let outcome = view.set_role(api, confirm, &uuid, &course, role).await?;
            finish(&view, &uuid, outcome, "updated", format)?;
        }
    }

    Ok(())
}

/// Report a mutation and show the locally patched row
fn finish(
    view: &UsersView,
    uuid: &str,
    outcome: Outcome,
    verb: &str,
    format: OutputFormat,
) -> Result<()> {
    let applied = outcome.is_applied();
    outcome.into_result(&format!("User '{}' {}", uuid, verb))?;

    if applied {
        if let Some(user) = view.find(uuid) {
            match format {
                OutputFormat::Table => output::print_table(vec![UserRow::from(user)]),
                _ => output::print_single(user, format)?,
            }
        }
    }
    Ok(())
}
