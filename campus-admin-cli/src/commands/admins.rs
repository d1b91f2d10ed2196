use crate::api::{self, segment, ApiClient};
use crate::commands::{failure_text, Outcome};
use crate::confirm::Confirm;
use crate::output::{self, format_date, OutputFormat};
use crate::AdminCommands;
use anyhow::{anyhow, Result};
use campus_admin_common::{reconcile, Admin};
use tabled::Tabled;

#[derive(Tabled)]
pub struct AdminRow {
    #[tabled(rename = "Name")]
    pub username: String,
    #[tabled(rename = "Registration Date")]
    pub registered: String,
    #[tabled(rename = "ID")]
    pub id: String,
}

impl From<&Admin> for AdminRow {
    fn from(a: &Admin) -> Self {
        Self {
            username: a.username.clone(),
            registered: a
                .registration_date
                .as_deref()
                .map(format_date)
                .unwrap_or_else(|| "-".to_string()),
            id: a.id.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct AdminsView {
    admins: Vec<Admin>,
}

impl AdminsView {
    pub async fn fetch(api: &ApiClient) -> api::Result<Self> {
        let admins: Vec<Admin> = api.get("/admins").await?;
        Ok(Self { admins })
    }

    pub async fn load(api: &ApiClient) -> Self {
        match Self::fetch(api).await {
            Ok(view) => view,
            Err(e) => {
                tracing::error!(error = %e, "error fetching admins");
                output::print_warning(&format!("Could not load admins: {}", failure_text(&e)));
                Self::default()
            }
        }
    }

    pub fn admins(&self) -> &[Admin] {
        &self.admins
    }

    pub async fn delete(&mut self, api: &ApiClient, confirm: &dyn Confirm, id: &str) -> Result<Outcome> {
        let admin = self
            .admins
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| anyhow!("Admin '{}' not found", id))?;

        let message = format!("Are you sure you want to delete admin {}?", admin.username);
        if !confirm.confirm("Delete admin", &message)? {
            return Ok(Outcome::Declined);
        }

        match api.delete(&format!("/admins/{}", segment(id))).await {
            Ok(()) => {
                self.admins = reconcile::remove_where(&self.admins, |a| a.id == id);
                Ok(Outcome::Applied)
            }
            Err(e) => {
                tracing::error!(id, error = %e, "error deleting admin");
                Ok(Outcome::Failed(e))
            }
        }
    }
}

pub async fn handle_admin_command(
    command: AdminCommands,
    api: &ApiClient,
    format: OutputFormat,
    confirm: &dyn Confirm,
) -> Result<()> {
    match command {
        AdminCommands::List => {
            let view = AdminsView::load(api).await;
            output::print_list(view.admins(), |a| AdminRow::from(a), format)?;
        }
        AdminCommands::Show { id } => {
            let admin: Admin = api.get(&format!("/admins/{}", segment(&id))).await?;
            match format {
                OutputFormat::Table => output::print_table(vec![AdminRow::from(&admin)]),
                _ => output::print_single(&admin, format)?,
            }
        }
        AdminCommands::Delete { id } => {
            let mut view = AdminsView::load(api).await;
            view.delete(api, confirm, &id)
                .await?
                .into_result(&format!("Admin '{}' deleted", id))?;
        }
    }

    Ok(())
}
