//! Translation projects and their quote workflow.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::charges::Charge;
use super::files::File;
use super::jobs::Job;
use super::pricing::{TotalPrice, fetch_price};
use super::reference::Domain;
use crate::client::Client;
use crate::collection::{Capabilities, Identified, PagedCollection, Parent, Resource, ResourceId};
use crate::error::{Error, Result};

/// Lifecycle status of a project.
///
/// Statuses the client does not know are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum ProjectStatus {
    Created,
    Quoted,
    Pending,
    InProgress,
    Finished,
    Cancelled,
    Other(String),
}

impl ProjectStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ProjectStatus::Created => "CREATED",
            ProjectStatus::Quoted => "QUOTED",
            ProjectStatus::Pending => "PENDING",
            ProjectStatus::InProgress => "IN_PROGRESS",
            ProjectStatus::Finished => "FINISHED",
            ProjectStatus::Cancelled => "CANCELLED",
            ProjectStatus::Other(s) => s,
        }
    }
}

impl From<String> for ProjectStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "CREATED" => ProjectStatus::Created,
            "QUOTED" => ProjectStatus::Quoted,
            "PENDING" => ProjectStatus::Pending,
            "IN_PROGRESS" => ProjectStatus::InProgress,
            "FINISHED" => ProjectStatus::Finished,
            "CANCELLED" => ProjectStatus::Cancelled,
            _ => ProjectStatus::Other(s),
        }
    }
}

impl From<ProjectStatus> for String {
    fn from(status: ProjectStatus) -> Self {
        status.as_str().to_owned()
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a project.
///
/// Status transitions update the snapshot only after the server accepted
/// them. Use [`Project::refresh`] to pick up changes made elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    #[serde(skip)]
    client: Client,
    pub id: u64,
    pub name: String,
    pub domain_id: Option<u64>,
    pub status: ProjectStatus,
    pub created: DateTime<Utc>,
    pub callback_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub domain_id: Option<u64>,
    pub project_status: ProjectStatus,
    /// Seconds since the epoch.
    pub created: i64,
    #[serde(default)]
    pub project_callback_url: Option<String>,
}

impl Resource for Project {
    type Record = ProjectRecord;

    fn make_item(collection: &PagedCollection<Self>, record: ProjectRecord) -> Self {
        Project {
            client: collection.client().clone(),
            id: record.id,
            name: record.name,
            domain_id: record.domain_id,
            status: record.project_status,
            created: DateTime::from_timestamp(record.created, 0).unwrap_or_default(),
            callback_url: record.project_callback_url,
        }
    }
}

impl Identified for Project {
    fn id(&self) -> u64 {
        self.id
    }
}

impl Project {
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn url_path(&self) -> String {
        self.client.projects().item_url_path(self.id)
    }

    /// The project's domain, if one was set.
    pub fn domain(&self) -> Result<Option<Domain>> {
        self.domain_id
            .map(|id| self.client.domains().get(id))
            .transpose()
    }

    /// Current price. `None` until the project has been quoted.
    pub fn price(&self) -> Result<Option<TotalPrice>> {
        fetch_price(self.client.http(), &self.url_path())
    }

    /// Fresh snapshot of this project from the server.
    pub fn refresh(&self) -> Result<Project> {
        self.client.projects().get(self.id)
    }

    /// Ask for a quote. Only valid for `CREATED` projects.
    pub fn request_quote(&mut self) -> Result<()> {
        if self.status != ProjectStatus::Created {
            return Err(Error::InvalidState(format!(
                "Cannot request a quote for a project with status {}",
                self.status
            )));
        }
        self.put_status(ProjectStatus::Quoted)?;
        self.status = ProjectStatus::Pending;
        Ok(())
    }

    /// Accept the quote and start work. Only valid for `QUOTED` projects.
    pub fn accept_quote(&mut self) -> Result<()> {
        if self.status != ProjectStatus::Quoted {
            return Err(Error::InvalidState(format!(
                "Cannot accept the quote of a project with status {}",
                self.status
            )));
        }
        self.put_status(ProjectStatus::InProgress)?;
        self.status = ProjectStatus::InProgress;
        Ok(())
    }

    /// Cancel the project. Only valid before work has started.
    pub fn cancel(&mut self) -> Result<()> {
        if !matches!(self.status, ProjectStatus::Created | ProjectStatus::Quoted) {
            return Err(Error::InvalidState(format!(
                "Cannot cancel a project with status {}",
                self.status
            )));
        }
        self.client.http().delete(&self.url_path())?;
        tracing::info!(project = self.id, "cancelled project");
        self.status = ProjectStatus::Cancelled;
        Ok(())
    }

    fn put_status(&self, status: ProjectStatus) -> Result<()> {
        self.client.http().put_json::<_, IgnoredAny>(
            &self.url_path(),
            &json!({"projectStatus": status.as_str()}),
        )?;
        tracing::info!(project = self.id, %status, "updated project status");
        Ok(())
    }

    /// Extra charges on this project.
    pub fn charges(&self) -> PagedCollection<Charge> {
        self.nested("charges")
    }

    /// Files attached to this project.
    pub fn files(&self) -> PagedCollection<File> {
        self.nested("files")
    }

    /// Translation jobs in this project.
    pub fn jobs(&self) -> PagedCollection<Job> {
        self.nested("jobs")
    }

    fn nested<T>(&self, name: &str) -> PagedCollection<T> {
        PagedCollection::new(
            self.client.clone(),
            format!("{}/{name}", self.url_path()),
            Capabilities::LISTABLE,
        )
        .with_parent(Parent::Project(self.id))
    }
}

impl PagedCollection<Project> {
    /// Create a project.
    pub fn create(
        &self,
        name: &str,
        domain: Option<ResourceId>,
        callback_url: Option<&str>,
    ) -> Result<Project> {
        let mut body = json!({ "name": name });
        if let Some(domain) = domain {
            body["domainId"] = json!(domain.get());
        }
        if let Some(url) = callback_url {
            body["projectCallbackUrl"] = json!(url);
        }

        let record: ProjectRecord = self.client().http().post_json("projects", &body)?;
        tracing::info!(id = record.id, name, "created project");
        Ok(Project::make_item(self, record))
    }
}
