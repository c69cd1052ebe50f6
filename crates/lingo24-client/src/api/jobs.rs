//! Translation jobs within a project.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::files::File;
use super::metrics::{Metric, fetch_metrics};
use super::pricing::{TotalPrice, fetch_price};
use super::reference::{Locale, Service};
use crate::client::Client;
use crate::collection::{Capabilities, Identified, PagedCollection, Parent, Resource, ResourceId};
use crate::error::{Error, Result};

/// One document translated into one target locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Job {
    #[serde(skip)]
    client: Client,
    pub project_id: u64,
    pub id: u64,
    pub status: String,
    pub service_id: u64,
    pub source_locale_id: u64,
    pub target_locale_id: u64,
    pub source_file_id: u64,
    /// Set once a translation has been delivered.
    pub target_file_id: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: u64,
    pub job_status: String,
    pub service_id: u64,
    pub source_locale_id: u64,
    pub target_locale_id: u64,
    pub source_file_id: u64,
    #[serde(default)]
    pub target_file_id: Option<u64>,
}

impl Resource for Job {
    type Record = JobRecord;

    fn make_item(collection: &PagedCollection<Self>, record: JobRecord) -> Self {
        Job {
            client: collection.client().clone(),
            project_id: collection
                .parent()
                .map(|parent| parent.project_id())
                .unwrap_or_default(),
            id: record.id,
            status: record.job_status,
            service_id: record.service_id,
            source_locale_id: record.source_locale_id,
            target_locale_id: record.target_locale_id,
            source_file_id: record.source_file_id,
            target_file_id: record.target_file_id,
        }
    }
}

impl Identified for Job {
    fn id(&self) -> u64 {
        self.id
    }
}

impl Job {
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// The jobs collection of the owning project.
    pub fn collection(&self) -> PagedCollection<Job> {
        jobs_of(&self.client, self.project_id)
    }

    pub fn url_path(&self) -> String {
        self.collection().item_url_path(self.id)
    }

    pub fn service(&self) -> Result<Service> {
        self.client.services().get(self.service_id)
    }

    pub fn source_locale(&self) -> Result<Locale> {
        self.client.locales().get(self.source_locale_id)
    }

    pub fn target_locale(&self) -> Result<Locale> {
        self.client.locales().get(self.target_locale_id)
    }

    pub fn source_file(&self) -> Result<File> {
        self.client.files().get(self.source_file_id)
    }

    /// The translated file, once there is one.
    pub fn target_file(&self) -> Result<Option<File>> {
        self.target_file_id
            .map(|id| self.client.files().get(id))
            .transpose()
    }

    /// Current price, if the job has been priced.
    pub fn price(&self) -> Result<Option<TotalPrice>> {
        fetch_price(self.client.http(), &self.url_path())
    }

    /// Text metrics by category. Empty when none are available.
    pub fn metrics(&self) -> Result<BTreeMap<String, Metric>> {
        fetch_metrics(self.client.http(), &self.url_path())
    }

    /// Fresh snapshot of this job from the server.
    pub fn refresh(&self) -> Result<Job> {
        self.collection().get(self.id)
    }

    pub fn delete(&self) -> Result<()> {
        self.client.http().delete(&self.url_path())?;
        tracing::info!(project = self.project_id, job = self.id, "deleted job");
        Ok(())
    }

    /// Files belonging to this job.
    pub fn files(&self) -> PagedCollection<File> {
        PagedCollection::new(
            self.client.clone(),
            format!("{}/files", self.url_path()),
            Capabilities::LISTABLE,
        )
        .with_parent(Parent::Job {
            project_id: self.project_id,
            job_id: self.id,
        })
    }
}

pub(crate) fn jobs_of(client: &Client, project_id: u64) -> PagedCollection<Job> {
    PagedCollection::new(
        client.clone(),
        format!("{}/jobs", client.projects().item_url_path(project_id)),
        Capabilities::LISTABLE,
    )
    .with_parent(Parent::Project(project_id))
}

impl PagedCollection<Job> {
    /// Add a job translating `source_file` from `source_locale` into
    /// `target_locale`.
    pub fn create(
        &self,
        service: impl Into<ResourceId>,
        source_locale: impl Into<ResourceId>,
        source_file: impl Into<ResourceId>,
        target_locale: impl Into<ResourceId>,
    ) -> Result<Job> {
        let project_id = match self.parent() {
            Some(Parent::Project(id)) => id,
            _ => {
                return Err(Error::Unsupported(format!(
                    "jobs cannot be created through {}",
                    self.url_path()
                )));
            }
        };
        let body = json!({
            "projectId": project_id,
            "serviceId": service.into().get(),
            "sourceLocaleId": source_locale.into().get(),
            "sourceFileId": source_file.into().get(),
            "targetLocaleId": target_locale.into().get(),
        });

        let record: JobRecord = self.client().http().post_json(self.url_path(), &body)?;
        tracing::info!(project = project_id, id = record.id, "created job");
        Ok(Job::make_item(self, record))
    }
}
