//! Source and target documents.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::Client;
use crate::collection::{Identified, PagedCollection, Parent, Resource, ResourceId};
use crate::error::{Error, Result};
use crate::http::RequestOptions;

/// A document stored by Lingo24.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct File {
    #[serde(skip)]
    client: Client,
    pub id: u64,
    pub name: String,
    /// `SOURCE` or `TARGET`.
    pub file_type: String,
}

#[derive(Debug, Deserialize)]
pub struct FileRecord {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub file_type: String,
}

impl Resource for File {
    type Record = FileRecord;

    fn make_item(collection: &PagedCollection<Self>, record: FileRecord) -> Self {
        File {
            client: collection.client().clone(),
            id: record.id,
            name: record.name,
            file_type: record.file_type,
        }
    }
}

impl Identified for File {
    fn id(&self) -> u64 {
        self.id
    }
}

impl File {
    /// Canonical path of this file, regardless of which collection it came
    /// from.
    pub fn url_path(&self) -> String {
        self.client.files().item_url_path(self.id)
    }

    /// Download the file body. `None` when no content has been uploaded.
    pub fn content(&self) -> Result<Option<Vec<u8>>> {
        match self.client.http().get(&format!("{}/content", self.url_path())) {
            Ok(response) => Ok(Some(response.bytes()?.to_vec())),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Replace the file body.
    pub fn set_content(&self, content: impl Into<Vec<u8>>) -> Result<()> {
        self.client
            .http()
            .put(&format!("{}/content", self.url_path()), content)?;
        Ok(())
    }

    pub fn delete(&self) -> Result<()> {
        self.client.http().delete(&self.url_path())?;
        Ok(())
    }
}

impl PagedCollection<File> {
    /// Create an empty `SOURCE` file named `name`.
    ///
    /// Only available on the top-level file collection.
    pub fn create(&self, name: &str) -> Result<File> {
        if self.parent().is_some() {
            return Err(Error::Unsupported(format!(
                "files cannot be created through {}",
                self.url_path()
            )));
        }
        let record: FileRecord = self
            .client()
            .http()
            .post_json("files", &json!({"name": name, "type": "SOURCE"}))?;
        tracing::info!(id = record.id, name, "created file");
        Ok(File::make_item(self, record))
    }

    /// Attach an existing file to the owning project.
    pub fn add(&self, file: impl Into<ResourceId>) -> Result<()> {
        self.require_project_scope()?;
        let options = RequestOptions::default().with_json(&json!({"id": file.into().get()}))?;
        self.client()
            .http()
            .request(Method::POST, self.url_path(), options)?;
        Ok(())
    }

    /// Detach a file from the owning project.
    pub fn remove(&self, file: impl Into<ResourceId>) -> Result<()> {
        self.require_project_scope()?;
        self.client().http().delete(&self.item_url_path(file))?;
        Ok(())
    }

    fn require_project_scope(&self) -> Result<()> {
        match self.parent() {
            Some(Parent::Project(_)) => Ok(()),
            _ => Err(Error::Unsupported(format!(
                "files cannot be attached through {}",
                self.url_path()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Authenticator, Credentials};

    fn client() -> Client {
        let auth = Authenticator::builder(Credentials::new("xxx", "yyy", "https://e.com/cb"))
            .build()
            .unwrap();
        Client::new(auth).unwrap()
    }

    fn record() -> FileRecord {
        serde_json::from_value(serde_json::json!({"id": 3, "name": "a.txt", "type": "SOURCE"})).unwrap()
    }

    #[test]
    fn test_make_item_is_pure() {
        let files = client().files();
        let a = File::make_item(&files, record());
        let b = File::make_item(&files, record());
        assert_eq!(a, b);
        assert_eq!(a.file_type, "SOURCE");
    }

    #[test]
    fn test_url_path_is_canonical() {
        let client = client();
        let nested = client
            .files()
            .with_parent(Parent::Project(9));
        let file = File::make_item(&nested, record());
        assert_eq!(file.url_path(), "files/3");
    }

    #[test]
    fn test_scope_checks() {
        let client = client();
        assert!(matches!(client.files().add(3u64), Err(Error::Unsupported(_))));
        assert!(matches!(client.files().remove(3u64), Err(Error::Unsupported(_))));

        let nested = client.files().with_parent(Parent::Project(9));
        assert!(matches!(nested.create("x"), Err(Error::Unsupported(_))));
    }

    #[test]
    fn test_serialize_omits_client() {
        let file = File::make_item(&client().files(), record());
        let value = serde_json::to_value(&file).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"id": 3, "name": "a.txt", "file_type": "SOURCE"})
        );
    }
}
