//! Paginated remote collections.
//!
//! A [`PagedCollection`] turns index, slice and iterator access into page
//! fetches against one list endpoint. Pages are requested with
//! `page=<i>&size=<page_size>[&sort=<key>]`; iteration continues through the
//! `next` links the server returns. Nothing is cached apart from the last
//! seen page metadata, which backs [`PagedCollection::len`].
//!
//! What a collection may do is fixed by its [`Capabilities`]: project files
//! cannot be sorted, the top-level `files/` endpoint cannot be listed, and so
//! on. Using a missing capability fails with [`Error::Unsupported`].

pub mod iter;
pub mod page;

use std::fmt;
use std::marker::PhantomData;
use std::ops::RangeBounds;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;

use crate::client::Client;
use crate::error::{Error, Result};

pub use iter::{Items, Slice};
pub use page::{Link, Page, PageMeta};

/// Operations a collection supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Single items can be fetched by id.
    pub addressable: bool,
    /// The collection can be listed page by page.
    pub paginatable: bool,
    /// Listings accept a `sort` key.
    pub sortable: bool,
}

impl Capabilities {
    /// Addressable, paginatable and sortable.
    pub const ALL: Self = Self {
        addressable: true,
        paginatable: true,
        sortable: true,
    };

    /// Addressable and paginatable.
    pub const LISTABLE: Self = Self {
        addressable: true,
        paginatable: true,
        sortable: false,
    };

    /// Fetch by id only.
    pub const ADDRESSABLE: Self = Self {
        addressable: true,
        paginatable: false,
        sortable: false,
    };
}

/// Scope a nested collection belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parent {
    Project(u64),
    Job { project_id: u64, job_id: u64 },
}

impl Parent {
    /// Id of the owning project.
    pub fn project_id(&self) -> u64 {
        match *self {
            Parent::Project(id) => id,
            Parent::Job { project_id, .. } => project_id,
        }
    }
}

/// Reference to a remote resource by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub u64);

impl ResourceId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for ResourceId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A domain object with a numeric id.
pub trait Identified {
    fn id(&self) -> u64;
}

impl<T: Identified> From<&T> for ResourceId {
    fn from(item: &T) -> Self {
        Self(item.id())
    }
}

/// A remote resource type that a collection can produce.
pub trait Resource: Sized {
    /// Wire representation of one item.
    type Record: DeserializeOwned;

    /// Build the domain object for `record` fetched through `collection`.
    fn make_item(collection: &PagedCollection<Self>, record: Self::Record) -> Self;
}

/// Lazily paginated view over one list endpoint.
pub struct PagedCollection<T> {
    client: Client,
    url_path: String,
    page_size: u32,
    sort: Option<String>,
    parent: Option<Parent>,
    capabilities: Capabilities,
    page_meta: Mutex<Option<PageMeta>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PagedCollection<T> {
    pub(crate) fn new(client: Client, url_path: impl Into<String>, capabilities: Capabilities) -> Self {
        let page_size = client.per_page();
        Self {
            client,
            url_path: url_path.into(),
            page_size,
            sort: None,
            parent: None,
            capabilities,
            page_meta: Mutex::new(None),
            _marker: PhantomData,
        }
    }

    /// Same collection with a different page size.
    pub fn with_page_size(mut self, page_size: u32) -> Result<Self> {
        if page_size == 0 {
            return Err(Error::InvalidArgument("page size must be at least 1".into()));
        }
        self.page_size = page_size;
        *self.page_meta.get_mut() = None;
        Ok(self)
    }

    pub(crate) fn with_parent(mut self, parent: Parent) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn url_path(&self) -> &str {
        &self.url_path
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Active sort key, if any.
    pub fn sort_key(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    pub fn parent(&self) -> Option<Parent> {
        self.parent
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Last page metadata seen by this handle.
    pub fn page_meta(&self) -> Option<PageMeta> {
        *self.page_meta.lock()
    }

    /// Path of the item with `id`.
    pub fn item_url_path(&self, id: impl Into<ResourceId>) -> String {
        let id = id.into();
        if self.url_path.ends_with('/') {
            format!("{}{id}", self.url_path)
        } else {
            format!("{}/{id}", self.url_path)
        }
    }

    /// Query parameters for page `page`.
    pub fn query_pairs(&self, page: u64) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", page.to_string()), ("size", self.page_size.to_string())];
        if let Some(sort) = &self.sort {
            pairs.push(("sort", sort.clone()));
        }
        pairs
    }

    /// Relative URL of page `page`.
    pub fn page_url(&self, page: u64) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.query_pairs(page) {
            query.append_pair(key, &value);
        }
        format!("{}?{}", self.url_path, query.finish())
    }

    /// Copy of this collection ordered by `key`. The receiver is unchanged.
    pub fn sort(&self, key: impl Into<String>) -> Result<Self> {
        self.require(self.capabilities.sortable, "sorting")?;
        let mut sorted = self.clone();
        sorted.sort = Some(key.into());
        Ok(sorted)
    }

    fn require(&self, supported: bool, operation: &str) -> Result<()> {
        if supported {
            Ok(())
        } else {
            Err(Error::Unsupported(format!(
                "{operation} is not supported for {}",
                self.url_path
            )))
        }
    }

    /// Fetch a page by path or absolute URL. `None` on 404.
    pub(crate) fn fetch(&self, path: &str) -> Result<Option<Page>> {
        match self.client.http().get_json::<Page>(path) {
            Ok(page) => {
                tracing::debug!(
                    path,
                    number = page.page.number,
                    items = page.content.len(),
                    total = page.page.total_elements,
                    "fetched page"
                );
                *self.page_meta.lock() = Some(page.page);
                Ok(Some(page))
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!(path, "page not found, treating as empty");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub(crate) fn fetch_page(&self, page: u64) -> Result<Option<Page>> {
        self.require(self.capabilities.paginatable, "pagination")?;
        self.fetch(&self.page_url(page))
    }

    fn meta(&self) -> Result<PageMeta> {
        if let Some(meta) = self.page_meta() {
            return Ok(meta);
        }
        match self.fetch_page(0)? {
            Some(page) => Ok(page.page),
            None => {
                let meta = PageMeta::default();
                *self.page_meta.lock() = Some(meta);
                Ok(meta)
            }
        }
    }

    /// Total number of items, fetching page 0 if nothing is known yet.
    pub fn len(&self) -> Result<u64> {
        Ok(self.meta()?.total_elements)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Total number of pages, fetching page 0 if nothing is known yet.
    pub fn page_count(&self) -> Result<u64> {
        Ok(self.meta()?.total_pages)
    }
}

impl<T: Resource> PagedCollection<T> {
    pub(crate) fn make(&self, record: serde_json::Value) -> Result<T> {
        let record = serde_json::from_value(record)?;
        Ok(T::make_item(self, record))
    }

    /// Fetch one item by id.
    ///
    /// Fails with [`Error::NotFound`] on 404.
    pub fn get(&self, id: impl Into<ResourceId>) -> Result<T> {
        self.require(self.capabilities.addressable, "lookup by id")?;
        let path = self.item_url_path(id);
        match self.client.http().get_json::<T::Record>(&path) {
            Ok(record) => Ok(T::make_item(self, record)),
            Err(e) if e.is_not_found() => Err(Error::NotFound(path)),
            Err(e) => Err(e),
        }
    }

    /// Iterate from `start_page`, following `next` links if asked to.
    pub fn iter_from(&self, start_page: u64, follow_links: bool) -> Items<'_, T> {
        Items::new(self, start_page, follow_links)
    }

    /// Iterate over every item.
    pub fn iter(&self) -> Items<'_, T> {
        self.iter_from(0, true)
    }

    /// Items of page `page` only.
    pub fn get_page(&self, page: u64) -> Items<'_, T> {
        self.iter_from(page, false)
    }

    /// Item at `index`, fetching only the page that holds it.
    pub fn item(&self, index: i64) -> Result<T> {
        let len = self.len()?;
        let out_of_range = || Error::IndexOutOfRange { index, len };
        let position = u64::try_from(index).map_err(|_| out_of_range())?;
        if position >= len {
            return Err(out_of_range());
        }

        let page_size = u64::from(self.page_size);
        let page_index = position / page_size;
        let offset = usize::try_from(position - page_index * page_size).map_err(|_| out_of_range())?;
        let mut page = self.fetch_page(page_index)?.ok_or_else(out_of_range)?;
        if offset >= page.content.len() {
            return Err(out_of_range());
        }
        self.make(page.content.swap_remove(offset))
    }

    /// Items in `range`.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Result<Slice<Items<'_, T>>> {
        self.slice_step(range, 1)
    }

    /// Every `step`th item in `range`.
    ///
    /// Fetching starts at the page holding the first index and follows
    /// `next` links until the range is satisfied or the listing ends.
    pub fn slice_step(
        &self,
        range: impl RangeBounds<usize>,
        step: usize,
    ) -> Result<Slice<Items<'_, T>>> {
        if step == 0 {
            return Err(Error::InvalidArgument("slice step cannot be zero".into()));
        }
        self.require(self.capabilities.paginatable, "pagination")?;

        let (start, stop) = iter::range_bounds(&range);
        let start = start.unwrap_or(0);
        let page_size = self.page_size as usize;
        let page = start / page_size;
        let offset = page * page_size;

        Ok(Slice::new(
            self.iter_from(page as u64, true),
            start - offset,
            stop.map(|stop| stop.saturating_sub(offset)),
            step,
        ))
    }

    /// Items matching `predicate`. Errors pass through.
    pub fn filter<'a, P>(&'a self, mut predicate: P) -> impl Iterator<Item = Result<T>> + 'a
    where
        P: FnMut(&T) -> bool + 'a,
    {
        self.iter().filter(move |item| match item {
            Ok(item) => predicate(item),
            Err(_) => true,
        })
    }

    /// First item matching `predicate`, or [`Error::NotFound`].
    pub fn find<P>(&self, mut predicate: P) -> Result<T>
    where
        P: FnMut(&T) -> bool,
    {
        for item in self.iter() {
            let item = item?;
            if predicate(&item) {
                return Ok(item);
            }
        }
        Err(Error::NotFound(format!("no matching item in {}", self.url_path)))
    }
}

impl<'a, T: Resource> IntoIterator for &'a PagedCollection<T> {
    type Item = Result<T>;
    type IntoIter = Items<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Clone for PagedCollection<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            url_path: self.url_path.clone(),
            page_size: self.page_size,
            sort: self.sort.clone(),
            parent: self.parent,
            capabilities: self.capabilities,
            page_meta: Mutex::new(None),
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for PagedCollection<T> {
    fn eq(&self, other: &Self) -> bool {
        self.client == other.client
            && self.url_path == other.url_path
            && self.page_size == other.page_size
            && self.sort == other.sort
            && self.parent == other.parent
    }
}

impl<T> Eq for PagedCollection<T> {}

impl<T> fmt::Debug for PagedCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagedCollection")
            .field("url_path", &self.url_path)
            .field("page_size", &self.page_size)
            .field("sort", &self.sort)
            .field("parent", &self.parent)
            .field("capabilities", &self.capabilities)
            .finish()
    }
}
