//! Wire format of a paginated list response.

use serde::Deserialize;

/// Server-reported pagination metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageMeta {
    /// Zero-based index of this page.
    pub number: u64,
    /// Requested page size.
    pub size: u64,
    /// Items across all pages.
    pub total_elements: u64,
    /// Number of pages.
    pub total_pages: u64,
}

/// Hypermedia link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Link {
    pub rel: String,
    pub href: String,
}

/// One page of a list response. Items stay raw until the collection maps
/// them, so one malformed record fails on its own.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Page {
    pub content: Vec<serde_json::Value>,
    pub links: Vec<Link>,
    pub page: PageMeta,
}

impl Page {
    /// Href of the `rel == "next"` link, if any.
    pub fn next_link(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|link| link.rel == "next")
            .map(|link| link.href.as_str())
            .filter(|href| !href.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_page() {
        let page: Page = serde_json::from_value(json!({
            "content": [{"id": 1}, {"id": 2}],
            "links": [
                {"rel": "self", "href": "https://api/x?page=0"},
                {"rel": "next", "href": "https://api/x?page=1"}
            ],
            "page": {"size": 2, "totalElements": 5, "totalPages": 3, "number": 0}
        }))
        .unwrap();

        assert_eq!(page.content.len(), 2);
        assert_eq!(page.next_link(), Some("https://api/x?page=1"));
        assert_eq!(
            page.page,
            PageMeta {
                number: 0,
                size: 2,
                total_elements: 5,
                total_pages: 3,
            }
        );
    }

    #[test]
    fn test_parse_empty_result_set() {
        let page: Page = serde_json::from_value(json!({
            "links": [{"rel": "self", "href": "https://api/x?page=0"}],
            "page": {"size": 25, "totalElements": 0, "totalPages": 0, "number": 0}
        }))
        .unwrap();

        assert!(page.content.is_empty());
        assert_eq!(page.next_link(), None);
        assert_eq!(page.page.total_pages, 0);
    }

    #[test]
    fn test_missing_page_metadata_defaults() {
        let page: Page = serde_json::from_value(json!({"content": []})).unwrap();
        assert_eq!(page.page, PageMeta::default());
    }
}
