// Records returned by the BlueInk API and the envelopes the client wraps
// them in.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the response header carrying pagination metadata.
pub const PAGINATION_HEADER: &str = "X-Blueink-Pagination";

/// A status code plus the decoded body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub data: T,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedResponse<T> {
    pub status: u16,
    pub pagination: Pagination,
    pub data: Vec<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page_number: u32,
    pub total_pages: u32,
    pub per_page: u32,
    pub total_results: u32,
}

impl Pagination {
    /// Parse `"<page>,<total_pages>,<per_page>,<total_results>"`.
    pub fn from_header(value: &str) -> Option<Self> {
        let parts: Vec<u32> = value
            .split(',')
            .map(|p| p.trim().parse().ok())
            .collect::<Option<_>>()?;
        match parts.as_slice() {
            [page_number, total_pages, per_page, total_results] => Some(Self {
                page_number: *page_number,
                total_pages: *total_pages,
                per_page: *per_page,
                total_results: *total_results,
            }),
            _ => None,
        }
    }

    /// Metadata for a listing the server did not paginate.
    pub fn single_page(page_number: u32, per_page: u32, results: usize) -> Self {
        Self {
            page_number,
            total_pages: page_number,
            per_page,
            total_results: results as u32,
        }
    }

    pub fn is_last(&self) -> bool {
        self.page_number >= self.total_pages
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bundle {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub status: String,
}

impl Bundle {
    pub fn label_or_blank(&self) -> &str {
        self.label.as_deref().unwrap_or("")
    }
}

/// A person record. Fields the examples do not name are kept in `other`
/// so the update flow can offer them for editing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Person {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub metadata: Value,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Person {
    /// The record as a flat JSON object, keys in sorted order.
    pub fn as_fields(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}
