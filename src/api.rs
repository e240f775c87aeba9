// API client module: a small blocking HTTP client for the BlueInk REST
// API, plus the `BlueinkApi` trait the example flows are written against
// so they can run against a fake in tests.

use crate::config::Config;
use crate::error::ApiError;
use crate::helpers::{BundleHelper, PersonHelper};
use crate::models::{ApiResponse, Bundle, PagedResponse, Pagination, Person, PAGINATION_HEADER};
use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fs::File;
use std::time::Duration;
use tracing::{debug, info, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Operations the examples need from the BlueInk service.
pub trait BlueinkApi {
    /// List bundles, optionally filtered by a status code such as `co`.
    fn list_bundles(&self, status: Option<&str>) -> Result<ApiResponse<Vec<Bundle>>, ApiError>;

    /// Fetch one page (1-based) of the bundle listing.
    fn list_bundles_page(&self, page: u32, per_page: u32)
        -> Result<PagedResponse<Bundle>, ApiError>;

    fn create_bundle(&self, helper: &BundleHelper) -> Result<ApiResponse<Value>, ApiError>;

    fn list_persons(&self) -> Result<ApiResponse<Vec<Person>>, ApiError>;

    fn create_person(&self, helper: &PersonHelper) -> Result<ApiResponse<Value>, ApiError>;

    /// Update a person. `partial` selects PATCH over PUT.
    fn update_person(
        &self,
        person_id: &str,
        data: &Map<String, Value>,
        partial: bool,
    ) -> Result<ApiResponse<Value>, ApiError>;

    fn delete_person(&self, person_id: &str) -> Result<ApiResponse<Value>, ApiError>;
}

/// Iterator over the pages of the bundle listing. Stops after the last
/// page or the first error.
pub struct BundlePages<'a, A: BlueinkApi + ?Sized> {
    api: &'a A,
    per_page: u32,
    next_page: Option<u32>,
}

/// Walk the bundle listing `per_page` records at a time.
pub fn paged_bundles<A: BlueinkApi + ?Sized>(api: &A, per_page: u32) -> BundlePages<'_, A> {
    BundlePages {
        api,
        per_page,
        next_page: Some(1),
    }
}

impl<A: BlueinkApi + ?Sized> Iterator for BundlePages<'_, A> {
    type Item = Result<PagedResponse<Bundle>, ApiError>;

    fn next(&mut self) -> Option<Self::Item> {
        let page = self.next_page.take()?;
        let result = self.api.list_bundles_page(page, self.per_page);
        if let Ok(resp) = &result {
            if !resp.pagination.is_last() {
                self.next_page = Some(resp.pagination.page_number + 1);
            }
        }
        Some(result)
    }
}

/// Blocking HTTP implementation of [`BlueinkApi`].
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Token {}", config.api_key))
            .map_err(|e| ApiError::Io(std::io::Error::new(std::io::ErrorKind::InvalidInput, e)))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(ApiClient {
            client,
            base_url: config.base_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn send(&self, method: &str, url: &str, req: RequestBuilder) -> Result<Response, ApiError> {
        debug!(%method, %url, "sending request");
        let res = req.send()?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().unwrap_or_default();
            warn!(%method, %url, status = status.as_u16(), "request failed");
            return Err(ApiError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(res)
    }

    fn decode<T: DeserializeOwned>(res: Response) -> Result<ApiResponse<T>, ApiError> {
        let status = res.status().as_u16();
        let text = res.text()?;
        let body = if text.trim().is_empty() { "null" } else { &text };
        Ok(ApiResponse {
            status,
            data: serde_json::from_str(body)?,
        })
    }

    fn create_bundle_multipart(
        &self,
        url: &str,
        helper: &BundleHelper,
    ) -> Result<Response, ApiError> {
        let mut form =
            multipart::Form::new().text("bundle_request", serde_json::to_string(&helper.as_json())?);
        for (i, path) in helper.files().iter().enumerate() {
            let file = File::open(path)?;
            let file_name = path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("document.pdf")
                .to_string();
            let part = multipart::Part::reader(file)
                .file_name(file_name)
                .mime_str("application/pdf")?;
            form = form.part(format!("files[{}]", i), part);
        }
        self.send("POST", url, self.client.post(url).multipart(form))
    }
}

impl BlueinkApi for ApiClient {
    fn list_bundles(&self, status: Option<&str>) -> Result<ApiResponse<Vec<Bundle>>, ApiError> {
        let url = self.url("bundles/");
        let mut req = self.client.get(&url);
        if let Some(status) = status {
            req = req.query(&[("status", status)]);
        }
        Self::decode(self.send("GET", &url, req)?)
    }

    fn list_bundles_page(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<PagedResponse<Bundle>, ApiError> {
        let url = self.url("bundles/");
        let req = self
            .client
            .get(&url)
            .query(&[("page", page), ("per_page", per_page)]);
        let res = self.send("GET", &url, req)?;
        let header = res
            .headers()
            .get(PAGINATION_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(Pagination::from_header);
        let decoded: ApiResponse<Vec<Bundle>> = Self::decode(res)?;
        let pagination = header
            .unwrap_or_else(|| Pagination::single_page(page, per_page, decoded.data.len()));
        Ok(PagedResponse {
            status: decoded.status,
            pagination,
            data: decoded.data,
        })
    }

    fn create_bundle(&self, helper: &BundleHelper) -> Result<ApiResponse<Value>, ApiError> {
        let url = self.url("bundles/");
        let res = if helper.files().is_empty() {
            self.send("POST", &url, self.client.post(&url).json(&helper.as_json()))?
        } else {
            self.create_bundle_multipart(&url, helper)?
        };
        info!(label = %helper.label, "bundle created");
        Self::decode(res)
    }

    fn list_persons(&self) -> Result<ApiResponse<Vec<Person>>, ApiError> {
        let url = self.url("persons/");
        Self::decode(self.send("GET", &url, self.client.get(&url))?)
    }

    fn create_person(&self, helper: &PersonHelper) -> Result<ApiResponse<Value>, ApiError> {
        let url = self.url("persons/");
        let res = self.send("POST", &url, self.client.post(&url).json(&helper.as_dict()))?;
        info!(name = %helper.name, "person created");
        Self::decode(res)
    }

    fn update_person(
        &self,
        person_id: &str,
        data: &Map<String, Value>,
        partial: bool,
    ) -> Result<ApiResponse<Value>, ApiError> {
        let url = self.url(&format!("persons/{}/", person_id));
        let (method, req) = if partial {
            ("PATCH", self.client.patch(&url))
        } else {
            ("PUT", self.client.put(&url))
        };
        let res = self.send(method, &url, req.json(data))?;
        info!(%person_id, "person updated");
        Self::decode(res)
    }

    fn delete_person(&self, person_id: &str) -> Result<ApiResponse<Value>, ApiError> {
        let url = self.url(&format!("persons/{}/", person_id));
        let res = self.send("DELETE", &url, self.client.delete(&url))?;
        info!(%person_id, "person deleted");
        Self::decode(res)
    }
}
