#![allow(dead_code)]

use blueink_examples::api::BlueinkApi;
use blueink_examples::error::ApiError;
use blueink_examples::helpers::{BundleHelper, PersonHelper};
use blueink_examples::models::{ApiResponse, Bundle, PagedResponse, Pagination, Person};
use blueink_examples::prompt::Console;
use serde_json::{json, Map, Value};
use std::cell::RefCell;
use std::io::Cursor;

pub type TestConsole = Console<Cursor<Vec<u8>>, Vec<u8>>;

/// Console fed from a script of answers, one per line.
pub fn console(lines: &[&str]) -> TestConsole {
    let mut input = lines.join("\n");
    input.push('\n');
    Console::new(Cursor::new(input.into_bytes()), Vec::new())
}

pub fn output(console: TestConsole) -> String {
    String::from_utf8(console.into_output()).expect("utf8 output")
}

pub fn bundle(id: &str, label: &str, status: &str) -> Bundle {
    Bundle {
        id: id.into(),
        label: Some(label.into()),
        status: status.into(),
    }
}

pub fn person(id: &str, name: &str) -> Person {
    serde_json::from_value(json!({
        "id": id,
        "name": name,
        "metadata": {"source": "test"},
        "channels": [],
    }))
    .expect("person fixture")
}

fn http(status: u16, body: &str) -> ApiError {
    ApiError::Http {
        status,
        body: body.into(),
    }
}

/// In-memory stand-in for the BlueInk service that records every call.
#[derive(Default)]
pub struct FakeApi {
    pub bundles: Vec<Bundle>,
    pub persons: RefCell<Vec<Person>>,
    pub fail_create: bool,
    pub fail_list: bool,
    pub calls: RefCell<Vec<String>>,
    pub created_bundles: RefCell<Vec<Value>>,
    pub created_persons: RefCell<Vec<Value>>,
    pub updates: RefCell<Vec<(String, Map<String, Value>)>>,
}

impl FakeApi {
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl BlueinkApi for FakeApi {
    fn list_bundles(&self, status: Option<&str>) -> Result<ApiResponse<Vec<Bundle>>, ApiError> {
        self.record(format!("list_bundles({:?})", status));
        if self.fail_list {
            return Err(http(503, "unavailable"));
        }
        let data = self
            .bundles
            .iter()
            .filter(|b| status.map_or(true, |s| b.status == s))
            .cloned()
            .collect();
        Ok(ApiResponse { status: 200, data })
    }

    fn list_bundles_page(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<PagedResponse<Bundle>, ApiError> {
        self.record(format!("list_bundles_page({}, {})", page, per_page));
        let total = self.bundles.len() as u32;
        let total_pages = total.div_ceil(per_page).max(1);
        let data = self
            .bundles
            .iter()
            .skip(((page - 1) * per_page) as usize)
            .take(per_page as usize)
            .cloned()
            .collect();
        Ok(PagedResponse {
            status: 200,
            pagination: Pagination {
                page_number: page,
                total_pages,
                per_page,
                total_results: total,
            },
            data,
        })
    }

    fn create_bundle(&self, helper: &BundleHelper) -> Result<ApiResponse<Value>, ApiError> {
        self.record("create_bundle".into());
        if self.fail_create {
            return Err(http(400, "{\"packets\":[\"required\"]}"));
        }
        let body = helper.as_json();
        self.created_bundles.borrow_mut().push(body.clone());
        Ok(ApiResponse {
            status: 201,
            data: json!({"id": "new-bundle", "label": body["label"]}),
        })
    }

    fn list_persons(&self) -> Result<ApiResponse<Vec<Person>>, ApiError> {
        self.record("list_persons".into());
        if self.fail_list {
            return Err(http(500, "oops"));
        }
        Ok(ApiResponse {
            status: 200,
            data: self.persons.borrow().clone(),
        })
    }

    fn create_person(&self, helper: &PersonHelper) -> Result<ApiResponse<Value>, ApiError> {
        self.record("create_person".into());
        if self.fail_create {
            return Err(http(400, "{\"name\":[\"invalid\"]}"));
        }
        let body = helper.as_dict();
        self.created_persons.borrow_mut().push(body.clone());
        Ok(ApiResponse {
            status: 201,
            data: body,
        })
    }

    fn update_person(
        &self,
        person_id: &str,
        data: &Map<String, Value>,
        partial: bool,
    ) -> Result<ApiResponse<Value>, ApiError> {
        self.record(format!("update_person({}, partial={})", person_id, partial));
        self.updates
            .borrow_mut()
            .push((person_id.to_string(), data.clone()));
        Ok(ApiResponse {
            status: 200,
            data: Value::Object(data.clone()),
        })
    }

    fn delete_person(&self, person_id: &str) -> Result<ApiResponse<Value>, ApiError> {
        self.record(format!("delete_person({})", person_id));
        let mut persons = self.persons.borrow_mut();
        let before = persons.len();
        persons.retain(|p| p.id != person_id);
        if persons.len() == before {
            return Err(http(404, "{\"detail\":\"Not found.\"}"));
        }
        Ok(ApiResponse {
            status: 204,
            data: Value::Null,
        })
    }
}
