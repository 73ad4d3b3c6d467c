//! In-memory [`WorkflowApi`] used by the engine tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use flowsync_api::{ApiError, ApiSurface, WorkflowApi};
use flowsync_types::WorkflowPayload;
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Probe,
    List(Option<String>),
    Create(Value),
    Update(String, Value),
    ListCredentials,
}

/// Scripted transport that records every call.
pub struct FakeApi {
    pub probe_status: Option<u16>,
    pub list_pages: Mutex<VecDeque<Result<Value, u16>>>,
    pub credentials: Result<Value, u16>,
    pub write_status: Option<u16>,
    pub log: Mutex<Vec<Call>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            probe_status: None,
            list_pages: Mutex::new(VecDeque::new()),
            credentials: Ok(json!({"data": []})),
            write_status: None,
            log: Mutex::new(Vec::new()),
        }
    }
}

impl FakeApi {
    pub fn with_pages(pages: Vec<Result<Value, u16>>) -> Self {
        Self {
            list_pages: Mutex::new(pages.into()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, Call::Create(_) | Call::Update(..)))
            .collect()
    }

    fn record(&self, call: Call) {
        self.log.lock().unwrap().push(call);
    }

    fn failure(status: u16) -> ApiError {
        ApiError::Status {
            status,
            body: format!("scripted failure {status}"),
        }
    }
}

#[async_trait]
impl WorkflowApi for FakeApi {
    fn surface(&self) -> ApiSurface {
        ApiSurface::ApiKey
    }

    fn base_url(&self) -> &str {
        "http://fake.invalid"
    }

    async fn probe(&self) -> Result<(), ApiError> {
        self.record(Call::Probe);
        match self.probe_status {
            Some(status) => Err(Self::failure(status)),
            None => Ok(()),
        }
    }

    async fn list_workflows(&self, cursor: Option<&str>) -> Result<Value, ApiError> {
        self.record(Call::List(cursor.map(str::to_string)));
        match self.list_pages.lock().unwrap().pop_front() {
            Some(Ok(page)) => Ok(page),
            Some(Err(status)) => Err(Self::failure(status)),
            None => Ok(json!([])),
        }
    }

    async fn create_workflow(&self, payload: &WorkflowPayload) -> Result<Value, ApiError> {
        let body = payload.to_value();
        self.record(Call::Create(body.clone()));
        match self.write_status {
            Some(status) => Err(Self::failure(status)),
            None => Ok(json!({"id": "new-1", "name": body["name"]})),
        }
    }

    async fn update_workflow(&self, id: &str, payload: &WorkflowPayload) -> Result<Value, ApiError> {
        self.record(Call::Update(id.to_string(), payload.to_value()));
        match self.write_status {
            Some(status) => Err(Self::failure(status)),
            None => Ok(json!({"data": {"id": id}})),
        }
    }

    async fn list_credentials(&self) -> Result<Value, ApiError> {
        self.record(Call::ListCredentials);
        self.credentials.clone().map_err(Self::failure)
    }
}
