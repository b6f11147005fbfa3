#![allow(dead_code)]

//! Shared test doubles for the remote service and credential store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use tasklens::api::{
    AnalysisReport, AnalysisRequest, AnalysisService, ApiError, ChecklistItem, TaskRecord,
    TaskService, UpdateTaskArgs,
};
use tasklens::credentials::CredentialStore;

/// Scripted outcome for a remote call.
#[derive(Clone)]
pub enum Outcome {
    Ok,
    Auth(String),
    Network(String),
    Api(String),
}

impl Outcome {
    fn to_result(&self) -> Result<(), ApiError> {
        match self {
            Outcome::Ok => Ok(()),
            Outcome::Auth(m) => Err(ApiError::Auth(m.clone())),
            Outcome::Network(m) => Err(ApiError::Network(m.clone())),
            Outcome::Api(m) => Err(ApiError::Api(m.clone())),
        }
    }
}

/// Shorthand TaskRecord constructor.
pub fn record(id: &str, parent_id: Option<&str>, order: i32, content: &str) -> TaskRecord {
    TaskRecord {
        id: id.to_string(),
        parent_id: parent_id.map(str::to_string),
        order,
        content: content.to_string(),
        description: None,
        is_completed: false,
        priority: 1,
    }
}

/// Task service double with scripted responses and call counters.
pub struct ScriptedTaskService {
    records: Mutex<Vec<TaskRecord>>,
    list_outcome: Mutex<Outcome>,
    mutation_outcome: Mutex<Outcome>,
    /// When set, list calls sleep before returning so tests can observe
    /// whether operations interleave.
    pub list_delay: Option<Duration>,
    pub list_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    pub complete_calls: AtomicUsize,
    pub events: Mutex<Vec<String>>,
    pub seen_tokens: Mutex<Vec<String>>,
}

impl ScriptedTaskService {
    pub fn new(records: Vec<TaskRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            list_outcome: Mutex::new(Outcome::Ok),
            mutation_outcome: Mutex::new(Outcome::Ok),
            list_delay: None,
            list_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
            complete_calls: AtomicUsize::new(0),
            events: Mutex::new(Vec::new()),
            seen_tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn with_list_delay(mut self, delay: Duration) -> Self {
        self.list_delay = Some(delay);
        self
    }

    pub fn set_records(&self, records: Vec<TaskRecord>) {
        *self.records.lock().unwrap() = records;
    }

    pub fn fail_list(&self, outcome: Outcome) {
        *self.list_outcome.lock().unwrap() = outcome;
    }

    pub fn fail_mutations(&self, outcome: Outcome) {
        *self.mutation_outcome.lock().unwrap() = outcome;
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn note(&self, event: &str) {
        self.events.lock().unwrap().push(event.to_string());
    }

    fn mutate(&self, counter: &AtomicUsize, token: &str) -> Result<(), ApiError> {
        counter.fetch_add(1, Ordering::SeqCst);
        self.seen_tokens.lock().unwrap().push(token.to_string());
        self.mutation_outcome.lock().unwrap().to_result()
    }
}

#[async_trait]
impl TaskService for ScriptedTaskService {
    async fn list_tasks(&self, token: &str) -> Result<Vec<TaskRecord>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.seen_tokens.lock().unwrap().push(token.to_string());
        self.note("list:start");
        if let Some(delay) = self.list_delay {
            tokio::time::sleep(delay).await;
        }
        self.note("list:end");
        self.list_outcome.lock().unwrap().to_result()?;
        Ok(self.records.lock().unwrap().clone())
    }

    async fn update_task(
        &self,
        token: &str,
        _task_id: &str,
        _args: &UpdateTaskArgs,
    ) -> Result<(), ApiError> {
        self.mutate(&self.update_calls, token)
    }

    async fn delete_task(&self, token: &str, _task_id: &str) -> Result<(), ApiError> {
        self.mutate(&self.delete_calls, token)
    }

    async fn complete_task(&self, token: &str, _task_id: &str) -> Result<(), ApiError> {
        self.mutate(&self.complete_calls, token)
    }
}

/// Analysis service double.
pub struct ScriptedAnalysisService {
    outcome: Mutex<Outcome>,
    pub calls: AtomicUsize,
    pub last_request: Mutex<Option<(String, String)>>,
}

impl ScriptedAnalysisService {
    pub fn new() -> Self {
        Self {
            outcome: Mutex::new(Outcome::Ok),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn fail(&self, outcome: Outcome) {
        *self.outcome.lock().unwrap() = outcome;
    }
}

#[async_trait]
impl AnalysisService for ScriptedAnalysisService {
    async fn analyze(
        &self,
        _token: &str,
        request: &AnalysisRequest,
    ) -> Result<AnalysisReport, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() =
            Some((request.requirements.clone(), request.code.clone()));
        self.outcome.lock().unwrap().to_result()?;

        Ok(AnalysisReport {
            summary: "Looks reasonable".to_string(),
            checklist: vec![ChecklistItem {
                item_description: "Implements the endpoint".to_string(),
                details: "Route and handler present".to_string(),
                is_completed: true,
            }],
        })
    }
}

/// In-memory credential store with a clear-call counter.
pub struct MemoryCredentialStore {
    token: Mutex<Option<String>>,
    pub clear_calls: AtomicUsize,
}

impl MemoryCredentialStore {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
            clear_calls: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self {
            token: Mutex::new(None),
            clear_calls: AtomicUsize::new(0),
        }
    }

    pub fn clear_count(&self) -> usize {
        self.clear_calls.load(Ordering::SeqCst)
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    fn clear(&self) {
        self.clear_calls.fetch_add(1, Ordering::SeqCst);
        *self.token.lock().unwrap() = None;
    }
}
