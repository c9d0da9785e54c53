//! Scripted generation client.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use vermeer_core::{GenerationRequest, TaskHandle, TaskSnapshot, TaskStatus};
use vermeer_error::{ApiError, ApiErrorKind, ApiResult};
use vermeer_interface::GenerationClient;

/// Client answering from scripted queues.
///
/// Submissions pop from one queue. Status fetches pop from a per-task queue
/// and answer PENDING once it runs dry.
#[derive(Debug, Default)]
pub struct MockGenerationClient {
    submits: Mutex<VecDeque<ApiResult<TaskHandle>>>,
    statuses: Mutex<HashMap<String, VecDeque<ApiResult<TaskSnapshot>>>>,
    status_delay: Duration,
    submit_calls: AtomicUsize,
    status_calls: AtomicUsize,
    requests: Mutex<Vec<GenerationRequest>>,
}

#[allow(dead_code)]
impl MockGenerationClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit_ok(self, task_id: &str) -> Self {
        self.submits
            .lock()
            .unwrap()
            .push_back(Ok(TaskHandle::new(task_id)));
        self
    }

    pub fn submit_err(self, err: ApiError) -> Self {
        self.submits.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn status(self, task_id: &str, response: ApiResult<TaskSnapshot>) -> Self {
        self.statuses
            .lock()
            .unwrap()
            .entry(task_id.to_string())
            .or_default()
            .push_back(response);
        self
    }

    pub fn with_status_delay(mut self, delay: Duration) -> Self {
        self.status_delay = delay;
        self
    }

    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationClient for MockGenerationClient {
    async fn submit(&self, request: &GenerationRequest) -> ApiResult<TaskHandle> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        self.submits.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(ApiError::new(ApiErrorKind::Malformed(
                "no scripted submission".to_string(),
            )))
        })
    }

    async fn fetch_status(&self, task_id: &str) -> ApiResult<TaskSnapshot> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        if !self.status_delay.is_zero() {
            tokio::time::sleep(self.status_delay).await;
        }

        let scripted = self
            .statuses
            .lock()
            .unwrap()
            .get_mut(task_id)
            .and_then(VecDeque::pop_front);
        scripted.unwrap_or_else(|| Ok(pending(task_id)))
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

pub fn pending(task_id: &str) -> TaskSnapshot {
    TaskSnapshot::new(task_id, TaskStatus::Pending)
}

pub fn success(task_id: &str, url: &str) -> TaskSnapshot {
    let mut snapshot = TaskSnapshot::new(task_id, TaskStatus::Success);
    snapshot.progress = Some(1.0);
    snapshot.image_urls.push(url.to_string());
    snapshot
}

pub fn failed(task_id: &str, message: &str) -> TaskSnapshot {
    let mut snapshot = TaskSnapshot::new(task_id, TaskStatus::Failed);
    snapshot.error_message = Some(message.to_string());
    snapshot
}
