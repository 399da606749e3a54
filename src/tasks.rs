//! Async task management for non-blocking server calls.
//!
//! The main loop never awaits a request inline. Instead:
//! 1. [`App`](crate::app::App) queues an [`ApiRequest`] in its outbox
//! 2. The main loop drains the outbox and hands each request to [`TaskSpawner`]
//! 3. The spawned task sends an [`ApiMessage`] back through the channel
//! 4. The main loop polls the channel with `try_recv()` and feeds the message
//!    to the app
//!
//! Responses are delivered in completion order, not request order.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::{ResumeClient, ResumeId, ResumeSummary};
use crate::config::{Profile, Settings};
use crate::resume::Record;

/// What a loaded resume is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPurpose {
    /// Show it in the read-only detail view.
    View,
    /// Fill the edit form with it.
    Edit,
}

/// A server call requested by the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    /// Create the client, logging in if the profile has credentials.
    Connect { profile: Profile, settings: Settings },
    ListResumeIds,
    LoadResume { id: ResumeId, purpose: LoadPurpose },
    DeleteResume { id: ResumeId },
    /// Submit the edit form as `(control name, text)` pairs.
    SaveResume { fields: Vec<(String, String)> },
}

/// Messages sent from background tasks to the main event loop.
#[derive(Debug)]
pub enum ApiMessage {
    /// Initial client connection result.
    Connected(Result<ResumeClient, String>),

    /// The resume list.
    ResumeIdsFetched(Result<Vec<ResumeSummary>, String>),

    /// A single resume.
    ResumeLoaded {
        id: ResumeId,
        purpose: LoadPurpose,
        result: Result<Record, String>,
    },

    /// Delete result. The error carries the server's response text.
    ResumeDeleted {
        id: ResumeId,
        result: Result<String, String>,
    },

    /// Save result. The error carries the server's response text.
    ResumeSaved(Result<(), String>),
}

/// Spawns background tasks for server calls.
///
/// Each method clones what it needs and spawns a tokio task that sends its
/// result through the channel.
#[derive(Clone)]
pub struct TaskSpawner {
    tx: mpsc::UnboundedSender<ApiMessage>,
}

impl TaskSpawner {
    pub fn new(tx: mpsc::UnboundedSender<ApiMessage>) -> Self {
        Self { tx }
    }

    /// Spawn a task to connect (and log in) with the given profile.
    pub fn spawn_connect(&self, profile: Profile, settings: Settings) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = ResumeClient::connect(&profile, &settings)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(ApiMessage::Connected(result));
        });
    }

    /// Spawn the task serving one queued request.
    ///
    /// Requests other than [`ApiRequest::Connect`] need a connected client
    /// and are dropped with a warning without one.
    pub fn dispatch(&self, client: Option<&ResumeClient>, request: ApiRequest) {
        debug!(?request, "Dispatching request");
        match (request, client) {
            (ApiRequest::Connect { profile, settings }, _) => self.spawn_connect(profile, settings),
            (ApiRequest::ListResumeIds, Some(client)) => self.spawn_list_resume_ids(client),
            (ApiRequest::LoadResume { id, purpose }, Some(client)) => {
                self.spawn_load_resume(client, id, purpose)
            }
            (ApiRequest::DeleteResume { id }, Some(client)) => self.spawn_delete_resume(client, id),
            (ApiRequest::SaveResume { fields }, Some(client)) => {
                self.spawn_save_resume(client, fields)
            }
            (request, None) => warn!(?request, "No client, dropping request"),
        }
    }

    pub fn spawn_list_resume_ids(&self, client: &ResumeClient) {
        let tx = self.tx.clone();
        let client = client.clone();
        tokio::spawn(async move {
            let result = client.list_resume_ids().await.map_err(|e| e.to_string());
            let _ = tx.send(ApiMessage::ResumeIdsFetched(result));
        });
    }

    pub fn spawn_load_resume(&self, client: &ResumeClient, id: ResumeId, purpose: LoadPurpose) {
        let tx = self.tx.clone();
        let client = client.clone();
        tokio::spawn(async move {
            let result = client.load_resume(&id).await.map_err(|e| e.to_string());
            let _ = tx.send(ApiMessage::ResumeLoaded {
                id,
                purpose,
                result,
            });
        });
    }

    pub fn spawn_delete_resume(&self, client: &ResumeClient, id: ResumeId) {
        let tx = self.tx.clone();
        let client = client.clone();
        tokio::spawn(async move {
            let result = client
                .delete_resume(&id)
                .await
                .map_err(|e| e.response_text());
            let _ = tx.send(ApiMessage::ResumeDeleted { id, result });
        });
    }

    pub fn spawn_save_resume(&self, client: &ResumeClient, fields: Vec<(String, String)>) {
        let tx = self.tx.clone();
        let client = client.clone();
        tokio::spawn(async move {
            let result = client
                .save_resume(&fields)
                .await
                .map_err(|e| e.response_text());
            let _ = tx.send(ApiMessage::ResumeSaved(result));
        });
    }
}

/// Create a new task channel and spawner.
///
/// The receiver is polled in the main event loop; the spawner starts tasks.
pub fn create_task_channel() -> (mpsc::UnboundedReceiver<ApiMessage>, TaskSpawner) {
    let (tx, rx) = mpsc::unbounded_channel();
    (rx, TaskSpawner::new(tx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_server::{ok, response, serve};
    use std::time::Duration;

    #[test]
    fn test_channel_delivers_messages() {
        let (mut rx, spawner) = create_task_channel();
        spawner
            .tx
            .send(ApiMessage::ResumeIdsFetched(Ok(Vec::new())))
            .unwrap();
        assert!(matches!(
            rx.try_recv(),
            Ok(ApiMessage::ResumeIdsFetched(Ok(list))) if list.is_empty()
        ));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unreachable_server_reports_error() {
        let (mut rx, spawner) = create_task_channel();
        // Port 9 (discard) is never served in test environments.
        let client =
            ResumeClient::with_base("http://127.0.0.1:9", "resumes", Duration::from_secs(2))
                .unwrap();
        spawner.dispatch(Some(&client), ApiRequest::ListResumeIds);

        let message = rx.recv().await.unwrap();
        assert!(matches!(message, ApiMessage::ResumeIdsFetched(Err(_))));
    }

    #[tokio::test]
    async fn test_delete_failure_carries_server_text() {
        let (url, server) = serve(vec![response(
            "404 NOT FOUND",
            &[("Content-Type", "text/html")],
            "Resume not found or not authorized to delete",
        )])
        .await;
        let (mut rx, spawner) = create_task_channel();
        let client = ResumeClient::with_base(&url, "resumes", Duration::from_secs(5)).unwrap();

        spawner.dispatch(
            Some(&client),
            ApiRequest::DeleteResume {
                id: ResumeId::new("4"),
            },
        );

        match rx.recv().await.unwrap() {
            ApiMessage::ResumeDeleted { id, result } => {
                assert_eq!(id, ResumeId::new("4"));
                assert_eq!(
                    result,
                    Err("Resume not found or not authorized to delete".to_string())
                );
            }
            other => panic!("unexpected message: {:?}", other),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_save_rejection_carries_server_text() {
        let (url, server) = serve(vec![ok("text/html", "Error: Form validation failed.")]).await;
        let (mut rx, spawner) = create_task_channel();
        let client = ResumeClient::with_base(&url, "resumes", Duration::from_secs(5)).unwrap();

        spawner.dispatch(
            Some(&client),
            ApiRequest::SaveResume {
                fields: vec![("first_name".to_string(), "Ana".to_string())],
            },
        );

        assert!(matches!(
            rx.recv().await.unwrap(),
            ApiMessage::ResumeSaved(Err(text)) if text == "Error: Form validation failed."
        ));
        server.await.unwrap();
    }

    #[test]
    fn test_requests_without_client_are_dropped() {
        let (mut rx, spawner) = create_task_channel();
        spawner.dispatch(None, ApiRequest::SaveResume { fields: Vec::new() });
        assert!(rx.try_recv().is_err());
    }
}
