use std::future::Future;

use api_types::{
    raw::{RawPayload, RawRecord},
    record::{ArchivePayload, NewRecord, RecordUpdate},
};
use thiserror::Error;

/// A failed call to the persistence API.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RemoteError {
    /// The request never produced an HTTP response.
    #[error("{0}")]
    Transport(String),
    /// The server answered with a non-success status.
    #[error("{}", server_message(.status, .error, .message))]
    Server {
        status: u16,
        /// Structured error text (`{ "error": ... }`).
        error: Option<String>,
        /// Generic message text (`{ "message": ... }`).
        message: Option<String>,
    },
}

impl RemoteError {
    /// Text to show the user: the structured server error, else the
    /// generic server message, else the transport error.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

fn server_message(status: &u16, error: &Option<String>, message: &Option<String>) -> String {
    error
        .iter()
        .chain(message.iter())
        .find(|text| !text.trim().is_empty())
        .cloned()
        .unwrap_or_else(|| format!("request failed with status {status}"))
}

/// The remote API holding active and archived records.
///
/// Implementations map one method to one request; nothing is retried
/// here.
pub trait RecordStore {
    /// `GET /new-list?userId=…`
    fn list_active(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<RawPayload, RemoteError>> + Send;

    /// `POST /new-list`
    fn create_active(
        &self,
        record: &NewRecord,
    ) -> impl Future<Output = Result<RawRecord, RemoteError>> + Send;

    /// `PUT /new-list/{id}`
    fn update_active(
        &self,
        id: &str,
        update: &RecordUpdate,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// `DELETE /new-list/{id}`
    fn delete_active(&self, id: &str) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// `GET /history?userId=…`
    fn list_history(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<RawPayload, RemoteError>> + Send;

    /// `POST /history`
    fn create_history(
        &self,
        payload: &ArchivePayload,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// `DELETE /history/{id}`
    fn delete_history(&self, id: &str) -> impl Future<Output = Result<(), RemoteError>> + Send;
}
