use std::time::Duration;

use api_types::{
    ErrorBody,
    raw::{RawPayload, RawRecord},
    record::{ArchivePayload, NewRecord, RecordUpdate},
};
use engine::{RecordStore, RemoteError};
use reqwest::{Response, StatusCode, Url};

use crate::error::{AppError, Result};

const ACTIVE: &str = "new-list";
const HISTORY: &str = "history";
/// Prefix tried once when a list endpoint is missing at the root.
const API_PREFIX: &str = "api/";

/// HTTP client for the persistence API.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|err| AppError::Invalid(format!("invalid base_url: {err}")))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, http })
    }

    fn endpoint(&self, path: &str) -> std::result::Result<Url, RemoteError> {
        self.base_url
            .join(path)
            .map_err(|err| RemoteError::Transport(format!("invalid url: {err}")))
    }

    fn item_endpoint(&self, resource: &str, id: &str) -> std::result::Result<Url, RemoteError> {
        let mut url = self.endpoint(resource)?;
        url.path_segments_mut()
            .map_err(|_| RemoteError::Transport("base_url cannot carry a path".to_string()))?
            .push(id);
        Ok(url)
    }

    async fn list(
        &self,
        resource: &str,
        user_id: &str,
    ) -> std::result::Result<RawPayload, RemoteError> {
        let mut res = self.get_list(resource, user_id).await?;
        if matches!(
            res.status(),
            StatusCode::NOT_FOUND | StatusCode::METHOD_NOT_ALLOWED
        ) {
            tracing::warn!(
                "{resource} answered {}, retrying under {API_PREFIX}",
                res.status()
            );
            res = self
                .get_list(&format!("{API_PREFIX}{resource}"), user_id)
                .await?;
        }

        let res = check(res).await?;
        res.json::<RawPayload>().await.map_err(transport)
    }

    async fn get_list(
        &self,
        path: &str,
        user_id: &str,
    ) -> std::result::Result<Response, RemoteError> {
        let endpoint = self.endpoint(path)?;
        self.http
            .get(endpoint)
            .query(&[("userId", user_id)])
            .send()
            .await
            .map_err(transport)
    }
}

impl RecordStore for Client {
    async fn list_active(&self, user_id: &str) -> std::result::Result<RawPayload, RemoteError> {
        self.list(ACTIVE, user_id).await
    }

    async fn create_active(
        &self,
        record: &NewRecord,
    ) -> std::result::Result<RawRecord, RemoteError> {
        let endpoint = self.endpoint(ACTIVE)?;
        let res = self
            .http
            .post(endpoint)
            .json(record)
            .send()
            .await
            .map_err(transport)?;
        let res = check(res).await?;

        // Some deployments answer with an empty body.
        let body = res.bytes().await.map_err(transport)?;
        if body.is_empty() {
            return Ok(RawRecord::default());
        }
        match serde_json::from_slice::<RawRecord>(&body) {
            Ok(created) => Ok(created),
            Err(err) => {
                tracing::warn!("unreadable create response: {err}");
                Ok(RawRecord::default())
            }
        }
    }

    async fn update_active(
        &self,
        id: &str,
        update: &RecordUpdate,
    ) -> std::result::Result<(), RemoteError> {
        let endpoint = self.item_endpoint(ACTIVE, id)?;
        let res = self
            .http
            .put(endpoint)
            .json(update)
            .send()
            .await
            .map_err(transport)?;
        check(res).await.map(drop)
    }

    async fn delete_active(&self, id: &str) -> std::result::Result<(), RemoteError> {
        let endpoint = self.item_endpoint(ACTIVE, id)?;
        let res = self
            .http
            .delete(endpoint)
            .send()
            .await
            .map_err(transport)?;
        check(res).await.map(drop)
    }

    async fn list_history(&self, user_id: &str) -> std::result::Result<RawPayload, RemoteError> {
        self.list(HISTORY, user_id).await
    }

    async fn create_history(
        &self,
        payload: &ArchivePayload,
    ) -> std::result::Result<(), RemoteError> {
        let endpoint = self.endpoint(HISTORY)?;
        let res = self
            .http
            .post(endpoint)
            .json(payload)
            .send()
            .await
            .map_err(transport)?;
        check(res).await.map(drop)
    }

    async fn delete_history(&self, id: &str) -> std::result::Result<(), RemoteError> {
        let endpoint = self.item_endpoint(HISTORY, id)?;
        let res = self
            .http
            .delete(endpoint)
            .send()
            .await
            .map_err(transport)?;
        check(res).await.map(drop)
    }
}

fn transport(err: reqwest::Error) -> RemoteError {
    RemoteError::Transport(err.to_string())
}

/// Passes successful responses through and turns the rest into
/// [`RemoteError::Server`].
async fn check(res: Response) -> std::result::Result<Response, RemoteError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res.json::<ErrorBody>().await.unwrap_or_default();
    Err(RemoteError::Server {
        status: status.as_u16(),
        error: body.error,
        message: body.message,
    })
}
