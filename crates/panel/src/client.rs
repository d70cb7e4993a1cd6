//! Pterodactyl client API gateway.
//!
//! Async HTTP client using `reqwest` with Bearer token authentication.
//! Every call is bounded by [`DEFAULT_TIMEOUT`].

use std::time::Duration;

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use tracing::debug;

use crate::PanelError;
use crate::gateway::{GatewayFuture, RemoteGateway};
use crate::signal::PowerSignal;
use crate::types::{FileObject, FilesRequest, ListResponse, ObjectResponse, PowerRequest};

/// Per-call transport timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const CLIENT_USER_AGENT: &str = "WingFlow Client";

/// Panel API client scoped to a single server.
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    server_id: String,
}

impl Client {
    /// Creates a client for `server_id` on the panel at `url`.
    pub fn new(url: &str, api_key: &str, server_id: &str) -> Result<Self, PanelError> {
        Self::with_timeout(url, api_key, server_id, DEFAULT_TIMEOUT)
    }

    /// Like [`Client::new`] with a custom per-call timeout.
    pub fn with_timeout(
        url: &str,
        api_key: &str,
        server_id: &str,
        timeout: Duration,
    ) -> Result<Self, PanelError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|_| PanelError::InvalidKey)?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: url.trim_end_matches('/').to_string(),
            server_id: server_id.to_string(),
        })
    }

    /// Builds `{url}/api/client/servers/{id}{path}`.
    fn route(&self, path: &str) -> String {
        format!(
            "{}/api/client/servers/{}{}",
            self.base_url, self.server_id, path
        )
    }

    /// Sends a request and turns a non-success status into [`PanelError::Api`].
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, PanelError> {
        let resp = req.send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PanelError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp)
    }

    async fn connection_status(&self) -> Result<u16, PanelError> {
        let resp = self.http.get(self.route("")).send().await?;
        let status = resp.status();

        if status.is_success() || status.is_redirection() {
            Ok(status.as_u16())
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(PanelError::Api {
                status: status.as_u16(),
                body,
            })
        }
    }

    async fn root_files(&self) -> Result<Vec<String>, PanelError> {
        let req = self
            .http
            .get(self.route("/files/list"))
            .query(&[("directory", "/")]);
        let body = self.send(req).await?.bytes().await?;
        let list: ListResponse<ObjectResponse<FileObject>> = serde_json::from_slice(&body)?;

        Ok(list.data.into_iter().map(|f| f.attributes.name).collect())
    }

    async fn compress(&self, names: &[String]) -> Result<String, PanelError> {
        let req = self
            .http
            .post(self.route("/files/compress"))
            .json(&FilesRequest {
                root: "/",
                files: names,
            });
        let body = self.send(req).await?.bytes().await?;
        let archive: ObjectResponse<FileObject> = serde_json::from_slice(&body)?;

        debug!(archive = %archive.attributes.name, entries = names.len(), "created archive");
        Ok(archive.attributes.name)
    }

    async fn delete(&self, names: &[String]) -> Result<(), PanelError> {
        let req = self
            .http
            .post(self.route("/files/delete"))
            .json(&FilesRequest {
                root: "/",
                files: names,
            });
        self.send(req).await?;
        Ok(())
    }

    async fn power(&self, signal: PowerSignal) -> Result<(), PanelError> {
        let req = self
            .http
            .post(self.route("/power"))
            .json(&PowerRequest { signal });
        self.send(req).await?;
        Ok(())
    }

    async fn write(&self, remote_path: &str, contents: Vec<u8>) -> Result<(), PanelError> {
        let encoded = utf8_percent_encode(remote_path, NON_ALPHANUMERIC).to_string();
        let req = self
            .http
            .post(self.route(&format!("/files/write?file={encoded}")))
            .header(CONTENT_TYPE, "text/plain")
            .body(contents);
        self.send(req).await?;
        Ok(())
    }
}

impl RemoteGateway for Client {
    fn test_connection(&self) -> GatewayFuture<'_, u16> {
        Box::pin(self.connection_status())
    }

    fn list_root_files(&self) -> GatewayFuture<'_, Vec<String>> {
        Box::pin(self.root_files())
    }

    fn compress_files<'a>(&'a self, names: &'a [String]) -> GatewayFuture<'a, String> {
        Box::pin(self.compress(names))
    }

    fn delete_files<'a>(&'a self, names: &'a [String]) -> GatewayFuture<'a, ()> {
        Box::pin(self.delete(names))
    }

    fn set_power(&self, signal: PowerSignal) -> GatewayFuture<'_, ()> {
        Box::pin(self.power(signal))
    }

    fn write_file<'a>(&'a self, remote_path: &'a str, contents: Vec<u8>) -> GatewayFuture<'a, ()> {
        Box::pin(self.write(remote_path, contents))
    }
}
