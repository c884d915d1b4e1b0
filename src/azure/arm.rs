//! Azure Resource Manager REST calls.
//!
//! Mutating calls are followed to completion: the `Azure-AsyncOperation`
//! status document when the provider returns one, else the `Location` header,
//! else the resource's own `provisioningState`. Every wait is bounded by the
//! configured operation timeout.

use azure_core::auth::TokenCredential;
use reqwest::header::{HeaderMap, LOCATION, RETRY_AFTER};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::credential::bearer_token;
use crate::error::{ProvisionError, Result};

/// Public cloud management endpoint.
pub const ARM_ENDPOINT: &str = "https://management.azure.com";

const ASYNC_OPERATION_HEADER: &str = "azure-asyncoperation";

#[derive(Deserialize, Debug, Default)]
pub struct ArmErrorDetail {
    pub code: Option<String>,
    pub message: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ArmErrorBody {
    error: ArmErrorDetail,
}

/// Body of an `Azure-AsyncOperation` status URL.
#[derive(Deserialize, Debug)]
pub struct OperationStatus {
    pub status: String,
    pub error: Option<ArmErrorDetail>,
}

/// Terminal outcome of a long-running operation, if it has one yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationState {
    InProgress,
    Succeeded,
    Failed(String),
}

impl OperationStatus {
    pub fn state(&self) -> OperationState {
        match self.status.as_str() {
            "Succeeded" => OperationState::Succeeded,
            "Failed" | "Canceled" | "Cancelled" => {
                let message = self
                    .error
                    .as_ref()
                    .map(detail_message)
                    .unwrap_or_else(|| format!("operation {}", self.status));
                OperationState::Failed(message)
            }
            _ => OperationState::InProgress,
        }
    }
}

/// Map a resource `provisioningState` onto the same outcome scale.
pub fn provisioning_state(state: Option<&str>) -> OperationState {
    match state {
        None | Some("Succeeded") => OperationState::Succeeded,
        Some(s @ ("Failed" | "Canceled")) => OperationState::Failed(format!("provisioningState={s}")),
        Some(_) => OperationState::InProgress,
    }
}

fn detail_message(detail: &ArmErrorDetail) -> String {
    match (&detail.code, &detail.message) {
        (Some(code), Some(message)) => format!("{code}: {message}"),
        (None, Some(message)) => message.clone(),
        (Some(code), None) => code.clone(),
        (None, None) => "unknown error".to_string(),
    }
}

/// Human readable message from an ARM error response.
pub fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ArmErrorBody>(body) {
        Ok(b) => format!("HTTP {} {}", status.as_u16(), detail_message(&b.error)),
        Err(_) if body.trim().is_empty() => format!("HTTP {status}"),
        Err(_) => format!("HTTP {} {}", status.as_u16(), body.trim()),
    }
}

/// Seconds from a `Retry-After` header.
pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

fn header_url(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

/// Authenticated client for one subscription.
pub struct ArmClient {
    http: reqwest::Client,
    credential: Arc<dyn TokenCredential>,
    endpoint: String,
    subscription_id: String,
    poll_interval: Duration,
    operation_timeout: Duration,
}

impl ArmClient {
    pub fn new(
        credential: Arc<dyn TokenCredential>,
        subscription_id: &str,
        poll_interval: Duration,
        operation_timeout: Duration,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            credential,
            endpoint: ARM_ENDPOINT.to_string(),
            subscription_id: subscription_id.to_string(),
            poll_interval,
            operation_timeout,
        }
    }

    /// Point the client at another management endpoint (sovereign cloud or a local stub).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    /// `/subscriptions/{id}/resourceGroups/{rg}/providers/{namespace}/{kind}/{name}`
    pub fn resource_path(&self, resource_group: &str, namespace: &str, kind: &str, name: &str) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{resource_group}/providers/{namespace}/{kind}/{name}",
            self.subscription_id
        )
    }

    /// Absolute URL for a resource path (or full resource id).
    pub fn url(&self, path: &str, api_version: &str) -> String {
        format!("{}{path}?api-version={api_version}", self.endpoint)
    }

    async fn send(&self, method: Method, url: &str, body: Option<&serde_json::Value>) -> Result<Response> {
        let token = bearer_token(self.credential.as_ref()).await?;
        log::debug!("{method} {url}");
        let mut request = self.http.request(method, url).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    /// Pass successful responses through; turn the rest into errors.
    async fn check(response: Response, step: &str, mutating: bool) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = error_message(status, &body);
        log::warn!("{step}: {message}");
        if mutating {
            Err(ProvisionError::ResourceOperationError {
                step: step.to_string(),
                message,
            })
        } else {
            Err(ProvisionError::CloudServiceError(format!("{step}: {message}")))
        }
    }

    async fn bounded<T>(&self, step: &str, fut: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::time::timeout(self.operation_timeout, fut)
            .await
            .map_err(|_| {
                log::error!("{step} timed out after {:?}", self.operation_timeout);
                ProvisionError::Timeout {
                    operation: step.to_string(),
                    limit: self.operation_timeout,
                }
            })?
    }

    /// HEAD a resource: 2xx means it exists, 404 means it does not.
    pub async fn exists(&self, url: &str, step: &str) -> Result<bool> {
        self.bounded(step, async {
            let response = self.send(Method::HEAD, url, None).await?;
            match response.status() {
                StatusCode::NOT_FOUND => Ok(false),
                s if s.is_success() => Ok(true),
                _ => Self::check(response, step, false).await.map(|_| false),
            }
        })
        .await
    }

    pub async fn get<T: DeserializeOwned>(&self, url: &str, step: &str) -> Result<T> {
        let response = self.send(Method::GET, url, None).await?;
        let response = Self::check(response, step, false).await?;
        Ok(response.json::<T>().await?)
    }

    /// PUT a resource and wait until it is provisioned; returns the final resource.
    pub async fn put_and_wait<T: DeserializeOwned>(
        &self,
        url: &str,
        body: &serde_json::Value,
        step: &str,
    ) -> Result<T> {
        self.bounded(step, async {
            let response = self.send(Method::PUT, url, Some(body)).await?;
            let response = Self::check(response, step, true).await?;
            if let Some(op_url) = header_url(response.headers(), ASYNC_OPERATION_HEADER) {
                let delay = retry_after(response.headers()).unwrap_or(self.poll_interval);
                self.poll_async_operation(&op_url, step, delay).await?;
            }
            self.poll_provisioning_state(url, step).await
        })
        .await
    }

    /// POST an action (e.g. `powerOff`) and wait for it to finish.
    pub async fn post_and_wait(&self, url: &str, step: &str) -> Result<()> {
        self.bounded(step, self.send_and_wait(Method::POST, url, step))
            .await
    }

    /// DELETE a resource and wait for the provider to finish.
    pub async fn delete_and_wait(&self, url: &str, step: &str) -> Result<()> {
        self.bounded(step, self.send_and_wait(Method::DELETE, url, step))
            .await
    }

    async fn send_and_wait(&self, method: Method, url: &str, step: &str) -> Result<()> {
        let response = self.send(method, url, None).await?;
        let response = Self::check(response, step, true).await?;
        if response.status() != StatusCode::ACCEPTED && response.status() != StatusCode::CREATED {
            return Ok(());
        }
        let headers = response.headers();
        let delay = retry_after(headers).unwrap_or(self.poll_interval);
        if let Some(op_url) = header_url(headers, ASYNC_OPERATION_HEADER) {
            self.poll_async_operation(&op_url, step, delay).await
        } else if let Some(location) = header_url(headers, LOCATION.as_str()) {
            self.poll_location(&location, step, delay).await
        } else {
            log::warn!("{step}: accepted without a status URL, assuming done");
            Ok(())
        }
    }

    async fn poll_async_operation(&self, op_url: &str, step: &str, mut delay: Duration) -> Result<()> {
        loop {
            tokio::time::sleep(delay).await;
            let response = self.send(Method::GET, op_url, None).await?;
            let response = Self::check(response, step, false).await?;
            delay = retry_after(response.headers()).unwrap_or(self.poll_interval);
            let status: OperationStatus = response.json().await?;
            match status.state() {
                OperationState::Succeeded => return Ok(()),
                OperationState::Failed(message) => {
                    return Err(ProvisionError::ResourceOperationError {
                        step: step.to_string(),
                        message,
                    })
                }
                OperationState::InProgress => {
                    log::trace!("{step}: status={} next poll in {delay:?}", status.status)
                }
            }
        }
    }

    async fn poll_location(&self, location: &str, step: &str, mut delay: Duration) -> Result<()> {
        loop {
            tokio::time::sleep(delay).await;
            let response = self.send(Method::GET, location, None).await?;
            if response.status() == StatusCode::ACCEPTED {
                delay = retry_after(response.headers()).unwrap_or(self.poll_interval);
                log::trace!("{step}: still accepted, next poll in {delay:?}");
                continue;
            }
            Self::check(response, step, true).await?;
            return Ok(());
        }
    }

    async fn poll_provisioning_state<T: DeserializeOwned>(&self, url: &str, step: &str) -> Result<T> {
        loop {
            let resource: serde_json::Value = self.get(url, step).await?;
            let state = resource
                .pointer("/properties/provisioningState")
                .and_then(|v| v.as_str());
            match provisioning_state(state) {
                OperationState::Succeeded => {
                    return serde_json::from_value(resource).map_err(|e| {
                        ProvisionError::CloudServiceError(format!("{step}: unexpected response: {e}"))
                    })
                }
                OperationState::Failed(message) => {
                    return Err(ProvisionError::ResourceOperationError {
                        step: step.to_string(),
                        message,
                    })
                }
                OperationState::InProgress => {
                    log::debug!("{step}: provisioningState={state:?}");
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::credential::tests::StaticCredential;
    use super::*;
    use crate::models::ArmResource;
    use reqwest::header::HeaderValue;
    use std::sync::Mutex;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    enum Reply {
        Respond {
            status: u16,
            headers: Vec<(String, String)>,
            body: String,
        },
        Hang,
    }

    fn reply(status: u16, headers: &[(&str, &str)], body: &str) -> Reply {
        Reply::Respond {
            status,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: body.to_string(),
        }
    }

    /// Read one request; returns `"METHOD /path?query"`.
    async fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let mut wanted = None;
        loop {
            if let Some(total) = wanted {
                if buf.len() >= total {
                    break;
                }
            }
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if wanted.is_none() {
                if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                    let body_len = head
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    wanted = Some(end + 4 + body_len);
                }
            }
        }
        let text = String::from_utf8_lossy(&buf);
        let first = text.lines().next().unwrap_or_default();
        first.rsplitn(2, ' ').nth(1).unwrap_or_default().to_string()
    }

    /// Local HTTP server answering one scripted reply per connection.
    async fn serve(script: impl FnOnce(&str) -> Vec<Reply>) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let replies = script(&base);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();
        tokio::spawn(async move {
            for next in replies {
                let (mut stream, _) = listener.accept().await.unwrap();
                let request = read_request(&mut stream).await;
                log.lock().unwrap().push(request);
                match next {
                    Reply::Hang => std::future::pending::<()>().await,
                    Reply::Respond {
                        status,
                        headers,
                        body,
                    } => {
                        let mut out = format!(
                            "HTTP/1.1 {status} Scripted\r\ncontent-length: {}\r\nconnection: close\r\n",
                            body.len()
                        );
                        for (name, value) in headers {
                            out.push_str(&format!("{name}: {value}\r\n"));
                        }
                        out.push_str("\r\n");
                        out.push_str(&body);
                        stream.write_all(out.as_bytes()).await.unwrap();
                        stream.shutdown().await.ok();
                    }
                }
            }
        });
        (base, seen)
    }

    fn client(base: &str, timeout: Duration) -> ArmClient {
        ArmClient::new(
            Arc::new(StaticCredential { hang: false }),
            "sub-1",
            Duration::from_millis(5),
            timeout,
        )
        .with_endpoint(base)
    }

    fn requests(seen: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
        seen.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn test_delete_follows_location_until_done() {
        let (base, seen) = serve(|base| {
            let op = format!("{base}/operations/1");
            vec![
                reply(202, &[("Location", op.as_str()), ("Retry-After", "0")], ""),
                reply(202, &[("Location", op.as_str()), ("Retry-After", "0")], ""),
                reply(200, &[], ""),
            ]
        })
        .await;
        let arm = client(&base, Duration::from_secs(5));
        let url = arm.url("/subscriptions/sub-1/resourcegroups/rg1", "2021-04-01");

        arm.delete_and_wait(&url, "Delete resource group 'rg1'")
            .await
            .unwrap();
        assert_eq!(
            requests(&seen),
            vec![
                "DELETE /subscriptions/sub-1/resourcegroups/rg1?api-version=2021-04-01",
                "GET /operations/1",
                "GET /operations/1",
            ]
        );
    }

    #[tokio::test]
    async fn test_async_operation_failure_is_reported() {
        let (base, seen) = serve(|base| {
            let status = format!("{base}/status/7");
            vec![
                reply(202, &[("Azure-AsyncOperation", status.as_str())], ""),
                reply(200, &[], r#"{"status": "InProgress"}"#),
                reply(
                    200,
                    &[],
                    r#"{"status": "Failed", "error": {"code": "QuotaExceeded", "message": "no cores"}}"#,
                ),
            ]
        })
        .await;
        let arm = client(&base, Duration::from_secs(5));
        let path = arm.resource_path("rg1", "Microsoft.Compute", "virtualMachines", "vm1");

        let err = arm
            .post_and_wait(&arm.url(&format!("{path}/powerOff"), "2024-03-01"), "Power off")
            .await
            .unwrap_err();
        match err {
            ProvisionError::ResourceOperationError { step, message } => {
                assert_eq!(step, "Power off");
                assert_eq!(message, "QuotaExceeded: no cores");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(requests(&seen).len(), 3);
    }

    #[tokio::test]
    async fn test_put_waits_for_provisioned_resource() {
        let (base, seen) = serve(|base| {
            let status = format!("{base}/status/1");
            vec![
                reply(201, &[("Azure-AsyncOperation", status.as_str()), ("Retry-After", "0")], "{}"),
                reply(200, &[], r#"{"status": "Succeeded"}"#),
                reply(
                    200,
                    &[],
                    r#"{"id": "/vnets/vnet1", "name": "vnet1", "properties": {"provisioningState": "Succeeded"}}"#,
                ),
            ]
        })
        .await;
        let arm = client(&base, Duration::from_secs(5));
        let path = arm.resource_path("rg1", "Microsoft.Network", "virtualNetworks", "vnet1");
        let url = arm.url(&path, "2023-09-01");

        let vnet: ArmResource = arm
            .put_and_wait(&url, &serde_json::json!({"location": "eastus"}), "Create vnet1")
            .await
            .unwrap();
        assert_eq!(vnet.id, "/vnets/vnet1");
        let seen = requests(&seen);
        assert!(seen[0].starts_with("PUT /subscriptions/sub-1/resourceGroups/rg1/providers/Microsoft.Network/virtualNetworks/vnet1"));
        assert_eq!(seen[1], "GET /status/1");
        assert!(seen[2].starts_with("GET /subscriptions/sub-1/resourceGroups/rg1"));
    }

    #[tokio::test]
    async fn test_rejected_put_carries_provider_message() {
        let (base, _seen) = serve(|_| {
            vec![reply(
                409,
                &[],
                r#"{"error": {"code": "InUseSubnetCannotBeDeleted", "message": "subnet in use"}}"#,
            )]
        })
        .await;
        let arm = client(&base, Duration::from_secs(5));

        let err = arm
            .put_and_wait::<ArmResource>(&arm.url("/x", "1"), &serde_json::json!({}), "Create subnet")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Create subnet failed: HTTP 409 InUseSubnetCannotBeDeleted: subnet in use"
        );
    }

    #[tokio::test]
    async fn test_exists_maps_not_found() {
        let (base, _seen) = serve(|_| vec![reply(404, &[], ""), reply(204, &[], "")]).await;
        let arm = client(&base, Duration::from_secs(5));
        let url = arm.url("/subscriptions/sub-1/resourcegroups/rg1", "2021-04-01");

        assert!(!arm.exists(&url, "Check rg1").await.unwrap());
        assert!(arm.exists(&url, "Check rg1").await.unwrap());
    }

    #[tokio::test]
    async fn test_hung_provider_times_out() {
        let (base, _seen) = serve(|_| vec![Reply::Hang]).await;
        let arm = client(&base, Duration::from_millis(200));
        let url = arm.url("/subscriptions/sub-1/resourcegroups/rg1", "2021-04-01");

        let err = arm.exists(&url, "Check rg1").await.unwrap_err();
        match err {
            ProvisionError::Timeout { operation, limit } => {
                assert_eq!(operation, "Check rg1");
                assert_eq!(limit, Duration::from_millis(200));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_operation_status_states() {
        let s: OperationStatus = serde_json::from_str(r#"{"status": "InProgress"}"#).unwrap();
        assert_eq!(s.state(), OperationState::InProgress);
        let s: OperationStatus = serde_json::from_str(r#"{"status": "Succeeded"}"#).unwrap();
        assert_eq!(s.state(), OperationState::Succeeded);
        let s: OperationStatus = serde_json::from_str(
            r#"{"status": "Failed", "error": {"code": "QuotaExceeded", "message": "Not enough cores"}}"#,
        )
        .unwrap();
        assert_eq!(
            s.state(),
            OperationState::Failed("QuotaExceeded: Not enough cores".to_string())
        );
        let s: OperationStatus = serde_json::from_str(r#"{"status": "Canceled"}"#).unwrap();
        assert_eq!(s.state(), OperationState::Failed("operation Canceled".to_string()));
    }

    #[test]
    fn test_provisioning_state() {
        assert_eq!(provisioning_state(None), OperationState::Succeeded);
        assert_eq!(provisioning_state(Some("Succeeded")), OperationState::Succeeded);
        assert_eq!(provisioning_state(Some("Updating")), OperationState::InProgress);
        assert!(matches!(provisioning_state(Some("Failed")), OperationState::Failed(_)));
    }

    #[test]
    fn test_error_message() {
        let body = r#"{"error": {"code": "ResourceGroupNotFound", "message": "Resource group 'rg' could not be found."}}"#;
        assert_eq!(
            error_message(StatusCode::NOT_FOUND, body),
            "HTTP 404 ResourceGroupNotFound: Resource group 'rg' could not be found."
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "upstream"),
            "HTTP 502 upstream"
        );
        assert_eq!(
            error_message(StatusCode::FORBIDDEN, ""),
            "HTTP 403 Forbidden"
        );
    }

    #[test]
    fn test_retry_after() {
        let mut headers = HeaderMap::new();
        assert_eq!(retry_after(&headers), None);
        headers.insert(RETRY_AFTER, HeaderValue::from_static("15"));
        assert_eq!(retry_after(&headers), Some(Duration::from_secs(15)));
        headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));
        assert_eq!(retry_after(&headers), None);
    }
}
