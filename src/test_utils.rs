// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses and the controller's collaborators.

use crate::kubernetes::{PodRestarter, ResourceStore};
use crate::types::{LabelSelector, ReconcileKey, VaultRestart, VaultRestartSpec, VaultRestartStatus};
use crate::vault::{SecretListing, SecretStore, VaultError};
use async_trait::async_trait;
use http::{Request, Response};
use http_body_util::BodyExt;
use kube::api::ObjectMeta;
use kube::client::Body;
use kube::Client;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

/// A request observed by the mock service
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub body: String,
}

/// A mock HTTP service that returns predefined responses based on request paths.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    /// Add a response for PATCH requests matching the exact path
    pub fn on_patch(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PATCH", path, status, body)
    }

    /// Add a response for DELETE requests matching the exact path
    pub fn on_delete(self, path: &str, status: u16, body: &str) -> Self {
        self.on("DELETE", path, status, body)
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Build a kube Client from this mock service. The service stays usable for inspection.
    pub fn client(&self) -> Client {
        Client::new(self.clone(), "default")
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        let responses = self.responses.lock().unwrap();

        // Exact match first, then the longest registered prefix
        if let Some(resp) = responses.get(&(method.to_string(), path.to_string())) {
            return Some(resp.clone());
        }

        responses
            .iter()
            .filter(|((m, p), _)| m == method && path.starts_with(p.as_str()))
            .max_by_key(|((_, p), _)| p.len())
            .map(|(_, resp)| resp.clone())
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();
        let query = req.uri().query().map(str::to_string);

        let response = self.find_response(&method, &path);
        let requests = self.requests.clone();

        Box::pin(async move {
            let body = req.into_body().collect().await?.to_bytes();
            requests.lock().unwrap().push(RecordedRequest {
                method,
                path,
                query,
                body: String::from_utf8_lossy(&body).to_string(),
            });

            let (status, body) = response.unwrap_or_else(|| {
                (404, not_found_json("resource", "unknown"))
            });

            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Create a VaultRestart JSON response
pub fn vault_restart_json(
    namespace: &str,
    name: &str,
    labels: &[(&str, &str)],
    polling_interval: Option<&str>,
    index: Option<u64>,
) -> String {
    serde_json::to_string(&make_vault_restart(
        namespace,
        name,
        labels,
        polling_interval,
        index,
    ))
    .unwrap()
}

/// Build a VaultRestart resource for tests
pub fn make_vault_restart(
    namespace: &str,
    name: &str,
    labels: &[(&str, &str)],
    polling_interval: Option<&str>,
    index: Option<u64>,
) -> VaultRestart {
    VaultRestart {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            uid: Some("test-uid".to_string()),
            ..Default::default()
        },
        spec: VaultRestartSpec {
            matching_labels: labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
            polling_interval: polling_interval.map(str::to_string),
        },
        status: index.map(|i| VaultRestartStatus { index: Some(i) }),
    }
}

/// Create an empty pod list, as returned by a collection delete
pub fn empty_pod_list_json() -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "PodList",
        "metadata": {"resourceVersion": "1"},
        "items": []
    })
    .to_string()
}

/// Create a generic failure status response
pub fn status_json(code: u16, reason: &str, message: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    status_json(404, "NotFound", &format!("{} \"{}\" not found", resource, name))
}

fn fake_api_error(code: u16, reason: &str) -> kube::Error {
    kube::Error::Api(kube::error::ErrorResponse {
        status: "Failure".to_string(),
        message: format!("injected {}", reason),
        reason: reason.to_string(),
        code,
    })
}

/// In-memory ResourceStore
#[derive(Default)]
pub struct FakeResourceStore {
    resources: Mutex<HashMap<ReconcileKey, VaultRestart>>,
    fail_get: bool,
    fail_updates: Mutex<bool>,
    status_updates: Mutex<usize>,
}

impl FakeResourceStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with(resource: VaultRestart) -> Self {
        let store = Self::default();
        store.insert(resource);
        store
    }

    pub fn insert(&self, resource: VaultRestart) {
        let key = ReconcileKey::for_resource(&resource).unwrap();
        self.resources.lock().unwrap().insert(key, resource);
    }

    pub fn failing_get() -> Self {
        Self {
            fail_get: true,
            ..Self::default()
        }
    }

    pub fn set_failing_updates(&self, failing: bool) {
        *self.fail_updates.lock().unwrap() = failing;
    }

    /// Number of successful status updates
    pub fn status_updates(&self) -> usize {
        *self.status_updates.lock().unwrap()
    }

    pub fn last_index(&self, key: &ReconcileKey) -> Option<u64> {
        self.resources
            .lock()
            .unwrap()
            .get(key)
            .and_then(|r| r.last_index())
    }
}

#[async_trait]
impl ResourceStore for FakeResourceStore {
    async fn get(&self, key: &ReconcileKey) -> Result<Option<VaultRestart>, kube::Error> {
        if self.fail_get {
            return Err(fake_api_error(500, "InternalError"));
        }
        Ok(self.resources.lock().unwrap().get(key).cloned())
    }

    async fn update_status(
        &self,
        key: &ReconcileKey,
        status: &VaultRestartStatus,
    ) -> Result<(), kube::Error> {
        if *self.fail_updates.lock().unwrap() {
            return Err(fake_api_error(409, "Conflict"));
        }
        let mut resources = self.resources.lock().unwrap();
        let resource = resources
            .get_mut(key)
            .ok_or_else(|| fake_api_error(404, "NotFound"))?;
        resource.status = Some(status.clone());
        *self.status_updates.lock().unwrap() += 1;
        Ok(())
    }
}

enum FakeListing {
    Index(u64),
    Error(fn() -> VaultError),
    Hang,
}

/// In-memory SecretStore reporting a settable index
pub struct FakeSecretStore {
    listing: Mutex<FakeListing>,
    listed: Mutex<Vec<String>>,
}

impl FakeSecretStore {
    fn new(listing: FakeListing) -> Self {
        Self {
            listing: Mutex::new(listing),
            listed: Mutex::new(Vec::new()),
        }
    }

    pub fn with_index(index: u64) -> Self {
        Self::new(FakeListing::Index(index))
    }

    /// Fails every query with the error `make` builds
    pub fn failing(make: fn() -> VaultError) -> Self {
        Self::new(FakeListing::Error(make))
    }

    /// Never answers
    pub fn hanging() -> Self {
        Self::new(FakeListing::Hang)
    }

    pub fn set_index(&self, index: u64) {
        *self.listing.lock().unwrap() = FakeListing::Index(index);
    }

    pub fn listed_paths(&self) -> Vec<String> {
        self.listed.lock().unwrap().clone()
    }
}

#[async_trait]
impl SecretStore for FakeSecretStore {
    async fn list(&self, path: &str) -> Result<SecretListing, VaultError> {
        self.listed.lock().unwrap().push(path.to_string());
        let result = match &*self.listing.lock().unwrap() {
            FakeListing::Index(index) => Some(Ok(SecretListing {
                entries: vec!["password".to_string()],
                index: *index,
            })),
            FakeListing::Error(make) => Some(Err(make())),
            FakeListing::Hang => None,
        };
        match result {
            Some(result) => result,
            None => std::future::pending().await,
        }
    }
}

/// PodRestarter recording every accepted deletion
#[derive(Default)]
pub struct FakePodRestarter {
    failing: Mutex<bool>,
    attempts: Mutex<usize>,
    deletions: Mutex<Vec<(String, String)>>,
}

impl FakePodRestarter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let restarter = Self::default();
        restarter.set_failing(true);
        restarter
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }

    /// Successful deletions as (namespace, selector)
    pub fn deletions(&self) -> Vec<(String, String)> {
        self.deletions.lock().unwrap().clone()
    }
}

#[async_trait]
impl PodRestarter for FakePodRestarter {
    async fn delete_matching(
        &self,
        namespace: &str,
        selector: &LabelSelector,
    ) -> Result<(), kube::Error> {
        *self.attempts.lock().unwrap() += 1;
        if *self.failing.lock().unwrap() {
            return Err(fake_api_error(403, "Forbidden"));
        }
        self.deletions
            .lock()
            .unwrap()
            .push((namespace.to_string(), selector.to_string()));
        Ok(())
    }
}
