// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! HTTP client for the Vault API

use super::{SecretListing, SecretStore, VaultError};
use crate::config::VaultConfig;
use crate::constants::vault::{NAMESPACE_HEADER, TOKEN_HEADER};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument};
use url::Url;

#[derive(Deserialize)]
struct ListResponse {
    data: Option<ListData>,
}

#[derive(Deserialize)]
struct ListData {
    #[serde(default)]
    keys: Vec<String>,
}

/// KV v2 metadata read, `GET /v1/{mount}/metadata/{path}`
#[derive(Deserialize)]
struct MetadataResponse {
    data: Option<MetadataData>,
}

#[derive(Deserialize)]
struct MetadataData {
    current_version: Option<u64>,
    #[serde(default)]
    versions: BTreeMap<String, serde_json::Value>,
}

/// Where the version index of a path is read from
#[derive(Debug, Clone, PartialEq, Eq)]
enum IndexSource {
    /// `data.current_version` of a KV v2 metadata read
    Metadata,
    /// A numeric response header on a list request
    Header(String),
}

/// Vault client bound to one address and token
pub struct VaultClient {
    client: Client,
    addr: Url,
    token: String,
    namespace: Option<String>,
    source: IndexSource,
}

impl VaultClient {
    pub fn new(config: &VaultConfig) -> Result<Self, VaultError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        // Url::join replaces the last segment unless the base ends with '/'
        let mut addr = config.addr.clone();
        if !addr.path().ends_with('/') {
            let path = format!("{}/", addr.path());
            addr.set_path(&path);
        }

        let source = match &config.index_header {
            Some(header) => IndexSource::Header(header.clone()),
            None => IndexSource::Metadata,
        };

        Ok(Self {
            client,
            addr,
            token: config.token.clone(),
            namespace: config.namespace.clone(),
            source,
        })
    }

    fn request_url(&self, path: &str) -> Result<Url, VaultError> {
        let mut url = self
            .addr
            .join(&format!("v1/{}", path.trim_matches('/')))
            .map_err(|e| VaultError::InvalidResponse(format!("Invalid path {}: {}", path, e)))?;
        if matches!(self.source, IndexSource::Header(_)) {
            url.query_pairs_mut().append_pair("list", "true");
        }
        Ok(url)
    }

    fn parse_header_index(
        header: &str,
        headers: &reqwest::header::HeaderMap,
        path: &str,
    ) -> Result<u64, VaultError> {
        let raw = headers
            .get(header)
            .ok_or_else(|| VaultError::MissingIndex(format!("{} header absent for {}", header, path)))?
            .to_str()
            .map_err(|e| VaultError::MissingIndex(format!("{} header unreadable: {}", header, e)))?;

        raw.trim().parse::<u64>().map_err(|e| {
            VaultError::MissingIndex(format!("{} header '{}' is not an integer: {}", header, raw, e))
        })
    }

    fn parse_metadata(body: &str, path: &str) -> Result<SecretListing, VaultError> {
        let parsed: MetadataResponse = serde_json::from_str(body).map_err(|e| decode_error("metadata", e, body))?;
        let data = parsed
            .data
            .ok_or_else(|| VaultError::MissingIndex(format!("no metadata returned for {}", path)))?;
        let index = data.current_version.ok_or_else(|| {
            VaultError::MissingIndex(format!("metadata for {} has no current_version", path))
        })?;

        let mut entries: Vec<String> = data.versions.into_keys().collect();
        entries.sort_by_key(|v| v.parse::<u64>().unwrap_or(u64::MAX));

        Ok(SecretListing { entries, index })
    }

    fn parse_list(body: &str, index: u64) -> Result<SecretListing, VaultError> {
        let parsed: ListResponse = serde_json::from_str(body).map_err(|e| decode_error("list", e, body))?;
        let entries = parsed.data.map(|d| d.keys).unwrap_or_default();
        Ok(SecretListing { entries, index })
    }
}

fn decode_error(kind: &str, e: serde_json::Error, body: &str) -> VaultError {
    VaultError::InvalidResponse(format!(
        "error decoding {} response: {} - {}",
        kind,
        e,
        body.chars().take(200).collect::<String>()
    ))
}

#[async_trait]
impl SecretStore for VaultClient {
    #[instrument(skip(self))]
    async fn list(&self, path: &str) -> Result<SecretListing, VaultError> {
        let url = self.request_url(path)?;
        debug!("Reading Vault path {}", url.path());

        let mut request = self.client.get(url).header(TOKEN_HEADER, &self.token);
        if let Some(namespace) = &self.namespace {
            request = request.header(NAMESPACE_HEADER, namespace);
        }

        let response = request.send().await?;
        let status = response.status();

        match status {
            StatusCode::NOT_FOUND => return Err(VaultError::NotFound(path.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let body = response.text().await.unwrap_or_default();
                return Err(VaultError::PermissionDenied(format!("{}: {}", path, body)));
            }
            s if !s.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(VaultError::Api {
                    status: s.as_u16(),
                    body,
                });
            }
            _ => {}
        }

        let listing = match &self.source {
            IndexSource::Metadata => Self::parse_metadata(&response.text().await?, path)?,
            IndexSource::Header(header) => {
                let index = Self::parse_header_index(header, response.headers(), path)?;
                Self::parse_list(&response.text().await?, index)?
            }
        };

        debug!(
            "Vault path {} has {} entries at index {}",
            path,
            listing.entries.len(),
            listing.index
        );

        Ok(listing)
    }
}
