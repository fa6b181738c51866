// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Search query passthrough for an Elasticsearch-compatible cluster.

use reqwest::header::CONTENT_TYPE;
use zeroize::Zeroizing;

use super::ServiceError;

#[derive(Clone)]
pub struct SearchClient {
    addresses: Vec<String>,
    username: Option<String>,
    password: Option<Zeroizing<String>>,
    client: reqwest::Client,
}

impl SearchClient {
    /// Client for the cluster nodes at `addresses`, tried in order.
    pub fn new<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            addresses: addresses.into_iter().map(Into::into).collect(),
            username: None,
            password: None,
            client: reqwest::Client::new(),
        }
    }

    /// Basic auth credentials. Sent only when both are non-empty.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(Zeroizing::new(password.into()));
        self
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn addresses(&self) -> &[String] {
        &self.addresses
    }

    /// Run `query` (a JSON query document) against `index`.
    ///
    /// Nodes are tried in order until one answers. The response body is
    /// returned whatever its status, minus any leading `[<status>]` marker.
    pub async fn search(&self, index: &str, query: &str) -> Result<String, ServiceError> {
        let mut last_error = None;

        for address in &self.addresses {
            let url = search_url(address, index);
            let mut request = self
                .client
                .post(&url)
                .header(CONTENT_TYPE, "application/json")
                .body(query.to_string());
            if let Some((username, password)) = self.credentials() {
                request = request.basic_auth(username, Some(password));
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await?;
                    tracing::debug!("Search on {} answered {}", url, status);
                    return Ok(strip_status_prefix(&body).to_string());
                }
                Err(e) => {
                    tracing::warn!("Search node {} unavailable: {}", address, e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => Err(ServiceError::Http(e)),
            None => Err(ServiceError::NoSearchAddress),
        }
    }

    fn credentials(&self) -> Option<(&str, &str)> {
        let username = self.username.as_deref().filter(|u| !u.is_empty())?;
        let password = self
            .password
            .as_ref()
            .map(|p| p.as_str())
            .filter(|p| !p.is_empty())?;
        Some((username, password))
    }
}

impl std::fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchClient")
            .field("addresses", &self.addresses)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

fn search_url(address: &str, index: &str) -> String {
    format!(
        "{}/{}/_search?pretty",
        address.trim_end_matches('/'),
        index.trim_matches('/')
    )
}

/// Drop a leading `[<status>]` marker such as `[200 OK] `.
pub fn strip_status_prefix(body: &str) -> &str {
    let trimmed = body.trim_start();
    if let Some(rest) = trimmed.strip_prefix('[') {
        if let Some((status, tail)) = rest.split_once(']') {
            if status.split_whitespace().next().is_some_and(|code| {
                code.len() == 3 && code.bytes().all(|b| b.is_ascii_digit())
            }) {
                return tail.trim_start();
            }
        }
    }
    body
}
