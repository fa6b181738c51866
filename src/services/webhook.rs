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

//! Chat robot webhook notifier.
//!
//! Messages are posted as `{"msgtype":"text","text":{"content":...}}`. When a
//! signing secret is configured the request URL carries `timestamp` (epoch
//! milliseconds) and `sign`, the base64 HMAC-SHA256 of `"<timestamp>\n<secret>"`
//! keyed with the secret.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use reqwest::header::CONTENT_TYPE;
use serde_json::json;
use sha2::Sha256;
use url::Url;
use zeroize::Zeroizing;

use super::ServiceError;

type HmacSha256 = Hmac<Sha256>;

#[derive(Clone)]
pub struct Webhook {
    url: String,
    secret: Option<Zeroizing<String>>,
    proxy: Option<String>,
    client: Option<reqwest::Client>,
}

impl Webhook {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            secret: None,
            proxy: None,
            client: None,
        }
    }

    /// Sign every request with `secret`.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(Zeroizing::new(secret.into()));
        self
    }

    /// Route requests through `proxy` (any scheme reqwest accepts).
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Use a preconfigured HTTP client; the proxy setting is then ignored.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Post `title` and `message` and return the raw response body.
    pub async fn send(&self, title: &str, message: &str) -> Result<String, ServiceError> {
        let timestamp = chrono::Utc::now().timestamp_millis();
        let url = self.request_url(timestamp)?;
        let client = self.client()?;

        let response = client
            .post(url)
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .body(payload(title, message).to_string())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::warn!("Webhook answered {}: {}", status, body);
        } else {
            tracing::debug!("Webhook answered {}: {}", status, body);
        }
        Ok(body)
    }

    /// The target URL, with signature parameters when a secret is set.
    pub fn request_url(&self, timestamp_ms: i64) -> Result<Url, ServiceError> {
        let mut url = Url::parse(&self.url).map_err(|source| ServiceError::InvalidUrl {
            url: self.url.clone(),
            source,
        })?;

        if let Some(secret) = &self.secret {
            let timestamp = timestamp_ms.to_string();
            let signature = sign(secret, timestamp_ms)?;
            url.query_pairs_mut()
                .append_pair("timestamp", &timestamp)
                .append_pair("sign", &signature);
        }
        Ok(url)
    }

    fn client(&self) -> Result<reqwest::Client, ServiceError> {
        if let Some(client) = &self.client {
            return Ok(client.clone());
        }
        let mut builder = reqwest::Client::builder();
        if let Some(proxy) = &self.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy.as_str())?);
        }
        Ok(builder.build()?)
    }
}

impl std::fmt::Debug for Webhook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Webhook")
            .field("url", &self.url)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("proxy", &self.proxy)
            .finish()
    }
}

/// `base64(HMAC-SHA256(key = secret, "<timestamp_ms>\n<secret>"))`.
pub fn sign(secret: &str, timestamp_ms: i64) -> Result<String, ServiceError> {
    let string_to_sign = format!("{timestamp_ms}\n{secret}");
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| ServiceError::SigningKey)?;
    mac.update(string_to_sign.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

fn payload(title: &str, message: &str) -> serde_json::Value {
    json!({
        "msgtype": "text",
        "text": { "content": format!("{title}\n\n{message}") },
    })
}
