//! [`TreeStore`] adapter for the Firebase Realtime Database REST API.
//!
//! One HTTP verb per trait operation: `GET {path}.json` reads a subtree
//! (absent paths come back as JSON `null`), `PUT` replaces a path,
//! `PATCH` on the root applies a multi-path update, and `POST` allocates
//! a child key (response `{"name": "<key>"}`). Everything is best-effort;
//! a non-success status becomes an error and no retry is attempted here.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde_json::Value;

use hostelhub_core::store::TreeStore;

use crate::config::StoreConfig;

pub struct FirebaseStore {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl FirebaseStore {
    pub fn new(config: &StoreConfig) -> Result<FirebaseStore> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build HTTP client")?;
        Ok(FirebaseStore {
            client,
            base_url: config.database_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        let mut url = format!("{}/{}.json", self.base_url, path.trim_matches('/'));
        if let Some(token) = &self.auth_token {
            url.push_str("?auth=");
            url.push_str(token);
        }
        url
    }

    /// Root URL for multi-path PATCH updates.
    fn root_url(&self) -> String {
        self.url("")
    }
}

#[async_trait]
impl TreeStore for FirebaseStore {
    async fn read(&self, path: &str) -> Result<Option<Value>> {
        let value: Value = self
            .client
            .get(self.url(path))
            .send()
            .await
            .with_context(|| format!("read request failed for {path}"))?
            .error_for_status()
            .with_context(|| format!("read rejected for {path}"))?
            .json()
            .await
            .with_context(|| format!("invalid JSON at {path}"))?;
        // The RTDB encodes an absent path as a literal null body.
        Ok(if value.is_null() { None } else { Some(value) })
    }

    async fn write(&self, path: &str, value: Value) -> Result<()> {
        self.client
            .put(self.url(path))
            .json(&value)
            .send()
            .await
            .with_context(|| format!("write request failed for {path}"))?
            .error_for_status()
            .with_context(|| format!("write rejected for {path}"))?;
        Ok(())
    }

    async fn write_many(&self, updates: &[(String, Value)]) -> Result<()> {
        let body: serde_json::Map<String, Value> = updates
            .iter()
            .map(|(path, value)| (path.clone(), value.clone()))
            .collect();
        self.client
            .patch(self.root_url())
            .json(&body)
            .send()
            .await
            .context("batch write request failed")?
            .error_for_status()
            .context("batch write rejected")?;
        Ok(())
    }

    async fn push(&self, parent: &str) -> Result<String> {
        // POST an empty object: the store allocates and returns a key but
        // prunes the empty child, so nothing is materialized until the
        // follow-up write.
        let response: Value = self
            .client
            .post(self.url(parent))
            .json(&serde_json::json!({}))
            .send()
            .await
            .with_context(|| format!("key allocation failed under {parent}"))?
            .error_for_status()
            .with_context(|| format!("key allocation rejected under {parent}"))?
            .json()
            .await
            .context("invalid key allocation response")?;
        response
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| anyhow!("key allocation response missing name: {response}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(url: &str, token: Option<&str>) -> FirebaseStore {
        FirebaseStore::new(&StoreConfig {
            database_url: url.to_string(),
            auth_token: token.map(str::to_owned),
            timeout_secs: 30,
        })
        .unwrap()
    }

    #[test]
    fn test_url_building() {
        let s = store("https://x-default-rtdb.firebaseio.com/", None);
        assert_eq!(
            s.url("Complain/u1/c1"),
            "https://x-default-rtdb.firebaseio.com/Complain/u1/c1.json"
        );
    }

    #[test]
    fn test_url_with_auth_token() {
        let s = store("https://x.firebaseio.com", Some("tok"));
        assert_eq!(s.url("Student"), "https://x.firebaseio.com/Student.json?auth=tok");
    }

    #[test]
    fn test_root_url() {
        let s = store("https://x.firebaseio.com", None);
        assert_eq!(s.root_url(), "https://x.firebaseio.com/.json");
    }
}
