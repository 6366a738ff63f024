//! # Hosted Store Client (PostgREST)
//!
//! Typed client for the hosted database's REST interface. Every request
//! carries the project key twice, as `apikey` and as a bearer token.
//!
//! | Method | Path (relative to `{url}/rest/v1/`) | Operation |
//! |--------|-------------------------------------|-----------|
//! | GET    | `participants?select=*&order=registeredAt.desc` | fetch all |
//! | GET    | `participants?select=*&ticketId=eq.{t}&limit=1` | find by ticket |
//! | POST   | `participants` | insert |
//! | PATCH  | `participants?ticketId=eq.{t}&checkedIn=is.false` | conditional check-in |
//! | DELETE | `participants?id=eq.{id}` | delete |
//! | GET    | `admins?select=username&username=eq.{u}&password=eq.{p}&limit=1` | admin lookup |
//!
//! Writes ask for `Prefer: return=representation` so the affected rows come
//! back in the response; an empty array means nothing matched.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use accred_core::{Participant, ParticipantId, TicketId};

use crate::config::{ConfigError, StoreConfig};
use crate::error::StoreError;
use crate::retry::retry_read;
use crate::store::TicketStore;

const PREFER: &str = "Prefer";
const RETURN_REPRESENTATION: &str = "return=representation";

/// Body of the conditional check-in update.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckInPatch {
    checked_in: bool,
    checked_in_at: DateTime<Utc>,
}

/// Client for the hosted participant store.
#[derive(Debug, Clone)]
pub struct PostgrestStore {
    http: reqwest::Client,
    participants_url: Url,
    admins_url: Url,
}

impl PostgrestStore {
    /// Create a store client from configuration.
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let mut base = config.url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let rest = base
            .join("rest/v1/")
            .map_err(|e| ConfigError::InvalidUrl("ACCRED_STORE_URL".into(), e.to_string()))?;
        let participants_url = rest
            .join("participants")
            .map_err(|e| ConfigError::InvalidUrl("ACCRED_STORE_URL".into(), e.to_string()))?;
        let admins_url = rest
            .join("admins")
            .map_err(|e| ConfigError::InvalidUrl("ACCRED_STORE_URL".into(), e.to_string()))?;

        let key = config.api_key.as_str();
        let invalid_key = || ConfigError::InvalidValue {
            var: "ACCRED_STORE_KEY".into(),
            message: "not a valid header value".into(),
        };
        let mut headers = HeaderMap::new();
        let mut apikey = HeaderValue::from_str(key).map_err(|_| invalid_key())?;
        apikey.set_sensitive(true);
        headers.insert("apikey", apikey);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {key}")).map_err(|_| invalid_key())?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| StoreError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            http,
            participants_url,
            admins_url,
        })
    }
}

/// Map a non-2xx response to the matching [`StoreError`].
async fn ensure_success(endpoint: &str, resp: Response) -> Result<Response, StoreError> {
    let status = resp.status();
    if status == StatusCode::CONFLICT {
        return Err(StoreError::Conflict {
            endpoint: endpoint.into(),
        });
    }
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(StoreError::Api {
            endpoint: endpoint.into(),
            status: status.as_u16(),
            body,
        });
    }
    Ok(resp)
}

async fn decode<T: DeserializeOwned>(endpoint: &str, resp: Response) -> Result<T, StoreError> {
    resp.json().await.map_err(|e| StoreError::Deserialization {
        endpoint: endpoint.into(),
        source: e,
    })
}

fn transport(endpoint: &str) -> impl FnOnce(reqwest::Error) -> StoreError + '_ {
    move |e| StoreError::Http {
        endpoint: endpoint.into(),
        source: e,
    }
}

#[async_trait]
impl TicketStore for PostgrestStore {
    async fn fetch_all(&self) -> Result<Vec<Participant>, StoreError> {
        let endpoint = "GET /participants";
        let resp = retry_read(endpoint, || {
            self.http
                .get(self.participants_url.clone())
                .query(&[("select", "*"), ("order", "registeredAt.desc")])
                .send()
        })
        .await
        .map_err(transport(endpoint))?;
        decode(endpoint, ensure_success(endpoint, resp).await?).await
    }

    async fn find_by_ticket(&self, ticket: &TicketId) -> Result<Option<Participant>, StoreError> {
        let endpoint = "GET /participants?ticketId";
        let filter = format!("eq.{ticket}");
        let resp = retry_read(endpoint, || {
            self.http
                .get(self.participants_url.clone())
                .query(&[("select", "*"), ("ticketId", filter.as_str()), ("limit", "1")])
                .send()
        })
        .await
        .map_err(transport(endpoint))?;
        let rows: Vec<Participant> = decode(endpoint, ensure_success(endpoint, resp).await?).await?;
        Ok(rows.into_iter().next())
    }

    async fn insert(&self, participant: &Participant) -> Result<Participant, StoreError> {
        let endpoint = "POST /participants";
        let resp = self
            .http
            .post(self.participants_url.clone())
            .header(PREFER, RETURN_REPRESENTATION)
            .json(participant)
            .send()
            .await
            .map_err(transport(endpoint))?;
        let rows: Vec<Participant> = decode(endpoint, ensure_success(endpoint, resp).await?).await?;
        rows.into_iter().next().ok_or_else(|| {
            StoreError::Unavailable(format!("{endpoint} returned no representation"))
        })
    }

    async fn mark_checked_in(
        &self,
        ticket: &TicketId,
        at: DateTime<Utc>,
    ) -> Result<Option<Participant>, StoreError> {
        let endpoint = "PATCH /participants?ticketId";
        let resp = self
            .http
            .patch(self.participants_url.clone())
            .query(&[
                ("ticketId", format!("eq.{ticket}")),
                ("checkedIn", "is.false".to_string()),
            ])
            .header(PREFER, RETURN_REPRESENTATION)
            .json(&CheckInPatch {
                checked_in: true,
                checked_in_at: at,
            })
            .send()
            .await
            .map_err(transport(endpoint))?;
        let rows: Vec<Participant> = decode(endpoint, ensure_success(endpoint, resp).await?).await?;
        Ok(rows.into_iter().next())
    }

    async fn delete(&self, id: ParticipantId) -> Result<bool, StoreError> {
        let endpoint = "DELETE /participants?id";
        let resp = self
            .http
            .delete(self.participants_url.clone())
            .query(&[("id", format!("eq.{id}"))])
            .header(PREFER, RETURN_REPRESENTATION)
            .send()
            .await
            .map_err(transport(endpoint))?;
        let rows: Vec<serde_json::Value> =
            decode(endpoint, ensure_success(endpoint, resp).await?).await?;
        Ok(!rows.is_empty())
    }

    async fn admin_exists(&self, username: &str, password: &str) -> Result<bool, StoreError> {
        let endpoint = "GET /admins";
        let username = format!("eq.{username}");
        let password = format!("eq.{password}");
        let resp = retry_read(endpoint, || {
            self.http
                .get(self.admins_url.clone())
                .query(&[
                    ("select", "username"),
                    ("username", username.as_str()),
                    ("password", password.as_str()),
                    ("limit", "1"),
                ])
                .send()
        })
        .await
        .map_err(transport(endpoint))?;
        let rows: Vec<serde_json::Value> =
            decode(endpoint, ensure_success(endpoint, resp).await?).await?;
        Ok(!rows.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zeroize::Zeroizing;

    #[test]
    fn builds_rest_urls_under_project_root() {
        let store = PostgrestStore::new(&StoreConfig {
            url: "https://project.example.co".parse().unwrap(),
            api_key: Zeroizing::new("key".into()),
            timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(
            store.participants_url.as_str(),
            "https://project.example.co/rest/v1/participants"
        );
        assert_eq!(store.admins_url.as_str(), "https://project.example.co/rest/v1/admins");
    }

    #[test]
    fn keeps_base_path_without_trailing_slash() {
        let config = |url: &str| StoreConfig {
            url: url.parse().unwrap(),
            api_key: Zeroizing::new("key".into()),
            timeout_secs: 5,
        };
        for url in ["https://host.example/proxy", "https://host.example/proxy/"] {
            let store = PostgrestStore::new(&config(url)).unwrap();
            assert_eq!(
                store.participants_url.as_str(),
                "https://host.example/proxy/rest/v1/participants"
            );
        }
    }

    #[test]
    fn rejects_key_that_is_not_a_header_value() {
        let result = PostgrestStore::new(&StoreConfig {
            url: "https://project.example.co".parse().unwrap(),
            api_key: Zeroizing::new("bad\nkey".into()),
            timeout_secs: 5,
        });
        assert!(matches!(result, Err(StoreError::Config(_))));
    }
}
