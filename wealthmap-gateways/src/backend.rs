use std::{
    sync::{PoisonError, RwLock},
    time::Duration,
};

use reqwest::{
    blocking::{Client, RequestBuilder, Response},
    header::CONTENT_RANGE,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};
use wealthmap_boundary::ErrorBody;
use wealthmap_entities::{session::Session, time::Timestamp, url::Url};

use crate::{
    error::{Error, Result},
    query::{total_from_content_range, Query},
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_LOGO_BUCKET: &str = "company-logos";

#[rustfmt::skip]
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub url         : Option<String>,
    pub anon_key    : Option<String>,
    pub timeout     : Duration,
    pub logo_bucket : String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            timeout: DEFAULT_TIMEOUT,
            logo_bucket: DEFAULT_LOGO_BUCKET.to_owned(),
        }
    }
}

/// Client of the hosted backend.
///
/// The client keeps the session of the signed-in user; all table
/// requests are authorized with its access token, or with the
/// anonymous key if nobody is signed in.
#[derive(Debug)]
pub struct BackendClient {
    base_url: String,
    anon_key: String,
    pub(crate) logo_bucket: String,
    http: Client,
    session: RwLock<Option<Session>>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

impl BackendClient {
    /// Fails with [`Error::Config`] if the URL or the key is missing or invalid.
    pub fn try_new(config: &BackendConfig) -> Result<Self> {
        let url = non_blank(config.url.as_deref())
            .ok_or_else(|| Error::Config("the backend URL is missing".into()))?;
        let parsed: Url = url
            .parse()
            .map_err(|err| Error::Config(format!("invalid backend URL '{url}': {err}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "unsupported scheme of backend URL '{url}'"
            )));
        }
        let anon_key = non_blank(config.anon_key.as_deref())
            .ok_or_else(|| Error::Config("the anonymous API key is missing".into()))?;
        let logo_bucket = non_blank(Some(config.logo_bucket.as_str())).unwrap_or(DEFAULT_LOGO_BUCKET);
        let http = Client::builder().timeout(config.timeout).build()?;
        log::debug!("Using backend at {parsed}");
        Ok(Self {
            base_url: url.trim_end_matches('/').to_owned(),
            anon_key: anon_key.to_owned(),
            logo_bucket: logo_bucket.to_owned(),
            http,
            session: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Restores a previously stored session.
    pub fn set_session(&self, session: Option<Session>) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = session;
    }

    pub(crate) fn session(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .filter(|s| !s.is_expired(Timestamp::now()))
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let token = self
            .session()
            .map(|s| s.access_token)
            .unwrap_or_else(|| self.anon_key.clone());
        self.http
            .request(method, self.endpoint(path))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
    }

    pub(crate) fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().unwrap_or_default();
        let body = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|b| b.text().map(ToOwned::to_owned))
            .unwrap_or(text);
        log::debug!("Backend request failed with {status}: {body}");
        Err(Error::Api {
            status: status.as_u16(),
            body,
        })
    }

    fn table(table: &str) -> String {
        format!("rest/v1/{table}")
    }

    pub(crate) fn select<T: DeserializeOwned>(&self, table: &str, query: &Query) -> Result<Vec<T>> {
        let response = self
            .request(Method::GET, &Self::table(table))
            .query(query.pairs())
            .send()?;
        Ok(Self::check(response)?.json()?)
    }

    pub(crate) fn select_one<T: DeserializeOwned>(
        &self,
        table: &str,
        query: Query,
    ) -> Result<Option<T>> {
        Ok(self.select(table, &query.limit(1))?.into_iter().next())
    }

    pub(crate) fn count(&self, table: &str, query: Query) -> Result<usize> {
        let response = self
            .request(Method::HEAD, &Self::table(table))
            .header("Prefer", "count=exact")
            .query(query.select("id").pairs())
            .send()?;
        let response = Self::check(response)?;
        response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(total_from_content_range)
            .ok_or_else(|| Error::Api {
                status: response.status().as_u16(),
                body: "missing total count in Content-Range".into(),
            })
    }

    pub(crate) fn insert<T: Serialize>(&self, table: &str, row: &T) -> Result<()> {
        let response = self
            .request(Method::POST, &Self::table(table))
            .header("Prefer", "return=minimal")
            .json(row)
            .send()?;
        Self::check(response)?;
        Ok(())
    }

    /// Returns the number of updated rows.
    pub(crate) fn update<T: Serialize>(&self, table: &str, query: &Query, row: &T) -> Result<usize> {
        let response = self
            .request(Method::PATCH, &Self::table(table))
            .header("Prefer", "return=representation")
            .query(query.pairs())
            .json(row)
            .send()?;
        let updated: Vec<serde_json::Value> = Self::check(response)?.json()?;
        Ok(updated.len())
    }

    pub(crate) fn delete(&self, table: &str, query: &Query) -> Result<()> {
        let response = self
            .request(Method::DELETE, &Self::table(table))
            .query(query.pairs())
            .send()?;
        Self::check(response)?;
        Ok(())
    }
}
