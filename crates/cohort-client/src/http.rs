//! The reqwest-backed source.

use std::time::Duration;

use cohort_core::{
  event::{RawAudioTap, RawTap},
  record::{DeviceRecord, EnrollmentRecord},
  source::{ActivitySource, FetchScope},
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Error, Result};

/// Connection settings for the upstream dashboard API.
#[derive(Debug, Clone)]
pub struct SourceConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// Async HTTP client for the four raw-record endpoints.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpSource {
  client: Client,
  config: SourceConfig,
}

impl HttpSource {
  pub fn new(config: SourceConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .map_err(Error::Build)?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  /// `GET {base}/api{path}[?study=<id>]`, decoded as JSON.
  async fn get_list<T: DeserializeOwned>(
    &self,
    path: String,
    scope: FetchScope,
  ) -> Result<Vec<T>> {
    let mut req = self.auth(self.client.get(self.url(&path)));
    if let Some(study_id) = scope.study_id {
      req = req.query(&[("study", study_id)]);
    }

    let resp = req
      .send()
      .await
      .map_err(|source| Error::Request { path: path.clone(), source })?;

    let status = resp.status();
    if !status.is_success() {
      return Err(Error::Status { path, status });
    }

    let list: Vec<T> = resp
      .json()
      .await
      .map_err(|source| Error::Decode { path: path.clone(), source })?;
    debug!(%path, records = list.len(), "fetched");
    Ok(list)
  }
}

impl ActivitySource for HttpSource {
  type Error = Error;

  async fn enrollments(
    &self,
    scope: FetchScope,
  ) -> Result<Vec<EnrollmentRecord>> {
    self
      .get_list(format!("/apps/{}/enrollments", scope.app_id), scope)
      .await
  }

  async fn devices(&self, scope: FetchScope) -> Result<Vec<DeviceRecord>> {
    self
      .get_list(format!("/apps/{}/devices", scope.app_id), scope)
      .await
  }

  async fn taps(&self, scope: FetchScope) -> Result<Vec<RawTap>> {
    self.get_list(format!("/apps/{}/taps", scope.app_id), scope).await
  }

  async fn audio_taps(&self, scope: FetchScope) -> Result<Vec<RawAudioTap>> {
    self
      .get_list(format!("/apps/{}/audio-taps", scope.app_id), scope)
      .await
  }
}
