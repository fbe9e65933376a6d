use crate::catalog::types::{CanonicalGenre, DiscoverResponse, GenreListResponse};
use crate::catalog::CatalogClient;
use crate::config::Settings;
use crate::error::{Upstream, UpstreamError};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org";
const GENRE_LIST_PATH: &str = "/3/genre/movie/list";
const DISCOVER_PATH: &str = "/3/discover/movie";

#[derive(Debug, Clone)]
pub struct TmdbClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.require_tmdb_api_key()?.to_string();
        let base_url = settings
            .tmdb_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = settings.tmdb_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .context("failed to build TMDB http client")?;

        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn movie_path(id: &str) -> String {
        format!("/3/movie/{id}")
    }

    fn genre_filter(genre_ids: &[i64]) -> String {
        genre_ids
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        stage: &'static str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let res = self
            .http
            .get(self.url(path))
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()
            .await
            .with_context(|| format!("TMDB {stage} request failed"))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .with_context(|| format!("failed to read TMDB {stage} response"))?;
        if !status.is_success() {
            return Err(UpstreamError::from_status(Upstream::Tmdb, stage, status, text).into());
        }

        serde_json::from_str::<T>(&text)
            .with_context(|| format!("failed to decode TMDB {stage} response: {text}"))
    }
}

#[async_trait::async_trait]
impl CatalogClient for TmdbClient {
    fn provider_name(&self) -> &'static str {
        "tmdb"
    }

    async fn genres(&self) -> Result<Vec<CanonicalGenre>> {
        let res: GenreListResponse = self.get_json("genres", GENRE_LIST_PATH, &[]).await?;
        Ok(res.genres)
    }

    async fn discover(&self, genre_ids: &[i64]) -> Result<Vec<Value>> {
        let with_genres = Self::genre_filter(genre_ids);
        let res: DiscoverResponse = self
            .get_json("discover", DISCOVER_PATH, &[("with_genres", with_genres.as_str())])
            .await?;
        Ok(res.results)
    }

    async fn movie(&self, id: &str) -> Result<Value> {
        self.get_json("movie", &Self::movie_path(id), &[]).await
    }
}
