use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{CastEntry, Genre, MovieSummary, SearchResults},
};

const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
const POSTER_SIZE: &str = "w500";
const PROFILE_SIZE: &str = "w200";
const LANGUAGE: &str = "en-US";

pub struct TmdbClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl TmdbClient {
    pub fn new(client: reqwest::Client, api_key: String, base_url: String) -> Self {
        if api_key.trim().is_empty() {
            tracing::warn!("no TMDB_API_KEY provided, provider will reject requests");
        }
        Self { client, api_key, base_url }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    pub async fn search_movies(
        &self,
        query: &str,
        page: u32,
        year: Option<i32>,
        genre: Option<i32>,
    ) -> AppResult<SearchResults> {
        let mut req = self
            .client
            .get(self.endpoint("/search/movie"))
            .bearer_auth(&self.api_key)
            .query(&[("query", query), ("include_adult", "false"), ("language", LANGUAGE)])
            .query(&[("page", page)]);
        if let Some(year) = year {
            req = req.query(&[("primary_release_year", year)]);
        }

        let resp: SearchResponse = self.fetch(req, "Failed to fetch data from TMDB").await?;
        Ok(reshape_search(resp, genre))
    }

    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        let req = self
            .client
            .get(self.endpoint("/genre/movie/list"))
            .bearer_auth(&self.api_key)
            .query(&[("language", LANGUAGE)]);

        let resp: GenreListResponse = self.fetch(req, "Failed to fetch genres from TMDB").await?;
        Ok(resp.genres)
    }

    pub async fn get_cast(&self, movie_id: i32) -> AppResult<Vec<CastEntry>> {
        let req = self
            .client
            .get(self.endpoint(&format!("/movie/{movie_id}/credits")))
            .bearer_auth(&self.api_key)
            .query(&[("language", LANGUAGE)]);

        let resp: CreditsResponse = self.fetch(req, "Failed to fetch cast from TMDB").await?;
        Ok(resp.cast.into_iter().map(reshape_cast_member).collect())
    }

    /// Send a provider request and map the failure modes: an error status is
    /// forwarded with its JSON body, no response at all becomes a fixed 502.
    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
        unavailable_msg: &'static str,
    ) -> AppResult<T> {
        let resp = match req.send().await {
            Ok(resp) => resp,
            Err(err) => {
                tracing::warn!(error = %err, "provider request failed");
                return Err(AppError::Unavailable(unavailable_msg));
            },
        };

        let status = resp.status();
        if !status.is_success() {
            let body = resp.json::<Value>().await.unwrap_or(Value::Null);
            return Err(AppError::Upstream { status, body });
        }

        resp.json::<T>().await.map_err(|err| {
            tracing::warn!(error = %err, "provider returned a malformed body");
            AppError::Unavailable(unavailable_msg)
        })
    }
}

fn reshape_search(resp: SearchResponse, genre: Option<i32>) -> SearchResults {
    let results = resp
        .results
        .into_iter()
        // The provider is never asked to filter by genre on search; the
        // filter is applied here, after the fact.
        .filter(|item| genre.map_or(true, |id| item.genre_ids.contains(&id)))
        .map(|item| MovieSummary {
            tmdb_id: item.id,
            title: item.title,
            poster_path: image_url(POSTER_SIZE, item.poster_path.as_deref()),
            overview: item.overview,
            release_date: item.release_date,
            backdrop_path: item.backdrop_path,
        })
        .collect();

    SearchResults { results, page: resp.page, total_pages: resp.total_pages }
}

fn reshape_cast_member(member: ProviderCastMember) -> CastEntry {
    CastEntry {
        id: member.id,
        name: member.name,
        original_name: member.original_name,
        character: member.character,
        profile_path: image_url(PROFILE_SIZE, member.profile_path.as_deref()),
        order: member.order,
        gender: member.gender,
        known_for_department: member.known_for_department,
        cast_id: member.cast_id,
        credit_id: member.credit_id,
    }
}

fn image_url(size: &str, path: Option<&str>) -> Option<String> {
    path.map(|p| format!("{IMAGE_BASE_URL}/{size}{p}"))
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    page: u32,
    total_pages: u32,
    results: Vec<ProviderMovie>,
}

#[derive(Debug, Deserialize)]
struct ProviderMovie {
    id: i32,
    title: String,
    poster_path: Option<String>,
    overview: Option<String>,
    release_date: Option<String>,
    backdrop_path: Option<String>,
    #[serde(default)]
    genre_ids: Vec<i32>,
}

#[derive(Debug, Deserialize)]
struct GenreListResponse {
    genres: Vec<Genre>,
}

#[derive(Debug, Deserialize)]
struct CreditsResponse {
    #[serde(default)]
    cast: Vec<ProviderCastMember>,
}

#[derive(Debug, Deserialize)]
struct ProviderCastMember {
    id: i32,
    name: String,
    original_name: Option<String>,
    character: Option<String>,
    profile_path: Option<String>,
    order: Option<i32>,
    gender: Option<i32>,
    known_for_department: Option<String>,
    cast_id: Option<i32>,
    credit_id: Option<String>,
}
