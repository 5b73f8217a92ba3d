use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub page: Option<u32>,
    pub year: Option<i32>,
    pub genre: Option<i32>,
}

/// Caller-supplied movie metadata, used only when the movie record must be
/// created for the first time. Echoed back on the create response.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MovieSeed {
    pub title: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRatingRequest {
    pub tmdb_id: Option<i32>,
    pub score: Option<i32>,
    pub movie_data: Option<MovieSeed>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRatingRequest {
    pub score: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub results: Vec<MovieSummary>,
    pub page: u32,
    pub total_pages: u32,
}

#[derive(Debug, Serialize)]
pub struct MovieSummary {
    pub tmdb_id: i32,
    pub title: String,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub backdrop_path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CastEntry {
    pub id: i32,
    pub name: String,
    pub original_name: Option<String>,
    pub character: Option<String>,
    pub profile_path: Option<String>,
    pub order: Option<i32>,
    pub gender: Option<i32>,
    pub known_for_department: Option<String>,
    pub cast_id: Option<i32>,
    pub credit_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RatedMovie {
    pub movie: RatedMovieAttrs,
}

#[derive(Debug, Serialize)]
pub struct RatedMovieAttrs {
    pub tmdb_id: i32,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub rating: i32,
    pub rating_id: i32,
}
