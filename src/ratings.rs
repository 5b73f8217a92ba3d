use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, SqlErr, TransactionTrait,
};

use crate::{
    entities::{movie, rating},
    error::{AppError, AppResult},
    models::{MovieSeed, RatedMovie, RatedMovieAttrs},
};

/// Creates the caller's rating for `tmdb_id`, lazily creating the movie
/// record from `seed` when it is the first rating anywhere for that id.
///
/// Movie lookup/insert, the duplicate check and the rating insert share one
/// transaction: a rejected create leaves no partial movie row. Under racing
/// duplicates the (user_id, movie_id) unique index is the final arbiter.
pub async fn create_rating(
    db: &DatabaseConnection,
    user_id: i32,
    tmdb_id: i32,
    score: i32,
    seed: Option<&MovieSeed>,
) -> AppResult<rating::Model> {
    let txn = db.begin().await?;

    let movie =
        movie::Entity::find().filter(movie::Column::TmdbId.eq(tmdb_id)).one(&txn).await?;

    let movie = match movie {
        Some(movie) => movie,
        None => {
            let Some(seed) = seed else {
                return Err(AppError::Validation(
                    "Movie not found locally and no data provided to create it".to_string(),
                ));
            };

            let release_date = match seed.release_date.as_deref() {
                Some(raw) if !raw.is_empty() => Some(parse_release_date(raw)?),
                _ => None,
            };

            movie::ActiveModel {
                tmdb_id: Set(tmdb_id),
                title: Set(seed
                    .title
                    .clone()
                    .unwrap_or_else(|| "Unknown Title".to_string())),
                poster_path: Set(seed.poster_path.clone()),
                backdrop_path: Set(seed.backdrop_path.clone()),
                overview: Set(seed.overview.clone()),
                release_date: Set(release_date),
                ..Default::default()
            }
            .insert(&txn)
            .await?
        },
    };

    let existing = rating::Entity::find()
        .filter(rating::Column::UserId.eq(user_id))
        .filter(rating::Column::MovieId.eq(movie.id))
        .one(&txn)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("Rating already exists.".to_string()));
    }

    let created = rating::ActiveModel {
        user_id: Set(user_id),
        movie_id: Set(movie.id),
        score: Set(score),
        created_at: Set(jiff::Timestamp::now().as_second()),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|err| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("Rating already exists.".to_string())
        },
        _ => AppError::Db(err),
    })?;

    txn.commit().await?;
    Ok(created)
}

/// All of the caller's ratings joined with their movies' display attributes.
pub async fn list_ratings(db: &DatabaseConnection, user_id: i32) -> AppResult<Vec<RatedMovie>> {
    let rows = rating::Entity::find()
        .filter(rating::Column::UserId.eq(user_id))
        .find_also_related(movie::Entity)
        .order_by_asc(rating::Column::Id)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(rating, movie)| {
            movie.map(|movie| RatedMovie {
                movie: RatedMovieAttrs {
                    tmdb_id: movie.tmdb_id,
                    title: movie.title,
                    poster_path: movie.poster_path,
                    backdrop_path: movie.backdrop_path,
                    release_date: movie.release_date,
                    rating: rating.score,
                    rating_id: rating.id,
                },
            })
        })
        .collect())
}

pub async fn update_rating(
    db: &DatabaseConnection,
    user_id: i32,
    tmdb_id: i32,
    new_score: i32,
) -> AppResult<i32> {
    let (_, rating) = find_user_rating(db, user_id, tmdb_id).await?;

    let mut active: rating::ActiveModel = rating.into();
    active.score = Set(new_score);
    let updated = active.update(db).await?;
    Ok(updated.score)
}

/// Removes exactly the caller's rating; the movie row always survives.
pub async fn delete_rating(db: &DatabaseConnection, user_id: i32, tmdb_id: i32) -> AppResult<()> {
    let (_, rating) = find_user_rating(db, user_id, tmdb_id).await?;
    rating.delete(db).await?;
    Ok(())
}

async fn find_user_rating(
    db: &DatabaseConnection,
    user_id: i32,
    tmdb_id: i32,
) -> AppResult<(movie::Model, rating::Model)> {
    let movie = movie::Entity::find()
        .filter(movie::Column::TmdbId.eq(tmdb_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;

    let rating = rating::Entity::find()
        .filter(rating::Column::UserId.eq(user_id))
        .filter(rating::Column::MovieId.eq(movie.id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Rating not found".to_string()))?;

    Ok((movie, rating))
}

fn parse_release_date(raw: &str) -> AppResult<String> {
    raw.parse::<jiff::civil::Date>()
        .map(|date| date.to_string())
        .map_err(|_| AppError::Validation("Release date is not in the default pattern.".to_string()))
}
