use futures::TryStreamExt as _;
use serde::{Deserialize, Serialize};
use sqlx::{Acquire as _, Pool};
use tracing::debug;

use crate::{Batch, Error, ListingParams, error::Result};

const VALID_ORDER_FIELDS: &[&str] = &["id", "title", "director", "release_date", "genre"];

/// Closed set of movie genres. Stored in the database and serialized on
/// the wire as upper-case strings; unknown tags are rejected on decode.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum Genre {
    Action,
    Comedy,
    Drama,
    Romance,
    Fantasy,
    Animation,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub director: String,
    pub release_date: time::Date,
    pub genre: Genre,
}

/// Insert payload - a movie before the database has assigned its id.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct NewMovie {
    pub title: String,
    pub director: String,
    pub release_date: time::Date,
    pub genre: Genre,
}

pub type MovieRepository = MovieRepositoryImpl<Pool<crate::ChosenDB>>;

pub struct MovieRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> MovieRepositoryImpl<E>
where
    for<'a> &'a E:
        sqlx::Executor<'c, Database = crate::ChosenDB> + sqlx::Acquire<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn save(&self, payload: NewMovie) -> Result<Movie> {
        let result = sqlx::query(
            "INSERT INTO movie (title, director, release_date, genre) VALUES (?, ?, ?, ?)",
        )
        .bind(&payload.title)
        .bind(&payload.director)
        .bind(payload.release_date)
        .bind(payload.genre)
        .execute(&self.executor)
        .await?;

        let id = result.last_insert_rowid();
        self.get(id).await
    }

    /// Overwrites all mutable fields of an existing movie. Update and
    /// re-fetch run in one transaction.
    pub async fn replace(&self, id: i64, payload: NewMovie) -> Result<Movie> {
        let mut conn = self.executor.acquire().await?;
        let mut transaction = conn.begin().await?;
        let result = sqlx::query(
            "UPDATE movie SET title = ?, director = ?, release_date = ?, genre = ? WHERE id = ?",
        )
        .bind(&payload.title)
        .bind(&payload.director)
        .bind(payload.release_date)
        .bind(payload.genre)
        .bind(id)
        .execute(&mut *transaction)
        .await?;

        if result.rows_affected() == 0 {
            debug!("Update of movie {id} matched no row");
            Err(Error::RecordNotFound(format!("Movie {id}")))
        } else {
            let record = get(id, &mut *transaction).await?;
            transaction.commit().await?;
            Ok(record)
        }
    }

    pub async fn count(&self) -> Result<u64> {
        let count: u64 = sqlx::query_scalar("SELECT count(*) FROM movie")
            .fetch_one(&self.executor)
            .await?;
        Ok(count)
    }

    pub async fn list(&self, params: ListingParams) -> Result<Batch<Movie>> {
        let total = self.count().await?;
        let ordering = params.ordering(VALID_ORDER_FIELDS)?;
        let order_clause = if ordering.is_empty() {
            String::new()
        } else {
            format!(" ORDER BY {ordering}")
        };
        let rows = sqlx::query_as::<_, Movie>(&format!(
            "SELECT id, title, director, release_date, genre FROM movie{order_clause} LIMIT ? OFFSET ?"
        ))
        .bind(params.limit)
        .bind(params.offset)
        .fetch(&self.executor)
        .try_collect::<Vec<_>>()
        .await?;

        Ok(Batch {
            offset: params.offset,
            total,
            rows,
        })
    }

    pub async fn exists(&self, id: i64) -> Result<bool> {
        let found = sqlx::query_scalar::<_, i64>("SELECT id FROM movie WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.executor)
            .await?;
        Ok(found.is_some())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let res = sqlx::query("DELETE FROM movie WHERE id = ?")
            .bind(id)
            .execute(&self.executor)
            .await?;

        if res.rows_affected() == 0 {
            Err(Error::RecordNotFound(format!("Movie {id}")))
        } else {
            Ok(())
        }
    }

    pub async fn get(&self, id: i64) -> Result<Movie> {
        get(id, &self.executor).await
    }
}

async fn get<'c, E>(id: i64, executor: E) -> Result<Movie>
where
    E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    sqlx::query_as::<_, Movie>(
        "SELECT id, title, director, release_date, genre FROM movie WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| Error::RecordNotFound(format!("Movie {id}")))
}
