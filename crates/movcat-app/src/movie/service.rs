//! Record lifecycle rules for movies: what counts as invalid input on
//! create, how partial updates merge, and how missing records surface.

use movcat_dal::ListingParams;
use movcat_dal::movie::{Movie, MovieRepository, NewMovie};
use tracing::debug;

use crate::movie::{MovieWire, mapper};
use crate::rest_api::Page;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    /// The backing store failed. The underlying cause is carried but not
    /// distinguished at this layer.
    #[error("Persistence failure: {0}")]
    PersistenceFailure(#[source] movcat_dal::Error),
}

fn not_found(id: i64) -> Error {
    Error::NotFound(format!("No movie found with id {id}"))
}

pub struct MovieService {
    repository: MovieRepository,
}

impl MovieService {
    pub fn new(repository: MovieRepository) -> Self {
        Self { repository }
    }

    /// Paginated listing. No validation beyond the repository's own sort
    /// key check; an out-of-range page index yields an empty page.
    pub async fn get_all_pageable(
        &self,
        params: ListingParams,
        page_size: u32,
    ) -> Result<Page<MovieWire>> {
        debug!("Listing movies");
        let batch = self.repository.list(params).await.map_err(|e| match e {
            movcat_dal::Error::InvalidOrderByField(field) => {
                Error::InvalidInput(format!("Invalid sort field: {field}"))
            }
            e => Error::PersistenceFailure(e),
        })?;
        Ok(mapper::to_page(batch, page_size))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<MovieWire> {
        debug!("Getting movie wire object by id: {id}");
        Ok(mapper::to_wire(&self.get_by_id(id).await?))
    }

    /// The single lookup primitive. All identifier based retrieval funnels
    /// through here, so the not-found policy is defined exactly once.
    pub async fn get_by_id(&self, id: i64) -> Result<Movie> {
        debug!("Getting movie by id: {id}");
        self.repository.get(id).await.map_err(|e| match e {
            movcat_dal::Error::RecordNotFound(_) => not_found(id),
            e => Error::PersistenceFailure(e),
        })
    }

    /// Validates all four fields before any persistence attempt; any save
    /// error is wrapped uniformly as [`Error::PersistenceFailure`].
    pub async fn create(&self, payload: MovieWire) -> Result<MovieWire> {
        let record = validated(payload)?;
        debug!("Adding new movie: {record:?}");
        let saved = self
            .repository
            .save(record)
            .await
            .map_err(Error::PersistenceFailure)?;
        Ok(mapper::to_wire(&saved))
    }

    /// Partial update. Fields present on the patch overwrite the stored
    /// values, absent fields stay untouched. The merged record is not
    /// re-validated; a patch therefore cannot clear a field, only replace
    /// it (see [`MovieWire`]).
    pub async fn update(&self, id: i64, patch: MovieWire) -> Result<MovieWire> {
        let existing = self.get_by_id(id).await?;
        let merged = merge(existing, patch);
        debug!("Updating movie {id}: {merged:?}");
        let saved = self
            .repository
            .replace(id, merged)
            .await
            .map_err(Error::PersistenceFailure)?;
        Ok(mapper::to_wire(&saved))
    }

    /// Existence is checked first so a missing id surfaces as [`Error::NotFound`]
    /// instead of a silent no-op; the delete statement is never reached in
    /// that case. Check and delete are two statements and are not atomic
    /// against a concurrent deleter.
    pub async fn delete_by_id(&self, id: i64) -> Result<()> {
        let exists = self
            .repository
            .exists(id)
            .await
            .map_err(Error::PersistenceFailure)?;
        if !exists {
            debug!("Cannot delete movie {id}, no such record");
            return Err(not_found(id));
        }
        debug!("Deleting movie with id: {id}");
        self.repository
            .delete(id)
            .await
            .map_err(Error::PersistenceFailure)
    }
}

fn validated(wire: MovieWire) -> Result<NewMovie> {
    for (field, value) in [("title", &wire.title), ("director", &wire.director)] {
        if value.as_deref().is_some_and(str::is_empty) {
            return Err(Error::InvalidInput(format!(
                "Field {field} must not be empty"
            )));
        }
    }
    mapper::to_record(wire)
        .map_err(|missing| Error::InvalidInput(format!("Missing required field: {}", missing.0)))
}

fn merge(existing: Movie, patch: MovieWire) -> NewMovie {
    NewMovie {
        title: patch.title.unwrap_or(existing.title),
        director: patch.director.unwrap_or(existing.director),
        release_date: patch.release_date.unwrap_or(existing.release_date),
        genre: patch.genre.unwrap_or(existing.genre),
    }
}
