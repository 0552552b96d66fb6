//! Structural translation between persisted movies and their wire form.
//! Pure and side-effect free; business rules live in the service.

use movcat_dal::Batch;
use movcat_dal::movie::{Movie, NewMovie};

use crate::movie::MovieWire;
use crate::rest_api::Page;

/// Wire field that was expected but absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingField(pub &'static str);

pub fn to_wire(record: &Movie) -> MovieWire {
    MovieWire {
        title: Some(record.title.clone()),
        director: Some(record.director.clone()),
        release_date: Some(record.release_date),
        genre: Some(record.genre),
    }
}

/// Builds an insert payload from a wire value; the id is left for the
/// database to assign. Fails only when a field is absent - the service
/// validates before calling, so in practice this is total.
pub fn to_record(wire: MovieWire) -> Result<NewMovie, MissingField> {
    Ok(NewMovie {
        title: wire.title.ok_or(MissingField("title"))?,
        director: wire.director.ok_or(MissingField("director"))?,
        release_date: wire.release_date.ok_or(MissingField("releaseDate"))?,
        genre: wire.genre.ok_or(MissingField("genre"))?,
    })
}

/// Maps a batch of records to a page of wire values, preserving order,
/// offset and totals.
pub fn to_page(batch: Batch<Movie>, page_size: u32) -> Page<MovieWire> {
    let rows = batch.rows.iter().map(to_wire).collect();
    Page::from_batch(
        Batch {
            offset: batch.offset,
            total: batch.total,
            rows,
        },
        page_size,
    )
}
