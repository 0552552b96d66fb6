pub mod mapper;
pub mod service;

use movcat_dal::movie::Genre;
use serde::{Deserialize, Serialize};

/// Wire representation of a movie. The identifier travels as a path
/// segment, never in the body.
///
/// Every field is optional so the same shape serves both as the full
/// representation (all fields present on output) and as a PATCH body,
/// where an absent field means "leave unchanged". Consequence: "absent"
/// and "null" cannot be told apart, so a patch cannot clear a field.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MovieWire {
    pub title: Option<String>,
    pub director: Option<String>,
    pub release_date: Option<time::Date>,
    pub genre: Option<Genre>,
}
