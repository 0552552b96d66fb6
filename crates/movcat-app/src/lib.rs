pub mod error;
pub mod movie;
pub mod rest_api;
pub mod state;
