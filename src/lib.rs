pub mod database;
pub mod error;
pub mod ingest;
pub mod query;

pub use database::models::{
    link_to_fragment_start, Fragment, OrderBy, SearchResult, Stats, Time,
};
pub use database::{Database, DEFAULT_LIMIT};
pub use error::SearchError;
pub use query::escape_fts;
