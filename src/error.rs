use thiserror::Error;

/// Typed error hierarchy for the search core.
///
/// `QuerySyntax` is user-correctable (the HTTP layer maps it to a 4xx on
/// the `q` field); everything else is infrastructure and surfaces as a 5xx.
/// Serializes as a plain string so boundary code can forward the message
/// without caring about the variant.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("{0}")]
    QuerySyntax(String),

    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

impl SearchError {
    /// Classify a failed FTS5 query.
    ///
    /// SQLite reports a malformed MATCH expression as a generic
    /// `SqliteFailure` with an `fts5: syntax error near ...` message and no
    /// dedicated error code, so the distinction has to be sniffed from the
    /// message text. The engine-name prefix is stripped before the message
    /// is handed to the caller.
    pub(crate) fn from_sqlite(e: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(_, Some(msg)) = &e {
            if msg.contains("syntax error") {
                return SearchError::QuerySyntax(msg.replace("fts5:", "").trim().to_string());
            }
        }
        SearchError::Database(e)
    }
}

/// Serialize as a plain string; the message is the whole contract at the
/// response boundary.
impl serde::Serialize for SearchError {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}
