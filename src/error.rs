// src/error.rs
use crate::core::types::SignId;

/// Per-inscription failures. None of these abort a corpus pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum XlitError {
    /// The rightmost sign, where decoding starts, is not in the table.
    #[error("missing sign {0}")]
    MissingLeadSign(SignId),

    /// The sign declares a non-self canonical form whose target is blank.
    #[error("sign {0} has an unresolved canonical form")]
    UnresolvedCanonical(SignId),

    #[error("sign {0} has no private-use codepoint")]
    CodepointOutOfRange(SignId),
}

/// Failures at the file boundary: reading corpora, writing results, snapshots.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{file}: missing required column `{column}`")]
    MissingColumn { file: String, column: &'static str },

    #[error("snapshot error: {0}")]
    Snapshot(#[from] bincode::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
