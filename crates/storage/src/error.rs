// SPDX-License-Identifier: MIT

//! Storage-layer errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("durable root must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("failed to decode field '{field}': {source}")]
    Decode {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode field '{field}': {source}")]
    Encode {
        field: String,
        #[source]
        source: serde_json::Error,
    },
}
