/*!
 * Error kinds which end a payload generation run.
 * None of them is recovered from: `main` prints the message and exits with non-zero status.
 */

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayloadError {
    /// Requested number of codes is zero or negative.
    #[error("--count must be a positive integer (got {count})")]
    Configuration { count: i64 },

    /// More unique codes requested than there are 4-digit values.
    #[error("Cannot generate more than {universe} unique 4-digit codes (requested {requested})")]
    Range { requested: usize, universe: usize },

    /// Highest version found in the directory has no successor.
    #[error("No version number left for base name {base_name:?}")]
    VersionExhausted { base_name: String },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl PayloadError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        PayloadError::Io { context: context.into(), source }
    }
}
