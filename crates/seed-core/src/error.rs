//! Error type for a seeding run.

use thiserror::Error;

/// Why a seeding run failed.
///
/// Both variants are handled the same way by callers; the variant only tells
/// which step produced the cause.
#[derive(Error, Debug)]
pub enum SeedError {
    /// Endpoint unreachable, authentication or topology discovery failure.
    #[error("failed to connect to the store")]
    Connect(#[source] anyhow::Error),

    /// The ordered batch insert was rejected.
    #[error("failed to insert into {namespace}")]
    Insert {
        namespace: String,
        #[source]
        source: anyhow::Error,
    },
}
