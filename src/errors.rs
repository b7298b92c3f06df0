use {
    hickory_resolver::{proto::op::ResponseCode, ResolveError},
    std::{io, path::PathBuf},
    thiserror::Error,
};

/// Fatal problems found before any resolution starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("error opening {kind} file {path}: {source}")]
    UnreadableFile {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no DNS resolvers specified")]
    NoResolvers,

    #[error("invalid resolver {resolver}: {reason}")]
    InvalidResolver { resolver: String, reason: String },

    #[error("rate must be at least 1 query per second")]
    InvalidRate,

    #[error("error opening output file {path}: {source}")]
    OutputFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A failed exchange with a single resolver. Never fatal; the pool moves on
/// to the next endpoint.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("no transport configured for resolver {0}")]
    UnknownEndpoint(String),

    #[error("{0}")]
    Other(String),
}

/// Terminal outcome of looking up one name through the pool.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("DNS error: {code} from {resolver}")]
    ResponseCode {
        code: ResponseCode,
        resolver: String,
    },

    #[error("all resolvers failed")]
    AllResolversFailed,
}
