//! Rate-limited bulk DNS resolution with resolver failover and wildcard
//! filtering.

pub mod dnslib;
pub mod enumerator;
pub mod errors;
pub mod limiter;
pub mod sink;
pub mod structs;
pub mod utils;
pub mod wildcard;

#[cfg(test)]
mod testing;

pub use {
    dnslib::{HickoryTransport, ResolverPool, Transport},
    enumerator::Enumerator,
    errors::{ConfigError, LookupError, TransportError},
    sink::ResultSink,
    structs::{Config, Reply, ResolverEndpoint},
    wildcard::WildcardDetector,
};
