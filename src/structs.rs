use {
    crate::errors::ConfigError,
    hickory_resolver::proto::op::ResponseCode,
    std::{fmt, net::SocketAddr, path::PathBuf, time::Duration},
};

/// A DNS server used to answer queries, kept in the `host:port` form it was
/// configured with.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResolverEndpoint {
    address: String,
    socket_addr: SocketAddr,
}

impl ResolverEndpoint {
    pub fn new(socket_addr: SocketAddr) -> Self {
        Self {
            address: socket_addr.to_string(),
            socket_addr,
        }
    }

    /// An endpoint configured by host name, already resolved to `socket_addr`.
    pub fn named(address: String, socket_addr: SocketAddr) -> Self {
        Self {
            address,
            socket_addr,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn socket_addr(&self) -> SocketAddr {
        self.socket_addr
    }
}

impl fmt::Display for ResolverEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}

/// Outcome of one completed exchange with one resolver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub response_code: ResponseCode,
    pub addresses: Vec<String>,
}

impl Reply {
    pub fn success(addresses: Vec<String>) -> Self {
        Self {
            response_code: ResponseCode::NoError,
            addresses,
        }
    }

    pub fn negative(response_code: ResponseCode) -> Self {
        Self {
            response_code,
            addresses: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.response_code == ResponseCode::NoError
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub resolvers: Vec<ResolverEndpoint>,
    pub rate: u32,
    pub timeout: Duration,
    pub wildcard_check: bool,
    pub verbose: bool,
    pub output_file: Option<PathBuf>,
    pub max_in_flight: Option<usize>,
}

impl Config {
    pub fn new(resolvers: Vec<ResolverEndpoint>) -> Self {
        Self {
            resolvers,
            rate: 10,
            timeout: Duration::from_secs(2),
            wildcard_check: true,
            verbose: false,
            output_file: None,
            max_in_flight: None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolvers.is_empty() {
            return Err(ConfigError::NoResolvers);
        }
        if self.rate == 0 {
            return Err(ConfigError::InvalidRate);
        }
        Ok(())
    }
}
