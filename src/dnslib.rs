use {
    crate::{
        errors::{LookupError, TransportError},
        structs::{Reply, ResolverEndpoint},
    },
    hickory_resolver::{
        config::{
            NameServerConfig, NameServerConfigGroup, ResolveHosts, ResolverConfig, ResolverOpts,
        },
        name_server::TokioConnectionProvider,
        proto::{xfer::Protocol, ProtoErrorKind},
        ResolveError, ResolveErrorKind, TokioResolver,
    },
    std::{collections::HashMap, future::Future, time::Duration},
    tracing::debug,
};

/// Sends a single A-record query for `name` to one resolver.
///
/// A completed exchange is `Ok` whatever its response code; `Err` is reserved
/// for failures where no answer came back (timeouts, refused connections,
/// unparseable replies).
pub trait Transport: Send + Sync + 'static {
    fn query_a(
        &self,
        endpoint: &ResolverEndpoint,
        name: &str,
    ) -> impl Future<Output = Result<Reply, TransportError>> + Send;
}

/// hickory-backed transport holding one single-server resolver per endpoint.
pub struct HickoryTransport {
    resolvers: HashMap<String, TokioResolver>,
}

impl HickoryTransport {
    pub fn new(endpoints: &[ResolverEndpoint], timeout: Duration) -> Self {
        let options = return_resolver_opts(timeout);

        let resolvers = endpoints
            .iter()
            .map(|endpoint| {
                (
                    endpoint.address().to_owned(),
                    return_tokio_resolver(endpoint, options.clone()),
                )
            })
            .collect();

        Self { resolvers }
    }
}

impl Transport for HickoryTransport {
    async fn query_a(
        &self,
        endpoint: &ResolverEndpoint,
        name: &str,
    ) -> Result<Reply, TransportError> {
        let resolver = self
            .resolvers
            .get(endpoint.address())
            .ok_or_else(|| TransportError::UnknownEndpoint(endpoint.to_string()))?;

        match resolver.ipv4_lookup(fully_qualified(name)).await {
            Ok(lookup) => Ok(Reply::success(
                lookup.iter().map(|ip| ip.to_string()).collect(),
            )),
            Err(e) => reply_from_error(e),
        }
    }
}

fn return_tokio_resolver(endpoint: &ResolverEndpoint, options: ResolverOpts) -> TokioResolver {
    let mut name_servers = NameServerConfigGroup::with_capacity(1);
    name_servers.push(NameServerConfig::new(
        endpoint.socket_addr(),
        Protocol::Udp,
    ));

    let mut builder = TokioResolver::builder_with_config(
        ResolverConfig::from_parts(None, vec![], name_servers),
        TokioConnectionProvider::default(),
    );
    *builder.options_mut() = options;
    builder.build()
}

pub fn return_resolver_opts(timeout: Duration) -> ResolverOpts {
    let mut options = ResolverOpts::default();
    options.timeout = timeout;
    options.attempts = 0;
    options.cache_size = 0;
    options.ndots = 0;
    options.num_concurrent_reqs = 1;
    options.preserve_intermediates = false;
    options.use_hosts_file = ResolveHosts::Never;
    options
}

// hickory reports negative answers as errors; those still came from a
// completed exchange and carry the server's response code.
fn reply_from_error(error: ResolveError) -> Result<Reply, TransportError> {
    if let ResolveErrorKind::Proto(proto) = error.kind() {
        if let ProtoErrorKind::NoRecordsFound { response_code, .. } = proto.kind() {
            return Ok(Reply::negative(*response_code));
        }
    }
    Err(error.into())
}

pub fn fully_qualified(name: &str) -> String {
    name.trim_end_matches('.').to_owned() + "."
}

/// Ordered resolver list with sequential failover.
pub struct ResolverPool<T> {
    endpoints: Vec<ResolverEndpoint>,
    transport: T,
}

impl<T: Transport> ResolverPool<T> {
    pub fn new(endpoints: Vec<ResolverEndpoint>, transport: T) -> Self {
        Self {
            endpoints,
            transport,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolves the A records of `name`, trying endpoints in list order.
    ///
    /// Only transport failures move on to the next endpoint. The first
    /// completed exchange decides the outcome: a non-success response code is
    /// returned as is and no other resolver is asked.
    pub async fn lookup(&self, name: &str) -> Result<Vec<String>, LookupError> {
        for endpoint in &self.endpoints {
            match self.transport.query_a(endpoint, name).await {
                Ok(reply) if reply.is_success() => return Ok(reply.addresses),
                Ok(reply) => {
                    return Err(LookupError::ResponseCode {
                        code: reply.response_code,
                        resolver: endpoint.to_string(),
                    })
                }
                Err(e) => {
                    debug!(resolver = %endpoint, error = %e, "resolver failed");
                }
            }
        }
        Err(LookupError::AllResolversFailed)
    }
}
