use {
    crate::{errors::ConfigError, structs::ResolverEndpoint},
    std::{
        net::{IpAddr, SocketAddr},
        path::Path,
    },
    tokio::{fs::File, io::AsyncReadExt, net::lookup_host},
    tracing_subscriber::EnvFilter,
};

pub const DEFAULT_DNS_PORT: u16 = 53;

pub async fn return_file_lines(kind: &'static str, file: &Path) -> Result<String, ConfigError> {
    let unreadable = |source| ConfigError::UnreadableFile {
        kind,
        path: file.to_owned(),
        source,
    };

    let mut f = File::open(file).await.map_err(unreadable)?;
    let mut buffer = String::new();
    f.read_to_string(&mut buffer).await.map_err(unreadable)?;
    Ok(buffer)
}

/// Reads one resolver per line, skipping blank lines and `#` comments.
pub async fn load_resolvers_file(file: &Path) -> Result<Vec<ResolverEndpoint>, ConfigError> {
    let buffer = return_file_lines("resolvers", file).await?;

    let mut resolvers = Vec::new();
    for line in buffer
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
    {
        resolvers.push(parse_resolver(line).await?);
    }
    Ok(resolvers)
}

/// Parses a comma separated resolver list.
pub async fn parse_resolver_list(list: &str) -> Result<Vec<ResolverEndpoint>, ConfigError> {
    let mut resolvers = Vec::new();
    for resolver in list.split(',').map(str::trim).filter(|r| !r.is_empty()) {
        resolvers.push(parse_resolver(resolver).await?);
    }
    Ok(resolvers)
}

/// Accepts `ip:port`, `[ipv6]:port`, `host:port` or a bare IP or host, which
/// gets port 53. Host names are resolved once, here.
pub async fn parse_resolver(resolver: &str) -> Result<ResolverEndpoint, ConfigError> {
    if let Ok(socket_addr) = resolver.parse::<SocketAddr>() {
        return Ok(ResolverEndpoint::new(socket_addr));
    }
    if let Ok(ip) = resolver.parse::<IpAddr>() {
        return Ok(ResolverEndpoint::new(SocketAddr::new(ip, DEFAULT_DNS_PORT)));
    }

    let address = with_default_port(resolver);
    let invalid = |reason: String| ConfigError::InvalidResolver {
        resolver: resolver.to_owned(),
        reason,
    };

    let mut socket_addrs = lookup_host(address.as_str())
        .await
        .map_err(|e| invalid(e.to_string()))?;
    let socket_addr = socket_addrs
        .next()
        .ok_or_else(|| invalid("host name has no addresses".to_owned()))?;
    drop(socket_addrs);

    Ok(ResolverEndpoint::named(address, socket_addr))
}

fn with_default_port(host: &str) -> String {
    match host.rsplit_once(':') {
        Some((_, port)) if port.parse::<u16>().is_ok() => host.to_owned(),
        _ => format!("{host}:{DEFAULT_DNS_PORT}"),
    }
}

/// The last two labels of `name`, or `None` for single-label names.
pub fn base_domain(name: &str) -> Option<String> {
    let mut labels = name.trim_end_matches('.').rsplit('.');
    let tld = labels.next().filter(|label| !label.is_empty())?;
    let sld = labels.next().filter(|label| !label.is_empty())?;
    Some(format!("{sld}.{tld}"))
}

pub fn format_result(name: &str, addresses: &[String]) -> String {
    format!("{} [{}]", name, addresses.join(", "))
}

/// Diagnostics go to stderr. `RUST_LOG` takes precedence over `verbose`.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .try_init()
        .ok();
}
