use {
    crate::dnslib::{ResolverPool, Transport},
    futures::stream::{self, StreamExt},
    rand::{distr::Alphanumeric, rng, Rng},
    std::{
        collections::HashSet,
        sync::{Mutex, MutexGuard},
        time::{SystemTime, UNIX_EPOCH},
    },
    tracing::{debug, info},
};

const DECOY_LABELS: [&str; 2] = ["probably-does-not-exist-123", "test-subdomain-wildcard-456"];

/// Collects addresses that answer for names which cannot exist, and flags
/// real answers that share any of them.
#[derive(Debug, Default)]
pub struct WildcardDetector {
    wildcard_ips: Mutex<HashSet<String>>,
}

impl WildcardDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a few synthetic subdomains of `target` and records every
    /// address returned by a successful lookup. Failed probes are ignored.
    pub async fn probe<T: Transport>(&self, pool: &ResolverPool<T>, target: &str) {
        debug!("Running wildcards detection for {target}");

        let probe_hosts: Vec<String> = probe_labels()
            .into_iter()
            .map(|label| format!("{label}.{target}"))
            .collect();

        let found: Vec<String> = stream::iter(probe_hosts)
            .map(|host| async move {
                pool.lookup(&host).await.unwrap_or_else(|e| {
                    debug!(host = %host, error = %e, "wildcard probe did not resolve");
                    Vec::new()
                })
            })
            .buffer_unordered(DECOY_LABELS.len() + 1)
            .map(stream::iter)
            .flatten()
            .collect()
            .await;

        if found.is_empty() {
            debug!("No wildcards detected for {target}");
            return;
        }

        let mut wildcard_ips = self.lock();
        wildcard_ips.extend(found);
        info!(
            domain = %target,
            ips = ?wildcard_ips,
            "Wildcard DNS detected, these IPs will be filtered"
        );
    }

    /// True when a wildcard address is already known and `addresses` holds
    /// at least one of them.
    pub fn is_wildcard_response(&self, addresses: &[String]) -> bool {
        let wildcard_ips = self.lock();
        !wildcard_ips.is_empty() && addresses.iter().any(|ip| wildcard_ips.contains(ip))
    }

    pub fn wildcard_ips(&self) -> HashSet<String> {
        self.lock().clone()
    }

    // Inserts are single extend calls; a poisoned set is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.wildcard_ips
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// A label unique to this run and process, followed by the fixed decoys.
fn probe_labels() -> Vec<String> {
    let unix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    let salt: String = rng()
        .sample_iter(Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();

    std::iter::once(format!(
        "rand{unix}-{}-{}",
        std::process::id(),
        salt.to_lowercase()
    ))
    .chain(DECOY_LABELS.iter().map(|label| label.to_string()))
    .collect()
}
