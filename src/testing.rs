//! Scripted transport shared by the unit tests.

use {
    crate::{
        dnslib::Transport,
        errors::TransportError,
        structs::{Reply, ResolverEndpoint},
    },
    hickory_resolver::proto::op::ResponseCode,
    std::{
        collections::{HashMap, HashSet},
        sync::{
            atomic::{AtomicUsize, Ordering},
            Mutex,
        },
        time::Duration,
    },
};

pub fn endpoint(address: &str) -> ResolverEndpoint {
    ResolverEndpoint::new(address.parse().unwrap())
}

#[derive(Default)]
pub struct StubTransport {
    replies: HashMap<(String, String), Reply>,
    wildcards: HashMap<(String, String), Reply>,
    unreachable: HashSet<String>,
    latency: Option<Duration>,
    calls: Mutex<Vec<(String, String)>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, endpoint: &ResolverEndpoint, name: &str, ips: &[&str]) -> Self {
        self.replies.insert(
            (endpoint.to_string(), name.to_owned()),
            Reply::success(ips.iter().map(|ip| ip.to_string()).collect()),
        );
        self
    }

    pub fn reject(mut self, endpoint: &ResolverEndpoint, name: &str, code: ResponseCode) -> Self {
        self.replies
            .insert((endpoint.to_string(), name.to_owned()), Reply::negative(code));
        self
    }

    /// Answers every otherwise unknown name under `domain` with `ips`.
    pub fn wildcard(mut self, endpoint: &ResolverEndpoint, domain: &str, ips: &[&str]) -> Self {
        self.wildcards.insert(
            (endpoint.to_string(), domain.to_owned()),
            Reply::success(ips.iter().map(|ip| ip.to_string()).collect()),
        );
        self
    }

    pub fn unreachable(mut self, endpoint: &ResolverEndpoint) -> Self {
        self.unreachable.insert(endpoint.to_string());
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, name: &str) -> usize {
        self.calls().iter().filter(|(_, n)| n == name).count()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn reply_for(&self, endpoint: &str, name: &str) -> Reply {
        if let Some(reply) = self.replies.get(&(endpoint.to_owned(), name.to_owned())) {
            return reply.clone();
        }
        self.wildcards
            .iter()
            .find(|((ep, domain), _)| ep == endpoint && name.ends_with(&format!(".{domain}")))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| Reply::negative(ResponseCode::NXDomain))
    }
}

impl Transport for StubTransport {
    async fn query_a(
        &self,
        endpoint: &ResolverEndpoint,
        name: &str,
    ) -> Result<Reply, TransportError> {
        let name = name.trim_end_matches('.');
        self.calls
            .lock()
            .unwrap()
            .push((endpoint.to_string(), name.to_owned()));

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.unreachable.contains(endpoint.address()) {
            return Err(TransportError::Other(format!("{endpoint}: timed out")));
        }
        Ok(self.reply_for(endpoint.address(), name))
    }
}
