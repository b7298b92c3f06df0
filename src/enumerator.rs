use {
    crate::{
        dnslib::{ResolverPool, Transport},
        limiter::RateLimiter,
        structs::Config,
        utils::{base_domain, format_result},
        wildcard::WildcardDetector,
    },
    std::{collections::HashSet, io, sync::Arc},
    tokio::{
        io::{AsyncBufRead, AsyncBufReadExt, Split},
        sync::{mpsc, Semaphore},
        task::JoinSet,
    },
    tracing::{debug, warn},
};

/// Resolves names through the pool, filters wildcard answers and hands
/// formatted lines to the result channel.
pub struct Enumerator<T> {
    config: Arc<Config>,
    pool: ResolverPool<T>,
    wildcards: WildcardDetector,
}

impl<T: Transport> Enumerator<T> {
    pub fn new(config: Arc<Config>, transport: T) -> Arc<Self> {
        Arc::new(Self {
            pool: ResolverPool::new(config.resolvers.clone(), transport),
            wildcards: WildcardDetector::new(),
            config,
        })
    }

    pub fn pool(&self) -> &ResolverPool<T> {
        &self.pool
    }

    pub fn wildcards(&self) -> &WildcardDetector {
        &self.wildcards
    }

    pub async fn detect_wildcard(&self, domain: &str) {
        if self.config.wildcard_check {
            self.wildcards.probe(&self.pool, domain).await;
        }
    }

    /// Resolves one name and emits at most one result line.
    pub async fn process_name(&self, name: &str, results: &mpsc::Sender<String>) {
        let addresses = match self.pool.lookup(name).await {
            Ok(addresses) => addresses,
            Err(e) => {
                debug!("Error resolving {name}: {e}");
                return;
            }
        };

        if self.config.wildcard_check && self.wildcards.is_wildcard_response(&addresses) {
            debug!("Filtered wildcard response for {name}: {addresses:?}");
            return;
        }

        if results.send(format_result(name, &addresses)).await.is_err() {
            warn!("result writer stopped, dropping {name}");
        }
    }

    /// Resolves every non-blank line of `reader`. Lines that are not UTF-8
    /// are skipped; a read error stops admission and is returned once the
    /// admitted workers have finished.
    ///
    /// Before a name is admitted, the wildcard status of its two-label suffix
    /// is probed. Each distinct suffix is probed once per run. Dropping
    /// `results` after the last worker finishes closes the sink.
    pub async fn enumerate<R>(
        self: &Arc<Self>,
        reader: R,
        results: mpsc::Sender<String>,
    ) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut dispatch = Dispatch::new(self, results);
        let mut probed = HashSet::new();
        let mut lines = reader.split(b'\n');

        let read = loop {
            let name = match next_entry(&mut lines).await {
                Ok(Some(name)) => name,
                Ok(None) => break Ok(()),
                Err(e) => break Err(e),
            };

            if self.config.wildcard_check {
                if let Some(suffix) = base_domain(&name) {
                    if !probed.contains(&suffix) {
                        self.wildcards.probe(&self.pool, &suffix).await;
                        probed.insert(suffix);
                    }
                }
            }

            dispatch.admit(name).await;
        };

        dispatch.finish().await;
        read
    }

    /// Resolves `label.domain` for every non-blank line of `wordlist`, after
    /// a single wildcard probe of `domain`.
    pub async fn bruteforce<R>(
        self: &Arc<Self>,
        domain: &str,
        wordlist: R,
        results: mpsc::Sender<String>,
    ) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        self.detect_wildcard(domain).await;

        let mut dispatch = Dispatch::new(self, results);
        let mut lines = wordlist.split(b'\n');

        let read = loop {
            let label = match next_entry(&mut lines).await {
                Ok(Some(label)) => label,
                Ok(None) => break Ok(()),
                Err(e) => break Err(e),
            };

            dispatch.admit(format!("{label}.{domain}")).await;
        };

        dispatch.finish().await;
        if let Err(e) = &read {
            warn!("Error reading wordlist: {e}");
        }
        read
    }
}

/// Next non-blank line, trimmed. Lines that are not UTF-8 are skipped.
async fn next_entry<R>(lines: &mut Split<R>) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    while let Some(raw) = lines.next_segment().await? {
        match String::from_utf8(raw) {
            Ok(line) => {
                let entry = line.trim();
                if !entry.is_empty() {
                    return Ok(Some(entry.to_owned()));
                }
            }
            Err(e) => debug!("Skipping input line that is not valid UTF-8: {e}"),
        }
    }
    Ok(None)
}

/// Rate-gated spawner: one task per admitted name, joined on `finish`.
struct Dispatch<T> {
    enumerator: Arc<Enumerator<T>>,
    limiter: RateLimiter,
    in_flight: Option<Arc<Semaphore>>,
    workers: JoinSet<()>,
    results: mpsc::Sender<String>,
}

impl<T: Transport> Dispatch<T> {
    fn new(enumerator: &Arc<Enumerator<T>>, results: mpsc::Sender<String>) -> Self {
        Self {
            limiter: RateLimiter::new(enumerator.config.rate),
            in_flight: enumerator
                .config
                .max_in_flight
                .map(|cap| Arc::new(Semaphore::new(cap.max(1)))),
            enumerator: Arc::clone(enumerator),
            workers: JoinSet::new(),
            results,
        }
    }

    async fn admit(&mut self, name: String) {
        self.limiter.acquire().await;

        let permit = match &self.in_flight {
            Some(slots) => Arc::clone(slots).acquire_owned().await.ok(),
            None => None,
        };

        let enumerator = Arc::clone(&self.enumerator);
        let results = self.results.clone();
        self.workers.spawn(async move {
            enumerator.process_name(&name, &results).await;
            drop(permit);
        });

        while let Some(finished) = self.workers.try_join_next() {
            log_worker_panic(finished);
        }
    }

    async fn finish(mut self) {
        while let Some(finished) = self.workers.join_next().await {
            log_worker_panic(finished);
        }
    }
}

fn log_worker_panic(finished: Result<(), tokio::task::JoinError>) {
    if let Err(e) = finished {
        warn!("resolution worker failed: {e}");
    }
}
