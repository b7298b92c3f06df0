use {
    hickory_resolver::proto::op::ResponseCode,
    ruenum::{Config, Enumerator, Reply, ResolverEndpoint, ResultSink, Transport, TransportError},
    std::{collections::HashMap, sync::Arc},
};

/// Answers from a fixed table; unknown names are NXDOMAIN and names under
/// `wildcard` domains get the wildcard answer.
#[derive(Default)]
struct Zone {
    records: HashMap<String, Result<Vec<&'static str>, ResponseCode>>,
    wildcard: Option<(&'static str, &'static str)>,
    down: Vec<String>,
}

impl Transport for Zone {
    async fn query_a(
        &self,
        endpoint: &ResolverEndpoint,
        name: &str,
    ) -> Result<Reply, TransportError> {
        if self.down.iter().any(|down| down == endpoint.address()) {
            return Err(TransportError::Other("connection refused".to_owned()));
        }

        match self.records.get(name) {
            Some(Ok(ips)) => Ok(answer(ips)),
            Some(Err(code)) => Ok(Reply::negative(*code)),
            None => match self.wildcard {
                Some((domain, ip)) if name.ends_with(&format!(".{domain}")) => Ok(answer(&[ip])),
                _ => Ok(Reply::negative(ResponseCode::NXDomain)),
            },
        }
    }
}

fn answer(ips: &[&str]) -> Reply {
    Reply::success(ips.iter().map(|ip| ip.to_string()).collect())
}

fn config(resolvers: &[&str], wildcard_check: bool) -> Arc<Config> {
    let mut config = Config::new(
        resolvers
            .iter()
            .map(|r| ResolverEndpoint::new(r.parse().unwrap()))
            .collect(),
    );
    config.rate = 2;
    config.wildcard_check = wildcard_check;
    Arc::new(config)
}

fn lines(output: Vec<u8>) -> Vec<String> {
    let mut lines: Vec<String> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(str::to_owned)
        .collect();
    lines.sort_unstable();
    lines
}

#[tokio::test(start_paused = true)]
async fn streams_names_and_drops_failures() {
    let zone = Zone {
        records: HashMap::from([("a.example.com".to_owned(), Ok(vec!["10.0.0.1"]))]),
        ..Zone::default()
    };
    let enumerator = Enumerator::new(config(&["10.53.0.1:53"], false), zone);
    let (results, writer) = ResultSink::new(Vec::new(), None).spawn();

    enumerator
        .enumerate(&b"a.example.com\nb.example.com\n"[..], results)
        .await
        .unwrap();

    assert_eq!(lines(writer.await.unwrap().unwrap()), ["a.example.com [10.0.0.1]"]);
}

#[tokio::test(start_paused = true)]
async fn bruteforces_a_wordlist() {
    let zone = Zone {
        records: HashMap::from([
            ("www.example.com".to_owned(), Ok(vec!["10.0.0.2"])),
            ("api.example.com".to_owned(), Err(ResponseCode::NXDomain)),
        ]),
        ..Zone::default()
    };
    let enumerator = Enumerator::new(config(&["10.53.0.1:53"], true), zone);
    let (results, writer) = ResultSink::new(Vec::new(), None).spawn();

    enumerator
        .bruteforce("example.com", &b"www\napi\n"[..], results)
        .await
        .unwrap();

    assert_eq!(lines(writer.await.unwrap().unwrap()), ["www.example.com [10.0.0.2]"]);
}

#[tokio::test(start_paused = true)]
async fn wildcard_addresses_are_filtered() {
    let zone = Zone {
        records: HashMap::from([
            ("shop.example.com".to_owned(), Ok(vec!["203.0.113.9"])),
            ("mail.example.com".to_owned(), Ok(vec!["198.51.100.25"])),
        ]),
        wildcard: Some(("example.com", "203.0.113.9")),
        ..Zone::default()
    };
    let enumerator = Enumerator::new(config(&["10.53.0.1:53"], true), zone);
    let (results, writer) = ResultSink::new(Vec::new(), None).spawn();

    enumerator
        .bruteforce("example.com", &b"shop\nmail\nnothing-here\n"[..], results)
        .await
        .unwrap();

    assert_eq!(
        lines(writer.await.unwrap().unwrap()),
        ["mail.example.com [198.51.100.25]"]
    );
    assert!(enumerator
        .wildcards()
        .wildcard_ips()
        .contains("203.0.113.9"));
}

#[tokio::test(start_paused = true)]
async fn dead_resolvers_fail_over() {
    let zone = Zone {
        records: HashMap::from([("a.example.com".to_owned(), Ok(vec!["10.0.0.1"]))]),
        down: vec!["10.53.0.1:53".to_owned()],
        ..Zone::default()
    };
    let enumerator = Enumerator::new(config(&["10.53.0.1:53", "10.53.0.2:53"], false), zone);
    let (results, writer) = ResultSink::new(Vec::new(), None).spawn();

    enumerator
        .enumerate(&b"a.example.com\n"[..], results)
        .await
        .unwrap();

    assert_eq!(lines(writer.await.unwrap().unwrap()), ["a.example.com [10.0.0.1]"]);
}

#[tokio::test(start_paused = true)]
async fn repeated_lookups_format_identically() {
    let zone = Zone {
        records: HashMap::from([(
            "a.example.com".to_owned(),
            Ok(vec!["10.0.0.1", "10.0.0.2"]),
        )]),
        ..Zone::default()
    };
    let enumerator = Enumerator::new(config(&["10.53.0.1:53"], false), zone);
    let (results, writer) = ResultSink::new(Vec::new(), None).spawn();

    enumerator
        .enumerate(&b"a.example.com\na.example.com\n"[..], results)
        .await
        .unwrap();

    let output = lines(writer.await.unwrap().unwrap());
    assert_eq!(output.len(), 2);
    assert_eq!(output[0], output[1]);
    assert_eq!(output[0], "a.example.com [10.0.0.1, 10.0.0.2]");
}
