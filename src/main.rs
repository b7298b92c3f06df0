use {
    clap::{CommandFactory, Parser},
    ruenum::{
        errors::ConfigError,
        sink::{open_output_file, ResultSink},
        structs::Config,
        utils::{init_logging, load_resolvers_file, parse_resolver_list},
        Enumerator, HickoryTransport,
    },
    std::{
        io::IsTerminal,
        path::Path,
        sync::Arc,
        time::Duration,
    },
    tokio::{
        fs::File,
        io::{self, BufReader},
    },
};

mod args;

use args::Args;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    if args.bruteforce_target().is_none() && std::io::stdin().is_terminal() {
        eprintln!("{}", Args::command().render_help());
        std::process::exit(1);
    }

    let config = Arc::new(build_config(&args).await?);
    init_logging(config.verbose);

    let bruteforce = match args.bruteforce_target() {
        Some((domain, path)) => Some((domain.to_owned(), open_wordlist(path).await?)),
        None => None,
    };

    let output_file = match &config.output_file {
        Some(path) => Some(open_output_file(path).await?),
        None => None,
    };

    let transport = HickoryTransport::new(&config.resolvers, config.timeout);
    let enumerator = Enumerator::new(Arc::clone(&config), transport);
    let (results, writer) = ResultSink::new(io::stdout(), output_file).spawn();

    match bruteforce {
        Some((domain, wordlist)) => {
            enumerator
                .bruteforce(&domain, BufReader::new(wordlist), results)
                .await?
        }
        None => {
            enumerator
                .enumerate(BufReader::new(io::stdin()), results)
                .await?
        }
    }

    writer.await??;
    Ok(())
}

async fn build_config(args: &Args) -> Result<Config, ConfigError> {
    let resolvers = match &args.resolvers_file {
        Some(path) => load_resolvers_file(path).await?,
        None => parse_resolver_list(&args.resolvers).await?,
    };

    let mut config = Config::new(resolvers);
    config.rate = args.rate;
    config.timeout = Duration::from_secs(args.timeout);
    config.wildcard_check = !args.no_wildcard;
    config.verbose = args.verbose;
    config.output_file = args.output.clone();
    config.max_in_flight = args.max_in_flight;

    config.validate()?;
    Ok(config)
}

async fn open_wordlist(path: &Path) -> Result<File, ConfigError> {
    File::open(path)
        .await
        .map_err(|source| ConfigError::UnreadableFile {
            kind: "wordlist",
            path: path.to_owned(),
            source,
        })
}
