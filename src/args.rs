use {
    clap::Parser,
    std::path::PathBuf,
};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Fast DNS resolution and subdomain enumeration.",
    after_help = "Examples:\n  ruenum -d example.com -w wordlist.txt -r resolvers.txt\n  subfinder -d example.com | ruenum -r resolvers.txt\n  cat domains.txt | ruenum -r resolvers.txt"
)]
pub struct Args {
    #[arg(short, long, help = "Domain to brute-force.")]
    pub domain: Option<String>,

    #[arg(short, long, help = "Wordlist for brute-force.")]
    pub wordlist: Option<PathBuf>,

    #[arg(
        short = 'r',
        long = "resolvers-file",
        help = "File containing DNS resolvers (one per line)."
    )]
    pub resolvers_file: Option<PathBuf>,

    #[arg(
        long,
        default_value = "8.8.8.8:53,1.1.1.1:53",
        help = "Comma-separated list of DNS resolvers."
    )]
    pub resolvers: String,

    #[arg(
        long,
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Queries per second. Default: 10"
    )]
    pub rate: u32,

    #[arg(short, long, default_value_t = 2, help = "Timeout in seconds. Default: 2")]
    pub timeout: u64,

    #[arg(long, help = "Disable wildcard detection.")]
    pub no_wildcard: bool,

    #[arg(short, long, help = "Verbose output.")]
    pub verbose: bool,

    #[arg(short, long, help = "Output file to save results.")]
    pub output: Option<PathBuf>,

    #[arg(
        long,
        help = "Maximum number of lookups in flight. Default: unlimited"
    )]
    pub max_in_flight: Option<usize>,
}

impl Args {
    /// Brute-force needs both a domain and a wordlist.
    pub fn bruteforce_target(&self) -> Option<(&str, &PathBuf)> {
        self.domain.as_deref().zip(self.wordlist.as_ref())
    }
}
