use clap::Parser;
use reqwest::Url;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000";
pub const DEFAULT_EXAMPLES: &[&str] = &["google", "microsoft", "tesla", "paypal"];

#[derive(Parser, Debug)]
#[command(
    name = "revwhoix",
    about = "Desktop client for reverse WHOIS domain search",
    version,
    long_about = None
)]
pub struct Args {
    /// Base URL of the search backend
    #[arg(long, env = "REVWHOIX_ENDPOINT", default_value = DEFAULT_ENDPOINT, value_parser = parse_endpoint)]
    pub endpoint: String,

    /// Request timeout in seconds; waits indefinitely when unset
    #[arg(long, env = "REVWHOIX_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Keyword offered as a one-click example (repeatable)
    #[arg(long = "example", value_name = "KEYWORD")]
    pub examples: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub endpoint: String,
    pub timeout: Option<Duration>,
    pub examples: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: None,
            examples: DEFAULT_EXAMPLES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        let examples: Vec<String> = args
            .examples
            .into_iter()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect();

        Config {
            endpoint: args.endpoint,
            timeout: args.timeout_secs.map(Duration::from_secs),
            examples: if examples.is_empty() {
                Config::default().examples
            } else {
                examples
            },
        }
    }
}

fn parse_endpoint(value: &str) -> Result<String, String> {
    let url = Url::parse(value).map_err(|e| format!("invalid endpoint '{}': {}", value, e))?;
    match url.scheme() {
        "http" | "https" => Ok(value.trim_end_matches('/').to_string()),
        other => Err(format!("unsupported scheme '{}', expected http or https", other)),
    }
}
