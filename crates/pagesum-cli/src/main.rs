//! PageSum CLI - summarize a web page from the command line

use clap::{Parser, ValueEnum};
use pagesum::{Config, PageSummarizer, PageSummary, DEFAULT_MAX_CHARS, DEFAULT_MODEL};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

/// Width of the delimiter lines around the summary
const RULE_WIDTH: usize = 80;

/// Output format for the summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Summary framed by delimiter lines
    #[default]
    Text,
    /// JSON format
    Json,
}

/// PageSum - fetch a web page and summarize it in a few sentences
#[derive(Parser, Debug)]
#[command(name = "pagesum")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// URL of the page to summarize
    url: Option<String>,

    /// API key for the completion endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// API root of an OpenAI-compatible endpoint
    #[arg(long, env = "OPENAI_BASE_URL")]
    base_url: Option<String>,

    /// Model identifier
    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Attempts per summary, including the first
    #[arg(long, default_value_t = pagesum::retry::DEFAULT_MAX_RETRIES)]
    max_retries: u32,

    /// Maximum characters of page text sent for summarization
    #[arg(long, default_value_t = DEFAULT_MAX_CHARS)]
    max_chars: usize,

    /// Custom User-Agent
    #[arg(long)]
    user_agent: Option<String>,

    /// Output format
    #[arg(long, short, default_value = "text")]
    output: OutputFormat,
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::new(self.api_key.clone().unwrap_or_default())
            .model(self.model.clone())
            .max_retries(self.max_retries)
            .max_chars(self.max_chars);
        if let Some(ref base_url) = self.base_url {
            config = config.base_url(base_url.clone());
        }
        if let Some(ref ua) = self.user_agent {
            config = config.user_agent(ua.clone());
        }
        config
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,pagesum=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let Some(url) = cli.url.clone() else {
        eprintln!("Usage: pagesum <URL>");
        eprintln!("Example: pagesum https://example.com");
        std::process::exit(1);
    };

    let summarizer = match PageSummarizer::from_config(&cli.config()) {
        Ok(summarizer) => summarizer,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match summarizer.summarize_page(&url).await {
        Ok(page) => match cli.output {
            OutputFormat::Text => writeln_safe(&format_summary(&page)),
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&page).unwrap_or_else(|e| {
                    eprintln!("Error serializing summary: {}", e);
                    std::process::exit(1);
                });
                writeln_safe(&json);
            }
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Frame the summary with delimiter lines
fn format_summary(page: &PageSummary) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("{rule}\nSUMMARY:\n{rule}\n{}\n{rule}", page.summary)
}

/// Write to stdout, exit silently on broken pipe
fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}
