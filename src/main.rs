use std::env;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, Subscriber};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use textindex::{menu, router, AppState, TextIndex};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_CORPUS: &str = "corpus.txt";
const DEFAULT_MAX_RESULTS: usize = 500;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = load_config();
    info!("using corpus at {}", config.corpus_path.display());

    let start = Instant::now();
    let index = TextIndex::build_from_file(&config.corpus_path)
        .with_context(|| format!("loading corpus {}", config.corpus_path.display()))?;
    info!("index built in {} ms", start.elapsed().as_millis());

    if config.interactive {
        let index = Arc::clone(&index);
        tokio::task::spawn_blocking(move || {
            menu::run(&index, io::stdin().lock(), io::stdout().lock())
        })
        .await??;
        return Ok(());
    }

    let state = AppState {
        index: Arc::clone(&index),
        max_results: config.max_results,
    };

    let app = router(state).layer(TraceLayer::new_for_http());
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.host, config.port))?;
    info!("binding to {}", addr);
    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Debug, Clone)]
struct Config {
    host: String,
    port: u16,
    corpus_path: PathBuf,
    max_results: usize,
    interactive: bool,
}

fn load_config() -> Config {
    let mut interactive = false;
    let mut cli_corpus: Option<PathBuf> = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--interactive" | "-i" => interactive = true,
            "--corpus" => {
                if let Some(path) = args.next() {
                    cli_corpus = Some(PathBuf::from(path));
                }
            }
            _ => {
                if let Some(path) = arg.strip_prefix("--corpus=") {
                    cli_corpus = Some(PathBuf::from(path));
                }
            }
        }
    }

    let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    let corpus_path = cli_corpus
        .or_else(|| env::var("CORPUS_PATH").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CORPUS));
    let max_results = env::var("MAX_RESULTS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_MAX_RESULTS);

    Config {
        host,
        port,
        corpus_path,
        max_results,
        interactive,
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    subscriber(env_filter).init();
}

// Logs go to stderr so the interactive menu owns stdout.
fn subscriber(env_filter: EnvFilter) -> impl Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_level(true)
        .finish()
}
