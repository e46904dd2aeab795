use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use field::point::Viewport;
use shepherd::ShepherdError;
use shepherd::api::{Backend, HttpBackend};
use shepherd::config::{Config, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
use shepherd::session::Session;
use shepherd::store::DEFAULT_CAPACITY;
use shepherd::sync::ReconnectPolicy;
use shepherd::{console, tail};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "shepherd", about = "Server Shepherd live operations dashboard")]
struct Cli {
    #[command(flatten)]
    connect: ConnectArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct ConnectArgs {
    #[arg(long, global = true, env = "SHEPHERD_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[arg(long, global = true, env = "SHEPHERD_WS_URL", help = "Push channel URL; defaults to /ws on the base URL")]
    ws_url: Option<String>,

    #[arg(long, global = true, env = "SHEPHERD_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    timeout_secs: u64,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the live dashboard on the console.
    Watch(WatchArgs),
    /// Print the current event snapshot as JSON.
    Events,
    /// Acknowledge one event by id.
    Ack { id: String },
    /// Submit one raw log line.
    Ingest { raw: String },
    /// Follow a log file and submit each new line.
    Tail(TailArgs),
}

#[derive(Args, Debug)]
struct WatchArgs {
    #[arg(long, env = "SHEPHERD_CAPACITY", default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,

    #[arg(long, env = "SHEPHERD_FPS", default_value_t = field::consts::TARGET_FPS)]
    fps: u32,

    #[arg(long, default_value_t = 800.0)]
    width: f64,

    #[arg(long, default_value_t = 600.0)]
    height: f64,

    #[arg(long, default_value_t = false, help = "Stop after the first disconnect")]
    no_reconnect: bool,
}

#[derive(Args, Debug)]
struct TailArgs {
    #[arg(long, env = "SHEPHERD_TAIL_FILE")]
    file: PathBuf,

    #[arg(long, default_value_t = 250)]
    poll_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), ShepherdError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();
    let timeout = Duration::from_secs(cli.connect.timeout_secs);
    let backend = || HttpBackend::new(&cli.connect.base_url, timeout);

    match cli.command {
        Command::Watch(args) => run_watch(&cli.connect, args).await,
        Command::Events => run_events(&backend()?).await,
        Command::Ack { id } => run_ack(&backend()?, &id).await,
        Command::Ingest { raw } => run_ingest(&backend()?, &raw).await,
        Command::Tail(args) => run_tail(&backend()?, args).await,
    }
}

async fn run_watch(connect: &ConnectArgs, args: WatchArgs) -> Result<(), ShepherdError> {
    let reconnect = if args.no_reconnect { ReconnectPolicy::disabled() } else { ReconnectPolicy::default() };
    let config = Config {
        base_url: connect.base_url.clone(),
        ws_url: connect.ws_url.clone(),
        capacity: args.capacity,
        fps: args.fps,
        viewport: Viewport::new(args.width, args.height),
        reconnect,
        request_timeout: Duration::from_secs(connect.timeout_secs),
    };
    let backend = HttpBackend::from_config(&config)?;
    let handle = Session::spawn(config, Arc::new(backend))?;
    console::run(handle).await
}

async fn run_events(backend: &HttpBackend) -> Result<(), ShepherdError> {
    let events = backend.fetch_events().await?;
    let rendered = serde_json::to_string_pretty(&wire::Snapshot { events })?;
    println!("{rendered}");
    Ok(())
}

async fn run_ack(backend: &HttpBackend, id: &str) -> Result<(), ShepherdError> {
    backend.acknowledge(id).await?;
    println!("acknowledged {id}");
    Ok(())
}

async fn run_ingest(backend: &HttpBackend, raw: &str) -> Result<(), ShepherdError> {
    match backend.ingest(raw).await? {
        Some(id) => println!("{id}"),
        None => println!("ok"),
    }
    Ok(())
}

async fn run_tail(backend: &HttpBackend, args: TailArgs) -> Result<(), ShepherdError> {
    let poll = if args.poll_ms == 0 { tail::POLL_INTERVAL } else { Duration::from_millis(args.poll_ms) };
    tokio::select! {
        result = tail::follow(&args.file, backend, poll) => result,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("tail: interrupted");
            Ok(())
        }
    }
}
