//! witness daemon — entry point for running the photo verification bot.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use witness_daemon::{Bot, DaemonConfig, ShutdownController, TransportKind};
use witness_gateway::{FsPayloadLoader, IpfsGateway};
use witness_transport::{ConsoleTransport, Transport};
use witness_utils::{init_logging, LogFormat};
use witness_workflow::{EngineConfig, WorkflowEngine};

#[derive(Parser)]
#[command(name = "witnessd", about = "Photo archival and verification bot")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "WITNESS_CONFIG")]
    config: Option<PathBuf>,

    /// Chat transport: "signald" or "console".
    #[arg(long, env = "WITNESS_TRANSPORT")]
    transport: Option<TransportKind>,

    /// The bot's Signal number. Falls back to SIGNAL_PHONE_NUMBER.
    #[arg(long, env = "WITNESS_ACCOUNT")]
    account: Option<String>,

    /// signald socket path.
    #[arg(long, env = "WITNESS_SIGNALD_SOCKET")]
    socket: Option<PathBuf>,

    /// IPFS HTTP API base URL.
    #[arg(long, env = "WITNESS_IPFS_API")]
    ipfs_api: Option<String>,

    /// Public gateway used to build shareable photo links.
    #[arg(long, env = "WITNESS_PUBLIC_GATEWAY")]
    public_gateway: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "WITNESS_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "WITNESS_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the bot until the transport closes or a shutdown signal arrives.
    Run,
    /// Print the effective configuration as TOML and exit.
    PrintConfig,
}

impl Cli {
    /// Apply CLI flags and env vars on top of the file configuration.
    fn apply_overrides(&self, mut config: DaemonConfig) -> DaemonConfig {
        if let Some(kind) = self.transport {
            config.transport.kind = kind;
        }
        if let Some(account) = self
            .account
            .clone()
            .or_else(|| std::env::var("SIGNAL_PHONE_NUMBER").ok())
        {
            config.transport.account = Some(account);
        }
        if let Some(socket) = &self.socket {
            config.transport.socket_path = socket.clone();
        }
        if let Some(api) = &self.ipfs_api {
            config.gateway.api_url = api.clone();
        }
        if let Some(public) = &self.public_gateway {
            config.gateway.public_gateway = public.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let file_config = match &cli.config {
        Some(path) => DaemonConfig::from_toml_file(path)?,
        None => DaemonConfig::default(),
    };
    let config = cli.apply_overrides(file_config);

    init_logging(config.log_format, &config.log_level);
    if let Some(path) = &cli.config {
        tracing::info!("loaded config from {}", path.display());
    }

    match cli.command {
        Command::PrintConfig => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
        Command::Run => run(config).await,
    }
}

async fn run(config: DaemonConfig) -> anyhow::Result<()> {
    config.validate()?;

    let gateway = IpfsGateway::new(config.gateway.clone())?;
    let loader = FsPayloadLoader::from_config(&config.gateway);
    let engine = WorkflowEngine::new(
        Arc::new(gateway),
        Arc::new(loader),
        EngineConfig {
            archive_timeout: config.gateway.timeout(),
            notify_verifiers: config.notify_verifiers,
        },
    );

    tracing::info!(
        "starting witness bot (transport: {:?}, IPFS API: {}, public gateway: {})",
        config.transport.kind,
        config.gateway.api_url,
        config.gateway.public_gateway,
    );

    let shutdown = Arc::new(ShutdownController::new());
    let signals = shutdown.spawn_signal_listener();

    match config.transport.kind {
        TransportKind::Console => {
            serve(ConsoleTransport::stdio(), engine, &shutdown).await?;
        }
        TransportKind::Signald => {
            let account = config.transport.account.as_deref().unwrap_or_default();
            let transport = connect_signald(&config.transport.socket_path, account).await?;
            serve(transport, engine, &shutdown).await?;
        }
    }

    if signals.is_finished() {
        if let Ok(signal) = signals.await {
            tracing::info!(%signal, "witness daemon exited cleanly");
            return Ok(());
        }
    } else {
        signals.abort();
    }
    tracing::info!("witness daemon exited cleanly");
    Ok(())
}

async fn serve<T: Transport>(
    transport: T,
    engine: WorkflowEngine,
    shutdown: &ShutdownController,
) -> anyhow::Result<()> {
    let stats = Bot::new(transport, engine).run(shutdown.subscribe()).await?;
    tracing::debug!(?stats, "event loop finished");
    Ok(())
}

#[cfg(unix)]
async fn connect_signald(
    socket: &std::path::Path,
    account: &str,
) -> anyhow::Result<impl Transport> {
    Ok(witness_transport::SignaldTransport::connect(socket, account).await?)
}

#[cfg(not(unix))]
async fn connect_signald(
    _socket: &std::path::Path,
    _account: &str,
) -> anyhow::Result<ConsoleTransport<tokio::io::Stdin, tokio::io::Stdout>> {
    anyhow::bail!("the signald transport needs Unix domain sockets")
}
