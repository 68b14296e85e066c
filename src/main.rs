// Wren - conversational device onboarding
// Main entry point

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use wren::channel::{ConsoleChannel, InteractionChannel};
use wren::config::{load_settings, Settings};
use wren::configure::ManualConfigurer;
use wren::dialog::{DialogError, DiscoveryNegotiator};
use wren::discovery::{DiscoveryRequest, DiscoveryService, MdnsDiscovery};
use wren::platform::{try_current_location, HostPlatform, LocationFix};
use wren::session::LocalSession;
use wren::stats::{UsageRecorder, UsageStats};

#[derive(Parser)]
#[command(
    name = "wren",
    version,
    about = "Conversational device onboarding for the local network"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search for nearby devices and set one up
    Discover {
        /// Restrict the search to one advertised protocol family
        #[arg(long)]
        discovery_type: Option<String>,

        /// Keep only candidates of this device kind
        #[arg(long)]
        kind: Option<String>,

        /// What to call the device in prompts
        #[arg(long)]
        name: Option<String>,
    },
    /// Print the current location, if the platform can provide one
    Locate,
    /// Show usage counters
    Stats,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wren=info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let settings = load_settings()?;

    match cli.command {
        Command::Discover {
            discovery_type,
            kind,
            name,
        } => discover(settings, discovery_type, kind, name).await,
        Command::Locate => locate(settings).await,
        Command::Stats => stats(),
    }
}

async fn discover(
    settings: Settings,
    discovery_type: Option<String>,
    kind: Option<String>,
    name: Option<String>,
) -> Result<ExitCode> {
    let mut request =
        DiscoveryRequest::new().with_timeout(Duration::from_secs(settings.discovery.timeout_secs));
    if let Some(discovery_type) = discovery_type {
        request = request.with_discovery_type(discovery_type);
    }
    if let Some(kind) = kind {
        request = request.with_kind(kind);
    }
    if let Some(name) = name {
        request = request.with_name(name);
    }

    let mut mdns_handle = None;
    let discovery = if settings.discovery.enabled {
        let mdns = Arc::new(MdnsDiscovery::new()?);
        // Ctrl-C during the browse cancels the conversation.
        let token = mdns.cancel_token();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        });
        mdns_handle = Some(Arc::clone(&mdns));
        Some(mdns as Arc<dyn DiscoveryService>)
    } else {
        None
    };

    let usage_path = UsageStats::default_path()?;
    let usage = match UsageStats::load(usage_path.clone()) {
        Ok(stats) => Arc::new(stats),
        Err(err) => {
            warn!(error = %err, "could not load usage counters, starting fresh");
            Arc::new(UsageStats::with_path(usage_path))
        }
    };

    let session = Arc::new(LocalSession::new(
        settings.session.anonymous,
        settings.session.allow_configure,
    ));
    let negotiator = DiscoveryNegotiator::new(
        discovery,
        Arc::new(ManualConfigurer::new()),
        session,
        Arc::clone(&usage) as Arc<dyn UsageRecorder>,
    );

    let channel: Arc<dyn InteractionChannel> = Arc::new(ConsoleChannel::new());
    let result = negotiator.run_discovery_flow(channel, request).await;

    usage.save();
    if let Some(mdns) = mdns_handle {
        if let Err(err) = mdns.shutdown() {
            warn!(error = %err, "mDNS daemon shutdown failed");
        }
    }

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(DialogError::Cancelled) => {
            println!("Cancelled.");
            Ok(ExitCode::from(130))
        }
        Err(err) => Err(err.into()),
    }
}

async fn locate(settings: Settings) -> Result<ExitCode> {
    let platform = HostPlatform::new(settings.location);
    match try_current_location(&platform).await? {
        LocationFix::Position(position) => match position.display {
            Some(display) => println!(
                "{} ({:.4}, {:.4})",
                display, position.latitude, position.longitude
            ),
            None => println!("({:.4}, {:.4})", position.latitude, position.longitude),
        },
        LocationFix::Unsupported => println!("This platform has no location capability."),
        LocationFix::Unavailable => println!("No location fix is available right now."),
    }
    Ok(ExitCode::SUCCESS)
}

fn stats() -> Result<ExitCode> {
    let usage = UsageStats::load(UsageStats::default_path()?)?;
    let snapshot = usage.snapshot();
    if snapshot.counters.is_empty() {
        println!("No usage recorded yet.");
    } else {
        for (event, count) in &snapshot.counters {
            println!("{}: {}", event, count);
        }
    }
    Ok(ExitCode::SUCCESS)
}
