use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use env_logger::{Builder, Env, Target};
use log::{debug, error, info};
use std::io::Write;
use wifi_prov_console::{
    AppConfig, AuthClient, OutboundMessage, ProvisionRequest, Session, SessionEvent, Transport,
    WsTransport,
    events::{AuthEvent, DeviceEvent, Event},
    model::{Model, ProvisioningState},
    protocol::Dispatch,
    render_scan_list,
    update::{DISCONNECTED_MESSAGE, update},
};

#[derive(Parser)]
#[command(name = "wifi-prov-console")]
#[command(about = "Scan and provision Wi-Fi devices over their control channel")]
#[command(version)]
struct Args {
    /// Device base url, overrides DEVICE_URL
    #[arg(long)]
    device: Option<String>,

    /// Reply timeout in seconds, overrides REQUEST_TIMEOUT_SECS
    #[arg(long)]
    timeout: Option<u64>,

    /// Authenticate with this user before talking to the device
    #[arg(long, env = "DEVICE_USER")]
    user: Option<String>,

    #[arg(long, env = "DEVICE_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check credentials against the device's auth endpoint
    Auth,
    /// List the networks the device can see
    Scan,
    /// Send Wi-Fi credentials to the device
    Provision {
        /// Network to join
        #[arg(long)]
        ssid: Option<String>,
        /// Pick the network by its position in a fresh scan (starting at 1)
        #[arg(long, conflicts_with = "ssid")]
        pick: Option<usize>,
        /// Network password, empty for open networks
        #[arg(long, default_value = "", hide_default_value = true)]
        pass: String,
        /// Confirm joining a network without password
        #[arg(long)]
        allow_open: bool,
    },
    /// Print every message the device pushes until the channel closes
    Monitor,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    initialize();

    let args = Args::parse();
    let config = AppConfig::load()?.with_overrides(args.device.as_deref(), args.timeout)?;
    debug!("using device {}", config.device.base_url);

    if let Some(user) = &args.user {
        authenticate(&config, user, args.password.as_deref().unwrap_or_default()).await?;
    } else if matches!(args.command, Command::Auth) {
        bail!("auth requires --user");
    }

    match args.command {
        Command::Auth => Ok(()),
        Command::Scan => {
            let mut session = connect(&config).await?;
            scan(&mut session, &config).await?;
            print_scan_list(session.model());
            session.close().await
        }
        Command::Provision {
            ssid,
            pick,
            pass,
            allow_open,
        } => {
            let mut session = connect(&config).await?;

            let ssid = match (ssid, pick) {
                (Some(ssid), _) => ssid,
                (None, Some(pick)) => {
                    scan(&mut session, &config).await?;
                    print_scan_list(session.model());
                    select_network(&mut session, pick)?
                }
                (None, None) => String::new(),
            };

            let request = ProvisionRequest::new(ssid, pass, allow_open)?;
            provision(&mut session, &config, request).await?;
            session.close().await
        }
        Command::Monitor => {
            let mut session = connect(&config).await?;
            monitor(&mut session).await;
            Ok(())
        }
    }
}

fn initialize() {
    log_panics::init();

    let mut builder = if cfg!(debug_assertions) {
        Builder::from_env(Env::default().default_filter_or("debug"))
    } else {
        Builder::from_env(Env::default().default_filter_or("info"))
    };

    builder.format(|f, record| match record.level() {
        log::Level::Error => {
            eprintln!("{}", record.args());
            Ok(())
        }
        _ => {
            writeln!(f, "{}", record.args())
        }
    });

    builder.target(Target::Stderr).init();

    info!("module version: {}", env!("CARGO_PKG_VERSION"));
}

async fn authenticate(config: &AppConfig, user: &str, password: &str) -> Result<()> {
    let client = AuthClient::new(config.device.auth_url()?, config.request.timeout)?;
    let mut model = Model::default();

    update(Event::Auth(AuthEvent::LoginStarted), &mut model);
    let outcome = client.authenticate(user, password).await;
    update(Event::Auth(AuthEvent::LoginResponse(outcome.into())), &mut model);

    if let Some(message) = model.error_message {
        bail!(message);
    }

    println!("Authenticated as {user}.");
    Ok(())
}

async fn connect(config: &AppConfig) -> Result<Session<WsTransport>> {
    let url = config.device.ws_url()?;
    let transport = WsTransport::connect(url.as_str())
        .await
        .context(DISCONNECTED_MESSAGE)?;

    Ok(Session::new(transport))
}

async fn scan<T: Transport>(session: &mut Session<T>, config: &AppConfig) -> Result<()> {
    let id = session
        .send_message(OutboundMessage::Scan, config.request.timeout)
        .await?;

    settle(session.wait_for_reply(&id).await, session.model())
}

async fn provision<T: Transport>(
    session: &mut Session<T>,
    config: &AppConfig,
    request: ProvisionRequest,
) -> Result<()> {
    if request.is_open() {
        info!("joining open network {}", request.ssid());
    }

    let id = session
        .send_message(request.into(), config.request.timeout)
        .await?;

    settle(session.wait_for_reply(&id).await, session.model())?;

    if let ProvisioningState::Acknowledged(_) = session.model().provisioning {
        if let Some(message) = &session.model().error_message {
            bail!("{message}");
        }
        if let Some(message) = &session.model().success_message {
            println!("{message}");
        }
    }

    Ok(())
}

fn settle(event: SessionEvent, model: &Model) -> Result<()> {
    match event {
        SessionEvent::Reply { .. } => Ok(()),
        SessionEvent::TimedOut(_) | SessionEvent::Closed | SessionEvent::Dropped => {
            bail!(
                "{}",
                model
                    .error_message
                    .as_deref()
                    .unwrap_or(DISCONNECTED_MESSAGE)
            )
        }
    }
}

fn select_network<T: Transport>(session: &mut Session<T>, pick: usize) -> Result<String> {
    let Some(network) = pick
        .checked_sub(1)
        .and_then(|index| session.model().networks.get(index))
    else {
        bail!("no network at position {pick}");
    };

    let ssid = network.ssid.clone();
    session.apply(Event::Device(DeviceEvent::SelectNetwork { ssid }));

    session
        .model()
        .selected_ssid
        .clone()
        .context("no network selected")
}

fn print_scan_list(model: &Model) {
    if model.networks.is_empty() {
        println!("No networks found.");
        return;
    }

    for (position, entry) in render_scan_list(&model.networks).iter().enumerate() {
        println!("{:>3}. {entry}", position + 1);
    }
}

async fn monitor<T: Transport>(session: &mut Session<T>) {
    loop {
        match session.next_event().await {
            SessionEvent::Reply { dispatch, .. } => match dispatch {
                Dispatch::ScanResults(_) => print_scan_list(session.model()),
                Dispatch::ProvisionAck(ack) => println!("provisioning acknowledged: {ack:?}"),
                Dispatch::ConnectionStatus { connected } => {
                    println!("device wifi connected: {connected}")
                }
                Dispatch::Unrecognized(kind) => println!("unrecognized message type {kind:?}"),
            },
            SessionEvent::Dropped | SessionEvent::TimedOut(_) => continue,
            SessionEvent::Closed => {
                println!("{DISCONNECTED_MESSAGE}");
                return;
            }
        }
    }
}
