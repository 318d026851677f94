use actix_web::{web, App, HttpServer};
use clap::Parser;
use dotenvy::dotenv;
use feedrelay::{
    api,
    config::AppConfig,
    discord::{DiscordClient, GuildDirectory},
    errors::RelayResult,
    hub::HubClient,
    observability, tasks,
    tasks::types::EVENT_QUEUE_SIZE,
    Relay,
};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Relays YouTube uploads announced by a PubSubHubbub hub into Discord
/// channels whose topic names the feed.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port for hub callbacks, overrides FR_PORT
    #[clap(long)]
    port: Option<u16>,

    /// Validate the configuration and exit
    #[clap(long)]
    check_config: bool,
}

fn main() -> ExitCode {
    dotenv().ok();
    observability::init_logging(&observability::LogSettings::from_env());

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "feedrelay stopped");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> RelayResult<()> {
    let mut config = AppConfig::from_env()?;
    if let Some(port) = args.port {
        config.port = port;
    }

    if args.check_config {
        tracing::info!(?config, "Configuration is valid");
        return Ok(());
    }

    run_server(config)
}

#[actix_web::main]
async fn run_server(config: AppConfig) -> RelayResult<()> {
    let discord = Arc::new(DiscordClient::new(config.discord.clone())?);
    let hub = Arc::new(HubClient::new(config.hub.clone())?);
    tracing::info!(hub = hub.hub_url(), callback = %config.callback_url, "Using hub");

    let relay = Arc::new(Relay::new(hub, discord.clone(), config.callback_url.clone()));

    let (events_tx, events_rx) = mpsc::channel(EVENT_QUEUE_SIZE);
    let directory = Arc::new(GuildDirectory::new(discord, config.guild_id.clone()));
    tokio::spawn(tasks::channel_watcher::runner::start(
        directory,
        config.poll_interval,
        events_tx,
    ));
    tokio::spawn(tasks::lease_renewal::runner::start(
        relay.clone(),
        config.resubscribe_interval,
    ));

    let relay_data = web::Data::from(relay.clone());
    let server = HttpServer::new(move || {
        App::new()
            .wrap(tracing_actix_web::TracingLogger::default())
            .app_data(relay_data.clone())
            .configure(api::configure)
    })
    .bind(("0.0.0.0", config.port))?
    .run();
    let server_handle = server.handle();
    tracing::info!("Listening for hub callbacks on port {}", config.port);

    tokio::select! {
        result = server => {
            result?;
            Ok(())
        }
        result = relay.run(events_rx) => {
            server_handle.stop(true).await;
            result
        }
    }
}
