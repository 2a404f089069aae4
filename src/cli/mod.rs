use crate::{
    config::AppConfig,
    planner::{Crew, TripPipeline},
    server,
};
use clap::{Arg, Command};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn command() -> Command {
    Command::new("trip-planner")
        .version(env!("CARGO_PKG_VERSION"))
        .about("HTTP service that plans trips with a researcher, a hotel finder and a planner agent")
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .value_parser(clap::value_parser!(u16))
                .help("Port to listen on (or set PORT)"),
        )
        .arg(
            Arg::new("host")
                .long("host")
                .value_name("HOST")
                .help("Address to bind (or set HOST)"),
        )
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .value_name("MODEL")
                .help("Model id used by every role (or set LLM_MODEL)"),
        )
        .arg(
            Arg::new("origin")
                .long("allowed-origin")
                .value_name("URL")
                .help("The one browser origin allowed to call the API (or set ALLOWED_ORIGIN)"),
        )
}

/// CLI entry point: load configuration once, build the crew, serve until Ctrl-C
pub async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let matches = command().get_matches();

    let mut config = AppConfig::from_env()?;
    if let Some(port) = matches.get_one::<u16>("port") {
        config.port = *port;
    }
    if let Some(host) = matches.get_one::<String>("host") {
        config.host = host.clone();
    }
    if let Some(model) = matches.get_one::<String>("model") {
        config.model = model.clone();
    }
    if let Some(origin) = matches.get_one::<String>("origin") {
        config = config.with_allowed_origin(origin)?;
    }

    if config.llm_api_key.is_none() {
        warn!("GOOGLE_API_KEY is not set; every planning request will fail");
    }
    if config.search_api_key.is_none() {
        warn!("SERPAPI_KEY is not set; web search calls will fail");
    }

    let pipeline = Arc::new(TripPipeline::from_crew(Crew::from_config(&config)));
    let routes = server::routes(pipeline, &config.allowed_origin);
    let addr = server::bind_address(&config.host, config.port)?;

    let (bound, server) = warp::serve(routes).try_bind_with_graceful_shutdown(addr, async {
        tokio::signal::ctrl_c().await.ok();
    })?;

    info!(
        address = %bound,
        model = %config.model,
        allowed_origin = %config.allowed_origin,
        "trip planner listening"
    );

    server.await;
    info!("server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parses_overrides() {
        let matches = command()
            .try_get_matches_from([
                "trip-planner",
                "--port",
                "9000",
                "--allowed-origin",
                "http://localhost:3000",
            ])
            .unwrap();

        assert_eq!(matches.get_one::<u16>("port"), Some(&9000));
        assert_eq!(
            matches.get_one::<String>("origin").map(String::as_str),
            Some("http://localhost:3000")
        );
        assert!(matches.get_one::<String>("model").is_none());
    }

    #[test]
    fn test_command_rejects_bad_port() {
        assert!(command()
            .try_get_matches_from(["trip-planner", "--port", "seventy"])
            .is_err());
    }
}
