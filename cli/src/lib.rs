mod args;
mod render;

pub use args::Cli;
pub use args::Command;
pub use args::FiltersArgs;
pub use args::ListArgs;
pub use args::QueryArgs;
pub use args::SearchArgs;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use gitss_backend_client::SearchClient;
use gitss_protocol::query;
use gitss_search_state::Dispatcher;
use gitss_search_state::GitssConfig;
use gitss_search_state::HistoryBridge;
use gitss_search_state::Location;
use gitss_search_state::MemoryHistory;
use gitss_search_state::SearchOutcome;
use gitss_search_state::Store;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "warn";

/// Logs go to stderr so stdout stays parseable. `RUST_LOG` overrides the
/// default level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn load_config(cli: &Cli) -> Result<GitssConfig> {
    let mut config = match &cli.config {
        Some(path) => GitssConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => GitssConfig::default(),
    };
    if let Some(base_url) = &cli.base_url {
        config.backend.base_url = base_url.clone();
    }
    config.validate().context("invalid configuration")?;
    tracing::debug!(base_url = %config.backend.base_url, "using backend");
    Ok(config)
}

type CliDispatcher = Dispatcher<SearchClient, MemoryHistory>;

fn dispatcher(config: &GitssConfig) -> Result<CliDispatcher> {
    let client = SearchClient::new(config.client_options())?;
    Ok(Dispatcher::new(
        Store::new(config.store_options()),
        client,
        MemoryHistory::default(),
    ))
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    match cli.command {
        Command::Search(args) => run_search(&config, args).await,
        Command::Url(args) => run_url(&config, &args),
        Command::Filters(args) => run_filters(&config, args).await,
        Command::Indexed(args) => run_indexed(&config, args).await,
        Command::Version => run_version(&config).await,
    }
}

async fn run_search(config: &GitssConfig, args: SearchArgs) -> Result<()> {
    let (base, params) = args.query.to_request()?;
    let mut dispatcher = dispatcher(config)?;
    let mut bridge = HistoryBridge::mount(dispatcher.navigator_mut());
    dispatcher.trigger_filter(&base, &params, &args.query.query, args.query.page);
    let outcomes = bridge.pump(&mut dispatcher).await;
    bridge.unmount(dispatcher.navigator_mut());

    let state = dispatcher.state();
    match outcomes.first() {
        Some(SearchOutcome::Applied) => {}
        Some(SearchOutcome::Failed) => {
            let message = state.last_error.as_deref().unwrap_or("unknown error");
            bail!("search failed: {message}");
        }
        Some(SearchOutcome::Stale) | None => bail!("no search was run"),
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(&state.result)?);
    } else {
        print!("{}", render::search_report(state));
    }
    Ok(())
}

fn run_url(config: &GitssConfig, args: &QueryArgs) -> Result<()> {
    let (base, mut params) = args.to_request()?;
    params.query = Some(args.query.clone());
    params.page = Some(args.page);
    let location = Location::new(query::build_base_filter_path(&base), query::encode(&params));
    println!(
        "{}{}",
        config.backend.base_url.trim_end_matches('/'),
        location.to_url()
    );
    Ok(())
}

async fn run_filters(config: &GitssConfig, args: FiltersArgs) -> Result<()> {
    let scope = args.scope();
    scope.validate()?;
    let mut dispatcher = dispatcher(config)?;
    dispatcher.load_base_filters(&scope).await?;
    let options = &dispatcher.state().base_filter_options;
    if args.list.json {
        println!("{}", serde_json::to_string_pretty(options)?);
    } else {
        print!("{}", render::filters_report(options));
    }
    Ok(())
}

async fn run_indexed(config: &GitssConfig, args: ListArgs) -> Result<()> {
    let mut dispatcher = dispatcher(config)?;
    dispatcher.load_indexed_list().await?;
    let list = &dispatcher.state().indexed_list;
    if args.json {
        println!("{}", serde_json::to_string_pretty(list)?);
    } else {
        print!("{}", render::indexed_report(list));
    }
    Ok(())
}

async fn run_version(config: &GitssConfig) -> Result<()> {
    let client = SearchClient::new(config.client_options())?;
    let version = client.version().await?;
    println!("{} ({})", version.version, version.commit_hash);
    Ok(())
}
