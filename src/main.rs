mod analytics;
mod analyzer;
mod chart;
mod cli_messages;
mod config;
mod consts;
mod debounce;
mod environment;
mod events;
mod filters;
mod logging;
mod network;
mod recipes;
mod region;
mod search;
mod session;
mod ui;

use crate::analyzer::history::{analysis_url, query_of};
use crate::analyzer::{AnalyzerController, ConfigHistory, load_entities};
use crate::chart::{ChartPage, ChartTab};
use crate::config::{Config, get_config_path};
use crate::environment::Environment;
use crate::logging::init_stderr_logger;
use crate::recipes::RecipeListPage;
use crate::region::ChartOptions;
use crate::session::messages::{print_session_nothing_to_load, print_session_starting};
use crate::session::{SessionData, run_headless_mode, run_tui_mode, setup_session};
use crate::ui::{AnalyzerScreen, ChartScreen, Screen};
use clap::{ArgAction, Parser, Subcommand};
use std::error::Error;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Command-line arguments
struct Args {
    /// Deployment to talk to: local, staging or production
    #[arg(long, global = true, value_name = "ENV")]
    env: Option<String>,

    /// Site URL, overriding the environment and the config file
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Explore recipes with filters and charts
    Analyze {
        /// Analysis to open, e.g. "hops=citra&ibu=20,60&charts=popular-hops".
        /// Defaults to the last saved analysis.
        #[arg(long, value_name = "QUERY")]
        query: Option<String>,

        /// Print the results instead of opening the terminal UI
        #[arg(long, action = ArgAction::SetTrue)]
        headless: bool,

        /// Disable background colors in the terminal UI
        #[arg(long = "no-background-color", action = ArgAction::SetFalse)]
        with_background: bool,
    },
    /// Show a single chart
    Chart {
        /// Chart endpoint, e.g. /styles/ipa/charts/popular-hops.json
        #[arg(value_name = "PATH")]
        path: String,

        /// Navigation tab; repeat for several tabs
        #[arg(long = "tab", value_name = "LABEL=FILTER")]
        tabs: Vec<ChartTab>,

        /// Chart options as JSON, e.g. '{"noDataText": "Nothing yet"}'
        #[arg(long, value_name = "JSON")]
        options: Option<String>,

        /// Print the chart instead of opening the terminal UI
        #[arg(long, action = ArgAction::SetTrue)]
        headless: bool,

        /// Disable background colors in the terminal UI
        #[arg(long = "no-background-color", action = ArgAction::SetFalse)]
        with_background: bool,
    },
    /// List the recipes of an endpoint
    Recipes {
        /// Recipe list endpoint
        #[arg(value_name = "PATH")]
        path: String,

        /// The endpoint returns a JSON link list instead of HTML
        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,
    },
    /// Forget the saved analysis
    Reset,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let environment_str = args
        .env
        .clone()
        .or_else(|| std::env::var("BEER_ANALYTICS_ENVIRONMENT").ok())
        .unwrap_or_default();
    let environment = environment_str
        .parse::<Environment>()
        .unwrap_or(Environment::default());

    let config_path = get_config_path()?;
    match args.command {
        Command::Analyze {
            query,
            headless,
            with_background,
        } => {
            if headless {
                init_stderr_logger();
            }
            let session = setup_session(environment, &config_path, args.base_url)?;
            analyze(session, query, headless, with_background).await
        }
        Command::Chart {
            path,
            tabs,
            options,
            headless,
            with_background,
        } => {
            if headless {
                init_stderr_logger();
            }
            let options = options
                .as_deref()
                .map(ChartOptions::from_json)
                .unwrap_or_default();
            let session = setup_session(environment, &config_path, args.base_url)?;
            chart(session, &path, tabs, options, headless, with_background).await
        }
        Command::Recipes { path, json } => {
            init_stderr_logger();
            let session = setup_session(environment, &config_path, args.base_url)?;
            print_session_starting("recipes", &session.environment, session.base_url());
            let mut page = RecipeListPage::new(
                &path,
                json,
                session.client.clone(),
                session.completions.clone(),
                session.events.clone(),
            );
            page.load();
            run_headless_mode(session, page).await
        }
        Command::Reset => {
            println!("Forgetting the saved analysis...");
            Config::clear_last_analysis(&config_path)?;
            print_cmd_success!("Reset", "{}", config_path.display());
            Ok(())
        }
    }
}

/// Starts the analyzer from `query`, or from the last saved analysis.
async fn analyze(
    session: SessionData,
    query: Option<String>,
    headless: bool,
    with_background: bool,
) -> Result<(), Box<dyn Error>> {
    let mode = if headless { "headless analysis" } else { "analysis" };
    print_session_starting(mode, &session.environment, session.base_url());

    let entities = match load_entities(&session.client).await {
        Ok(entities) => entities,
        Err(e) => {
            if e.is_unavailable() {
                cli_messages::print_site_unavailable(session.base_url());
            }
            print_cmd_error!("Failed to load the analyzer entities", &e.to_string());
            session.background.shutdown().await;
            return Err(e.into());
        }
    };

    let history = ConfigHistory::new(session.config_path.clone());
    let initial = match query {
        Some(query) => query_of(&query),
        None => {
            let restored = history.restore();
            if !restored.is_empty() {
                print_cmd_info!("Restored analysis", "{}", analysis_url(&restored));
            }
            restored
        }
    };

    let mut controller = AnalyzerController::new(
        &entities,
        session.client.clone(),
        session.completions.clone(),
        session.events.clone(),
        Box::new(history),
        session.telemetry.clone(),
    );
    controller.start(&initial);

    if headless {
        if !controller.is_initialized() {
            print_session_nothing_to_load();
        }
        return run_headless_mode(session, controller).await;
    }

    let screen = AnalyzerScreen::new(
        controller,
        entities,
        session.telemetry.clone(),
        session.events.clone(),
    );
    run_tui_mode(session, Screen::Analyzer(Box::new(screen)), with_background).await
}

/// Shows one chart, unfiltered first.
async fn chart(
    session: SessionData,
    path: &str,
    tabs: Vec<ChartTab>,
    options: ChartOptions,
    headless: bool,
    with_background: bool,
) -> Result<(), Box<dyn Error>> {
    print_session_starting("chart", &session.environment, session.base_url());
    let mut page = ChartPage::new(
        path,
        options,
        tabs,
        session.client.clone(),
        session.completions.clone(),
        session.events.clone(),
        session.telemetry.clone(),
    );
    page.load();

    if headless {
        return run_headless_mode(session, page).await;
    }
    let screen = ChartScreen::new(page);
    run_tui_mode(session, Screen::Chart(Box::new(screen)), with_background).await
}
