//! Skycast - current weather and forecast in the terminal
//!
//! A terminal UI application that locates the user, fetches current conditions
//! and a multi-day forecast, and renders them as a dashboard.

use std::error::Error;
use std::fmt::Display;
use std::io;
use std::panic;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use skycast::app::App;
use skycast::cli::{Cli, PositionChoice, StartupConfig};
use skycast::config::Config;
use skycast::data::{
    DeniedPosition, FixedPosition, GeonamesClient, IpPositionSource, PositionSource,
    WeatherClient,
};
use skycast::location::LocationResolver;
use skycast::logging::{self, LogTarget};
use skycast::pipeline::{self, PipelineOutcome};
use skycast::ui::{self, Dashboard};
use skycast::worker::Worker;

type AppResult<T> = Result<T, Box<dyn Error>>;

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Prints a setup error and exits with `code`
fn exit_with(err: impl Display, code: i32) -> ! {
    eprintln!("skycast: {}", err);
    std::process::exit(code);
}

/// Picks the device position source for this session
fn position_source(choice: PositionChoice, config: &Config) -> Arc<dyn PositionSource> {
    match choice {
        PositionChoice::Fixed(coords) => Arc::new(FixedPosition(coords)),
        PositionChoice::Denied => Arc::new(DeniedPosition),
        PositionChoice::Lookup if !config.geolocation.enabled => Arc::new(DeniedPosition),
        PositionChoice::Lookup => Arc::new(IpPositionSource::new(
            config.geolocation.ip_lookup_url.clone(),
        )),
    }
}

/// Runs the pipeline once and prints the result as plain text
async fn run_once(
    startup: StartupConfig,
    fetcher: WeatherClient,
    resolver: LocationResolver,
) -> AppResult<()> {
    let query = match startup.initial_search {
        Some(query) => query,
        None => resolver.resolve_from_geolocation().await.map_err(|e| {
            format!(
                "could not determine your location ({}); use --location to pick a place",
                e
            )
        })?,
    };

    let mut dashboard = Dashboard::new();
    match pipeline::run(&fetcher, &mut dashboard, &query).await {
        PipelineOutcome::Applied => {
            println!("{}", dashboard.to_plain_text());
            Ok(())
        }
        PipelineOutcome::NoData | PipelineOutcome::Skipped => {
            Err(format!("no weather data available for {}", query).into())
        }
    }
}

/// Runs the interactive dashboard until the user quits
async fn run_tui(
    startup: StartupConfig,
    fetcher: WeatherClient,
    resolver: LocationResolver,
) -> AppResult<()> {
    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut worker = Worker::new(fetcher, resolver);
    let mut app = match startup.initial_search {
        Some(query) => App::with_initial_search(query),
        None => {
            worker.spawn_geolocation();
            App::new()
        }
    };

    let result = event_loop(&mut terminal, &mut app, &mut worker);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    worker: &mut Worker,
) -> AppResult<()> {
    loop {
        // Apply finished background work
        while let Some(message) = worker.try_recv() {
            app.handle_message(message);
        }

        // Start a queued search
        if let Some(query) = app.take_pending_search() {
            if let Some(request_id) = app.begin_search(query.clone()) {
                worker.spawn_fetch(request_id, query);
            }
        }

        terminal.draw(|f| ui::render(f, app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        // Check if we should quit
        if app.should_quit {
            return Ok(());
        }
    }
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();
    let startup = StartupConfig::from_cli(&cli).unwrap_or_else(|e| exit_with(e, 2));

    // Credentials may live in a .env file
    dotenvy::dotenv().ok();

    let log_target = if startup.once {
        LogTarget::Stderr
    } else {
        LogTarget::default_file()
    };
    if let Err(e) = logging::init(&log_target) {
        eprintln!("skycast: logging disabled: {}", e);
    }

    let config =
        Config::load(startup.config_path.as_deref()).unwrap_or_else(|e| exit_with(e, 1));

    let fetcher = WeatherClient::from_config(&config.weather);
    let resolver = LocationResolver::new(
        position_source(startup.position, &config),
        GeonamesClient::from_config(&config.geocoding),
    );

    if startup.once {
        run_once(startup, fetcher, resolver)
            .await
            .unwrap_or_else(|e| exit_with(e, 1));
        Ok(())
    } else {
        run_tui(startup, fetcher, resolver).await
    }
}
