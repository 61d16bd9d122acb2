//! pie-tui - APIpie Global AI Health terminal dashboard
//!
//! Read-only view of model availability across AI providers.

use std::io;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use pie_health::{ApiConfig, DashboardContext, config::BASE_URL_ENV};
use ratatui::prelude::*;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use pie_tui::app::App;
use pie_tui::data::{self, DataClient};
use pie_tui::events::{AppEvent, EventHandler, handle_key};
use pie_tui::ui;

#[derive(Parser)]
#[command(name = "pie-tui")]
#[command(about = "APIpie Global AI Health - terminal dashboard")]
#[command(version)]
struct Cli {
    /// Health API base URL
    #[arg(long, env = BASE_URL_ENV)]
    base_url: Option<String>,

    /// Path of the availability listing, relative to the base URL
    #[arg(long)]
    availability_path: Option<String>,

    /// Data poll interval in seconds
    #[arg(long, default_value = "30")]
    poll_interval: u64,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Enable demo mode with fake data
    #[arg(long)]
    demo: bool,

    /// Pixels per terminal column when matching breakpoints
    #[arg(long, default_value = "8")]
    cell_width: u32,
}

impl Cli {
    fn api_config(&self) -> ApiConfig {
        let mut config = match &self.base_url {
            Some(url) => ApiConfig::new(url.clone()),
            None => ApiConfig::default(),
        };
        if let Some(path) = &self.availability_path {
            config = config.with_availability_path(path.clone());
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they stay out of the alternate screen
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("pie_tui=info".parse()?))
        .init();

    let ctx = DashboardContext::init(cli.api_config())?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &ctx, &cli).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ctx: &DashboardContext,
    cli: &Cli,
) -> anyhow::Result<()> {
    let mut app = App::new();
    let tick_rate = Duration::from_millis(250);
    let poll_interval = Duration::from_secs(cli.poll_interval.max(1));
    let cell_width = cli.cell_width.max(1);

    let (columns, _) = terminal::size()?;
    let listener = ctx.viewport().mount(ui::viewport_width(columns, cell_width));

    let mut event_handler = EventHandler::new(tick_rate);

    let tx = event_handler.sender();
    if cli.demo {
        info!("demo mode");
        tokio::spawn(data::run_demo_mode(tx, poll_interval));
    } else {
        let client = DataClient::new(ctx.api().clone(), tx);
        tokio::spawn(async move {
            client.run(poll_interval).await;
        });
    }

    while app.running {
        terminal.draw(|frame| ui::draw(frame, &app, ctx))?;

        let Some(event) = event_handler.next().await else {
            break;
        };
        match event {
            AppEvent::Key(key) => handle_key(&mut app, key),
            AppEvent::Resize(columns, _) => {
                debug!(columns, "terminal resized");
                listener.on_resize(ui::viewport_width(columns, cell_width));
            }
            AppEvent::Tick => {}
            AppEvent::DataUpdate(data_event) => data::apply_data_event(&mut app, data_event),
        }
    }

    drop(listener);
    Ok(())
}
