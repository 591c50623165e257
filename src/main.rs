mod app;
mod ui;

use anyhow::{Context, Result};
use app::App;
use choropleth_tui::config::{FileConfig, Overrides, Settings};
use choropleth_tui::data::{self, DataPoint, FeatureCollection, Metric};
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// GeoJSON FeatureCollection of countries
    #[arg(short, long, value_name = "FILE")]
    geojson: Option<PathBuf>,

    /// JSON array of {country, population, density, temperature}
    #[arg(short, long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Metric to colour by: temperature, density or population
    #[arg(short, long)]
    metric: Option<Metric>,

    /// Quantile of the metric mapped to the top colour (0..=1)
    #[arg(short, long)]
    percentile: Option<f64>,

    /// Write logs here (filtered by RUST_LOG); the terminal belongs to the map
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file: {:?}", path))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Load features and dataset, falling back to the built-in world when files are not given
fn load_inputs(settings: &Settings) -> Result<(FeatureCollection, Vec<DataPoint>)> {
    match (&settings.geojson, &settings.dataset) {
        (Some(geojson), Some(dataset)) => {
            let features = data::load_features(geojson, &settings.name_property)
                .with_context(|| format!("Failed to load features from {:?}", geojson))?;
            let rows = data::load_dataset(dataset)
                .with_context(|| format!("Failed to load dataset from {:?}", dataset))?;
            Ok((features, rows))
        }
        (None, None) => {
            info!("no input files given, using the built-in sample world");
            Ok(data::sample_world())
        }
        (Some(_), None) | (None, Some(_)) => {
            anyhow::bail!("--geojson and --data must be given together")
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let file = match &cli.config {
        Some(path) => FileConfig::load_from_file(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(
        file,
        Overrides {
            geojson: cli.geojson,
            dataset: cli.data,
            metric: cli.metric,
            percentile: cli.percentile,
        },
    )?;
    let (features, rows) = load_inputs(&settings)?;
    if features.is_empty() {
        warn!("feature collection is empty; the map will be blank");
    }

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture
    execute!(std::io::stdout(), EnableMouseCapture)?;

    // Run the app
    let result = run(&mut terminal, features, rows, settings);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Handle mouse events for panning and zooming
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    // Always track mouse position for the hover readout
    app.set_mouse_pos(mouse.column, mouse.row);

    match mouse.kind {
        // Scroll wheel for zooming towards mouse position
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        // Horizontal scroll for panning (trackpad two-finger swipe)
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        // Click and drag to pan
        MouseEventKind::Down(MouseButton::Left) => app.begin_drag(mouse.column, mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => app.handle_drag(mouse.column, mouse.row),
        MouseEventKind::Up(MouseButton::Left) => app.end_drag(),
        _ => {}
    }
}

fn run(
    terminal: &mut DefaultTerminal,
    features: FeatureCollection,
    rows: Vec<DataPoint>,
    settings: Settings,
) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(
        size.width as usize,
        size.height as usize,
        features,
        rows,
        settings,
    );

    // Main loop
    loop {
        terminal.draw(|frame| ui::render(frame, &app))?;

        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind == KeyEventKind::Press {
                        match key.code {
                            KeyCode::Char('q') | KeyCode::Esc => app.quit(),

                            // Pan with hjkl or arrow keys
                            KeyCode::Left | KeyCode::Char('h') => app.pan(-10, 0),
                            KeyCode::Right | KeyCode::Char('l') => app.pan(10, 0),
                            KeyCode::Up | KeyCode::Char('k') => app.pan(0, -6),
                            KeyCode::Down | KeyCode::Char('j') => app.pan(0, 6),

                            // Zoom
                            KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
                            KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

                            KeyCode::Char('m') | KeyCode::Char('M') => app.cycle_metric(),
                            KeyCode::Char('o') | KeyCode::Char('O') => app.toggle_outlines(),

                            // Reset view
                            KeyCode::Char('r') | KeyCode::Char('0') => app.reset_view(),

                            _ => {}
                        }
                    }
                }
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                Event::Resize(width, height) => app.resize(width as usize, height as usize),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    info!("quit");
    Ok(())
}
