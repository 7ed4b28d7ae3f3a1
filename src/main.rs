use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use crossterm::event::KeyEventKind;
use proctop::app::App;
use proctop::config::{self, load_config, load_config_from_path};
use proctop::event::{Event, EventHandler};
use proctop::system::collector::Collector;
use proctop::ui;

#[derive(Parser)]
#[command(
    name = "proctop",
    about = "Console system monitor reading Linux /proc telemetry"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Refresh rate in milliseconds
    #[arg(long)]
    refresh_rate: Option<u64>,

    /// Read kernel sources from this directory instead of /proc
    #[arg(long)]
    proc_root: Option<PathBuf>,

    /// Take one snapshot, print it as JSON and exit.
    #[arg(long, default_value_t = false)]
    once: bool,

    /// Trace output file (JSON lines), requires the `perf-tracing` feature.
    #[arg(long)]
    trace_output: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(&cli)?;
    let config = load_config_for_cli(&cli);

    if cli.once {
        let mut collector = Collector::new(config.paths.reader());
        let snapshot = collector.refresh();
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let result = run(&mut terminal, config).await;

    ratatui::restore();

    result
}

async fn run(terminal: &mut ratatui::DefaultTerminal, config: config::Config) -> Result<()> {
    let tick_rate = Duration::from_millis(config.general.refresh_rate_ms.max(100));
    let mut app = App::new(config);
    let mut events = EventHandler::new(tick_rate);

    terminal.draw(|frame| ui::draw(frame, &app))?;

    while app.running {
        let Some(event) = events.next().await else {
            break;
        };
        match event {
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let action = app.map_key(key);
                app.dispatch(action);
            }
            Event::Tick => app.refresh_data(),
            Event::Resize => {}
        }
        terminal.draw(|frame| ui::draw(frame, &app))?;
    }

    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> config::Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_rate_ms = rate;
    }
    if let Some(ref root) = cli.proc_root {
        config.paths.proc_root = root.clone();
    }

    config
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let Some(path) = &cli.trace_output else {
        return Ok(());
    };

    #[cfg(not(feature = "perf-tracing"))]
    {
        let _ = path;
        Err(color_eyre::eyre::eyre!(
            "--trace-output requires the `perf-tracing` feature; run with `cargo run --features perf-tracing -- --trace-output <file>`"
        ))
    }

    #[cfg(feature = "perf-tracing")]
    {
        proctop::trace::init_tracing_json(path)
    }
}
