#![forbid(unsafe_code)]

//! Wallet overlay demo binary entry point.

use std::fs::File;
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crossterm::{cursor, event, execute, terminal};
use tracing_subscriber::EnvFilter;
use wui::{Event, OverlayConfig};
use wui_demo::app::{DemoApp, Flow, WalletOverlay};
use wui_demo::cli;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Restores the terminal when dropped.
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn init_logging(path: &str) -> wui::Result<()> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_env("WUI_LOG").unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(filter)
        .init();
    Ok(())
}

fn config(opts: &cli::Opts) -> wui::Result<OverlayConfig<WalletOverlay>> {
    let mut config = OverlayConfig::new().apply_env_with(|key| std::env::var(key).ok())?;
    if let Some(base) = opts.z_base {
        config = config.with_z_base(base);
    }
    if let Some(step) = opts.z_step {
        config = config.with_z_step(step);
    }
    Ok(config)
}

fn draw(out: &mut impl Write, app: &DemoApp) -> io::Result<()> {
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(terminal::ClearType::CurrentLine)
    )?;
    write!(out, "{}", app.status())?;
    out.flush()
}

fn run(opts: &cli::Opts) -> wui::Result<()> {
    if let Some(path) = &opts.log {
        init_logging(path)?;
    }
    let mut app = DemoApp::new(config(opts)?, &opts.route);
    tracing::info!(route = %opts.route, exit_after_ms = opts.exit_after_ms, "demo started");
    let deadline =
        (opts.exit_after_ms > 0).then(|| Instant::now() + Duration::from_millis(opts.exit_after_ms));

    let mut stdout = io::stdout();
    println!("wui-demo: 1-5 open, x exclusive, c close all, n navigate, Esc cancel, q quit");
    let _raw = RawMode::enable()?;
    draw(&mut stdout, &app)?;

    loop {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            break;
        }
        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Some(ev) = Event::from_crossterm(event::read()?) else {
            continue;
        };
        if app.handle(&ev) == Flow::Quit {
            break;
        }
        draw(&mut stdout, &app)?;
    }

    tracing::info!(open_count = app.session().overlays().open_count(), "demo finished");
    write!(stdout, "\r\n")?;
    stdout.flush()?;
    Ok(())
}

fn main() {
    let opts = cli::Opts::parse();
    if let Err(e) = run(&opts) {
        eprintln!("wui-demo: {e}");
        std::process::exit(1);
    }
}
