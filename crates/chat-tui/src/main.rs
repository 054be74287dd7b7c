use anyhow::{Context, Result};
use chat_core::{ClientConfig, ControllerOptions, HttpTransport};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::{io, time::Duration};
use tokio::sync::mpsc;
use tracing::{info, Level};

mod app;
mod theme;
mod ui;

use app::{Action, App};
use theme::Theme;

#[derive(Parser)]
#[command(author, version, about = "Terminal client for the AmazeBot chat service", long_about = None)]
struct Cli {
    /// JSON config file with endpoint, timeout_secs and clear_draft_on_submit
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Chat endpoint URL (overrides config file and CHAT_ENDPOINT)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Give up on a request after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Clear the message box after sending
    #[arg(long)]
    clear_draft: bool,

    #[arg(long, value_enum, default_value_t = Theme::Ocean)]
    theme: Theme,

    /// Where to write logs; the terminal itself is taken by the UI
    #[arg(long, default_value = "chat-tui.log")]
    log_file: PathBuf,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::from_file(path)
                .with_context(|| format!("Failed to load config at {:?}", path))?,
            None => ClientConfig::default(),
        };
        config.apply_env().context("Invalid chat environment")?;

        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = Some(secs);
        }
        if self.clear_draft {
            config.clear_draft_on_submit = true;
        }
        Ok(config)
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    let file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {:?}", cli.log_file))?;
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .init();
    Ok(())
}

/// Send panic reports to the log file. The default hook writes to stderr,
/// which is the screen the UI is drawing on.
fn route_panics_to_log() {
    std::panic::set_hook(Box::new(|info| {
        tracing::error!(panic = %info, "panic");
    }));
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    // 0. Resolve config and build the transport before touching the terminal
    let config = cli.client_config()?;
    let transport = HttpTransport::new(&config).context("Failed to set up chat transport")?;
    info!(endpoint = transport.endpoint(), theme = ?cli.theme, "starting chat client");

    let mut app = App::new(Arc::new(transport), ControllerOptions::from(&config), cli.theme);

    // 1. Setup terminal (raw mode, alternate screen)
    route_panics_to_log();
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 2. Channel for ticks and finished requests
    let (tx, mut rx) = mpsc::channel(32);
    let mut reader = EventStream::new();
    let tick_rate = Duration::from_millis(100);
    let tx_tick = tx.clone();

    tokio::spawn(async move {
        loop {
            if tx_tick.send(Action::Tick).await.is_err() {
                break;
            }
            tokio::time::sleep(tick_rate).await;
        }
    });

    let res = run_app(&mut terminal, &mut app, &mut reader, tx, &mut rx).await;

    // 3. Cleanup
    let _ = std::panic::take_hook();
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "terminal loop failed");
        eprintln!("{:?}", err);
    }

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    reader: &mut EventStream,
    tx: mpsc::Sender<Action>,
    rx: &mut mpsc::Receiver<Action>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if app.should_quit {
            return Ok(());
        }

        tokio::select! {
            Some(action) = rx.recv() => app.apply(action),
            Some(event) = reader.next() => {
                if let Event::Key(key) = event? {
                    if let Some(dispatch) = app.handle_key(key) {
                        let tx = tx.clone();
                        tokio::spawn(async move {
                            let resolution = dispatch.run().await;
                            let _ = tx.send(Action::Resolved(resolution)).await;
                        });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn panics_are_logged_instead_of_printed() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            route_panics_to_log();
            let result = std::panic::catch_unwind(|| panic!("transport exploded"));
            let _ = std::panic::take_hook();
            assert!(result.is_err());
        });

        let logged = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("transport exploded"), "log was: {logged}");
    }
}
