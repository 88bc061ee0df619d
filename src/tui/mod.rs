pub mod app;
pub mod input;
pub mod result_list;

pub use app::App;
pub use input::InputWidget;
pub use result_list::ResultList;

use crate::api::{Backend, HttpBackend};
use crate::autocomplete::Autocomplete;
use crate::config::Config;
use crate::controller::{ControllerOptions, SearchController};
use crate::event::{Event, WidgetEvent};
use crate::tracker::{HttpActivitySink, Tracker};
use anyhow::{Context, Result};
use crossterm::event::{Event as TerminalEvent, EventStream, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::Stdout;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Build the widget from `config` and run it in the terminal until the user quits
pub async fn run(config: Config) -> Result<()> {
    let backend: Arc<dyn Backend> =
        Arc::new(HttpBackend::from_config(&config).context("Failed to create backend client")?);
    let sink =
        HttpActivitySink::from_config(&config).context("Failed to create tracking client")?;
    let tracker = Tracker::new(Arc::new(sink));

    let (controller, mut widget_events) = SearchController::new(
        backend.clone(),
        tracker,
        ControllerOptions::from_config(&config),
    );
    let autocomplete = Autocomplete::new(
        backend,
        controller.sender(),
        config.autocomplete_min_chars,
    );
    let mut app = App::new(controller, autocomplete);

    let mut terminal = enter_terminal()?;
    let outcome = event_loop(&mut terminal, &mut app, &mut widget_events).await;
    leave_terminal(&mut terminal)?;

    tracing::info!("widget closed");
    outcome
}

fn enter_terminal() -> Result<Tui> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    Terminal::new(CrosstermBackend::new(stdout)).context("Failed to create terminal")
}

fn leave_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

async fn event_loop(
    terminal: &mut Tui,
    app: &mut App,
    widget_events: &mut mpsc::UnboundedReceiver<WidgetEvent>,
) -> Result<()> {
    let mut terminal_events = EventStream::new();
    let mut tick = tokio::time::interval(Duration::from_millis(250));

    app.mount();

    loop {
        terminal.draw(|frame| app.render(frame))?;

        let event = tokio::select! {
            maybe = terminal_events.next() => match maybe {
                Some(Ok(TerminalEvent::Key(key))) if key.kind == KeyEventKind::Press => Event::Key(key),
                Some(Ok(TerminalEvent::Resize(width, height))) => Event::Resize(width, height),
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                None => break,
            },
            Some(widget) = widget_events.recv() => Event::Widget(widget),
            _ = tick.tick() => Event::Tick,
        };

        app.handle_event(event)?;
        if app.should_quit() {
            break;
        }
    }

    Ok(())
}
