use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::prelude::*;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::{Settings, save_theme};
use crate::fetch::{FetchEvent, Fetcher};
use crate::input::{Command, handle_key};
use crate::models::{Category, QueryDescriptor};
use crate::state::ViewState;
use crate::theme::Theme;
use crate::ui::{render, render_notice};
use crate::utils::{copy_to_clipboard, open_link};

const TICK: Duration = Duration::from_millis(100);
const NOTICE_FOR: Duration = Duration::from_secs(2);

/// Owns the view state, the runtime the fetches run on, and the channel
/// their events come back through.
pub struct App {
    state: ViewState,
    categories: Vec<Category>,
    config_path: PathBuf,
    fetcher: Arc<Fetcher>,
    rt: Runtime,
    tx: UnboundedSender<FetchEvent>,
    rx: UnboundedReceiver<FetchEvent>,
    in_flight: Option<CancellationToken>,
    notice: Option<(String, Instant)>,
}

impl App {
    pub fn new(settings: &Settings, config_path: PathBuf, fetcher: Fetcher, state: ViewState, rt: Runtime) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            state,
            categories: settings.categories.clone(),
            config_path,
            fetcher: Arc::new(fetcher),
            rt,
            tx,
            rx,
            in_flight: None,
            notice: None,
        }
    }

    /// Starts a fetch, superseding whatever was still running.
    pub fn start_fetch(&mut self, descriptor: QueryDescriptor) {
        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }
        let generation = self.state.begin_fetch(descriptor.clone());
        info!(generation, ?descriptor, "starting fetch");

        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());
        let fetcher = self.fetcher.clone();
        let tx = self.tx.clone();
        self.rt.spawn(async move {
            fetcher.run(generation, descriptor, tx, token).await;
        });
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            self.state.apply(event);
        }
    }

    fn notify(&mut self, text: impl Into<String>) {
        self.notice = Some((text.into(), Instant::now()));
    }

    /// Returns false when the app should exit.
    fn execute(&mut self, command: Command) -> bool {
        match command {
            Command::None => {}
            Command::Quit => return false,
            Command::Fetch(descriptor) => self.start_fetch(descriptor),
            Command::OpenLink(url) => {
                if let Err(e) = open_link(&url) {
                    warn!(error = %e, "open link failed");
                    self.state.error = Some(e.to_string());
                }
            }
            Command::SaveTheme(dark) => {
                if let Err(e) = save_theme(&self.config_path, dark) {
                    warn!(error = %e, "saving theme failed");
                    self.state.error = Some(format!("Could not save theme: {e}"));
                }
            }
            Command::CopySummary => {
                if let Some(summary) = &self.state.summary {
                    match copy_to_clipboard(summary.to_plain_text()) {
                        Ok(()) => self.notify("Summary copied to clipboard"),
                        Err(e) => self.state.error = Some(e.to_string()),
                    }
                }
            }
        }
        true
    }

    pub fn run(mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        terminal::disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        self.shutdown();
        result
    }

    fn event_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            self.drain_events();
            if self.notice.as_ref().is_some_and(|(_, at)| at.elapsed() > NOTICE_FOR) {
                self.notice = None;
            }

            let theme = Theme::for_mode(self.state.dark_mode);
            terminal.draw(|f| {
                render(f, &self.state, &self.categories, &theme);
                if let Some((text, _)) = &self.notice {
                    render_notice(f, text, &theme);
                }
            })?;

            if event::poll(TICK)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    let command = handle_key(key, &mut self.state, &self.categories);
                    if !self.execute(command) {
                        return Ok(());
                    }
                }
            }
        }
    }

    fn shutdown(self) {
        if let Some(token) = self.in_flight {
            token.cancel();
        }
        self.rt.shutdown_timeout(Duration::from_millis(500));
    }
}
