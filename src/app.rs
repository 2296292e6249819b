//! The interactive front-end.
//!
//! `App` owns the tab manager (drawing into a [`PanelView`]), the chat
//! session and the backend client. Searches run on the tokio blocking pool;
//! their hook forwards [`SearchEvent`]s over a channel that the shell drains
//! between commands, so the tab manager itself is only touched from the
//! main thread.

use crate::chat::ChatSession;
use crate::cli::RuntimeOptions;
use crate::command::{Command, HELP};
use crate::search::{self, SearchCompletion, SearchError, SearchEvent, SearchFlow, SearchHook};
use crate::tab::{DeleteOutcome, SearchTab, SearchTabManager, TabMode};
use crate::view::{PanelView, ViewRenderer};
use anyhow::{Context, Result};
use protein_explorer_api::{HttpApiClient, ProteinApi};
use protein_explorer_config::Config;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tokio::task::JoinHandle;

/// Whether the shell keeps reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Main application state
pub struct App {
    config: Config,
    runtime: Arc<Runtime>,
    api: Arc<dyn ProteinApi>,
    tabs: SearchTabManager<PanelView>,
    chat: ChatSession,
    hook: Arc<SearchHook>,
    events: UnboundedReceiver<SearchEvent>,
    searches: Vec<JoinHandle<SearchCompletion>>,
    /// One-shot search requested on the command line
    initial_search: Option<String>,
}

impl App {
    /// Create the application from CLI options, loading config and building
    /// the HTTP client.
    pub fn new(runtime: Arc<Runtime>, options: RuntimeOptions) -> Result<Self> {
        let mut config = match &options.config_path {
            Some(path) => Config::load_from(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => Config::load().context("Failed to load config")?,
        };
        crate::debug::apply_config_level(config.log_level);

        if let Some(url) = options.api_url {
            log::info!("API base URL overridden from command line: {}", url);
            config.api_base_url = url;
            config.validate()?;
        }

        let api = HttpApiClient::new(
            config.api_base(),
            Duration::from_secs(config.request_timeout_secs),
            config.max_response_bytes,
        )
        .context("Failed to create API client")?;

        let mut app = Self::with_api(config, runtime, Arc::new(api));
        app.initial_search = options.search;
        Ok(app)
    }

    /// Create the application around an existing backend client.
    pub fn with_api(config: Config, runtime: Arc<Runtime>, api: Arc<dyn ProteinApi>) -> Self {
        let (tx, events) = unbounded_channel();
        let hook: SearchHook = Box::new(move |event| {
            // The receiver only goes away when the app shuts down
            let _ = tx.send(event);
        });

        Self {
            tabs: SearchTabManager::new(PanelView::new(), config.tab_name_prefix.clone()),
            chat: ChatSession::new(&config.identity_questions, config.identity_response.clone()),
            config,
            runtime,
            api,
            hook: Arc::new(hook),
            events,
            searches: Vec::new(),
            initial_search: None,
        }
    }

    pub fn tabs(&self) -> &SearchTabManager<PanelView> {
        &self.tabs
    }

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    /// Start a search in the active tab. It runs in the background.
    pub fn start_search(&mut self, input: &str) -> Result<(), SearchError> {
        let query = match search::normalize_query(input) {
            Ok(query) => query,
            Err(e) => {
                self.tabs.view_mut().set_status(e.to_string());
                return Err(e);
            }
        };

        let Some(tab_id) = self.tabs.active_tab_id() else {
            return Ok(());
        };
        let Some(ticket) = self.tabs.begin_search(tab_id, &query) else {
            return Ok(());
        };

        let api = Arc::clone(&self.api);
        let hook = Arc::clone(&self.hook);
        self.searches
            .push(self.runtime.spawn_blocking(move || {
                SearchFlow::run(ticket, api.as_ref(), &**hook)
            }));
        Ok(())
    }

    /// Apply queued search events to the tab manager.
    ///
    /// Returns the completions applied, in arrival order. Completions the
    /// manager dropped (superseded, or their tab was deleted) are left out.
    pub fn drain_events(&mut self) -> Vec<SearchCompletion> {
        let mut completed = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            match event {
                SearchEvent::Progress {
                    tab_id,
                    search_id,
                    panel,
                    state,
                } => self.tabs.apply_progress(tab_id, search_id, panel, state),
                SearchEvent::Completed(completion) => {
                    if self.tabs.on_search_completed(completion.clone()) {
                        completed.push(completion);
                    }
                }
            }
        }
        self.searches.retain(|handle| !handle.is_finished());
        completed
    }

    /// Whether any background search is still running.
    pub fn has_running_searches(&self) -> bool {
        self.searches.iter().any(|handle| !handle.is_finished())
    }

    /// Apply finished searches and note the ones that landed off screen.
    fn report_finished_searches(&mut self, out: &mut dyn Write) -> io::Result<()> {
        for completion in self.drain_events() {
            if self.tabs.active_tab_id() != Some(completion.tab_id) {
                writeln!(
                    out,
                    "Search for '{}' finished in tab {}",
                    completion.query, completion.tab_id
                )?;
            }
        }
        Ok(())
    }

    /// Block until every running search has finished, then apply its events.
    pub fn wait_for_searches(&mut self) -> Vec<SearchCompletion> {
        for handle in std::mem::take(&mut self.searches) {
            if let Err(e) = self.runtime.block_on(handle) {
                log::error!("Search task failed: {}", e);
            }
        }
        self.drain_events()
    }

    /// Execute one shell command, writing its output to `out`.
    ///
    /// `confirm` is asked before a tab is deleted when the config requires it.
    pub fn handle_command(
        &mut self,
        command: Command,
        out: &mut dyn Write,
        confirm: &mut dyn FnMut(&SearchTab) -> bool,
    ) -> Result<Flow> {
        // Searches that finished while the command was being typed
        self.report_finished_searches(out)?;

        match command {
            Command::Search(query) => match self.start_search(&query) {
                Ok(()) => writeln!(out, "Searching for '{}'...", query.trim())?,
                Err(e) => writeln!(out, "{}", e)?,
            },
            Command::NewTab => {
                let id = self.tabs.create_tab();
                writeln!(out, "Opened tab {}", id)?;
            }
            Command::ListTabs => self.write_tabs(out)?,
            Command::Switch(id) => {
                if self.tabs.get_tab(id).is_none() {
                    writeln!(out, "No tab with id {}", id)?;
                } else {
                    self.tabs.switch_to(id);
                    self.write_results(out)?;
                }
            }
            Command::NextTab => {
                self.tabs.next_tab();
                self.write_results(out)?;
            }
            Command::PrevTab => {
                self.tabs.prev_tab();
                self.write_results(out)?;
            }
            Command::Rename(id, name) => {
                if self.tabs.rename_tab(id, &name) {
                    writeln!(out, "Renamed tab {} to '{}'", id, name.trim())?;
                }
            }
            Command::Delete(id) => {
                let needs_confirmation = self.config.confirm_tab_delete;
                let result = self
                    .tabs
                    .delete_tab(id, |tab| !needs_confirmation || confirm(tab));
                match result {
                    Ok(DeleteOutcome::Deleted) => {
                        writeln!(out, "Deleted tab {}", id)?;
                        self.write_results(out)?;
                    }
                    Ok(DeleteOutcome::Cancelled) => writeln!(out, "Kept tab {}", id)?,
                    Ok(DeleteOutcome::NotFound) => writeln!(out, "No tab with id {}", id)?,
                    Err(e) => writeln!(out, "{}", e)?,
                }
            }
            Command::Chat(message) => {
                let focus = self.tabs.focus_subject();
                if let Some(reply) = self.chat.send(self.api.as_ref(), &message, focus) {
                    writeln!(out, "{}", reply)?;
                }
            }
            Command::Show => self.write_results(out)?,
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn write_tabs(&self, out: &mut dyn Write) -> io::Result<()> {
        let active = self.tabs.active_tab_id();
        for tab in self.tabs.tabs() {
            let marker = if Some(tab.id) == active { '*' } else { ' ' };
            let mode = if tab.is_searching() {
                "searching"
            } else {
                match tab.mode() {
                    TabMode::Empty => "empty",
                    TabMode::Populated => "populated",
                }
            };
            write!(out, "{} {:>3}  {}  [{}]", marker, tab.id, tab.display_name, mode)?;
            if let Some(subject) = &tab.focus_subject {
                write!(out, "  {}", subject)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    fn write_results(&mut self, out: &mut dyn Write) -> io::Result<()> {
        if let Some(tab) = self.tabs.active_tab() {
            writeln!(out, "-- {} --", tab.display_name)?;
        }
        let view = self.tabs.view();
        if let Some(status) = view.status() {
            writeln!(out, "{}", status)?;
        }
        writeln!(out, "{}", view.render_text())?;
        self.tabs.view_mut().clear_transient();
        Ok(())
    }

    /// Run the one-shot search or the interactive shell.
    pub fn run(mut self) -> Result<()> {
        let stdout = io::stdout();

        if let Some(query) = self.initial_search.take() {
            let mut out = stdout.lock();
            if let Err(e) = self.start_search(&query) {
                anyhow::bail!(e);
            }
            self.wait_for_searches();
            self.write_results(&mut out)?;
            return Ok(());
        }

        let stdin = io::stdin();
        println!("protein-explorer {} - type 'help' for commands", crate::VERSION);
        loop {
            self.report_finished_searches(&mut stdout.lock())?;

            print!("> ");
            io::stdout().flush()?;

            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }

            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    println!("{}", e);
                    continue;
                }
            };

            let mut out = stdout.lock();
            let flow = self.handle_command(command, &mut out, &mut |tab| {
                prompt_yes_no(&format!("Delete tab '{}'?", tab.display_name))
            })?;
            if flow == Flow::Quit {
                break;
            }
        }

        log::info!("Shell exited");
        Ok(())
    }
}

/// Ask a y/N question on the terminal; anything but "y"/"yes" is a no.
fn prompt_yes_no(question: &str) -> bool {
    print!("{} [y/N] ", question);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}
