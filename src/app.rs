//! Main application module.
//!
//! This module contains the main `App` struct that coordinates
//! the input loop, state management, and rendering.

use crate::api::ApiClient;
use crate::cache::ResponseCache;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::events::{Event, EventHandler, EventLoop};
use crate::search::{SearchOrchestrator, SearchTrigger};
use crate::state::{Action, Notification, Store};
use crate::ui::Ui;
use crate::watchlist::{FileStorage, WatchlistStore};

use std::future::Future;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::io::AsyncRead;
use tokio::sync::mpsc;

/// The main application.
pub struct App {
    /// Application store.
    store: Store,
    /// Event handler.
    event_handler: EventHandler,
    /// Action receiver.
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Debounced search triggers.
    trigger_rx: mpsc::UnboundedReceiver<SearchTrigger>,
    /// API client.
    api_client: Arc<ApiClient>,
    /// Hybrid search state.
    search: SearchOrchestrator,
    /// Persisted watchlists.
    watchlists: WatchlistStore,
    /// Where frames are printed.
    out: Box<dyn Write + Send>,
    /// Last printed frame.
    last_frame: String,
    /// Configuration.
    config: Config,
}

impl App {
    /// Create a new application.
    ///
    /// A missing API key does not fail here; the first request reports it.
    pub fn new(config: Config) -> Result<Self> {
        let api_client = ApiClient::builder()
            .config(config.api.clone())
            .cache(Arc::new(ResponseCache::from_config(&config.cache)))
            .build()?;

        let storage_path = config.storage.resolve_path();
        tracing::info!(path = %storage_path.display(), "using watchlist storage");
        let watchlists = WatchlistStore::new(Arc::new(FileStorage::new(storage_path)));

        Ok(Self::with_parts(
            config,
            Arc::new(api_client),
            watchlists,
            Box::new(io::stdout()),
        ))
    }

    /// Assemble an application from already built parts.
    pub fn with_parts(
        config: Config,
        api_client: Arc<ApiClient>,
        watchlists: WatchlistStore,
        out: Box<dyn Write + Send>,
    ) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (trigger_tx, trigger_rx) = mpsc::unbounded_channel();

        let search = SearchOrchestrator::new(
            config.search.debounce(),
            config.search.stale_results,
            trigger_tx,
        );

        Self {
            store: Store::new(action_tx),
            event_handler: EventHandler::new(),
            action_rx,
            trigger_rx,
            api_client,
            search,
            watchlists,
            out,
            last_frame: String::new(),
            config,
        }
    }

    /// Read-only access to the store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Run the application reading commands from stdin.
    pub async fn run(&mut self) -> Result<()> {
        self.run_with(tokio::io::stdin()).await
    }

    /// Run the application reading commands from `input`.
    pub async fn run_with<R>(&mut self, input: R) -> Result<()>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (mut events, _input_task) = EventLoop::new().start_with(input);

        self.store.dispatch(Action::LoadWatchlists)?;
        if self.config.ui.load_on_start {
            self.store.dispatch(Action::LoadMovers)?;
        }

        // Main event loop
        loop {
            // Update event handler with current state
            self.event_handler.update_store_snapshot(&self.store);

            self.render()?;

            tokio::select! {
                // Handle user input
                Some(event) = events.recv() => self.handle_event(event).await?,

                // Handle actions from the channel
                Some(action) = self.action_rx.recv() => self.handle_action(action).await?,

                // Handle fired debounce timers
                Some(trigger) = self.trigger_rx.recv() => self.start_search(trigger),
            }

            // Check if we should quit
            if self.store.app.should_quit {
                break;
            }
        }

        self.render()?;
        tracing::info!("shutting down");
        Ok(())
    }

    /// Print the current frame if it changed.
    fn render(&mut self) -> Result<()> {
        let frame = Ui::render(&self.store, &self.search, &self.config.ui);
        if frame != self.last_frame {
            writeln!(self.out, "{frame}")?;
            self.out.flush()?;
            self.last_frame = frame;
        }
        // Notifications are shown once.
        self.store.app.take_notification();
        Ok(())
    }

    async fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Input(line) => match self.event_handler.handle_line(&line) {
                Ok(Some(action)) => {
                    self.store.reduce(Action::ClearError);
                    self.handle_action(action).await?;
                }
                Ok(None) => {}
                Err(e) => self.store.reduce(Action::SetError(e.to_string())),
            },
            Event::Closed => self.store.reduce(Action::Quit),
        }
        Ok(())
    }

    /// Handle an action.
    async fn handle_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::LoadMovers | Action::RefreshMovers => {
                let refresh = matches!(action, Action::RefreshMovers);
                self.store.reduce(action);
                self.load_movers(refresh);
            }
            Action::SearchInput(text) => {
                self.search.on_input(&text);
                self.store.reduce(Action::SearchInput(text));
            }
            Action::RemoteSearchCompleted(ticket, result) => {
                self.search.complete(ticket, result);
            }
            Action::LoadOverview(symbol) => {
                self.store.reduce(Action::LoadOverview(symbol.clone()));
                let client = self.api_client.clone();
                self.spawn_action(async move {
                    match client.fetch_overview(&symbol).await {
                        Ok(overview) => Action::OverviewLoaded(overview),
                        Err(e) => detail_failed(&symbol, e),
                    }
                });
            }
            Action::LoadQuote(symbol) => {
                self.store.reduce(Action::LoadQuote(symbol.clone()));
                let client = self.api_client.clone();
                self.spawn_action(async move {
                    match client.fetch_quote(&symbol).await {
                        Ok(quote) => Action::QuoteLoaded(quote),
                        Err(e) => detail_failed(&symbol, e),
                    }
                });
            }
            Action::LoadChart(symbol, interval) => {
                self.store.reduce(Action::LoadChart(symbol.clone(), interval));
                let client = self.api_client.clone();
                self.spawn_action(async move {
                    match client.fetch_intraday(&symbol, interval).await {
                        Ok(series) => Action::ChartLoaded(symbol, series),
                        Err(e) => detail_failed(&symbol, e),
                    }
                });
            }
            Action::LoadWatchlists => {
                self.store.reduce(Action::LoadWatchlists);
                self.reload_watchlists().await;
            }
            Action::CreateWatchlist(name) => {
                self.store.reduce(Action::CreateWatchlist(name.clone()));
                self.create_watchlist(&name).await;
            }
            Action::ToggleWatchlist { list, symbol } => {
                self.store.reduce(Action::ToggleWatchlist {
                    list: list.clone(),
                    symbol: symbol.clone(),
                });
                self.toggle_watchlist(&list, &symbol).await;
            }
            Action::ShowMembership(symbol) => {
                self.store.reduce(Action::ShowMembership(symbol.clone()));
                self.show_membership(&symbol).await;
            }
            Action::LoadWatchlistPrices(list) => {
                self.store.reduce(Action::LoadWatchlistPrices(list.clone()));
                self.load_watchlist_prices(&list).await;
            }
            _ => {
                // Let the store handle the action
                self.store.reduce(action);
            }
        }

        Ok(())
    }

    /// Run `task` in the background and dispatch the action it yields.
    fn spawn_action<F>(&self, task: F)
    where
        F: Future<Output = Action> + Send + 'static,
    {
        let tx = self.store.sender();
        tokio::spawn(async move {
            // The receiver only goes away on shutdown.
            let _ = tx.send(task.await);
        });
    }

    fn load_movers(&self, refresh: bool) {
        let client = self.api_client.clone();
        self.spawn_action(async move {
            let result = if refresh {
                client.refresh_movers().await
            } else {
                client.fetch_movers().await
            };
            match result {
                Ok(movers) => {
                    tracing::info!(
                        gainers = movers.gainers.len(),
                        losers = movers.losers.len(),
                        "movers loaded"
                    );
                    Action::MoversLoaded(movers)
                }
                Err(e) => {
                    log_failure("movers", &e);
                    Action::MoversFailed(e.to_string())
                }
            }
        });
    }

    /// Execute a fired search: local matches now, remote in the background.
    fn start_search(&mut self, trigger: SearchTrigger) {
        let Some(ticket) = self.search.on_trigger(trigger, &self.store.movers.movers) else {
            return;
        };

        let client = self.api_client.clone();
        self.spawn_action(async move {
            let result = client.search_symbols(&ticket.query).await;
            Action::RemoteSearchCompleted(ticket, result)
        });
    }

    async fn reload_watchlists(&mut self) {
        match self.watchlists.list_all().await {
            Ok(lists) => self.store.reduce(Action::WatchlistsLoaded(lists)),
            Err(e) => self.persistence_failed(e),
        }
    }

    async fn create_watchlist(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            self.notify(Notification::warning("Watchlist name cannot be blank"));
            return;
        }
        match self.watchlists.create(name).await {
            Ok(true) => self.notify(Notification::success(format!("Created watchlist '{name}'"))),
            Ok(false) => self.notify(Notification::warning(format!(
                "Watchlist '{name}' already exists"
            ))),
            Err(e) => self.persistence_failed(e),
        }
        self.reload_watchlists().await;
    }

    async fn toggle_watchlist(&mut self, list: &str, symbol: &str) {
        match self.watchlists.toggle_membership(list, symbol).await {
            Ok(Some(true)) => self.notify(Notification::success(format!("Added {symbol} to {list}"))),
            Ok(Some(false)) => self.notify(Notification::info(format!("Removed {symbol} from {list}"))),
            Ok(None) => self.notify(Notification::warning(format!("No watchlist named '{list}'"))),
            Err(e) => self.persistence_failed(e),
        }
        self.reload_watchlists().await;

        // Keep an open selector for this symbol up to date.
        if self.store.watchlists.membership_symbol.as_deref() == Some(symbol) {
            self.show_membership(symbol).await;
        }
    }

    async fn show_membership(&mut self, symbol: &str) {
        match self.watchlists.membership_of(symbol).await {
            Ok(membership) => self.store.reduce(Action::MembershipLoaded {
                symbol: symbol.to_string(),
                membership,
            }),
            Err(e) => self.persistence_failed(e),
        }
    }

    async fn load_watchlist_prices(&mut self, list: &str) {
        let watchlist = match self.watchlists.watchlist(list).await {
            Ok(Some(watchlist)) => watchlist,
            Ok(None) => {
                self.notify(Notification::warning(format!("No watchlist named '{list}'")));
                return;
            }
            Err(e) => {
                self.persistence_failed(e);
                return;
            }
        };

        let client = self.api_client.clone();
        self.spawn_action(async move {
            let fetches = watchlist.stocks.iter().map(|symbol| {
                let client = client.clone();
                async move {
                    let quote = client
                        .fetch_quote(symbol)
                        .await
                        .inspect_err(|e| log_failure("quote", e))
                        .ok();
                    (symbol.clone(), quote)
                }
            });
            let prices = futures::future::join_all(fetches).await;
            Action::WatchlistPricesLoaded {
                list: watchlist.name.clone(),
                prices,
            }
        });
    }

    fn notify(&mut self, notification: Notification) {
        self.store.reduce(Action::ShowNotification(notification));
    }

    fn persistence_failed(&mut self, error: Error) {
        tracing::error!("watchlist storage failed: {}", error);
        self.store.reduce(Action::SetError(error.to_string()));
    }
}

fn detail_failed(symbol: &str, error: Error) -> Action {
    log_failure(symbol, &error);
    Action::DetailFailed {
        symbol: symbol.to_string(),
        message: error.to_string(),
    }
}

fn log_failure(what: &str, error: &Error) {
    if error.is_recoverable() {
        tracing::warn!(what, "request failed: {}", error);
    } else {
        tracing::error!(what, "request failed: {}", error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{HttpResponse, Transport};
    use crate::config::ApiConfig;
    use crate::state::{LoadState, View};
    use crate::watchlist::MemoryStorage;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    /// Answers each provider function with a canned body.
    struct CannedTransport;

    #[async_trait]
    impl Transport for CannedTransport {
        async fn get(&self, _url: &str, query: &[(String, String)]) -> Result<HttpResponse> {
            let param = |key: &str| {
                query
                    .iter()
                    .find(|(k, _)| k == key)
                    .map(|(_, v)| v.as_str())
                    .unwrap_or_default()
            };
            let body = match param("function") {
                "TOP_GAINERS_LOSERS" => {
                    r#"{"top_gainers":[{"ticker":"AAPL","price":"190.00","change_amount":"4.00","change_percentage":"2.15%","volume":"1000"}],"top_losers":[],"most_actively_traded":[]}"#.to_string()
                }
                "GLOBAL_QUOTE" if param("symbol") == "MSFT" => {
                    r#"{"Global Quote":{"01. symbol":"MSFT","05. price":"410.10","09. change":"1.10","10. change percent":"0.27%","06. volume":"500"}}"#.to_string()
                }
                "GLOBAL_QUOTE" => r#"{"Note":"Thank you for using Alpha Vantage!"}"#.to_string(),
                "SYMBOL_SEARCH" => r#"{"bestMatches":[]}"#.to_string(),
                other => return Err(Error::network(format!("unexpected function {other}"))),
            };
            Ok(HttpResponse::ok(body))
        }
    }

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn app(api_key: Option<&str>) -> (App, SharedBuf) {
        let mut config = Config::default();
        config.api = ApiConfig {
            api_key: api_key.map(str::to_string),
            ..ApiConfig::default()
        };
        config.ui.load_on_start = false;

        let client = ApiClient::builder()
            .config(config.api.clone())
            .transport(Arc::new(CannedTransport))
            .build()
            .unwrap();
        let watchlists = WatchlistStore::new(Arc::new(MemoryStorage::new()));
        let out = SharedBuf::default();
        let app = App::with_parts(config, Arc::new(client), watchlists, Box::new(out.clone()));
        (app, out)
    }

    /// Drain background actions until none arrive for a while.
    async fn settle(app: &mut App) {
        while let Ok(Some(action)) =
            tokio::time::timeout(std::time::Duration::from_millis(200), app.action_rx.recv()).await
        {
            app.handle_action(action).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_load_movers() {
        let (mut app, _) = app(Some("TESTKEY"));
        app.handle_action(Action::LoadMovers).await.unwrap();
        assert!(app.store.movers.status.is_loading());

        settle(&mut app).await;
        assert_eq!(app.store.movers.status, LoadState::Loaded);
        assert_eq!(app.store.movers.movers.gainers[0].price, dec!(190.00));
    }

    #[tokio::test]
    async fn test_missing_key_is_configuration_error() {
        let (mut app, _) = app(None);
        app.handle_action(Action::LoadMovers).await.unwrap();
        settle(&mut app).await;

        let message = app.store.movers.status.error().unwrap();
        assert!(message.starts_with("Configuration error"));
    }

    #[tokio::test]
    async fn test_blank_and_duplicate_watchlist_names_get_distinct_messages() {
        let (mut app, _) = app(Some("TESTKEY"));
        app.handle_action(Action::CreateWatchlist("   ".to_string()))
            .await
            .unwrap();
        let blank = app.store.app.take_notification().unwrap();
        assert_eq!(blank.message, "Watchlist name cannot be blank");

        for _ in 0..2 {
            app.handle_action(Action::CreateWatchlist("Tech".to_string()))
                .await
                .unwrap();
        }
        let duplicate = app.store.app.take_notification().unwrap();
        assert_eq!(duplicate.message, "Watchlist 'Tech' already exists");
        assert_eq!(app.store.watchlists.lists.len(), 1);
    }

    #[tokio::test]
    async fn test_toggle_updates_open_selector() {
        let (mut app, _) = app(Some("TESTKEY"));
        app.handle_action(Action::CreateWatchlist("Tech".to_string()))
            .await
            .unwrap();
        app.handle_action(Action::ShowMembership("MSFT".to_string()))
            .await
            .unwrap();
        assert_eq!(app.store.watchlists.membership.get("Tech"), Some(&false));

        app.handle_action(Action::ToggleWatchlist {
            list: "Tech".to_string(),
            symbol: "MSFT".to_string(),
        })
        .await
        .unwrap();

        assert_eq!(app.store.watchlists.membership.get("Tech"), Some(&true));
        assert_eq!(app.store.app.current_view, View::Membership);
        assert_eq!(app.store.watchlists.symbols("Tech"), vec!["MSFT".to_string()]);
    }

    #[tokio::test]
    async fn test_watchlist_prices_degrade_per_symbol() {
        let (mut app, _) = app(Some("TESTKEY"));
        app.handle_action(Action::CreateWatchlist("Tech".to_string()))
            .await
            .unwrap();
        for symbol in ["MSFT", "AAPL"] {
            app.handle_action(Action::ToggleWatchlist {
                list: "Tech".to_string(),
                symbol: symbol.to_string(),
            })
            .await
            .unwrap();
        }

        app.handle_action(Action::LoadWatchlistPrices("Tech".to_string()))
            .await
            .unwrap();
        settle(&mut app).await;

        let prices = &app.store.watchlists.prices;
        assert_eq!(prices.len(), 2);
        assert_eq!(prices[0].1.as_ref().map(|q| q.price), Some(dec!(410.10)));
        assert_eq!(prices[1], ("AAPL".to_string(), None));
    }

    #[tokio::test]
    async fn test_run_until_quit() {
        let (mut app, out) = app(Some("TESTKEY"));
        let input: &'static [u8] = b"new Tech\nlists\nbogus\nquit\n";
        app.run_with(input).await.unwrap();

        let printed = out.contents();
        assert!(printed.contains("Created watchlist 'Tech'"));
        assert!(printed.contains("unknown command 'bogus'"));
        assert!(app.store().app.should_quit);
    }
}
