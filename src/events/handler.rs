//! Event handler for turning user input into actions.

use super::input::Command;
use crate::error::{Error, Result};
use crate::state::{Action, Store};

/// Handles input events and produces actions.
#[derive(Debug, Default)]
pub struct EventHandler {
    /// Store reference for state-aware handling.
    store_snapshot: Option<StoreSnapshot>,
}

/// Snapshot of relevant store state for event handling.
#[derive(Debug, Clone, Default)]
struct StoreSnapshot {
    membership_symbol: Option<String>,
    list_names: Vec<String>,
}

impl EventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the store snapshot for state-aware event handling.
    pub fn update_store_snapshot(&mut self, store: &Store) {
        self.store_snapshot = Some(StoreSnapshot {
            membership_symbol: store.watchlists.membership_symbol.clone(),
            list_names: store.watchlists.lists.iter().map(|w| w.name.clone()).collect(),
        });
    }

    /// Map one input line to an action.
    pub fn handle_line(&self, line: &str) -> Result<Option<Action>> {
        Command::parse(line)?
            .map(|command| self.handle_command(command))
            .transpose()
    }

    fn handle_command(&self, command: Command) -> Result<Action> {
        let action = match command {
            Command::Movers => Action::LoadMovers,
            Command::Retry => Action::RefreshMovers,
            Command::Search(text) => Action::SearchInput(text),
            Command::Overview(symbol) => Action::LoadOverview(symbol.to_uppercase()),
            Command::Quote(symbol) => Action::LoadQuote(symbol.to_uppercase()),
            Command::Chart(symbol, interval) => Action::LoadChart(symbol.to_uppercase(), interval),
            Command::Lists => Action::LoadWatchlists,
            Command::NewList(name) => Action::CreateWatchlist(name),
            Command::Toggle { list, symbol } => self.resolve_toggle(list, symbol)?,
            Command::Membership(symbol) => Action::ShowMembership(symbol.to_uppercase()),
            Command::Prices(list) => Action::LoadWatchlistPrices(list),
            Command::Help => Action::ShowHelp,
            Command::Quit => Action::Quit,
        };
        Ok(action)
    }

    /// Fill in the symbol from an open membership selector when omitted.
    fn resolve_toggle(&self, list: String, symbol: Option<String>) -> Result<Action> {
        let snapshot = self.store_snapshot.clone().unwrap_or_default();
        let selected = snapshot.membership_symbol;

        // "toggle Big Tech" names a list, not list "Big" and symbol "Tech".
        if let (Some(word), Some(selected)) = (&symbol, &selected) {
            let whole = format!("{list} {word}");
            if snapshot.list_names.iter().any(|name| *name == whole) {
                return Ok(Action::ToggleWatchlist {
                    list: whole,
                    symbol: selected.clone(),
                });
            }
        }

        match symbol.or(selected) {
            Some(symbol) => Ok(Action::ToggleWatchlist {
                list,
                symbol: symbol.to_uppercase(),
            }),
            None => Err(Error::invalid_input(
                "no symbol selected; use 'toggle <list> <SYMBOL>' or 'member <SYMBOL>' first",
            )),
        }
    }
}
