//! Command line parsing.

use crate::error::{Error, Result};
use crate::state::Interval;

/// A parsed user command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Movers,
    Retry,
    /// Raw search text; may be blank to clear results.
    Search(String),
    Overview(String),
    Quote(String),
    Chart(String, Interval),
    Lists,
    NewList(String),
    /// Toggle a symbol in a list. `symbol` is `None` when only a list was given.
    Toggle { list: String, symbol: Option<String> },
    Membership(String),
    Prices(String),
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Empty lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Ok(None);
        }

        // `/text` searches as typed, keeping inner spacing.
        if let Some(text) = line.trim_start().strip_prefix('/') {
            return Ok(Some(Self::Search(text.to_string())));
        }

        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "movers" | "m" => Self::Movers,
            "retry" | "refresh" | "r" => Self::Retry,
            "search" | "s" => Self::Search(rest.to_string()),
            "overview" | "o" => Self::Overview(required(rest, "overview <SYMBOL>")?),
            "quote" => Self::Quote(required(rest, "quote <SYMBOL>")?),
            "chart" => {
                let mut parts = rest.split_whitespace();
                let symbol = parts
                    .next()
                    .ok_or_else(|| Error::invalid_input("usage: chart <SYMBOL> [interval]"))?;
                let interval = match parts.next() {
                    Some(raw) => raw.parse()?,
                    None => Interval::default(),
                };
                Self::Chart(symbol.to_string(), interval)
            }
            "lists" | "l" => Self::Lists,
            "new" => Self::NewList(required(rest, "new <list name>")?),
            "toggle" | "t" => {
                let rest = required(rest, "toggle <list name> [SYMBOL]")?;
                match rest.rsplit_once(char::is_whitespace) {
                    Some((list, symbol)) => Self::Toggle {
                        list: list.trim().to_string(),
                        symbol: Some(symbol.to_string()),
                    },
                    None => Self::Toggle {
                        list: rest,
                        symbol: None,
                    },
                }
            }
            "member" | "add" => Self::Membership(required(rest, "member <SYMBOL>")?),
            "prices" | "p" => Self::Prices(required(rest, "prices <list name>")?),
            "help" | "?" | "h" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => {
                return Err(Error::invalid_input(format!(
                    "unknown command '{other}' (type 'help')"
                )));
            }
        };

        Ok(Some(command))
    }
}

fn required(rest: &str, usage: &str) -> Result<String> {
    if rest.is_empty() {
        Err(Error::invalid_input(format!("usage: {usage}")))
    } else {
        Ok(rest.to_string())
    }
}
