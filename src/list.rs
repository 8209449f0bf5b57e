use std::collections::BTreeSet;
use std::fmt::Write as _;

use crate::exchange::{Exchange, ExchangeLog};

pub const EMPTY_PLACEHOLDER: &str = "No emails sent yet!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Productive,
    NotProductive,
}

impl Badge {
    pub fn for_exchange(exchange: &Exchange) -> Self {
        if exchange.productive {
            Badge::Productive
        } else {
            Badge::NotProductive
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Badge::Productive => "Productive",
            Badge::NotProductive => "Not productive",
        }
    }
}

/// One collapsible row as it would be drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem<'a> {
    pub number: usize,
    pub badge: Badge,
    pub expanded: bool,
    pub exchange: &'a Exchange,
}

impl ListItem<'_> {
    pub fn label(&self) -> String {
        format!("Email #{}", self.number)
    }
}

/// Accordion over the exchange history. Any number of rows may be open.
#[derive(Debug, Clone, Default)]
pub struct ListView {
    expanded: BTreeSet<usize>,
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips row `index` (0-based). Out-of-range indices are ignored.
    pub fn toggle(&mut self, index: usize, log: &ExchangeLog) -> bool {
        if index >= log.len() {
            return false;
        }
        if !self.expanded.remove(&index) {
            self.expanded.insert(index);
        }
        true
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded.contains(&index)
    }

    pub fn items<'a>(&self, log: &'a ExchangeLog) -> Vec<ListItem<'a>> {
        log.entries()
            .iter()
            .enumerate()
            .map(|(index, exchange)| ListItem {
                number: index + 1,
                badge: Badge::for_exchange(exchange),
                expanded: self.is_expanded(index),
                exchange,
            })
            .collect()
    }

    pub fn render(&self, log: &ExchangeLog) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "== Email list ==");

        if log.is_empty() {
            let _ = writeln!(out, "{}", EMPTY_PLACEHOLDER);
            return out;
        }

        for item in self.items(log) {
            let marker = if item.expanded { "v" } else { ">" };
            let _ = writeln!(out, "{} [{}] {}", marker, item.badge.label(), item.label());
            if item.expanded {
                let _ = writeln!(out, "    Sent message");
                let _ = writeln!(out, "      {}", item.exchange.prompt);
                let _ = writeln!(out, "    Received message");
                let _ = writeln!(out, "      {}", item.exchange.response);
            }
        }

        out
    }
}
