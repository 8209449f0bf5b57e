use serde::{Deserialize, Serialize};

/// One completed round trip: what was sent and what the classifier said.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub productive: bool,
    pub response: String,
    pub prompt: String,
}

/// Ordered history of exchanges, in completion order.
///
/// Append-only: there is no way to edit, reorder or remove an entry.
#[derive(Debug, Clone, Default)]
pub struct ExchangeLog {
    entries: Vec<Exchange>,
}

impl ExchangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, exchange: Exchange) -> usize {
        self.entries.push(exchange);
        self.entries.len()
    }

    pub fn entries(&self) -> &[Exchange] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&Exchange> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
