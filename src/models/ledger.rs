use std::collections::HashSet;

/// Guids of every item already relayed. Grows for the life of the process.
#[derive(Debug, Default)]
pub struct DeliveryLedger {
    delivered: HashSet<String>,
}

impl DeliveryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, guid: &str) -> bool {
        self.delivered.contains(guid)
    }

    /// Returns false if the guid was already recorded.
    pub fn record(&mut self, guid: &str) -> bool {
        self.delivered.insert(guid.to_string())
    }

    pub fn len(&self) -> usize {
        self.delivered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delivered.is_empty()
    }
}
