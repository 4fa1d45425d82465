use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::adapters::traits::WalletAdapter;
use crate::ledger::models::RecordSource;

pub struct AdapterRegistry {
    adapters: HashMap<String, Arc<dyn WalletAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    pub fn register(&mut self, adapter: Arc<dyn WalletAdapter>) {
        info!("Registering wallet adapter: {}", adapter.name());
        self.adapters.insert(adapter.name().to_string(), adapter);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn WalletAdapter>> {
        self.adapters.get(name).cloned()
    }

    pub fn all(&self) -> Vec<Arc<dyn WalletAdapter>> {
        self.adapters.values().cloned().collect()
    }

    pub async fn active(&self) -> Vec<Arc<dyn WalletAdapter>> {
        let mut result = Vec::new();
        for adapter in self.adapters.values() {
            if let Ok(true) = adapter.is_available().await {
                result.push(adapter.clone());
            }
        }
        result
    }

    pub fn for_source(&self, source: RecordSource) -> Vec<Arc<dyn WalletAdapter>> {
        self.adapters
            .values()
            .filter(|a| a.source() == source)
            .cloned()
            .collect()
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
