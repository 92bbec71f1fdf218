//! Name -> analyzer map with an enable flag, guarded by an internal mutex so
//! registration and lookup are both safe concurrently (registration is
//! expected to happen once, at construction).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;

use super::Analyzer;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("analyzer '{0}' is already registered")]
    DuplicateName(String),
}

#[derive(Default)]
pub struct Registry {
    analyzers: Mutex<HashMap<String, Arc<dyn Analyzer>>>,
    enabled: Mutex<HashMap<String, bool>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an analyzer, enabled by default. Fails if the name is
    /// already taken.
    pub fn register(&self, analyzer: Arc<dyn Analyzer>) -> Result<(), RegistryError> {
        let name = analyzer.name().to_string();
        let mut analyzers = self.analyzers.lock().unwrap();
        if analyzers.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }
        self.enabled.lock().unwrap().insert(name.clone(), true);
        analyzers.insert(name, analyzer);
        Ok(())
    }

    pub fn set_enabled(&self, name: &str, enabled: bool) {
        if let Some(flag) = self.enabled.lock().unwrap().get_mut(name) {
            *flag = enabled;
        }
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled.lock().unwrap().get(name).copied().unwrap_or(false)
    }

    /// All registered analyzers whose enable flag is set. Order is
    /// unspecified - callers treat the result as a multiset.
    pub fn enabled_analyzers(&self) -> Vec<Arc<dyn Analyzer>> {
        let analyzers = self.analyzers.lock().unwrap();
        let enabled = self.enabled.lock().unwrap();
        analyzers
            .iter()
            .filter(|(name, _)| enabled.get(*name).copied().unwrap_or(false))
            .map(|(_, a)| Arc::clone(a))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.analyzers.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
