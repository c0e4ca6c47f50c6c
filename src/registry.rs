//! Command module registry and resolver.
//!
//! One built-in module constructed at engine start, plus an ordered,
//! append-only list of user modules populated by the script loader.
//! Resolution precedence: built-in first, then user modules in load order,
//! first match wins. Duplicate names across modules are legal; later
//! definitions are silently shadowed (with a load-time diagnostic).

use crate::module::{CommandModule, Handler};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::warn;

/// Snapshot of one module's listing data, for help output.
pub struct ModuleSummary {
    pub name: String,
    pub author: String,
    /// Sorted command names.
    pub commands: Vec<String>,
}

/// Holds the built-in module and the user-module list.
///
/// The user list is behind an `RwLock`: the loader appends while the
/// resolver reads, and the host gives no serialization guarantee between
/// the two paths.
pub struct Registry {
    builtin: CommandModule,
    user: RwLock<Vec<CommandModule>>,
}

impl Registry {
    /// Create a registry seeded with the built-in module.
    pub fn new(builtin: CommandModule) -> Self {
        Self {
            builtin,
            user: RwLock::new(Vec::new()),
        }
    }

    /// Resolve a command name to a handler.
    ///
    /// The reserved names `help` and `erase` are intercepted by the
    /// dispatcher and never reach this lookup.
    pub fn resolve(&self, command: &str) -> Option<Arc<dyn Handler>> {
        if let Some(handler) = self.builtin.get(command) {
            return Some(handler);
        }
        self.user
            .read()
            .iter()
            .find_map(|module| module.get(command))
    }

    /// Append a user module.
    ///
    /// Append-only: modules are never replaced or removed for the process
    /// lifetime, and duplicate module names are not deduplicated. Command
    /// names already resolvable get a diagnostic; resolution semantics are
    /// unaffected.
    pub fn append(&self, module: CommandModule) {
        for command in module.command_names() {
            if self.resolve(command).is_some() {
                warn!(
                    module = %module.name,
                    command,
                    "command shadowed by an earlier module"
                );
            }
        }
        self.user.write().push(module);
    }

    /// Number of loaded user modules.
    pub fn user_module_count(&self) -> usize {
        self.user.read().len()
    }

    /// Listing data in help order: built-in first, then user modules in
    /// load order.
    pub fn snapshot(&self) -> Vec<ModuleSummary> {
        let summarize = |module: &CommandModule| ModuleSummary {
            name: module.name.clone(),
            author: module.author.clone(),
            commands: module
                .command_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
        };

        let mut summaries = vec![summarize(&self.builtin)];
        summaries.extend(self.user.read().iter().map(summarize));
        summaries
    }
}
