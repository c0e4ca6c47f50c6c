//! Shared execution context for command handlers.
//!
//! Handlers run against one process-wide interpreter, so side effects of one
//! invocation are visible to the next. Rather than leaving that state implicit
//! in the interpreter's global namespace, it lives in an explicit `ExecContext`
//! passed to every native handler and exposed to scripts as `ctx_get`/`ctx_set`.
//! Tests get deterministic behavior by building a fresh context per engine.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Mutable state shared by all handler invocations of one engine.
#[derive(Clone, Default)]
pub struct ExecContext {
    vars: Arc<RwLock<HashMap<String, String>>>,
}

impl ExecContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a value previously stored by any handler.
    pub fn get(&self, key: &str) -> Option<String> {
        self.vars.read().get(key).cloned()
    }

    /// Store a value visible to all subsequent invocations.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.write().insert(key.into(), value.into());
    }

    /// Handle to the underlying store, for wiring the script-side API.
    pub(crate) fn store(&self) -> Arc<RwLock<HashMap<String, String>>> {
        Arc::clone(&self.vars)
    }
}
