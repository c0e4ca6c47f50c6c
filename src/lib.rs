//! subtext - a text-substitution command engine.
//!
//! Watches editable text (delivered by a host collaborator), detects a
//! bracketed command token `{name arg1 arg2}>`, resolves the name against a
//! registry of command modules, invokes the handler, and replaces the token
//! with the handler's textual result. Modules come in two flavors: one
//! built-in module constructed at engine start, and user modules loaded from
//! rhai scripts dropped into a well-known directory.

pub mod builtin;
pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod loader;
pub mod module;
pub mod parser;
pub mod registry;
pub mod script;

pub use config::Config;
pub use context::ExecContext;
pub use executor::Executor;
pub use loader::{ScriptLoader, ScriptSource};
pub use module::{CommandModule, Handler};
pub use registry::Registry;

use script::ScriptHost;
use std::sync::Arc;

/// Assemble an engine from configuration.
///
/// Builds the registry (built-in module eagerly), the shared script host,
/// and a fresh execution context. The returned loader populates the same
/// registry the executor reads.
pub fn bootstrap(config: &Config) -> (Executor, ScriptLoader) {
    let context = ExecContext::new();
    let registry = Arc::new(Registry::new(builtin::builtin_module()));
    let host = Arc::new(ScriptHost::new(&context, config.engine.timeout()));
    let loader = ScriptLoader::new(host, Arc::clone(&registry), &config.scripts);
    let executor = Executor::new(registry, context);
    (executor, loader)
}
