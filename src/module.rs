//! Command modules and the handler trait.

use crate::context::ExecContext;
use crate::error::InvokeError;
use std::collections::HashMap;
use std::sync::Arc;

/// Trait implemented by all command handlers.
///
/// Arity is uniform: every handler takes the full ordered argument sequence,
/// possibly empty, as raw strings. The result is the replacement text for the
/// matched token.
pub trait Handler: Send + Sync {
    /// Invoke the command with the parsed arguments.
    fn invoke(&self, cx: &ExecContext, args: &[String]) -> Result<String, InvokeError>;
}

/// A named, authored collection of command handlers.
///
/// Immutable once constructed. Command names are unique within a module but
/// may collide across modules; collisions are settled by resolver precedence,
/// never rejected.
pub struct CommandModule {
    /// Module name (file stem for script modules).
    pub name: String,
    /// Declared author, `"Unknown"` if the script does not say.
    pub author: String,
    /// Command name to handler mapping. Handlers are shared by reference.
    pub commands: HashMap<String, Arc<dyn Handler>>,
}

impl CommandModule {
    /// Look up a handler within this module.
    pub fn get(&self, command: &str) -> Option<Arc<dyn Handler>> {
        self.commands.get(command).cloned()
    }

    /// Command names in sorted order, for listings and logs.
    pub fn command_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
