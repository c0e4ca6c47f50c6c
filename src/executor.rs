//! Command dispatch and text substitution.
//!
//! Stateless across calls: each text change is evaluated independently, and
//! all registry state lives behind the shared [`Registry`]. The worst-case
//! outcome of any failure is unchanged text; the engine never surfaces an
//! error into the host's text field.

use crate::context::ExecContext;
use crate::parser::TokenParser;
use crate::registry::Registry;
use std::sync::Arc;
use tracing::{debug, warn};

/// Reserved name: produces the multi-module help listing.
const HELP_COMMAND: &str = "help";
/// Reserved name: replaces the token with the empty string. A sentinel
/// distinct from "no match", intercepted before resolver lookup.
const ERASE_COMMAND: &str = "erase";

/// Dispatches invocation tokens found in observed text.
pub struct Executor {
    registry: Arc<Registry>,
    parser: TokenParser,
    context: ExecContext,
}

impl Executor {
    pub fn new(registry: Arc<Registry>, context: ExecContext) -> Self {
        Self {
            registry,
            parser: TokenParser::new(),
            context,
        }
    }

    /// Sole host entry point: process one observed text-field content change.
    ///
    /// Finds the first invocation token, dispatches it, and substitutes the
    /// result for the first occurrence of the token. Text without a valid
    /// token, an unresolvable command, or a failing handler all return the
    /// input unchanged.
    pub fn on_text_changed(&self, text: &str) -> String {
        let Some(invocation) = self.parser.find_invocation(text) else {
            return text.to_string();
        };
        debug!(
            command = %invocation.name,
            args = ?invocation.args,
            "found invocation token"
        );

        let replacement = match invocation.name.as_str() {
            HELP_COMMAND => self.help_text(),
            ERASE_COMMAND => String::new(),
            command => {
                let Some(handler) = self.registry.resolve(command) else {
                    debug!(command, "command not found, leaving token in place");
                    return text.to_string();
                };
                match handler.invoke(&self.context, &invocation.args) {
                    Ok(result) => result,
                    Err(err) => {
                        warn!(command, error = %err, "command invocation failed");
                        return text.to_string();
                    }
                }
            }
        };

        // One substitution per call, on the exact matched token.
        text.replacen(&invocation.token, &replacement, 1)
    }

    /// Shared handler state, exposed for hosts that seed context values.
    pub fn context(&self) -> &ExecContext {
        &self.context
    }

    /// One line per module plus its comma-joined command names; built-in
    /// module first, then user modules in load order, then the reserved
    /// names (which live in no module but are still invocable).
    fn help_text(&self) -> String {
        let mut out = String::from("Available commands:\n");
        for module in self.registry.snapshot() {
            out.push('\n');
            out.push_str(&format!("Module: {}, Author: {}\n", module.name, module.author));
            out.push_str(&module.commands.join(", "));
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&format!("Reserved: {ERASE_COMMAND}, {HELP_COMMAND}\n"));
        out
    }
}
