//! Embedded interpreter boundary.
//!
//! One process-wide rhai engine hosts every script module. Scripts implement
//! a fixed plugin contract instead of exporting loose globals:
//!
//! ```rhai
//! fn author() { "alice" }                 // optional, defaults to "Unknown"
//!
//! fn greet(args) {
//!     if args.len() == 0 { "hello" } else { "hello " + args[0] }
//! }
//!
//! fn commands() {
//!     #{ greet: Fn("greet") }             // mandatory, name -> function pointer
//! }
//! ```
//!
//! Handlers share mutable state through the `ctx_get`/`ctx_set` functions
//! registered on the engine, backed by the engine's `ExecContext`.

use crate::context::ExecContext;
use crate::error::{InvokeError, LoadError};
use crate::module::Handler;
use parking_lot::Mutex;
use rhai::{AST, Dynamic, EvalAltResult, FnPtr, Scope};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default author for scripts that do not define `author()`.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Owns the shared rhai engine and enforces the invocation deadline.
pub struct ScriptHost {
    engine: rhai::Engine,
    timeout: Option<Duration>,
    deadline: Arc<Mutex<Option<Instant>>>,
}

impl ScriptHost {
    /// Build the engine, wiring the context API and the deadline check.
    pub fn new(context: &ExecContext, timeout: Option<Duration>) -> Self {
        let mut engine = rhai::Engine::new();

        let store = context.store();
        engine.register_fn("ctx_get", move |key: &str| -> String {
            store.read().get(key).cloned().unwrap_or_default()
        });
        let store = context.store();
        engine.register_fn("ctx_set", move |key: &str, value: &str| {
            store.write().insert(key.to_string(), value.to_string());
        });

        let deadline = Arc::new(Mutex::new(None));
        if timeout.is_some() {
            let deadline = Arc::clone(&deadline);
            engine.on_progress(move |_ops| {
                let expired = deadline
                    .lock()
                    .is_some_and(|d| Instant::now() >= d);
                expired.then(|| Dynamic::from("invocation deadline exceeded"))
            });
        }

        Self {
            engine,
            timeout,
            deadline,
        }
    }

    /// Compile a script source into an AST.
    pub fn compile(&self, source: &str) -> Result<AST, LoadError> {
        Ok(self.engine.compile(source)?)
    }

    /// Run the optional `author()` contract function.
    pub fn contract_author(&self, ast: &AST, module: &str) -> Result<String, LoadError> {
        match self
            .engine
            .call_fn::<String>(&mut Scope::new(), ast, "author", ())
        {
            Ok(author) => Ok(author),
            Err(err) => match &*err {
                EvalAltResult::ErrorFunctionNotFound(name, _) if name.starts_with("author") => {
                    Ok(UNKNOWN_AUTHOR.to_string())
                }
                EvalAltResult::ErrorMismatchOutputType(..) => Err(LoadError::Contract {
                    module: module.to_string(),
                    reason: "author() must return a string".to_string(),
                }),
                _ => Err(LoadError::Eval(err)),
            },
        }
    }

    /// Run the mandatory `commands()` contract function.
    pub fn contract_commands(&self, ast: &AST, module: &str) -> Result<rhai::Map, LoadError> {
        self.engine
            .call_fn::<rhai::Map>(&mut Scope::new(), ast, "commands", ())
            .map_err(|err| match &*err {
                EvalAltResult::ErrorFunctionNotFound(name, _) if name.starts_with("commands") => {
                    LoadError::Contract {
                        module: module.to_string(),
                        reason: "script does not define commands()".to_string(),
                    }
                }
                EvalAltResult::ErrorMismatchOutputType(..) => LoadError::Contract {
                    module: module.to_string(),
                    reason: "commands() must return a map".to_string(),
                },
                _ => LoadError::Eval(err),
            })
    }

    fn arm_deadline(&self) {
        if let Some(timeout) = self.timeout {
            *self.deadline.lock() = Some(Instant::now() + timeout);
        }
    }

    fn disarm_deadline(&self) {
        *self.deadline.lock() = None;
    }
}

/// A command handler backed by a script function.
pub struct ScriptHandler {
    host: Arc<ScriptHost>,
    ast: Arc<AST>,
    fn_ptr: FnPtr,
}

impl ScriptHandler {
    pub fn new(host: Arc<ScriptHost>, ast: Arc<AST>, fn_ptr: FnPtr) -> Self {
        Self { host, ast, fn_ptr }
    }
}

impl Handler for ScriptHandler {
    fn invoke(&self, _cx: &ExecContext, args: &[String]) -> Result<String, InvokeError> {
        let call_args: rhai::Array = args
            .iter()
            .map(|arg| Dynamic::from(arg.clone()))
            .collect();

        // Scripts reach shared state through ctx_get/ctx_set, wired at engine
        // construction; the context parameter is for native handlers.
        self.host.arm_deadline();
        let result = self
            .fn_ptr
            .call::<Dynamic>(&self.host.engine, &self.ast, (call_args,));
        self.host.disarm_deadline();

        Ok(result?.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> ScriptHost {
        ScriptHost::new(&ExecContext::new(), None)
    }

    #[test]
    fn author_defaults_to_unknown() {
        let host = host();
        let ast = host.compile("fn commands() { #{} }").unwrap();
        assert_eq!(host.contract_author(&ast, "m").unwrap(), UNKNOWN_AUTHOR);
    }

    #[test]
    fn missing_commands_is_a_contract_violation() {
        let host = host();
        let ast = host.compile("fn author() { \"alice\" }").unwrap();
        assert!(matches!(
            host.contract_commands(&ast, "m"),
            Err(LoadError::Contract { .. })
        ));
    }

    #[test]
    fn non_map_commands_is_a_contract_violation() {
        let host = host();
        let ast = host.compile("fn commands() { 42 }").unwrap();
        assert!(matches!(
            host.contract_commands(&ast, "m"),
            Err(LoadError::Contract { .. })
        ));
    }

    #[test]
    fn script_handler_stringifies_results() {
        let host = Arc::new(host());
        let ast = Arc::new(
            host.compile("fn add(args) { args.len() } fn commands() { #{ add: Fn(\"add\") } }")
                .unwrap(),
        );
        let map = host.contract_commands(&ast, "m").unwrap();
        let fn_ptr = map
            .into_iter()
            .next()
            .and_then(|(_, v)| v.try_cast::<FnPtr>())
            .expect("function pointer");

        let handler = ScriptHandler::new(host, ast, fn_ptr);
        let result = handler
            .invoke(&ExecContext::new(), &["a".to_string(), "b".to_string()])
            .unwrap();
        assert_eq!(result, "2");
    }
}
