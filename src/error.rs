//! Error types for script loading and command invocation.
//!
//! No variant here is fatal to the engine: load failures skip the offending
//! module, invocation failures leave the observed text unchanged.

use thiserror::Error;

/// Errors raised while loading a script module.
///
/// Always recovered by skipping the module; the loader continues with the
/// remaining candidates.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),

    #[error("script parse error: {0}")]
    Parse(rhai::ParseError),

    /// The script does not satisfy the plugin contract: `commands()` missing,
    /// returning something other than a map, or mapping a name to a value
    /// that is not a function pointer.
    #[error("module `{module}` violates the plugin contract: {reason}")]
    Contract { module: String, reason: String },

    #[error("script evaluation failed: {0}")]
    Eval(Box<rhai::EvalAltResult>),
}

impl From<rhai::ParseError> for LoadError {
    fn from(err: rhai::ParseError) -> Self {
        Self::Parse(err)
    }
}

impl From<Box<rhai::EvalAltResult>> for LoadError {
    fn from(err: Box<rhai::EvalAltResult>) -> Self {
        Self::Eval(err)
    }
}

/// Errors raised while invoking a resolved handler.
///
/// The dispatcher treats any of these as "no substitution" and returns the
/// text untouched; a handler failure never reaches the host.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("bad argument: {0}")]
    BadArgument(String),

    /// Script runtime failure, including termination by the invocation
    /// deadline.
    #[error("script invocation failed: {0}")]
    Eval(Box<rhai::EvalAltResult>),
}

impl From<Box<rhai::EvalAltResult>> for InvokeError {
    fn from(err: Box<rhai::EvalAltResult>) -> Self {
        Self::Eval(err)
    }
}
