//! Built-in command module.
//!
//! Constructed eagerly at engine start and never reloaded. `erase` is not
//! here: it is a dispatcher sentinel, not a command.

use crate::context::ExecContext;
use crate::error::InvokeError;
use crate::module::{CommandModule, Handler};
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;

pub const BUILTIN_MODULE_NAME: &str = "Built-in";
pub const BUILTIN_MODULE_AUTHOR: &str = "subtext";

/// Build the built-in module.
pub fn builtin_module() -> CommandModule {
    let mut commands: HashMap<String, Arc<dyn Handler>> = HashMap::new();

    commands.insert("repeat".to_string(), Arc::new(RepeatCommand));
    commands.insert("uppercase".to_string(), Arc::new(UppercaseCommand));
    commands.insert("count".to_string(), Arc::new(CountCommand));
    commands.insert("summarize".to_string(), Arc::new(SummarizeCommand));
    commands.insert("randomize".to_string(), Arc::new(RandomizeCommand));
    commands.insert("info".to_string(), Arc::new(InfoCommand));

    CommandModule {
        name: BUILTIN_MODULE_NAME.to_string(),
        author: BUILTIN_MODULE_AUTHOR.to_string(),
        commands,
    }
}

/// Upper bound on `repeat` output bytes. A count large enough to overflow
/// the allocator would abort the process; anything past this bound is
/// rejected as a bad argument instead.
const REPEAT_MAX_BYTES: usize = 1 << 20;

/// `repeat n text...` - joined text repeated `n` times, no separator between
/// repetitions.
struct RepeatCommand;

impl Handler for RepeatCommand {
    fn invoke(&self, _cx: &ExecContext, args: &[String]) -> Result<String, InvokeError> {
        let count = args
            .first()
            .ok_or_else(|| InvokeError::BadArgument("repeat needs a count".to_string()))?
            .parse::<usize>()
            .map_err(|_| InvokeError::BadArgument("repeat count must be an integer".to_string()))?;
        let text = args[1..].join(" ");
        match text.len().checked_mul(count) {
            Some(bytes) if bytes <= REPEAT_MAX_BYTES => Ok(text.repeat(count)),
            _ => Err(InvokeError::BadArgument(
                "repeat output would be too large".to_string(),
            )),
        }
    }
}

/// `uppercase text...` - joined text, uppercased.
struct UppercaseCommand;

impl Handler for UppercaseCommand {
    fn invoke(&self, _cx: &ExecContext, args: &[String]) -> Result<String, InvokeError> {
        Ok(args.join(" ").to_uppercase())
    }
}

/// `count text...` - number of whitespace-separated words.
struct CountCommand;

impl Handler for CountCommand {
    fn invoke(&self, _cx: &ExecContext, args: &[String]) -> Result<String, InvokeError> {
        Ok(args.join(" ").split_whitespace().count().to_string())
    }
}

/// `summarize n...` - sum of the arguments parsed as floats.
struct SummarizeCommand;

impl Handler for SummarizeCommand {
    fn invoke(&self, _cx: &ExecContext, args: &[String]) -> Result<String, InvokeError> {
        let mut total = 0.0f64;
        for arg in args {
            total += arg.parse::<f64>().map_err(|_| {
                InvokeError::BadArgument(format!("summarize argument `{arg}` is not a number"))
            })?;
        }
        Ok(total.to_string())
    }
}

/// `randomize lo hi` - uniform random integer in `[lo, hi]`.
///
/// Non-numeric or inverted bounds produce a literal explanatory result
/// rather than a failure, so the message lands in the text field.
struct RandomizeCommand;

impl Handler for RandomizeCommand {
    fn invoke(&self, _cx: &ExecContext, args: &[String]) -> Result<String, InvokeError> {
        let [lo, hi] = args else {
            return Err(InvokeError::BadArgument(
                "randomize takes exactly two arguments".to_string(),
            ));
        };
        match (lo.parse::<i64>(), hi.parse::<i64>()) {
            (Ok(lo), Ok(hi)) if lo <= hi => {
                Ok(rand::thread_rng().gen_range(lo..=hi).to_string())
            }
            _ => Ok("Invalid arguments. Please provide numbers.".to_string()),
        }
    }
}

/// `info` - engine name and version.
struct InfoCommand;

impl Handler for InfoCommand {
    fn invoke(&self, _cx: &ExecContext, _args: &[String]) -> Result<String, InvokeError> {
        Ok(format!("subtext v{}", env!("CARGO_PKG_VERSION")))
    }
}
