//! Integration test common infrastructure.
//!
//! Builds an engine over a temporary script directory so each test gets a
//! fresh registry, context, and interpreter.

use std::fs;
use std::path::Path;
use subtext::executor::Executor;
use subtext::loader::ScriptLoader;
use subtext::Config;
use tempfile::TempDir;

pub struct TestEngine {
    pub executor: Executor,
    pub loader: ScriptLoader,
    /// Keeps the script directory alive for the test's duration.
    pub dir: TempDir,
}

#[allow(dead_code)]
pub fn engine() -> TestEngine {
    engine_with_timeout(0)
}

#[allow(dead_code)]
pub fn engine_with_timeout(timeout_ms: u64) -> TestEngine {
    let dir = TempDir::new().expect("create temp script dir");
    let mut config = Config::default();
    config.scripts.dir = dir.path().to_path_buf();
    config.engine.timeout_ms = timeout_ms;
    let (executor, loader) = subtext::bootstrap(&config);
    TestEngine {
        executor,
        loader,
        dir,
    }
}

#[allow(dead_code)]
pub fn write_script(dir: &Path, name: &str, body: &str) {
    fs::write(dir.join(name), body).expect("write script");
}
