//! Script discovery and module loading.
//!
//! Scans the script directory for loadable scripts, validates each against
//! the plugin contract, and appends the resulting modules to the registry.
//! Failures are isolated per script: a broken module never stops the rest
//! from loading, and no partial module is registered.

use crate::error::LoadError;
use crate::module::{CommandModule, Handler};
use crate::registry::Registry;
use crate::script::{ScriptHandler, ScriptHost};
use rhai::FnPtr;
use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Content type accepted by the import filter alongside the file extension.
pub const SCRIPT_MIME: &str = "application/x-rhai";

/// One entry delivered by the host's storage collaborator: a named stream of
/// script bytes with a declared content type.
pub struct ScriptSource<R> {
    pub name: String,
    pub content_type: String,
    pub reader: R,
}

/// Discovers and loads script modules into the registry.
pub struct ScriptLoader {
    host: Arc<ScriptHost>,
    registry: Arc<Registry>,
    script_dir: PathBuf,
    extension: String,
}

impl ScriptLoader {
    pub fn new(
        host: Arc<ScriptHost>,
        registry: Arc<Registry>,
        config: &crate::config::ScriptConfig,
    ) -> Self {
        Self {
            host,
            registry,
            script_dir: config.dir.clone(),
            extension: config.extension.clone(),
        }
    }

    /// Load every discoverable script in the script directory.
    ///
    /// Appends one user module per successfully loaded script and returns the
    /// number loaded. Re-invocation appends again; the loader does not
    /// deduplicate or replace modules already loaded in this process
    /// lifetime, even if the underlying script changed. Callers avoid
    /// redundant invocation by clearing the script directory before a bulk
    /// import (see [`import_sources`](Self::import_sources)).
    pub fn load_scripts(&self) -> usize {
        let entries = match fs::read_dir(&self.script_dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(
                    dir = %self.script_dir.display(),
                    error = %err,
                    "script directory not readable"
                );
                return 0;
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && self.has_script_extension(path))
            .collect();
        // Deterministic load order; precedence follows it.
        paths.sort();

        let mut loaded = 0;
        for path in &paths {
            match self.load_module(path) {
                Ok(module) => {
                    info!(
                        module = %module.name,
                        author = %module.author,
                        commands = ?module.command_names(),
                        "loaded script module"
                    );
                    self.registry.append(module);
                    loaded += 1;
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "failed to load script");
                }
            }
        }
        loaded
    }

    /// Copy script sources from the host's storage collaborator into the
    /// local script directory.
    ///
    /// Existing script files are cleared first, so a bulk import followed by
    /// [`load_scripts`](Self::load_scripts) does not accumulate stale
    /// modules. Entries are filtered to the script extension or MIME type;
    /// per-entry I/O failures are logged and skipped. Returns the number of
    /// files imported.
    pub fn import_sources<R: Read>(
        &self,
        sources: impl IntoIterator<Item = ScriptSource<R>>,
    ) -> usize {
        if let Err(err) = fs::create_dir_all(&self.script_dir) {
            warn!(
                dir = %self.script_dir.display(),
                error = %err,
                "cannot create script directory"
            );
            return 0;
        }
        self.clear_scripts();

        let mut imported = 0;
        for mut source in sources {
            let is_script = source.content_type == SCRIPT_MIME
                || Path::new(&source.name)
                    .extension()
                    .and_then(|ext| ext.to_str())
                    == Some(self.extension.as_str());
            if !is_script {
                debug!(
                    name = %source.name,
                    content_type = %source.content_type,
                    "skipping non-script entry"
                );
                continue;
            }

            // The name is collaborator-supplied; keep only its final
            // component so an entry like `../x.rhai` cannot land outside
            // the script directory.
            let Some(file_name) = Path::new(&source.name).file_name() else {
                warn!(name = %source.name, "skipping entry without a usable file name");
                continue;
            };
            let destination = self.script_dir.join(file_name);
            let result = fs::File::create(&destination)
                .and_then(|mut file| std::io::copy(&mut source.reader, &mut file));
            match result {
                Ok(bytes) => {
                    debug!(name = %source.name, bytes, "imported script");
                    imported += 1;
                }
                Err(err) => {
                    warn!(name = %source.name, error = %err, "failed to import script");
                }
            }
        }
        imported
    }

    fn clear_scripts(&self) {
        let Ok(entries) = fs::read_dir(&self.script_dir) else {
            return;
        };
        for path in entries.filter_map(|entry| entry.ok()).map(|e| e.path()) {
            if path.is_file() && self.has_script_extension(&path) {
                if let Err(err) = fs::remove_file(&path) {
                    warn!(path = %path.display(), error = %err, "failed to remove old script");
                }
            }
        }
    }

    fn has_script_extension(&self, path: &Path) -> bool {
        path.extension().and_then(|ext| ext.to_str()) == Some(self.extension.as_str())
    }

    /// Load one script into a fully assembled module. Any failure discards
    /// the whole module.
    fn load_module(&self, path: &Path) -> Result<CommandModule, LoadError> {
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| LoadError::Contract {
                module: path.display().to_string(),
                reason: "script file name is not valid UTF-8".to_string(),
            })?
            .to_string();

        let source = fs::read_to_string(path)?;
        let ast = Arc::new(self.host.compile(&source)?);

        let author = self.host.contract_author(&ast, &name)?;
        let command_map = self.host.contract_commands(&ast, &name)?;

        let mut commands: HashMap<String, Arc<dyn Handler>> = HashMap::new();
        for (command, value) in command_map {
            let fn_ptr = value.try_cast::<FnPtr>().ok_or_else(|| LoadError::Contract {
                module: name.clone(),
                reason: format!("command `{command}` is not a function pointer"),
            })?;
            commands.insert(
                command.to_string(),
                Arc::new(ScriptHandler::new(
                    Arc::clone(&self.host),
                    Arc::clone(&ast),
                    fn_ptr,
                )),
            );
        }

        Ok(CommandModule {
            name,
            author,
            commands,
        })
    }
}
