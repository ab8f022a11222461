use std::{fs, mem, path::Path, rc::Rc};

use tracing::{debug, warn};

use crate::{
    ast::{ImportTarget, Location},
    error::{Error, RuntimeError},
    interpreter::{
        evaluator::core::{Context, EvalResult},
        modules,
    },
};

impl Context {
    /// Executes an `import` statement.
    ///
    /// Builtin modules are loaded into the builtin scope, files are evaluated
    /// into the global scope. Either is loaded at most once per run; repeated
    /// imports are skipped.
    pub fn exec_import(&mut self, target: &ImportTarget, location: Location) -> EvalResult<()> {
        match target {
            ImportTarget::Builtin(name) => self.load_module(name, location),
            ImportTarget::File(path) => self.import_file(Path::new(path), location),
        }
    }

    /// Registers the natives of the builtin module `name`.
    ///
    /// # Errors
    /// `UnknownModule` if no builtin module has this name.
    pub fn load_module(&mut self, name: &str, location: Location) -> EvalResult<()> {
        if self.session.is_module_loaded(name) {
            debug!(module = name, "builtin module already loaded");
            return Ok(());
        }

        let load = modules::find(name).ok_or_else(|| RuntimeError::UnknownModule { name: name.to_string(),
                                                                                   location })?;
        load(&self.builtin)?;
        self.session.mark_module_loaded(name);

        debug!(module = name, "loaded builtin module");
        Ok(())
    }

    /// Parses and evaluates a source file into the global scope.
    ///
    /// The path is resolved against the directory of the importing file and
    /// canonicalized, so the same file reached through different relative
    /// paths is imported once. The imported file runs outside of any loop,
    /// function or unit of the importer, and its own relative imports resolve
    /// against its directory.
    ///
    /// Errors raised inside the file are wrapped in `InModule` naming it.
    fn import_file(&mut self, relative: &Path, location: Location) -> EvalResult<()> {
        if self.session.options.single_file {
            warn!(path = %relative.display(), "single-file mode, skipping import");
            return Ok(());
        }

        let joined = self.session.current_directory().join(relative);
        let path = fs::canonicalize(&joined).map_err(|error| RuntimeError::ImportFailed { path: joined.clone(),
                                                                                          reason: error.to_string(),
                                                                                          location })?;

        if !self.session.register_import(&path) {
            debug!(path = %path.display(), "file already imported");
            return Ok(());
        }

        let in_module = |error: Error| RuntimeError::InModule { path:   path.clone(),
                                                                source: Box::new(error), };

        let source = fs::read_to_string(&path).map_err(|error| RuntimeError::ImportFailed { path: path.clone(),
                                                                                             reason: error.to_string(),
                                                                                             location })?;
        let program = crate::parse_source(&source).map_err(|error| in_module(error.into()))?;

        debug!(path = %path.display(), statements = program.statements.len(), "importing file");

        self.session.enter_directory(&path);
        let saved_loops = mem::take(&mut self.loop_depth);
        let saved_functions = mem::take(&mut self.function_depth);
        self.unit_stack.push(None);

        let global = Rc::clone(&self.global);
        let result = self.within(global, |ctx| ctx.exec_statements(&program.statements));

        self.unit_stack.pop();
        self.function_depth = saved_functions;
        self.loop_depth = saved_loops;
        self.session.leave_directory();

        result.map(|_| ()).map_err(|error| in_module(error.into()))
    }
}
