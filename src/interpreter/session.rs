use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

/// Options controlling a single run, usually built from the command line.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Print the token stream before parsing.
    pub show_tokens: bool,
    /// Print the parsed program before running it.
    pub show_ast:    bool,
    /// Stop after parsing.
    pub no_run:      bool,
    /// Skip `import` statements that name files.
    pub single_file: bool,
    /// Do not preload the builtin modules.
    pub no_builtin:  bool,
    /// Arguments passed to the program as `argv`.
    pub arguments:   Vec<String>,
}

/// Per-run state that outlives individual scopes.
///
/// Every run owns its own session, so two runs in one process never share
/// the set of imported files or loaded modules.
#[derive(Debug, Default)]
pub struct Session {
    /// The options of this run.
    pub options:    RunOptions,
    imported:       HashSet<PathBuf>,
    loaded_modules: HashSet<String>,
    directories:    Vec<PathBuf>,
}

impl Session {
    /// Creates a session without an entry file. Relative imports resolve
    /// against the working directory.
    #[must_use]
    pub fn new(options: RunOptions) -> Self {
        Self { options,
               ..Self::default() }
    }

    /// Creates a session whose entry file is `path`, already canonicalized.
    ///
    /// The entry file counts as imported, so a module importing it back is
    /// skipped.
    ///
    /// ```
    /// use std::path::Path;
    ///
    /// use wio::interpreter::session::{RunOptions, Session};
    ///
    /// let mut session = Session::with_entry_file(RunOptions::default(), Path::new("/scripts/main.wio"));
    /// assert_eq!(session.current_directory(), Path::new("/scripts"));
    /// assert!(!session.register_import(Path::new("/scripts/main.wio")));
    /// assert!(session.register_import(Path::new("/scripts/lib.wio")));
    /// ```
    #[must_use]
    pub fn with_entry_file(options: RunOptions, path: &Path) -> Self {
        let mut session = Self::new(options);
        session.register_import(path);
        session.enter_directory(path);
        session
    }

    /// The directory relative imports resolve against: that of the file
    /// currently executing.
    #[must_use]
    pub fn current_directory(&self) -> &Path {
        self.directories
            .last()
            .map_or_else(|| Path::new("."), PathBuf::as_path)
    }

    /// Records that the file at `path` is being imported.
    ///
    /// # Returns
    /// `false` if the file was imported before in this run.
    pub fn register_import(&mut self, path: &Path) -> bool {
        self.imported.insert(path.to_path_buf())
    }

    /// Makes the directory of `file` the base for relative imports.
    pub fn enter_directory(&mut self, file: &Path) {
        let directory = file.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        self.directories.push(directory);
    }

    /// Restores the import base of the importing file.
    pub fn leave_directory(&mut self) {
        self.directories.pop();
    }

    /// Returns `true` if the builtin module `name` is loaded.
    #[must_use]
    pub fn is_module_loaded(&self, name: &str) -> bool {
        self.loaded_modules.contains(name)
    }

    /// Records that the builtin module `name` is loaded.
    pub fn mark_module_loaded(&mut self, name: &str) {
        self.loaded_modules.insert(name.to_string());
    }
}
