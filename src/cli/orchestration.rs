//! Main workflow orchestration logic
//!
//! Computes the new window and runs every updater in a fixed order. It is
//! kept apart from `main.rs` so the whole pipeline can run against a fixture
//! tree and a mock version control.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::config::{Layout, RetentionConfig};
use crate::domain::{CompatVersion, VersionWindow};
use crate::error::{Result, UpdateCompatError};
use crate::git::VersionControl;
use crate::sync::{SyncMode, Synchronizer};
use crate::ui;
use crate::updaters::{self, DocIndex, ModeFlags, ShimHeader};

/// Arguments for the update workflow
///
/// Mirrors the CLI arguments without depending on clap.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpdateArgs {
    /// Set up right before branching
    pub release: bool,

    /// Set up right after branching
    pub master: bool,

    /// Check that nothing would change instead of writing
    pub assert_unchanged: bool,

    /// Overrides the version declared in the version file
    pub cur_version: Option<CompatVersion>,

    /// Overrides the mode's default retention
    pub number_of_old_versions: Option<usize>,

    /// Stage every write and removal
    pub git_add: bool,

    /// Delete the backups of previously dropped shims
    pub purge_backups: bool,
}

impl UpdateArgs {
    /// Reject argument combinations before anything is read
    pub fn validate(&self) -> Result<()> {
        if !self.release && !self.master {
            return Err(UpdateCompatError::config(
                "You should pass either --release (sometime before branching) \
                 or --master (right after branching and updating the version number in version.ml)",
            ));
        }
        if self.purge_backups && self.assert_unchanged {
            return Err(UpdateCompatError::config(
                "--purge-backups cannot be combined with --assert-unchanged",
            ));
        }
        Ok(())
    }

    /// Number of old versions to keep
    ///
    /// An explicit count wins; otherwise `--release` picks the release
    /// default and `--master` alone picks the pre-branch default.
    pub fn retention(&self, defaults: &RetentionConfig) -> Result<usize> {
        if let Some(n) = self.number_of_old_versions {
            return Ok(n);
        }
        if self.release {
            Ok(defaults.release)
        } else if self.master {
            Ok(defaults.master)
        } else {
            Err(UpdateCompatError::config(
                "No mode flag given to pick a retention count",
            ))
        }
    }

    pub fn mode_flags(&self) -> ModeFlags {
        ModeFlags {
            master: self.master,
            release: self.release,
        }
    }

    pub fn sync_mode(&self) -> SyncMode {
        if self.assert_unchanged {
            SyncMode::AssertUnchanged
        } else {
            SyncMode::Write
        }
    }
}

/// Everything read from the tree before the first write
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
    pub layout: Layout,
    pub header: ShimHeader,
    pub doc_index: DocIndex,
}

impl Workspace {
    /// Read the shim header and the documentation index under `root`
    pub fn load(root: impl Into<PathBuf>, layout: Layout) -> Result<Self> {
        let root = root.into();
        let header = ShimHeader::load(&root, &layout.header_file)?;
        let doc_index = DocIndex::load(&root, &layout.doc_index, &layout.shim_dir)?;
        Ok(Workspace {
            root,
            layout,
            header,
            doc_index,
        })
    }

    /// Current version from the version file
    pub fn declared_version(&self) -> Result<CompatVersion> {
        let path = &self.layout.version_file;
        let contents = fs::read_to_string(self.root.join(path)).map_err(|e| {
            UpdateCompatError::config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        detect_current_version(path, &contents, &self.layout.version_pattern)
    }
}

/// Result of a successful update
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateReport {
    /// Versions listed before the update, oldest first
    pub known: Vec<CompatVersion>,

    /// The new window
    pub window: VersionWindow,

    /// Known versions no longer supported
    pub dropped: Vec<CompatVersion>,

    /// Files written
    pub writes: usize,

    /// Files removed or set aside
    pub removals: usize,

    /// Searches locating leftover manual updates
    pub grep_commands: Vec<String>,
}

/// First capture of `pattern` in `contents`, parsed as a version
pub fn detect_current_version(path: &Path, contents: &str, pattern: &str) -> Result<CompatVersion> {
    let re = Regex::new(pattern)?;
    let captured = contents
        .lines()
        .find_map(|line| re.captures(line).and_then(|c| c.get(1)))
        .ok_or_else(|| {
            UpdateCompatError::config(format!(
                "No line matching '{}' found in {}",
                pattern,
                path.display()
            ))
        })?;
    CompatVersion::parse(captured.as_str())
}

/// `git grep` commands listing every token of the dropped versions
///
/// Returns nothing when no version was dropped.
pub fn grep_commands(dropped: &[CompatVersion]) -> Vec<String> {
    if dropped.is_empty() {
        return Vec::new();
    }

    let test_suite_tokens: Vec<String> = dropped
        .iter()
        .map(|v| format!("\"-compat\" \"{}\"", v))
        .chain(dropped.iter().map(|v| v.shim_name()))
        .collect();
    let tree_tokens: Vec<String> = dropped
        .iter()
        .map(|v| v.flag_ident())
        .chain(dropped.iter().map(|v| format!("compat \"{}\"", v)))
        .collect();

    vec![
        format!("git grep -- '{}' test-suite/", test_suite_tokens.join(r"\|")),
        format!("git grep -- '{}'", tree_tokens.join(r"\|")),
    ]
}

/// Main update workflow
///
/// Orchestrates the whole synchronization:
/// 1. Resolve the current version and the retention count
/// 2. Compute the new window from the documentation index
/// 3. Shim files, dispatch table, test suite, driver script, doc index, notations
/// 4. Optionally purge the backups of dropped shims
///
/// # Arguments
///
/// * `args` - Workflow arguments
/// * `workspace` - Layout and the inputs read from the tree
/// * `vcs` - Version control used when `args.git_add` is set
///
/// # Returns
///
/// Report of the new window and of what was touched
pub fn run_update(
    args: &UpdateArgs,
    workspace: &Workspace,
    vcs: &dyn VersionControl,
) -> Result<UpdateReport> {
    args.validate()?;

    let layout = &workspace.layout;
    let current = match args.cur_version {
        Some(version) => version,
        None => workspace.declared_version()?,
    };
    let number_of_old_versions = args.retention(&layout.retention)?;

    let known = workspace.doc_index.known_versions()?;
    let window = VersionWindow::compute(&known, current, number_of_old_versions)?;
    let dropped = window.dropped(&known);
    updaters::test_suite::assign_slots(&layout.test_suite.slots, &window)?;
    ui::display_window(&known, &window);

    let mut sync = Synchronizer::new(&workspace.root, args.sync_mode(), args.git_add, vcs);

    updaters::update_shims(&mut sync, &layout.shim_dir, &workspace.header, &known, &window)?;
    updaters::update_dispatch(&mut sync, &layout.dispatch_file, &window)?;
    updaters::update_test_suite(&mut sync, &layout.test_suite.slots, &window)?;
    updaters::update_run_script(&mut sync, &layout.run_script, args.mode_flags())?;
    updaters::update_doc_index(&mut sync, &workspace.doc_index, &layout.doc_index_anchor, &window)?;
    updaters::update_notations(&mut sync, &layout.notation_dir, &dropped)?;

    if args.purge_backups {
        updaters::purge_backups(&mut sync, &layout.shim_dir)?;
    }

    Ok(UpdateReport {
        known,
        grep_commands: grep_commands(&dropped),
        window,
        dropped,
        writes: sync.writes(),
        removals: sync.removals(),
    })
}
