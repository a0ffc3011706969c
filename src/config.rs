use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, UpdateCompatError};

/// Name of the layout file looked up in the repository root and the user
/// configuration directory.
pub const CONFIG_FILE_NAME: &str = "update-compat.toml";

/// Where every artifact lives in the repository, and the retention defaults.
///
/// All paths are relative to the repository root. Every field defaults to
/// the layout of the Coq source tree.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Layout {
    /// File declaring the current version
    #[serde(default = "default_version_file")]
    pub version_file: PathBuf,

    /// Regex whose first capture group is the current `X.Y` version
    #[serde(default = "default_version_pattern")]
    pub version_pattern: String,

    /// Shared header every shim starts with
    #[serde(default = "default_header_file")]
    pub header_file: PathBuf,

    /// Directory holding the `CoqXY.v` shims
    #[serde(default = "default_shim_dir")]
    pub shim_dir: PathBuf,

    /// File containing the `get_compat_file` dispatch function
    #[serde(default = "default_dispatch_file")]
    pub dispatch_file: PathBuf,

    /// Documentation index listing the shims
    #[serde(default = "default_doc_index")]
    pub doc_index: PathBuf,

    /// Line of the documentation index after which shims are listed
    #[serde(default = "default_doc_index_anchor")]
    pub doc_index_anchor: String,

    /// Driver script re-running the tool in assert-unchanged mode
    #[serde(default = "default_run_script")]
    pub run_script: PathBuf,

    /// Tree whose `.v` files are pruned of dropped notations
    #[serde(default = "default_notation_dir")]
    pub notation_dir: PathBuf,

    #[serde(default)]
    pub test_suite: TestSuiteConfig,

    #[serde(default)]
    pub retention: RetentionConfig,
}

/// Fixed test-suite slots, oldest first
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TestSuiteConfig {
    #[serde(default = "default_test_slots")]
    pub slots: Vec<TestSlot>,
}

/// One test file and the wording used for its flag
///
/// A `{version}` token in the description is replaced with the slot's version.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TestSlot {
    pub path: PathBuf,
    pub description: String,
}

/// Default number of old versions kept by each mode
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RetentionConfig {
    /// `--release`: set up right before branching
    #[serde(default = "default_release_old_versions")]
    pub release: usize,

    /// `--master`: set up right after branching
    #[serde(default = "default_master_old_versions")]
    pub master: usize,
}

fn default_version_file() -> PathBuf {
    PathBuf::from("configure.ml")
}

fn default_version_pattern() -> String {
    r#"let coq_version = "([0-9]+\.[0-9]+)"#.to_string()
}

fn default_header_file() -> PathBuf {
    PathBuf::from("dev/header.ml")
}

fn default_shim_dir() -> PathBuf {
    PathBuf::from("theories/Compat")
}

fn default_dispatch_file() -> PathBuf {
    PathBuf::from("sysinit/coqargs.ml")
}

fn default_doc_index() -> PathBuf {
    PathBuf::from("doc/stdlib/index-list.html.template")
}

fn default_doc_index_anchor() -> String {
    "    theories/Compat/AdmitAxiom.v".to_string()
}

fn default_run_script() -> PathBuf {
    PathBuf::from("test-suite/tools/update-compat/run.sh")
}

fn default_notation_dir() -> PathBuf {
    PathBuf::from("theories")
}

fn default_test_slots() -> Vec<TestSlot> {
    [
        ("CompatOldOldFlag.v", "current-minus-three"),
        ("CompatOldFlag.v", "current-minus-two"),
        ("CompatPreviousFlag.v", "current-minus-one"),
        ("CompatCurrentFlag.v", "current"),
    ]
    .iter()
    .map(|(file, description)| TestSlot {
        path: Path::new("test-suite/success").join(file),
        description: description.to_string(),
    })
    .collect()
}

fn default_release_old_versions() -> usize {
    2
}

fn default_master_old_versions() -> usize {
    3
}

impl Default for TestSuiteConfig {
    fn default() -> Self {
        TestSuiteConfig {
            slots: default_test_slots(),
        }
    }
}

impl Default for RetentionConfig {
    fn default() -> Self {
        RetentionConfig {
            release: default_release_old_versions(),
            master: default_master_old_versions(),
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            version_file: default_version_file(),
            version_pattern: default_version_pattern(),
            header_file: default_header_file(),
            shim_dir: default_shim_dir(),
            dispatch_file: default_dispatch_file(),
            doc_index: default_doc_index(),
            doc_index_anchor: default_doc_index_anchor(),
            run_script: default_run_script(),
            notation_dir: default_notation_dir(),
            test_suite: TestSuiteConfig::default(),
            retention: RetentionConfig::default(),
        }
    }
}

/// Loads the layout from file or returns defaults.
///
/// Attempts to load the layout in the following order:
/// 1. Custom path provided as parameter
/// 2. `update-compat.toml` in the repository root
/// 3. `update-compat.toml` in the user config directory
/// 4. Default layout if no file found
///
/// # Arguments
/// * `config_path` - Optional path to a custom layout file
/// * `root` - Repository root
///
/// # Returns
/// * `Ok(Layout)` - Loaded or default layout
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>, root: &Path) -> Result<Layout> {
    let source = if let Some(path) = config_path {
        Some(path.to_path_buf())
    } else if root.join(CONFIG_FILE_NAME).exists() {
        Some(root.join(CONFIG_FILE_NAME))
    } else {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    };

    let Some(path) = source else {
        return Ok(Layout::default());
    };

    let config_str = fs::read_to_string(&path).map_err(|e| {
        UpdateCompatError::config(format!("Cannot read {}: {}", path.display(), e))
    })?;
    toml::from_str(&config_str)
        .map_err(|e| UpdateCompatError::config(format!("Invalid {}: {}", path.display(), e)))
}
