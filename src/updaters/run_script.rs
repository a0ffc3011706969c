//! Driver script running the check in the test suite
//!
//! The script is fully regenerated, except for its `#!` line which is taken
//! from the existing file so local interpreter paths survive.

use std::path::Path;

use crate::error::{Result, UpdateCompatError};
use crate::sync::{Artifact, Synchronizer};

/// Mode flags the script passes back to the tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeFlags {
    pub master: bool,
    pub release: bool,
}

impl ModeFlags {
    /// Flags as they appear on the command line, `--master` first
    pub fn as_args(&self) -> String {
        let mut args = Vec::new();
        if self.master {
            args.push("--master");
        }
        if self.release {
            args.push("--release");
        }
        args.join(" ")
    }
}

/// Script contents for `flags`, with the template's own `#!` line
pub fn script_template(flags: ModeFlags) -> String {
    format!(
        r#"#!/usr/bin/env bash

# allow running this script from any directory by basing things on where the script lives
SCRIPT_DIR="$( cd "$( dirname "${{BASH_SOURCE[0]}}" )" >/dev/null && pwd )"

# we assume that the script lives in test-suite/tools/update-compat/,
# and that update-compat.py lives in dev/tools/
cd "${{SCRIPT_DIR}}/../../.."
dev/tools/update-compat.py --assert-unchanged {} || exit $?
"#,
        flags.as_args()
    )
}

fn is_bash_shebang(line: &str) -> bool {
    line.starts_with("#!/") && line.ends_with("bash")
}

/// Replace the first line of `new_contents` with the first line of `existing`
///
/// Both first lines must be `#!/...bash` lines.
pub fn keep_shebang(path: &Path, existing: &str, new_contents: &str) -> Result<String> {
    let old_first = existing.split('\n').next().unwrap_or_default();
    if !is_bash_shebang(old_first) {
        return Err(UpdateCompatError::structure(
            path,
            format!("unrecognized #! line in existing script: {:?}", old_first),
        ));
    }

    let mut new_lines: Vec<&str> = new_contents.split('\n').collect();
    if !new_lines.first().is_some_and(|line| is_bash_shebang(line)) {
        return Err(UpdateCompatError::structure(
            path,
            format!("unrecognized #! line in new script: {:?}", new_lines.first()),
        ));
    }
    new_lines[0] = old_first;
    Ok(new_lines.join("\n"))
}

/// Regenerate the driver script at `path`
pub fn update_run_script(sync: &mut Synchronizer, path: &Path, flags: ModeFlags) -> Result<()> {
    let existing = sync.read(path)?;
    let template = script_template(flags);
    let desired = match &existing {
        Some(contents) => keep_shebang(path, contents, &template)?,
        None => template,
    };
    sync.apply(&Artifact::new(path, existing, desired))?;
    Ok(())
}
