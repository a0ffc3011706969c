//! Miniature source tree with every file the updater touches.
//!
//! The tree is what a repository looks like after a `--master` run for 8.13:
//! shims for 8.10 to 8.13, with the 8.11 shim missing its require line.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub const HEADER: &str = "(************************************************************************)\n\
(*         *   The Coq Proof Assistant / The Coq Development Team       *)\n\
(************************************************************************)\n";

pub const COQARGS: &str = r#"let set_compat_version opts v = { opts with compat_version = v }

let get_compat_file = function
  | "8.13" -> "Coq.Compat.Coq813"
  | "8.12" -> "Coq.Compat.Coq812"
  | "8.11" -> "Coq.Compat.Coq811"
  | "8.10" -> "Coq.Compat.Coq810"
  | ("8.9" | "8.8") as s ->
    CErrors.user_err
      Pp.(str "Compatibility with version " ++ str s ++ str " not supported.")
  | s ->
    CErrors.user_err
      Pp.(str "Unknown compatibility version \"" ++ str s ++ str "\".")
"#;

pub const DOC_INDEX: &str = r#"<dt> <b>Compat</b>:
  Compatibility wrappers for previous versions of Coq
</dt>
<dd>
    theories/Compat/AdmitAxiom.v
    theories/Compat/Coq810.v
    theories/Compat/Coq811.v
    theories/Compat/Coq812.v
    theories/Compat/Coq813.v
</dd>
"#;

pub const NOTATIONS: &str = "Require Import Datatypes.\n\
Notation \"'old_pair'\" := pair (only parsing, compat \"8.10\").\n\
Notation \"'new_pair'\" := pair (only parsing, compat \"8.12\").\n\
Definition id {A} (a : A) := a.\n";

pub const RUN_SCRIPT: &str = "#!/usr/bin/env bash\n\
dev/tools/update-compat.py --assert-unchanged --master || exit $?\n";

pub struct CoqTree {
    dir: TempDir,
}

impl CoqTree {
    pub fn new() -> Self {
        let tree = CoqTree {
            dir: tempfile::tempdir().expect("temp dir"),
        };

        tree.write("configure.ml", "let coq_version = \"8.13+alpha\"\nlet vo_magic = 81391\n");
        tree.write("dev/header.ml", HEADER);
        tree.write("theories/Compat/AdmitAxiom.v", "Axiom proof_admitted : False.\n");
        tree.write("theories/Compat/Coq810.v", &shim("8.10", Some("Coq811")));
        tree.write("theories/Compat/Coq811.v", &shim("8.11", None));
        tree.write("theories/Compat/Coq812.v", &shim("8.12", Some("Coq813")));
        tree.write("theories/Compat/Coq813.v", &shim("8.13", None));
        tree.write("theories/Init/Notations.v", NOTATIONS);
        tree.write("sysinit/coqargs.ml", COQARGS);
        tree.write("doc/stdlib/index-list.html.template", DOC_INDEX);
        tree.write("test-suite/tools/update-compat/run.sh", RUN_SCRIPT);
        for name in [
            "CompatOldOldFlag.v",
            "CompatOldFlag.v",
            "CompatPreviousFlag.v",
            "CompatCurrentFlag.v",
        ] {
            tree.write(&format!("test-suite/success/{}", name), "(* stale *)\n");
        }

        tree
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.path(relative).exists()
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).expect("read fixture file")
    }

    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.path(relative);
        fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
        fs::write(path, contents).expect("write fixture file");
    }
}

/// Shim for `version`, optionally requiring `next`
pub fn shim(version: &str, next: Option<&str>) -> String {
    let mut contents = format!(
        "{}\n(** Compatibility file for making Coq act similar to Coq v{} *)\n",
        HEADER, version
    );
    if let Some(next) = next {
        contents.push_str(&format!("\nRequire Export Coq.Compat.{}.\n", next));
    }
    contents
}
