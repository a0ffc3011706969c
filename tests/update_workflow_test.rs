mod fixtures;

use fixtures::{shim, CoqTree};
use update_compat::cli::{run_update, UpdateArgs, UpdateReport, Workspace};
use update_compat::config::Layout;
use update_compat::domain::CompatVersion;
use update_compat::git::{MockVersionControl, VcsCall};
use update_compat::updaters::DispatchTable;
use update_compat::UpdateCompatError;

fn release() -> UpdateArgs {
    UpdateArgs {
        release: true,
        ..UpdateArgs::default()
    }
}

fn run(
    tree: &CoqTree,
    args: &UpdateArgs,
    vcs: &MockVersionControl,
) -> update_compat::Result<UpdateReport> {
    let workspace = Workspace::load(tree.root(), Layout::default())?;
    run_update(args, &workspace, vcs)
}

fn versions(list: &[&str]) -> Vec<CompatVersion> {
    list.iter().map(|s| CompatVersion::parse(s).unwrap()).collect()
}

#[test]
fn test_release_run_drops_oldest_version() {
    let tree = CoqTree::new();
    let vcs = MockVersionControl::new();

    let report = run(&tree, &release(), &vcs).expect("release run");

    assert_eq!(report.known, versions(&["8.10", "8.11", "8.12", "8.13"]));
    assert_eq!(report.window.versions(), versions(&["8.11", "8.12", "8.13"]).as_slice());
    assert_eq!(report.dropped, versions(&["8.10"]));
    assert_eq!(report.window.len(), 2 + 1);
}

#[test]
fn test_release_run_updates_shims() {
    let tree = CoqTree::new();
    run(&tree, &release(), &MockVersionControl::new()).unwrap();

    assert!(!tree.exists("theories/Compat/Coq810.v"));
    assert_eq!(
        tree.read("theories/Compat/Coq810.v.bak"),
        shim("8.10", Some("Coq811"))
    );
    assert_eq!(tree.read("theories/Compat/Coq811.v"), shim("8.11", Some("Coq812")));
    assert_eq!(tree.read("theories/Compat/Coq812.v"), shim("8.12", Some("Coq813")));
    assert!(!tree.read("theories/Compat/Coq813.v").contains("Require Export"));
}

#[test]
fn test_release_run_updates_dispatch_table() {
    let tree = CoqTree::new();
    run(&tree, &release(), &MockVersionControl::new()).unwrap();

    let coqargs = tree.read("sysinit/coqargs.ml");
    let table = DispatchTable::parse(std::path::Path::new("coqargs.ml"), &coqargs).unwrap();
    assert_eq!(table.cases(), &["8.13", "8.12", "8.11"]);
    assert_eq!(table.invalid(), &["8.10", "8.9", "8.8"]);
    assert!(coqargs.starts_with("let set_compat_version opts v"));
    assert!(coqargs.contains("  | s ->\n    CErrors.user_err"));
}

#[test]
fn test_release_run_regenerates_test_suite() {
    let tree = CoqTree::new();
    run(&tree, &release(), &MockVersionControl::new()).unwrap();

    assert!(!tree.exists("test-suite/success/CompatOldOldFlag.v"));
    assert_eq!(
        tree.read("test-suite/success/CompatOldFlag.v"),
        "(* -*- coq-prog-args: (\"-compat\" \"8.11\") -*- *)\n\
         (** Check that the current-minus-two compatibility flag actually requires the relevant modules. *)\n\
         Import Coq.Compat.Coq813.\n\
         Import Coq.Compat.Coq812.\n\
         Import Coq.Compat.Coq811.\n"
    );
    assert_eq!(
        tree.read("test-suite/success/CompatCurrentFlag.v"),
        "(* -*- coq-prog-args: (\"-compat\" \"8.13\") -*- *)\n\
         (** Check that the current compatibility flag actually requires the relevant modules. *)\n\
         Import Coq.Compat.Coq813.\n"
    );
}

#[test]
fn test_release_run_updates_script_index_and_notations() {
    let tree = CoqTree::new();
    let report = run(&tree, &release(), &MockVersionControl::new()).unwrap();

    let script = tree.read("test-suite/tools/update-compat/run.sh");
    assert!(script.starts_with("#!/usr/bin/env bash\n"));
    assert!(script.ends_with("dev/tools/update-compat.py --assert-unchanged --release || exit $?\n"));

    let index = tree.read("doc/stdlib/index-list.html.template");
    assert!(!index.contains("Coq810.v"));
    assert!(index.contains(
        "    theories/Compat/AdmitAxiom.v\n    theories/Compat/Coq811.v\n    theories/Compat/Coq812.v\n    theories/Compat/Coq813.v\n</dd>\n"
    ));

    let notations = tree.read("theories/Init/Notations.v");
    assert!(!notations.contains("old_pair"));
    assert!(notations.contains("new_pair"));

    assert_eq!(
        report.grep_commands,
        vec![
            r#"git grep -- '"-compat" "8.10"\|Coq810' test-suite/"#.to_string(),
            r#"git grep -- 'V8_10\|compat "8.10"'"#.to_string(),
        ]
    );
}

#[test]
fn test_second_run_is_idempotent() {
    let tree = CoqTree::new();
    let vcs = MockVersionControl::new();
    run(&tree, &release(), &vcs).unwrap();

    let check = UpdateArgs {
        assert_unchanged: true,
        ..release()
    };
    let report = run(&tree, &check, &vcs).expect("assert-unchanged after update");
    assert_eq!(report.writes, 0);
    assert_eq!(report.removals, 0);
    assert!(report.dropped.is_empty());
    assert!(report.grep_commands.is_empty());

    let rerun = run(&tree, &release(), &vcs).unwrap();
    assert_eq!(rerun.writes, 0);
    assert_eq!(rerun.removals, 0);
}

#[test]
fn test_assert_unchanged_on_stale_tree_fails_without_writing() {
    let tree = CoqTree::new();
    let check = UpdateArgs {
        assert_unchanged: true,
        ..release()
    };

    let err = run(&tree, &check, &MockVersionControl::new()).unwrap_err();
    assert!(matches!(err, UpdateCompatError::Drift { .. }));
    assert!(err.to_string().contains("Coq810.v exists!"));
    assert!(tree.exists("theories/Compat/Coq810.v"));
    assert_eq!(tree.read("sysinit/coqargs.ml"), fixtures::COQARGS);
}

#[test]
fn test_master_run_adds_new_version() {
    let tree = CoqTree::new();
    let vcs = MockVersionControl::new();
    run(&tree, &release(), &vcs).unwrap();

    let master = UpdateArgs {
        master: true,
        cur_version: Some(CompatVersion::new(8, 14)),
        ..UpdateArgs::default()
    };
    let report = run(&tree, &master, &vcs).unwrap();

    assert_eq!(
        report.window.versions(),
        versions(&["8.11", "8.12", "8.13", "8.14"]).as_slice()
    );
    assert!(report.dropped.is_empty());
    assert_eq!(tree.read("theories/Compat/Coq813.v"), shim("8.13", Some("Coq814")));
    assert_eq!(tree.read("theories/Compat/Coq814.v"), shim("8.14", None));
    assert!(tree
        .read("test-suite/success/CompatOldOldFlag.v")
        .contains("\"-compat\" \"8.11\""));
    assert!(tree
        .read("test-suite/tools/update-compat/run.sh")
        .contains("--assert-unchanged --master || exit $?"));

    let table = DispatchTable::parse(
        std::path::Path::new("coqargs.ml"),
        &tree.read("sysinit/coqargs.ml"),
    )
    .unwrap();
    assert_eq!(table.cases(), &["8.14", "8.13", "8.12", "8.11"]);
}

#[test]
fn test_git_add_stages_writes_and_removals() {
    let tree = CoqTree::new();
    let vcs = MockVersionControl::new();
    let args = UpdateArgs {
        git_add: true,
        ..release()
    };
    run(&tree, &args, &vcs).unwrap();

    let calls = vcs.calls();
    assert_eq!(
        calls.first(),
        Some(&VcsCall::Remove("theories/Compat/Coq810.v".into()))
    );
    assert!(calls.contains(&VcsCall::Add("sysinit/coqargs.ml".into())));
    assert!(calls.contains(&VcsCall::Remove(
        "test-suite/success/CompatOldOldFlag.v".into()
    )));
    assert!(calls.contains(&VcsCall::Add("theories/Init/Notations.v".into())));
}

#[test]
fn test_failing_git_does_not_abort() {
    let tree = CoqTree::new();
    let vcs = MockVersionControl::failing();
    let args = UpdateArgs {
        git_add: true,
        ..release()
    };

    let report = run(&tree, &args, &vcs).expect("staging failures are warnings");
    assert!(report.writes > 0);
    assert!(!vcs.calls().is_empty());
}

#[test]
fn test_purge_backups_after_drop() {
    let tree = CoqTree::new();
    let args = UpdateArgs {
        purge_backups: true,
        ..release()
    };
    run(&tree, &args, &MockVersionControl::new()).unwrap();

    assert!(!tree.exists("theories/Compat/Coq810.v"));
    assert!(!tree.exists("theories/Compat/Coq810.v.bak"));
}

#[test]
fn test_corrupted_dispatch_table_aborts() {
    let tree = CoqTree::new();
    tree.write(
        "sysinit/coqargs.ml",
        &fixtures::COQARGS.replace("  | (\"8.9\" | \"8.8\") as s ->", "  | _ -> assert false"),
    );

    let err = run(&tree, &release(), &MockVersionControl::new()).unwrap_err();
    assert!(matches!(err, UpdateCompatError::Structure { .. }));
    assert!(err.to_string().contains("sysinit/coqargs.ml"));
}

#[test]
fn test_missing_doc_index_anchor_aborts() {
    let tree = CoqTree::new();
    tree.write(
        "doc/stdlib/index-list.html.template",
        &fixtures::DOC_INDEX.replace("    theories/Compat/AdmitAxiom.v\n", ""),
    );

    let err = run(&tree, &release(), &MockVersionControl::new()).unwrap_err();
    assert!(err.to_string().contains("AdmitAxiom"));
}

#[test]
fn test_too_few_known_versions() {
    let tree = CoqTree::new();
    let args = UpdateArgs {
        number_of_old_versions: Some(5),
        ..release()
    };

    let err = run(&tree, &args, &MockVersionControl::new()).unwrap_err();
    assert!(matches!(err, UpdateCompatError::Version(_)));
    assert_eq!(tree.read("sysinit/coqargs.ml"), fixtures::COQARGS);
}

#[test]
fn test_relocated_shim_dir_is_listed_in_doc_index() {
    let tree = CoqTree::new();
    for name in ["AdmitAxiom.v", "Coq810.v", "Coq811.v", "Coq812.v", "Coq813.v"] {
        let contents = tree.read(&format!("theories/Compat/{}", name));
        tree.write(&format!("stdlib/theories/Compat/{}", name), &contents);
        std::fs::remove_file(tree.path(&format!("theories/Compat/{}", name))).unwrap();
    }
    tree.write(
        "doc/stdlib/index-list.html.template",
        &fixtures::DOC_INDEX.replace("    theories/", "    stdlib/theories/"),
    );

    let layout = Layout {
        shim_dir: "stdlib/theories/Compat".into(),
        doc_index_anchor: "    stdlib/theories/Compat/AdmitAxiom.v".to_string(),
        ..Layout::default()
    };
    let workspace = Workspace::load(tree.root(), layout).unwrap();
    let report = run_update(&release(), &workspace, &MockVersionControl::new()).unwrap();
    assert_eq!(report.dropped, versions(&["8.10"]));

    let index = tree.read("doc/stdlib/index-list.html.template");
    assert!(index.contains(
        "    stdlib/theories/Compat/AdmitAxiom.v\n    stdlib/theories/Compat/Coq811.v\n    stdlib/theories/Compat/Coq812.v\n    stdlib/theories/Compat/Coq813.v\n</dd>\n"
    ));
    assert!(!index.contains("\n    theories/Compat/"));
    assert!(tree.exists("stdlib/theories/Compat/Coq810.v.bak"));
}

#[test]
fn test_missing_notation_dir_completes_the_run() {
    let tree = CoqTree::new();
    let layout = Layout {
        notation_dir: "theories/Missing".into(),
        ..Layout::default()
    };
    let workspace = Workspace::load(tree.root(), layout).unwrap();

    let report = run_update(&release(), &workspace, &MockVersionControl::new())
        .expect("missing notation directory is skipped");
    assert_eq!(report.dropped, versions(&["8.10"]));
    assert_eq!(tree.read("theories/Init/Notations.v"), fixtures::NOTATIONS);
    assert!(!tree.exists("theories/Compat/Coq810.v"));
}
