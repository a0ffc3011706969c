use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use update_compat::cli::{run_update, UpdateArgs, Workspace};
use update_compat::config;
use update_compat::domain::CompatVersion;
use update_compat::git::{self, GitCommand};
use update_compat::ui;

const USAGE: &str = "USAGE: update-compat (--release | --master) [--assert-unchanged] \
[--cur-version=NN.NN] [--number-of-old-versions=NN] [--git-add] [--purge-backups]";

#[derive(clap::Parser)]
#[command(
    name = "update-compat",
    about = "Advance the window of versions supported by the -compat flag"
)]
struct Args {
    #[arg(long, help = "Set up the window sometime before branching")]
    release: bool,

    #[arg(
        long,
        help = "Set up the window right after branching and updating the version number"
    )]
    master: bool,

    #[arg(long, help = "Fail instead of writing if anything would change")]
    assert_unchanged: bool,

    #[arg(long, value_name = "X.Y", help = "Override the version declared in configure.ml")]
    cur_version: Option<CompatVersion>,

    #[arg(long, value_name = "N", help = "Number of old versions to keep")]
    number_of_old_versions: Option<usize>,

    #[arg(long, help = "Stage every written or removed file with git")]
    git_add: bool,

    #[arg(long, help = "Delete the backups left by previously dropped shims")]
    purge_backups: bool,

    #[arg(
        long,
        value_name = "DIR",
        help = "Repository root (default: discovered from the current directory)"
    )]
    root: Option<PathBuf>,

    #[arg(short, long, value_name = "FILE", help = "Custom layout file path")]
    config: Option<PathBuf>,
}

impl Args {
    fn update_args(&self) -> UpdateArgs {
        UpdateArgs {
            release: self.release,
            master: self.master,
            assert_unchanged: self.assert_unchanged,
            cur_version: self.cur_version,
            number_of_old_versions: self.number_of_old_versions,
            git_add: self.git_add,
            purge_backups: self.purge_backups,
        }
    }
}

fn main() -> Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            use clap::error::ErrorKind;
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                e.exit();
            }
            eprintln!("{}\n", USAGE);
            let _ = e.print();
            std::process::exit(1);
        }
    };

    let update_args = args.update_args();
    if let Err(e) = update_args.validate() {
        eprintln!("{}\n", USAGE);
        ui::display_error(&e.to_string());
        std::process::exit(1);
    }

    let root = match args.root.clone() {
        Some(root) => root,
        None => match git::discover_root(Path::new(".")) {
            Ok(root) => root,
            Err(e) => {
                ui::display_error(&format!(
                    "Cannot find the repository root ({}); pass --root",
                    e
                ));
                std::process::exit(1);
            }
        },
    };

    let layout = config::load_config(args.config.as_deref(), &root)
        .context("Error loading layout")?;
    let workspace = match Workspace::load(&root, layout) {
        Ok(workspace) => workspace,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let vcs = GitCommand::new(&root);
    let report = match run_update(&update_args, &workspace, &vcs) {
        Ok(report) => report,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    if update_args.assert_unchanged {
        ui::display_success("Compatibility window is up to date");
    } else {
        ui::display_success(&format!(
            "Updated {} file(s), removed {} file(s)",
            report.writes, report.removals
        ));
    }
    ui::display_grep_hint(&report.grep_commands);

    Ok(())
}
