//! Updaters - one per artifact kind, each computing desired content and
//! handing it to the [Synchronizer](crate::sync::Synchronizer)

pub mod dispatch;
pub mod doc_index;
pub mod notations;
pub mod run_script;
pub mod shims;
pub mod test_suite;

pub use dispatch::{update_dispatch, DispatchTable};
pub use doc_index::{update_doc_index, DocIndex};
pub use notations::{prune_notations, update_notations};
pub use run_script::{update_run_script, ModeFlags};
pub use shims::{purge_backups, update_shims, ShimHeader};
pub use test_suite::update_test_suite;
