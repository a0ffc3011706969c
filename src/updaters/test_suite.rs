//! Generated `-compat` flag tests
//!
//! The newest slots line up with the window, one file per version; slots
//! older than the window are removed.

use crate::config::TestSlot;
use crate::domain::VersionWindow;
use crate::error::{Result, UpdateCompatError};
use crate::sync::{Artifact, Synchronizer};

/// Placeholder replaced by the slot's version in descriptions
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Split `slots` into outdated slots and slots paired with window positions
///
/// # Returns
/// * `Ok((outdated, active))` - `active.len() == window.len()`
/// * `Err` - The window has more versions than there are slots
pub fn assign_slots<'s>(
    slots: &'s [TestSlot],
    window: &VersionWindow,
) -> Result<(&'s [TestSlot], &'s [TestSlot])> {
    if window.len() > slots.len() {
        return Err(UpdateCompatError::config(format!(
            "{} compatibility versions but only {} test-suite slots are configured",
            window.len(),
            slots.len()
        )));
    }
    Ok(slots.split_at(slots.len() - window.len()))
}

/// Contents of the test for window position `index`
pub fn test_contents(window: &VersionWindow, index: usize, description: &str) -> String {
    let versions = window.versions();
    let version = versions[index];
    let description = description.replace(VERSION_PLACEHOLDER, &version.dotted());

    let mut lines = vec![
        format!("(* -*- coq-prog-args: (\"-compat\" \"{}\") -*- *)", version),
        format!(
            "(** Check that the {} compatibility flag actually requires the relevant modules. *)",
            description
        ),
    ];
    for imported in versions[index..].iter().rev() {
        lines.push(format!("Import {}.", imported.shim_module()));
    }
    lines.push(String::new());
    lines.join("\n")
}

/// Regenerate the active tests and remove the outdated ones
pub fn update_test_suite(
    sync: &mut Synchronizer,
    slots: &[TestSlot],
    window: &VersionWindow,
) -> Result<()> {
    let (outdated, active) = assign_slots(slots, window)?;

    for (index, slot) in active.iter().enumerate() {
        let existing = sync.read(&slot.path)?;
        let desired = test_contents(window, index, &slot.description);
        sync.apply(&Artifact::new(&slot.path, existing, desired))?;
    }

    for slot in outdated {
        sync.remove_if_exists(&slot.path)?;
    }

    Ok(())
}
