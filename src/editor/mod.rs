//! Editing session and the user-level operations it exposes.

pub(crate) mod clipboard;
pub(crate) mod import;
pub(crate) mod session;
pub(crate) mod style;
