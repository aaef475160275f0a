//! Collaborators the save workflow reports to
//!
//! Kept apart from the HTTP layer so they can be tested on their own.

pub mod notices;
pub mod signal;
