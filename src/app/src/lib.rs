//! Core of the rameplayer admin console
//!
//! Validates an edited settings draft, translates it into the record the
//! device stores and runs the save workflow against the collaborators in
//! [`ports`].

pub mod orchestrator;
pub mod ports;
pub mod types;
pub mod validation;

pub use crate::{
    orchestrator::{
        SaveOrchestrator, SaveOutcome, SaveState, SAVE_INTERRUPTED, SAVE_SUCCESS_MESSAGE,
    },
    types::*,
    validation::{validate, FieldTag},
};
