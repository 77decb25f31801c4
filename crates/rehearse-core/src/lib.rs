//! rehearse-core — Interview session controller, scoring, and aggregation.
//!
//! This crate owns the question bank, the per-answer scorer, the session
//! state machine, and the report it produces when an interview completes.
//! Dictation sources plug in through the [`capture`] traits.

pub mod aggregate;
pub mod bank;
pub mod capture;
pub mod error;
pub mod model;
pub mod report;
pub mod scoring;
pub mod session;
