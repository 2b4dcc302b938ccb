//! pela: a terminal console for a remote log-analysis backend.
//!
//! The console collects connection details for a database host (reached
//! directly or through a jump host), discovers log files on it, submits
//! analysis runs, and manages saved profiles, recurring jobs, the audit
//! history, a statistics dashboard and a notification webhook. All heavy
//! lifting happens in the backend; this crate owns the session state and the
//! request/response contract.
pub mod activity;
pub mod cli;
pub mod config;
pub mod console;
pub mod gateway;
pub mod payload;
pub mod session;
pub mod ui;
