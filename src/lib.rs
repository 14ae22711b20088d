//! Back-office engine for a tuition center.
//!
//! This crate keeps the records of a small tuition center (students, fee
//! payments, exams and marks, staff, daily staff attendance and monthly
//! salaries) and derives the figures the office works from: exam rankings
//! and pass rates, attendance tallies, net salaries and the dashboard.
//!
//! Pure calculations live in [`calculation`]; [`services`] validate and
//! persist records through a [`store::RecordStore`]; [`api`] serves both
//! over HTTP.

pub mod api;
pub mod calculation;
pub mod config;
pub mod documents;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
