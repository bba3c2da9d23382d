//! # sqlquery
//!
//! `sqlquery` runs SQL statements (or a file of them) against a MySQL
//! database and reports the outcome as a single JSON document.

pub mod cli;
pub mod config;
pub mod error;
pub mod mysql_db;
pub mod report;
pub mod statements;
