//! # SQL Query Tester Library
//!
//! Query validation, execution, injection screening and declarative test
//! case runs against SQLite, PostgreSQL and MySQL.

pub mod app;
pub mod cases;
pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod output;
pub mod query;
pub mod report;
pub mod runner;
pub mod security;
pub mod validator;
