//! Bird Watch library
//!
//! This library exposes the core functionality of Bird Watch for testing
//! and for embedding in a UI shell.

pub mod app;
pub mod backend;
pub mod categories;
pub mod commands;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod services;
pub mod session;
pub mod storage;
