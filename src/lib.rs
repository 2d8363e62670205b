//! Startuporg - a startup tracker and blog with an admin HTTP API
//!
//! This library provides the core functionality for the startuporg service.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
