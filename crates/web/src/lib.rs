//! Bloodlink web application library.
//!
//! Exposes the application as a library so that handlers, repositories and
//! services can be reused by the CLI and exercised from tests.
//!
//! # Architecture
//!
//! - Axum web framework with server-rendered Askama templates
//! - `PostgreSQL` via sqlx for accounts, donor profiles, blood requests,
//!   the donation-request workflow and notifications
//! - Postgres-backed cookie sessions (tower-sessions)
//! - SMTP delivery via lettre for workflow emails

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
