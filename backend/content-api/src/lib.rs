//! Vidora content-api
//!
//! CRUD backend for the Vidora social/video platform: tweets, videos, and
//! the subscription data model, behind a bearer-credential gate. Handlers
//! validate input, services own the domain rules, repositories talk to
//! Postgres, and every response goes out in the uniform API envelope.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod response;
pub mod services;
pub mod storage;
