//! Edge router for a single-page application.
//!
//! Requests for allow-listed static assets are answered from storage, every
//! other path receives the SPA root document so the client-side router can
//! resolve it. CORS preflights are answered before any path inspection.

pub mod checkout;
pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
pub mod storage;
