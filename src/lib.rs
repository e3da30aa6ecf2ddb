//! Emergency Hub - state layer of an emergency reporting portal
//!
//! This library provides the stores behind the portal (authentication,
//! alerts and reports, safety guidelines, profiles, news) and the HTTP relay
//! that emails submitted reports to responders.

pub mod api;
pub mod app;
pub mod config;
pub mod fixtures;
pub mod models;
pub mod services;
pub mod storage;
