//! Client-side data layer for the Herald job dashboard: a cached, observable
//! job query facade plus the client-local pieces around it (applied-job
//! tracking, auth sessions, theme preference, CV documents).

pub mod auth;
pub mod cache;
pub mod config;
pub mod cv;
pub mod errors;
pub mod jobs;
pub mod storage;
pub mod theme;
pub mod tracker;

pub use config::Config;
pub use errors::ApiError;
pub use jobs::JobClient;
