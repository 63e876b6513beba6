pub mod app;
pub mod domain;
pub mod ena;
pub mod error;
pub mod manifest;
pub mod output;
pub mod store;
