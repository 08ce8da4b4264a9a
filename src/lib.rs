//! Library exports for the booklist client, shared between the binary and tests.

pub mod api;
pub mod config;
pub mod models;
pub mod navigation;
pub mod session;
pub mod startup;
pub mod state;
pub mod storage;
pub mod utils;
