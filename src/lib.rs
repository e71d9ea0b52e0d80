pub mod api;
pub mod config;
pub mod errors;
pub mod feeds;
pub mod pages;
pub mod preview;
