pub mod config;
pub mod debounce;
pub mod export;
pub mod model;
pub mod scoring;
pub mod session;
pub mod strategy;
