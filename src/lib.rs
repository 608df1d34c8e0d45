pub mod analyzers;
pub mod cli;
pub mod config;
pub mod model;
pub mod report;
pub mod service;
pub mod store;
