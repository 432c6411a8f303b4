pub mod app;
pub mod auth;
pub mod charts;
pub mod cli;
pub mod commands;
pub mod context;
pub mod pages;
pub mod procedures;
pub mod rest;
pub mod seo;
pub mod stats;
pub mod storage;
pub mod tracing;
pub mod types;
