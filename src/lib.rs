pub mod ai;
pub mod api;
pub mod config;
pub mod data;
pub mod db;
pub mod error;
pub mod experts;
pub mod monitoring;
pub mod writer;
