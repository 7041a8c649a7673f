pub mod config;
pub mod error;
pub mod finance;
pub mod identity;
pub mod storage;
pub mod telemetry;
