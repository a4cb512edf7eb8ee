pub mod config;
pub mod genesis;

pub use config::Config;
