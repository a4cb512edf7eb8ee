mod chain;
mod compat;
mod genesis;
mod network;

pub use chain::*;
pub use compat::*;
pub use genesis::*;
pub use network::*;
