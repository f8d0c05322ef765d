pub mod contract;
pub mod error;
pub mod execute;
pub mod msg;
pub mod query;
pub mod seed;
pub mod state;
