pub mod contract;
pub mod error;
pub mod execute;
pub mod ledger;
pub mod msg;
pub mod policy;
pub mod query;
pub mod state;
