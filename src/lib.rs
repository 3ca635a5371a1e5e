pub mod config;
pub mod notify;
pub mod reference;
pub mod resolve;
pub mod search;
pub mod version;
