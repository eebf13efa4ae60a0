// Library for tests to access modules

pub mod classifier;
pub mod collector;
pub mod config;
pub mod inventory;
pub mod models;
pub mod probe;
pub mod routes;
pub mod snapshot;
pub mod sysinfo_repo;
