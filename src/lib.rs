// Library for tests to access modules

pub mod alert_repo;
pub mod analytics;
pub mod config;
pub mod heartbeat_repo;
pub mod models;
pub mod routes;
pub mod service;
pub mod version;
