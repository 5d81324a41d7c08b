// Library for tests to access modules

pub mod cli;
pub mod config;
pub mod docker_repo;
pub mod format;
pub mod models;
pub mod report;
pub mod session;
pub mod sorter;
pub mod ui;
pub mod version;
pub mod worker;
