pub mod admissible;
pub mod config;
pub mod constraints;
pub mod draw;
pub mod error;
pub mod oracle;
pub mod report;
pub mod roster;
pub mod runner;
pub mod teams;
