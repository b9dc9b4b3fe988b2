pub mod categorize;
pub mod config;
pub mod db;
pub mod model;
pub mod nlp;
pub mod worker;
