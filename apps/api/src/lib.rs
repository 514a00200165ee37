pub mod cancel;
pub mod config;
pub mod db;
pub mod errors;
pub mod flow;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
