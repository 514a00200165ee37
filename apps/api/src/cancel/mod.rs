pub mod handlers;
pub mod payload;
pub mod service;
pub mod variant;
