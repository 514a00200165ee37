pub mod cancellation;
pub mod subscription;
pub mod user;
