pub mod auth;
pub mod projects;
pub mod stats;
pub mod subscription;
pub mod tasks;
pub mod tenants;
pub mod users;
