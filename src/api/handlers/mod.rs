pub mod auth;
pub mod health;
pub mod note;
pub mod tenant;
pub mod user;
