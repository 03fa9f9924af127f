// src/models/mod.rs
pub mod catalog;
pub mod notification;
pub mod request;
pub mod user;

pub use catalog::*;
pub use notification::*;
pub use request::*;
pub use user::*;
