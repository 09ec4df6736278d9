// src/handlers/mod.rs

pub mod avatar;
pub mod category;
pub mod docs;
pub mod question;
