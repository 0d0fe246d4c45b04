// src/models/mod.rs

pub mod account;
pub mod attempt;
pub mod question;
