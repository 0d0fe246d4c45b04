// src/services/mod.rs

pub mod account;
pub mod assessment;
pub mod lifecycle;

pub use account::AccountService;
pub use assessment::AssessmentEngine;
pub use lifecycle::AttemptLifecycle;
