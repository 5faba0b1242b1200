//! Business logic between handlers and repositories.

pub mod account_service;
pub mod feedback_service;
pub mod room_access;
pub mod room_service;
