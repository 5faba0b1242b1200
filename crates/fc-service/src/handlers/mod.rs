//! HTTP request handlers for the Feedback Collector.

pub mod auth_handler;
pub mod feedback_handler;
pub mod health;
pub mod metrics;
pub mod room_handler;

pub use auth_handler::{handle_login, handle_me, handle_register};
pub use feedback_handler::{handle_list_feedback, handle_submit_feedback};
pub use health::{health_check, readiness_check};
pub use metrics::metrics_handler;
pub use room_handler::{handle_create_room, handle_get_room, handle_join_room, handle_list_rooms};
