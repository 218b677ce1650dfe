pub mod bridge;
pub mod model;
pub mod notifications;
