pub mod detection_session;
pub mod infrastructure;
