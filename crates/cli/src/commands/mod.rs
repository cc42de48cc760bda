pub mod chat;
pub mod feedback;
pub mod onboard;
pub mod status;
