// Profile API: registration, updates, and completion tracking.

pub mod completion;
pub mod handlers;
pub mod repository;
