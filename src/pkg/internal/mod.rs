pub mod adaptors;
pub mod dashboard;
pub mod service;
pub mod status;
pub mod store;
