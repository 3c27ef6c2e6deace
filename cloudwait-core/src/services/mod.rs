//! Service layer

mod wait_service;

pub use wait_service::WaitService;
