pub mod constants;
pub mod gatt;
pub mod hid_service;
pub mod report;
