pub mod backend;
pub mod config;
pub mod device;
pub mod errors;
pub mod guide;
pub mod models;
pub mod protocol;
pub mod scheduler;
pub mod ssdp;
pub mod utils;
pub mod web;
