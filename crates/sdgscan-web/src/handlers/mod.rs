pub mod admin;
pub mod extract;
pub mod index;
pub mod report;
pub mod webhook;
