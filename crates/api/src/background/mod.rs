//! Background jobs spawned by the server entrypoint.

pub mod history_retention;
