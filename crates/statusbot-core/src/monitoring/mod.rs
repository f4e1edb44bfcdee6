//! Status source abstractions: the endpoint snapshot model and its port.

pub mod port;
pub mod types;
