//! The stdin/stdout control protocol spoken with the host control process.

pub mod methods;
pub mod params;
pub mod protocol;
pub mod server;
