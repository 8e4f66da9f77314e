pub mod detect;
pub mod server;
