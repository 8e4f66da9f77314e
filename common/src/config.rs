use std::path::PathBuf;

/// Port the responder binds when nothing else is decided at build time.
pub const DEFAULT_PORT: u16 = 8000;

pub struct Config {
    /// Port the static responder binds on all interfaces.
    pub port: u16,
    /// Directory served as the site root.
    pub root: PathBuf,
}
