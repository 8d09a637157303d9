//! `--version` command.

/// Crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version_line() -> String {
    format!("adaptive-delivery {}", VERSION)
}

/// Print the version string.
pub fn handle_version_command() {
    println!("{}", version_line());
}
