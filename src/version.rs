// Build-time version from Cargo.toml

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const NAME: &str = env!("CARGO_PKG_NAME");

/// "docker-stats v0.3.0", shown in the header and logged at startup.
pub fn banner() -> String {
    format!("{} v{}", NAME, VERSION)
}
