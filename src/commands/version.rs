//! Command: print version information.

/// Version embedded by the build script, else the crate version.
pub const VERSION: &str = match option_env!("LAYOUT_VERSION") {
    Some(version) => version,
    None => concat!("dev-", env!("CARGO_PKG_VERSION")),
};

/// Print the layout version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("layout {VERSION}");
}
