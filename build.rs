//! Build script - hands esp-hal's linker scripts to the firmware binary.
//!
//! Host builds (`cargo test`) never enable the `embedded` feature, so the
//! library and its tests link normally.

use std::env;

fn main() {
    if env::var_os("CARGO_FEATURE_EMBEDDED").is_some() {
        // linkall.x pulls in the ESP32 memory layout and ROM symbols.
        println!("cargo:rustc-link-arg-bins=-Tlinkall.x");
    }
    if env::var_os("CARGO_FEATURE_DEFMT").is_some() && env::var_os("CARGO_FEATURE_EMBEDDED").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    println!("cargo:rerun-if-changed=build.rs");
}
