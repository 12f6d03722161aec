//! Build script for annil-storage.
//!
//! The migrations are embedded with `include_str!`, so rebuild when they change.

fn main() {
    println!("cargo:rerun-if-changed=migrations");
}
