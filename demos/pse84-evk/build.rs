//! Places `memory.x` on the linker search path and links the vendor BSP, TF-M interface and SRF libraries.
//!
//! `PSE84_BSP_LIB_DIR` points at the directory holding the prebuilt static libraries and `PSE84_BSP_LIBS` lists them
//! comma-separated.

use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    let out = PathBuf::from(env::var_os("OUT_DIR").unwrap());
    fs::write(out.join("memory.x"), include_bytes!("memory.x")).unwrap();
    println!("cargo:rustc-link-search={}", out.display());
    println!("cargo:rerun-if-changed=memory.x");

    println!("cargo:rerun-if-env-changed=PSE84_BSP_LIB_DIR");
    println!("cargo:rerun-if-env-changed=PSE84_BSP_LIBS");
    if let Some(dir) = env::var_os("PSE84_BSP_LIB_DIR") {
        println!("cargo:rustc-link-search=native={}", PathBuf::from(dir).display());
        let libs = env::var("PSE84_BSP_LIBS").unwrap_or_default();
        for lib in libs.split(',').map(str::trim).filter(|l| !l.is_empty()) {
            println!("cargo:rustc-link-lib=static={}", lib);
        }
    }
}
