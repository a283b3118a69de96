//! Build script for wsd-dashboard.
//!
//! Reads `fixtures/watersheds.json`, copies it and every data file it names
//! into `OUT_DIR`, and writes `embedded_sources.rs` listing them so the app
//! can embed them via `include_bytes!` at compile time. A missing data file
//! is left out with a warning; the registry reports it as a load failure.

use serde::Deserialize;
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const FIXTURES: &str = "../fixtures";
const CONFIG: &str = "watersheds.json";

#[derive(Deserialize)]
struct Watershed {
    et: Option<String>,
    discharge: Option<String>,
    geometry: Option<String>,
}

#[derive(Deserialize)]
struct Config {
    #[serde(default)]
    watersheds: Vec<Watershed>,
}

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let out = Path::new(&out_dir);
    let config_src = Path::new(FIXTURES).join(CONFIG);
    let config_dest = out.join(CONFIG);
    println!("cargo:rerun-if-changed={}", config_src.display());
    println!("cargo:rerun-if-changed=build.rs");

    let config_json = match fs::read_to_string(&config_src) {
        Ok(json) => json,
        Err(_) => {
            println!(
                "cargo:warning=Config {} not found, using empty placeholder",
                config_src.display()
            );
            r#"{"watersheds": []}"#.to_string()
        }
    };
    fs::write(&config_dest, &config_json).unwrap();

    let config: Config = serde_json::from_str(&config_json).unwrap_or_else(|e| {
        panic!("Invalid {}: {}", config_src.display(), e);
    });

    let mut sources = String::new();
    for ws in &config.watersheds {
        for rel in [&ws.et, &ws.discharge, &ws.geometry].into_iter().flatten() {
            let src = Path::new(FIXTURES).join(rel);
            println!("cargo:rerun-if-changed={}", src.display());
            if !src.exists() {
                println!(
                    "cargo:warning=Fixture file {} not found, it will not be bundled",
                    src.display()
                );
                continue;
            }
            let dest = out.join("data").join(rel);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::copy(&src, &dest).unwrap_or_else(|e| {
                panic!("Failed to copy {} to {}: {}", src.display(), dest.display(), e);
            });
            writeln!(
                sources,
                "    ({:?}, include_bytes!({:?})),",
                rel,
                dest.display().to_string()
            )
            .unwrap();
        }
    }

    let generated = format!(
        "/// Dashboard configuration as bundled.\n\
         pub const EMBEDDED_CONFIG: &str = include_str!({:?});\n\n\
         /// `(configured path, file bytes)` for every bundled data file.\n\
         pub static EMBEDDED_SOURCES: &[(&str, &[u8])] = &[\n{}];\n",
        config_dest.display().to_string(),
        sources
    );
    fs::write(out.join("embedded_sources.rs"), generated).unwrap();
}
