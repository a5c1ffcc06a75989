//! # Storefront Demo Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        storefront-demo                                  │
//! │                                                                         │
//! │  main.rs ────► exit code only                                          │
//! │  lib.rs  ────► tracing, config, storage, unit wiring, report           │
//! │                                                                         │
//! │  Environment:                                                           │
//! │    RUST_LOG                    log filter (default info,storefront=debug)│
//! │    STOREFRONT_OS_DARK=1        simulated OS dark mode                   │
//! │    LANG=ar_EG.UTF-8            host locale for language detection       │
//! │    STOREFRONT_CATALOG_URL      catalog endpoint                         │
//! │    STOREFRONT_FETCH_DELAY_MS   artificial loading delay                 │
//! │    STOREFRONT_STORAGE_PATH     storage file                             │
//! │    STOREFRONT_LANGUAGE         language override                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

fn main() -> ExitCode {
    storefront_demo::run()
}
