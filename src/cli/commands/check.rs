//! Check command - load every spec once and report.

use std::sync::Arc;

use crate::config::Settings;
use crate::reload::{Domain, Supervisor};
use crate::store::Registries;

/// Run the check command. Returns `false` if any spec failed to load.
pub async fn run(config: &Settings) -> bool {
    let registries = Arc::new(Registries::new());
    let supervisor = Supervisor::new(registries, None, config);
    let report = supervisor.preload(config).await;

    println!("Loaded specs:");
    for domain in Domain::ALL {
        let count = report.loaded.get(&domain).copied().unwrap_or(0);
        println!("  {:<8} {count}", domain.label());
    }

    if report.failed.is_empty() {
        println!("All {} specs loaded", report.total_loaded());
        return true;
    }

    eprintln!("{} specs failed to load:", report.failed.len());
    for failure in &report.failed {
        eprintln!("  {failure}");
    }
    false
}
