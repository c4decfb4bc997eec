//! Init and Config commands.

use crate::config::Settings;
use crate::reload::{Domain, discover_roots};

/// Write a default settings file and list the roots it watches.
pub fn run_init(force: bool) {
    let path = match Settings::init_config_file(force) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Cannot initialize: {e}");
            std::process::exit(1);
        }
    };

    let settings = Settings::default();
    println!("Wrote {}", path.display());
    println!("Watched roots, relative to `root` ({}):", settings.root.display());
    for domain in Domain::ALL {
        println!(
            "  {:<8} {}/*.{}",
            domain.label(),
            settings.paths.for_domain(domain).display(),
            domain.extension()
        );
    }
    let prefix = &settings.engine.prefix;
    println!("Set engine.root to also watch engine built-ins (prefix {prefix:?}).");
}

/// Print the active settings and every root they resolve to.
pub fn run_config(config: &Settings) {
    match toml::to_string_pretty(config) {
        Ok(toml_str) => println!("{toml_str}"),
        Err(e) => eprintln!("Error displaying config: {e}"),
    }

    println!("# Resolved roots");
    for root in discover_roots(config) {
        let state = if root.path.is_dir() { "" } else { " (missing)" };
        println!(
            "# {:<8} {}{} prefix={:?}",
            root.domain.label(),
            root.path.display(),
            state,
            root.prefix
        );
    }
}
