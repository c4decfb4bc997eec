//! The six watched resource domains and their file conventions.

use std::fmt;
use std::path::{Path, PathBuf};

/// A watched resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Domain {
    Model,
    Api,
    Flow,
    Plugin,
    Table,
    Chart,
}

impl Domain {
    pub const ALL: [Domain; 6] = [
        Domain::Model,
        Domain::Api,
        Domain::Flow,
        Domain::Plugin,
        Domain::Table,
        Domain::Chart,
    ];

    /// Engine built-ins live in these domains, under a directory of the same name.
    pub const ENGINE: [Domain; 4] = [Domain::Model, Domain::Api, Domain::Flow, Domain::Table];

    pub fn label(self) -> &'static str {
        match self {
            Domain::Model => "model",
            Domain::Api => "api",
            Domain::Flow => "flow",
            Domain::Plugin => "plugin",
            Domain::Table => "table",
            Domain::Chart => "chart",
        }
    }

    /// Directory name under the engine root.
    pub fn dir_name(self) -> &'static str {
        match self {
            Domain::Model => "models",
            Domain::Api => "apis",
            Domain::Flow => "flows",
            Domain::Plugin => "plugins",
            Domain::Table => "tables",
            Domain::Chart => "charts",
        }
    }

    /// Extension of the domain's spec files.
    pub fn extension(self) -> &'static str {
        match self {
            Domain::Plugin => "so",
            _ => "json",
        }
    }

    /// Suffix of the spec file paired with a `.js` script, if the domain has scripts.
    pub fn script_spec_suffix(self) -> Option<&'static str> {
        match self {
            Domain::Flow => Some("flow.json"),
            Domain::Chart => Some("chart.json"),
            _ => None,
        }
    }

    /// Whether changes in this domain alter the served API surface.
    pub fn triggers_restart(self) -> bool {
        matches!(self, Domain::Api | Domain::Table | Domain::Chart)
    }

    /// Map an event path to the spec file it concerns.
    ///
    /// Returns `None` for files the domain does not recognize. A script is
    /// mapped to its sibling spec: `calc.js` becomes `calc.flow.json`.
    pub fn spec_path(self, path: &Path) -> Option<PathBuf> {
        let ext = path.extension().and_then(|e| e.to_str())?;
        if ext == self.extension() {
            return Some(path.to_path_buf());
        }

        let suffix = self.script_spec_suffix()?;
        if ext != "js" {
            return None;
        }
        let file_name = path.file_name()?.to_str()?;
        let stem = file_name.split_once('.').map_or(file_name, |(stem, _)| stem);
        Some(path.with_file_name(format!("{stem}.{suffix}")))
    }

    /// Whether `path` is a script rather than a spec file.
    pub fn is_script(self, path: &Path) -> bool {
        self.script_spec_suffix().is_some()
            && path.extension().and_then(|e| e.to_str()) == Some("js")
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_filter() {
        for domain in Domain::ALL {
            assert!(domain.spec_path(Path::new("/r/foo.txt")).is_none());
            assert!(domain.spec_path(Path::new("/r/noext")).is_none());
        }
        assert!(Domain::Plugin.spec_path(Path::new("/r/foo.json")).is_none());
        assert!(Domain::Model.spec_path(Path::new("/r/foo.so")).is_none());
    }

    #[test]
    fn test_script_rewrite() {
        assert_eq!(
            Domain::Flow.spec_path(Path::new("/r/sub/calc.js")),
            Some(PathBuf::from("/r/sub/calc.flow.json"))
        );
        assert_eq!(
            Domain::Chart.spec_path(Path::new("/r/sales.js")),
            Some(PathBuf::from("/r/sales.chart.json"))
        );
        // Only flows and charts pair scripts with specs
        assert!(Domain::Model.spec_path(Path::new("/r/calc.js")).is_none());
        assert!(Domain::Api.spec_path(Path::new("/r/calc.js")).is_none());
    }

    #[test]
    fn test_restart_gating() {
        let restarting: Vec<Domain> = Domain::ALL
            .into_iter()
            .filter(|d| d.triggers_restart())
            .collect();
        assert_eq!(restarting, vec![Domain::Api, Domain::Table, Domain::Chart]);
    }
}
