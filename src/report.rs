use std::fmt::Write as _;
use std::path::PathBuf;

use crate::distribute::{Distribution, GroupKind};

/// Read-only aggregate over a finished distribution. Built once by
/// [`summarize`]; rendering the same report twice yields identical bytes.
#[derive(Debug)]
pub struct GenerationReport {
    pub total_files: usize,
    pub total_dirs: usize,
    pub unique_files: usize,
    pub dupe_names: usize,
    pub dupe_instances: usize,
    pub duplicates: Vec<(String, Vec<PathBuf>)>,
}

/// Derive the report from the distributor's output. Pure; no I/O.
pub fn summarize(dist: &Distribution, total_dirs: usize) -> GenerationReport {
    let unique_files = dist
        .groups
        .iter()
        .filter(|g| g.kind == GroupKind::Unique && g.paths.len() == 1)
        .count();

    let mut duplicates = Vec::new();
    let mut dupe_instances = 0;
    for group in &dist.groups {
        if group.kind == GroupKind::Duplicate {
            dupe_instances += group.paths.len();
            duplicates.push((group.name.clone(), group.paths.clone()));
        }
    }

    GenerationReport {
        total_files: dist.instances.len(),
        total_dirs,
        unique_files,
        dupe_names: duplicates.len(),
        dupe_instances,
        duplicates,
    }
}

impl GenerationReport {
    /// The five summary lines shared by the log file and the console.
    pub fn counts_block(&self) -> String {
        format!(
            "Total files: {}\n\
             Total directories: {}\n\
             Unique files: {}\n\
             Total duplicate file names: {}\n\
             Unique duplicate file names: {}",
            self.total_files,
            self.total_dirs,
            self.unique_files,
            self.dupe_instances,
            self.dupe_names,
        )
    }

    /// Full log body: summary counts, then every duplicate name with the
    /// absolute path of each of its copies.
    pub fn render(&self) -> String {
        let mut out = self.counts_block();
        out.push_str("\n\nDuplicate files and their locations:");
        for (name, paths) in &self.duplicates {
            let _ = write!(out, "\n{name}:");
            for path in paths {
                let _ = write!(out, "\n  {}", path.display());
            }
        }
        out
    }
}
