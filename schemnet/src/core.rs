//! Core file-level extraction logic shared by the CLI and library users.
//! No UI or editor state dependencies.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::circuit::{
    extract_circuit_with, infer_dots, report_dots, Circuit, CircuitGraph, DotReport, ExtractConfig,
    ExtractError,
};
use crate::geometry::Point;
use crate::schematic::{ElementLibrary, Schematic};

/// Suffix identifying schematic snapshot files
pub const SCHEMATIC_SUFFIX: &str = ".sch.json";

#[derive(Debug, thiserror::Error)]
pub enum SchemnetError {
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Extraction failed: {0}")]
    Extract(#[from] ExtractError),
    #[error("Junction dots do not match the schematic: {0}")]
    DotMismatch(String),
}

impl From<serde_json::Error> for SchemnetError {
    fn from(e: serde_json::Error) -> Self {
        SchemnetError::Parse(e.to_string())
    }
}

/// Options for extraction runs (CLI or library).
#[derive(Clone, Debug)]
pub struct ExtractOptions {
    /// Compare persisted dots against inferred ones
    pub check_dots: bool,
    /// Treat any dot mismatch as a failure rather than a warning
    pub strict_dots: bool,
    /// Let later same-named instances overwrite earlier ones
    pub allow_duplicate_instances: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            check_dots: true,
            strict_dots: false,
            allow_duplicate_instances: false,
        }
    }
}

impl ExtractOptions {
    fn config(&self) -> ExtractConfig {
        ExtractConfig {
            allow_duplicate_instances: self.allow_duplicate_instances,
        }
    }
}

/// Per-file extraction result
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Source snapshot, absent for in-memory schematics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    pub circuit: Circuit,
    /// Inferred junction dots
    pub dots: Vec<Point>,
    /// Persisted-vs-inferred dot comparison, when checked
    pub dot_report: Option<DotReport>,
    /// Non-fatal findings: dot mismatches and floating signals
    pub warnings: Vec<String>,
    pub stats: ExtractionStats,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionStats {
    pub signals: usize,
    pub ports: usize,
    pub internal: usize,
    pub instances: usize,
    pub connections: usize,
    pub warnings: usize,
}

impl ExtractionResult {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

fn circuit_to_stats(circuit: &Circuit, warnings: usize) -> ExtractionStats {
    let ports = circuit.ports().count();
    ExtractionStats {
        signals: circuit.signals.len(),
        ports,
        internal: circuit.signals.len() - ports,
        instances: circuit.instances.len(),
        connections: circuit.connection_count(),
        warnings,
    }
}

/// Recursively discover schematic snapshot files in a directory.
pub fn discover_schematic_files(dir: &Path) -> Result<Vec<PathBuf>, SchemnetError> {
    let mut files = Vec::new();
    walk_dir(dir, &mut files, 0)?;
    files.sort();
    Ok(files)
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>, depth: usize) -> Result<(), SchemnetError> {
    if depth > 20 {
        return Ok(());
    }
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if name.starts_with('.') || name == "node_modules" || name == "target" || name == "build" {
                continue;
            }
            walk_dir(&path, files, depth + 1)?;
        } else if path.is_file() {
            let is_schematic = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.ends_with(SCHEMATIC_SUFFIX))
                .unwrap_or(false);
            if is_schematic {
                files.push(path);
            }
        }
    }
    Ok(())
}

/// Core extraction API used by both the CLI and library users.
pub struct SchemnetCore;

impl SchemnetCore {
    /// Read a schematic snapshot from a JSON file.
    pub fn load_schematic(path: &Path) -> Result<Schematic, SchemnetError> {
        let content = std::fs::read_to_string(path)?;
        Schematic::from_json(&content)
            .map_err(|e| SchemnetError::Parse(format!("{}: {}", path.display(), e)))
    }

    /// Extract a single schematic file.
    pub fn extract_file(
        path: &Path,
        library: &ElementLibrary,
        options: &ExtractOptions,
    ) -> Result<ExtractionResult, SchemnetError> {
        let schematic = Self::load_schematic(path)?;
        let mut result = Self::extract_schematic(&schematic, library, options)?;
        result.file = Some(path.to_path_buf());
        Ok(result)
    }

    /// Extract an in-memory schematic.
    pub fn extract_schematic(
        schematic: &Schematic,
        library: &ElementLibrary,
        options: &ExtractOptions,
    ) -> Result<ExtractionResult, SchemnetError> {
        let circuit = extract_circuit_with(schematic, library, &options.config())?;
        let mut warnings = Vec::new();

        let dots = infer_dots(schematic, library)?;
        let dot_report = if options.check_dots {
            let report = report_dots(schematic, &dots);
            if options.strict_dots && !report.is_consistent() {
                return Err(SchemnetError::DotMismatch(report.messages().join("; ")));
            }
            warnings.extend(report.messages());
            Some(report)
        } else {
            None
        };

        let graph = CircuitGraph::from_circuit(&circuit)?;
        for signal in graph.floating_signals() {
            let message = format!("Signal {} connects to fewer than two instance ports", signal.name);
            warn!("{}: {}", schematic.name, message);
            warnings.push(message);
        }

        info!(
            "Extracted {} with {} signals and {} instances",
            schematic.name,
            circuit.signals.len(),
            circuit.instances.len()
        );
        let stats = circuit_to_stats(&circuit, warnings.len());
        Ok(ExtractionResult {
            file: None,
            circuit,
            dots,
            dot_report,
            warnings,
            stats,
            timestamp: Utc::now(),
        })
    }

    /// Extract every schematic snapshot in a directory.
    /// Stops at the first file that fails.
    pub fn extract_project(
        dir: &Path,
        library: &ElementLibrary,
        options: &ExtractOptions,
    ) -> Result<Vec<ExtractionResult>, SchemnetError> {
        let files = discover_schematic_files(dir)?;
        info!("Found {} schematic files in {}", files.len(), dir.display());
        let mut results = Vec::new();
        for path in files {
            results.push(Self::extract_file(&path, library, options)?);
        }
        Ok(results)
    }
}
