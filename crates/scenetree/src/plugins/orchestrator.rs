//! Batch orchestrator
//!
//! Drives one [`DiagramSession`] per `structure_*.txt` file in a directory.
//! Sessions share nothing but the read-only registry, and a failing file
//! never stops the files after it unless fail-fast is requested.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, error, info, span, warn, Level};

use crate::core::{error_kind, Database, ErrorKind};
use crate::plugins::structure::{
    diagram_name, DiagramSession, ExportFormat, GraphvizExporter, NodeTypeRegistry,
    INPUT_PREFIX, INPUT_SUFFIX,
};

/// A written artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    pub path: PathBuf,
    pub node_count: usize,
    pub edge_count: usize,
}

/// Result of processing one input file
#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub tag: Option<String>,
    pub result: Result<Artifact>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Classification of the failure, if any
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.result.as_ref().err().and_then(error_kind)
    }
}

/// Outcomes of a batch run, in input order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(FileOutcome::is_success)
    }
}

/// Runs sessions over a directory of structure files
pub struct Orchestrator {
    registry: Arc<NodeTypeRegistry>,
    exporter: GraphvizExporter,
    fail_fast: bool,
}

impl Orchestrator {
    pub fn new(registry: Arc<NodeTypeRegistry>) -> Self {
        Self {
            registry,
            exporter: GraphvizExporter::new(),
            fail_fast: false,
        }
    }

    pub fn with_exporter(mut self, exporter: GraphvizExporter) -> Self {
        self.exporter = exporter;
        self
    }

    /// Stop at the first failing file
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn registry(&self) -> &NodeTypeRegistry {
        &self.registry
    }

    /// Structure files in `dir`, sorted by path
    pub fn discover(dir: &Path) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory '{}'", dir.display()))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_input = path
                .file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.starts_with(INPUT_PREFIX) && name.ends_with(INPUT_SUFFIX))
                .unwrap_or(false);
            if is_input && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// Diagram name for an input path
    pub fn diagram_name(path: &Path) -> String {
        diagram_name(path)
    }

    /// Two-letter run tag: `aa`, `ab`, ... `zz`, then wrapping
    pub fn run_tag(index: usize) -> String {
        let first = (b'a' + ((index / 26) % 26) as u8) as char;
        let second = (b'a' + (index % 26) as u8) as char;
        [first, second].iter().collect()
    }

    /// Generate and export one file into `out_dir`
    pub fn process_file(&self, path: &Path, out_dir: &Path, format: ExportFormat) -> FileOutcome {
        self.process(path, out_dir, format, None)
    }

    fn process(
        &self,
        path: &Path,
        out_dir: &Path,
        format: ExportFormat,
        tag: Option<String>,
    ) -> FileOutcome {
        let result = self.export_file(path, out_dir, format, tag.as_deref());
        match &result {
            Ok(artifact) => info!(
                input = %path.display(),
                artifact = %artifact.path.display(),
                "Processed structure file"
            ),
            Err(e) => error!(input = %path.display(), error = %e, "Failed to process structure file"),
        }
        FileOutcome {
            input: path.to_path_buf(),
            tag,
            result,
        }
    }

    fn export_file(
        &self,
        path: &Path,
        out_dir: &Path,
        format: ExportFormat,
        tag: Option<&str>,
    ) -> Result<Artifact> {
        let mut session = DiagramSession::open(path, Arc::clone(&self.registry))?
            .with_exporter(self.exporter.clone());
        if let Some(tag) = tag {
            session = session.with_tag(tag);
        }

        session.generate()?;
        let artifact_path = out_dir.join(format!("{}.{}", session.name(), format.extension()));
        session.export_as(&artifact_path, format)?;

        let graph = session.graph()?;
        Ok(Artifact {
            name: session.name().to_string(),
            path: artifact_path,
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
        })
    }

    /// Process every structure file in `dir`
    pub fn run(&self, dir: &Path, out_dir: &Path, format: ExportFormat) -> Result<BatchReport> {
        let run_span = span!(
            Level::INFO,
            "batch_run",
            dir = %dir.display(),
            out_dir = %out_dir.display(),
            format = %format
        );
        let _enter = run_span.enter();

        let paths = Self::discover(dir)?;
        if paths.is_empty() {
            warn!("No structure files found");
        }
        fs::create_dir_all(out_dir).with_context(|| {
            format!("Failed to create output directory '{}'", out_dir.display())
        })?;

        let mut report = BatchReport::default();
        for (index, path) in paths.iter().enumerate() {
            let tag = Self::run_tag(index);
            debug!(input = %path.display(), tag = %tag, "Processing");
            let outcome = self.process(path, out_dir, format, Some(tag));
            let stop = self.fail_fast && !outcome.is_success();
            report.outcomes.push(outcome);
            if stop {
                warn!("Stopping batch after first failure");
                break;
            }
        }

        info!(
            total = report.outcomes.len(),
            failed = report.failed().count(),
            "Batch run completed"
        );
        Ok(report)
    }
}
