//! Artifact export
//!
//! DOT artifacts are written directly. Images are produced by piping the DOT
//! source through the Graphviz `dot` program.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use std::str::FromStr;

use anyhow::Result;
use tracing::{debug, info, span, warn, Level};

use super::renderer::DotRenderer;
use super::StructureDatabase;
use crate::core::{DiagramError, Renderer};

/// Environment variable naming the Graphviz program
pub const DOT_PROGRAM_ENV: &str = "SCENETREE_DOT";

const DEFAULT_DOT_PROGRAM: &str = "dot";

/// Artifact format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum ExportFormat {
    Dot,
    #[default]
    Png,
    Svg,
}

impl ExportFormat {
    /// File extension, also the Graphviz `-T` argument for images
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Dot => "dot",
            ExportFormat::Png => "png",
            ExportFormat::Svg => "svg",
        }
    }

    /// Infer the format from a path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }

    pub fn is_image(&self) -> bool {
        !matches!(self, ExportFormat::Dot)
    }

    pub fn variants() -> &'static [&'static str] {
        &["dot", "png", "svg"]
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dot" | "gv" => Ok(ExportFormat::Dot),
            "png" => Ok(ExportFormat::Png),
            "svg" => Ok(ExportFormat::Svg),
            other => Err(format!(
                "Unknown export format '{}'. Valid formats: {}",
                other,
                Self::variants().join(", ")
            )),
        }
    }
}

/// Writes diagrams to disk, shelling out to Graphviz for images
#[derive(Debug, Clone)]
pub struct GraphvizExporter {
    program: String,
    renderer: DotRenderer,
}

impl GraphvizExporter {
    /// Exporter using `$SCENETREE_DOT`, or `dot` from `PATH`
    pub fn new() -> Self {
        let program = std::env::var(DOT_PROGRAM_ENV)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DOT_PROGRAM.to_string());
        Self::with_program(program)
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            renderer: DotRenderer::new(),
        }
    }

    pub fn with_renderer(mut self, renderer: DotRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Whether the Graphviz program can be started
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("-V")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Write `database` to `path` in `format`
    pub fn export(
        &self,
        database: &StructureDatabase,
        path: &Path,
        format: ExportFormat,
    ) -> Result<()> {
        let export_span = span!(
            Level::INFO,
            "export",
            diagram = database.name(),
            format = %format,
            path = %path.display()
        );
        let _enter = export_span.enter();

        let dot = self.renderer.render(database)?;

        match format {
            ExportFormat::Dot => fs::write(path, dot).map_err(DiagramError::from)?,
            ExportFormat::Png | ExportFormat::Svg => self.run_graphviz(&dot, path, format)?,
        }

        info!("Artifact written");
        Ok(())
    }

    fn run_graphviz(&self, dot: &str, path: &Path, format: ExportFormat) -> Result<(), DiagramError> {
        debug!(program = %self.program, "Spawning Graphviz");
        let mut child = Command::new(&self.program)
            .arg(format!("-T{}", format.extension()))
            .arg("-o")
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                DiagramError::render_error(format!(
                    "Cannot run Graphviz program '{}': {}",
                    self.program, e
                ))
            })?;

        let fed = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(dot.as_bytes()),
            None => Ok(()),
        };
        if let Err(e) = fed {
            // The child stopped reading; reap it before reporting
            let _ = child.kill();
            let output = child.wait_with_output()?;
            warn!(status = %output.status, error = %e, "Graphviz stopped reading its input");
            return Err(DiagramError::render_error(format!(
                "Cannot feed DOT to Graphviz '{}' ({}): {} {}",
                self.program,
                output.status,
                e,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = %output.status, "Graphviz failed");
            return Err(DiagramError::render_error(format!(
                "Graphviz '{}' failed ({}): {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

impl Default for GraphvizExporter {
    fn default() -> Self {
        Self::new()
    }
}
