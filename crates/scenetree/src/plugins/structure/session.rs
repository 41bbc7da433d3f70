//! Diagram sessions
//!
//! A session owns one input source and produces at most one graph from it.
//! It moves from `Unstarted` to `Generated` exactly once; the finished graph
//! is then read-only and can be rendered or exported any number of times.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, span, warn, Level};

use super::export::{ExportFormat, GraphvizExporter};
use super::parser::StructureParser;
use super::registry::NodeTypeRegistry;
use super::StructureDatabase;
use crate::core::{Database, DiagramError, Parser, Renderer};

/// File name prefix of batch inputs
pub const INPUT_PREFIX: &str = "structure_";
/// File name suffix of batch inputs
pub const INPUT_SUFFIX: &str = ".txt";

/// Outcome of [`DiagramSession::generate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateStatus {
    /// The graph was built by this call
    Generated,
    /// A previous call already built the graph; nothing changed
    AlreadyGenerated,
}

#[derive(Debug)]
enum SessionState {
    Unstarted,
    Generated(StructureDatabase),
}

/// One run of the parse-build-emit pipeline over one input source
#[derive(Debug)]
pub struct DiagramSession {
    name: String,
    tag: Option<String>,
    input: String,
    registry: Arc<NodeTypeRegistry>,
    exporter: GraphvizExporter,
    state: SessionState,
}

impl DiagramSession {
    /// Session over in-memory text
    pub fn new(
        name: impl Into<String>,
        input: impl Into<String>,
        registry: Arc<NodeTypeRegistry>,
    ) -> Self {
        Self {
            name: name.into(),
            tag: None,
            input: input.into(),
            registry,
            exporter: GraphvizExporter::new(),
            state: SessionState::Unstarted,
        }
    }

    /// Session over a file, read up to its first blank line
    ///
    /// The diagram is named after the file (see [`diagram_name`]).
    pub fn open(path: impl AsRef<Path>, registry: Arc<NodeTypeRegistry>) -> Result<Self> {
        let path = path.as_ref();
        let input = read_structure(BufReader::new(File::open(path)?))?;
        debug!(path = %path.display(), input_len = input.len(), "Read structure file");
        Ok(Self::new(diagram_name(path), input, registry))
    }

    /// Attach a run tag, reported in log fields
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_exporter(mut self, exporter: GraphvizExporter) -> Self {
        self.exporter = exporter;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_generated(&self) -> bool {
        matches!(self.state, SessionState::Generated(_))
    }

    /// Build the graph, once
    ///
    /// A second call leaves the graph untouched and reports
    /// [`GenerateStatus::AlreadyGenerated`]. On error the session stays
    /// unstarted and may be retried.
    pub fn generate(&mut self) -> Result<GenerateStatus> {
        let generate_span = span!(
            Level::INFO,
            "generate",
            diagram = %self.name,
            tag = self.tag.as_deref().unwrap_or("-")
        );
        let _enter = generate_span.enter();

        if self.is_generated() {
            warn!("Diagram already generated; ignoring repeated generate");
            return Ok(GenerateStatus::AlreadyGenerated);
        }

        let parser = StructureParser::new(Arc::clone(&self.registry));
        let mut database = StructureDatabase::new(self.name.as_str());
        parser.parse(&self.input, &mut database)?;

        info!(
            node_count = database.node_count(),
            edge_count = database.edge_count(),
            "Diagram generated"
        );
        self.state = SessionState::Generated(database);
        Ok(GenerateStatus::Generated)
    }

    /// The finished graph
    pub fn graph(&self) -> Result<&StructureDatabase, DiagramError> {
        match &self.state {
            SessionState::Generated(database) => Ok(database),
            SessionState::Unstarted => Err(DiagramError::not_generated(self.name.as_str())),
        }
    }

    /// Consume the session, keeping the finished graph
    pub fn into_graph(self) -> Result<StructureDatabase, DiagramError> {
        match self.state {
            SessionState::Generated(database) => Ok(database),
            SessionState::Unstarted => Err(DiagramError::not_generated(self.name)),
        }
    }

    pub fn render<R>(&self, renderer: &R) -> Result<R::Output>
    where
        R: Renderer<StructureDatabase>,
    {
        renderer.render(self.graph()?)
    }

    /// Export with the format implied by the extension, PNG when there is none
    ///
    /// An extension that names no export format is rejected before anything
    /// is written.
    pub fn export(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = match path.extension() {
            None => ExportFormat::default(),
            Some(ext) => ExportFormat::from_path(path).ok_or_else(|| {
                DiagramError::unsupported_format(ext.to_string_lossy())
            })?,
        };
        self.export_as(path, format)
    }

    pub fn export_as(&self, path: impl AsRef<Path>, format: ExportFormat) -> Result<()> {
        let database = self.graph()?;
        self.exporter.export(database, path.as_ref(), format)
    }
}

/// Diagram name for an input path: `structure_<name>.txt` becomes `<name>`
///
/// Other file names keep their full name minus a `.txt` suffix.
pub fn diagram_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = file_name.strip_suffix(INPUT_SUFFIX).unwrap_or(&file_name);
    let name = stem.strip_prefix(INPUT_PREFIX).unwrap_or(stem);
    if name.is_empty() {
        stem.to_string()
    } else {
        name.to_string()
    }
}

/// Read structure lines up to the first blank line
///
/// Nothing after the blank line is read or decoded.
pub fn read_structure<R: BufRead>(reader: R) -> Result<String, DiagramError> {
    let mut input = String::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim_end().is_empty() {
            break;
        }
        input.push_str(&line);
        input.push('\n');
    }
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EdgeData, ErrorKind, NodeId};
    use crate::plugins::structure::DotRenderer;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    fn session(input: &str) -> DiagramSession {
        DiagramSession::new("scene", input, Arc::new(NodeTypeRegistry::default()))
    }

    #[test]
    fn test_generate_once() {
        let mut session = session("Group\n Geode*\n");
        assert!(!session.is_generated());
        assert_eq!(session.generate().unwrap(), GenerateStatus::Generated);
        let before = session.graph().unwrap().clone();

        assert_eq!(
            session.generate().unwrap(),
            GenerateStatus::AlreadyGenerated
        );
        assert_eq!(session.graph().unwrap(), &before);
    }

    #[test]
    fn test_scenario_edges() {
        let mut session = session("Group\n Geode\n Geode*\n");
        session.generate().unwrap();
        let edges: Vec<EdgeData> = session.graph().unwrap().edges().copied().collect();
        assert_eq!(
            edges,
            vec![
                EdgeData::new(NodeId::Real(0), NodeId::Real(1)),
                EdgeData::new(NodeId::Real(1), NodeId::Real(2)),
                EdgeData::new(NodeId::Real(1), NodeId::Real(3)),
                EdgeData::new(NodeId::Real(1), NodeId::Ellipsis(3)),
            ]
        );
    }

    #[test]
    fn test_graph_before_generate_is_misuse() {
        let session = session("Group\n");
        let err = session.graph().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Misuse);
        assert!(session.render(&DotRenderer::new()).is_err());
    }

    #[test]
    fn test_export_before_generate_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scene.dot");
        let err = session("Group\n").export(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DiagramError>(),
            Some(DiagramError::NotGenerated { .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_generate_stays_unstarted() {
        let mut session = session("Sponge\n");
        let err = session.generate().unwrap_err();
        assert_eq!(
            err.downcast_ref::<DiagramError>().unwrap().kind(),
            ErrorKind::Configuration
        );
        assert!(!session.is_generated());
        assert!(session.generate().is_err());
    }

    #[test]
    fn test_export_dot_after_generate() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scene.dot");
        let mut session = session("Group\n");
        session.generate().unwrap();
        session.export(&path).unwrap();
        assert!(std::fs::read_to_string(&path)
            .unwrap()
            .contains("\"0\" -- \"1\";"));
    }

    #[test]
    fn test_export_rejects_unknown_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scene.txt");
        let mut session = session("Group\n");
        session.generate().unwrap();

        let err = session.export(&path).unwrap_err();
        match err.downcast_ref::<DiagramError>() {
            Some(DiagramError::UnsupportedFormat { extension }) => assert_eq!(extension, "txt"),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_export_gv_extension_writes_dot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scene.gv");
        let mut session = session("Group\n");
        session.generate().unwrap();
        session.export(&path).unwrap();
        assert!(std::fs::read_to_string(&path)
            .unwrap()
            .starts_with("graph \"scene\""));
    }

    #[test]
    fn test_read_structure_ignores_bytes_after_blank_line() {
        let raw: &[u8] = b"Group\n Geode\n\n\xff\xfe trailer\n";
        assert_eq!(read_structure(raw).unwrap(), "Group\n Geode\n");

        let bad: &[u8] = b"Group\n \xff\n";
        assert_eq!(read_structure(bad).unwrap_err().kind(), ErrorKind::Resource);
    }

    #[test]
    fn test_open_stops_at_blank_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("structure_terrain.txt");
        std::fs::write(&path, "Group\n Geode\n\nnot a node\n").unwrap();

        let mut session =
            DiagramSession::open(&path, Arc::new(NodeTypeRegistry::default())).unwrap();
        assert_eq!(session.name(), "terrain");
        assert_eq!(session.input(), "Group\n Geode\n");
        session.generate().unwrap();
        assert_eq!(session.graph().unwrap().node_count(), 3);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempdir().unwrap();
        let err = DiagramSession::open(
            dir.path().join("structure_gone.txt"),
            Arc::new(NodeTypeRegistry::default()),
        )
        .unwrap_err();
        assert_eq!(
            err.downcast_ref::<DiagramError>().unwrap().kind(),
            ErrorKind::Resource
        );
    }

    #[test]
    fn test_open_uses_file_name() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Switch").unwrap();
        let session =
            DiagramSession::open(file.path(), Arc::new(NodeTypeRegistry::default())).unwrap();
        assert!(!session.name().is_empty());
    }

    #[test]
    fn test_tag_and_into_graph() {
        let mut session = session("Group\n").with_tag("ab");
        assert_eq!(session.tag(), Some("ab"));
        session.generate().unwrap();
        let graph = session.into_graph().unwrap();
        assert_eq!(graph.name(), "scene");
    }

    #[test]
    fn test_diagram_name() {
        assert_eq!(diagram_name(Path::new("in/structure_city.txt")), "city");
        assert_eq!(diagram_name(Path::new("city.txt")), "city");
        assert_eq!(diagram_name(Path::new("structure_.txt")), "structure_");
        assert_eq!(diagram_name(Path::new("notes")), "notes");
    }
}
