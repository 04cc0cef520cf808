//! Graphviz output for value graphs.
//!
//! [`Digraph`] only assembles the DOT source; layout and rasterization are left to
//! the Graphviz `dot` program, which [`Digraph::pipe`] runs as a child process.

use std::{
    fmt::{self, Display},
    io::{self, Write},
    path::{Path, PathBuf},
    process::{Command, Stdio},
    thread,
};

use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    trace, Value,
};

/// Output format requested from the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Svg,
    Png,
    Pdf,
    /// The DOT source itself; no renderer is started.
    Dot,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Pdf => "pdf",
            Self::Dot => "dot",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Node {
        name: String,
        label: String,
        shape: Option<String>,
    },
    Edge {
        tail: String,
        head: String,
    },
}

/// A directed graph description, mirroring the node/edge calls of a Graphviz front end.
#[derive(Clone, Debug)]
pub struct Digraph {
    format: Format,
    program: PathBuf,
    graph_attr: Vec<(String, String)>,
    body: Vec<Statement>,
}

impl Default for Digraph {
    fn default() -> Self {
        Self {
            format: Format::default(),
            program: PathBuf::from("dot"),
            graph_attr: vec![],
            body: vec![],
        }
    }
}

impl Digraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Path of the Graphviz executable, `dot` on the `PATH` by default.
    pub fn program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn graph_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.graph_attr.push((key.into(), value.into()));
        self
    }

    pub fn node(&mut self, name: impl Into<String>, label: impl Into<String>, shape: Option<&str>) {
        self.body.push(Statement::Node {
            name: name.into(),
            label: label.into(),
            shape: shape.map(str::to_string),
        });
    }

    pub fn edge(&mut self, tail: impl Into<String>, head: impl Into<String>) {
        self.body.push(Statement::Edge {
            tail: tail.into(),
            head: head.into(),
        });
    }

    pub fn output_format(&self) -> Format {
        self.format
    }

    pub fn statements(&self) -> &[Statement] {
        &self.body
    }

    pub fn graph_attrs(&self) -> &[(String, String)] {
        &self.graph_attr
    }

    /// Write graphviz dot file to the given writer.
    pub fn write_dot(&self, writer: &mut impl Write) -> std::io::Result<()> {
        writeln!(writer, "digraph G {{")?;
        for (key, value) in &self.graph_attr {
            writeln!(writer, "{}={};", quote(key), quote(value))?;
        }
        for stmt in &self.body {
            match stmt {
                Statement::Node { name, label, shape } => {
                    write!(writer, "{} [label={}", quote(name), quote(label))?;
                    if let Some(shape) = shape {
                        write!(writer, " shape={}", quote(shape))?;
                    }
                    writeln!(writer, "];")?;
                }
                Statement::Edge { tail, head } => {
                    writeln!(writer, "{} -> {};", quote(tail), quote(head))?;
                }
            }
        }
        writeln!(writer, "}}")?;
        Ok(())
    }

    pub fn source(&self) -> String {
        self.to_string()
    }

    /// Runs the renderer over the DOT source and returns its output.
    ///
    /// # Errors
    ///
    /// Fails if the renderer cannot be started, exits unsuccessfully or the
    /// pipe to it breaks.
    pub fn pipe(&self) -> Result<Vec<u8>> {
        let source = self.source();
        if self.format == Format::Dot {
            return Ok(source.into_bytes());
        }

        debug!(
            program = %self.program.display(),
            format = self.format.as_str(),
            "rendering graph"
        );
        let mut child = Command::new(&self.program)
            .arg(format!("-T{}", self.format.as_str()))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| Error::RenderSpawn {
                program: self.program.clone(),
                source,
            })?;

        // Fed from its own thread so a renderer that fills stdout or stderr
        // before reading all input can't deadlock against us.
        let writer = child.stdin.take().map(|mut stdin| {
            let bytes = source.into_bytes();
            thread::spawn(move || stdin.write_all(&bytes))
        });
        let output = child.wait_with_output()?;
        let written = match writer {
            Some(handle) => handle
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("renderer stdin writer panicked"))),
            None => Ok(()),
        };

        // A renderer that quits early also breaks the pipe; its exit status wins.
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(status = %output.status, %stderr, "graph renderer failed");
            return Err(Error::RenderFailed {
                program: self.program.clone(),
                status: output.status,
                stderr,
            });
        }
        written?;
        Ok(output.stdout)
    }

    /// Renders the graph and writes the result to `path`.
    ///
    /// # Errors
    ///
    /// Same as [`Digraph::pipe`], plus failures writing the file.
    pub fn render(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.pipe()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

impl Display for Digraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = vec![];
        self.write_dot(&mut buf).map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&buf))
    }
}

fn quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Left-to-right SVG diagram of the graph rooted at `root`.
///
/// Every node becomes a record box with its label, data and grad. A node produced
/// by an operator gets an extra op box feeding it, and its operands point at that
/// op box instead of the record.
pub fn draw_dot(root: &Value) -> Digraph {
    let mut dot = Digraph::new()
        .format(Format::Svg)
        .graph_attr("rankdir", "LR");

    let (nodes, edges) = trace(root).into_parts();
    for n in &nodes {
        let uid = n.id().to_string();
        dot.node(
            &uid,
            format!("{} | data {:.4} | grad {:.4}", n.label(), n.data(), n.grad()),
            Some("record"),
        );
        if !n.op().is_empty() {
            let op_name = format!("{uid}{}", n.op());
            dot.node(&op_name, n.op(), None);
            dot.edge(op_name, uid);
        }
    }

    for (child, parent) in &edges {
        dot.edge(
            child.id().to_string(),
            format!("{}{}", parent.id(), parent.op()),
        );
    }

    debug!(statements = dot.body.len(), "built diagram");
    dot
}
