use std::collections::HashSet;

use tracing::debug;

use crate::Value;

/// Nodes reachable from a root and the `(child, parent)` edges between them.
#[derive(Clone, Debug)]
pub struct Trace {
    nodes: Vec<Value>,
    edges: Vec<(Value, Value)>,
}

impl Trace {
    /// Every reachable node exactly once, root first, in visiting order. Never empty.
    pub fn nodes(&self) -> &[Value] {
        &self.nodes
    }

    /// One edge per child slot of each visited node, so `a + a` contributes two.
    pub fn edges(&self) -> &[(Value, Value)] {
        &self.edges
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.nodes.iter().any(|node| node.ptr_eq(value))
    }

    pub fn into_parts(self) -> (Vec<Value>, Vec<(Value, Value)>) {
        (self.nodes, self.edges)
    }
}

/// Collects the nodes and edges of the graph rooted at `root`.
///
/// Depth-first with an explicit stack, so deep chains don't exhaust the call stack.
/// Nodes are deduplicated by identity, never by their contents.
pub fn trace(root: &Value) -> Trace {
    let mut visited = HashSet::new();
    let mut trace = Trace {
        nodes: vec![],
        edges: vec![],
    };
    let mut stack = vec![root.clone()];

    while let Some(node) = stack.pop() {
        if !visited.insert(node.id()) {
            continue;
        }
        for child in node.children() {
            trace.edges.push((child.clone(), node.clone()));
        }
        // Reversed so the left operand is expanded first.
        for child in node.children().iter().rev() {
            if !visited.contains(&child.id()) {
                stack.push(child.clone());
            }
        }
        trace.nodes.push(node);
    }

    debug!(
        nodes = trace.nodes.len(),
        edges = trace.edges.len(),
        "traced value graph"
    );
    trace
}
