use std::collections::BTreeMap;

use crate::document::Document;
use crate::options::LoadOptions;
use crate::schema::Node;
use crate::{GltfError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneGraph {
    parents: BTreeMap<usize, usize>,
    order: Vec<usize>,
    roots: Vec<usize>,
}

impl SceneGraph {
    /// Child index to parent index. Roots have no entry.
    pub fn parents(&self) -> &BTreeMap<usize, usize> {
        &self.parents
    }

    pub fn parent_of(&self, node: usize) -> Option<usize> {
        self.parents.get(&node).copied()
    }

    /// Pre-order depth-first traversal from the root(s), children visited in
    /// the order they are listed. Every parent precedes its children.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }
}

/// Builds the scene graph of `document` under its load options.
pub fn build(document: &Document<'_>) -> Result<SceneGraph> {
    build_nodes(&document.root().nodes, document.options())
}

pub fn build_nodes(nodes: &[Node], options: &LoadOptions) -> Result<SceneGraph> {
    let parents = parent_map(nodes, options)?;

    if nodes.len() <= 1 {
        let order: Vec<usize> = (0..nodes.len()).collect();
        return Ok(SceneGraph {
            parents,
            roots: order.clone(),
            order,
        });
    }

    let roots = find_roots(nodes, &parents, options)?;
    let order = traverse(nodes, &roots)?;

    if order.len() != nodes.len() {
        let mut visited = vec![false; nodes.len()];
        for &ix in &order {
            visited[ix] = true;
        }
        if let Some(node) = (0..nodes.len()).find(|&ix| !visited[ix]) {
            // every unreachable child hangs off a loop that never meets a root
            return Err(if parents.contains_key(&node) {
                GltfError::Cycle { node }
            } else {
                GltfError::DetachedNode { node }
            });
        }
    }

    tracing::debug!(nodes = nodes.len(), roots = ?roots, "built scene graph");
    Ok(SceneGraph {
        parents,
        order,
        roots,
    })
}

fn parent_map(nodes: &[Node], options: &LoadOptions) -> Result<BTreeMap<usize, usize>> {
    let mut parents = BTreeMap::new();
    for (node_ix, node) in nodes.iter().enumerate() {
        for &child_ix in &node.children {
            if child_ix >= nodes.len() {
                return Err(GltfError::InvalidReference {
                    kind: "node",
                    index: child_ix,
                    len: nodes.len(),
                });
            }
            if child_ix == node_ix {
                return Err(GltfError::Cycle { node: node_ix });
            }
            if options.require_ascending_children && child_ix < node_ix {
                return Err(GltfError::ChildOrder {
                    parent: node_ix,
                    child: child_ix,
                });
            }
            if let Some(&first) = parents.get(&child_ix) {
                return Err(GltfError::DuplicateParent {
                    child: child_ix,
                    first,
                    second: node_ix,
                });
            }
            parents.insert(child_ix, node_ix);
        }
    }
    Ok(parents)
}

fn find_roots(
    nodes: &[Node],
    parents: &BTreeMap<usize, usize>,
    options: &LoadOptions,
) -> Result<Vec<usize>> {
    let roots: Vec<usize> = nodes
        .iter()
        .enumerate()
        .filter(|(ix, node)| {
            !parents.contains_key(ix) && (options.allow_multiple_roots || !node.children.is_empty())
        })
        .map(|(ix, _)| ix)
        .collect();

    match roots.len() {
        0 => Err(GltfError::NoRoot),
        1 => Ok(roots),
        _ if options.allow_multiple_roots => Ok(roots),
        _ => Err(GltfError::AmbiguousRoot { roots }),
    }
}

/// Explicit-stack pre-order walk. Each node is pushed at most once per parent
/// link, so the walk ends after at most `nodes.len()` visits.
fn traverse(nodes: &[Node], roots: &[usize]) -> Result<Vec<usize>> {
    let mut visited = vec![false; nodes.len()];
    let mut order = Vec::with_capacity(nodes.len());
    let mut stack: Vec<usize> = roots.iter().rev().copied().collect();

    while let Some(ix) = stack.pop() {
        if visited[ix] {
            return Err(GltfError::Cycle { node: ix });
        }
        visited[ix] = true;
        order.push(ix);
        stack.extend(nodes[ix].children.iter().rev());
    }
    Ok(order)
}
