use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};

use tracing::warn;

use crate::error::{Result, TrendexError};
use crate::models::{ClosureEdge, Topic};

/// Materialize the full ancestor -> descendant relation of the taxonomy.
///
/// Single bottom-up pass: each topic's descendant set is the union of its
/// children's sets plus the children themselves. Traversal is an explicit
/// stack over an arena of topics keyed by uri, so depth never touches the
/// call stack and a parent cycle aborts the build with the offending path
/// instead of recursing unboundedly.
///
/// Malformed records recover locally: a topic without a label is skipped,
/// and a `broader` reference to a nonexistent topic demotes the child to a
/// root. Both are logged at warn level. The result is a set, so rebuilding
/// on unchanged input yields an identical value.
pub fn build_closure(topics: &[Topic]) -> Result<BTreeSet<ClosureEdge>> {
    let arena = build_arena(topics);
    let children = build_children(&arena);

    let mut descendants: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); arena.nodes.len()];
    let mut marks = vec![Mark::Unvisited; arena.nodes.len()];

    for start in 0..arena.nodes.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }
        marks[start] = Mark::InProgress;
        // frame: (node, index of the next child to resolve)
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            if let Some(&child) = children[node].get(frame.1) {
                frame.1 += 1;
                match marks[child] {
                    Mark::Unvisited => {
                        marks[child] = Mark::InProgress;
                        stack.push((child, 0));
                    }
                    Mark::InProgress => {
                        return Err(cycle_error(&stack, child, &arena.nodes));
                    }
                    Mark::Done => {}
                }
            } else {
                // All children resolved; fold their sets into this node's.
                let mut set = BTreeSet::new();
                for &child in &children[node] {
                    set.insert(child);
                    set.extend(descendants[child].iter().copied());
                }
                descendants[node] = set;
                marks[node] = Mark::Done;
                stack.pop();
            }
        }
    }

    let mut edges = BTreeSet::new();
    for (node, set) in descendants.iter().enumerate() {
        let ancestor = &arena.nodes[node].label;
        for &index in set {
            let descendant = &arena.nodes[index].label;
            if ancestor != descendant {
                edges.insert(ClosureEdge::new(ancestor.clone(), descendant.clone()));
            }
        }
    }
    Ok(edges)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

struct Arena<'a> {
    nodes: Vec<&'a Topic>,
    by_uri: HashMap<&'a str, usize>,
}

fn build_arena(topics: &[Topic]) -> Arena<'_> {
    let mut nodes: Vec<&Topic> = Vec::with_capacity(topics.len());
    let mut by_uri = HashMap::with_capacity(topics.len());
    for topic in topics {
        if topic.label.trim().is_empty() {
            warn!("skipping topic {} with missing label", topic.uri);
            continue;
        }
        match by_uri.entry(topic.uri.as_str()) {
            Entry::Occupied(_) => {
                warn!("skipping duplicate topic uri {}", topic.uri);
            }
            Entry::Vacant(slot) => {
                slot.insert(nodes.len());
                nodes.push(topic);
            }
        }
    }
    Arena { nodes, by_uri }
}

fn build_children(arena: &Arena<'_>) -> Vec<Vec<usize>> {
    let mut children = vec![Vec::new(); arena.nodes.len()];
    for (index, topic) in arena.nodes.iter().enumerate() {
        let Some(broader) = topic.broader.as_deref().filter(|uri| !uri.trim().is_empty())
        else {
            continue;
        };
        match arena.by_uri.get(broader) {
            Some(&parent) => children[parent].push(index),
            None => warn!(
                "topic {:?} references unknown parent {broader}; treating it as a root",
                topic.label
            ),
        }
    }
    children
}

fn cycle_error(stack: &[(usize, usize)], reentered: usize, nodes: &[&Topic]) -> TrendexError {
    let open = stack
        .iter()
        .position(|frame| frame.0 == reentered)
        .unwrap_or(0);
    let mut path: Vec<String> = stack[open..]
        .iter()
        .map(|frame| nodes[frame.0].label.clone())
        .collect();
    path.push(nodes[reentered].label.clone());
    TrendexError::Cycle { path }
}
