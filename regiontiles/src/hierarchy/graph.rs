//! Region-type graph stored as an arena of nodes.

use std::collections::HashMap;

use super::HierarchyError;

/// Index of a region type in a [`RegionTypeGraph`].
pub type TypeIndex = usize;

#[derive(Debug, Clone)]
struct Node {
    name: String,
    children: Vec<TypeIndex>,
}

/// Directed parent → child graph of region types.
///
/// Nodes live in a single `Vec` and refer to their children by index, so the
/// graph owns every node exactly once regardless of how many parents a
/// region type has.
#[derive(Debug, Clone, Default)]
pub struct RegionTypeGraph {
    nodes: Vec<Node>,
    index: HashMap<String, TypeIndex>,
}

/// A root-to-leaf chain of region type names.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct HierarchyPath(Vec<String>);

impl HierarchyPath {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn types(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl RegionTypeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from `(parent, child)` edges.
    ///
    /// Repeated edges are ignored.
    pub fn from_edges<I, P, C>(edges: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: AsRef<str>,
        C: AsRef<str>,
    {
        let mut graph = Self::new();
        for (parent, child) in edges {
            graph.add_edge(parent.as_ref(), child.as_ref());
        }
        graph
    }

    /// Index of `name`, creating its node on first use.
    pub fn node(&mut self, name: &str) -> TypeIndex {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(Node {
            name: name.to_string(),
            children: Vec::new(),
        });
        self.index.insert(name.to_string(), idx);
        idx
    }

    pub fn add_edge(&mut self, parent: &str, child: &str) {
        let parent = self.node(parent);
        let child = self.node(child);
        let children = &mut self.nodes[parent].children;
        if !children.contains(&child) {
            children.push(child);
        }
    }

    /// Number of distinct region types.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn name(&self, idx: TypeIndex) -> &str {
        &self.nodes[idx].name
    }

    pub fn lookup(&self, name: &str) -> Option<TypeIndex> {
        self.index.get(name).copied()
    }

    pub fn children(&self, idx: TypeIndex) -> &[TypeIndex] {
        &self.nodes[idx].children
    }

    /// All region type names, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.name.as_str())
    }

    /// Region types that never appear as a child, sorted by name.
    pub fn roots(&self) -> Vec<TypeIndex> {
        let mut is_child = vec![false; self.nodes.len()];
        for node in &self.nodes {
            for &child in &node.children {
                is_child[child] = true;
            }
        }

        let mut roots: Vec<TypeIndex> = (0..self.nodes.len()).filter(|&i| !is_child[i]).collect();
        roots.sort_by(|&a, &b| self.name(a).cmp(self.name(b)));
        roots
    }

    /// Fail with the offending chain if any region type is its own ancestor.
    pub fn check_acyclic(&self) -> Result<(), HierarchyError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            OnStack,
            Done,
        }

        let mut marks = vec![Mark::Unvisited; self.nodes.len()];

        for start in 0..self.nodes.len() {
            if marks[start] != Mark::Unvisited {
                continue;
            }

            // Iterative DFS: (node, next child position)
            let mut stack: Vec<(TypeIndex, usize)> = vec![(start, 0)];
            marks[start] = Mark::OnStack;

            while let Some(top) = stack.last_mut() {
                let (node, position) = *top;
                let children = &self.nodes[node].children;
                if position == children.len() {
                    marks[node] = Mark::Done;
                    stack.pop();
                    continue;
                }

                top.1 += 1;
                let child = children[position];

                match marks[child] {
                    Mark::Unvisited => {
                        marks[child] = Mark::OnStack;
                        stack.push((child, 0));
                    }
                    Mark::OnStack => {
                        let cycle_start = stack
                            .iter()
                            .position(|&(n, _)| n == child)
                            .unwrap_or(0);
                        let mut cycle: Vec<String> = stack[cycle_start..]
                            .iter()
                            .map(|&(n, _)| self.name(n).to_string())
                            .collect();
                        cycle.push(self.name(child).to_string());
                        return Err(HierarchyError::Cycle { cycle });
                    }
                    Mark::Done => {}
                }
            }
        }

        Ok(())
    }

    /// Every root-to-leaf path, found by breadth-first expansion.
    ///
    /// Each round extends every path whose last region type has children,
    /// branching once per child, until no path grows.
    pub fn hierarchy_paths(&self) -> Result<Vec<HierarchyPath>, HierarchyError> {
        self.check_acyclic()?;

        let mut paths: Vec<Vec<TypeIndex>> = self.roots().into_iter().map(|r| vec![r]).collect();

        loop {
            let mut grew = false;
            let mut next_paths = Vec::with_capacity(paths.len());

            for path in paths {
                let last = path[path.len() - 1];
                let children = self.children(last);
                if children.is_empty() {
                    next_paths.push(path);
                    continue;
                }

                grew = true;
                for &child in children {
                    let mut extended = path.clone();
                    extended.push(child);
                    next_paths.push(extended);
                }
            }

            paths = next_paths;
            if !grew {
                break;
            }
        }

        Ok(paths
            .into_iter()
            .map(|p| HierarchyPath(p.into_iter().map(|i| self.name(i).to_string()).collect()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(path: &HierarchyPath) -> Vec<&str> {
        path.iter().collect()
    }

    #[test]
    fn test_nodes_created_on_demand() {
        let mut graph = RegionTypeGraph::new();
        let a = graph.node("Province");
        let b = graph.node("Province");
        assert_eq!(a, b);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_duplicate_edges_are_idempotent() {
        let graph = RegionTypeGraph::from_edges([("A", "B"), ("A", "B"), ("A", "B")]);
        let a = graph.lookup("A").unwrap();
        assert_eq!(graph.children(a).len(), 1);
    }

    #[test]
    fn test_roots_exclude_children() {
        let graph = RegionTypeGraph::from_edges([("E", "F"), ("A", "B"), ("B", "D"), ("F", "D")]);
        let roots: Vec<&str> = graph.roots().into_iter().map(|r| graph.name(r)).collect();
        assert_eq!(roots, vec!["A", "E"]);
    }

    #[test]
    fn test_paths_branch_per_child() {
        let graph = RegionTypeGraph::from_edges([("A", "B"), ("B", "D"), ("A", "C")]);
        let paths = graph.hierarchy_paths().unwrap();

        let mut as_names: Vec<Vec<&str>> = paths.iter().map(names).collect();
        as_names.sort();
        assert_eq!(as_names, vec![vec!["A", "B", "D"], vec!["A", "C"]]);
    }

    #[test]
    fn test_shared_leaf_reached_from_each_root() {
        let graph = RegionTypeGraph::from_edges([("A", "D"), ("E", "D")]);
        let paths = graph.hierarchy_paths().unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|p| p.types().last().map(String::as_str) == Some("D")));
    }

    #[test]
    fn test_empty_graph_has_no_paths() {
        let graph = RegionTypeGraph::new();
        assert!(graph.hierarchy_paths().unwrap().is_empty());
    }

    #[test]
    fn test_cycle_detected() {
        let graph = RegionTypeGraph::from_edges([("Root", "A"), ("A", "B"), ("B", "A")]);
        match graph.hierarchy_paths() {
            Err(HierarchyError::Cycle { cycle }) => {
                assert_eq!(cycle, vec!["A", "B", "A"]);
            }
            other => panic!("expected cycle error, got {:?}", other),
        }
    }

    #[test]
    fn test_cycle_without_root_detected() {
        let graph = RegionTypeGraph::from_edges([("A", "B"), ("B", "A")]);
        assert!(graph.roots().is_empty());
        assert!(matches!(
            graph.check_acyclic(),
            Err(HierarchyError::Cycle { .. })
        ));
    }

    #[test]
    fn test_self_loop_detected() {
        let graph = RegionTypeGraph::from_edges([("A", "A")]);
        assert!(matches!(
            graph.check_acyclic(),
            Err(HierarchyError::Cycle { .. })
        ));
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let graph =
            RegionTypeGraph::from_edges([("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")]);
        assert!(graph.check_acyclic().is_ok());
        assert_eq!(graph.hierarchy_paths().unwrap().len(), 2);
    }
}
