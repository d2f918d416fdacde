//! Basic graph data structure
//! - source: http://smallcultfollowing.com/babysteps/blog/2015/04/06/modeling-graphs-in-rust-using-vector-indices/

pub type NodeIndex = usize;

type EdgeIndex = usize;

#[derive(Debug, PartialEq)]
struct NodeData<V> {
    node: V,
    first_outgoing_edge: Option<EdgeIndex>,
    first_incoming_edge: Option<EdgeIndex>,
}

#[derive(Debug, PartialEq)]
struct EdgeData {
    source: NodeIndex,
    target: NodeIndex,
    next_outgoing_edge: Option<EdgeIndex>,
    next_incoming_edge: Option<EdgeIndex>,
}

#[derive(Debug, PartialEq)]
pub enum EdgeStatus {
    SelfLoop,
    AlreadyExists,
    Success,
}

#[derive(Debug, PartialEq)]
pub struct Graph<V> {
    vertices: Vec<NodeData<V>>,
    edges: Vec<EdgeData>,
}

/// Which edges to follow while walking away from a node.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Direction {
    Outgoing,
    Incoming,
}

impl<V> Graph<V> {
    /// Creates an empty `Graph` struct.
    pub fn new() -> Self {
        Self {
            edges: Vec::new(),
            vertices: Vec::new(),
        }
    }

    /// Adds a new node to the graph.
    ///
    /// Returns the `NodeIndex` to remember the node.
    pub fn add_node(&mut self, node: V) -> NodeIndex {
        let index = self.vertices.len();
        self.vertices.push(NodeData {
            node: node,
            first_outgoing_edge: None,
            first_incoming_edge: None,
        });
        index
    }

    /// Checks if a given `source` node is connected to the given `target` node.
    pub fn has_edge(&self, source: NodeIndex, target: NodeIndex) -> bool {
        self.successors(source).any(|f| f == target)
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.vertices.len()
    }

    /// Accesses the node data label behind the `node` index.
    pub fn get_node(&self, node: NodeIndex) -> Option<&V> {
        Some(&self.vertices.get(node)?.node)
    }

    /// Adds a new edge to the graph from `source` to `target`.
    ///
    /// Duplicate edges and self-loops are rejected.
    pub fn add_edge(&mut self, source: NodeIndex, target: NodeIndex) -> EdgeStatus {
        if source == target {
            return EdgeStatus::SelfLoop;
        }
        if self.has_edge(source, target) == true {
            return EdgeStatus::AlreadyExists;
        }
        let edge_index = self.edges.len();
        let next_outgoing_edge = self.vertices[source].first_outgoing_edge;
        let next_incoming_edge = self.vertices[target].first_incoming_edge;
        self.edges.push(EdgeData {
            source: source,
            target: target,
            next_outgoing_edge: next_outgoing_edge,
            next_incoming_edge: next_incoming_edge,
        });
        self.vertices[source].first_outgoing_edge = Some(edge_index);
        self.vertices[target].first_incoming_edge = Some(edge_index);
        EdgeStatus::Success
    }

    /// Returns the number of predecessors to the `target` node.
    pub fn in_degree(&self, target: NodeIndex) -> usize {
        self.predecessors(target).count()
    }

    /// Creates an iterator over the incoming nodes to the `target` node.
    pub fn predecessors(&self, target: NodeIndex) -> Neighbors<'_, V> {
        Neighbors {
            graph: self,
            current_edge_index: self.vertices[target].first_incoming_edge,
            direction: Direction::Incoming,
        }
    }

    /// Creates an iterator over the outgoing nodes from the `source` node.
    pub fn successors(&self, source: NodeIndex) -> Neighbors<'_, V> {
        Neighbors {
            graph: self,
            current_edge_index: self.vertices[source].first_outgoing_edge,
            direction: Direction::Outgoing,
        }
    }

    fn neighbors(&self, node: NodeIndex, direction: Direction) -> Neighbors<'_, V> {
        match direction {
            Direction::Outgoing => self.successors(node),
            Direction::Incoming => self.predecessors(node),
        }
    }

    /// Marks every node that can be reached from any of `starts` by following
    /// edges in `direction`, including the starting nodes themselves.
    pub fn reachable(&self, starts: &[NodeIndex], direction: Direction) -> Vec<bool> {
        let mut seen = vec![false; self.node_count()];
        let mut stack: Vec<NodeIndex> = starts.to_vec();
        while let Some(n) = stack.pop() {
            if seen[n] == true {
                continue;
            }
            seen[n] = true;
            stack.extend(self.neighbors(n, direction).filter(|m| seen[*m] == false));
        }
        seen
    }

    /// Recursively generates the in-order y-down list of nodes to print with their
    /// corresponding twig style and level of indentation.
    ///
    /// A node already on the current path is listed once more but not expanded,
    /// which keeps cycles finite.
    fn recurse_treeview(
        &self,
        target: NodeIndex,
        level: Twig,
        direction: Direction,
        path: &mut Vec<NodeIndex>,
        order: &impl Fn(&V, &V) -> std::cmp::Ordering,
    ) -> Vec<(Twig, NodeIndex)> {
        let mut traversal = vec![(level.clone(), target)];
        if path.contains(&target) == true {
            return traversal;
        }
        path.push(target);
        let mut next: Vec<NodeIndex> = self.neighbors(target, direction).collect();
        next.sort_by(|a, b| order(&self.vertices[*a].node, &self.vertices[*b].node));
        let mut tunnels = next.into_iter().peekable();
        while let Some(n) = tunnels.next() {
            // remember the order and parent branch type
            let twig_type = match tunnels.peek() {
                Some(_) => Twig::MidBranch(Some(Box::new(level.clone()))),
                None => Twig::EndLeaf(Some(Box::new(level.clone()))),
            };
            traversal.append(&mut self.recurse_treeview(n, twig_type, direction, path, order));
        }
        path.pop();
        traversal
    }

    /// Creates the in-order y-down list of nodes to display with their
    /// corresponding indentation depth and twig style.
    ///
    /// Siblings are listed in the order given by `order`.
    pub fn treeview(
        &self,
        target: NodeIndex,
        direction: Direction,
        order: impl Fn(&V, &V) -> std::cmp::Ordering,
    ) -> Vec<(Twig, NodeIndex)> {
        self.recurse_treeview(target, Twig::EndLeaf(None), direction, &mut Vec::new(), &order)
    }
}

pub struct Neighbors<'graph, V> {
    graph: &'graph Graph<V>,
    current_edge_index: Option<EdgeIndex>,
    direction: Direction,
}

impl<'graph, V> Iterator for Neighbors<'graph, V> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<NodeIndex> {
        let edge_num = self.current_edge_index?;
        let edge = &self.graph.edges[edge_num];
        match self.direction {
            Direction::Outgoing => {
                self.current_edge_index = edge.next_outgoing_edge;
                Some(edge.target)
            }
            Direction::Incoming => {
                self.current_edge_index = edge.next_incoming_edge;
                Some(edge.source)
            }
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Twig {
    MidBranch(Option<Box<Twig>>),
    EndLeaf(Option<Box<Twig>>),
}

impl Twig {
    /// Writes the indentation owed to the ancestors of a twig.
    ///
    /// A parent that is a mid-branch still has siblings below, so its column
    /// keeps a vertical bar.
    fn fmt_ancestry(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MidBranch(parent) => {
                if let Some(p) = parent {
                    p.fmt_ancestry(f)?;
                }
                write!(f, "│   ")
            }
            Self::EndLeaf(parent) => match parent {
                Some(p) => {
                    p.fmt_ancestry(f)?;
                    write!(f, "    ")
                }
                // the root does not take up a column
                None => Ok(()),
            },
        }
    }
}

impl std::fmt::Display for Twig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MidBranch(parent) => {
                if let Some(p) = parent {
                    p.fmt_ancestry(f)?;
                }
                write!(f, "├── ")
            }
            Self::EndLeaf(parent) => match parent {
                Some(p) => {
                    p.fmt_ancestry(f)?;
                    write!(f, "└── ")
                }
                None => Ok(()),
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn by_name(a: &&str, b: &&str) -> std::cmp::Ordering {
        a.cmp(b)
    }

    #[test]
    fn edges_and_degrees() {
        let mut g = Graph::new();
        let a = g.add_node("requests");
        let b = g.add_node("urllib3");
        let c = g.add_node("idna");
        assert_eq!(g.add_edge(a, b), EdgeStatus::Success);
        assert_eq!(g.add_edge(a, c), EdgeStatus::Success);
        assert_eq!(g.add_edge(a, c), EdgeStatus::AlreadyExists);
        assert_eq!(g.add_edge(a, a), EdgeStatus::SelfLoop);
        assert_eq!(g.has_edge(a, b), true);
        assert_eq!(g.has_edge(b, a), false);
        assert_eq!(g.in_degree(a), 0);
        assert_eq!(g.in_degree(c), 1);
        assert_eq!(g.predecessors(b).collect::<Vec<_>>(), vec![a]);
    }

    #[test]
    fn treeview_text() {
        let mut g = Graph::new();
        let a = g.add_node("requests");
        let b = g.add_node("urllib3");
        let c = g.add_node("idna");
        let d = g.add_node("certifi");
        g.add_edge(a, b);
        g.add_edge(a, c);
        g.add_edge(c, d);
        let tree = g.treeview(a, Direction::Outgoing, by_name);
        let text: Vec<String> = tree
            .iter()
            .map(|(t, n)| format!("{}{}", t, g.get_node(*n).unwrap()))
            .collect();
        assert_eq!(
            text,
            vec!["requests", "├── idna", "│   └── certifi", "└── urllib3"]
        );
    }

    #[test]
    fn reachable_nodes() {
        let mut g = Graph::<&str>::new();
        let a = g.add_node("a");
        let b = g.add_node("b");
        let c = g.add_node("c");
        let d = g.add_node("d");
        g.add_edge(a, b);
        g.add_edge(b, c);
        g.add_edge(c, b);
        assert_eq!(g.reachable(&[a], Direction::Outgoing), vec![true, true, true, false]);
        assert_eq!(g.reachable(&[c], Direction::Outgoing), vec![false, true, true, false]);
        assert_eq!(g.reachable(&[b], Direction::Incoming), vec![true, true, true, false]);
        assert_eq!(g.reachable(&[d], Direction::Incoming), vec![false, false, false, true]);
    }

    #[test]
    fn treeview_reverse_and_cycles() {
        let mut g = Graph::new();
        let a = g.add_node("a");
        let b = g.add_node("b");
        g.add_edge(a, b);
        g.add_edge(b, a);
        let tree = g.treeview(a, Direction::Outgoing, by_name);
        // the cycle back to 'a' is listed but not expanded again
        assert_eq!(tree.iter().map(|(_, n)| *n).collect::<Vec<_>>(), vec![a, b, a]);
        let tree = g.treeview(b, Direction::Incoming, by_name);
        assert_eq!(tree.iter().map(|(_, n)| *n).collect::<Vec<_>>(), vec![b, a, b]);
    }
}
