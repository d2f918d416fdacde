//
//  Copyright (C) 2022-2024  Chase Ruskin
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

//! The requirement graph between the distributions installed in one
//! environment.

use super::inventory::{self, Distribution, InventoryError, PackageManager};
use crate::util::graph::{Direction, Graph, NodeIndex};
use serde_derive::Serialize;
use std::collections::HashMap;

/// A nested view of one distribution and what it requires (or, reversed, what
/// requires it).
#[derive(Debug, PartialEq, Serialize)]
pub struct TreeNode {
    package_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    installed_version: Option<String>,
    dependencies: Vec<TreeNode>,
}

pub struct DependencyGraph {
    graph: Graph<Distribution>,
    index: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Reads the installed distributions and their requirements from `manager`.
    pub fn from_manager(manager: &impl PackageManager) -> Result<Self, InventoryError> {
        let installed = manager.list(false)?;
        let names: Vec<String> = installed.iter().map(|d| d.get_name().to_string()).collect();
        let requirements = manager.requirements_of(&names)?;
        Ok(Self::new(installed, requirements))
    }

    /// Builds the graph from the `installed` distributions and each one's list
    /// of required names.
    ///
    /// A required name that is not installed still becomes a node, without a
    /// version.
    pub fn new(installed: Vec<Distribution>, requirements: Vec<(String, Vec<String>)>) -> Self {
        let mut dg = Self {
            graph: Graph::new(),
            index: HashMap::new(),
        };
        installed.into_iter().for_each(|d| {
            dg.add(d);
        });
        for (name, reqs) in requirements {
            let source = dg.add(Distribution::new(&name, ""));
            for req in reqs {
                let target = dg.add(Distribution::new(&req, ""));
                dg.graph.add_edge(source, target);
            }
        }
        dg
    }

    /// Adds the distribution unless a node with its normalized name exists.
    fn add(&mut self, dist: Distribution) -> NodeIndex {
        let key = inventory::normalize_name(dist.get_name());
        match self.index.get(&key) {
            Some(i) => *i,
            None => {
                let i = self.graph.add_node(dist);
                self.index.insert(key, i);
                i
            }
        }
    }

    pub fn find(&self, name: &str) -> Option<NodeIndex> {
        self.index.get(&inventory::normalize_name(name)).copied()
    }

    /// The nodes each tree starts from.
    ///
    /// Forward trees start at distributions nothing requires; reversed trees
    /// start at distributions that require nothing. A group of distributions
    /// that only require each other is reached from neither, so the
    /// lowest-named member of each such group is added as a root too. When
    /// `package` is given, only its tree is returned (`None` if it is not in
    /// the graph).
    pub fn roots(&self, package: Option<&str>, reverse: bool) -> Option<Vec<NodeIndex>> {
        if let Some(p) = package {
            return Some(vec![self.find(p)?]);
        }
        let direction = Self::direction(reverse);
        let mut nodes: Vec<NodeIndex> = (0..self.graph.node_count()).collect();
        nodes.sort_by(|a, b| Self::by_name(&self.graph.get_node(*a), &self.graph.get_node(*b)));

        let mut roots: Vec<NodeIndex> = nodes
            .iter()
            .copied()
            .filter(|i| match direction {
                Direction::Outgoing => self.graph.in_degree(*i) == 0,
                Direction::Incoming => self.graph.successors(*i).next().is_none(),
            })
            .collect();
        let mut seen = self.graph.reachable(&roots, direction);

        let mut cyclic: Vec<(NodeIndex, Vec<bool>)> = Vec::new();
        for i in nodes {
            if seen[i] == true {
                continue;
            }
            let reach = self.graph.reachable(&[i], direction);
            reach.iter().enumerate().for_each(|(j, r)| seen[j] |= *r);
            cyclic.push((i, reach));
        }
        // a group reached from a group chosen later is drawn inside that one
        let upstream: Vec<NodeIndex> = cyclic
            .iter()
            .filter(|(i, _)| {
                cyclic
                    .iter()
                    .any(|(j, reach)| j != i && reach[*i] == true)
                    == false
            })
            .map(|(i, _)| *i)
            .collect();
        roots.extend(upstream);
        roots.sort_by(|a, b| Self::by_name(&self.graph.get_node(*a), &self.graph.get_node(*b)));
        Some(roots)
    }

    fn by_name(a: &Option<&Distribution>, b: &Option<&Distribution>) -> std::cmp::Ordering {
        let key = |d: &Option<&Distribution>| d.map(|d| d.get_name().to_lowercase());
        key(a).cmp(&key(b))
    }

    fn direction(reverse: bool) -> Direction {
        match reverse {
            false => Direction::Outgoing,
            true => Direction::Incoming,
        }
    }

    fn label(dist: &Distribution) -> String {
        match dist.get_version().is_empty() {
            true => format!("{} (not installed)", dist.get_name()),
            false => dist.to_pinned(),
        }
    }

    /// Draws the trees under `roots` as indented text, one line per node.
    pub fn render_text(&self, roots: &[NodeIndex], reverse: bool) -> Vec<String> {
        let mut lines = Vec::new();
        for root in roots {
            let tree = self.graph.treeview(*root, Self::direction(reverse), |a, b| {
                a.get_name().to_lowercase().cmp(&b.get_name().to_lowercase())
            });
            for (twig, node) in tree {
                if let Some(d) = self.graph.get_node(node) {
                    lines.push(format!("{}{}", twig, Self::label(d)));
                }
            }
        }
        lines
    }

    /// Builds the nested view under `root`.
    ///
    /// A distribution already on the current path is listed without expanding
    /// its dependencies again.
    pub fn to_tree(&self, root: NodeIndex, reverse: bool) -> Option<TreeNode> {
        self.tree_under(root, Self::direction(reverse), &mut Vec::new())
    }

    fn tree_under(
        &self,
        node: NodeIndex,
        direction: Direction,
        path: &mut Vec<NodeIndex>,
    ) -> Option<TreeNode> {
        let dist = self.graph.get_node(node)?;
        let mut tree = TreeNode {
            package_name: dist.get_name().to_string(),
            installed_version: match dist.get_version().is_empty() {
                true => None,
                false => Some(dist.get_version().to_string()),
            },
            dependencies: Vec::new(),
        };
        if path.contains(&node) == true {
            return Some(tree);
        }
        path.push(node);
        let mut next: Vec<NodeIndex> = match direction {
            Direction::Outgoing => self.graph.successors(node).collect(),
            Direction::Incoming => self.graph.predecessors(node).collect(),
        };
        next.sort_by(|a, b| Self::by_name(&self.graph.get_node(*a), &self.graph.get_node(*b)));
        tree.dependencies = next
            .into_iter()
            .filter_map(|n| self.tree_under(n, direction, path))
            .collect();
        path.pop();
        Some(tree)
    }

    /// Serializes the trees under `roots` as a json array.
    pub fn render_json(&self, roots: &[NodeIndex], reverse: bool) -> Result<String, serde_json::Error> {
        let trees: Vec<TreeNode> = roots
            .iter()
            .filter_map(|r| self.to_tree(*r, reverse))
            .collect();
        serde_json::to_string_pretty(&trees)
    }
}
