use crate::graph::{
    Cost,
    ROOT,
};

/// Handle of a node stored in a [`PathArena`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PathId(usize);

/// Arena length at some point of a search, used to drop nodes of an abandoned branch.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Mark(usize);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PathNode {
    pub vertex: usize,
    pub cost_to_reach: Cost,
    pub prev: Option<PathId>,
}

/// Visited vertices chains. Every node points to its predecessor, the first
/// node of a chain is the root. Nodes are never modified once pushed, so
/// branches of a search may share a common prefix.
#[derive(Clone, Default, Debug)]
pub struct PathArena {
    nodes: Vec<PathNode>,
}

impl PathArena {
    pub fn new() -> PathArena {
        PathArena::default()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&mut self) -> PathId {
        self.push(PathNode { vertex: ROOT, cost_to_reach: 0, prev: None, })
    }

    pub fn extend(&mut self, prev: PathId, vertex: usize, edge_cost: Cost) -> PathId {
        let cost_to_reach = self.node(prev).cost_to_reach + edge_cost;
        self.push(PathNode { vertex, cost_to_reach, prev: Some(prev), })
    }

    fn push(&mut self, node: PathNode) -> PathId {
        self.nodes.push(node);
        PathId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: PathId) -> &PathNode {
        &self.nodes[id.0]
    }

    pub fn vertex(&self, id: PathId) -> usize {
        self.node(id).vertex
    }

    /// Vertex visited right before `id`, `None` for the root.
    pub fn prev_vertex(&self, id: PathId) -> Option<usize> {
        self.node(id).prev.map(|prev| self.vertex(prev))
    }

    pub fn mark(&self) -> Mark {
        Mark(self.nodes.len())
    }

    /// Forgets every node pushed after `mark` unless `keep` is one of them.
    ///
    /// Descendants are always pushed after their ancestors, so when `keep`
    /// was created before `mark` its whole chain survives the truncation.
    pub fn release(&mut self, mark: Mark, keep: Option<PathId>) {
        match keep {
            Some(PathId(index)) if index >= mark.0 =>
                (),
            _ =>
                self.nodes.truncate(mark.0),
        }
    }

    /// Iterates the chain ending at `last` back to the root.
    pub fn chain(&self, last: PathId) -> Chain<'_> {
        Chain { arena: self, next: Some(last), }
    }

    /// Closed tour `[0, .., last, 0]` for the chain ending at `last`.
    pub fn tour(&self, last: PathId) -> Vec<usize> {
        let mut tour: Vec<usize> = self.chain(last).map(|node| node.vertex).collect();
        tour.reverse();
        tour.push(ROOT);
        tour
    }
}

pub struct Chain<'a> {
    arena: &'a PathArena,
    next: Option<PathId>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a PathNode;

    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena;
        let node = arena.node(self.next?);
        self.next = node.prev;
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_accumulates_costs() {
        let mut arena = PathArena::new();
        let root = arena.root();
        let a = arena.extend(root, 2, 5);
        let b = arena.extend(a, 1, 7);

        assert_eq!(arena.node(b).cost_to_reach, 12);
        assert_eq!(arena.prev_vertex(b), Some(2));
        assert_eq!(arena.prev_vertex(root), None);
        assert_eq!(arena.chain(b).map(|node| node.vertex).collect::<Vec<_>>(), vec![1, 2, 0]);
        assert_eq!(arena.tour(b), vec![0, 2, 1, 0]);
    }

    #[test]
    fn branches_share_prefix() {
        let mut arena = PathArena::new();
        let root = arena.root();
        let a = arena.extend(root, 1, 3);
        let left = arena.extend(a, 2, 4);
        let right = arena.extend(a, 3, 1);

        assert_eq!(arena.tour(left), vec![0, 1, 2, 0]);
        assert_eq!(arena.tour(right), vec![0, 1, 3, 0]);
        assert_eq!(arena.len(), 4);
    }

    #[test]
    fn release_drops_abandoned_branch() {
        let mut arena = PathArena::new();
        let root = arena.root();
        let mark = arena.mark();
        let a = arena.extend(root, 1, 3);
        arena.extend(a, 2, 4);

        arena.release(mark, None);
        assert_eq!(arena.len(), 1);

        arena.release(mark, Some(root));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn release_keeps_referenced_branch() {
        let mut arena = PathArena::new();
        let root = arena.root();
        let mark = arena.mark();
        let a = arena.extend(root, 1, 3);
        let b = arena.extend(a, 2, 4);

        arena.release(mark, Some(b));
        assert_eq!(arena.len(), 3);
        assert_eq!(arena.tour(b), vec![0, 1, 2, 0]);
    }

    #[test]
    fn root_only_tour() {
        let mut arena = PathArena::new();
        let root = arena.root();
        assert_eq!(arena.tour(root), vec![0, 0]);
    }
}
