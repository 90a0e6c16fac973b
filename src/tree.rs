//! # Search Tree Arena
//!
//! The MCTS tree lives in a single vector of nodes addressed by [`NodeId`]. Each
//! node stores its parent's index and the indices of its children in the order they
//! were expanded, so there are no owning pointers to free and no parent pointer can
//! dangle: dropping the [`SearchTree`] drops every node at once.
//!
//! ## Concurrency
//! Workers share one tree. The node vector sits behind a `parking_lot::RwLock`:
//! - selection and backpropagation hold the read lock and update the atomic
//!   `wins`/`visits` counters;
//! - expansion takes the write lock, re-checks how many children exist, and appends
//!   at most one node.
//!
//! Nodes store the move that led into them rather than a board snapshot; a worker
//! rebuilds the position by replaying moves from the root state as it descends.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

/// Index of a node inside its [`SearchTree`]
pub type NodeId = usize;

/// Nodes allocated and not yet dropped, across every tree in the process
static LIVE_NODES: AtomicUsize = AtomicUsize::new(0);

/// Number of search nodes currently alive in this process.
///
/// Every tree is discarded when its search returns, so this is zero between searches.
pub fn live_nodes() -> usize {
    LIVE_NODES.load(Ordering::SeqCst)
}

/// Id of the root node in every tree
pub const ROOT: NodeId = 0;

/// Small constant keeping UCT finite for never-visited children
pub const UCT_EPSILON: f64 = 1e-6;

/// A node in the Monte Carlo Search Tree.
pub struct Node<M, P> {
    parent: Option<NodeId>,
    /// Move that produced this node from its parent; `None` for the root
    mv: Option<M>,
    /// Side to move in this node's position
    player_to_move: P,
    children: Vec<NodeId>,
    /// Simulations won by the side that moved into this node
    wins: AtomicU32,
    visits: AtomicU32,
}

impl<M, P> Node<M, P> {
    fn new(parent: Option<NodeId>, mv: Option<M>, player_to_move: P) -> Self {
        LIVE_NODES.fetch_add(1, Ordering::SeqCst);
        Node {
            parent,
            mv,
            player_to_move,
            children: Vec::new(),
            wins: AtomicU32::new(0),
            visits: AtomicU32::new(0),
        }
    }

    fn wins(&self) -> u32 {
        self.wins.load(Ordering::Relaxed)
    }

    fn visits(&self) -> u32 {
        self.visits.load(Ordering::Relaxed)
    }
}

impl<M, P> Drop for Node<M, P> {
    fn drop(&mut self) {
        LIVE_NODES.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Outcome of an expansion attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion<M> {
    /// A new child was appended for this move
    Created(NodeId, M),
    /// Every legal move already has a child
    Full,
}

/// Wins and visits of one node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeStats {
    pub wins: u32,
    pub visits: u32,
}

/// Arena holding one search tree
pub struct SearchTree<M, P> {
    nodes: RwLock<Vec<Node<M, P>>>,
}

impl<M: Copy, P: Copy + PartialEq> SearchTree<M, P> {
    /// A single-node tree for a position where `player_to_move` is about to play
    pub fn new(player_to_move: P) -> Self {
        SearchTree {
            nodes: RwLock::new(vec![Node::new(None, None, player_to_move)]),
        }
    }

    /// Pre-sizes the arena; a search adds at most one node per simulation
    pub fn with_capacity(player_to_move: P, capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(Node::new(None, None, player_to_move));
        SearchTree {
            nodes: RwLock::new(nodes),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.nodes.read()[id].children.len()
    }

    /// Children of `id` in expansion order
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes.read()[id].children.clone()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.read()[id].parent
    }

    /// Move leading into `id`; `None` for the root
    pub fn move_of(&self, id: NodeId) -> Option<M> {
        self.nodes.read()[id].mv
    }

    pub fn stats(&self, id: NodeId) -> NodeStats {
        let nodes = self.nodes.read();
        NodeStats {
            wins: nodes[id].wins(),
            visits: nodes[id].visits(),
        }
    }

    /// Child of `id` with the highest UCT score, first one wins ties.
    ///
    /// `UCT = wins / (visits + ε) + sqrt(2 · ln(parent_visits + 1) / (visits + ε))`
    pub fn best_child(&self, id: NodeId) -> Option<NodeId> {
        let nodes = self.nodes.read();
        let parent_visits = nodes[id].visits() as f64;
        let mut best: Option<(NodeId, f64)> = None;
        for &child in &nodes[id].children {
            let score = uct(nodes[child].wins(), nodes[child].visits(), parent_visits);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((child, score));
            }
        }
        best.map(|(child, _)| child)
    }

    /// Adds the child for the first legal move that has none yet.
    ///
    /// Children are always created in `legal_moves` order, so the next unexplored
    /// move is `legal_moves[child_count]`. `player_after` gives the side to move once
    /// that move is played.
    pub fn expand<F>(&self, id: NodeId, legal_moves: &[M], player_after: F) -> Expansion<M>
    where
        F: FnOnce(&M) -> P,
    {
        let mut nodes = self.nodes.write();
        let explored = nodes[id].children.len();
        let Some(&mv) = legal_moves.get(explored) else {
            return Expansion::Full;
        };
        let child = nodes.len();
        nodes.push(Node::new(Some(id), Some(mv), player_after(&mv)));
        nodes[id].children.push(child);
        Expansion::Created(child, mv)
    }

    /// Records one simulation result on `leaf` and every ancestor up to the root.
    ///
    /// A node's win counter goes up whenever the result is not a win for the side
    /// to move at that node, which makes draws count for every node on the path.
    pub fn backpropagate(&self, leaf: NodeId, winner: Option<P>) {
        let nodes = self.nodes.read();
        let mut current = Some(leaf);
        while let Some(id) = current {
            let node = &nodes[id];
            node.visits.fetch_add(1, Ordering::Relaxed);
            if winner != Some(node.player_to_move) {
                node.wins.fetch_add(1, Ordering::Relaxed);
            }
            current = node.parent;
        }
    }
}

/// UCT score of a child with the given statistics
pub fn uct(wins: u32, visits: u32, parent_visits: f64) -> f64 {
    let visits = visits as f64 + UCT_EPSILON;
    wins as f64 / visits + (2.0 * (parent_visits + 1.0).ln() / visits).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Debug)]
    enum Side {
        A,
        B,
    }

    fn flip(side: Side) -> Side {
        match side {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    #[test]
    fn test_expand_in_order_until_full() {
        let tree: SearchTree<u8, Side> = SearchTree::new(Side::A);
        let legal = [3u8, 5, 7];
        assert_eq!(tree.expand(0, &legal, |_| Side::B), Expansion::Created(1, 3));
        assert_eq!(tree.expand(0, &legal, |_| Side::B), Expansion::Created(2, 5));
        assert_eq!(tree.expand(0, &legal, |_| Side::B), Expansion::Created(3, 7));
        assert_eq!(tree.expand(0, &legal, |_| Side::B), Expansion::Full);
        assert_eq!(tree.children(0), vec![1, 2, 3]);
        assert_eq!(tree.parent(2), Some(0));
        assert_eq!(tree.move_of(3), Some(7));
        assert_eq!(tree.move_of(0), None);
    }

    #[test]
    fn test_backpropagate_sign_convention() {
        let tree: SearchTree<u8, Side> = SearchTree::new(Side::A);
        let Expansion::Created(child, _) = tree.expand(0, &[0], |_| flip(Side::A)) else {
            panic!("expected a new child");
        };
        let Expansion::Created(grandchild, _) = tree.expand(child, &[1], |_| Side::A) else {
            panic!("expected a new child");
        };

        // A won: credited where B is to move (the child), not where A is to move.
        tree.backpropagate(grandchild, Some(Side::A));
        assert_eq!(tree.stats(grandchild), NodeStats { wins: 0, visits: 1 });
        assert_eq!(tree.stats(child), NodeStats { wins: 1, visits: 1 });
        assert_eq!(tree.stats(0), NodeStats { wins: 0, visits: 1 });

        // A draw is credited everywhere
        tree.backpropagate(grandchild, None);
        assert_eq!(tree.stats(grandchild), NodeStats { wins: 1, visits: 2 });
        assert_eq!(tree.stats(child), NodeStats { wins: 2, visits: 2 });
        assert_eq!(tree.stats(0), NodeStats { wins: 1, visits: 2 });
    }

    #[test]
    fn test_best_child_prefers_first_on_ties() {
        let tree: SearchTree<u8, Side> = SearchTree::new(Side::A);
        let legal = [0u8, 1, 2];
        for _ in 0..3 {
            tree.expand(0, &legal, |_| Side::B);
        }
        assert_eq!(tree.best_child(0), Some(1));

        // Give the last child a win: it now leads
        tree.backpropagate(1, Some(Side::B));
        tree.backpropagate(2, Some(Side::B));
        tree.backpropagate(3, Some(Side::A));
        assert_eq!(tree.best_child(0), Some(3));
    }

    #[test]
    fn test_best_child_of_leaf_is_none() {
        let tree: SearchTree<u8, Side> = SearchTree::new(Side::A);
        assert_eq!(tree.best_child(0), None);
    }

    #[test]
    fn test_uct_unvisited_child_dominates() {
        assert!(uct(0, 0, 10.0) > uct(10, 10, 10.0));
        assert!(uct(0, 0, 0.0).is_finite());
    }
}
