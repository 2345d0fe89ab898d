//! An arena-backed AVL tree.
//!
//! [`AvlTree`] keeps any totally ordered element type sorted under insertion
//! and removal, restoring balance with single and double rotations. Every
//! node lives in a slot arena and refers to its parent and children by index,
//! which gives each node a copyable parent back-reference without any shared
//! ownership.
//!
//! ```
//! use arena_avl::AvlTree;
//!
//! let mut tree = AvlTree::new();
//!
//! for value in [16, -35, -99] {
//!     tree.insert(value);
//! }
//!
//! assert!(!tree.insert(-35));
//! assert_eq!(tree.len(), 3);
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![-99, -35, 16]);
//!
//! assert_eq!(tree.remove(&16), Some(16));
//! assert_eq!(tree.remove(&16), None);
//! ```

// Conventions used in comments:
// - The balance factor of a node `n` is height(right(n)) - height(left(n)).
// - A node is left-heavy at a negative factor and right-heavy at a positive
//   one.
//
// The standing invariants of the tree are:
// 1. Search order: values in a node's left subtree compare less than the
//    node's value, values in its right subtree compare greater. Equal values
//    are never stored twice.
// 2. Balance: every node's factor is -1, 0, or +1. A factor may reach +/-2
//    inside a mutating call; the rotation that repairs it runs before the
//    call returns.
// 3. Linkage: every non-root node is the left or right child of its parent,
//    the matching child link points back at it, and the root has no parent.

use core::{cmp::Ordering, mem, ops::Not};
use std::borrow::Borrow;

mod arena;
mod debug;
mod iter;

#[cfg(any(test, feature = "model"))]
pub mod model;


pub use iter::Iter;

use arena::{Arena, NodeRef};

/// A self-balancing binary search tree over an ordered element type.
pub struct AvlTree<T> {
    arena: Arena<Node<T>>,
    root: Link,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Dir {
    Left = 0,
    Right = 1,
}

impl Not for Dir {
    type Output = Dir;

    fn not(self) -> Self::Output {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

type Link = Option<NodeRef>;

struct Node<T> {
    value: T,
    balance: i8,
    parent: Link,
    children: [Link; 2],
}

impl<T> Node<T> {
    fn new(value: T, parent: Link) -> Node<T> {
        Node {
            value,
            balance: 0,
            parent,
            children: [None; 2],
        }
    }

    #[inline]
    fn parent(&self) -> Link {
        self.parent
    }

    #[inline]
    fn child(&self, dir: Dir) -> Link {
        self.children[dir as usize]
    }

    #[inline]
    fn left(&self) -> Link {
        self.child(Dir::Left)
    }

    #[inline]
    fn right(&self) -> Link {
        self.child(Dir::Right)
    }

    #[inline]
    fn set_parent(&mut self, parent: Link) -> Link {
        mem::replace(&mut self.parent, parent)
    }

    #[inline]
    fn set_child(&mut self, dir: Dir, child: Link) -> Link {
        mem::replace(&mut self.children[dir as usize], child)
    }
}

impl<T: Ord> AvlTree<T> {
    /// Returns a new empty tree.
    pub const fn new() -> AvlTree<T> {
        AvlTree {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Returns `true` if the tree contains no elements.
    pub const fn is_empty(&self) -> bool {
        let empty = self.len() == 0;

        if cfg!(debug_assertions) {
            // Can't use assert_eq!() in const fn.
            assert!(empty == self.root.is_none());
        }

        empty
    }

    /// Returns the number of elements in the tree.
    pub const fn len(&self) -> usize {
        self.arena.len()
    }

    #[doc(hidden)]
    pub fn assert_invariants(&self) {
        match self.root {
            Some(root) => {
                assert!(self.node(root).parent().is_none());
                assert_eq!(self.assert_invariants_at(root), self.len());
            }
            None => assert_eq!(self.len(), 0),
        }
    }

    fn assert_invariants_at(&self, node: NodeRef) -> usize {
        let balance = self.balance_of(node);

        // Ensure the stored factor is fresh and within the invariant.
        assert_eq!(balance, self.node(node).balance);
        assert!((-1..=1).contains(&balance));

        let mut count = 1;

        for dir in [Dir::Left, Dir::Right] {
            if let Some(child) = self.node(node).child(dir) {
                // Ensure the child's parent link points back to this node.
                assert_eq!(self.node(child).parent(), Some(node));

                // Ensure search order holds across the link.
                match dir {
                    Dir::Left => assert!(self.node(child).value < self.node(node).value),
                    Dir::Right => assert!(self.node(child).value > self.node(node).value),
                }

                count += self.assert_invariants_at(child);
            }
        }

        count
    }

    /// Returns a reference to the stored value equal to `value`.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut opt_cur = self.root;

        loop {
            let cur = opt_cur?;

            match value.cmp(self.node(cur).value.borrow()) {
                Ordering::Less => opt_cur = self.node(cur).left(),
                Ordering::Equal => return Some(&self.node(cur).value),
                Ordering::Greater => opt_cur = self.node(cur).right(),
            }
        }
    }

    /// Returns `true` if the tree contains a value equal to `value`.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(value).is_some()
    }

    /// Returns the minimum element of the tree.
    pub fn first(&self) -> Option<&T> {
        self.extremum(Dir::Left).map(|node| &self.node(node).value)
    }

    /// Returns the maximum element of the tree.
    pub fn last(&self) -> Option<&T> {
        self.extremum(Dir::Right).map(|node| &self.node(node).value)
    }

    fn extremum(&self, dir: Dir) -> Link {
        let mut cur = self.root?;

        while let Some(next) = self.node(cur).child(dir) {
            cur = next;
        }

        Some(cur)
    }

    /// Returns an iterator visiting the elements in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Walks the tree in pre-order, applying `visitor` to each node.
    ///
    /// The visitor sees the node's value, its balance factor, and its
    /// parent's value through the [`NodeView`] argument. The walk is
    /// read-only and always runs to completion; a fresh call starts over
    /// from the root.
    pub fn traverse<F>(&self, mut visitor: F)
    where
        F: FnMut(NodeView<'_, T>),
    {
        self.traverse_in(self.root, &mut visitor);
    }

    fn traverse_in<F>(&self, link: Link, visitor: &mut F)
    where
        F: FnMut(NodeView<'_, T>),
    {
        let Some(node) = link else {
            return;
        };

        visitor(NodeView { tree: self, node });
        self.traverse_in(self.node(node).left(), visitor);
        self.traverse_in(self.node(node).right(), visitor);
    }

    /// Inserts a value into the tree.
    ///
    /// Returns `false`, leaving the tree untouched, if an equal value is
    /// already present.
    ///
    /// Locating the insertion point takes _O(log(n))_ time; recomputing the
    /// balance of each ancestor on the way back up brings the whole
    /// operation to _O(n)_.
    pub fn insert(&mut self, value: T) -> bool {
        match self.root {
            Some(root) => self.insert_in(root, value),
            None => {
                let root = self.arena.insert(Node::new(value, None));
                self.root = Some(root);
                true
            }
        }
    }

    fn insert_in(&mut self, cur: NodeRef, value: T) -> bool {
        let dir = match value.cmp(&self.node(cur).value) {
            Ordering::Less => Dir::Left,
            Ordering::Greater => Dir::Right,
            Ordering::Equal => return false,
        };

        match self.node(cur).child(dir) {
            // Descend.
            Some(child) => {
                if !self.insert_in(child, value) {
                    return false;
                }
            }

            // Attach the value as a leaf at the first missing link.
            None => {
                let leaf = self.arena.insert(Node::new(value, Some(cur)));
                self.node_mut(cur).set_child(dir, Some(leaf));
            }
        }

        self.rebalance(cur);
        true
    }

    /// Removes the value equal to `value` from the tree and returns it.
    ///
    /// Returns `None`, leaving the tree untouched, if no equal value is
    /// present.
    pub fn remove<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let root = self.root;
        self.remove_in(root, value)
    }

    fn remove_in<Q>(&mut self, link: Link, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let cur = link?;

        let removed = match value.cmp(self.node(cur).value.borrow()) {
            Ordering::Less => {
                let left = self.node(cur).left();
                self.remove_in(left, value)
            }
            Ordering::Greater => {
                let right = self.node(cur).right();
                self.remove_in(right, value)
            }
            Ordering::Equal => return Some(self.remove_node(cur)),
        };

        self.rebalance(cur);
        removed
    }

    // Removes one node, returning its value.
    //
    // A node with at most one child is spliced out directly. A node with two
    // children keeps its place and takes the value of its in-order
    // predecessor, the maximum of its left subtree; the predecessor node,
    // which cannot have a right child, is the one spliced out.
    fn remove_node(&mut self, node: NodeRef) -> T {
        let left = self.node(node).left();
        let right = self.node(node).right();

        match (left, right) {
            (Some(left), Some(_)) => {
                let predecessor = self.remove_extremum(left, Dir::Right);
                let value = mem::replace(&mut self.node_mut(node).value, predecessor);
                self.rebalance(node);
                value
            }

            _ => self.splice_out(node),
        }
    }

    // Removes the `dir`-most node of the subtree rooted at `node`,
    // recomputing the balance of the descent path on unwind.
    fn remove_extremum(&mut self, node: NodeRef, dir: Dir) -> T {
        match self.node(node).child(dir) {
            Some(child) => {
                let value = self.remove_extremum(child, dir);
                self.rebalance(node);
                value
            }

            None => self.splice_out(node),
        }
    }

    // Unlinks a node with at most one child and frees its slot. The child,
    // if there is one, takes the node's place and inherits its parent link.
    fn splice_out(&mut self, node: NodeRef) -> T {
        let parent = self.node(node).parent();
        let left = self.node(node).left();
        let right = self.node(node).right();

        debug_assert!(left.is_none() || right.is_none());

        let child = left.or(right);
        self.replace_child_or_set_root(parent, node, child);
        self.maybe_set_parent(child, parent);

        self.arena.remove(node).value
    }

    /// Removes and returns the minimum element of the tree.
    pub fn pop_first(&mut self) -> Option<T> {
        let root = self.root?;
        Some(self.remove_extremum(root, Dir::Left))
    }

    /// Removes and returns the maximum element of the tree.
    pub fn pop_last(&mut self) -> Option<T> {
        let root = self.root?;
        Some(self.remove_extremum(root, Dir::Right))
    }

    /// Clears the tree, dropping all elements.
    pub fn clear(&mut self) {
        self.root = None;
        self.arena.clear();
    }

    // Support methods ========================================================

    #[inline]
    fn node(&self, node: NodeRef) -> &Node<T> {
        self.arena.get(node)
    }

    #[inline]
    fn node_mut(&mut self, node: NodeRef) -> &mut Node<T> {
        self.arena.get_mut(node)
    }

    fn maybe_set_parent(&mut self, link: Link, parent: Link) {
        let Some(node) = link else {
            return;
        };

        self.node_mut(node).set_parent(parent);
    }

    #[inline]
    fn replace_child_or_set_root(&mut self, parent: Link, old_child: NodeRef, new_child: Link) {
        match parent {
            Some(parent) => self.replace_child(parent, old_child, new_child),
            None => self.root = new_child,
        }
    }

    // Replaces the child link of `parent` pointing at `old_child` with
    // `new_child`.
    //
    // `new_child`'s parent link is not updated.
    fn replace_child(&mut self, parent: NodeRef, old_child: NodeRef, new_child: Link) {
        let dir = self.which_child(parent, old_child);
        self.node_mut(parent).set_child(dir, new_child);
    }

    fn which_child(&self, parent: NodeRef, child: NodeRef) -> Dir {
        if self.node(parent).left() == Some(child) {
            Dir::Left
        } else {
            Dir::Right
        }
    }

    // Recomputes `node`'s balance factor after a structural change below it,
    // rotating to restore the invariant if the factor lands on +/-2.
    fn rebalance(&mut self, node: NodeRef) {
        let balance = self.balance_of(node);
        self.node_mut(node).balance = balance;

        if matches!(balance, -2 | 2) {
            self.rotate(node);
        }
    }

    // Restores the invariant at `node`, whose factor has reached +/-2.
    //
    // The taller child is promoted with a single rotation, unless its own
    // lean is opposite to the imbalance; then it takes two, the first turning
    // its inner grandchild outward. A removal on the shallow side can leave
    // the taller child with no lean at all; the single rotation covers that
    // case as well.
    fn rotate(&mut self, node: NodeRef) {
        if self.node(node).balance == -2 {
            let left = self
                .node(node)
                .left()
                .expect("left-heavy node has a left child");

            if self.node(left).balance == 1 {
                let pivot = self
                    .node(left)
                    .right()
                    .expect("right-leaning node has a right child");
                self.rotate_at(left, pivot);
                self.rotate_at(node, pivot);
            } else {
                self.rotate_at(node, left);
            }
        } else {
            let right = self
                .node(node)
                .right()
                .expect("right-heavy node has a right child");

            if self.node(right).balance == -1 {
                let pivot = self
                    .node(right)
                    .left()
                    .expect("left-leaning node has a left child");
                self.rotate_at(right, pivot);
                self.rotate_at(node, pivot);
            } else {
                self.rotate_at(node, right);
            }
        }
    }

    // Performs a single rotation, moving `up` into the place of its parent
    // `down`.
    //
    // `up`'s inner child switches sides to hang under `down`, `down` becomes
    // `up`'s child on the freed side, and `down`'s former parent (or the root
    // reference) is redirected to `up`. The factors of the two rewired nodes
    // are recomputed here; every other ancestor is recomputed by the caller's
    // ongoing bottom-up walk.
    fn rotate_at(&mut self, down: NodeRef, up: NodeRef) {
        // - `down` becomes the `dir` child of `up`.
        // - `across` goes from the `dir` child of `up` to the `!dir` child of
        //   `down`.
        let dir = if self.node(down).right() == Some(up) {
            Dir::Left
        } else {
            Dir::Right
        };

        let across = self.node(up).child(dir);
        self.node_mut(down).set_child(!dir, across);
        self.maybe_set_parent(across, Some(down));

        self.node_mut(up).set_child(dir, Some(down));
        let parent = self.node_mut(down).set_parent(Some(up));
        self.node_mut(up).set_parent(parent);

        self.replace_child_or_set_root(parent, down, Some(up));

        let balance = self.balance_of(down);
        self.node_mut(down).balance = balance;
        let balance = self.balance_of(up);
        self.node_mut(up).balance = balance;
    }

    // Height of an empty subtree is 0 and of a leaf is 1. Recomputed from
    // scratch on every call; nothing is cached.
    fn height(&self, link: Link) -> usize {
        match link {
            Some(node) => {
                let left = self.height(self.node(node).left());
                let right = self.height(self.node(node).right());
                1 + left.max(right)
            }
            None => 0,
        }
    }

    fn balance_of(&self, node: NodeRef) -> i8 {
        let left = self.height(self.node(node).left()) as isize;
        let right = self.height(self.node(node).right()) as isize;
        (right - left) as i8
    }
}

/// A read-only view of a single node, handed to [`AvlTree::traverse`]
/// visitors.
pub struct NodeView<'tree, T> {
    tree: &'tree AvlTree<T>,
    node: NodeRef,
}

impl<'tree, T: Ord> NodeView<'tree, T> {
    /// Returns the node's value.
    pub fn value(&self) -> &'tree T {
        &self.tree.node(self.node).value
    }

    /// Returns the node's balance factor.
    pub fn balance(&self) -> i8 {
        self.tree.node(self.node).balance
    }

    /// Returns the value of the node's parent, or `None` at the root.
    pub fn parent_value(&self) -> Option<&'tree T> {
        let parent = self.tree.node(self.node).parent()?;
        Some(&self.tree.node(parent).value)
    }
}
