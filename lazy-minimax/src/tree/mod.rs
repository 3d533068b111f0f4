//! The lazy game tree and the transformations that build and reshape it.
//!
//! A [LazyTree] is a payload plus a recipe for its children. Nothing below a node exists until
//! [LazyTree::children] is called on it, and once it has been called the children are kept so
//! every later traversal sees the exact same nodes. Transformations ([prune], [map_values],
//! [LazyTree::map]) never touch the tree they are given; they return a new tree whose nodes
//! force the source lazily as they are themselves forced.

use std::{fmt, sync::Arc};

use lazycell::AtomicLazyCell;
use parking_lot::Mutex;
use text_trees::StringTreeNode;

mod generate;
pub use generate::{generate, Successors};

mod map;
pub use map::{map_values, Scorable};

mod prune;
pub use prune::prune;

type Expander<T> = Box<dyn FnOnce(&T) -> Vec<LazyTree<T>> + Send>;

/// A node with a payload and children that are computed on first use
///
/// Cloning a `LazyTree` is cheap: clones share the node, including its memoized children.
pub struct LazyTree<T>(Arc<Node<T>>);

struct Node<T> {
    payload: T,
    children: AtomicLazyCell<Vec<LazyTree<T>>>,
    /// Taken exactly once, by whoever fills `children` first
    expander: Mutex<Option<Expander<T>>>,
}

impl<T> Clone for LazyTree<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> LazyTree<T> {
    /// Create a node whose children are produced by `expander` the first time they are needed
    ///
    /// The expander gets a reference to this node's payload.
    pub fn new<F>(payload: T, expander: F) -> Self
    where
        F: FnOnce(&T) -> Vec<LazyTree<T>> + Send + 'static,
    {
        Self(Arc::new(Node {
            payload,
            children: AtomicLazyCell::new(),
            expander: Mutex::new(Some(Box::new(expander))),
        }))
    }

    /// Create a node with no children
    pub fn leaf(payload: T) -> Self {
        Self::with_children(payload, Vec::new())
    }

    /// Create a node whose children are already known
    pub fn with_children(payload: T, children: Vec<LazyTree<T>>) -> Self {
        let cell = AtomicLazyCell::new();
        // A fresh cell can't already be filled
        let _ = cell.fill(children);

        Self(Arc::new(Node {
            payload,
            children: cell,
            expander: Mutex::new(None),
        }))
    }

    /// The value stored at this node
    pub fn payload(&self) -> &T {
        &self.0.payload
    }

    /// The children of this node, in order. Empty means this node is a leaf.
    ///
    /// The first call runs the expander; every later call (from any clone, on any thread) returns
    /// the same cached slice.
    ///
    /// # Panics
    ///
    /// If the expander panics, that panic propagates. The expander is gone after that, so every
    /// later call on this node panics too rather than report the node as a leaf.
    pub fn children(&self) -> &[LazyTree<T>] {
        if let Some(children) = self.0.children.borrow() {
            return children;
        }

        let mut expander = self.0.expander.lock();
        if self.0.children.borrow().is_none() {
            // An empty cell without an expander only happens after an expander panicked
            let children = match expander.take() {
                Some(expand) => expand(&self.0.payload),
                None => panic!("the children of this node were lost when its expander panicked"),
            };
            // We hold the gate and saw the cell empty, so this fill wins
            let _ = self.0.children.fill(children);
        }
        drop(expander);

        self.0.children.borrow().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the children of this node have been computed yet. Never forces anything.
    pub fn is_expanded(&self) -> bool {
        self.0.children.borrow().is_some()
    }

    /// Whether this node has no children. Forces the children.
    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    /// A visual representation of the top `max_depth` plies of the tree
    ///
    /// Everything shown gets forced, so keep `max_depth` small for unbounded trees.
    pub fn to_text_tree(&self, max_depth: usize) -> String
    where
        T: fmt::Debug,
    {
        format!("{}", self.to_text_tree_node(max_depth))
    }

    fn to_text_tree_node(&self, remaining: usize) -> StringTreeNode
    where
        T: fmt::Debug,
    {
        let mut node = StringTreeNode::new(format!("{:?}", self.payload()));
        if remaining > 0 {
            for child in self.children() {
                node.push_node(child.to_text_tree_node(remaining - 1));
            }
        }

        node
    }
}

impl<T> LazyTree<T>
where
    T: Send + Sync + 'static,
{
    /// Apply `f` to every payload, keeping the shape of the tree
    ///
    /// This is lazy in the same way the source is: a mapped node only maps its children when
    /// they are forced, and forcing them forces the matching children of the source.
    pub fn map<U, F>(&self, f: F) -> LazyTree<U>
    where
        U: Send + Sync + 'static,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        map::map_shared(self, Arc::new(f))
    }
}

impl<T: fmt::Debug> fmt::Debug for LazyTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyTree")
            .field("payload", self.payload())
            .field("children", &self.0.children.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counting_tree(calls: Arc<AtomicUsize>) -> LazyTree<u32> {
        LazyTree::new(1, move |payload| {
            calls.fetch_add(1, Ordering::SeqCst);
            vec![LazyTree::leaf(payload * 10), LazyTree::leaf(payload * 10 + 1)]
        })
    }

    #[test]
    fn test_children_are_deferred() {
        let calls = Arc::new(AtomicUsize::new(0));
        let tree = counting_tree(calls.clone());

        assert!(!tree.is_expanded());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(*tree.payload(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_children_are_memoized() {
        let calls = Arc::new(AtomicUsize::new(0));
        let tree = counting_tree(calls.clone());

        let first: Vec<u32> = tree.children().iter().map(|c| *c.payload()).collect();
        let second: Vec<u32> = tree.children().iter().map(|c| *c.payload()).collect();

        assert_eq!(first, vec![10, 11]);
        assert_eq!(first, second);
        assert!(tree.is_expanded());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_clones_share_memoized_children() {
        let calls = Arc::new(AtomicUsize::new(0));
        let tree = counting_tree(calls.clone());
        let clone = tree.clone();

        tree.children();
        assert!(clone.is_expanded());
        clone.children();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_children_are_computed_once_across_threads() {
        let calls = Arc::new(AtomicUsize::new(0));
        let tree = counting_tree(calls.clone());

        std::thread::scope(|scope| {
            for _ in 0..8 {
                let tree = tree.clone();
                scope.spawn(move || assert_eq!(tree.children().len(), 2));
            }
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_leaf_has_no_children() {
        let leaf = LazyTree::leaf("done");

        assert!(leaf.is_expanded());
        assert!(leaf.is_leaf());
        assert!(leaf.children().is_empty());
    }

    #[test]
    fn test_map_keeps_shape_and_laziness() {
        let calls = Arc::new(AtomicUsize::new(0));
        let tree = counting_tree(calls.clone());

        let mapped = tree.map(|x| format!("#{x}"));
        assert_eq!(mapped.payload(), "#1");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!mapped.is_expanded());

        let children: Vec<&String> = mapped.children().iter().map(|c| c.payload()).collect();
        assert_eq!(children, vec!["#10", "#11"]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(tree.is_expanded());
    }

    #[test]
    fn test_text_tree_shows_requested_plies() {
        let tree = LazyTree::with_children(
            1,
            vec![
                LazyTree::with_children(2, vec![LazyTree::leaf(4)]),
                LazyTree::leaf(3),
            ],
        );

        let shallow = tree.to_text_tree(1);
        assert!(shallow.contains('2'));
        assert!(shallow.contains('3'));
        assert!(!shallow.contains('4'));

        let deep = tree.to_text_tree(2);
        assert!(deep.contains('4'));
    }

    #[test]
    fn test_debug_only_shows_forced_children() {
        let calls = Arc::new(AtomicUsize::new(0));
        let tree = counting_tree(calls.clone());

        let before = format!("{:?}", tree);
        assert!(before.contains("None"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        tree.children();
        let after = format!("{:?}", tree);
        assert!(after.contains("10"));
    }

    #[test]
    fn test_panicking_expander_never_turns_the_node_into_a_leaf() {
        use std::panic::{catch_unwind, AssertUnwindSafe};

        let tree: LazyTree<u32> = LazyTree::new(1, |_| panic!("no children for you"));

        let first = catch_unwind(AssertUnwindSafe(|| tree.children().len()));
        let second = catch_unwind(AssertUnwindSafe(|| tree.children().len()));

        assert!(first.is_err());
        assert!(second.is_err());
        assert!(!tree.is_expanded());
    }
}
