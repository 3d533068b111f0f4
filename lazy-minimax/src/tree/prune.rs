use itertools::Itertools;

use super::LazyTree;
use crate::SearchError;

/// Bound `tree` to `depth` plies
///
/// Every node `depth` edges below the root becomes a leaf, and whatever was below it is never
/// forced. At depth 0 the result is just the root as a leaf. Pruning is lazy: children of the
/// result are pruned (and the matching source children forced) only when they are themselves
/// forced. Nodes that were already leaves stay leaves, so pruning a shallow tree changes nothing.
///
/// A negative depth fails with [SearchError::InvalidDepth] before anything is built.
pub fn prune<T>(tree: &LazyTree<T>, depth: i64) -> Result<LazyTree<T>, SearchError>
where
    T: Clone + Send + Sync + 'static,
{
    let depth = usize::try_from(depth).map_err(|_| SearchError::InvalidDepth(depth))?;

    Ok(prune_to(tree, depth))
}

pub(crate) fn prune_to<T>(tree: &LazyTree<T>, depth: usize) -> LazyTree<T>
where
    T: Clone + Send + Sync + 'static,
{
    if depth == 0 {
        return LazyTree::leaf(tree.payload().clone());
    }

    let source = tree.clone();
    LazyTree::new(tree.payload().clone(), move |_| {
        source
            .children()
            .iter()
            .map(|child| prune_to(child, depth - 1))
            .collect_vec()
    })
}
