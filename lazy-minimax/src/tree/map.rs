use std::sync::Arc;

use itertools::Itertools;

use super::LazyTree;

/// This trait is used to control something that can return a score from a game board
///
/// Any `Fn(&Board) -> Score` is `Scorable`, so plain functions and closures work directly. The
/// score must be pure and defined for every board the search can reach.
pub trait Scorable<Board, Score> {
    /// Convert the given Board into a Score
    fn score(&self, board: &Board) -> Score;
}

impl<Board, Score, FnLike: Fn(&Board) -> Score> Scorable<Board, Score> for FnLike {
    fn score(&self, board: &Board) -> Score {
        (self)(board)
    }
}

/// Turn a tree of boards into a tree of scores with the same shape
///
/// Children are only scored once they are forced. Scoring happens on the whole tree, not only on
/// the leaves, so run this on an already [pruned](super::prune) tree.
pub fn map_values<Board, Score, ScorableType>(
    tree: &LazyTree<Board>,
    score: ScorableType,
) -> LazyTree<Score>
where
    Board: Send + Sync + 'static,
    Score: Send + Sync + 'static,
    ScorableType: Scorable<Board, Score> + Send + Sync + 'static,
{
    map_shared(tree, Arc::new(move |board: &Board| score.score(board)))
}

pub(super) fn map_shared<T, U, F>(tree: &LazyTree<T>, f: Arc<F>) -> LazyTree<U>
where
    T: Send + Sync + 'static,
    U: Send + Sync + 'static,
    F: Fn(&T) -> U + Send + Sync + 'static,
{
    let source = tree.clone();
    let value = (*f)(tree.payload());

    LazyTree::new(value, move |_| {
        source
            .children()
            .iter()
            .map(|child| map_shared(child, f.clone()))
            .collect_vec()
    })
}
