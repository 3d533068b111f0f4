use std::sync::Arc;

use itertools::Itertools;

use super::LazyTree;

/// Lists the boards reachable in one ply from a given board
///
/// An empty list means the board is terminal. Implementations must be pure: the same board
/// always has to produce the same successors, in the same order.
pub trait Successors<Board> {
    /// All boards reachable from `board` in one move
    fn successors(&self, board: &Board) -> Vec<Board>;
}

impl<Board, FnLike: Fn(&Board) -> Vec<Board>> Successors<Board> for FnLike {
    fn successors(&self, board: &Board) -> Vec<Board> {
        (self)(board)
    }
}

/// Build the (possibly infinite) game tree rooted at `start`
///
/// Nothing beyond the root is computed here. Each node asks `successors` for its children the
/// first time they are forced, so a game without forced termination is fine as long as the tree
/// is [pruned](super::prune) before anything walks all of it.
pub fn generate<Board, SuccessorsType>(
    start: Board,
    successors: SuccessorsType,
) -> LazyTree<Board>
where
    Board: Send + Sync + 'static,
    SuccessorsType: Successors<Board> + Send + Sync + 'static,
{
    generate_shared(start, Arc::new(successors))
}

fn generate_shared<Board, SuccessorsType>(
    start: Board,
    successors: Arc<SuccessorsType>,
) -> LazyTree<Board>
where
    Board: Send + Sync + 'static,
    SuccessorsType: Successors<Board> + Send + Sync + 'static,
{
    LazyTree::new(start, move |board| {
        successors
            .successors(board)
            .into_iter()
            .map(|next| generate_shared(next, successors.clone()))
            .collect_vec()
    })
}
