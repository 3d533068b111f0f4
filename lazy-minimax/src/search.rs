use std::{fmt::Debug, marker::PhantomData, sync::Arc};

use derivative::Derivative;
use tracing::info_span;

use crate::{
    generate, map_values, prune, Evaluator, MinMaxReturn, Scorable, SearchError, SearchOptions,
    Successors,
};

/// The move picked by a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestMove<Board, Score> {
    /// The board to move to. None when the starting board is a leaf, either because it is
    /// terminal or because the search depth was 0.
    pub board: Option<Board>,
    /// Position of `board` in the successors of the starting board
    pub index: Option<usize>,
    /// The minimax value of the starting board
    pub value: Score,
    /// False if a time limit cut the search short, see [SearchOptions::time_limit]
    pub exhaustive: bool,
}

#[derive(Derivative)]
#[derivative(Debug(bound = ""), Clone(bound = ""))]
/// This is the struct that wraps a successors function and a scoring function and can be used to
/// run minimax from any board
///
/// Each search builds its own tree, so a `MinimaxSearch` can be shared between threads and used
/// for several searches at once.
///
/// It also outputs traces using the [tracing] crate.
pub struct MinimaxSearch<Board, Score, SuccessorsType, ScorableType> {
    /// Shows up on the tracing span of every search
    pub name: &'static str,
    #[derivative(Debug = "ignore")]
    successors: Arc<SuccessorsType>,
    #[derivative(Debug = "ignore")]
    score_function: Arc<ScorableType>,
    options: SearchOptions,
    #[derivative(Debug = "ignore")]
    _phantom: PhantomData<fn(&Board) -> Score>,
}

/// Pick the best move from `board`, searching `depth` plies with default [SearchOptions]
///
/// `board` is treated as the maximizing side. See [MinimaxSearch::best_move].
///
/// ```rust
/// use lazy_minimax::best_move;
///
/// // Every board is a leaf, so there is nothing to choose
/// let chosen = best_move(10, 3, |_: &u8| vec![], |board: &u8| *board).unwrap();
///
/// assert_eq!(chosen.board, None);
/// assert_eq!(chosen.value, 10);
/// ```
pub fn best_move<Board, Score, SuccessorsType, ScorableType>(
    board: Board,
    depth: i64,
    successors: SuccessorsType,
    score_function: ScorableType,
) -> Result<BestMove<Board, Score>, SearchError>
where
    Board: Clone + Send + Sync + 'static,
    Score: Ord + Clone + Debug + Send + Sync + 'static,
    SuccessorsType: Successors<Board> + Send + Sync + 'static,
    ScorableType: Scorable<Board, Score> + Send + Sync + 'static,
{
    MinimaxSearch::new(successors, score_function, "best_move").best_move(board, depth)
}

impl<Board, Score, SuccessorsType, ScorableType>
    MinimaxSearch<Board, Score, SuccessorsType, ScorableType>
where
    Board: Clone + Send + Sync + 'static,
    Score: Ord + Clone + Debug + Send + Sync + 'static,
    SuccessorsType: Successors<Board> + Send + Sync + 'static,
    ScorableType: Scorable<Board, Score> + Send + Sync + 'static,
{
    /// Construct a new `MinimaxSearch` with default [SearchOptions]
    pub fn new(
        successors: SuccessorsType,
        score_function: ScorableType,
        name: &'static str,
    ) -> Self {
        Self::with_options(successors, score_function, name, Default::default())
    }

    /// Construct a new `MinimaxSearch` providing a set of [SearchOptions]
    ///
    /// [SearchOptions] implements [Default] so you can override specific options and rely on
    /// defaults for the rest.
    ///
    /// ```rust
    /// use lazy_minimax::{MinimaxSearch, SearchOptions};
    ///
    /// let search = MinimaxSearch::with_options(
    ///     |n: &u32| if *n < 8 { vec![n + 1, n + 2] } else { vec![] },
    ///     |n: &u32| *n,
    ///     "counting",
    ///     SearchOptions {
    ///         parallel: true,
    ///         ..Default::default()
    ///     },
    /// );
    ///
    /// let chosen = search.best_move(0, 2).unwrap();
    /// assert_eq!(chosen.board, Some(2));
    /// assert_eq!(chosen.value, 3);
    /// ```
    pub fn with_options(
        successors: SuccessorsType,
        score_function: ScorableType,
        name: &'static str,
        options: SearchOptions,
    ) -> Self {
        Self {
            name,
            successors: Arc::new(successors),
            score_function: Arc::new(score_function),
            options,
            _phantom: PhantomData,
        }
    }

    /// The options every search runs with
    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Pick the best move from `board`
    ///
    /// This builds the lazy game tree from `board`, prunes it to `depth` plies, scores it and
    /// runs minimax over it with `board` as the maximizing side. Of all successors sharing the
    /// best value, the first one returned by the successors function is chosen.
    ///
    /// Fails with [SearchError::InvalidDepth] for a negative depth, before any work is done.
    pub fn best_move(
        &self,
        board: Board,
        depth: i64,
    ) -> Result<BestMove<Board, Score>, SearchError> {
        info_span!(
            "minimax",
            search_name = self.name,
            depth,
            parallel = self.options.parallel,
            chosen_score = tracing::field::Empty,
            chosen_index = tracing::field::Empty,
            exhaustive = tracing::field::Empty,
        )
        .in_scope(|| -> Result<BestMove<Board, Score>, SearchError> {
            let raw = self.game_tree(board);
            let bounded = prune(&raw, depth)?;
            let valued = map_values(&bounded, self.scorer());

            let choice = self.evaluator(depth).best_child(&valued)?;

            let current_span = tracing::Span::current();
            current_span.record("chosen_score", format!("{:?}", choice.value).as_str());
            if let Some(index) = choice.index {
                current_span.record("chosen_index", index);
            }
            current_span.record("exhaustive", choice.exhaustive);

            let board = choice
                .index
                .and_then(|index| bounded.children().get(index))
                .map(|child| child.payload().clone());

            Ok(BestMove {
                board,
                index: choice.index,
                value: choice.value,
                exhaustive: choice.exhaustive,
            })
        })
    }

    /// Run the same search as [MinimaxSearch::best_move] but return the whole explored tree,
    /// labelled with boards
    ///
    /// The time limit in [SearchOptions] is applied to the whole explanation: running out of
    /// time fails with [SearchError::TimedOut] instead of returning a partial tree.
    pub fn explain(
        &self,
        board: Board,
        depth: i64,
    ) -> Result<MinMaxReturn<Board, Score>, SearchError> {
        info_span!("minimax_explain", search_name = self.name, depth).in_scope(
            || -> Result<MinMaxReturn<Board, Score>, SearchError> {
                let raw = self.game_tree(board);
                let bounded = prune(&raw, depth)?;
                let scorer = self.scorer();
                let labelled = bounded.map(move |board| (board.clone(), scorer(board)));

                self.evaluator(depth).explain(&labelled)
            },
        )
    }

    /// The evaluator for a tree already pruned to `depth`. Pruning bounds it, so the ceiling only
    /// has to be at least as deep as the prune.
    fn evaluator(&self, depth: i64) -> Evaluator {
        let pruned_to = usize::try_from(depth).unwrap_or(usize::MAX);

        Evaluator::new(SearchOptions {
            max_evaluation_depth: self.options.max_evaluation_depth.max(pruned_to),
            ..self.options
        })
    }

    fn game_tree(&self, board: Board) -> crate::LazyTree<Board> {
        let successors = self.successors.clone();
        generate(board, move |board: &Board| successors.successors(board))
    }

    fn scorer(&self) -> impl Fn(&Board) -> Score + Send + Sync + 'static {
        let score_function = self.score_function.clone();
        move |board: &Board| score_function.score(board)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use super::*;

    fn named_successors(board: &&'static str) -> Vec<&'static str> {
        match *board {
            "root" => vec!["A", "B"],
            "A" => vec!["a1", "a2"],
            "B" => vec!["b1", "b2"],
            _ => vec![],
        }
    }

    fn named_score(board: &&'static str) -> i32 {
        match *board {
            "a1" => 3,
            "a2" => 5,
            "b1" => 6,
            "b2" => 2,
            _ => 0,
        }
    }

    #[test]
    fn test_known_tree() {
        let chosen = best_move("root", 2, named_successors, named_score).unwrap();

        assert_eq!(
            chosen,
            BestMove {
                board: Some("A"),
                index: Some(0),
                value: 3,
                exhaustive: true,
            }
        );
    }

    #[test]
    fn test_depth_zero_scores_the_root() {
        let chosen = best_move("A", 0, named_successors, |_: &&'static str| 42).unwrap();

        assert_eq!(chosen.board, None);
        assert_eq!(chosen.index, None);
        assert_eq!(chosen.value, 42);
    }

    #[test]
    fn test_terminal_root_at_any_depth() {
        for depth in [0, 1, 5, 100] {
            let chosen = best_move("a1", depth, named_successors, named_score).unwrap();

            assert_eq!(chosen.board, None);
            assert_eq!(chosen.value, 3);
        }
    }

    #[test]
    fn test_negative_depth() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let successors = move |board: &&'static str| {
            counter.fetch_add(1, Ordering::SeqCst);
            named_successors(board)
        };

        assert_eq!(
            best_move("root", -3, successors, named_score),
            Err(SearchError::InvalidDepth(-3))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_ties_choose_the_first_successor() {
        let successors = |board: &u8| match *board {
            0 => vec![1, 2, 3],
            1 => vec![10, 11],
            2 => vec![12, 13],
            3 => vec![14],
            _ => vec![],
        };
        let score = |board: &u8| match *board {
            10 | 13 => 7,
            11 | 12 => 9,
            14 => 1,
            _ => 0,
        };

        for _ in 0..10 {
            let chosen = best_move(0u8, 2, successors, score).unwrap();
            assert_eq!(chosen.board, Some(1));
            assert_eq!(chosen.value, 7);
        }
    }

    #[test]
    fn test_unbounded_game_only_materializes_the_searched_plies() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let successors = move |n: &u64| {
            counter.fetch_add(1, Ordering::SeqCst);
            vec![2 * n, 2 * n + 1]
        };

        let chosen = best_move(1u64, 3, successors, |n: &u64| *n % 5).unwrap();

        // Only the root and the two plies below it are ever asked for their successors
        assert_eq!(calls.load(Ordering::SeqCst), 1 + 2 + 4);
        assert!(chosen.board.is_some());
    }

    #[test]
    fn test_result_ignores_structure_beyond_the_depth() {
        let shallow = |board: &&'static str| named_successors(board);
        let deeper = |board: &&'static str| match *board {
            "a1" | "a2" | "b1" | "b2" => vec!["trap", "prize"],
            _ => named_successors(board),
        };
        let score = |board: &&'static str| match *board {
            "trap" => -100,
            "prize" => 100,
            _ => named_score(board),
        };

        assert_eq!(
            best_move("root", 2, shallow, score),
            best_move("root", 2, deeper, score)
        );
    }

    #[test]
    fn test_parallel_search_matches_sequential() {
        let successors = |n: &u32| {
            if *n > 500 {
                vec![]
            } else {
                vec![n + 1, n * 2 + 3, n * 3 % 11 + n + 1]
            }
        };
        let score = |n: &u32| (*n as i64 * 31) % 23 - 11;

        let sequential = MinimaxSearch::new(successors, score, "sequential");
        let parallel = MinimaxSearch::with_options(
            successors,
            score,
            "parallel",
            SearchOptions {
                parallel: true,
                ..Default::default()
            },
        );

        for depth in 0..5 {
            assert_eq!(
                sequential.best_move(1, depth),
                parallel.best_move(1, depth)
            );
        }
    }

    #[test]
    fn test_explain_matches_best_move() {
        let search = MinimaxSearch::new(named_successors, named_score, "explain");

        let explained = search.explain("root", 2).unwrap();
        let chosen = search.best_move("root", 2).unwrap();

        assert_eq!(*explained.score(), chosen.value);
        assert_eq!(explained.best_label().copied(), chosen.board);
        assert_eq!(explained.chosen_route(), vec![&"A", &"a1"]);
    }

    #[test]
    fn test_time_limit_that_already_passed() {
        let search = MinimaxSearch::with_options(
            named_successors,
            named_score,
            "hurried",
            SearchOptions {
                time_limit: Some(Duration::ZERO),
                ..Default::default()
            },
        );

        assert_eq!(
            search.best_move("root", 2),
            Err(SearchError::TimedOut {
                limit: Duration::ZERO
            })
        );
    }

    fn chain(n: &u32) -> Vec<u32> {
        if *n < 300 {
            vec![n + 1]
        } else {
            vec![]
        }
    }

    #[test]
    fn test_depth_beyond_the_evaluation_ceiling() {
        let chosen = best_move(0u32, 300, chain, |n: &u32| *n).unwrap();

        assert_eq!(chosen.board, Some(1));
        assert_eq!(chosen.value, 300);

        let search = MinimaxSearch::new(chain, |n: &u32| *n, "chain");
        assert_eq!(*search.explain(0, 300).unwrap().score(), 300);
    }

    #[test]
    fn test_searches_are_independent() {
        let search = MinimaxSearch::new(named_successors, named_score, "shared");

        std::thread::scope(|scope| {
            let from_root = scope.spawn(|| search.best_move("root", 2));
            let from_b = scope.spawn(|| search.best_move("B", 1));

            assert_eq!(from_root.join().unwrap().unwrap().board, Some("A"));
            assert_eq!(from_b.join().unwrap().unwrap().board, Some("b1"));
        });
    }
}
