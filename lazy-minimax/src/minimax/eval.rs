use std::{
    fmt::Debug,
    time::{Duration, Instant},
};

use rayon::prelude::*;
use tracing::{debug, warn};

use super::MinMaxReturn;
use crate::{LazyTree, SearchError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Optional properties that can be defined for an [Evaluator] or a
/// [MinimaxSearch](crate::MinimaxSearch)
///
/// The defaults (as implemented by [Default]) are as follows:
/// ```
/// use lazy_minimax::SearchOptions;
///
/// let defaults: SearchOptions = Default::default();
///
/// assert_eq!(defaults.max_evaluation_depth, 256);
/// assert!(!defaults.parallel);
/// assert_eq!(defaults.time_limit, None);
/// ```
pub struct SearchOptions {
    /// How many plies below the root evaluation may go before giving up with
    /// [SearchError::DepthExceeded]
    ///
    /// A pruned tree never gets near this. It is here so that evaluating an unbounded tree by
    /// mistake fails instead of running forever. [MinimaxSearch](crate::MinimaxSearch) prunes
    /// before it evaluates, so it raises the ceiling to its search depth when that is deeper.
    ///
    /// Defaults to 256
    pub max_evaluation_depth: usize,
    /// Evaluate sibling subtrees in parallel on the rayon thread pool
    ///
    /// The chosen value and move are the same as for a sequential search.
    ///
    /// Defaults to false
    pub parallel: bool,
    /// Stop evaluating once this much time has passed
    ///
    /// When the limit is hit, [Evaluator::best_child] falls back to the best of the root's
    /// children that were completely evaluated, and marks the [Choice] as not exhaustive.
    ///
    /// Defaults to None
    pub time_limit: Option<Duration>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_evaluation_depth: 256,
            parallel: false,
            time_limit: None,
        }
    }
}

/// The outcome of picking a move at the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice<V> {
    /// Position of the chosen child among the root's children. None if the root is a leaf.
    pub index: Option<usize>,
    /// The minimax value of the root (or of the chosen child, which is the same thing)
    pub value: V,
    /// False if a time limit stopped the search before every child of the root was evaluated
    pub exhaustive: bool,
}

/// Runs the mutually recursive maximize / minimize reductions with a set of [SearchOptions]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evaluator {
    options: SearchOptions,
}

#[derive(Debug, Clone, Copy)]
struct Budget {
    ceiling: usize,
    deadline: Option<(Instant, Duration)>,
}

impl Budget {
    fn check(&self, depth: usize) -> Result<(), SearchError> {
        if depth > self.ceiling {
            return Err(SearchError::DepthExceeded {
                limit: self.ceiling,
            });
        }

        if let Some((deadline, limit)) = self.deadline {
            if Instant::now() >= deadline {
                return Err(SearchError::TimedOut { limit });
            }
        }

        Ok(())
    }
}

/// The maximizing reduction with default [SearchOptions]
///
/// A leaf is worth its own payload, anything else is worth the largest [minimize] of its children.
pub fn maximize<V>(node: &LazyTree<V>) -> Result<V, SearchError>
where
    V: Ord + Clone + Debug + Send + Sync,
{
    Evaluator::default().maximize(node)
}

/// The minimizing reduction with default [SearchOptions]
///
/// A leaf is worth its own payload, anything else is worth the smallest [maximize] of its children.
pub fn minimize<V>(node: &LazyTree<V>) -> Result<V, SearchError>
where
    V: Ord + Clone + Debug + Send + Sync,
{
    Evaluator::default().minimize(node)
}

impl Evaluator {
    /// Construct an `Evaluator` with the given options
    pub fn new(options: SearchOptions) -> Self {
        Self { options }
    }

    /// The options this evaluator runs with
    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Value of `node` when it is the maximizing side's turn
    pub fn maximize<V>(&self, node: &LazyTree<V>) -> Result<V, SearchError>
    where
        V: Ord + Clone + Debug + Send + Sync,
    {
        self.minimax(node, true, 0, &self.budget())
    }

    /// Value of `node` when it is the minimizing side's turn
    pub fn minimize<V>(&self, node: &LazyTree<V>) -> Result<V, SearchError>
    where
        V: Ord + Clone + Debug + Send + Sync,
    {
        self.minimax(node, false, 0, &self.budget())
    }

    /// Pick the child of `root` that realizes `maximize(root)`
    ///
    /// The first child (in child order) whose minimizing value equals the root's value wins. A
    /// root without children yields no index and its own payload as the value.
    pub fn best_child<V>(&self, root: &LazyTree<V>) -> Result<Choice<V>, SearchError>
    where
        V: Ord + Clone + Debug + Send + Sync,
    {
        let children = root.children();
        if children.is_empty() {
            return Ok(Choice {
                index: None,
                value: root.payload().clone(),
                exhaustive: true,
            });
        }

        let budget = self.budget();
        budget.check(0)?;

        let results: Vec<Result<V, SearchError>> = if self.options.parallel {
            children
                .par_iter()
                .map(|child| self.minimax(child, false, 1, &budget))
                .collect()
        } else {
            let mut results = Vec::with_capacity(children.len());
            for child in children {
                let result = self.minimax(child, false, 1, &budget);
                let timed_out = matches!(result, Err(SearchError::TimedOut { .. }));
                results.push(result);

                if timed_out {
                    break;
                }
            }
            results
        };

        let mut exhaustive = results.len() == children.len();
        let mut scores = Vec::with_capacity(results.len());
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(score) => {
                    debug!(index, ?score, "evaluated root child");
                    scores.push((index, score));
                }
                Err(SearchError::TimedOut { .. }) => exhaustive = false,
                Err(e) => return Err(e),
            }
        }

        let evaluated = scores.len();
        match leftmost_best(scores, true) {
            Some((index, value)) => {
                if !exhaustive {
                    warn!(
                        evaluated,
                        total = children.len(),
                        "Ran out of time, choosing among the moves we finished"
                    );
                }

                Ok(Choice {
                    index: Some(index),
                    value,
                    exhaustive,
                })
            }
            None => Err(SearchError::TimedOut {
                limit: self.options.time_limit.unwrap_or_default(),
            }),
        }
    }

    /// Evaluate a tree whose payloads pair a label with a score, keeping every option that was
    /// looked at
    ///
    /// The returned [MinMaxReturn] has the same value as [Evaluator::maximize] on the scores, and
    /// its first option at the root is the child [Evaluator::best_child] picks.
    pub fn explain<L, V>(&self, root: &LazyTree<(L, V)>) -> Result<MinMaxReturn<L, V>, SearchError>
    where
        L: Clone + Send + Sync,
        V: Ord + Clone + Debug + Send + Sync,
    {
        self.explain_node(root, true, 0, &self.budget())
    }

    fn budget(&self) -> Budget {
        Budget {
            ceiling: self.options.max_evaluation_depth,
            // A limit too far away to represent is no limit at all
            deadline: self.options.time_limit.and_then(|limit| {
                Instant::now()
                    .checked_add(limit)
                    .map(|deadline| (deadline, limit))
            }),
        }
    }

    fn minimax<V>(
        &self,
        node: &LazyTree<V>,
        is_maximizing: bool,
        depth: usize,
        budget: &Budget,
    ) -> Result<V, SearchError>
    where
        V: Ord + Clone + Debug + Send + Sync,
    {
        budget.check(depth)?;

        let children = node.children();
        if children.is_empty() {
            return Ok(node.payload().clone());
        }

        let scores: Vec<V> = if self.options.parallel && children.len() > 1 {
            children
                .par_iter()
                .map(|child| self.minimax(child, !is_maximizing, depth + 1, budget))
                .collect::<Result<_, _>>()?
        } else {
            children
                .iter()
                .map(|child| self.minimax(child, !is_maximizing, depth + 1, budget))
                .collect::<Result<_, _>>()?
        };

        match leftmost_best(scores.into_iter().enumerate(), is_maximizing) {
            Some((_, score)) => Ok(score),
            None => Ok(node.payload().clone()),
        }
    }

    fn explain_node<L, V>(
        &self,
        node: &LazyTree<(L, V)>,
        is_maximizing: bool,
        depth: usize,
        budget: &Budget,
    ) -> Result<MinMaxReturn<L, V>, SearchError>
    where
        L: Clone + Send + Sync,
        V: Ord + Clone + Debug + Send + Sync,
    {
        budget.check(depth)?;

        let children = node.children();
        if children.is_empty() {
            return Ok(MinMaxReturn::Leaf {
                score: node.payload().1.clone(),
            });
        }

        let explain_child = |child: &LazyTree<(L, V)>| {
            self.explain_node(child, !is_maximizing, depth + 1, budget)
                .map(|result| (child.payload().0.clone(), result))
        };
        let mut options: Vec<(L, MinMaxReturn<L, V>)> =
            if self.options.parallel && children.len() > 1 {
                children
                    .par_iter()
                    .map(explain_child)
                    .collect::<Result<_, _>>()?
            } else {
                children
                    .iter()
                    .map(explain_child)
                    .collect::<Result<_, _>>()?
            };

        // Stable, so equal options keep child order and the leftmost stays first
        options.sort_by(|(_, a), (_, b)| {
            if is_maximizing {
                b.score().cmp(a.score())
            } else {
                a.score().cmp(b.score())
            }
        });

        let score = match options.first() {
            Some((_, chosen)) => chosen.score().clone(),
            None => node.payload().1.clone(),
        };

        Ok(MinMaxReturn::Node {
            is_maximizing,
            options,
            score,
        })
    }
}

/// The first entry holding the largest (or smallest) score
fn leftmost_best<V: Ord>(
    scores: impl IntoIterator<Item = (usize, V)>,
    is_maximizing: bool,
) -> Option<(usize, V)> {
    let mut best: Option<(usize, V)> = None;

    for (index, score) in scores {
        let improves = match &best {
            None => true,
            Some((_, current)) if is_maximizing => score > *current,
            Some((_, current)) => score < *current,
        };

        if improves {
            best = Some((index, score));
        }
    }

    best
}
