pub mod play;
pub mod solve;
pub mod tree;

use std::time::Duration;

use clap::Subcommand;
use color_eyre::eyre::Result;
use lazy_minimax::{MinimaxSearch, SearchOptions};

use crate::games::{Game, GameKind, Side};

use play::Play;
use solve::Solve;
use tree::Tree;

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Print the best move from a position
    Solve(Solve),
    /// Print the whole tree minimax explored from a position
    Tree(Tree),
    /// Let the search play against itself
    Play(Play),
}

impl Command {
    pub fn run(self) -> Result<()> {
        match self {
            Command::Solve(s) => s.run()?,
            Command::Tree(t) => t.run()?,
            Command::Play(p) => p.run()?,
        }

        Ok(())
    }
}

/// Arguments every subcommand shares: which game, where to start and how to search
#[derive(clap::Args, Debug)]
pub(crate) struct GameArgs {
    /// Game to search
    #[clap(short, long, value_enum, default_value_t = GameKind::Nim)]
    game: GameKind,

    /// Position to start from. Uses the starting position of the game if not specified
    ///
    /// Nim takes comma separated heap sizes, tic-tac-toe nine cells of `x`, `o` or `.` and
    /// counter a single integer.
    #[clap(short, long)]
    position: Option<String>,

    /// Number of plies to look ahead
    #[clap(
        short,
        long,
        env = "PLY_DEPTH",
        default_value_t = 4,
        allow_negative_numbers = true
    )]
    depth: i64,

    /// Evaluate sibling subtrees on the rayon thread pool
    #[clap(long)]
    parallel: bool,

    /// Stop searching after this many milliseconds and use the best move found so far
    #[clap(long)]
    time_limit_ms: Option<u64>,

    /// Fail instead of recursing deeper than this many levels
    #[clap(long, default_value_t = SearchOptions::default().max_evaluation_depth)]
    max_evaluation_depth: usize,
}

impl GameArgs {
    pub(crate) fn kind(&self) -> GameKind {
        self.game
    }

    pub(crate) fn depth(&self) -> i64 {
        self.depth
    }

    pub(crate) fn start<G: Game>(&self) -> Result<G> {
        match &self.position {
            Some(position) => G::parse(position),
            None => Ok(G::start()),
        }
    }

    pub(crate) fn options(&self) -> SearchOptions {
        SearchOptions {
            max_evaluation_depth: self.max_evaluation_depth,
            parallel: self.parallel,
            time_limit: self.time_limit_ms.map(Duration::from_millis),
        }
    }

    /// A search that scores every board from the point of view of `perspective`
    pub(crate) fn search<G: Game>(
        &self,
        perspective: Side,
    ) -> MinimaxSearch<G, i32, fn(&G) -> Vec<G>, impl Fn(&G) -> i32 + Send + Sync + 'static> {
        MinimaxSearch::with_options(
            G::successors as fn(&G) -> Vec<G>,
            move |board: &G| board.evaluate(perspective),
            "ply",
            self.options(),
        )
    }
}

/// Call `$run::<G>()` on `$target` with `G` being the game `$args` selects
macro_rules! for_each_game {
    ($args:expr, $target:expr, $run:ident) => {
        match $args.kind() {
            $crate::games::GameKind::Nim => $target.$run::<$crate::games::Nim>(),
            $crate::games::GameKind::TicTacToe => $target.$run::<$crate::games::TicTacToe>(),
            $crate::games::GameKind::Counter => $target.$run::<$crate::games::Counter>(),
        }
    };
}
pub(crate) use for_each_game;
