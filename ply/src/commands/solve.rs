use color_eyre::eyre::{Result, WrapErr};
use serde::Serialize;
use tracing::{info, warn};

use super::{for_each_game, GameArgs};
use crate::games::{Game, Side};

#[derive(clap::Args, Debug)]
pub(crate) struct Solve {
    #[clap(flatten)]
    game: GameArgs,

    /// Print the result as a single JSON object
    #[clap(long)]
    json: bool,
}

/// What `solve` prints with `--json`
#[derive(Debug, Serialize)]
struct Report {
    position: String,
    to_move: Side,
    depth: i64,
    best_move: Option<String>,
    index: Option<usize>,
    value: i32,
    exhaustive: bool,
}

impl Solve {
    pub(crate) fn run(self) -> Result<()> {
        for_each_game!(self.game, self, solve)
    }

    fn solve<G: Game>(&self) -> Result<()> {
        let report = self.report::<G>()?;

        if !report.exhaustive {
            warn!("Ran out of time, this is the best move of the subtrees that finished");
        }

        if self.json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            match &report.best_move {
                Some(best_move) => println!(
                    "{:?} to move at {}: play {} (successor #{}) for a value of {}",
                    report.to_move,
                    report.position,
                    best_move,
                    report.index.unwrap_or_default(),
                    report.value
                ),
                None => println!(
                    "Nothing to choose at {}, it is worth {}",
                    report.position, report.value
                ),
            }
        }

        Ok(())
    }

    fn report<G: Game>(&self) -> Result<Report> {
        let start: G = self.game.start()?;
        let to_move = start.to_move();
        let depth = self.game.depth();
        info!(position = %start, depth, "Solving");

        let chosen = self
            .game
            .search::<G>(to_move)
            .best_move(start.clone(), depth)
            .wrap_err_with(|| format!("Searching {depth} plies from {start} failed"))?;

        Ok(Report {
            position: start.to_string(),
            to_move,
            depth,
            best_move: chosen.board.map(|board| board.to_string()),
            index: chosen.index,
            value: chosen.value,
            exhaustive: chosen.exhaustive,
        })
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::games::{Counter, Nim, TicTacToe, WIN};

    #[derive(Parser, Debug)]
    struct TestArgs {
        #[clap(flatten)]
        solve: Solve,
    }

    fn solve(args: &[&str]) -> Solve {
        TestArgs::parse_from(std::iter::once("ply").chain(args.iter().copied())).solve
    }

    #[test]
    fn test_report_for_tic_tac_toe() {
        let solve = solve(&["--game", "tic-tac-toe", "--position", "xx./oo./...", "--depth", "1"]);

        let report = solve.report::<TicTacToe>().unwrap();

        assert_eq!(report.best_move.as_deref(), Some("xxx/oo./..."));
        assert_eq!(report.index, Some(0));
        assert_eq!(report.value, WIN);
        assert!(report.exhaustive);
    }

    #[test]
    fn test_report_without_a_move() {
        let solve = solve(&["--position", "0,0", "--depth", "3"]);

        let report = solve.report::<Nim>().unwrap();

        assert_eq!(report.best_move, None);
        assert_eq!(report.index, None);
    }

    #[test]
    fn test_report_serializes() {
        let solve = solve(&["--game", "counter", "--position", "5", "--depth", "1", "--json"]);

        let report = solve.report::<Counter>().unwrap();
        let json: serde_json::Value = serde_json::to_value(&report).unwrap();

        assert_eq!(json["best_move"], "7");
        assert_eq!(json["to_move"], "first");
        assert_eq!(json["value"], 7);
    }

    #[test]
    fn test_negative_depth_fails() {
        let solve = solve(&["--depth", "-3"]);

        assert!(solve.report::<Nim>().is_err());
    }
}
