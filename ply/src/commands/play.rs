use color_eyre::eyre::{eyre, Result};
use tracing::{debug, warn};

use super::{for_each_game, GameArgs};
use crate::games::{Game, Side};

#[derive(clap::Args, Debug)]
pub(crate) struct Play {
    #[clap(flatten)]
    game: GameArgs,

    /// Stop after this many moves, even if the game is not over
    #[clap(long, default_value_t = 20)]
    max_plies: usize,
}

impl Play {
    pub(crate) fn run(self) -> Result<()> {
        for_each_game!(self.game, self, play)
    }

    fn play<G: Game>(&self) -> Result<()> {
        let start: G = self.game.start()?;
        println!("    {start}");

        let moves = self.moves(start)?;
        for (ply, (mover, board, value)) in moves.iter().enumerate() {
            println!("{:>3}. {board} ({mover:?} expects {value})", ply + 1);
        }

        if let Some((_, last, _)) = moves.last() {
            let outcome = last.evaluate(Side::First);
            println!("Final score for {:?}: {outcome}", Side::First);
        }

        Ok(())
    }

    /// Every move the search picks, one side after the other, with the value the mover expected
    fn moves<G: Game>(&self, start: G) -> Result<Vec<(Side, G, i32)>> {
        if self.game.depth() == 0 {
            return Err(eyre!("A depth of 0 never picks a move, use at least 1"));
        }

        let mut board = start;
        let mut moves = vec![];

        while moves.len() < self.max_plies {
            let mover = board.to_move();
            let chosen = self
                .game
                .search::<G>(mover)
                .best_move(board.clone(), self.game.depth())?;

            if !chosen.exhaustive {
                warn!(ply = moves.len(), "Move picked from an incomplete search");
            }

            match chosen.board {
                Some(next) => {
                    debug!(ply = moves.len(), board = %next, value = chosen.value, "Moved");
                    moves.push((mover, next.clone(), chosen.value));
                    board = next;
                }
                None => break,
            }
        }

        Ok(moves)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::games::{Counter, TicTacToe};

    #[derive(Parser, Debug)]
    struct TestArgs {
        #[clap(flatten)]
        play: Play,
    }

    fn play(args: &[&str]) -> Play {
        TestArgs::parse_from(std::iter::once("ply").chain(args.iter().copied())).play
    }

    #[test]
    fn test_tic_tac_toe_ends_in_a_draw() {
        let play = play(&["--depth", "7", "--max-plies", "7"]);
        let start = TicTacToe::parse("x../.o./...").unwrap();

        let moves = play.moves(start).unwrap();

        let (_, last, _) = moves.last().unwrap();
        assert!(last.successors().is_empty());
        assert_eq!(last.evaluate(Side::First), 0);
    }

    #[test]
    fn test_endless_game_stops_at_the_ply_limit() {
        let play = play(&["--depth", "2", "--max-plies", "5"]);

        let moves = play.moves(Counter::start()).unwrap();

        assert_eq!(moves.len(), 5);
        assert_eq!(moves[0].0, Side::First);
        assert_eq!(moves[1].0, Side::Second);
    }

    #[test]
    fn test_depth_zero_is_refused() {
        let play = play(&["--depth", "0"]);

        assert!(play.moves(Counter::start()).is_err());
    }
}
