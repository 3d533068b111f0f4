use color_eyre::eyre::{Result, WrapErr};
use itertools::Itertools;

use super::{for_each_game, GameArgs};
use crate::games::Game;

#[derive(clap::Args, Debug)]
pub(crate) struct Tree {
    #[clap(flatten)]
    game: GameArgs,
}

impl Tree {
    pub(crate) fn run(self) -> Result<()> {
        for_each_game!(self.game, self, print_tree)
    }

    fn print_tree<G: Game>(&self) -> Result<()> {
        let (tree, line) = self.render::<G>()?;

        println!("{tree}");
        if !line.is_empty() {
            println!("Expected line: {line}");
        }

        Ok(())
    }

    fn render<G: Game>(&self) -> Result<(String, String)> {
        let start: G = self.game.start()?;
        let position = start.to_string();
        let result = self
            .game
            .search::<G>(start.to_move())
            .explain(start, self.game.depth())
            .wrap_err_with(|| format!("Explaining the search from {position} failed"))?;

        let line = result.chosen_route().iter().join(" -> ");

        Ok((result.to_text_tree(), line))
    }
}
