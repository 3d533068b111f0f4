use std::fmt::{Debug, Display};

use text_trees::StringTreeNode;

#[derive(Debug, Clone, PartialEq, Eq)]
/// This is returned from [Evaluator::explain](super::Evaluator::explain)
/// It contains all the information we generated about the game tree
pub enum MinMaxReturn<L, V> {
    /// This is a non-leaf node in the game tree
    /// We have information about all the options we looked at as well as the chosen score
    Node {
        /// Whether this node was a maximizing node or not
        is_maximizing: bool,
        /// A 'recursive' look at all the options under us, each with the label of the child
        /// This array is sorted by the score of the option, best first for whoever moves here.
        /// Options with equal scores keep their original order.
        options: Vec<(L, Self)>,
        /// The chosen score
        /// This should always match the score of the first element in `options`
        score: V,
    },
    /// Represents a leaf node in the game tree
    /// This happens when we reach a terminal position or the maximum depth
    Leaf {
        #[allow(missing_docs)]
        score: V,
    },
}

impl<L, V> MinMaxReturn<L, V> {
    /// Returns the score for this node
    pub fn score(&self) -> &V {
        match self {
            MinMaxReturn::Node { score, .. } => score,
            MinMaxReturn::Leaf { score } => score,
        }
    }

    /// Returns the label of the option chosen at this node
    /// If we are a leaf node, this will return None
    pub fn best_label(&self) -> Option<&L> {
        match self {
            MinMaxReturn::Leaf { .. } => None,
            MinMaxReturn::Node { options, .. } => options.first().map(|(label, _)| label),
        }
    }

    /// Returns all the labels in the 'route' through the game tree that minimax took
    /// This is useful for debugging as it shows the line of play both sides are expected to
    /// follow
    pub fn chosen_route(&self) -> Vec<&L> {
        let mut route = vec![];
        let mut current = self;

        while let MinMaxReturn::Node { options, .. } = current {
            match options.first() {
                Some((label, next)) => {
                    route.push(label);
                    current = next;
                }
                None => break,
            }
        }

        route
    }

    /// This returns a visual representation of the game tree that minimax generated
    /// It shows the label and chosen score of every node, best option first
    pub fn to_text_tree(&self) -> String
    where
        L: Display,
        V: Debug,
    {
        format!("{}", self.to_text_tree_node("root".to_owned()))
    }

    fn to_text_tree_node(&self, label: String) -> StringTreeNode
    where
        L: Display,
        V: Debug,
    {
        let mut node = StringTreeNode::new(format!("{} {:?}", label, self.score()));

        if let MinMaxReturn::Node { options, .. } = self {
            for (l, result) in options {
                node.push_node(result.to_text_tree_node(l.to_string()));
            }
        }

        node
    }
}
