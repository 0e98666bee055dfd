use log::debug;

use crate::{
    board::{Board, Effect},
    card::Color,
    play::{CompleteMove, Move, Order, SubMove},
    player::PlayerId,
    selection::Selection,
};

/// Interaction phases of a turn. Each phase carries only what it needs to
/// finish its order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TurnPhase {
    #[default]
    Phase1,
    Phase2Deploy { card: Color },
    Phase2Ninja,
    /// First order given. A hand card deploys home, a province card starts a transfer.
    Second1,
    Phase2Transfer { from: PlayerId, card: Color },
    Phase3,
    /// The move is composed (or it is not our turn); nothing is clickable.
    Disabled,
}

impl TurnPhase {
    pub fn accepts_hand(&self) -> bool {
        matches!(self, TurnPhase::Phase1 | TurnPhase::Second1)
    }

    pub fn accepts_stack(&self) -> bool {
        matches!(
            self,
            TurnPhase::Phase2Ninja | TurnPhase::Second1 | TurnPhase::Phase3
        )
    }

    pub fn accepts_player(&self) -> bool {
        matches!(
            self,
            TurnPhase::Phase2Deploy { .. } | TurnPhase::Phase2Transfer { .. }
        )
    }

    pub fn accepts_decline(&self) -> bool {
        self == &TurnPhase::Phase3
    }

    pub fn prompt(&self) -> &'static str {
        match self {
            TurnPhase::Phase1 => "Pick a card from your hand",
            TurnPhase::Phase2Deploy { .. } => "Pick the opponent to deploy to",
            TurnPhase::Phase2Ninja => "Pick an opponent's card to kill",
            TurnPhase::Second1 => "Deploy a hand card home or pick a card to transfer",
            TurnPhase::Phase2Transfer { .. } => "Pick the province to transfer to",
            TurnPhase::Phase3 => "Attack an opponent's card or decline",
            TurnPhase::Disabled => "Waiting",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    HandCard { index: usize },
    StackCard { pid: PlayerId, color: Color },
    Player { pid: PlayerId },
    DeclineAttack,
}

/// Everything a single transition does, computed without touching the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub next: TurnPhase,
    pub selection: Selection,
    pub order: Option<(Order, Option<SubMove>)>,
    pub effects: Vec<Effect>,
}

impl Step {
    fn highlight(next: TurnPhase, selection: Selection) -> Self {
        Step {
            next,
            selection,
            order: None,
            effects: vec![],
        }
    }

    fn order(
        next: TurnPhase,
        order: Order,
        sub_move: Option<SubMove>,
        effects: Vec<Effect>,
    ) -> Self {
        Step {
            next,
            selection: Selection::None,
            order: Some((order, sub_move)),
            effects,
        }
    }
}

/// Computes the transition for `input` in `phase`, or `None` when the input
/// is not part of the phase's vocabulary or would target a card that is not
/// there.
pub fn step(phase: TurnPhase, input: Input, me: PlayerId, board: &Board) -> Option<Step> {
    use Input::*;
    use TurnPhase::*;

    let step = match (phase, input) {
        (Phase1, HandCard { index }) => {
            let card = board.hand.get(index)?;
            let next = if card.is_ninja() {
                Phase2Ninja
            } else {
                Phase2Deploy { card }
            };
            Step::highlight(next, Selection::HandCard { index })
        }
        (Phase1, _) => return None,

        (Phase2Deploy { card }, Player { pid }) if pid != me => Step::order(
            Second1,
            Order::First,
            Some(SubMove::Deploy { to: pid, color: card }),
            vec![Effect::TakeFromHand(card), Effect::AddCard(pid, card)],
        ),
        (Phase2Deploy { .. }, _) => return None,

        (Phase2Ninja, StackCard { pid, color }) if pid != me => Step::order(
            Second1,
            Order::First,
            Some(SubMove::Ninja { to: pid, color }),
            vec![Effect::TakeFromHand(Color::Ninja), Effect::RemoveCard(pid, color)],
        ),
        (Phase2Ninja, _) => return None,

        (Second1, HandCard { index }) => {
            let card = board.hand.get(index)?;
            if card.is_ninja() {
                return None;
            }
            Step::order(
                Phase3,
                Order::Second,
                Some(SubMove::Deploy { to: me, color: card }),
                vec![Effect::TakeFromHand(card), Effect::AddCard(me, card)],
            )
        }
        (Second1, StackCard { pid, color }) if pid != me && board.count(pid, color) > 0 => {
            Step::highlight(
                Phase2Transfer { from: pid, card: color },
                Selection::StackCard { pid, color },
            )
        }
        (Second1, _) => return None,

        (Phase2Transfer { from, card }, Player { pid }) if pid != me && pid != from => Step::order(
            Phase3,
            Order::Second,
            Some(SubMove::Transfer { from, to: pid, color: card }),
            vec![Effect::RemoveCard(from, card), Effect::AddCard(pid, card)],
        ),
        (Phase2Transfer { .. }, _) => return None,

        (Phase3, StackCard { pid, color }) if pid != me => Step::order(
            Disabled,
            Order::Third,
            Some(SubMove::Attack { to: pid, color }),
            vec![Effect::RemoveCard(pid, color)],
        ),
        (Phase3, DeclineAttack) => Step::order(Disabled, Order::Third, None, vec![]),
        (Phase3, _) => return None,

        (Disabled, _) => return None,
    };

    if step.effects.iter().all(|e| board.permits(e)) {
        Some(step)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Ignored,
    Advanced(TurnPhase),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnMachine {
    phase: TurnPhase,
    selection: Selection,
    pending: Move,
}

impl TurnMachine {
    pub fn new() -> Self {
        TurnMachine::default()
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn is_phase(&self, phase: TurnPhase) -> bool {
        self.phase == phase
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn is_hand_selected(&self, index: usize) -> bool {
        self.selection.is_hand_selected(index)
    }

    pub fn is_stack_selected(&self, pid: PlayerId, color: Color) -> bool {
        self.selection.is_stack_selected(pid, color)
    }

    pub fn pending(&self) -> &Move {
        &self.pending
    }

    pub fn is_submittable(&self) -> bool {
        self.pending.is_complete()
    }

    pub fn submission(&self) -> Option<CompleteMove> {
        self.pending.complete()
    }

    pub fn enter_phase1(&mut self) {
        self.pending.clear();
        self.selection.clear();
        self.phase = TurnPhase::Phase1;
    }

    /// Applies `input`, mutating `board` with the optimistic effects of the
    /// order it completes.
    pub fn handle(&mut self, input: Input, me: PlayerId, board: &mut Board) -> Transition {
        match step(self.phase, input, me, board) {
            None => {
                debug!("ignoring {:?} in {:?}", input, self.phase);
                Transition::Ignored
            }
            Some(step) => {
                for effect in &step.effects {
                    board.apply(*effect);
                }
                if let Some((order, sub_move)) = step.order {
                    self.pending.write(order, sub_move);
                }
                self.selection = step.selection;
                self.phase = step.next;
                debug!("advanced to {:?}", self.phase);
                Transition::Advanced(step.next)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use crate::{
        board::Board,
        card::Color,
        hand::Hand,
        play::SubMove,
        player::Player,
        selection::Selection,
        turn::{Input, Transition, TurnMachine, TurnPhase},
    };

    const ME: u64 = 1;

    fn board() -> Board {
        Board::new(
            vec![
                Player::new(1, "Me").with_cards(&[(Color::Yellow, 1)]),
                Player::new(2, "P2").with_cards(&[(Color::Blue, 2), (Color::Red, 1)]),
                Player::new(3, "P3").with_cards(&[(Color::Green, 1)]),
            ],
            Hand::from_snapshot(vec![Color::Red, Color::Ninja, Color::Green, Color::Red]),
        )
    }

    fn index_of(board: &Board, color: Color) -> usize {
        board.hand.cards().iter().position(|&c| c == color).unwrap()
    }

    fn totals(board: &Board) -> Vec<u64> {
        Color::iter().map(|c| board.total(c)).collect()
    }

    fn discards(sub_move: &Option<SubMove>) -> Vec<u64> {
        let discarded = sub_move.map(|s| s.discards()).unwrap_or_default();
        Color::iter()
            .map(|c| discarded.iter().filter(|&&d| d == c).count() as u64)
            .collect()
    }

    #[test]
    fn deploy_should_move_hand_card_to_opponent() {
        let mut board = board();
        let mut turn = TurnMachine::new();
        let red = index_of(&board, Color::Red);

        turn.handle(Input::HandCard { index: red }, ME, &mut board);
        assert_eq!(turn.phase(), TurnPhase::Phase2Deploy { card: Color::Red });
        assert!(turn.is_hand_selected(red));

        turn.handle(Input::Player { pid: 2 }, ME, &mut board);
        assert_eq!(
            turn.pending().first,
            Some(SubMove::Deploy { to: 2, color: Color::Red })
        );
        assert_eq!(board.hand.count(Color::Red), 1);
        assert_eq!(board.count(2, Color::Red), 2);
        assert_eq!(turn.phase(), TurnPhase::Second1);
        assert_eq!(turn.selection(), Selection::None);
    }

    #[test]
    fn deploy_to_self_should_be_ignored() {
        let mut board = board();
        let mut turn = TurnMachine::new();
        turn.handle(Input::HandCard { index: index_of(&board, Color::Red) }, ME, &mut board);
        let before = board.clone();

        assert_eq!(turn.handle(Input::Player { pid: ME }, ME, &mut board), Transition::Ignored);
        assert_eq!(turn.phase(), TurnPhase::Phase2Deploy { card: Color::Red });
        assert_eq!(board, before);
    }

    #[test]
    fn ninja_should_kill_opponent_card() {
        let mut board = board();
        let mut turn = TurnMachine::new();

        turn.handle(Input::HandCard { index: index_of(&board, Color::Ninja) }, ME, &mut board);
        assert_eq!(turn.phase(), TurnPhase::Phase2Ninja);

        turn.handle(Input::StackCard { pid: 2, color: Color::Blue }, ME, &mut board);
        assert_eq!(
            turn.pending().first,
            Some(SubMove::Ninja { to: 2, color: Color::Blue })
        );
        assert!(!board.hand.contains(Color::Ninja));
        assert_eq!(board.count(2, Color::Blue), 1);
        assert_eq!(turn.phase(), TurnPhase::Second1);
    }

    #[test]
    fn ninja_on_empty_entry_should_be_ignored() {
        let mut board = board();
        let mut turn = TurnMachine::new();
        turn.handle(Input::HandCard { index: index_of(&board, Color::Ninja) }, ME, &mut board);

        let result = turn.handle(Input::StackCard { pid: 3, color: Color::Purple }, ME, &mut board);
        assert_eq!(result, Transition::Ignored);
        assert_eq!(turn.phase(), TurnPhase::Phase2Ninja);
        assert!(board.hand.contains(Color::Ninja));
    }

    #[test]
    fn second_order_should_not_deploy_ninja() {
        let mut board = board();
        let mut turn = TurnMachine::new();
        turn.handle(Input::HandCard { index: index_of(&board, Color::Red) }, ME, &mut board);
        turn.handle(Input::Player { pid: 3 }, ME, &mut board);

        let ninja = index_of(&board, Color::Ninja);
        assert_eq!(
            turn.handle(Input::HandCard { index: ninja }, ME, &mut board),
            Transition::Ignored
        );

        let green = index_of(&board, Color::Green);
        turn.handle(Input::HandCard { index: green }, ME, &mut board);
        assert_eq!(
            turn.pending().second,
            Some(SubMove::Deploy { to: ME, color: Color::Green })
        );
        assert_eq!(board.count(ME, Color::Green), 1);
        assert_eq!(turn.phase(), TurnPhase::Phase3);
    }

    #[test]
    fn transfer_should_ignore_self_and_origin() {
        let mut board = board();
        let mut turn = TurnMachine::new();
        turn.handle(Input::HandCard { index: index_of(&board, Color::Red) }, ME, &mut board);
        turn.handle(Input::Player { pid: 3 }, ME, &mut board);

        turn.handle(Input::StackCard { pid: 2, color: Color::Blue }, ME, &mut board);
        assert_eq!(turn.phase(), TurnPhase::Phase2Transfer { from: 2, card: Color::Blue });
        assert!(turn.is_stack_selected(2, Color::Blue));

        assert_eq!(turn.handle(Input::Player { pid: 2 }, ME, &mut board), Transition::Ignored);
        assert_eq!(turn.handle(Input::Player { pid: ME }, ME, &mut board), Transition::Ignored);
        assert_eq!(turn.phase(), TurnPhase::Phase2Transfer { from: 2, card: Color::Blue });

        turn.handle(Input::Player { pid: 3 }, ME, &mut board);
        assert_eq!(
            turn.pending().second,
            Some(SubMove::Transfer { from: 2, to: 3, color: Color::Blue })
        );
        assert_eq!(board.count(2, Color::Blue), 1);
        assert_eq!(board.count(3, Color::Blue), 1);
        assert_eq!(turn.phase(), TurnPhase::Phase3);
        assert_eq!(turn.selection(), Selection::None);
    }

    #[test]
    fn transfer_from_own_province_should_be_ignored() {
        let mut board = board();
        let mut turn = TurnMachine::new();
        turn.handle(Input::HandCard { index: index_of(&board, Color::Red) }, ME, &mut board);
        turn.handle(Input::Player { pid: 2 }, ME, &mut board);

        let own = Input::StackCard {
            pid: ME,
            color: Color::Yellow,
        };
        let result = turn.handle(own, ME, &mut board);
        assert_eq!(result, Transition::Ignored);
        assert_eq!(turn.phase(), TurnPhase::Second1);
    }

    #[test]
    fn attack_should_remove_opponent_card() {
        let mut board = board();
        let mut turn = TurnMachine::new();
        turn.handle(Input::HandCard { index: index_of(&board, Color::Red) }, ME, &mut board);
        turn.handle(Input::Player { pid: 2 }, ME, &mut board);
        turn.handle(Input::HandCard { index: index_of(&board, Color::Green) }, ME, &mut board);

        assert_eq!(
            turn.handle(Input::StackCard { pid: ME, color: Color::Yellow }, ME, &mut board),
            Transition::Ignored
        );
        turn.handle(Input::StackCard { pid: 3, color: Color::Green }, ME, &mut board);
        assert_eq!(
            turn.pending().third,
            Some(Some(SubMove::Attack { to: 3, color: Color::Green }))
        );
        assert_eq!(board.count(3, Color::Green), 0);
        assert_eq!(turn.phase(), TurnPhase::Disabled);
        assert!(turn.is_submittable());
    }

    #[test]
    fn decline_should_complete_move_with_null_third() {
        let mut board = board();
        let mut turn = TurnMachine::new();
        turn.handle(Input::HandCard { index: index_of(&board, Color::Red) }, ME, &mut board);
        turn.handle(Input::Player { pid: 2 }, ME, &mut board);
        turn.handle(Input::HandCard { index: index_of(&board, Color::Green) }, ME, &mut board);
        turn.handle(Input::DeclineAttack, ME, &mut board);

        assert_eq!(turn.pending().third, Some(None));
        assert_eq!(turn.phase(), TurnPhase::Disabled);
        assert_eq!(turn.submission().unwrap().third, None);
    }

    #[test]
    fn disabled_should_ignore_everything() {
        let mut board = board();
        let mut turn = TurnMachine::new();
        turn.handle(Input::HandCard { index: index_of(&board, Color::Red) }, ME, &mut board);
        turn.handle(Input::Player { pid: 2 }, ME, &mut board);
        turn.handle(Input::HandCard { index: index_of(&board, Color::Green) }, ME, &mut board);
        turn.handle(Input::DeclineAttack, ME, &mut board);
        let before = (turn.clone(), board.clone());

        for input in [
            Input::HandCard { index: 0 },
            Input::StackCard { pid: 2, color: Color::Blue },
            Input::Player { pid: 3 },
            Input::DeclineAttack,
        ] {
            assert_eq!(turn.handle(input, ME, &mut board), Transition::Ignored);
        }
        assert_eq!((turn, board), before);
    }

    #[test]
    fn each_order_should_fill_exactly_one_field_and_respect_discards() {
        let mut board = board();
        let mut turn = TurnMachine::new();
        let script = [
            Input::DeclineAttack,
            Input::HandCard { index: 1 },
            Input::Player { pid: ME },
            Input::StackCard { pid: 2, color: Color::Red },
            Input::Player { pid: 2 },
            Input::StackCard { pid: 2, color: Color::Blue },
            Input::Player { pid: 2 },
            Input::Player { pid: 3 },
            Input::HandCard { index: 0 },
            Input::StackCard { pid: 3, color: Color::Blue },
        ];

        for input in script {
            let filled = turn.pending().filled();
            let before = totals(&board);
            let result = turn.handle(input, ME, &mut board);
            let written = turn.pending().filled() - filled;
            assert!(written <= 1);
            if result == Transition::Ignored {
                assert_eq!(written, 0);
            }

            let sub_move = match written {
                0 => None,
                _ => match turn.pending().filled() {
                    1 => turn.pending().first,
                    2 => turn.pending().second,
                    _ => turn.pending().third.flatten(),
                },
            };
            let after = totals(&board);
            let gone = discards(&sub_move);
            for i in 0..before.len() {
                assert_eq!(after[i] + gone[i], before[i]);
            }
            assert_eq!(turn.is_submittable(), turn.pending().filled() == 3);
        }
        assert!(turn.is_submittable());
    }

    #[test]
    fn enter_phase1_should_drop_partial_move() {
        let mut board = board();
        let mut turn = TurnMachine::new();
        turn.handle(Input::HandCard { index: index_of(&board, Color::Red) }, ME, &mut board);
        turn.handle(Input::Player { pid: 2 }, ME, &mut board);
        turn.handle(Input::StackCard { pid: 2, color: Color::Blue }, ME, &mut board);

        turn.enter_phase1();
        assert_eq!(turn.phase(), TurnPhase::Phase1);
        assert!(turn.pending().is_empty());
        assert_eq!(turn.selection(), Selection::None);
    }
}
