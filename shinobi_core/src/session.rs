use log::{debug, info};

use crate::{
    board::Board,
    card::Color,
    error::SubmitError,
    events::ServerEvent,
    game::{Game, GameId, GameState},
    hand::Hand,
    play::CompleteMove,
    player::{Player, PlayerId},
    turn::{Input, Transition, TurnMachine},
};

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub game: Game,
    pub players: Vec<Player>,
    pub hand: Vec<Color>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Route {
    #[default]
    Lobby,
    Game,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    Refetch,
    EnterGame,
}

/// Identifies one refresh cycle. Only the most recent cycle may install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Local state of one seat at one game: the last snapshot, the optimistic
/// board derived from it and the turn being composed.
#[derive(Debug, Clone)]
pub struct Session {
    gid: GameId,
    username: String,
    game: Option<Game>,
    board: Board,
    installed: Board,
    awaiting_snapshot: bool,
    my_pid: Option<PlayerId>,
    turn: TurnMachine,
    route: Route,
    generation: u64,
}

pub fn find_my_pid(players: &[Player], username: &str) -> Option<PlayerId> {
    players
        .iter()
        .find(|p| p.username == username)
        .map(|p| p.pid)
}

impl Session {
    pub fn new(gid: GameId, username: &str) -> Self {
        Session {
            gid,
            username: username.to_string(),
            game: None,
            board: Board::default(),
            installed: Board::default(),
            awaiting_snapshot: false,
            my_pid: None,
            turn: TurnMachine::new(),
            route: Route::Lobby,
            generation: 0,
        }
    }

    pub fn gid(&self) -> GameId {
        self.gid
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[Player] {
        &self.board.players
    }

    pub fn hand(&self) -> &Hand {
        &self.board.hand
    }

    pub fn my_pid(&self) -> Option<PlayerId> {
        self.my_pid
    }

    pub fn turn(&self) -> &TurnMachine {
        &self.turn
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn is_owner(&self) -> bool {
        self.game
            .as_ref()
            .map(|g| g.owner == self.username)
            .unwrap_or(false)
    }

    /// Whether the turn machine is allowed to run at all. After an accepted
    /// move it stays off until the next snapshot arrives.
    pub fn is_my_turn(&self) -> bool {
        if self.awaiting_snapshot {
            return false;
        }
        match (&self.game, self.my_pid) {
            (Some(game), Some(pid)) => game.is_turn_of(pid),
            _ => false,
        }
    }

    pub fn begin_refresh(&mut self) -> Ticket {
        self.generation += 1;
        Ticket(self.generation)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.generation
    }

    /// Replaces all local state with `snapshot`, unless a newer refresh has
    /// been started since `ticket` was issued. Returns the route to show, or
    /// `None` when the snapshot was stale and dropped.
    pub fn install(&mut self, ticket: Ticket, snapshot: Snapshot) -> Option<Route> {
        if !self.is_current(ticket) {
            debug!(
                "dropping stale snapshot {} (current {})",
                ticket.0, self.generation
            );
            return None;
        }

        let was_my_turn = self.is_my_turn();
        let Snapshot {
            game,
            players,
            hand,
        } = snapshot;

        self.my_pid = find_my_pid(&players, &self.username);
        self.board = Board::new(players, Hand::from_snapshot(hand));
        self.installed = self.board.clone();
        self.awaiting_snapshot = false;
        self.route = match game.state {
            GameState::Setup => Route::Lobby,
            GameState::Started | GameState::Ended => Route::Game,
        };
        self.game = Some(game);

        // The optimistic board is gone, so is any move built on top of it.
        self.turn.enter_phase1();
        if self.is_my_turn() && !was_my_turn {
            info!("it is your turn in game {}", self.gid);
        }
        Some(self.route)
    }

    pub fn apply_game(&mut self, game: Game) {
        if game.gid == self.gid {
            self.game = Some(game);
        }
    }

    pub fn click(&mut self, input: Input) -> Transition {
        match self.my_pid {
            Some(me) if self.is_my_turn() => self.turn.handle(input, me, &mut self.board),
            _ => {
                debug!("ignoring {:?}, not our turn", input);
                Transition::Ignored
            }
        }
    }

    pub fn prepare_submission(&self) -> Result<(PlayerId, CompleteMove), SubmitError> {
        let pid = match self.my_pid {
            Some(pid) if self.is_my_turn() => pid,
            _ => return Err(SubmitError::NotYourTurn),
        };
        let body = self.turn.submission().ok_or(SubmitError::Incomplete)?;
        Ok((pid, body))
    }

    pub fn submission_accepted(&mut self) {
        self.awaiting_snapshot = true;
        self.turn.enter_phase1();
    }

    /// Drops the move, the highlight and every optimistic change.
    pub fn discard(&mut self) {
        self.board = self.installed.clone();
        self.turn.enter_phase1();
    }

    pub fn on_event(&self, event: &ServerEvent) -> Reaction {
        match event {
            ServerEvent::State(Some(GameState::Started)) if self.route == Route::Lobby => {
                Reaction::EnterGame
            }
            ServerEvent::Players(_) | ServerEvent::CurrentPlayer(_) | ServerEvent::State(_) => {
                Reaction::Refetch
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::{
        card::Color,
        error::SubmitError,
        events::ServerEvent,
        game::{Game, GameState},
        play::SubMove,
        player::Player,
        session::{Reaction, Route, Session, Snapshot},
        turn::{Input, Transition, TurnPhase},
    };

    pub fn game(state: GameState, current_player: Option<u64>) -> Game {
        Game {
            gid: 1,
            name: "Test".to_string(),
            owner: "Me".to_string(),
            state,
            current_player,
            winners: vec![],
        }
    }

    pub fn snapshot(current_player: u64) -> Snapshot {
        Snapshot {
            game: game(GameState::Started, Some(current_player)),
            players: vec![
                Player::new(1, "Me").with_color(Color::Yellow),
                Player::new(2, "P2")
                    .with_color(Color::Blue)
                    .with_cards(&[(Color::Blue, 2), (Color::Red, 1)]),
                Player::new(3, "P3").with_color(Color::Green),
            ],
            hand: vec![Color::Red, Color::Green, Color::Ninja, Color::Red],
        }
    }

    fn seated(current_player: u64) -> Session {
        let mut session = Session::new(1, "Me");
        let ticket = session.begin_refresh();
        session.install(ticket, snapshot(current_player));
        session
    }

    #[test]
    fn install_should_find_my_pid_and_sort_hand() {
        let session = seated(1);
        assert_eq!(session.my_pid(), Some(1));
        assert!(session.is_my_turn());
        assert_eq!(
            session.hand().cards(),
            &[Color::Green, Color::Ninja, Color::Red, Color::Red]
        );
        assert_eq!(session.route(), Route::Game);
    }

    #[test]
    fn install_should_route_setup_games_to_lobby() {
        let mut session = Session::new(1, "Me");
        let ticket = session.begin_refresh();
        let mut setup = snapshot(1);
        setup.game = game(GameState::Setup, None);
        assert_eq!(session.install(ticket, setup), Some(Route::Lobby));
        assert!(!session.is_my_turn());
    }

    #[test]
    fn install_should_drop_superseded_snapshots() {
        let mut session = Session::new(1, "Me");
        let older = session.begin_refresh();
        let newer = session.begin_refresh();

        assert_eq!(session.install(newer, snapshot(2)), Some(Route::Game));
        assert_eq!(session.install(older, snapshot(1)), None);
        assert_eq!(session.game().unwrap().current_player, Some(2));
    }

    #[test]
    fn clicks_should_be_ignored_when_not_my_turn() {
        let mut session = seated(2);
        assert_eq!(session.click(Input::HandCard { index: 0 }), Transition::Ignored);
        assert_eq!(session.turn().phase(), TurnPhase::Phase1);
    }

    #[test]
    fn clicks_should_be_ignored_when_not_seated() {
        let mut session = Session::new(1, "Spectator");
        let ticket = session.begin_refresh();
        session.install(ticket, snapshot(1));
        assert_eq!(session.my_pid(), None);
        assert_eq!(session.click(Input::HandCard { index: 0 }), Transition::Ignored);
    }

    #[test]
    fn turn_change_should_force_phase1_mid_composition() {
        let mut session = seated(1);
        session.click(Input::HandCard { index: 2 });
        session.click(Input::Player { pid: 2 });
        session.click(Input::HandCard { index: 0 });
        assert_eq!(session.turn().phase(), TurnPhase::Phase3);
        assert_eq!(session.turn().pending().filled(), 2);

        let ticket = session.begin_refresh();
        session.install(ticket, snapshot(1));
        assert_eq!(session.turn().phase(), TurnPhase::Phase1);
        assert!(session.turn().pending().is_empty());
        assert!(session.turn().selection().is_none());
        assert_eq!(session.board().count(2, Color::Red), 1);
    }

    #[test]
    fn prepare_submission_should_require_complete_move() {
        let mut session = seated(1);
        assert!(matches!(
            session.prepare_submission(),
            Err(SubmitError::Incomplete)
        ));
        session.click(Input::HandCard { index: 2 });
        session.click(Input::Player { pid: 2 });
        session.click(Input::HandCard { index: 0 });
        session.click(Input::DeclineAttack);

        let (pid, body) = session.prepare_submission().unwrap();
        assert_eq!(pid, 1);
        assert_eq!(body.first, SubMove::Deploy { to: 2, color: Color::Red });
        assert_eq!(body.second, SubMove::Deploy { to: 1, color: Color::Green });
        assert_eq!(body.third, None);
    }

    #[test]
    fn prepare_submission_should_reject_other_turns() {
        let session = seated(3);
        assert!(matches!(
            session.prepare_submission(),
            Err(SubmitError::NotYourTurn)
        ));
    }

    #[test]
    fn discard_should_restore_installed_board() {
        let mut session = seated(1);
        session.click(Input::HandCard { index: 2 });
        session.click(Input::Player { pid: 2 });
        assert_eq!(session.board().count(2, Color::Red), 2);

        session.discard();

        assert_eq!(session.board().count(2, Color::Red), 1);
        assert_eq!(session.hand().len(), 4);
        assert_eq!(session.turn().phase(), TurnPhase::Phase1);
    }

    #[test]
    fn accepted_submission_should_lock_input_until_next_install() {
        let mut session = seated(1);
        session.click(Input::HandCard { index: 2 });
        session.click(Input::Player { pid: 2 });
        session.click(Input::HandCard { index: 0 });
        session.click(Input::DeclineAttack);

        session.submission_accepted();

        assert!(!session.is_my_turn());
        assert_eq!(session.click(Input::HandCard { index: 0 }), Transition::Ignored);
        assert!(matches!(
            session.prepare_submission(),
            Err(SubmitError::NotYourTurn)
        ));

        let ticket = session.begin_refresh();
        session.install(ticket, snapshot(1));
        assert!(session.is_my_turn());
    }

    #[test]
    fn state_started_should_enter_game_only_from_lobby() {
        let mut session = Session::new(1, "Me");
        let started = ServerEvent::State(Some(GameState::Started));
        assert_eq!(session.on_event(&started), Reaction::EnterGame);

        let ticket = session.begin_refresh();
        session.install(ticket, snapshot(1));
        assert_eq!(session.on_event(&started), Reaction::Refetch);
        assert_eq!(
            session.on_event(&ServerEvent::CurrentPlayer(Some(2))),
            Reaction::Refetch
        );
    }
}
