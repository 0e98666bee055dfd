use std::str::FromStr;

use itertools::Itertools;

use shinobi_core::{
    card::Color,
    game::{Game, User},
    notice::Notice,
    play::SubMove,
    player::PlayerId,
    session::{Route, Session},
    turn::{Input, TurnPhase},
};

pub static RULES: &str = "
*** Shinobi ***
Every player secretly owns a color. Each turn has three orders:
  1. Deploy a hand card to an opponent's province, or play a ninja to kill one of their cards.
  2. Deploy a hand card to your own province, or transfer a card between two other provinces.
  3. Attack a card in an opponent's province, or decline if you cannot.
When the deck runs out, the color with the most cards on the table wins.";

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum CliAction {
    Quit,
    Rules,
    CardEffects,
    Help,
    Hand(usize),
    Stack(PlayerId, Color),
    Player(PlayerId),
    Decline,
    Submit,
    Reset,
    Refresh,
    Join,
    Leave,
    Kick(PlayerId),
    Start,
    Create(String),
    Games,
    Users,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseActionError;

impl CliAction {
    pub fn info(&self) -> String {
        match self {
            CliAction::Quit => "quit".to_string(),
            CliAction::Rules => "display rules".to_string(),
            CliAction::CardEffects => "display card effects".to_string(),
            CliAction::Help => "show the board and the available commands".to_string(),
            CliAction::Hand(_) => "pick the hand card at index N".to_string(),
            CliAction::Stack(_, _) => format!(
                "pick the COLOR card in the province of player PID ({})",
                Color::stack_colors().join("|")
            ),
            CliAction::Player(_) => "pick player PID".to_string(),
            CliAction::Decline => "decline to attack".to_string(),
            CliAction::Submit => "submit the move".to_string(),
            CliAction::Reset => "discard the move and reload the game".to_string(),
            CliAction::Refresh => "reload the game".to_string(),
            CliAction::Join => "join the game".to_string(),
            CliAction::Leave => "leave the game".to_string(),
            CliAction::Kick(_) => "remove player PID from the game".to_string(),
            CliAction::Start => "start the game".to_string(),
            CliAction::Create(_) => "create a game called NAME".to_string(),
            CliAction::Games => "list games".to_string(),
            CliAction::Users => "list users and scores".to_string(),
        }
    }

    pub fn cmd_str(&self) -> String {
        match self {
            CliAction::Quit => "q".to_string(),
            CliAction::Rules => "r".to_string(),
            CliAction::CardEffects => "c".to_string(),
            CliAction::Help => "?".to_string(),
            CliAction::Hand(_) => "h N".to_string(),
            CliAction::Stack(_, _) => "s PID COLOR".to_string(),
            CliAction::Player(_) => "p PID".to_string(),
            CliAction::Decline => "d".to_string(),
            CliAction::Submit => "submit".to_string(),
            CliAction::Reset => "reset".to_string(),
            CliAction::Refresh => "reload".to_string(),
            CliAction::Join => "join".to_string(),
            CliAction::Leave => "leave".to_string(),
            CliAction::Kick(_) => "kick PID".to_string(),
            CliAction::Start => "start".to_string(),
            CliAction::Create(_) => "new NAME".to_string(),
            CliAction::Games => "games".to_string(),
            CliAction::Users => "users".to_string(),
        }
    }

    /// The board click this command stands for, if any.
    pub fn input(&self) -> Option<Input> {
        match *self {
            CliAction::Hand(index) => Some(Input::HandCard { index }),
            CliAction::Stack(pid, color) => Some(Input::StackCard { pid, color }),
            CliAction::Player(pid) => Some(Input::Player { pid }),
            CliAction::Decline => Some(Input::DeclineAttack),
            _ => None,
        }
    }
}

impl FromStr for CliAction {
    type Err = ParseActionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let words = s.split_whitespace().collect_vec();
        let number = |i: usize| {
            words
                .get(i)
                .and_then(|w| w.parse::<u64>().ok())
                .ok_or(ParseActionError)
        };
        match words.first().copied() {
            Some("q") => Ok(CliAction::Quit),
            Some("r") => Ok(CliAction::Rules),
            Some("c") => Ok(CliAction::CardEffects),
            Some("?") => Ok(CliAction::Help),
            Some("h") => Ok(CliAction::Hand(number(1)? as usize)),
            Some("s") => {
                let color = words
                    .get(2)
                    .and_then(|w| Color::from_str(w).ok())
                    .ok_or(ParseActionError)?;
                Ok(CliAction::Stack(number(1)?, color))
            }
            Some("p") => Ok(CliAction::Player(number(1)?)),
            Some("d") => Ok(CliAction::Decline),
            Some("submit") => Ok(CliAction::Submit),
            Some("reset") => Ok(CliAction::Reset),
            Some("reload") => Ok(CliAction::Refresh),
            Some("join") => Ok(CliAction::Join),
            Some("leave") => Ok(CliAction::Leave),
            Some("kick") => Ok(CliAction::Kick(number(1)?)),
            Some("start") => Ok(CliAction::Start),
            Some("new") if words.len() > 1 => Ok(CliAction::Create(words[1..].join(" "))),
            Some("games") => Ok(CliAction::Games),
            Some("users") => Ok(CliAction::Users),
            _ => Err(ParseActionError),
        }
    }
}

/// Renders a session to the terminal.
pub struct CliPlayer;

impl CliPlayer {
    /// Commands that make sense right now.
    pub fn commands(&self, session: &Session) -> Vec<CliAction> {
        let mut cmds = vec![];
        match session.route() {
            Route::Lobby => {
                if session.my_pid().is_none() {
                    cmds.push(CliAction::Join);
                } else {
                    cmds.push(CliAction::Leave);
                }
                if session.is_owner() {
                    cmds.push(CliAction::Kick(0));
                    cmds.push(CliAction::Start);
                }
            }
            Route::Game if session.is_my_turn() => {
                let phase = session.turn().phase();
                if phase.accepts_hand() {
                    cmds.push(CliAction::Hand(0));
                }
                if phase.accepts_stack() {
                    cmds.push(CliAction::Stack(0, Color::Red));
                }
                if phase.accepts_player() {
                    cmds.push(CliAction::Player(0));
                }
                if phase.accepts_decline() {
                    cmds.push(CliAction::Decline);
                }
                if session.turn().is_submittable() {
                    cmds.push(CliAction::Submit);
                }
                cmds.push(CliAction::Reset);
            }
            Route::Game => {}
        }
        cmds.extend([
            CliAction::Refresh,
            CliAction::Create(String::new()),
            CliAction::Games,
            CliAction::Users,
            CliAction::Help,
            CliAction::Rules,
            CliAction::CardEffects,
            CliAction::Quit,
        ]);
        cmds
    }

    pub fn print_commands(&self, session: &Session) {
        for cmd in self.commands(session) {
            println!("- [{}]: {}", cmd.cmd_str(), cmd.info());
        }
    }

    pub fn format_game(&self, game: &Game) -> String {
        let turn = game
            .current_player
            .map(|pid| format!(", turn of {}", pid))
            .unwrap_or_default();
        format!(
            "Game {} \"{}\" [{}] owned by {}{}",
            game.gid, game.name, game.state, game.owner, turn
        )
    }

    fn format_sub_move(&self, sub_move: Option<Option<SubMove>>) -> String {
        match sub_move {
            None => "-".to_string(),
            Some(None) => "no attack".to_string(),
            Some(Some(s)) => s.to_string(),
        }
    }

    /// The non-empty province entries of `pid`; the selected one is starred.
    pub fn format_stack(&self, session: &Session, pid: PlayerId) -> String {
        let board = session.board();
        board
            .stack_entries()
            .into_iter()
            .filter(|&(owner, _)| owner == pid)
            .map(|(owner, c)| {
                let selected = if session.turn().is_stack_selected(owner, c) {
                    "*"
                } else {
                    ""
                };
                format!("{}{} x{}", selected, c, board.count(owner, c))
            })
            .join("  ")
    }

    pub fn render(&self, session: &Session) {
        println!("================================================");
        let game = match session.game() {
            Some(game) => game,
            None => {
                println!("Loading game {} ...", session.gid());
                return;
            }
        };
        println!("{}", self.format_game(game));

        for player in session.players() {
            let color = player
                .color
                .map(|c| format!(" ({})", c))
                .unwrap_or_default();
            let me = Some(player.pid) == session.my_pid();
            let playing = Some(player.pid) == game.current_player;
            let marker = match (me, playing) {
                (true, true) => " <- you, playing",
                (true, false) => " <- you",
                (false, true) => " <- playing",
                (false, false) => "",
            };
            println!(
                "  [{}] {}{}: {}{}",
                player.pid,
                player.username,
                color,
                self.format_stack(session, player.pid),
                marker
            );
        }

        if !game.winners.is_empty() {
            println!("Winners: {}", game.winners.iter().join(", "));
        }

        if session.my_pid().is_none() {
            return;
        }
        let hand = session
            .hand()
            .cards()
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let selected = if session.turn().is_hand_selected(i) { "*" } else { " " };
                format!("[{}]{}{}", i, selected, c)
            })
            .join("  ");
        println!("Hand: {}", hand);

        if session.is_my_turn() {
            let pending = session.turn().pending();
            println!(
                "Move: first: {} | second: {} | third: {}",
                self.format_sub_move(pending.first.map(Some)),
                self.format_sub_move(pending.second.map(Some)),
                self.format_sub_move(pending.third)
            );
            let phase = session.turn().phase();
            let prompt = if session.turn().is_phase(TurnPhase::Disabled)
                && session.turn().is_submittable()
            {
                "Submit the move or reset it"
            } else {
                phase.prompt()
            };
            println!("> {}", prompt);
        }
    }

    pub fn print_notices(&self, notices: &[Notice]) {
        for notice in notices {
            println!("{}", notice);
        }
    }

    pub fn print_games(&self, games: &[Game]) {
        for game in games {
            println!("  {}", self.format_game(game));
        }
    }

    pub fn print_users(&self, users: &[User]) {
        for user in users {
            println!("  {}: {}", user.username, user.score);
        }
    }
}
