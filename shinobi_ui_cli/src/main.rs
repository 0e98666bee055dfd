use std::{str::FromStr, sync::Arc};

use log::warn;
use tokio::{
    io::{self, AsyncBufReadExt, BufReader},
    sync::mpsc,
};

use cli_player::{CliAction, CliPlayer, RULES};
use shinobi_client::{
    config::USAGE,
    events::run_event_stream,
    ClientConfig, HttpApi,
};
use shinobi_core::{
    api::GameApi,
    card::Color,
    error::SubmitError,
    events::ServerEvent,
    notice::Notice,
    session::Reaction,
    sync::Refreshed,
    turn::Transition,
    Synchronizer,
};

mod cli_player;

enum Flow {
    Continue,
    Quit,
}

async fn handle(
    sync: &mut Synchronizer<HttpApi>,
    view: &CliPlayer,
    action: CliAction,
) -> Flow {
    if let Some(input) = action.input() {
        if sync.click(input) == Transition::Ignored {
            println!("Not now.");
        }
        view.render(sync.session());
        return Flow::Continue;
    }

    let result = match action {
        CliAction::Quit => return Flow::Quit,
        CliAction::Rules => {
            println!("{}", RULES);
            return Flow::Continue;
        }
        CliAction::CardEffects => {
            println!("{}", Color::rules());
            return Flow::Continue;
        }
        CliAction::Help => {
            view.render(sync.session());
            view.print_commands(sync.session());
            return Flow::Continue;
        }
        CliAction::Games => {
            match sync.games().await {
                Ok(games) => view.print_games(&games),
                Err(e) => view.print_notices(&Notice::from_error(&e)),
            }
            return Flow::Continue;
        }
        CliAction::Users => {
            match sync.users().await {
                Ok(users) => view.print_users(&users),
                Err(e) => view.print_notices(&Notice::from_error(&e)),
            }
            return Flow::Continue;
        }
        CliAction::Submit => match sync.submit().await {
            Ok(notices) => Ok(notices),
            Err(SubmitError::Api(e)) => Err(e),
            Err(other) => Ok(Notice::danger(vec![other.to_string()])),
        },
        CliAction::Reset => sync.discard().await.map(|_| vec![]),
        CliAction::Refresh => sync.refresh().await.map(|_| vec![]),
        CliAction::Join => sync.join().await,
        CliAction::Leave => sync.leave().await,
        CliAction::Kick(pid) => sync.kick(pid).await,
        CliAction::Create(name) => sync.create(&name).await,
        CliAction::Start => sync.start().await,
        CliAction::Hand(_) | CliAction::Stack(_, _) | CliAction::Player(_) | CliAction::Decline => {
            Ok(vec![])
        }
    };
    let notices = result.unwrap_or_else(|e| Notice::from_error(&e));
    view.print_notices(&notices);
    view.render(sync.session());
    Flow::Continue
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            println!("{}", USAGE);
            return;
        }
    };
    let api = match HttpApi::new(&config) {
        Ok(api) => Arc::new(api),
        Err(e) => {
            eprintln!("{}", e);
            return;
        }
    };
    let view = CliPlayer;

    let gid = match config.gid {
        Some(gid) => gid,
        None => {
            println!("{}", USAGE);
            match api.list_games().await {
                Ok(games) => view.print_games(&games),
                Err(e) => view.print_notices(&Notice::from_error(&e)),
            }
            return;
        }
    };

    let mut sync = Synchronizer::new(Arc::clone(&api), gid, &config.username);
    if let Err(e) = sync.refresh().await {
        view.print_notices(&Notice::from_error(&e));
    }
    view.render(sync.session());
    view.print_commands(sync.session());

    let (event_tx, mut event_rx) = mpsc::channel::<ServerEvent>(16);
    tokio::spawn(run_event_stream(Arc::clone(&api), gid, event_tx));

    let (line_tx, mut line_rx) = mpsc::channel::<String>(16);
    tokio::spawn(async move {
        let mut lines = BufReader::new(io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if line_tx.send(line).await.is_err() {
                break;
            }
        }
    });

    let (refresh_tx, mut refresh_rx) = mpsc::channel::<Refreshed>(16);

    loop {
        tokio::select! {
            line = line_rx.recv() => {
                let Some(line) = line else { break };
                match CliAction::from_str(&line) {
                    Ok(action) => {
                        if let Flow::Quit = handle(&mut sync, &view, action).await {
                            break;
                        }
                    }
                    Err(_) => println!("Unknown command, type ? for help."),
                }
            }
            Some(event) = event_rx.recv() => {
                if sync.session().on_event(&event) == Reaction::EnterGame {
                    println!("The game has started!");
                }
                let fetch = sync.request_refresh();
                let sender = refresh_tx.clone();
                tokio::spawn(async move {
                    let _ = sender.send(fetch.await).await;
                });
            }
            Some(refreshed) = refresh_rx.recv() => {
                match sync.complete_refresh(refreshed) {
                    Ok(Some(_)) => view.render(sync.session()),
                    Ok(None) => {}
                    Err(e) => warn!("refresh failed: {}", e),
                }
            }
        }
    }
}
