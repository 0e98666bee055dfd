use std::{future::Future, sync::Arc};

use log::{info, warn};

use crate::{
    api::GameApi,
    error::{ApiError, SubmitError},
    events::ServerEvent,
    game::{Game, GameId, User},
    notice::Notice,
    player::PlayerId,
    session::{find_my_pid, Reaction, Route, Session, Snapshot, Ticket},
    turn::{Input, Transition},
};

pub async fn fetch_snapshot<A>(api: &A, gid: GameId, username: &str) -> Result<Snapshot, ApiError>
where
    A: GameApi + ?Sized,
{
    let game = api.fetch_game(gid).await?;
    let players = api.fetch_players(gid).await?;
    let hand = match find_my_pid(&players, username) {
        Some(pid) => api.fetch_hand(gid, pid).await?,
        None => vec![],
    };
    Ok(Snapshot {
        game,
        players,
        hand,
    })
}

#[derive(Debug)]
pub struct Refreshed {
    pub ticket: Ticket,
    pub result: Result<Snapshot, ApiError>,
}

/// Drives a [`Session`] against a [`GameApi`]: seeds it, keeps it in step
/// with server events and submits composed moves.
pub struct Synchronizer<A> {
    api: Arc<A>,
    session: Session,
}

impl<A> Synchronizer<A>
where
    A: GameApi + 'static,
{
    pub fn new(api: Arc<A>, gid: GameId, username: &str) -> Self {
        Synchronizer {
            api,
            session: Session::new(gid, username),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    pub fn click(&mut self, input: Input) -> Transition {
        self.session.click(input)
    }

    /// Starts a refresh cycle and returns the fetch as an owned future, so
    /// the caller may run it concurrently and hand the result back to
    /// [`Synchronizer::complete_refresh`].
    pub fn request_refresh(&mut self) -> impl Future<Output = Refreshed> + Send + 'static {
        let ticket = self.session.begin_refresh();
        let api = Arc::clone(&self.api);
        let gid = self.session.gid();
        let username = self.session.username().to_string();
        async move {
            let result = fetch_snapshot(api.as_ref(), gid, &username).await;
            Refreshed { ticket, result }
        }
    }

    /// Installs a finished refresh. `Ok(None)` means it was superseded.
    pub fn complete_refresh(&mut self, refreshed: Refreshed) -> Result<Option<Route>, ApiError> {
        let snapshot = refreshed.result?;
        Ok(self.session.install(refreshed.ticket, snapshot))
    }

    pub async fn refresh(&mut self) -> Result<Route, ApiError> {
        let refreshed = self.request_refresh().await;
        let route = self.complete_refresh(refreshed)?;
        Ok(route.unwrap_or_else(|| self.session.route()))
    }

    pub async fn on_event(&mut self, event: &ServerEvent) -> Result<Route, ApiError> {
        let reaction = self.session.on_event(event);
        let route = self.refresh().await?;
        if reaction == Reaction::EnterGame {
            info!("game {} started", self.session.gid());
            return Ok(Route::Game);
        }
        Ok(route)
    }

    /// Sends the composed move. On success input stays locked until a fresh
    /// snapshot is installed; on failure the move stays for another attempt.
    pub async fn submit(&mut self) -> Result<Vec<Notice>, SubmitError> {
        let (pid, body) = self.session.prepare_submission()?;
        let gid = self.session.gid();
        // Nothing fetched before the submission may overwrite the outcome.
        self.session.begin_refresh();

        let response = match self.api.submit_move(gid, pid, &body).await {
            Ok(response) => response,
            Err(e) => {
                warn!("move rejected: {}", e);
                return Err(e.into());
            }
        };

        self.session.submission_accepted();
        if let Some(game) = response.game {
            self.session.apply_game(game);
        }
        if let Err(e) = self.refresh().await {
            warn!("could not refresh after submitting: {}", e);
        }
        Ok(Notice::success(response.messages))
    }

    pub async fn discard(&mut self) -> Result<Route, ApiError> {
        self.session.discard();
        self.refresh().await
    }

    pub async fn join(&mut self) -> Result<Vec<Notice>, ApiError> {
        let messages = self.api.join(self.session.gid()).await?;
        self.refresh().await?;
        Ok(Notice::success(messages))
    }

    pub async fn leave(&mut self) -> Result<Vec<Notice>, ApiError> {
        match self.session.my_pid() {
            Some(pid) => self.kick(pid).await,
            None => Ok(vec![]),
        }
    }

    pub async fn kick(&mut self, pid: PlayerId) -> Result<Vec<Notice>, ApiError> {
        let messages = self.api.remove_player(self.session.gid(), pid).await?;
        self.refresh().await?;
        Ok(Notice::success(messages))
    }

    pub async fn start(&mut self) -> Result<Vec<Notice>, ApiError> {
        let messages = self.api.start_game(self.session.gid()).await?;
        self.refresh().await?;
        Ok(Notice::success(messages))
    }

    pub async fn create(&self, name: &str) -> Result<Vec<Notice>, ApiError> {
        let messages = self.api.create_game(name).await?;
        Ok(Notice::success(messages))
    }

    pub async fn games(&self) -> Result<Vec<Game>, ApiError> {
        self.api.list_games().await
    }

    pub async fn users(&self) -> Result<Vec<User>, ApiError> {
        self.api.list_users().await
    }
}
