use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use shinobi_core::{
    api::{GameApi, SubmitResponse},
    card::Color,
    error::ApiError,
    game::{Game, GameId, GameState, User},
    play::CompleteMove,
    player::{Player, PlayerId},
};

use crate::config::ClientConfig;

#[derive(Default, Deserialize)]
struct MessagesBody {
    #[serde(default)]
    messages: Vec<String>,
}

#[derive(Deserialize)]
struct GamesBody {
    games: Vec<Game>,
}

#[derive(Deserialize)]
struct PlayersBody {
    players: Vec<Player>,
}

#[derive(Deserialize)]
struct HandBody {
    hand: Vec<Color>,
}

#[derive(Deserialize)]
struct UsersBody {
    users: Vec<User>,
}

#[derive(Serialize)]
struct NewGame<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct StateChange {
    state: GameState,
}

fn transport(e: reqwest::Error) -> ApiError {
    ApiError::Transport(e.to_string())
}

/// Empty bodies read as `{}` so that message-only endpoints may answer with
/// nothing at all.
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        body
    };
    Ok(serde_json::from_slice(body)?)
}

/// [`GameApi`] over the server's JSON resources.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base: String,
    username: String,
    password: Option<String>,
}

impl HttpApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder().build().map_err(transport)?;
        Ok(HttpApi {
            client,
            base: config.server_url.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, self.url(path))
            .header("X-Requested-With", "XMLHttpRequest");
        match &self.password {
            Some(password) => builder.basic_auth(&self.username, Some(password)),
            None => builder,
        }
    }

    /// Sends the request and returns the response if the status is a success.
    pub(crate) async fn send_raw(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await.map_err(transport)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.bytes().await.map_err(transport)?;
        let messages = parse_body::<MessagesBody>(&body)
            .map(|b| b.messages)
            .unwrap_or_default();
        debug!("{} with {:?}", status, messages);
        Err(ApiError::Status {
            status: status.as_u16(),
            messages,
        })
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send_raw(builder).await?;
        let body = response.bytes().await.map_err(transport)?;
        parse_body(&body)
    }

    async fn messages(&self, builder: RequestBuilder) -> Result<Vec<String>, ApiError> {
        let body: MessagesBody = self.send(builder).await?;
        Ok(body.messages)
    }
}

#[async_trait]
impl GameApi for HttpApi {
    async fn list_games(&self) -> Result<Vec<Game>, ApiError> {
        let body: GamesBody = self.send(self.request(Method::GET, "/games")).await?;
        Ok(body.games)
    }

    async fn create_game(&self, name: &str) -> Result<Vec<String>, ApiError> {
        let builder = self.request(Method::POST, "/games").json(&NewGame { name });
        self.messages(builder).await
    }

    async fn fetch_game(&self, gid: GameId) -> Result<Game, ApiError> {
        self.send(self.request(Method::GET, &format!("/games/{}", gid)))
            .await
    }

    async fn start_game(&self, gid: GameId) -> Result<Vec<String>, ApiError> {
        let builder = self
            .request(Method::PUT, &format!("/games/{}", gid))
            .json(&StateChange {
                state: GameState::Started,
            });
        self.messages(builder).await
    }

    async fn fetch_players(&self, gid: GameId) -> Result<Vec<Player>, ApiError> {
        let path = format!("/games/{}/players", gid);
        let body: PlayersBody = self.send(self.request(Method::GET, &path)).await?;
        Ok(body.players)
    }

    async fn fetch_hand(&self, gid: GameId, pid: PlayerId) -> Result<Vec<Color>, ApiError> {
        let path = format!("/games/{}/players/{}/hand", gid, pid);
        let body: HandBody = self.send(self.request(Method::GET, &path)).await?;
        let mut hand = body.hand;
        hand.sort();
        Ok(hand)
    }

    async fn join(&self, gid: GameId) -> Result<Vec<String>, ApiError> {
        let path = format!("/games/{}/players", gid);
        self.messages(self.request(Method::POST, &path)).await
    }

    async fn remove_player(&self, gid: GameId, pid: PlayerId) -> Result<Vec<String>, ApiError> {
        let path = format!("/games/{}/players/{}", gid, pid);
        self.messages(self.request(Method::DELETE, &path)).await
    }

    async fn submit_move(
        &self,
        gid: GameId,
        pid: PlayerId,
        body: &CompleteMove,
    ) -> Result<SubmitResponse, ApiError> {
        let path = format!("/games/{}/players/{}/move", gid, pid);
        self.send(self.request(Method::POST, &path).json(body))
            .await
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let body: UsersBody = self.send(self.request(Method::GET, "/users")).await?;
        Ok(body.users)
    }
}
