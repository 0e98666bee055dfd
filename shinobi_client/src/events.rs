use std::{fmt, pin::pin, sync::Arc, time::Duration};

use eventsource_stream::Eventsource;
use futures_util::{Stream, StreamExt};
use log::{debug, info, warn};
use reqwest::Method;
use thiserror::Error;
use tokio::sync::mpsc::Sender;

use shinobi_core::{error::ApiError, events::ServerEvent, game::GameId};

use crate::http::HttpApi;

const RECONNECT_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum EventStreamError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("event stream interrupted: {0}")]
    Interrupted(String),
    #[error("event stream closed by server")]
    Closed,
}

/// Decodes a `text/event-stream` body and forwards every known event.
/// Returns `Ok` once the receiver is gone.
pub async fn forward_body<S, B, E>(
    body: S,
    sender: &Sender<ServerEvent>,
) -> Result<(), EventStreamError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: fmt::Display,
{
    let mut frames = pin!(body.eventsource());
    while let Some(frame) = frames.next().await {
        let frame = frame.map_err(|e| EventStreamError::Interrupted(e.to_string()))?;
        match ServerEvent::parse(&frame.event, &frame.data) {
            Some(event) => {
                debug!("event {:?}", event);
                if sender.send(event).await.is_err() {
                    return Ok(());
                }
            }
            None => debug!("skipping event {:?}", frame.event),
        }
    }
    Err(EventStreamError::Closed)
}

pub async fn forward_events(
    api: &HttpApi,
    gid: GameId,
    sender: &Sender<ServerEvent>,
) -> Result<(), EventStreamError> {
    let path = format!("/games/{}/events", gid);
    let builder = api
        .request(Method::GET, &path)
        .header("Accept", "text/event-stream");
    let response = api.send_raw(builder).await?;
    info!("listening to events of game {}", gid);
    forward_body(response.bytes_stream(), sender).await
}

/// Keeps the event stream alive, reconnecting after failures, until the
/// receiving side is dropped.
pub async fn run_event_stream(api: Arc<HttpApi>, gid: GameId, sender: Sender<ServerEvent>) {
    loop {
        match forward_events(&api, gid, &sender).await {
            Ok(()) => return,
            Err(e) => warn!("{}, reconnecting", e),
        }
        if sender.is_closed() {
            return;
        }
        tokio::time::sleep(RECONNECT_DELAY).await;
    }
}
