//! REST client for the Trello API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, instrument};

use super::KanbanClient;
use crate::error::{summarize_body, TrelloError};
use crate::models::{BoardList, Card, CreateCard};

/// Trello API endpoint
const TRELLO_API_URL: &str = "https://api.trello.com";

/// Trello REST client scoped to a single board.
#[derive(Debug, Clone)]
pub struct TrelloClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    token: String,
    board_id: String,
}

/// Body for `POST /1/cards`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateCardRequest<'a> {
    id_list: &'a str,
    #[serde(flatten)]
    card: &'a CreateCard,
}

impl TrelloClient {
    /// Create a new Trello client.
    ///
    /// # Arguments
    /// * `api_key` - Trello API key
    /// * `token` - Trello member token
    /// * `board_id` - Board to read lists from
    ///
    /// # Errors
    /// Returns error if a credential is empty or the HTTP client cannot be built
    pub fn new(api_key: &str, token: &str, board_id: &str) -> Result<Self, TrelloError> {
        Self::with_base_url(api_key, token, board_id, TRELLO_API_URL, Duration::from_secs(30))
    }

    /// Create a client against a custom API URL (self-hosted proxies, tests).
    ///
    /// # Errors
    /// Returns error if a credential is empty or the HTTP client cannot be built
    pub fn with_base_url(
        api_key: &str,
        token: &str,
        board_id: &str,
        api_url: &str,
        timeout: Duration,
    ) -> Result<Self, TrelloError> {
        for (name, value) in [("api key", api_key), ("token", token), ("board id", board_id)] {
            if value.trim().is_empty() {
                return Err(TrelloError::NotConfigured(format!("missing {name}")));
            }
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            token: token.to_string(),
            board_id: board_id.to_string(),
        })
    }

    /// Board this client reads from.
    #[must_use]
    pub fn board_id(&self) -> &str {
        &self.board_id
    }

    fn auth(&self) -> [(&'static str, &str); 2] {
        [("key", self.api_key.as_str()), ("token", self.token.as_str())]
    }

    /// Send a request and decode the JSON body.
    async fn send<R: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<R, TrelloError> {
        let response = request.query(&self.auth()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TrelloError::Api {
                status: status.as_u16(),
                message: summarize_body(status, &body),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl KanbanClient for TrelloClient {
    #[instrument(skip(self), fields(board_id = %self.board_id))]
    async fn get_lists(&self) -> Result<Vec<BoardList>, TrelloError> {
        let url = format!("{}/1/boards/{}/lists", self.api_url, self.board_id);
        let lists: Vec<BoardList> = self
            .send(self.client.get(url).query(&[("fields", "id,name")]))
            .await?;
        debug!(count = lists.len(), "Retrieved board lists");
        Ok(lists)
    }

    #[instrument(skip(self))]
    async fn get_cards(&self, list_id: &str) -> Result<Vec<Card>, TrelloError> {
        let url = format!("{}/1/lists/{list_id}/cards", self.api_url);
        let cards: Vec<Card> = self.send(self.client.get(url)).await?;
        debug!(count = cards.len(), "Retrieved list cards");
        Ok(cards)
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    async fn create_card(&self, list_id: &str, input: &CreateCard) -> Result<Card, TrelloError> {
        let url = format!("{}/1/cards", self.api_url);
        let body = CreateCardRequest {
            id_list: list_id,
            card: input,
        };
        let card: Card = self.send(self.client.post(url).json(&body)).await?;
        debug!(card_id = %card.id, "Created card");
        Ok(card)
    }
}
