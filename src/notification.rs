use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::NotifierError;

/// Outbound channel for announcing one offer. The driver is written
/// against this trait so it can be exercised with a mock sender.
#[async_trait]
pub trait OfferSender {
    /// Sends the offer artwork with an HTML caption.
    async fn send_photo(&self, image_url: &str, caption_html: &str) -> Result<(), NotifierError>;

    /// Sends a text-only HTML message with link previews suppressed.
    async fn send_message(&self, text_html: &str) -> Result<(), NotifierError>;
}

#[derive(Deserialize, Debug)]
struct TelegramResponse {
    ok: bool,
    description: Option<String>,
}

pub struct TelegramClient {
    api_root: String,
    chat_id: String,
}

impl TelegramClient {
    pub fn new(token: String, chat_id: String) -> Self {
        TelegramClient {
            api_root: format!("https://api.telegram.org/bot{}", token),
            chat_id,
        }
    }

    #[cfg(test)]
    fn with_api_root(api_root: String, chat_id: String) -> Self {
        TelegramClient { api_root, chat_id }
    }

    async fn call(&self, method: &str, params: &[(&str, &str)]) -> Result<(), NotifierError> {
        let client = Client::new();
        let response = client
            .get(&format!("{}/{}", self.api_root, method))
            .query(params)
            .send()
            .await
            .map_err(|err| NotifierError::Dispatch(err.to_string()))?
            .json::<TelegramResponse>()
            .await
            .map_err(|err| NotifierError::Dispatch(err.to_string()))?;
        if !response.ok {
            return Err(NotifierError::Dispatch(
                response
                    .description
                    .unwrap_or_else(|| format!("{} rejected by the Bot API", method)),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl OfferSender for TelegramClient {
    async fn send_photo(&self, image_url: &str, caption_html: &str) -> Result<(), NotifierError> {
        self.call(
            "sendPhoto",
            &[
                ("chat_id", &self.chat_id[..]),
                ("photo", image_url),
                ("caption", caption_html),
                ("parse_mode", "HTML"),
            ],
        )
        .await
    }

    async fn send_message(&self, text_html: &str) -> Result<(), NotifierError> {
        self.call(
            "sendMessage",
            &[
                ("chat_id", &self.chat_id[..]),
                ("text", text_html),
                ("parse_mode", "HTML"),
                ("disable_web_page_preview", "true"),
            ],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn send_message_reports_api_rejection_as_dispatch_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/sendMessage")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"ok": false, "description": "Bad Request: chat not found"}"#)
            .create_async()
            .await;

        let client = TelegramClient::with_api_root(server.url(), "42".to_string());
        match client.send_message("<b>hi</b>").await {
            Err(NotifierError::Dispatch(description)) => {
                assert!(description.contains("chat not found"));
            }
            other => panic!("expected Dispatch, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_photo_passes_chat_and_parse_mode() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/sendPhoto")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("chat_id".into(), "42".into()),
                Matcher::UrlEncoded("photo".into(), "https://img/wide".into()),
                Matcher::UrlEncoded("parse_mode".into(), "HTML".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"ok": true}"#)
            .create_async()
            .await;

        let client = TelegramClient::with_api_root(server.url(), "42".to_string());
        client
            .send_photo("https://img/wide", "<b>caption</b>")
            .await
            .unwrap();
        mock.assert_async().await;
    }
}
