//! The dispatcher: read the input, send it, render the reply (or a visible error) into the view.

use crate::client::{ChatClient, ChatError};
use crate::config::Config;
use crate::view::{MessageSource, ResponseView};

/// Sends one message per call and renders exactly one line per call.
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct Dispatcher {
    client: ChatClient,
    prefix: String,
}

impl Dispatcher {
    pub fn new(client: ChatClient, prefix: impl Into<String>) -> Self {
        Self {
            client,
            prefix: prefix.into(),
        }
    }

    /// Build from config. `endpoint` (e.g. a `--endpoint` flag) wins over DEEN_ENDPOINT and the config file.
    pub fn from_config(config: &Config, endpoint: Option<&str>) -> Result<Self, ChatError> {
        let client = match endpoint {
            Some(e) => ChatClient::new(e, config.client.timeout())?,
            None => ChatClient::from_config(config)?,
        };
        Ok(Self::new(client, config.display.prefix.clone()))
    }

    pub fn client(&self) -> &ChatClient {
        &self.client
    }

    pub fn format_reply(&self, response: &str) -> String {
        format!("{}: {}", self.prefix, response)
    }

    pub fn format_error(&self, err: &ChatError) -> String {
        format!("{} error: {}", self.prefix, err)
    }

    /// Send one message and return the formatted reply line. No retries.
    pub async fn send(&self, message: &str) -> Result<String, ChatError> {
        let reply = self.client.chat(message).await?;
        Ok(self.format_reply(&reply.response))
    }

    /// Read `input`, send it, and render the outcome into `view`.
    /// On failure the view shows the error line and the error is returned.
    pub async fn dispatch<S, V>(&self, input: &S, view: &V) -> Result<String, ChatError>
    where
        S: MessageSource + ?Sized,
        V: ResponseView + ?Sized,
    {
        let message = input.current_text();
        match self.send(&message).await {
            Ok(line) => {
                view.render(&line);
                Ok(line)
            }
            Err(e) => {
                log::warn!("dispatch to {} failed: {}", self.client.endpoint(), e);
                view.render(&self.format_error(&e));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher(prefix: &str) -> Dispatcher {
        let client = ChatClient::new("http://127.0.0.1:5000/chat", None).unwrap();
        Dispatcher::new(client, prefix)
    }

    #[test]
    fn reply_line_uses_prefix() {
        assert_eq!(dispatcher("DeenGPT").format_reply("hello"), "DeenGPT: hello");
        assert_eq!(dispatcher("Bot").format_reply(""), "Bot: ");
    }

    #[test]
    fn error_line_names_the_failure() {
        let err = ChatError::Payload("missing field `response`".to_string());
        assert_eq!(
            dispatcher("DeenGPT").format_error(&err),
            "DeenGPT error: unexpected reply: missing field `response`"
        );
    }

    #[test]
    fn endpoint_argument_overrides_config() {
        let mut config = Config::default();
        config.client.endpoint = "http://10.0.0.2:8000/chat".to_string();
        let d = Dispatcher::from_config(&config, Some("http://127.0.0.1:6001/chat")).unwrap();
        assert_eq!(d.client().endpoint().as_str(), "http://127.0.0.1:6001/chat");
    }

    #[test]
    fn invalid_endpoint_argument_is_config_error() {
        let config = Config::default();
        assert!(matches!(
            Dispatcher::from_config(&config, Some("127.0.0.1:5000")),
            Err(ChatError::Config(_))
        ));
    }
}
