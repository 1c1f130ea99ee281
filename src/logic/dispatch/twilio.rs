//! Twilio Messages API client (WhatsApp / SMS)

use std::time::Duration;

use super::{DispatchError, DispatchFuture, Notifier};

/// Provider credentials and addresses
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from: String,
    pub to: String,
    pub api_base: String,
    pub timeout_seconds: u64,
}

impl TwilioConfig {
    pub fn from_app_config(config: &crate::config::Config) -> Self {
        Self {
            account_sid: config.twilio_account_sid.clone(),
            auth_token: config.twilio_auth_token.clone(),
            from: config.twilio_from.clone(),
            to: config.alert_recipient.clone(),
            api_base: config.twilio_api_base.trim_end_matches('/').to_string(),
            timeout_seconds: config.dispatch_timeout_secs,
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base, self.account_sid
        )
    }
}

pub struct TwilioNotifier {
    config: TwilioConfig,
    http_client: reqwest::Client,
}

impl TwilioNotifier {
    pub fn new(config: TwilioConfig) -> Result<Self, DispatchError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { config, http_client })
    }

    async fn post_message(&self, body: &str, media_url: Option<&str>) -> Result<(), DispatchError> {
        let mut form = vec![
            ("To", self.config.to.as_str()),
            ("From", self.config.from.as_str()),
            ("Body", body),
        ];
        if let Some(url) = media_url {
            form.push(("MediaUrl", url));
        }

        let response = self
            .http_client
            .post(self.config.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!("Provider accepted message ({})", status);
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(DispatchError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}

impl Notifier for TwilioNotifier {
    fn send<'a>(&'a self, body: &'a str, media_url: Option<&'a str>) -> DispatchFuture<'a> {
        Box::pin(self.post_message(body, media_url))
    }
}
