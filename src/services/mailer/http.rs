use anyhow::Context;
use async_trait::async_trait;

use super::Mailer;

/// Sends mail through a JSON HTTP mail API (Resend-style `POST /emails`).
pub struct HttpApiMailer {
    api_url: String,
    api_key: String,
    from: String,
    client: reqwest::Client,
}

impl HttpApiMailer {
    pub fn new(api_url: String, api_key: String, from: String) -> Self {
        Self {
            api_url,
            api_key,
            from,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Mailer for HttpApiMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> anyhow::Result<()> {
        self.client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "from": self.from,
                "to": to,
                "subject": subject,
                "html": html,
            }))
            .send()
            .await
            .context("failed to reach mail API")?
            .error_for_status()
            .context("mail API returned error")?;

        Ok(())
    }
}
