use crate::config::Config;
use crate::error::{AppError, AppResult};
use base64::Engine;
use serde::Deserialize;

const OAUTH_URL: &str = "https://api.orange.com/oauth/v3/token";
const SMS_URL: &str = "https://api.orange.com/smsmessaging/v1/outbound";

pub struct SmsService {
    config: Config,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct OauthTokenResponse {
    access_token: String,
}

impl SmsService {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub async fn send_annonce_activated(&self, phone: &str, code: &str) -> AppResult<()> {
        if !self.config.sms_enabled {
            tracing::info!("SMS disabled. Annonce {} activation notice for {}", code, phone);
            return Ok(());
        }

        let text = format!(
            "IvoirImmo : votre annonce {} a été validée et est en ligne.",
            code
        );
        self.send_sms(phone, &text).await
    }

    // Flux client-credentials de l'API Orange : un jeton par envoi.
    async fn get_access_token(&self) -> AppResult<String> {
        let basic = base64::engine::general_purpose::STANDARD.encode(format!(
            "{}:{}",
            self.config.sms_client_id, self.config.sms_client_secret
        ));

        let response = self
            .client
            .post(OAUTH_URL)
            .header("Authorization", format!("Basic {}", basic))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| AppError::Sms(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("SMS OAuth error: {}", status);
            return Err(AppError::Sms(format!("SMS OAuth error: {}", status)));
        }

        let token: OauthTokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::Sms(e.to_string()))?;

        Ok(token.access_token)
    }

    async fn send_sms(&self, phone: &str, text: &str) -> AppResult<()> {
        let access_token = self.get_access_token().await?;

        let sender = format!("tel:+{}", self.config.sms_sender);
        let url = format!(
            "{}/{}/requests",
            SMS_URL,
            urlencode(&sender)
        );

        let body = serde_json::json!({
            "outboundSMSMessageRequest": {
                "address": format!("tel:{}", phone),
                "senderAddress": sender,
                "outboundSMSTextMessage": { "message": text }
            }
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Sms(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("SMS API error: {} - {}", status, body);
            return Err(AppError::Sms(format!("SMS API error: {}", status)));
        }

        tracing::info!("SMS sent to {}", phone);
        Ok(())
    }
}

// L'adresse d'expéditeur est un segment d'URL chez Orange ("tel:+2250000").
fn urlencode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urlencode_sender() {
        assert_eq!(urlencode("tel:+2250000"), "tel%3A%2B2250000");
        assert_eq!(urlencode("IvoirImmo"), "IvoirImmo");
    }
}
