//! Invitation dispatch for the active postcard: one email to every member
//! with an address, one photo message to the club chat. Channels report
//! independently; neither is retried.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType, transport::smtp::authentication::Credentials,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    config::{Config, SmtpConfig, TelegramConfig},
    error::{HandlerError, HandlerResult},
    handlers,
    models::PostcardView,
};

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("email build error: {0}")]
    Build(String),
}

#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("bot request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("bot API returned HTTP {0}")]
    HttpStatus(u16),
}

/// Per-channel outcome, human-readable either way. A failed channel does
/// not abort the other one.
#[derive(Clone, Debug, Serialize)]
pub struct InvitationReport {
    pub email: String,
    pub telegram: String,
}

pub async fn send_invitation(
    db: &DatabaseConnection,
    http: &reqwest::Client,
    config: &Config,
) -> HandlerResult<InvitationReport> {
    let postcard = handlers::postcard::get_active(db).await?;
    let screenshot = postcard.screenshot.clone().ok_or_else(|| {
        HandlerError::Validation("active postcard has no screenshot yet".to_string())
    })?;

    let users = handlers::user::get_all(db).await?;
    let recipients: Vec<String> =
        users.into_iter().filter_map(|u| u.email).filter(|e| !e.trim().is_empty()).collect();

    let email = match &config.smtp {
        None => "email delivery is not configured".to_string(),
        Some(_) if recipients.is_empty() => "no member has an email address".to_string(),
        Some(smtp) => match send_email(smtp, &recipients, &screenshot, &postcard).await {
            Ok(()) => {
                info!(recipients = recipients.len(), "postcard invitation emailed");
                format!("postcard emailed to {} member(s)", recipients.len())
            }
            Err(err) => {
                warn!(error = %err, "email invitation failed");
                err.to_string()
            }
        },
    };

    let telegram = match &config.telegram {
        None => "telegram delivery is not configured".to_string(),
        Some(tg) => match send_telegram(http, tg, &screenshot, &postcard).await {
            Ok(()) => {
                info!(chat_id = %tg.chat_id, "postcard invitation sent to club chat");
                "postcard sent to the club chat".to_string()
            }
            Err(err) => {
                warn!(error = %err, "telegram invitation failed");
                err.to_string()
            }
        },
    };

    Ok(InvitationReport { email, telegram })
}

fn invitation_body(postcard: &PostcardView, screenshot: &str) -> String {
    format!(
        "Киноклуб собирается {}.\n\nВаша открытка: {}\n",
        postcard.meeting_date, screenshot
    )
}

async fn send_email(
    smtp: &SmtpConfig,
    recipients: &[String],
    screenshot: &str,
    postcard: &PostcardView,
) -> Result<(), EmailError> {
    let mut builder = Message::builder()
        .from(smtp.from_address.parse()?)
        .subject("Ваша персональная открытка")
        .header(ContentType::TEXT_PLAIN);
    for to in recipients {
        builder = builder.to(to.parse()?);
    }
    let email = builder
        .body(invitation_body(postcard, screenshot))
        .map_err(|e| EmailError::Build(e.to_string()))?;

    let mut transport_builder =
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)?.port(smtp.port);
    if let (Some(user), Some(pass)) = (&smtp.user, &smtp.password) {
        transport_builder = transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
    }

    transport_builder.build().send(email).await?;
    Ok(())
}

async fn send_telegram(
    http: &reqwest::Client,
    tg: &TelegramConfig,
    screenshot: &str,
    postcard: &PostcardView,
) -> Result<(), BotError> {
    let url = format!("https://api.telegram.org/bot{}/sendPhoto", tg.bot_token);
    let payload = serde_json::json!({
        "chat_id": tg.chat_id,
        "photo": screenshot,
        "caption": format!("Киноклуб собирается {}", postcard.meeting_date),
    });

    let response = http.post(&url).json(&payload).send().await?;
    if !response.status().is_success() {
        return Err(BotError::HttpStatus(response.status().as_u16()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn postcard() -> PostcardView {
        PostcardView {
            id: 1,
            meeting_date: "2024-03-16 19:00".to_string(),
            title: None,
            screenshot: Some("https://club.example/postcards/1.png".to_string()),
            created_at: 0,
            is_active: true,
            movies: vec![326],
        }
    }

    #[test]
    fn body_carries_date_and_screenshot() {
        let body = invitation_body(&postcard(), "https://club.example/postcards/1.png");
        assert!(body.contains("2024-03-16 19:00"));
        assert!(body.contains("https://club.example/postcards/1.png"));
    }

    #[test]
    fn email_error_display_build() {
        let err = EmailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "email build error: missing body");
    }

    #[test]
    fn bot_error_display_status() {
        assert_eq!(BotError::HttpStatus(403).to_string(), "bot API returned HTTP 403");
    }
}
