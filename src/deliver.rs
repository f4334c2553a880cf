use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{debug, info};

#[async_trait]
pub trait DeliveryChannel {
    async fn send(&self, recipients: &[String], subject: &str, document: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

pub struct SmtpMailer {
    settings: SmtpSettings,
}

impl SmtpMailer {
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }
}

pub fn build_message(from: &str, recipients: &[String], subject: &str, document: &str) -> Result<Message> {
    let from_mailbox: Mailbox = from
        .parse()
        .map_err(|e| anyhow!("sender address {:?} is invalid: {}", from, e))?;

    let mut builder = Message::builder().from(from_mailbox).subject(subject);
    for r in recipients {
        let to: Mailbox = r
            .parse()
            .map_err(|e| anyhow!("recipient address {:?} is invalid: {}", r, e))?;
        builder = builder.to(to);
    }

    builder
        .header(ContentType::TEXT_HTML)
        .body(document.to_string())
        .context("building digest email")
}

#[async_trait]
impl DeliveryChannel for SmtpMailer {
    async fn send(&self, recipients: &[String], subject: &str, document: &str) -> Result<()> {
        let start = std::time::Instant::now();
        let message = build_message(&self.settings.username, recipients, subject, document)?;
        let settings = self.settings.clone();
        debug!("SMTP send starting - host={}:{}, recipients={}", settings.host, settings.port, recipients.len());

        // lettre's SmtpTransport blocks
        tokio::task::spawn_blocking(move || -> Result<()> {
            let transport = SmtpTransport::starttls_relay(&settings.host)
                .with_context(|| format!("smtp starttls relay init failed for {}", settings.host))?
                .port(settings.port)
                .credentials(Credentials::new(settings.username, settings.password))
                .build();
            transport.send(&message).context("smtp send failed")?;
            Ok(())
        })
        .await
        .context("smtp task panicked")??;

        info!(
            "Email delivered - duration={:.2}s, recipients={}",
            start.elapsed().as_secs_f32(),
            recipients.len()
        );
        Ok(())
    }
}

// --dry-run
pub struct StdoutChannel;

#[async_trait]
impl DeliveryChannel for StdoutChannel {
    async fn send(&self, recipients: &[String], subject: &str, document: &str) -> Result<()> {
        info!("Dry run - would send to {} recipient(s)", recipients.len());
        println!("Subject: {}\n\n{}", subject, document);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_html_message_for_all_recipients() {
        let rcpts = vec!["a@example.com".to_string(), "b@example.com".to_string()];
        let msg = build_message("digest@example.com", &rcpts, "AI Research Digest - 2026-10-19", "<h1>x</h1>").unwrap();
        let raw = String::from_utf8(msg.formatted()).unwrap();
        assert!(raw.contains("a@example.com"));
        assert!(raw.contains("b@example.com"));
        assert!(raw.contains("Content-Type: text/html"));
        assert!(raw.contains("Subject: AI Research Digest - 2026-10-19"));
    }

    #[test]
    fn rejects_invalid_recipient() {
        let rcpts = vec!["not-an-address".to_string()];
        assert!(build_message("digest@example.com", &rcpts, "s", "d").is_err());
    }
}
