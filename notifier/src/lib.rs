use async_trait::async_trait;
use chrono::{DateTime, Local};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use mentions_core::{CoreError, MatchKind, MatchRecord, NotifyError, SmtpSettings, Timeframe};
use tracing::{debug, info};

/// Delivers a digest of newly found matches.
#[async_trait]
pub trait Notifier {
    async fn notify(&self, records: &[MatchRecord], timeframe: Timeframe)
        -> Result<(), CoreError>;
}

/// Subject and body of one digest message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub subject: String,
    pub body: String,
}

impl Digest {
    pub fn compose(records: &[MatchRecord], timeframe: Timeframe, now: DateTime<Local>) -> Self {
        let current_time = now.format("%Y-%m-%d %H:%M:%S").to_string();
        let label = timeframe.label();

        let subject = format!("Reddit Search Results ({}) - {}", label, current_time);

        let mut body = format!(
            "Relevant mentions on Reddit for {} as of {}:\n\n",
            label, current_time
        );
        for record in records {
            match record.kind {
                MatchKind::Post => body.push_str(&format!("Post: {}\n", record.title)),
                MatchKind::Comment => body.push_str("Comment\n"),
            }
            body.push_str(&format!(
                "Matched: {}\nDate: {}\nURL: {}\n\n",
                record.matched_phrase, record.date, record.url
            ));
        }

        Self { subject, body }
    }
}

/// Sends digests over SMTP with STARTTLS and sender credentials.
pub struct EmailNotifier {
    settings: SmtpSettings,
}

impl EmailNotifier {
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    fn mailbox(address: &str) -> Result<Mailbox, NotifyError> {
        address
            .parse::<Mailbox>()
            .map_err(|e| NotifyError::InvalidAddress {
                address: address.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn build_message(&self, digest: &Digest) -> Result<Message, CoreError> {
        let message = Message::builder()
            .from(Self::mailbox(&self.settings.sender_email)?)
            .to(Self::mailbox(&self.settings.recipient_email)?)
            .subject(digest.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(digest.body.clone())
            .map_err(|e| NotifyError::MessageBuild {
                reason: e.to_string(),
            })?;
        Ok(message)
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, NotifyError> {
        let credentials = Credentials::new(
            self.settings.sender_email.clone(),
            self.settings.sender_password.clone(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.settings.server)
            .map_err(|e| NotifyError::Transport {
                reason: e.to_string(),
            })?
            .port(self.settings.port)
            .credentials(credentials)
            .build();
        Ok(transport)
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(
        &self,
        records: &[MatchRecord],
        timeframe: Timeframe,
    ) -> Result<(), CoreError> {
        let digest = Digest::compose(records, timeframe, Local::now());
        let message = self.build_message(&digest)?;
        let transport = self.transport()?;

        debug!(
            "Sending digest with {} results via {}:{}",
            records.len(),
            self.settings.server,
            self.settings.port
        );

        let response = transport.send(message).await.map_err(|e| {
            if e.is_permanent() {
                NotifyError::Rejected {
                    reason: e.to_string(),
                }
            } else {
                NotifyError::Transport {
                    reason: e.to_string(),
                }
            }
        })?;

        info!("Email sent successfully! ({})", response.code());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(kind: MatchKind, title: &str, phrase: &str, url: &str) -> MatchRecord {
        MatchRecord {
            kind,
            title: title.to_string(),
            body: "body".to_string(),
            url: url.to_string(),
            created_utc: 1_710_460_800.0,
            date: "2024-03-15".to_string(),
            matched_phrase: phrase.to_string(),
        }
    }

    fn settings() -> SmtpSettings {
        SmtpSettings {
            server: "smtp.example.com".to_string(),
            port: 587,
            sender_email: "bot@example.com".to_string(),
            sender_password: "secret".to_string(),
            recipient_email: "me@example.com".to_string(),
        }
    }

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 15, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_daily_digest_layout() {
        let records = vec![
            record(MatchKind::Post, "Alpha release", "alpha", "https://reddit.com/a/"),
            record(MatchKind::Comment, "Other thread", "beta", "https://reddit.com/b/"),
        ];

        let digest = Digest::compose(&records, Timeframe::new(0), noon());

        assert_eq!(
            digest.subject,
            "Reddit Search Results (Today) - 2024-03-15 12:30:00"
        );
        assert_eq!(
            digest.body,
            "Relevant mentions on Reddit for Today as of 2024-03-15 12:30:00:\n\n\
             Post: Alpha release\nMatched: alpha\nDate: 2024-03-15\nURL: https://reddit.com/a/\n\n\
             Comment\nMatched: beta\nDate: 2024-03-15\nURL: https://reddit.com/b/\n\n"
        );
    }

    #[test]
    fn test_multi_day_label() {
        let digest = Digest::compose(&[], Timeframe::new(7), noon());
        assert!(digest.subject.starts_with("Reddit Search Results (Past 7 Days) - "));
        assert!(digest.body.starts_with("Relevant mentions on Reddit for Past 7 Days as of"));
    }

    #[test]
    fn test_comment_entries_omit_title() {
        let records = vec![record(
            MatchKind::Comment,
            "Parent title",
            "alpha",
            "https://reddit.com/c/",
        )];
        let digest = Digest::compose(&records, Timeframe::new(0), noon());
        assert!(!digest.body.contains("Parent title"));
    }

    #[test]
    fn test_build_message_addresses() {
        let notifier = EmailNotifier::new(settings());
        let digest = Digest::compose(&[], Timeframe::new(0), noon());

        let message = notifier.build_message(&digest).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();
        assert!(formatted.contains("From: bot@example.com"));
        assert!(formatted.contains("To: me@example.com"));
        assert!(formatted.contains("Subject: Reddit Search Results (Today)"));
    }

    #[test]
    fn test_invalid_sender_is_reported() {
        let mut bad = settings();
        bad.sender_email = "not an address".to_string();
        let notifier = EmailNotifier::new(bad);
        let digest = Digest::compose(&[], Timeframe::new(0), noon());

        let result = notifier.build_message(&digest);
        assert!(matches!(
            result,
            Err(CoreError::Notify(NotifyError::InvalidAddress { .. }))
        ));
    }
}
