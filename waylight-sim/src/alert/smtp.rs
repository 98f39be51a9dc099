use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::alert::AlertTransport;

/// SMTP submission transport: STARTTLS plus authenticated login.
///
/// lettre's blocking transport is driven from `spawn_blocking` so a slow
/// relay never stalls the tick loop; the monitor additionally bounds the
/// whole delivery with a timeout.
#[derive(Clone)]
pub struct SmtpAlert {
    transport: SmtpTransport,
    from: Mailbox,
    to: Mailbox,
    subject: String,
}

/// Error type for SmtpAlert.
#[derive(Debug, thiserror::Error)]
pub enum SmtpAlertError {
    #[error("invalid mailbox address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("failed to build alert message: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("smtp delivery failed: {0}")]
    Delivery(#[from] lettre::transport::smtp::Error),
    #[error("smtp worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl SmtpAlert {
    pub fn new(
        relay: &str,
        port: u16,
        username: String,
        password: String,
        from: &str,
        to: &str,
        subject: String,
    ) -> Result<Self, SmtpAlertError> {
        let transport = SmtpTransport::starttls_relay(relay)?
            .port(port)
            .credentials(Credentials::new(username, password))
            .build();

        Ok(Self {
            transport,
            from: from.parse()?,
            to: to.parse()?,
            subject,
        })
    }
}

#[async_trait]
impl AlertTransport for SmtpAlert {
    type Error = SmtpAlertError;

    async fn send(&self, message: &str) -> Result<(), Self::Error> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(self.subject.clone())
            .body(message.to_owned())?;

        let transport = self.transport.clone();
        tokio::task::spawn_blocking(move || transport.send(&email)).await??;

        Ok(())
    }
}
