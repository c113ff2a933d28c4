//! Email notifications for tickets and registrations.
//!
//! Uses SMTP via lettre for delivery with Askama HTML templates.

use std::time::Duration;

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;
use crate::models::Ticket;

/// SMTP send timeout.
const SMTP_TIMEOUT: Duration = Duration::from_secs(10);

/// HTML template for the submitter's confirmation email.
#[derive(Template)]
#[template(path = "email/ticket_confirmation.html")]
struct TicketConfirmationHtml<'a> {
    client_name: &'a str,
}

/// Plain text template for the submitter's confirmation email.
#[derive(Template)]
#[template(path = "email/ticket_confirmation.txt")]
struct TicketConfirmationText<'a> {
    client_name: &'a str,
}

/// HTML template for the staff alert email.
#[derive(Template)]
#[template(path = "email/ticket_alert.html")]
struct TicketAlertHtml<'a> {
    client_name: &'a str,
    client_email: &'a str,
    client_phone: &'a str,
    event_summary: &'a str,
    urgency_level: &'a str,
}

/// Plain text template for the staff alert email.
#[derive(Template)]
#[template(path = "email/ticket_alert.txt")]
struct TicketAlertText<'a> {
    client_name: &'a str,
    client_email: &'a str,
    client_phone: &'a str,
    event_summary: &'a str,
    urgency_level: &'a str,
}

/// HTML template for the welcome email.
#[derive(Template)]
#[template(path = "email/welcome.html")]
struct WelcomeHtml<'a> {
    name: &'a str,
}

/// Plain text template for the welcome email.
#[derive(Template)]
#[template(path = "email/welcome.txt")]
struct WelcomeText<'a> {
    name: &'a str,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("template error: {0}")]
    Template(#[from] askama::Error),
}

/// Email service for transactional notifications.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    staff_mailbox: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_owned(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
            staff_mailbox: config.staff_mailbox.clone(),
        })
    }

    /// Send both notifications for a newly submitted ticket.
    ///
    /// Delivery is best effort: a failed send is logged and swallowed so
    /// the ticket submission itself never fails on email problems.
    pub async fn notify_ticket_created(&self, ticket: &Ticket) {
        if let Err(e) = self.send_ticket_confirmation(ticket).await {
            tracing::warn!(
                ticket_id = %ticket.id,
                error = %e,
                "failed to send ticket confirmation email"
            );
        }

        if let Err(e) = self.send_ticket_alert(ticket).await {
            tracing::warn!(
                ticket_id = %ticket.id,
                error = %e,
                "failed to send staff alert email"
            );
        }
    }

    /// Confirmation to the person who submitted the ticket.
    ///
    /// # Errors
    ///
    /// Returns error if the email fails to send or a template fails to render.
    pub async fn send_ticket_confirmation(&self, ticket: &Ticket) -> Result<(), EmailError> {
        let html = TicketConfirmationHtml {
            client_name: &ticket.client_name,
        }
        .render()?;
        let text = TicketConfirmationText {
            client_name: &ticket.client_name,
        }
        .render()?;

        self.send_multipart_email(
            ticket.client_email.as_str(),
            "פנייתך התקבלה - משרד עורכי דין",
            &text,
            &html,
        )
        .await
    }

    /// Alert to the staff mailbox with the full ticket details.
    ///
    /// # Errors
    ///
    /// Returns error if the email fails to send or a template fails to render.
    pub async fn send_ticket_alert(&self, ticket: &Ticket) -> Result<(), EmailError> {
        let html = TicketAlertHtml {
            client_name: &ticket.client_name,
            client_email: ticket.client_email.as_str(),
            client_phone: &ticket.client_phone,
            event_summary: &ticket.event_summary,
            urgency_level: &ticket.urgency_level,
        }
        .render()?;
        let text = TicketAlertText {
            client_name: &ticket.client_name,
            client_email: ticket.client_email.as_str(),
            client_phone: &ticket.client_phone,
            event_summary: &ticket.event_summary,
            urgency_level: &ticket.urgency_level,
        }
        .render()?;

        self.send_multipart_email(
            &self.staff_mailbox,
            &format!("פנייה חדשה התקבלה - {}", ticket.client_name),
            &text,
            &html,
        )
        .await
    }

    /// Welcome email after a successful portal registration.
    ///
    /// # Errors
    ///
    /// Returns error if the email fails to send or a template fails to render.
    pub async fn send_welcome(&self, to: &str, name: &str) -> Result<(), EmailError> {
        let html = WelcomeHtml { name }.render()?;
        let text = WelcomeText { name }.render()?;

        self.send_multipart_email(to, "ברוכים הבאים לפורטל הלקוחות", &text, &html)
            .await
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_owned()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_owned()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_owned()),
                    ),
            )?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "email sent");
        Ok(())
    }
}
