//! Checkout handoff module
//!
//! Models the three ways a client pays for a consultation and the
//! confirmation redirect the SPA shows afterwards. Only card payments are ever
//! confirmed, by the payment processor's callback; a bank transfer or a
//! messaging-app handoff leaves the payment pending because nothing on the
//! server side verifies it.

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use url::form_urlencoded;

use crate::config::HandoffConfig;

/// How the client chose to pay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    BankTransfer,
    Messaging,
}

/// Where a payment stands once the client leaves the checkout flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Confirmed,
    Failed,
}

impl PaymentMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::BankTransfer => "bank_transfer",
            Self::Messaging => "messaging",
        }
    }

    /// Status after the flow ends. `processor_outcome` is the card processor's
    /// success flag when its callback fired.
    pub const fn settle(self, processor_outcome: Option<bool>) -> PaymentStatus {
        match (self, processor_outcome) {
            (Self::Card, Some(true)) => PaymentStatus::Confirmed,
            (Self::Card, Some(false)) => PaymentStatus::Failed,
            _ => PaymentStatus::Pending,
        }
    }
}

impl PaymentStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("missing required parameter '{0}'")]
    Missing(&'static str),
    #[error("invalid amount '{0}': expected a positive number with at most two decimals")]
    InvalidAmount(String),
    #[error("invalid payment reference '{0}'")]
    InvalidReference(String),
}

/// A positive decimal amount, kept in its normalized textual form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Amount(String);

impl Amount {
    /// Accepts `150`, `150.5`, `150.50` and `150,50`
    pub fn parse(raw: &str) -> Result<Self, CheckoutError> {
        let normalized = raw.trim().replace(',', ".");
        let invalid = || CheckoutError::InvalidAmount(raw.to_string());

        let (whole, fraction) = normalized
            .split_once('.')
            .map_or((normalized.as_str(), ""), |(w, f)| (w, f));
        let fraction_ok = fraction.len() <= 2 && fraction.chars().all(|c| c.is_ascii_digit());
        let fraction_present_ok = !normalized.contains('.') || !fraction.is_empty();
        if whole.is_empty()
            || !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction_ok
            || !fraction_present_ok
        {
            return Err(invalid());
        }
        if normalized.chars().all(|c| c == '0' || c == '.') {
            return Err(invalid());
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Data the confirmation page is opened with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Confirmation {
    pub payment_id: String,
    pub amount: Amount,
    pub status: PaymentStatus,
    pub method: PaymentMethod,
}

impl Confirmation {
    /// Client-side confirmation route with the payment encoded in the query
    pub fn to_url(&self, confirmation_path: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("payment_id", &self.payment_id)
            .append_pair("amount", self.amount.as_str())
            .append_pair("status", self.status.as_str())
            .append_pair("method", self.method.as_str())
            .finish();
        format!("{confirmation_path}?{query}")
    }
}

/// Result of starting a messaging-app payment
#[derive(Debug, Clone, Serialize)]
pub struct Handoff {
    pub status: PaymentStatus,
    pub payment_id: String,
    pub amount: Amount,
    pub deep_link: String,
    pub confirmation_url: String,
}

/// Builds deep links that open a chat with a prefilled payment message
#[derive(Debug, Clone)]
pub struct MessagingHandoff {
    contact_digits: String,
    base_url: String,
    confirmation_path: String,
    message_template: String,
}

impl MessagingHandoff {
    pub fn from_config(config: &HandoffConfig) -> Self {
        Self {
            contact_digits: config
                .contact_number
                .chars()
                .filter(char::is_ascii_digit)
                .collect(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            confirmation_path: config.confirmation_path.clone(),
            message_template: config.message_template.clone(),
        }
    }

    /// Link that opens the chat with the message already typed
    pub fn deep_link(&self, service: &str, amount: &Amount) -> String {
        let message = self
            .message_template
            .replace("{service}", service)
            .replace("{amount}", amount.as_str());
        // byte_serialize encodes '+' itself, so every remaining '+' is a space
        let text = form_urlencoded::byte_serialize(message.as_bytes())
            .collect::<String>()
            .replace('+', "%20");
        format!("{}/{}?text={text}", self.base_url, self.contact_digits)
    }

    /// Start a handoff. Nothing confirms the chat was sent, so the result is always pending.
    pub fn start(
        &self,
        service: Option<&str>,
        amount: Option<&str>,
        reference: Option<&str>,
    ) -> Result<Handoff, CheckoutError> {
        let service = service
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(CheckoutError::Missing("service"))?;
        let amount = Amount::parse(amount.ok_or(CheckoutError::Missing("amount"))?)?;
        let payment_id = match reference.map(str::trim).filter(|r| !r.is_empty()) {
            Some(r) if is_valid_reference(r) => r.to_string(),
            Some(r) => return Err(CheckoutError::InvalidReference(r.to_string())),
            None => format!("msg-{}", Utc::now().timestamp_millis()),
        };

        let method = PaymentMethod::Messaging;
        let confirmation = Confirmation {
            payment_id: payment_id.clone(),
            amount: amount.clone(),
            status: method.settle(None),
            method,
        };

        Ok(Handoff {
            status: confirmation.status,
            deep_link: self.deep_link(service, &amount),
            confirmation_url: confirmation.to_url(&self.confirmation_path),
            payment_id,
            amount,
        })
    }
}

fn is_valid_reference(reference: &str) -> bool {
    reference.len() <= 64
        && reference
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
