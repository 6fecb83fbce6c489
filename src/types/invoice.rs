//! Invoice-backed session start
//!
//! Older Portal deployments start a session from an amount and currency and
//! answer with the invoice they created. The response shape drifted between
//! builds, so pricing is read from whichever field is present.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::identifiers::SessionId;

/// Currency used when none is given
pub const DEFAULT_INVOICE_CURRENCY: &str = "BTC";

/// Amount to bill, as a number or a decimal string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InvoiceAmount {
    /// Numeric amount
    Number(f64),
    /// Decimal string, sent as-is after trimming
    Text(String),
}

impl InvoiceAmount {
    /// Query-string form of the amount, `None` when unusable
    #[must_use]
    pub fn to_query_value(&self) -> Option<String> {
        match self {
            Self::Number(n) if n.is_finite() => Some(n.to_string()),
            Self::Number(_) => None,
            Self::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
        }
    }
}

impl From<f64> for InvoiceAmount {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for InvoiceAmount {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for InvoiceAmount {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Parameters for an invoice-backed session start
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceSessionOptions {
    /// Amount to bill
    pub amount: InvoiceAmount,
    /// Currency code, defaults to BTC
    pub currency: Option<String>,
    /// Memo attached to the invoice
    pub memo: Option<String>,
    /// Reuse a caller-chosen session id
    pub session_id: Option<SessionId>,
}

impl InvoiceSessionOptions {
    /// Bill `amount` in the default currency
    pub fn new(amount: impl Into<InvoiceAmount>) -> Self {
        Self {
            amount: amount.into(),
            currency: None,
            memo: None,
            session_id: None,
        }
    }

    /// Set the currency
    #[must_use]
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Set the memo
    #[must_use]
    pub fn memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }
}

/// Invoice summary in the current response shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceSummary {
    /// Billed amount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    /// Billed currency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Total expected on-chain, in sats
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_total_sats: Option<u64>,
}

/// Pricing breakdown in the older response shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSummary {
    /// Total, in sats
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_sats: Option<u64>,
    /// Subtotal before fees, in sats
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quoted_subtotal_sats: Option<u64>,
    /// Platform fee in basis points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_fee_bps: Option<u64>,
    /// Platform fee, in sats
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_fee_sats: Option<u64>,
    /// Quote currency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Response from an invoice-backed session start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceSessionResponse {
    /// Created session
    pub session_id: SessionId,
    /// Created invoice
    #[serde(default)]
    pub invoice_id: String,
    /// Where the payer completes checkout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_url: Option<String>,
    /// Invoice summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice: Option<InvoiceSummary>,
    /// Pricing breakdown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<PricingSummary>,
    /// Total, in sats, from the flat legacy field
    #[serde(
        rename = "expectedTotalSats",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub expected_total_sats: Option<u64>,
    /// Unrecognized fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InvoiceSessionResponse {
    /// Expected payment total in sats, from whichever shape carries it
    #[must_use]
    pub fn expected_total_sats(&self) -> Option<u64> {
        self.invoice
            .as_ref()
            .and_then(|i| i.expected_total_sats)
            .or_else(|| self.pricing.as_ref().and_then(|p| p.total_sats))
            .or(self.expected_total_sats)
    }
}
