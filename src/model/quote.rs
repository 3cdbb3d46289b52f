use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Lifecycle of a quote. PENDING is the only entry state; APPROVED and
/// REJECTED are the two admin decisions; CUSTOMER_APPROVED is reachable
/// only after the business approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteStatus {
    Pending,
    Approved,
    Rejected,
    CustomerApproved,
}

impl QuoteStatus {
    /// Allowed transitions:
    /// PENDING -> APPROVED | REJECTED, APPROVED -> CUSTOMER_APPROVED.
    /// REJECTED and CUSTOMER_APPROVED are terminal.
    pub fn can_transition_to(self, next: QuoteStatus) -> bool {
        matches!(
            (self, next),
            (QuoteStatus::Pending, QuoteStatus::Approved)
                | (QuoteStatus::Pending, QuoteStatus::Rejected)
                | (QuoteStatus::Approved, QuoteStatus::CustomerApproved)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Pending => "PENDING",
            QuoteStatus::Approved => "APPROVED",
            QuoteStatus::Rejected => "REJECTED",
            QuoteStatus::CustomerApproved => "CUSTOMER_APPROVED",
        }
    }
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for QuoteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(QuoteStatus::Pending),
            "APPROVED" => Ok(QuoteStatus::Approved),
            "REJECTED" => Ok(QuoteStatus::Rejected),
            "CUSTOMER_APPROVED" => Ok(QuoteStatus::CustomerApproved),
            other => Err(format!("Unknown quote status: {}", other)),
        }
    }
}

#[allow(non_snake_case)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub quoteNumber: String,
    pub status: QuoteStatus,

    // Design configuration, embedded at submission time
    pub customText: String,
    pub fontStyle: String,
    pub color: String,
    pub size: String,
    pub material: String,
    pub backing: Option<String>,
    pub mounting: Option<String>,
    pub powerOption: Option<String>,

    // Pricing. calculatedPrice is set at creation and never changes;
    // approvedPrice is only written by an APPROVED decision.
    pub calculatedPrice: f64,
    pub approvedPrice: Option<f64>,

    pub customerId: ObjectId,
    pub customerNotes: Option<String>,
    pub businessNotes: Option<String>,

    pub createdAt: Option<String>,
    pub updatedAt: Option<String>,
    pub approvedAt: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_can_be_decided() {
        assert!(QuoteStatus::Pending.can_transition_to(QuoteStatus::Approved));
        assert!(QuoteStatus::Pending.can_transition_to(QuoteStatus::Rejected));
    }

    #[test]
    fn test_approved_only_advances_to_customer_approved() {
        assert!(QuoteStatus::Approved.can_transition_to(QuoteStatus::CustomerApproved));
        assert!(!QuoteStatus::Approved.can_transition_to(QuoteStatus::Rejected));
        assert!(!QuoteStatus::Approved.can_transition_to(QuoteStatus::Pending));
    }

    #[test]
    fn test_terminal_states() {
        for next in [
            QuoteStatus::Pending,
            QuoteStatus::Approved,
            QuoteStatus::Rejected,
            QuoteStatus::CustomerApproved,
        ] {
            assert!(!QuoteStatus::Rejected.can_transition_to(next));
            assert!(!QuoteStatus::CustomerApproved.can_transition_to(next));
        }
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            QuoteStatus::Pending,
            QuoteStatus::Approved,
            QuoteStatus::Rejected,
            QuoteStatus::CustomerApproved,
        ] {
            assert_eq!(status.as_str().parse::<QuoteStatus>().unwrap(), status);
        }
        assert!("pending".parse::<QuoteStatus>().is_err());
    }
}
