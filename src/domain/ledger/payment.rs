//! Payments recorded against a project.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MemberId, Money, PaymentId, ProjectId, Timestamp, ValidationError};

/// Maximum description length in characters.
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// A validated payment about to be stored.
///
/// `participants` is `None` when the payment is split among every member
/// that had joined when it was recorded. When `Some`, it is non-empty and
/// free of duplicates, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    pub payer_member_id: MemberId,
    pub amount: Money,
    pub description: Option<String>,
    pub participants: Option<Vec<MemberId>>,
}

impl NewPayment {
    pub fn new(
        payer_member_id: MemberId,
        amount: Money,
        description: Option<String>,
        participants: Option<Vec<MemberId>>,
    ) -> Result<Self, ValidationError> {
        if !amount.is_positive() {
            return Err(ValidationError::not_positive("amount", amount.minor_units()));
        }

        let description = match description.map(|d| d.trim().to_string()) {
            Some(d) if d.is_empty() => None,
            Some(d) => {
                let len = d.chars().count();
                if len > MAX_DESCRIPTION_LEN {
                    return Err(ValidationError::out_of_range(
                        "description",
                        0,
                        MAX_DESCRIPTION_LEN as i64,
                        len as i64,
                    ));
                }
                Some(d)
            }
            None => None,
        };

        let participants = match participants {
            Some(list) => {
                let deduped = dedup_preserving_order(list);
                if deduped.is_empty() {
                    return Err(ValidationError::empty_field("participants"));
                }
                Some(deduped)
            }
            None => None,
        };

        Ok(Self {
            payer_member_id,
            amount,
            description,
            participants,
        })
    }

    /// Materializes the stored payment record.
    pub fn into_payment(self, project_id: ProjectId) -> Payment {
        Payment {
            id: PaymentId::new(),
            project_id,
            payer_member_id: self.payer_member_id,
            amount: self.amount,
            description: self.description,
            participants: self.participants,
            created_at: Timestamp::now(),
        }
    }
}

/// A recorded payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub project_id: ProjectId,
    pub payer_member_id: MemberId,
    pub amount: Money,
    pub description: Option<String>,
    pub participants: Option<Vec<MemberId>>,
    pub created_at: Timestamp,
}

fn dedup_preserving_order(list: Vec<MemberId>) -> Vec<MemberId> {
    let mut out: Vec<MemberId> = Vec::with_capacity(list.len());
    for id in list {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}
