//! Status → phase classification

use crate::types::receipt::{ExecutionPhase, ExecutionReceipt, ExecutionStatus};

/// Map a status onto its coarse phase
///
/// Total over every status, including ones this client does not know:
/// anything unrecognized is treated as still pending so polling keeps going.
#[must_use]
pub fn classify(status: &ExecutionStatus) -> ExecutionPhase {
    match status {
        ExecutionStatus::TokenIssued
        | ExecutionStatus::Dispatched
        | ExecutionStatus::ProofPending => ExecutionPhase::Pending,
        ExecutionStatus::Queued | ExecutionStatus::Retrying => ExecutionPhase::Queued,
        ExecutionStatus::DeliveredToExecutor => ExecutionPhase::Delivered,
        ExecutionStatus::Completed => ExecutionPhase::Done,
        ExecutionStatus::Failed | ExecutionStatus::Expired => ExecutionPhase::Error,
        ExecutionStatus::Unknown(_) => ExecutionPhase::Pending,
    }
}

/// Classify a receipt by its status
#[must_use]
pub fn classify_receipt(receipt: &ExecutionReceipt) -> ExecutionPhase {
    classify(&receipt.status)
}

impl ExecutionStatus {
    /// Coarse phase of this status
    #[must_use]
    pub fn phase(&self) -> ExecutionPhase {
        classify(self)
    }
}
