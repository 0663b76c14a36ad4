//! Review status of a transaction and the fixed table of legal transitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Workflow status of a bookkeeping transaction.
///
/// The string form of each variant is the wire name used by the GraphQL
/// schema and the `status` column, including the historical spelling of
/// `ClientCommucationRecieved`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, async_graphql::Enum,
)]
#[graphql(rename_items = "PascalCase")]
pub enum Status {
    AutoCategorized,
    Approved,
    ApprovedSyncedWithQuickBooks,
    Excluded,
    ExcludedSyncedWithQuickBooks,
    PendingSendToClient,
    SentToClient,
    ClientCommucationRecieved,
    NeedsHumanApproval,
    NeedsHumanReview,
}

impl Status {
    pub const ALL: [Status; 10] = [
        Status::AutoCategorized,
        Status::Approved,
        Status::ApprovedSyncedWithQuickBooks,
        Status::Excluded,
        Status::ExcludedSyncedWithQuickBooks,
        Status::PendingSendToClient,
        Status::SentToClient,
        Status::ClientCommucationRecieved,
        Status::NeedsHumanApproval,
        Status::NeedsHumanReview,
    ];

    /// Statuses reachable in one step. Terminal statuses return an empty slice.
    pub const fn successors(self) -> &'static [Status] {
        match self {
            Status::AutoCategorized | Status::NeedsHumanReview => &[
                Status::Approved,
                Status::Excluded,
                Status::PendingSendToClient,
            ],
            Status::Approved => &[Status::ApprovedSyncedWithQuickBooks],
            Status::Excluded => &[Status::ExcludedSyncedWithQuickBooks],
            Status::PendingSendToClient => &[Status::SentToClient],
            Status::SentToClient => &[
                Status::ClientCommucationRecieved,
                Status::NeedsHumanApproval,
                Status::NeedsHumanReview,
            ],
            Status::ApprovedSyncedWithQuickBooks
            | Status::ExcludedSyncedWithQuickBooks
            | Status::ClientCommucationRecieved
            | Status::NeedsHumanApproval => &[],
        }
    }

    pub fn can_transition_to(self, target: Status) -> bool {
        self.successors().contains(&target)
    }

    pub const fn is_terminal(self) -> bool {
        self.successors().is_empty()
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Status::AutoCategorized => "AutoCategorized",
            Status::Approved => "Approved",
            Status::ApprovedSyncedWithQuickBooks => "ApprovedSyncedWithQuickBooks",
            Status::Excluded => "Excluded",
            Status::ExcludedSyncedWithQuickBooks => "ExcludedSyncedWithQuickBooks",
            Status::PendingSendToClient => "PendingSendToClient",
            Status::SentToClient => "SentToClient",
            Status::ClientCommucationRecieved => "ClientCommucationRecieved",
            Status::NeedsHumanApproval => "NeedsHumanApproval",
            Status::NeedsHumanReview => "NeedsHumanReview",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transaction status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}
