//! Governance program account types.
//!
//! Tags, field offsets and header records for the accounts a governance
//! front-end lists: token owner records, proposals and votes.

pub mod accounts;
pub mod types;

pub use accounts::{
    proposals_filters, token_owner_records_filters, vote_records_filters, ProposalHeader, TokenOwnerRecordHeader, VoteRecordHeader,
};
pub use types::GovernanceAccountType;
