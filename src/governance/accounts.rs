//! Header records and scan filters for governance accounts.
//!
//! Headers read only the fixed leading fields of each account, which keeps
//! them valid across program versions that append fields.

use borsh::BorshDeserialize;
use serde::Serialize;

use crate::blockchain::address::Address;
use crate::blockchain::filter::{pubkey_filter, MemcmpFilter};
use crate::blockchain::record::{decode_prefix, AccountRecord};
use crate::blockchain::types::DecodeError;
use crate::governance::types::GovernanceAccountType;

/// Token owner record: realm at 1, governing mint at 33, owner at 65.
pub const TOKEN_OWNER_RECORD_REALM_OFFSET: usize = 1;
pub const TOKEN_OWNER_RECORD_MINT_OFFSET: usize = 33;
pub const TOKEN_OWNER_RECORD_OWNER_OFFSET: usize = 65;

/// Proposal: governance at 1, governing mint at 33.
pub const PROPOSAL_GOVERNANCE_OFFSET: usize = 1;
pub const PROPOSAL_MINT_OFFSET: usize = 33;

/// Vote record: proposal at 1, voter at 33.
pub const VOTE_RECORD_PROPOSAL_OFFSET: usize = 1;
pub const VOTE_RECORD_OWNER_OFFSET: usize = 33;

fn rejected(record: &str, found: GovernanceAccountType) -> DecodeError {
    DecodeError::Rejected(format!("{} cannot hold account type {:?}", record, found))
}

/// Leading fields of a token owner record (a voter's deposit in a realm).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, BorshDeserialize)]
pub struct TokenOwnerRecordHeader {
    pub account_type: GovernanceAccountType,
    pub realm: Address,
    pub governing_token_mint: Address,
    pub governing_token_owner: Address,
    pub governing_token_deposit_amount: u64,
}

impl Default for TokenOwnerRecordHeader {
    fn default() -> Self {
        Self {
            account_type: GovernanceAccountType::TokenOwnerRecord,
            realm: Address::default(),
            governing_token_mint: Address::default(),
            governing_token_owner: Address::default(),
            governing_token_deposit_amount: 0,
        }
    }
}

impl AccountRecord for TokenOwnerRecordHeader {
    const NAME: &'static str = "TokenOwnerRecord";

    fn account_type(&self) -> u8 {
        self.account_type.tag()
    }

    fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let record: Self = decode_prefix(data)?;
        if !record.account_type.is_token_owner_record() {
            return Err(rejected(Self::NAME, record.account_type));
        }
        Ok(record)
    }
}

/// Leading fields of a proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, BorshDeserialize)]
pub struct ProposalHeader {
    pub account_type: GovernanceAccountType,
    pub governance: Address,
    pub governing_token_mint: Address,
}

impl Default for ProposalHeader {
    fn default() -> Self {
        Self {
            account_type: GovernanceAccountType::ProposalV2,
            governance: Address::default(),
            governing_token_mint: Address::default(),
        }
    }
}

impl AccountRecord for ProposalHeader {
    const NAME: &'static str = "Proposal";

    fn account_type(&self) -> u8 {
        self.account_type.tag()
    }

    fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let record: Self = decode_prefix(data)?;
        if !record.account_type.is_proposal() {
            return Err(rejected(Self::NAME, record.account_type));
        }
        Ok(record)
    }
}

/// Leading fields of a vote record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, BorshDeserialize)]
pub struct VoteRecordHeader {
    pub account_type: GovernanceAccountType,
    pub proposal: Address,
    pub governing_token_owner: Address,
}

impl Default for VoteRecordHeader {
    fn default() -> Self {
        Self {
            account_type: GovernanceAccountType::VoteRecordV2,
            proposal: Address::default(),
            governing_token_owner: Address::default(),
        }
    }
}

impl AccountRecord for VoteRecordHeader {
    const NAME: &'static str = "VoteRecord";

    fn account_type(&self) -> u8 {
        self.account_type.tag()
    }

    fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let record: Self = decode_prefix(data)?;
        if !record.account_type.is_vote_record() {
            return Err(rejected(Self::NAME, record.account_type));
        }
        Ok(record)
    }
}

/// Filters for token owner records, each scope optional.
pub fn token_owner_records_filters(
    realm: Option<&Address>,
    governing_token_mint: Option<&Address>,
    owner: Option<&Address>,
) -> Vec<MemcmpFilter> {
    [
        pubkey_filter(TOKEN_OWNER_RECORD_REALM_OFFSET, realm),
        pubkey_filter(TOKEN_OWNER_RECORD_MINT_OFFSET, governing_token_mint),
        pubkey_filter(TOKEN_OWNER_RECORD_OWNER_OFFSET, owner),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Filters for proposals, optionally scoped to a governance and its
/// governing mint.
pub fn proposals_filters(
    governance: Option<&Address>,
    governing_token_mint: Option<&Address>,
) -> Vec<MemcmpFilter> {
    [
        pubkey_filter(PROPOSAL_GOVERNANCE_OFFSET, governance),
        pubkey_filter(PROPOSAL_MINT_OFFSET, governing_token_mint),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Filters for vote records, optionally scoped to a proposal and a voter.
pub fn vote_records_filters(
    proposal: Option<&Address>,
    voter: Option<&Address>,
) -> Vec<MemcmpFilter> {
    [
        pubkey_filter(VOTE_RECORD_PROPOSAL_OFFSET, proposal),
        pubkey_filter(VOTE_RECORD_OWNER_OFFSET, voter),
    ]
    .into_iter()
    .flatten()
    .collect()
}
