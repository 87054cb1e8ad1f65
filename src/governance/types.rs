//! Account type tags.

use std::fmt;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::Serialize;

/// Leading tag byte of every governance program account.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, BorshSerialize, BorshDeserialize,
)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum GovernanceAccountType {
    #[default]
    Uninitialized = 0,
    Realm = 1,
    TokenOwnerRecord = 2,
    AccountGovernance = 3,
    ProgramGovernance = 4,
    ProposalV1 = 5,
    SignatoryRecord = 6,
    VoteRecordV1 = 7,
    ProposalInstructionV1 = 8,
    MintGovernance = 9,
    TokenGovernance = 10,
    RealmConfig = 11,
    VoteRecordV2 = 12,
    ProposalTransactionV2 = 13,
    ProposalV2 = 14,
    ProgramMetadata = 15,
    RealmV2 = 16,
    TokenOwnerRecordV2 = 17,
    GovernanceV2 = 18,
    ProgramGovernanceV2 = 19,
    MintGovernanceV2 = 20,
    TokenGovernanceV2 = 21,
    SignatoryRecordV2 = 22,
    ProposalDeposit = 23,
    RequiredSignatory = 24,
}

impl GovernanceAccountType {
    pub const fn tag(self) -> u8 {
        self as u8
    }

    pub fn is_proposal(self) -> bool {
        matches!(self, Self::ProposalV1 | Self::ProposalV2)
    }

    pub fn is_vote_record(self) -> bool {
        matches!(self, Self::VoteRecordV1 | Self::VoteRecordV2)
    }

    pub fn is_token_owner_record(self) -> bool {
        matches!(self, Self::TokenOwnerRecord | Self::TokenOwnerRecordV2)
    }
}

/// Tag byte that names no known account type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownAccountType(pub u8);

impl fmt::Display for UnknownAccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown governance account type {}", self.0)
    }
}

impl std::error::Error for UnknownAccountType {}

impl TryFrom<u8> for GovernanceAccountType {
    type Error = UnknownAccountType;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        use GovernanceAccountType::*;
        Ok(match tag {
            0 => Uninitialized,
            1 => Realm,
            2 => TokenOwnerRecord,
            3 => AccountGovernance,
            4 => ProgramGovernance,
            5 => ProposalV1,
            6 => SignatoryRecord,
            7 => VoteRecordV1,
            8 => ProposalInstructionV1,
            9 => MintGovernance,
            10 => TokenGovernance,
            11 => RealmConfig,
            12 => VoteRecordV2,
            13 => ProposalTransactionV2,
            14 => ProposalV2,
            15 => ProgramMetadata,
            16 => RealmV2,
            17 => TokenOwnerRecordV2,
            18 => GovernanceV2,
            19 => ProgramGovernanceV2,
            20 => MintGovernanceV2,
            21 => TokenGovernanceV2,
            22 => SignatoryRecordV2,
            23 => ProposalDeposit,
            24 => RequiredSignatory,
            other => return Err(UnknownAccountType(other)),
        })
    }
}
