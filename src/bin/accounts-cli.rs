use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use governance_accounts::blockchain::{Address, RpcContext, RpcFilter};
use governance_accounts::config::{load_config, ClientConfig};
use governance_accounts::governance::{
    proposals_filters, token_owner_records_filters, vote_records_filters, ProposalHeader,
    TokenOwnerRecordHeader, VoteRecordHeader,
};
use governance_accounts::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "accounts-cli")]
#[command(about = "Read governance program accounts from an RPC node", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RPC endpoint (overrides config)
    #[arg(short, long)]
    url: Option<String>,

    /// Program id (overrides config)
    #[arg(short, long)]
    program: Option<Address>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List token owner records
    TokenOwnerRecords {
        #[arg(long)]
        realm: Option<Address>,
        /// Governing token mint
        #[arg(long)]
        mint: Option<Address>,
        #[arg(long)]
        owner: Option<Address>,
        /// Account type tag override (e.g. 17 for v2 records)
        #[arg(long)]
        account_type: Option<u8>,
    },
    /// List proposals
    Proposals {
        #[arg(long)]
        governance: Option<Address>,
        /// Governing token mint
        #[arg(long)]
        mint: Option<Address>,
        #[arg(long)]
        account_type: Option<u8>,
    },
    /// List vote records
    Votes {
        #[arg(long)]
        proposal: Option<Address>,
        /// Governing token owner who cast the vote
        #[arg(long)]
        voter: Option<Address>,
        #[arg(long)]
        account_type: Option<u8>,
    },
    /// Dump undecoded accounts with a given account type tag
    Raw {
        #[arg(long)]
        account_type: u8,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    if let Some(url) = cli.url {
        config.rpc.endpoint = url;
    }
    if let Some(program) = cli.program {
        config.program.program_id = program.to_base58();
    }

    init_logging(&config.observability)?;

    let ctx = RpcContext::from_config(&config)?;
    let fetcher = ctx.fetcher(&config)?;

    tracing::info!(
        endpoint = %fetcher.endpoint(),
        program_id = %ctx.program_id,
        "Reading program accounts"
    );

    match cli.command {
        Commands::TokenOwnerRecords {
            realm,
            mint,
            owner,
            account_type,
        } => {
            let filters =
                token_owner_records_filters(realm.as_ref(), mint.as_ref(), owner.as_ref());
            let accounts = fetcher
                .fetch_typed_accounts::<TokenOwnerRecordHeader>(
                    &ctx.program_id,
                    &filters,
                    account_type,
                )
                .await?;
            print_json(&accounts)?;
        }
        Commands::Proposals {
            governance,
            mint,
            account_type,
        } => {
            let filters = proposals_filters(governance.as_ref(), mint.as_ref());
            let accounts = fetcher
                .fetch_typed_accounts::<ProposalHeader>(
                    &ctx.program_id,
                    &filters,
                    account_type,
                )
                .await?;
            print_json(&accounts)?;
        }
        Commands::Votes {
            proposal,
            voter,
            account_type,
        } => {
            let filters = vote_records_filters(proposal.as_ref(), voter.as_ref());
            let accounts = fetcher
                .fetch_typed_accounts::<VoteRecordHeader>(
                    &ctx.program_id,
                    &filters,
                    account_type,
                )
                .await?;
            print_json(&accounts)?;
        }
        Commands::Raw { account_type } => {
            let filters = [RpcFilter::AccountType(account_type)];
            let accounts = fetcher
                .get_raw_program_accounts(&ctx.program_id, &filters)
                .await?;
            print_json(&accounts)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

