//! Integration tests for the wallet and token operations over fakes

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use common::{FakeRpc, FakeWallet};
use solana_sdk::{native_token::sol_to_lamports, pubkey::Pubkey};
use spl_associated_token_account::get_associated_token_address;

use solmint::metadata::{find_metadata_pda, TokenMetadata};
use solmint::ops;
use solmint::ops::token::TokenSpec;
use solmint::pipeline::{SubmitError, SubmitPipeline, SubmitPolicy};
use solmint::rpc::{NetworkRpc, TokenAccountSummary};
use solmint::wallet::WalletSigner;

fn test_policy() -> SubmitPolicy {
    SubmitPolicy {
        max_attempts: 3,
        base_backoff_ms: 10,
        max_backoff_ms: 40,
        jitter_factor: 0.0,
        poll_interval_ms: 10,
    }
}

fn make_pipeline(rpc: &Arc<FakeRpc>) -> SubmitPipeline {
    SubmitPipeline::new(rpc.clone() as Arc<dyn NetworkRpc>, test_policy())
}

/// Metadata account bytes the way the program stores them: fixed-width
/// string slots padded with trailing zeros
fn metadata_account_bytes(name: &str, symbol: &str, uri: &str) -> Vec<u8> {
    let mut data = vec![4u8];
    data.extend_from_slice(Pubkey::new_unique().as_ref());
    data.extend_from_slice(Pubkey::new_unique().as_ref());
    for (s, width) in [(name, 32), (symbol, 10), (uri, 200)] {
        data.extend_from_slice(&(width as u32).to_le_bytes());
        let mut field = s.as_bytes().to_vec();
        field.resize(width, 0);
        data.extend_from_slice(&field);
    }
    data
}

#[tokio::test(start_paused = true)]
async fn test_transfer_sol_confirms() {
    let rpc = Arc::new(FakeRpc::confirming(100));
    let pipeline = make_pipeline(&rpc);
    let wallet = Arc::new(FakeWallet::new());
    let recipient = Pubkey::new_unique();

    let receipt = ops::transfer::transfer_sol(&pipeline, wallet, recipient, 0.5)
        .await
        .unwrap();

    assert_eq!(receipt.recipient, recipient);
    assert_eq!(receipt.lamports, sol_to_lamports(0.5));
    assert_eq!(receipt.signature, rpc.signature());
    assert_eq!(rpc.submit_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_transfer_rejects_non_positive_amount() {
    let rpc = Arc::new(FakeRpc::confirming(100));
    let pipeline = make_pipeline(&rpc);
    let wallet = Arc::new(FakeWallet::new());

    let result = ops::transfer::transfer_sol(&pipeline, wallet, Pubkey::new_unique(), 0.0).await;
    assert!(result.is_err());
    assert_eq!(rpc.submit_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_rejected_transfer_reports_reason() {
    let rpc = Arc::new(FakeRpc::confirming(100));
    rpc.script_submit(Err(SubmitError::rejected("insufficient funds for fee")));
    let pipeline = make_pipeline(&rpc);
    let wallet = Arc::new(FakeWallet::new());

    let err = ops::transfer::transfer_sol(&pipeline, wallet, Pubkey::new_unique(), 0.5)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("insufficient funds for fee"));
}

#[tokio::test(start_paused = true)]
async fn test_airdrop_confirms_faucet_signature() {
    let rpc = Arc::new(FakeRpc::confirming(100));
    let pipeline = make_pipeline(&rpc);
    let recipient = Pubkey::new_unique();

    let signature = ops::airdrop::airdrop(&pipeline, rpc.as_ref(), &recipient, 1.0)
        .await
        .unwrap();

    assert_eq!(signature, rpc.airdrop_signature());
    // The faucet assigns the signature; nothing is broadcast locally.
    assert_eq!(rpc.submit_calls.load(Ordering::SeqCst), 0);
    assert!(rpc.status_calls.load(Ordering::SeqCst) >= 1);
}

#[tokio::test(start_paused = true)]
async fn test_create_mint_with_initial_supply() {
    let rpc = Arc::new(FakeRpc::confirming(100));
    let pipeline = make_pipeline(&rpc);
    let wallet = Arc::new(FakeWallet::new());
    let owner = wallet.pubkey();

    let receipt = ops::mint::create_mint(&pipeline, rpc.as_ref(), wallet, 9, 1_000)
        .await
        .unwrap();

    assert_eq!(receipt.ata, get_associated_token_address(&owner, &receipt.mint));
    assert!(receipt.mint_signature.is_some());
    // One submission for the mint account, one for ATA + supply.
    assert_eq!(rpc.submit_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_create_mint_without_supply_submits_once() {
    let rpc = Arc::new(FakeRpc::confirming(100));
    let pipeline = make_pipeline(&rpc);
    let wallet = Arc::new(FakeWallet::new());

    let receipt = ops::mint::create_mint(&pipeline, rpc.as_ref(), wallet, 6, 0)
        .await
        .unwrap();

    assert!(receipt.mint_signature.is_none());
    assert_eq!(rpc.submit_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_mint_tokens_scales_by_decimals() {
    let rpc = Arc::new(FakeRpc::confirming(100));
    let pipeline = make_pipeline(&rpc);
    let wallet = Arc::new(FakeWallet::new());
    let mint = Pubkey::new_unique();

    let receipt = ops::mint::mint_tokens(&pipeline, wallet, mint, 6, 250)
        .await
        .unwrap();

    assert_eq!(receipt.amount, 250_000_000);
    assert_eq!(rpc.submit_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_create_token_with_metadata_submits_three_times() {
    let rpc = Arc::new(FakeRpc::confirming(100));
    let pipeline = make_pipeline(&rpc);
    let wallet = Arc::new(FakeWallet::new());

    let spec = TokenSpec {
        metadata: TokenMetadata {
            name: "Demo Token".to_string(),
            symbol: "DEMO".to_string(),
            uri: "https://example.com/demo.json".to_string(),
        },
        decimals: 9,
        initial_supply: 1_000,
    };

    let receipt = ops::token::create_token_with_metadata(&pipeline, rpc.as_ref(), wallet, spec)
        .await
        .unwrap();

    assert_eq!(receipt.metadata_account, find_metadata_pda(&receipt.mint));
    assert!(receipt.mint_signature.is_some());
    // Mint account, metadata account, ATA + supply.
    assert_eq!(rpc.submit_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_list_tokens_with_and_without_metadata() {
    let named_mint = Pubkey::new_unique();
    let bare_mint = Pubkey::new_unique();
    let owner = Pubkey::new_unique();

    let accounts = vec![
        TokenAccountSummary {
            address: get_associated_token_address(&owner, &named_mint),
            mint: named_mint,
            raw_amount: 1_500_000_000,
            decimals: 9,
        },
        TokenAccountSummary {
            address: get_associated_token_address(&owner, &bare_mint),
            mint: bare_mint,
            raw_amount: 42,
            decimals: 0,
        },
    ];

    let rpc = Arc::new(
        FakeRpc::confirming(100)
            .with_token_accounts(accounts)
            .with_account(
                find_metadata_pda(&named_mint),
                metadata_account_bytes("Demo Token", "DEMO", "https://example.com/demo.json"),
            ),
    );

    let holdings = ops::list::list_tokens(rpc.as_ref(), &owner).await.unwrap();

    assert_eq!(holdings.len(), 2);
    assert_eq!(holdings[0].name, "Demo Token");
    assert_eq!(holdings[0].symbol, "DEMO");
    assert!((holdings[0].ui_amount() - 1.5).abs() < f64::EPSILON);

    assert_eq!(holdings[1].name, "Unknown Token");
    assert_eq!(holdings[1].symbol, "Unknown");
    assert_eq!(holdings[1].uri, None);
}

#[tokio::test(start_paused = true)]
async fn test_balance_report() {
    let rpc = Arc::new(FakeRpc::confirming(100).with_balance(2_500_000_000));
    let address = Pubkey::new_unique();

    let report = ops::balance::balance(rpc.as_ref(), &address).await.unwrap();

    assert_eq!(report.lamports, 2_500_000_000);
    assert!((report.sol() - 2.5).abs() < f64::EPSILON);
}
