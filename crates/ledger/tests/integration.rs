//! Integration tests for ledger + gate + oracle flow

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;

use idtoken_bus::TokenEvent;
use idtoken_core::{Address, Amount};
use idtoken_gate::{OffenderReporting, RejectReason};
use idtoken_ledger::{LedgerBuilder, TokenConfig, TokenError, TokenLedger};
use idtoken_oracle::{IdentityId, MockIdentityRegistry, MockResponse};

fn amount(value: u128) -> Amount {
    Amount::new(value)
}

fn ledger_with(registry: &Arc<MockIdentityRegistry>, allowlisted: &[Address]) -> TokenLedger {
    let mut config = TokenConfig::default();
    config.oracle.timeout_ms = 50;
    config.allowlist = allowlisted.to_vec();
    LedgerBuilder::new()
        .with_config(config)
        .with_registry(registry.clone())
        .build()
}

#[tokio::test]
async fn test_end_to_end_scenario() -> anyhow::Result<()> {
    let registry = Arc::new(MockIdentityRegistry::new());
    let a = Address::from_label("A");
    let b = Address::from_label("B");
    let c = Address::from_label("C");
    let d = Address::from_label("D");
    registry.link(d, IdentityId::from_u64(4));

    let mut ledger = ledger_with(&registry, &[a]);
    assert_eq!(ledger.total_supply(), Amount::ZERO);

    // Mint to allowlisted A
    ledger.mint(a, amount(1000)).await?;
    assert_eq!(ledger.balance_of(&a), amount(1000));
    assert_eq!(ledger.total_supply(), amount(1000));

    // B is neither allowlisted nor linked
    let result = ledger.transfer(a, b, amount(400)).await;
    assert_eq!(
        result,
        Err(TokenError::InvalidTransfer {
            reason: RejectReason::DestinationNotEligible,
            account: b,
        })
    );
    assert_eq!(ledger.balance_of(&a), amount(1000));

    // Allowlist B and retry
    ledger.set_allowlist(b, true)?;
    ledger.transfer(a, b, amount(400)).await?;
    assert_eq!(ledger.balance_of(&a), amount(600));
    assert_eq!(ledger.balance_of(&b), amount(400));

    // B approves C, C moves B's tokens to identity-linked D
    ledger.approve(b, c, amount(100))?;
    ledger.transfer_from(c, b, d, amount(100)).await?;
    assert_eq!(ledger.allowance(&b, &c), Amount::ZERO);
    assert_eq!(ledger.balance_of(&b), amount(300));
    assert_eq!(ledger.balance_of(&d), amount(100));

    assert!(ledger.is_conserved());
    Ok(())
}

#[tokio::test]
async fn test_conservation_over_random_operations() {
    let registry = Arc::new(MockIdentityRegistry::new());
    let accounts: Vec<Address> = (0..6)
        .map(|i| Address::from_label(&format!("holder-{i}")))
        .collect();

    // Half allowlisted, one linked, the rest ineligible
    registry.link(accounts[3], IdentityId::from_u64(3));
    let mut ledger = ledger_with(&registry, &accounts[..3]);

    let mut rng = StdRng::seed_from_u64(0x1d70_c3e5);
    let mut rejected = 0usize;

    for _ in 0..500 {
        let from = accounts[rng.gen_range(0..accounts.len())];
        let to = accounts[rng.gen_range(0..accounts.len())];
        let value = amount(rng.gen_range(0..300));

        let result = match rng.gen_range(0..4) {
            0 => ledger.mint(to, value).await,
            1 => ledger.burn(from, value).await,
            _ => ledger.transfer(from, to, value).await,
        };
        if result.is_err() {
            rejected += 1;
        }

        let sum: u128 = accounts.iter().map(|a| ledger.balance_of(a).value()).sum();
        assert_eq!(sum, ledger.total_supply().value());
        assert!(ledger.is_conserved());
    }

    // The sequence must exercise both outcomes
    assert!(rejected > 0);
    assert!(ledger.total_supply() > Amount::ZERO);
}

#[tokio::test]
async fn test_insufficient_balance_leaves_no_trace() {
    let registry = Arc::new(MockIdentityRegistry::new());
    let alice = Address::from_label("alice");
    let bob = Address::from_label("bob");
    let mut ledger = ledger_with(&registry, &[alice, bob]);

    ledger.mint(alice, amount(50)).await.unwrap();
    let mut rx = ledger.subscribe();

    let result = ledger.transfer(alice, bob, amount(51)).await;
    assert_eq!(
        result,
        Err(TokenError::InsufficientBalance {
            sender: alice,
            balance: amount(50),
            needed: amount(51),
        })
    );
    assert_eq!(ledger.balance_of(&alice), amount(50));
    assert_eq!(ledger.balance_of(&bob), Amount::ZERO);
    assert!(rx.try_recv().is_err());

    let result = ledger.burn(alice, amount(51)).await;
    assert!(matches!(result, Err(TokenError::InsufficientBalance { .. })));
    assert_eq!(ledger.total_supply(), amount(50));
}

#[tokio::test]
async fn test_allowlisted_accounts_ignore_oracle_state() {
    let registry = Arc::new(MockIdentityRegistry::new());
    let alice = Address::from_label("alice");
    let bob = Address::from_label("bob");
    let mut ledger = ledger_with(&registry, &[alice, bob]);
    ledger.mint(alice, amount(100)).await.unwrap();

    registry.set_offline(true);
    ledger.transfer(alice, bob, amount(10)).await.unwrap();

    registry.set_offline(false);
    registry.respond(bob, MockResponse::Panic);
    ledger.transfer(alice, bob, amount(10)).await.unwrap();

    registry.respond(alice, MockResponse::Hang);
    ledger.transfer(bob, alice, amount(5)).await.unwrap();

    assert_eq!(ledger.balance_of(&alice), amount(85));
    assert_eq!(ledger.balance_of(&bob), amount(15));
    assert_eq!(registry.call_count(), 0);
}

#[tokio::test]
async fn test_every_oracle_fault_is_contained() {
    let registry = Arc::new(MockIdentityRegistry::new());
    let alice = Address::from_label("alice");
    let mut ledger = ledger_with(&registry, &[alice]);
    ledger.mint(alice, amount(100)).await.unwrap();

    let faults = [
        MockResponse::Revert("execution reverted".into()),
        MockResponse::Raw(vec![0x01; 31]),
        MockResponse::Raw(Vec::new()),
        MockResponse::Panic,
        MockResponse::Hang,
        MockResponse::Identity(IdentityId::NONE),
    ];

    for (i, fault) in faults.into_iter().enumerate() {
        let target = Address::from_label(&format!("faulty-{i}"));
        registry.respond(target, fault);

        assert!(!ledger.is_identity_linked(target).await);
        let result = ledger.transfer(alice, target, amount(1)).await;
        assert_eq!(
            result,
            Err(TokenError::InvalidTransfer {
                reason: RejectReason::DestinationNotEligible,
                account: target,
            })
        );
    }

    registry.set_offline(true);
    let offline_target = Address::from_label("offline");
    assert!(ledger.transfer(alice, offline_target, amount(1)).await.is_err());

    assert_eq!(ledger.balance_of(&alice), amount(100));
    assert!(ledger.is_conserved());
}

#[tokio::test]
async fn test_unlinked_source_is_rejected() {
    let registry = Arc::new(MockIdentityRegistry::new());
    let alice = Address::from_label("alice");
    let bob = Address::from_label("bob");
    registry.link(alice, IdentityId::from_u64(1));
    let mut ledger = ledger_with(&registry, &[bob]);

    ledger.mint(alice, amount(20)).await.unwrap();
    registry.unlink(&alice);

    // Identity is re-evaluated on every operation
    let result = ledger.transfer(alice, bob, amount(5)).await;
    assert_eq!(
        result,
        Err(TokenError::InvalidTransfer {
            reason: RejectReason::SourceNotEligible,
            account: alice,
        })
    );

    // Burning also needs an eligible source
    assert!(ledger.burn(alice, amount(5)).await.is_err());
}

#[tokio::test]
async fn test_legacy_offender_reporting() {
    let registry = Arc::new(MockIdentityRegistry::new());
    let alice = Address::from_label("alice");
    let bob = Address::from_label("bob");

    let mut config = TokenConfig::default();
    config.allowlist = vec![alice];
    config.gate.offender_reporting = OffenderReporting::Sender;
    let mut ledger = LedgerBuilder::new()
        .with_config(config)
        .with_registry(registry.clone())
        .build();

    ledger.mint(alice, amount(10)).await.unwrap();
    let result = ledger.transfer(alice, bob, amount(1)).await;
    assert_eq!(
        result,
        Err(TokenError::InvalidTransfer {
            reason: RejectReason::DestinationNotEligible,
            account: alice,
        })
    );
}

#[tokio::test]
async fn test_unlimited_allowance_never_decrements() {
    let registry = Arc::new(MockIdentityRegistry::new());
    let owner = Address::from_label("owner");
    let spender = Address::from_label("spender");
    let sink = Address::from_label("sink");
    registry.link(sink, IdentityId::from_u64(99));
    let mut ledger = ledger_with(&registry, &[owner]);

    ledger.mint(owner, amount(1_000)).await.unwrap();
    ledger.approve(owner, spender, Amount::MAX).unwrap();

    for _ in 0..10 {
        ledger
            .transfer_from(spender, owner, sink, amount(100))
            .await
            .unwrap();
        assert_eq!(ledger.allowance(&owner, &spender), Amount::MAX);
    }

    assert_eq!(ledger.balance_of(&owner), Amount::ZERO);
    assert_eq!(ledger.balance_of(&sink), amount(1_000));

    // Balance, not allowance, is now the limit
    let result = ledger.transfer_from(spender, owner, sink, amount(1)).await;
    assert!(matches!(result, Err(TokenError::InsufficientBalance { .. })));
    assert_eq!(ledger.allowance(&owner, &spender), Amount::MAX);
}

#[tokio::test]
async fn test_null_account_invariants() {
    let registry = Arc::new(MockIdentityRegistry::new());
    let alice = Address::from_label("alice");
    let mut ledger = ledger_with(&registry, &[alice]);
    ledger.mint(alice, amount(10)).await.unwrap();

    assert!(ledger.is_allowlisted(&Address::ZERO));
    assert!(ledger.set_allowlist(Address::ZERO, false).is_err());
    assert!(ledger.is_allowlisted(&Address::ZERO));

    assert_eq!(
        ledger.transfer(alice, Address::ZERO, amount(1)).await,
        Err(TokenError::InvalidReceiver(Address::ZERO))
    );
    assert_eq!(
        ledger.transfer(Address::ZERO, alice, amount(1)).await,
        Err(TokenError::InvalidSender(Address::ZERO))
    );

    ledger.approve(alice, alice, amount(5)).unwrap();
    assert_eq!(
        ledger.transfer_from(alice, alice, Address::ZERO, amount(1)).await,
        Err(TokenError::InvalidReceiver(Address::ZERO))
    );
    assert_eq!(ledger.allowance(&alice, &alice), amount(5));

    assert_eq!(ledger.balance_of(&Address::ZERO), Amount::ZERO);
    assert_eq!(ledger.total_supply(), amount(10));
}

#[tokio::test]
async fn test_events_follow_operations() {
    let registry = Arc::new(MockIdentityRegistry::new());
    let alice = Address::from_label("alice");
    let bob = Address::from_label("bob");
    let mut ledger = ledger_with(&registry, &[alice, bob]);
    let mut rx = ledger.subscribe();

    ledger.mint(alice, amount(10)).await.unwrap();
    ledger.transfer(alice, bob, amount(4)).await.unwrap();
    ledger.approve(bob, alice, amount(2)).unwrap();
    ledger.burn(bob, amount(1)).await.unwrap();

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }

    assert_eq!(events.len(), 4);
    assert!(events[0].is_mint());
    assert!(matches!(
        events[1],
        TokenEvent::Transfer { from, to, .. } if from == alice && to == bob
    ));
    assert_eq!(events[2].kind(), "Approval");
    assert!(events[3].is_burn());
}

#[tokio::test]
async fn test_shared_ledger_serializes_operations() {
    let registry = Arc::new(MockIdentityRegistry::new());
    let treasury = Address::from_label("treasury");
    let recipients: Vec<Address> = (0..8)
        .map(|i| Address::from_label(&format!("recipient-{i}")))
        .collect();
    for (i, r) in recipients.iter().enumerate() {
        registry.link(*r, IdentityId::from_u64(i as u64 + 1));
    }

    let ledger = Arc::new(Mutex::new(ledger_with(&registry, &[treasury])));
    ledger.lock().await.mint(treasury, amount(800)).await.unwrap();

    let mut handles = Vec::new();
    for recipient in recipients.clone() {
        let ledger = Arc::clone(&ledger);
        handles.push(tokio::spawn(async move {
            let mut ledger = ledger.lock().await;
            ledger.transfer(treasury, recipient, amount(100)).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let ledger = ledger.lock().await;
    assert_eq!(ledger.balance_of(&treasury), Amount::ZERO);
    for r in &recipients {
        assert_eq!(ledger.balance_of(r), amount(100));
    }
    assert!(ledger.is_conserved());
}
