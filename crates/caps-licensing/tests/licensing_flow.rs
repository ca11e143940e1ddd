//! End-to-end licensing flow over a shared registry.
//!
//! Five capsules across two owners, a third principal that owns nothing,
//! and a separate administrator. Exercises listings, the full escrow
//! lifecycle, the circuit breaker, and value conservation across the run.

use caps_core::{AccountId, Amount, CapsuleLocator, ContentFingerprint, LocatorDigest};
use caps_licensing::{LedgerEvent, LicenseState, LicensingError, LicensingLedger};
use caps_registry::CapsuleRegistry;

fn account(byte: u8) -> AccountId {
    AccountId::from_bytes([byte; 20])
}

fn fingerprint(byte: u8) -> ContentFingerprint {
    ContentFingerprint::from_content(&[byte])
}

fn locator(byte: u8) -> CapsuleLocator {
    CapsuleLocator::new(LocatorDigest::from_bytes([byte; 32]), 18, 32)
}

/// Registry with capsules 1-3 owned by A and 4-5 owned by B.
fn seeded_registry(owner_a: AccountId, owner_b: AccountId) -> CapsuleRegistry {
    let mut registry = CapsuleRegistry::new();
    for byte in 1..=3u8 {
        registry
            .register_capsule(fingerprint(byte), locator(byte), owner_a)
            .unwrap();
    }
    for byte in 4..=5u8 {
        registry
            .register_capsule(fingerprint(byte), locator(byte), owner_b)
            .unwrap();
    }
    registry
}

#[test]
fn listings_reflect_ownership_in_registration_order() {
    let (a, b, c) = (account(0xA1), account(0xB2), account(0xC3));
    let registry = seeded_registry(a, b);
    let ledger = LicensingLedger::new(account(0xEE));

    // C owns nothing and sees all five, in registration order.
    let for_c = ledger.licensable_capsules(&registry, c);
    assert_eq!(for_c.len(), 5);
    let expected: Vec<_> = (1..=5u8).map(fingerprint).collect();
    let got: Vec<_> = for_c.iter().map(|l| l.fingerprint).collect();
    assert_eq!(got, expected);

    // A sees only B's two capsules, with field-exact locator data.
    let for_a = ledger.licensable_capsules(&registry, a);
    assert_eq!(for_a.len(), 2);
    assert_eq!(for_a[0].fingerprint, fingerprint(4));
    assert_eq!(for_a[0].locator.digest, LocatorDigest::from_bytes([4u8; 32]));
    assert_eq!(for_a[0].locator.hash_function, 18);
    assert_eq!(for_a[0].locator.hash_size, 32);
    assert_eq!(for_a[1].fingerprint, fingerprint(5));
}

#[test]
fn full_lifecycle_approve_refuse_cancel_conserves_value() {
    let (a, b, c) = (account(0xA1), account(0xB2), account(0xC3));
    let registry = seeded_registry(a, b);
    let mut ledger = LicensingLedger::new(account(0xEE));

    // C requests three licenses: one approved, one refused, one cancelled.
    ledger
        .request_license(&registry, fingerprint(1), Amount::new(100), c)
        .unwrap();
    ledger
        .request_license(&registry, fingerprint(2), Amount::new(40), c)
        .unwrap();
    ledger
        .request_license(&registry, fingerprint(4), Amount::new(25), c)
        .unwrap();
    assert_eq!(ledger.escrowed_total(), Amount::new(165));

    let approved = ledger
        .approve_license_request(&registry, fingerprint(1), c, a)
        .unwrap();
    assert_eq!(
        approved,
        LedgerEvent::LicenseApproved {
            fingerprint: fingerprint(1),
            owner: a,
            licensee: c,
        }
    );

    ledger
        .refuse_license_request(&registry, fingerprint(2), c, a)
        .unwrap();
    ledger.cancel_license_request(fingerprint(4), c).unwrap();

    // All escrow resolved; every unit went to exactly one party.
    assert_eq!(ledger.escrowed_total(), Amount::ZERO);
    assert_eq!(ledger.withdrawable(&a), Amount::new(100));
    assert_eq!(ledger.withdrawable(&c), Amount::new(65));
    assert_eq!(ledger.withdrawable(&b), Amount::ZERO);

    assert_eq!(ledger.license_state(&fingerprint(1), &c), LicenseState::Approved);
    assert_eq!(ledger.license_state(&fingerprint(2), &c), LicenseState::Refused);
    assert_eq!(ledger.license_state(&fingerprint(4), &c), LicenseState::Cancelled);

    // The audit log matches operation order.
    let events = ledger.events();
    assert_eq!(events.len(), 6);
    assert!(matches!(events[0], LedgerEvent::LicenseRequested { .. }));
    assert!(matches!(events[3], LedgerEvent::LicenseApproved { .. }));
    assert!(matches!(events[4], LedgerEvent::LicenseRefused { .. }));
    assert!(matches!(events[5], LedgerEvent::LicenseCancelled { .. }));
}

#[test]
fn circuit_breaker_gates_mutations_but_not_reads() {
    let (a, b, c) = (account(0xA1), account(0xB2), account(0xC3));
    let admin = account(0xEE);
    let registry = seeded_registry(a, b);
    let mut ledger = LicensingLedger::new(admin);

    ledger
        .request_license(&registry, fingerprint(1), Amount::new(100), c)
        .unwrap();
    ledger.stop(admin).unwrap();

    // Mutations fail uniformly while halted.
    assert!(matches!(
        ledger
            .request_license(&registry, fingerprint(2), Amount::new(10), c)
            .unwrap_err(),
        LicensingError::ContractHalted
    ));
    assert!(matches!(
        ledger
            .approve_license_request(&registry, fingerprint(1), c, a)
            .unwrap_err(),
        LicensingError::ContractHalted
    ));

    // Reads stay open.
    assert_eq!(ledger.licensable_capsules(&registry, c).len(), 5);
    assert_eq!(ledger.license_state(&fingerprint(1), &c), LicenseState::Requested);
    assert_eq!(ledger.escrowed_total(), Amount::new(100));

    // After resume the pending request resolves normally.
    ledger.resume(admin).unwrap();
    ledger
        .approve_license_request(&registry, fingerprint(1), c, a)
        .unwrap();
    assert_eq!(ledger.withdrawable(&a), Amount::new(100));
}

#[test]
fn registrations_after_ledger_creation_are_visible() {
    let (a, c) = (account(0xA1), account(0xC3));
    let mut registry = CapsuleRegistry::new();
    let mut ledger = LicensingLedger::new(account(0xEE));

    // The ledger reads the directory live; a capsule registered after the
    // ledger exists is immediately licensable.
    assert!(ledger.licensable_capsules(&registry, c).is_empty());
    registry
        .register_capsule(fingerprint(9), locator(9), a)
        .unwrap();
    assert_eq!(ledger.licensable_capsules(&registry, c).len(), 1);

    ledger
        .request_license(&registry, fingerprint(9), Amount::new(1), c)
        .unwrap();
    assert_eq!(ledger.license_state(&fingerprint(9), &c), LicenseState::Requested);
}
