use std::time::Duration;

use chrono::NaiveDate;
use engine::{
    Direction, Ledger, ManualScheduler, Money, PasscodeError, ProcessingStage, ScanStatus,
    SimulatedVerifier, TransferFailure, TransferKind, TransferWizard, WizardState, WizardTimer,
};

fn scheduler() -> ManualScheduler<WizardTimer> {
    ManualScheduler::new(NaiveDate::from_ymd_opt(2026, 10, 14).unwrap())
}

fn wizard(ledger: &Ledger, two_factor: bool) -> TransferWizard {
    TransferWizard::new(ledger, Box::new(SimulatedVerifier), two_factor)
}

/// Delivers every timer due in the next `ms` milliseconds.
fn run_for(
    wizard: &mut TransferWizard,
    ledger: &mut Ledger,
    scheduler: &mut ManualScheduler<WizardTimer>,
    ms: u64,
) {
    scheduler.advance(Duration::from_millis(ms), |timer, scheduler| {
        wizard.on_timer(timer, ledger, scheduler).unwrap();
    });
}

/// Fills the form, submits it and waits until the passcode is requested.
fn reach_passcode(
    wizard: &mut TransferWizard,
    ledger: &mut Ledger,
    scheduler: &mut ManualScheduler<WizardTimer>,
    from: &str,
    amount: &str,
) {
    let form = wizard.form_mut().unwrap();
    form.from_account_id = from.to_string();
    form.amount = amount.to_string();
    assert!(wizard.can_submit());
    wizard.submit(ledger, scheduler).unwrap();

    run_for(wizard, ledger, scheduler, 1000);
    assert_eq!(
        wizard.state(),
        &WizardState::BiometricCheck {
            scan: ScanStatus::Scanning
        }
    );
    run_for(wizard, ledger, scheduler, 2500);
    assert_eq!(
        wizard.state(),
        &WizardState::BiometricCheck {
            scan: ScanStatus::Verified
        }
    );
    run_for(wizard, ledger, scheduler, 1500);
    assert!(wizard.passcode().is_some());
}

fn revealed(wizard: &TransferWizard) -> Vec<ProcessingStage> {
    match wizard.state() {
        WizardState::Processing { revealed, .. } => revealed.clone(),
        other => panic!("not processing: {other:?}"),
    }
}

#[test]
fn ach_transfer_debits_checking_and_records_the_transaction() {
    let mut ledger = Ledger::seeded();
    let mut scheduler = scheduler();
    let mut wizard = wizard(&ledger, true);
    assert_eq!(wizard.form().kind, TransferKind::Ach);

    reach_passcode(&mut wizard, &mut ledger, &mut scheduler, "acc_1", "500000");
    assert!(wizard.paste_passcode("123456"));
    let outcome = wizard.confirm_passcode(&mut scheduler).unwrap();
    assert!(!outcome.provisioning_requested);

    run_for(&mut wizard, &mut ledger, &mut scheduler, 800);
    assert_eq!(revealed(&wizard), [ProcessingStage::Sending]);
    run_for(&mut wizard, &mut ledger, &mut scheduler, 1000 + 1000 + 1000);
    assert_eq!(revealed(&wizard).len(), 4);
    assert_eq!(ledger.transactions().len(), 8);

    run_for(&mut wizard, &mut ledger, &mut scheduler, 800);
    assert_eq!(revealed(&wizard).last(), Some(&ProcessingStage::Approved));
    assert_eq!(
        ledger.account("acc_1").unwrap().balance,
        Money::dollars(8_000_000)
    );
    let first = &ledger.transactions()[0];
    assert_eq!(first.amount, Money::dollars(500_000));
    assert_eq!(first.direction, Direction::Debit);
    assert_eq!(first.category, "Transfer");
    assert_eq!(first.description, "Transfer to External Linked");
    assert_eq!(first.date, "Oct 14");

    run_for(&mut wizard, &mut ledger, &mut scheduler, 1199);
    assert!(matches!(wizard.state(), WizardState::Processing { .. }));
    run_for(&mut wizard, &mut ledger, &mut scheduler, 1);
    let WizardState::Success(receipt) = wizard.state() else {
        panic!("expected success, got {:?}", wizard.state());
    };
    assert_eq!(receipt.amount, Money::dollars(500_000));
    assert_eq!(receipt.kind, TransferKind::Ach);
    assert_eq!(receipt.transaction_id, ledger.transactions()[0].id);
    let number: u32 = receipt.reference.strip_prefix("#TRX-").unwrap().parse().unwrap();
    assert!(number < 10_000);

    assert_eq!(ledger.transactions().len(), 9);
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn credit_account_cannot_send_fifty_dollars() {
    let mut ledger = Ledger::seeded();
    let mut scheduler = scheduler();
    let mut wizard = wizard(&ledger, true);

    let before = ledger.transactions().to_vec();

    reach_passcode(&mut wizard, &mut ledger, &mut scheduler, "acc_3", "50");
    wizard.paste_passcode("000000");
    wizard.confirm_passcode(&mut scheduler).unwrap();

    run_for(&mut wizard, &mut ledger, &mut scheduler, 1800);
    assert_eq!(
        revealed(&wizard),
        [ProcessingStage::Sending, ProcessingStage::SystemVerification]
    );
    run_for(&mut wizard, &mut ledger, &mut scheduler, 999);
    assert!(matches!(
        wizard.state(),
        WizardState::Processing { failure: None, .. }
    ));
    run_for(&mut wizard, &mut ledger, &mut scheduler, 1);
    assert_eq!(
        wizard.state(),
        &WizardState::Processing {
            revealed: vec![ProcessingStage::Sending, ProcessingStage::SystemVerification],
            failure: Some(TransferFailure::LowBalance),
        }
    );

    assert_eq!(scheduler.pending(), 0);

    run_for(&mut wizard, &mut ledger, &mut scheduler, 10_000);
    assert_eq!(scheduler.pending(), 0);
    assert!(matches!(
        wizard.state(),
        WizardState::Processing {
            failure: Some(TransferFailure::LowBalance),
            ..
        }
    ));
    assert_eq!(ledger.account("acc_3").unwrap().balance, Money::new(-424_050));
    assert_eq!(ledger.transactions(), before.as_slice());

    wizard.restart().unwrap();
    assert_eq!(wizard.state(), &WizardState::FormEntry { submitting: false });
    assert_eq!(wizard.form().amount, "50");
    assert_eq!(wizard.form().from_account_id, "acc_3");
}

#[test]
fn amount_equal_to_balance_is_allowed() {
    let mut ledger = Ledger::seeded();
    let mut scheduler = scheduler();
    let mut wizard = wizard(&ledger, true);

    reach_passcode(&mut wizard, &mut ledger, &mut scheduler, "acc_1", "8500000");
    wizard.paste_passcode("111111");
    wizard.confirm_passcode(&mut scheduler).unwrap();
    run_for(&mut wizard, &mut ledger, &mut scheduler, 10_000);

    assert!(matches!(wizard.state(), WizardState::Success(_)));
    assert_eq!(ledger.account("acc_1").unwrap().balance, Money::ZERO);
}

#[test]
fn incomplete_passcode_never_advances() {
    let mut ledger = Ledger::seeded();
    let mut scheduler = scheduler();
    let mut wizard = wizard(&ledger, true);

    reach_passcode(&mut wizard, &mut ledger, &mut scheduler, "acc_1", "10");
    for ch in "12345".chars() {
        assert!(wizard.type_digit(ch));
    }
    assert_eq!(
        wizard.confirm_passcode(&mut scheduler).unwrap_err(),
        PasscodeError::Incomplete
    );
    run_for(&mut wizard, &mut ledger, &mut scheduler, 60_000);
    let WizardState::PasscodeChallenge { error, .. } = wizard.state() else {
        panic!("left the passcode challenge");
    };
    assert_eq!(error, &Some(PasscodeError::Incomplete));
    assert_eq!(scheduler.pending(), 0);

    assert!(wizard.type_digit('6'));
    let WizardState::PasscodeChallenge { error, .. } = wizard.state() else {
        panic!("left the passcode challenge");
    };
    assert_eq!(error, &None);
    assert!(wizard.confirm_passcode(&mut scheduler).is_ok());
}

#[test]
fn first_confirmation_requests_provisioning() {
    let mut ledger = Ledger::seeded();
    let mut scheduler = scheduler();
    let mut wizard = wizard(&ledger, false);

    reach_passcode(&mut wizard, &mut ledger, &mut scheduler, "acc_1", "10");
    let WizardState::PasscodeChallenge { provisioning, .. } = wizard.state() else {
        panic!("expected passcode challenge");
    };
    assert_eq!(
        provisioning.as_ref().map(|s| s.grouped()),
        Some("JBSW Y3DP EHPK 3PXP".to_string())
    );

    wizard.paste_passcode("654321");
    let outcome = wizard.confirm_passcode(&mut scheduler).unwrap();
    assert!(outcome.provisioning_requested);
    assert_eq!(outcome.secret.as_str(), "JBSWY3DPEHPK3PXP");
    assert_eq!(outcome.passcode.to_string(), "654321");
}

#[test]
fn timers_from_a_restarted_attempt_are_ignored() {
    let mut ledger = Ledger::seeded();
    let mut scheduler = scheduler();
    let mut wizard = wizard(&ledger, true);

    reach_passcode(&mut wizard, &mut ledger, &mut scheduler, "acc_3", "50");
    wizard.paste_passcode("123456");
    wizard.confirm_passcode(&mut scheduler).unwrap();
    run_for(&mut wizard, &mut ledger, &mut scheduler, 2800);
    wizard.restart().unwrap();

    // A stale stage timer of the old attempt must not move the new one.
    let stale = WizardTimer {
        attempt: wizard.attempt() - 1,
        kind: engine::TimerKind::Reveal(ProcessingStage::Approved),
    };
    wizard.on_timer(stale, &mut ledger, &mut scheduler).unwrap();
    assert_eq!(wizard.state(), &WizardState::FormEntry { submitting: false });
    assert_eq!(ledger.transactions().len(), 8);

    // The retry from a funded account goes through with exactly one debit.
    let form = wizard.form_mut().unwrap();
    form.from_account_id = "acc_2".to_string();
    wizard.submit(&ledger, &mut scheduler).unwrap();
    run_for(&mut wizard, &mut ledger, &mut scheduler, 5000);
    wizard.paste_passcode("123456");
    wizard.confirm_passcode(&mut scheduler).unwrap();
    run_for(&mut wizard, &mut ledger, &mut scheduler, 10_000);

    assert!(matches!(wizard.state(), WizardState::Success(_)));
    assert_eq!(ledger.transactions().len(), 9);
    assert_eq!(
        ledger.account("acc_2").unwrap().balance,
        Money::dollars(387_587_677) - Money::dollars(50)
    );
}

#[test]
fn internal_transfer_uses_internal_category() {
    let mut ledger = Ledger::seeded();
    let mut scheduler = scheduler();
    let mut wizard = wizard(&ledger, true);
    wizard.select_kind(TransferKind::Internal).unwrap();

    reach_passcode(&mut wizard, &mut ledger, &mut scheduler, "acc_2", "1000");
    wizard.paste_passcode("123456");
    wizard.confirm_passcode(&mut scheduler).unwrap();
    run_for(&mut wizard, &mut ledger, &mut scheduler, 10_000);

    let first = &ledger.transactions()[0];
    assert_eq!(first.category, "Internal Transfer");
    assert_eq!(first.description, "Transfer to Recipient");
    assert_eq!(first.account_id.as_deref(), Some("acc_2"));
}

#[test]
fn accepted_scan_always_reaches_the_passcode_challenge() {
    for kind in [TransferKind::Ach, TransferKind::Internal] {
        let mut ledger = Ledger::seeded();
        let mut scheduler = scheduler();
        let mut wizard = wizard(&ledger, true);
        wizard.select_kind(kind).unwrap();

        reach_passcode(&mut wizard, &mut ledger, &mut scheduler, "acc_2", "25");
        assert_eq!(scheduler.elapsed(), Duration::from_millis(5000));
        assert_eq!(scheduler.pending(), 0);
        let WizardState::PasscodeChallenge {
            passcode, error, ..
        } = wizard.state()
        else {
            panic!("expected passcode challenge, got {:?}", wizard.state());
        };
        assert!(!passcode.is_complete());
        assert_eq!(error, &None);
        assert_eq!(ledger.transactions().len(), 8);
    }
}
