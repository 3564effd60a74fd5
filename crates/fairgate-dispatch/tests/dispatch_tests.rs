// SPDX-FileCopyrightText: 2026 Fairgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the batch dispatcher's ordering, isolation,
//! completeness, and timeout guarantees.

use std::sync::Arc;
use std::time::Duration;

use fairgate_core::{
    Attendee, DeliveryStatus, EventContext, FairgateError, MessageTemplate, OutboundChannel,
};
use fairgate_credential::CredentialEncoder;
use fairgate_dispatch::BatchDispatcher;
use fairgate_test_utils::MockChannel;

fn attendee(n: usize) -> Attendee {
    Attendee {
        id: format!("v-{n}"),
        name: format!("Attendee {n}"),
        email: format!("attendee{n}@x.com"),
        booth_id: "b-7".into(),
    }
}

fn attendees(count: usize) -> Vec<Attendee> {
    (0..count).map(attendee).collect()
}

fn context() -> EventContext {
    EventContext {
        booth_name: "B1".into(),
        bazaar_name: "Spring Fair".into(),
        check_in_base_url: "https://fair.example/checkin".into(),
        vendor_email: Some("vendor@x.com".into()),
    }
}

fn dispatcher(channel: Arc<MockChannel>) -> BatchDispatcher {
    BatchDispatcher::new(
        channel as Arc<dyn OutboundChannel>,
        CredentialEncoder::new(),
        Duration::from_secs(5),
    )
}

/// Report entries appear in input order, including interleaved failures.
#[tokio::test]
async fn report_preserves_input_order() {
    let channel = Arc::new(MockChannel::new());
    channel.fail_recipient("attendee1@x.com").await;
    channel.fail_recipient("attendee3@x.com").await;

    let report = dispatcher(channel)
        .dispatch(&attendees(5), &context(), MessageTemplate::CheckInCredential)
        .await
        .unwrap();

    let order: Vec<&str> = report
        .outcomes()
        .iter()
        .map(|o| o.attendee.as_str())
        .collect();
    assert_eq!(
        order,
        vec![
            "attendee0@x.com",
            "attendee1@x.com",
            "attendee2@x.com",
            "attendee3@x.com",
            "attendee4@x.com",
        ]
    );
}

/// Exactly N outcomes come back even when every send fails.
#[tokio::test]
async fn all_failures_still_yield_complete_report() {
    let channel = Arc::new(MockChannel::new());
    for n in 0..4 {
        channel.fail_recipient(format!("attendee{n}@x.com")).await;
    }

    let report = dispatcher(channel)
        .dispatch(&attendees(4), &context(), MessageTemplate::QuizOnly)
        .await
        .unwrap();

    assert_eq!(report.len(), 4);
    assert_eq!(report.failed_count(), 4);
}

/// A single attendee against a failing channel produces one Failed
/// outcome carrying the delivery error, not a bare error.
#[tokio::test]
async fn single_attendee_forced_failure_scenario() {
    let channel = Arc::new(MockChannel::new());
    channel.fail_recipient("attendee0@x.com").await;

    let report = dispatcher(channel)
        .dispatch(&attendees(1), &context(), MessageTemplate::CheckInCredential)
        .await
        .unwrap();

    assert_eq!(report.len(), 1);
    let outcome = &report.outcomes()[0];
    assert_eq!(outcome.attendee, "attendee0@x.com");
    match &outcome.status {
        DeliveryStatus::Failed { error } => {
            assert!(error.contains("attendee0@x.com"), "error detail: {error}");
        }
        other => panic!("expected Failed, got {other:?}"),
    }
}

/// An unauthenticatable channel aborts the batch instead of producing
/// five hundred identical failures.
#[tokio::test]
async fn channel_unavailable_is_batch_fatal() {
    let channel = Arc::new(MockChannel::with_failed_acquire("invalid_grant"));

    let err = dispatcher(channel)
        .dispatch(&attendees(3), &context(), MessageTemplate::QuizOnly)
        .await
        .unwrap_err();

    assert!(matches!(err, FairgateError::ChannelUnavailable { .. }));
}

/// A stalled recipient is cut off by the per-send timeout and recorded
/// Failed; the batch continues.
#[tokio::test]
async fn stalled_recipient_times_out_without_stalling_batch() {
    let channel = Arc::new(MockChannel::new());
    channel
        .stall_recipient("attendee1@x.com", Duration::from_secs(60))
        .await;

    let dispatcher = BatchDispatcher::new(
        channel.clone() as Arc<dyn OutboundChannel>,
        CredentialEncoder::new(),
        Duration::from_millis(100),
    );
    let report = dispatcher
        .dispatch(&attendees(3), &context(), MessageTemplate::QuizOnly)
        .await
        .unwrap();

    assert_eq!(report.len(), 3);
    assert_eq!(report.failed_count(), 1);
    match &report.outcomes()[1].status {
        DeliveryStatus::Failed { error } => assert!(error.contains("timed out")),
        other => panic!("expected timeout failure, got {other:?}"),
    }
    assert_eq!(channel.sent_count().await, 2);
}

/// Empty batch with a per-attendee template is a valid no-op.
#[tokio::test]
async fn empty_batch_yields_empty_report() {
    let channel = Arc::new(MockChannel::new());
    let report = dispatcher(channel)
        .dispatch(&[], &context(), MessageTemplate::CheckInCredential)
        .await
        .unwrap();
    assert!(report.is_empty());
}

/// Empty batch with VendorRollup fails fast rather than sending an empty
/// roll-up or silently skipping.
#[tokio::test]
async fn empty_vendor_rollup_is_missing_field() {
    let channel = Arc::new(MockChannel::new());
    let err = dispatcher(channel)
        .dispatch(&[], &context(), MessageTemplate::VendorRollup)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        FairgateError::MissingField { ref field, .. } if field == "attendees"
    ));
}

/// A vendor roll-up sends one message but reports one outcome per attendee.
#[tokio::test]
async fn vendor_rollup_sends_once_reports_per_attendee() {
    let channel = Arc::new(MockChannel::new());
    let report = dispatcher(channel.clone())
        .dispatch(&attendees(4), &context(), MessageTemplate::VendorRollup)
        .await
        .unwrap();

    assert_eq!(report.len(), 4);
    assert_eq!(report.sent_count(), 4);
    assert_eq!(channel.sent_count().await, 1);

    let sent = channel.sent_messages().await;
    assert_eq!(sent[0].recipient, "vendor@x.com");
    for n in 0..4 {
        assert!(sent[0].html_body.contains(&format!("attendee{n}@x.com")));
    }
}

/// A failed roll-up send marks every included attendee Failed.
#[tokio::test]
async fn vendor_rollup_failure_marks_all_attendees() {
    let channel = Arc::new(MockChannel::new());
    channel.fail_recipient("vendor@x.com").await;

    let report = dispatcher(channel)
        .dispatch(&attendees(3), &context(), MessageTemplate::VendorRollup)
        .await
        .unwrap();

    assert_eq!(report.len(), 3);
    assert_eq!(report.failed_count(), 3);
}

/// Roll-up without a vendor address is a batch-level missing field.
#[tokio::test]
async fn vendor_rollup_without_vendor_email_fails_fast() {
    let channel = Arc::new(MockChannel::new());
    let mut ctx = context();
    ctx.vendor_email = None;

    let err = dispatcher(channel)
        .dispatch(&attendees(2), &ctx, MessageTemplate::VendorRollup)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        FairgateError::MissingField { ref field, .. } if field == "vendor_email"
    ));
}

/// N concurrent dispatches sharing one channel acquire it exactly once.
#[tokio::test]
async fn concurrent_dispatches_share_one_acquisition() {
    let channel = Arc::new(MockChannel::new());
    let dispatcher = Arc::new(dispatcher(channel.clone()));

    let mut tasks = Vec::new();
    for _ in 0..6 {
        let dispatcher = dispatcher.clone();
        tasks.push(tokio::spawn(async move {
            dispatcher
                .dispatch(&attendees(3), &context(), MessageTemplate::QuizOnly)
                .await
        }));
    }
    for task in tasks {
        let report = task.await.unwrap().unwrap();
        assert_eq!(report.sent_count(), 3);
    }

    assert_eq!(channel.acquire_count(), 1);
    assert_eq!(channel.sent_count().await, 18);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// One poisoned entry at any position fails alone; everyone else
        /// is Sent, and order is preserved.
        #[test]
        fn poisoned_entry_is_isolated(count in 1usize..12, seed in any::<usize>()) {
            let poison = seed % count;
            let runtime = tokio::runtime::Runtime::new().unwrap();
            runtime.block_on(async move {
                let channel = Arc::new(MockChannel::new());
                channel
                    .fail_recipient(format!("attendee{poison}@x.com"))
                    .await;

                let report = dispatcher(channel)
                    .dispatch(
                        &attendees(count),
                        &context(),
                        MessageTemplate::CheckInCredential,
                    )
                    .await
                    .unwrap();

                prop_assert_eq!(report.len(), count);
                prop_assert_eq!(report.failed_count(), 1);
                for (n, outcome) in report.outcomes().iter().enumerate() {
                    prop_assert_eq!(
                        outcome.attendee.clone(),
                        format!("attendee{}@x.com", n)
                    );
                    prop_assert_eq!(outcome.is_sent(), n != poison);
                }
                Ok(())
            })?;
        }

        /// The report length always equals the input length.
        #[test]
        fn report_is_always_complete(count in 0usize..16) {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            runtime.block_on(async move {
                let channel = Arc::new(MockChannel::new());
                let report = dispatcher(channel)
                    .dispatch(&attendees(count), &context(), MessageTemplate::QuizOnly)
                    .await
                    .unwrap();
                prop_assert_eq!(report.len(), count);
                Ok(())
            })?;
        }
    }
}
