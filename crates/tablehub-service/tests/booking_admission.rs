//! Admission controller behavior over the in-memory store, including the
//! concurrent admission stress test.

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::prelude::*;
use rust_decimal::Decimal;

use common::*;
use tablehub_core::error::ErrorKind;
use tablehub_database::ReservationStore;
use tablehub_entity::booking::BookingStatus;
use tablehub_service::booking::BookingUpdate;

#[tokio::test]
async fn successful_admission_produces_pending_booking() {
    let h = harness();
    let branch = branch();
    let table = table(branch.id, "T1", 1, 4);
    h.store.add_branch(branch.clone()).await;
    h.store.add_table(table.clone()).await;

    let confirmation = h
        .bookings
        .create_booking(&request(branch.id, table.id, time(19, 0)))
        .await
        .unwrap();
    let booking = &confirmation.booking;

    assert_eq!(booking.status, BookingStatus::Pending);
    assert!(booking.booking_reference.starts_with("BR"));
    assert_eq!(booking.booking_reference.len(), 20);
    assert_eq!(booking.duration_minutes, 90);
    assert_eq!(
        booking.qr_code_url.as_deref(),
        Some(format!("/uploads/qrcodes/qr_{}.png", booking.booking_reference).as_str())
    );
    assert_eq!(h.notifier.event_kinds(), vec!["confirmation"]);
    // No deposit required, so no payment was attempted.
    assert!(confirmation.payment_client_secret.is_none());
    assert!(h.gateway.intents.lock().unwrap().is_empty());
}

#[tokio::test]
async fn occupied_interval_is_rejected_before_commit() {
    let h = harness();
    let branch = branch();
    let table = table(branch.id, "T1", 1, 4);
    h.store.add_branch(branch.clone()).await;
    h.store.add_table(table.clone()).await;

    h.bookings
        .create_booking(&request(branch.id, table.id, time(19, 0)))
        .await
        .unwrap();

    // Overlapping attempt on the same table.
    let err = h
        .bookings
        .create_booking(&request(branch.id, table.id, time(20, 0)))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unavailable);

    // Back-to-back attempt succeeds.
    h.bookings
        .create_booking(&request(branch.id, table.id, time(20, 30)))
        .await
        .unwrap();
}

#[tokio::test]
async fn invalid_requests_are_rejected() {
    let h = harness();
    let branch = branch();
    let table = table(branch.id, "T1", 2, 4);
    h.store.add_branch(branch.clone()).await;
    h.store.add_table(table.clone()).await;

    let mut bad_email = request(branch.id, table.id, time(19, 0));
    bad_email.guest_email = "not-an-email".into();
    let err = h.bookings.create_booking(&bad_email).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);

    let mut too_many = request(branch.id, table.id, time(19, 0));
    too_many.party_size = 6;
    let err = h.bookings.create_booking(&too_many).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);

    // Nothing was persisted or notified.
    assert!(h.store.all_bookings().await.is_empty());
    assert!(h.notifier.event_kinds().is_empty());
}

#[tokio::test]
async fn deposit_is_collected_net_of_coupon_discount() {
    let h = harness();
    let branch = deposit_branch(Decimal::from(30));
    let table = table(branch.id, "T1", 1, 4);
    let coupon = percentage_coupon("WELCOME10", 10, Utc::now() + Duration::days(30));
    h.store.add_branch(branch.clone()).await;
    h.store.add_table(table.clone()).await;
    h.store.add_coupon(coupon.clone()).await;

    let mut req = request(branch.id, table.id, time(19, 0));
    req.coupon_code = Some("WELCOME10".into());

    let confirmation = h.bookings.create_booking(&req).await.unwrap();
    let booking = &confirmation.booking;

    // 10% of the branch's 50 minimum charge = 5 off the 30 deposit.
    assert_eq!(booking.discount_amount, Some(Decimal::from(5)));
    assert_eq!(booking.deposit_amount, Some(Decimal::from(25)));
    assert_eq!(booking.coupon_id, Some(coupon.id));
    assert!(booking.payment_intent_id.is_some());
    assert!(confirmation.payment_client_secret.is_some());
    assert_eq!(*h.gateway.intents.lock().unwrap(), vec![Decimal::from(25)]);
}

#[tokio::test]
async fn invalid_coupon_is_silently_skipped() {
    let h = harness();
    let branch = deposit_branch(Decimal::from(30));
    let table = table(branch.id, "T1", 1, 4);
    let expired = percentage_coupon("OLD", 10, Utc::now() - Duration::days(1));
    h.store.add_branch(branch.clone()).await;
    h.store.add_table(table.clone()).await;
    h.store.add_coupon(expired).await;

    for code in ["OLD", "NEVER_EXISTED"] {
        let mut req = request(branch.id, table.id, time(19, 0));
        req.coupon_code = Some(code.into());
        req.booking_time = if code == "OLD" { time(12, 0) } else { time(19, 0) };

        let confirmation = h.bookings.create_booking(&req).await.unwrap();
        assert!(confirmation.booking.coupon_id.is_none());
        assert!(confirmation.booking.discount_amount.is_none());
        assert_eq!(confirmation.booking.deposit_amount, Some(Decimal::from(30)));
    }
}

#[tokio::test]
async fn payment_failure_aborts_admission() {
    let h = harness_with(
        RecordingGateway {
            fail_intents: true,
            ..Default::default()
        },
        StubQrGenerator::default(),
    );
    let branch = deposit_branch(Decimal::from(30));
    let table = table(branch.id, "T1", 1, 4);
    h.store.add_branch(branch.clone()).await;
    h.store.add_table(table.clone()).await;

    let err = h
        .bookings
        .create_booking(&request(branch.id, table.id, time(19, 0)))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::PaymentFailed);
    assert!(h.store.all_bookings().await.is_empty());
}

#[tokio::test]
async fn qr_failure_never_fails_the_booking() {
    let h = harness_with(
        RecordingGateway::default(),
        StubQrGenerator { fail: true },
    );
    let branch = branch();
    let table = table(branch.id, "T1", 1, 4);
    h.store.add_branch(branch.clone()).await;
    h.store.add_table(table.clone()).await;

    let confirmation = h
        .bookings
        .create_booking(&request(branch.id, table.id, time(19, 0)))
        .await
        .unwrap();
    assert!(confirmation.booking.qr_code_url.is_none());
    assert_eq!(h.notifier.event_kinds(), vec!["confirmation"]);
}

#[tokio::test]
async fn cancellation_respects_the_policy_window() {
    let h = harness();
    let branch = branch();
    let table = table(branch.id, "T1", 1, 4);
    h.store.add_branch(branch.clone()).await;
    h.store.add_table(table.clone()).await;

    // Booking twelve hours out: inside the 24h window.
    let mut req = request(branch.id, table.id, time(19, 0));
    req.booking_date = (Utc::now() + Duration::hours(12)).date_naive();
    req.booking_time = (Utc::now() + Duration::hours(12)).time();
    let near = h.bookings.create_booking(&req).await.unwrap();

    let err = h
        .bookings
        .cancel_booking(near.booking.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::PolicyViolation);
    assert!(err.message.contains("24 hours"));
    assert!(!h.bookings.can_cancel_booking(near.booking.id).await.unwrap());

    // Two weeks out: well outside the window.
    let far = h
        .bookings
        .create_booking(&request(branch.id, table.id, time(19, 0)))
        .await
        .unwrap();
    assert!(h.bookings.can_cancel_booking(far.booking.id).await.unwrap());

    let cancelled = h
        .bookings
        .cancel_booking(far.booking.id, Some("change of plans".into()))
        .await
        .unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert!(cancelled.cancelled_at.is_some());
    assert_eq!(cancelled.cancellation_reason.as_deref(), Some("change of plans"));

    // Cancellation is terminal.
    let err = h
        .bookings
        .cancel_booking(far.booking.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);
}

#[tokio::test]
async fn cancelling_a_paid_deposit_triggers_a_refund() {
    let h = harness();
    let branch = deposit_branch(Decimal::from(30));
    let table = table(branch.id, "T1", 1, 4);
    h.store.add_branch(branch.clone()).await;
    h.store.add_table(table.clone()).await;

    let confirmation = h
        .bookings
        .create_booking(&request(branch.id, table.id, time(19, 0)))
        .await
        .unwrap();
    let intent_id = confirmation.booking.payment_intent_id.clone().unwrap();

    // Simulate the guest completing the payment.
    let mut paid = confirmation.booking.clone();
    paid.deposit_paid = true;
    h.store.update_booking(&paid).await.unwrap();

    h.bookings.cancel_booking(paid.id, None).await.unwrap();
    assert_eq!(*h.gateway.refunds.lock().unwrap(), vec![intent_id]);
}

#[tokio::test]
async fn staff_confirmation_has_no_window_gate() {
    let h = harness();
    let branch = branch();
    let table = table(branch.id, "T1", 1, 4);
    h.store.add_branch(branch.clone()).await;
    h.store.add_table(table.clone()).await;

    // Booking starting within the hour: cancel window is closed.
    let mut req = request(branch.id, table.id, time(19, 0));
    req.booking_date = (Utc::now() + Duration::minutes(30)).date_naive();
    req.booking_time = (Utc::now() + Duration::minutes(30)).time();
    let confirmation = h.bookings.create_booking(&req).await.unwrap();

    let confirmed = h
        .bookings
        .confirm_booking(confirmation.booking.id)
        .await
        .unwrap();
    assert_eq!(confirmed.status, BookingStatus::Confirmed);
    assert!(confirmed.is_verified);
}

#[tokio::test]
async fn modification_rechecks_availability_excluding_itself() {
    let h = harness();
    let branch = branch();
    let table = table(branch.id, "T1", 1, 4);
    h.store.add_branch(branch.clone()).await;
    h.store.add_table(table.clone()).await;

    let first = h
        .bookings
        .create_booking(&request(branch.id, table.id, time(18, 0)))
        .await
        .unwrap();
    h.bookings
        .create_booking(&request(branch.id, table.id, time(20, 0)))
        .await
        .unwrap();

    // Nudging the first booking by 15 minutes only "conflicts" with its
    // own old interval, which is excluded from the re-check.
    let nudged = h
        .bookings
        .update_booking(
            first.booking.id,
            &BookingUpdate {
                booking_time: Some(time(18, 15)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(nudged.booking_time, time(18, 15));
    assert!(h.notifier.event_kinds().contains(&"modification".to_string()));

    // Moving it onto the second booking's interval is rejected.
    let err = h
        .bookings
        .update_booking(
            first.booking.id,
            &BookingUpdate {
                booking_time: Some(time(20, 30)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unavailable);
}

#[tokio::test]
async fn lookups_find_by_reference_and_sort_newest_first() {
    let h = harness();
    let branch = branch();
    let table = table(branch.id, "T1", 1, 4);
    h.store.add_branch(branch.clone()).await;
    h.store.add_table(table.clone()).await;

    let mut early = request(branch.id, table.id, time(18, 0));
    early.booking_date = future_date();
    let mut late = request(branch.id, table.id, time(19, 0));
    late.booking_date = future_date() + Duration::days(1);

    let a = h.bookings.create_booking(&early).await.unwrap();
    let b = h.bookings.create_booking(&late).await.unwrap();

    let found = h
        .bookings
        .get_booking_by_reference(&a.booking.booking_reference)
        .await
        .unwrap();
    assert_eq!(found.id, a.booking.id);

    let listed = h
        .bookings
        .bookings_for_branch(branch.id, None, None)
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, b.booking.id);
    assert_eq!(listed[1].id, a.booking.id);

    let err = h
        .bookings
        .get_booking_by_reference("BR000000000000FFFFFF")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

/// Randomized concurrent admissions must never persist an overlap.
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_admissions_never_overlap() {
    let h = Arc::new(harness());
    let branch = branch();
    let table = table(branch.id, "T1", 1, 4);
    h.store.add_branch(branch.clone()).await;
    h.store.add_table(table.clone()).await;

    let mut rng = rand::rng();
    let starts: Vec<_> = (0..48)
        .map(|_| time(17 + rng.random_range(0..5), 15 * rng.random_range(0..4)))
        .collect();

    let mut handles = Vec::new();
    for start in starts {
        let h = h.clone();
        let branch_id = branch.id;
        let table_id = table.id;
        handles.push(tokio::spawn(async move {
            h.bookings
                .create_booking(&request(branch_id, table_id, start))
                .await
        }));
    }

    let mut admitted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => admitted += 1,
            Err(e) => assert!(
                matches!(e.kind, ErrorKind::Unavailable | ErrorKind::ConcurrencyConflict),
                "unexpected admission failure: {e}"
            ),
        }
    }
    assert!(admitted >= 1);

    let bookings = h.store.all_bookings().await;
    assert_eq!(bookings.len(), admitted);
    for (i, a) in bookings.iter().enumerate() {
        for b in bookings.iter().skip(i + 1) {
            assert!(
                !a.overlaps(b.starts_at(), b.ends_at()),
                "overlap persisted between {} and {}",
                a.booking_reference,
                b.booking_reference
            );
        }
    }
}
