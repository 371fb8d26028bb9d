//! Shared fixtures for the service integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use tablehub_core::config::{BookingConfig, PaymentConfig};
use tablehub_core::result::AppResult;
use tablehub_core::traits::{PaymentGateway, PaymentIntent, QrCodeGenerator};
use tablehub_core::types::id::{BranchId, CouponId, RestaurantId, TableId, TimeSlotId};
use tablehub_core::AppError;
use tablehub_database::MemoryReservationStore;
use tablehub_entity::booking::{Booking, Occasion};
use tablehub_entity::branch::Branch;
use tablehub_entity::coupon::{Coupon, DiscountType};
use tablehub_entity::table::{Table, TableLocation};
use tablehub_entity::timeslot::{MealType, TimeSlot};
use tablehub_service::booking::BookingRequest;
use tablehub_service::notification::BookingNotifier;
use tablehub_service::{AvailabilityService, BookingService};

/// Notifier that records which notifications fired.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub events: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn event_kinds(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(kind, _)| kind.clone())
            .collect()
    }
}

#[async_trait]
impl BookingNotifier for RecordingNotifier {
    async fn send_booking_confirmation(&self, booking: &Booking) -> AppResult<()> {
        self.events
            .lock()
            .unwrap()
            .push(("confirmation".into(), booking.booking_reference.clone()));
        Ok(())
    }

    async fn send_booking_cancellation(&self, booking: &Booking) -> AppResult<()> {
        self.events
            .lock()
            .unwrap()
            .push(("cancellation".into(), booking.booking_reference.clone()));
        Ok(())
    }

    async fn send_booking_modification(&self, booking: &Booking) -> AppResult<()> {
        self.events
            .lock()
            .unwrap()
            .push(("modification".into(), booking.booking_reference.clone()));
        Ok(())
    }
}

/// Gateway that fabricates intents and records refunds.
#[derive(Debug, Default)]
pub struct RecordingGateway {
    pub intents: Mutex<Vec<Decimal>>,
    pub refunds: Mutex<Vec<String>>,
    pub fail_intents: bool,
}

#[async_trait]
impl PaymentGateway for RecordingGateway {
    async fn create_payment_intent(
        &self,
        amount: Decimal,
        _currency: &str,
        _description: &str,
        _metadata: &HashMap<String, String>,
    ) -> AppResult<PaymentIntent> {
        if self.fail_intents {
            return Err(AppError::payment_failed("gateway declined"));
        }
        self.intents.lock().unwrap().push(amount);
        let id = format!("pi_test_{}", Uuid::new_v4().simple());
        Ok(PaymentIntent {
            client_secret: Some(format!("{id}_secret")),
            payment_intent_id: id,
        })
    }

    async fn refund_payment(
        &self,
        payment_intent_id: &str,
        _amount: Option<Decimal>,
    ) -> AppResult<()> {
        self.refunds
            .lock()
            .unwrap()
            .push(payment_intent_id.to_string());
        Ok(())
    }
}

/// QR generator that never touches the filesystem.
#[derive(Debug, Default)]
pub struct StubQrGenerator {
    pub fail: bool,
}

#[async_trait]
impl QrCodeGenerator for StubQrGenerator {
    async fn generate(
        &self,
        booking_reference: &str,
        _guest_name: &str,
        _date: NaiveDate,
        _time: NaiveTime,
    ) -> AppResult<String> {
        if self.fail {
            return Err(AppError::unexpected("disk full"));
        }
        Ok(format!("/uploads/qrcodes/qr_{booking_reference}.png"))
    }
}

/// Everything a test needs, wired over the in-memory store.
pub struct TestHarness {
    pub store: Arc<MemoryReservationStore>,
    pub availability: AvailabilityService,
    pub bookings: BookingService,
    pub notifier: Arc<RecordingNotifier>,
    pub gateway: Arc<RecordingGateway>,
}

pub fn harness() -> TestHarness {
    harness_with(RecordingGateway::default(), StubQrGenerator::default())
}

pub fn harness_with(gateway: RecordingGateway, qr: StubQrGenerator) -> TestHarness {
    let store = Arc::new(MemoryReservationStore::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let gateway = Arc::new(gateway);

    let availability = AvailabilityService::new(store.clone());
    let bookings = BookingService::new(
        store.clone(),
        gateway.clone(),
        Arc::new(qr),
        notifier.clone(),
        BookingConfig::default(),
        PaymentConfig::default(),
    );

    TestHarness {
        store,
        availability,
        bookings,
        notifier,
        gateway,
    }
}

pub fn branch() -> Branch {
    Branch {
        id: BranchId::new(),
        restaurant_id: RestaurantId::new(),
        name: "Harbor View".into(),
        address: "1 Pier Road".into(),
        capacity: 60,
        booking_interval_minutes: 30,
        cancellation_policy_hours: 24,
        minimum_charge: Some(Decimal::from(50)),
        require_deposit: false,
        deposit_amount: None,
        is_active: true,
        created_at: Utc::now(),
        updated_at: None,
    }
}

pub fn deposit_branch(amount: Decimal) -> Branch {
    Branch {
        require_deposit: true,
        deposit_amount: Some(amount),
        ..branch()
    }
}

pub fn table(branch_id: BranchId, number: &str, min: i32, max: i32) -> Table {
    Table {
        id: TableId::new(),
        branch_id,
        table_number: number.into(),
        min_capacity: min,
        max_capacity: max,
        location: TableLocation::Indoor,
        description: None,
        is_active: true,
        created_at: Utc::now(),
        updated_at: None,
    }
}

pub fn dinner_slot(branch_id: BranchId, start: NaiveTime) -> TimeSlot {
    TimeSlot {
        id: TimeSlotId::new(),
        branch_id,
        meal: MealType::Dinner,
        start_time: start,
        end_time: start + Duration::hours(3),
        day_of_week: None,
        max_bookings: 0,
        is_active: true,
        created_at: Utc::now(),
    }
}

pub fn percentage_coupon(code: &str, percent: i64, end_date: DateTime<Utc>) -> Coupon {
    Coupon {
        id: CouponId::new(),
        code: code.into(),
        restaurant_id: None,
        branch_id: None,
        description: None,
        discount: DiscountType::Percentage,
        discount_value: Some(Decimal::from(percent)),
        start_date: Utc::now() - Duration::days(1),
        end_date,
        max_usages: Some(100),
        usage_count: 0,
        is_active: true,
        created_at: Utc::now(),
    }
}

/// A date far enough out that policy windows are always open.
pub fn future_date() -> NaiveDate {
    (Utc::now() + Duration::days(14)).date_naive()
}

pub fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

pub fn request(branch_id: BranchId, table_id: TableId, at: NaiveTime) -> BookingRequest {
    BookingRequest {
        branch_id,
        table_id,
        user_id: None,
        guest_name: "Alex Chen".into(),
        guest_email: "alex@example.com".into(),
        guest_phone: None,
        party_size: 2,
        booking_date: future_date(),
        booking_time: at,
        duration_minutes: None,
        occasion: Occasion::None,
        special_requests: None,
        coupon_code: None,
    }
}
