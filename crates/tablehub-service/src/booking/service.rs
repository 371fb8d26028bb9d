//! Booking admission controller.
//!
//! Every state transition of a booking funnels through this service:
//! creation, modification, cancellation, and staff confirmation. The
//! availability re-check happens here at commit time, and the store's
//! overlap invariant is the final arbiter when two admissions race.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use tablehub_core::config::{BookingConfig, PaymentConfig};
use tablehub_core::error::AppError;
use tablehub_core::result::AppResult;
use tablehub_core::traits::{PaymentGateway, PaymentIntent, QrCodeGenerator};
use tablehub_core::types::id::{BookingId, BranchId, DinerId};
use tablehub_database::ReservationStore;
use tablehub_entity::booking::{Booking, BookingStatus, NewBooking};
use tablehub_entity::branch::Branch;
use tablehub_entity::coupon::Coupon;

use crate::availability::AvailabilityService;
use crate::notification::BookingNotifier;

use super::reference::generate_booking_reference;
use super::request::{BookingRequest, BookingUpdate};

/// Outcome of a successful admission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfirmation {
    /// The persisted booking, in `Pending` status.
    pub booking: Booking,
    /// Client secret for completing the deposit payment, when one was
    /// required.
    pub payment_client_secret: Option<String>,
}

/// Guards every booking write.
#[derive(Debug, Clone)]
pub struct BookingService {
    store: Arc<dyn ReservationStore>,
    payments: Arc<dyn PaymentGateway>,
    qr_generator: Arc<dyn QrCodeGenerator>,
    notifier: Arc<dyn BookingNotifier>,
    availability: AvailabilityService,
    booking_config: BookingConfig,
    payment_config: PaymentConfig,
}

impl BookingService {
    /// Creates a new booking service.
    pub fn new(
        store: Arc<dyn ReservationStore>,
        payments: Arc<dyn PaymentGateway>,
        qr_generator: Arc<dyn QrCodeGenerator>,
        notifier: Arc<dyn BookingNotifier>,
        booking_config: BookingConfig,
        payment_config: PaymentConfig,
    ) -> Self {
        let availability = AvailabilityService::new(store.clone());
        Self {
            store,
            payments,
            qr_generator,
            notifier,
            availability,
            booking_config,
            payment_config,
        }
    }

    /// Admits a new booking.
    ///
    /// Runs the full admission pipeline: request validation, table and
    /// branch resolution, party-size check, commit-time availability
    /// re-check, silent coupon redemption, deposit collection, and the
    /// atomic insert. A lost race against a concurrent admission surfaces
    /// as `ConcurrencyConflict`; everything after the commit (QR artifact,
    /// confirmation notification) is best-effort and never fails the
    /// booking.
    pub async fn create_booking(&self, request: &BookingRequest) -> AppResult<BookingConfirmation> {
        request.validated()?;

        let (table, branch) = self
            .store
            .find_active_table_with_branch(request.table_id)
            .await?
            .ok_or_else(|| AppError::not_found("Table not found or inactive"))?;

        if table.branch_id != request.branch_id {
            return Err(AppError::invalid_input(
                "Table does not belong to the requested branch",
            ));
        }
        if !table.fits_party(request.party_size) {
            return Err(AppError::invalid_input(format!(
                "Table {} seats {} to {} guests",
                table.table_number, table.min_capacity, table.max_capacity
            )));
        }

        let duration = request
            .duration_minutes
            .unwrap_or(self.booking_config.default_duration_minutes);

        let available = self
            .availability
            .is_table_available(
                table.id,
                request.booking_date,
                request.booking_time,
                duration,
                None,
            )
            .await?;
        if !available {
            return Err(AppError::unavailable(
                "The selected table is no longer available at that time",
            ));
        }

        let coupon = self.resolve_coupon(request.coupon_code.as_deref()).await?;
        let discount = coupon
            .as_ref()
            .map(|c| c.discount_for(branch.minimum_charge));

        let reference = generate_booking_reference(&self.booking_config.reference_prefix);

        let (deposit_amount, payment_intent) = self
            .collect_deposit(&branch, &reference, discount)
            .await?;

        let new = NewBooking {
            booking_reference: reference.clone(),
            branch_id: branch.id,
            table_id: table.id,
            user_id: request.user_id,
            guest_name: request.guest_name.clone(),
            guest_email: request.guest_email.clone(),
            guest_phone: request.guest_phone.clone(),
            party_size: request.party_size,
            booking_date: request.booking_date,
            booking_time: request.booking_time,
            duration_minutes: duration,
            occasion: request.occasion,
            special_requests: request.special_requests.clone(),
            deposit_amount,
            payment_intent_id: payment_intent.as_ref().map(|p| p.payment_intent_id.clone()),
            coupon_id: coupon.as_ref().map(|c| c.id),
            discount_amount: discount,
        };

        let mut booking = self.store.insert_booking(&new).await?;
        info!(
            reference = %booking.booking_reference,
            table = %table.table_number,
            date = %booking.booking_date,
            time = %booking.booking_time,
            "Booking admitted"
        );

        booking = self.attach_qr_code(booking).await;

        if let Err(e) = self.notifier.send_booking_confirmation(&booking).await {
            warn!(reference = %booking.booking_reference, error = %e,
                "Confirmation notification failed");
        }

        Ok(BookingConfirmation {
            payment_client_secret: payment_intent.and_then(|p| p.client_secret),
            booking,
        })
    }

    /// Modifies an existing booking within the modification window.
    ///
    /// When the update moves the booking in space or time the target
    /// interval is re-checked, excluding the booking itself so an
    /// unchanged dimension never conflicts with its own reservation.
    pub async fn update_booking(
        &self,
        booking_id: BookingId,
        update: &BookingUpdate,
    ) -> AppResult<Booking> {
        update.validated()?;

        let mut booking = self.require_booking(booking_id).await?;
        let branch = self.require_branch(booking.branch_id).await?;

        if booking.status == BookingStatus::Cancelled {
            return Err(AppError::invalid_input("Booking has been cancelled"));
        }
        self.enforce_policy_window(&booking, &branch, "modified")?;

        let table_id = update.table_id.unwrap_or(booking.table_id);
        let date = update.booking_date.unwrap_or(booking.booking_date);
        let time = update.booking_time.unwrap_or(booking.booking_time);
        let duration = update.duration_minutes.unwrap_or(booking.duration_minutes);

        if let Some(party_size) = update.party_size {
            let (table, _) = self
                .store
                .find_active_table_with_branch(table_id)
                .await?
                .ok_or_else(|| AppError::not_found("Table not found or inactive"))?;
            if !table.fits_party(party_size) {
                return Err(AppError::invalid_input(format!(
                    "Table {} seats {} to {} guests",
                    table.table_number, table.min_capacity, table.max_capacity
                )));
            }
        }

        if update.moves_booking() {
            let available = self
                .availability
                .is_table_available(table_id, date, time, duration, Some(booking.id))
                .await?;
            if !available {
                return Err(AppError::unavailable(
                    "The selected table is no longer available at that time",
                ));
            }
        }

        booking.table_id = table_id;
        booking.booking_date = date;
        booking.booking_time = time;
        booking.duration_minutes = duration;
        if let Some(party_size) = update.party_size {
            booking.party_size = party_size;
        }
        if let Some(requests) = &update.special_requests {
            booking.special_requests = Some(requests.clone());
        }
        if let Some(occasion) = update.occasion {
            booking.occasion = occasion;
        }
        booking.updated_at = Some(Utc::now());

        let booking = self.store.update_booking(&booking).await?;
        info!(reference = %booking.booking_reference, "Booking modified");

        if let Err(e) = self.notifier.send_booking_modification(&booking).await {
            warn!(reference = %booking.booking_reference, error = %e,
                "Modification notification failed");
        }

        Ok(booking)
    }

    /// Cancels a booking within the cancellation window.
    ///
    /// Cancellation is terminal. A paid deposit is refunded best-effort;
    /// a refund failure is logged and the cancellation stands.
    pub async fn cancel_booking(
        &self,
        booking_id: BookingId,
        reason: Option<String>,
    ) -> AppResult<Booking> {
        let mut booking = self.require_booking(booking_id).await?;
        let branch = self.require_branch(booking.branch_id).await?;

        if booking.status == BookingStatus::Cancelled {
            return Err(AppError::invalid_input("Booking is already cancelled"));
        }
        self.enforce_policy_window(&booking, &branch, "cancelled")?;

        let now = Utc::now();
        booking.status = BookingStatus::Cancelled;
        booking.cancelled_at = Some(now);
        booking.cancellation_reason = reason;
        booking.updated_at = Some(now);

        let booking = self.store.update_booking(&booking).await?;
        info!(reference = %booking.booking_reference, "Booking cancelled");

        if booking.deposit_paid {
            if let Some(intent_id) = &booking.payment_intent_id {
                if let Err(e) = self.payments.refund_payment(intent_id, None).await {
                    warn!(reference = %booking.booking_reference, error = %e,
                        "Deposit refund failed");
                }
            }
        }

        if let Err(e) = self.notifier.send_booking_cancellation(&booking).await {
            warn!(reference = %booking.booking_reference, error = %e,
                "Cancellation notification failed");
        }

        Ok(booking)
    }

    /// Confirms a booking on behalf of staff.
    ///
    /// Sets `Confirmed` status and marks the booking verified. Staff
    /// confirmation is not window-gated.
    pub async fn confirm_booking(&self, booking_id: BookingId) -> AppResult<Booking> {
        let mut booking = self.require_booking(booking_id).await?;

        booking.status = BookingStatus::Confirmed;
        booking.is_verified = true;
        booking.updated_at = Some(Utc::now());

        let booking = self.store.update_booking(&booking).await?;
        info!(reference = %booking.booking_reference, "Booking confirmed");
        Ok(booking)
    }

    /// Whether a booking can still be cancelled. Missing or already
    /// cancelled bookings answer `false`.
    pub async fn can_cancel_booking(&self, booking_id: BookingId) -> AppResult<bool> {
        self.within_policy_window(booking_id).await
    }

    /// Whether a booking can still be modified. Same window as
    /// cancellation.
    pub async fn can_modify_booking(&self, booking_id: BookingId) -> AppResult<bool> {
        self.within_policy_window(booking_id).await
    }

    /// Fetches a booking by ID.
    pub async fn get_booking(&self, booking_id: BookingId) -> AppResult<Booking> {
        self.require_booking(booking_id).await
    }

    /// Fetches a booking by its external reference.
    pub async fn get_booking_by_reference(&self, reference: &str) -> AppResult<Booking> {
        self.store
            .find_booking_by_reference(reference)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {reference} not found")))
    }

    /// Lists a branch's bookings, optionally filtered by date and status.
    pub async fn bookings_for_branch(
        &self,
        branch_id: BranchId,
        date: Option<NaiveDate>,
        status: Option<BookingStatus>,
    ) -> AppResult<Vec<Booking>> {
        self.store.bookings_for_branch(branch_id, date, status).await
    }

    /// Lists a diner's bookings.
    pub async fn bookings_for_user(&self, user_id: DinerId) -> AppResult<Vec<Booking>> {
        self.store.bookings_for_user(user_id).await
    }

    /// Looks up and vets a coupon code. Invalid or unknown codes are
    /// skipped silently; the booking proceeds without a discount.
    async fn resolve_coupon(&self, code: Option<&str>) -> AppResult<Option<Coupon>> {
        let Some(code) = code.filter(|c| !c.is_empty()) else {
            return Ok(None);
        };
        match self.store.find_active_coupon(code).await? {
            Some(coupon) if coupon.is_redeemable(Utc::now()) => Ok(Some(coupon)),
            Some(_) => {
                debug!(code = %code, "Coupon expired or exhausted, booking proceeds without it");
                Ok(None)
            }
            None => {
                debug!(code = %code, "Unknown coupon code, booking proceeds without it");
                Ok(None)
            }
        }
    }

    /// Collects the deposit a branch requires, net of any discount.
    ///
    /// Returns the charged amount and the created payment intent. A
    /// discount covering the whole deposit skips the gateway entirely.
    /// Gateway failure aborts the admission before anything is persisted.
    async fn collect_deposit(
        &self,
        branch: &Branch,
        reference: &str,
        discount: Option<Decimal>,
    ) -> AppResult<(Option<Decimal>, Option<PaymentIntent>)> {
        if !branch.require_deposit {
            return Ok((None, None));
        }
        let Some(deposit) = branch.deposit_amount.filter(|d| *d > Decimal::ZERO) else {
            return Ok((None, None));
        };

        let net = (deposit - discount.unwrap_or(Decimal::ZERO)).max(Decimal::ZERO);
        if net == Decimal::ZERO {
            return Ok((Some(Decimal::ZERO), None));
        }

        let mut metadata = HashMap::new();
        metadata.insert("booking_reference".to_string(), reference.to_string());
        metadata.insert("branch_id".to_string(), branch.id.to_string());

        let intent = self
            .payments
            .create_payment_intent(
                net,
                &self.payment_config.currency,
                &format!("Deposit for booking {reference} at {}", branch.name),
                &metadata,
            )
            .await?;

        Ok((Some(net), Some(intent)))
    }

    /// Generates and attaches the check-in QR code. Failures are logged
    /// and leave the booking without a code.
    async fn attach_qr_code(&self, mut booking: Booking) -> Booking {
        let generated = self
            .qr_generator
            .generate(
                &booking.booking_reference,
                &booking.guest_name,
                booking.booking_date,
                booking.booking_time,
            )
            .await;

        match generated {
            Ok(url) => {
                booking.qr_code_url = Some(url);
                match self.store.update_booking(&booking).await {
                    Ok(updated) => return updated,
                    Err(e) => {
                        warn!(reference = %booking.booking_reference, error = %e,
                            "Failed to persist QR code URL");
                    }
                }
            }
            Err(e) => {
                warn!(reference = %booking.booking_reference, error = %e,
                    "QR code generation failed");
            }
        }
        booking
    }

    async fn require_booking(&self, booking_id: BookingId) -> AppResult<Booking> {
        self.store
            .find_booking(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {booking_id} not found")))
    }

    async fn require_branch(&self, branch_id: BranchId) -> AppResult<Branch> {
        self.store
            .find_branch(branch_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Branch {branch_id} not found")))
    }

    /// Policy gate shared by cancellation and modification: the change
    /// must happen strictly before the booking start minus the branch's
    /// policy hours.
    fn enforce_policy_window(
        &self,
        booking: &Booking,
        branch: &Branch,
        action: &str,
    ) -> AppResult<()> {
        if !policy_window_open(booking.starts_at(), branch.cancellation_policy_hours) {
            return Err(AppError::policy_violation(format!(
                "Bookings can only be {action} at least {} hours before the reservation time",
                branch.cancellation_policy_hours
            )));
        }
        Ok(())
    }

    async fn within_policy_window(&self, booking_id: BookingId) -> AppResult<bool> {
        let Some(booking) = self.store.find_booking(booking_id).await? else {
            return Ok(false);
        };
        if booking.status == BookingStatus::Cancelled {
            return Ok(false);
        }
        let Some(branch) = self.store.find_branch(booking.branch_id).await? else {
            return Ok(false);
        };
        Ok(policy_window_open(
            booking.starts_at(),
            branch.cancellation_policy_hours,
        ))
    }
}

/// Whether `now` is still strictly before `starts_at - policy_hours`.
fn policy_window_open(starts_at: NaiveDateTime, policy_hours: i32) -> bool {
    let deadline = starts_at - Duration::hours(i64::from(policy_hours));
    Utc::now().naive_utc() < deadline
}
