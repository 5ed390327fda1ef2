//! Booking service
//!
//! The orchestrator for the reservation and billing engine. It owns the
//! only cross-component transaction boundary: every booking, payment, and
//! status transition happens under a per-location or per-entity lock, so
//! "check conflicts, then write" and "check balance, then append" are
//! atomic to concurrent callers.
//!
//! On any error the operation leaves all involved entities exactly as they
//! were: validation runs before any write, and the single external side
//! effect that can precede a ledger write (a client credit debit) is
//! compensated if the write fails.

use chrono::{NaiveDate, Utc};
use posada_core::{
    models::{
        LocationInfo, LocationKind, Order, OrderStatus, PaymentEntry, PaymentMethod, Reservation,
        ReservationStatus,
    },
    traits::{ClientStore, HostSettings, LocationCatalog, OrderRepository, ReservationRepository},
    AppError, AppResult,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::calendar::CalendarIndex;
use crate::constants::{MIN_PARTY_SIZE, PAYMENT_EPSILON};
use crate::locks::LockRegistry;
use crate::loyalty::LoyaltyService;
use crate::pricing;

/// Request to book a location for a date range
#[derive(Debug, Clone)]
pub struct CreateReservationRequest {
    pub location_id: Uuid,
    pub client_id: Option<Uuid>,
    pub arrival: NaiveDate,
    pub departure: Option<NaiveDate>,
    pub party_size: i32,
}

/// Partial update to an existing reservation
///
/// `None` fields are left unchanged. Date or location changes re-run the
/// conflict check (excluding the reservation's own interval) and re-price.
#[derive(Debug, Clone, Default)]
pub struct ReservationUpdate {
    pub location_id: Option<Uuid>,
    pub arrival: Option<NaiveDate>,
    pub departure: Option<NaiveDate>,
    pub party_size: Option<i32>,
}

/// Request to open an order
#[derive(Debug, Clone)]
pub struct CreateOrderRequest {
    pub location_id: Uuid,
    pub client_id: Option<Uuid>,
    pub total: Decimal,
}

/// Booking service
///
/// Coordinates the calendar index, pricing calculator, reservation/order
/// ledgers, and loyalty accrual behind the public operations.
pub struct BookingService {
    catalog: Arc<dyn LocationCatalog>,
    clients: Arc<dyn ClientStore>,
    reservations: Arc<dyn ReservationRepository>,
    orders: Arc<dyn OrderRepository>,
    calendar: CalendarIndex,
    loyalty: LoyaltyService,
    location_locks: LockRegistry,
    entity_locks: LockRegistry,
}

impl BookingService {
    /// Create a new booking service for a host
    pub fn new(
        catalog: Arc<dyn LocationCatalog>,
        clients: Arc<dyn ClientStore>,
        settings: Arc<dyn HostSettings>,
        reservations: Arc<dyn ReservationRepository>,
        orders: Arc<dyn OrderRepository>,
        host_id: Uuid,
    ) -> Self {
        let loyalty = LoyaltyService::new(settings, Arc::clone(&clients), host_id);
        Self {
            catalog,
            clients,
            reservations,
            orders,
            calendar: CalendarIndex::new(),
            loyalty,
            location_locks: LockRegistry::new(),
            entity_locks: LockRegistry::new(),
        }
    }

    /// Rebuild the calendar projection from stored reservations
    ///
    /// Called once at startup when the injected storage already holds data.
    pub async fn rebuild_calendar(&self) -> AppResult<()> {
        let all = self.reservations.find_all(i64::MAX, 0).await?;
        self.calendar.rebuild(all.iter());
        Ok(())
    }

    // ==================== Validation helpers ====================

    async fn require_location(&self, id: Uuid) -> AppResult<LocationInfo> {
        self.catalog
            .get_location(id)
            .await?
            .ok_or_else(|| AppError::LocationNotFound(id.to_string()))
    }

    /// Validate a date range for a location kind; returns the normalized
    /// departure (tables store `None`)
    fn validate_dates(
        kind: LocationKind,
        arrival: NaiveDate,
        departure: Option<NaiveDate>,
    ) -> AppResult<Option<NaiveDate>> {
        match kind {
            LocationKind::Room => {
                let departure = departure.ok_or_else(|| {
                    AppError::InvalidDateRange(
                        "a room booking requires a departure date".to_string(),
                    )
                })?;
                if departure <= arrival {
                    return Err(AppError::InvalidDateRange(format!(
                        "departure {} must be after arrival {}",
                        departure, arrival
                    )));
                }
                Ok(Some(departure))
            }
            LocationKind::Table => match departure {
                None => Ok(None),
                Some(d) if d == arrival => Ok(None),
                Some(d) => Err(AppError::InvalidDateRange(format!(
                    "a table booking spans a single day, got departure {}",
                    d
                ))),
            },
        }
    }

    fn validate_party(location: &LocationInfo, party_size: i32) -> AppResult<()> {
        if party_size < MIN_PARTY_SIZE {
            return Err(AppError::Validation(format!(
                "party size must be at least {}, got {}",
                MIN_PARTY_SIZE, party_size
            )));
        }
        if !location.fits_party(party_size) {
            return Err(AppError::CapacityExceeded {
                party_size,
                capacity: location.capacity.unwrap_or(0),
            });
        }
        Ok(())
    }

    fn validate_amount(amount: Decimal) -> AppResult<()> {
        if amount <= Decimal::ZERO {
            return Err(AppError::InvalidAmount(format!(
                "payment amount must be positive, got {}",
                amount
            )));
        }
        Ok(())
    }

    fn check_overpayment(amount: Decimal, balance: Decimal) -> AppResult<()> {
        if amount > balance + PAYMENT_EPSILON {
            return Err(AppError::Overpayment {
                requested: amount.to_string(),
                balance: balance.to_string(),
            });
        }
        Ok(())
    }

    /// Debit the client's stored credit for a `credit` payment
    ///
    /// Returns the debited client id so a failed ledger write can be
    /// compensated. Non-credit methods touch no external balance.
    async fn debit_credit(
        &self,
        client_id: Option<Uuid>,
        method: PaymentMethod,
        amount: Decimal,
    ) -> AppResult<Option<Uuid>> {
        if !method.draws_on_client() {
            return Ok(None);
        }
        let client_id = client_id.ok_or_else(|| {
            AppError::ClientNotFound("credit payment requires a linked client".to_string())
        })?;

        let available = self.clients.get_client_credit(client_id).await?;
        if available < amount {
            return Err(AppError::InsufficientCredit {
                required: amount.to_string(),
                available: available.to_string(),
            });
        }

        self.clients.adjust_client_credit(client_id, -amount).await?;
        Ok(Some(client_id))
    }

    async fn refund_credit(&self, client_id: Uuid, amount: Decimal) {
        if let Err(e) = self.clients.adjust_client_credit(client_id, amount).await {
            // The debit succeeded moments ago; a failed refund leaves the
            // stores inconsistent and must be surfaced loudly.
            warn!(
                "Failed to compensate credit debit of {} for client {}: {}",
                amount, client_id, e
            );
        }
    }

    // ==================== Reservations ====================

    /// Book a location for a date range
    #[instrument(skip(self, request), fields(location_id = %request.location_id))]
    pub async fn create_reservation(
        &self,
        request: CreateReservationRequest,
    ) -> AppResult<Reservation> {
        let location = self.require_location(request.location_id).await?;
        let departure = Self::validate_dates(location.kind, request.arrival, request.departure)?;
        Self::validate_party(&location, request.party_size)?;

        // Serialize check-then-write per location
        let _location_guard = self.location_locks.acquire(location.id).await;

        if let Some(conflicting) = self.calendar.conflicts(
            location.id,
            location.kind,
            request.arrival,
            departure,
            None,
        ) {
            return Err(AppError::DoubleBooking { conflicting });
        }

        let total = pricing::price(&location, request.arrival, departure, request.party_size);
        let reservation = Reservation::new(
            location.id,
            location.kind,
            request.client_id,
            request.arrival,
            departure,
            request.party_size,
            total,
        );

        let created = self.reservations.create(&reservation).await?;
        self.calendar.insert(
            created.location_id,
            created.kind,
            created.id,
            created.arrival,
            created.departure,
        );

        info!(
            "Created reservation {} on {} [{} -> {:?}], total {:?}",
            created.id, created.location_id, created.arrival, created.departure, created.total
        );
        Ok(created)
    }

    /// Fetch a reservation by id
    pub async fn get_reservation(&self, id: Uuid) -> AppResult<Reservation> {
        self.reservations
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ReservationNotFound(id.to_string()))
    }

    /// List reservations, newest first
    pub async fn list_reservations(&self, limit: i64, offset: i64) -> AppResult<Vec<Reservation>> {
        self.reservations.find_all(limit, offset).await
    }

    /// List reservations in a given lifecycle status
    pub async fn list_reservations_by_status(
        &self,
        status: ReservationStatus,
    ) -> AppResult<Vec<Reservation>> {
        self.reservations.find_by_status(status).await
    }

    /// List non-cancelled reservations for a location
    pub async fn list_active_by_location(
        &self,
        location_id: Uuid,
    ) -> AppResult<Vec<Reservation>> {
        self.reservations.find_active_by_location(location_id).await
    }

    /// Update a reservation's dates, location, or party size
    ///
    /// Date and location changes re-run the conflict check excluding the
    /// reservation's own prior interval, then re-price.
    #[instrument(skip(self, update))]
    pub async fn update_reservation(
        &self,
        id: Uuid,
        update: ReservationUpdate,
    ) -> AppResult<Reservation> {
        let _entity_guard = self.entity_locks.acquire(id).await;

        let mut reservation = self.get_reservation(id).await?;
        if reservation.status.is_terminal() {
            return Err(AppError::Validation(format!(
                "cannot modify a {} reservation",
                reservation.status
            )));
        }

        let location_id = update.location_id.unwrap_or(reservation.location_id);
        let location = self.require_location(location_id).await?;
        let arrival = update.arrival.unwrap_or(reservation.arrival);
        let departure = update.departure.or(reservation.departure);
        let departure = Self::validate_dates(location.kind, arrival, departure)?;
        let party_size = update.party_size.unwrap_or(reservation.party_size);
        Self::validate_party(&location, party_size)?;

        let _location_guard = self.location_locks.acquire(location.id).await;

        if let Some(conflicting) =
            self.calendar
                .conflicts(location.id, location.kind, arrival, departure, Some(id))
        {
            return Err(AppError::DoubleBooking { conflicting });
        }

        reservation.location_id = location.id;
        reservation.kind = location.kind;
        reservation.arrival = arrival;
        reservation.departure = departure;
        reservation.party_size = party_size;
        reservation.total = pricing::price(&location, arrival, departure, party_size);
        reservation.updated_at = Utc::now();

        let updated = self.reservations.update(&reservation).await?;
        // insert() replaces the prior interval, old location included
        self.calendar.insert(
            updated.location_id,
            updated.kind,
            updated.id,
            updated.arrival,
            updated.departure,
        );

        info!("Updated reservation {}", updated.id);
        Ok(updated)
    }

    /// Delete a reservation and release its interval
    #[instrument(skip(self))]
    pub async fn delete_reservation(&self, id: Uuid) -> AppResult<()> {
        let _entity_guard = self.entity_locks.acquire(id).await;

        if !self.reservations.delete(id).await? {
            return Err(AppError::ReservationNotFound(id.to_string()));
        }
        self.calendar.release(id);
        info!("Deleted reservation {}", id);
        Ok(())
    }

    /// Apply a payment to a reservation's ledger
    #[instrument(skip(self, note))]
    pub async fn apply_payment(
        &self,
        id: Uuid,
        method: PaymentMethod,
        amount: Decimal,
        note: Option<String>,
    ) -> AppResult<Reservation> {
        Self::validate_amount(amount)?;

        // Serialize payments per reservation so two concurrent payments
        // cannot both pass the overpayment check
        let _entity_guard = self.entity_locks.acquire(id).await;

        let mut reservation = self.get_reservation(id).await?;
        let balance = reservation
            .balance()
            .ok_or_else(|| AppError::PriceNotSpecified(id.to_string()))?;
        Self::check_overpayment(amount, balance)?;

        let debited = self
            .debit_credit(reservation.client_id, method, amount)
            .await?;

        reservation.record_payment(PaymentEntry::new(method, amount, note));
        match self.reservations.update(&reservation).await {
            Ok(updated) => {
                info!(
                    "Applied {} {} to reservation {}, balance {:?}",
                    amount,
                    method,
                    updated.id,
                    updated.balance()
                );
                Ok(updated)
            }
            Err(e) => {
                if let Some(client_id) = debited {
                    self.refund_credit(client_id, amount).await;
                }
                Err(e)
            }
        }
    }

    /// Advance a reservation to a new lifecycle status
    ///
    /// Entering `cancelled` releases the calendar interval; entering
    /// `checked_out` grants loyalty points exactly once, recorded
    /// permanently on the reservation. A transition to the current status
    /// is an idempotent no-op.
    #[instrument(skip(self))]
    pub async fn transition_status(
        &self,
        id: Uuid,
        new_status: ReservationStatus,
    ) -> AppResult<Reservation> {
        let _entity_guard = self.entity_locks.acquire(id).await;

        let mut reservation = self.get_reservation(id).await?;
        if reservation.status == new_status {
            return Ok(reservation);
        }
        if !reservation.status.can_transition_to(new_status) {
            return Err(AppError::IllegalTransition {
                from: reservation.status.to_string(),
                to: new_status.to_string(),
            });
        }

        let previous = reservation.status;
        reservation.status = new_status;
        reservation.updated_at = Utc::now();

        let mut granted_to: Option<(Uuid, i64)> = None;
        if new_status == ReservationStatus::CheckedOut && !reservation.loyalty_granted() {
            let (points, recipient) = self.loyalty.accrue_reservation(&reservation).await?;
            reservation.points_granted = Some(points);
            // Compensation must target the client the accrual actually
            // credited, which may not be the reservation's own client_id
            if points > 0 {
                if let Some(client_id) = recipient {
                    granted_to = Some((client_id, points));
                }
            }
        }

        match self.reservations.update(&reservation).await {
            Ok(updated) => {
                if new_status == ReservationStatus::Cancelled {
                    self.calendar.release(updated.id);
                }
                info!(
                    "Reservation {} transitioned {} -> {}",
                    updated.id, previous, new_status
                );
                Ok(updated)
            }
            Err(e) => {
                // Roll the external grant back so a failed write cannot
                // leave points credited without a record on the entity
                if let Some((client_id, points)) = granted_to {
                    if let Err(refund_err) =
                        self.clients.adjust_client_points(client_id, -points).await
                    {
                        warn!(
                            "Failed to compensate {} points for client {}: {}",
                            points, client_id, refund_err
                        );
                    }
                }
                Err(e)
            }
        }
    }

    /// Check whether a location is free for a date range
    #[instrument(skip(self))]
    pub async fn query_availability(
        &self,
        location_id: Uuid,
        arrival: NaiveDate,
        departure: Option<NaiveDate>,
    ) -> AppResult<bool> {
        let location = self.require_location(location_id).await?;
        let departure = Self::validate_dates(location.kind, arrival, departure)?;
        Ok(self
            .calendar
            .is_available(location.id, location.kind, arrival, departure))
    }

    // ==================== Orders ====================

    /// Open a new order at a location
    #[instrument(skip(self, request), fields(location_id = %request.location_id))]
    pub async fn create_order(&self, request: CreateOrderRequest) -> AppResult<Order> {
        self.require_location(request.location_id).await?;
        if request.total < Decimal::ZERO {
            return Err(AppError::InvalidAmount(format!(
                "order total cannot be negative, got {}",
                request.total
            )));
        }

        let order = Order::new(request.location_id, request.client_id, request.total);
        let created = self.orders.create(&order).await?;
        info!("Created order {} totalling {}", created.id, created.total);
        Ok(created)
    }

    /// Fetch an order by id
    pub async fn get_order(&self, id: Uuid) -> AppResult<Order> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::OrderNotFound(id.to_string()))
    }

    /// List orders, newest first
    pub async fn list_orders(&self, limit: i64, offset: i64) -> AppResult<Vec<Order>> {
        self.orders.find_all(limit, offset).await
    }

    /// List orders in a given lifecycle status
    pub async fn list_orders_by_status(&self, status: OrderStatus) -> AppResult<Vec<Order>> {
        self.orders.find_by_status(status).await
    }

    /// List orders placed at a location
    pub async fn list_orders_by_location(&self, location_id: Uuid) -> AppResult<Vec<Order>> {
        self.orders.find_by_location(location_id).await
    }

    /// Apply a payment to an order's ledger
    #[instrument(skip(self, note))]
    pub async fn apply_order_payment(
        &self,
        id: Uuid,
        method: PaymentMethod,
        amount: Decimal,
        note: Option<String>,
    ) -> AppResult<Order> {
        Self::validate_amount(amount)?;

        let _entity_guard = self.entity_locks.acquire(id).await;

        let mut order = self.get_order(id).await?;
        Self::check_overpayment(amount, order.balance())?;

        let debited = self.debit_credit(order.client_id, method, amount).await?;

        order.record_payment(PaymentEntry::new(method, amount, note));
        match self.orders.update(&order).await {
            Ok(updated) => {
                info!(
                    "Applied {} {} to order {}, balance {}",
                    amount,
                    method,
                    updated.id,
                    updated.balance()
                );
                Ok(updated)
            }
            Err(e) => {
                if let Some(client_id) = debited {
                    self.refund_credit(client_id, amount).await;
                }
                Err(e)
            }
        }
    }

    /// Advance an order to a new lifecycle status
    ///
    /// Entering `completed` grants loyalty points exactly once.
    #[instrument(skip(self))]
    pub async fn transition_order_status(
        &self,
        id: Uuid,
        new_status: OrderStatus,
    ) -> AppResult<Order> {
        let _entity_guard = self.entity_locks.acquire(id).await;

        let mut order = self.get_order(id).await?;
        if order.status == new_status {
            return Ok(order);
        }
        if !order.status.can_transition_to(new_status) {
            return Err(AppError::IllegalTransition {
                from: order.status.to_string(),
                to: new_status.to_string(),
            });
        }

        let previous = order.status;
        order.status = new_status;
        order.updated_at = Utc::now();

        let mut granted_to: Option<(Uuid, i64)> = None;
        if new_status == OrderStatus::Completed && !order.loyalty_granted() {
            let points = self.loyalty.accrue_order(&order).await?;
            order.points_granted = Some(points);
            if points > 0 {
                if let Some(client_id) = order.client_id {
                    granted_to = Some((client_id, points));
                }
            }
        }

        match self.orders.update(&order).await {
            Ok(updated) => {
                info!(
                    "Order {} transitioned {} -> {}",
                    updated.id, previous, new_status
                );
                Ok(updated)
            }
            Err(e) => {
                if let Some((client_id, points)) = granted_to {
                    if let Err(refund_err) =
                        self.clients.adjust_client_points(client_id, -points).await
                    {
                        warn!(
                            "Failed to compensate {} points for client {}: {}",
                            points, client_id, refund_err
                        );
                    }
                }
                Err(e)
            }
        }
    }

    /// Delete an order
    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: Uuid) -> AppResult<()> {
        let _entity_guard = self.entity_locks.acquire(id).await;

        if !self.orders.delete(id).await? {
            return Err(AppError::OrderNotFound(id.to_string()));
        }
        info!("Deleted order {}", id);
        Ok(())
    }
}
