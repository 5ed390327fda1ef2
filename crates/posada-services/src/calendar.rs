//! Calendar index
//!
//! A derived projection of active (non-cancelled) reservations, keyed by
//! location and ordered by arrival date, so conflict checks are a bounded
//! range scan rather than a walk over every reservation.
//!
//! Intervals are normalized half-open: a room booking occupies
//! `[arrival, departure)` and a table booking occupies
//! `[arrival, arrival + 1 day)`, which makes the table rule (same-day
//! equality) and the room rule (interval intersection) one test.
//!
//! The index never mutates reservation records; callers insert on create,
//! re-index on update, and release on cancellation or deletion.

use chrono::NaiveDate;
use posada_core::models::LocationKind;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// A booked half-open interval on a location's calendar
#[derive(Debug, Clone, Copy)]
struct BookedInterval {
    reservation_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
}

type LocationCalendar = BTreeMap<NaiveDate, Vec<BookedInterval>>;

/// Per-location booked-interval index
#[derive(Default)]
pub struct CalendarIndex {
    by_location: RwLock<HashMap<Uuid, LocationCalendar>>,
    // Reverse index so release() needs only the reservation id
    by_reservation: RwLock<HashMap<Uuid, (Uuid, NaiveDate)>>,
}

impl CalendarIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize a booking to a half-open interval
    ///
    /// Tables always occupy a single day. Rooms with a missing or
    /// non-positive range are widened to one day so the interval is never
    /// empty.
    pub fn normalize_interval(
        kind: LocationKind,
        arrival: NaiveDate,
        departure: Option<NaiveDate>,
    ) -> (NaiveDate, NaiveDate) {
        let next_day = arrival.succ_opt().unwrap_or(arrival);
        match kind {
            LocationKind::Table => (arrival, next_day),
            LocationKind::Room => {
                let end = departure.unwrap_or(next_day);
                (arrival, end.max(next_day))
            }
        }
    }

    /// Return the first active reservation colliding with the proposed
    /// interval, if any
    ///
    /// Two half-open intervals `[a1, d1)` and `[a2, d2)` overlap iff
    /// `a1 < d2 && a2 < d1`. `exclude` skips a reservation's own prior
    /// interval during updates.
    pub fn conflicts(
        &self,
        location_id: Uuid,
        kind: LocationKind,
        arrival: NaiveDate,
        departure: Option<NaiveDate>,
        exclude: Option<Uuid>,
    ) -> Option<Uuid> {
        let (start, end) = Self::normalize_interval(kind, arrival, departure);
        let map = self.by_location.read().unwrap_or_else(|e| e.into_inner());
        let calendar = map.get(&location_id)?;

        // Every indexed interval starting before `end` is a candidate;
        // it collides iff it also ends after `start`.
        for intervals in calendar.range(..end).map(|(_, v)| v) {
            for interval in intervals {
                if exclude == Some(interval.reservation_id) {
                    continue;
                }
                if interval.end > start {
                    return Some(interval.reservation_id);
                }
            }
        }
        None
    }

    /// Check availability of an interval
    pub fn is_available(
        &self,
        location_id: Uuid,
        kind: LocationKind,
        arrival: NaiveDate,
        departure: Option<NaiveDate>,
    ) -> bool {
        self.conflicts(location_id, kind, arrival, departure, None)
            .is_none()
    }

    /// Index a reservation's interval
    pub fn insert(
        &self,
        location_id: Uuid,
        kind: LocationKind,
        reservation_id: Uuid,
        arrival: NaiveDate,
        departure: Option<NaiveDate>,
    ) {
        let (start, end) = Self::normalize_interval(kind, arrival, departure);

        // Replace any prior interval for this reservation (updates)
        self.release(reservation_id);

        let mut map = self.by_location.write().unwrap_or_else(|e| e.into_inner());
        map.entry(location_id)
            .or_default()
            .entry(start)
            .or_default()
            .push(BookedInterval {
                reservation_id,
                start,
                end,
            });

        let mut reverse = self
            .by_reservation
            .write()
            .unwrap_or_else(|e| e.into_inner());
        reverse.insert(reservation_id, (location_id, start));

        debug!(
            "Indexed reservation {} on {} as [{}, {})",
            reservation_id, location_id, start, end
        );
    }

    /// Remove a reservation's interval from conflict consideration
    ///
    /// Called on cancellation or deletion. Returns false if the
    /// reservation was not indexed.
    pub fn release(&self, reservation_id: Uuid) -> bool {
        let mut reverse = self
            .by_reservation
            .write()
            .unwrap_or_else(|e| e.into_inner());
        let Some((location_id, start)) = reverse.remove(&reservation_id) else {
            return false;
        };
        drop(reverse);

        let mut map = self.by_location.write().unwrap_or_else(|e| e.into_inner());
        if let Some(calendar) = map.get_mut(&location_id) {
            if let Some(intervals) = calendar.get_mut(&start) {
                intervals.retain(|iv| iv.reservation_id != reservation_id);
                if intervals.is_empty() {
                    calendar.remove(&start);
                }
            }
            if calendar.is_empty() {
                map.remove(&location_id);
            }
        }

        debug!("Released reservation {} from calendar", reservation_id);
        true
    }

    /// Rebuild the projection from stored reservations
    ///
    /// Cancelled reservations are skipped; they hold no interval.
    pub fn rebuild<'a, I>(&self, reservations: I)
    where
        I: IntoIterator<Item = &'a posada_core::models::Reservation>,
    {
        for reservation in reservations {
            if reservation.status.is_active() {
                self.insert(
                    reservation.location_id,
                    reservation.kind,
                    reservation.id,
                    reservation.arrival,
                    reservation.departure,
                );
            }
        }
    }
}
