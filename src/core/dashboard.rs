//! Dashboard aggregator - read-only summary statistics for an owner.
//!
//! Everything here is a computed view over the other components; nothing is
//! stored. The aggregation window is derived from a `today` argument rather
//! than the wall clock so callers (and tests) control which month "current"
//! means.

use crate::auth::{self, Identity};
use crate::entities::{
    Complaint, ComplaintStatus, Payment, PaymentStatus, Room, RoomStatus, Tenant, complaint,
    payment, room, tenant,
};
use crate::errors::Result;
use chrono::{Datelike, NaiveDate};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, Iterable, JoinType, PaginatorTrait, QueryFilter,
    QuerySelect, RelationTrait,
};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::instrument;

/// How many months the revenue trend looks back, including the current one.
const TREND_MONTHS: usize = 6;

/// Verified revenue for one month of the trend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthRevenue {
    /// First day of the bucket's month
    pub month: NaiveDate,
    /// Sum of verified payment amounts for that billing month
    pub total: i64,
}

/// Room count for one occupancy status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    /// The occupancy status
    pub status: RoomStatus,
    /// Number of the owner's rooms currently in it
    pub count: u64,
}

/// The owner's dashboard summary.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    /// Total number of rooms
    pub total_rooms: u64,
    /// Rooms currently EMPTY
    pub empty_rooms: u64,
    /// Tenants with no archival timestamp
    pub active_tenants: u64,
    /// Verified revenue for the current calendar month
    pub monthly_revenue: i64,
    /// Complaints still in NEW
    pub pending_complaints: u64,
    /// Verified revenue per month, oldest first, zero-filled
    pub revenue_trend: Vec<MonthRevenue>,
    /// Rooms grouped by occupancy status
    pub room_status_distribution: Vec<StatusCount>,
}

// Note: from_ymd_opt only returns None for invalid dates (e.g., Feb 30).
// Day 1 of a month taken from an existing date is always valid.
#[allow(clippy::expect_used)]
fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .expect("first day of any valid month is always valid")
}

#[allow(clippy::expect_used)]
fn first_of_next_month(month_start: NaiveDate) -> NaiveDate {
    if month_start.month() == 12 {
        NaiveDate::from_ymd_opt(month_start.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(month_start.year(), month_start.month() + 1, 1)
    }
    .expect("first day of the next month is always valid")
}

#[allow(clippy::expect_used)]
fn months_back(month_start: NaiveDate, n: usize) -> NaiveDate {
    let mut year = month_start.year();
    let mut month = month_start.month();
    for _ in 0..n {
        if month == 1 {
            year -= 1;
            month = 12;
        } else {
            month -= 1;
        }
    }
    NaiveDate::from_ymd_opt(year, month, 1).expect("first day of any valid month is always valid")
}

/// Computes the owner's dashboard for the month containing `today`.
#[instrument(skip(db, identity))]
pub async fn owner_dashboard(
    db: &DatabaseConnection,
    identity: &Identity,
    today: NaiveDate,
) -> Result<DashboardStats> {
    let owner = auth::require_owner(db, identity).await?;

    let month_start = first_of_month(today);
    let next_month = first_of_next_month(month_start);
    let window_start = months_back(month_start, TREND_MONTHS - 1);

    let total_rooms = Room::find()
        .filter(room::Column::OwnerId.eq(owner.id))
        .count(db)
        .await?;
    let empty_rooms = Room::find()
        .filter(room::Column::OwnerId.eq(owner.id))
        .filter(room::Column::Status.eq(RoomStatus::Empty))
        .count(db)
        .await?;

    let active_tenants = Tenant::find()
        .filter(tenant::Column::OwnerId.eq(owner.id))
        .filter(tenant::Column::ArchivedAt.is_null())
        .count(db)
        .await?;

    let pending_complaints = Complaint::find()
        .join(JoinType::InnerJoin, complaint::Relation::Tenant.def())
        .filter(tenant::Column::OwnerId.eq(owner.id))
        .filter(complaint::Column::Status.eq(ComplaintStatus::New))
        .count(db)
        .await?;

    // One query covers both the current-month figure and the 6-month trend
    let verified_in_window = Payment::find()
        .join(JoinType::InnerJoin, payment::Relation::Tenant.def())
        .filter(tenant::Column::OwnerId.eq(owner.id))
        .filter(payment::Column::Status.eq(PaymentStatus::Verified))
        .filter(payment::Column::BillingMonth.gte(window_start))
        .filter(payment::Column::BillingMonth.lt(next_month))
        .all(db)
        .await?;

    let mut by_month: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    let mut bucket = window_start;
    for _ in 0..TREND_MONTHS {
        by_month.insert(bucket, 0);
        bucket = first_of_next_month(bucket);
    }
    for p in &verified_in_window {
        if let Some(total) = by_month.get_mut(&p.billing_month) {
            *total += p.amount;
        }
    }

    let monthly_revenue = by_month.get(&month_start).copied().unwrap_or_default();
    let revenue_trend = by_month
        .into_iter()
        .map(|(month, total)| MonthRevenue { month, total })
        .collect();

    let mut room_status_distribution = Vec::new();
    for status in RoomStatus::iter() {
        let count = Room::find()
            .filter(room::Column::OwnerId.eq(owner.id))
            .filter(room::Column::Status.eq(status))
            .count(db)
            .await?;
        room_status_distribution.push(StatusCount { status, count });
    }

    Ok(DashboardStats {
        total_rooms,
        empty_rooms,
        active_tenants,
        monthly_revenue,
        pending_complaints,
        revenue_trend,
        room_status_distribution,
    })
}
