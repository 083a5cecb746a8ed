//! Order submission, finalization and history flows.
//!
//! Every operation here is scoped to the authenticated identity: the owner
//! column is written from the resolved identity on insert, and history reads
//! carry a mandatory `user_id` filter. A single-row insert is atomic at the
//! storage layer, so a persistence failure never leaves a partial order.

use std::sync::Arc;

use sabor_core::UserId;

use crate::backend::{BackendError, RowsApi, SelectQuery, SortDir};
use crate::error::ApiError;
use crate::models::{FinalizedOrder, NewFinalizedOrder, NewOrder, Order};

/// Table holding plain checkout orders.
const ORDERS_TABLE: &str = "orders";
/// Table holding checkouts with delivery details.
const FINALIZED_TABLE: &str = "finalized_orders";

/// Order lifecycle flows.
#[derive(Clone)]
pub struct OrderService {
    rows: Arc<dyn RowsApi>,
}

impl OrderService {
    /// Create the service around an injected rows client.
    #[must_use]
    pub fn new(rows: Arc<dyn RowsApi>) -> Self {
        Self { rows }
    }

    /// Persist a cart checkout as a pending order owned by `owner`.
    ///
    /// # Errors
    ///
    /// `Validation` before any store call; `Persistence` if the insert fails.
    pub async fn submit(&self, owner: &UserId, order: NewOrder) -> Result<Order, ApiError> {
        order.validate()?;

        let row = order.into_row(owner).map_err(BackendError::Parse)?;
        let stored = self.rows.insert(ORDERS_TABLE, row).await?;

        Order::from_row(stored).map_err(|err| BackendError::Parse(err).into())
    }

    /// Persist a checkout with delivery details, owned by `owner`.
    ///
    /// # Errors
    ///
    /// `Validation` before any store call; `Persistence` if the insert fails.
    pub async fn finalize(
        &self,
        owner: &UserId,
        order: NewFinalizedOrder,
    ) -> Result<FinalizedOrder, ApiError> {
        order.validate()?;

        let row = order.into_row(owner).map_err(BackendError::Parse)?;
        let stored = self.rows.insert(FINALIZED_TABLE, row).await?;

        FinalizedOrder::from_row(stored).map_err(|err| BackendError::Parse(err).into())
    }

    /// The owner's past orders, newest first.
    ///
    /// The `user_id` filter is mandatory - no path exists to read another
    /// identity's orders. A single corrupt row fails the whole request
    /// rather than silently hiding data loss.
    ///
    /// # Errors
    ///
    /// `Persistence` if the store read fails, `DataIntegrity` if any stored
    /// row cannot be decoded.
    pub async fn history(&self, owner: &UserId) -> Result<Vec<Order>, ApiError> {
        let query = SelectQuery::new()
            .eq("user_id", owner.as_str())
            .order_by("created_at", SortDir::Desc);
        let rows = self.rows.select(ORDERS_TABLE, query).await?;

        rows.into_iter()
            .map(|row| {
                Order::from_row(row).map_err(|err| {
                    ApiError::DataIntegrity(format!("order row could not be decoded: {err}"))
                })
            })
            .collect()
    }
}
