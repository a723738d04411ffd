use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::menu::{CoffeeType, Flavor, MilkType, Size};
use crate::pricing::{calculate_prep_time, calculate_price, Price};
use crate::validation::OrderSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Received,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

serde_plain::derive_display_from_serialize!(OrderStatus);
serde_plain::derive_fromstr_from_deserialize!(OrderStatus);

impl OrderStatus {
    /// The only status an order may move forward to, if any.
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Received => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Completed),
            OrderStatus::Completed | OrderStatus::Cancelled => None,
        }
    }

    pub fn can_cancel(self) -> bool {
        matches!(self, OrderStatus::Received | OrderStatus::Preparing)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Order {
    pub order_id: String,
    pub size: Size,
    pub coffee_type: CoffeeType,
    pub flavors: Vec<Flavor>,
    pub milk: MilkType,
    pub extra_shot: u8,
    pub special_instructions: Option<String>,
    pub estimated_price: Price,
    pub estimated_prep_time: u32,
    pub order_time: DateTime<Utc>,
    pub status: OrderStatus,
    pub estimated_ready_time: Option<DateTime<Utc>>,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match serde_json::to_string_pretty(self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "Order"),
        }
    }
}

impl Order {
    /// Builds a freshly received order, deriving price and prep time from the menu.
    pub fn new(order_id: String, spec: OrderSpec) -> Self {
        let estimated_price = calculate_price(&spec);
        let estimated_prep_time = calculate_prep_time(&spec);

        Self {
            order_id,
            size: spec.size,
            coffee_type: spec.coffee_type,
            flavors: spec.flavors,
            milk: spec.milk,
            extra_shot: spec.extra_shot,
            special_instructions: spec.special_instructions,
            estimated_price,
            estimated_prep_time,
            order_time: Utc::now(),
            status: OrderStatus::Received,
            estimated_ready_time: None,
        }
    }

    /// Moves the order to `to`, enforcing the lifecycle.
    ///
    /// Cancellation goes through [`Order::cancel`]; everything else must be
    /// the immediate successor of the current status.
    pub fn transition(&mut self, to: OrderStatus) -> AppResult<()> {
        if to == OrderStatus::Cancelled {
            return self.cancel();
        }
        if self.status.next() != Some(to) {
            return Err(AppError::InvalidTransition {
                from: self.status,
                to,
            });
        }

        self.status = to;
        self.estimated_ready_time = match to {
            OrderStatus::Preparing => {
                Some(Utc::now() + Duration::minutes(i64::from(self.estimated_prep_time)))
            }
            _ => self.estimated_ready_time,
        };
        Ok(())
    }

    pub fn cancel(&mut self) -> AppResult<()> {
        if !self.status.can_cancel() {
            return Err(AppError::CannotCancel {
                status: self.status,
            });
        }
        self.status = OrderStatus::Cancelled;
        self.estimated_ready_time = None;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Orders {
    by_id: HashMap<String, Order>,
    // Insertion order for listing.
    ids: Vec<String>,
}

/// In-memory order storage, shared between handlers through `AppState`.
///
/// Contents live only as long as the process.
#[derive(Clone, Default)]
pub struct OrderStore {
    orders: Arc<RwLock<Orders>>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new order under a fresh identifier.
    pub async fn create(&self, spec: OrderSpec) -> Order {
        let mut orders = self.orders.write().await;

        let mut order_id = Uuid::new_v4().to_string();
        while orders.by_id.contains_key(&order_id) {
            order_id = Uuid::new_v4().to_string();
        }

        let order = Order::new(order_id.clone(), spec);
        orders.ids.push(order_id.clone());
        orders.by_id.insert(order_id, order.clone());

        info!(
            order_id = %order.order_id,
            price = %order.estimated_price,
            prep_minutes = order.estimated_prep_time,
            "order received"
        );
        debug!("stored order:\n{}", order);
        order
    }

    pub async fn list(&self) -> Vec<Order> {
        let orders = self.orders.read().await;
        orders
            .ids
            .iter()
            .filter_map(|id| orders.by_id.get(id).cloned())
            .collect()
    }

    pub async fn get(&self, order_id: &str) -> AppResult<Order> {
        let orders = self.orders.read().await;
        orders
            .by_id
            .get(order_id)
            .cloned()
            .ok_or_else(|| AppError::OrderNotFound(order_id.to_string()))
    }

    pub async fn update_status(&self, order_id: &str, status: OrderStatus) -> AppResult<Order> {
        self.modify(order_id, |order| order.transition(status)).await
    }

    pub async fn cancel(&self, order_id: &str) -> AppResult<Order> {
        self.modify(order_id, Order::cancel).await
    }

    pub async fn len(&self) -> usize {
        self.orders.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn modify<F>(&self, order_id: &str, change: F) -> AppResult<Order>
    where
        F: FnOnce(&mut Order) -> AppResult<()>,
    {
        let mut orders = self.orders.write().await;
        let order = orders
            .by_id
            .get_mut(order_id)
            .ok_or_else(|| AppError::OrderNotFound(order_id.to_string()))?;

        let previous = order.status;
        change(order)?;
        info!(order_id, from = %previous, to = %order.status, "order status changed");
        Ok(order.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    fn spec() -> OrderSpec {
        OrderSpec {
            size: Size::Small,
            coffee_type: CoffeeType::Hot,
            flavors: vec![],
            milk: MilkType::Whole,
            extra_shot: 0,
            special_instructions: None,
        }
    }

    fn order_in(status: OrderStatus) -> Order {
        let mut order = Order::new("test".into(), spec());
        order.status = status;
        order
    }

    #[test]
    fn new_order_is_received_with_derived_fields() {
        let order = Order::new("abc".into(), spec());
        assert_eq!(order.status, OrderStatus::Received);
        assert_eq!(order.estimated_price, Price::from_cents(350));
        assert_eq!(order.estimated_prep_time, 3);
        assert!(order.estimated_ready_time.is_none());
    }

    #[rstest]
    #[case(OrderStatus::Received, OrderStatus::Preparing)]
    #[case(OrderStatus::Preparing, OrderStatus::Ready)]
    #[case(OrderStatus::Ready, OrderStatus::Completed)]
    fn forward_steps_are_allowed(#[case] from: OrderStatus, #[case] to: OrderStatus) {
        let mut order = order_in(from);
        order.transition(to).unwrap();
        assert_eq!(order.status, to);
    }

    #[rstest]
    #[case(OrderStatus::Received, OrderStatus::Ready)]
    #[case(OrderStatus::Received, OrderStatus::Received)]
    #[case(OrderStatus::Ready, OrderStatus::Preparing)]
    #[case(OrderStatus::Completed, OrderStatus::Received)]
    #[case(OrderStatus::Cancelled, OrderStatus::Preparing)]
    fn other_steps_are_rejected(#[case] from: OrderStatus, #[case] to: OrderStatus) {
        let mut order = order_in(from);
        assert!(matches!(
            order.transition(to),
            Err(AppError::InvalidTransition { .. })
        ));
        assert_eq!(order.status, from);
    }

    #[rstest]
    #[case(OrderStatus::Received, true)]
    #[case(OrderStatus::Preparing, true)]
    #[case(OrderStatus::Ready, false)]
    #[case(OrderStatus::Completed, false)]
    #[case(OrderStatus::Cancelled, false)]
    fn cancel_only_before_ready(#[case] from: OrderStatus, #[case] allowed: bool) {
        let mut order = order_in(from);
        assert_eq!(order.cancel().is_ok(), allowed);
        let expected = if allowed { OrderStatus::Cancelled } else { from };
        assert_eq!(order.status, expected);
    }

    #[test]
    fn preparing_sets_ready_time_and_cancel_clears_it() {
        let mut order = order_in(OrderStatus::Received);
        order.transition(OrderStatus::Preparing).unwrap();
        let ready = order.estimated_ready_time.unwrap();
        assert!(ready > order.order_time);

        order.transition(OrderStatus::Cancelled).unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert!(order.estimated_ready_time.is_none());
    }

    #[test]
    fn order_survives_a_json_round_trip() {
        let mut order = Order::new(
            "abc".into(),
            OrderSpec {
                size: Size::Large,
                coffee_type: CoffeeType::Iced,
                flavors: vec![Flavor::Hazelnut, Flavor::Caramel],
                milk: MilkType::Oat,
                extra_shot: 2,
                special_instructions: Some("Light ice".into()),
            },
        );
        order.transition(OrderStatus::Preparing).unwrap();

        let json = order.to_string();
        let parsed: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.estimated_price, Price::from_cents(810));
        assert_eq!(parsed.status, OrderStatus::Preparing);
        assert_eq!(parsed.flavors, order.flavors);
        assert_eq!(parsed.order_time, order.order_time);
        assert_eq!(parsed.estimated_ready_time, order.estimated_ready_time);
    }

    #[test]
    fn price_is_not_recomputed_on_status_change() {
        let mut order = order_in(OrderStatus::Received);
        order.estimated_price = Price::from_cents(1);
        order.transition(OrderStatus::Preparing).unwrap();
        assert_eq!(order.estimated_price, Price::from_cents(1));
    }

    #[tokio::test]
    async fn store_lists_in_insertion_order() {
        let store = OrderStore::new();
        let first = store.create(spec()).await;
        let second = store.create(spec()).await;
        let third = store.create(spec()).await;

        let ids: Vec<_> = store.list().await.into_iter().map(|o| o.order_id).collect();
        assert_eq!(ids, vec![first.order_id, second.order_id, third.order_id]);
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn store_ids_are_unique() {
        let store = OrderStore::new();
        let mut ids = HashSet::new();
        for _ in 0..100 {
            assert!(ids.insert(store.create(spec()).await.order_id));
        }
    }

    #[tokio::test]
    async fn store_reports_missing_orders() {
        let store = OrderStore::new();
        assert!(store.is_empty().await);
        assert!(matches!(
            store.get("missing").await,
            Err(AppError::OrderNotFound(id)) if id == "missing"
        ));
        assert!(matches!(
            store.cancel("missing").await,
            Err(AppError::OrderNotFound(_))
        ));
        assert!(matches!(
            store.update_status("missing", OrderStatus::Preparing).await,
            Err(AppError::OrderNotFound(_))
        ));
    }

    #[tokio::test]
    async fn cancel_keeps_the_order_listed() {
        let store = OrderStore::new();
        let order = store.create(spec()).await;

        let cancelled = store.cancel(&order.order_id).await.unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert_eq!(
            store.get(&order.order_id).await.unwrap().status,
            OrderStatus::Cancelled
        );
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn cancel_after_ready_is_rejected() {
        let store = OrderStore::new();
        let id = store.create(spec()).await.order_id;
        store.update_status(&id, OrderStatus::Preparing).await.unwrap();
        store.update_status(&id, OrderStatus::Ready).await.unwrap();

        assert!(matches!(
            store.cancel(&id).await,
            Err(AppError::CannotCancel {
                status: OrderStatus::Ready
            })
        ));
    }
}
