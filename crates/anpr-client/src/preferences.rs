//! Locally persisted UI preferences.

use crate::error::StorageError;
use crate::storage::{ACTIVE_TAB_KEY, CUSTOM_TAB_ORDERS_KEY, DARK_MODE_KEY, LocalStore};
use anpr_core::{TabName, UserId};
use anpr_policy::TabOrder;
use std::collections::BTreeMap;
use std::sync::Arc;

/// `{user_id: {tab_id: index}}` as stored under `customTabOrders`.
type TabOrders = BTreeMap<String, TabOrder>;

/// Active tab, dark mode and per-user tab orders.
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn LocalStore>,
}

impl Preferences {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    /// Last selected tab.
    pub fn active_tab(&self) -> Option<TabName> {
        self.store
            .get(ACTIVE_TAB_KEY)
            .filter(|name| !name.trim().is_empty())
            .map(|name| TabName::parse(&name))
    }

    pub fn set_active_tab(&self, tab: &TabName) -> Result<(), StorageError> {
        self.store.set(ACTIVE_TAB_KEY, tab.as_str())
    }

    pub fn dark_mode(&self) -> bool {
        self.store
            .get(DARK_MODE_KEY)
            .is_some_and(|value| value.trim() == "true")
    }

    pub fn set_dark_mode(&self, enabled: bool) -> Result<(), StorageError> {
        self.store
            .set(DARK_MODE_KEY, if enabled { "true" } else { "false" })
    }

    /// The custom order saved for `user`, if any.
    pub fn tab_order(&self, user: &UserId) -> Option<TabOrder> {
        self.tab_orders().remove(user.as_str())
    }

    /// Save `order` for `user`, leaving other users' orders untouched.
    pub fn save_tab_order(&self, user: &UserId, order: &TabOrder) -> Result<(), StorageError> {
        let mut orders = self.tab_orders();
        orders.insert(user.as_str().to_string(), order.clone());
        self.write_tab_orders(&orders)
    }

    /// Remove the custom order for `user` only.
    pub fn reset_tab_order(&self, user: &UserId) -> Result<(), StorageError> {
        let mut orders = self.tab_orders();
        if orders.remove(user.as_str()).is_none() {
            return Ok(());
        }
        if orders.is_empty() {
            self.store.remove(CUSTOM_TAB_ORDERS_KEY)
        } else {
            self.write_tab_orders(&orders)
        }
    }

    fn tab_orders(&self) -> TabOrders {
        let Some(raw) = self.store.get(CUSTOM_TAB_ORDERS_KEY) else {
            return TabOrders::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Ignoring unreadable custom tab orders");
            TabOrders::new()
        })
    }

    fn write_tab_orders(&self, orders: &TabOrders) -> Result<(), StorageError> {
        let raw = serde_json::to_string(orders)?;
        self.store.set(CUSTOM_TAB_ORDERS_KEY, &raw)
    }
}
