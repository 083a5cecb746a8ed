//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::{AuthApi, RowsApi};
use crate::config::ServerConfig;
use crate::services::{AccountService, MenuService, OrderService};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The backing-service client is injected here
/// once at construction; there is no other way for a flow to reach the
/// external service, and no shared mutable state lives between requests.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    auth: Arc<dyn AuthApi>,
    accounts: AccountService,
    menu: MenuService,
    orders: OrderService,
}

impl AppState {
    /// Create a new application state around an injected backend client.
    ///
    /// `auth` and `rows` are usually the same `SupabaseClient`; tests pass
    /// an in-memory implementation instead.
    #[must_use]
    pub fn new(config: ServerConfig, auth: Arc<dyn AuthApi>, rows: Arc<dyn RowsApi>) -> Self {
        let accounts = AccountService::new(Arc::clone(&auth), Arc::clone(&rows));
        let menu = MenuService::new(Arc::clone(&rows));
        let orders = OrderService::new(rows);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                auth,
                accounts,
                menu,
                orders,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get the auth API used by the credential gateway.
    #[must_use]
    pub fn auth(&self) -> &Arc<dyn AuthApi> {
        &self.inner.auth
    }

    /// Get the registration/login flow.
    #[must_use]
    pub fn accounts(&self) -> &AccountService {
        &self.inner.accounts
    }

    /// Get the menu reader.
    #[must_use]
    pub fn menu(&self) -> &MenuService {
        &self.inner.menu
    }

    /// Get the order submission/history flows.
    #[must_use]
    pub fn orders(&self) -> &OrderService {
        &self.inner.orders
    }
}
