//! In-memory backend for tests.
//!
//! Implements [`AuthApi`] and [`RowsApi`] against process-local state so the
//! full router can be exercised without a live service. Keeps per-endpoint
//! call counters (several auth-gate properties are "zero store calls
//! happened") and supports injecting failures per table or per auth step.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Duration, SecondsFormat, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use sabor_core::UserId;

use super::{AuthApi, AuthSession, BackendError, RowsApi, SelectQuery, SortDir};
use async_trait::async_trait;

#[derive(Debug, Clone)]
struct StoredUser {
    id: String,
    password: String,
}

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<String, StoredUser>,
    tokens: HashMap<String, String>,
    tables: HashMap<String, Vec<Value>>,
    next_row_id: i64,
    insert_seq: i64,
    sign_up_calls: usize,
    sign_in_calls: usize,
    resolve_calls: usize,
    insert_calls: usize,
    select_calls: usize,
    fail_sign_in: bool,
    fail_inserts: HashSet<String>,
    fail_selects: HashSet<String>,
}

/// In-memory auth + rows backend for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryBackend {
    /// Creates a new, empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().expect("backend state mutex poisoned")
    }

    /// Configures sign-in to fail (simulates session issuance outage).
    pub fn set_fail_sign_in(&self, fail: bool) {
        self.lock().fail_sign_in = fail;
    }

    /// Configures inserts into `table` to fail.
    pub fn set_fail_insert(&self, table: &str) {
        self.lock().fail_inserts.insert(table.to_owned());
    }

    /// Configures selects from `table` to fail.
    pub fn set_fail_select(&self, table: &str) {
        self.lock().fail_selects.insert(table.to_owned());
    }

    /// Places a raw row directly into a table, bypassing insert bookkeeping.
    /// Used to seed menu rows and corrupt order rows.
    pub fn push_row(&self, table: &str, row: Value) {
        self.lock().tables.entry(table.to_owned()).or_default().push(row);
    }

    /// Returns a snapshot of the rows currently stored in `table`.
    #[must_use]
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.lock().tables.get(table).cloned().unwrap_or_default()
    }

    /// Number of rows currently stored in `table`.
    #[must_use]
    pub fn row_count(&self, table: &str) -> usize {
        self.lock().tables.get(table).map_or(0, Vec::len)
    }

    /// Total insert calls made against the rows API.
    #[must_use]
    pub fn insert_calls(&self) -> usize {
        self.lock().insert_calls
    }

    /// Total select calls made against the rows API.
    #[must_use]
    pub fn select_calls(&self) -> usize {
        self.lock().select_calls
    }

    /// Total calls of any kind made against the rows API.
    #[must_use]
    pub fn store_calls(&self) -> usize {
        let state = self.lock();
        state.insert_calls + state.select_calls
    }

    /// Total sign-up calls made against the auth API.
    #[must_use]
    pub fn sign_up_calls(&self) -> usize {
        self.lock().sign_up_calls
    }

    /// Total token-resolution calls made against the auth API.
    #[must_use]
    pub fn resolve_calls(&self) -> usize {
        self.lock().resolve_calls
    }
}

#[async_trait]
impl AuthApi for InMemoryBackend {
    async fn sign_up(&self, email: &str, password: &str) -> Result<UserId, BackendError> {
        let mut state = self.lock();
        state.sign_up_calls += 1;

        if state.users.contains_key(email) {
            return Err(BackendError::Api {
                service: "auth",
                status: 400,
                message: "User already registered".to_owned(),
            });
        }

        let id = Uuid::new_v4().to_string();
        state.users.insert(
            email.to_owned(),
            StoredUser {
                id: id.clone(),
                password: password.to_owned(),
            },
        );
        Ok(UserId::new(id))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, BackendError> {
        let mut state = self.lock();
        state.sign_in_calls += 1;

        if state.fail_sign_in {
            return Err(BackendError::Api {
                service: "auth",
                status: 500,
                message: "session issuance unavailable".to_owned(),
            });
        }

        let user = state
            .users
            .get(email)
            .filter(|user| user.password == password)
            .cloned()
            .ok_or(BackendError::Api {
                service: "auth",
                status: 400,
                message: "Invalid login credentials".to_owned(),
            })?;

        let token = format!("tok-{}", Uuid::new_v4());
        state.tokens.insert(token.clone(), user.id.clone());
        Ok(AuthSession {
            token,
            user_id: UserId::new(user.id),
        })
    }

    async fn resolve_token(&self, token: &str) -> Result<UserId, BackendError> {
        let mut state = self.lock();
        state.resolve_calls += 1;

        state
            .tokens
            .get(token)
            .map(|id| UserId::new(id.clone()))
            .ok_or(BackendError::Api {
                service: "auth",
                status: 401,
                message: "invalid or expired token".to_owned(),
            })
    }
}

#[async_trait]
impl RowsApi for InMemoryBackend {
    async fn insert(&self, table: &str, row: Value) -> Result<Value, BackendError> {
        let mut state = self.lock();
        state.insert_calls += 1;

        if state.fail_inserts.contains(table) {
            return Err(BackendError::Api {
                service: "rest",
                status: 500,
                message: format!("insert into {table} failed"),
            });
        }

        let mut object: Map<String, Value> = match row {
            Value::Object(map) => map,
            other => {
                return Err(BackendError::MalformedResponse(format!(
                    "expected a row object, got {other}"
                )));
            }
        };

        if !object.contains_key("id") {
            state.next_row_id += 1;
            object.insert("id".to_owned(), Value::from(state.next_row_id));
        }
        if !object.contains_key("created_at") {
            // Sequence offset keeps creation order strict even when two
            // inserts land on the same clock tick.
            state.insert_seq += 1;
            let created_at = Utc::now() + Duration::microseconds(state.insert_seq);
            object.insert(
                "created_at".to_owned(),
                Value::from(created_at.to_rfc3339_opts(SecondsFormat::Micros, true)),
            );
        }

        let stored = Value::Object(object);
        state
            .tables
            .entry(table.to_owned())
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    async fn select(&self, table: &str, query: SelectQuery) -> Result<Vec<Value>, BackendError> {
        let mut state = self.lock();
        state.select_calls += 1;

        if state.fail_selects.contains(table) {
            return Err(BackendError::Api {
                service: "rest",
                status: 500,
                message: format!("select from {table} failed"),
            });
        }

        let mut rows: Vec<Value> = state
            .tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| {
                        query
                            .filters
                            .iter()
                            .all(|(column, value)| column_matches(row, column, value))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some((column, dir)) = &query.order {
            rows.sort_by(|a, b| {
                let ordering = compare_columns(a, b, column);
                match dir {
                    SortDir::Asc => ordering,
                    SortDir::Desc => ordering.reverse(),
                }
            });
        }

        Ok(rows)
    }
}

fn column_matches(row: &Value, column: &str, value: &str) -> bool {
    match row.get(column) {
        Some(Value::String(s)) => s == value,
        Some(Value::Number(n)) => n.to_string() == value,
        _ => false,
    }
}

fn compare_columns(a: &Value, b: &Value, column: &str) -> std::cmp::Ordering {
    match (a.get(column), b.get(column)) {
        (Some(Value::Number(left)), Some(Value::Number(right))) => left
            .as_f64()
            .partial_cmp(&right.as_f64())
            .unwrap_or(std::cmp::Ordering::Equal),
        (Some(Value::String(left)), Some(Value::String(right))) => left.cmp(right),
        _ => std::cmp::Ordering::Equal,
    }
}
