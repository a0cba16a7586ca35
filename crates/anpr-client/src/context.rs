//! Application context.
//!
//! [`AppContext`] owns everything a console session needs: configuration, the
//! session store, the API client, preferences, request guards and the cached
//! access-control tree. It is the only writer of the cache. Login and restore
//! fill it; logout and session expiry clear it.

use crate::api::ApiClient;
use crate::endpoints::{
    FixVehicleNumber, LogFilter, NotificationQuery, ReportExport, ReportFormat, WatchlistPayload,
};
use crate::error::ClientError;
use crate::guard::ViewRequests;
use crate::preferences::Preferences;
use crate::session::{SessionEvent, SessionStore};
use crate::storage::{FileStore, LocalStore};
use anpr_core::{
    Acknowledgement, AccessControl, AccessControlResponse, AnprConfig, AssignedResources,
    ComponentCode, FilterScope, NotificationFeed, Page, Permission, Tab, TabName, User,
    VehicleLog, WatchlistEntry,
};
use anpr_policy::validation::validate_login;
use anpr_policy::{
    AccessPolicy, PageRequest, ValidationError, WatchlistForm, order_tabs, prune,
    resolve_active_tab,
};
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::{Arc, Mutex, RwLock};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;

/// Guarded view: dashboard vehicle log table.
pub const VEHICLE_LOGS_VIEW: &str = "dashboard.vehicle_logs";
/// Guarded view: report table.
pub const REPORT_VIEW: &str = "reports.report_table";
/// Guarded view: watchlist table.
pub const WATCHLIST_VIEW: &str = "watchlist.watchlist_table";
/// Guarded view: notification feed.
pub const NOTIFICATIONS_VIEW: &str = "notifications.feed";

/// The user and access tree fetched after login.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessSnapshot {
    pub user: User,
    pub access: AccessControl,
    pub fetched_at: DateTime<Utc>,
}

impl AccessSnapshot {
    pub fn new(response: AccessControlResponse) -> Self {
        Self {
            user: response.user,
            access: response.access_control,
            fetched_at: Utc::now(),
        }
    }

    pub fn policy(&self) -> AccessPolicy<'_> {
        AccessPolicy::new(&self.access)
    }

    pub fn can_view(&self, tab: &TabName, component: &ComponentCode, permission: &Permission) -> bool {
        self.policy().can_view(tab, component, permission)
    }

    /// Tabs in server order.
    pub fn tabs(&self) -> &[Tab] {
        &self.access.tabs
    }
}

/// Owns the session, the API client and the access cache.
pub struct AppContext {
    config: AnprConfig,
    session: Arc<SessionStore>,
    api: ApiClient,
    preferences: Preferences,
    views: ViewRequests,
    access: RwLock<Option<Arc<AccessSnapshot>>>,
    events: Mutex<broadcast::Receiver<SessionEvent>>,
}

impl AppContext {
    /// Build a context backed by the storage file from `config`.
    pub fn open(config: AnprConfig) -> Result<Self, ClientError> {
        let store = FileStore::open(config.storage.file_path())?;
        Self::with_store(config, Arc::new(store))
    }

    /// Build a context over any store.
    pub fn with_store(config: AnprConfig, store: Arc<dyn LocalStore>) -> Result<Self, ClientError> {
        let session = Arc::new(SessionStore::new(store.clone()));
        let api = ApiClient::new(config.api.clone(), session.clone())?;
        let events = Mutex::new(session.subscribe());

        Ok(Self {
            config,
            session,
            api,
            preferences: Preferences::new(store),
            views: ViewRequests::new(),
            access: RwLock::new(None),
            events,
        })
    }

    pub fn config(&self) -> &AnprConfig {
        &self.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn views(&self) -> &ViewRequests {
        &self.views
    }

    /// Subscribe to session lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.session.subscribe()
    }

    // =========================================================================
    // Session lifecycle
    // =========================================================================

    /// Resume a stored session: fetch access control if a token exists.
    pub async fn restore(&self) -> Result<Option<Arc<AccessSnapshot>>, ClientError> {
        if !self.session.is_authenticated() {
            self.set_snapshot(None);
            return Ok(None);
        }
        self.refresh_access().await.map(Some)
    }

    /// Log in, store the token and load the access tree.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Arc<AccessSnapshot>, ClientError> {
        let username = validate_login(username, password)?;
        let token = self.api.login(username, password).await?;
        self.session
            .establish(&token.access_token, &token.token_type)?;

        let snapshot = self.refresh_access().await?;
        tracing::info!(user = %snapshot.user.username, tabs = snapshot.tabs().len(), "Logged in");
        Ok(snapshot)
    }

    /// Fetch the access tree for the current token and cache it.
    ///
    /// Also settles the active tab: the stored one if still present,
    /// otherwise the default, which is then persisted.
    pub async fn refresh_access(&self) -> Result<Arc<AccessSnapshot>, ClientError> {
        let response = self.api.fetch_access_control().await?;
        let unrecognized = response.access_control.unrecognized();
        if !unrecognized.is_empty() {
            tracing::debug!(names = ?unrecognized, "Access tree contains unrecognized names");
        }

        let snapshot = Arc::new(AccessSnapshot::new(response));
        self.set_snapshot(Some(snapshot.clone()));
        self.settle_active_tab(&snapshot)?;
        Ok(snapshot)
    }

    /// Clear the token and the access cache.
    pub fn logout(&self) -> Result<(), ClientError> {
        self.views.cancel_all();
        self.session.logout()?;
        self.set_snapshot(None);
        Ok(())
    }

    /// The cached access tree, if authenticated.
    pub fn snapshot(&self) -> Option<Arc<AccessSnapshot>> {
        self.apply_session_events();
        self.access.read().ok()?.clone()
    }

    /// The cached access tree, or [`ClientError::NotAuthenticated`].
    pub fn require_snapshot(&self) -> Result<Arc<AccessSnapshot>, ClientError> {
        self.snapshot().ok_or(ClientError::NotAuthenticated)
    }

    /// Permission query against the cache; `false` when not logged in.
    pub fn can_view(&self, tab: &TabName, component: &ComponentCode, permission: &Permission) -> bool {
        self.snapshot()
            .is_some_and(|snapshot| snapshot.can_view(tab, component, permission))
    }

    /// Check a permission before an operation.
    pub fn authorize(
        &self,
        tab: TabName,
        component: ComponentCode,
        permission: Permission,
    ) -> Result<Arc<AccessSnapshot>, ClientError> {
        let snapshot = self.require_snapshot()?;
        if let Err(denied) = snapshot.policy().require(&tab, &component, &permission) {
            tracing::warn!(%denied, "Operation denied");
            return Err(denied.into());
        }
        Ok(snapshot)
    }

    /// Store a new cache value after consuming queued session events, so an
    /// old logout or expiry cannot clear a fresh snapshot.
    fn set_snapshot(&self, snapshot: Option<Arc<AccessSnapshot>>) {
        self.apply_session_events();
        if let Ok(mut access) = self.access.write() {
            *access = snapshot;
        }
    }

    /// Drop the cache if the session expired or logged out since last check.
    fn apply_session_events(&self) {
        let Ok(mut events) = self.events.lock() else {
            return;
        };
        let mut clear = false;
        loop {
            match events.try_recv() {
                Ok(SessionEvent::Expired) | Ok(SessionEvent::LoggedOut) => clear = true,
                Ok(SessionEvent::LoggedIn) => {}
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Session events lagged");
                    clear = !self.session.is_authenticated();
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        if clear {
            self.views.cancel_all();
            if let Ok(mut access) = self.access.write()
                && access.take().is_some()
            {
                tracing::info!("Access cache cleared after session ended");
            }
        }
    }

    // =========================================================================
    // Tabs
    // =========================================================================

    /// Tabs in display order for the current user.
    pub fn ordered_tabs(&self) -> Result<Vec<Tab>, ClientError> {
        let snapshot = self.require_snapshot()?;
        let custom = self.preferences.tab_order(&snapshot.user.id);
        Ok(order_tabs(snapshot.tabs(), custom.as_ref())
            .into_iter()
            .cloned()
            .collect())
    }

    /// The active tab, resolved against the current tree.
    pub fn active_tab(&self) -> Result<Option<TabName>, ClientError> {
        let snapshot = self.require_snapshot()?;
        self.settle_active_tab(&snapshot)
    }

    /// Select a tab. It must be present in the tree.
    pub fn set_active_tab(&self, tab: &TabName) -> Result<TabName, ClientError> {
        let snapshot = self.require_snapshot()?;
        let found = snapshot
            .access
            .tab(tab)
            .ok_or_else(|| tab_unavailable(tab))?;
        self.preferences.set_active_tab(&found.tab_name)?;
        tracing::debug!(tab = %found.tab_name, "Active tab changed");
        Ok(found.tab_name.clone())
    }

    /// Move a tab to `position` and save the resulting order for this user.
    pub fn move_tab(&self, tab: &TabName, position: usize) -> Result<Vec<Tab>, ClientError> {
        let snapshot = self.require_snapshot()?;
        let user = &snapshot.user.id;
        let custom = self
            .preferences
            .tab_order(user)
            .map(|order| prune(&order, snapshot.tabs()));

        let order = anpr_policy::move_tab(snapshot.tabs(), custom.as_ref(), tab, position)
            .ok_or_else(|| tab_unavailable(tab))?;
        self.preferences.save_tab_order(user, &order)?;
        self.ordered_tabs()
    }

    /// Forget this user's custom order.
    pub fn reset_tab_order(&self) -> Result<Vec<Tab>, ClientError> {
        let snapshot = self.require_snapshot()?;
        self.preferences.reset_tab_order(&snapshot.user.id)?;
        self.ordered_tabs()
    }

    fn settle_active_tab(&self, snapshot: &AccessSnapshot) -> Result<Option<TabName>, ClientError> {
        let stored = self.preferences.active_tab();
        let Some(active) = resolve_active_tab(snapshot.tabs(), stored.as_ref()) else {
            return Ok(None);
        };
        if stored.as_ref() != Some(&active.tab_name) {
            self.preferences.set_active_tab(&active.tab_name)?;
        }
        Ok(Some(active.tab_name.clone()))
    }

    // =========================================================================
    // Domain operations
    // =========================================================================

    /// Dashboard vehicle logs.
    pub async fn vehicle_logs(&self, filter: &LogFilter) -> Result<Page<VehicleLog>, ClientError> {
        self.authorize(TabName::Dashboard, ComponentCode::VehicleLogs, Permission::View)?;
        let query = filter.validate(FilterScope::Dashboard, &self.config.filters)?;
        self.views
            .run(VEHICLE_LOGS_VIEW, self.api.vehicle_logs(&query))
            .await
    }

    /// Correct the plate read of one log entry.
    pub async fn fix_vehicle_number(
        &self,
        log_id: i64,
        vehicle_number: &str,
    ) -> Result<Acknowledgement, ClientError> {
        self.authorize(
            TabName::Dashboard,
            ComponentCode::FixVehicleNumber,
            Permission::Update,
        )?;
        let fix = FixVehicleNumber::new(log_id, vehicle_number)?;
        self.api.fix_vehicle_number(&fix).await
    }

    /// Cameras assigned to the user.
    pub async fn assigned_resources(&self) -> Result<AssignedResources, ClientError> {
        self.require_snapshot()?;
        self.api.assigned_resources().await
    }

    pub async fn watchlist(&self) -> Result<Vec<WatchlistEntry>, ClientError> {
        self.authorize(TabName::Watchlist, ComponentCode::WatchlistTable, Permission::View)?;
        self.views.run(WATCHLIST_VIEW, self.api.watchlist()).await
    }

    pub async fn add_watchlist(&self, form: WatchlistForm) -> Result<WatchlistEntry, ClientError> {
        self.authorize(TabName::Watchlist, ComponentCode::WatchlistForm, Permission::Add)?;
        let payload = WatchlistPayload::from(form.validated()?);
        self.api.add_watchlist(&payload).await
    }

    pub async fn update_watchlist(
        &self,
        id: i64,
        form: WatchlistForm,
    ) -> Result<WatchlistEntry, ClientError> {
        self.authorize(TabName::Watchlist, ComponentCode::WatchlistForm, Permission::Update)?;
        let payload = WatchlistPayload::from(form.validated()?);
        self.api.update_watchlist(id, &payload).await
    }

    /// The user's notification feed.
    pub async fn notifications(
        &self,
        query: &NotificationQuery,
    ) -> Result<NotificationFeed, ClientError> {
        self.require_snapshot()?;
        PageRequest::validated(query.page, query.page_size)?;
        self.views
            .run(NOTIFICATIONS_VIEW, self.api.notifications(query))
            .await
    }

    /// One page of the vehicle-log report.
    pub async fn report(&self, filter: &LogFilter) -> Result<Page<VehicleLog>, ClientError> {
        self.authorize(TabName::Reports, ComponentCode::ReportTable, Permission::View)?;
        let query = filter.validate(FilterScope::Reports, &self.config.filters)?;
        self.views.run(REPORT_VIEW, self.api.report(&query)).await
    }

    /// Fetch every report row for `filter` and write it to `path`.
    ///
    /// The format comes from `format`, else from the file extension.
    pub async fn export_report(
        &self,
        filter: &LogFilter,
        path: &Path,
        format: Option<ReportFormat>,
    ) -> Result<ReportExport, ClientError> {
        self.authorize(TabName::Reports, ComponentCode::ReportExport, Permission::Export)?;
        let query = filter.validate(FilterScope::Reports, &self.config.filters)?;
        let format = format
            .or_else(|| ReportFormat::from_path(path))
            .ok_or_else(|| {
                ValidationError::invalid_field(
                    "format",
                    "Export format must be json or yaml.",
                )
            })?;

        let fetched = self.api.report_rows(&query).await?;
        let export = ReportExport::new(&query, fetched);
        export.write_to(path, format)?;
        Ok(export)
    }

    pub fn dark_mode(&self) -> bool {
        self.preferences.dark_mode()
    }

    pub fn set_dark_mode(&self, enabled: bool) -> Result<(), ClientError> {
        self.preferences.set_dark_mode(enabled)?;
        Ok(())
    }
}

fn tab_unavailable(tab: &TabName) -> ClientError {
    ValidationError::invalid_field("tab", format!("Tab '{tab}' is not available.")).into()
}
