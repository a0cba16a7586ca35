//! Permission evaluation over the cached access-control tree.
//!
//! The rule, applied to `(tab, component, permission)`:
//! 1. Tab not in the tree: deny.
//! 2. Tab has no components: grant (see [`Decision::GrantedUnconfiguredTab`]).
//! 3. Component not in the tab: deny.
//! 4. Otherwise: the stored flag for the permission.

use anpr_core::{AccessControl, Component, ComponentCode, Permission, Tab, TabName};

use crate::error::AccessDenied;

/// Outcome of a permission check, with the branch that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The component's flag is set.
    Granted,
    /// The tab lists no components, which grants everything.
    ///
    /// Open question for product: this may be an intended default-allow for
    /// unconfigured tabs or a gap. It is kept exactly as the backend
    /// convention defines it.
    GrantedUnconfiguredTab,
    /// The tab is not in the tree.
    TabNotFound,
    /// The tab has components, but not this one.
    ComponentNotFound,
    /// The component exists and the flag is unset.
    FlagUnset,
}

impl Decision {
    pub fn is_granted(&self) -> bool {
        matches!(self, Decision::Granted | Decision::GrantedUnconfiguredTab)
    }

    /// Short explanation for display.
    pub fn reason(&self) -> &'static str {
        match self {
            Decision::Granted => "permission flag is set",
            Decision::GrantedUnconfiguredTab => "tab has no components configured (grant-all)",
            Decision::TabNotFound => "tab is not in the access-control tree",
            Decision::ComponentNotFound => "component is not configured for this tab",
            Decision::FlagUnset => "permission flag is not set",
        }
    }
}

/// Evaluates permissions against one access-control tree.
#[derive(Debug, Clone, Copy)]
pub struct AccessPolicy<'a> {
    access: &'a AccessControl,
}

impl<'a> AccessPolicy<'a> {
    pub fn new(access: &'a AccessControl) -> Self {
        Self { access }
    }

    /// The underlying tree.
    pub fn access(&self) -> &'a AccessControl {
        self.access
    }

    /// Evaluate and report which branch of the rule decided.
    pub fn decide(
        &self,
        tab: &TabName,
        component: &ComponentCode,
        permission: &Permission,
    ) -> Decision {
        let Some(tab) = self.access.tab(tab) else {
            return Decision::TabNotFound;
        };

        if tab.grants_all() {
            return Decision::GrantedUnconfiguredTab;
        }

        match tab.component(component) {
            None => Decision::ComponentNotFound,
            Some(c) if c.permissions.get(permission) => Decision::Granted,
            Some(_) => Decision::FlagUnset,
        }
    }

    /// Can the user exercise `permission` on `component` inside `tab`?
    pub fn can_view(
        &self,
        tab: &TabName,
        component: &ComponentCode,
        permission: &Permission,
    ) -> bool {
        self.decide(tab, component, permission).is_granted()
    }

    /// String-keyed entry point; parses the keys and applies the same rule.
    pub fn can_view_str(&self, tab: &str, component: &str, permission: &str) -> bool {
        self.can_view(
            &TabName::parse(tab),
            &ComponentCode::parse(component),
            &Permission::parse(permission),
        )
    }

    /// Like [`can_view`](Self::can_view) but returns an error to propagate.
    pub fn require(
        &self,
        tab: &TabName,
        component: &ComponentCode,
        permission: &Permission,
    ) -> Result<(), AccessDenied> {
        let decision = self.decide(tab, component, permission);
        if decision.is_granted() {
            return Ok(());
        }
        tracing::debug!(
            tab = %tab,
            component = %component,
            permission = %permission,
            reason = decision.reason(),
            "Permission denied"
        );
        Err(AccessDenied {
            tab: tab.to_string(),
            component: component.to_string(),
            permission: permission.to_string(),
        })
    }

    /// Is the tab present in the tree at all?
    pub fn has_tab(&self, tab: &TabName) -> bool {
        self.access.tab(tab).is_some()
    }

    /// Look up a configured component.
    pub fn component(&self, tab: &TabName, code: &ComponentCode) -> Option<&'a Component> {
        self.access.tab(tab).and_then(|t| t.component(code))
    }

    /// Tabs present in the tree, in server order.
    pub fn visible_tabs(&self) -> std::slice::Iter<'a, Tab> {
        self.access.tabs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anpr_core::PermissionFlags;

    fn component(code: &str, flags: PermissionFlags) -> Component {
        Component {
            component_id: 1,
            component_code: ComponentCode::parse(code),
            component_name: code.to_string(),
            permissions: flags,
        }
    }

    fn tab(id: i64, name: &str, order: i64, components: Vec<Component>) -> Tab {
        Tab {
            tab_id: id,
            tab_name: TabName::parse(name),
            display_order: order,
            components,
        }
    }

    fn tree() -> AccessControl {
        AccessControl {
            tabs: vec![
                tab(
                    1,
                    "Dashboard",
                    1,
                    vec![
                        component(
                            "vehicle_logs",
                            PermissionFlags {
                                can_view: true,
                                can_update: false,
                                ..Default::default()
                            },
                        ),
                        component(
                            "fix_vehicle_number",
                            PermissionFlags {
                                can_view: true,
                                can_update: true,
                                ..Default::default()
                            },
                        ),
                    ],
                ),
                tab(2, "Reports", 2, vec![]),
            ],
        }
    }

    #[test]
    fn unknown_tab_is_denied() {
        let access = tree();
        let policy = AccessPolicy::new(&access);
        for name in ["Watchlist", "Settings", "Parking", ""] {
            for perm in ["view", "add", "update", "export", "delete"] {
                assert!(!policy.can_view_str(name, "vehicle_logs", perm));
            }
        }
        assert_eq!(
            policy.decide(&TabName::Watchlist, &ComponentCode::VehicleLogs, &Permission::View),
            Decision::TabNotFound
        );
    }

    #[test]
    fn empty_tab_grants_everything() {
        let access = tree();
        let policy = AccessPolicy::new(&access);
        for code in ["report_export", "report_table", "anything_at_all"] {
            for perm in ["view", "add", "update", "export", "can_purge"] {
                assert!(policy.can_view_str("Reports", code, perm));
            }
        }
        assert_eq!(
            policy.decide(&TabName::Reports, &ComponentCode::ReportExport, &Permission::Export),
            Decision::GrantedUnconfiguredTab
        );
    }

    #[test]
    fn unknown_component_in_configured_tab_is_denied() {
        let access = tree();
        let policy = AccessPolicy::new(&access);
        assert!(!policy.can_view(
            &TabName::Dashboard,
            &ComponentCode::DashboardSummary,
            &Permission::View
        ));
        assert!(!policy.can_view_str("Dashboard", "vehicle_logz", "view"));
    }

    #[test]
    fn matching_component_returns_stored_flag() {
        let access = tree();
        let policy = AccessPolicy::new(&access);
        for tab in &access.tabs {
            for c in &tab.components {
                for perm in [
                    Permission::View,
                    Permission::Add,
                    Permission::Update,
                    Permission::Export,
                ] {
                    assert_eq!(
                        policy.can_view(&tab.tab_name, &c.component_code, &perm),
                        c.permissions.get(&perm)
                    );
                }
            }
        }
    }

    #[test]
    fn require_returns_access_denied() {
        let access = tree();
        let policy = AccessPolicy::new(&access);
        let err = policy
            .require(&TabName::Dashboard, &ComponentCode::VehicleLogs, &Permission::Update)
            .unwrap_err();
        assert_eq!(err.tab, "Dashboard");
        assert_eq!(err.component, "vehicle_logs");
        assert_eq!(err.permission, "can_update");
        assert!(policy
            .require(&TabName::Dashboard, &ComponentCode::FixVehicleNumber, &Permission::Update)
            .is_ok());
    }

    #[test]
    fn unrecognized_tab_names_still_match_exactly() {
        let access = AccessControl {
            tabs: vec![tab(
                9,
                "Parking",
                1,
                vec![component(
                    "gate_barrier",
                    PermissionFlags {
                        can_update: true,
                        ..Default::default()
                    },
                )],
            )],
        };
        let policy = AccessPolicy::new(&access);
        assert!(policy.can_view_str("Parking", "gate_barrier", "update"));
        assert!(!policy.can_view_str("parking", "gate_barrier", "update"));
    }

    #[test]
    fn empty_tree_denies_everything() {
        let access = AccessControl::default();
        let policy = AccessPolicy::new(&access);
        assert!(!policy.can_view_str("Dashboard", "vehicle_logs", "view"));
        assert_eq!(policy.visible_tabs().count(), 0);
    }
}
