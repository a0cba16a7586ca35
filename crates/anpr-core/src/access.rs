//! Access-control tree types.
//!
//! The backend returns an ordered list of tabs, each gating a list of
//! components, each carrying boolean permission flags. Tab names and
//! component codes arrive as strings; they are parsed here into sum types so
//! that a typo or an unknown server value becomes an explicit
//! `Unrecognized` variant instead of a silent string mismatch.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::user::User;

/// Compare a raw name with a known label, ignoring ASCII case, surrounding
/// whitespace, and `_`/`-`/space differences.
fn label_matches(raw: &str, label: &str) -> bool {
    let normalize = |c: char| match c {
        '_' | '-' => ' ',
        other => other.to_ascii_lowercase(),
    };
    let raw = raw.trim();
    raw.len() == label.len() && raw.chars().map(normalize).eq(label.chars().map(normalize))
}

/// Generates a string-backed sum type with an `Unrecognized` catch-all.
macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant,)+
            /// A value the console does not know about, kept verbatim.
            Unrecognized(String),
        }

        impl $name {
            /// All known variants.
            pub fn known() -> Vec<$name> {
                vec![$($name::$variant),+]
            }

            /// Parse a server or user supplied value.
            pub fn parse(raw: &str) -> Self {
                $(
                    if label_matches(raw, $label) {
                        return $name::$variant;
                    }
                )+
                $name::Unrecognized(raw.to_string())
            }

            /// The canonical wire value.
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $label,)+
                    $name::Unrecognized(raw) => raw,
                }
            }

            pub fn is_recognized(&self) -> bool {
                !matches!(self, $name::Unrecognized(_))
            }
        }

        impl FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self::parse(s))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Ok(Self::parse(&raw))
            }
        }
    };
}

named_enum! {
    /// Top-level navigation section.
    TabName {
        Dashboard => "Dashboard",
        Reports => "Reports",
        Watchlist => "Watchlist",
        Notifications => "Notifications",
        Configuration => "Configuration",
        Settings => "Settings",
        UserManagement => "User Management",
    }
}

named_enum! {
    /// A capability inside a tab.
    ComponentCode {
        DashboardSummary => "dashboard_summary",
        VehicleLogs => "vehicle_logs",
        VehicleImages => "vehicle_images",
        FixVehicleNumber => "fix_vehicle_number",
        WatchlistTable => "watchlist_table",
        WatchlistForm => "watchlist_form",
        ReportTable => "report_table",
        ReportExport => "report_export",
        NotificationList => "notification_list",
        AssignedResources => "assigned_resources",
        TabSettings => "tab_settings",
    }
}

/// A permission key that can be asked of a component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Permission {
    View,
    Add,
    Update,
    Export,
    /// Any other `can_*` flag, stored with its full flag name.
    Other(String),
}

impl Permission {
    /// Parse `view`, `can_view`, `VIEW` and so on.
    pub fn parse(raw: &str) -> Self {
        let lowered = raw.trim().to_ascii_lowercase();
        let base = lowered.strip_prefix("can_").unwrap_or(&lowered);
        match base {
            "view" => Permission::View,
            "add" => Permission::Add,
            "update" => Permission::Update,
            "export" => Permission::Export,
            other => Permission::Other(format!("can_{}", other)),
        }
    }

    /// The flag name as it appears in the permissions object.
    pub fn flag_name(&self) -> &str {
        match self {
            Permission::View => "can_view",
            Permission::Add => "can_add",
            Permission::Update => "can_update",
            Permission::Export => "can_export",
            Permission::Other(flag) => flag,
        }
    }
}

impl FromStr for Permission {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag_name())
    }
}

/// Boolean permission flags of a component.
///
/// The four named flags default to `false` when missing. Any additional
/// flags the backend sends are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionFlags {
    #[serde(default)]
    pub can_view: bool,
    #[serde(default)]
    pub can_add: bool,
    #[serde(default)]
    pub can_update: bool,
    #[serde(default)]
    pub can_export: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl PermissionFlags {
    /// The stored boolean for a permission key. Unknown or non-boolean
    /// extra flags read as `false`.
    pub fn get(&self, permission: &Permission) -> bool {
        match permission {
            Permission::View => self.can_view,
            Permission::Add => self.can_add,
            Permission::Update => self.can_update,
            Permission::Export => self.can_export,
            Permission::Other(flag) => self
                .extra
                .get(flag)
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(false),
        }
    }

    /// Names of all flags that are set.
    pub fn granted(&self) -> Vec<String> {
        let mut names = Vec::new();
        for (flag, set) in [
            ("can_view", self.can_view),
            ("can_add", self.can_add),
            ("can_update", self.can_update),
            ("can_export", self.can_export),
        ] {
            if set {
                names.push(flag.to_string());
            }
        }
        for (flag, value) in &self.extra {
            if value.as_bool() == Some(true) {
                names.push(flag.clone());
            }
        }
        names
    }
}

/// A named UI capability within a tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub component_id: i64,
    pub component_code: ComponentCode,
    #[serde(default)]
    pub component_name: String,
    #[serde(default)]
    pub permissions: PermissionFlags,
}

/// A top-level navigation section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    pub tab_id: i64,
    pub tab_name: TabName,
    #[serde(default)]
    pub display_order: i64,
    #[serde(default)]
    pub components: Vec<Component>,
}

impl Tab {
    /// A tab with no components configured is treated as fully permitted.
    pub fn grants_all(&self) -> bool {
        self.components.is_empty()
    }

    /// Find a component by code.
    pub fn component(&self, code: &ComponentCode) -> Option<&Component> {
        self.components.iter().find(|c| &c.component_code == code)
    }
}

/// The ordered list of tabs the user may see.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessControl {
    #[serde(default)]
    pub tabs: Vec<Tab>,
}

impl AccessControl {
    /// Find a tab by name. If the backend sends a name twice, the first wins.
    pub fn tab(&self, name: &TabName) -> Option<&Tab> {
        self.tabs.iter().find(|t| &t.tab_name == name)
    }

    /// Tab names and component codes the console did not recognize.
    pub fn unrecognized(&self) -> Vec<String> {
        let mut names = Vec::new();
        for tab in &self.tabs {
            if !tab.tab_name.is_recognized() {
                names.push(format!("tab '{}'", tab.tab_name));
            }
            for component in &tab.components {
                if !component.component_code.is_recognized() {
                    names.push(format!(
                        "component '{}' in tab '{}'",
                        component.component_code, tab.tab_name
                    ));
                }
            }
        }
        names
    }
}

/// Body of `GET /auth/me/access-control`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessControlResponse {
    pub user: User,
    #[serde(default)]
    pub access_control: AccessControl,
}
