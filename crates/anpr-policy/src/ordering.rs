//! Tab ordering and active-tab selection.
//!
//! The server sends a `display_order` per tab. A user may override it with a
//! locally stored `tab_id -> index` map. Overrides are merged at display time
//! and entries for tabs the user no longer has are ignored.

use anpr_core::{Tab, TabName};
use std::collections::BTreeMap;

/// Custom order: `tab_id -> sort index`.
pub type TabOrder = BTreeMap<i64, u32>;

/// Final display order.
///
/// Tabs with a custom index come first, sorted by that index. Tabs without
/// one follow, sorted by `display_order`. Ties break by `display_order`, then
/// `tab_id`.
pub fn order_tabs<'a>(tabs: &'a [Tab], custom: Option<&TabOrder>) -> Vec<&'a Tab> {
    let mut ordered: Vec<&Tab> = tabs.iter().collect();
    ordered.sort_by_key(|tab| {
        let index = custom.and_then(|order| order.get(&tab.tab_id)).copied();
        (index.is_none(), index, tab.display_order, tab.tab_id)
    });
    ordered
}

/// The tab selected on first authenticated render: lowest `display_order`,
/// first in server order on a tie.
pub fn default_tab(tabs: &[Tab]) -> Option<&Tab> {
    tabs.iter().min_by_key(|tab| tab.display_order)
}

/// The stored active tab if the user still has it, else the default.
pub fn resolve_active_tab<'a>(tabs: &'a [Tab], stored: Option<&TabName>) -> Option<&'a Tab> {
    stored
        .and_then(|name| tabs.iter().find(|tab| &tab.tab_name == name))
        .or_else(|| default_tab(tabs))
}

/// Move one tab to `position` in the current display order and return the
/// complete resulting order. `None` if the tab is not in `tabs`.
pub fn move_tab(
    tabs: &[Tab],
    custom: Option<&TabOrder>,
    tab: &TabName,
    position: usize,
) -> Option<TabOrder> {
    let mut ordered = order_tabs(tabs, custom);
    let from = ordered.iter().position(|t| &t.tab_name == tab)?;
    let moved = ordered.remove(from);
    let to = position.min(ordered.len());
    ordered.insert(to, moved);

    Some(
        ordered
            .iter()
            .enumerate()
            .map(|(index, t)| (t.tab_id, index as u32))
            .collect(),
    )
}

/// Drop entries for tabs that are not in `tabs`.
pub fn prune(custom: &TabOrder, tabs: &[Tab]) -> TabOrder {
    custom
        .iter()
        .filter(|(id, _)| tabs.iter().any(|tab| tab.tab_id == **id))
        .map(|(id, index)| (*id, *index))
        .collect()
}
