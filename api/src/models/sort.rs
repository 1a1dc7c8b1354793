//! Server side of the admin table's sort state `{key, direction}`.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A whitelisted sortable column.
pub trait SortKey: Copy + Default {
    fn column(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SortParams<K> {
    #[serde(default)]
    pub sort: Option<K>,
    #[serde(default)]
    pub direction: Option<SortDirection>,
}

impl<K: SortKey> SortParams<K> {
    /// `ORDER BY` clause built only from whitelisted columns. `id` breaks ties
    /// so paging through equal keys stays stable.
    pub fn order_by(&self) -> String {
        let key = self.sort.unwrap_or_default();
        let direction = self.direction.unwrap_or_default().as_sql();
        format!("ORDER BY {} {direction}, id {direction}", key.column())
    }
}
