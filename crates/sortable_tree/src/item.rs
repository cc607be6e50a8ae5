use std::{borrow::Borrow, fmt, sync::Arc};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque identifier of a tree item. Unique across the whole tree.
///
/// Cloning is cheap. Numeric ids (as found in some JSON sources) are accepted on
/// deserialization and stored as their decimal text.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(Arc<str>);

impl ItemId {
    pub fn new(id: impl Into<ItemId>) -> Self {
        id.into()
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ItemId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value.into())
    }
}

impl From<&String> for ItemId {
    fn from(value: &String) -> Self {
        Self(value.as_str().into())
    }
}

impl From<u64> for ItemId {
    fn from(value: u64) -> Self {
        Self(value.to_string().into())
    }
}

impl From<i64> for ItemId {
    fn from(value: i64) -> Self {
        Self(value.to_string().into())
    }
}

impl From<usize> for ItemId {
    fn from(value: usize) -> Self {
        Self(value.to_string().into())
    }
}

impl PartialEq<str> for ItemId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for ItemId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl Serialize for ItemId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => text.into(),
            RawId::Unsigned(n) => n.into(),
            RawId::Signed(n) => n.into(),
        })
    }
}

/// A node of the tree: a labeled item with ordered children.
///
/// `data` is the typed extension payload carried alongside the fixed schema. Use `()`
/// when nothing extra is needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    rename_all = "camelCase",
    bound(deserialize = "T: Deserialize<'de> + Default")
)]
pub struct TreeItem<T = ()> {
    pub id: ItemId,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub children: Vec<TreeItem<T>>,
    /// Children are hidden from the visible rows.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub collapsed: bool,
    /// Children may be fetched lazily. Counts as "has children" for display even when
    /// `children` is empty.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub can_fetch_children: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disable_dragging: bool,
    #[serde(default)]
    pub data: T,
}

impl<T: Default> TreeItem<T> {
    pub fn new(id: impl Into<ItemId>, label: impl Into<String>) -> Self {
        Self::with_data(id, label, T::default())
    }
}

impl<T> TreeItem<T> {
    pub fn with_data(id: impl Into<ItemId>, label: impl Into<String>, data: T) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            children: Vec::new(),
            collapsed: false,
            can_fetch_children: false,
            disable_dragging: false,
            data,
        }
    }

    pub fn child(mut self, child: TreeItem<T>) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl Into<Vec<TreeItem<T>>>) -> Self {
        self.children.extend(children.into());
        self
    }

    pub fn collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    pub fn can_fetch_children(mut self, can_fetch_children: bool) -> Self {
        self.can_fetch_children = can_fetch_children;
        self
    }

    pub fn disable_dragging(mut self, disable_dragging: bool) -> Self {
        self.disable_dragging = disable_dragging;
        self
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether a collapse toggle makes sense for this item.
    #[inline]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty() || self.can_fetch_children
    }
}

/// A tree item annotated with its position in a pre-order flattening.
///
/// The item's own children are not carried; `children_len` records how many direct
/// children it had when flattened.
#[derive(Debug, Clone, PartialEq)]
pub struct FlattenedItem<T = ()> {
    pub id: ItemId,
    pub label: String,
    pub collapsed: bool,
    pub can_fetch_children: bool,
    pub disable_dragging: bool,
    pub data: T,
    pub parent_id: Option<ItemId>,
    pub depth: usize,
    /// Position among the parent's children.
    pub index: usize,
    pub children_len: usize,
}

impl<T> FlattenedItem<T> {
    #[inline]
    pub fn has_children(&self) -> bool {
        self.children_len > 0 || self.can_fetch_children
    }

    /// Drop the flattening fields, yielding a childless [`TreeItem`].
    pub fn into_item(self) -> TreeItem<T> {
        TreeItem {
            id: self.id,
            label: self.label,
            children: Vec::new(),
            collapsed: self.collapsed,
            can_fetch_children: self.can_fetch_children,
            disable_dragging: self.disable_dragging,
            data: self.data,
        }
    }

    pub fn row_attributes(&self) -> RowAttributes {
        RowAttributes {
            id: self.id.clone(),
            parent_id: self.parent_id.clone(),
        }
    }
}

/// Externally observable identity of a rendered row, for automation and end-to-end
/// assertions on tree shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowAttributes {
    pub id: ItemId,
    pub parent_id: Option<ItemId>,
}

impl RowAttributes {
    pub const ID: &'static str = "data-tree-item-id";
    pub const PARENT_ID: &'static str = "data-tree-item-parent-id";

    /// Attribute name/value pairs. The parent attribute is only present for nested rows.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![(Self::ID, self.id.to_string())];
        if let Some(parent_id) = &self.parent_id {
            pairs.push((Self::PARENT_ID, parent_id.to_string()));
        }
        pairs
    }
}
