//! Borrowed views over document values
//!
//! [`Node`] is the tagged variant every consumer inspects structurally.
//! [`Table`] and [`List`] are cheap `Copy` handles into the owning
//! [`Document`](crate::Document).

use std::fmt::{self, Display, Formatter};

/// A single value in a document tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node<'a> {
    /// Nested table (`[section]` or inline `{ ... }`)
    Table(Table<'a>),
    /// Signed 64-bit integer
    Integer(i64),
    /// String literal
    String(&'a str),
    /// Array of values
    List(List<'a>),
    /// Floating point number
    Float(f64),
    /// Boolean literal
    Boolean(bool),
    /// Offset or local date/time
    Datetime(&'a toml::value::Datetime),
}

impl<'a> Node<'a> {
    /// Wrap a raw TOML value
    #[inline]
    #[must_use]
    pub fn from_value(value: &'a toml::Value) -> Self {
        match value {
            toml::Value::Table(table) => Self::Table(Table::new(table)),
            toml::Value::Integer(i) => Self::Integer(*i),
            toml::Value::String(s) => Self::String(s),
            toml::Value::Array(items) => Self::List(List::new(items)),
            toml::Value::Float(f) => Self::Float(*f),
            toml::Value::Boolean(b) => Self::Boolean(*b),
            toml::Value::Datetime(dt) => Self::Datetime(dt),
        }
    }

    /// Kind tag of this node
    #[inline]
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Table(_) => NodeKind::Table,
            Self::Integer(_) => NodeKind::Integer,
            Self::String(_) => NodeKind::String,
            Self::List(_) => NodeKind::List,
            Self::Float(_) => NodeKind::Float,
            Self::Boolean(_) => NodeKind::Boolean,
            Self::Datetime(_) => NodeKind::Datetime,
        }
    }

    /// Table view, if this node is a table
    #[inline]
    #[must_use]
    pub fn as_table(&self) -> Option<Table<'a>> {
        match self {
            Self::Table(table) => Some(*table),
            _ => None,
        }
    }

    /// Integer value, if this node is an integer
    #[inline]
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// String slice, if this node is a string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// List view, if this node is a list
    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<List<'a>> {
        match self {
            Self::List(list) => Some(*list),
            _ => None,
        }
    }
}

/// Kind of a [`Node`], used for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Nested table
    Table,
    /// Integer
    Integer,
    /// String
    String,
    /// List
    List,
    /// Float
    Float,
    /// Boolean
    Boolean,
    /// Date/time
    Datetime,
}

impl NodeKind {
    /// Lowercase name of the kind
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Integer => "integer",
            Self::String => "string",
            Self::List => "list",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Datetime => "datetime",
        }
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Borrowed table handle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Table<'a>(&'a toml::Table);

impl<'a> Table<'a> {
    /// Wrap a raw TOML table
    #[inline]
    #[must_use]
    pub fn new(table: &'a toml::Table) -> Self {
        Self(table)
    }

    /// Keys in declaration order
    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.0.keys().map(String::as_str)
    }

    /// Direct child by key (no dotted lookup)
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Node<'a>> {
        self.0.get(key).map(Node::from_value)
    }

    /// Key/value pairs in declaration order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, Node<'a>)> + 'a {
        self.0.iter().map(|(k, v)| (k.as_str(), Node::from_value(v)))
    }

    /// Number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if table has no entries
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Walk a dotted path below this table
    ///
    /// An empty path addresses this table itself.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<Node<'a>> {
        if path.is_empty() {
            return Some(Node::Table(*self));
        }
        let mut current = Node::Table(*self);
        for segment in path.split(crate::PATH_SEPARATOR) {
            current = current.as_table()?.get(segment)?;
        }
        Some(current)
    }
}

/// Borrowed list handle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct List<'a>(&'a [toml::Value]);

impl<'a> List<'a> {
    /// Wrap a raw TOML array
    #[inline]
    #[must_use]
    pub fn new(items: &'a [toml::Value]) -> Self {
        Self(items)
    }

    /// Elements in order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = Node<'a>> + 'a {
        self.0.iter().map(Node::from_value)
    }

    /// Element at index
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Node<'a>> {
        self.0.get(index).map(Node::from_value)
    }

    /// Number of elements
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if list is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
