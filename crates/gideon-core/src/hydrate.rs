//! Type-directed hydration
//!
//! Copies the keys of a document table onto the fields of a typed target.
//! Every hydratable type publishes a static field table through [`Hydrate`]:
//! one [`Field`] per exported field, pairing the field's name with a plain
//! accessor function for its slot. No runtime introspection is involved.
//!
//! # Key → field mapping
//!
//! The overlay key's first character is upper-cased and the result is matched
//! against the field names (`ttl` → `Ttl`, `opRate` → `OpRate`). Keys with no
//! matching field are skipped with a warning. Keys whose value has the wrong
//! kind abort hydration with [`HydrateError::TypeMismatch`].
//!
//! # Override semantics
//!
//! Hydrating the same target twice is the layering mechanism: the second
//! overlay wins for every key both define, keys only the first defined stay
//! as they were. Sequence fields are replaced wholesale, never appended to.

use crate::error::HydrateError;
use gideon_document::{Node, Table};

const EXPECT_INTEGER: &str = "integer";
const EXPECT_STRING: &str = "string";
const EXPECT_STRINGS: &str = "list of strings";
const EXPECT_STRING_MATRIX: &str = "list of lists of strings";

/// A type whose fields can be filled from document tables
pub trait Hydrate: Sized + 'static {
    /// Field table for this type
    fn fields() -> &'static [Field<Self>];

    /// Find a field by its exported name
    #[inline]
    #[must_use]
    fn field(name: &str) -> Option<&'static Field<Self>> {
        Self::fields().iter().find(|field| field.name == name)
    }
}

/// One hydratable field of `T`
pub struct Field<T> {
    /// Exported field name (`OpRate`)
    pub name: &'static str,
    /// Declared kind, with accessor for the slot
    pub kind: FieldKind<T>,
}

/// Declared kind of a field, carrying a slot accessor
pub enum FieldKind<T> {
    /// Signed 64-bit integer
    Integer(fn(&mut T) -> &mut i64),
    /// String
    Text(fn(&mut T) -> &mut String),
    /// Ordered sequence of strings
    Strings(fn(&mut T) -> &mut Vec<String>),
    /// Ordered sequence of string rows
    StringMatrix(fn(&mut T) -> &mut Vec<Vec<String>>),
}

impl<T> Clone for FieldKind<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FieldKind<T> {}

impl<T> FieldKind<T> {
    /// Human-readable kind accepted by this field
    #[inline]
    #[must_use]
    pub fn expected(&self) -> &'static str {
        match self {
            Self::Integer(_) => EXPECT_INTEGER,
            Self::Text(_) => EXPECT_STRING,
            Self::Strings(_) => EXPECT_STRINGS,
            Self::StringMatrix(_) => EXPECT_STRING_MATRIX,
        }
    }
}

impl<T> std::fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("kind", &self.kind.expected())
            .finish()
    }
}

impl<T> Field<T> {
    /// Coerce `node` and store it in this field of `target`
    ///
    /// # Errors
    /// Returns `HydrateError::TypeMismatch` if `node` has the wrong kind;
    /// `target` is left untouched in that case.
    pub fn apply(&self, target: &mut T, key: &str, node: Node<'_>) -> Result<(), HydrateError> {
        match self.kind {
            FieldKind::Integer(slot) => {
                let value = node
                    .as_integer()
                    .ok_or_else(|| HydrateError::mismatch(key, EXPECT_INTEGER, node.kind()))?;
                *slot(target) = value;
            }
            FieldKind::Text(slot) => {
                let value = node
                    .as_str()
                    .ok_or_else(|| HydrateError::mismatch(key, EXPECT_STRING, node.kind()))?;
                *slot(target) = value.to_string();
            }
            FieldKind::Strings(slot) => {
                *slot(target) = to_strings(key, node)?;
            }
            FieldKind::StringMatrix(slot) => {
                *slot(target) = to_string_matrix(key, node)?;
            }
        }
        Ok(())
    }
}

/// Outcome of a successful [`hydrate`] call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hydration {
    /// Overlay keys copied onto the target, in document order
    pub applied: Vec<String>,
    /// Overlay keys with no matching field, in document order
    pub skipped: Vec<String>,
}

/// Derive the exported field name for an overlay key
///
/// Upper-cases the first character and keeps the rest unchanged.
#[must_use]
pub fn field_name(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Copy every key of `overlay` onto `target`
///
/// Keys are applied in the overlay's declaration order. Fails on the first
/// type mismatch; keys applied before it keep their new values.
///
/// # Errors
/// Returns `HydrateError::TypeMismatch` if a value's kind disagrees with the
/// matching field's kind
pub fn hydrate<T: Hydrate>(target: &mut T, overlay: Table<'_>) -> Result<Hydration, HydrateError> {
    let mut report = Hydration::default();

    for (key, node) in overlay.iter() {
        let name = field_name(key);
        let Some(field) = T::field(&name) else {
            tracing::warn!("Field {} is invalid for key '{}', skipping", name, key);
            report.skipped.push(key.to_string());
            continue;
        };

        field.apply(target, key, node)?;
        report.applied.push(key.to_string());
    }

    Ok(report)
}

/// Materialize a list of string nodes
///
/// # Errors
/// Returns `HydrateError::TypeMismatch` if `node` is not a list or an element
/// is not a string
pub fn to_strings(key: &str, node: Node<'_>) -> Result<Vec<String>, HydrateError> {
    let list = node
        .as_list()
        .ok_or_else(|| HydrateError::mismatch(key, EXPECT_STRINGS, node.kind()))?;

    list.iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| HydrateError::mismatch(format!("{key}[{i}]"), EXPECT_STRING, item.kind()))
        })
        .collect()
}

/// Materialize a list of lists of string nodes
///
/// # Errors
/// Returns `HydrateError::TypeMismatch` if `node` is not a list, a row is not
/// a list, or a cell is not a string
pub fn to_string_matrix(key: &str, node: Node<'_>) -> Result<Vec<Vec<String>>, HydrateError> {
    let rows = node
        .as_list()
        .ok_or_else(|| HydrateError::mismatch(key, EXPECT_STRING_MATRIX, node.kind()))?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| to_strings(&format!("{key}[{i}]"), row))
        .collect()
}
