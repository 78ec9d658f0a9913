//! Attribute-based record filtering.
//!
//! Every list-returning operation (storage roots, directory entries, events,
//! shares) narrows its result with the same [`Query`]. Records expose their
//! attributes through [`Record`], so one query type works across all shapes.

use std::fmt;

/// Attribute keys understood by [`Query`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attr {
    Name,
    Path,
    Id,
    Magic,
    Owner,
    Permission,
    Description,
    IsDefault,
    IsExclusive,
    IsDir,
    IsDeleted,
    Rev,
    Version,
    Size,
    OpType,
    Device,
    Editor,
    Timestamp,
    Acl,
    AclList,
    DownloadDisabled,
    UploadEnabled,
    Watermark,
    Comment,
    Kind,
}

/// Value type an attribute is stored and compared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Int,
    Bool,
}

impl Attr {
    pub const ALL: [Attr; 25] = [
        Attr::Name,
        Attr::Path,
        Attr::Id,
        Attr::Magic,
        Attr::Owner,
        Attr::Permission,
        Attr::Description,
        Attr::IsDefault,
        Attr::IsExclusive,
        Attr::IsDir,
        Attr::IsDeleted,
        Attr::Rev,
        Attr::Version,
        Attr::Size,
        Attr::OpType,
        Attr::Device,
        Attr::Editor,
        Attr::Timestamp,
        Attr::Acl,
        Attr::AclList,
        Attr::DownloadDisabled,
        Attr::UploadEnabled,
        Attr::Watermark,
        Attr::Comment,
        Attr::Kind,
    ];

    /// The one value type every [`Record`] reports this attribute as.
    ///
    /// Tokens the service sends as either strings or numbers (ids,
    /// revisions, versions, permissions) are text.
    pub fn kind(self) -> ValueKind {
        match self {
            Attr::Size | Attr::Timestamp | Attr::Acl => ValueKind::Int,
            Attr::IsDefault
            | Attr::IsExclusive
            | Attr::IsDir
            | Attr::IsDeleted
            | Attr::DownloadDisabled
            | Attr::UploadEnabled
            | Attr::Watermark
            | Attr::Comment => ValueKind::Bool,
            _ => ValueKind::Text,
        }
    }
}

/// A comparable attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Text(String),
    Int(i64),
    Bool(bool),
}

impl AttrValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            AttrValue::Text(_) => ValueKind::Text,
            AttrValue::Int(_) => ValueKind::Int,
            AttrValue::Bool(_) => ValueKind::Bool,
        }
    }

    /// Convert to `kind` where the conversion is lossless; otherwise the
    /// value is returned unchanged (and will not match).
    pub fn coerce(self, kind: ValueKind) -> Self {
        match (self, kind) {
            (AttrValue::Int(n), ValueKind::Text) => AttrValue::Text(n.to_string()),
            (AttrValue::Bool(b), ValueKind::Text) => AttrValue::Text(b.to_string()),
            (AttrValue::Text(s), ValueKind::Int) => match s.trim().parse() {
                Ok(n) => AttrValue::Int(n),
                Err(_) => AttrValue::Text(s),
            },
            (AttrValue::Text(s), ValueKind::Bool) => match s.to_ascii_lowercase().as_str() {
                "true" => AttrValue::Bool(true),
                "false" => AttrValue::Bool(false),
                _ => AttrValue::Text(s),
            },
            (value, _) => value,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Text(s) => write!(f, "{s:?}"),
            AttrValue::Int(n) => write!(f, "{n}"),
            AttrValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<&String> for AttrValue {
    fn from(value: &String) -> Self {
        AttrValue::Text(value.clone())
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<u64> for AttrValue {
    fn from(value: u64) -> Self {
        AttrValue::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

/// Anything that can be matched by a [`Query`].
pub trait Record {
    /// Value of `attr` for this record, or `None` if the record has no such attribute.
    fn attr(&self, attr: Attr) -> Option<AttrValue>;
}

impl<R: Record + ?Sized> Record for &R {
    fn attr(&self, attr: Attr) -> Option<AttrValue> {
        (**self).attr(attr)
    }
}

/// How multiple constraints combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Every specified constraint must match.
    #[default]
    All,
    /// At least one specified constraint must match ("greedy").
    Any,
}

/// A set of `(attribute, expected value)` constraints.
///
/// A constraint with no expected value is "unspecified": it never restricts
/// the result, but it does count as a mention of the attribute for
/// [`Query::default_to`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    mode: MatchMode,
    constraints: Vec<(Attr, Option<AttrValue>)>,
}

impl Query {
    /// Conjunctive query with no constraints (matches everything).
    pub fn all() -> Self {
        Self::default()
    }

    /// Disjunctive query with no constraints (matches everything).
    pub fn any() -> Self {
        Self {
            mode: MatchMode::Any,
            constraints: Vec::new(),
        }
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Require `attr == value`. The value is converted to [`Attr::kind`].
    pub fn eq(mut self, attr: Attr, value: impl Into<AttrValue>) -> Self {
        self.constraints.push((attr, Some(value.into().coerce(attr.kind()))));
        self
    }

    /// Require `attr == value` when `value` is present; `None` leaves `attr` unspecified.
    pub fn eq_opt<V: Into<AttrValue>>(mut self, attr: Attr, value: Option<V>) -> Self {
        let value = value.map(|v| v.into().coerce(attr.kind()));
        self.constraints.push((attr, value));
        self
    }

    /// Add `attr == value` unless the query already mentions `attr`.
    pub fn default_to(&mut self, attr: Attr, value: impl Into<AttrValue>) {
        if !self.mentions(attr) {
            self.constraints
                .push((attr, Some(value.into().coerce(attr.kind()))));
        }
    }

    /// Whether `attr` appears in the query, specified or not.
    pub fn mentions(&self, attr: Attr) -> bool {
        self.constraints.iter().any(|(a, _)| *a == attr)
    }

    /// The constraints that actually restrict results.
    pub fn specified(&self) -> impl Iterator<Item = (Attr, &AttrValue)> + '_ {
        self.constraints
            .iter()
            .filter_map(|(attr, value)| value.as_ref().map(|v| (*attr, v)))
    }

    pub fn is_unrestricted(&self) -> bool {
        self.specified().next().is_none()
    }

    /// Check a single record against the query.
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        if self.is_unrestricted() {
            return true;
        }

        let hit = |attr: Attr, expected: &AttrValue| record.attr(attr).as_ref() == Some(expected);

        match self.mode {
            MatchMode::All => self.specified().all(|(attr, v)| hit(attr, v)),
            MatchMode::Any => self.specified().any(|(attr, v)| hit(attr, v)),
        }
    }

    /// Keep the matching records, in input order.
    pub fn filter<R: Record, I: IntoIterator<Item = R>>(&self, records: I) -> Vec<R> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}
