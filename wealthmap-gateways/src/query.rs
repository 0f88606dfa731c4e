use std::fmt::Display;

use itertools::Itertools;
use wealthmap_core::repositories::Pagination;

/// Query string of a REST table request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, key: &str, value: String) -> Self {
        self.pairs.push((key.to_owned(), value));
        self
    }

    pub fn select(self, columns: &str) -> Self {
        self.push("select", columns.to_owned())
    }

    pub fn eq(self, column: &str, value: impl Display) -> Self {
        self.push(column, format!("eq.{value}"))
    }

    pub fn gte(self, column: &str, value: impl Display) -> Self {
        self.push(column, format!("gte.{value}"))
    }

    pub fn lte(self, column: &str, value: impl Display) -> Self {
        self.push(column, format!("lte.{value}"))
    }

    /// Case-insensitive substring match.
    pub fn ilike_contains(self, column: &str, text: &str) -> Self {
        // Wildcards typed by the user are matched literally by stripping them.
        let text: String = text.chars().filter(|c| !matches!(c, '*' | '%')).collect();
        self.push(column, format!("ilike.*{text}*"))
    }

    pub fn is_in<I, T>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let list = values.into_iter().map(|v| quote(v.as_ref())).join(",");
        self.push(column, format!("in.({list})"))
    }

    pub fn order_desc(self, column: &str) -> Self {
        self.push("order", format!("{column}.desc"))
    }

    pub fn order_asc(self, column: &str) -> Self {
        self.push("order", format!("{column}.asc"))
    }

    pub fn limit(self, limit: u64) -> Self {
        self.push("limit", limit.to_string())
    }

    pub fn paginate(self, pagination: &Pagination) -> Self {
        let Pagination { offset, limit } = *pagination;
        let query = match offset {
            Some(offset) if offset > 0 => self.push("offset", offset.to_string()),
            _ => self,
        };
        match limit {
            Some(limit) => query.limit(limit),
            None => query,
        }
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.pairs)
            .finish()
    }
}

/// Values inside `in.(...)` lists must be quoted if they contain
/// reserved characters.
fn quote(value: &str) -> String {
    if value.contains([',', '(', ')', '"', '\\', ' ']) {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_owned()
    }
}

/// Total count of a `Content-Range` header like `0-24/3573` or `*/0`.
pub(crate) fn total_from_content_range(header: &str) -> Option<usize> {
    header.rsplit_once('/')?.1.trim().parse().ok()
}
