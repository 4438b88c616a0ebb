// Pagination - page query parsing and envelope assembly
// Storage applies skip/limit; this module only computes the envelope metadata.

use serde::{Deserialize, Serialize};

use crate::infrastructure::database::SortSpec;

pub const DEFAULT_SORT_BY: &str = "createdAt";
pub const DEFAULT_PAGE_NUMBER: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Anything other than `asc` sorts descending
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("asc") {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Sort/page tuple driving a listing request
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    pub sort_by: String,
    pub sort_direction: SortDirection,
    pub page_number: u64,
    pub page_size: u64,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            sort_by: DEFAULT_SORT_BY.to_string(),
            sort_direction: SortDirection::Desc,
            page_number: DEFAULT_PAGE_NUMBER,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageQuery {
    pub fn skip(&self) -> u64 {
        self.page_number
            .saturating_sub(1)
            .saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        self.page_size
    }

    pub fn sort_spec(&self) -> SortSpec {
        SortSpec::new(self.sort_by.clone(), self.sort_direction)
    }
}

/// Query-string form of `PageQuery`. Every field is optional and leniently parsed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPageQuery {
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,
    pub page_number: Option<String>,
    pub page_size: Option<String>,
}

impl From<RawPageQuery> for PageQuery {
    fn from(raw: RawPageQuery) -> Self {
        let sort_by = raw
            .sort_by
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SORT_BY.to_string());

        Self {
            sort_by,
            sort_direction: raw
                .sort_direction
                .as_deref()
                .map(SortDirection::parse)
                .unwrap_or_default(),
            page_number: parse_positive(raw.page_number.as_deref(), DEFAULT_PAGE_NUMBER),
            page_size: parse_positive(raw.page_size.as_deref(), DEFAULT_PAGE_SIZE),
        }
    }
}

fn parse_positive(raw: Option<&str>, default: u64) -> u64 {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|n| *n >= 1)
        .unwrap_or(default)
}

/// Paginated response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub pages_count: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_count: u64,
    pub items: Vec<T>,
}

/// Assemble the envelope for an already sliced page. `items` is not re-sliced.
pub fn paginate<T>(items: Vec<T>, page_size: u64, page_number: u64, total_count: u64) -> Paginated<T> {
    let pages_count = if page_size == 0 {
        0
    } else {
        total_count.div_ceil(page_size)
    };

    Paginated {
        pages_count,
        page: page_number,
        page_size,
        total_count,
        items,
    }
}
