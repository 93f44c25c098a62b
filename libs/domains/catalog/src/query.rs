//! Filtering, sorting and pagination shared by every catalog listing.
//!
//! The repository applies [`select`] to its stored products, and the
//! client-side fallback catalog applies the same predicates to its local
//! summaries. Anything that implements [`Catalogued`] can be listed.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};

use crate::models::Pagination;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 12;
pub const DEFAULT_SORT_BY: &str = "name";

/// A record that can be filtered and sorted by the catalog query.
pub trait Catalogued {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn category(&self) -> &str;
    fn sort_value(&self, field: SortField) -> SortValue;
}

/// Sort direction
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Product fields a listing can be sorted by, named as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "camelCase")]
pub enum SortField {
    Id,
    Name,
    Category,
    Description,
    FullDescription,
    Image,
    ExpiryDate,
    Manufacturer,
    BatchNumber,
    InStock,
    StockQuantity,
    Price,
    Currency,
    Ingredients,
    Usage,
    Storage,
    Warnings,
    PdfBrochure,
    Certifications,
    LastUpdated,
}

/// Comparable projection of a field. The variant picks the comparator.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    /// Compared case-folded
    Text(String),
    /// Compared byte-wise, no folding
    Raw(String),
    Number(f64),
    Flag(bool),
    Date(NaiveDate),
    Instant(DateTime<Utc>),
    /// Field not present on this record type
    Missing,
}

impl SortValue {
    pub fn text(value: &str) -> Self {
        SortValue::Text(value.to_lowercase())
    }

    /// Three-way comparison. Mismatched or missing values compare equal.
    pub fn compare(&self, other: &SortValue) -> Ordering {
        use SortValue::*;
        match (self, other) {
            (Text(a), Text(b)) | (Raw(a), Raw(b)) => a.cmp(b),
            (Number(a), Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Flag(a), Flag(b)) => a.cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            (Instant(a), Instant(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Listing parameters.
///
/// Parsing never fails on bad values: unparsable `page`/`limit` and a blank
/// `sortBy` fall back to their defaults, and unknown `sortOrder` values mean
/// `asc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Exact category, case-insensitive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Substring of name or description, case-insensitive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// 1-based page number
    #[serde(default = "default_page", deserialize_with = "lenient_page")]
    #[param(default = 1)]
    pub page: u32,
    /// Page size
    #[serde(default = "default_limit", deserialize_with = "lenient_limit")]
    #[param(default = 12)]
    pub limit: u32,
    /// Any product field name
    #[serde(default = "default_sort_by", deserialize_with = "lenient_sort_by")]
    #[param(default = "name")]
    pub sort_by: String,
    #[serde(default, deserialize_with = "lenient_sort_order")]
    pub sort_order: SortOrder,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            category: None,
            search: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort_by: DEFAULT_SORT_BY.to_string(),
            sort_order: SortOrder::Asc,
        }
    }
}

impl ProductQuery {
    /// Build from decoded `key=value` pairs. The first occurrence of a key
    /// wins and unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        let mut seen: Vec<String> = Vec::new();

        for (key, value) in pairs {
            if seen.contains(&key) {
                continue;
            }
            match key.as_str() {
                "category" => query.category = Some(value),
                "search" => query.search = Some(value),
                "page" => query.page = count_or(&value, DEFAULT_PAGE),
                "limit" => query.limit = count_or(&value, DEFAULT_LIMIT),
                "sortBy" => query.sort_by = sort_by_or_default(value),
                "sortOrder" => query.sort_order = value.parse().unwrap_or_default(),
                _ => continue,
            }
            seen.push(key);
        }
        query
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn sort(mut self, sort_by: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = sort_by.into();
        self.sort_order = order;
        self
    }

    /// Category filter, with blank values treated as absent.
    pub fn category_filter(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    /// Search term, with blank values treated as absent.
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }

    /// Parsed sort field; `None` for names that are not product fields.
    pub fn sort_field(&self) -> Option<SortField> {
        self.sort_by.parse().ok()
    }
}

/// A slice of a listing plus its paging metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

pub fn matches_category<T: Catalogued + ?Sized>(item: &T, category: &str) -> bool {
    item.category().to_lowercase() == category.to_lowercase()
}

pub fn matches_search<T: Catalogued + ?Sized>(item: &T, term: &str) -> bool {
    let term = term.to_lowercase();
    item.name().to_lowercase().contains(&term) || item.description().to_lowercase().contains(&term)
}

/// Category then search filter, preserving input order.
pub fn filter<'a, T, I>(items: I, query: &ProductQuery) -> Vec<&'a T>
where
    T: Catalogued + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let category = query.category_filter();
    let search = query.search_term();

    items
        .into_iter()
        .filter(|item| category.is_none_or(|c| matches_category(*item, c)))
        .filter(|item| search.is_none_or(|s| matches_search(*item, s)))
        .collect()
}

/// Stable sort by `sort_by`.
///
/// Unknown field names make every comparison equal, so the input order is
/// kept. `Desc` reverses the comparator rather than the output, so ties keep
/// their relative order in both directions.
pub fn sort<T: Catalogued>(items: &mut [T], sort_by: &str, order: SortOrder) {
    let Ok(field) = SortField::from_str(sort_by) else {
        tracing::debug!(sort_by, "Unknown sort field, keeping store order");
        return;
    };

    items.sort_by(|a, b| {
        let ordering = a.sort_value(field).compare(&b.sort_value(field));
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

/// Slice `[(page-1)*limit, page*limit)` out of `items`.
///
/// `page == 0` and `limit == 0` both produce an empty slice; `limit == 0`
/// also reports zero pages.
pub fn paginate<T>(items: Vec<T>, page: u32, limit: u32) -> Page<T> {
    let total = items.len();
    let total_pages = if limit == 0 {
        0
    } else {
        total.div_ceil(limit as usize)
    };

    let items = if page == 0 || limit == 0 {
        Vec::new()
    } else {
        let start = (page as usize - 1).saturating_mul(limit as usize);
        items.into_iter().skip(start).take(limit as usize).collect()
    };

    Page {
        items,
        pagination: Pagination {
            page,
            limit,
            total,
            total_pages,
        },
    }
}

/// Filter, sort and paginate in one pass over borrowed records.
pub fn select<'a, T, I>(items: I, query: &ProductQuery) -> Page<T>
where
    T: Catalogued + Clone + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut matched: Vec<T> = filter(items, query).into_iter().cloned().collect();
    sort(&mut matched, &query.sort_by, query.sort_order);
    paginate(matched, query.page, query.limit)
}

/// Sort choices offered by the catalog grid, in `field-order` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum SortPreset {
    #[strum(serialize = "name-asc")]
    NameAsc,
    #[strum(serialize = "name-desc")]
    NameDesc,
    #[strum(serialize = "price-asc")]
    PriceAsc,
    #[strum(serialize = "price-desc")]
    PriceDesc,
    #[strum(serialize = "expiryDate-asc")]
    ExpiryDateAsc,
    #[strum(serialize = "lastUpdated-desc")]
    LastUpdatedDesc,
}

impl SortPreset {
    pub const ALL: [SortPreset; 6] = [
        SortPreset::NameAsc,
        SortPreset::NameDesc,
        SortPreset::PriceAsc,
        SortPreset::PriceDesc,
        SortPreset::ExpiryDateAsc,
        SortPreset::LastUpdatedDesc,
    ];

    pub fn field(self) -> SortField {
        match self {
            SortPreset::NameAsc | SortPreset::NameDesc => SortField::Name,
            SortPreset::PriceAsc | SortPreset::PriceDesc => SortField::Price,
            SortPreset::ExpiryDateAsc => SortField::ExpiryDate,
            SortPreset::LastUpdatedDesc => SortField::LastUpdated,
        }
    }

    pub fn order(self) -> SortOrder {
        match self {
            SortPreset::NameAsc | SortPreset::PriceAsc | SortPreset::ExpiryDateAsc => {
                SortOrder::Asc
            }
            SortPreset::NameDesc | SortPreset::PriceDesc | SortPreset::LastUpdatedDesc => {
                SortOrder::Desc
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortPreset::NameAsc => "Name (A-Z)",
            SortPreset::NameDesc => "Name (Z-A)",
            SortPreset::PriceAsc => "Price (Low to High)",
            SortPreset::PriceDesc => "Price (High to Low)",
            SortPreset::ExpiryDateAsc => "Expiry Date (Earliest)",
            SortPreset::LastUpdatedDesc => "Recently Updated",
        }
    }
}

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

fn default_sort_by() -> String {
    DEFAULT_SORT_BY.to_string()
}

/// Accepts a number or a numeric string; anything else yields `None`.
struct LenientU32;

impl<'de> de::Visitor<'de> for LenientU32 {
    type Value = Option<u32>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a non-negative integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(v.trim().parse().ok())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(u32::try_from(v).ok())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(u32::try_from(v).ok())
    }

    fn visit_f64<E: de::Error>(self, _v: f64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }
}

fn count_or(raw: &str, default: u32) -> u32 {
    raw.trim().parse().unwrap_or(default)
}

fn sort_by_or_default(raw: String) -> String {
    if raw.trim().is_empty() {
        default_sort_by()
    } else {
        raw
    }
}

fn lenient_page<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(deserializer.deserialize_any(LenientU32)?.unwrap_or(DEFAULT_PAGE))
}

fn lenient_limit<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(deserializer.deserialize_any(LenientU32)?.unwrap_or(DEFAULT_LIMIT))
}

fn lenient_sort_by<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(sort_by_or_default(String::deserialize(deserializer)?))
}

fn lenient_sort_order<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SortOrder, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(raw.parse().unwrap_or_default())
}
