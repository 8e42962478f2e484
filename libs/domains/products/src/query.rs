//! List query composition
//!
//! Turns the raw `category`, `minPrice`, `maxPrice`, `sortBy`, `page` and `limit`
//! query-string values into a typed [`ProductQuery`]: a filter, a sort
//! order and a page window. The result page is paired with [`Pagination`]
//! metadata computed against the same filter.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};

use crate::models::Product;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

/// Raw list parameters exactly as received in the query string
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Only products in this category
    pub category: Option<String>,
    /// Lower price bound (inclusive)
    pub min_price: Option<String>,
    /// Upper price bound (inclusive)
    pub max_price: Option<String>,
    /// `price_asc` or `price_desc`; anything else keeps natural order
    pub sort_by: Option<String>,
    /// 1-based page number, defaults to 1
    pub page: Option<String>,
    /// Page size, defaults to 10
    pub limit: Option<String>,
}

impl<K, V> FromIterator<(K, V)> for ListQuery
where
    K: AsRef<str>,
    V: Into<String>,
{
    /// Collect decoded query pairs. The first occurrence of a repeated key wins and
    /// unknown keys are ignored, so building a `ListQuery` never fails.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(pairs: I) -> Self {
        let mut query = ListQuery::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "category" => &mut query.category,
                "minPrice" => &mut query.min_price,
                "maxPrice" => &mut query.max_price,
                "sortBy" => &mut query.sort_by,
                "page" => &mut query.page,
                "limit" => &mut query.limit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        query
    }
}

/// Conjunction of predicates over product attributes. An empty filter matches
/// every product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

/// Single-key sort order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum SortOrder {
    /// Whatever order the store yields
    #[default]
    Natural,
    PriceAsc,
    PriceDesc,
}

/// Offset/limit slice of the matching set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub limit: u64,
}

/// Fully resolved list request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    pub filter: ProductFilter,
    pub sort: SortOrder,
    pub window: PageWindow,
}

/// Pagination metadata returned alongside a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub limit: u64,
    pub total_products: u64,
}

/// One page of products plus its metadata
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductPage {
    pub data: Vec<Product>,
    pub pagination: Pagination,
}

impl ProductFilter {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Evaluate the filter against a single product
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(ref category) = self.category {
            if &product.category != category {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if product.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if product.price > max {
                return false;
            }
        }
        true
    }
}

impl SortOrder {
    /// Recognizes `price_asc` and `price_desc`; every other value means natural order
    pub fn from_param(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.parse().ok()).unwrap_or_default()
    }

    /// Ordering of two products under this sort. `Natural` keeps them equal so a
    /// stable sort preserves insertion order.
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortOrder::Natural => Ordering::Equal,
            SortOrder::PriceAsc => a.price.total_cmp(&b.price),
            SortOrder::PriceDesc => b.price.total_cmp(&a.price),
        }
    }
}

impl PageWindow {
    /// Build a window, replacing non-positive values by the defaults
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: u64::try_from(page).ok().filter(|p| *p >= 1).unwrap_or(DEFAULT_PAGE),
            limit: u64::try_from(limit)
                .ok()
                .filter(|l| *l >= 1)
                .unwrap_or(DEFAULT_LIMIT),
        }
    }

    /// Number of matching records to skip
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    pub fn new(window: PageWindow, total_products: u64) -> Self {
        Self {
            current_page: window.page,
            total_pages: total_products.div_ceil(window.limit),
            limit: window.limit,
            total_products,
        }
    }
}

impl From<ListQuery> for ProductQuery {
    fn from(raw: ListQuery) -> Self {
        let filter = ProductFilter {
            category: raw.category.filter(|c| !c.is_empty()),
            min_price: raw.min_price.as_deref().and_then(parse_leading_decimal),
            max_price: raw.max_price.as_deref().and_then(parse_leading_decimal),
        };

        let page = raw.page.as_deref().and_then(parse_leading_int);
        let limit = raw.limit.as_deref().and_then(parse_leading_int);

        Self {
            filter,
            sort: SortOrder::from_param(raw.sort_by.as_deref()),
            window: PageWindow::new(
                page.unwrap_or(DEFAULT_PAGE as i64),
                limit.unwrap_or(DEFAULT_LIMIT as i64),
            ),
        }
    }
}

/// Parse the leading decimal number of a string (`"10usd"` is 10, `"1.5e2x"` is 150).
///
/// Accepts an optional sign, digits with an optional fraction, and an optional
/// exponent. No digits, or a non-finite result, counts as absent.
fn parse_leading_decimal(raw: &str) -> Option<f64> {
    let bytes = raw.trim_start().as_bytes();
    let digits_from = |start: usize| {
        start
            + bytes[start.min(bytes.len())..]
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut has_digits = int_end > end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if has_digits || frac_end > end + 1 {
            has_digits = true;
            end = frac_end;
        }
    }
    if !has_digits {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(end + 1 + sign);
        if exp_end > end + 1 + sign {
            end = exp_end;
        }
    }

    std::str::from_utf8(&bytes[..end])
        .ok()?
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// Parse the leading optionally-signed integer of a string (`"12abc"` is 12)
fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let digits_start = usize::from(trimmed.starts_with(['+', '-']));
    let digits_len = trimmed[digits_start..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return None;
    }
    trimmed[..digits_start + digits_len].parse().ok()
}
