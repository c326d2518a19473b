//! Query Types
//!
//! Optional filter and paging parameters for listing beers.

use crate::types::BeerStyle;

/// Filter and paging parameters for a single list call.
///
/// A plain value: the client reads it while building one request URI and
/// keeps nothing from it afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BeerQuery {
    /// Beer name filter. Blank names are treated as absent.
    pub name: Option<String>,
    /// Beer style filter.
    pub style: Option<BeerStyle>,
    /// Ask the server to include inventory figures.
    pub show_inventory: Option<bool>,
    /// Zero-based page number.
    pub page_number: Option<u32>,
    /// Page size.
    pub page_size: Option<u32>,
}

impl BeerQuery {
    /// Create an empty query (no filters, server default paging).
    pub fn new() -> Self {
        Self::default()
    }

    /// Query with only the name filter set.
    pub fn by_name(name: impl Into<String>) -> Self {
        Self::new().name(name)
    }

    /// Set name filter.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set style filter.
    pub fn style(mut self, style: BeerStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Set show-inventory flag.
    pub fn show_inventory(mut self, show: bool) -> Self {
        self.show_inventory = Some(show);
        self
    }

    /// Set page number.
    pub fn page_number(mut self, page: u32) -> Self {
        self.page_number = Some(page);
        self
    }

    /// Set page size.
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Query parameters in canonical order, present fields only.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(5);

        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            pairs.push(("name", name.to_string()));
        }
        if let Some(style) = self.style {
            pairs.push(("style", style.as_str().to_string()));
        }
        if let Some(show) = self.show_inventory {
            pairs.push(("showInventory", show.to_string()));
        }
        if let Some(page) = self.page_number {
            pairs.push(("pageNumber", page.to_string()));
        }
        if let Some(size) = self.page_size {
            pairs.push(("pageSize", size.to_string()));
        }

        pairs
    }
}
