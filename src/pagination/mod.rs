//! Pagination handling for catalog list responses.
//!
//! The catalog wraps list results in an envelope:
//! `{"content": [...], "number": 0, "size": 25, "totalElements": 1, ...}`.
//! Extra envelope fields (`pageable`, `sort`, ...) are ignored.

use serde::Deserialize;

use crate::error::DecodeError;
use crate::types::BeerDto;

/// A single page of results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// The items in this page.
    pub content: Vec<T>,
    /// Zero-based page number.
    pub number: u32,
    /// Requested page size.
    pub size: u32,
    /// Total number of elements across all pages.
    pub total_elements: u64,
}

impl<T> Page<T> {
    /// Creates a new page.
    pub fn new(content: Vec<T>, number: u32, size: u32, total_elements: u64) -> Self {
        Self {
            content,
            number,
            size,
            total_elements,
        }
    }

    /// Total page count; zero when the page size is zero.
    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            0
        } else {
            self.total_elements.div_ceil(u64::from(self.size))
        }
    }

    /// Number of items in this page.
    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    /// Returns true if the page is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Returns true if this is the first page.
    pub fn is_first(&self) -> bool {
        self.number == 0
    }

    /// Returns true if there is no page after this one.
    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    /// Returns true if there is a next page.
    pub fn has_next(&self) -> bool {
        u64::from(self.number) + 1 < self.total_pages()
    }

    /// Returns true if there is a previous page.
    pub fn has_previous(&self) -> bool {
        self.number > 0
    }

    /// Iterates over the items in this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.content.iter()
    }

    /// Converts items, keeping the page metadata.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_elements: self.total_elements,
        }
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.content.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.content.iter()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageEnvelope<T> {
    content: Vec<T>,
    number: u32,
    size: u32,
    total_elements: u64,
}

/// Decodes a page envelope of beer records.
///
/// Any malformed element fails the whole page.
pub fn decode_page(body: &str) -> Result<Page<BeerDto>, DecodeError> {
    let envelope: PageEnvelope<BeerDto> = serde_json::from_str(body)?;

    if let Some(index) = envelope.content.iter().position(|beer| beer.id.is_none()) {
        return Err(DecodeError::MissingRecordId { index });
    }

    if envelope.content.len() > envelope.size as usize {
        return Err(DecodeError::PageOverflow {
            content_len: envelope.content.len(),
            size: envelope.size,
        });
    }

    Ok(Page::new(
        envelope.content,
        envelope.number,
        envelope.size,
        envelope.total_elements,
    ))
}

/// Decodes a single beer record; the record must carry an id.
pub fn decode_record(body: &str) -> Result<BeerDto, DecodeError> {
    let beer: BeerDto = serde_json::from_str(body)?;
    if beer.id.is_none() {
        return Err(DecodeError::MissingId);
    }
    Ok(beer)
}
