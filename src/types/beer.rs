//! Beer Types
//!
//! The catalog record as exchanged with the catalog service.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Server-assigned record identifier.
///
/// The service issues UUIDs, but the id is carried as opaque text so any
/// value the server echoes back round-trips unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BeerId(String);

impl BeerId {
    /// Wrap an id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as sent on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BeerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for BeerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<Uuid> for BeerId {
    fn from(id: Uuid) -> Self {
        Self(id.hyphenated().to_string())
    }
}

/// A beer record.
///
/// `id`, `version`, `created_date` and `update_date` are assigned by the
/// server; they are stripped from create requests and only echoed back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeerDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BeerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
    pub beer_name: String,
    pub beer_style: BeerStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity_on_hand: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_date: Option<NaiveDateTime>,
}

impl BeerDto {
    /// Create a record with only the required fields set.
    pub fn new(beer_name: impl Into<String>, beer_style: BeerStyle) -> Self {
        Self {
            id: None,
            version: None,
            beer_name: beer_name.into(),
            beer_style,
            upc: None,
            quantity_on_hand: None,
            price: None,
            created_date: None,
            update_date: None,
        }
    }

    /// Set the UPC code.
    pub fn with_upc(mut self, upc: impl Into<String>) -> Self {
        self.upc = Some(upc.into());
        self
    }

    /// Set the quantity on hand.
    pub fn with_quantity_on_hand(mut self, quantity: u32) -> Self {
        self.quantity_on_hand = Some(quantity);
        self
    }

    /// Set the price.
    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    /// Set the id.
    pub fn with_id(mut self, id: impl Into<BeerId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Copy of this record without any server-assigned fields.
    pub fn without_server_fields(&self) -> Self {
        Self {
            id: None,
            version: None,
            created_date: None,
            update_date: None,
            ..self.clone()
        }
    }
}

/// Beer style. Closed set; unknown wire values fail to decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BeerStyle {
    Lager,
    Pilsner,
    Stout,
    Gose,
    Porter,
    Ale,
    Wheat,
    Ipa,
    PaleAle,
    Saison,
}

impl BeerStyle {
    /// Every style, in declaration order.
    pub const ALL: [BeerStyle; 10] = [
        Self::Lager,
        Self::Pilsner,
        Self::Stout,
        Self::Gose,
        Self::Porter,
        Self::Ale,
        Self::Wheat,
        Self::Ipa,
        Self::PaleAle,
        Self::Saison,
    ];

    /// Wire name, as used in JSON bodies and the `style` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lager => "LAGER",
            Self::Pilsner => "PILSNER",
            Self::Stout => "STOUT",
            Self::Gose => "GOSE",
            Self::Porter => "PORTER",
            Self::Ale => "ALE",
            Self::Wheat => "WHEAT",
            Self::Ipa => "IPA",
            Self::PaleAle => "PALE_ALE",
            Self::Saison => "SAISON",
        }
    }
}

impl fmt::Display for BeerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown beer style.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown beer style: {0}")]
pub struct UnknownBeerStyle(pub String);

impl FromStr for BeerStyle {
    type Err = UnknownBeerStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| UnknownBeerStyle(s.to_string()))
    }
}
