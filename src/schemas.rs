//! Shapes crossing the HTTP boundary.

use diesel::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    db::schema::properties,
    models::property::{NumBedrooms, Property},
};

/// Every field is mandatory; no range or content checks beyond the enumeration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Insertable)]
#[diesel(table_name = properties)]
pub struct CreatePropertyRequest {
    pub description: String,
    pub number_bedrooms: NumBedrooms,
    pub price: f64,
    pub area: f64,
    pub location: String,
}

/// Partial update. `None` means the field was left out of the request and the
/// stored value stays as it is; an explicit `null` is rejected while parsing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, AsChangeset)]
#[diesel(table_name = properties)]
pub struct UpdatePropertyRequest {
    #[serde(default, deserialize_with = "present")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub number_bedrooms: Option<NumBedrooms>,
    #[serde(default, deserialize_with = "present")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "present")]
    pub area: Option<f64>,
    #[serde(default, deserialize_with = "present")]
    pub location: Option<String>,
}

impl UpdatePropertyRequest {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.number_bedrooms.is_none()
            && self.price.is_none()
            && self.area.is_none()
            && self.location.is_none()
    }
}

/// Only called for keys that appear in the payload, so a `null` fails to
/// deserialize into `T` instead of collapsing into "not supplied".
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyResponse {
    pub id: i32,
    pub description: String,
    pub number_bedrooms: NumBedrooms,
    pub price: f64,
    pub area: f64,
    pub location: String,
}

impl From<Property> for PropertyResponse {
    fn from(property: Property) -> Self {
        PropertyResponse {
            id: property.id,
            description: property.description,
            number_bedrooms: property.number_bedrooms,
            price: property.price,
            area: property.area,
            location: property.location,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertiesListResponse {
    pub properties: Vec<PropertyResponse>,
}

impl From<Vec<Property>> for PropertiesListResponse {
    fn from(properties: Vec<Property>) -> Self {
        PropertiesListResponse {
            properties: properties.into_iter().map(PropertyResponse::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Message {
            message: message.into(),
        }
    }
}
