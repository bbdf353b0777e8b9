use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use diesel::{
    backend::Backend,
    deserialize::{self, FromSql, FromSqlRow},
    expression::AsExpression,
    prelude::*,
    serialize::{self, Output, ToSql},
    sql_types::Text,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bedroom count of a listing, in the Portuguese "T" notation.
///
/// On the wire and in the store every variant is its literal (`"T6+"` for
/// [`NumBedrooms::T6Plus`]).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, AsExpression, FromSqlRow, Serialize, Deserialize,
)]
#[diesel(sql_type = Text)]
#[serde(try_from = "String", into = "String")]
pub enum NumBedrooms {
    T0,
    T1,
    T2,
    T3,
    T4,
    T5,
    T6,
    T6Plus,
}

impl NumBedrooms {
    pub const ALL: [NumBedrooms; 8] = [
        NumBedrooms::T0,
        NumBedrooms::T1,
        NumBedrooms::T2,
        NumBedrooms::T3,
        NumBedrooms::T4,
        NumBedrooms::T5,
        NumBedrooms::T6,
        NumBedrooms::T6Plus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NumBedrooms::T0 => "T0",
            NumBedrooms::T1 => "T1",
            NumBedrooms::T2 => "T2",
            NumBedrooms::T3 => "T3",
            NumBedrooms::T4 => "T4",
            NumBedrooms::T5 => "T5",
            NumBedrooms::T6 => "T6",
            NumBedrooms::T6Plus => "T6+",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a valid enum member; expected one of 'T0', 'T1', 'T2', 'T3', 'T4', 'T5', 'T6', 'T6+'")]
pub struct InvalidNumBedrooms(pub String);

impl FromStr for NumBedrooms {
    type Err = InvalidNumBedrooms;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NumBedrooms::ALL
            .into_iter()
            .find(|variant| variant.as_str() == s)
            .ok_or_else(|| InvalidNumBedrooms(s.to_string()))
    }
}

impl TryFrom<String> for NumBedrooms {
    type Error = InvalidNumBedrooms;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NumBedrooms> for String {
    fn from(value: NumBedrooms) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for NumBedrooms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<DB> ToSql<Text, DB> for NumBedrooms
where
    DB: Backend,
    str: ToSql<Text, DB>,
{
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, DB>) -> serialize::Result {
        <str as ToSql<Text, DB>>::to_sql(self.as_str(), out)
    }
}

impl<DB> FromSql<Text, DB> for NumBedrooms
where
    DB: Backend,
    String: FromSql<Text, DB>,
{
    fn from_sql(bytes: DB::RawValue<'_>) -> deserialize::Result<Self> {
        let raw = <String as FromSql<Text, DB>>::from_sql(bytes)?;
        raw.parse().map_err(Into::into)
    }
}

/// A stored listing. `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::db::schema::properties)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Property {
    pub id: i32,
    pub description: String,
    pub number_bedrooms: NumBedrooms,
    pub price: f64,
    pub area: f64,
    pub location: String,
    pub created_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_literals_parse_back() {
        let literals = ["T0", "T1", "T2", "T3", "T4", "T5", "T6", "T6+"];
        for (literal, variant) in literals.iter().zip(NumBedrooms::ALL) {
            assert_eq!(literal.parse::<NumBedrooms>(), Ok(variant));
            assert_eq!(variant.to_string(), *literal);
        }
    }

    #[test]
    fn t6_plus_uses_literal_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&NumBedrooms::T6Plus).unwrap(),
            "\"T6+\""
        );
        let parsed: NumBedrooms = serde_json::from_str("\"T6+\"").unwrap();
        assert_eq!(parsed, NumBedrooms::T6Plus);
    }

    #[test]
    fn rejects_values_outside_the_enumeration() {
        for bad in ["T9", "t2", "T6Plus", "", "T7"] {
            let err = bad.parse::<NumBedrooms>().unwrap_err();
            assert!(err.to_string().contains("not a valid enum member"));
        }
        assert!(serde_json::from_str::<NumBedrooms>("2").is_err());
    }
}
