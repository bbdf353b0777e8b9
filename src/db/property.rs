use diesel::prelude::*;
use log::info;

use super::schema::properties::dsl::*;
use crate::{
    models::property::Property,
    schemas::{CreatePropertyRequest, UpdatePropertyRequest},
};

pub fn insert(conn: &mut SqliteConnection, request: &CreatePropertyRequest) -> QueryResult<Property> {
    conn.transaction(|conn| {
        let inserted: Property = diesel::insert_into(properties)
            .values(request)
            .returning(Property::as_returning())
            .get_result(conn)?;

        info!("Inserted property {} into properties table", inserted.id);
        Ok(inserted)
    })
}

/// Ordered by ascending id; `skip` rows are dropped before `limit` applies.
pub fn get_all(conn: &mut SqliteConnection, limit: i64, skip: i64) -> QueryResult<Vec<Property>> {
    conn.transaction(|conn| {
        properties
            .order(id.asc())
            .limit(limit)
            .offset(skip)
            .select(Property::as_select())
            .load(conn)
    })
}

pub fn get_by_id(conn: &mut SqliteConnection, property_id: i32) -> QueryResult<Option<Property>> {
    conn.transaction(|conn| {
        properties
            .find(property_id)
            .select(Property::as_select())
            .first(conn)
            .optional()
    })
}

/// Writes only the fields present in `changes`. `None` if no row has this id.
pub fn update(
    conn: &mut SqliteConnection,
    property_id: i32,
    changes: &UpdatePropertyRequest,
) -> QueryResult<Option<Property>> {
    conn.transaction(|conn| {
        if changes.is_empty() {
            return properties
                .find(property_id)
                .select(Property::as_select())
                .first(conn)
                .optional();
        }

        let updated: Option<Property> = diesel::update(properties.find(property_id))
            .set(changes)
            .returning(Property::as_returning())
            .get_result(conn)
            .optional()?;

        if let Some(property) = &updated {
            info!("Updated property {} in properties table", property.id);
        }
        Ok(updated)
    })
}

/// `false` if no row has this id.
pub fn delete(conn: &mut SqliteConnection, property_id: i32) -> QueryResult<bool> {
    conn.transaction(|conn| {
        let deleted = diesel::delete(properties.find(property_id)).execute(conn)?;

        if deleted > 0 {
            info!("Deleted property {} from properties table", property_id);
        }
        Ok(deleted > 0)
    })
}
