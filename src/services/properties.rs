//! The five property operations. Each call is one transaction on one pooled
//! connection.

use crate::{
    db::{self, Db},
    error::AppError,
    models::property::Property,
    schemas::{CreatePropertyRequest, UpdatePropertyRequest},
};

pub async fn add_property(db: &Db, property: CreatePropertyRequest) -> Result<Property, AppError> {
    db.run(move |conn| db::property::insert(conn, &property)).await
}

pub async fn get_all_properties(db: &Db, limit: u32, skip: u32) -> Result<Vec<Property>, AppError> {
    db.run(move |conn| db::property::get_all(conn, limit.into(), skip.into()))
        .await
}

pub async fn get_property_by_id(db: &Db, property_id: i32) -> Result<Property, AppError> {
    db.run(move |conn| db::property::get_by_id(conn, property_id))
        .await?
        .ok_or(AppError::NotFound(property_id))
}

pub async fn update_property(
    db: &Db,
    property_id: i32,
    property: UpdatePropertyRequest,
) -> Result<Property, AppError> {
    db.run(move |conn| db::property::update(conn, property_id, &property))
        .await?
        .ok_or(AppError::NotFound(property_id))
}

pub async fn delete_property(db: &Db, property_id: i32) -> Result<(), AppError> {
    let deleted = db
        .run(move |conn| db::property::delete(conn, property_id))
        .await?;

    if deleted {
        Ok(())
    } else {
        Err(AppError::NotFound(property_id))
    }
}
