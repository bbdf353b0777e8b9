#[cfg(test)]
mod property_store {
    use chrono::{Duration, Utc};
    use diesel::{connection::SimpleConnection, sql_query, RunQueryDsl};
    use property_api::{
        config,
        db::Db,
        error::AppError,
        models::property::NumBedrooms,
        schemas::{CreatePropertyRequest, UpdatePropertyRequest},
        services::properties::{
            add_property, delete_property, get_all_properties, get_property_by_id,
            update_property,
        },
    };

    fn test_db() -> Db {
        Db::connect(&config::create_test_config()).unwrap()
    }

    fn flat() -> CreatePropertyRequest {
        CreatePropertyRequest {
            description: "Flat".to_string(),
            number_bedrooms: NumBedrooms::T2,
            price: 1200.0,
            area: 60.0,
            location: "Porto".to_string(),
        }
    }

    fn listing(n: usize) -> CreatePropertyRequest {
        CreatePropertyRequest {
            description: format!("Listing {n}"),
            number_bedrooms: NumBedrooms::ALL[n % NumBedrooms::ALL.len()],
            price: 1000.0 + n as f64,
            area: 40.0 + n as f64,
            location: "Lisbon".to_string(),
        }
    }

    #[tokio::test]
    async fn add_then_get_returns_the_same_fields() {
        let db = test_db();
        let created = add_property(&db, flat()).await.unwrap();
        assert_eq!(created.id, 1);
        assert!(created.created_at <= Utc::now().naive_utc() + Duration::minutes(1));

        let fetched = get_property_by_id(&db, created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.description, "Flat");
        assert_eq!(fetched.number_bedrooms, NumBedrooms::T2);
        assert_eq!(fetched.price, 1200.0);
        assert_eq!(fetched.area, 60.0);
        assert_eq!(fetched.location, "Porto");
    }

    #[tokio::test]
    async fn stores_t6_plus_and_unbounded_numbers() {
        let db = test_db();
        let request = CreatePropertyRequest {
            number_bedrooms: NumBedrooms::T6Plus,
            price: -100.0,
            area: 0.0,
            ..flat()
        };
        let created = add_property(&db, request).await.unwrap();
        let fetched = get_property_by_id(&db, created.id).await.unwrap();
        assert_eq!(fetched.number_bedrooms, NumBedrooms::T6Plus);
        assert_eq!(fetched.price, -100.0);
        assert_eq!(fetched.area, 0.0);
    }

    #[tokio::test]
    async fn partial_update_leaves_other_fields_alone() {
        let db = test_db();
        let created = add_property(&db, flat()).await.unwrap();

        let changes = UpdatePropertyRequest {
            price: Some(1300.0),
            location: Some("Braga".to_string()),
            ..Default::default()
        };
        let updated = update_property(&db, created.id, changes).await.unwrap();
        assert_eq!(updated.price, 1300.0);
        assert_eq!(updated.location, "Braga");
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.number_bedrooms, created.number_bedrooms);
        assert_eq!(updated.area, created.area);
        assert_eq!(updated.created_at, created.created_at);

        let fetched = get_property_by_id(&db, created.id).await.unwrap();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn empty_update_returns_current_row() {
        let db = test_db();
        let created = add_property(&db, flat()).await.unwrap();
        let unchanged = update_property(&db, created.id, UpdatePropertyRequest::default())
            .await
            .unwrap();
        assert_eq!(unchanged, created);

        let missing = update_property(&db, 42, UpdatePropertyRequest::default()).await;
        assert!(matches!(missing, Err(AppError::NotFound(42))));
    }

    #[tokio::test]
    async fn update_of_missing_row_is_not_found() {
        let db = test_db();
        let changes = UpdatePropertyRequest {
            price: Some(1.0),
            ..Default::default()
        };
        let result = update_property(&db, 7, changes).await;
        assert!(matches!(result, Err(AppError::NotFound(7))));
    }

    #[tokio::test]
    async fn get_of_missing_row_is_not_found() {
        let db = test_db();
        let result = get_property_by_id(&db, 999).await;
        assert!(matches!(result, Err(AppError::NotFound(999))));
    }

    #[tokio::test]
    async fn delete_is_terminal_and_repeatable() {
        let db = test_db();
        let created = add_property(&db, flat()).await.unwrap();

        delete_property(&db, created.id).await.unwrap();
        assert!(matches!(
            get_property_by_id(&db, created.id).await,
            Err(AppError::NotFound(_))
        ));

        for _ in 0..2 {
            let result = delete_property(&db, created.id).await;
            assert!(matches!(result, Err(AppError::NotFound(id)) if id == created.id));
        }
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let db = test_db();
        let first = add_property(&db, flat()).await.unwrap();
        delete_property(&db, first.id).await.unwrap();
        let second = add_property(&db, flat()).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn pagination_skips_then_limits_by_ascending_id() {
        let db = test_db();
        let total = 7;
        for n in 0..total {
            add_property(&db, listing(n)).await.unwrap();
        }

        for (limit, skip) in [(3u32, 0u32), (3, 5), (10, 0), (0, 0), (2, 7), (5, 100)] {
            let page = get_all_properties(&db, limit, skip).await.unwrap();
            let expected = (limit as usize).min(total.saturating_sub(skip as usize));
            assert_eq!(page.len(), expected, "limit={limit} skip={skip}");

            let ids: Vec<i32> = page.iter().map(|p| p.id).collect();
            let expected_ids: Vec<i32> = (0..expected).map(|i| skip as i32 + i as i32 + 1).collect();
            assert_eq!(ids, expected_ids);
        }
    }

    #[tokio::test]
    async fn concurrent_inserts_get_distinct_ids() {
        let db = test_db();
        let handles: Vec<_> = (0..10)
            .map(|n| {
                let db = db.clone();
                tokio::spawn(async move { add_property(&db, listing(n)).await })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 10);
        assert_eq!(get_all_properties(&db, 100, 0).await.unwrap().len(), 10);
    }

    async fn execute_sql(db: &Db, sql: &'static str) {
        db.run(move |conn| conn.batch_execute(sql)).await.unwrap();
    }

    #[tokio::test]
    async fn rejected_insert_leaves_no_row() {
        let db = test_db();
        execute_sql(
            &db,
            "CREATE TRIGGER reject_insert AFTER INSERT ON properties \
             BEGIN SELECT RAISE(ABORT, 'listing rejected'); END;",
        )
        .await;

        let result = add_property(&db, flat()).await;
        assert!(matches!(result, Err(AppError::Store(_))));

        execute_sql(&db, "DROP TRIGGER reject_insert;").await;
        assert!(get_all_properties(&db, 100, 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejected_update_keeps_previous_values() {
        let db = test_db();
        let created = add_property(&db, flat()).await.unwrap();
        execute_sql(
            &db,
            "CREATE TRIGGER reject_update AFTER UPDATE ON properties \
             BEGIN SELECT RAISE(ABORT, 'listing frozen'); END;",
        )
        .await;

        let changes = UpdatePropertyRequest {
            price: Some(1.0),
            description: Some("Changed".to_string()),
            ..Default::default()
        };
        let result = update_property(&db, created.id, changes).await;
        assert!(matches!(result, Err(AppError::Store(_))));

        let fetched = get_property_by_id(&db, created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn store_rejects_bedrooms_outside_the_enumeration() {
        let db = test_db();
        let result = db
            .run(|conn| {
                sql_query(
                    "INSERT INTO properties (description, number_bedrooms, price, area, location) \
                     VALUES ('Flat', 'T9', 1.0, 1.0, 'Porto')",
                )
                .execute(conn)
            })
            .await;
        assert!(matches!(result, Err(AppError::Store(_))));
        assert!(get_all_properties(&db, 100, 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_table_surfaces_as_store_error() {
        let db = test_db();
        execute_sql(&db, "DROP TABLE properties;").await;

        assert!(matches!(add_property(&db, flat()).await, Err(AppError::Store(_))));
        assert!(matches!(get_property_by_id(&db, 1).await, Err(AppError::Store(_))));
        assert!(matches!(delete_property(&db, 1).await, Err(AppError::Store(_))));
    }
}
