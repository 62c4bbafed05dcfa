#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, Router};
    use serde_json::{json, Value};

    use crate::tests::{send, setup_test_app};

    async fn create_category(app: &Router, code: &str) -> i64 {
        let (status, body) = send(
            app,
            "POST",
            "/category/add_category",
            Some(json!({ "code": code, "category": "Beverages", "description": "Drinks" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_i64().unwrap()
    }

    async fn create_quarter(app: &Router) -> i64 {
        let (status, body) = send(
            app,
            "POST",
            "/financial/add_quarter",
            Some(json!({
                "year": 2025,
                "start_date": "2025-01-01T00:00:00Z",
                "end_date": "2025-03-31T23:59:59Z",
                "description": "Q1"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_i64().unwrap()
    }

    fn product_body(code: &str, barcode: Value, barcode_type: &str, category_id: i64, quarter_id: i64) -> Value {
        json!({
            "product_code": code,
            "product_name": "Cola 355ml",
            "barcode": barcode,
            "barcode_type": barcode_type,
            "description": "Canned soft drink",
            "category_id": category_id,
            "selling_price": 1.25,
            "stock_count": 40,
            "reorder_level": 10,
            "financial_quarter_id": quarter_id
        })
    }

    async fn setup_with_refs() -> (Router, crate::state::AppState, tempfile::TempDir, i64, i64) {
        let (app, state, dir) = setup_test_app().await;
        let category_id = create_category(&app, "BEV").await;
        let quarter_id = create_quarter(&app).await;
        (app, state, dir, category_id, quarter_id)
    }

    // ---------------------- categories ----------------------

    #[tokio::test]
    async fn test_add_and_get_category() {
        let (app, _state, _dir) = setup_test_app().await;
        let id = create_category(&app, "BEV").await;

        let (status, body) = send(&app, "GET", &format!("/category/get_category_by_id/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], "BEV");
        assert_eq!(body["category"], "Beverages");
        assert!(body["date_created"].is_string());
        assert!(body["date_updated"].is_null());

        let (status, body) = send(&app, "GET", "/category/get_category_by_code/BEV", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"].as_i64(), Some(id));
    }

    #[tokio::test]
    async fn test_duplicate_category_code_conflicts() {
        let (app, _state, _dir) = setup_test_app().await;
        create_category(&app, "BEV").await;

        let (status, body) = send(
            &app,
            "POST",
            "/category/add_category",
            Some(json!({ "code": "BEV", "category": "Other" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");
        assert_eq!(body["error"]["message"], "A category with code BEV already exists.");
    }

    #[tokio::test]
    async fn test_category_code_too_long() {
        let (app, _state, _dir) = setup_test_app().await;
        let (status, body) = send(
            &app,
            "POST",
            "/category/add_category",
            Some(json!({ "code": "TOOLONG", "category": "Other" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["details"]["field"], "code");
    }

    #[tokio::test]
    async fn test_missing_category_is_404() {
        let (app, _state, _dir) = setup_test_app().await;
        let (status, _) = send(&app, "GET", "/category/get_category_by_id/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, "GET", "/category/get_category_by_code/NOPE", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_categories_newest_first() {
        let (app, _state, _dir) = setup_test_app().await;
        create_category(&app, "A").await;
        create_category(&app, "B").await;

        let (status, body) = send(&app, "GET", "/category/get_categories", None).await;
        assert_eq!(status, StatusCode::OK);
        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["code"], "B");
        assert_eq!(items[1]["code"], "A");
    }

    #[tokio::test]
    async fn test_update_category() {
        let (app, _state, _dir) = setup_test_app().await;
        let id = create_category(&app, "BEV").await;

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/category/update_category/{}", id),
            Some(json!({ "code": "DRK", "category": "Drinks", "description": null })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], "DRK");
        assert_eq!(body["category"], "Drinks");
        assert!(body["description"].is_null());
        assert!(body["date_updated"].is_string());

        let (status, _) = send(
            &app,
            "PUT",
            "/category/update_category/999",
            Some(json!({ "code": "X", "category": "Y" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_category_to_taken_code_conflicts() {
        let (app, _state, _dir) = setup_test_app().await;
        create_category(&app, "A").await;
        let b = create_category(&app, "B").await;

        let (status, _) = send(
            &app,
            "PUT",
            &format!("/category/update_category/{}", b),
            Some(json!({ "code": "A", "category": "Clash" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    // ---------------------- financial quarters ----------------------

    #[tokio::test]
    async fn test_add_and_get_quarter() {
        let (app, _state, _dir) = setup_test_app().await;
        let id = create_quarter(&app).await;

        let (status, body) = send(&app, "GET", &format!("/financial/get_quarter_id/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["year"], 2025);
        assert_eq!(body["start_date"], "2025-01-01T00:00:00Z");
        assert_eq!(body["description"], "Q1");

        let (status, body) = send(&app, "GET", "/financial/get_quarters", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_quarter_end_before_start_rejected() {
        let (app, _state, _dir) = setup_test_app().await;
        let (status, body) = send(
            &app,
            "POST",
            "/financial/add_quarter",
            Some(json!({
                "year": 2025,
                "start_date": "2025-04-01T00:00:00Z",
                "end_date": "2025-01-01T00:00:00Z"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["details"]["field"], "end_date");
    }

    #[tokio::test]
    async fn test_missing_quarter_is_404() {
        let (app, _state, _dir) = setup_test_app().await;
        let (status, body) = send(&app, "GET", "/financial/get_quarter_id/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    // ---------------------- products ----------------------

    #[tokio::test]
    async fn test_add_product_with_valid_upc() {
        let (app, _state, _dir, category_id, quarter_id) = setup_with_refs().await;

        let (status, body) = send(
            &app,
            "POST",
            "/products/add_products",
            Some(product_body("P0001", json!("  036000291452 "), "UPC", category_id, quarter_id)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        assert_eq!(body["barcode"], "036000291452");
        assert_eq!(body["barcode_type"], "UPC");
        assert_eq!(body["stock_count"], 40);

        let id = body["id"].as_i64().unwrap();
        let (status, body) = send(&app, "GET", &format!("/products/get_product_by_id/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["product_code"], "P0001");

        let (status, body) = send(&app, "GET", "/products/get_product_by_code/P0001", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"].as_i64(), Some(id));
    }

    #[tokio::test]
    async fn test_add_product_accepts_enum_style_type() {
        let (app, _state, _dir, category_id, quarter_id) = setup_with_refs().await;

        let (status, body) = send(
            &app,
            "POST",
            "/products/add_products",
            Some(product_body("P0002", json!("4006381333931"), "EAN_13", category_id, quarter_id)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        assert_eq!(body["barcode_type"], "EAN-13");
    }

    #[tokio::test]
    async fn test_bad_check_digit_is_422_and_not_persisted() {
        let (app, _state, _dir, category_id, quarter_id) = setup_with_refs().await;

        let (status, body) = send(
            &app,
            "POST",
            "/products/add_products",
            Some(product_body("P0001", json!("036000291451"), "UPC", category_id, quarter_id)),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "INVALID_BARCODE_CHECKSUM");
        assert_eq!(body["error"]["message"], "Invalid check digit for UPC: expected 2, found 1");
        assert_eq!(body["error"]["details"]["expected_check_digit"], 2);
        assert_eq!(body["error"]["details"]["actual_check_digit"], 1);

        let (_, body) = send(&app, "GET", "/products/get_products", None).await;
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bad_format_is_422() {
        let (app, _state, _dir, category_id, quarter_id) = setup_with_refs().await;

        let (status, body) = send(
            &app,
            "POST",
            "/products/add_products",
            Some(product_body("P0001", json!("1234567"), "EAN-8", category_id, quarter_id)),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "INVALID_BARCODE_FORMAT");
        assert_eq!(body["error"]["message"], "EAN-8 must be exactly 8 digits");
        assert_eq!(body["error"]["details"]["barcode_type"], "EAN-8");
    }

    #[tokio::test]
    async fn test_empty_or_non_string_barcode_is_422() {
        let (app, _state, _dir, category_id, quarter_id) = setup_with_refs().await;

        for barcode in [json!("   "), json!(36000291452u64), Value::Null] {
            let (status, body) = send(
                &app,
                "POST",
                "/products/add_products",
                Some(product_body("P0001", barcode, "UPC", category_id, quarter_id)),
            )
            .await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(body["error"]["code"], "EMPTY_BARCODE");
        }
    }

    #[tokio::test]
    async fn test_missing_and_unknown_barcode_type() {
        let (app, _state, _dir, category_id, quarter_id) = setup_with_refs().await;

        let mut body = product_body("P0001", json!("036000291452"), "UPC", category_id, quarter_id);
        body.as_object_mut().unwrap().remove("barcode_type");
        let (status, resp) = send(&app, "POST", "/products/add_products", Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(resp["error"]["code"], "MISSING_BARCODE_TYPE");

        let (status, resp) = send(
            &app,
            "POST",
            "/products/add_products",
            Some(product_body("P0001", json!("036000291452"), "PDF417", category_id, quarter_id)),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(resp["error"]["code"], "UNKNOWN_BARCODE_TYPE");
        assert_eq!(resp["error"]["details"]["barcode_type"], "PDF417");
        assert_eq!(resp["error"]["details"]["supported"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_duplicate_barcode_and_code_conflict() {
        let (app, _state, _dir, category_id, quarter_id) = setup_with_refs().await;

        let (status, _) = send(
            &app,
            "POST",
            "/products/add_products",
            Some(product_body("P0001", json!("036000291452"), "UPC", category_id, quarter_id)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            &app,
            "POST",
            "/products/add_products",
            Some(product_body("P0002", json!("036000291452"), "UPC", category_id, quarter_id)),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["message"], "A product with barcode 036000291452 already exists.");

        let (status, body) = send(
            &app,
            "POST",
            "/products/add_products",
            Some(product_body("P0001", json!("73513537"), "EAN-8", category_id, quarter_id)),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["message"], "A product with code P0001 already exists.");
    }

    #[tokio::test]
    async fn test_product_requires_existing_category_and_quarter() {
        let (app, _state, _dir, category_id, quarter_id) = setup_with_refs().await;

        let (status, _) = send(
            &app,
            "POST",
            "/products/add_products",
            Some(product_body("P0001", json!("036000291452"), "UPC", 999, quarter_id)),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            "POST",
            "/products/add_products",
            Some(product_body("P0001", json!("036000291452"), "UPC", category_id, 999)),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_reorder_level_above_stock_rejected() {
        let (app, _state, _dir, category_id, quarter_id) = setup_with_refs().await;

        let mut body = product_body("P0001", json!("036000291452"), "UPC", category_id, quarter_id);
        body["reorder_level"] = json!(50);
        let (status, resp) = send(&app, "POST", "/products/add_products", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp["error"]["details"]["field"], "reorder_level");
    }

    #[tokio::test]
    async fn test_long_qr_code_hits_column_limit() {
        let (app, state, _dir, category_id, quarter_id) = setup_with_refs().await;

        let long = "x".repeat(51);
        let (status, resp) = send(
            &app,
            "POST",
            "/products/add_products",
            Some(product_body("P0001", json!(long), "QRCode", category_id, quarter_id)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp["error"]["details"]["field"], "barcode");

        let m = state.metrics.get_snapshot();
        assert_eq!(m.barcodes_accepted, 0);
        assert_eq!(m.barcodes_rejected_length, 1);
        assert_eq!(m.products_created, 0);

        // the stand-alone check has no storage cap
        let (status, _) = send(
            &app,
            "POST",
            "/products/validate_barcode",
            Some(json!({ "barcode": "x".repeat(51), "barcode_type": "QRCode" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state.metrics.get_snapshot().barcodes_accepted, 1);
    }

    #[tokio::test]
    async fn test_validate_barcode_endpoint() {
        let (app, _state, _dir) = setup_test_app().await;

        let (status, body) = send(
            &app,
            "POST",
            "/products/validate_barcode",
            Some(json!({ "barcode": " 73513537 ", "barcode_type": "EAN-8" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], true);
        assert_eq!(body["barcode"], "73513537");
        assert_eq!(body["barcode_type"], "EAN-8");
        assert_eq!(body["has_check_digit"], true);

        let (status, body) = send(
            &app,
            "POST",
            "/products/validate_barcode",
            Some(json!({ "barcode": "任意のデータ", "barcode_type": "QRCode" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "INVALID_BARCODE_FORMAT");
    }

    #[tokio::test]
    async fn test_barcode_outcomes_are_counted() {
        let (app, state, _dir) = setup_test_app().await;

        for (barcode, kind) in [("036000291452", "UPC"), ("036000291451", "UPC"), ("123", "UPC"), ("", "UPC")] {
            send(
                &app,
                "POST",
                "/products/validate_barcode",
                Some(json!({ "barcode": barcode, "barcode_type": kind })),
            )
            .await;
        }

        let m = state.metrics.get_snapshot();
        assert_eq!(m.barcodes_accepted, 1);
        assert_eq!(m.barcodes_rejected_checksum, 1);
        assert_eq!(m.barcodes_rejected_format, 1);
        assert_eq!(m.barcodes_rejected_empty, 1);
        assert_eq!(m.barcodes_rejected_type, 0);
    }

    // ---------------------- discounts ----------------------

    async fn create_product(app: &Router, category_id: i64, quarter_id: i64) -> i64 {
        let (status, body) = send(
            app,
            "POST",
            "/products/add_products",
            Some(product_body("P0001", json!("036000291452"), "UPC", category_id, quarter_id)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_add_and_list_discounts() {
        let (app, _state, _dir, category_id, quarter_id) = setup_with_refs().await;
        let product_id = create_product(&app, category_id, quarter_id).await;

        let (status, body) = send(
            &app,
            "POST",
            "/discounts/add_discount",
            Some(json!({
                "product_id": product_id,
                "discount_type": "Fixed Amount",
                "discount_value": 0.25,
                "start_date": "2025-02-01",
                "end_date": "2025-02-14"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        assert_eq!(body["discount_type"], "Fixed Amount");
        assert_eq!(body["is_active"], true);
        assert_eq!(body["start_date"], "2025-02-01");

        let (status, body) = send(&app, "GET", &format!("/discounts/get_discounts/{}", product_id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_discount_validation() {
        let (app, _state, _dir, category_id, quarter_id) = setup_with_refs().await;
        let product_id = create_product(&app, category_id, quarter_id).await;

        let (status, body) = send(
            &app,
            "POST",
            "/discounts/add_discount",
            Some(json!({
                "product_id": product_id,
                "discount_type": "Percentage",
                "discount_value": 150.0,
                "start_date": "2025-02-01"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["details"]["field"], "discount_value");

        let (status, _) = send(
            &app,
            "POST",
            "/discounts/add_discount",
            Some(json!({
                "product_id": 999,
                "discount_type": "Percentage",
                "discount_value": 10.0,
                "start_date": "2025-02-01"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "GET", "/discounts/get_discounts/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    // ---------------------- employees ----------------------

    #[tokio::test]
    async fn test_user_groups_and_employees() {
        let (app, state, _dir) = setup_test_app().await;

        let (status, group) = send(
            &app,
            "POST",
            "/employees/add_user_group",
            Some(json!({ "group": "ADMIN", "description": "Administrators" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let group_id = group["id"].as_i64().unwrap();

        let (status, _) = send(&app, "POST", "/employees/add_user_group", Some(json!({ "group": "ADMIN" }))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let employee = json!({
            "employee_id": "EMP000001",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "personal_email": null,
            "company_email": "ada@example.com",
            "user_group_id": group_id,
            "status": "A"
        });
        let (status, body) = send(&app, "POST", "/employees/add_employee", Some(employee.clone())).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        assert_eq!(body["employee_id"], "EMP000001");

        let (status, _) = send(&app, "POST", "/employees/add_employee", Some(employee)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = send(&app, "GET", "/employees/get_employee/EMP000001", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["company_email"], "ada@example.com");

        let (status, body) = send(&app, "GET", "/employees/get_employees", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, body) = send(&app, "GET", "/employees/get_user_groups", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["group"], "ADMIN");

        assert_eq!(state.metrics.get_snapshot().employees_created, 1);
    }

    #[tokio::test]
    async fn test_employee_validation() {
        let (app, _state, _dir) = setup_test_app().await;
        let (_, group) = send(&app, "POST", "/employees/add_user_group", Some(json!({ "group": "STAFF" }))).await;
        let group_id = group["id"].as_i64().unwrap();

        let base = json!({
            "employee_id": "EMP000002",
            "first_name": "Grace",
            "last_name": "Hopper",
            "company_email": "grace@example.com",
            "user_group_id": group_id,
            "status": "A"
        });

        let mut bad_email = base.clone();
        bad_email["company_email"] = json!("not-an-email");
        let (status, body) = send(&app, "POST", "/employees/add_employee", Some(bad_email)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["details"]["field"], "company_email");

        let mut bad_status = base.clone();
        bad_status["status"] = json!("AB");
        let (status, _) = send(&app, "POST", "/employees/add_employee", Some(bad_status)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let mut bad_group = base.clone();
        bad_group["user_group_id"] = json!(999);
        let (status, _) = send(&app, "POST", "/employees/add_employee", Some(bad_group)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "GET", "/employees/get_employee/NOBODY", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
