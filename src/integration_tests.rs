#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::app_system::{RestaurantSystem, SeedData};
    use crate::clients::{DishClient, OrderClient};
    use crate::domain::{Dish, Order, OrderLineItem, OrderStatus};
    use crate::error::ApiError;
    use crate::mock_framework::{create_mock_client, expect_get, expect_update};
    use crate::server::{router, AppState};

    fn app(system: &RestaurantSystem) -> Router {
        router(AppState {
            dishes: system.dish_client.clone(),
            orders: system.order_client.clone(),
        })
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn taco() -> Value {
        json!({"name": "Taco", "description": "spicy", "price": 5, "image_url": "http://x"})
    }

    fn seeded() -> SeedData {
        SeedData {
            dishes: vec![Dish {
                id: 2,
                name: "Falafel".into(),
                description: "crispy".into(),
                price: 8,
                image_url: "http://falafel".into(),
            }],
            orders: vec![
                Order {
                    id: 7,
                    deliver_to: "1 Main St".into(),
                    mobile_number: "555-0100".into(),
                    status: OrderStatus::Pending,
                    dishes: vec![OrderLineItem { dish_id: Some(2), quantity: 1 }],
                },
                Order {
                    id: 3,
                    deliver_to: "2 Side St".into(),
                    mobile_number: "555-0101".into(),
                    status: OrderStatus::Delivered,
                    dishes: vec![OrderLineItem { dish_id: Some(2), quantity: 4 }],
                },
            ],
        }
    }

    fn order_body() -> Value {
        json!({
            "deliverTo": "742 Evergreen Terrace",
            "mobileNumber": "555-0199",
            "dishes": [{"dishId": 2, "quantity": 2}]
        })
    }

    #[tokio::test]
    async fn test_create_dish_on_empty_collection() {
        let system = RestaurantSystem::new(8, SeedData::default());
        let app = app(&system);

        let (status, body) = send(&app, "POST", "/dishes", Some(json!({"data": taco()}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body,
            json!({"data": {"id": 1, "name": "Taco", "description": "spicy", "price": 5, "image_url": "http://x"}})
        );

        let (status, body) = send(&app, "GET", "/dishes", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_invalid_dish_is_not_appended() {
        let system = RestaurantSystem::new(8, SeedData::default());
        let app = app(&system);

        for (field, message) in [
            ("name", "Dish must include a name"),
            ("description", "Dish must include a description"),
            ("price", "Dish must include a price"),
            ("image_url", "Dish must include a image_url"),
        ] {
            let mut dish = taco();
            dish.as_object_mut().unwrap().remove(field);
            let (status, body) = send(&app, "POST", "/dishes", Some(json!({"data": dish}))).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({"status": 400, "message": message}));
        }

        let mut dish = taco();
        dish["price"] = json!(-4);
        let (status, _) = send(&app, "POST", "/dishes", Some(json!({"data": dish}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = send(&app, "GET", "/dishes", None).await;
        assert_eq!(body, json!({"data": []}));
    }

    #[tokio::test]
    async fn test_missing_data_key_is_an_empty_payload() {
        let system = RestaurantSystem::new(8, SeedData::default());
        let app = app(&system);

        let (status, body) = send(&app, "POST", "/dishes", Some(taco())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Dish must include a name");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let system = RestaurantSystem::new(8, SeedData::default());
        let app = app(&system);

        let request = Request::builder()
            .method("POST")
            .uri("/orders")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_dish_update_preserves_id() {
        let system = RestaurantSystem::new(8, seeded());
        let app = app(&system);

        let mut dish = taco();
        dish["id"] = json!(2);
        let (status, body) = send(&app, "PUT", "/dishes/2", Some(json!({"data": dish}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["id"], 2);
        assert_eq!(body["data"]["name"], "Taco");

        let (_, body) = send(&app, "PUT", "/dishes/2", Some(json!({"data": taco()}))).await;
        assert_eq!(body["data"]["id"], 2);

        let (_, body) = send(&app, "GET", "/dishes/2", None).await;
        assert_eq!(body["data"]["name"], "Taco");
    }

    #[tokio::test]
    async fn test_dish_update_rejections_leave_dish_unchanged() {
        let system = RestaurantSystem::new(8, seeded());
        let app = app(&system);

        let mut dish = taco();
        dish["id"] = json!(9);
        let (status, body) = send(&app, "PUT", "/dishes/2", Some(json!({"data": dish}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Dish id does not match route id.Dish: 9, Route:2");

        let mut dish = taco();
        dish["price"] = json!(4.5);
        let (status, body) = send(&app, "PUT", "/dishes/2", Some(json!({"data": dish}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Dish must have a price that is an integer greater than 0");

        let (_, body) = send(&app, "GET", "/dishes/2", None).await;
        assert_eq!(body["data"]["name"], "Falafel");
        assert_eq!(body["data"]["price"], 8);
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let system = RestaurantSystem::new(8, seeded());
        let app = app(&system);

        let (status, body) = send(&app, "GET", "/dishes/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"status": 404, "message": "Dish id not found: 99"}));

        let (status, body) = send(&app, "PUT", "/dishes/abc", Some(json!({"data": taco()}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Dish id not found: abc");

        let (status, body) = send(&app, "DELETE", "/orders/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Order id not found: 42");
    }

    #[tokio::test]
    async fn test_http_fallbacks() {
        let system = RestaurantSystem::new(8, seeded());
        let app = app(&system);

        let (status, body) = send(&app, "DELETE", "/dishes/2", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({"status": 405, "message": "DELETE not allowed for /dishes/2"}));

        let (status, body) = send(&app, "GET", "/menu", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Path not found: /menu");
    }

    #[tokio::test]
    async fn test_order_creation() {
        let system = RestaurantSystem::new(8, seeded());
        let app = app(&system);

        let mut order = order_body();
        order["dishes"] = json!([]);
        let (status, body) = send(&app, "POST", "/orders", Some(json!({"data": order}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Order must include at least one1 dish");

        let mut order = order_body();
        order["dishes"] = json!([{"dishId": 2, "quantity": 1}, {"dishId": 2, "quantity": 0}]);
        let (status, body) = send(&app, "POST", "/orders", Some(json!({"data": order}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Dish 1 must have a quantity that is an integer greater than 0");

        let (_, body) = send(&app, "GET", "/orders", None).await;
        assert_eq!(body["data"].as_array().map(Vec::len), Some(2));

        let (status, body) = send(&app, "POST", "/orders", Some(json!({"data": order_body()}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body,
            json!({"data": {
                "id": 8,
                "deliverTo": "742 Evergreen Terrace",
                "mobileNumber": "555-0199",
                "status": "pending",
                "dishes": [{"dishId": 2, "quantity": 2}]
            }})
        );
    }

    #[tokio::test]
    async fn test_order_update_status() {
        let system = RestaurantSystem::new(8, seeded());
        let app = app(&system);

        let (status, body) = send(&app, "PUT", "/orders/7", Some(json!({"data": {"status": "invalid"}}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "Order must have a status of pending, preparing, out-for-delivery, delivered"
        );
        let (_, body) = send(&app, "GET", "/orders/7", None).await;
        assert_eq!(body["data"]["status"], "pending");
        assert_eq!(body["data"]["deliverTo"], "1 Main St");

        let mut order = order_body();
        order["id"] = json!("7");
        order["status"] = json!("out-for-delivery");
        let (status, body) = send(&app, "PUT", "/orders/7", Some(json!({"data": order}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["id"], 7);
        assert_eq!(body["data"]["status"], "out-for-delivery");
        assert_eq!(body["data"]["deliverTo"], "742 Evergreen Terrace");
    }

    #[tokio::test]
    async fn test_order_deletion_guard() {
        let system = RestaurantSystem::new(8, seeded());
        let app = app(&system);

        let (status, body) = send(&app, "DELETE", "/orders/3", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "An order cannot be deleted unless it is pending");
        let (status, _) = send(&app, "GET", "/orders/3", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, "DELETE", "/orders/7", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, _) = send(&app, "GET", "/orders/7", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (_, body) = send(&app, "GET", "/orders", None).await;
        assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_router_forwards_route_id_to_actor() {
        let (dish_inner, _dish_rx) = create_mock_client::<Dish>(4);
        let (order_inner, mut order_rx) = create_mock_client::<Order>(4);
        let app = router(AppState {
            dishes: DishClient::new(dish_inner),
            orders: OrderClient::new(order_inner),
        });

        let request = tokio::spawn({
            let app = app.clone();
            async move { send(&app, "GET", "/orders/7", None).await }
        });

        let (id, responder) = expect_get(&mut order_rx).await.expect("Expected Order Get");
        assert_eq!(id, 7);
        responder.send(Err(ApiError::not_found("Order", 7))).unwrap();

        let (status, body) = request.await.unwrap();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Order id not found: 7");
    }

    #[tokio::test]
    async fn test_router_passes_unwrapped_payload() {
        let (dish_inner, mut dish_rx) = create_mock_client::<Dish>(4);
        let (order_inner, _order_rx) = create_mock_client::<Order>(4);
        let app = router(AppState {
            dishes: DishClient::new(dish_inner),
            orders: OrderClient::new(order_inner),
        });

        let request = tokio::spawn({
            let app = app.clone();
            async move { send(&app, "PUT", "/dishes/5", Some(json!({"data": taco()}))).await }
        });

        let (id, payload, responder) = expect_update(&mut dish_rx).await.expect("Expected Dish Update");
        assert_eq!(id, 5);
        assert_eq!(payload.text("name").as_deref(), Some("Taco"));
        responder
            .send(Ok(Dish {
                id: 5,
                name: "Taco".into(),
                description: "spicy".into(),
                price: 5,
                image_url: "http://x".into(),
            }))
            .unwrap();

        let (status, body) = request.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["id"], 5);
    }
}
