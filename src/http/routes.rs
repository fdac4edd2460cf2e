// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, patch, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    api::FoodcartApi,
    error::FoodcartError,
    model::{
        AvailabilityTable, Banner, MenuItem, NewCategory, NewProduct, NewRestaurant, OrderStatus,
        OrderUpdate, OrderView, Product, ProductCard, ProductCategory, RegisteredOrder, Restaurant,
    },
};

#[derive(Deserialize, Debug, Default)]
pub struct OrdersQuery {
    #[serde(default)]
    status: Option<OrderStatus>,
}

pub async fn handler_banners(State(api): State<FoodcartApi>) -> Json<Vec<Banner>> {
    Json(api.banners())
}

pub async fn handler_products(
    State(api): State<FoodcartApi>,
) -> Result<Json<Vec<ProductCard>>, FoodcartError> {
    Ok(Json(api.available_products()?))
}

pub async fn handler_register_order(
    State(api): State<FoodcartApi>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<RegisteredOrder>, FoodcartError> {
    let Json(payload) = payload?;
    Ok(Json(api.register_order(&payload)?))
}

pub async fn handler_orders(
    State(api): State<FoodcartApi>,
    query: Result<Query<OrdersQuery>, QueryRejection>,
) -> Result<Json<Vec<OrderView>>, FoodcartError> {
    let Query(query) = query?;
    let status = query.status.unwrap_or_default();
    Ok(Json(api.list_orders(status).await?))
}

pub async fn handler_update_order(
    State(api): State<FoodcartApi>,
    id: Result<Path<i64>, PathRejection>,
    update: Result<Json<OrderUpdate>, JsonRejection>,
) -> Result<Json<OrderView>, FoodcartError> {
    let Path(id) = id?;
    let Json(update) = update?;
    Ok(Json(api.update_order(id, &update)?))
}

pub async fn handler_products_availability(
    State(api): State<FoodcartApi>,
) -> Result<Json<AvailabilityTable>, FoodcartError> {
    Ok(Json(api.products_availability()?))
}

pub async fn handler_create_product(
    State(api): State<FoodcartApi>,
    product: Result<Json<NewProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), FoodcartError> {
    let Json(product) = product?;
    Ok((StatusCode::CREATED, Json(api.create_product(&product)?)))
}

pub async fn handler_restaurants(
    State(api): State<FoodcartApi>,
) -> Result<Json<Vec<Restaurant>>, FoodcartError> {
    Ok(Json(api.list_restaurants()?))
}

pub async fn handler_create_restaurant(
    State(api): State<FoodcartApi>,
    restaurant: Result<Json<NewRestaurant>, JsonRejection>,
) -> Result<(StatusCode, Json<Restaurant>), FoodcartError> {
    let Json(restaurant) = restaurant?;
    Ok((StatusCode::CREATED, Json(api.create_restaurant(&restaurant)?)))
}

pub async fn handler_create_category(
    State(api): State<FoodcartApi>,
    category: Result<Json<NewCategory>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductCategory>), FoodcartError> {
    let Json(category) = category?;
    Ok((StatusCode::CREATED, Json(api.create_category(&category)?)))
}

pub async fn handler_set_menu_item(
    State(api): State<FoodcartApi>,
    item: Result<Json<MenuItem>, JsonRejection>,
) -> Result<Json<MenuItem>, FoodcartError> {
    let Json(item) = item?;
    Ok(Json(api.set_menu_item(&item)?))
}

/// Public and manager routes of the node.
pub fn build_routes(api: FoodcartApi) -> Router {
    let public = Router::new()
        .route("/api/banners/", get(handler_banners))
        .route("/api/products/", get(handler_products))
        .route("/api/order/", post(handler_register_order));

    let manager = Router::new()
        .route("/manager/orders/", get(handler_orders))
        .route("/manager/orders/:id", patch(handler_update_order))
        .route(
            "/manager/products/",
            get(handler_products_availability).post(handler_create_product),
        )
        .route(
            "/manager/restaurants/",
            get(handler_restaurants).post(handler_create_restaurant),
        )
        .route("/manager/categories/", post(handler_create_category))
        .route("/manager/menu/", put(handler_set_menu_item));

    Router::new().merge(public).merge(manager).with_state(api)
}
