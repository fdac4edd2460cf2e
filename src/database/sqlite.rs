// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # SQLite database backend.
//!
//! This module contains the SQLite store holding the catalog, the orders and
//! the geocoder cache.
//!

use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};

use crate::error::FoodcartError;
use crate::model::{
    Coordinates, Location, MenuItem, NewCategory, NewOrder, NewProduct, NewRestaurant, Order,
    OrderItem, OrderStatus, PaymentMethod, Price, Product, ProductCategory, Restaurant,
};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS restaurants (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        address TEXT NOT NULL DEFAULT '',
        contact_phone TEXT NOT NULL DEFAULT ''
    );
    CREATE TABLE IF NOT EXISTS product_categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS products (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        category_id INTEGER REFERENCES product_categories(id) ON DELETE SET NULL,
        price INTEGER NOT NULL CHECK (price >= 0),
        image TEXT NOT NULL DEFAULT '',
        special_status INTEGER NOT NULL DEFAULT 0,
        description TEXT NOT NULL DEFAULT ''
    );
    CREATE INDEX IF NOT EXISTS products_special_status ON products(special_status);
    CREATE TABLE IF NOT EXISTS restaurant_menu_items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        restaurant_id INTEGER NOT NULL REFERENCES restaurants(id) ON DELETE CASCADE,
        product_id INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
        availability INTEGER NOT NULL DEFAULT 1,
        UNIQUE (restaurant_id, product_id)
    );
    CREATE INDEX IF NOT EXISTS menu_items_availability ON restaurant_menu_items(availability);
    CREATE TABLE IF NOT EXISTS orders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        firstname TEXT NOT NULL,
        lastname TEXT NOT NULL,
        address TEXT NOT NULL,
        phonenumber TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'NEW',
        payment TEXT NOT NULL DEFAULT 'NONE',
        comment TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL,
        called_at TEXT,
        delivered_at TEXT,
        restaurant_id INTEGER REFERENCES restaurants(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS orders_status ON orders(status);
    CREATE INDEX IF NOT EXISTS orders_created_at ON orders(created_at);
    CREATE TABLE IF NOT EXISTS order_items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        order_id INTEGER NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
        product_id INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
        quantity INTEGER NOT NULL CHECK (quantity >= 1),
        price INTEGER NOT NULL CHECK (price >= 0)
    );
    CREATE TABLE IF NOT EXISTS locations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        address TEXT NOT NULL UNIQUE,
        lat REAL,
        lon REAL,
        updated_at TEXT NOT NULL
    );
";

const PRODUCT_SELECT: &str = "
    SELECT p.id, p.name, p.price, p.image, p.special_status, p.description, c.id, c.name
    FROM products p LEFT JOIN product_categories c ON c.id = p.category_id
";

const ORDER_SELECT: &str = "
    SELECT id, firstname, lastname, address, phonenumber, status, payment, comment,
           created_at, called_at, delivered_at, restaurant_id
    FROM orders
";

impl ToSql for Price {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.minor_units()))
    }
}

impl FromSql for Price {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_i64().map(Price::from_minor_units)
    }
}

impl ToSql for OrderStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for OrderStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: FoodcartError| FromSqlError::Other(Box::new(error)))
    }
}

impl ToSql for PaymentMethod {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for PaymentMethod {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: FoodcartError| FromSqlError::Other(Box::new(error)))
    }
}

/// SQLite store.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open the database at `path` and create the schema if missing.
    ///
    /// `:memory:` opens a private in-memory database.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FoodcartError> {
        let conn = open(path)?;
        conn.execute_batch(SCHEMA)
            .map_err(|error| FoodcartError::Database(format!("SQLite fail create schema: {}", error)))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, FoodcartError> {
        self.conn
            .lock()
            .map_err(|_| FoodcartError::Database("open connection".to_owned()))
    }

    pub fn create_restaurant(&self, restaurant: &NewRestaurant) -> Result<Restaurant, FoodcartError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO restaurants (name, address, contact_phone) VALUES (?1, ?2, ?3)",
            params![restaurant.name, restaurant.address, restaurant.contact_phone],
        )?;
        Ok(Restaurant {
            id: conn.last_insert_rowid(),
            name: restaurant.name.clone(),
            address: restaurant.address.clone(),
            contact_phone: restaurant.contact_phone.clone(),
        })
    }

    /// Restaurants sorted by name.
    pub fn list_restaurants(&self) -> Result<Vec<Restaurant>, FoodcartError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, address, contact_phone FROM restaurants ORDER BY name, id",
        )?;
        let restaurants = stmt
            .query_map([], restaurant_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(restaurants)
    }

    pub fn get_restaurant(&self, id: i64) -> Result<Restaurant, FoodcartError> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT id, name, address, contact_phone FROM restaurants WHERE id = ?1",
            params![id],
            restaurant_from_row,
        )
        .optional()?
        .ok_or_else(|| FoodcartError::NotFound(format!("restaurant {}", id)))
    }

    pub fn create_category(&self, category: &NewCategory) -> Result<ProductCategory, FoodcartError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO product_categories (name) VALUES (?1)",
            params![category.name],
        )?;
        Ok(ProductCategory {
            id: conn.last_insert_rowid(),
            name: category.name.clone(),
        })
    }

    pub fn create_product(&self, product: &NewProduct) -> Result<Product, FoodcartError> {
        let id = {
            let conn = self.lock()?;
            if let Some(category_id) = product.category_id {
                let exists: bool = conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM product_categories WHERE id = ?1)",
                    params![category_id],
                    |row| row.get(0),
                )?;
                if !exists {
                    return Err(FoodcartError::NotFound(format!("category {}", category_id)));
                }
            }
            conn.execute(
                "INSERT INTO products (name, category_id, price, image, special_status, description)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    product.name,
                    product.category_id,
                    product.price,
                    product.image,
                    product.special_status,
                    product.description
                ],
            )?;
            conn.last_insert_rowid()
        };
        self.get_product(id)
    }

    pub fn get_product(&self, id: i64) -> Result<Product, FoodcartError> {
        let conn = self.lock()?;
        conn.query_row(
            &format!("{} WHERE p.id = ?1", PRODUCT_SELECT),
            params![id],
            product_from_row,
        )
        .optional()?
        .ok_or_else(|| FoodcartError::NotFound(format!("product {}", id)))
    }

    pub fn list_products(&self) -> Result<Vec<Product>, FoodcartError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY p.id", PRODUCT_SELECT))?;
        let products = stmt
            .query_map([], product_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(products)
    }

    /// Products on sale in at least one restaurant.
    pub fn list_available_products(&self) -> Result<Vec<Product>, FoodcartError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE p.id IN (SELECT product_id FROM restaurant_menu_items WHERE availability = 1)
             ORDER BY p.id",
            PRODUCT_SELECT
        ))?;
        let products = stmt
            .query_map([], product_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(products)
    }

    /// Identifiers among `ids` that refer to existing products.
    pub fn existing_product_ids(&self, ids: &[i64]) -> Result<HashSet<i64>, FoodcartError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT EXISTS(SELECT 1 FROM products WHERE id = ?1)")?;
        let mut existing = HashSet::new();
        for id in ids {
            let exists: bool = stmt.query_row(params![id], |row| row.get(0))?;
            if exists {
                existing.insert(*id);
            }
        }
        Ok(existing)
    }

    /// Insert or update the menu entry of a restaurant.
    pub fn set_menu_item(&self, item: &MenuItem) -> Result<MenuItem, FoodcartError> {
        self.get_restaurant(item.restaurant_id)?;
        self.get_product(item.product_id)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO restaurant_menu_items (restaurant_id, product_id, availability)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (restaurant_id, product_id) DO UPDATE SET availability = excluded.availability",
            params![item.restaurant_id, item.product_id, item.availability],
        )?;
        Ok(*item)
    }

    pub fn list_menu_items(&self) -> Result<Vec<MenuItem>, FoodcartError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT restaurant_id, product_id, availability FROM restaurant_menu_items ORDER BY id",
        )?;
        let items = stmt
            .query_map([], |row| {
                Ok(MenuItem {
                    restaurant_id: row.get(0)?,
                    product_id: row.get(1)?,
                    availability: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Insert an order and its items in one transaction.
    ///
    /// Items take the current product price.
    pub fn create_order(&self, order: &NewOrder, created_at: DateTime<Utc>) -> Result<Order, FoodcartError> {
        let id = {
            let mut conn = self.lock()?;
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO orders (firstname, lastname, address, phonenumber, status, payment, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    order.firstname,
                    order.lastname,
                    order.address,
                    order.phonenumber,
                    OrderStatus::New,
                    PaymentMethod::None,
                    created_at
                ],
            )?;
            let order_id = tx.last_insert_rowid();
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO order_items (order_id, product_id, quantity, price)
                     SELECT ?1, id, ?3, price FROM products WHERE id = ?2",
                )?;
                for item in &order.items {
                    let inserted = stmt.execute(params![order_id, item.product_id, item.quantity])?;
                    if inserted == 0 {
                        return Err(FoodcartError::NotFound(format!("product {}", item.product_id)));
                    }
                }
            }
            tx.commit()?;
            order_id
        };
        self.get_order(id)
    }

    pub fn get_order(&self, id: i64) -> Result<Order, FoodcartError> {
        let conn = self.lock()?;
        let order = conn
            .query_row(
                &format!("{} WHERE id = ?1", ORDER_SELECT),
                params![id],
                order_from_row,
            )
            .optional()?
            .ok_or_else(|| FoodcartError::NotFound(format!("order {}", id)))?;
        with_items(&conn, order)
    }

    /// Orders with `status`, newest first.
    pub fn list_orders(&self, status: OrderStatus) -> Result<Vec<Order>, FoodcartError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE status = ?1 ORDER BY created_at DESC, id DESC",
            ORDER_SELECT
        ))?;
        let orders = stmt
            .query_map(params![status], order_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        let orders = orders
            .into_iter()
            .map(|order| with_items(&conn, order))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(orders)
    }

    /// Persist the mutable fields of an order.
    pub fn save_order(&self, order: &Order) -> Result<(), FoodcartError> {
        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE orders SET status = ?2, payment = ?3, comment = ?4, called_at = ?5,
                 delivered_at = ?6, restaurant_id = ?7
             WHERE id = ?1",
            params![
                order.id,
                order.status,
                order.payment,
                order.comment,
                order.called_at,
                order.delivered_at,
                order.restaurant_id
            ],
        )?;
        if updated == 0 {
            return Err(FoodcartError::NotFound(format!("order {}", order.id)));
        }
        Ok(())
    }

    pub fn get_location(&self, address: &str) -> Result<Option<Location>, FoodcartError> {
        let conn = self.lock()?;
        let location = conn
            .query_row(
                "SELECT address, lat, lon, updated_at FROM locations WHERE address = ?1",
                params![address],
                |row| {
                    let lat: Option<f64> = row.get(1)?;
                    let lon: Option<f64> = row.get(2)?;
                    Ok(Location {
                        address: row.get(0)?,
                        coordinates: lat.zip(lon).map(|(lat, lon)| Coordinates::new(lat, lon)),
                        updated_at: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(location)
    }

    pub fn put_location(&self, location: &Location) -> Result<(), FoodcartError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO locations (address, lat, lon, updated_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (address) DO UPDATE SET
                 lat = excluded.lat, lon = excluded.lon, updated_at = excluded.updated_at",
            params![
                location.address,
                location.coordinates.map(|coordinates| coordinates.lat),
                location.coordinates.map(|coordinates| coordinates.lon),
                location.updated_at
            ],
        )?;
        Ok(())
    }
}

fn restaurant_from_row(row: &Row<'_>) -> rusqlite::Result<Restaurant> {
    Ok(Restaurant {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        contact_phone: row.get(3)?,
    })
}

fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    let category_id: Option<i64> = row.get(6)?;
    let category_name: Option<String> = row.get(7)?;
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        price: row.get(2)?,
        image: row.get(3)?,
        special_status: row.get(4)?,
        description: row.get(5)?,
        category: category_id
            .zip(category_name)
            .map(|(id, name)| ProductCategory { id, name }),
    })
}

fn order_from_row(row: &Row<'_>) -> rusqlite::Result<Order> {
    Ok(Order {
        id: row.get(0)?,
        firstname: row.get(1)?,
        lastname: row.get(2)?,
        address: row.get(3)?,
        phonenumber: row.get(4)?,
        status: row.get(5)?,
        payment: row.get(6)?,
        comment: row.get(7)?,
        created_at: row.get(8)?,
        called_at: row.get(9)?,
        delivered_at: row.get(10)?,
        restaurant_id: row.get(11)?,
        items: Vec::new(),
    })
}

fn with_items(conn: &Connection, mut order: Order) -> Result<Order, FoodcartError> {
    let mut stmt = conn.prepare_cached(
        "SELECT i.product_id, p.name, i.quantity, i.price
         FROM order_items i JOIN products p ON p.id = i.product_id
         WHERE i.order_id = ?1 ORDER BY i.id",
    )?;
    order.items = stmt
        .query_map(params![order.id], |row| {
            Ok(OrderItem {
                product_id: row.get(0)?,
                product_name: row.get(1)?,
                quantity: row.get(2)?,
                price: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(order)
}

/// Open a SQLite database connection.
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection, FoodcartError> {
    let path = path.as_ref();
    let mut flags = OpenFlags::default();
    flags.insert(OpenFlags::SQLITE_OPEN_READ_WRITE);
    flags.insert(OpenFlags::SQLITE_OPEN_CREATE);
    let conn = Connection::open_with_flags(path, flags)
        .map_err(|_| FoodcartError::Database("SQLite fail open connection".to_owned()))?;
    conn.execute_batch(
        "
        PRAGMA journal_mode=WAL;
        PRAGMA synchronous=NORMAL;
        PRAGMA foreign_keys=ON;
        ",
    )
    .map_err(|_| FoodcartError::Database("SQLite fail execute batch".to_owned()))?;
    Ok(conn)
}

#[cfg(test)]
pub(crate) mod tests {

    use super::*;
    use crate::model::NewOrderItem;

    /// In-memory store with two restaurants, three products and their menus.
    ///
    /// * "Star Burger Arbat" sells burger and fries.
    /// * "Star Burger Tverskaya" sells burger, fries (not available) and a shake.
    pub(crate) fn seeded_store() -> SqliteStore {
        let store = SqliteStore::open(":memory:").unwrap();
        let category = store
            .create_category(&NewCategory {
                name: "Burgers".to_owned(),
            })
            .unwrap();
        let arbat = store
            .create_restaurant(&NewRestaurant {
                name: "Star Burger Arbat".to_owned(),
                address: "Moscow, Arbat 1".to_owned(),
                contact_phone: "+74950000001".to_owned(),
            })
            .unwrap();
        let tverskaya = store
            .create_restaurant(&NewRestaurant {
                name: "Star Burger Tverskaya".to_owned(),
                address: "Moscow, Tverskaya 1".to_owned(),
                contact_phone: "+74950000002".to_owned(),
            })
            .unwrap();
        let mut products = Vec::new();
        for (name, price, category_id) in [
            ("Burger", "350.00", Some(category.id)),
            ("Fries", "99.50", None),
            ("Shake", "150", None),
        ] {
            products.push(
                store
                    .create_product(&NewProduct {
                        name: name.to_owned(),
                        category_id,
                        price: price.parse().unwrap(),
                        image: format!("{}.png", name.to_lowercase()),
                        special_status: false,
                        description: String::new(),
                    })
                    .unwrap(),
            );
        }
        for (restaurant_id, product_id, availability) in [
            (arbat.id, products[0].id, true),
            (arbat.id, products[1].id, true),
            (tverskaya.id, products[0].id, true),
            (tverskaya.id, products[1].id, false),
            (tverskaya.id, products[2].id, true),
        ] {
            store
                .set_menu_item(&MenuItem {
                    restaurant_id,
                    product_id,
                    availability,
                })
                .unwrap();
        }
        store
    }

    pub(crate) fn new_order(address: &str, items: &[(i64, u32)]) -> NewOrder {
        NewOrder {
            firstname: "Ivan".to_owned(),
            lastname: "Petrov".to_owned(),
            address: address.to_owned(),
            phonenumber: "+79123456789".to_owned(),
            items: items
                .iter()
                .map(|(product_id, quantity)| NewOrderItem {
                    product_id: *product_id,
                    quantity: *quantity,
                })
                .collect(),
        }
    }

    #[test]
    fn test_catalog() {
        let store = seeded_store();
        let restaurants = store.list_restaurants().unwrap();
        assert_eq!(restaurants.len(), 2);
        assert_eq!(restaurants[0].name, "Star Burger Arbat");

        let burger = store.get_product(1).unwrap();
        assert_eq!(burger.category.unwrap().name, "Burgers");
        assert_eq!(burger.price.to_string(), "350.00");
        assert!(store.get_product(2).unwrap().category.is_none());
        assert!(matches!(store.get_product(42), Err(FoodcartError::NotFound(_))));

        assert_eq!(store.list_products().unwrap().len(), 3);
        assert_eq!(store.list_menu_items().unwrap().len(), 5);
        assert_eq!(
            store.existing_product_ids(&[1, 3, 42]).unwrap(),
            HashSet::from([1, 3])
        );
    }

    #[test]
    fn test_available_products_follow_menu() {
        let store = seeded_store();
        assert_eq!(store.list_available_products().unwrap().len(), 3);

        store
            .set_menu_item(&MenuItem {
                restaurant_id: 2,
                product_id: 3,
                availability: false,
            })
            .unwrap();
        let available: Vec<i64> = store
            .list_available_products()
            .unwrap()
            .into_iter()
            .map(|product| product.id)
            .collect();
        assert_eq!(available, vec![1, 2]);
        assert_eq!(store.list_menu_items().unwrap().len(), 5);
    }

    #[test]
    fn test_menu_item_requires_known_entities() {
        let store = seeded_store();
        let result = store.set_menu_item(&MenuItem {
            restaurant_id: 9,
            product_id: 1,
            availability: true,
        });
        assert!(matches!(result, Err(FoodcartError::NotFound(_))));
    }

    #[test]
    fn test_create_product_unknown_category() {
        let store = seeded_store();
        let result = store.create_product(&NewProduct {
            name: "Salad".to_owned(),
            category_id: Some(77),
            price: Price::from_minor_units(100),
            image: String::new(),
            special_status: false,
            description: String::new(),
        });
        assert!(matches!(result, Err(FoodcartError::NotFound(_))));
    }

    #[test]
    fn test_order_snapshots_prices() {
        let store = seeded_store();
        let order = store
            .create_order(&new_order("Moscow, Kremlin", &[(1, 2), (2, 1)]), Utc::now())
            .unwrap();
        assert_eq!(order.status, OrderStatus::New);
        assert_eq!(order.payment, PaymentMethod::None);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].product_name, "Burger");
        assert_eq!(order.total_price().unwrap().to_string(), "799.50");
    }

    #[test]
    fn test_order_with_unknown_product_is_rolled_back() {
        let store = seeded_store();
        let result = store.create_order(&new_order("Moscow", &[(1, 1), (42, 1)]), Utc::now());
        assert!(matches!(result, Err(FoodcartError::NotFound(_))));
        assert!(store.list_orders(OrderStatus::New).unwrap().is_empty());
    }

    #[test]
    fn test_list_orders_newest_first_and_save() {
        let store = seeded_store();
        let first = store
            .create_order(&new_order("Moscow, 1", &[(1, 1)]), Utc::now() - chrono::Duration::minutes(5))
            .unwrap();
        let second = store
            .create_order(&new_order("Moscow, 2", &[(3, 1)]), Utc::now())
            .unwrap();
        let ids: Vec<i64> = store
            .list_orders(OrderStatus::New)
            .unwrap()
            .iter()
            .map(|order| order.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);

        let mut order = first;
        order.status = OrderStatus::Process;
        order.restaurant_id = Some(1);
        order.called_at = Some(Utc::now());
        store.save_order(&order).unwrap();
        let stored = store.get_order(order.id).unwrap();
        assert_eq!(stored.status, OrderStatus::Process);
        assert_eq!(stored.restaurant_id, Some(1));
        assert!(stored.called_at.is_some());
        assert_eq!(store.list_orders(OrderStatus::New).unwrap().len(), 1);
        assert_eq!(store.list_orders(OrderStatus::Process).unwrap().len(), 1);
    }

    #[test]
    fn test_locations() {
        let store = SqliteStore::open(":memory:").unwrap();
        assert!(store.get_location("Moscow").unwrap().is_none());

        let location = Location {
            address: "Moscow".to_owned(),
            coordinates: Some(Coordinates::new(55.75, 37.61)),
            updated_at: Utc::now(),
        };
        store.put_location(&location).unwrap();
        assert_eq!(
            store.get_location("Moscow").unwrap().unwrap().coordinates,
            location.coordinates
        );

        let missing = Location {
            address: "Atlantis".to_owned(),
            coordinates: None,
            updated_at: Utc::now(),
        };
        store.put_location(&missing).unwrap();
        let cached = store.get_location("Atlantis").unwrap().unwrap();
        assert!(cached.coordinates.is_none());
    }

    #[test]
    fn test_file_database_persists() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("foodcart.sqlite3");
        {
            let store = SqliteStore::open(&path).unwrap();
            store
                .create_restaurant(&NewRestaurant {
                    name: "Star Burger".to_owned(),
                    address: String::new(),
                    contact_phone: String::new(),
                })
                .unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.list_restaurants().unwrap().len(), 1);
    }
}
