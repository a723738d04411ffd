//! Coffee Shop Service
//!
//! A small order management service for a coffee shop: it serves the menu,
//! accepts coffee orders with options, prices them, estimates preparation time
//! and tracks each order through its lifecycle.
//!
//! # Architecture
//!
//! ## Core Components
//!
//! * `api` - HTTP endpoints using the Axum framework
//! * `menu` - Sizes, coffee types, flavors, milks and their prices
//! * `pricing` - Price and preparation-time calculators
//! * `validation` - Turns raw order requests into typed orders, collecting every field error
//! * `order` - Order records, the status lifecycle and the in-memory store
//! * `config` - Environment configuration
//! * `error` - Error handling and HTTP response mapping
//!
//! ## Design
//!
//! ### Storage
//! Orders live in an in-memory map owned by `AppState` and handed to each
//! handler through Axum state. Nothing survives a restart.
//!
//! ### Lifecycle
//! `received -> preparing -> ready -> completed`, one step at a time.
//! Orders can be cancelled while `received` or `preparing`; cancelled orders
//! stay listed with status `cancelled`.
//!
//! # Environment Configuration
//!
//! ```bash
//! HOST=127.0.0.1    # Server host (IP or resolvable name)
//! PORT=8000         # Server port
//! RUST_LOG=info     # Logging level
//! ```
//!
//! # Error Handling
//!
//! Every error is returned as JSON:
//!
//! ```json
//! {
//!   "code": "VALIDATION_ERROR",
//!   "message": "Order validation failed",
//!   "details": [{ "field": "extra_shot", "message": "maximum 5 extra shots allowed" }]
//! }
//! ```
//!
//! | Status | Code                 | When                                      |
//! |--------|----------------------|-------------------------------------------|
//! | 400    | `INVALID_INPUT`      | Body is not a JSON object                 |
//! | 404    | `NOT_FOUND`          | Unknown order id                          |
//! | 409    | `INVALID_TRANSITION` | Status change skips or reverses a step    |
//! | 409    | `CANNOT_CANCEL`      | Order is ready, completed or cancelled    |
//! | 422    | `VALIDATION_ERROR`   | One or more order fields rejected         |
//!
//! # API Endpoints
//!
//! ## GET /
//! Welcome message with links to `/menu` and `/health`.
//!
//! ## GET /health
//! ```json
//! { "status": "healthy", "timestamp": "2024-01-01T12:00:00Z", "total_orders": 3 }
//! ```
//!
//! ## GET /menu
//! Sizes with prices, coffee types with extra prep minutes, flavors, milk
//! types with upcharges, the extra shot price and the per-order limits.
//!
//! ## POST /orders
//!
//! ### Request
//! ```json
//! {
//!   "size": "large",                      // small | medium | large
//!   "coffee_type": "iced",                // hot | iced
//!   "flavors": ["hazelnut", "caramel"],   // up to 3, distinct
//!   "milk": "oat",                        // whole (default) | oat | almond | soy | none
//!   "extra_shot": 2,                      // 0-5, default 0
//!   "special_instructions": "Light ice"   // optional, max 200 characters
//! }
//! ```
//!
//! ### Response (201)
//! ```json
//! {
//!   "order_id": "string",
//!   "size": "large",
//!   "coffee_type": "iced",
//!   "flavors": ["hazelnut", "caramel"],
//!   "milk": "oat",
//!   "extra_shot": 2,
//!   "special_instructions": "Light ice",
//!   "estimated_price": 8.1,
//!   "estimated_prep_time": 6,
//!   "order_time": "2024-01-01T12:00:00Z",
//!   "status": "received",
//!   "estimated_ready_time": null
//! }
//! ```
//!
//! ## GET /orders
//! All orders in the order they were placed.
//!
//! ## GET /orders/:order_id
//! A single order, or 404.
//!
//! ## PATCH /orders/:order_id/status
//! Body `{ "status": "preparing" }`. Returns the updated order. Moving to
//! `preparing` sets `estimated_ready_time`.
//!
//! ## DELETE /orders/:order_id
//! Cancels the order and returns it with status `cancelled`.

pub mod api;
pub mod config;
pub mod error;
pub mod menu;
pub mod order;
pub mod pricing;
pub mod validation;
