pub mod auth_routes;
pub mod favorite_routes;
pub mod location_routes;
pub mod message_routes;
pub mod notification_routes;
pub mod reservation_routes;
pub mod review_routes;
pub mod transaction_routes;
pub mod vehicle_routes;
