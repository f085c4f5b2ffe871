pub mod activity;
pub mod auth;
pub mod cabinets;
pub mod categories;
pub mod items;
pub mod lookup;
pub mod media;
pub mod products;
pub mod rooms;
