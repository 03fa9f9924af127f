// src/services/mod.rs
pub mod click_router;
pub mod composer;
pub mod device_registry;
pub mod messaging_service;
pub mod profile_events;
pub mod profile_store;
pub mod push_receiver;
pub mod redirect;
pub mod route_table;
