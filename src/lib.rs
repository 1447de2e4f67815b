pub mod activity;
pub mod app;
pub mod auth;
pub mod bookings;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod state;
pub mod webhook;
