pub mod config;
pub mod db;
pub mod error;
pub mod logger;
pub mod models;
pub mod schemas;
pub mod services;
pub mod web;
