pub mod config;
pub mod controller;
pub mod cookies;
pub mod models;
pub mod node;
pub mod queue;
pub mod routes;
pub mod service;
pub mod state;
