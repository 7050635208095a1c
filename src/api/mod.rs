// API routes and handlers

pub mod auth;
pub mod errors;
pub mod health;
pub mod pages;
pub mod predict;
pub mod routes;
