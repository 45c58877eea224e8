//! Vidtube - A lightweight video-sharing platform backend
//!
//! This library provides the core functionality for the Vidtube backend:
//! personalized feed composition, channel analytics, and the surrounding
//! REST resource surface (videos, comments, likes, playlists, subscriptions,
//! tweets).

pub mod api;
pub mod cache;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
