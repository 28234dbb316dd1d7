//! Wellness session publishing platform: REST API and client library.

pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod state;

pub mod crypto {
    pub mod password;
}

pub mod models {
    pub mod session;
    pub mod user;
}

pub mod repositories {
    pub mod session;
    pub mod user;
}

pub mod services {
    pub mod auth;
    pub mod credentials;
    pub mod sessions;
    pub mod token;
}

pub mod handlers {
    pub mod auth;
    pub mod health;
    pub mod sessions;
}

pub mod middleware_layer {
    pub mod auth;
}

pub mod validation {
    pub mod auth;
    pub mod session;
}

pub mod client;
