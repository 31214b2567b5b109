// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Router session API
//!
//! High-level operations on the router's virtual server table.

mod config;
mod params;
mod session;

pub use config::{
    RouterConfig, DEFAULT_USER, ENV_HOST, ENV_PASSWORD, ENV_USER, MENU_PATH, VIRTUAL_SERVER_PATH,
};
pub use params::{delete_params, listing_params, save_params, Params, SaveTarget, SAVE_LABEL};
pub use session::Router;
