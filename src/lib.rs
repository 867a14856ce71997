// SPDX-License-Identifier: GPL-3.0-only

//! Backend exposing a shift "tab" session as compositor outputs and input devices.
//!
//! The [`TabBackend`] owns the session client, the outputs announced by the
//! session and one input device per capability. Hosts register its wake source
//! with their calloop event loop and consume [`BackendEvent`]s through the
//! [`EventSink`] handed over at construction.

pub mod backend;
pub mod config;
pub mod input;
pub mod logger;
pub mod utils;

pub use backend::{
    tab::{
        client::{ConnectError, SessionClient, SessionConnector},
        output::{OutputId, TabOutput},
        swapchain::{SwapchainOptions, TabBuffer, TabSwapchain},
        TabBackend,
    },
    BackendError, BackendEvent, DispatchError, EventSink, FnSink,
};
pub use tab_backend_config::TabConfig;
