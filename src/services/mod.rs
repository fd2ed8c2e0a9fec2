// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Backend access layer.

pub mod activity;
pub mod http;

pub use activity::ActivityService;
pub use http::{ApiClient, HttpResponse, USER_ID_HEADER};
