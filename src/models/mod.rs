// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod session;

pub use activity::{Activity, ActivityDraft, ActivityType, CreateActivityRequest, Recommendation};
pub use session::Session;
