// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! View components and their in-memory state.
//!
//! Views never call the backend themselves. A handler asks a view for a
//! [`LoadTicket`], performs the call, and hands the result back; the view
//! drops results whose ticket went stale (remounted or unmounted).

pub mod activities_page;
pub mod activity_detail;
pub mod activity_form;
pub mod activity_list;
pub mod layout;
pub mod login;
pub mod theme;

use crate::error::ApiError;

pub use activities_page::ActivitiesPage;
pub use activity_detail::ActivityDetailView;
pub use activity_form::{ActivityFormView, FormNotice};
pub use activity_list::{ActivityListView, RefreshSignal};

/// Mount state plus a generation counter for outstanding loads.
#[derive(Debug, Default)]
pub struct Lifecycle {
    mounted: bool,
    generation: u64,
}

/// Proof that a result belongs to the load currently expected.
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct LoadTicket(u64);

impl Lifecycle {
    pub fn mount(&mut self) {
        self.mounted = true;
    }

    /// Outstanding tickets become stale.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.generation += 1;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Start a load, invalidating any earlier ticket.
    pub fn begin(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket(self.generation)
    }

    pub fn accepts(&self, ticket: &LoadTicket) -> bool {
        self.mounted && ticket.0 == self.generation
    }
}

/// Async content state.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Failed(String),
    Ready(T),
}

impl<T> From<Result<T, ApiError>> for LoadState<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(value) => LoadState::Ready(value),
            Err(e) => LoadState::Failed(e.user_message()),
        }
    }
}
