// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login screen, shown whenever there is no session.

use super::layout::{document, escape_html};
use crate::auth::AuthPhase;

pub fn render(phase: AuthPhase, last_error: Option<&str>) -> String {
    let error = match last_error {
        Some(msg) => format!(
            "<div class=\"alert alert-error\" id=\"login-error\">{}</div>",
            escape_html(msg)
        ),
        None => String::new(),
    };
    let pending = if phase == AuthPhase::Authenticating {
        "<p class=\"placeholder\" id=\"login-pending\">Signing you in… \
         finish in the identity provider window, or start again below.</p>"
    } else {
        ""
    };

    document(
        "Welcome",
        &format!(
            "<main style=\"text-align:center;padding-top:12vh\" id=\"login\">\
             <div style=\"font-size:64px\">💪</div>\
             <h1>Welcome to FitIQ</h1>\
             <p>Track your progress. Crush your goals. Live healthier.</p>\
             {error}{pending}\
             <a class=\"logout\" style=\"background:#1976d2;text-decoration:none;display:inline-block\" \
             href=\"/login\">Get Started</a></main>",
            error = error,
            pending = pending,
        ),
    )
}
