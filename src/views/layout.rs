// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Page chrome shared by every view.

use crate::routes::Route;

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;margin:0;background:#f4f6f8;color:#1c2530}\
main{max-width:960px;margin:0 auto;padding:20px}\
header{display:flex;justify-content:space-between;align-items:center;padding:12px 20px;background:#1c2530;color:#fff}\
a{color:inherit}\
.card{background:#fff;border-radius:8px;padding:16px;margin-bottom:16px;box-shadow:0 1px 3px rgba(0,0,0,.12)}\
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(220px,1fr));gap:16px}\
.activity-card{display:block;text-decoration:none;border-left:6px solid var(--accent)}\
.chip{display:inline-block;border:1px solid var(--accent);color:var(--accent);border-radius:16px;padding:2px 10px}\
.alert{padding:12px;border-radius:6px;margin-bottom:16px}\
.alert-error{background:#fdecea;color:#611a15}\
.alert-info{background:#e8f4fd;color:#0d3c61}\
.alert-success{background:#edf7ed;color:#1e4620}\
.logout{background:#d32f2f;color:#fff;border:0;border-radius:4px;padding:8px 16px;margin-top:10px;cursor:pointer}\
.safety li{color:#b26a00}\
.placeholder{color:#6b7785;font-style:italic}\
label{display:block;margin-bottom:12px}\
input,select{display:block;width:100%;padding:8px;margin-top:4px;box-sizing:border-box}\
button[disabled]{opacity:.5}\
";

/// Escape text for HTML element content and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#x27;"),
            _ => output.push(ch),
        }
    }
    output
}

/// Full HTML document.
pub fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{} · FitIQ</title><style>{}</style></head><body>{}</body></html>",
        escape_html(title),
        STYLE,
        body
    )
}

/// Authenticated page: header, content, and the logout control on every
/// route that shows it.
pub fn shell(route: &Route, user: Option<&str>, title: &str, content: &str) -> String {
    let greeting = match user {
        Some(name) => format!("<span>Signed in as {}</span>", escape_html(name)),
        None => String::new(),
    };
    let logout = if route.shows_logout() {
        "<form method=\"post\" action=\"/logout\">\
         <button type=\"submit\" class=\"logout\">LOGOUT</button></form>"
    } else {
        ""
    };

    document(
        title,
        &format!(
            "<header><a href=\"/activities\"><strong>FitIQ</strong></a>{}</header>\
             <main>{}{}</main>",
            greeting, content, logout
        ),
    )
}

pub fn error_page(status: u16, message: &str) -> String {
    document(
        "Error",
        &format!(
            "<main><div class=\"alert alert-error\"><strong>{}</strong> {}</div>\
             <a href=\"/\">Back to FitIQ</a></main>",
            status,
            escape_html(message)
        ),
    )
}
