// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-activity-type icon and accent color.

use crate::models::ActivityType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub icon: &'static str,
    pub color: &'static str,
}

const DEFAULT_THEME: Theme = Theme {
    icon: "💪",
    color: "#607d8b",
};

static THEMES: &[(ActivityType, Theme)] = &[
    (ActivityType::Running, Theme { icon: "🏃", color: "#e53935" }),
    (ActivityType::Walking, Theme { icon: "🚶", color: "#8d6e63" }),
    (ActivityType::Swimming, Theme { icon: "🏊", color: "#1e88e5" }),
    (ActivityType::Cycling, Theme { icon: "🚴", color: "#43a047" }),
    (ActivityType::Hiking, Theme { icon: "🥾", color: "#6d4c41" }),
    (ActivityType::Jogging, Theme { icon: "🏃", color: "#ef6c00" }),
    (ActivityType::Skating, Theme { icon: "⛸️", color: "#26c6da" }),
    (ActivityType::Skiing, Theme { icon: "⛷️", color: "#90caf9" }),
    (ActivityType::Surfing, Theme { icon: "🏄", color: "#00acc1" }),
    (ActivityType::Rowing, Theme { icon: "🚣", color: "#3949ab" }),
    (ActivityType::Dancing, Theme { icon: "💃", color: "#d81b60" }),
    (ActivityType::Climbing, Theme { icon: "🧗", color: "#795548" }),
    (ActivityType::Jumping, Theme { icon: "🤸", color: "#fb8c00" }),
    (ActivityType::Yoga, Theme { icon: "🧘", color: "#8e24aa" }),
    (ActivityType::Boxing, Theme { icon: "🥊", color: "#c62828" }),
    (ActivityType::Kickboxing, Theme { icon: "🥋", color: "#ad1457" }),
    (ActivityType::Skipping, Theme { icon: "🪢", color: "#f4511e" }),
    (ActivityType::Pushups, Theme { icon: "💪", color: "#5d4037" }),
    (ActivityType::Situps, Theme { icon: "💪", color: "#4e342e" }),
    (ActivityType::Weightlifting, Theme { icon: "🏋️", color: "#fdd835" }),
    (ActivityType::MartialArts, Theme { icon: "🥋", color: "#212121" }),
    (ActivityType::Tennis, Theme { icon: "🎾", color: "#c0ca33" }),
    (ActivityType::Badminton, Theme { icon: "🏸", color: "#7cb342" }),
    (ActivityType::Basketball, Theme { icon: "🏀", color: "#f57c00" }),
    (ActivityType::Football, Theme { icon: "⚽", color: "#2e7d32" }),
    (ActivityType::Volleyball, Theme { icon: "🏐", color: "#fbc02d" }),
    (ActivityType::Baseball, Theme { icon: "⚾", color: "#b71c1c" }),
    (ActivityType::Cricket, Theme { icon: "🏏", color: "#558b2f" }),
    (ActivityType::Golf, Theme { icon: "⛳", color: "#388e3c" }),
    (ActivityType::TableTennis, Theme { icon: "🏓", color: "#00897b" }),
    (ActivityType::Paragliding, Theme { icon: "🪂", color: "#5e35b1" }),
];

pub fn theme_for(activity_type: ActivityType) -> Theme {
    THEMES
        .iter()
        .find(|(t, _)| *t == activity_type)
        .map(|(_, theme)| *theme)
        .unwrap_or(DEFAULT_THEME)
}
