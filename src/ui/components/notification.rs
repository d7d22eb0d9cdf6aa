//! Notification/toast component for user feedback.
//!
//! Toasts stack in the bottom corner on the reading-end side of the screen:
//! bottom-right for English, bottom-left for Arabic.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::i18n::Language;

/// Most toasts shown at once.
const MAX_VISIBLE: usize = 3;

/// The type of notification, which determines its appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    /// Informational message (blue).
    Info,
    /// Success message (green).
    Success,
    /// Warning message (yellow).
    Warning,
    /// Error message (red).
    Error,
}

impl NotificationType {
    /// Get the icon for this notification type.
    pub fn icon(&self) -> &'static str {
        match self {
            NotificationType::Info => "ℹ",
            NotificationType::Success => "✓",
            NotificationType::Warning => "⚠",
            NotificationType::Error => "✗",
        }
    }

    /// Get the color for this notification type.
    pub fn color(&self) -> Color {
        match self {
            NotificationType::Info => Color::Blue,
            NotificationType::Success => Color::Green,
            NotificationType::Warning => Color::Yellow,
            NotificationType::Error => Color::Red,
        }
    }

    /// How long a toast of this type stays up.
    pub fn default_duration(&self) -> Duration {
        match self {
            NotificationType::Info | NotificationType::Success => Duration::from_secs(3),
            NotificationType::Warning | NotificationType::Error => Duration::from_secs(5),
        }
    }
}

/// A single notification message.
#[derive(Debug, Clone)]
pub struct Notification {
    /// The notification message.
    pub message: String,
    /// The type of notification.
    pub notification_type: NotificationType,
    /// When the notification was created.
    pub created_at: Instant,
    /// How long the notification should be displayed.
    pub duration: Duration,
}

impl Notification {
    /// Create a notification with the type's default duration.
    pub fn new(message: impl Into<String>, notification_type: NotificationType) -> Self {
        Self {
            message: message.into(),
            notification_type,
            created_at: Instant::now(),
            duration: notification_type.default_duration(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Info)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Success)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Error)
    }

    /// Create a notification with a custom duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Check if the notification has expired.
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.duration
    }
}

/// Manages multiple notifications.
#[derive(Debug)]
pub struct NotificationManager {
    /// Queue of notifications.
    notifications: VecDeque<Notification>,
    /// Maximum number of visible notifications.
    max_visible: usize,
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationManager {
    pub fn new() -> Self {
        Self::with_max_visible(MAX_VISIBLE)
    }

    /// Create a notification manager with a custom max visible count.
    pub fn with_max_visible(max_visible: usize) -> Self {
        Self {
            notifications: VecDeque::new(),
            max_visible,
        }
    }

    /// Add a notification to the queue.
    pub fn push(&mut self, notification: Notification) {
        self.notifications.push_back(notification);
        // Remove oldest if we exceed the limit
        while self.notifications.len() > self.max_visible {
            self.notifications.pop_front();
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Notification::info(message));
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Notification::success(message));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Notification::warning(message));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Notification::error(message));
    }

    /// Remove expired notifications.
    ///
    /// This should be called on each tick/render cycle.
    pub fn tick(&mut self) {
        self.notifications.retain(|n| !n.is_expired());
    }

    pub fn clear(&mut self) {
        self.notifications.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter()
    }

    /// Render all notifications in the bottom corner for `lang`.
    pub fn render(&self, frame: &mut Frame, area: Rect, lang: Language) {
        if self.notifications.is_empty() {
            return;
        }

        let width = 50.min(area.width.saturating_sub(4));
        // Borders plus icon prefix.
        let inner_width = width.saturating_sub(4) as usize;

        let heights: Vec<u16> = self
            .notifications
            .iter()
            .map(|n| {
                let text_len = n.message.chars().count() + 2;
                let lines = if inner_width > 0 {
                    text_len.div_ceil(inner_width) as u16
                } else {
                    1
                };
                lines + 2
            })
            .collect();

        let total_height = heights.iter().sum::<u16>();
        let stack = toast_area(area, width, total_height, lang.is_rtl());

        let constraints: Vec<Constraint> = heights.iter().map(|&h| Constraint::Length(h)).collect();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(stack);

        for (notification, chunk) in self.notifications.iter().zip(chunks.iter()) {
            render_notification(notification, frame, *chunk, lang);
        }
    }
}

/// Where the toast stack goes: bottom-right, or bottom-left when `rtl`.
pub fn toast_area(area: Rect, width: u16, height: u16, rtl: bool) -> Rect {
    let height = height.min(area.height.saturating_sub(2));
    let x = if rtl {
        area.x + 2.min(area.width.saturating_sub(width))
    } else {
        area.x + area.width.saturating_sub(width + 2)
    };
    let y = area.y + area.height.saturating_sub(height + 1);
    Rect::new(x, y, width, height)
}

fn render_notification(notification: &Notification, frame: &mut Frame, area: Rect, lang: Language) {
    frame.render_widget(Clear, area);

    let style = Style::default().fg(notification.notification_type.color());
    let icon = Span::styled(
        format!("{} ", notification.notification_type.icon()),
        style.add_modifier(Modifier::BOLD),
    );
    let message = Span::styled(notification.message.as_str(), style);
    let (line, alignment) = if lang.is_rtl() {
        (Line::from(vec![message, Span::raw(" "), icon]), Alignment::Right)
    } else {
        (Line::from(vec![icon, message]), Alignment::Left)
    };

    let paragraph = Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL).border_style(style))
        .wrap(Wrap { trim: true })
        .alignment(alignment);

    frame.render_widget(paragraph, area);
}
