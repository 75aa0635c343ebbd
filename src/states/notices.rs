//! Notices - User-Facing Feedback with Ring Buffer

use chrono::{DateTime, Local};
use std::collections::VecDeque;

/// Notice level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warn,
    Error,
}

impl NoticeLevel {
    pub fn label(&self) -> &'static str {
        match self {
            NoticeLevel::Info => "INFO",
            NoticeLevel::Success => "OK",
            NoticeLevel::Warn => "WARN",
            NoticeLevel::Error => "ERROR",
        }
    }
}

/// A single notice shown to the user
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
    pub timestamp: DateTime<Local>,
}

/// Recent notices, oldest evicted first
#[derive(Debug)]
pub struct NoticeLog {
    entries: VecDeque<Notice>,
    capacity: usize,
    next_id: u64,
}

impl NoticeLog {
    /// Create a new log with the specified capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            next_id: 1,
        }
    }

    /// Record a notice stamped with the current time and return a copy of it
    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) -> Notice {
        let notice = Notice {
            id: self.next_id,
            level,
            message: message.into(),
            timestamp: Local::now(),
        };
        self.next_id += 1;

        if self.capacity == 0 {
            return notice;
        }
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(notice.clone());
        notice
    }

    pub fn entries(&self) -> &VecDeque<Notice> {
        &self.entries
    }

    /// Most recent notice
    pub fn last(&self) -> Option<&Notice> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for NoticeLog {
    fn default() -> Self {
        Self::new(crate::constants::NOTICE_CAPACITY)
    }
}
