use crate::config::CooldownConfig;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

/// Process-wide record of which games were recently recommended to which
/// user, used to keep repeated calls varied. Entries expire after the
/// cooldown window and each user holds at most `capacity` of them, oldest
/// evicted first.
///
/// Every operation takes an explicit `now` so callers control the clock.
/// Nothing here can fail a request: an unknown user simply has no recent
/// items.
pub struct CooldownCache {
    window: Duration,
    capacity: usize,
    entries: Mutex<HashMap<String, HashMap<u32, DateTime<Utc>>>>,
}

impl CooldownCache {
    pub fn new(window_seconds: i64, capacity: usize) -> Self {
        Self {
            window: Duration::seconds(window_seconds),
            capacity,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &CooldownConfig) -> Self {
        Self::new(config.window_seconds, config.max_recent_items)
    }

    /// Game ids still under cooldown for this user.
    pub fn recent_items_for(&self, user_key: &str, now: DateTime<Utc>) -> HashSet<u32> {
        let entries = self.entries.lock();

        match entries.get(user_key) {
            Some(user_games) => user_games
                .iter()
                .filter(|(_, &timestamp)| now.signed_duration_since(timestamp) <= self.window)
                .map(|(&appid, _)| appid)
                .collect(),
            None => HashSet::new(),
        }
    }

    /// Drops every entry older than the cooldown window, then drops users
    /// left with no entries.
    pub fn sweep_expired(&self, now: DateTime<Utc>) {
        let mut entries = self.entries.lock();

        for user_games in entries.values_mut() {
            user_games.retain(|_, timestamp| now.signed_duration_since(*timestamp) <= self.window);
        }
        entries.retain(|_, user_games| !user_games.is_empty());
    }

    /// Sets or refreshes the timestamp for each recommended game, then
    /// enforces the per-user capacity bound by keeping the newest entries.
    pub fn record(&self, user_key: &str, appids: &[u32], now: DateTime<Utc>) {
        if appids.is_empty() {
            return;
        }

        let mut entries = self.entries.lock();
        let user_games = entries.entry(user_key.to_string()).or_default();

        for &appid in appids {
            user_games.insert(appid, now);
        }

        if user_games.len() > self.capacity {
            let mut by_age: Vec<(u32, DateTime<Utc>)> =
                user_games.iter().map(|(&appid, &timestamp)| (appid, timestamp)).collect();
            by_age.sort_by_key(|&(_, timestamp)| std::cmp::Reverse(timestamp));
            by_age.truncate(self.capacity);

            *user_games = by_age.into_iter().collect();
        }
    }

    pub fn tracked_users(&self) -> usize {
        self.entries.lock().len()
    }
}
