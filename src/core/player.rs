//! Player identification and per-player data storage.
//!
//! ## PlayerId
//!
//! Seat index of a participant, 0-based, supporting 1-255 players.
//! Human or automated, the engine treats every seat the same way.
//!
//! ## PlayerMap
//!
//! Per-seat storage backed by `Vec` for O(1) access, used for scores,
//! ledger entries, simultaneous choices and feed cursors.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Seat identifier supporting 1-255 players.
///
/// Player indices are 0-based: the first seat is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Convert a seat index into a player ID, if it is seated in a game
    /// of `player_count` players.
    #[must_use]
    pub fn from_index(index: usize, player_count: usize) -> Option<Self> {
        (index < player_count && index <= u8::MAX as usize).then(|| Self(index as u8))
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    ///
    /// ```
    /// use rust_parley::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(4).collect();
    /// assert_eq!(players.len(), 4);
    /// assert_eq!(players[3], PlayerId::new(3));
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }

    /// Seats in round-robin order strictly after `self`, wrapping around,
    /// ending with `self`.
    ///
    /// ```
    /// use rust_parley::core::PlayerId;
    ///
    /// let order: Vec<_> = PlayerId::new(2).round_robin(4).map(|p| p.0).collect();
    /// assert_eq!(order, vec![3, 0, 1, 2]);
    /// ```
    pub fn round_robin(self, player_count: usize) -> impl Iterator<Item = PlayerId> {
        let start = self.index();
        (1..=player_count).map(move |offset| PlayerId(((start + offset) % player_count) as u8))
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-player data storage with O(1) access.
///
/// Backed by a `Vec<T>` with one entry per seat.
///
/// ## Example
///
/// ```
/// use rust_parley::core::{PlayerId, PlayerMap};
///
/// let mut scores: PlayerMap<i64> = PlayerMap::with_value(4, 0);
/// scores[PlayerId::new(1)] += 3;
/// assert_eq!(scores[PlayerId::new(1)], 3);
/// assert_eq!(scores.values().sum::<i64>(), 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    ///
    /// The factory receives the `PlayerId` for each seat.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        let data = (0..player_count as u8).map(|i| factory(PlayerId(i))).collect();

        Self { data }
    }

    /// Create a new PlayerMap with all entries set to the same value.
    pub fn with_value(player_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(player_count, |_| value.clone())
    }

    /// Create a new PlayerMap with default values.
    pub fn with_default(player_count: usize) -> Self
    where
        T: Default,
    {
        Self::new(player_count, |_| T::default())
    }

    /// Get the number of seats.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Get a reference to a seat's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a seat's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs in seat order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data.iter().enumerate().map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over values in seat order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Iterate over all player IDs.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        (0..self.data.len() as u8).map(PlayerId)
    }

    /// Build a new map by transforming every entry.
    pub fn map<U>(&self, mut f: impl FnMut(PlayerId, &T) -> U) -> PlayerMap<U> {
        PlayerMap {
            data: self.iter().map(|(p, v)| f(p, v)).collect(),
        }
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_display() {
        assert_eq!(format!("{}", PlayerId::new(3)), "Player 3");
    }

    #[test]
    fn test_from_index_bounds() {
        assert_eq!(PlayerId::from_index(0, 4), Some(PlayerId::new(0)));
        assert_eq!(PlayerId::from_index(3, 4), Some(PlayerId::new(3)));
        assert_eq!(PlayerId::from_index(4, 4), None);
    }

    #[test]
    fn test_round_robin_visits_everyone_once() {
        let order: Vec<_> = PlayerId::new(0).round_robin(4).collect();
        assert_eq!(
            order,
            vec![PlayerId::new(1), PlayerId::new(2), PlayerId::new(3), PlayerId::new(0)]
        );
    }

    #[test]
    fn test_player_map_map_and_values() {
        let map: PlayerMap<i64> = PlayerMap::new(3, |p| p.index() as i64);
        let doubled = map.map(|_, v| v * 2);

        assert_eq!(doubled.values().copied().collect::<Vec<_>>(), vec![0, 2, 4]);
        assert_eq!(doubled.player_count(), 3);
    }

    #[test]
    fn test_player_map_serialization() {
        let map: PlayerMap<Option<String>> = PlayerMap::new(2, |p| {
            (p.index() == 1).then(|| "X".to_string())
        });
        let json = serde_json::to_string(&map).unwrap();
        let restored: PlayerMap<Option<String>> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, restored);
    }

    #[test]
    #[should_panic(expected = "Must have at least 1 player")]
    fn test_player_map_zero_players() {
        let _: PlayerMap<i32> = PlayerMap::with_value(0, 0);
    }
}
