//! Playback sequencing over a packed playlist.
//!
//! A small state machine: current index, manual navigation, auto-advance
//! when the player reports the end of a segment. The player is an external
//! collaborator behind the [`Player`] trait; its callbacks are forwarded in
//! as [`PlayerEvent`]s by the host.

use tracing::debug;

use crate::types::PlaylistEntry;

/// Side-effecting player collaborator. The sequencer only ever asks it to
/// load a video at segment bounds; state reports flow back as
/// [`PlayerEvent`]s.
pub trait Player {
    fn load(&mut self, video_id: &str, start_time: f64, end_time: f64);
}

/// Callbacks from the player collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    /// Player finished initializing; navigation becomes possible.
    Ready,
    /// The most recently loaded entry is now actually playing.
    ActivelyPlaying,
    /// The current segment reached its end bound.
    Ended,
}

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to a new entry and asked the player to load it.
    Moved,
    /// Already at the last entry; terminal condition, index unchanged.
    EndOfPlaylist,
    /// No-op: empty playlist, player not ready, or already at the start.
    Blocked,
}

/// Whether the last transition was an explicit navigation call whose "now
/// playing" confirmation is still outstanding. While pending, a stale
/// `Ended` from the superseded video must not advance the playlist again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NavigationPhase {
    Settled,
    PendingManual,
}

pub struct Sequencer<P: Player> {
    player: P,
    playlist: Vec<PlaylistEntry>,
    current_index: usize,
    phase: NavigationPhase,
    player_ready: bool,
}

impl<P: Player> Sequencer<P> {
    pub fn new(player: P) -> Self {
        Self {
            player,
            playlist: Vec::new(),
            current_index: 0,
            phase: NavigationPhase::Settled,
            player_ready: false,
        }
    }

    /// Replace the playlist and reset to the first entry. Loading does not
    /// start playback; call [`Sequencer::play_at`] for that.
    pub fn load_playlist(&mut self, entries: Vec<PlaylistEntry>) {
        self.playlist = entries;
        self.current_index = 0;
        self.phase = NavigationPhase::Settled;
        debug!(len = self.playlist.len(), "playlist loaded");
    }

    /// Jump to entry `index` and ask the player to load it. Out-of-range
    /// indices and calls before the player is ready are no-ops.
    pub fn play_at(&mut self, index: usize) -> bool {
        if !self.player_ready || index >= self.playlist.len() {
            return false;
        }
        self.current_index = index;
        self.phase = NavigationPhase::PendingManual;
        let entry = &self.playlist[index];
        self.player
            .load(&entry.video.id, entry.segment.start_time, entry.segment.end_time);
        true
    }

    pub fn next(&mut self) -> Advance {
        if !self.player_ready || self.playlist.is_empty() {
            return Advance::Blocked;
        }
        if self.current_index + 1 >= self.playlist.len() {
            return Advance::EndOfPlaylist;
        }
        self.play_at(self.current_index + 1);
        Advance::Moved
    }

    pub fn previous(&mut self) -> Advance {
        if !self.player_ready || self.playlist.is_empty() || self.current_index == 0 {
            return Advance::Blocked;
        }
        self.play_at(self.current_index - 1);
        Advance::Moved
    }

    /// Feed a player callback into the machine. Returns the auto-advance
    /// outcome when an `Ended` event was acted upon.
    pub fn handle_player_event(&mut self, event: PlayerEvent) -> Option<Advance> {
        match event {
            PlayerEvent::Ready => {
                self.player_ready = true;
                None
            }
            PlayerEvent::ActivelyPlaying => {
                self.phase = NavigationPhase::Settled;
                None
            }
            PlayerEvent::Ended => {
                if self.phase == NavigationPhase::PendingManual {
                    // Stale end notification from a superseded video.
                    debug!("dropping ended event during pending manual navigation");
                    return None;
                }
                Some(self.next())
            }
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_entry(&self) -> Option<&PlaylistEntry> {
        self.playlist.get(self.current_index)
    }

    pub fn len(&self) -> usize {
        self.playlist.len()
    }

    /// Idle: no playlist loaded.
    pub fn is_empty(&self) -> bool {
        self.playlist.is_empty()
    }

    pub fn is_at_start(&self) -> bool {
        self.current_index == 0
    }

    pub fn is_at_end(&self) -> bool {
        !self.playlist.is_empty() && self.current_index + 1 == self.playlist.len()
    }

    pub fn is_ready(&self) -> bool {
        self.player_ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Segment, Video};

    /// Records every load request for assertions.
    #[derive(Default)]
    struct RecordingPlayer {
        loads: Vec<(String, f64, f64)>,
    }

    impl Player for RecordingPlayer {
        fn load(&mut self, video_id: &str, start_time: f64, end_time: f64) {
            self.loads.push((video_id.to_string(), start_time, end_time));
        }
    }

    fn entry(id: &str, start: f64, end: f64) -> PlaylistEntry {
        PlaylistEntry {
            video: Video {
                id: id.to_string(),
                title: String::new(),
                description: String::new(),
            },
            segment: Segment {
                start_time: start,
                end_time: end,
                relevance: 0.9,
                level_fit: 0.9,
                summary: String::new(),
            },
        }
    }

    fn ready_sequencer(entries: Vec<PlaylistEntry>) -> Sequencer<RecordingPlayer> {
        let mut seq = Sequencer::new(RecordingPlayer::default());
        seq.handle_player_event(PlayerEvent::Ready);
        seq.load_playlist(entries);
        seq
    }

    #[test]
    fn play_at_loads_segment_bounds() {
        let mut seq = ready_sequencer(vec![entry("a", 10.0, 70.0), entry("b", 0.0, 60.0)]);
        assert!(seq.play_at(1));
        assert_eq!(seq.current_index(), 1);
        assert_eq!(seq.player.loads, vec![("b".to_string(), 0.0, 60.0)]);
    }

    #[test]
    fn play_at_out_of_range_is_a_noop() {
        let mut seq = ready_sequencer(vec![entry("a", 0.0, 60.0)]);
        assert!(!seq.play_at(5));
        assert_eq!(seq.current_index(), 0);
        assert!(seq.player.loads.is_empty());
    }

    #[test]
    fn navigation_before_player_ready_is_a_noop() {
        let mut seq = Sequencer::new(RecordingPlayer::default());
        seq.load_playlist(vec![entry("a", 0.0, 60.0), entry("b", 0.0, 60.0)]);
        assert!(!seq.play_at(0));
        assert_eq!(seq.next(), Advance::Blocked);
        assert!(seq.player.loads.is_empty());

        seq.handle_player_event(PlayerEvent::Ready);
        assert!(seq.play_at(0));
    }

    #[test]
    fn next_at_last_index_reports_end_without_moving() {
        let mut seq = ready_sequencer(vec![entry("a", 0.0, 60.0), entry("b", 0.0, 60.0)]);
        assert_eq!(seq.next(), Advance::Moved);
        assert!(seq.is_at_end());
        assert_eq!(seq.next(), Advance::EndOfPlaylist);
        assert_eq!(seq.current_index(), 1);
    }

    #[test]
    fn previous_at_start_is_a_noop() {
        let mut seq = ready_sequencer(vec![entry("a", 0.0, 60.0), entry("b", 0.0, 60.0)]);
        assert_eq!(seq.previous(), Advance::Blocked);
        assert_eq!(seq.current_index(), 0);
    }

    #[test]
    fn ended_auto_advances_when_settled() {
        let mut seq = ready_sequencer(vec![entry("a", 0.0, 60.0), entry("b", 0.0, 60.0)]);
        seq.play_at(0);
        seq.handle_player_event(PlayerEvent::ActivelyPlaying);
        assert_eq!(seq.handle_player_event(PlayerEvent::Ended), Some(Advance::Moved));
        assert_eq!(seq.current_index(), 1);
    }

    #[test]
    fn stale_ended_is_dropped_during_pending_manual_navigation() {
        let mut seq = ready_sequencer(vec![
            entry("a", 0.0, 60.0),
            entry("b", 0.0, 60.0),
            entry("c", 0.0, 60.0),
        ]);
        seq.play_at(0);
        seq.handle_player_event(PlayerEvent::ActivelyPlaying);
        // User skips manually; old video's end notification arrives late.
        seq.next();
        assert_eq!(seq.handle_player_event(PlayerEvent::Ended), None);
        assert_eq!(seq.current_index(), 1);
        // The new video confirms playback, then a real end advances.
        seq.handle_player_event(PlayerEvent::ActivelyPlaying);
        assert_eq!(seq.handle_player_event(PlayerEvent::Ended), Some(Advance::Moved));
        assert_eq!(seq.current_index(), 2);
    }

    #[test]
    fn ended_on_last_entry_reports_end_of_playlist() {
        let mut seq = ready_sequencer(vec![entry("a", 0.0, 60.0)]);
        seq.play_at(0);
        seq.handle_player_event(PlayerEvent::ActivelyPlaying);
        assert_eq!(
            seq.handle_player_event(PlayerEvent::Ended),
            Some(Advance::EndOfPlaylist)
        );
    }

    #[test]
    fn loading_a_new_playlist_resets_the_session() {
        let mut seq = ready_sequencer(vec![entry("a", 0.0, 60.0), entry("b", 0.0, 60.0)]);
        seq.play_at(1);
        seq.load_playlist(vec![entry("c", 0.0, 60.0)]);
        assert_eq!(seq.current_index(), 0);
        assert!(seq.is_at_start());
        // Pending phase from the old session must not leak: a fresh ended
        // event after the reset may advance normally.
        assert_eq!(
            seq.handle_player_event(PlayerEvent::Ended),
            Some(Advance::EndOfPlaylist)
        );
    }

    #[test]
    fn empty_playlist_is_idle() {
        let mut seq = ready_sequencer(Vec::new());
        assert!(seq.is_empty());
        assert_eq!(seq.next(), Advance::Blocked);
        assert_eq!(seq.previous(), Advance::Blocked);
        assert!(seq.current_entry().is_none());
        assert!(!seq.is_at_end());
    }
}
