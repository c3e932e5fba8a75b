//! Value types describing the media player as seen by the bridge.

use std::fmt;

use super::timecode::TimeOffset;

/// Kodi's numeric player identifier (`playerid`).
pub type PlayerId = i64;

/// Window label Kodi reports while a video plays full screen.
pub const FULLSCREEN_VIDEO: &str = "Fullscreen video";

/// Window label Kodi reports while music plays with the visualiser.
pub const AUDIO_VISUALISATION: &str = "Audio visualisation";

/// Media type of the active player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerKind {
    Audio,
    Video,
    /// Any other player type Kodi reports (e.g. `"picture"`).
    Other(String),
}

impl PlayerKind {
    /// Maps Kodi's `type` string to a kind.
    pub fn from_kodi(kind: &str) -> Self {
        match kind {
            "audio" => PlayerKind::Audio,
            "video" => PlayerKind::Video,
            other => PlayerKind::Other(other.to_string()),
        }
    }
}

/// Everything the mapper needs to know about the active player.
///
/// Fetched fresh for every dispatched command; never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSnapshot {
    pub player_id: PlayerId,
    pub kind: PlayerKind,
    /// Elapsed playback time.
    pub position: TimeOffset,
    /// Total length of the current item.
    pub total: TimeOffset,
    pub subtitles_enabled: bool,
}

/// Label of the currently focused Kodi window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowContext(String);

impl WindowContext {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn label(&self) -> &str {
        &self.0
    }

    /// `true` while a video plays full screen.
    pub fn is_fullscreen_video(&self) -> bool {
        self.0 == FULLSCREEN_VIDEO
    }

    /// `true` on either playback surface (fullscreen video or audio visualisation).
    pub fn is_playback_surface(&self) -> bool {
        self.is_fullscreen_video() || self.0 == AUDIO_VISUALISATION
    }
}

impl fmt::Display for WindowContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Directional / menu navigation commands (Kodi's `Input.*` methods).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Up,
    Down,
    Left,
    Right,
    Select,
    Back,
    Home,
}

impl Navigation {
    /// The JSON-RPC method implementing this navigation.
    pub fn method(self) -> &'static str {
        match self {
            Navigation::Up => "Input.Up",
            Navigation::Down => "Input.Down",
            Navigation::Left => "Input.Left",
            Navigation::Right => "Input.Right",
            Navigation::Select => "Input.Select",
            Navigation::Back => "Input.Back",
            Navigation::Home => "Input.Home",
        }
    }
}

/// Named Kodi actions executed through `Input.ExecuteAction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedAction {
    SkipNext,
    SkipPrevious,
}

impl NamedAction {
    /// Kodi's action name.
    pub fn as_str(self) -> &'static str {
        match self {
            NamedAction::SkipNext => "skipnext",
            NamedAction::SkipPrevious => "skipprevious",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_kind_from_kodi() {
        assert_eq!(PlayerKind::from_kodi("audio"), PlayerKind::Audio);
        assert_eq!(PlayerKind::from_kodi("video"), PlayerKind::Video);
        assert_eq!(
            PlayerKind::from_kodi("picture"),
            PlayerKind::Other("picture".to_string())
        );
    }

    #[test]
    fn test_window_context_surfaces() {
        assert!(WindowContext::new(FULLSCREEN_VIDEO).is_fullscreen_video());
        assert!(WindowContext::new(FULLSCREEN_VIDEO).is_playback_surface());
        assert!(WindowContext::new(AUDIO_VISUALISATION).is_playback_surface());
        assert!(!WindowContext::new(AUDIO_VISUALISATION).is_fullscreen_video());
        assert!(!WindowContext::new("Home").is_playback_surface());
        assert!(!WindowContext::default().is_playback_surface());
    }
}
