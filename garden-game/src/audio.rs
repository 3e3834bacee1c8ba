//! Sound effect playback behind an enable switch.
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::constants::{HARVEST_SOUND_ASSET, HARVEST_SOUND_VOLUME};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sound {
    Harvest,
}

impl Sound {
    pub const ALL: [Self; 1] = [Self::Harvest];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Harvest => "harvest",
        }
    }

    #[must_use]
    pub const fn asset(self) -> &'static str {
        match self {
            Self::Harvest => HARVEST_SOUND_ASSET,
        }
    }

    #[must_use]
    pub const fn default_volume(self) -> f64 {
        match self {
            Self::Harvest => HARVEST_SOUND_VOLUME,
        }
    }
}

impl fmt::Display for Sound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform playback. Each call starts an independent, overlapping instance.
pub trait SoundPlayer {
    type Error: std::error::Error + 'static;

    /// Start playing `asset` at `volume`.
    ///
    /// # Errors
    ///
    /// Returns the platform error when playback cannot start.
    fn play(&mut self, asset: &str, volume: f64) -> Result<(), Self::Error>;
}

/// Tracks volumes and the sfx switch in front of a [`SoundPlayer`].
#[derive(Debug, Clone)]
pub struct AudioManager<P> {
    player: P,
    enabled: bool,
    volumes: BTreeMap<Sound, f64>,
}

impl<P: SoundPlayer> AudioManager<P> {
    #[must_use]
    pub fn new(player: P) -> Self {
        Self {
            player,
            enabled: true,
            volumes: Sound::ALL
                .into_iter()
                .map(|sound| (sound, sound.default_volume()))
                .collect(),
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Set a volume, clamped to `[0, 1]`.
    pub fn set_volume(&mut self, sound: Sound, volume: f64) {
        let clamped = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
        self.volumes.insert(sound, clamped);
    }

    #[must_use]
    pub fn volume(&self, sound: Sound) -> f64 {
        self.volumes
            .get(&sound)
            .copied()
            .unwrap_or_else(|| sound.default_volume())
    }

    /// Play `sound` when enabled. Returns whether playback started; failures
    /// are logged and otherwise ignored.
    pub fn play(&mut self, sound: Sound) -> bool {
        if !self.enabled {
            return false;
        }
        let volume = self.volume(sound);
        match self.player.play(sound.asset(), volume) {
            Ok(()) => true,
            Err(err) => {
                warn!("failed to play sound {sound}: {err}");
                false
            }
        }
    }

    #[must_use]
    pub const fn player(&self) -> &P {
        &self.player
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error("audio output is muted")]
pub struct Muted;

/// Player that records requests instead of producing sound.
#[derive(Debug, Clone, Default)]
pub struct RecordingPlayer {
    pub played: Vec<(String, f64)>,
    pub fail: bool,
}

impl SoundPlayer for RecordingPlayer {
    type Error = Muted;

    fn play(&mut self, asset: &str, volume: f64) -> Result<(), Self::Error> {
        if self.fail {
            return Err(Muted);
        }
        self.played.push((asset.to_string(), volume));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plays_at_default_volume_when_enabled() {
        let mut audio = AudioManager::new(RecordingPlayer::default());
        assert!(audio.play(Sound::Harvest));
        assert_eq!(
            audio.player().played,
            vec![("assets/harvest_sound.wav".to_string(), 0.5)]
        );
    }

    #[test]
    fn disabled_manager_stays_silent() {
        let mut audio = AudioManager::new(RecordingPlayer::default());
        audio.set_enabled(false);
        assert!(!audio.play(Sound::Harvest));
        assert!(audio.player().played.is_empty());
    }

    #[test]
    fn volume_is_clamped() {
        let mut audio = AudioManager::new(RecordingPlayer::default());
        audio.set_volume(Sound::Harvest, 3.0);
        assert!((audio.volume(Sound::Harvest) - 1.0).abs() < f64::EPSILON);
        audio.set_volume(Sound::Harvest, -1.0);
        assert!(audio.volume(Sound::Harvest).abs() < f64::EPSILON);
    }

    #[test]
    fn playback_failures_are_swallowed() {
        let mut audio = AudioManager::new(RecordingPlayer {
            fail: true,
            ..RecordingPlayer::default()
        });
        assert!(!audio.play(Sound::Harvest));
    }
}
