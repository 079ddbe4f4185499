//! Play/pause/seek transport for the map's current date
//!
//! The host feeds animation-frame timestamps through [`Transport::on_frame`].
//! The accumulator keeps full precision; only the displayed date is rounded,
//! so pausing and resuming never drifts.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::core::config::{MapConfig, TransportConfig};
use crate::core::types::Date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TransportState {
    #[display(fmt = "stopped")]
    Stopped,
    #[display(fmt = "playing")]
    Playing,
}

/// Discrete playback speeds offered by the controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
pub enum PlaybackSpeed {
    #[display(fmt = "0.5x")]
    Half,
    #[default]
    #[display(fmt = "1x")]
    Normal,
    #[display(fmt = "2x")]
    Double,
}

impl PlaybackSpeed {
    pub const ALL: [PlaybackSpeed; 3] = [
        PlaybackSpeed::Half,
        PlaybackSpeed::Normal,
        PlaybackSpeed::Double,
    ];

    pub fn multiplier(&self) -> f64 {
        match self {
            PlaybackSpeed::Half => 0.5,
            PlaybackSpeed::Normal => 1.0,
            PlaybackSpeed::Double => 2.0,
        }
    }

    pub fn years_per_second(&self, transport: &TransportConfig) -> f64 {
        transport.base_years_per_second * self.multiplier()
    }
}

/// What a frame did to the transport
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// Not playing; nothing changed
    Idle,
    /// Date advanced (possibly by zero on the first frame)
    Advanced(Date),
    /// Reached the end of the timeline and stopped there
    Finished(Date),
}

#[derive(Debug, Clone)]
pub struct Transport {
    date: Date,
    state: TransportState,
    speed: PlaybackSpeed,
    min_date: Date,
    max_date: Date,
    replay_margin: Date,
    display_rounding: Date,
    base_years_per_second: f64,
    last_frame_ms: Option<f64>,
}

impl Transport {
    /// Stopped at the start of the timeline, at 1x
    pub fn new(map: &MapConfig, transport: &TransportConfig) -> Self {
        Self {
            date: map.min_date,
            state: TransportState::Stopped,
            speed: PlaybackSpeed::Normal,
            min_date: map.min_date,
            max_date: map.max_date,
            replay_margin: map.replay_margin,
            display_rounding: map.display_rounding,
            base_years_per_second: transport.base_years_per_second,
            last_frame_ms: None,
        }
    }

    /// Full-precision current date
    pub fn date(&self) -> Date {
        self.date
    }

    /// Current date rounded for display
    pub fn display_date(&self) -> Date {
        if self.display_rounding <= 0.0 {
            return self.date;
        }
        (self.date / self.display_rounding).round() * self.display_rounding
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == TransportState::Playing
    }

    pub fn speed(&self) -> PlaybackSpeed {
        self.speed
    }

    pub fn years_per_second(&self) -> f64 {
        self.base_years_per_second * self.speed.multiplier()
    }

    pub fn bounds(&self) -> (Date, Date) {
        (self.min_date, self.max_date)
    }

    /// Start playing. Near the end of the timeline this rewinds first.
    ///
    /// Calling it while already playing changes nothing, so the frame
    /// accumulator is never duplicated.
    pub fn play(&mut self) {
        if self.is_playing() {
            return;
        }
        if self.date >= self.max_date - self.replay_margin {
            self.date = self.min_date;
        }
        self.state = TransportState::Playing;
        self.last_frame_ms = None;
        tracing::info!("Transport playing from {:.0} at {}", self.date, self.speed);
    }

    /// Stop where we are; the date is left exactly as accumulated
    pub fn pause(&mut self) {
        if !self.is_playing() {
            return;
        }
        self.state = TransportState::Stopped;
        self.last_frame_ms = None;
        tracing::info!("Transport paused at {:.1}", self.date);
    }

    pub fn toggle(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Jump to a date (clamped). Scrubbing always stops playback.
    pub fn seek(&mut self, date: Date) {
        let date = if date.is_nan() { self.min_date } else { date };
        self.date = date.clamp(self.min_date, self.max_date);
        if self.is_playing() {
            self.state = TransportState::Stopped;
            self.last_frame_ms = None;
        }
        tracing::debug!("Transport seek to {:.1}", self.date);
    }

    /// Change speed without interrupting playback
    pub fn set_speed(&mut self, speed: PlaybackSpeed) {
        self.speed = speed;
    }

    /// Feed an animation-frame timestamp (milliseconds).
    ///
    /// The first frame after playback starts only records the timestamp.
    pub fn on_frame(&mut self, timestamp_ms: f64) -> FrameOutcome {
        if !self.is_playing() {
            return FrameOutcome::Idle;
        }
        let elapsed_ms = match self.last_frame_ms {
            Some(last) => (timestamp_ms - last).max(0.0),
            None => 0.0,
        };
        self.last_frame_ms = Some(timestamp_ms);
        self.advance(elapsed_ms / 1000.0)
    }

    /// Advance by `seconds` of playback time
    pub fn advance(&mut self, seconds: f64) -> FrameOutcome {
        if !self.is_playing() {
            return FrameOutcome::Idle;
        }
        self.date += seconds.max(0.0) * self.years_per_second();
        if self.date >= self.max_date {
            self.date = self.max_date;
            self.state = TransportState::Stopped;
            self.last_frame_ms = None;
            tracing::info!("Transport reached the end of the timeline");
            return FrameOutcome::Finished(self.date);
        }
        FrameOutcome::Advanced(self.date)
    }
}
