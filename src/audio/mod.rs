use std::path::Path;
use std::time::Duration;

use kira::{
    manager::{AudioManager, AudioManagerSettings, backend::DefaultBackend},
    sound::{
        PlaybackState,
        static_sound::{StaticSoundData, StaticSoundHandle, StaticSoundSettings},
    },
    tween::Tween,
};
use log::{debug, warn};

/// Maximum number of audio streams playing at once.
pub const MAX_STREAMS: usize = 5;

const STOP_FADE: Duration = Duration::from_millis(100);

/// A playing sound that can be polled and faded out.
pub trait Stream {
    fn finished(&self) -> bool;
    fn fade_out(&mut self, duration: Duration);
}

impl Stream for StaticSoundHandle {
    fn finished(&self) -> bool {
        matches!(self.state(), PlaybackState::Stopped)
    }

    fn fade_out(&mut self, duration: Duration) {
        let _ = self.stop(Tween { duration, ..Default::default() });
    }
}

/// Audio stream playback for scripts.
///
/// The output device is opened on first use, so games that never play a
/// sound never touch the audio stack.  When no device is available audio is
/// disabled for the rest of the session.
pub struct AudioContext {
    manager: Option<AudioManager>,
    /// Whether opening the device has been attempted yet.
    probed: bool,
    streams: Vec<Box<dyn Stream>>,
}

impl AudioContext {
    pub fn new() -> Self {
        Self { manager: None, probed: false, streams: Vec::new() }
    }

    fn manager(&mut self) -> Option<&mut AudioManager> {
        if !self.probed {
            self.probed = true;
            match AudioManager::<DefaultBackend>::new(AudioManagerSettings::default()) {
                Ok(manager) => self.manager = Some(manager),
                Err(e) => warn!("failed to initialize audio: {e}. Audio disabled."),
            }
        }
        self.manager.as_mut()
    }

    /// Number of streams still playing.
    pub fn active_streams(&mut self) -> usize {
        self.prune();
        self.streams.len()
    }

    /// Whether another stream may start.  Finished streams are dropped first.
    pub fn has_room(&mut self) -> bool {
        self.active_streams() < MAX_STREAMS
    }

    /// Start playing the sound file at `path`.  Returns `false` when the
    /// file cannot be decoded, audio is unavailable, or [`MAX_STREAMS`]
    /// streams are already playing.
    pub fn play(&mut self, path: &Path, looping: bool) -> bool {
        if !self.has_room() {
            warn!("cannot play {}: {MAX_STREAMS} streams already playing", path.display());
            return false;
        }

        let data = match StaticSoundData::from_file(path) {
            Ok(data) => data,
            Err(e) => {
                warn!("failed to load sound {}: {e}", path.display());
                return false;
            }
        };
        let settings = if looping {
            StaticSoundSettings::new().loop_region(0.0..)
        } else {
            StaticSoundSettings::new()
        };

        let Some(manager) = self.manager() else { return false };
        match manager.play(data.with_settings(settings)) {
            Ok(handle) => {
                debug!("playing {}", path.display());
                self.track(Box::new(handle));
                true
            }
            Err(e) => {
                warn!("failed to play {}: {e}", path.display());
                false
            }
        }
    }

    /// Count `stream` against the stream limit until it finishes or is
    /// stopped.
    pub fn track(&mut self, stream: Box<dyn Stream>) {
        self.streams.push(stream);
    }

    /// Fade out and forget every stream.
    pub fn stop_all(&mut self) {
        for mut stream in self.streams.drain(..) {
            stream.fade_out(STOP_FADE);
        }
    }

    fn prune(&mut self) {
        self.streams.retain(|stream| !stream.finished());
    }
}

impl Default for AudioContext {
    fn default() -> Self { Self::new() }
}

/// Stand-in streams for exercising stream bookkeeping without a device.
#[cfg(test)]
pub(crate) mod testing {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;

    use super::Stream;

    #[derive(Clone, Default)]
    pub struct FakeStream {
        pub finished: Rc<Cell<bool>>,
        pub stopped: Rc<Cell<bool>>,
    }

    impl Stream for FakeStream {
        fn finished(&self) -> bool {
            self.finished.get() || self.stopped.get()
        }

        fn fade_out(&mut self, _duration: Duration) {
            self.stopped.set(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeStream;
    use super::*;

    fn playing(audio: &mut AudioContext, count: usize) -> Vec<FakeStream> {
        (0..count)
            .map(|_| {
                let stream = FakeStream::default();
                audio.track(Box::new(stream.clone()));
                stream
            })
            .collect()
    }

    #[test]
    fn stream_limit_is_enforced() {
        let mut audio = AudioContext::new();
        playing(&mut audio, MAX_STREAMS - 1);
        assert!(audio.has_room());

        playing(&mut audio, 1);
        assert!(!audio.has_room());
        // Refused before the file is even read.
        assert!(!audio.play(Path::new("missing.ogg"), false));
        assert_eq!(audio.active_streams(), MAX_STREAMS);
    }

    #[test]
    fn finished_streams_free_their_slot() {
        let mut audio = AudioContext::new();
        let streams = playing(&mut audio, MAX_STREAMS);
        assert!(!audio.has_room());

        streams[2].finished.set(true);
        assert!(audio.has_room());
        assert_eq!(audio.active_streams(), MAX_STREAMS - 1);
    }

    #[test]
    fn stop_all_fades_out_every_stream() {
        let mut audio = AudioContext::new();
        let streams = playing(&mut audio, 3);
        audio.stop_all();

        assert!(streams.iter().all(|s| s.stopped.get()));
        assert_eq!(audio.active_streams(), 0);
    }
}
