//! Audio output backends.
//!
//! [`AudioBackend`] is the seam between the controller's state machine and the
//! actual audio stack. The production implementation owns a rodio sink on a
//! dedicated thread, driven over an mpsc channel; elapsed time is tracked with
//! a `started_at` instant plus the time accumulated across pauses, and seeking
//! rebuilds the sink with `Source::skip_duration`.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use rodio::{Decoder, OutputStream, Sink, Source};
use thiserror::Error;

use super::source::ResolvedSource;

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("could not open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not decode {path}")]
    Decode { path: PathBuf },
    #[error("no playable files in source")]
    NothingPlayable,
    #[error("audio thread is not running")]
    ThreadGone,
}

/// Transport-level interface the controller drives.
///
/// `load` leaves the source paused; `play` starts or resumes it. `take_ended`
/// reports (once) that the loaded source finished on its own, which the
/// controller turns into an automatic track advance.
pub trait AudioBackend {
    fn load(&mut self, source: &ResolvedSource) -> Result<(), PlaybackError>;
    fn play(&mut self) -> Result<(), PlaybackError>;
    fn pause(&mut self);
    fn stop(&mut self);
    fn seek_to(&mut self, position: Duration);
    fn position(&self) -> Duration;
    fn duration(&self) -> Option<Duration>;
    fn set_volume(&mut self, volume: f32);
    fn set_looping(&mut self, on: bool);
    /// Whether the output stack can play adaptive manifests natively
    /// (rodio cannot; the manifest loader handles them instead).
    fn supports_native_adaptive(&self) -> bool {
        false
    }
    fn take_ended(&mut self) -> bool;
}

#[derive(Debug)]
enum SinkCmd {
    Load(Vec<PathBuf>),
    Play,
    Pause,
    Stop,
    SeekTo(Duration),
    SetVolume(f32),
    SetLooping(bool),
    Quit,
}

#[derive(Debug, Default)]
struct SinkInfo {
    position: Duration,
    duration: Option<Duration>,
    playing: bool,
    ended: bool,
}

type InfoHandle = Arc<Mutex<SinkInfo>>;

/// Rodio-backed implementation running the sink on its own thread.
pub struct RodioBackend {
    tx: Sender<SinkCmd>,
    info: InfoHandle,
    join: Option<thread::JoinHandle<()>>,
}

impl RodioBackend {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<SinkCmd>();
        let info: InfoHandle = Arc::new(Mutex::new(SinkInfo::default()));
        let join = spawn_sink_thread(rx, info.clone());
        Self {
            tx,
            info,
            join: Some(join),
        }
    }

    fn send(&self, cmd: SinkCmd) {
        if self.tx.send(cmd).is_err() {
            tracing::error!("audio thread is gone, command dropped");
        }
    }
}

impl Drop for RodioBackend {
    /// Stop playback and wait for the audio thread to exit.
    fn drop(&mut self) {
        let _ = self.tx.send(SinkCmd::Quit);
        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }
}

impl AudioBackend for RodioBackend {
    fn load(&mut self, source: &ResolvedSource) -> Result<(), PlaybackError> {
        // Validate up front so the caller gets a synchronous error; the
        // thread re-opens the files when building the sink.
        let mut playable = Vec::new();
        let mut last_err = None;
        for path in &source.files {
            match probe(path) {
                Ok(()) => playable.push(path.clone()),
                Err(e) => {
                    // A bad segment is skipped in place; the rest still plays.
                    tracing::warn!(path = %path.display(), error = %e, "skipping unplayable file");
                    last_err = Some(e);
                }
            }
        }
        if playable.is_empty() {
            return Err(last_err.unwrap_or(PlaybackError::NothingPlayable));
        }
        self.send(SinkCmd::Load(playable));
        Ok(())
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        if self.tx.send(SinkCmd::Play).is_err() {
            return Err(PlaybackError::ThreadGone);
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.send(SinkCmd::Pause);
    }

    fn stop(&mut self) {
        self.send(SinkCmd::Stop);
    }

    fn seek_to(&mut self, position: Duration) {
        self.send(SinkCmd::SeekTo(position));
    }

    fn position(&self) -> Duration {
        self.info.lock().map(|i| i.position).unwrap_or(Duration::ZERO)
    }

    fn duration(&self) -> Option<Duration> {
        self.info.lock().ok().and_then(|i| i.duration)
    }

    fn set_volume(&mut self, volume: f32) {
        self.send(SinkCmd::SetVolume(volume.clamp(0.0, 1.0)));
    }

    fn set_looping(&mut self, on: bool) {
        self.send(SinkCmd::SetLooping(on));
    }

    fn take_ended(&mut self) -> bool {
        match self.info.lock() {
            Ok(mut i) => std::mem::take(&mut i.ended),
            Err(_) => false,
        }
    }
}

/// Open and decode `path` far enough to know the sink can play it.
fn probe(path: &PathBuf) -> Result<(), PlaybackError> {
    let file = File::open(path).map_err(|source| PlaybackError::Open {
        path: path.clone(),
        source,
    })?;
    Decoder::new(BufReader::new(file)).map_err(|_| PlaybackError::Decode { path: path.clone() })?;
    Ok(())
}

fn spawn_sink_thread(rx: Receiver<SinkCmd>, info: InfoHandle) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = rodio::OutputStreamBuilder::open_default_stream()
            .expect("ERR: No audio output device");
        // rodio logs to stderr when OutputStream is dropped; noisy for a TUI.
        stream.log_on_drop(false);

        let mut sink: Option<Sink> = None;
        let mut files: Vec<PathBuf> = Vec::new();
        let mut paused = true;
        let mut volume: f32 = 1.0;
        let mut looping = false;

        // Elapsed = accumulated across pauses + time since last (un)pause.
        let mut started_at: Option<Instant> = None;
        let mut accumulated = Duration::ZERO;

        fn build_sink(
            stream: &OutputStream,
            files: &[PathBuf],
            skip: Duration,
            volume: f32,
        ) -> (Sink, Option<Duration>) {
            let sink = Sink::connect_new(stream.mixer());
            sink.set_volume(volume);
            let mut total: Option<Duration> = Some(Duration::ZERO);
            let mut remaining_skip = skip;
            for path in files {
                let Ok(file) = File::open(path) else {
                    tracing::warn!(path = %path.display(), "segment vanished, skipping");
                    continue;
                };
                let Ok(source) = Decoder::new(BufReader::new(file)) else {
                    tracing::warn!(path = %path.display(), "segment undecodable, skipping");
                    continue;
                };
                let len = source.total_duration();
                total = match (total, len) {
                    (Some(t), Some(l)) => Some(t + l),
                    _ => None,
                };
                if remaining_skip > Duration::ZERO {
                    if let Some(l) = len {
                        if remaining_skip >= l {
                            // Entirely before the seek target.
                            remaining_skip -= l;
                            continue;
                        }
                    }
                    sink.append(source.skip_duration(remaining_skip));
                    remaining_skip = Duration::ZERO;
                } else {
                    sink.append(source);
                }
            }
            sink.pause();
            (sink, total)
        }

        loop {
            match rx.recv_timeout(Duration::from_millis(100)) {
                Ok(cmd) => match cmd {
                    SinkCmd::Load(new_files) => {
                        if let Some(s) = sink.as_ref() {
                            s.stop();
                        }
                        let (new_sink, total) = build_sink(&stream, &new_files, Duration::ZERO, volume);
                        sink = Some(new_sink);
                        files = new_files;
                        paused = true;
                        started_at = None;
                        accumulated = Duration::ZERO;
                        if let Ok(mut i) = info.lock() {
                            i.position = Duration::ZERO;
                            i.duration = total;
                            i.playing = false;
                            i.ended = false;
                        }
                    }
                    SinkCmd::Play => {
                        if let Some(s) = sink.as_ref() {
                            s.play();
                            paused = false;
                            started_at = Some(Instant::now());
                            if let Ok(mut i) = info.lock() {
                                i.playing = true;
                            }
                        }
                    }
                    SinkCmd::Pause => {
                        if let Some(s) = sink.as_ref() {
                            s.pause();
                        }
                        if let Some(st) = started_at.take() {
                            accumulated += st.elapsed();
                        }
                        paused = true;
                        if let Ok(mut i) = info.lock() {
                            i.position = accumulated;
                            i.playing = false;
                        }
                    }
                    SinkCmd::Stop => {
                        if let Some(s) = sink.take() {
                            s.stop();
                        }
                        files.clear();
                        paused = true;
                        started_at = None;
                        accumulated = Duration::ZERO;
                        if let Ok(mut i) = info.lock() {
                            i.position = Duration::ZERO;
                            i.duration = None;
                            i.playing = false;
                            i.ended = false;
                        }
                    }
                    SinkCmd::SeekTo(target) => {
                        if sink.is_none() || files.is_empty() {
                            continue;
                        }
                        let target = match info.lock().ok().and_then(|i| i.duration) {
                            Some(total) => target.min(total),
                            None => target,
                        };
                        if let Some(s) = sink.as_ref() {
                            s.stop();
                        }
                        let (new_sink, _) = build_sink(&stream, &files, target, volume);
                        if paused {
                            started_at = None;
                        } else {
                            new_sink.play();
                            started_at = Some(Instant::now());
                        }
                        sink = Some(new_sink);
                        accumulated = target;
                        if let Ok(mut i) = info.lock() {
                            i.position = target;
                        }
                    }
                    SinkCmd::SetVolume(v) => {
                        volume = v;
                        if let Some(s) = sink.as_ref() {
                            s.set_volume(v);
                        }
                    }
                    SinkCmd::SetLooping(on) => {
                        looping = on;
                    }
                    SinkCmd::Quit => {
                        if let Some(s) = sink.as_ref() {
                            s.stop();
                        }
                        if let Ok(mut i) = info.lock() {
                            i.playing = false;
                        }
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    // Refresh the published position and watch for end-of-source.
                    let live = accumulated
                        + started_at.map_or(Duration::ZERO, |st| st.elapsed());
                    if let Ok(mut i) = info.lock() {
                        if !paused {
                            i.position = live;
                        }
                    }
                    if let Some(s) = sink.as_ref() {
                        if !paused && s.empty() {
                            if looping {
                                // Native single-track repeat: rebuild from zero.
                                let (new_sink, _) = build_sink(&stream, &files, Duration::ZERO, volume);
                                new_sink.play();
                                sink = Some(new_sink);
                                started_at = Some(Instant::now());
                                accumulated = Duration::ZERO;
                                if let Ok(mut i) = info.lock() {
                                    i.position = Duration::ZERO;
                                }
                            } else {
                                sink = None;
                                paused = true;
                                started_at = None;
                                if let Ok(mut i) = info.lock() {
                                    i.playing = false;
                                    i.ended = true;
                                }
                            }
                        }
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
