pub mod chime;

use chime::AlertChime;

use rodio::{OutputStream, Sink};
use std::sync::{
    mpsc::{self, Sender},
    Arc, Mutex,
};
use std::thread;

use crate::alert::AlertSound;

const ENABLE_LOGS: bool = true;
use crate::{log_info, log_warn};

type Finisher = Box<dyn FnOnce() + Send + 'static>;

enum AudioCommand {
    PlayCue(Finisher),
}

/// Alert-cue playback on a dedicated audio thread. The thread holds the
/// non-Send rodio objects; the handle only sends commands. The output
/// stream and sink are created lazily on the first cue. After a cue drains,
/// the completion callback runs on the audio thread — and it still runs
/// when no output device exists, so the alert gate cannot wedge in cooldown
/// on audio-less machines.
pub struct CuePlayer {
    tx: Arc<Mutex<Option<Sender<AudioCommand>>>>,
}

impl CuePlayer {
    pub fn new() -> Self {
        Self {
            tx: Arc::new(Mutex::new(None)),
        }
    }

    fn ensure_thread(&self) -> Result<Sender<AudioCommand>, String> {
        if let Some(tx) = self.tx.lock().map_err(|e| e.to_string())?.as_ref() {
            return Ok(tx.clone());
        }

        let (tx, rx) = mpsc::channel::<AudioCommand>();

        // Spawn dedicated audio thread holding non-Send audio objects
        thread::Builder::new()
            .name("cue-player".to_string())
            .spawn(move || {
                let mut _stream: Option<OutputStream> = None;
                let mut sink: Option<Sink> = None;

                fn ensure_sink(
                    stream: &mut Option<OutputStream>,
                    sink: &mut Option<Sink>,
                ) -> Result<(), String> {
                    if sink.is_none() {
                        let (s, handle) = OutputStream::try_default()
                            .map_err(|e| format!("Failed to create audio output stream: {}", e))?;
                        let new_sink = Sink::try_new(&handle)
                            .map_err(|e| format!("Failed to create audio sink: {}", e))?;
                        *stream = Some(s);
                        *sink = Some(new_sink);
                    }
                    Ok(())
                }

                while let Ok(cmd) = rx.recv() {
                    match cmd {
                        AudioCommand::PlayCue(on_finished) => {
                            match ensure_sink(&mut _stream, &mut sink) {
                                Ok(()) => {
                                    if let Some(ref s) = sink {
                                        s.append(AlertChime::new());
                                        s.sleep_until_end();
                                        log_info!("alert cue drained");
                                    }
                                }
                                Err(err) => {
                                    log_warn!("cue playback unavailable: {err}");
                                    // Drop the broken sink so the next cue
                                    // retries stream creation.
                                    sink = None;
                                    _stream = None;
                                }
                            }
                            on_finished();
                        }
                    }
                }
            })
            .map_err(|e| e.to_string())?;

        let tx_clone = tx.clone();
        *self.tx.lock().map_err(|e| e.to_string())? = Some(tx);
        Ok(tx_clone)
    }
}

impl Default for CuePlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertSound for CuePlayer {
    fn play(&self, on_finished: Finisher) {
        match self.ensure_thread() {
            Ok(tx) => {
                if let Err(unsent) = tx.send(AudioCommand::PlayCue(on_finished)) {
                    log_warn!("audio thread gone, completing cue immediately");
                    let AudioCommand::PlayCue(on_finished) = unsent.0;
                    on_finished();
                }
            }
            Err(err) => {
                // No audio thread at all: complete immediately so the gate
                // re-arms and the notification cooldown stays the limiter.
                log_warn!("could not start audio thread: {err}");
                on_finished();
            }
        }
    }
}
