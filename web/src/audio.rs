use crate::client::GeminiClient;
use futures_channel::oneshot;
use futures_util::future::{AbortHandle, AbortRegistration, Abortable};
use gloo::events::EventListener;
use magicpals_core::{AudioCache, GenerationError, PcmClip, Studio, Ticket, TicketGate};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsValue;
use web_sys::{AudioContext, AudioContextOptions};

/// Closes the context when playback ends or is abandoned, which also silences it.
struct OpenContext(AudioContext);

impl Drop for OpenContext {
    fn drop(&mut self) {
        if let Err(err) = self.0.close() {
            log::warn!("failed to close audio context: {:?}", err);
        }
    }
}

/// Plays `clip` through a fresh audio context, resolving once it has finished.
pub(crate) async fn play_pcm(clip: PcmClip) -> Result<(), JsValue> {
    if clip.is_empty() {
        return Ok(());
    }

    let options = AudioContextOptions::new();
    options.set_sample_rate(clip.sample_rate() as f32);
    let context = OpenContext(AudioContext::new_with_context_options(&options)?);

    let mut samples = clip.to_f32();
    let buffer = context
        .0
        .create_buffer(1, samples.len() as u32, clip.sample_rate() as f32)?;
    buffer.copy_to_channel(&mut samples, 0)?;

    let source = context.0.create_buffer_source()?;
    source.set_buffer(Some(&buffer));
    source.connect_with_audio_node(&context.0.destination())?;

    let (tx, rx) = oneshot::channel();
    let _ended = EventListener::once(&source, "ended", move |_| {
        let _ = tx.send(());
    });
    source.start()?;
    log::trace!("playing {:?} of speech", clip.duration());

    let _ = rx.await;
    Ok(())
}

/// Speaks text through the studio, remembering every clip it has synthesized.
#[derive(Clone, Debug, Default)]
pub(crate) struct Narrator {
    studio: GeminiClient,
    cache: Rc<RefCell<AudioCache>>,
    requests: Rc<RefCell<TicketGate>>,
    playing: Rc<RefCell<Option<AbortHandle>>>,
}

impl PartialEq for Narrator {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cache, &other.cache)
    }
}

impl Narrator {
    pub(crate) fn new(studio: GeminiClient) -> Self {
        Self {
            studio,
            ..Default::default()
        }
    }

    /// Synthesizes `text` unless cached, then plays it, cutting off whatever this narrator was saying.
    ///
    /// Resolves without playing when [`Narrator::stop`] or a newer `say` came first.
    pub(crate) async fn say(self, text: String) -> Result<(), GenerationError> {
        let ticket = self.requests.borrow_mut().issue();
        let cached = self.cache.borrow().lookup(&text);
        let clip = match cached {
            Some(clip) => clip,
            None => {
                let clip = self.studio.generate_speech(&text).await?;
                self.cache.borrow_mut().store(text, clip.clone());
                clip
            }
        };

        let Some(registration) = self.claim(ticket) else {
            log::debug!("narration stopped before playback");
            return Ok(());
        };

        match Abortable::new(play_pcm(clip), registration).await {
            Ok(played) => played.map_err(|err| {
                GenerationError::Request(format!("audio playback failed: {:?}", err))
            }),
            Err(_) => {
                log::debug!("narration abandoned");
                Ok(())
            }
        }
    }

    /// Hands playback to `ticket`, aborting the clip that was playing.
    fn claim(&self, ticket: Ticket) -> Option<AbortRegistration> {
        if !self.requests.borrow_mut().redeem(ticket) {
            return None;
        }
        let (handle, registration) = AbortHandle::new_pair();
        if let Some(previous) = self.playing.replace(Some(handle)) {
            previous.abort();
        }
        Some(registration)
    }

    /// Silences the current clip and drops any narration still being synthesized.
    pub(crate) fn stop(&self) {
        self.requests.borrow_mut().revoke();
        if let Some(handle) = self.playing.take() {
            handle.abort();
        }
    }
}
