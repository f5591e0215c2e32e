//! Remote TTS fallback: fetches synthesized audio over HTTP and plays it
//! through a rodio sink on a worker thread. No completion callback exists
//! beyond the sink draining, so the worker polls it and posts the event.

use std::{
    io::Cursor,
    sync::{
        atomic::{
            AtomicBool,
            Ordering,
        },
        mpsc::Sender,
        Arc,
    },
    thread,
    time::Duration,
};

use rodio::{
    Decoder,
    OutputStream,
    OutputStreamHandle,
    Sink,
};

use super::{
    SpeakOptions,
    SpeechBackend,
    SpeechOutcome,
    UtteranceEvent,
};
use crate::core::TangochoError;

const TTS_URL: &str = "https://translate.google.com/translate_tts";

pub struct RemoteSpeech {
    // The stream must outlive its handle or playback goes silent.
    _stream: OutputStream,
    handle: OutputStreamHandle,
    client: reqwest::blocking::Client,
    tx: Sender<UtteranceEvent>,
    cancel: Option<Arc<AtomicBool>>,
    sink: Option<Arc<Sink>>,
}

impl RemoteSpeech {
    pub fn new(tx: Sender<UtteranceEvent>) -> Result<Self, TangochoError> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| TangochoError::Speech(format!("no audio output: {}", e)))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| TangochoError::Speech(format!("HTTP client build failed: {}", e)))?;

        Ok(Self { _stream: stream, handle, client, tx, cancel: None, sink: None })
    }

}

impl SpeechBackend for RemoteSpeech {
    fn speak(
        &mut self,
        id: u64,
        text: &str,
        options: &SpeakOptions,
    ) -> Result<(), TangochoError> {
        self.cancel();

        let cancel_flag = Arc::new(AtomicBool::new(false));
        self.cancel = Some(Arc::clone(&cancel_flag));

        let sink = Sink::try_new(&self.handle)
            .map_err(|e| TangochoError::Speech(format!("sink create failed: {}", e)))?;
        let sink = Arc::new(sink);
        self.sink = Some(Arc::clone(&sink));

        let lang: String = options
            .language_hint
            .split(['-', '_'])
            .next()
            .unwrap_or("en")
            .to_lowercase();
        let rate = options.rate.clamp(0.5, 2.0);
        let client = self.client.clone();
        let tx = self.tx.clone();
        let text = text.to_string();

        thread::spawn(move || {
            let response = client
                .get(TTS_URL)
                .query(&[("ie", "UTF-8"), ("client", "tw-ob"), ("tl", &lang), ("q", &text)])
                .send();

            let bytes = match response.and_then(|r| r.error_for_status()).and_then(|r| r.bytes())
            {
                Ok(bytes) => bytes,
                Err(e) => {
                    let _ = tx.send((id, SpeechOutcome::Failed(format!("TTS fetch: {}", e))));
                    return;
                }
            };

            if cancel_flag.load(Ordering::Relaxed) {
                return;
            }

            let decoder = match Decoder::new(Cursor::new(bytes.to_vec())) {
                Ok(decoder) => decoder,
                Err(e) => {
                    let _ = tx.send((id, SpeechOutcome::Failed(format!("TTS decode: {}", e))));
                    return;
                }
            };

            sink.set_speed(rate);
            sink.append(decoder);

            while !sink.empty() {
                if cancel_flag.load(Ordering::Relaxed) {
                    sink.stop();
                    return;
                }
                thread::sleep(Duration::from_millis(25));
            }

            let _ = tx.send((id, SpeechOutcome::Completed));
        });

        Ok(())
    }

    fn cancel(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        if let Some(cancel) = self.cancel.take() {
            cancel.store(true, Ordering::Relaxed);
        }
    }

    fn name(&self) -> &'static str {
        "remote TTS"
    }
}
