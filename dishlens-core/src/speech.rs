//! Step-by-step narration of a recipe.
//!
//! A [`Narrator`] speaks one utterance at a time through a [`SpeechEngine`]
//! and moves on when the engine reports the utterance finished. Every
//! utterance is tagged with an [`UtteranceId`]; a finished callback for
//! anything but the utterance currently speaking is ignored, so a stop (or a
//! restart) can never be followed by a stale continuation.

use std::sync::LazyLock;

use regex::Regex;

use crate::locale::Language;

/// Identifies one `speak` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtteranceId(u64);

/// Platform text-to-speech, reduced to what narration needs.
pub trait SpeechEngine {
    fn speak(&mut self, id: UtteranceId, text: &str, locale: &str);
    fn pause(&mut self);
    fn resume(&mut self);
    fn cancel(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrationState {
    Idle,
    Speaking { step: usize },
    Paused { step: usize },
}

pub struct Narrator<E> {
    engine: E,
    language: Language,
    utterances: Vec<String>,
    state: NarrationState,
    next_id: u64,
    /// The utterance whose completion advances the narration.
    pending: Option<UtteranceId>,
    /// The current step ended while paused.
    held: bool,
}

impl<E: SpeechEngine> Narrator<E> {
    pub fn new(engine: E, language: Language) -> Self {
        Self {
            engine,
            language,
            utterances: Vec::new(),
            state: NarrationState::Idle,
            next_id: 0,
            pending: None,
            held: false,
        }
    }

    pub fn state(&self) -> NarrationState {
        self.state
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Text of the step being spoken or paused on.
    pub fn current_utterance(&self) -> Option<&str> {
        match self.state {
            NarrationState::Speaking { step } | NarrationState::Paused { step } => {
                self.utterances.get(step).map(String::as_str)
            }
            NarrationState::Idle => None,
        }
    }

    /// Replace whatever is playing and start from the first utterance.
    pub fn play(&mut self, utterances: Vec<String>) {
        self.stop();
        self.utterances = utterances;
        if self.utterances.is_empty() {
            return;
        }
        self.speak_step(0);
    }

    pub fn pause(&mut self) -> bool {
        match self.state {
            NarrationState::Speaking { step } => {
                self.engine.pause();
                self.state = NarrationState::Paused { step };
                true
            }
            _ => false,
        }
    }

    pub fn resume(&mut self) -> bool {
        match self.state {
            NarrationState::Paused { step } => {
                self.engine.resume();
                self.state = NarrationState::Speaking { step };
                if std::mem::take(&mut self.held) {
                    self.advance(step);
                }
                true
            }
            _ => false,
        }
    }

    /// Cancel speech and forget the queue.
    pub fn stop(&mut self) {
        if self.state != NarrationState::Idle {
            self.engine.cancel();
        }
        self.pending = None;
        self.held = false;
        self.utterances.clear();
        self.state = NarrationState::Idle;
    }

    /// Called by the engine when an utterance ends. Returns the new state.
    pub fn utterance_finished(&mut self, id: UtteranceId) -> NarrationState {
        if self.pending != Some(id) {
            tracing::debug!(?id, "ignoring finish of a superseded utterance");
            return self.state;
        }
        self.pending = None;

        match self.state {
            NarrationState::Speaking { step } => self.advance(step),
            // Some engines report the end of a paused utterance; hold the
            // position and move on when resumed.
            NarrationState::Paused { .. } => self.held = true,
            NarrationState::Idle => {}
        }
        self.state
    }

    fn advance(&mut self, step: usize) {
        if step + 1 < self.utterances.len() {
            self.speak_step(step + 1);
        } else {
            self.utterances.clear();
            self.state = NarrationState::Idle;
        }
    }

    fn speak_step(&mut self, step: usize) {
        self.next_id += 1;
        let id = UtteranceId(self.next_id);
        self.pending = Some(id);
        self.state = NarrationState::Speaking { step };
        self.engine
            .speak(id, &self.utterances[step], self.language.speech_locale());
    }
}

fn step_label(language: Language) -> &'static str {
    match language {
        Language::En => "Step",
        Language::Hi => "चरण",
        Language::Kn => "ಹಂತ",
    }
}

/// One utterance per recipe step, numbered from 1.
pub fn step_utterances(steps: &[String], language: Language) -> Vec<String> {
    let label = step_label(language);
    steps
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{} {}: {}", label, i + 1, step))
        .collect()
}

// A sentence ends at a run of terminators followed by whitespace or the end
// of the text, so "1.5 litres" stays in one piece.
static SENTENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)(?:.*?[.!?।]+(?:\s+|$)|.+)").expect("Invalid sentence regex")
});

/// Split narration text into sentence-sized utterances.
///
/// Long runs of text are hard on some engines, which cut off or skip
/// utterances past a few hundred characters.
pub fn speech_chunks(text: &str) -> Vec<String> {
    SENTENCE
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty() && !s.chars().all(|c| ".!?।".contains(c)))
        .map(str::to_string)
        .collect()
}
