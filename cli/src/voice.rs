use dishlens_core::speech::UtteranceId;
use dishlens_core::{NarrationState, Narrator, SpeechEngine};

/// Prints utterances instead of speaking them. Every utterance finishes
/// as soon as it is printed.
#[derive(Debug, Default)]
pub struct TerminalVoice {
    last: Option<UtteranceId>,
}

impl SpeechEngine for TerminalVoice {
    fn speak(&mut self, id: UtteranceId, text: &str, locale: &str) {
        println!("[{}] {}", locale, text);
        self.last = Some(id);
    }

    fn pause(&mut self) {}

    fn resume(&mut self) {}

    fn cancel(&mut self) {
        self.last = None;
    }
}

/// Play `utterances` to the end.
pub fn narrate(narrator: &mut Narrator<TerminalVoice>, utterances: Vec<String>) {
    narrator.play(utterances);
    while let NarrationState::Speaking { .. } = narrator.state() {
        let Some(id) = narrator.engine_mut().last.take() else {
            break;
        };
        narrator.utterance_finished(id);
    }
}
