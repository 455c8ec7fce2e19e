//! Supported languages and the user-facing message table.
//!
//! Every message this crate can surface to a user exists in all three
//! languages; callers pick the text with [`Message::text`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A UI language.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
    Kn,
}

impl Language {
    pub const ALL: &'static [Language] = &[Language::En, Language::Hi, Language::Kn];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Kn => "kn",
        }
    }

    /// Name of the language written in that language.
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Hi => "हिन्दी",
            Language::Kn => "ಕನ್ನಡ",
        }
    }

    /// English name, used when instructing a model which language to answer in.
    pub fn english_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Hi => "Hindi",
            Language::Kn => "Kannada",
        }
    }

    /// BCP 47 tag for the platform speech APIs.
    pub fn speech_locale(&self) -> &'static str {
        match self {
            Language::En => "en-US",
            Language::Hi => "hi-IN",
            Language::Kn => "kn-IN",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported language: {0}")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "english" => Ok(Language::En),
            "hi" | "hi-in" | "hindi" => Ok(Language::Hi),
            "kn" | "kn-in" | "kannada" => Ok(Language::Kn),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}

/// Every user-facing message the core can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Message {
    Unrecognized,
    LowConfidence,
    PartialFoodNameOnly,
    PartialBestEffort,
    Unprocessable,
    TransportFailed,
    ImageTooLarge,
    UnsupportedImageType,
    ImageTooSmall,
    ImageDimensionsTooLarge,
    ImageUnreadable,
    RecipeSearchFailed,
}

impl Message {
    pub fn text(self, language: Language) -> &'static str {
        use Language::*;
        use Message::*;

        match (self, language) {
            (Unrecognized, En) => "Could not recognize this food. Please try a clearer image or a different angle.",
            (Unrecognized, Hi) => "इस भोजन को पहचाना नहीं जा सका। कृपया एक स्पष्ट छवि या अलग कोण से प्रयास करें।",
            (Unrecognized, Kn) => "ಈ ಆಹಾರವನ್ನು ಗುರುತಿಸಲು ಸಾಧ್ಯವಾಗಲಿಲ್ಲ. ದಯವಿಟ್ಟು ಸ್ಪಷ್ಟವಾದ ಚಿತ್ರ ಅಥವಾ ಬೇರೆ ಕೋನದಿಂದ ಪ್ರಯತ್ನಿಸಿ.",

            (LowConfidence, En) => "Recognition confidence is too low. Please try a clearer image.",
            (LowConfidence, Hi) => "पहचान का विश्वास स्तर बहुत कम है। कृपया एक स्पष्ट छवि आज़माएँ।",
            (LowConfidence, Kn) => "ಗುರುತಿಸುವಿಕೆಯ ವಿಶ್ವಾಸ ತುಂಬಾ ಕಡಿಮೆ ಇದೆ. ದಯವಿಟ್ಟು ಸ್ಪಷ್ಟವಾದ ಚಿತ್ರವನ್ನು ಪ್ರಯತ್ನಿಸಿ.",

            (PartialFoodNameOnly, En) => "Partial result: Only food name detected.",
            (PartialFoodNameOnly, Hi) => "आंशिक परिणाम: केवल व्यंजन का नाम पहचाना गया।",
            (PartialFoodNameOnly, Kn) => "ಭಾಗಶಃ ಫಲಿತಾಂಶ: ಖಾದ್ಯದ ಹೆಸರು ಮಾತ್ರ ಪತ್ತೆಯಾಗಿದೆ.",

            (PartialBestEffort, En) => "Partial result: Could not fully parse the response, showing best effort.",
            (PartialBestEffort, Hi) => "आंशिक परिणाम: प्रतिक्रिया को पूरी तरह पढ़ा नहीं जा सका, उपलब्ध जानकारी दिखाई जा रही है।",
            (PartialBestEffort, Kn) => "ಭಾಗಶಃ ಫಲಿತಾಂಶ: ಪ್ರತಿಕ್ರಿಯೆಯನ್ನು ಸಂಪೂರ್ಣವಾಗಿ ಓದಲು ಸಾಧ್ಯವಾಗಲಿಲ್ಲ, ಲಭ್ಯವಿರುವ ಮಾಹಿತಿಯನ್ನು ತೋರಿಸಲಾಗುತ್ತಿದೆ.",

            (Unprocessable, En) => "Failed to process the recognition response. Please try again with a clearer image.",
            (Unprocessable, Hi) => "पहचान की प्रतिक्रिया संसाधित नहीं हो सकी। कृपया एक स्पष्ट छवि के साथ पुनः प्रयास करें।",
            (Unprocessable, Kn) => "ಗುರುತಿಸುವಿಕೆಯ ಪ್ರತಿಕ್ರಿಯೆಯನ್ನು ಸಂಸ್ಕರಿಸಲು ಸಾಧ್ಯವಾಗಲಿಲ್ಲ. ದಯವಿಟ್ಟು ಸ್ಪಷ್ಟವಾದ ಚಿತ್ರದೊಂದಿಗೆ ಮತ್ತೆ ಪ್ರಯತ್ನಿಸಿ.",

            (TransportFailed, En) => "Failed to recognize food. Please check your connection and try again.",
            (TransportFailed, Hi) => "भोजन की पहचान विफल रही। कृपया अपना कनेक्शन जाँचें और पुनः प्रयास करें।",
            (TransportFailed, Kn) => "ಆಹಾರ ಗುರುತಿಸುವಿಕೆ ವಿಫಲವಾಗಿದೆ. ದಯವಿಟ್ಟು ನಿಮ್ಮ ಸಂಪರ್ಕವನ್ನು ಪರಿಶೀಲಿಸಿ ಮತ್ತೆ ಪ್ರಯತ್ನಿಸಿ.",

            (ImageTooLarge, En) => "Image size should be less than 4MB.",
            (ImageTooLarge, Hi) => "छवि का आकार 4MB से कम होना चाहिए।",
            (ImageTooLarge, Kn) => "ಚಿತ್ರದ ಗಾತ್ರ 4MB ಗಿಂತ ಕಡಿಮೆ ಇರಬೇಕು.",

            (UnsupportedImageType, En) => "Only JPEG and PNG images are supported.",
            (UnsupportedImageType, Hi) => "केवल JPEG और PNG छवियाँ समर्थित हैं।",
            (UnsupportedImageType, Kn) => "JPEG ಮತ್ತು PNG ಚಿತ್ರಗಳನ್ನು ಮಾತ್ರ ಬೆಂಬಲಿಸಲಾಗುತ್ತದೆ.",

            (ImageTooSmall, En) => "Image dimensions are too small. Minimum size is 100x100 pixels.",
            (ImageTooSmall, Hi) => "छवि के आयाम बहुत छोटे हैं। न्यूनतम आकार 100x100 पिक्सेल है।",
            (ImageTooSmall, Kn) => "ಚಿತ್ರದ ಆಯಾಮಗಳು ತುಂಬಾ ಚಿಕ್ಕದಾಗಿವೆ. ಕನಿಷ್ಠ ಗಾತ್ರ 100x100 ಪಿಕ್ಸೆಲ್‌ಗಳು.",

            (ImageDimensionsTooLarge, En) => "Image dimensions are too large. Maximum size is 4096x4096 pixels.",
            (ImageDimensionsTooLarge, Hi) => "छवि के आयाम बहुत बड़े हैं। अधिकतम आकार 4096x4096 पिक्सेल है।",
            (ImageDimensionsTooLarge, Kn) => "ಚಿತ್ರದ ಆಯಾಮಗಳು ತುಂಬಾ ದೊಡ್ಡದಾಗಿವೆ. ಗರಿಷ್ಠ ಗಾತ್ರ 4096x4096 ಪಿಕ್ಸೆಲ್‌ಗಳು.",

            (ImageUnreadable, En) => "Failed to load image. The file might be corrupted or in an unsupported format.",
            (ImageUnreadable, Hi) => "छवि लोड नहीं हो सकी। फ़ाइल दूषित हो सकती है या असमर्थित प्रारूप में हो सकती है।",
            (ImageUnreadable, Kn) => "ಚಿತ್ರವನ್ನು ಲೋಡ್ ಮಾಡಲು ಸಾಧ್ಯವಾಗಲಿಲ್ಲ. ಫೈಲ್ ಹಾನಿಗೊಳಗಾಗಿರಬಹುದು ಅಥವಾ ಬೆಂಬಲಿಸದ ಸ್ವರೂಪದಲ್ಲಿರಬಹುದು.",

            (RecipeSearchFailed, En) => "Failed to fetch recipe. Please try again.",
            (RecipeSearchFailed, Hi) => "रेसिपी प्राप्त नहीं हो सकी। कृपया पुनः प्रयास करें।",
            (RecipeSearchFailed, Kn) => "ಪಾಕವಿಧಾನವನ್ನು ಪಡೆಯಲು ಸಾಧ್ಯವಾಗಲಿಲ್ಲ. ದಯವಿಟ್ಟು ಮತ್ತೆ ಪ್ರಯತ್ನಿಸಿ.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_MESSAGES: &[Message] = &[
        Message::Unrecognized,
        Message::LowConfidence,
        Message::PartialFoodNameOnly,
        Message::PartialBestEffort,
        Message::Unprocessable,
        Message::TransportFailed,
        Message::ImageTooLarge,
        Message::UnsupportedImageType,
        Message::ImageTooSmall,
        Message::ImageDimensionsTooLarge,
        Message::ImageUnreadable,
        Message::RecipeSearchFailed,
    ];

    #[test]
    fn test_every_message_translated() {
        for message in ALL_MESSAGES {
            let english = message.text(Language::En);
            for language in Language::ALL {
                let text = message.text(*language);
                assert!(!text.is_empty(), "{:?} empty for {}", message, language);
                if *language != Language::En {
                    assert_ne!(text, english, "{:?} untranslated for {}", message, language);
                }
            }
        }
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("hi".parse::<Language>().unwrap(), Language::Hi);
        assert_eq!("KN-IN".parse::<Language>().unwrap(), Language::Kn);
        assert_eq!(" english ".parse::<Language>().unwrap(), Language::En);
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_language_serde_codes() {
        assert_eq!(serde_json::to_string(&Language::Kn).unwrap(), "\"kn\"");
        let parsed: Language = serde_json::from_str("\"hi\"").unwrap();
        assert_eq!(parsed, Language::Hi);
    }
}
