//! Intent rule tables for image-generation requests.
//!
//! Pure, ordered keyword matchers. The pattern lists cover the phrasings
//! users actually type, in Italian and English; matching is lower-cased
//! substring search, so "Please DRAW me a cat" triggers like "draw me a
//! cat" does.

/// Phrases that mark a message as an image-generation request.
const IMAGE_REQUEST_PATTERNS: &[&str] = &[
    // "crea" variants
    "crea un'immagine",
    "crea una foto",
    "crea immagine",
    "crea foto",
    "crea una immagine",
    "creami un'immagine",
    "creami una foto",
    "creami immagine",
    "creami foto",
    // "genera" variants
    "genera un'immagine",
    "genera una foto",
    "genera immagine",
    "genera foto",
    "genera una immagine",
    "generami un'immagine",
    "generami una foto",
    "generami immagine",
    "generami foto",
    // "fai/fare" variants
    "fai un'immagine",
    "fai una foto",
    "fai immagine",
    "fai foto",
    "fai una immagine",
    "fammi un'immagine",
    "fammi una foto",
    "fammi immagine",
    "fammi foto",
    "fare un'immagine",
    "fare una foto",
    // "disegna" variants
    "disegna",
    "disegnami",
    "fai un disegno",
    "fammi un disegno",
    // "voglio/mostra" variants
    "voglio un'immagine",
    "voglio una foto",
    "mostrami un'immagine",
    "mostrami una foto",
    // English
    "create an image",
    "create a picture",
    "create image",
    "generate an image",
    "generate a picture",
    "draw",
    "make a picture",
    "make an image",
    "make me an image",
    "make me a picture",
    "draw me",
];

/// Lead-in phrases stripped to extract the image subject. Ordered; the
/// first one found wins. Trailing spaces are part of the pattern.
const IMAGE_SUBJECT_LEAD_INS: &[&str] = &[
    "crea un'immagine di ",
    "crea una foto di ",
    "crea immagine di ",
    "crea foto di ",
    "genera un'immagine di ",
    "genera una foto di ",
    "genera immagine di ",
    "genera foto di ",
    "disegna ",
    "fai un disegno di ",
    "fai una foto di ",
    "fai un'immagine di ",
    "create an image of ",
    "create a picture of ",
    "generate an image of ",
    "generate a picture of ",
    "draw ",
    "make a picture of ",
    "make an image of ",
    "voglio un'immagine di ",
    "voglio una foto di ",
    "mostrami un'immagine di ",
];

/// Whether a message asks for a generated image.
pub fn wants_generated_image(text: &str) -> bool {
    let lowered = text.to_lowercase();
    IMAGE_REQUEST_PATTERNS
        .iter()
        .any(|pattern| lowered.contains(pattern))
}

/// Extract the subject of an image request by stripping the first
/// matching lead-in phrase. Falls back to the whole text.
pub fn image_subject(text: &str) -> String {
    let lowered = text.to_lowercase();
    for lead_in in IMAGE_SUBJECT_LEAD_INS {
        if let Some(start) = lowered.find(lead_in) {
            // Lowercasing can change byte lengths; only slice the original
            // when the offset still lands on a boundary
            if let Some(subject) = text.get(start + lead_in.len()..) {
                let subject = subject.trim();
                if !subject.is_empty() {
                    return subject.to_string();
                }
            }
        }
    }
    text.trim().to_string()
}
