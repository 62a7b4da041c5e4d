//! Extraction rules - ordered, bounded candidate matchers
//!
//! Each matcher is an independent pure function over the raw message
//! text returning a bounded candidate list. The per-category caps
//! (3 people, 2 emotions, 2 activities) and the fixed vocabulary and
//! template orders are behavioral, not incidental: downstream consumers
//! rely on them, so do not "tidy" them.
//!
//! Matching is ASCII case-insensitive where insensitivity applies. The
//! extractor is best-effort and lossy by design; it trades recall for
//! determinism.

/// Single-token capitalized words that are sentence furniture, not names
const PERSON_STOPWORDS: &[&str] = &["I", "My", "The", "This", "That"];

/// Emotion vocabulary, in the order matches are reported
pub const EMOTION_VOCABULARY: &[&str] = &[
    "happy",
    "sad",
    "angry",
    "excited",
    "anxious",
    "calm",
    "frustrated",
    "grateful",
    "worried",
    "content",
];

/// Activity templates, applied in this order; each matches
/// "<template> <token>" where the token is one alphanumeric word
pub const ACTIVITY_TEMPLATES: &[&str] = &["went to", "had", "did", "played", "watched"];

const MAX_PERSONS: usize = 3;
const MAX_EMOTIONS: usize = 2;
const MAX_ACTIVITIES: usize = 2;

/// One whitespace-separated token with its punctuation context
struct Token<'a> {
    /// Token with surrounding punctuation stripped
    core: &'a str,
    /// No leading punctuation was stripped (run can continue into this)
    clean_lead: bool,
    /// No trailing punctuation was stripped (run can continue past this)
    clean_trail: bool,
}

impl Token<'_> {
    /// Capital letter followed by only lowercase letters ("Sarah", "I")
    fn is_capitalized_word(&self) -> bool {
        let mut chars = self.core.chars();
        match chars.next() {
            Some(first) if first.is_ascii_uppercase() => {
                chars.all(|c| c.is_ascii_lowercase())
            }
            _ => false,
        }
    }
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    text.split_whitespace()
        .map(|raw| {
            let core = raw.trim_matches(|c: char| !c.is_ascii_alphanumeric());
            Token {
                core,
                clean_lead: raw.starts_with(core) || core.is_empty(),
                clean_trail: raw.ends_with(core) || core.is_empty(),
            }
        })
        .collect()
}

/// Person candidates: maximal runs of 1-3 consecutive capitalized
/// word-tokens, in order of appearance.
///
/// A run only spans tokens joined by plain whitespace; punctuation on
/// either side of the gap breaks it. Single-token runs that are common
/// sentence starters ("I", "My", ...) are discarded. At most the first
/// 3 surviving candidates are kept.
pub fn person_candidates(text: &str) -> Vec<String> {
    let tokens = tokenize(text);
    let mut candidates = Vec::new();
    let mut i = 0;

    while i < tokens.len() && candidates.len() < MAX_PERSONS {
        if !tokens[i].is_capitalized_word() {
            i += 1;
            continue;
        }

        let mut run = vec![tokens[i].core];
        let mut j = i;
        while run.len() < 3
            && tokens[j].clean_trail
            && j + 1 < tokens.len()
            && tokens[j + 1].clean_lead
            && tokens[j + 1].is_capitalized_word()
        {
            j += 1;
            run.push(tokens[j].core);
        }

        let keep = run.len() > 1 || !PERSON_STOPWORDS.contains(&run[0]);
        if keep {
            candidates.push(run.join(" "));
        }
        i = j + 1;
    }

    candidates
}

/// Emotion candidates: case-insensitive substring match against the
/// fixed vocabulary, reported in vocabulary order (not appearance
/// order), at most 2.
pub fn emotion_candidates(text: &str) -> Vec<String> {
    let lowered = text.to_ascii_lowercase();
    EMOTION_VOCABULARY
        .iter()
        .filter(|word| lowered.contains(*word))
        .take(MAX_EMOTIONS)
        .map(|word| word.to_string())
        .collect()
}

/// Activity candidates: case-insensitive match against the fixed
/// templates in template order, at most 2 overall. Each candidate is
/// the matched phrase as it appears in the original text ("had lunch").
pub fn activity_candidates(text: &str) -> Vec<String> {
    // ASCII lowering preserves byte offsets, so matches found in the
    // lowered copy slice cleanly out of the original text.
    let lowered = text.to_ascii_lowercase();
    let bytes = lowered.as_bytes();
    let mut candidates = Vec::new();

    for template in ACTIVITY_TEMPLATES {
        let mut search_from = 0;
        while candidates.len() < MAX_ACTIVITIES {
            let Some(found) = lowered[search_from..].find(template) else {
                break;
            };
            let start = search_from + found;
            let template_end = start + template.len();
            search_from = start + 1;

            // Word boundary before the template verb
            if start > 0 && bytes[start - 1].is_ascii_alphanumeric() {
                continue;
            }
            // At least one whitespace, then one alphanumeric token
            let mut idx = template_end;
            while idx < bytes.len() && bytes[idx].is_ascii_whitespace() {
                idx += 1;
            }
            if idx == template_end || idx >= bytes.len() {
                continue;
            }
            let token_start = idx;
            while idx < bytes.len() && bytes[idx].is_ascii_alphanumeric() {
                idx += 1;
            }
            if idx == token_start {
                continue;
            }

            candidates.push(text[start..idx].to_string());
            search_from = idx;
        }
        if candidates.len() >= MAX_ACTIVITIES {
            break;
        }
    }

    candidates
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_basic() {
        let people = person_candidates("I had lunch with Sarah and felt happy");
        assert_eq!(people, vec!["Sarah".to_string()]);
    }

    #[test]
    fn test_person_multiword_run() {
        let people = person_candidates("Met Sarah Jones at the park");
        assert_eq!(people, vec!["Met Sarah Jones".to_string()]);
    }

    #[test]
    fn test_person_run_capped_at_three() {
        let people = person_candidates("Anna Bella Clara Dora came over");
        assert_eq!(
            people,
            vec!["Anna Bella Clara".to_string(), "Dora".to_string()]
        );
    }

    #[test]
    fn test_person_punctuation_breaks_run() {
        let people = person_candidates("Sarah, Maya and Tom");
        assert_eq!(
            people,
            vec!["Sarah".to_string(), "Maya".to_string(), "Tom".to_string()]
        );
    }

    #[test]
    fn test_person_stopwords_discarded() {
        assert!(person_candidates("I think").is_empty());
        assert!(person_candidates("My dog ran. The end. This works. That too.").is_empty());
    }

    #[test]
    fn test_person_cap_at_three_candidates() {
        let people = person_candidates("Al, Bo, Cy, Di, and Ed were there");
        assert_eq!(
            people,
            vec!["Al".to_string(), "Bo".to_string(), "Cy".to_string()]
        );
    }

    #[test]
    fn test_person_all_caps_not_a_name() {
        assert!(person_candidates("WOW that was LOUD").is_empty());
    }

    #[test]
    fn test_emotion_vocabulary_order() {
        // "worried" appears first in the text but "anxious" comes first
        // in the vocabulary.
        let emotions = emotion_candidates("worried and anxious all week");
        assert_eq!(emotions, vec!["anxious".to_string(), "worried".to_string()]);
    }

    #[test]
    fn test_emotion_cap_at_two() {
        let emotions = emotion_candidates("happy, sad, and angry at once");
        assert_eq!(emotions, vec!["happy".to_string(), "sad".to_string()]);
    }

    #[test]
    fn test_emotion_case_insensitive_substring() {
        let emotions = emotion_candidates("Feeling HAPPY today");
        assert_eq!(emotions, vec!["happy".to_string()]);
    }

    #[test]
    fn test_emotion_none() {
        assert!(emotion_candidates("nothing of note").is_empty());
    }

    #[test]
    fn test_activity_basic_template() {
        let activities = activity_candidates("I had lunch with Sarah");
        assert_eq!(activities, vec!["had lunch".to_string()]);
    }

    #[test]
    fn test_activity_template_order_beats_appearance() {
        // "watched" appears before "went to" in the text, but template
        // order reports "went to" first.
        let activities = activity_candidates("We watched movies then went to bed");
        assert_eq!(
            activities,
            vec!["went to bed".to_string(), "watched movies".to_string()]
        );
    }

    #[test]
    fn test_activity_cap_at_two_overall() {
        let activities = activity_candidates("went to work, had lunch, played chess");
        assert_eq!(
            activities,
            vec!["went to work".to_string(), "had lunch".to_string()]
        );
    }

    #[test]
    fn test_activity_word_boundary() {
        // "had" inside "shadow" is not a template hit.
        assert!(activity_candidates("the shadow grew").is_empty());
    }

    #[test]
    fn test_activity_preserves_original_case() {
        let activities = activity_candidates("We Played Chess");
        assert_eq!(activities, vec!["Played Chess".to_string()]);
    }

    #[test]
    fn test_activity_requires_following_token() {
        assert!(activity_candidates("guess what I did").is_empty());
    }

    #[test]
    fn test_empty_and_whitespace_messages() {
        assert!(person_candidates("").is_empty());
        assert!(emotion_candidates("   ").is_empty());
        assert!(activity_candidates("\n\t").is_empty());
    }
}
