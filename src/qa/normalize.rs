//! Text Normalization
//!
//! Reduces a free-text message to a lowercase, space-joined sequence of
//! base-form tokens so that simple morphological variants land on the same
//! stem ("irrigating", "irrigation" → "irrigat"). Keywords are passed
//! through the same pipeline at corpus load, so matching is a plain
//! substring check on both sides.

/// Normalize a whole message: lowercase, split on non-alphanumerics,
/// reduce each token, rejoin with single spaces.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(base_form)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Ordered suffix rules: (suffix, replacement, minimum remaining stem).
///
/// The stem-length floors keep short words intact ("spring" is not a
/// progressive form, "seed" is not a past tense).
const SUFFIX_RULES: &[(&str, &str, usize)] = &[
    ("ization", "ize", 3),
    ("isation", "ise", 3),
    ("ation", "ate", 3),
    ("izer", "ize", 3),
    ("iser", "ise", 3),
    ("ing", "", 4),
    ("ies", "y", 2),
    ("ed", "", 4),
];

/// Reduce a single lowercase token to its base form.
pub fn base_form(token: &str) -> String {
    if token.len() <= 3 {
        return token.to_string();
    }
    let mut stem = reduce_suffix(token);
    // Collapse a trailing "e" so noun and verb derivations share a stem
    // ("irrigate"/"irrigation" → "irrigat").
    if stem.len() > 4 && stem.ends_with('e') {
        stem.truncate(stem.len() - 1);
    }
    stem
}

fn reduce_suffix(token: &str) -> String {
    for (suffix, replacement, min_stem) in SUFFIX_RULES {
        if let Some(stem) = token.strip_suffix(suffix) {
            if stem.len() >= *min_stem {
                return format!("{}{}", stem, replacement);
            }
        }
    }

    // Plural endings: "-es" after a sibilant, otherwise a bare "-s" that is
    // not itself part of the word ("grass", "status", "basis").
    if let Some(stem) = token.strip_suffix("es") {
        let sibilant = stem.ends_with('s')
            || stem.ends_with('x')
            || stem.ends_with('z')
            || stem.ends_with("ch")
            || stem.ends_with("sh");
        if stem.len() >= 3 && sibilant {
            return stem.to_string();
        }
    }
    if let Some(stem) = token.strip_suffix('s') {
        if stem.len() >= 3 && !stem.ends_with('s') && !stem.ends_with('u') && !stem.ends_with('i') {
            return stem.to_string();
        }
    }

    token.to_string()
}
