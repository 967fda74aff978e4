// Rule-based syllable estimate for words no dictionary knows about.
//
// Counts vowel groups, then corrects with two pattern lists: endings and
// clusters that usually hide a syllable (silent final e, -ed after most
// consonants, "cial", "tion"...), and clusters that usually split into two
// ("ia", "io", consonant + "le"...). Good enough for slang and names.

use regex::Regex;
use std::sync::OnceLock;

const SUBTRACTIVE: &[&str] = &[
    "cial", "tia", "cius", "cious", "giu", "ion", "iou", "gious", "geous", "sia$",
    "[^aeiouy]e$", "[^aeiouydt]ed$", "[^aeiouy]es$", "[aeiou]ely$", "[^aeiouy]ely$",
];

const ADDITIVE: &[&str] = &[
    "ia", "riet", "dien", "iu", "io", "ii", "eo", "[aeiouym]bl$", "[aeiou]{3}", "^mc", "ism$",
    "[^aeiouy]le$", "[^aeiouy]les$", "[^l]lien", "^coa[dglx].", "[^gq]ua[^auieo]", "dnt$",
    "[^aeiouy]tes$", "[^aeiouy]ses$", "[^aeiouy]ces$", "[^aeiouy]ges$", "[^aeiouy]zes$",
];

struct EstimatorRules {
    vowel_groups: Regex,
    subtractive: Vec<Regex>,
    additive: Vec<Regex>,
}

fn rules() -> &'static EstimatorRules {
    static RULES: OnceLock<EstimatorRules> = OnceLock::new();
    RULES.get_or_init(|| {
        let compile = |patterns: &[&str]| {
            patterns
                .iter()
                .map(|p| Regex::new(p).expect("static estimator pattern"))
                .collect()
        };
        EstimatorRules {
            vowel_groups: Regex::new("[aeiouy]+").expect("static vowel pattern"),
            subtractive: compile(SUBTRACTIVE),
            additive: compile(ADDITIVE),
        }
    })
}

/// Estimate the syllables of a single word. Returns 0 only when the word has
/// no letters at all.
pub fn estimate_syllables(word: &str) -> u32 {
    let word: String = word
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphabetic())
        .collect();
    if word.is_empty() {
        return 0;
    }

    let rules = rules();
    let mut count = rules.vowel_groups.find_iter(&word).count() as i64;
    for re in &rules.subtractive {
        if re.is_match(&word) {
            count -= 1;
        }
    }
    for re in &rules.additive {
        if re.is_match(&word) {
            count += 1;
        }
    }
    count.max(1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_words() {
        assert_eq!(estimate_syllables("cat"), 1);
        assert_eq!(estimate_syllables("river"), 2);
        assert_eq!(estimate_syllables("banana"), 3);
    }

    #[test]
    fn test_silent_e_and_le() {
        assert_eq!(estimate_syllables("make"), 1);
        assert_eq!(estimate_syllables("table"), 2);
    }

    #[test]
    fn test_ed_ending() {
        assert_eq!(estimate_syllables("jumped"), 1);
        assert_eq!(estimate_syllables("wanted"), 2);
    }

    #[test]
    fn test_no_letters() {
        assert_eq!(estimate_syllables(""), 0);
        assert_eq!(estimate_syllables("123"), 0);
    }

    #[test]
    fn test_consonant_only_word_counts_one() {
        assert_eq!(estimate_syllables("hmm"), 1);
        assert_eq!(estimate_syllables("shh"), 1);
    }
}
