//! Porter's suffix-stripping stemmer
//!
//! The algorithm from M.F. Porter, "An algorithm for suffix stripping",
//! Program 14(3), 1980, with the extensions NLTK applies by default: a table
//! of irregular forms, `ies`/`ied` on four-letter words, `y -> i` only after a
//! consonant, `bli -> ble`, `fulli -> ful` and `logi -> log` in step 2.
//! Input is expected in lowercase; other words of two characters or fewer are
//! returned unchanged.

// Suffix rules are tried in order and the first suffix present decides.
const STEP2: &[(&str, &str)] = &[
    ("ational", "ate"),
    ("tional", "tion"),
    ("enci", "ence"),
    ("anci", "ance"),
    ("izer", "ize"),
    ("bli", "ble"),
    ("alli", "al"),
    ("entli", "ent"),
    ("eli", "e"),
    ("ousli", "ous"),
    ("ization", "ize"),
    ("ation", "ate"),
    ("ator", "ate"),
    ("alism", "al"),
    ("iveness", "ive"),
    ("fulness", "ful"),
    ("ousness", "ous"),
    ("aliti", "al"),
    ("iviti", "ive"),
    ("biliti", "ble"),
    ("fulli", "ful"),
    ("logi", "log"),
];

const STEP3: &[(&str, &str)] = &[
    ("icate", "ic"),
    ("ative", ""),
    ("alize", "al"),
    ("iciti", "ic"),
    ("ical", "ic"),
    ("ful", ""),
    ("ness", ""),
];

const STEP4: &[&str] = &[
    "al", "ance", "ence", "er", "ic", "able", "ible", "ant", "ement", "ment", "ent", "ion", "ou",
    "ism", "ate", "iti", "ous", "ive", "ize",
];

/// Words the suffix rules get wrong, mapped to their stem.
fn irregular_stem(word: &str) -> Option<&'static str> {
    let stem = match word {
        "sky" | "skies" => "sky",
        "dying" => "die",
        "lying" => "lie",
        "tying" => "tie",
        "news" => "news",
        "inning" | "innings" => "inning",
        "outing" | "outings" => "outing",
        "canning" | "cannings" => "canning",
        "howe" => "howe",
        "proceed" => "proceed",
        "exceed" => "exceed",
        "succeed" => "succeed",
        _ => return None,
    };
    Some(stem)
}

/// Stateless Porter stemmer; safe to share between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct PorterStemmer;

impl PorterStemmer {
    pub fn new() -> Self {
        Self
    }

    pub fn stem(&self, word: &str) -> String {
        if let Some(stem) = irregular_stem(word) {
            return stem.to_string();
        }
        let letters: Vec<char> = word.chars().collect();
        if letters.len() <= 2 {
            return word.to_string();
        }
        let mut w = Word { b: letters };
        w.step1a();
        w.step1b();
        w.step1c();
        w.step2();
        w.step3();
        w.step4();
        w.step5();
        w.b.into_iter().collect()
    }
}

struct Word {
    b: Vec<char>,
}

impl Word {
    fn is_consonant(&self, i: usize) -> bool {
        match self.b[i] {
            'a' | 'e' | 'i' | 'o' | 'u' => false,
            'y' => i == 0 || !self.is_consonant(i - 1),
            _ => true,
        }
    }

    /// Number of vowel-consonant sequences in the first `len` letters.
    fn measure(&self, len: usize) -> usize {
        let mut n = 0;
        let mut i = 0;
        while i < len && self.is_consonant(i) {
            i += 1;
        }
        while i < len {
            while i < len && !self.is_consonant(i) {
                i += 1;
            }
            if i >= len {
                break;
            }
            while i < len && self.is_consonant(i) {
                i += 1;
            }
            n += 1;
        }
        n
    }

    fn has_vowel(&self, len: usize) -> bool {
        (0..len).any(|i| !self.is_consonant(i))
    }

    fn ends_double_consonant(&self, len: usize) -> bool {
        len >= 2 && self.b[len - 1] == self.b[len - 2] && self.is_consonant(len - 1)
    }

    /// consonant-vowel-consonant where the final consonant is not w, x or y,
    /// or a two-letter vowel-consonant stem
    fn ends_cvc(&self, len: usize) -> bool {
        if len == 2 {
            return !self.is_consonant(0) && self.is_consonant(1);
        }
        len >= 3
            && self.is_consonant(len - 3)
            && !self.is_consonant(len - 2)
            && self.is_consonant(len - 1)
            && !matches!(self.b[len - 1], 'w' | 'x' | 'y')
    }

    fn ends_with(&self, suffix: &str) -> bool {
        let n = suffix.chars().count();
        n <= self.b.len() && self.b[self.b.len() - n..].iter().copied().eq(suffix.chars())
    }

    fn stem_len(&self, suffix: &str) -> usize {
        self.b.len() - suffix.chars().count()
    }

    fn replace_suffix(&mut self, suffix: &str, replacement: &str) {
        let keep = self.stem_len(suffix);
        self.b.truncate(keep);
        self.b.extend(replacement.chars());
    }

    fn first_match<'r>(&self, rules: &'r [(&'r str, &'r str)]) -> Option<(&'r str, &'r str)> {
        rules.iter().copied().find(|(suffix, _)| self.ends_with(suffix))
    }

    fn step1a(&mut self) {
        if self.b.len() == 4 && self.ends_with("ies") {
            self.replace_suffix("ies", "ie");
        } else if self.ends_with("sses") {
            self.replace_suffix("sses", "ss");
        } else if self.ends_with("ies") {
            self.replace_suffix("ies", "i");
        } else if !self.ends_with("ss") && self.ends_with("s") {
            self.b.pop();
        }
    }

    fn step1b(&mut self) {
        if self.ends_with("ied") {
            let replacement = if self.b.len() == 4 { "ie" } else { "i" };
            self.replace_suffix("ied", replacement);
            return;
        }
        if self.ends_with("eed") {
            if self.measure(self.stem_len("eed")) > 0 {
                self.b.pop();
            }
            return;
        }

        let removed = ["ed", "ing"]
            .into_iter()
            .find(|suffix| self.ends_with(suffix) && self.has_vowel(self.stem_len(suffix)));
        let Some(suffix) = removed else {
            return;
        };
        self.replace_suffix(suffix, "");

        let len = self.b.len();
        if self.ends_with("at") || self.ends_with("bl") || self.ends_with("iz") {
            self.b.push('e');
        } else if self.ends_double_consonant(len) {
            if !matches!(self.b[len - 1], 'l' | 's' | 'z') {
                self.b.pop();
            }
        } else if self.measure(len) == 1 && self.ends_cvc(len) {
            self.b.push('e');
        }
    }

    fn step1c(&mut self) {
        let last = self.b.len() - 1;
        if self.b[last] == 'y' && last > 1 && self.is_consonant(last - 1) {
            self.b[last] = 'i';
        }
    }

    fn step2(&mut self) {
        // `alli` is resolved first and the result goes through step 2 again
        if self.ends_with("alli") && self.measure(self.stem_len("alli")) > 0 {
            self.replace_suffix("alli", "al");
            self.step2();
            return;
        }
        let Some((suffix, replacement)) = self.first_match(STEP2) else {
            return;
        };
        // the measure for `logi` includes its `l`
        let stem = if suffix == "logi" {
            self.stem_len("ogi")
        } else {
            self.stem_len(suffix)
        };
        if self.measure(stem) > 0 {
            self.replace_suffix(suffix, replacement);
        }
    }

    fn step3(&mut self) {
        if let Some((suffix, replacement)) = self.first_match(STEP3) {
            if self.measure(self.stem_len(suffix)) > 0 {
                self.replace_suffix(suffix, replacement);
            }
        }
    }

    fn step4(&mut self) {
        let Some(suffix) = STEP4.iter().copied().find(|suffix| self.ends_with(suffix)) else {
            return;
        };
        let stem = self.stem_len(suffix);
        if self.measure(stem) <= 1 {
            return;
        }
        if suffix == "ion" && !(stem > 0 && matches!(self.b[stem - 1], 's' | 't')) {
            return;
        }
        self.b.truncate(stem);
    }

    fn step5(&mut self) {
        if self.ends_with("e") {
            let stem = self.b.len() - 1;
            let m = self.measure(stem);
            if m > 1 || (m == 1 && !self.ends_cvc(stem)) {
                self.b.pop();
            }
        }

        let len = self.b.len();
        if self.b[len - 1] == 'l' && self.ends_double_consonant(len) && self.measure(len - 1) > 1 {
            self.b.pop();
        }
    }
}
