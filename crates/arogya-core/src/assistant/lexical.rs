//! Token preprocessing: lowercase, split, drop stopwords and punctuation, lemmatize.

/// English stopword list (NLTK corpus).
const STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

/// Irregular noun forms the suffix rules would get wrong.
const IRREGULAR: &[(&str, &str)] = &[
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("children", "child"),
    ("women", "woman"),
    ("men", "man"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("leaves", "leaf"),
    ("knives", "knife"),
    ("lives", "life"),
    ("wives", "wife"),
    ("halves", "half"),
    ("diagnoses", "diagnosis"),
    ("analyses", "analysis"),
];

/// Words ending in `s` that are already singular.
const KEEP_AS_IS: &[&str] = &[
    "diabetes", "arthritis", "gas", "stress", "series", "species", "news", "measles", "mumps",
    "herpes", "rabies", "psoriasis", "sinusitis", "bronchitis", "gastritis", "dermatitis",
];

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

fn is_punctuation(token: &str) -> bool {
    token.chars().all(|c| c.is_ascii_punctuation())
}

/// Noun lemma of a lowercase token.
pub fn lemmatize(token: &str) -> String {
    if let Some((_, lemma)) = IRREGULAR.iter().find(|(form, _)| *form == token) {
        return lemma.to_string();
    }
    if KEEP_AS_IS.contains(&token) || token.chars().count() <= 3 {
        return token.to_string();
    }
    if let Some(stem) = token.strip_suffix("ies") {
        return format!("{}y", stem);
    }
    // ache, headache, backache
    if token.ends_with("aches") {
        return token[..token.len() - 1].to_string();
    }
    for suffix in ["sses", "ches", "shes", "xes"] {
        if token.ends_with(suffix) {
            return token[..token.len() - 2].to_string();
        }
    }
    if token.ends_with('s') && !token.ends_with("ss") && !token.ends_with("us") && !token.ends_with("is")
    {
        return token[..token.len() - 1].to_string();
    }
    token.to_string()
}

/// Splits lowercase text into word tokens; punctuation separates tokens and apostrophes stay
/// inside words (`don't`).
///
/// Contractions are kept whole. Treebank-style tokenizers split them (`can't` becomes `ca` +
/// `n't`); the dosha keywords never contain an apostrophe, so matching is unaffected.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '-'))
        .map(|t| t.trim_matches(|c: char| c == '\'' || c == '-'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Lemmatized lowercase tokens with stopwords and punctuation removed, in input order.
pub fn preprocess_text(text: &str) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| !is_punctuation(t) && !is_stopword(t))
        .map(|t| lemmatize(&t))
        .collect()
}
