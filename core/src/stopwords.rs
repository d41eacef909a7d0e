use crate::language::Language;
use lazy_static::lazy_static;
use std::collections::HashSet;

const ENGLISH: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "from",
    "up", "about", "into", "through", "during", "before", "after", "above", "below", "between",
    "among", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does",
    "did", "will", "would", "could", "should", "may", "might", "must", "can", "i", "you", "he",
    "she", "it", "we", "they", "me", "him", "her", "us", "them", "my", "your", "his", "its", "our",
    "their", "this", "that", "these", "those", "textbf", "so", "than", "too", "very", "myself",
    "ourselves", "yours", "yourself", "yourselves", "himself", "herself", "itself", "themselves",
    "what", "which", "who", "whom", "am", "having", "doing", "ought", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "down", "out",
    "off", "over", "under", "again", "ours", "against", "as", "until", "while", "if", "because",
    "now", "since", "just", "even", "also", "still", "already", "yet", "never", "always",
    "sometimes", "often", "usually", "really", "actually", "quite", "rather", "pretty", "enough",
    "almost", "nearly", "little", "much", "many", "long", "short", "old", "new", "good", "bad",
    "big", "small", "high", "low", "right", "left", "first", "last", "next", "previous",
    "another", "every", "either", "neither", "one", "two", "three", "way", "back", "come", "came",
    "get", "got", "go", "went", "see", "saw", "know", "knew", "think", "thought", "say", "said",
    "take", "took", "give", "gave", "make", "made", "look", "looked", "use", "used", "find",
    "found", "want", "wanted", "work", "worked", "call", "called", "try", "tried",
];

const FRENCH: &[&str] = &[
    "le", "de", "et", "à", "un", "il", "être", "en", "avoir", "que", "pour", "dans", "ce", "son",
    "une", "sur", "avec", "ne", "se", "pas", "tout", "plus", "par", "grand", "la", "des", "les",
    "du", "est", "sont", "te", "si", "lui", "nous", "ou", "elle", "mais", "où", "donc", "très",
    "sans", "faire", "aller", "pouvoir", "voir", "dire", "me", "donner", "rien", "bien", "autre",
    "après", "long", "ici", "tous", "pendant", "matin", "trop", "je", "tu", "vous", "nos", "vos",
    "ses", "ces", "cette", "cet", "mon", "ton", "sa", "ma", "ta", "notre", "votre", "leur", "leurs",
];

const SPANISH: &[&str] = &[
    "el", "la", "de", "que", "y", "a", "en", "un", "ser", "se", "no", "te", "lo", "le", "da", "su",
    "por", "son", "con", "para", "al", "del", "los", "las", "una", "es", "está", "como", "me", "si",
    "sin", "sobre", "este", "ya", "entre", "cuando", "todo", "esta", "dos", "también", "fue",
    "había", "era", "muy", "años", "hasta", "desde", "estaba", "estamos", "pueden", "hubo", "hay",
    "han", "he", "has", "habían", "tener", "tiene", "tenía", "tengo", "pero", "qué", "porque", "o",
    "u", "yo", "tú", "él", "ella", "nosotros", "vosotros", "ellos", "ellas", "mi", "mis", "tu",
    "tus", "sus", "nuestro", "nuestra", "nuestros", "nuestras", "vuestro", "vuestra", "vuestros",
    "vuestras", "estos", "estas", "ese", "esa", "esos", "esas", "aquel", "aquella", "aquellos",
    "aquellas", "estar", "hacer", "poder", "decir", "ir", "ver", "dar", "saber", "querer",
    "llegar", "pasar", "deber", "poner", "parecer", "quedar", "creer", "hablar", "llevar", "dejar",
    "seguir", "encontrar", "llamar", "venir", "pensar", "salir", "volver", "tomar", "conocer",
    "vivir", "sentir", "tratar", "mirar", "contar", "empezar", "esperar", "buscar", "existir",
    "entrar", "trabajar", "escribir", "perder", "producir", "ocurrir",
];

lazy_static! {
    /// The built-in sets, built once and never mutated.
    pub static ref DEFAULT_STOP_WORDS: StopWordSets = StopWordSets::default();
}

/// Stop words per language. Built once at startup and shared by reference;
/// there is no way to mutate a set after construction.
#[derive(Debug, Clone)]
pub struct StopWordSets {
    english: HashSet<String>,
    french: HashSet<String>,
    spanish: HashSet<String>,
}

fn to_set<I, S>(words: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words.into_iter().map(|w| w.as_ref().to_lowercase()).collect()
}

impl StopWordSets {
    pub fn new<I, S>(english: I, french: I, spanish: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self { english: to_set(english), french: to_set(french), spanish: to_set(spanish) }
    }

    /// The set used for `language`; undetermined text falls back to English.
    pub fn for_language(&self, language: &Language) -> &HashSet<String> {
        match language {
            Language::French => &self.french,
            Language::Spanish => &self.spanish,
            Language::English | Language::Undetermined(_) => &self.english,
        }
    }

    pub fn is_stop_word(&self, language: &Language, word: &str) -> bool {
        let set = self.for_language(language);
        set.contains(word) || set.contains(&word.to_lowercase())
    }
}

impl Default for StopWordSets {
    fn default() -> Self {
        Self::new(ENGLISH.iter(), FRENCH.iter(), SPANISH.iter())
    }
}
