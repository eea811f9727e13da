//! Book names, abbreviations and the fixed exception lists used when a
//! reference could be read either as a book abbreviation or a Roman numeral.

use std::collections::HashMap;

use lazy_static::lazy_static;

/// Canonical display names, in canonical order.
pub const BOOK_NAMES: [&str; 66] = [
    "Genesis", "Exodus", "Leviticus", "Numbers", "Deuteronomy", "Joshua", "Judges", "Ruth",
    "1 Samuel", "2 Samuel", "1 Kings", "2 Kings", "1 Chronicles", "2 Chronicles", "Ezra",
    "Nehemiah", "Esther", "Job", "Psalms", "Proverbs", "Ecclesiastes", "Song of Solomon",
    "Isaiah", "Jeremiah", "Lamentations", "Ezekiel", "Daniel", "Hosea", "Joel", "Amos",
    "Obadiah", "Jonah", "Micah", "Nahum", "Habakkuk", "Zephaniah", "Haggai", "Zechariah",
    "Malachi", "Matthew", "Mark", "Luke", "John", "Acts", "Romans", "1 Corinthians",
    "2 Corinthians", "Galatians", "Ephesians", "Philippians", "Colossians", "1 Thessalonians",
    "2 Thessalonians", "1 Timothy", "2 Timothy", "Titus", "Philemon", "Hebrews", "James",
    "1 Peter", "2 Peter", "1 John", "2 John", "3 John", "Jude", "Revelation",
];

/// First position of every book in the shipped corpus, plus the end sentinel.
pub const KJV_BOOK_BOUNDS: [usize; 67] = [
    0, 1533, 2746, 3605, 4893, 5852, 6510, 7128, 7213, 8023, 8718, 9534, 10253, 11195, 12017,
    12297, 12703, 12870, 13940, 16401, 17316, 17538, 17655, 18947, 20311, 20465, 21738, 22095,
    22292, 22365, 22511, 22532, 22580, 22685, 22732, 22788, 22841, 22879, 23090, 23145, 24216,
    24894, 26045, 26924, 27931, 28364, 28801, 29058, 29207, 29362, 29466, 29561, 29650, 29697,
    29810, 29893, 29939, 29964, 30267, 30375, 30480, 30541, 30646, 30659, 30673, 30698, 31102,
];

/// Books with a single chapter (zero-based): Obadiah, Philemon, 2 John, 3 John, Jude.
///
/// References into these never carry a chapter; a lone number is the verse.
pub const SINGLE_CHAPTER_BOOKS: [usize; 5] = [30, 56, 62, 63, 64];

/// Whole references that are book abbreviations even though they are also Roman digits.
pub const ROMAN_LETTER_BOOKS: [&str; 5] = ["i", "l", "c", "d", "m"];

/// Initials that begin a Roman numeral and stand for a book when glued to a chapter.
pub const EXPANDED_INITIALS: [(char, &str); 4] = [
    ('d', "deuteronomy"),
    ('c', "colossians"),
    ('l', "leviticus"),
    ('m', "micah"),
];

/// Book abbreviations that are also valid Roman numerals and must still be re-split.
pub const ADJACENCY_EXCEPTIONS: [&str; 1] = ["mi"];

/// Lowercase abbreviations accepted for each book, indexed by zero-based book.
const ABBREVIATIONS: [&[&str]; 66] = [
    &["genesis", "ge", "gen", "g", "gene", "ot"],
    &["exodus", "ex", "exo", "e", "exod"],
    &["leviticus", "le", "lev", "levi", "l", "levt", "levtics"],
    &["numbers", "nu", "num", "number", "n", "numb"],
    &["deuteronomy", "de", "deut", "deu", "d"],
    &["joshua", "jos", "josh", "j"],
    &["judges", "jdg", "ju", "jud", "judg", "judge"],
    &["ruth", "ru", "rut", "r"],
    &["1samuel", "1s", "1sa", "1sam", "1bk", "ibk", "isamuel", "isam"],
    &["2samuel", "2s", "2sa", "2sam", "2bk", "iibk", "iisamuel", "iis", "iisa", "iisam"],
    &[
        "1kings", "1k", "1ki", "1kin", "1king", "3bk", "ikings", "ik", "iki", "ikin", "iking",
        "iiibk", "iiikings",
    ],
    &[
        "2kings", "2k", "2ki", "2kin", "2king", "4bk", "iikings", "iik", "iiki", "iikin",
        "iiking", "ivbk", "iiiibk", "ivkings",
    ],
    &[
        "1chronicles", "1ch", "1chr", "1chronicle", "1c", "1chro", "1chron", "1chroni",
        "1chronic", "1cr", "ichro", "ichron", "ichroni", "ichronic", "icr", "ichronicles", "ich",
        "ichr", "ichronicle", "ic",
    ],
    &[
        "2chronicles", "2ch", "2chr", "2chronicle", "2c", "iichronicles", "iich", "iichr",
        "iichronicle", "iic",
    ],
    &["ezra", "ezr", "ez"],
    &["nehemiah", "ne", "neh", "nehe", "neem"],
    &["esther", "es", "est", "esth", "esthe", "esta"],
    &["job", "jb"],
    &["psalms", "psalm", "ps", "psa", "p"],
    &["proverbs", "pr", "pro", "prov", "proverb"],
    &["ecclesiastes", "ec", "ecc", "eccl", "ecclesiaste", "eccles"],
    &[
        "songofsolomon", "songofsongs", "so", "son", "song", "sos", "songs", "s", "ss", "ca",
        "canticles", "sng",
    ],
    &["isaiah", "isai", "esaias", "i", "is", "isa", "ish"],
    &["jeremiah", "je", "jer", "jeremy"],
    &["lamentations", "la", "lam", "lamentation", "lame"],
    &["ezekiel", "eze", "ezek", "ezk", "zek"],
    &["daniel", "da", "dan", "dani"],
    &["hosea", "ho", "hos", "h", "hose"],
    &["joel", "joe", "jol"],
    &["amos", "am", "amo", "a"],
    &["obadiah", "ob", "oba", "obad", "o"],
    &["jonah", "jon", "jona"],
    &["micah", "mi", "mic", "m", "mica"],
    &["nahum", "na", "nah", "nam"],
    &["habakkuk", "hab", "haba", "habak", "ha", "hb"],
    &["zephaniah", "zp", "zep", "zeph", "z", "ze"],
    &["haggai", "hag", "hagg", "hg", "haggi"],
    &["zechariah", "zc", "zec", "zech"],
    &["malachi", "mal", "mala", "malac", "ma"],
    &["matthew", "mt", "mat", "matt", "nt"],
    &["mark", "mr", "mk", "mar", "mrk"],
    &["luke", "lu", "lk", "luk"],
    &["john", "joh", "jn", "jno", "jo", "jhn", "jh"],
    &["acts", "ac", "act"],
    &["romans", "ro", "rom", "roman", "roma"],
    &["1corinthians", "1co", "1cor", "1corinthian", "icorinthians", "ico", "icor", "icorinthian"],
    &[
        "2corinthians", "2co", "2cor", "2corinthian", "iicorinthians", "iico", "iicor",
        "iicorinthian",
    ],
    &["galatians", "ga", "gal", "galatian", "gala"],
    &["ephesians", "ep", "eph", "ephesian", "ephe"],
    &["philippians", "php", "philip", "phil", "ph", "phili"],
    &["colossians", "co", "col", "colossian", "c"],
    &[
        "1thessalonians", "1th", "1the", "1thess", "1thessalonian", "1t", "1thes",
        "ithessalonians", "ith", "ithe", "ithess", "ithessalonian", "it", "ithes",
    ],
    &[
        "2thessalonians", "2th", "2the", "2thess", "2thessalonian", "2t", "2thes",
        "iithessalonians", "iith", "iithe", "iithess", "iithessalonian", "iit", "iithes",
    ],
    &["1timothy", "1ti", "1tim", "itimothy", "iti", "itim"],
    &["2timothy", "2ti", "2tim", "iitimothy", "iiti", "iitim"],
    &["titus", "ti", "tit", "t"],
    &["philemon", "phm", "phi", "phl", "phile", "philo"],
    &["hebrews", "he", "heb", "hebrew", "hebr"],
    &["james", "ja", "jas", "jam", "jame", "jim", "jamo"],
    &["1peter", "1p", "1pe", "1pet", "1pete", "ipeter", "ip", "ipe", "ipet", "ipete"],
    &["2peter", "2p", "2pe", "2pet", "2pete", "iipeter", "iip", "iipe", "iipet", "iipete"],
    &["1john", "1j", "1jo", "1joh", "1jn", "1jno", "ijohn", "ij", "ijo", "ijoh", "ijn", "ijno"],
    &["2john", "2j", "2jo", "2joh", "2jn", "2jno", "iijohn", "iij", "iijo", "iijoh", "iijn", "iijno"],
    &[
        "3john", "3j", "3jo", "3joh", "3jn", "3jno", "iiijohn", "iiij", "iiijo", "iiijoh", "iiijn",
        "iiijno",
    ],
    &["jude", "jd", "jde"],
    &[
        "revelation", "revelationofjohn", "re", "rev", "theapocalypseofjohn", "revelations",
        "reve", "apocalypse", "apocalypseofjohn",
    ],
];

lazy_static! {
    /// Abbreviation → 1-based book number.
    static ref BOOK_TABLE: HashMap<&'static str, usize> = {
        let mut m = HashMap::new();
        for (book, names) in ABBREVIATIONS.iter().enumerate() {
            for name in *names {
                m.insert(*name, book + 1);
            }
        }
        m
    };
}

/// Number of books in the canon.
pub const fn book_count() -> usize {
    BOOK_NAMES.len()
}

/// Look up a book name or abbreviation, returning the 1-based book number.
pub fn book_number(token: &str) -> Option<usize> {
    let lower = token.trim().to_lowercase();
    BOOK_TABLE.get(lower.as_str()).copied()
}

/// Look up a book name or abbreviation, returning the zero-based book index.
pub fn lookup_book(token: &str) -> Option<usize> {
    book_number(token).map(|n| n - 1)
}

/// Whether `token` is a recognised book name or abbreviation.
pub fn is_book(token: &str) -> bool {
    book_number(token).is_some()
}

/// Display name of a zero-based book.
pub fn book_name(book: usize) -> Option<&'static str> {
    BOOK_NAMES.get(book).copied()
}

/// The lookup key used when a reference needs a book name synthesised,
/// e.g. `"1samuel"` or `"songofsolomon"`.
pub fn book_key(book: usize) -> Option<&'static str> {
    ABBREVIATIONS.get(book).and_then(|names| names.first().copied())
}

/// Whether a zero-based book has only one chapter.
pub fn is_single_chapter(book: usize) -> bool {
    SINGLE_CHAPTER_BOOKS.contains(&book)
}

/// Book a single ambiguous initial expands to when glued to a Roman chapter.
pub fn expanded_initial(initial: char) -> Option<&'static str> {
    EXPANDED_INITIALS
        .iter()
        .find(|(c, _)| *c == initial)
        .map(|(_, name)| *name)
}
