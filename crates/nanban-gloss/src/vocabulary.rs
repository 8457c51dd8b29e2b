//! Built-in phrase vocabulary seeded into every default translator.

/// Seed mappings in dictionary enumeration order.
///
/// The order is significant: the substring scan returns the first phrase
/// contained in the input, so earlier short phrases shadow later ones.
pub const SEED_VOCABULARY: &[(&str, &[&str])] = &[
    ("hello", &["HELLO"]),
    ("hi", &["HELLO"]),
    ("goodbye", &["GOODBYE"]),
    ("bye", &["GOODBYE"]),
    ("thank you", &["THANK-YOU"]),
    ("thanks", &["THANK-YOU"]),
    ("please", &["PLEASE"]),
    ("help", &["HELP"]),
    ("yes", &["YES"]),
    ("no", &["NO"]),
    ("good", &["GOOD"]),
    ("bad", &["BAD"]),
    ("how are you", &["HOW", "YOU"]),
    ("what is your name", &["WHAT", "YOUR", "NAME"]),
    ("my name is", &["MY", "NAME"]),
    ("i need help", &["I", "NEED", "HELP"]),
    ("excuse me", &["EXCUSE-ME"]),
    ("sorry", &["SORRY"]),
    ("welcome", &["WELCOME"]),
    ("nice to meet you", &["NICE", "MEET", "YOU"]),
    ("see you later", &["SEE-YOU-LATER"]),
    ("have a good day", &["HAVE", "GOOD", "DAY"]),
    ("i love you", &["I", "LOVE", "YOU"]),
    ("family", &["FAMILY"]),
    ("friend", &["FRIEND"]),
    ("work", &["WORK"]),
    ("home", &["HOME"]),
    ("school", &["SCHOOL"]),
    ("happy", &["HAPPY"]),
    ("sad", &["SAD"]),
    ("tired", &["TIRED"]),
    ("hungry", &["HUNGRY"]),
    ("thirsty", &["THIRSTY"]),
    ("eat", &["EAT"]),
    ("drink", &["DRINK"]),
    ("sleep", &["SLEEP"]),
    ("today", &["TODAY"]),
    ("yesterday", &["YESTERDAY"]),
    ("tomorrow", &["TOMORROW"]),
    ("morning", &["MORNING"]),
    ("afternoon", &["AFTERNOON"]),
    ("evening", &["EVENING"]),
    ("night", &["NIGHT"]),
];
