//! Naming helpers: singular/plural forms and case conversion
//!
//! Inflection only looks at the last `_`-separated segment, so
//! `customer_orders` singularizes to `customer_order`.

const UNCOUNTABLE: &[&str] = &[
    "data",
    "equipment",
    "information",
    "metadata",
    "money",
    "news",
    "series",
    "species",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("bus", "buses"),
    ("campus", "campuses"),
    ("child", "children"),
    ("foot", "feet"),
    ("half", "halves"),
    ("knife", "knives"),
    ("leaf", "leaves"),
    ("life", "lives"),
    ("man", "men"),
    ("menu", "menus"),
    ("mouse", "mice"),
    ("person", "people"),
    ("quiz", "quizzes"),
    ("shelf", "shelves"),
    ("status", "statuses"),
    ("tooth", "teeth"),
    ("virus", "viruses"),
    ("whiz", "whizzes"),
    ("wife", "wives"),
    ("woman", "women"),
];

/// Nouns ending in `ie` whose plural would otherwise singularize to `-y`
const IE_NOUNS: &[&str] = &[
    "auntie", "brownie", "calorie", "cookie", "freebie", "genie", "goalie", "hippie", "hoodie",
    "movie", "newbie", "pixie", "prairie", "rookie", "selfie", "smoothie", "sortie", "zombie",
];

/// Split `customer_orders` into `("customer_", "orders")`
fn split_last_segment(input: &str) -> (&str, &str) {
    match input.rfind('_') {
        Some(pos) => input.split_at(pos + 1),
        None => ("", input),
    }
}

fn is_vowel(ch: char) -> bool {
    matches!(ch, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Plural form of a word, e.g. `category` -> `categories`
pub fn plural(input: &str) -> String {
    let (head, word) = split_last_segment(input);
    if word.is_empty() {
        return input.to_string();
    }
    format!("{}{}", head, plural_word(word))
}

fn plural_word(word: &str) -> String {
    let lower = word.to_ascii_lowercase();

    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
        return plural.to_string();
    }

    let before_last = lower.chars().rev().nth(1);
    if lower.ends_with('y') && before_last.map_or(false, |c| !is_vowel(c)) {
        format!("{}ies", &word[..word.len() - 1])
    } else if lower.ends_with('s')
        || lower.ends_with("sh")
        || lower.ends_with("ch")
        || lower.ends_with('x')
        || lower.ends_with('z')
    {
        format!("{}es", word)
    } else if lower.ends_with("fe") {
        format!("{}ves", &word[..word.len() - 2])
    } else {
        format!("{}s", word)
    }
}

/// Singular form of a word, e.g. `categories` -> `category`
pub fn singular(input: &str) -> String {
    let (head, word) = split_last_segment(input);
    if word.is_empty() {
        return input.to_string();
    }
    format!("{}{}", head, singular_word(word))
}

fn singular_word(word: &str) -> String {
    let lower = word.to_ascii_lowercase();

    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((singular, _)) = IRREGULAR.iter().find(|(_, plural)| *plural == lower) {
        return singular.to_string();
    }
    if IRREGULAR.iter().any(|(singular, _)| *singular == lower) {
        return word.to_string();
    }

    let len = word.len();
    if lower.ends_with("ies") && len > 3 {
        let stem = &word[..len - 3];
        // one-letter stems are `tie`, `pie`, `lie`, `die`
        if stem.len() == 1 || IE_NOUNS.contains(&&lower[..len - 1]) {
            format!("{}ie", stem)
        } else {
            format!("{}y", stem)
        }
    } else if lower.ends_with("sses")
        || lower.ends_with("shes")
        || lower.ends_with("ches")
        || lower.ends_with("xes")
        || lower.ends_with("zes")
    {
        word[..len - 2].to_string()
    } else if lower.ends_with('s')
        && !lower.ends_with("ss")
        && !lower.ends_with("us")
        && !lower.ends_with("is")
        && len > 1
    {
        word[..len - 1].to_string()
    } else {
        word.to_string()
    }
}

/// Convert `customer_orders` to `CustomerOrders`
pub fn to_pascal_case(input: &str) -> String {
    input
        .split(|c: char| c == '_' || c == '-' || c == ' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect()
}

/// Convert `CustomerOrder` to `customer_order`, `TCustomer` to `t_customer`
pub fn to_snake_case(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut result = String::new();

    for (i, &ch) in chars.iter().enumerate() {
        if ch == '_' || ch == '-' || ch == ' ' {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
        } else if ch.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1);
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.map_or(false, |n| n.is_lowercase()),
                _ => false,
            };
            if boundary && !result.ends_with('_') {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }

    result
}

/// Model class name for a (prefix-stripped) table name: `customer_orders` -> `CustomerOrder`
pub fn class_name(table: &str) -> String {
    to_pascal_case(&singular(table))
}
