//! Transliteration variants of given names.
//!
//! Slavic given names reach the registry through different romanizations
//! than players use on their profiles ("Aleksandr" vs "Oleksandr" vs
//! "Alexander"). Each class below lists spellings treated as the same name.

/// Equivalence classes of given-name spellings, all normalized (lowercase ASCII).
const GIVEN_NAME_CLASSES: &[&[&str]] = &[
    &["oleksandr", "olexandr", "alexander", "aleksandr", "alexandr", "alexandre"],
    &["aleksei", "alexey", "alexei", "aleksey", "oleksiy", "oleksii"],
    &["sergei", "sergey", "serhiy", "serhii"],
    &["andrei", "andrey", "andriy", "andrii"],
    &["dmitry", "dmitri", "dmitrij", "dmytro"],
    &["yuri", "yury", "iurii", "yuriy"],
    &["evgeny", "evgeniy", "yevgeny", "evgenij", "yevhen"],
    &["mikhail", "mykhailo", "michail"],
    &["vladislav", "vladyslav"],
    &["maxim", "maksim", "maksym"],
    &["anatoly", "anatoliy", "anatolij"],
    &["vasily", "vasiliy", "vasyl"],
    &["nikita", "mykyta"],
    &["pavel", "pavlo"],
];

/// Returns the variant class containing `given`, if any.
pub fn variant_class(given: &str) -> Option<&'static [&'static str]> {
    GIVEN_NAME_CLASSES
        .iter()
        .copied()
        .find(|class| class.contains(&given))
}

/// True when two given names are identical or spellings of the same name.
///
/// # Example
/// ```
/// use fide_bands::player_names::same_given_name;
///
/// assert!(same_given_name("oleksandr", "alexander"));
/// assert!(same_given_name("magnus", "magnus"));
/// assert!(!same_given_name("aleksei", "aleksandr"));
/// ```
pub fn same_given_name(a: &str, b: &str) -> bool {
    a == b || variant_class(a).is_some_and(|class| class.contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_class_lookup() {
        let class = variant_class("aleksei").unwrap();
        assert!(class.contains(&"alexey"));
        assert!(class.contains(&"alexei"));
        assert!(variant_class("magnus").is_none());
    }

    #[test]
    fn test_same_given_name_is_symmetric() {
        for (a, b) in [("oleksandr", "aleksandr"), ("serhiy", "sergei"), ("dmytro", "dmitry")] {
            assert!(same_given_name(a, b));
            assert!(same_given_name(b, a));
        }
    }

    #[test]
    fn test_classes_are_disjoint() {
        for (i, a) in GIVEN_NAME_CLASSES.iter().enumerate() {
            for b in GIVEN_NAME_CLASSES.iter().skip(i + 1) {
                assert!(
                    a.iter().all(|name| !b.contains(name)),
                    "classes {a:?} and {b:?} overlap"
                );
            }
        }
    }

    #[test]
    fn test_classes_are_normalized() {
        for name in GIVEN_NAME_CLASSES.iter().flat_map(|class| class.iter()) {
            assert!(name.chars().all(|c| c.is_ascii_lowercase()), "{name}");
        }
    }
}
