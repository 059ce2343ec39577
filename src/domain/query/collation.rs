use feruca::{Collator, Locale, Tailoring};
use std::cell::RefCell;
use std::cmp::Ordering;

thread_local! {
    // Root CLDR tailoring, punctuation not ignorable, byte tie-break on
    static COLLATOR: RefCell<Collator> =
        RefCell::new(Collator::new(Tailoring::Cldr(Locale::Root), false, true));
}

/// Locale-aware string ordering (Unicode Collation Algorithm, root locale).
///
/// Accented letters sort with their base letter and case only breaks ties,
/// lowercase first. Raw code points decide whatever is left, so this is a
/// total order and swapping the operands is an exact inversion.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    COLLATOR
        .with(|collator| collator.borrow_mut().collate(a, b))
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_primary_order() {
        assert_eq!(locale_compare("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_compare("Zeta", "alpha"), Ordering::Greater);
    }

    #[test]
    fn test_lowercase_first_on_case_tie() {
        assert_eq!(locale_compare("naruto", "Naruto"), Ordering::Less);
        assert_eq!(locale_compare("Naruto", "Naruto"), Ordering::Equal);
    }

    #[test]
    fn test_accented_letters_sort_with_base_letter() {
        assert_eq!(
            locale_compare("Ōkami Kakushi", "Zetsuen no Tempest"),
            Ordering::Less
        );
        assert_eq!(locale_compare("Élan", "Easy"), Ordering::Greater);
        assert_eq!(locale_compare("Élan", "Fate"), Ordering::Less);
        assert_eq!(locale_compare("Pokémon", "Pokemon"), Ordering::Greater);
    }

    #[test]
    fn test_inversion_by_swapping_operands() {
        let pairs = [("a", "B"), ("B", "a"), ("x", "x"), ("", "z"), ("Ō", "o")];
        for (a, b) in pairs {
            assert_eq!(locale_compare(a, b), locale_compare(b, a).reverse());
        }
    }
}
