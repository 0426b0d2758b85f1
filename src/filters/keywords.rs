//! Per-language keyword tables for the type and style filters

use crate::data::{Language, StyleFilter, VenueTypeFilter};

/// Keywords for one concept, per language
#[derive(Debug)]
pub struct KeywordTable {
    pub en: &'static [&'static str],
    pub fr: &'static [&'static str],
}

impl KeywordTable {
    pub fn for_language(&self, language: Language) -> &'static [&'static str] {
        match language {
            Language::En => self.en,
            Language::Fr => self.fr,
        }
    }

    /// Whether `text` (already lowercased) contains any keyword as a whole word
    pub fn matches(&self, text: &str, language: Language) -> bool {
        self.for_language(language)
            .iter()
            .any(|keyword| contains_word(text, keyword))
    }
}

/// Whole-word, case-sensitive search for `word` in `text`
///
/// A match must not be preceded or followed by an alphanumeric character,
/// so "art" does not match inside "apartment".
pub fn contains_word(text: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    text.match_indices(word).any(|(start, matched)| {
        let before = text[..start].chars().next_back();
        let after = text[start + matched.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

static HOTEL: KeywordTable = KeywordTable {
    en: &["hotel", "inn", "resort", "lodge", "suites"],
    fr: &["hôtel", "hotel", "auberge", "gîte", "suites"],
};

static RESTAURANT: KeywordTable = KeywordTable {
    en: &["restaurant", "bistro", "grill", "kitchen", "brasserie", "steakhouse"],
    fr: &["restaurant", "bistro", "brasserie", "table", "grill"],
};

static EVENT_HALL: KeywordTable = KeywordTable {
    en: &["event", "events", "banquet", "hall", "ballroom", "venue", "conference", "pavilion"],
    fr: &["salle", "réception", "banquet", "événement", "événements", "congrès", "pavillon"],
};

static GARDEN: KeywordTable = KeywordTable {
    en: &["garden", "gardens", "park", "estate", "farm", "vineyard", "arboretum"],
    fr: &["jardin", "jardins", "parc", "domaine", "ferme", "vignoble"],
};

static MUSEUM: KeywordTable = KeywordTable {
    en: &["museum", "gallery", "art", "aquarium", "science world"],
    fr: &["musée", "galerie", "art", "aquarium"],
};

/// Keyword table for a venue type, `None` for `All`
pub fn type_keywords(venue_type: VenueTypeFilter) -> Option<&'static KeywordTable> {
    match venue_type {
        VenueTypeFilter::All => None,
        VenueTypeFilter::Hotel => Some(&HOTEL),
        VenueTypeFilter::Restaurant => Some(&RESTAURANT),
        VenueTypeFilter::EventHall => Some(&EVENT_HALL),
        VenueTypeFilter::Garden => Some(&GARDEN),
        VenueTypeFilter::Museum => Some(&MUSEUM),
    }
}

/// Provider category tags that identify a venue type literally
pub fn type_tags(venue_type: VenueTypeFilter) -> &'static [&'static str] {
    match venue_type {
        VenueTypeFilter::All => &[],
        VenueTypeFilter::Hotel => &["lodging"],
        VenueTypeFilter::Restaurant => &["restaurant"],
        VenueTypeFilter::EventHall => &["event_venue", "banquet_hall", "convention_center"],
        VenueTypeFilter::Garden => &["park", "botanical_garden"],
        VenueTypeFilter::Museum => &["museum", "art_gallery"],
    }
}

static MODERN: KeywordTable = KeywordTable {
    en: &["modern", "contemporary", "loft", "design", "studio"],
    fr: &["moderne", "contemporain", "loft", "design", "studio"],
};

static CLASSIC: KeywordTable = KeywordTable {
    en: &["historic", "heritage", "classic", "manor", "castle", "mansion", "chapel"],
    fr: &["historique", "patrimoine", "classique", "manoir", "château", "chapelle"],
};

static LUXURY: KeywordTable = KeywordTable {
    en: &["luxury", "grand", "premium", "boutique", "royal", "prestige"],
    fr: &["luxe", "grand", "prestige", "boutique", "royal"],
};

static URBAN: KeywordTable = KeywordTable {
    en: &["urban", "downtown", "rooftop", "warehouse", "industrial", "brewery"],
    fr: &["urbain", "centre-ville", "toit", "entrepôt", "industriel", "brasserie"],
};

/// Keyword table for a style, `None` for `All`
pub fn style_keywords(style: StyleFilter) -> Option<&'static KeywordTable> {
    match style {
        StyleFilter::All => None,
        StyleFilter::Modern => Some(&MODERN),
        StyleFilter::Classic => Some(&CLASSIC),
        StyleFilter::Luxury => Some(&LUXURY),
        StyleFilter::Urban => Some(&URBAN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_word_respects_boundaries() {
        assert!(contains_word("vancouver art gallery", "art"));
        assert!(!contains_word("harbour apartment suites", "art"));
        assert!(contains_word("hotel", "hotel"));
        assert!(contains_word("the rooftop, gastown", "rooftop"));
        assert!(!contains_word("anything", ""));
    }

    #[test]
    fn test_contains_word_handles_multibyte_neighbours() {
        assert!(contains_word("le château frontenac", "château"));
        assert!(!contains_word("éhotel", "hotel"));
    }

    #[test]
    fn test_keyword_table_is_language_specific() {
        let table = type_keywords(VenueTypeFilter::Garden).unwrap();
        assert!(table.matches("jardin botanique", Language::Fr));
        assert!(!table.matches("jardin botanique", Language::En));
        assert!(table.matches("vandusen botanical garden", Language::En));
    }

    #[test]
    fn test_all_has_no_tables() {
        assert!(type_keywords(VenueTypeFilter::All).is_none());
        assert!(type_tags(VenueTypeFilter::All).is_empty());
        assert!(style_keywords(StyleFilter::All).is_none());
    }

    #[test]
    fn test_every_table_has_keywords_in_both_languages() {
        for venue_type in VenueTypeFilter::VARIANTS.iter().skip(1) {
            let table = type_keywords(*venue_type).unwrap();
            assert!(!table.en.is_empty() && !table.fr.is_empty(), "{:?}", venue_type);
        }
        for style in StyleFilter::VARIANTS.iter().skip(1) {
            let table = style_keywords(*style).unwrap();
            assert!(!table.en.is_empty() && !table.fr.is_empty(), "{:?}", style);
        }
    }
}
