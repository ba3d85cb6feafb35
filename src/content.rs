// Static page copy for the showcase window
// Fact cards carry their reveal delay as raw attribute text, parsed by
// `reveal::parse_delay` when the card is observed.

pub const PAGE_TITLE: &str = "Driftwood Cove";
pub const HERO_TITLE: &str = "DRIFTWOOD COVE";
pub const HERO_SUBTITLE: &str = "A quiet stretch of coast, one frame at a time.";
pub const FACTS_HEADER: &str = "THE COVE";
pub const GALLERY_HEADER: &str = "GALLERY";

pub struct FactCard {
    pub title: &'static str,
    pub body: &'static str,
    /// Reveal delay in milliseconds, as written in the page source.
    pub delay: Option<&'static str>,
}

pub const FACT_CARDS: &[FactCard] = &[
    FactCard {
        title: "Tides",
        body: "Twice a day the sandbar disappears and the cove becomes an island.",
        delay: None,
    },
    FactCard {
        title: "Light",
        body: "The western cliffs hold the last of the sun long after the beach is in shadow.",
        delay: Some("150"),
    },
    FactCard {
        title: "Driftwood",
        body: "Winter storms rearrange the shoreline; every spring the beach looks different.",
        delay: Some("300"),
    },
    FactCard {
        title: "Access",
        body: "Reachable on foot at low tide, or by the old coastal path.",
        delay: Some("450"),
    },
];
