//! Selector strategy tables for the catalog and detail pages.
//!
//! The site's markup changes often and differs between catalog themes, so
//! every logical field has several selectors tried in priority order. The
//! tables are plain data; [`super::extractors`] is the only consumer.

use crate::crawl_engine::external_link::ExternalLinkPolicy;

/// What to read from a matched element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Rendered text
    Text,
    /// Attribute value
    Attribute(&'static str),
}

/// Ordered selectors for one logical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorStrategy {
    /// Field name used in logs
    pub field: &'static str,
    pub selectors: &'static [&'static str],
    pub read: ReadMode,
}

impl SelectorStrategy {
    #[must_use]
    pub const fn text(field: &'static str, selectors: &'static [&'static str]) -> Self {
        Self {
            field,
            selectors,
            read: ReadMode::Text,
        }
    }

    #[must_use]
    pub const fn attribute(
        field: &'static str,
        selectors: &'static [&'static str],
        attribute: &'static str,
    ) -> Self {
        Self {
            field,
            selectors,
            read: ReadMode::Attribute(attribute),
        }
    }
}

pub const CATALOG_CONTAINERS: &[&str] = &[
    ".catalog__item",
    ".catalog-item",
    "[class*='catalog'] [class*='item']",
    ".card-profile",
    ".catalog-card",
    "[class*='profile-card']",
];

pub const LOAD_MORE_CONTROL: &str = ".btn.btn-primary.see-more";

pub const COMPANY: SelectorStrategy = SelectorStrategy::text(
    "company",
    &[
        ".catalog-company",
        ".catalog__title",
        ".company-name",
        "[class*='title']",
        "[class*='company']",
    ],
);

pub const FULL_NAME: SelectorStrategy = SelectorStrategy::text(
    "fullName",
    &[
        ".catalog-name",
        ".user__infos .name",
        ".user__name",
        ".profile-name",
        "[class*='name']",
    ],
);

pub const JOB_TITLE: SelectorStrategy = SelectorStrategy::text(
    "jobTitle",
    &[
        ".catalog-position",
        ".user__infos .job",
        ".user__job",
        ".profile-job",
        "[class*='job']",
        "[class*='position']",
    ],
);

pub const DETAIL_URL: SelectorStrategy = SelectorStrategy::attribute(
    "detailUrl",
    &[
        "a.catalog-link",
        ".catalog-sheet-more",
        "[href*='profile']",
        "[href*='user']",
        "a[href*='sheet']",
    ],
    "href",
);

pub const AVATAR_URL: SelectorStrategy = SelectorStrategy::attribute(
    "avatarUrl",
    &[
        ".catalog-avatar img",
        ".user-avatar img",
        "[class*='avatar'] img",
        "img[src*='avatar']",
    ],
    "src",
);

pub const KEY_FACTS: SelectorStrategy = SelectorStrategy::text(
    "keyFacts",
    &[
        "#object-d6fa1ac7 .section__content li",
        "[id*='elements'] .section__content li",
    ],
);

pub const SECTOR: SelectorStrategy = SelectorStrategy::text(
    "sector",
    &[
        "#object-Me3f9M9edd .section__content li.highlight",
        "[id*='secteur'] .section__content li",
    ],
);

pub const MISSION: SelectorStrategy = SelectorStrategy::text(
    "mission",
    &[
        "#object-M4561Macb7 .section__content li",
        "[id*='mission'] .section__content li",
    ],
);

pub const OUTLET_COUNT: SelectorStrategy = SelectorStrategy::text(
    "outletCount",
    &[
        "#object-M91ceM1169 .section__content li.highlight",
        "[id*='vente'] .section__content li",
    ],
);

pub const SOUGHT_SOLUTIONS: SelectorStrategy = SelectorStrategy::text(
    "soughtSolutions",
    &[
        "#object-M184bM50c8 .section__content li.highlight",
        "[id*='solution'] .section__content li",
    ],
);

/// Sections read from a detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailLayout {
    pub key_facts: SelectorStrategy,
    pub sector: SelectorStrategy,
    pub mission: SelectorStrategy,
    pub outlet_count: SelectorStrategy,
    pub sought_solutions: SelectorStrategy,
    pub external_link: ExternalLinkPolicy,
}

impl Default for DetailLayout {
    fn default() -> Self {
        Self {
            key_facts: KEY_FACTS,
            sector: SECTOR,
            mission: MISSION,
            outlet_count: OUTLET_COUNT,
            sought_solutions: SOUGHT_SOLUTIONS,
            external_link: ExternalLinkPolicy::default(),
        }
    }
}

/// Everything the engine needs to know about the site's markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogLayout {
    /// Entry container selectors; the first one with a match is used
    pub containers: &'static [&'static str],
    pub load_more_control: &'static str,
    pub company: SelectorStrategy,
    pub full_name: SelectorStrategy,
    pub job_title: SelectorStrategy,
    pub detail_url: SelectorStrategy,
    pub avatar_url: SelectorStrategy,
    pub detail: DetailLayout,
}

impl Default for CatalogLayout {
    fn default() -> Self {
        Self {
            containers: CATALOG_CONTAINERS,
            load_more_control: LOAD_MORE_CONTROL,
            company: COMPANY,
            full_name: FULL_NAME,
            job_title: JOB_TITLE,
            detail_url: DETAIL_URL,
            avatar_url: AVATAR_URL,
            detail: DetailLayout::default(),
        }
    }
}
