//! Static keyword table for the domain classifier.
//!
//! Each entry is `(keyword, weight)`. Single words match whole words;
//! entries containing a space match as a contiguous word sequence.
//! Plural forms are listed explicitly where they matter.

use super::domain::ForecastDomain;

/// Weight for terms that almost always signal the domain.
const CORE: f64 = 2.0;
/// Weight for terms that lean towards the domain.
const STRONG: f64 = 1.5;
/// Weight for supporting vocabulary.
const SUPPORT: f64 = 1.0;

pub type KeywordSet = &'static [(&'static str, f64)];

pub const MILITARY: KeywordSet = &[
    ("military", CORE),
    ("troops", CORE),
    ("troop", CORE),
    ("missile", CORE),
    ("missiles", CORE),
    ("army", CORE),
    ("navy", CORE),
    ("naval", CORE),
    ("air force", CORE),
    ("invasion", CORE),
    ("escalation", STRONG),
    ("war", STRONG),
    ("combat", STRONG),
    ("weapons", STRONG),
    ("weapon", STRONG),
    ("airstrike", STRONG),
    ("airstrikes", STRONG),
    ("nato", STRONG),
    ("pentagon", STRONG),
    ("deployment", SUPPORT),
    ("defense", SUPPORT),
    ("defence", SUPPORT),
    ("conflict", SUPPORT),
    ("ceasefire", SUPPORT),
    ("offensive", SUPPORT),
    ("battalion", SUPPORT),
    ("carrier group", SUPPORT),
    ("fighter jet", SUPPORT),
];

pub const GEOPOLITICAL: KeywordSet = &[
    ("geopolitical", CORE),
    ("diplomatic", CORE),
    ("sanctions", CORE),
    ("sanction", CORE),
    ("treaty", CORE),
    ("embargo", CORE),
    ("security council", CORE),
    ("alliance", STRONG),
    ("ambassador", STRONG),
    ("sovereignty", STRONG),
    ("territorial", STRONG),
    ("annexation", STRONG),
    ("summit", SUPPORT),
    ("border", SUPPORT),
    ("refugee", SUPPORT),
    ("refugees", SUPPORT),
    ("foreign minister", SUPPORT),
    ("united nations", SUPPORT),
];

pub const FINANCIAL: KeywordSet = &[
    ("stock", CORE),
    ("stocks", CORE),
    ("inflation", CORE),
    ("recession", CORE),
    ("interest rate", CORE),
    ("central bank", CORE),
    ("bond", STRONG),
    ("bonds", STRONG),
    ("currency", STRONG),
    ("forex", STRONG),
    ("gdp", STRONG),
    ("fed", STRONG),
    ("nasdaq", STRONG),
    ("wall street", STRONG),
    ("market", SUPPORT),
    ("markets", SUPPORT),
    ("investor", SUPPORT),
    ("investors", SUPPORT),
    ("dollar", SUPPORT),
    ("euro", SUPPORT),
    ("volatility", SUPPORT),
    ("trading", SUPPORT),
    ("default", SUPPORT),
];

pub const ENERGY: KeywordSet = &[
    ("oil", CORE),
    ("crude", CORE),
    ("opec", CORE),
    ("natural gas", CORE),
    ("lng", CORE),
    ("petroleum", CORE),
    ("barrel", STRONG),
    ("barrels", STRONG),
    ("refinery", STRONG),
    ("pipeline", STRONG),
    ("uranium", STRONG),
    ("coal", STRONG),
    ("energy", SUPPORT),
    ("gas", SUPPORT),
    ("solar", SUPPORT),
    ("renewable", SUPPORT),
    ("renewables", SUPPORT),
    ("nuclear", SUPPORT),
    ("electricity", SUPPORT),
];

pub const TECHNOLOGY: KeywordSet = &[
    ("cyber", CORE),
    ("cyberattack", CORE),
    ("ransomware", CORE),
    ("malware", CORE),
    ("semiconductor", CORE),
    ("semiconductors", CORE),
    ("artificial intelligence", CORE),
    ("ai", STRONG),
    ("hack", STRONG),
    ("hackers", STRONG),
    ("data breach", STRONG),
    ("zero-day", STRONG),
    ("chip", STRONG),
    ("chips", STRONG),
    ("quantum", STRONG),
    ("software", SUPPORT),
    ("encryption", SUPPORT),
    ("cloud", SUPPORT),
    ("tech", SUPPORT),
    ("5g", SUPPORT),
];

pub const HEALTH: KeywordSet = &[
    ("pandemic", CORE),
    ("epidemic", CORE),
    ("outbreak", CORE),
    ("virus", CORE),
    ("vaccine", CORE),
    ("vaccines", CORE),
    ("biosecurity", CORE),
    ("disease", STRONG),
    ("infection", STRONG),
    ("infections", STRONG),
    ("quarantine", STRONG),
    ("covid", STRONG),
    ("hospital", SUPPORT),
    ("hospitals", SUPPORT),
    ("health", SUPPORT),
    ("mortality", SUPPORT),
];

pub const INFRASTRUCTURE: KeywordSet = &[
    ("infrastructure", CORE),
    ("power grid", CORE),
    ("blackout", CORE),
    ("outage", CORE),
    ("outages", CORE),
    ("supply chain", CORE),
    ("shipping", STRONG),
    ("port", STRONG),
    ("ports", STRONG),
    ("freight", STRONG),
    ("logistics", STRONG),
    ("telecommunications", STRONG),
    ("bridge", SUPPORT),
    ("railway", SUPPORT),
    ("container", SUPPORT),
    ("cargo", SUPPORT),
    ("grid", SUPPORT),
];

pub const ENVIRONMENTAL: KeywordSet = &[
    ("climate", CORE),
    ("hurricane", CORE),
    ("drought", CORE),
    ("wildfire", CORE),
    ("wildfires", CORE),
    ("flood", CORE),
    ("flooding", CORE),
    ("emissions", STRONG),
    ("carbon", STRONG),
    ("earthquake", STRONG),
    ("heatwave", STRONG),
    ("paris agreement", STRONG),
    ("weather", SUPPORT),
    ("temperature", SUPPORT),
    ("environmental", SUPPORT),
    ("sustainability", SUPPORT),
];

pub const SOCIETAL: KeywordSet = &[
    ("protest", CORE),
    ("protests", CORE),
    ("riot", CORE),
    ("riots", CORE),
    ("civil unrest", CORE),
    ("strike", STRONG),
    ("strikes", STRONG),
    ("demonstration", STRONG),
    ("demonstrations", STRONG),
    ("unemployment", STRONG),
    ("inequality", STRONG),
    ("migration", SUPPORT),
    ("poverty", SUPPORT),
    ("polarization", SUPPORT),
    ("populism", SUPPORT),
    ("demographic", SUPPORT),
];

pub const POLICY: KeywordSet = &[
    ("legislation", CORE),
    ("regulation", CORE),
    ("regulations", CORE),
    ("parliament", CORE),
    ("congress", CORE),
    ("election", CORE),
    ("elections", CORE),
    ("bill", STRONG),
    ("law", STRONG),
    ("referendum", STRONG),
    ("government", STRONG),
    ("policy", SUPPORT),
    ("minister", SUPPORT),
    ("president", SUPPORT),
    ("governance", SUPPORT),
    ("court", SUPPORT),
];

/// Keyword set owned by `domain`. `General` owns none.
pub fn keywords_for(domain: ForecastDomain) -> KeywordSet {
    match domain {
        ForecastDomain::Military => MILITARY,
        ForecastDomain::Geopolitical => GEOPOLITICAL,
        ForecastDomain::Financial => FINANCIAL,
        ForecastDomain::Energy => ENERGY,
        ForecastDomain::Technology => TECHNOLOGY,
        ForecastDomain::Health => HEALTH,
        ForecastDomain::Infrastructure => INFRASTRUCTURE,
        ForecastDomain::Environmental => ENVIRONMENTAL,
        ForecastDomain::Societal => SOCIETAL,
        ForecastDomain::Policy => POLICY,
        ForecastDomain::General => &[],
    }
}
