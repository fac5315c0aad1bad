//! Built-in city sources.
//!
//! Each source knows the published operating hours of a city's zones and
//! builds a [`City`] from them. Schedules go through the lenient parsing
//! paths: an entry that cannot be read is dropped, and the city's
//! [`DayRangePolicy`] decides whether an unknown day expression is dropped
//! or read as Monday-Friday.

use tracing::{debug, info, warn};

use crate::city::City;
use crate::coordinates::close_ring;
use crate::day_range::DayRangePolicy;
use crate::schedule_text::restrictions_from_schedule;
use crate::weekday::Weekday;
use crate::zone::{LonLat, Zone};

/// A source of zone data for one city.
pub trait CitySource: Send + Sync {
    /// Lookup key, lower-case (e.g. `milano`).
    fn key(&self) -> &'static str;

    /// Name used for the city and its zones.
    fn display_name(&self) -> &'static str;

    /// Alternative keys accepted by [`find_source`].
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// How unresolvable day expressions are treated.
    fn day_policy(&self) -> DayRangePolicy {
        DayRangePolicy::Strict
    }

    /// Builds the city with all of its zones.
    fn build(&self) -> City;
}

/// A published zone: identity, schedule text and outline.
struct ZoneSeed {
    id: &'static str,
    name: &'static str,
    schedule: &'static str,
    boundaries: &'static [(f64, f64)],
}

/// A city whose zones are known ahead of time.
struct StaticCity {
    key: &'static str,
    display_name: &'static str,
    aliases: &'static [&'static str],
    policy: DayRangePolicy,
    zones: &'static [ZoneSeed],
}

impl CitySource for StaticCity {
    fn key(&self) -> &'static str {
        self.key
    }

    fn display_name(&self) -> &'static str {
        self.display_name
    }

    fn aliases(&self) -> &'static [&'static str] {
        self.aliases
    }

    fn day_policy(&self) -> DayRangePolicy {
        self.policy
    }

    fn build(&self) -> City {
        let mut city = City::new(self.display_name);

        for seed in self.zones {
            let boundaries = close_ring(
                seed.boundaries
                    .iter()
                    .map(|&(lon, lat)| LonLat(lon, lat))
                    .collect(),
            );
            let mut zone = Zone::new(seed.id, seed.name, self.display_name, boundaries);

            for restriction in restrictions_from_schedule(seed.schedule, self.policy, &Weekday::ALL) {
                zone.add_restriction(restriction);
            }

            if zone.restrictions().is_empty() {
                warn!(zone = seed.id, schedule = seed.schedule, "Zone has no usable restrictions");
            } else {
                debug!(zone = seed.id, restrictions = zone.restrictions().len(), "Built zone");
            }
            city.add_zone(zone);
        }

        info!(city = self.display_name, zones = city.zones().len(), "Built city");
        city
    }
}

const BOLOGNA_CENTRE: &[(f64, f64)] = &[
    (11.343831, 44.493723),
    (11.343773, 44.493458),
    (11.344351, 44.493360),
    (11.344418, 44.493336),
    (11.345085, 44.493236),
    (11.343831, 44.493723),
];

const FLORENCE_HOURS: &str =
    "dal lunedì al venerdì dalle ore 7,30 alle ore 20 e il sabato dalle ore 7,30 alle ore 16";

static MILANO: StaticCity = StaticCity {
    key: "milano",
    display_name: "Milano",
    aliases: &["milan"],
    policy: DayRangePolicy::Strict,
    zones: &[
        ZoneSeed {
            id: "milano-area-b",
            name: "Area B - Low Emission Zone",
            schedule: "Mon–Fri 7:30-19:30",
            boundaries: &[],
        },
        ZoneSeed {
            id: "milano-area-c",
            name: "Area C - ZTL Cerchia dei Bastioni",
            schedule: "Mon–Fri 7:30-19:30",
            boundaries: &[],
        },
    ],
};

static TORINO: StaticCity = StaticCity {
    key: "torino",
    display_name: "Torino",
    aliases: &["turin"],
    policy: DayRangePolicy::FallbackToWeekdays,
    zones: &[
        ZoneSeed {
            id: "turin-ztl-centrale",
            name: "ZTL Centrale",
            schedule: "Monday-Friday 07:30-10:30",
            boundaries: &[],
        },
        ZoneSeed {
            id: "turin-ztl-romana",
            name: "ZTL Romana",
            schedule: "Every day 21:00-07:30",
            boundaries: &[],
        },
        ZoneSeed {
            id: "turin-ztl-emanuele-filiberto",
            name: "Piazza Emanuele Filiberto",
            schedule: "Every day 19:30-07:30",
            boundaries: &[],
        },
        ZoneSeed {
            id: "turin-ztl-valentino",
            name: "ZTL Valentino",
            schedule: "Every day 00:00-23:59",
            boundaries: &[],
        },
    ],
};

static BOLOGNA: StaticCity = StaticCity {
    key: "bologna",
    display_name: "Bologna",
    aliases: &[],
    policy: DayRangePolicy::Strict,
    zones: &[
        ZoneSeed {
            id: "bologna-ztl-centro-storico",
            name: "ZTL Centro Storico",
            schedule: "tutti i giorni dalle 7.00 alle 20.00",
            boundaries: BOLOGNA_CENTRE,
        },
        ZoneSeed {
            id: "bologna-ztl-universita",
            name: "ZTL Università",
            schedule: "All days 7:00-20:00",
            boundaries: &[],
        },
        ZoneSeed {
            id: "bologna-zona-t",
            name: "Zona T",
            schedule: "tutti i giorni, 24 ore su 24",
            boundaries: &[],
        },
    ],
};

static FIRENZE: StaticCity = StaticCity {
    key: "firenze",
    display_name: "Firenze",
    aliases: &["florence"],
    policy: DayRangePolicy::Strict,
    zones: &[
        ZoneSeed {
            id: "firenze-settore-a",
            name: "ZTL Settore A",
            schedule: FLORENCE_HOURS,
            boundaries: &[
                (11.2558, 43.7764),
                (11.2615, 43.7781),
                (11.2631, 43.7755),
                (11.2592, 43.7728),
                (11.2558, 43.7764),
            ],
        },
        ZoneSeed {
            id: "firenze-settore-b",
            name: "ZTL Settore B",
            schedule: FLORENCE_HOURS,
            boundaries: &[
                (11.2500, 43.7700),
                (11.2550, 43.7750),
                (11.2600, 43.7730),
                (11.2540, 43.7680),
                (11.2500, 43.7700),
            ],
        },
        ZoneSeed {
            id: "firenze-settore-o",
            name: "ZTL Settore O",
            schedule: FLORENCE_HOURS,
            boundaries: &[
                (11.2450, 43.7650),
                (11.2500, 43.7680),
                (11.2520, 43.7650),
                (11.2470, 43.7620),
                (11.2450, 43.7650),
            ],
        },
        ZoneSeed {
            id: "firenze-settore-f",
            name: "ZTL Settore F",
            schedule: FLORENCE_HOURS,
            boundaries: &[
                (11.2620, 43.7680),
                (11.2650, 43.7700),
                (11.2670, 43.7680),
                (11.2640, 43.7660),
                (11.2620, 43.7680),
            ],
        },
        ZoneSeed {
            id: "firenze-settore-g",
            name: "ZTL Settore G",
            schedule: FLORENCE_HOURS,
            boundaries: &[
                (11.2580, 43.7600),
                (11.2610, 43.7620),
                (11.2630, 43.7600),
                (11.2600, 43.7580),
                (11.2580, 43.7600),
            ],
        },
        ZoneSeed {
            id: "firenze-ztl-notturna",
            name: "ZTL Notturna",
            schedule: "Thursday-Saturday 23:00-03:00",
            boundaries: &[],
        },
    ],
};

static NAPOLI: StaticCity = StaticCity {
    key: "napoli",
    display_name: "Napoli",
    aliases: &["naples"],
    policy: DayRangePolicy::FallbackToWeekdays,
    zones: &[
        ZoneSeed {
            id: "naples-ztl-centro-antico",
            name: "ZTL Centro Antico",
            schedule: "Orari: Monday-Friday 07:00-19:00, Saturday-Sunday 10:00-14:00",
            boundaries: &[],
        },
        ZoneSeed {
            id: "naples-ztl-morelli-filangieri-mille",
            name: "ZTL Morelli - Filangieri - Mille",
            schedule: "Monday-Friday 08:00-18:00",
            boundaries: &[],
        },
        ZoneSeed {
            id: "naples-ztl-tarsia-pignasecca-dante",
            name: "ZTL Tarsia - Pignasecca - Dante",
            schedule: "Monday-Friday 09:00-17:00",
            boundaries: &[],
        },
        ZoneSeed {
            id: "naples-ztl-belledonne-martiri-poerio",
            name: "ZTL Belledonne, Martiri, Poerio",
            schedule: "Monday-Friday 08:00-18:00",
            boundaries: &[],
        },
        ZoneSeed {
            id: "naples-ztl-marechiaro",
            name: "ZTL Marechiaro",
            schedule: "Saturday-Sunday 08:00-19:00",
            boundaries: &[],
        },
    ],
};

static REGISTRY: [&dyn CitySource; 5] = [&MILANO, &TORINO, &BOLOGNA, &FIRENZE, &NAPOLI];

/// All built-in sources.
pub fn registry() -> &'static [&'static dyn CitySource] {
    &REGISTRY
}

/// Resolves a source by key or alias, ignoring case.
pub fn find_source(key: &str) -> Option<&'static dyn CitySource> {
    let wanted = key.trim().to_lowercase();
    registry()
        .iter()
        .copied()
        .find(|source| source.key() == wanted || source.aliases().contains(&wanted.as_str()))
}

/// Keys of all built-in sources, in registry order.
pub fn source_keys() -> Vec<&'static str> {
    registry().iter().map(|source| source.key()).collect()
}
