use mobisurv_core::hour::HourBin;
use mobisurv_core::trip::TripRecord;
use mobisurv_core::zone::ZoneId;

pub const BGU_TRACT: &str = "00000001";
pub const SOROKA_TRACT: &str = "00000002";

pub fn zone(raw: &str) -> ZoneId {
    raw.parse().expect("invalid fixture zone")
}

pub fn hour(value: u32) -> HourBin {
    HourBin::try_from(value).expect("invalid fixture hour")
}

/// A metro trip with the given endpoints and no place names.
pub fn trip(from: &str, to: &str, mode: &str, at: u32, count: f64) -> TripRecord {
    TripRecord::builder()
        .from_tract(zone(from))
        .to_tract(zone(to))
        .mode(mode)
        .frequency("daily")
        .purpose("work")
        .hour(hour(at))
        .count(count)
        .build()
}

pub fn named_trip(
    from: (&str, &str),
    to: (&str, &str),
    mode: &str,
    at: u32,
    count: f64,
    inter_city: bool,
) -> TripRecord {
    TripRecord::builder()
        .from_name(from.0)
        .from_tract(zone(from.1))
        .to_name(to.0)
        .to_tract(zone(to.1))
        .mode(mode)
        .frequency("daily")
        .purpose("work")
        .hour(hour(at))
        .count(count)
        .inter_city(inter_city)
        .build()
}

/// A small survey around two POIs.
///
/// Inbound to BGU: 100 trips, 60 from the metro over two tracts and 40 from outside.
/// Outbound from BGU: 25 trips to a single tract. Inbound to Soroka: 5 trips from a named
/// but unresolved origin.
pub fn sample_trips() -> Vec<TripRecord> {
    let mut bus_weekly = named_trip(
        ("Beer Sheva", "90000011"),
        ("BGU", BGU_TRACT),
        "bus",
        9,
        30.0,
        false,
    );
    bus_weekly.frequency = "weekly".to_string();
    bus_weekly.purpose = "study".to_string();

    let mut walk_study = named_trip(
        ("Beer Sheva", "90000012"),
        ("BGU", BGU_TRACT),
        "Walk",
        8,
        20.0,
        false,
    );
    walk_study.purpose = "study".to_string();

    vec![
        named_trip(
            ("Beer Sheva", "90000011"),
            ("BGU", BGU_TRACT),
            "car",
            8,
            10.0,
            false,
        ),
        bus_weekly,
        walk_study,
        named_trip(
            ("Ofakim", "C0000031"),
            ("Ben Gurion", BGU_TRACT),
            "bus",
            7,
            40.0,
            true,
        ),
        named_trip(
            ("Ben Gurion", BGU_TRACT),
            ("Beer Sheva", "90000011"),
            "car",
            17,
            25.0,
            false,
        ),
        named_trip(
            ("Ofakim", "00000000"),
            ("Soroka Hospital", SOROKA_TRACT),
            "bus",
            10,
            5.0,
            true,
        ),
    ]
}
