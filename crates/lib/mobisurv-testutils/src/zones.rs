use mobisurv_input::pois::PoiRecord;
use mobisurv_input::zones::{ZoneRecord, ZoneTable};

use crate::survey::{zone, BGU_TRACT, SOROKA_TRACT};

fn stat_zone(id: &str, name: &str, settlement: u32) -> ZoneRecord {
    ZoneRecord::builder()
        .id(zone(id))
        .name(name)
        .settlement(Some(settlement))
        .build()
}

/// Three statistical areas in Beer Sheva and Ofakim plus their two city zones.
pub fn sample_zone_table() -> ZoneTable {
    ZoneTable::from_statistical(vec![
        stat_zone("90000011", "Beer Sheva", 9000),
        stat_zone("90000012", "Beer Sheva", 9000),
        stat_zone("31000001", "Ofakim", 31),
    ])
}

pub fn sample_pois() -> Vec<PoiRecord> {
    vec![
        PoiRecord::builder()
            .id(zone(BGU_TRACT))
            .name("Ben-Gurion-University")
            .raw_name("BGU")
            .build(),
        PoiRecord::builder()
            .id(zone(SOROKA_TRACT))
            .name("Soroka-Medical-Center")
            .raw_name("Soroka Hospital")
            .build(),
    ]
}
