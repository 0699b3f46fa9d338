use std::fs;

use mobisurv_core::poi::PoiNameTable;
use mobisurv_core::zone::ZoneKind;
use mobisurv_input::pois::PoiReader;
use mobisurv_input::trips::TripReader;
use mobisurv_input::zones::ZoneReader;
use mobisurv_testutils::scratch::scratch_dir;

#[test]
fn test_read_survey_files() {
    let dir = scratch_dir("readers");
    let trips_file = dir.join("trips.csv");
    let zones_file = dir.join("zones.csv");
    let pois_file = dir.join("pois.csv");
    fs::write(
        &trips_file,
        "from_name,from_tract,to_name,to_tract,mode,Frequency,purpose,time_bin,count,IC\n\
         Ofakim,nan,BGU,1,bus,daily,work,07:00:00,4,1\n\
         Beer Sheva,9.0000011e7,BGU,1,car,daily,work,08:00,6,0\n\
         Beer Sheva,90000011,BGU,1,car,daily,work,25:00,6,0\n",
    )
    .unwrap();
    fs::write(
        &zones_file,
        "YISHUV_STAT11,SEMEL_YISHUV,SHEM_YISHUV_ENGLISH\n90000011,9000,Beer Sheva\n",
    )
    .unwrap();
    fs::write(&pois_file, "ID,name\n1,BGU\n1,Ben Gurion\n").unwrap();

    let (trips, trip_report) = TripReader::builder()
        .file_path(trips_file)
        .build()
        .read()
        .unwrap();
    assert_eq!(trips.len(), 2);
    assert!(trips[0].from_tract.is_unresolved());
    assert_eq!(trips[1].from_tract.as_str(), "90000011");
    assert_eq!(trip_report.rows_dropped(), 1);
    assert_eq!(trip_report.dropped[0].0, 4);

    let (zones, _) = ZoneReader::builder()
        .file_path(zones_file)
        .build()
        .read()
        .unwrap();
    assert_eq!(zones.len(), 2);
    assert_eq!(zones.cities().count(), 1);
    assert!(zones
        .ids()
        .any(|id| mobisurv_core::zone::zone_kind(id) == ZoneKind::Statistical));

    let (pois, poi_report) = PoiReader::builder()
        .file_path(pois_file)
        .names(PoiNameTable::default())
        .build()
        .read()
        .unwrap();
    assert_eq!(pois.len(), 1);
    assert_eq!(pois[0].name, "Ben-Gurion-University");
    assert_eq!(poi_report.rows_kept, 2);
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = scratch_dir("readers-missing");
    let result = TripReader::builder()
        .file_path(dir.join("absent.csv"))
        .build()
        .read();
    assert!(result.is_err());
}
