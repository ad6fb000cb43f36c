use crate::{
    prelude::{Message, Record, TrackBuilder},
    tests::{assert_close, gps, init_logger, observables_message, RawEphemeris},
};

fn decode_all(messages: &[Message]) -> TrackBuilder {
    messages
        .iter()
        .filter_map(|msg| msg.decode().unwrap())
        .collect()
}

#[test]
fn tracked_satellites() {
    init_logger();

    let messages = vec![
        observables_message(10.0, &[(3, 2.0E7), (9, 2.1E7), (1, 2.2E7)]),
        RawEphemeris::gps_like(9, 0.0).to_message(),
        RawEphemeris::gps_like(1, 0.0).to_message(),
        observables_message(11.0, &[(9, 2.0E7), (1, 2.1E7), (3, 2.2E7)]),
    ];

    let tracks = decode_all(&messages).build();

    // satellite 3 never broadcast its ephemeris
    assert_eq!(tracks.satellites().collect::<Vec<_>>(), vec![gps(1), gps(9)]);
    assert!(tracks.get(&gps(3)).is_none());

    // ephemeris arriving late still enables prior observations
    let g09 = tracks.get(&gps(9)).unwrap();
    assert_eq!(g09.times(), &[10.0, 11.0]);
    assert_close(&g09.pseudoranges().collect::<Vec<_>>(), &[2.1E7, 2.0E7]);

    let g01 = tracks.get(&gps(1)).unwrap();
    assert_eq!(g01.times(), &[10.0, 11.0]);
    assert_close(&g01.pseudoranges().collect::<Vec<_>>(), &[2.2E7, 2.1E7]);
}

#[test]
fn arrival_order_is_preserved() {
    let messages = vec![
        RawEphemeris::gps_like(4, 0.0).to_message(),
        observables_message(30.0, &[(4, 3.0E7)]),
        observables_message(10.0, &[(4, 1.0E7)]),
        observables_message(20.0, &[(4, 2.0E7)]),
    ];

    let tracks = decode_all(&messages).build();
    let g04 = tracks.get(&gps(4)).unwrap();

    assert_eq!(g04.times(), &[30.0, 10.0, 20.0]);
    assert_eq!(g04.observations().len(), g04.times().len());

    for (obs, t) in g04.observations().iter().zip(g04.times()) {
        assert_eq!(obs.time_of_week, *t);
        assert_eq!(obs.sv, gps(4));
    }

    // epochs are sorted and unique across tracks
    assert_eq!(tracks.epochs(), vec![10.0, 20.0, 30.0]);
}

#[test]
fn ephemeris_deduplication() {
    let first = RawEphemeris::gps_like(2, 7200.0);

    let mut duplicate = RawEphemeris::gps_like(2, 7200.0);
    duplicate.sqrt_a = 5000.0;

    let update = RawEphemeris::gps_like(2, 14400.0);
    let other = RawEphemeris::gps_like(5, 7200.0);

    let builder: TrackBuilder = [first, duplicate, update, other]
        .iter()
        .map(|raw| Record::Ephemeris(raw.to_record()))
        .collect();

    let tracks = builder.build();

    let g02 = tracks.get(&gps(2)).unwrap();
    assert_eq!(g02.ephemeris().len(), 2);
    assert_eq!(*g02.first_ephemeris(), first.to_record());
    assert_eq!(g02.ephemeris()[1], update.to_record());
    assert_eq!(g02.basis_time(), 7200.0);

    // same time of week on another satellite is not a duplicate
    let g05 = tracks.get(&gps(5)).unwrap();
    assert_eq!(g05.ephemeris().len(), 1);

    assert_eq!(tracks.basis_time(), Some(7200.0));
}

#[test]
fn repeated_epochs() {
    let messages = vec![
        RawEphemeris::gps_like(6, 0.0).to_message(),
        observables_message(5.0, &[(6, 1.0E7)]),
        observables_message(5.0, &[(6, 1.5E7)]),
    ];

    let tracks = decode_all(&messages).build();
    let g06 = tracks.get(&gps(6)).unwrap();

    assert_eq!(g06.times(), &[5.0, 5.0]);
    // first occurrence is the one retained by lookups
    assert_eq!(g06.index_of(5.0), Some(0));
    assert_eq!(g06.index_of(6.0), None);
    assert_eq!(tracks.epochs(), vec![5.0]);
}

#[test]
fn empty_input() {
    let tracks = TrackBuilder::default().build();
    assert!(tracks.is_empty());
    assert!(tracks.epochs().is_empty());
    assert_eq!(tracks.basis_time(), None);
}

#[cfg(feature = "serde")]
#[test]
fn track_deserialization() {
    use crate::prelude::SatelliteTrack;

    let messages = vec![
        RawEphemeris::gps_like(8, 0.0).to_message(),
        observables_message(10.0, &[(8, 2.0E7)]),
    ];

    let tracks = decode_all(&messages).build();
    let g08 = tracks.get(&gps(8)).unwrap();

    let content = serde_json::to_value(g08).unwrap();
    let parsed: SatelliteTrack = serde_json::from_value(content.clone()).unwrap();
    assert_eq!(&parsed, g08);

    // a track always carries one ephemeris
    let mut empty = content.clone();
    empty["ephemeris"] = serde_json::json!([]);
    assert!(serde_json::from_value::<SatelliteTrack>(empty).is_err());

    // observations and instants are index-aligned
    let mut misaligned = content;
    misaligned["times"] = serde_json::json!([10.0, 11.0]);
    assert!(serde_json::from_value::<SatelliteTrack>(misaligned).is_err());
}
