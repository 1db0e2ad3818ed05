use osufile::prelude::*;
use pretty_assertions::assert_eq;

#[test]
fn timing_point_example() {
    let doc = Document::parse("[TimingPoints]\n852,468.75,4,2,1,60,1,0\n").expect("must be parsed");
    assert_eq!(
        doc.timing_points().expect("timing points"),
        [TimingPoint {
            time: 852,
            beat_length: Float::Binary(468.75),
            meter: 4,
            sample_set: 2,
            sample_index: 1,
            volume: 60,
            uninherited: true,
            effects: 0,
        }]
    );
    assert_eq!(
        doc.unparse().expect("must be written"),
        "[TimingPoints]\n852,468.75,4,2,1,60,1,0\n"
    );
}

#[test]
fn timing_point_defaults() {
    let doc = Document::parse("[TimingPoints]\n1000,300,3,1,2\n").expect("must be parsed");
    let point = &doc.timing_points().expect("timing points")[0];
    assert_eq!(point.meter, 3);
    assert_eq!(point.sample_index, 2);
    assert_eq!(point.volume, 100);
    assert!(point.uninherited);
    assert_eq!(point.effects, 0);
    assert_eq!(point.bpm(), Some(200.0));
}

#[test]
fn hit_object_variant_dispatch() {
    let source = "[HitObjects]\n\
        100,100,1000,1,0,0:0:0:0:\n\
        100,100,2000,6,0,B|200:200|250:200,2,150,2|0|8,0:0|1:0|0:0,0:0:0:0:\n\
        256,192,3000,8,0,4000,0:0:0:0:\n\
        64,192,5000,128,0,5500:0:0:0:0:\n";
    let doc = Document::parse(source).expect("must be parsed");
    let objects = doc.hit_objects().expect("hit objects");
    assert_eq!(objects.len(), 4);

    assert!(matches!(objects[0].kind, HitObjectKind::Circle { .. }));
    let HitObjectKind::Slider(slider) = &objects[1].kind else {
        panic!("expected slider, got {:?}", objects[1].kind);
    };
    assert!(objects[1].is_new_combo());
    assert_eq!(slider.curve_type, CurveType::Bezier);
    assert_eq!(slider.curve_points, vec![(200, 200), (250, 200)]);
    assert_eq!(slider.slides, 2);
    assert_eq!(slider.edge_sounds, vec![2, 0, 8]);
    assert_eq!(slider.edge_sets, vec![(0, 0), (1, 0), (0, 0)]);
    assert_eq!(
        objects[2].kind,
        HitObjectKind::Spinner {
            end_time: 4000,
            sample: HitSample::default()
        }
    );
    assert_eq!(objects[3].end_time(), 5500);

    for (object, type_bits) in objects.iter().zip([1, 6, 8, 128]) {
        assert_eq!(object.type_bits(), type_bits);
    }
    assert_eq!(doc.unparse().expect("must be written"), source);
}

#[test]
fn hit_object_variant_dispatch_with_combo_flags() {
    use osufile::model::hit_object::{
        TYPE_CIRCLE, TYPE_COMBO_SKIP, TYPE_HOLD, TYPE_NEW_COMBO, TYPE_SLIDER, TYPE_SPINNER,
    };

    let codec = Codec::default();
    let variants = [
        (TYPE_CIRCLE, "100,100,1000,{},0,0:0:0:0:"),
        (TYPE_SLIDER, "100,100,2000,{},0,L|200:200,1,100"),
        (TYPE_SPINNER, "256,192,3000,{},0,4000,0:0:0:0:"),
        (TYPE_HOLD, "64,192,5000,{},0,5500:0:0:0:0:"),
    ];
    let flag_sets = std::iter::once(TYPE_NEW_COMBO)
        .chain((1..=7).map(|skip| skip << 4))
        .chain((1..=7).map(|skip| TYPE_NEW_COMBO | (skip << 4)));

    for flags in flag_sets {
        for (variant, template) in variants {
            let type_bits = variant | flags;
            let line = template.replace("{}", &type_bits.to_string());
            let object = HitObject::parse_record(&codec, &line)
                .unwrap_or_else(|err| panic!("{line:?} must be parsed: {err}"));

            assert_eq!(object.kind.type_bit(), variant, "{line:?}");
            assert_eq!(object.flags, flags, "{line:?}");
            assert_eq!(object.is_new_combo(), flags & TYPE_NEW_COMBO != 0);
            assert_eq!(object.combo_colour_skip(), (flags & TYPE_COMBO_SKIP) >> 4);
            assert_eq!(object.type_bits(), type_bits);
            assert_eq!(object.write_record(&codec), line);
        }
    }
}

#[test]
fn hit_object_variant_kept_in_sync_on_write() {
    let mut doc = Document::parse("[HitObjects]\n100,100,1000,5,0,0:0:0:0:\n").expect("must be parsed");
    let Some(SectionValue::HitObjects(objects)) = doc.sections.get_mut("HitObjects") else {
        panic!("expected hit objects");
    };
    objects[0].kind = HitObjectKind::Spinner {
        end_time: 1500,
        sample: HitSample::default(),
    };
    assert_eq!(
        doc.unparse().expect("must be written"),
        "[HitObjects]\n100,100,1000,12,0,1500,0:0:0:0:\n"
    );
}

#[test]
fn hit_object_unknown_variant() {
    let err = Document::parse("[HitObjects]\n100,100,1000,1,0\n100,100,1000,4,0\n").unwrap_err();
    assert_eq!(
        err,
        ParseError::UnknownHitObjectVariant {
            section: "HitObjects".into(),
            line: 3,
            type_bits: 4,
        }
    );
}

#[test]
fn hit_object_too_few_fields() {
    let err = Document::parse("[HitObjects]\n256,192,5000,8,0\n").unwrap_err();
    assert_eq!(
        err,
        ParseError::TooFewFields {
            section: "HitObjects".into(),
            line: 2,
            expected: 7,
            found: 5,
        }
    );
}

#[test]
fn events_are_typed() {
    let doc = Document::parse(
        "[Events]\n//Background and Video events\n0,0,\"bg.jpg\",0,0\n1,0,\"v.mp4\"\n2,100,200\n3,100,0,0,0\n",
    )
    .expect("must be parsed");
    assert_eq!(
        doc.events().expect("events"),
        [
            Event::Background {
                time: 0,
                filename: "bg.jpg".into(),
                x_offset: 0,
                y_offset: 0
            },
            Event::Video {
                time: 0,
                filename: "v.mp4".into(),
                x_offset: 0,
                y_offset: 0
            },
            Event::Break {
                start: 100,
                end: 200
            },
            Event::Other("3,100,0,0,0".into()),
        ]
    );
}

#[test]
fn property_defaults_and_passthrough() {
    let doc = Document::parse(
        "[General]\nAudioFilename: a.mp3\nEpilepsyWarning: 1\nSomeNewKey: 42\n\n[Editor]\nBookmarks:\n",
    )
    .expect("must be parsed");
    assert_eq!(
        doc.property("General", "EpilepsyWarning"),
        Ok(&Value::Bool(true))
    );
    assert_eq!(
        doc.property("General", "SomeNewKey"),
        Ok(&Value::Str("42".into()))
    );
    assert_eq!(doc.property("Editor", "Bookmarks"), Ok(&Value::IntList(vec![])));
    assert_eq!(
        doc.property("General", "Mode"),
        Err(DocumentError::MissingKey {
            section: "General".into(),
            key: "Mode".into()
        })
    );
}

#[test]
fn int_codec_override_propagates() {
    struct Hex;

    impl IntCodec for Hex {
        fn decode(&self, raw: &str) -> Option<i64> {
            i64::from_str_radix(raw.trim().strip_prefix("0x")?, 16).ok()
        }

        fn encode(&self, value: i64) -> String {
            format!("0x{value:x}")
        }
    }

    let config = Config::default().with_int_codec(Hex);
    let source = "[General]\nMode: 0x3\n\n[TimingPoints]\n0x10,500,0x4,0x1,0x0,0x64,0x1,0x0\n\n[HitObjects]\n0x100,0xc0,0x3e8,0x1,0x0,0x0:0x0:0x0:0x0:\n";
    let doc = parse(source, &config).expect("must be parsed");
    assert_eq!(doc.property("General", "Mode"), Ok(&Value::Int(3)));
    assert_eq!(doc.timing_points().expect("timing points")[0].time, 16);
    assert_eq!(doc.hit_objects().expect("hit objects")[0].time, 1000);
    assert_eq!(write_string(&doc, &config).expect("must be written"), source);

    assert!(Document::parse(source).is_err());
}
