use osufile::prelude::*;
use pretty_assertions::assert_eq;

/// Reads one integer per line, the way a caller adds a section of their own.
struct NumbersSection;

impl SectionHandler for NumbersSection {
    fn parse(
        &self,
        codec: &Codec,
        section: &str,
        lines: &[SourceLine<'_>],
    ) -> Result<SectionValue, ParseError> {
        lines
            .iter()
            .map(|line| {
                codec
                    .decode_int(line.text())
                    .map(Value::Int)
                    .map_err(|error| ParseError::malformed(section, line.line(), "number", error))
            })
            .collect::<Result<_, _>>()
            .map(SectionValue::Values)
    }

    fn write(
        &self,
        codec: &Codec,
        sink: &mut LineSink,
        section: &str,
        value: &SectionValue,
    ) -> Result<(), WriteError> {
        let SectionValue::Values(values) = value else {
            return Err(WriteError::UnexpectedValue {
                section: section.to_string(),
                expected: "values",
            });
        };
        for value in values {
            sink.push(codec.encode(value));
        }
        Ok(())
    }
}

/// Drops hit objects which fail to parse instead of aborting.
struct LenientHitObjects;

impl SectionHandler for LenientHitObjects {
    fn parse(
        &self,
        codec: &Codec,
        _section: &str,
        lines: &[SourceLine<'_>],
    ) -> Result<SectionValue, ParseError> {
        Ok(SectionValue::HitObjects(
            lines
                .iter()
                .filter_map(|line| HitObject::parse_record(codec, line.text()).ok())
                .collect(),
        ))
    }

    fn write(
        &self,
        codec: &Codec,
        sink: &mut LineSink,
        section: &str,
        value: &SectionValue,
    ) -> Result<(), WriteError> {
        ListSection::<HitObject>::new().write(codec, sink, section, value)
    }
}

const WITH_NUMBERS: &str = "osu file format v14\n\n[General]\nAudioFilename: audio.mp3\nStackLeniency: 0.7\n\n[Numbers]\n3\n-5\n60\n-128\n";

#[test]
fn custom_section_roundtrip() {
    let config = Config::default().with_handler("Numbers", NumbersSection);
    let doc = parse(WITH_NUMBERS, &config).expect("must be parsed");
    assert_eq!(
        doc.section("Numbers"),
        Ok(&SectionValue::Values(vec![
            Value::Int(3),
            Value::Int(-5),
            Value::Int(60),
            Value::Int(-128)
        ]))
    );
    assert_eq!(write_string(&doc, &config).expect("must be written"), WITH_NUMBERS);

    let err = parse("[Numbers]\n1\nx\n", &config).unwrap_err();
    assert_eq!(err.line(), 3);
}

#[test]
fn custom_section_without_handler_is_raw() {
    let doc = Document::parse(WITH_NUMBERS).expect("must be parsed");
    assert_eq!(
        doc.section("Numbers"),
        Ok(&SectionValue::Raw(vec![
            "3".into(),
            "-5".into(),
            "60".into(),
            "-128".into()
        ]))
    );
    assert_eq!(doc.unparse().expect("must be written"), WITH_NUMBERS);

    let with_numbers = Config::default().with_handler("Numbers", NumbersSection);
    let typed = parse(WITH_NUMBERS, &with_numbers).expect("must be parsed");
    assert!(matches!(
        typed.unparse(),
        Err(WriteError::NoHandler(section)) if section == "Numbers"
    ));
}

#[test]
fn unknown_section_passthrough() {
    let source = "osu file format v14\n\n[Fancy]\n  keep: this\n\n// and this\n\tand [this]\n\n[Metadata]\nTitle:x\n";
    let doc = Document::parse(source).expect("must be parsed");
    assert_eq!(
        doc.section("Fancy"),
        Ok(&SectionValue::Raw(vec![
            "  keep: this".into(),
            String::new(),
            "// and this".into(),
            "\tand [this]".into()
        ]))
    );
    assert_eq!(doc.unparse().expect("must be written"), source);
}

#[test]
fn handler_removed_keeps_section_verbatim() {
    let config = Config::default().without_handler("HitObjects");
    let source = "[HitObjects]\n256,192,1000,0,0\n";
    let doc = parse(source, &config).expect("must be parsed");
    assert_eq!(
        doc.section("HitObjects"),
        Ok(&SectionValue::Raw(vec!["256,192,1000,0,0".into()]))
    );
    assert_eq!(write_string(&doc, &config).expect("must be written"), source);
    assert!(Document::parse(source).is_err());
}

#[test]
fn lenient_handler_override() {
    let source = "[HitObjects]\n256,192,1000,1,0\n256,192,asdf,1,0\n256,192,2000,0,0\n256,192,3000,1,0\n";
    assert!(Document::parse(source).is_err());

    let config = Config::default().with_handler("HitObjects", LenientHitObjects);
    let doc = parse(source, &config).expect("must be parsed");
    assert_eq!(
        doc.hit_objects()
            .expect("hit objects")
            .iter()
            .map(|object| object.time)
            .collect::<Vec<_>>(),
        vec![1000, 3000]
    );
}

#[test]
fn order_of_sections_and_keys() {
    let source = "[Metadata]\nVersion:Hard\nArtist:a\nTitle:t\n\n[Difficulty]\nCircleSize:4\n\n[General]\nMode: 0\n\n[Editor]\nGridSize: 4\n";
    let doc = Document::parse(source).expect("must be parsed");
    assert_eq!(
        doc.sections.keys().collect::<Vec<_>>(),
        vec!["Metadata", "Difficulty", "General", "Editor"]
    );
    assert_eq!(
        doc.properties("Metadata")
            .expect("metadata")
            .keys()
            .collect::<Vec<_>>(),
        vec!["Version", "Artist", "Title"]
    );
    assert_eq!(doc.unparse().expect("must be written"), source);
}

#[test]
fn combo_colours_reorder() {
    let source = "[Colours]\nCombo2 : 0,255,0\nSliderBorder : 1,2,3\nCombo1 : 255,0,0\n";
    let mut doc = Document::parse(source).expect("must be parsed");
    let (combos, others) = combo_colours(doc.properties("Colours").expect("colours"));
    assert_eq!(combos, vec![Colour::new(255, 0, 0), Colour::new(0, 255, 0)]);

    doc.sections.insert(
        "Colours",
        SectionValue::Properties(join_combo_colours(&combos, &others)),
    );
    assert_eq!(
        doc.unparse().expect("must be written"),
        "[Colours]\nCombo1 : 255,0,0\nCombo2 : 0,255,0\nSliderBorder : 1,2,3\n"
    );
}

#[test]
fn structural_errors() {
    for (source, line) in [
        ("osu file format v14\n\n[General\nMode: 0\n", 3),
        ("osu file format v14\n[  ]\n", 2),
        ("[General]\nMode: 0\n[Metadata\n", 3),
    ] {
        let err = Document::parse(source).unwrap_err();
        assert!(matches!(err, ParseError::StructuralError { .. }), "{source:?}");
        assert_eq!(err.line(), line, "{source:?}");
    }
}

#[test]
fn malformed_property() {
    let err = Document::parse("osu file format v14\n\n[Difficulty]\nHPDrainRate:5\nApproachRate:fast\n")
        .unwrap_err();
    assert_eq!(
        err,
        ParseError::MalformedField {
            section: "Difficulty".into(),
            line: 5,
            key: "ApproachRate".into(),
            raw: "fast".into(),
            expected: FieldKind::Float,
        }
    );
    assert_eq!(
        err.to_string(),
        "[Difficulty] line 5: `ApproachRate` expected float but found \"fast\""
    );
}
