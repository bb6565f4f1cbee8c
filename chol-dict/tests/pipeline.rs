use std::fs;

use chol_dict::collation::realphabetize;
use chol_dict::config::DictionaryConfig;
use chol_dict::converter::{ConvertMode, Document, SourceConverter};
use chol_dict::orthography::Orthography;
use chol_dict::record::Direction;
use chol_dict::rules::RuleTable;

const RULES: &str = "# old -> new\nt' -> ty'\nan -> añ\n";

const CHOL_SOURCE: &str = "\\_sh v3.0\n\n\
\\lx A\n\\alf A\n\n\
\\lx at'an\n\\tl palabra\n\n\n\
\\lx ajaw\n\\tl señor\n";

const SPANISH_SOURCE: &str = "\\lxi señor\n\\tli ajaw\n\n\
\\lxi árbol\n\\tli t'e'\n";

fn pass(conv: &SourceConverter, text: &str, direction: Direction) -> String {
    let mut updated = vec![];
    conv.convert_source(text.as_bytes(), &mut updated, direction, ConvertMode::ORTHOGRAPHY)
        .unwrap();

    let mut ordered = vec![];
    realphabetize(updated.as_slice(), &mut ordered, direction).unwrap();
    String::from_utf8(ordered).unwrap()
}

#[test]
fn builds_the_dictionary_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let rules = dir.path().join("conversion_rules.txt");
    let header = dir.path().join("latex_header.tex");
    let config_path = dir.path().join("dictionary.json");

    fs::write(&rules, RULES).unwrap();
    fs::write(&header, "HEADER").unwrap();
    fs::write(
        &config_path,
        serde_json::json!({
            "rules": rules,
            "latex_header": header,
            "latex_closing": "CLOSING",
        })
        .to_string(),
    )
    .unwrap();

    let config = DictionaryConfig::from_path(&config_path).unwrap();
    let engine = Orthography::from_path(&config.rules, config.rule_mode).unwrap();
    let document = Document::from_config(&config).unwrap();
    let conv = SourceConverter::new(&engine);

    let chol = pass(&conv, CHOL_SOURCE, Direction::CholToSpanish);
    assert_eq!(
        chol,
        "\\_sh v3.0\n\n\
         \\lx A\n\\alf A\n\n\
         \\lx ajaw\n\\tl señor\n\n\
         \\lx aty'añ\n\\tl palabra\n\n"
    );

    let spanish = pass(&conv, SPANISH_SOURCE, Direction::SpanishToChol);
    assert_eq!(
        spanish,
        "\\lxi A\n\\alf A\n\n\
         \\lxi árbol\n\\tli ty'e'\n\n\
         \\lxi S\n\\alf S\n\n\
         \\lxi señor\n\\tli ajaw\n\n"
    );

    let mut out = vec![];
    conv.write_document(&document, chol.as_bytes(), spanish.as_bytes(), &mut out)
        .unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "HEADER\n\
         \n\
         \\alphaletter{A}\n\
         \n\
         \\entry{ajaw}\n\
         \\spanishtranslation{señor}\n\
         \n\
         \\entry{aty'añ}\n\
         \\spanishtranslation{palabra}\n\
         \n\
         \\maintitle{ESPAÑOL – CH'OL}\n\
         \n\
         \\alphaletter{A}\n\
         \n\
         \\entry{árbol}\n\
         \\spanishtranslation{ty'e'}\n\
         \n\
         \\alphaletter{S}\n\
         \n\
         \\entry{señor}\n\
         \\spanishtranslation{ajaw}\n\
         \n\
         CLOSING"
    );
}

#[test]
fn unknown_section_letter_is_reported() {
    let mut out = vec![];
    let err = realphabetize(
        "\\lxi ñandú\n\\tli x\n".as_bytes(),
        &mut out,
        Direction::SpanishToChol,
    )
    .unwrap_err();
    assert!(err.to_string().contains("ñ"));
}

#[test]
fn empty_alphabet_marker_survives_the_orthography_pass() {
    let engine = Orthography::new(RuleTable::parse(RULES).unwrap());
    let conv = SourceConverter::new(&engine);

    let out = pass(
        &conv,
        "\\lx A\n\\alf A\n\n\\lx t'an\n\\alf\n\\ge word\n",
        Direction::CholToSpanish,
    );
    assert_eq!(out, "\\lx A\n\\alf A\n\n\\lx ty'añ\n\\alf\n\\ge word\n\n");
}
